//! End-to-end tests for the HTTP API.
//!
//! Each test starts the real server on a free port against a fresh SQLite
//! database and drives it with `reqwest`.

use recipe_manager::config::Config;
use recipe_manager::server::run_server;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

fn test_config_with_port(tmp: &TempDir, port: u16) -> Config {
    let db_path = tmp.path().join("recipes.sqlite");
    let config_content = format!(
        r#"
[db]
path = "{}"

[server]
bind = "127.0.0.1:{}"
"#,
        db_path.display(),
        port
    );
    toml::from_str(&config_content).unwrap()
}

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

struct TestServer {
    _tmp: TempDir,
    base: String,
    handle: tokio::task::JoinHandle<()>,
    client: Client,
}

impl TestServer {
    async fn start() -> Self {
        let port = find_free_port();
        let tmp = TempDir::new().unwrap();
        let cfg = test_config_with_port(&tmp, port);
        let handle = tokio::spawn(async move {
            run_server(&cfg).await.ok();
        });
        wait_for_server(port).await;
        Self {
            _tmp: tmp,
            base: format!("http://127.0.0.1:{}", port),
            handle,
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn create(&self, body: Value) -> Value {
        let resp = self
            .client
            .post(self.url("/recipes"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        resp.json().await.unwrap()
    }

    async fn search(&self, query: &str) -> Vec<String> {
        let resp = self
            .client
            .get(self.url(&format!("/recipes{}", query)))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "query {}", query);
        let body: Value = resp.json().await.unwrap();
        body.as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn recipe(name: &str, vegetarian: bool, ingredients: &[&str], instructions: &str, minutes: u32) -> Value {
    json!({
        "name": name,
        "vegetarian": vegetarian,
        "servings": 2,
        "ingredients": ingredients,
        "instructions": instructions,
        "preparationTime": minutes
    })
}

#[tokio::test]
async fn test_create_then_get_normalizes_ingredients() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .post(server.url("/recipes"))
        .json(&recipe("Aloo", true, &[" Potato "], "cook", 15))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(location, format!("/recipes/{}", id));

    let resp = server.client.get(server.url(&location)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "Aloo");
    assert_eq!(body["ingredients"], json!(["potato"]));
    assert_eq!(body["preparationTime"], 15);
}

#[tokio::test]
async fn test_get_missing_returns_not_found_body() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .get(server.url("/recipes/99"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(body["error"]["message"], "Recipe not found with id: 99");
}

#[tokio::test]
async fn test_create_rejects_invalid_bodies() {
    let server = TestServer::start().await;

    let missing_fields = server
        .client
        .post(server.url("/recipes"))
        .json(&json!({ "name": "Half" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_fields.status(), StatusCode::BAD_REQUEST);
    let body: Value = missing_fields.json().await.unwrap();
    assert_eq!(body["error"]["code"], "validation_error");

    let blank_name = server
        .client
        .post(server.url("/recipes"))
        .json(&recipe("   ", true, &[], "cook", 5))
        .send()
        .await
        .unwrap();
    assert_eq!(blank_name.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_put_replaces_fields() {
    let server = TestServer::start().await;
    let created = server.create(recipe("Old", true, &["x"], "old", 5)).await;
    let id = created["id"].as_i64().unwrap();

    let resp = server
        .client
        .put(server.url(&format!("/recipes/{}", id)))
        .json(&recipe("NewName", false, &["Beef "], "grill", 40))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "NewName");
    assert_eq!(body["vegetarian"], false);
    assert_eq!(body["ingredients"], json!(["beef"]));

    let missing = server
        .client
        .put(server.url("/recipes/4242"))
        .json(&recipe("Nope", true, &[], "", 1))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_merges_and_normalizes() {
    let server = TestServer::start().await;
    let created = server.create(recipe("Patch", true, &["X"], "old", 5)).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["ingredients"], json!(["x"]));

    let resp = server
        .client
        .patch(server.url(&format!("/recipes/{}", id)))
        .json(&json!({ "ingredients": [" Potato ", "Salt"], "id": 999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let stored: Value = server
        .client
        .get(server.url(&format!("/recipes/{}", id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored["id"], id);
    assert_eq!(stored["ingredients"], json!(["potato", "salt"]));
    assert_eq!(stored["name"], "Patch");
    assert_eq!(stored["instructions"], "old");
    assert_eq!(stored["preparationTime"], 5);
}

#[tokio::test]
async fn test_patch_rejects_unknown_and_mistyped_fields() {
    let server = TestServer::start().await;
    let created = server.create(recipe("Strict", true, &[], "old", 5)).await;
    let id = created["id"].as_i64().unwrap();
    let url = server.url(&format!("/recipes/{}", id));

    for payload in [json!({ "colour": "red" }), json!({ "vegetarian": "yes" })] {
        let resp = server.client.patch(&url).json(&payload).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["code"], "invalid_patch");
    }

    let missing = server
        .client
        .patch(server.url("/recipes/4242"))
        .json(&json!({ "name": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_get_and_delete_again() {
    let server = TestServer::start().await;
    let created = server.create(recipe("ToDelete", true, &["x"], "do", 3)).await;
    let url = server.url(&format!("/recipes/{}", created["id"]));

    let resp = server.client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = server.client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = server.client.delete(&url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_filtering_combinations() {
    let server = TestServer::start().await;
    server
        .create(recipe("VegPotato", true, &["potato", "salt"], "bake in oven", 30))
        .await;
    server
        .create(recipe("NonVeg", false, &["chicken", "salt"], "grill", 40))
        .await;
    server
        .create(recipe("VegCarrot", true, &["carrot"], "boil", 10))
        .await;

    assert_eq!(server.search("").await.len(), 3);
    assert_eq!(
        server.search("?vegetarian=true&include=potato").await,
        vec!["VegPotato"]
    );
    assert_eq!(server.search("?preparationTime=10").await, vec!["VegCarrot"]);
    assert_eq!(server.search("?text=oven").await, vec!["VegPotato"]);
    assert_eq!(server.search("?text=OVEN").await, vec!["VegPotato"]);
    assert_eq!(
        server.search("?exclude=salt").await,
        vec!["VegCarrot"]
    );
    assert_eq!(
        server.search("?include=%20Salt%20&exclude=chicken").await,
        vec!["VegPotato"]
    );
    assert_eq!(
        server.search("?include=potato,salt&servings=2").await,
        vec!["VegPotato"]
    );
    assert!(server
        .search("?include=potato&exclude=potato")
        .await
        .is_empty());
    assert_eq!(server.search("?text=%20%20").await.len(), 3);
}

#[tokio::test]
async fn test_invalid_query_parameter() {
    let server = TestServer::start().await;
    let resp = server
        .client
        .get(server.url("/recipes?servings=many"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
}

//! Ingredient normalization.
//!
//! Stored ingredients are always trimmed, lowercased, and non-empty. Input
//! order and repeats are preserved.

/// Trim and lowercase a single ingredient or search term.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Normalize a list of ingredients, dropping entries that are blank.
pub fn normalize_list<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items
        .iter()
        .map(|s| normalize_term(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Normalize an optional ingredient list. `None` stays `None`.
pub fn normalize_ingredients(items: Option<Vec<String>>) -> Option<Vec<String>> {
    items.map(|list| normalize_list(&list))
}

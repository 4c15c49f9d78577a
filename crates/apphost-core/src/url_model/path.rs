//! Path half of a route.

/// Canonical absolute path: one leading `/`, no trailing `/` except for the
/// root, query string and fragment dropped.
pub fn normalize_path(input: &str) -> String {
    let s = input.trim();
    let s = s.split(['?', '#']).next().unwrap_or_default();
    let inner = s.trim_start_matches('/').trim_end_matches('/');
    format!("/{inner}")
}

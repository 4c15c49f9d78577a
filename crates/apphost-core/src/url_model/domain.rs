//! Domain half of a route.

const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Strips a leading `http://` / `https://` and any trailing slashes, and
/// lowercases ASCII letters so `Example.org` and `example.org` are one route.
pub fn normalize_domain(input: &str) -> String {
    let mut s = input.trim();
    for scheme in SCHEMES {
        if s
            .get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
        {
            s = &s[scheme.len()..];
            break;
        }
    }
    s.trim_end_matches('/').to_ascii_lowercase()
}

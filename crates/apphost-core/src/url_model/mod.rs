//! URL modeling: canonical (domain, path) routes.
//!
//! User input arrives in many shapes (`https://example.org/`, `example.org`,
//! `app/`, `/app/`). Everything that keys on a location goes through
//! [`normalize_domain_path`] first so equivalent spellings compare equal.

mod domain;
mod path;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use domain::normalize_domain;
pub use path::normalize_path;

/// Normalizes a user-supplied domain and path into their canonical pair.
///
/// Total and idempotent: malformed input is normalized as far as possible and
/// never rejected here. Whether the domain exists is the domain directory's
/// call, whether the path is free is the route registry's.
///
/// # Examples
///
/// - `normalize_domain_path("https://yolo.swag/", "macnuggets")` → `("yolo.swag", "/macnuggets")`
/// - `normalize_domain_path("yolo.swag/", "macnuggets/")` → `("yolo.swag", "/macnuggets")`
pub fn normalize_domain_path(domain: &str, path: &str) -> (String, String) {
    (normalize_domain(domain), normalize_path(path))
}

/// A canonical `(domain, path)` pair: the unit of uniqueness in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Route {
    pub domain: String,
    pub path: String,
}

impl Route {
    /// Build a route from raw user input, normalizing both halves.
    pub fn normalized(domain: &str, path: &str) -> Self {
        let (domain, path) = normalize_domain_path(domain, path);
        Self { domain, path }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path == "/" {
            write!(f, "{}/", self.domain)
        } else {
            write!(f, "{}{}", self.domain, self.path)
        }
    }
}

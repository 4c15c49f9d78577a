//! Domain directory: which domains this host serves.
//!
//! Read-only from the registry's point of view. The host's domain list is
//! owned by configuration; the registry only asks whether a domain exists.

use crate::config::ApphostConfig;
use crate::url_model::normalize_domain;

/// Lookup of domains known to the host.
pub trait DomainDirectory: Send + Sync {
    /// Whether `domain` (already normalized) is served by this host.
    fn is_known_domain(&self, domain: &str) -> bool;

    /// Primary domain, if the host has one.
    fn main_domain(&self) -> Option<&str>;

    /// All known domains, main domain first.
    fn domains(&self) -> Vec<String>;
}

/// Fixed domain list, usually built from [`ApphostConfig`].
#[derive(Debug, Clone, Default)]
pub struct StaticDomains {
    main: Option<String>,
    domains: Vec<String>,
}

impl StaticDomains {
    /// Build a directory; entries are normalized and deduplicated
    /// case-insensitively, with the main domain kept first.
    pub fn new<I, S>(main_domain: Option<&str>, others: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let main = main_domain
            .map(normalize_domain)
            .filter(|d| !d.is_empty());
        let mut domains: Vec<String> = main.iter().cloned().collect();
        for d in others {
            let d = normalize_domain(d.as_ref());
            if d.is_empty() || domains.iter().any(|k| k.eq_ignore_ascii_case(&d)) {
                continue;
            }
            domains.push(d);
        }
        Self { main, domains }
    }

    pub fn from_config(cfg: &ApphostConfig) -> Self {
        Self::new(Some(cfg.main_domain.as_str()), &cfg.domains)
    }
}

impl DomainDirectory for StaticDomains {
    fn is_known_domain(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d.eq_ignore_ascii_case(domain))
    }

    fn main_domain(&self) -> Option<&str> {
        self.main.as_deref()
    }

    fn domains(&self) -> Vec<String> {
        self.domains.clone()
    }
}

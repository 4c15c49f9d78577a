//! Registered app lists: named catalog URLs, persisted as `applists.json`
//! under the state directory.
//!
//! Names and URLs are both unique. Only the registry is kept here; fetching
//! a list's catalog is not part of this crate.

mod error;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

pub use error::AppListError;

const APP_LISTS_FILE: &str = "applists.json";

/// One registered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppList {
    pub url: String,
}

/// File-backed registry of app lists.
#[derive(Debug, Clone)]
pub struct AppListRegistry {
    path: PathBuf,
}

impl AppListRegistry {
    /// Registry stored in `<state_dir>/applists.json`.
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            path: state_dir.as_ref().join(APP_LISTS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All registered lists by name. Empty when nothing was registered yet.
    pub fn list(&self) -> Result<BTreeMap<String, AppList>, AppListError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(AppListError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&data).map_err(|e| AppListError::Json {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Register `url` as `name`. Fails if either is already registered.
    /// Returns the URL as stored (normalized by the URL parser).
    pub fn add(&self, name: &str, url: &str) -> Result<String, AppListError> {
        validate_name(name)?;
        let url = normalize_url(url)?;
        let mut lists = self.list()?;
        if let Some(existing) = lists.get(name) {
            return Err(AppListError::NameTaken {
                name: name.to_string(),
                url: existing.url.clone(),
            });
        }
        if let Some((other, _)) = lists.iter().find(|(_, l)| l.url == url) {
            return Err(AppListError::UrlTaken {
                url,
                name: other.clone(),
            });
        }
        lists.insert(name.to_string(), AppList { url: url.clone() });
        self.save(&lists)?;
        tracing::info!(name, url = %url, "app list registered");
        Ok(url)
    }

    /// Unregister `name`; returns its URL.
    pub fn remove(&self, name: &str) -> Result<String, AppListError> {
        let mut lists = self.list()?;
        let removed = lists.remove(name).ok_or_else(|| AppListError::UnknownList {
            name: name.to_string(),
        })?;
        self.save(&lists)?;
        tracing::info!(name, "app list removed");
        Ok(removed.url)
    }

    fn save(&self, lists: &BTreeMap<String, AppList>) -> Result<(), AppListError> {
        let json = serde_json::to_string_pretty(lists).map_err(|e| AppListError::Json {
            path: self.path.clone(),
            source: e,
        })?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppListError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::write(&self.path, json).map_err(|e| AppListError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

fn validate_name(name: &str) -> Result<(), AppListError> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(AppListError::InvalidName {
            name: name.to_string(),
        })
    }
}

fn normalize_url(input: &str) -> Result<String, AppListError> {
    let invalid = |reason: String| AppListError::InvalidUrl {
        url: input.to_string(),
        reason,
    };
    let url = Url::parse(input.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

//! App list registry errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppListError {
    #[error("app list '{name}' is not registered")]
    UnknownList { name: String },
    #[error("an app list named '{name}' already exists ({url})")]
    NameTaken { name: String, url: String },
    #[error("{url} is already registered as app list '{name}'")]
    UrlTaken { url: String, name: String },
    #[error("invalid app list name '{name}': use letters, digits, '-' and '_'")]
    InvalidName { name: String },
    #[error("invalid app list url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("cannot read or write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse or serialize {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

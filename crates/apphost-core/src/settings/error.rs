//! Settings error type.

use std::path::PathBuf;

use thiserror::Error;

use super::entry::SettingType;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("setting '{key}' does not exist")]
    UnknownKey { key: String },
    #[error("bad value type for setting '{key}': expected {expected}, received {received}")]
    BadType {
        key: String,
        expected: SettingType,
        received: String,
    },
    #[error("bad value for setting '{key}': '{value}' is not one of {}", .choices.join(", "))]
    BadChoice {
        key: String,
        value: String,
        choices: Vec<String>,
    },
    #[error("resetting all settings needs confirmation")]
    NotConfirmed,
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

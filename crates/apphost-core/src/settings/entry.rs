//! Setting types, values and the built-in defaults.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    Bool,
    Int,
    String,
    Enum,
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SettingType::Bool => "bool",
            SettingType::Int => "int",
            SettingType::String => "string",
            SettingType::Enum => "enum",
        };
        f.write_str(s)
    }
}

/// A setting value as stored in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl SettingValue {
    /// Name of the JSON type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "bool",
            SettingValue::Int(_) => "int",
            SettingValue::String(_) => "string",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{b}"),
            SettingValue::Int(i) => write!(f, "{i}"),
            SettingValue::String(s) => f.write_str(s),
        }
    }
}

/// One setting: type, current value, default, and for enums the allowed choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingEntry {
    #[serde(rename = "type")]
    pub kind: SettingType,
    pub value: SettingValue,
    pub default: SettingValue,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl SettingEntry {
    fn new(kind: SettingType, default: SettingValue, description: &str) -> Self {
        Self {
            kind,
            value: default.clone(),
            default,
            description: description.to_string(),
            choices: Vec::new(),
        }
    }

    fn with_choices(mut self, choices: &[&str]) -> Self {
        self.choices = choices.iter().map(|c| c.to_string()).collect();
        self
    }
}

/// Built-in settings with their default values.
pub fn defaults() -> BTreeMap<String, SettingEntry> {
    BTreeMap::from([
        (
            super::INSTALL_TIMEOUT_SECS.to_string(),
            SettingEntry::new(
                SettingType::Int,
                SettingValue::Int(600),
                "Abort a package install after this many seconds",
            ),
        ),
        (
            super::INSTALL_KEEP_FAILED.to_string(),
            SettingEntry::new(
                SettingType::Bool,
                SettingValue::Bool(false),
                "Keep the package copy of a failed install for inspection",
            ),
        ),
        (
            super::APPS_DEFAULT_PATH.to_string(),
            SettingEntry::new(
                SettingType::String,
                SettingValue::String("/".to_string()),
                "Path used when an install does not name one",
            ),
        ),
        (
            super::LOG_LEVEL.to_string(),
            SettingEntry::new(
                SettingType::Enum,
                SettingValue::String("info".to_string()),
                "Default log level when RUST_LOG is unset",
            )
            .with_choices(&["error", "warn", "info", "debug", "trace"]),
        ),
    ])
}

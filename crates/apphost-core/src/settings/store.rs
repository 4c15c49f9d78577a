//! Settings file handling: load, validate, save, reset.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use super::entry::{defaults, SettingEntry, SettingType, SettingValue};
use super::error::SettingsError;

const SETTINGS_FILE: &str = "settings.json";
const UNKNOWN_FILE: &str = "settings-unknown.json";

/// Returned by [`SettingsStore::reset_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetOutcome {
    /// Where the settings were saved before the reset.
    pub backup_path: PathBuf,
}

/// Settings stored under a state directory (`settings.json`).
#[derive(Debug, Clone)]
pub struct SettingsStore {
    dir: PathBuf,
}

impl SettingsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    pub fn unknown_path(&self) -> PathBuf {
        self.dir.join(UNKNOWN_FILE)
    }

    /// All settings: defaults overlaid with the values stored on disk.
    ///
    /// Stored values that no longer type-check are ignored with a warning.
    /// Unknown keys are appended to `settings-unknown.json`.
    pub fn load(&self) -> Result<BTreeMap<String, SettingEntry>, SettingsError> {
        let mut settings = defaults();
        let path = self.settings_path();
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(settings),
            Err(e) => return Err(SettingsError::Io { path, source: e }),
        };
        let stored: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(&data).map_err(|e| SettingsError::Json {
                path: path.clone(),
                source: e,
            })?;

        let mut unknown: Option<BTreeMap<String, serde_json::Value>> = None;
        for (key, raw) in stored {
            let Some(entry) = settings.get_mut(&key) else {
                tracing::warn!("unknown setting '{}' in {}, moved aside", key, path.display());
                unknown
                    .get_or_insert_with(|| self.load_unknown())
                    .insert(key, raw);
                continue;
            };
            let value = raw
                .get("value")
                .cloned()
                .and_then(|v| serde_json::from_value::<SettingValue>(v).ok());
            match value {
                Some(v) if validate(&key, entry, &v).is_ok() => entry.value = v,
                _ => tracing::warn!("ignoring invalid stored value for setting '{}'", key),
            }
        }

        if let Some(unknown) = unknown {
            if let Err(e) = write_json(&self.unknown_path(), &unknown) {
                tracing::warn!("could not save unknown settings: {}", e);
            }
        }
        Ok(settings)
    }

    fn load_unknown(&self) -> BTreeMap<String, serde_json::Value> {
        let path = self.unknown_path();
        match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!("error while loading unknown settings: {}", e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        }
    }

    fn save(&self, settings: &BTreeMap<String, SettingEntry>) -> Result<(), SettingsError> {
        write_json(&self.settings_path(), settings)
    }

    pub fn get(&self, key: &str) -> Result<SettingEntry, SettingsError> {
        self.load()?
            .remove(key)
            .ok_or_else(|| SettingsError::UnknownKey {
                key: key.to_string(),
            })
    }

    /// Set a typed value after checking it against the setting's type.
    pub fn set(&self, key: &str, value: SettingValue) -> Result<(), SettingsError> {
        let mut settings = self.load()?;
        let entry = settings
            .get_mut(key)
            .ok_or_else(|| SettingsError::UnknownKey {
                key: key.to_string(),
            })?;
        validate(key, entry, &value)?;
        entry.value = value;
        self.save(&settings)
    }

    /// Set a value given as text (e.g. from the command line), parsed
    /// according to the setting's type.
    pub fn set_from_str(&self, key: &str, raw: &str) -> Result<SettingValue, SettingsError> {
        let entry = self.get(key)?;
        let value = parse_value(key, &entry, raw)?;
        self.set(key, value.clone())?;
        Ok(value)
    }

    /// Restore one setting to its default; returns the new value.
    pub fn reset_default(&self, key: &str) -> Result<SettingValue, SettingsError> {
        let mut settings = self.load()?;
        let entry = settings
            .get_mut(key)
            .ok_or_else(|| SettingsError::UnknownKey {
                key: key.to_string(),
            })?;
        entry.value = entry.default.clone();
        let value = entry.value.clone();
        self.save(&settings)?;
        Ok(value)
    }

    /// Restore every setting to its default. Refuses unless `confirmed`; the
    /// previous settings are saved to `settings-<unix time>.json` first.
    pub fn reset_all(&self, confirmed: bool) -> Result<ResetOutcome, SettingsError> {
        if !confirmed {
            return Err(SettingsError::NotConfirmed);
        }
        let mut settings = self.load()?;
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let backup_path = self.dir.join(format!("settings-{stamp}.json"));
        write_json(&backup_path, &settings)?;

        for entry in settings.values_mut() {
            entry.value = entry.default.clone();
        }
        self.save(&settings)?;
        tracing::info!("settings reset, previous values saved to {}", backup_path.display());
        Ok(ResetOutcome { backup_path })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SettingsError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| SettingsError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SettingsError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, json).map_err(|e| SettingsError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate(key: &str, entry: &SettingEntry, value: &SettingValue) -> Result<(), SettingsError> {
    let type_ok = matches!(
        (entry.kind, value),
        (SettingType::Bool, SettingValue::Bool(_))
            | (SettingType::Int, SettingValue::Int(_))
            | (SettingType::String, SettingValue::String(_))
            | (SettingType::Enum, SettingValue::String(_))
    );
    if !type_ok {
        return Err(SettingsError::BadType {
            key: key.to_string(),
            expected: entry.kind,
            received: value.type_name().to_string(),
        });
    }
    if let (SettingType::Enum, SettingValue::String(s)) = (entry.kind, value) {
        if !entry.choices.iter().any(|c| c == s) {
            return Err(SettingsError::BadChoice {
                key: key.to_string(),
                value: s.clone(),
                choices: entry.choices.clone(),
            });
        }
    }
    Ok(())
}

fn parse_value(key: &str, entry: &SettingEntry, raw: &str) -> Result<SettingValue, SettingsError> {
    let bad_type = || SettingsError::BadType {
        key: key.to_string(),
        expected: entry.kind,
        received: format!("'{raw}'"),
    };
    let value = match entry.kind {
        SettingType::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => SettingValue::Bool(true),
            "false" | "no" | "off" | "0" => SettingValue::Bool(false),
            _ => return Err(bad_type()),
        },
        SettingType::Int => SettingValue::Int(raw.trim().parse().map_err(|_| bad_type())?),
        SettingType::String | SettingType::Enum => SettingValue::String(raw.to_string()),
    };
    validate(key, entry, &value)?;
    Ok(value)
}

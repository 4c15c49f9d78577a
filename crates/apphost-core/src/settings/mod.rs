//! Typed global settings with defaults, persisted as JSON.
//!
//! Every setting has a type (`bool`, `int`, `string` or `enum`), a default
//! and a description. Only the known keys below are active; keys found in the
//! settings file that the host does not know are moved aside into
//! `settings-unknown.json` so nothing a newer version wrote is lost.

mod entry;
mod error;
mod store;

pub use entry::{defaults, SettingEntry, SettingType, SettingValue};
pub use error::SettingsError;
pub use store::{ResetOutcome, SettingsStore};

/// Upper bound on a single package install, in seconds.
pub const INSTALL_TIMEOUT_SECS: &str = "install.timeout_secs";
/// Keep the copied package directory of a failed install.
pub const INSTALL_KEEP_FAILED: &str = "install.keep_failed";
/// Path used by `install` when none is given.
pub const APPS_DEFAULT_PATH: &str = "apps.default_path";
/// Default log level when `RUST_LOG` is unset.
pub const LOG_LEVEL: &str = "log.level";

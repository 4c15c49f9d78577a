//! Types stored in the app database.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::route_registry::AppId;
use crate::url_model::Route;

/// Everything known about an app at the moment its install succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApp {
    pub id: AppId,
    pub manifest_id: String,
    pub label: Option<String>,
    pub version: Option<String>,
    /// Source location as given by the user (directory or URL).
    pub source: String,
    pub route: Route,
    /// Extra install arguments (everything besides domain and path).
    pub args: BTreeMap<String, String>,
    /// SHA-256 of the package manifest, lowercase hex.
    pub manifest_sha256: Option<String>,
}

/// Installed app as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppRecord {
    pub id: AppId,
    pub manifest_id: String,
    pub label: Option<String>,
    pub version: Option<String>,
    pub source: String,
    pub route: Route,
    pub args: BTreeMap<String, String>,
    pub manifest_sha256: Option<String>,
    /// Unix seconds.
    pub installed_at: i64,
}

impl NewApp {
    /// The record this app has once stored at `installed_at`.
    pub fn to_record(&self, installed_at: i64) -> AppRecord {
        AppRecord {
            id: self.id.clone(),
            manifest_id: self.manifest_id.clone(),
            label: self.label.clone(),
            version: self.version.clone(),
            source: self.source.clone(),
            route: self.route.clone(),
            args: self.args.clone(),
            manifest_sha256: self.manifest_sha256.clone(),
            installed_at,
        }
    }
}

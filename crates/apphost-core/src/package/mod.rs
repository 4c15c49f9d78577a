//! Package installer seam.
//!
//! The install coordinator does not know how an application is materialized;
//! it hands an [`InstallContext`] to a [`PackageInstaller`] and only cares
//! whether that succeeded. [`ScriptInstaller`] is the implementation used by
//! the CLI: it runs the package's own `scripts/install` / `scripts/remove`.

mod error;
mod manifest;
mod script;
mod source;

use std::collections::BTreeMap;
use std::future::Future;

pub use error::PackageError;
pub use manifest::{Manifest, MANIFEST_FILE};
pub use script::ScriptInstaller;
pub use source::AppSource;

use crate::app_db::AppRecord;
use crate::url_model::Route;

/// A package after inspection: its manifest and a fingerprint of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub manifest: Manifest,
    pub manifest_sha256: Option<String>,
}

/// What the installer needs to materialize one app instance.
#[derive(Debug, Clone)]
pub struct InstallContext {
    pub app_id: String,
    pub route: Route,
    pub source: AppSource,
    pub package: Package,
    pub args: BTreeMap<String, String>,
}

/// External collaborator that fetches nothing and decides nothing about
/// routes: it only runs a package's install and remove steps.
pub trait PackageInstaller: Send + Sync + 'static {
    /// Read the package manifest without installing anything.
    fn inspect(
        &self,
        source: &AppSource,
    ) -> impl Future<Output = Result<Package, PackageError>> + Send;

    /// Materialize the app. Dropping the returned future cancels the install.
    fn install(&self, ctx: &InstallContext) -> impl Future<Output = Result<(), PackageError>> + Send;

    /// Tear down an installed app.
    fn remove(&self, app: &AppRecord) -> impl Future<Output = Result<(), PackageError>> + Send;

    /// Undo an install that will not be recorded: it timed out, was
    /// cancelled, or its record could not be saved. Defaults to [`remove`](Self::remove).
    fn rollback(&self, app: &AppRecord) -> impl Future<Output = Result<(), PackageError>> + Send {
        self.remove(app)
    }
}

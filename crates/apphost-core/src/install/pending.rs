//! An install between route reservation and commit.

use std::sync::Arc;

use crate::app_db::{AppDb, AppRecord};
use crate::package::PackageInstaller;
use crate::route_registry::RouteRegistry;

/// Holds the reserved route of an install that has not been committed.
///
/// If dropped while armed (the caller's future was cancelled), a background
/// task rolls the package back, deletes any record written for it and only
/// then releases the route.
pub(super) struct PendingInstall<I: PackageInstaller> {
    registry: Arc<RouteRegistry>,
    installer: Arc<I>,
    db: AppDb,
    record: AppRecord,
    armed: bool,
}

impl<I: PackageInstaller> PendingInstall<I> {
    pub(super) fn new(
        registry: Arc<RouteRegistry>,
        installer: Arc<I>,
        db: AppDb,
        record: AppRecord,
    ) -> Self {
        Self {
            registry,
            installer,
            db,
            record,
            armed: true,
        }
    }

    /// The install is recorded; the route stays bound.
    pub(super) fn commit(mut self) {
        self.armed = false;
        tracing::debug!(app = %self.record.id, route = %self.record.route, "install committed");
    }

    /// Release the route without touching the package (its installer already
    /// cleaned up after reporting the failure).
    pub(super) fn release(mut self) {
        self.armed = false;
        release(&self.registry, &self.record);
    }

    /// Roll the package back, then release the route. Stays armed while the
    /// rollback runs, so cancelling this still cleans up in the background.
    pub(super) async fn roll_back(mut self) {
        if let Err(e) = self.installer.rollback(&self.record).await {
            tracing::warn!(app = %self.record.id, "package rollback failed: {}", e);
        }
        self.armed = false;
        release(&self.registry, &self.record);
    }
}

fn release(registry: &RouteRegistry, record: &AppRecord) {
    if registry.release_if_owned(&record.route, &record.id) {
        tracing::debug!(app = %record.id, route = %record.route, "route released");
    }
}

impl<I: PackageInstaller> Drop for PendingInstall<I> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        let registry = Arc::clone(&self.registry);
        let installer = Arc::clone(&self.installer);
        let db = self.db.clone();
        let record = self.record.clone();
        tracing::warn!(app = %record.id, "install cancelled, rolling back");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = installer.rollback(&record).await {
                        tracing::warn!(app = %record.id, "package rollback failed: {}", e);
                    }
                    if let Err(e) = db.remove_app(&record.id).await {
                        tracing::warn!(app = %record.id, "could not delete app record: {:#}", e);
                    }
                    release(&registry, &record);
                });
            }
            Err(_) => {
                tracing::warn!(app = %record.id, "no runtime for rollback, package left in place");
                release(&registry, &record);
            }
        }
    }
}

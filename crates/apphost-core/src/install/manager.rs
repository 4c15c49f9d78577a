//! `AppManager`: url availability, install and remove.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use super::error::InstallError;
use super::pending::PendingInstall;
use crate::app_db::{AppDb, AppRecord, NewApp};
use crate::domains::DomainDirectory;
use crate::package::{AppSource, InstallContext, PackageInstaller};
use crate::route_registry::{Availability, RouteRegistry};
use crate::url_model::Route;

pub const DEFAULT_INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Coordinates the route registry, the app database and a package installer.
pub struct AppManager<I> {
    registry: Arc<RouteRegistry>,
    db: AppDb,
    installer: Arc<I>,
    install_timeout: Duration,
}

impl<I: PackageInstaller> AppManager<I> {
    pub fn new(registry: Arc<RouteRegistry>, db: AppDb, installer: I) -> Self {
        Self {
            registry,
            db,
            installer: Arc::new(installer),
            install_timeout: DEFAULT_INSTALL_TIMEOUT,
        }
    }

    /// Build a manager whose registry is seeded with the routes of every app
    /// recorded in `db`.
    pub async fn load(
        directory: Arc<dyn DomainDirectory>,
        db: AppDb,
        installer: I,
    ) -> Result<Self> {
        let bindings = db.routes().await?;
        tracing::debug!("loaded {} route binding(s) from app database", bindings.len());
        let registry = Arc::new(RouteRegistry::with_bindings(directory, bindings));
        Ok(Self::new(registry, db, installer))
    }

    pub fn with_install_timeout(mut self, timeout: Duration) -> Self {
        self.install_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn db(&self) -> &AppDb {
        &self.db
    }

    pub fn installer(&self) -> &I {
        &self.installer
    }

    /// Non-binding preview of whether `domain`/`path` is free.
    pub fn url_available(&self, domain: &str, path: &str) -> Result<Availability, InstallError> {
        let route = Route::normalized(domain, path);
        Ok(self.registry.check_available(&route)?)
    }

    /// Install the package at `source` on `domain`/`path`.
    ///
    /// Fails with `UnknownDomain` before anything is reserved, and with
    /// `RouteTaken` if the route is owned, every time it is retried. A failed,
    /// timed out or cancelled package install is rolled back and its route
    /// released; after a cancellation that happens in a background task.
    pub async fn app_install(
        &self,
        source: &AppSource,
        domain: &str,
        path: &str,
        args: BTreeMap<String, String>,
    ) -> Result<AppRecord, InstallError> {
        let route = Route::normalized(domain, path);
        if !self.registry.directory().is_known_domain(&route.domain) {
            return Err(InstallError::UnknownDomain {
                domain: route.domain,
            });
        }

        let package = self.installer.inspect(source).await?;
        let reservation = self
            .registry
            .reserve_instance(&route, &package.manifest.id)?;
        let app_id = reservation.app_id().to_string();
        if !package.manifest.multi_instance && app_id != package.manifest.id {
            return Err(InstallError::AlreadyInstalled {
                app: package.manifest.id,
            });
        }

        tracing::info!(app = %app_id, route = %route, source = %source, "installing app");
        let new_app = NewApp {
            id: app_id.clone(),
            manifest_id: package.manifest.id.clone(),
            label: package.manifest.name.clone(),
            version: package.manifest.version.clone(),
            source: source.to_string(),
            route: route.clone(),
            args: args.clone(),
            manifest_sha256: package.manifest_sha256.clone(),
        };
        let ctx = InstallContext {
            app_id: app_id.clone(),
            route,
            source: source.clone(),
            package,
            args,
        };
        // From here on the pending install owns the route.
        reservation.hand_over();
        let pending = PendingInstall::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.installer),
            self.db.clone(),
            new_app.to_record(0),
        );

        // Bound first so a timed out install future is dropped (and its
        // process killed) before the rollback starts.
        let outcome = tokio::time::timeout(self.install_timeout, self.installer.install(&ctx)).await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                pending.release();
                tracing::warn!(app = %app_id, "install failed, route released: {}", err);
                return Err(InstallError::PackageInstall {
                    app: app_id,
                    source: err,
                });
            }
            Err(_) => {
                tracing::warn!(app = %app_id, "install timed out, rolling back");
                pending.roll_back().await;
                return Err(InstallError::InstallTimedOut {
                    app: app_id,
                    timeout: self.install_timeout,
                });
            }
        }

        let record = match self.db.add_app(&new_app).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(app = %app_id, "could not record install, rolling back: {:#}", e);
                pending.roll_back().await;
                return Err(InstallError::Database(e));
            }
        };
        pending.commit();
        tracing::info!(app = %record.id, route = %record.route, "app installed");
        Ok(record)
    }

    /// Remove an installed app and release its route.
    ///
    /// A failing package remove step is logged and the app is removed anyway,
    /// so a broken remove script cannot pin a route forever.
    pub async fn app_remove(&self, app_id: &str) -> Result<(), InstallError> {
        let app = self
            .db
            .get_app(app_id)
            .await
            .map_err(InstallError::Database)?
            .ok_or_else(|| InstallError::AppNotFound {
                app: app_id.to_string(),
            })?;

        if let Err(e) = self.installer.remove(&app).await {
            tracing::warn!(app = app_id, "remove script failed, removing anyway: {}", e);
        }
        self.db
            .remove_app(app_id)
            .await
            .map_err(InstallError::Database)?;
        self.registry.release_app(app_id);
        tracing::info!(app = app_id, route = %app.route, "app removed");
        Ok(())
    }

    /// Remove `app_id` if it is installed, discarding every error. Returns
    /// whether the app was removed. For cleanup paths that must not fail;
    /// normal flows use [`Self::app_remove`].
    pub async fn app_remove_best_effort(&self, app_id: &str) -> bool {
        match self.app_remove(app_id).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(app = app_id, "best-effort remove ignored: {}", e);
                false
            }
        }
    }

    pub async fn list_apps(&self) -> Result<Vec<AppRecord>, InstallError> {
        self.db.list_apps().await.map_err(InstallError::Database)
    }
}

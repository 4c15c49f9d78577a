//! Errors surfaced by install and remove.

use std::time::Duration;

use thiserror::Error;

use crate::package::PackageError;
use crate::route_registry::{AppId, RegistryError};
use crate::url_model::Route;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("unknown domain '{domain}'")]
    UnknownDomain { domain: String },
    #[error("{route} is already used by app '{owner}'")]
    RouteTaken { route: Route, owner: AppId },
    #[error("app '{app}' is already bound to {route}")]
    AppAlreadyBound { app: AppId, route: Route },
    #[error("app '{app}' is already installed and does not support multiple instances")]
    AlreadyInstalled { app: AppId },
    #[error("app '{app}' is not installed")]
    AppNotFound { app: AppId },
    #[error("missing install argument '{name}'")]
    MissingArgument { name: String },
    /// The package could not be inspected (bad source or manifest).
    #[error(transparent)]
    Package(#[from] PackageError),
    /// The package's install step failed; the route has been released.
    #[error("installing '{app}' failed: {source}")]
    PackageInstall {
        app: AppId,
        #[source]
        source: PackageError,
    },
    #[error("installing '{app}' timed out after {}s", .timeout.as_secs())]
    InstallTimedOut { app: AppId, timeout: Duration },
    #[error("app database: {0:#}")]
    Database(anyhow::Error),
}

impl From<RegistryError> for InstallError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::UnknownDomain { domain } => InstallError::UnknownDomain { domain },
            RegistryError::RouteTaken { route, owner } => InstallError::RouteTaken { route, owner },
            RegistryError::AppAlreadyBound { app, route } => {
                InstallError::AppAlreadyBound { app, route }
            }
        }
    }
}

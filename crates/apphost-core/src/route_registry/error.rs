//! Registry error type.

use thiserror::Error;

use super::AppId;
use crate::url_model::Route;

/// Why a route lookup or reservation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The domain is not served by this host. Distinct from a taken path.
    #[error("unknown domain '{domain}'")]
    UnknownDomain { domain: String },
    /// Another application (or an earlier instance of this one) owns the route.
    #[error("{route} is already used by app '{owner}'")]
    RouteTaken { route: Route, owner: AppId },
    /// The application already owns a different route.
    #[error("app '{app}' is already bound to {route}")]
    AppAlreadyBound { app: AppId, route: Route },
}

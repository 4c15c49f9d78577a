//! Install coordinator: the only place that turns a route into an app.
//!
//! Install runs normalize → validate domain → reserve → package install →
//! persist → commit. The route reservation is the authoritative claim; an
//! earlier [`AppManager::url_available`] answer is only a preview and may be
//! stale by the time install runs. Any failure after the reservation,
//! including a timeout or a dropped install future, rolls the package back
//! and then releases the route. The route stays claimed until the rollback
//! has finished, so a new install cannot reuse the id while the old package
//! is still being torn down.

mod args;
mod error;
mod manager;
mod pending;

pub use args::{parse_install_args, InstallArgs};
pub use error::InstallError;
pub use manager::{AppManager, DEFAULT_INSTALL_TIMEOUT};

#[cfg(test)]
mod tests;

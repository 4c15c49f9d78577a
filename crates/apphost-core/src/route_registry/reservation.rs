//! RAII guard that releases a reserved route unless committed.

use super::state::RouteRegistry;
use super::AppId;
use crate::url_model::Route;

/// A route claimed for an application whose install has not finished yet.
///
/// Dropping the guard without [`commit`](Reservation::commit) releases the
/// route. This covers error returns, timeouts, and install futures that are
/// dropped mid-flight. The release runs at most once per guard and only
/// removes the binding if it still belongs to this application.
#[must_use = "dropping a reservation releases the route"]
#[derive(Debug)]
pub struct Reservation<'a> {
    registry: &'a RouteRegistry,
    route: Route,
    app_id: AppId,
    armed: bool,
}

impl<'a> Reservation<'a> {
    pub(super) fn new(registry: &'a RouteRegistry, route: Route, app_id: AppId) -> Self {
        Self {
            registry,
            route,
            app_id,
            armed: true,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Keep the binding: the application now owns the route until removed.
    pub fn commit(mut self) {
        self.armed = false;
        tracing::debug!(app = %self.app_id, route = %self.route, "route reservation committed");
    }

    /// Stop guarding the route without releasing it. The caller takes over
    /// and must release the binding itself once it is done with the route.
    pub(crate) fn hand_over(mut self) {
        self.armed = false;
    }

    /// Release the route now instead of waiting for drop.
    pub fn rollback(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        if self.registry.release_if_owned(&self.route, &self.app_id) {
            tracing::debug!(app = %self.app_id, route = %self.route, "route reservation rolled back");
        }
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.release_once();
    }
}

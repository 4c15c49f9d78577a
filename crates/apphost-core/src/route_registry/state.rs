//! In-memory route map and the atomic check-and-claim section.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use super::error::RegistryError;
use super::instance::lowest_free_instance;
use super::reservation::Reservation;
use super::AppId;
use crate::domains::DomainDirectory;
use crate::url_model::Route;

/// Result of a non-binding availability preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub available: bool,
    /// Current owner when the route is taken.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<AppId>,
}

/// Mapping of route → owning application.
///
/// Invariants: a route has at most one owner, and an application owns at most
/// one route.
pub struct RouteRegistry {
    directory: Arc<dyn DomainDirectory>,
    routes: Mutex<HashMap<Route, AppId>>,
}

impl fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRegistry")
            .field("routes", &self.lock().len())
            .finish()
    }
}

impl RouteRegistry {
    /// Empty registry over the given domain directory.
    pub fn new(directory: Arc<dyn DomainDirectory>) -> Self {
        Self {
            directory,
            routes: Mutex::new(HashMap::new()),
        }
    }

    /// Registry seeded with existing bindings (e.g. installed apps loaded from
    /// the app database). Conflicting entries keep the first binding seen.
    pub fn with_bindings<I>(directory: Arc<dyn DomainDirectory>, bindings: I) -> Self
    where
        I: IntoIterator<Item = (Route, AppId)>,
    {
        let registry = Self::new(directory);
        {
            let mut routes = registry.lock();
            for (route, app) in bindings {
                if let Err(e) = claim(&mut routes, &route, &app) {
                    tracing::warn!("ignoring stored binding {} -> {}: {}", route, app, e);
                }
            }
        }
        registry
    }

    pub fn directory(&self) -> &dyn DomainDirectory {
        self.directory.as_ref()
    }

    // Each critical section is a single map insert/remove, so the map is
    // consistent even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, HashMap<Route, AppId>> {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_known(&self, domain: &str) -> Result<(), RegistryError> {
        if self.directory.is_known_domain(domain) {
            Ok(())
        } else {
            Err(RegistryError::UnknownDomain {
                domain: domain.to_string(),
            })
        }
    }

    /// Preview whether `route` is free. Fails with `UnknownDomain` rather than
    /// reporting an unknown domain as unavailable.
    pub fn check_available(&self, route: &Route) -> Result<Availability, RegistryError> {
        self.ensure_known(&route.domain)?;
        let owner = self.lock().get(route).cloned();
        Ok(Availability {
            available: owner.is_none(),
            owner,
        })
    }

    /// Atomically claim `route` for `app_id`.
    pub fn reserve(&self, route: &Route, app_id: &str) -> Result<Reservation<'_>, RegistryError> {
        self.ensure_known(&route.domain)?;
        claim(&mut self.lock(), route, app_id)?;
        tracing::debug!(app = app_id, route = %route, "route reserved");
        Ok(Reservation::new(self, route.clone(), app_id.to_string()))
    }

    /// Atomically claim `route` for the lowest free instance id of `base_id`.
    pub fn reserve_instance(
        &self,
        route: &Route,
        base_id: &str,
    ) -> Result<Reservation<'_>, RegistryError> {
        self.ensure_known(&route.domain)?;
        let app_id = {
            let mut routes = self.lock();
            if let Some(owner) = routes.get(route) {
                return Err(RegistryError::RouteTaken {
                    route: route.clone(),
                    owner: owner.clone(),
                });
            }
            let app_id = lowest_free_instance(base_id, |c| routes.values().any(|a| a == c));
            claim(&mut routes, route, &app_id)?;
            app_id
        };
        tracing::debug!(app = %app_id, route = %route, "route reserved");
        Ok(Reservation::new(self, route.clone(), app_id))
    }

    /// Remove the binding for `route`. Idempotent; returns the previous owner.
    pub fn release(&self, route: &Route) -> Option<AppId> {
        let prev = self.lock().remove(route);
        if let Some(app) = &prev {
            tracing::debug!(app = %app, route = %route, "route released");
        }
        prev
    }

    /// Remove the binding only if `app_id` still owns `route`.
    pub(crate) fn release_if_owned(&self, route: &Route, app_id: &str) -> bool {
        let mut routes = self.lock();
        if routes.get(route).is_some_and(|owner| owner == app_id) {
            routes.remove(route);
            true
        } else {
            false
        }
    }

    /// Remove whatever route `app_id` owns. Idempotent.
    pub fn release_app(&self, app_id: &str) -> Option<Route> {
        let mut routes = self.lock();
        let route = routes
            .iter()
            .find(|(_, owner)| owner.as_str() == app_id)
            .map(|(route, _)| route.clone())?;
        routes.remove(&route);
        tracing::debug!(app = app_id, route = %route, "route released");
        Some(route)
    }

    pub fn owner(&self, route: &Route) -> Option<AppId> {
        self.lock().get(route).cloned()
    }

    pub fn route_of(&self, app_id: &str) -> Option<Route> {
        self.lock()
            .iter()
            .find(|(_, owner)| owner.as_str() == app_id)
            .map(|(route, _)| route.clone())
    }

    /// Sorted snapshot of all bindings.
    pub fn bindings(&self) -> Vec<(Route, AppId)> {
        let mut all: Vec<_> = self
            .lock()
            .iter()
            .map(|(r, a)| (r.clone(), a.clone()))
            .collect();
        all.sort();
        all
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Check-and-insert under the caller's lock.
fn claim(
    routes: &mut HashMap<Route, AppId>,
    route: &Route,
    app_id: &str,
) -> Result<(), RegistryError> {
    if let Some(owner) = routes.get(route) {
        return Err(RegistryError::RouteTaken {
            route: route.clone(),
            owner: owner.clone(),
        });
    }
    if let Some((bound, _)) = routes.iter().find(|(_, owner)| owner.as_str() == app_id) {
        return Err(RegistryError::AppAlreadyBound {
            app: app_id.to_string(),
            route: bound.clone(),
        });
    }
    routes.insert(route.clone(), app_id.to_string());
    Ok(())
}

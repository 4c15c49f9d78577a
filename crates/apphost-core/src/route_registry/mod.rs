//! Route registry: which application owns which `(domain, path)`.
//!
//! The registry is an explicit object built with a [`DomainDirectory`] and,
//! at startup, seeded with the bindings of already installed apps. A single
//! mutex guards the map so that checking a route and claiming it happen in one
//! critical section; the lock is never held across an `.await`.
//!
//! [`RouteRegistry::check_available`] is a non-binding preview. Two callers can
//! both see a route as available; only [`RouteRegistry::reserve`] (and
//! [`RouteRegistry::reserve_instance`]) decide who gets it.
//!
//! [`DomainDirectory`]: crate::domains::DomainDirectory

mod error;
mod instance;
mod reservation;
mod state;

pub use error::RegistryError;
pub use instance::{base_app_id, instance_app_id};
pub use reservation::Reservation;
pub use state::{Availability, RouteRegistry};

/// Application identifier, e.g. `wiki` or `wiki__2`.
pub type AppId = String;

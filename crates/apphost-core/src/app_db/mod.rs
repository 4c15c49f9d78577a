//! Persistent record of installed applications (SQLite via sqlx).
//!
//! One row per installed app: where it came from, which route it owns, the
//! arguments it was installed with, and a fingerprint of its manifest. The
//! `(domain, path)` pair is UNIQUE at the schema level as well, so a durable
//! record can never duplicate a route even if the in-memory registry is
//! bypassed.

mod apps;
mod db;
mod types;

pub use db::AppDb;
pub use types::{AppRecord, NewApp};

#[cfg(test)]
pub(crate) use db::open_memory;

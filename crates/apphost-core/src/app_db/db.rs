//! SQLite-backed app database: connection, migrations, timestamp helper.
//!
//! App CRUD lives in `apps`.

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the SQLite-backed app database.
///
/// The CLI keeps the database file under the state directory:
/// `~/.local/state/apphost/apps.db` on Debian.
#[derive(Clone)]
pub struct AppDb {
    pub(crate) pool: Pool<Sqlite>,
}

impl AppDb {
    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&uri)
            .await?;
        let db = AppDb { pool };
        db.migrate().await?;
        tracing::debug!(path = %path.display(), "app database opened");
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        // - `args_json` holds the extra install arguments as a JSON object.
        // - UNIQUE(domain, path) mirrors the registry invariant on disk.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS apps (
                id TEXT PRIMARY KEY NOT NULL,
                manifest_id TEXT NOT NULL,
                label TEXT,
                version TEXT,
                source TEXT NOT NULL,
                domain TEXT NOT NULL,
                path TEXT NOT NULL,
                args_json TEXT,
                manifest_sha256 TEXT,
                installed_at INTEGER NOT NULL,
                UNIQUE (domain, path)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Current time as Unix seconds (for DB timestamps).
pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
/// Open an in-memory database for tests (no disk I/O).
pub(crate) async fn open_memory() -> Result<AppDb> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    let db = AppDb { pool };
    db.migrate().await?;
    Ok(db)
}

//! App read/write operations.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::db::{unix_timestamp, AppDb};
use super::types::{AppRecord, NewApp};
use crate::route_registry::AppId;
use crate::url_model::Route;

fn record_from_row(row: &SqliteRow) -> Result<AppRecord> {
    let id: String = row.get("id");
    let args_json: Option<String> = row.get("args_json");
    let args = match args_json.as_deref().filter(|s| !s.is_empty()) {
        Some(s) => serde_json::from_str::<BTreeMap<String, String>>(s)
            .with_context(|| format!("parse args of app {id}"))?,
        None => BTreeMap::new(),
    };
    Ok(AppRecord {
        manifest_id: row.get("manifest_id"),
        label: row.get("label"),
        version: row.get("version"),
        source: row.get("source"),
        route: Route {
            domain: row.get("domain"),
            path: row.get("path"),
        },
        args,
        manifest_sha256: row.get("manifest_sha256"),
        installed_at: row.get("installed_at"),
        id,
    })
}

impl AppDb {
    /// Record a freshly installed app. Fails if the id or the route is
    /// already stored.
    pub async fn add_app(&self, app: &NewApp) -> Result<AppRecord> {
        let now = unix_timestamp();
        let args_json = serde_json::to_string(&app.args)?;

        sqlx::query(
            r#"
            INSERT INTO apps (
                id, manifest_id, label, version, source,
                domain, path, args_json, manifest_sha256, installed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&app.id)
        .bind(&app.manifest_id)
        .bind(&app.label)
        .bind(&app.version)
        .bind(&app.source)
        .bind(&app.route.domain)
        .bind(&app.route.path)
        .bind(args_json)
        .bind(&app.manifest_sha256)
        .bind(now)
        .execute(&self.pool)
        .await
        .with_context(|| format!("insert app {}", app.id))?;

        Ok(app.to_record(now))
    }

    /// Fetch one app by id.
    pub async fn get_app(&self, id: &str) -> Result<Option<AppRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, manifest_id, label, version, source, domain, path,
                   args_json, manifest_sha256, installed_at
            FROM apps
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    /// All installed apps, ordered by route.
    pub async fn list_apps(&self) -> Result<Vec<AppRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, manifest_id, label, version, source, domain, path,
                   args_json, manifest_sha256, installed_at
            FROM apps
            ORDER BY domain ASC, path ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(record_from_row).collect()
    }

    /// Route bindings of all installed apps, used to seed the route registry.
    pub async fn routes(&self) -> Result<Vec<(Route, AppId)>> {
        let rows = sqlx::query(r#"SELECT id, domain, path FROM apps"#)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    Route {
                        domain: row.get("domain"),
                        path: row.get("path"),
                    },
                    row.get("id"),
                )
            })
            .collect())
    }

    /// Ids of installed instances of a manifest id.
    pub async fn instances_of(&self, manifest_id: &str) -> Result<Vec<AppId>> {
        let rows = sqlx::query(r#"SELECT id FROM apps WHERE manifest_id = ?1 ORDER BY id ASC"#)
            .bind(manifest_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|row| row.get("id")).collect())
    }

    /// Delete an app record. Returns whether a row was removed.
    pub async fn remove_app(&self, id: &str) -> Result<bool> {
        let res = sqlx::query(r#"DELETE FROM apps WHERE id = ?1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

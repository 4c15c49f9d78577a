//! Installer that runs a package's own shell scripts.
//!
//! Layout of a package directory:
//!
//! ```text
//! manifest.json
//! scripts/install
//! scripts/remove     (optional)
//! ```
//!
//! On install the package is copied to `<apps_dir>/<app_id>/` and
//! `scripts/install` runs from that copy, so `scripts/remove` is still
//! available after the original source is gone.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use super::error::PackageError;
use super::manifest::{Manifest, MANIFEST_FILE};
use super::source::AppSource;
use super::{InstallContext, Package, PackageInstaller};
use crate::app_db::AppRecord;
use crate::checksum;

const INSTALL_SCRIPT: &str = "scripts/install";
const REMOVE_SCRIPT: &str = "scripts/remove";

/// Runs `scripts/install` / `scripts/remove` with the app's route and
/// arguments in the environment.
#[derive(Debug, Clone)]
pub struct ScriptInstaller {
    apps_dir: PathBuf,
    keep_failed: bool,
}

impl ScriptInstaller {
    /// `apps_dir` holds one directory per installed app.
    pub fn new(apps_dir: impl Into<PathBuf>) -> Self {
        Self {
            apps_dir: apps_dir.into(),
            keep_failed: false,
        }
    }

    /// Keep the copied package directory of a failed install for inspection.
    pub fn keep_failed(mut self, keep: bool) -> Self {
        self.keep_failed = keep;
        self
    }

    pub fn app_dir(&self, app_id: &str) -> PathBuf {
        self.apps_dir.join(app_id)
    }

    fn local_dir<'a>(source: &'a AppSource) -> Result<&'a Path, PackageError> {
        source
            .local_dir()
            .ok_or_else(|| PackageError::UnsupportedSource {
                location: source.to_string(),
            })
    }

    async fn copy_package(&self, from: &Path, to: &Path) -> Result<(), PackageError> {
        let (from, to) = (from.to_path_buf(), to.to_path_buf());
        let context = format!("copy {} to {}", from.display(), to.display());
        tokio::task::spawn_blocking(move || {
            if to.exists() {
                std::fs::remove_dir_all(&to)?;
            }
            copy_dir(&from, &to)
        })
        .await
        .map_err(|e| PackageError::io(context.clone(), std::io::Error::other(e)))?
        .map_err(|e| PackageError::io(context, e))
    }

    async fn discard_app_dir(&self, dir: &Path) {
        match tokio::fs::remove_dir_all(dir).await {
            Ok(()) => tracing::debug!(path = %dir.display(), "removed app directory"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %dir.display(), "could not remove app directory: {}", e),
        }
    }

    async fn run_remove_script(&self, app: &AppRecord, app_dir: &Path) -> Result<(), PackageError> {
        if !app_dir.join(REMOVE_SCRIPT).is_file() {
            tracing::debug!(app = %app.id, "no remove script, nothing to run");
            return Ok(());
        }
        let mut cmd = script_command(app_dir, REMOVE_SCRIPT);
        cmd.env("APP_ID", &app.id)
            .env("APP_MANIFEST_ID", &app.manifest_id)
            .env("APP_DOMAIN", &app.route.domain)
            .env("APP_PATH", &app.route.path);
        run_script(cmd, REMOVE_SCRIPT).await
    }
}

/// Deletes the package copy of an unfinished install when dropped, including
/// when the install future itself is dropped (timeout or cancellation).
struct DiscardOnDrop {
    dir: PathBuf,
    armed: bool,
}

impl Drop for DiscardOnDrop {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => tracing::debug!(path = %self.dir.display(), "discarded unfinished install"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.dir.display(), "could not discard unfinished install: {}", e),
        }
    }
}

impl PackageInstaller for ScriptInstaller {
    async fn inspect(&self, source: &AppSource) -> Result<Package, PackageError> {
        let dir = Self::local_dir(source)?;
        let path = dir.join(MANIFEST_FILE);
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PackageError::ManifestMissing { path });
            }
            Err(e) => return Err(PackageError::io(format!("read {}", path.display()), e)),
        };
        let manifest = Manifest::parse(&data, &path)?;
        Ok(Package {
            manifest,
            manifest_sha256: Some(checksum::sha256_hex(data.as_bytes())),
        })
    }

    async fn install(&self, ctx: &InstallContext) -> Result<(), PackageError> {
        let src = Self::local_dir(&ctx.source)?;
        let app_dir = self.app_dir(&ctx.app_id);
        let mut copy = DiscardOnDrop {
            dir: app_dir.clone(),
            armed: !self.keep_failed,
        };
        self.copy_package(src, &app_dir).await?;

        let mut cmd = script_command(&app_dir, INSTALL_SCRIPT);
        cmd.env("APP_ID", &ctx.app_id)
            .env("APP_MANIFEST_ID", &ctx.package.manifest.id)
            .env("APP_DOMAIN", &ctx.route.domain)
            .env("APP_PATH", &ctx.route.path);
        for (key, value) in &ctx.args {
            cmd.env(arg_env_name(key), value);
        }

        let result = run_script(cmd, INSTALL_SCRIPT).await;
        if result.is_ok() {
            copy.armed = false;
        }
        result
    }

    async fn remove(&self, app: &AppRecord) -> Result<(), PackageError> {
        let app_dir = self.app_dir(&app.id);
        let result = self.run_remove_script(app, &app_dir).await;
        self.discard_app_dir(&app_dir).await;
        result
    }

    /// Like `remove`, but the copy is kept when `keep_failed` is set.
    async fn rollback(&self, app: &AppRecord) -> Result<(), PackageError> {
        let app_dir = self.app_dir(&app.id);
        let result = self.run_remove_script(app, &app_dir).await;
        if !self.keep_failed {
            self.discard_app_dir(&app_dir).await;
        }
        result
    }
}

fn script_command(app_dir: &Path, script: &str) -> Command {
    let mut cmd = Command::new(app_dir.join(script));
    cmd.current_dir(app_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

async fn run_script(mut cmd: Command, script: &str) -> Result<(), PackageError> {
    tracing::info!(script, "running package script");
    let output = cmd
        .output()
        .await
        .map_err(|e| PackageError::io(format!("spawn {script}"), e))?;
    for line in String::from_utf8_lossy(&output.stdout).lines() {
        tracing::debug!(script, "{}", line);
    }
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    if output.status.success() {
        Ok(())
    } else {
        Err(PackageError::ScriptFailed {
            script: script.to_string(),
            code: output.status.code(),
            stderr,
        })
    }
}

/// `admin-user` → `APP_ARG_ADMIN_USER`.
fn arg_env_name(key: &str) -> String {
    let key: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("APP_ARG_{key}")
}

fn copy_dir(from: &Path, to: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(to)?;
    for entry in std::fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

//! `apphost remove <app>` – uninstall an app; `--best-effort` ignores errors.

use anyhow::Result;
use apphost_core::install::AppManager;
use apphost_core::package::PackageInstaller;

/// Message for a best-effort remove, which never fails.
pub(crate) fn best_effort_message(app: &str, removed: bool) -> String {
    if removed {
        format!("Removed {app}")
    } else {
        format!("{app} was not removed (not installed or removal failed)")
    }
}

pub async fn run_remove<I: PackageInstaller>(
    manager: &AppManager<I>,
    app: &str,
    best_effort: bool,
) -> Result<()> {
    if best_effort {
        let removed = manager.app_remove_best_effort(app).await;
        println!("{}", best_effort_message(app, removed));
    } else {
        manager.app_remove(app).await?;
        println!("Removed {app}");
    }
    Ok(())
}

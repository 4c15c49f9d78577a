//! `apphost list` – show installed apps.

use anyhow::Result;
use apphost_core::install::AppManager;
use apphost_core::package::PackageInstaller;

pub async fn run_list<I: PackageInstaller>(manager: &AppManager<I>, json: bool) -> Result<()> {
    let apps = manager.list_apps().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&apps)?);
    } else if apps.is_empty() {
        println!("No apps installed.");
    } else {
        println!("{:<20} {:<10} {:<32} {}", "ID", "VERSION", "ROUTE", "SOURCE");
        for app in apps {
            println!(
                "{:<20} {:<10} {:<32} {}",
                app.id,
                app.version.as_deref().unwrap_or("-"),
                app.route.to_string(),
                app.source
            );
        }
    }
    Ok(())
}

//! `apphost url-available <domain> <path>` – preview whether a route is free.

use anyhow::Result;
use apphost_core::install::AppManager;
use apphost_core::package::PackageInstaller;
use apphost_core::url_model::Route;

/// Prints availability; an unknown domain is an error.
pub fn run_url_available<I: PackageInstaller>(
    manager: &AppManager<I>,
    domain: &str,
    path: &str,
    json: bool,
) -> Result<()> {
    let availability = manager.url_available(domain, path)?;
    if json {
        println!("{}", serde_json::to_string(&availability)?);
        return Ok(());
    }
    let route = Route::normalized(domain, path);
    match &availability.owner {
        None => println!("{route} is available"),
        Some(owner) => println!("{route} is taken by {owner}"),
    }
    Ok(())
}

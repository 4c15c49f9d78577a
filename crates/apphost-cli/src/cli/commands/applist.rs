//! `apphost applist ...` – register, remove and list app lists.

use anyhow::Result;
use apphost_core::app_lists::AppListRegistry;

use crate::cli::AppListCommand;

pub fn run_applist(registry: &AppListRegistry, command: AppListCommand) -> Result<()> {
    match command {
        AppListCommand::Add { name, url } => {
            let url = registry.add(&name, &url)?;
            println!("App list '{name}' added ({url})");
        }
        AppListCommand::Remove { name } => {
            registry.remove(&name)?;
            println!("App list '{name}' removed");
        }
        AppListCommand::List { json } => {
            let lists = registry.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&lists)?);
            } else if lists.is_empty() {
                println!("No app lists registered.");
            } else {
                for (name, list) in &lists {
                    println!("{:<20} {}", name, list.url);
                }
            }
        }
    }
    Ok(())
}

//! `apphost settings ...` – list, read and change global settings.

use anyhow::Result;
use apphost_core::settings::{SettingEntry, SettingsError, SettingsStore};

use crate::cli::SettingsCommand;

fn describe(key: &str, entry: &SettingEntry) -> String {
    let mut out = format!(
        "{key} = {} ({}, default {})",
        entry.value, entry.kind, entry.default
    );
    if !entry.choices.is_empty() {
        out.push_str(&format!(" [{}]", entry.choices.join("|")));
    }
    out
}

pub fn run_settings(store: &SettingsStore, command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::List => {
            for (key, entry) in store.load()? {
                println!("{:<24} {:<10} {}", key, entry.value.to_string(), entry.description);
            }
        }
        SettingsCommand::Get { key } => {
            let entry = store.get(&key)?;
            println!("{}", describe(&key, &entry));
        }
        SettingsCommand::Set { key, value } => {
            let value = store.set_from_str(&key, &value)?;
            println!("{key} = {value}");
        }
        SettingsCommand::Default { key } => {
            let value = store.reset_default(&key)?;
            println!("{key} = {value}");
        }
        SettingsCommand::Reset { yes } => match store.reset_all(yes) {
            Ok(outcome) => println!(
                "Settings reset; previous values saved to {}",
                outcome.backup_path.display()
            ),
            Err(SettingsError::NotConfirmed) => {
                anyhow::bail!("resetting all settings needs confirmation, pass --yes")
            }
            Err(e) => return Err(e.into()),
        },
    }
    Ok(())
}

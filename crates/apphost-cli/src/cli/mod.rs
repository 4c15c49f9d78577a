//! CLI for apphost: URL availability, app install/remove, app lists, settings.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use apphost_core::app_db::AppDb;
use apphost_core::app_lists::AppListRegistry;
use apphost_core::config::{self, ApphostConfig};
use apphost_core::domains::{DomainDirectory, StaticDomains};
use apphost_core::install::AppManager;
use apphost_core::package::ScriptInstaller;
use apphost_core::settings::{self, SettingsStore};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use commands::{
    run_applist, run_completions, run_domains, run_install, run_list, run_man, run_remove,
    run_settings, run_url_available,
};

/// Top-level CLI for apphost.
#[derive(Debug, Parser)]
#[command(name = "apphost", version)]
#[command(about = "apphost: install web applications on domain/path routes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Check whether a domain/path route is free.
    UrlAvailable {
        /// Domain, with or without scheme (e.g. https://example.org/).
        domain: String,
        /// Path on the domain (e.g. /wiki).
        path: String,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Install an application package from a local directory.
    Install {
        /// Package directory containing manifest.json.
        source: String,

        /// Domain to install on (default: the main domain).
        #[arg(long)]
        domain: Option<String>,

        /// Path to install on (default: the apps.default_path setting).
        #[arg(long)]
        path: Option<String>,

        /// Install arguments as a query string, e.g. "domain=example.org&path=/wiki&admin=alice".
        #[arg(long, value_name = "ARGS")]
        args: Option<String>,
    },

    /// Remove an installed application and free its route.
    Remove {
        /// Application id (e.g. wiki or wiki__2).
        app: String,

        /// Ignore every error (for cleanup scripts).
        #[arg(long)]
        best_effort: bool,
    },

    /// List installed applications.
    List {
        /// Print the apps as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the domains served by this host.
    Domains,

    /// Register, remove or list app lists.
    Applist {
        #[command(subcommand)]
        command: AppListCommand,
    },

    /// Show or change global settings.
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },

    /// Print a shell completion script.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page.
    Man,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// List all settings with their values.
    List,
    /// Show one setting.
    Get { key: String },
    /// Change one setting.
    Set {
        key: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Restore one setting to its default.
    Default { key: String },
    /// Restore every setting to its default (a backup is written first).
    Reset {
        /// Confirm the reset.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum AppListCommand {
    /// Register an app list URL under a name.
    Add { name: String, url: String },
    /// Unregister an app list.
    Remove { name: String },
    /// List registered app lists.
    List {
        /// Print the lists as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Loaded configuration plus the stores derived from it.
pub(crate) struct Context {
    pub cfg: ApphostConfig,
    pub state_dir: PathBuf,
    pub settings: SettingsStore,
}

impl Context {
    fn load() -> Result<Self> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let state_dir = cfg.state_dir()?;
        let settings = SettingsStore::new(&state_dir);
        Ok(Self {
            cfg,
            state_dir,
            settings,
        })
    }

    pub fn app_lists(&self) -> AppListRegistry {
        AppListRegistry::new(&self.state_dir)
    }

    pub fn domains(&self) -> StaticDomains {
        StaticDomains::from_config(&self.cfg)
    }

    /// App manager over `<state>/apps.db` and script packages under `<state>/apps/`.
    pub async fn manager(&self) -> Result<AppManager<ScriptInstaller>> {
        let db = AppDb::open_at(self.state_dir.join("apps.db")).await?;
        let keep_failed = self
            .settings
            .get(settings::INSTALL_KEEP_FAILED)?
            .value
            .as_bool()
            .unwrap_or(false);
        let installer = ScriptInstaller::new(self.state_dir.join("apps")).keep_failed(keep_failed);
        let directory: Arc<dyn DomainDirectory> = Arc::new(self.domains());
        let manager = AppManager::load(directory, db, installer)
            .await
            .context("loading installed apps")?;
        Ok(manager.with_install_timeout(self.install_timeout()?))
    }

    fn install_timeout(&self) -> Result<Duration> {
        let entry = self.settings.get(settings::INSTALL_TIMEOUT_SECS)?;
        Ok(install_timeout(&self.cfg, entry.value.as_int(), entry.default.as_int()))
    }
}

/// The `install.timeout_secs` setting when changed from its default, else the config value.
pub(crate) fn install_timeout(
    cfg: &ApphostConfig,
    setting: Option<i64>,
    setting_default: Option<i64>,
) -> Duration {
    let secs = match setting {
        Some(v) if v > 0 && setting != setting_default => v as u64,
        _ => cfg.install_timeout_secs,
    };
    Duration::from_secs(secs.max(1))
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
            CliCommand::Domains => run_domains(&Context::load()?.domains()),
            CliCommand::Applist { command } => {
                run_applist(&Context::load()?.app_lists(), command)?
            }
            CliCommand::Settings { command } => run_settings(&Context::load()?.settings, command)?,
            CliCommand::UrlAvailable { domain, path, json } => {
                let ctx = Context::load()?;
                run_url_available(&ctx.manager().await?, &domain, &path, json)?;
            }
            CliCommand::Install {
                source,
                domain,
                path,
                args,
            } => {
                let ctx = Context::load()?;
                let manager = ctx.manager().await?;
                run_install(&ctx, &manager, &source, domain, path, args.as_deref()).await?;
            }
            CliCommand::Remove { app, best_effort } => {
                let ctx = Context::load()?;
                run_remove(&ctx.manager().await?, &app, best_effort).await?;
            }
            CliCommand::List { json } => {
                let ctx = Context::load()?;
                run_list(&ctx.manager().await?, json).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/apphost/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApphostConfig {
    /// Primary domain of the host.
    pub main_domain: String,
    /// Additional domains served by this host (the main domain is always included).
    #[serde(default)]
    pub domains: Vec<String>,
    /// Upper bound on a single package install, in seconds.
    pub install_timeout_secs: u64,
    /// Optional override for the state directory (DB, settings, package copies).
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
}

impl Default for ApphostConfig {
    fn default() -> Self {
        Self {
            main_domain: "localhost".to_string(),
            domains: Vec::new(),
            install_timeout_secs: 600,
            state_dir: None,
        }
    }
}

impl ApphostConfig {
    /// State directory: the configured override, or `~/.local/state/apphost`.
    pub fn state_dir(&self) -> Result<PathBuf> {
        match &self.state_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_state_dir(),
        }
    }
}

/// `~/.local/state/apphost` on Debian.
pub fn default_state_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("apphost")?;
    Ok(xdg_dirs.get_state_home().join("apphost"))
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("apphost")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ApphostConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ApphostConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ApphostConfig = toml::from_str(&data)?;
    Ok(cfg)
}

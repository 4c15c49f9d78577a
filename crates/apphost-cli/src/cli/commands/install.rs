//! `apphost install <source>` – install a package on a domain/path route.

use anyhow::Result;
use apphost_core::domains::DomainDirectory;
use apphost_core::install::{parse_install_args, AppManager, InstallArgs};
use apphost_core::package::{AppSource, PackageInstaller};
use apphost_core::settings;

use crate::cli::Context;

/// Merge `--args` with the explicit flags (flags win), then fill a missing
/// domain with the main domain and a missing path with `default_path`.
pub(crate) fn resolve_install_args(
    args: Option<&str>,
    domain: Option<String>,
    path: Option<String>,
    main_domain: Option<&str>,
    default_path: Option<&str>,
) -> InstallArgs {
    let mut parsed = args.map(parse_install_args).unwrap_or_default();
    if domain.is_some() {
        parsed.domain = domain;
    }
    if path.is_some() {
        parsed.path = path;
    }
    if parsed.domain.is_none() {
        parsed.domain = main_domain.map(str::to_string);
    }
    if parsed.path.is_none() {
        parsed.path = default_path.map(str::to_string);
    }
    parsed
}

pub(crate) async fn run_install<I: PackageInstaller>(
    ctx: &Context,
    manager: &AppManager<I>,
    source: &str,
    domain: Option<String>,
    path: Option<String>,
    args: Option<&str>,
) -> Result<()> {
    let default_path = ctx.settings.get(settings::APPS_DEFAULT_PATH)?.value;
    let domains = ctx.domains();
    let parsed = resolve_install_args(
        args,
        domain,
        path,
        domains.main_domain(),
        default_path.as_str(),
    );
    let (domain, path) = parsed.route_parts()?;

    let source = AppSource::parse(source);
    let record = manager
        .app_install(&source, domain, path, parsed.extra.clone())
        .await?;
    println!("Installed {} at {}", record.id, record.route);
    Ok(())
}

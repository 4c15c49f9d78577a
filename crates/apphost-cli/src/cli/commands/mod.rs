//! CLI command handlers, one file per command.

mod applist;
mod completions;
mod domains;
mod install;
mod list;
mod remove;
mod settings;
mod url_available;

pub use applist::run_applist;
pub use completions::{run_completions, run_man};
pub use domains::run_domains;
pub(crate) use install::{resolve_install_args, run_install};
pub use list::run_list;
pub use remove::run_remove;
pub(crate) use remove::best_effort_message;
pub use settings::run_settings;
pub use url_available::run_url_available;

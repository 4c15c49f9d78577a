//! Package installer error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackageError {
    /// Only local package directories are supported; fetching is out of scope.
    #[error("unsupported package source '{location}': only local directories are supported")]
    UnsupportedSource { location: String },
    #[error("no manifest found at {}", .path.display())]
    ManifestMissing { path: PathBuf },
    #[error("invalid manifest {}: {reason}", .path.display())]
    InvalidManifest { path: PathBuf, reason: String },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("script {script} failed (exit code {}){}", fmt_code(.code), fmt_stderr(.stderr))]
    ScriptFailed {
        script: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl PackageError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        PackageError::Io {
            context: context.into(),
            source,
        }
    }
}

fn fmt_code(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "none, killed by signal".to_string())
}

fn fmt_stderr(stderr: &str) -> String {
    let tail = stderr.trim();
    if tail.is_empty() {
        String::new()
    } else {
        format!(": {tail}")
    }
}

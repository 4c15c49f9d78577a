//! Where a package comes from.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

/// Package location as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppSource {
    /// Directory containing `manifest.json` and `scripts/`.
    Local(PathBuf),
    /// Remote package (http(s), git, ...). Recognized but not fetched.
    Remote(Url),
}

impl AppSource {
    /// Classify a source string. Anything that is not an absolute URL is a
    /// local path; `file://` URLs are local too.
    pub fn parse(input: &str) -> Self {
        match Url::parse(input) {
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => AppSource::Local(path),
                Err(()) => AppSource::Remote(url),
            },
            // Single-letter schemes are Windows drive letters, not URLs.
            Ok(url) if url.scheme().len() > 1 => AppSource::Remote(url),
            _ => AppSource::Local(PathBuf::from(input)),
        }
    }

    pub fn local_dir(&self) -> Option<&Path> {
        match self {
            AppSource::Local(path) => Some(path),
            AppSource::Remote(_) => None,
        }
    }
}

impl fmt::Display for AppSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppSource::Local(path) => write!(f, "{}", path.display()),
            AppSource::Remote(url) => write!(f, "{url}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_and_absolute_paths_are_local() {
        assert_eq!(
            AppSource::parse("./tests/apps/register_url_app_ynh"),
            AppSource::Local(PathBuf::from("./tests/apps/register_url_app_ynh"))
        );
        assert_eq!(
            AppSource::parse("/srv/pkg"),
            AppSource::Local(PathBuf::from("/srv/pkg"))
        );
    }

    #[test]
    fn urls_are_remote() {
        let src = AppSource::parse("https://example.org/wiki_ynh");
        assert!(matches!(src, AppSource::Remote(_)));
        assert!(src.local_dir().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn file_url_is_local() {
        assert_eq!(
            AppSource::parse("file:///srv/pkg"),
            AppSource::Local(PathBuf::from("/srv/pkg"))
        );
    }
}

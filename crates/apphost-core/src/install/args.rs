//! Install arguments in form-urlencoded shape: `domain=example.org&path=/wiki&admin=alice`.

use std::collections::BTreeMap;

use super::error::InstallError;

/// Parsed install arguments: the route keys split from the package's own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallArgs {
    pub domain: Option<String>,
    pub path: Option<String>,
    /// Everything except `domain` and `path`, passed through to the package.
    pub extra: BTreeMap<String, String>,
}

impl InstallArgs {
    /// Domain and path, both required for an install.
    pub fn route_parts(&self) -> Result<(&str, &str), InstallError> {
        let domain = self
            .domain
            .as_deref()
            .ok_or_else(|| InstallError::MissingArgument {
                name: "domain".to_string(),
            })?;
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| InstallError::MissingArgument {
                name: "path".to_string(),
            })?;
        Ok((domain, path))
    }
}

/// Parse `k=v&k2=v2`. Later duplicates win; empty keys are dropped.
pub fn parse_install_args(query: &str) -> InstallArgs {
    let mut args = InstallArgs::default();
    for (key, value) in url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        match key.as_ref() {
            "" => {}
            "domain" => args.domain = Some(value.into_owned()),
            "path" => args.path = Some(value.into_owned()),
            _ => {
                args.extra.insert(key.into_owned(), value.into_owned());
            }
        }
    }
    args
}

//! Workspace endpoint normalization
//!
//! Turns a user-supplied workspace into the fully qualified GraphQL API URL.
//! Accepted forms:
//!
//! ```text
//! acme.cloud.turbot.com
//! acme.cloud.turbot.com/
//! acme.cloud.turbot.com/api/v5
//! acme.cloud.turbot.com/api/latest/
//! https://acme.cloud.turbot.com
//! https://acme.cloud.turbot.com/api/v5
//! ```

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Path segment appended to a versioned API path
pub const GRAPHQL_SEGMENT: &str = "graphql";

/// Path used when the workspace has no path at all
pub const DEFAULT_API_PATH: &str = "/api/latest/graphql";

static API_VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/api/v[0-9]+$|latest$").expect("valid api version regex"));

/// Normalize a raw workspace into the API URL.
///
/// Must be applied exactly once: an already-normalized URL ends in `/graphql`
/// and is rejected.
pub fn normalize(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let workspace = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if workspace.is_empty() {
        return Err(Error::invalid_workspace(raw, "workspace is empty"));
    }

    let workspace = if has_scheme(workspace) {
        workspace.to_string()
    } else {
        format!("https://{workspace}")
    };

    let mut url = Url::parse(&workspace).map_err(|e| {
        Error::invalid_workspace(raw, format!("could not parse workspace url: {e}"))
    })?;

    if url.cannot_be_a_base() || url.host_str().map_or(true, str::is_empty) {
        return Err(Error::invalid_workspace(raw, "could not parse workspace url"));
    }

    let path = url.path().to_string();
    if path.is_empty() || path == "/" {
        url.set_path(DEFAULT_API_PATH);
    } else {
        if !API_VERSION_REGEX.is_match(&path) {
            return Err(Error::invalid_workspace(
                raw,
                format!("path '{path}' must end in /api/v<N> or latest"),
            ));
        }
        url.set_path(&format!("{}/{GRAPHQL_SEGMENT}", path.trim_end_matches('/')));
    }

    Ok(url)
}

/// Normalize and serialize back to a string
pub fn normalize_str(raw: &str) -> Result<String> {
    normalize(raw).map(String::from)
}

fn has_scheme(workspace: &str) -> bool {
    let lower = workspace.to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

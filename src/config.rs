//! Connection configuration
//!
//! A connection is configured from a small YAML document, for example:
//!
//! ```yaml
//! profile: production
//! credentials_file: ~/.config/turbot/credentials.yml
//! timeout_secs: 30
//! ```
//!
//! or with credentials inline:
//!
//! ```yaml
//! workspace: acme.cloud.turbot.com
//! access_key: c8e2c2ed-1ca8-429b-b369-123412341234
//! secret_key: a3d8385d-47f7-40c5-a90c-123412341234
//! ```
//!
//! Every field is optional; anything missing is resolved from the environment
//! or the credentials file.

use crate::credentials::{ClientConfig, ClientCredentials};
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::types::mask_secret;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Connection Config
// ============================================================================

/// Per-connection settings loaded from YAML
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Profile in the credentials file
    #[serde(default)]
    pub profile: Option<String>,

    /// Access key
    #[serde(default)]
    pub access_key: Option<String>,

    /// Secret key
    #[serde(default)]
    pub secret_key: Option<String>,

    /// Workspace, e.g. `acme.cloud.turbot.com` or `https://acme.cloud.turbot.com/api/v5`
    #[serde(default)]
    pub workspace: Option<String>,

    /// Credentials file path (`~` is expanded)
    #[serde(default)]
    pub credentials_file: Option<String>,

    /// Run the validation query when the client is first built
    #[serde(default = "default_validate")]
    pub validate: bool,

    /// Whole-request timeout in seconds; unset means no timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_validate() -> bool {
    true
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            profile: None,
            access_key: None,
            secret_key: None,
            workspace: None,
            credentials_file: None,
            validate: default_validate(),
            timeout_secs: None,
        }
    }
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a connection config from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read connection config '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a connection config; an empty document yields the defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse connection config: {e}")))
    }

    /// Credential resolution input for this connection
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            credentials: ClientCredentials::new(
                self.access_key.clone().unwrap_or_default(),
                self.secret_key.clone().unwrap_or_default(),
                self.workspace.clone().unwrap_or_default(),
            ),
            credentials_path: self.credentials_file.clone(),
            profile: self.profile.clone(),
        }
    }

    /// HTTP settings for this connection
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder();
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("profile", &self.profile)
            .field("access_key", &self.access_key.as_deref().map(mask_secret))
            .field("secret_key", &self.secret_key.as_deref().map(mask_secret))
            .field("workspace", &self.workspace)
            .field("credentials_file", &self.credentials_file)
            .field("validate", &self.validate)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

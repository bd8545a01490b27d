//! Credential types
//!
//! Plain data types for credentials, connection-level client config and the
//! on-disk profile store.

use crate::error::{Error, Result};
use crate::types::mask_secret;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Access key, secret key and workspace for one workspace
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
    /// Access key
    #[serde(rename = "accessKey", default)]
    pub access_key: String,
    /// Secret key
    #[serde(rename = "secretKey", default)]
    pub secret_key: String,
    /// Workspace endpoint, as given by the user (not yet normalized)
    #[serde(default, alias = "workspaceEndpoint")]
    pub workspace: String,
}

impl ClientCredentials {
    /// Create a credential set
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        workspace: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            workspace: workspace.into(),
        }
    }

    /// A credential set is complete when all three fields are non-empty
    pub fn is_complete(&self) -> bool {
        !self.access_key.is_empty() && !self.secret_key.is_empty() && !self.workspace.is_empty()
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("access_key", &mask_secret(&self.access_key))
            .field("secret_key", &mask_secret(&self.secret_key))
            .field("workspace", &self.workspace)
            .finish()
    }
}

/// Connection-level configuration used to resolve credentials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Credentials given directly
    pub credentials: ClientCredentials,
    /// Explicit credentials file path (`~` is expanded)
    pub credentials_path: Option<String>,
    /// Explicit profile name
    pub profile: Option<String>,
}

impl ClientConfig {
    /// Create an empty config (resolution falls back to env and the default profile)
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with credentials given directly
    pub fn with_credentials(credentials: ClientCredentials) -> Self {
        Self {
            credentials,
            ..Default::default()
        }
    }

    /// Set the profile name
    #[must_use]
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the credentials file path
    #[must_use]
    pub fn credentials_path(mut self, path: impl Into<String>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// The configured profile, ignoring empty strings
    pub fn profile_name(&self) -> Option<&str> {
        self.profile.as_deref().filter(|p| !p.is_empty())
    }
}

/// Where a resolved credential set came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Given directly in the client config
    Config,
    /// Read from a profile in the credentials file
    Profile {
        /// Profile name
        name: String,
        /// Credentials file path
        path: PathBuf,
    },
    /// Read from the three credential environment variables
    Environment,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Config => write!(f, "config"),
            CredentialSource::Profile { name, path } => {
                write!(f, "profile '{name}' ({})", path.display())
            }
            CredentialSource::Environment => write!(f, "environment"),
        }
    }
}

/// Profiles parsed from a credentials file
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    path: PathBuf,
    profiles: HashMap<String, ClientCredentials>,
}

impl ProfileStore {
    /// Build a store from already-parsed profiles
    pub fn new(path: impl Into<PathBuf>, profiles: HashMap<String, ClientCredentials>) -> Self {
        Self {
            path: path.into(),
            profiles,
        }
    }

    /// Parse a YAML credentials file body
    pub fn from_yaml_str(content: &str, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let profiles = if content.trim().is_empty() {
            HashMap::new()
        } else {
            serde_yaml::from_str::<Option<HashMap<String, Option<ClientCredentials>>>>(content)
                .map_err(|e| Error::CredentialsFile {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?
                .unwrap_or_default()
                .into_iter()
                .map(|(name, creds)| (name, creds.unwrap_or_default()))
                .collect()
        };
        Ok(Self::new(path, profiles))
    }

    /// Path the store was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Profile names in the store
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Look up a complete profile
    pub fn profile(&self, name: &str) -> Result<ClientCredentials> {
        match self.profiles.get(name) {
            Some(creds) if creds.is_complete() => Ok(creds.clone()),
            _ => Err(Error::incomplete_credentials(format!(
                "failed to load all credentials for profile {name} from credentials file {}",
                self.path.display()
            ))),
        }
    }
}

//! Credential resolver implementation
//!
//! Walks the precedence chain and reads the credentials file lazily.

use super::types::{ClientConfig, ClientCredentials, CredentialSource, ProfileStore};
use crate::error::{Error, Result};
use crate::types::{
    DEFAULT_PROFILE, ENV_ACCESS_KEY, ENV_CREDENTIALS_FILE, ENV_PROFILE, ENV_SECRET_KEY,
    ENV_WORKSPACE,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Source of environment variables
pub trait EnvSource: Send + Sync {
    /// Look up a variable; empty values count as unset
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Loads a credentials file into a [`ProfileStore`]
pub trait ProfileLoader: Send + Sync {
    /// Read and parse the credentials file at `path`
    fn load(&self, path: &Path) -> Result<ProfileStore>;
}

/// Reads YAML credentials files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FileProfileLoader;

impl ProfileLoader for FileProfileLoader {
    fn load(&self, path: &Path) -> Result<ProfileStore> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::incomplete_credentials(format!(
                "could not read credentials file {}: {e}",
                path.display()
            ))
        })?;
        ProfileStore::from_yaml_str(&content, path)
    }
}

/// Resolves [`ClientCredentials`] from config, environment and profile file
#[derive(Clone)]
pub struct CredentialResolver {
    env: Arc<dyn EnvSource>,
    loader: Arc<dyn ProfileLoader>,
}

impl CredentialResolver {
    /// Resolver over the process environment and the local filesystem
    pub fn new() -> Self {
        Self::with_sources(Arc::new(ProcessEnv), Arc::new(FileProfileLoader))
    }

    /// Resolver over custom sources
    pub fn with_sources(env: Arc<dyn EnvSource>, loader: Arc<dyn ProfileLoader>) -> Self {
        Self { env, loader }
    }

    /// Resolve credentials, stopping at the first complete tier
    pub fn resolve(&self, config: &ClientConfig) -> Result<ClientCredentials> {
        self.resolve_with_source(config).map(|(creds, _)| creds)
    }

    /// Resolve credentials and report which tier supplied them
    pub fn resolve_with_source(
        &self,
        config: &ClientConfig,
    ) -> Result<(ClientCredentials, CredentialSource)> {
        if config.credentials.is_complete() {
            debug!("Using credentials from connection config");
            return Ok((config.credentials.clone(), CredentialSource::Config));
        }

        if let Some(profile) = config.profile_name() {
            return self.load_profile(config, profile);
        }

        if let Some(creds) = self.env_credentials() {
            debug!("Using credentials from environment");
            return Ok((creds, CredentialSource::Environment));
        }

        let profile = self
            .env
            .var(ENV_PROFILE)
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());
        self.load_profile(config, &profile)
    }

    /// Credentials from the environment, only if all three variables are set
    fn env_credentials(&self) -> Option<ClientCredentials> {
        let creds = ClientCredentials {
            access_key: self.env.var(ENV_ACCESS_KEY)?,
            secret_key: self.env.var(ENV_SECRET_KEY)?,
            workspace: self.env.var(ENV_WORKSPACE)?,
        };
        creds.is_complete().then_some(creds)
    }

    fn load_profile(
        &self,
        config: &ClientConfig,
        profile: &str,
    ) -> Result<(ClientCredentials, CredentialSource)> {
        let path = credentials_path(config, self.env.as_ref())?;
        debug!("Loading profile '{}' from {}", profile, path.display());
        let store = self.loader.load(&path).map_err(|e| match e {
            Error::IncompleteCredentials { reason } => Error::incomplete_credentials(format!(
                "failed to load credentials for profile {profile}: {reason}"
            )),
            other => other,
        })?;
        let creds = store.profile(profile)?;
        Ok((
            creds,
            CredentialSource::Profile {
                name: profile.to_string(),
                path,
            },
        ))
    }
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver").finish_non_exhaustive()
    }
}

/// Credentials file location: explicit path, then `TURBOT_SHARED_CREDENTIALS_FILE`,
/// then `~/.config/turbot/credentials.yml`
pub fn credentials_path(config: &ClientConfig, env: &dyn EnvSource) -> Result<PathBuf> {
    let explicit = config
        .credentials_path
        .clone()
        .filter(|p| !p.is_empty())
        .or_else(|| env.var(ENV_CREDENTIALS_FILE));

    match explicit {
        Some(path) => expand_home(&path),
        None => Ok(home_dir()?
            .join(".config")
            .join("turbot")
            .join("credentials.yml")),
    }
}

/// Expand a leading `~` to the current user's home directory
pub fn expand_home(path: &str) -> Result<PathBuf> {
    let Some(rest) = path.strip_prefix('~') else {
        return Ok(PathBuf::from(path));
    };
    if rest.is_empty() {
        return home_dir();
    }
    match rest.strip_prefix('/').or_else(|| rest.strip_prefix('\\')) {
        Some(relative) => Ok(home_dir()?.join(relative)),
        None => Err(Error::config(format!(
            "cannot expand user-specific home dir in '{path}'"
        ))),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| Error::config("could not determine the user home directory"))
}

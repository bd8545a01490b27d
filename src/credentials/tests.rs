//! Tests for the credentials module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const PROFILES_YAML: &str = r"
default:
  accessKey: default-access
  secretKey: default-secret
  workspace: https://default.example.com
test:
  accessKey: test-access
  secretKey: test-secret
  workspace: https://test.example.com/api/v5
partial:
  accessKey: only-access
";

/// Loader that records every path it is asked to read
#[derive(Default)]
struct SpyLoader {
    calls: AtomicUsize,
    paths: Mutex<Vec<PathBuf>>,
}

impl SpyLoader {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProfileLoader for SpyLoader {
    fn load(&self, path: &Path) -> crate::Result<ProfileStore> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.paths.lock().unwrap().push(path.to_path_buf());
        ProfileStore::from_yaml_str(PROFILES_YAML, path)
    }
}

fn env(vars: &[(&str, &str)]) -> Arc<HashMap<String, String>> {
    Arc::new(
        vars.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
    )
}

fn full_env() -> Arc<HashMap<String, String>> {
    env(&[
        ("TURBOT_ACCESS_KEY", "env-access"),
        ("TURBOT_SECRET_KEY", "env-secret"),
        ("TURBOT_WORKSPACE", "env.example.com"),
    ])
}

fn explicit() -> ClientCredentials {
    ClientCredentials::new("cfg-access", "cfg-secret", "https://example.com/")
}

#[test]
fn test_credentials_complete() {
    assert!(explicit().is_complete());
    assert!(!ClientCredentials::new("a", "", "w").is_complete());
    assert!(!ClientCredentials::new("a", "s", "").is_complete());
    assert!(!ClientCredentials::default().is_complete());
}

#[test]
fn test_credentials_debug_masks_secrets() {
    let debug = format!("{:?}", explicit());
    assert!(!debug.contains("cfg-secret"));
    assert!(debug.contains("https://example.com/"));
}

#[test]
fn test_config_credentials_win_and_skip_file() {
    let loader = Arc::new(SpyLoader::default());
    let resolver = CredentialResolver::with_sources(full_env(), loader.clone());

    let config = ClientConfig::with_credentials(explicit()).profile("test");
    let (creds, source) = resolver.resolve_with_source(&config).unwrap();

    assert_eq!(creds, explicit());
    assert_eq!(source, CredentialSource::Config);
    assert_eq!(loader.calls(), 0);
}

#[test]
fn test_config_profile_beats_environment() {
    let loader = Arc::new(SpyLoader::default());
    let resolver = CredentialResolver::with_sources(full_env(), loader.clone());

    let config = ClientConfig::new()
        .profile("test")
        .credentials_path("/etc/turbot/creds.yml");
    let (creds, source) = resolver.resolve_with_source(&config).unwrap();

    assert_eq!(creds.access_key, "test-access");
    assert_eq!(
        source,
        CredentialSource::Profile {
            name: "test".to_string(),
            path: PathBuf::from("/etc/turbot/creds.yml"),
        }
    );
    assert_eq!(loader.calls(), 1);
}

#[test]
fn test_environment_used_without_reading_file() {
    let loader = Arc::new(SpyLoader::default());
    let resolver = CredentialResolver::with_sources(full_env(), loader.clone());

    let (creds, source) = resolver.resolve_with_source(&ClientConfig::new()).unwrap();

    assert_eq!(
        creds,
        ClientCredentials::new("env-access", "env-secret", "env.example.com")
    );
    assert_eq!(source, CredentialSource::Environment);
    assert_eq!(loader.calls(), 0);
}

#[test]
fn test_partial_environment_falls_back_to_default_profile() {
    let loader = Arc::new(SpyLoader::default());
    let resolver = CredentialResolver::with_sources(
        env(&[
            ("TURBOT_ACCESS_KEY", "env-access"),
            ("TURBOT_SECRET_KEY", "env-secret"),
            ("TURBOT_SHARED_CREDENTIALS_FILE", "/tmp/creds.yml"),
        ]),
        loader.clone(),
    );

    let creds = resolver.resolve(&ClientConfig::new()).unwrap();

    assert_eq!(creds.access_key, "default-access");
    assert_eq!(loader.calls(), 1);
    assert_eq!(
        loader.paths.lock().unwrap().as_slice(),
        &[PathBuf::from("/tmp/creds.yml")]
    );
}

#[test]
fn test_profile_from_environment() {
    let loader = Arc::new(SpyLoader::default());
    let resolver = CredentialResolver::with_sources(
        env(&[
            ("TURBOT_PROFILE", "test"),
            ("TURBOT_SHARED_CREDENTIALS_FILE", "/tmp/creds.yml"),
        ]),
        loader,
    );

    let creds = resolver.resolve(&ClientConfig::new()).unwrap();
    assert_eq!(creds.workspace, "https://test.example.com/api/v5");
}

#[test]
fn test_incomplete_config_credentials_are_not_merged() {
    let loader = Arc::new(SpyLoader::default());
    let resolver = CredentialResolver::with_sources(full_env(), loader);

    let config = ClientConfig::with_credentials(ClientCredentials::new("cfg-access", "", ""));
    let creds = resolver.resolve(&config).unwrap();

    assert_eq!(creds.access_key, "env-access");
    assert_eq!(creds.workspace, "env.example.com");
}

#[test]
fn test_missing_profile_names_profile_and_path() {
    let resolver =
        CredentialResolver::with_sources(env(&[]), Arc::new(SpyLoader::default()));

    let config = ClientConfig::new()
        .profile("nope")
        .credentials_path("/tmp/creds.yml");
    let err = resolver.resolve(&config).unwrap_err();

    assert!(matches!(err, Error::IncompleteCredentials { .. }));
    assert!(err.is_credentials_error());
    let text = err.to_string();
    assert!(text.contains("nope"));
    assert!(text.contains("/tmp/creds.yml"));
}

#[test]
fn test_incomplete_profile_is_rejected() {
    let resolver =
        CredentialResolver::with_sources(env(&[]), Arc::new(SpyLoader::default()));

    let config = ClientConfig::new()
        .profile("partial")
        .credentials_path("/tmp/creds.yml");
    let err = resolver.resolve(&config).unwrap_err();

    assert!(matches!(err, Error::IncompleteCredentials { .. }));
    assert!(err.to_string().contains("partial"));
}

#[test]
fn test_resolution_is_idempotent() {
    let resolver = CredentialResolver::with_sources(
        env(&[("TURBOT_SHARED_CREDENTIALS_FILE", "/tmp/creds.yml")]),
        Arc::new(SpyLoader::default()),
    );
    let config = ClientConfig::new();

    let first = resolver.resolve(&config).unwrap();
    let second = resolver.resolve(&config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_file_loader_reads_yaml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PROFILES_YAML.as_bytes()).unwrap();

    let store = FileProfileLoader.load(file.path()).unwrap();
    assert_eq!(store.path(), file.path());
    assert_eq!(store.profile("default").unwrap().secret_key, "default-secret");
    assert_eq!(store.names().count(), 3);
}

#[test]
fn test_file_loader_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.yml");

    let err = FileProfileLoader.load(&path).unwrap_err();
    assert!(matches!(err, Error::IncompleteCredentials { .. }));
    assert!(err.to_string().contains("missing.yml"));
}

#[test]
fn test_no_complete_tier_and_missing_file_is_incomplete() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.yml");
    let resolver = CredentialResolver::with_sources(
        env(&[("TURBOT_SHARED_CREDENTIALS_FILE", path.to_str().unwrap())]),
        Arc::new(FileProfileLoader),
    );

    let err = resolver.resolve(&ClientConfig::new()).unwrap_err();

    assert!(matches!(err, Error::IncompleteCredentials { .. }));
    let text = err.to_string();
    assert!(text.contains("profile default"));
    assert!(text.contains("credentials.yml"));
}

#[test]
fn test_malformed_file_during_resolution_stays_file_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"default: [not, a, profile").unwrap();
    let resolver = CredentialResolver::with_sources(env(&[]), Arc::new(FileProfileLoader));

    let config = ClientConfig::new().credentials_path(file.path().to_string_lossy().to_string());
    let err = resolver.resolve(&config).unwrap_err();

    assert!(matches!(err, Error::CredentialsFile { .. }));
}

#[test]
fn test_malformed_file_is_credentials_error() {
    let err = ProfileStore::from_yaml_str("default: [not, a, profile", "/tmp/bad.yml").unwrap_err();
    assert!(matches!(err, Error::CredentialsFile { .. }));
}

#[test]
fn test_empty_file_has_no_profiles() {
    let store = ProfileStore::from_yaml_str("", "/tmp/empty.yml").unwrap();
    assert_eq!(store.names().count(), 0);
    assert!(store.profile("default").is_err());
}

#[test]
fn test_workspace_endpoint_alias() {
    let yaml = "
default:
  accessKey: a
  secretKey: s
  workspaceEndpoint: example.com
";
    let store = ProfileStore::from_yaml_str(yaml, "/tmp/creds.yml").unwrap();
    assert_eq!(store.profile("default").unwrap().workspace, "example.com");
}

#[test]
fn test_credentials_path_precedence() {
    let config = ClientConfig::new().credentials_path("/explicit/creds.yml");
    let env_vars = env(&[("TURBOT_SHARED_CREDENTIALS_FILE", "/env/creds.yml")]);
    assert_eq!(
        credentials_path(&config, &*env_vars).unwrap(),
        PathBuf::from("/explicit/creds.yml")
    );
    assert_eq!(
        credentials_path(&ClientConfig::new(), &*env_vars).unwrap(),
        PathBuf::from("/env/creds.yml")
    );

    if let Some(home) = dirs::home_dir() {
        let empty = env(&[]);
        assert_eq!(
            credentials_path(&ClientConfig::new(), &*empty).unwrap(),
            home.join(".config").join("turbot").join("credentials.yml")
        );
    }
}

#[test]
fn test_expand_home() {
    assert_eq!(
        expand_home("/abs/path.yml").unwrap(),
        PathBuf::from("/abs/path.yml")
    );
    assert!(expand_home("~other/creds.yml").is_err());

    if let Some(home) = dirs::home_dir() {
        assert_eq!(expand_home("~").unwrap(), home);
        assert_eq!(
            expand_home("~/.turbot/creds.yml").unwrap(),
            home.join(".turbot/creds.yml")
        );
    }
}

//! Credential resolution module
//!
//! Determines the access key, secret key and workspace for a connection from a
//! precedence chain of sources:
//!
//! 1. Credentials set directly in the [`ClientConfig`]
//! 2. A profile named in the config, read from the credentials file
//! 3. `TURBOT_ACCESS_KEY`, `TURBOT_SECRET_KEY` and `TURBOT_WORKSPACE`
//! 4. The `TURBOT_PROFILE` profile (or `default`), read from the credentials file
//!
//! The credentials file is only read when tiers 1–3 come up empty.

mod resolver;
mod types;

pub use resolver::{
    credentials_path, expand_home, CredentialResolver, EnvSource, FileProfileLoader,
    ProcessEnv, ProfileLoader,
};
pub use types::{ClientConfig, ClientCredentials, CredentialSource, ProfileStore};

#[cfg(test)]
mod tests;

//! Common types used throughout turbot-access
//!
//! Shared type aliases and small value types used across modules.

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// GraphQL variables sent alongside a query document
pub type Variables = serde_json::Map<String, JsonValue>;

// ============================================================================
// Environment Variables
// ============================================================================

/// Access key environment variable
pub const ENV_ACCESS_KEY: &str = "TURBOT_ACCESS_KEY";

/// Secret key environment variable
pub const ENV_SECRET_KEY: &str = "TURBOT_SECRET_KEY";

/// Workspace endpoint environment variable
pub const ENV_WORKSPACE: &str = "TURBOT_WORKSPACE";

/// Profile name environment variable (only used when no profile is configured)
pub const ENV_PROFILE: &str = "TURBOT_PROFILE";

/// Credentials file override environment variable
pub const ENV_CREDENTIALS_FILE: &str = "TURBOT_SHARED_CREDENTIALS_FILE";

/// Profile used when neither the config nor the environment names one
pub const DEFAULT_PROFILE: &str = "default";

/// Mask a secret for display, keeping only the last four characters
pub fn mask_secret(value: &str) -> String {
    let visible: String = value
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if value.chars().count() <= 4 {
        return "*".repeat(value.chars().count());
    }
    format!("****{visible}")
}

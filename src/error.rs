//! Error types for turbot-access
//!
//! This module defines the error hierarchy for the whole crate, plus the
//! classifier that turns raw GraphQL failure messages into typed errors.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use thiserror::Error;

/// Matches the service's "entity absent" phrasing in any case
static NOT_FOUND_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)not found").expect("valid not-found regex"));

/// The main error type for turbot-access
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Credential / Endpoint Errors
    // ============================================================================
    #[error("failed to get credentials: {reason}")]
    IncompleteCredentials { reason: String },

    #[error("failed to read credentials file {path}: {message}")]
    CredentialsFile { path: String, message: String },

    #[error("invalid workspace '{workspace}': {message}")]
    InvalidWorkspace { workspace: String, message: String },

    // ============================================================================
    // Service Errors (classified)
    // ============================================================================
    /// Entity absent. The message is kept verbatim for downstream matching.
    #[error("{message}")]
    NotFound { message: String },

    #[error("The server returned a {reason} error ({status}). Please wait a few minutes and try again.")]
    TransientService { status: u16, reason: String },

    #[error("The server returned a {reason} error ({status}). Please contact Turbot support.")]
    OtherService { status: u16, reason: String },

    #[error("{message}")]
    UnclassifiedTransport { message: String },

    #[error("failed to fetch page {page}: {source}")]
    PageFetch {
        page: u32,
        #[source]
        source: Box<Error>,
    },

    // ============================================================================
    // HTTP / Decode Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Authentication failed: {message}")]
    Auth { message: String },

    // ============================================================================
    // Query / Filter Errors
    // ============================================================================
    #[error("invalid value for qualifier '{name}': {message}")]
    InvalidQualifier { name: String, message: String },

    #[error("invalid query '{name}': {message}")]
    Query { name: String, message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create an incomplete credentials error
    pub fn incomplete_credentials(reason: impl Into<String>) -> Self {
        Self::IncompleteCredentials {
            reason: reason.into(),
        }
    }

    /// Create an invalid workspace error
    pub fn invalid_workspace(workspace: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidWorkspace {
            workspace: workspace.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an invalid qualifier error
    pub fn invalid_qualifier(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidQualifier {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a query error
    pub fn query(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Wrap a failure that happened while fetching page `page` (1-based)
    pub fn page_fetch(page: u32, source: Error) -> Self {
        Self::PageFetch {
            page,
            source: Box::new(source),
        }
    }

    /// Whether this error means the requested entity is absent
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::PageFetch { source, .. } => source.is_not_found(),
            other => NOT_FOUND_REGEX.is_match(&other.to_string()),
        }
    }

    /// Whether the service reported a gateway/availability failure worth retrying later
    pub fn is_transient(&self) -> bool {
        match self {
            Error::TransientService { .. } => true,
            Error::PageFetch { source, .. } => source.is_transient(),
            _ => false,
        }
    }

    /// Whether this error came from credential resolution
    pub fn is_credentials_error(&self) -> bool {
        matches!(
            self,
            Error::IncompleteCredentials { .. } | Error::CredentialsFile { .. }
        )
    }

    /// The numeric status embedded in a classified service error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::TransientService { status, .. } | Error::OtherService { status, .. } => {
                Some(*status)
            }
            Error::PageFetch { source, .. } => source.status(),
            _ => None,
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Check whether a message uses the service's "not found" phrasing
pub fn is_not_found_message(message: &str) -> bool {
    NOT_FOUND_REGEX.is_match(message)
}

/// Extract the status code from a GraphQL client failure message.
///
/// Only messages of the form `graphql: <text>: <code>` carry a code, e.g.
/// `graphql: server returned a non-200 status code: 503`.
pub fn extract_status_code(message: &str) -> Option<u16> {
    if !message.contains("graphql") {
        return None;
    }
    let parts: Vec<&str> = message.split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    parts[2].trim().parse::<u16>().ok()
}

/// Classify a raw execution failure message into a typed error.
///
/// Not-found messages are returned verbatim. Gateway codes (502, 503, 504) become
/// [`Error::TransientService`], other known codes [`Error::OtherService`], and
/// anything without a recognisable code is passed through unchanged.
pub fn classify(message: impl Into<String>) -> Error {
    let message = message.into();
    if is_not_found_message(&message) {
        return Error::NotFound { message };
    }

    let Some((status, reason)) = extract_status_code(&message).and_then(|code| {
        let status = StatusCode::from_u16(code).ok()?;
        let reason = status.canonical_reason()?;
        Some((code, reason.to_string()))
    }) else {
        return Error::UnclassifiedTransport { message };
    };

    if matches!(status, 502..=504) {
        Error::TransientService { status, reason }
    } else {
        Error::OtherService { status, reason }
    }
}

/// Result type alias for turbot-access
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

/// Extension for treating a not-found failure as an absent value
pub trait NotFoundExt<T> {
    /// Convert a not-found error into `Ok(None)`, keeping every other error
    fn not_found_as_none(self) -> Result<Option<T>>;
}

impl<T> NotFoundExt<T> for Result<T> {
    fn not_found_as_none(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

//! GraphQL client over reqwest
//!
//! One [`GraphqlClient`] is built per connection from resolved credentials.
//! It is immutable after construction and safe to share across tasks.

use super::transport::{parse_response, GraphqlRequest, GraphqlTransport};
use crate::credentials::ClientCredentials;
use crate::endpoint;
use crate::error::{Error, NotFoundExt, Result};
use crate::query::{ValidationResponse, VALIDATION_QUERY};
use crate::types::{JsonValue, Variables};
use async_trait::async_trait;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CACHE_CONTROL};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

/// Configuration for the underlying HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Whole-request timeout; `None` keeps the transport default (no timeout)
    pub timeout: Option<Duration>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            default_headers: HashMap::new(),
            user_agent: format!("turbot-access/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// `Basic <base64(access:secret)>`
pub fn basic_auth_header(access_key: &str, secret_key: &str) -> String {
    let encoded =
        base64::engine::general_purpose::STANDARD.encode(format!("{access_key}:{secret_key}"));
    format!("Basic {encoded}")
}

/// Authenticated GraphQL client for one workspace
pub struct GraphqlClient {
    client: Client,
    endpoint: Url,
    credentials: ClientCredentials,
}

impl GraphqlClient {
    /// Build a client from complete credentials.
    ///
    /// The workspace is normalized here; construction fails rather than
    /// returning a client with a bad endpoint.
    pub fn new(credentials: ClientCredentials, config: &HttpClientConfig) -> Result<Self> {
        if !credentials.is_complete() {
            return Err(Error::incomplete_credentials(
                "access key, secret key and workspace are all required",
            ));
        }
        let endpoint = endpoint::normalize(&credentials.workspace)?;
        let client = build_http_client(&credentials, config)?;

        debug!("Created GraphQL client for {}", endpoint);
        Ok(Self {
            client,
            endpoint,
            credentials,
        })
    }

    /// The normalized GraphQL endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    /// Run a document and decode its `data` member into `T`
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<Variables>,
    ) -> Result<T> {
        let data = self.execute_raw(query, variables).await?;
        serde_json::from_value(data).map_err(|e| Error::decode(format!("decoding response: {e}")))
    }

    /// Like [`execute`](Self::execute) but a not-found failure yields `None`
    pub async fn get<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<Variables>,
    ) -> Result<Option<T>> {
        self.execute(query, variables).await.not_found_as_none()
    }

    /// Whether the document resolves; a not-found failure yields `false`
    pub async fn exists(&self, query: &str, variables: Option<Variables>) -> Result<bool> {
        Ok(self
            .get::<JsonValue>(query, variables)
            .await?
            .is_some())
    }

    /// Check that the workspace answers and accepts the credentials
    pub async fn validate(&self) -> Result<()> {
        let response: ValidationResponse = self.execute(VALIDATION_QUERY, None).await?;
        if !response.is_valid() {
            warn!("Validation query returned no Query type for {}", self.endpoint);
            return Err(Error::auth(
                "authorisation failed. Verify workspace, access_key and secret_key have been set correctly",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl GraphqlTransport for GraphqlClient {
    async fn execute_raw(&self, query: &str, variables: Option<Variables>) -> Result<JsonValue> {
        let body = GraphqlRequest {
            query,
            variables: variables.as_ref(),
        };

        let start = Instant::now();
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let data = parse_response(status, &bytes)?;

        debug!("graphql.time {}ms", start.elapsed().as_millis());
        Ok(data)
    }
}

impl std::fmt::Debug for GraphqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphqlClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

fn build_http_client(credentials: &ClientCredentials, config: &HttpClientConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    for (key, value) in &config.default_headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| Error::config(format!("invalid header name '{key}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::config(format!("invalid value for header '{key}': {e}")))?;
        headers.insert(name, value);
    }

    let mut auth = HeaderValue::from_str(&basic_auth_header(
        &credentials.access_key,
        &credentials.secret_key,
    ))
    .map_err(|_| Error::auth("credentials contain characters not allowed in a header"))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    let mut builder = Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers);
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

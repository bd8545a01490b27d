//! Per-connection client cache
//!
//! A [`Connection`] resolves credentials, builds the GraphQL client and
//! optionally validates it the first time a caller needs it. Every later
//! caller gets the same shared client. Failures are not cached, so the next
//! caller tries again.

use crate::config::ConnectionConfig;
use crate::credentials::CredentialResolver;
use crate::error::Result;
use crate::filter::FilterExpression;
use crate::http::GraphqlClient;
use crate::pagination::{ErrorPolicy, ListOutcome, PaginationDriver, RowSink};
use crate::query::ListQuery;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// One logical connection to a workspace
pub struct Connection {
    name: String,
    config: ConnectionConfig,
    resolver: CredentialResolver,
    client: RwLock<Option<Arc<GraphqlClient>>>,
}

impl Connection {
    /// Create a connection; nothing is resolved until first use
    pub fn new(name: impl Into<String>, config: ConnectionConfig) -> Self {
        Self {
            name: name.into(),
            config,
            resolver: CredentialResolver::new(),
            client: RwLock::new(None),
        }
    }

    /// Use a custom credential resolver
    #[must_use]
    pub fn with_resolver(mut self, resolver: CredentialResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// The shared client, built on first call
    pub async fn client(&self) -> Result<Arc<GraphqlClient>> {
        {
            let cached = self.client.read().await;
            if let Some(client) = cached.as_ref() {
                return Ok(Arc::clone(client));
            }
        }

        let mut cached = self.client.write().await;

        // Another task may have built it while we waited for the write lock
        if let Some(client) = cached.as_ref() {
            return Ok(Arc::clone(client));
        }

        let client = Arc::new(self.build_client().await?);
        *cached = Some(Arc::clone(&client));
        Ok(client)
    }

    /// Whether the client has been built
    pub async fn is_connected(&self) -> bool {
        self.client.read().await.is_some()
    }

    /// Run a list query on this connection's client
    pub async fn list<T, S>(
        &self,
        query: &ListQuery,
        filter: &FilterExpression,
        policy: ErrorPolicy,
        sink: &mut S,
    ) -> Result<ListOutcome>
    where
        T: DeserializeOwned,
        S: RowSink<T> + ?Sized,
    {
        let client = self.client().await?;
        PaginationDriver::new(client.as_ref())
            .error_policy(policy)
            .run(query, filter, sink)
            .await
    }

    async fn build_client(&self) -> Result<GraphqlClient> {
        let (credentials, source) = self
            .resolver
            .resolve_with_source(&self.config.client_config())?;
        debug!("Connection '{}' using credentials from {}", self.name, source);

        let client = GraphqlClient::new(credentials, &self.config.http_config())?;
        if self.config.validate {
            client.validate().await?;
        }

        info!("Connection '{}' ready at {}", self.name, client.endpoint());
        Ok(client)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{EnvSource, FileProfileLoader};
    use crate::error::Error;
    use crate::filter::FilterBuilder;
    use crate::pagination::CollectSink;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn isolated_resolver() -> CredentialResolver {
        let env: Arc<dyn EnvSource> = Arc::new(HashMap::<String, String>::new());
        CredentialResolver::with_sources(env, Arc::new(FileProfileLoader))
    }

    fn inline_config(workspace: &str) -> ConnectionConfig {
        ConnectionConfig {
            workspace: Some(workspace.to_string()),
            access_key: Some("my-access".into()),
            secret_key: Some("my-secret".into()),
            ..Default::default()
        }
    }

    async fn mount_validation(server: &MockServer, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"query": crate::query::VALIDATION_QUERY})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"schema": {"queryType": {"name": "Query"}}}
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_client_is_built_once() {
        let server = MockServer::start().await;
        mount_validation(&server, 1).await;

        let conn = Arc::new(
            Connection::new("turbot", inline_config(&server.uri())).with_resolver(isolated_resolver()),
        );
        assert!(!conn.is_connected().await);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let conn = Arc::clone(&conn);
                tokio::spawn(async move { conn.client().await.unwrap() })
            })
            .collect();
        let mut clients = Vec::new();
        for handle in handles {
            clients.push(handle.await.unwrap());
        }

        assert!(conn.is_connected().await);
        assert!(clients.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[tokio::test]
    async fn test_failed_validation_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(2)
            .mount(&server)
            .await;

        let conn =
            Connection::new("turbot", inline_config(&server.uri())).with_resolver(isolated_resolver());

        assert!(matches!(conn.client().await.unwrap_err(), Error::Auth { .. }));
        assert!(conn.client().await.is_err());
        assert!(!conn.is_connected().await);
    }

    #[tokio::test]
    async fn test_validation_can_be_skipped() {
        let config = ConnectionConfig {
            validate: false,
            ..inline_config("acme.cloud.turbot.com")
        };
        let conn = Connection::new("turbot", config).with_resolver(isolated_resolver());

        let client = conn.client().await.unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://acme.cloud.turbot.com/api/latest/graphql"
        );
    }

    #[tokio::test]
    async fn test_bad_workspace_aborts_construction() {
        let config = ConnectionConfig {
            validate: false,
            ..inline_config("acme.cloud.turbot.com/not-an-api")
        };
        let conn = Connection::new("turbot", config).with_resolver(isolated_resolver());

        let err = conn.client().await.unwrap_err();
        assert!(matches!(err, Error::InvalidWorkspace { .. }));
        assert!(!conn.is_connected().await);
    }

    #[tokio::test]
    async fn test_list_through_connection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"resources": {"items": [{"id": 1}, {"id": 2}], "paging": {"next": ""}}}
            })))
            .mount(&server)
            .await;

        let config = ConnectionConfig {
            validate: false,
            ..inline_config(&server.uri())
        };
        let conn = Connection::new("turbot", config).with_resolver(isolated_resolver());
        let query = ListQuery::new(
            "resources",
            "query q($filter: [String!], $next_token: String) { resources(filter: $filter, paging: $next_token) { items { id } paging { next } } }",
            "resources",
        )
        .unwrap();
        let mut sink = CollectSink::<Value>::new();

        let outcome = conn
            .list(&query, &FilterBuilder::new().build(), ErrorPolicy::Abort, &mut sink)
            .await
            .unwrap();

        assert_eq!(outcome.items, 2);
        assert_eq!(sink.into_items(), vec![json!({"id": 1}), json!({"id": 2})]);
    }
}

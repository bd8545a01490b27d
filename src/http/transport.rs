//! GraphQL wire types and the transport seam

use crate::error::{classify, Error, Result};
use crate::types::{JsonValue, Variables};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Executes one GraphQL document and returns its `data` member
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    /// Run `query` with `variables`; failures are already classified
    async fn execute_raw(&self, query: &str, variables: Option<Variables>) -> Result<JsonValue>;
}

/// Request body
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<&'a Variables>,
}

/// Response envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<JsonValue>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

/// One entry of the `errors` array
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
}

/// Turn a raw HTTP response into the `data` member or a classified error.
///
/// The first GraphQL error wins. A non-200 status without GraphQL errors
/// fails with the status code, whatever the body holds, so gateway pages
/// surface as coded errors.
pub fn parse_response(status: StatusCode, body: &[u8]) -> Result<JsonValue> {
    let envelope: GraphqlResponse = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(_) if status != StatusCode::OK => return Err(status_error(status)),
        Err(e) => return Err(Error::decode(format!("decoding response: {e}"))),
    };

    if let Some(first) = envelope.errors.first() {
        return Err(classify(format!("graphql: {}", first.message)));
    }
    if status != StatusCode::OK {
        return Err(status_error(status));
    }

    Ok(envelope.data.unwrap_or(JsonValue::Null))
}

fn status_error(status: StatusCode) -> Error {
    classify(format!(
        "graphql: server returned a non-200 status code: {}",
        status.as_u16()
    ))
}

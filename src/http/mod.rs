//! HTTP transport module
//!
//! Executes authenticated GraphQL requests against the workspace endpoint and
//! classifies failures.
//!
//! # Features
//!
//! - **Basic auth**: access key and secret key sent on every request
//! - **No caching**: `Cache-Control: no-cache` on every request
//! - **Error classification**: gateway failures, other coded failures and
//!   "not found" responses map to distinct [`Error`](crate::Error) variants
//! - **Transport seam**: [`GraphqlTransport`] lets the pagination driver run
//!   against a stub in tests

mod client;
mod transport;

pub use client::{basic_auth_header, GraphqlClient, HttpClientConfig, HttpClientConfigBuilder};
pub use transport::{parse_response, GraphqlError, GraphqlRequest, GraphqlResponse, GraphqlTransport};

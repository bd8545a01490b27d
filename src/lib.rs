// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # turbot-access
//!
//! Access layer for the Turbot CMDB GraphQL API: resolves credentials,
//! normalizes the workspace endpoint, executes authenticated queries with
//! classified errors and streams paginated list results.
//!
//! ## Features
//!
//! - **Credential resolution**: connection config, named profile, environment,
//!   default profile, first complete source wins
//! - **Endpoint normalization**: bare hosts and versioned API paths become the
//!   GraphQL URL
//! - **Error classification**: gateway failures are transient, "not found"
//!   text survives verbatim
//! - **Filter building**: typed qualifiers rendered into filter clauses
//! - **Cursor pagination**: row-budget aware, with opt-in error tolerance
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use turbot_access::{
//!     CollectSink, Connection, ConnectionConfig, ErrorPolicy, FilterBuilder, ListQuery,
//!     Qualifiers, QualifierTable, RawItem, Result,
//! };
//!
//! const RESOURCES: &str = r#"
//! query resourceList($filter: [String!], $next_token: String) {
//!   resources(filter: $filter, paging: $next_token) {
//!     items { turbot { id title } }
//!     paging { next }
//!   }
//! }"#;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let connection = Connection::new("turbot", ConnectionConfig::default());
//!
//!     let table = QualifierTable::new().int("id", "resourceId:{} level:self");
//!     let filter = FilterBuilder::new()
//!         .qualifiers(&table, &Qualifiers::new().eq("id", 191_382_015_472_932_i64))?
//!         .build();
//!
//!     let query = ListQuery::new("turbot_resource.list", RESOURCES, "resources")?;
//!     let mut sink = CollectSink::<RawItem>::new().with_limit(100);
//!     connection
//!         .list(&query, &filter, ErrorPolicy::Abort, &mut sink)
//!         .await?;
//!
//!     for item in sink.items() {
//!         println!("{:?}", item.str("turbot.title"));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Connection                           │
//! │     resolve credentials → normalize endpoint → validate      │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────┬────────────────┴─────┬────────────┬───────────┐
//! │ Credentials │  HTTP transport      │  Filter    │ Paginate  │
//! ├─────────────┼──────────────────────┼────────────┼───────────┤
//! │ Config      │ Basic auth           │ Qualifiers │ Cursor    │
//! │ Profile     │ Error classification │ Quoting    │ Row budget│
//! │ Environment │ Validation query     │ limit:     │ Tolerance │
//! └─────────────┴──────────────────────┴────────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types and classification
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credential resolution
pub mod credentials;

/// Workspace endpoint normalization
pub mod endpoint;

/// GraphQL transport
pub mod http;

/// Query documents and helpers
pub mod query;

/// Filter building
pub mod filter;

/// Connection response decoding
pub mod decode;

/// Cursor pagination
pub mod pagination;

/// Per-connection client cache
pub mod connection;

/// Connection configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

pub use config::ConnectionConfig;
pub use connection::Connection;
pub use credentials::{ClientConfig, ClientCredentials, CredentialResolver, CredentialSource};
pub use decode::RawItem;
pub use filter::{FilterBuilder, FilterExpression, Operator, QualValue, QualifierTable, Qualifiers};
pub use http::{GraphqlClient, GraphqlTransport, HttpClientConfig};
pub use pagination::{
    CallbackSink, CancelFlag, CollectSink, ErrorPolicy, ListOutcome, PaginationDriver, RowSink,
    StopReason,
};
pub use query::{property_fragment, ListQuery, Property};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Page decoding module
//!
//! Every list query answers with the same connection shape under its root
//! field:
//!
//! ```text
//! { "<root>": { "items": [...], "paging": { "next": "<cursor>" } } }
//! ```
//!
//! [`decode_connection`] pulls that shape out of a response's `data` member.
//! Items decode into any `DeserializeOwned` type; [`RawItem`] keeps them as
//! raw JSON.

mod decoders;
mod types;

pub use decoders::{decode_connection, extract_path};
pub use types::{Connection, Paging, RawItem};

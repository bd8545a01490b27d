//! Connection shape shared by all list responses

use super::decoders::extract_path;
use crate::types::JsonValue;
use serde::{Deserialize, Deserializer, Serialize};

/// One page of a list response
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub paging: Paging,
}

impl<T> Connection<T> {
    /// Cursor for the next page; empty when this is the last page
    pub fn next_cursor(&self) -> &str {
        &self.paging.next
    }

    pub fn is_last(&self) -> bool {
        self.paging.next.is_empty()
    }
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            paging: Paging::default(),
        }
    }
}

/// Paging block of a list response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Paging {
    #[serde(default, deserialize_with = "null_as_default")]
    pub next: String,
}

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An item kept as raw JSON, for attributes no typed model covers
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RawItem(pub JsonValue);

impl RawItem {
    /// Look up a dotted path inside the item
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        extract_path(&self.0, path)
    }

    /// String at `path`, if present and a string
    pub fn str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(JsonValue::as_str)
    }

    pub fn into_inner(self) -> JsonValue {
        self.0
    }
}

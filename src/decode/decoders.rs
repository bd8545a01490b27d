//! Connection decoding

use super::types::Connection;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::de::DeserializeOwned;

/// Decode the connection found at `root_field` in a response's `data` member.
///
/// `root_field` may be a dotted path (`resource.children`). A null root
/// decodes to an empty last page; an absent one is an error.
pub fn decode_connection<T: DeserializeOwned>(
    data: &JsonValue,
    root_field: &str,
) -> Result<Connection<T>> {
    match extract_path(data, root_field) {
        None => Err(Error::decode(format!(
            "response has no '{root_field}' field"
        ))),
        Some(JsonValue::Null) => Ok(Connection::default()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            Error::decode(format!("failed to decode '{root_field}' connection: {e}"))
        }),
    }
}

/// Walk a dotted path; `$.` prefix and `[n]` array indices are accepted
pub fn extract_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index = part[bracket_pos + 1..]
                .strip_suffix(']')?
                .parse::<usize>()
                .ok()?;
            if !name.is_empty() {
                current = current.get(name)?;
            }
            current = current.as_array()?.get(index)?;
        } else {
            current = current.get(part)?;
        }
    }
    Some(current)
}

//! Query documents
//!
//! Query documents are defined by the caller per entity; this module holds the
//! pieces every listing shares: the list-query descriptor, the validation query
//! and the one pure function that turns a property list into `get(path:)`
//! selections.

use crate::error::{Error, Result};
use crate::filter::FilterExpression;
use crate::types::{JsonValue, Variables};
use regex::Regex;
use serde::Deserialize;
use std::fmt::Write as _;

/// Default name of the filter variable in list queries
pub const FILTER_VARIABLE: &str = "filter";

/// Default name of the paging cursor variable in list queries
pub const CURSOR_VARIABLE: &str = "next_token";

/// Introspection query used to validate workspace and credentials
pub const VALIDATION_QUERY: &str = r"{
	schema: __schema {
		queryType {
			name
		}
	}
}";

/// Response to [`VALIDATION_QUERY`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationResponse {
    #[serde(default)]
    pub schema: SchemaInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaInfo {
    #[serde(rename = "queryType", default)]
    pub query_type: QueryType,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryType {
    #[serde(default)]
    pub name: String,
}

impl ValidationResponse {
    /// Credentials are accepted when the schema exposes the root `Query` type
    pub fn is_valid(&self) -> bool {
        self.schema.query_type.name == "Query"
    }
}

// ============================================================================
// Property selections
// ============================================================================

/// A property to select with `get(path: ...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    /// Select a path under its own name
    Path(String),
    /// Select a path under an alias
    Alias {
        /// Field name in the response
        alias: String,
        /// Property path in the resource
        path: String,
    },
}

impl Property {
    /// Property selected under its own name
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Property selected under an alias
    pub fn alias(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Alias {
            alias: alias.into(),
            path: path.into(),
        }
    }
}

/// Expand a property list into query selection lines
pub fn property_fragment(properties: &[Property]) -> String {
    let mut fragment = String::new();
    for property in properties {
        let (alias, path) = match property {
            Property::Path(path) => (path.as_str(), path.as_str()),
            Property::Alias { alias, path } => (alias.as_str(), path.as_str()),
        };
        let _ = writeln!(fragment, "\t\t\t{alias}: get(path: \"{path}\")");
    }
    fragment
}

// ============================================================================
// List queries
// ============================================================================

/// A paginated list query supplied by the caller
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Name used in log lines (e.g. `turbot_resource.listResource`)
    pub name: String,
    /// GraphQL document
    pub document: String,
    /// Field under `data` holding `items` and `paging`
    pub root_field: String,
    /// Name of the filter variable
    pub filter_var: String,
    /// Name of the cursor variable
    pub cursor_var: String,
}

impl ListQuery {
    /// Create a list query using the `filter` and `next_token` variables
    pub fn new(
        name: impl Into<String>,
        document: impl Into<String>,
        root_field: impl Into<String>,
    ) -> Result<Self> {
        Self::with_variables(name, document, root_field, FILTER_VARIABLE, CURSOR_VARIABLE)
    }

    /// Create a list query with custom variable names
    pub fn with_variables(
        name: impl Into<String>,
        document: impl Into<String>,
        root_field: impl Into<String>,
        filter_var: impl Into<String>,
        cursor_var: impl Into<String>,
    ) -> Result<Self> {
        let query = Self {
            name: name.into(),
            document: document.into(),
            root_field: root_field.into(),
            filter_var: filter_var.into(),
            cursor_var: cursor_var.into(),
        };
        query.validate()?;
        Ok(query)
    }

    fn validate(&self) -> Result<()> {
        if self.root_field.is_empty() {
            return Err(Error::query(&self.name, "root field is empty"));
        }
        for var in [&self.filter_var, &self.cursor_var] {
            let pattern = format!(r"\${}\b", regex::escape(var));
            let declared = Regex::new(&pattern)
                .map(|re| re.is_match(&self.document))
                .unwrap_or(false);
            if !declared {
                return Err(Error::query(
                    &self.name,
                    format!("document does not use variable ${var}"),
                ));
            }
        }
        Ok(())
    }

    /// Variables for one page request
    pub fn variables(&self, filter: &FilterExpression, cursor: &str) -> Variables {
        let mut vars = Variables::new();
        vars.insert(self.filter_var.clone(), filter.to_variable());
        vars.insert(
            self.cursor_var.clone(),
            JsonValue::String(cursor.to_string()),
        );
        vars
    }
}

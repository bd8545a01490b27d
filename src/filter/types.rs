//! Filter types
//!
//! Qualifier values, the declarative qualifier table and the built filter.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Value kind a qualifier accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualKind {
    /// Rendered unquoted
    Int,
    /// Rendered quoted and escaped
    String,
    /// Rendered as a quoted timestamp with a comparison prefix
    Timestamp,
}

/// Comparison operator attached to a qualifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    #[default]
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "=" => Ok(Self::Eq),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            other => Err(Error::invalid_qualifier(other, "unsupported operator")),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        };
        f.write_str(op)
    }
}

/// A typed qualifier value
#[derive(Debug, Clone, PartialEq)]
pub enum QualValue {
    Int(i64),
    String(String),
    Timestamp(DateTime<Utc>),
    /// Equality candidates, OR-ed within the field
    List(Vec<QualValue>),
}

impl From<i64> for QualValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for QualValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for QualValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for QualValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<QualValue>> From<Vec<T>> for QualValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// One constraint supplied by the query engine
#[derive(Debug, Clone, PartialEq)]
pub struct Qualifier {
    pub name: String,
    pub operator: Operator,
    pub value: QualValue,
}

/// The constraints supplied for one listing, in arrival order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Qualifiers {
    items: Vec<Qualifier>,
}

impl Qualifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality constraint
    #[must_use]
    pub fn eq(self, name: impl Into<String>, value: impl Into<QualValue>) -> Self {
        self.compare(name, Operator::Eq, value)
    }

    /// Add a constraint with an explicit operator
    #[must_use]
    pub fn compare(
        mut self,
        name: impl Into<String>,
        operator: Operator,
        value: impl Into<QualValue>,
    ) -> Self {
        self.push(Qualifier {
            name: name.into(),
            operator,
            value: value.into(),
        });
        self
    }

    pub fn push(&mut self, qualifier: Qualifier) {
        self.items.push(qualifier);
    }

    /// All constraints on `name`
    pub fn get<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Qualifier> + 'a {
        self.items.iter().filter(move |q| q.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Qualifier> {
        self.items.iter()
    }
}

/// Declares how one qualifier is rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifierSpec {
    /// Externally visible qualifier name
    pub name: String,
    /// Accepted value kind
    pub kind: QualKind,
    /// Clause template; `{}` is replaced with the rendered value. For timestamp
    /// qualifiers this is the filter field name.
    pub template: String,
}

/// Qualifier name → kind → clause template, consumed by [`FilterBuilder`](super::FilterBuilder)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualifierTable {
    specs: Vec<QualifierSpec>,
}

impl QualifierTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Integer qualifier, e.g. `int("id", "id:{}")`
    #[must_use]
    pub fn int(self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.with(name, QualKind::Int, template)
    }

    /// String qualifier, e.g. `string("state", "state:{}")`
    #[must_use]
    pub fn string(self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.with(name, QualKind::String, template)
    }

    /// Timestamp qualifier rendered against `field`
    #[must_use]
    pub fn timestamp(self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.with(name, QualKind::Timestamp, field)
    }

    #[must_use]
    pub fn with(
        mut self,
        name: impl Into<String>,
        kind: QualKind,
        template: impl Into<String>,
    ) -> Self {
        self.specs.push(QualifierSpec {
            name: name.into(),
            kind,
            template: template.into(),
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&QualifierSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn specs(&self) -> &[QualifierSpec] {
        &self.specs
    }

    /// Qualifier names the listing cares about
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.name.as_str())
    }
}

/// A built filter: ordered clauses plus whether the driver may page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpression {
    clauses: Vec<String>,
    paginate: bool,
}

impl FilterExpression {
    pub(crate) fn new(clauses: Vec<String>, paginate: bool) -> Self {
        Self { clauses, paginate }
    }

    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    /// False when the caller pinned a `limit:` in the free-text filter
    pub fn paginate(&self) -> bool {
        self.paginate
    }

    /// The clause list as sent in the `filter` variable
    pub fn to_variable(&self) -> JsonValue {
        JsonValue::Array(
            self.clauses
                .iter()
                .map(|c| JsonValue::String(c.clone()))
                .collect(),
        )
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.clauses.join(" "))
    }
}

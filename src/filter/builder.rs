//! Filter builder implementation

use super::types::{
    FilterExpression, Operator, QualKind, QualValue, QualifierSpec, QualifierTable, Qualifiers,
};
use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// Page size requested when the caller has not pinned one
pub const DEFAULT_PAGE_LIMIT: u64 = 5000;

/// Timestamp layout understood by the filter language
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

static LIMIT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)limit:[0-9]+($|\s)").expect("valid limit regex"));

/// True when the free-text filter already carries a `limit:<digits>` token
pub fn has_explicit_limit(text: &str) -> bool {
    LIMIT_REGEX.is_match(text)
}

/// Quote a string literal: backslashes doubled, single quotes escaped, wrapped in `'`
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Render a timestamp in the filter language's layout
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Builds a [`FilterExpression`]
///
/// Clause order is fixed: the free-text filter, then one clause per recognized
/// qualifier in table order, then the `limit:` clause if one is added.
///
/// ```
/// use turbot_access::filter::{FilterBuilder, Qualifiers, QualifierTable};
///
/// let table = QualifierTable::new().int("id", "resourceId:{} level:self");
/// let filter = FilterBuilder::new()
///     .qualifiers(&table, &Qualifiers::new().eq("id", 7_i64))
///     .unwrap()
///     .build();
/// assert_eq!(filter.to_string(), "resourceId:7 level:self limit:5000");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    free_text: Option<String>,
    clauses: Vec<String>,
    limit_hint: Option<u64>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caller-supplied free-text filter, passed through verbatim
    #[must_use]
    pub fn free_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.free_text = (!text.trim().is_empty()).then_some(text);
        self
    }

    /// Row-count hint from the query engine, lowers the page size
    #[must_use]
    pub fn limit_hint(mut self, hint: Option<u64>) -> Self {
        self.limit_hint = hint;
        self
    }

    /// Render every qualifier the table recognizes; others are ignored
    pub fn qualifiers(mut self, table: &QualifierTable, quals: &Qualifiers) -> Result<Self> {
        for spec in table.specs() {
            for qual in quals.get(&spec.name) {
                self.clauses.push(render_clause(spec, qual.operator, &qual.value)?);
            }
        }
        Ok(self)
    }

    /// Append a pre-rendered clause
    #[must_use]
    pub fn clause(mut self, clause: impl Into<String>) -> Self {
        self.clauses.push(clause.into());
        self
    }

    pub fn build(self) -> FilterExpression {
        let user_limit = self.free_text.as_deref().is_some_and(has_explicit_limit);

        let mut clauses = Vec::with_capacity(self.clauses.len() + 2);
        clauses.extend(self.free_text);
        clauses.extend(self.clauses);

        if !user_limit {
            let page_limit = self
                .limit_hint
                .map_or(DEFAULT_PAGE_LIMIT, |hint| hint.min(DEFAULT_PAGE_LIMIT));
            clauses.push(format!("limit:{page_limit}"));
        }

        trace!("Built filter clauses: {:?}", clauses);
        FilterExpression::new(clauses, !user_limit)
    }
}

/// One-shot form of [`FilterBuilder`]
pub fn build_filter(
    table: &QualifierTable,
    quals: &Qualifiers,
    free_text: Option<&str>,
    limit_hint: Option<u64>,
) -> Result<FilterExpression> {
    let mut builder = FilterBuilder::new().limit_hint(limit_hint);
    if let Some(text) = free_text {
        builder = builder.free_text(text);
    }
    Ok(builder.qualifiers(table, quals)?.build())
}

fn render_clause(spec: &QualifierSpec, operator: Operator, value: &QualValue) -> Result<String> {
    match spec.kind {
        QualKind::Timestamp => render_timestamp(spec, operator, value),
        QualKind::Int | QualKind::String => {
            if operator != Operator::Eq {
                return Err(Error::invalid_qualifier(
                    &spec.name,
                    format!("operator '{operator}' is not supported"),
                ));
            }
            let literal = render_literal(spec, value)?;
            Ok(spec.template.replace("{}", &literal))
        }
    }
}

fn render_literal(spec: &QualifierSpec, value: &QualValue) -> Result<String> {
    match (spec.kind, value) {
        (QualKind::Int, QualValue::Int(n)) => Ok(n.to_string()),
        (QualKind::String, QualValue::String(s)) => Ok(quote(s)),
        (_, QualValue::List(values)) if !values.is_empty() => {
            let literals = values
                .iter()
                .map(|v| match v {
                    QualValue::List(_) => Err(Error::invalid_qualifier(
                        &spec.name,
                        "nested lists are not supported",
                    )),
                    other => render_literal(spec, other),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(literals.join(","))
        }
        (_, QualValue::List(_)) => Err(Error::invalid_qualifier(&spec.name, "empty value list")),
        (kind, other) => Err(Error::invalid_qualifier(
            &spec.name,
            format!("expected {kind:?} value, got {other:?}"),
        )),
    }
}

/// Timestamps widen by one minute on range comparisons to absorb the
/// service's coarser granularity
fn render_timestamp(spec: &QualifierSpec, operator: Operator, value: &QualValue) -> Result<String> {
    let QualValue::Timestamp(ts) = value else {
        return Err(Error::invalid_qualifier(
            &spec.name,
            format!("expected Timestamp value, got {value:?}"),
        ));
    };
    let field = &spec.template;
    let clause = match operator {
        Operator::Eq => format!("{field}:'{}'", format_timestamp(ts)),
        Operator::Gt | Operator::Ge => {
            format!("{field}:>='{}'", format_timestamp(&(*ts - Duration::minutes(1))))
        }
        Operator::Lt | Operator::Le => {
            format!("{field}:<='{}'", format_timestamp(&(*ts + Duration::minutes(1))))
        }
    };
    Ok(clause)
}

//! Filter building module
//!
//! Translates typed qualifier constraints into the service's filter language:
//! a whitespace-joined conjunction of `field:value` clauses.
//!
//! # Overview
//!
//! Each listing declares a [`QualifierTable`] mapping qualifier names to a value
//! kind and a clause template. [`FilterBuilder`] renders the qualifiers a query
//! supplies against that table, keeps the caller's free-text filter first, and
//! appends a `limit:` clause unless the free text already pins one.

mod builder;
mod types;

pub use builder::{
    build_filter, format_timestamp, has_explicit_limit, quote, FilterBuilder, DEFAULT_PAGE_LIMIT,
};
pub use types::{
    FilterExpression, Operator, QualKind, QualValue, Qualifier, QualifierSpec, QualifierTable,
    Qualifiers,
};

#[cfg(test)]
mod tests;

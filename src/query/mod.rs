//! Query escaping and construction for the remote CRM.
//!
//! * [`sanitize`] - escaping of literal values
//! * [`builder`] - structured SELECT queries and OR-equality conditions

pub mod builder;
pub mod sanitize;

pub use builder::{
    Comparison, Condition, Literal, OrderBy, SelectQuery, SortDirection, build_or_equals,
};
pub use sanitize::{sanitize, sanitize_legacy};

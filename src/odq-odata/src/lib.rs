//! odq-odata: OData query fragments as a document query model
//!
//! This crate defines the OData `$filter` grammar on top of the
//! [`odq_lang`] expression engine and parses full OData query strings
//! (`$filter`, `$orderby`, `$skip`, `$top`) into a [`DocumentQuery`].
//!
//! The filter tree ([`FilterNode`]) is deliberately database-agnostic:
//! downstream crates translate it into a concrete query representation
//! (see `odq-mongo`), and [`DocumentQuery::apply`] evaluates it directly
//! against in-memory JSON documents.
//!
//! # Quick Start
//!
//! ```rust
//! use odq_odata::DocumentQuery;
//!
//! let query = DocumentQuery::parse("$filter=Age gt 30&$orderby=Name desc&$top=10")?;
//! assert!(query.filter.is_some());
//! assert_eq!(query.top, Some(10));
//! # Ok::<(), odq_odata::ODataError>(())
//! ```
//!
//! # Supported filter syntax
//!
//! - Comparisons: `eq ne gt ge lt le`
//! - Logic: `and`, `or`, `not`, parentheses
//! - Functions: `startswith`, `endswith`, `substringof`, `tolower`,
//!   `toupper`
//! - Literals: `'strings'` (with `''` escaping), numbers, `true`/`false`,
//!   `null`, `datetime'2024-01-02T03:04:05'`
//! - Field paths: `Address/City` (or dotted)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]

pub mod error;
pub mod eval;
pub mod filter;
pub mod node;
pub mod orderby;
pub mod query;

#[cfg(test)]
mod tests;

pub use error::ODataError;
pub use eval::evaluate;
pub use filter::{filter_language, parse_filter};
pub use node::{CompareOp, FilterNode, FilterValue, LogicalOp, StringFunction};
pub use orderby::{OrderByClause, OrderByDirection, OrderByNode};
pub use query::DocumentQuery;

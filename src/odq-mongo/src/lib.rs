//! odq-mongo: MongoDB-style query documents from OData queries
//!
//! Translates a parsed [`DocumentQuery`] into a [`MongoQuerySpec`]: a
//! filter document, an ordered sort document, and skip/limit values, all
//! as plain JSON. The output matches what a MongoDB driver accepts as
//! filter and sort definitions, without this crate depending on any
//! driver.
//!
//! ```rust
//! use odq_mongo::MongoQueryBuilder;
//! use odq_odata::DocumentQuery;
//!
//! let query = DocumentQuery::parse("$filter=Age gt 30&$orderby=Name desc")?;
//! let spec = MongoQueryBuilder::new().build(&query)?;
//! assert_eq!(spec.filter, serde_json::json!({"Age": {"$gt": 30.0}}));
//! assert_eq!(spec.sort, serde_json::json!({"Name": -1}));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]

pub mod builder;
pub mod error;

#[cfg(test)]
mod tests;

pub use builder::{MongoQueryBuilder, MongoQuerySpec};
pub use error::TranslateError;

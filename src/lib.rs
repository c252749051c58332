//! odataq: OData queries for document databases
//!
//! A small stack of crates that turns OData-style query strings into
//! either MongoDB-ready filter/sort documents or results computed
//! directly over in-memory JSON:
//!
//! - [`odq_lang`] — a reusable grammar-driven expression engine
//!   (tokenizer + precedence parser, generic over the produced tree).
//! - [`odq_odata`] — the OData `$filter`/`$orderby`/`$skip`/`$top` layer
//!   built on that engine.
//! - [`odq_mongo`] — translation of parsed queries into MongoDB-style
//!   query documents.
//!
//! This root crate re-exports the main types and offers one-call
//! conveniences:
//!
//! ```rust
//! let spec = odq::build_mongo_query("$filter=Age gt 30&$orderby=Name desc&$top=10")?;
//! assert_eq!(spec.filter, serde_json::json!({"Age": {"$gt": 30.0}}));
//! # Ok::<(), anyhow::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::missing_errors_doc, clippy::uninlined_format_args)]

pub use odq_lang;
pub use odq_mongo;
pub use odq_odata;

pub use odq_mongo::{MongoQueryBuilder, MongoQuerySpec, TranslateError};
pub use odq_odata::{DocumentQuery, FilterNode, ODataError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parses an OData query string into a [`DocumentQuery`].
pub fn parse_query(query: &str) -> Result<DocumentQuery, ODataError> {
    DocumentQuery::parse(query)
}

/// Parses an OData query string and translates it into a MongoDB-style
/// query spec in one step.
pub fn build_mongo_query(query: &str) -> anyhow::Result<MongoQuerySpec> {
    let query = DocumentQuery::parse(query)?;
    Ok(MongoQueryBuilder::new().build(&query)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn query_string_to_mongo_spec() {
        let spec =
            build_mongo_query("$filter=Address/City eq 'Oslo' and Age ge 18&$orderby=Name&$skip=20&$top=10")
                .unwrap();
        assert_eq!(
            spec.filter,
            json!({"$and": [
                {"Address.City": {"$eq": "Oslo"}},
                {"Age": {"$gte": 18.0}},
            ]})
        );
        assert_eq!(spec.sort, json!({"Name": 1}));
        assert_eq!((spec.skip, spec.limit), (Some(20), Some(10)));
    }

    #[test]
    fn query_string_to_in_memory_results() {
        let documents = vec![
            json!({"Name": "Alice", "Age": 34}),
            json!({"Name": "Bob", "Age": 17}),
        ];
        let query = parse_query("$filter=Age ge 18").unwrap();
        let result = query.apply(&documents).unwrap();
        assert_eq!(result, vec![json!({"Name": "Alice", "Age": 34})]);
    }
}

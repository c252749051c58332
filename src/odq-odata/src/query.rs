//! The document query model and OData query-string parsing.

use serde_json::Value;

use crate::error::ODataError;
use crate::eval;
use crate::filter::parse_filter;
use crate::node::FilterNode;
use crate::orderby::OrderByClause;

/// Everything an OData query expression asked for: an optional filter
/// tree, sort fields, and paging.
///
/// Built from a query string such as
/// `$filter=Age gt 30&$orderby=Name desc&$skip=10&$top=5`. Downstream
/// consumers translate it into a database query or apply it in memory via
/// [`apply`](Self::apply).
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct DocumentQuery {
    /// The parsed `$filter` tree, if a filter was given.
    pub filter: Option<FilterNode>,
    /// The parsed `$orderby` clause (empty when absent).
    pub order_by: OrderByClause,
    /// Documents to skip past, from `$skip`.
    pub skip: Option<u64>,
    /// Maximum documents to return, from `$top`.
    pub top: Option<u64>,
}

impl DocumentQuery {
    /// Parses an OData query string.
    ///
    /// Keys are matched case-insensitively and may be url-encoded; keys
    /// other than `$filter`, `$orderby`, `$skip` and `$top` are ignored,
    /// as are keys with empty values. A leading `?` is tolerated.
    pub fn parse(query: &str) -> Result<Self, ODataError> {
        let mut model = DocumentQuery::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            if key.eq_ignore_ascii_case("$filter") {
                model.filter = Some(parse_filter(&value)?);
            } else if key.eq_ignore_ascii_case("$orderby") {
                model.order_by = OrderByClause::parse(&value)?;
            } else if key.eq_ignore_ascii_case("$skip") {
                model.skip = Some(
                    value
                        .parse()
                        .map_err(|_| ODataError::InvalidSkip(value.to_string()))?,
                );
            } else if key.eq_ignore_ascii_case("$top") {
                model.top = Some(
                    value
                        .parse()
                        .map_err(|_| ODataError::InvalidTop(value.to_string()))?,
                );
            } else {
                log::debug!("ignoring unknown query option `{key}`");
            }
        }
        Ok(model)
    }

    /// Applies the query to a slice of JSON documents in memory: filter,
    /// then sort, then skip/top.
    pub fn apply(&self, documents: &[Value]) -> Result<Vec<Value>, ODataError> {
        let mut selected = Vec::new();
        for document in documents {
            let keep = match &self.filter {
                Some(filter) => eval::evaluate(filter, document)?,
                None => true,
            };
            if keep {
                selected.push(document.clone());
            }
        }

        if !self.order_by.is_empty() {
            selected.sort_by(|a, b| eval::compare_documents(a, b, &self.order_by));
        }

        let skip = self
            .skip
            .map_or(0, |skip| usize::try_from(skip).unwrap_or(usize::MAX));
        let top = self
            .top
            .map_or(usize::MAX, |top| usize::try_from(top).unwrap_or(usize::MAX));
        Ok(selected.into_iter().skip(skip).take(top).collect())
    }
}

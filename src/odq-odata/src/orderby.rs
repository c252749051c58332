//! `$orderby` clause parsing.

use crate::error::ODataError;

/// Sort direction of one `$orderby` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum OrderByDirection {
    /// `asc` (the default when no direction is written).
    Ascending,
    /// `desc`.
    Descending,
}

/// One field of an `$orderby` clause.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OrderByNode {
    /// 1-based position within the clause; earlier entries sort first.
    pub sequence: usize,
    /// Field path components, outermost first.
    pub path: Vec<String>,
    /// Sort direction.
    pub direction: OrderByDirection,
}

/// A parsed `$orderby` clause: an ordered list of sort fields.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct OrderByClause {
    /// Sort fields in clause order.
    pub nodes: Vec<OrderByNode>,
}

impl OrderByClause {
    /// Parses a clause like `Name desc, Address/City`.
    ///
    /// Each comma-separated entry is `field` or `field asc|desc`
    /// (direction case-insensitive, ascending by default). Anything else
    /// is rejected: silently dropping a sort key would reorder results
    /// without a diagnostic.
    pub fn parse(expression: &str) -> Result<Self, ODataError> {
        let mut nodes = Vec::new();
        for (index, entry) in expression.split(',').enumerate() {
            let entry = entry.trim();
            let parts: Vec<&str> = entry.split_whitespace().collect();
            let (field, direction) = match parts.as_slice() {
                [field] => (*field, OrderByDirection::Ascending),
                [field, direction] => (*field, Self::parse_direction(direction, entry)?),
                [] => {
                    return Err(ODataError::InvalidOrderBy {
                        entry: entry.to_string(),
                        reason: "empty entry".to_string(),
                    })
                }
                _ => {
                    return Err(ODataError::InvalidOrderBy {
                        entry: entry.to_string(),
                        reason: "expected `field` or `field asc|desc`".to_string(),
                    })
                }
            };
            nodes.push(OrderByNode {
                sequence: index + 1,
                path: field.split(['/', '.']).map(str::to_string).collect(),
                direction,
            });
        }
        Ok(OrderByClause { nodes })
    }

    /// Whether the clause names any sort field.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn parse_direction(direction: &str, entry: &str) -> Result<OrderByDirection, ODataError> {
        if direction.eq_ignore_ascii_case("asc") {
            Ok(OrderByDirection::Ascending)
        } else if direction.eq_ignore_ascii_case("desc") {
            Ok(OrderByDirection::Descending)
        } else {
            Err(ODataError::InvalidOrderBy {
                entry: entry.to_string(),
                reason: format!("unknown direction `{direction}`"),
            })
        }
    }
}

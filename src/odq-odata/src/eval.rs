//! In-memory application of a parsed filter to JSON documents.
//!
//! Documents are `serde_json::Value` objects. Missing fields resolve to
//! null, and null compares equal only to null — so `Age ne 30` matches a
//! document without an `Age` field, the way a document store treats it.

use std::cmp::Ordering;

use serde_json::Value;

use crate::error::ODataError;
use crate::node::{CompareOp, FilterNode, FilterValue, LogicalOp, StringFunction};
use crate::orderby::{OrderByClause, OrderByDirection};

/// Evaluates `filter` as a predicate over `document`.
pub fn evaluate(filter: &FilterNode, document: &Value) -> Result<bool, ODataError> {
    match filter {
        FilterNode::Logical { op, left, right } => match op {
            LogicalOp::And => Ok(evaluate(left, document)? && evaluate(right, document)?),
            LogicalOp::Or => Ok(evaluate(left, document)? || evaluate(right, document)?),
        },
        FilterNode::Not(inner) => Ok(!evaluate(inner, document)?),
        FilterNode::Compare { op, left, right } => {
            let left = resolve(left, document)?;
            let right = resolve(right, document)?;
            Ok(compare(*op, &left, &right))
        }
        FilterNode::Function { function, args } if function.is_predicate() => {
            predicate_function(*function, args, document)
        }
        FilterNode::Value(FilterValue::Bool(flag)) => Ok(*flag),
        other => Err(ODataError::NotAPredicate {
            construct: other.describe(),
        }),
    }
}

/// Resolves a sub-expression to a value relative to `document`.
fn resolve(node: &FilterNode, document: &Value) -> Result<FilterValue, ODataError> {
    match node {
        FilterNode::Value(value) => Ok(value.clone()),
        FilterNode::Property { path } => Ok(json_value(lookup(document, path))),
        FilterNode::Function { function, args } if !function.is_predicate() => {
            let subject = args
                .first()
                .map(|arg| resolve(arg, document))
                .transpose()?;
            Ok(match subject {
                Some(FilterValue::String(text)) => match function {
                    StringFunction::ToLower => FilterValue::String(text.to_lowercase()),
                    StringFunction::ToUpper => FilterValue::String(text.to_uppercase()),
                    _ => FilterValue::Null,
                },
                _ => FilterValue::Null,
            })
        }
        // Predicates, comparisons and connectives resolve to their truth
        // value, so `startswith(Name, 'a') eq false` is expressible.
        other => Ok(FilterValue::Bool(evaluate(other, document)?)),
    }
}

fn predicate_function(
    function: StringFunction,
    args: &[FilterNode],
    document: &Value,
) -> Result<bool, ODataError> {
    let mut resolved = Vec::with_capacity(args.len());
    for arg in args {
        resolved.push(resolve(arg, document)?);
    }
    let (first, second) = match (resolved.first(), resolved.get(1)) {
        (Some(FilterValue::String(a)), Some(FilterValue::String(b))) => (a, b),
        // A null operand (e.g. a missing field) never matches.
        _ => return Ok(false),
    };
    Ok(match function {
        StringFunction::StartsWith => first.starts_with(second.as_str()),
        StringFunction::EndsWith => first.ends_with(second.as_str()),
        // substringof(needle, haystack): the needle comes first.
        StringFunction::SubstringOf => second.contains(first.as_str()),
        StringFunction::ToLower | StringFunction::ToUpper => false,
    })
}

/// Walks a field path through nested objects.
pub(crate) fn lookup<'a>(document: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = document;
    for component in path {
        current = current.as_object()?.get(component)?;
    }
    Some(current)
}

fn json_value(value: Option<&Value>) -> FilterValue {
    match value {
        Some(Value::Bool(flag)) => FilterValue::Bool(*flag),
        Some(Value::Number(number)) => number
            .as_f64()
            .map_or(FilterValue::Null, FilterValue::Number),
        Some(Value::String(text)) => FilterValue::String(text.clone()),
        // Arrays and objects have no scalar comparison; treat like null.
        _ => FilterValue::Null,
    }
}

fn compare(op: CompareOp, left: &FilterValue, right: &FilterValue) -> bool {
    let ordering = order(left, right);
    match op {
        CompareOp::Eq => ordering == Some(Ordering::Equal),
        CompareOp::Ne => ordering != Some(Ordering::Equal),
        CompareOp::Gt => ordering == Some(Ordering::Greater),
        CompareOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        CompareOp::Lt => ordering == Some(Ordering::Less),
        CompareOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
    }
}

/// Ordering between two resolved values; `None` when the types do not
/// compare (which makes every ordering predicate false and `ne` true).
fn order(left: &FilterValue, right: &FilterValue) -> Option<Ordering> {
    use FilterValue::{Bool, DateTime, Null, Number, String};
    match (left, right) {
        (Null, Null) => Some(Ordering::Equal),
        (Number(a), Number(b)) => a.partial_cmp(b),
        (String(a), String(b)) => Some(a.cmp(b)),
        (Bool(a), Bool(b)) => Some(a.cmp(b)),
        (DateTime(a), DateTime(b)) => Some(a.cmp(b)),
        // A datetime literal against a string field (or vice versa)
        // compares chronologically when the string parses.
        (DateTime(a), String(b)) => parse_moment(b).map(|b| a.cmp(&b)),
        (String(a), DateTime(b)) => parse_moment(a).map(|a| a.cmp(b)),
        _ => None,
    }
}

fn parse_moment(text: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    crate::filter::parse_datetime(text)
}

/// Total order over raw JSON values used for `$orderby` sorting: nulls
/// first, then booleans, numbers, strings; arrays and objects last.
pub(crate) fn compare_documents(a: &Value, b: &Value, clause: &OrderByClause) -> Ordering {
    for node in &clause.nodes {
        let left = lookup(a, &node.path);
        let right = lookup(b, &node.path);
        let ordering = compare_sort_values(left, right);
        let ordering = match node.direction {
            OrderByDirection::Ascending => ordering,
            OrderByDirection::Descending => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_sort_values(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (left, right) {
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        _ => rank(left).cmp(&rank(right)),
    }
}

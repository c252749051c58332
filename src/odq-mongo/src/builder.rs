//! Filter-tree to query-document translation.

use serde_json::{json, Map, Value};

use odq_odata::{
    CompareOp, DocumentQuery, FilterNode, FilterValue, LogicalOp, OrderByDirection, StringFunction,
};

use crate::error::TranslateError;

/// A MongoDB-ready rendering of one [`DocumentQuery`]: filter and sort
/// documents plus paging, all as plain JSON.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MongoQuerySpec {
    /// The filter document (`{}` when the query had no `$filter`).
    pub filter: Value,
    /// The sort document, keys in `$orderby` order, `1`/`-1` values.
    pub sort: Value,
    /// Documents to skip, from `$skip`.
    pub skip: Option<u64>,
    /// Maximum documents to return, from `$top`.
    pub limit: Option<u64>,
}

/// Translates [`DocumentQuery`] values into [`MongoQuerySpec`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoQueryBuilder;

impl MongoQueryBuilder {
    /// Creates a builder. The builder is stateless and reusable.
    pub fn new() -> Self {
        MongoQueryBuilder
    }

    /// Renders `query` as filter/sort documents plus paging.
    pub fn build(&self, query: &DocumentQuery) -> Result<MongoQuerySpec, TranslateError> {
        let filter = match &query.filter {
            Some(node) => self.predicate(node)?,
            None => json!({}),
        };

        let mut sort = Map::new();
        for node in &query.order_by.nodes {
            let direction = match node.direction {
                OrderByDirection::Ascending => 1,
                OrderByDirection::Descending => -1,
            };
            sort.insert(node.path.join("."), json!(direction));
        }

        log::debug!("built query spec: filter={filter}, sort keys={}", sort.len());
        Ok(MongoQuerySpec {
            filter,
            sort: Value::Object(sort),
            skip: query.skip,
            limit: query.top,
        })
    }

    /// Renders a filter node that stands as a predicate.
    fn predicate(&self, node: &FilterNode) -> Result<Value, TranslateError> {
        match node {
            FilterNode::Logical { op, left, right } => {
                let connective = match op {
                    LogicalOp::And => "$and",
                    LogicalOp::Or => "$or",
                };
                Ok(json!({
                    connective: [self.predicate(left)?, self.predicate(right)?]
                }))
            }
            FilterNode::Not(inner) => Ok(json!({ "$nor": [self.predicate(inner)?] })),
            FilterNode::Compare { op, left, right } => self.comparison(*op, left, right),
            FilterNode::Function { function, args } if function.is_predicate() => {
                self.regex_predicate(*function, args)
            }
            other => Err(TranslateError::unsupported(other.describe())),
        }
    }

    fn comparison(
        &self,
        op: CompareOp,
        left: &FilterNode,
        right: &FilterNode,
    ) -> Result<Value, TranslateError> {
        match (left, right) {
            // The common shapes: a field against a literal, either way
            // around.
            (FilterNode::Property { path }, FilterNode::Value(value)) => {
                Ok(field_filter(path, op, literal(value)))
            }
            (FilterNode::Value(value), FilterNode::Property { path }) => {
                Ok(field_filter(path, op.flipped(), literal(value)))
            }
            _ => {
                if let Some(result) = self.predicate_comparison(op, left, right)? {
                    return Ok(result);
                }
                // Both sides expressible as aggregation operands (string
                // transformers, field-vs-field) go through $expr. At least
                // one side must involve a field; comparing two constants
                // is a query-authoring mistake, not a filter.
                if !references_property(left) && !references_property(right) {
                    return Err(TranslateError::unsupported(format!(
                        "`{op}` comparison between {} and {}",
                        left.describe(),
                        right.describe()
                    )));
                }
                match (self.operand_expr(left), self.operand_expr(right)) {
                    (Ok(lhs), Ok(rhs)) => Ok(json!({ "$expr": { mongo_op(op): [lhs, rhs] } })),
                    _ => Err(TranslateError::unsupported(format!(
                        "`{op}` comparison between {} and {}",
                        left.describe(),
                        right.describe()
                    ))),
                }
            }
        }
    }

    /// A predicate compared against a boolean literal, e.g.
    /// `startswith(Name, 'A') eq false`.
    fn predicate_comparison(
        &self,
        op: CompareOp,
        left: &FilterNode,
        right: &FilterNode,
    ) -> Result<Option<Value>, TranslateError> {
        let (node, flag) = match (left, right) {
            (FilterNode::Value(FilterValue::Bool(flag)), node) if is_predicate_node(node) => {
                (node, *flag)
            }
            (node, FilterNode::Value(FilterValue::Bool(flag))) if is_predicate_node(node) => {
                (node, *flag)
            }
            _ => return Ok(None),
        };
        let expected = match op {
            CompareOp::Eq => flag,
            CompareOp::Ne => !flag,
            _ => {
                return Err(TranslateError::unsupported(format!(
                    "`{op}` ordering of {}",
                    node.describe()
                )))
            }
        };
        let inner = self.predicate(node)?;
        Ok(Some(if expected {
            inner
        } else {
            json!({ "$nor": [inner] })
        }))
    }

    /// A node as an aggregation-expression operand for `$expr`.
    fn operand_expr(&self, node: &FilterNode) -> Result<Value, TranslateError> {
        match node {
            FilterNode::Property { path } => Ok(json!(format!("${}", path.join(".")))),
            FilterNode::Value(value) => Ok(literal(value)),
            FilterNode::Function { function, args } if !function.is_predicate() => {
                let operator = match function {
                    StringFunction::ToLower => "$toLower",
                    StringFunction::ToUpper => "$toUpper",
                    _ => return Err(TranslateError::unsupported(node.describe())),
                };
                let subject = args
                    .first()
                    .ok_or_else(|| TranslateError::unsupported(node.describe()))?;
                Ok(json!({ operator: self.operand_expr(subject)? }))
            }
            other => Err(TranslateError::unsupported(other.describe())),
        }
    }

    /// String predicates become anchored `$regex` filters with the
    /// literal escaped.
    fn regex_predicate(
        &self,
        function: StringFunction,
        args: &[FilterNode],
    ) -> Result<Value, TranslateError> {
        let shape_error = || {
            TranslateError::unsupported(format!(
                "`{function}` call without a field and string literal"
            ))
        };

        let (path, pattern) = match function {
            StringFunction::StartsWith | StringFunction::EndsWith => match args {
                [FilterNode::Property { path }, FilterNode::Value(FilterValue::String(text))] => {
                    let escaped = regex::escape(text);
                    let pattern = if function == StringFunction::StartsWith {
                        format!("^{escaped}")
                    } else {
                        format!("{escaped}$")
                    };
                    (path, pattern)
                }
                _ => return Err(shape_error()),
            },
            // substringof(needle, field): the needle comes first.
            StringFunction::SubstringOf => match args {
                [FilterNode::Value(FilterValue::String(text)), FilterNode::Property { path }] => {
                    (path, regex::escape(text))
                }
                _ => return Err(shape_error()),
            },
            StringFunction::ToLower | StringFunction::ToUpper => return Err(shape_error()),
        };

        Ok(json!({ path.join("."): { "$regex": pattern } }))
    }
}

fn references_property(node: &FilterNode) -> bool {
    match node {
        FilterNode::Property { .. } => true,
        FilterNode::Function { args, .. } => args.iter().any(references_property),
        _ => false,
    }
}

fn is_predicate_node(node: &FilterNode) -> bool {
    match node {
        FilterNode::Function { function, .. } => function.is_predicate(),
        FilterNode::Compare { .. } | FilterNode::Logical { .. } | FilterNode::Not(_) => true,
        _ => false,
    }
}

fn field_filter(path: &[String], op: CompareOp, value: Value) -> Value {
    json!({ path.join("."): { mongo_op(op): value } })
}

fn mongo_op(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Eq => "$eq",
        CompareOp::Ne => "$ne",
        CompareOp::Gt => "$gt",
        CompareOp::Ge => "$gte",
        CompareOp::Lt => "$lt",
        CompareOp::Le => "$lte",
    }
}

fn literal(value: &FilterValue) -> Value {
    match value {
        FilterValue::String(text) => json!(text),
        FilterValue::Number(number) => json!(number),
        FilterValue::Bool(flag) => json!(flag),
        FilterValue::Null => Value::Null,
        FilterValue::DateTime(moment) => json!(moment.to_rfc3339()),
    }
}

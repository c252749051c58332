//! The expression tree produced by parsing an OData `$filter` fragment.

use std::fmt;

use chrono::{DateTime, Utc};

/// A literal value appearing in a filter expression.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum FilterValue {
    /// A quoted string literal, unescaped.
    String(String),
    /// A numeric literal.
    Number(f64),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
    /// A `datetime'...'` literal, normalized to UTC.
    DateTime(DateTime<Utc>),
}

/// A comparison operator (`eq ne gt ge lt le`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum CompareOp {
    /// `eq`
    Eq,
    /// `ne`
    Ne,
    /// `gt`
    Gt,
    /// `ge`
    Ge,
    /// `lt`
    Lt,
    /// `le`
    Le,
}

impl CompareOp {
    /// The operator with its operand sides swapped, e.g. `5 gt Age`
    /// becomes `Age lt 5`.
    pub fn flipped(self) -> CompareOp {
        match self {
            CompareOp::Eq => CompareOp::Eq,
            CompareOp::Ne => CompareOp::Ne,
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Ge => CompareOp::Le,
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Le => CompareOp::Ge,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::Gt => "gt",
            CompareOp::Ge => "ge",
            CompareOp::Lt => "lt",
            CompareOp::Le => "le",
        })
    }
}

/// A logical connective (`and`, `or`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum LogicalOp {
    /// `and`
    And,
    /// `or`
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        })
    }
}

/// A built-in string function of the filter language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum StringFunction {
    /// `startswith(field, prefix)` — predicate.
    StartsWith,
    /// `endswith(field, suffix)` — predicate.
    EndsWith,
    /// `substringof(needle, field)` — predicate; note the needle comes
    /// first, per the OData v3 signature.
    SubstringOf,
    /// `tolower(field)` — string transformer.
    ToLower,
    /// `toupper(field)` — string transformer.
    ToUpper,
}

impl StringFunction {
    /// The function's name as written in filter expressions.
    pub fn name(self) -> &'static str {
        match self {
            StringFunction::StartsWith => "startswith",
            StringFunction::EndsWith => "endswith",
            StringFunction::SubstringOf => "substringof",
            StringFunction::ToLower => "tolower",
            StringFunction::ToUpper => "toupper",
        }
    }

    /// Whether the function yields a boolean rather than a string.
    pub fn is_predicate(self) -> bool {
        matches!(
            self,
            StringFunction::StartsWith | StringFunction::EndsWith | StringFunction::SubstringOf
        )
    }
}

impl fmt::Display for StringFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One node of a parsed `$filter` expression.
///
/// This is the node type the OData [`Language`](odq_lang::Language) is
/// instantiated with; downstream consumers translate it into a concrete
/// query representation or evaluate it directly.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum FilterNode {
    /// A literal value.
    Value(FilterValue),

    /// A field path, e.g. `Address/City` becomes `["Address", "City"]`.
    Property {
        /// Path components, outermost first.
        path: Vec<String>,
    },

    /// A comparison between two sub-expressions.
    Compare {
        /// The comparison operator.
        op: CompareOp,
        /// Left-hand side.
        left: Box<FilterNode>,
        /// Right-hand side.
        right: Box<FilterNode>,
    },

    /// A logical connective between two predicates.
    Logical {
        /// `and` or `or`.
        op: LogicalOp,
        /// Left-hand side.
        left: Box<FilterNode>,
        /// Right-hand side.
        right: Box<FilterNode>,
    },

    /// Negation of a predicate.
    Not(Box<FilterNode>),

    /// A string function applied to arguments, in source order.
    Function {
        /// Which function.
        function: StringFunction,
        /// The arguments, in source order.
        args: Vec<FilterNode>,
    },
}

impl FilterNode {
    /// A short name for the node's construct, used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            FilterNode::Value(FilterValue::String(_)) => "string literal".to_string(),
            FilterNode::Value(FilterValue::Number(_)) => "number literal".to_string(),
            FilterNode::Value(FilterValue::Bool(_)) => "boolean literal".to_string(),
            FilterNode::Value(FilterValue::Null) => "null literal".to_string(),
            FilterNode::Value(FilterValue::DateTime(_)) => "datetime literal".to_string(),
            FilterNode::Property { path } => format!("property `{}`", path.join("/")),
            FilterNode::Compare { op, .. } => format!("`{op}` comparison"),
            FilterNode::Logical { op, .. } => format!("`{op}` expression"),
            FilterNode::Not(_) => "`not` expression".to_string(),
            FilterNode::Function { function, .. } => format!("`{function}` call"),
        }
    }
}

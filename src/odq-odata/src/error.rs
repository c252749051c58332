//! Error type for the OData query layer.

/// Errors raised while parsing or applying an OData query.
#[derive(Debug, thiserror::Error)]
pub enum ODataError {
    /// The `$filter` expression failed to compile.
    #[error("invalid $filter expression: {0}")]
    Filter(#[from] odq_lang::ParseError),

    /// An `$orderby` entry could not be understood.
    #[error("invalid $orderby entry `{entry}`: {reason}")]
    InvalidOrderBy {
        /// The offending comma-separated entry, trimmed.
        entry: String,
        /// Why it was rejected.
        reason: String,
    },

    /// `$skip` was not a non-negative integer.
    #[error("invalid $skip value `{0}`: expected a non-negative integer")]
    InvalidSkip(String),

    /// `$top` was not a non-negative integer.
    #[error("invalid $top value `{0}`: expected a non-negative integer")]
    InvalidTop(String),

    /// A filter sub-expression was used as a predicate but does not
    /// produce a boolean.
    #[error("{construct} cannot be evaluated as a predicate")]
    NotAPredicate {
        /// Description of the offending construct.
        construct: String,
    },
}

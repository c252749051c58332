//! Error type for the translation layer.

/// Errors raised while translating a filter tree into query documents.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TranslateError {
    /// The filter construct has no MongoDB filter-document equivalent,
    /// e.g. a comparison between two literals or a bare property used as
    /// a predicate.
    #[error("cannot translate {construct} into a filter document")]
    Unsupported {
        /// Description of the offending construct.
        construct: String,
    },
}

impl TranslateError {
    pub(crate) fn unsupported(construct: impl Into<String>) -> Self {
        TranslateError::Unsupported {
            construct: construct.into(),
        }
    }
}

//! Error types for grammar construction and compilation.
//!
//! Every parse-time failure carries the [`Segment`]s needed to point at the
//! exact offending span of the original input. There are no warnings: every
//! irregularity aborts the current compile call.

use crate::segment::Segment;

/// Errors detected while constructing a [`Language`](crate::Language).
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    /// Two grammar definitions share a name.
    #[error("duplicate grammar definition name `{name}`")]
    DuplicateDefinition {
        /// The name declared more than once.
        name: String,
    },

    /// A close-bracket definition names an opener or delimiter that does
    /// not exist in the grammar.
    #[error("definition `{referenced_by}` references unknown definition `{name}`")]
    UnknownReference {
        /// The name that failed to resolve.
        name: String,
        /// The definition holding the dangling reference.
        referenced_by: String,
    },

    /// A definition's pattern is not a valid regex, or the combined
    /// grammar pattern failed to compile.
    #[error("definition `{name}` has an invalid pattern")]
    InvalidPattern {
        /// The offending definition's name.
        name: String,
        /// The regex compiler's diagnosis.
        #[source]
        source: regex::Error,
    },
}

/// Errors detected while compiling an input string.
///
/// All variants abort the compile call immediately; the engine performs no
/// recovery and produces no partial tree.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    /// A run of input text matches no grammar pattern.
    #[error("unrecognised input `{}` at offset {}", .segment.text(), .segment.start())]
    UnrecognizedSpan {
        /// The unmatched run of characters.
        segment: Segment,
    },

    /// An operator or function needed an operand that was not present.
    #[error("operator `{}` at offset {} expected an operand", .operator.text(), .operator.start())]
    OperandExpected {
        /// The operator that went unsatisfied.
        operator: Segment,
        /// Zero-width position where the operand should have appeared.
        expected: Segment,
    },

    /// An operand appeared with no operator left to consume it.
    #[error("unexpected operand `{}` at offset {}", .operand.text(), .operand.start())]
    OperandUnexpected {
        /// The last consumed operator, or the boundary after the previous
        /// operand when no operator was involved.
        operator: Segment,
        /// The extra, unconsumed operand.
        operand: Segment,
    },

    /// A close bracket does not match the innermost open bracket.
    #[error(
        "bracket `{}` at offset {} does not close `{}` at offset {}",
        .close.text(), .close.start(), .open.text(), .open.start()
    )]
    BracketMismatch {
        /// The close token.
        close: Segment,
        /// The innermost open marker it failed to match.
        open: Segment,
    },

    /// An open bracket was never closed, or a close bracket found nothing
    /// open.
    #[error("unmatched bracket `{}` at offset {}", .segment.text(), .segment.start())]
    UnmatchedBracket {
        /// The unmatched bracket token.
        segment: Segment,
    },

    /// A list delimiter appeared outside any function-call scope.
    #[error("list delimiter `{}` at offset {} is not inside a function call", .segment.text(), .segment.start())]
    MisplacedDelimiter {
        /// The delimiter token.
        segment: Segment,
    },

    /// A function call received a number of arguments different from its
    /// declared count.
    #[error(
        "function `{}` at offset {} expected {expected} argument(s) but received {actual}",
        .function.text(), .function.start()
    )]
    ArgumentCount {
        /// The function-call token.
        function: Segment,
        /// The declared argument count.
        expected: usize,
        /// The number of arguments actually supplied.
        actual: usize,
    },

    /// A builder callback rejected its input.
    #[error("{message} (at `{}`, offset {})", .segment.text(), .segment.start())]
    Build {
        /// The token or reduction the builder was invoked for.
        segment: Segment,
        /// The builder's own message.
        message: String,
    },
}

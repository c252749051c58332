//! Declarative descriptions of token kinds and their parsing behavior.

use std::fmt;

/// Which side of an operator a parameter is consumed from.
///
/// A binary operator lists `[Left, Right]`; a prefix operator lists
/// `[Right]`; a postfix operator lists `[Left]`. The list's length is the
/// operator's arity, and builder callbacks always receive their children
/// in source order regardless of the positions declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativePosition {
    /// The parameter sits before the operator in the source text.
    Left,
    /// The parameter sits after the operator in the source text.
    Right,
}

/// Builder for operand tokens: receives the matched text.
pub type OperandBuilder<N> = Box<dyn Fn(&str) -> Result<N, String> + Send + Sync>;

/// Builder for operators and function calls: receives child nodes in
/// source order.
pub type NodeListBuilder<N> = Box<dyn Fn(Vec<N>) -> Result<N, String> + Send + Sync>;

/// The role a grammar definition plays during parsing.
///
/// The set of roles is closed; the parser matches exhaustively over it.
pub enum GrammarKind<N> {
    /// A value token; its builder turns the matched text into a node.
    Operand {
        /// Turns the matched text into a node.
        build: OperandBuilder<N>,
    },
    /// A unary or binary operator.
    Operator {
        /// Reduction order: a **lower number binds tighter**. Equal
        /// precedence resolves left to right.
        precedence: u32,
        /// Sides the operands are consumed from; the length is the arity.
        positions: Vec<RelativePosition>,
        /// Combines the consumed child nodes into one.
        build: NodeListBuilder<N>,
    },
    /// An opening bracket for grouping; a pure marker.
    BracketOpen,
    /// A closing bracket.
    BracketClose {
        /// Names of the definitions this token may legally close
        /// ([`BracketOpen`](GrammarKind::BracketOpen) or
        /// [`FunctionCall`](GrammarKind::FunctionCall) definitions).
        openers: Vec<String>,
        /// Name of the [`ListDelimiter`](GrammarKind::ListDelimiter)
        /// definition separating arguments inside the closed scope, if any.
        delimiter: Option<String>,
    },
    /// A function-call opener, e.g. a name fused with an opening symbol
    /// (`sin(`). Closed by a `BracketClose` that lists it as an opener.
    FunctionCall {
        /// Declared argument count; `None` accepts any number.
        args: Option<usize>,
        /// Combines the accumulated argument nodes into one.
        build: NodeListBuilder<N>,
    },
    /// Separates arguments inside a function call's bracket scope.
    ListDelimiter,
    /// Matched and discarded, never emitted as a token (e.g. whitespace).
    Ignored,
}

impl<N> GrammarKind<N> {
    fn tag(&self) -> &'static str {
        match self {
            GrammarKind::Operand { .. } => "Operand",
            GrammarKind::Operator { .. } => "Operator",
            GrammarKind::BracketOpen => "BracketOpen",
            GrammarKind::BracketClose { .. } => "BracketClose",
            GrammarKind::FunctionCall { .. } => "FunctionCall",
            GrammarKind::ListDelimiter => "ListDelimiter",
            GrammarKind::Ignored => "Ignored",
        }
    }
}

/// One token kind of a language: a unique name, a regex pattern, and the
/// role the matched token plays during parsing.
///
/// Definitions are supplied to [`Language::new`](crate::Language::new) in
/// declaration order, which doubles as match priority when several
/// patterns could match at the same position.
pub struct GrammarDefinition<N> {
    name: String,
    pattern: String,
    kind: GrammarKind<N>,
}

impl<N> GrammarDefinition<N> {
    /// Creates a definition from its raw parts.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>, kind: GrammarKind<N>) -> Self {
        GrammarDefinition {
            name: name.into(),
            pattern: pattern.into(),
            kind,
        }
    }

    /// An operand: `build` receives the matched text.
    pub fn operand(
        name: impl Into<String>,
        pattern: impl Into<String>,
        build: impl Fn(&str) -> Result<N, String> + Send + Sync + 'static,
    ) -> Self {
        Self::new(
            name,
            pattern,
            GrammarKind::Operand {
                build: Box::new(build),
            },
        )
    }

    /// An operator with explicit parameter positions. `build` receives the
    /// consumed children in source order.
    pub fn operator(
        name: impl Into<String>,
        pattern: impl Into<String>,
        precedence: u32,
        positions: &[RelativePosition],
        build: impl Fn(Vec<N>) -> Result<N, String> + Send + Sync + 'static,
    ) -> Self {
        Self::new(
            name,
            pattern,
            GrammarKind::Operator {
                precedence,
                positions: positions.to_vec(),
                build: Box::new(build),
            },
        )
    }

    /// A binary infix operator (`[Left, Right]`).
    pub fn binary_operator(
        name: impl Into<String>,
        pattern: impl Into<String>,
        precedence: u32,
        build: impl Fn(Vec<N>) -> Result<N, String> + Send + Sync + 'static,
    ) -> Self {
        Self::operator(
            name,
            pattern,
            precedence,
            &[RelativePosition::Left, RelativePosition::Right],
            build,
        )
    }

    /// A unary prefix operator (`[Right]`).
    pub fn prefix_operator(
        name: impl Into<String>,
        pattern: impl Into<String>,
        precedence: u32,
        build: impl Fn(Vec<N>) -> Result<N, String> + Send + Sync + 'static,
    ) -> Self {
        Self::operator(name, pattern, precedence, &[RelativePosition::Right], build)
    }

    /// An opening bracket used for grouping.
    pub fn bracket_open(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(name, pattern, GrammarKind::BracketOpen)
    }

    /// A closing bracket. `openers` names the definitions it may close;
    /// `delimiter` names the list delimiter usable inside the scope.
    pub fn bracket_close(
        name: impl Into<String>,
        pattern: impl Into<String>,
        openers: &[&str],
        delimiter: Option<&str>,
    ) -> Self {
        Self::new(
            name,
            pattern,
            GrammarKind::BracketClose {
                openers: openers.iter().map(|s| (*s).to_string()).collect(),
                delimiter: delimiter.map(str::to_string),
            },
        )
    }

    /// A function-call opener with a declared argument count (`None`
    /// accepts any number). `build` receives the arguments in source order.
    pub fn function_call(
        name: impl Into<String>,
        pattern: impl Into<String>,
        args: Option<usize>,
        build: impl Fn(Vec<N>) -> Result<N, String> + Send + Sync + 'static,
    ) -> Self {
        Self::new(
            name,
            pattern,
            GrammarKind::FunctionCall {
                args,
                build: Box::new(build),
            },
        )
    }

    /// An argument-list delimiter, e.g. the comma in `log(1024, 2)`.
    pub fn list_delimiter(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(name, pattern, GrammarKind::ListDelimiter)
    }

    /// A pattern that is matched and discarded, e.g. whitespace.
    pub fn ignored(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(name, pattern, GrammarKind::Ignored)
    }

    /// The definition's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The definition's regex pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The definition's parsing role.
    pub fn kind(&self) -> &GrammarKind<N> {
        &self.kind
    }

    /// Whether matched text is discarded instead of emitted as a token.
    pub fn is_ignored(&self) -> bool {
        matches!(self.kind, GrammarKind::Ignored)
    }
}

impl<N> fmt::Debug for GrammarDefinition<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrammarDefinition")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("kind", &self.kind.tag())
            .finish()
    }
}

//! odq-lang: grammar-driven expression compiler
//!
//! This crate provides a small, reusable text-to-tree compiler engine. A
//! caller describes a language as an ordered list of [`GrammarDefinition`]s
//! (token patterns, operator precedences, bracket and function rules) and
//! receives a [`Language`] that compiles query strings into a tree of the
//! caller's own node type, reporting source-located errors.
//!
//! # Quick Start
//!
//! ```rust
//! use odq_lang::{GrammarDefinition, Language, RelativePosition};
//!
//! let language: Language<f64> = Language::new(vec![
//!     GrammarDefinition::operator(
//!         "PLUS",
//!         r"\+",
//!         1,
//!         &[RelativePosition::Left, RelativePosition::Right],
//!         |args| Ok(args[0] + args[1]),
//!     ),
//!     GrammarDefinition::operand("NUMBER", r"\d*\.?\d+", |text| {
//!         text.parse::<f64>().map_err(|e| e.to_string())
//!     }),
//!     GrammarDefinition::ignored("WHITESPACE", r"\s+"),
//! ])?;
//!
//! assert_eq!(language.compile("1 + 2 + 3 + 5")?, 11.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Design
//!
//! - **Tokenizer**: every definition's pattern is combined into a single
//!   alternation regex. Declaration order is match priority, and any input
//!   the grammar does not cover is a hard [`ParseError::UnrecognizedSpan`].
//! - **Parser**: an operator-precedence (shunting-yard) reduction over two
//!   explicit stacks. Precedence numbers are a total order where a **lower
//!   number binds tighter** (multiplication gets a smaller number than
//!   addition); equal precedence resolves left to right.
//! - **Nodes**: the engine is generic over the node type produced by the
//!   grammar's builder callbacks. It never inspects a node, it only threads
//!   nodes through the reduction stacks.
//!
//! Compilation is a pure function of (grammar, input): a [`Language`] is
//! immutable after construction and safe to share across threads.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::type_complexity,
    clippy::uninlined_format_args
)]

pub mod error;
pub mod grammar;
pub mod language;
pub mod parser;
pub mod segment;
pub mod tokenizer;


pub use error::{GrammarError, ParseError};
pub use grammar::{GrammarDefinition, GrammarKind, RelativePosition};
pub use language::Language;
pub use parser::Parser;
pub use segment::Segment;
pub use tokenizer::{Token, TokenStream, Tokenizer};

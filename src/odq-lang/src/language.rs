//! The facade binding a grammar to a tokenizer/parser pair.

use crate::error::{GrammarError, ParseError};
use crate::grammar::{GrammarDefinition, GrammarKind};
use crate::parser::Parser;
use crate::tokenizer::Tokenizer;

/// A compiled mini-language: one grammar bound to a [`Tokenizer`] and a
/// [`Parser`], exposing a single compile-text-to-tree entry point.
///
/// Construction validates the grammar (unique names, resolvable
/// references, compilable patterns); afterwards the language is immutable.
/// [`compile`](Self::compile) is a pure function of the grammar and the
/// input, so one instance can serve any number of callers concurrently.
#[derive(Debug)]
pub struct Language<N> {
    tokenizer: Tokenizer<N>,
    parser: Parser,
}

impl<N> Language<N> {
    /// Builds a language from grammar definitions, in declaration order
    /// (which doubles as match priority during tokenizing).
    pub fn new(definitions: Vec<GrammarDefinition<N>>) -> Result<Self, GrammarError> {
        Self::check_references(&definitions)?;
        Ok(Language {
            tokenizer: Tokenizer::new(definitions)?,
            parser: Parser::new(),
        })
    }

    /// Compiles `text` into a single node of the grammar's tree type.
    pub fn compile(&self, text: &str) -> Result<N, ParseError> {
        log::trace!("compiling {} byte(s) of input", text.len());
        let tokens = self.tokenizer.tokenize(text);
        self.parser.parse(tokens.source_arc(), tokens)
    }

    /// The tokenizer half of the language, for callers that want the raw
    /// token stream.
    pub fn tokenizer(&self) -> &Tokenizer<N> {
        &self.tokenizer
    }

    /// Every name a close-bracket definition references must resolve to a
    /// definition in this grammar. The original formulation used direct
    /// object references, which could not dangle; names can.
    fn check_references(definitions: &[GrammarDefinition<N>]) -> Result<(), GrammarError> {
        let known: std::collections::HashSet<&str> =
            definitions.iter().map(GrammarDefinition::name).collect();
        for definition in definitions {
            if let GrammarKind::BracketClose { openers, delimiter } = definition.kind() {
                for name in openers
                    .iter()
                    .map(String::as_str)
                    .chain(delimiter.as_deref())
                {
                    if !known.contains(name) {
                        return Err(GrammarError::UnknownReference {
                            name: name.to_string(),
                            referenced_by: definition.name().to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

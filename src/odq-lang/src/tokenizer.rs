//! Converts a string into a stream of tokens.

use std::sync::Arc;

use regex::Regex;

use crate::error::{GrammarError, ParseError};
use crate::grammar::GrammarDefinition;
use crate::segment::Segment;

/// A matched span of input text, tagged with the grammar definition that
/// matched it. Created by the [`Tokenizer`], consumed once by the parser.
#[derive(Debug)]
pub struct Token<'g, N> {
    /// The definition whose pattern matched.
    pub definition: &'g GrammarDefinition<N>,
    /// Where in the source the match sits.
    pub segment: Segment,
}

impl<N> Token<'_, N> {
    /// The matched text.
    pub fn text(&self) -> &str {
        self.segment.text()
    }
}

/// Splits input text into [`Token`]s according to a set of grammar
/// definitions.
///
/// All definition patterns are combined into a single alternation regex,
/// one uniquely named capture group per definition, in declaration order.
/// The regex engine's leftmost-first alternation makes declaration order
/// the match priority when several patterns could match at one position.
#[derive(Debug)]
pub struct Tokenizer<N> {
    definitions: Vec<GrammarDefinition<N>>,
    matcher: Regex,
    groups: Vec<String>,
}

impl<N> Tokenizer<N> {
    /// Compiles `definitions` into a tokenizer.
    ///
    /// Fails if two definitions share a name or a pattern does not compile.
    pub fn new(definitions: Vec<GrammarDefinition<N>>) -> Result<Self, GrammarError> {
        let mut seen = std::collections::HashSet::new();
        for definition in &definitions {
            if !seen.insert(definition.name()) {
                return Err(GrammarError::DuplicateDefinition {
                    name: definition.name().to_string(),
                });
            }
        }

        let groups: Vec<String> = (0..definitions.len()).map(|i| format!("g{i}")).collect();
        let pattern = definitions
            .iter()
            .zip(&groups)
            .map(|(definition, group)| format!("(?P<{group}>{})", definition.pattern()))
            .collect::<Vec<_>>()
            .join("|");

        let matcher = Regex::new(&pattern).map_err(|source| {
            // Attribute the failure to the definition whose pattern is at
            // fault; the combined pattern's own error is unreadable.
            for definition in &definitions {
                if let Err(source) = Regex::new(definition.pattern()) {
                    return GrammarError::InvalidPattern {
                        name: definition.name().to_string(),
                        source,
                    };
                }
            }
            GrammarError::InvalidPattern {
                name: "<combined grammar pattern>".to_string(),
                source,
            }
        })?;

        Ok(Tokenizer {
            definitions,
            matcher,
            groups,
        })
    }

    /// The definitions this tokenizer was built from, in declaration order.
    pub fn definitions(&self) -> &[GrammarDefinition<N>] {
        &self.definitions
    }

    /// Converts `text` into a lazy stream of tokens.
    ///
    /// The stream is finite and restartable: each call rescans from the
    /// start of `text`. Input not covered by any pattern surfaces as a
    /// [`ParseError::UnrecognizedSpan`] item, after which the stream ends.
    pub fn tokenize(&self, text: &str) -> TokenStream<'_, N> {
        TokenStream {
            tokenizer: self,
            source: Arc::from(text),
            cursor: 0,
            done: false,
        }
    }

    fn matched_definition<'g>(&'g self, caps: &regex::Captures<'_>) -> &'g GrammarDefinition<N> {
        self.groups
            .iter()
            .position(|group| caps.name(group).is_some())
            .map(|index| &self.definitions[index])
            .expect("composite match without a capturing group")
    }
}

/// Lazy iterator over the tokens of one input string.
///
/// Yields `Err` at most once (the first unrecognized span) and then ends.
#[derive(Debug)]
pub struct TokenStream<'t, N> {
    tokenizer: &'t Tokenizer<N>,
    source: Arc<str>,
    cursor: usize,
    done: bool,
}

impl<N> TokenStream<'_, N> {
    /// Shared handle to the text being tokenized.
    pub fn source_arc(&self) -> Arc<str> {
        self.source.clone()
    }

    fn unrecognized(&mut self, start: usize, len: usize) -> ParseError {
        self.done = true;
        ParseError::UnrecognizedSpan {
            segment: Segment::new(self.source.clone(), start, len),
        }
    }
}

impl<'t, N> Iterator for TokenStream<'t, N> {
    type Item = Result<Token<'t, N>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done || self.cursor >= self.source.len() {
                return None;
            }

            let Some(caps) = self.tokenizer.matcher.captures_at(&self.source, self.cursor)
            else {
                // Nothing matches from here to the end of the input.
                let (start, len) = (self.cursor, self.source.len() - self.cursor);
                return Some(Err(self.unrecognized(start, len)));
            };
            let matched = caps.get(0).expect("captures without a whole match");

            if matched.start() > self.cursor {
                // The gap between the cursor and the match is
                // un-tokenizable input.
                let (start, len) = (self.cursor, matched.start() - self.cursor);
                return Some(Err(self.unrecognized(start, len)));
            }

            if matched.is_empty() {
                // A zero-width match cannot advance the scan; the character
                // under the cursor is effectively unmatched.
                let len = self.source[self.cursor..]
                    .chars()
                    .next()
                    .map_or(0, char::len_utf8);
                let start = self.cursor;
                return Some(Err(self.unrecognized(start, len)));
            }

            self.cursor = matched.end();
            let definition = self.tokenizer.matched_definition(&caps);
            if definition.is_ignored() {
                continue;
            }

            return Some(Ok(Token {
                definition,
                segment: Segment::new(
                    self.source.clone(),
                    matched.start(),
                    matched.end() - matched.start(),
                ),
            }));
        }
    }
}

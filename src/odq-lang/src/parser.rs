//! Operator-precedence reduction of a token stream into a single node.

use std::sync::Arc;

use crate::error::ParseError;
use crate::grammar::{GrammarDefinition, GrammarKind, RelativePosition};
use crate::segment::Segment;
use crate::tokenizer::Token;

/// Executes a shunting-yard reduction over a token stream, producing the
/// single root node of the caller's tree type or the first located error.
///
/// The parser keeps two explicit stacks: an operand stack of built nodes
/// and a control stack of pending operators and open bracket/function
/// scopes. It additionally tracks whether the grammar position expects an
/// operand or an operator, which is what lets errors name the exact token
/// that broke the expression instead of a generic "syntax error".
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser;

impl Parser {
    /// Creates a parser. The parser is stateless; per-call state lives on
    /// the stacks allocated inside [`parse`](Self::parse).
    pub fn new() -> Self {
        Parser
    }

    /// Reduces `tokens` to a single node.
    ///
    /// `source` is the text the tokens were produced from; it anchors the
    /// zero-width segments of errors reported at the ends of the input.
    pub fn parse<'g, N: 'g, I>(&self, source: Arc<str>, tokens: I) -> Result<N, ParseError>
    where
        I: IntoIterator<Item = Result<Token<'g, N>, ParseError>>,
    {
        let mut state = ParseState::new(source);
        for token in tokens {
            state.apply(token?)?;
        }
        state.finish()
    }
}

/// Whether the next token should supply a value or combine values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Operand,
    Operator,
}

struct OperandEntry<N> {
    node: N,
    segment: Segment,
}

struct ScopeFrame<'g, N> {
    definition: &'g GrammarDefinition<N>,
    segment: Segment,
    /// Operand-stack depth when the scope opened; operands below it belong
    /// to the surrounding expression.
    floor: usize,
    /// Completed argument nodes, in source order (function scopes only).
    arguments: Vec<OperandEntry<N>>,
    /// Whether a list delimiter has been seen in this scope.
    delimited: bool,
}

enum ControlEntry<'g, N> {
    Operator {
        definition: &'g GrammarDefinition<N>,
        segment: Segment,
    },
    Scope(ScopeFrame<'g, N>),
}

struct ParseState<'g, N> {
    source: Arc<str>,
    operands: Vec<OperandEntry<N>>,
    control: Vec<ControlEntry<'g, N>>,
    expect: Expect,
    last_operator: Option<Segment>,
}

impl<'g, N> ParseState<'g, N> {
    fn new(source: Arc<str>) -> Self {
        ParseState {
            source,
            operands: Vec::new(),
            control: Vec::new(),
            expect: Expect::Operand,
            last_operator: None,
        }
    }

    fn apply(&mut self, token: Token<'g, N>) -> Result<(), ParseError> {
        match token.definition.kind() {
            GrammarKind::Operand { build } => {
                self.expect_operand_position(&token)?;
                let node = build(token.text()).map_err(|message| ParseError::Build {
                    segment: token.segment.clone(),
                    message,
                })?;
                self.operands.push(OperandEntry {
                    node,
                    segment: token.segment,
                });
                self.expect = Expect::Operator;
            }

            GrammarKind::Operator {
                precedence,
                positions,
                ..
            } => {
                if positions.contains(&RelativePosition::Left) {
                    if self.expect == Expect::Operand {
                        // An operand should be here; this operator is not it.
                        return Err(ParseError::OperandExpected {
                            operator: token.segment.clone(),
                            expected: Segment::zero_width(
                                self.source.clone(),
                                token.segment.start(),
                            ),
                        });
                    }
                    self.reduce_tighter(*precedence)?;
                } else {
                    // A prefix operator can only stand where an operand may.
                    self.expect_operand_position(&token)?;
                }

                self.expect = if positions.contains(&RelativePosition::Right) {
                    Expect::Operand
                } else {
                    Expect::Operator
                };
                self.last_operator = Some(token.segment.clone());
                self.control.push(ControlEntry::Operator {
                    definition: token.definition,
                    segment: token.segment,
                });
            }

            GrammarKind::BracketOpen | GrammarKind::FunctionCall { .. } => {
                self.expect_operand_position(&token)?;
                self.control.push(ControlEntry::Scope(ScopeFrame {
                    definition: token.definition,
                    segment: token.segment,
                    floor: self.operands.len(),
                    arguments: Vec::new(),
                    delimited: false,
                }));
                self.expect = Expect::Operand;
            }

            GrammarKind::ListDelimiter => {
                if self.expect == Expect::Operand {
                    // The argument before this delimiter is empty.
                    return Err(ParseError::OperandExpected {
                        operator: token.segment.clone(),
                        expected: Segment::zero_width(self.source.clone(), token.segment.start()),
                    });
                }
                self.reduce_to_scope()?;
                match self.control.last_mut() {
                    Some(ControlEntry::Scope(frame))
                        if matches!(frame.definition.kind(), GrammarKind::FunctionCall { .. }) =>
                    {
                        let Some(argument) = self.operands.pop() else {
                            return Err(ParseError::OperandExpected {
                                operator: token.segment.clone(),
                                expected: Segment::zero_width(
                                    self.source.clone(),
                                    token.segment.start(),
                                ),
                            });
                        };
                        frame.arguments.push(argument);
                        frame.delimited = true;
                    }
                    _ => {
                        return Err(ParseError::MisplacedDelimiter {
                            segment: token.segment,
                        })
                    }
                }
                self.expect = Expect::Operand;
            }

            GrammarKind::BracketClose { openers, .. } => {
                self.reduce_to_scope()?;
                let Some(ControlEntry::Scope(frame)) = self.control.pop() else {
                    return Err(ParseError::UnmatchedBracket {
                        segment: token.segment,
                    });
                };
                if !openers.iter().any(|name| name == frame.definition.name()) {
                    return Err(ParseError::BracketMismatch {
                        close: token.segment,
                        open: frame.segment,
                    });
                }
                self.close_scope(frame, &token.segment)?;
                self.expect = Expect::Operator;
            }

            GrammarKind::Ignored => {}
        }
        Ok(())
    }

    /// Rejects the token when the position calls for an operator instead.
    fn expect_operand_position(&self, token: &Token<'g, N>) -> Result<(), ParseError> {
        if self.expect == Expect::Operator {
            return Err(ParseError::OperandUnexpected {
                operator: self.boundary(),
                operand: token.segment.clone(),
            });
        }
        Ok(())
    }

    /// The last consumed operator, or the boundary just after the previous
    /// operand when no operator was involved.
    fn boundary(&self) -> Segment {
        if let Some(operator) = &self.last_operator {
            operator.clone()
        } else if let Some(operand) = self.operands.last() {
            Segment::zero_width(self.source.clone(), operand.segment.end())
        } else {
            Segment::zero_width(self.source.clone(), 0)
        }
    }

    /// Reduces stacked operators that bind at least as tightly as
    /// `precedence` (equal precedence reduces, giving left-to-right
    /// resolution of same-precedence chains).
    fn reduce_tighter(&mut self, precedence: u32) -> Result<(), ParseError> {
        loop {
            let reduces = match self.control.last() {
                Some(ControlEntry::Operator { definition, .. }) => match definition.kind() {
                    GrammarKind::Operator {
                        precedence: stacked,
                        ..
                    } => *stacked <= precedence,
                    _ => false,
                },
                _ => false,
            };
            if !reduces {
                return Ok(());
            }
            let Some(ControlEntry::Operator {
                definition,
                segment,
            }) = self.control.pop()
            else {
                return Ok(());
            };
            self.reduce_operator(definition, &segment)?;
        }
    }

    /// Reduces every pending operator down to the nearest open scope (or
    /// the bottom of the control stack).
    fn reduce_to_scope(&mut self) -> Result<(), ParseError> {
        while matches!(self.control.last(), Some(ControlEntry::Operator { .. })) {
            let Some(ControlEntry::Operator {
                definition,
                segment,
            }) = self.control.pop()
            else {
                return Ok(());
            };
            self.reduce_operator(definition, &segment)?;
        }
        Ok(())
    }

    /// Pops an operator's operands, applies its builder and pushes the
    /// result back with a segment spanning everything consumed.
    fn reduce_operator(
        &mut self,
        definition: &'g GrammarDefinition<N>,
        segment: &Segment,
    ) -> Result<(), ParseError> {
        let GrammarKind::Operator {
            positions, build, ..
        } = definition.kind()
        else {
            return Ok(());
        };

        let arity = positions.len();
        let available = self.operands.len().saturating_sub(self.scope_floor());
        if available < arity {
            return Err(ParseError::OperandExpected {
                operator: segment.clone(),
                expected: Segment::zero_width(self.source.clone(), segment.end()),
            });
        }

        let children = self.operands.split_off(self.operands.len() - arity);
        let span = children
            .iter()
            .fold(segment.clone(), |span, child| span.encompass(&child.segment));
        let nodes = children.into_iter().map(|child| child.node).collect();
        let node = build(nodes).map_err(|message| ParseError::Build {
            segment: segment.clone(),
            message,
        })?;
        log::trace!("reduced operator `{}`", definition.name());
        self.operands.push(OperandEntry {
            node,
            segment: span,
        });
        Ok(())
    }

    /// Operand-stack depth owned by the innermost open scope.
    fn scope_floor(&self) -> usize {
        self.control
            .iter()
            .rev()
            .find_map(|entry| match entry {
                ControlEntry::Scope(frame) => Some(frame.floor),
                ControlEntry::Operator { .. } => None,
            })
            .unwrap_or(0)
    }

    /// Finishes a scope at its close token: collects function arguments
    /// and pushes the scope's result operand.
    fn close_scope(
        &mut self,
        frame: ScopeFrame<'g, N>,
        close: &Segment,
    ) -> Result<(), ParseError> {
        let span = frame.segment.encompass(close);
        match frame.definition.kind() {
            GrammarKind::FunctionCall { args, build } => {
                let mut arguments = frame.arguments;
                if self.expect == Expect::Operator {
                    // The argument in progress ended at this close token.
                    if let Some(argument) = self.operands.pop() {
                        arguments.push(argument);
                    }
                } else if frame.delimited {
                    // A delimiter announced another argument that never came.
                    return Err(ParseError::OperandExpected {
                        operator: close.clone(),
                        expected: Segment::zero_width(self.source.clone(), close.start()),
                    });
                }

                if let Some(declared) = args {
                    if *declared != arguments.len() {
                        return Err(ParseError::ArgumentCount {
                            function: frame.segment,
                            expected: *declared,
                            actual: arguments.len(),
                        });
                    }
                }

                let nodes = arguments.into_iter().map(|argument| argument.node).collect();
                let node = build(nodes).map_err(|message| ParseError::Build {
                    segment: span.clone(),
                    message,
                })?;
                log::trace!("applied function `{}`", frame.definition.name());
                self.operands.push(OperandEntry {
                    node,
                    segment: span,
                });
            }
            _ => {
                // A plain grouping bracket: the operand inside it stands as
                // the group's result, widened to cover the brackets.
                if self.expect == Expect::Operand {
                    return Err(ParseError::OperandExpected {
                        operator: close.clone(),
                        expected: Segment::zero_width(self.source.clone(), close.start()),
                    });
                }
                let Some(inner) = self.operands.pop() else {
                    return Err(ParseError::OperandExpected {
                        operator: close.clone(),
                        expected: Segment::zero_width(self.source.clone(), close.start()),
                    });
                };
                self.operands.push(OperandEntry {
                    node: inner.node,
                    segment: span,
                });
            }
        }
        Ok(())
    }

    /// Drains the control stack at end of input and extracts the single
    /// remaining operand.
    fn finish(mut self) -> Result<N, ParseError> {
        while let Some(entry) = self.control.pop() {
            match entry {
                ControlEntry::Operator {
                    definition,
                    segment,
                } => self.reduce_operator(definition, &segment)?,
                ControlEntry::Scope(frame) => {
                    return Err(ParseError::UnmatchedBracket {
                        segment: frame.segment,
                    })
                }
            }
        }

        if self.operands.len() > 1 {
            let operand = self.operands[1].segment.clone();
            return Err(ParseError::OperandUnexpected {
                operator: self.boundary(),
                operand,
            });
        }
        match self.operands.pop() {
            Some(operand) => Ok(operand.node),
            None => {
                let end = Segment::zero_width(self.source.clone(), self.source.len());
                Err(ParseError::OperandExpected {
                    operator: self.last_operator.unwrap_or_else(|| end.clone()),
                    expected: end,
                })
            }
        }
    }
}

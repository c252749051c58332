//! The OData `$filter` grammar, bound to the expression engine.

use std::sync::OnceLock;

use odq_lang::{GrammarDefinition, Language};

use crate::error::ODataError;
use crate::node::{CompareOp, FilterNode, FilterValue, LogicalOp, StringFunction};

/// Parses a `$filter` expression into its [`FilterNode`] tree.
pub fn parse_filter(expression: &str) -> Result<FilterNode, ODataError> {
    log::debug!("parsing $filter expression: {expression}");
    Ok(filter_language().compile(expression)?)
}

/// The shared, lazily built `$filter` language.
///
/// Precedence convention (lower number binds tighter): comparisons 4,
/// `not` 5, `and` 6, `or` 7 — so `not A eq 'x' and B eq 'y'` reads as
/// `(not (A eq 'x')) and (B eq 'y')`.
pub fn filter_language() -> &'static Language<FilterNode> {
    static LANGUAGE: OnceLock<Language<FilterNode>> = OnceLock::new();
    LANGUAGE.get_or_init(|| build_language().expect("built-in OData grammar must compile"))
}

const FUNCTION_NAMES: &[&str] = &["STARTSWITH", "ENDSWITH", "SUBSTRINGOF", "TOLOWER", "TOUPPER"];

fn build_language() -> Result<Language<FilterNode>, odq_lang::GrammarError> {
    let mut openers = vec!["OPENPAREN"];
    openers.extend_from_slice(FUNCTION_NAMES);

    Language::new(vec![
        // Literals first: `datetime'...'` and quoted strings must win over
        // the property-path pattern.
        GrammarDefinition::operand("STRING", r"'(?:[^']|'')*'", |text| {
            Ok(FilterNode::Value(FilterValue::String(unescape(text))))
        }),
        GrammarDefinition::operand("DATETIME", r"datetime'[^']*'", |text| {
            let inner = &text["datetime'".len()..text.len() - 1];
            parse_datetime(inner)
                .map(|moment| FilterNode::Value(FilterValue::DateTime(moment)))
                .ok_or_else(|| format!("invalid datetime literal `{inner}`"))
        }),
        function(StringFunction::StartsWith, "STARTSWITH", r"startswith\(", 2),
        function(StringFunction::EndsWith, "ENDSWITH", r"endswith\(", 2),
        function(StringFunction::SubstringOf, "SUBSTRINGOF", r"substringof\(", 2),
        function(StringFunction::ToLower, "TOLOWER", r"tolower\(", 1),
        function(StringFunction::ToUpper, "TOUPPER", r"toupper\(", 1),
        GrammarDefinition::bracket_open("OPENPAREN", r"\("),
        GrammarDefinition::list_delimiter("COMMA", r","),
        GrammarDefinition::bracket_close("CLOSEPAREN", r"\)", &openers, Some("COMMA")),
        GrammarDefinition::prefix_operator("NOT", r"\bnot\b", 5, |args| {
            let mut args = args.into_iter();
            match args.next() {
                Some(inner) => Ok(FilterNode::Not(Box::new(inner))),
                None => Err("`not` requires an operand".to_string()),
            }
        }),
        logical(LogicalOp::And, "AND", r"\band\b", 6),
        logical(LogicalOp::Or, "OR", r"\bor\b", 7),
        comparison(CompareOp::Eq, "EQ", r"\beq\b"),
        comparison(CompareOp::Ne, "NE", r"\bne\b"),
        comparison(CompareOp::Gt, "GT", r"\bgt\b"),
        comparison(CompareOp::Ge, "GE", r"\bge\b"),
        comparison(CompareOp::Lt, "LT", r"\blt\b"),
        comparison(CompareOp::Le, "LE", r"\ble\b"),
        GrammarDefinition::operand("TRUE", r"\btrue\b", |_| {
            Ok(FilterNode::Value(FilterValue::Bool(true)))
        }),
        GrammarDefinition::operand("FALSE", r"\bfalse\b", |_| {
            Ok(FilterNode::Value(FilterValue::Bool(false)))
        }),
        GrammarDefinition::operand("NULL", r"\bnull\b", |_| {
            Ok(FilterNode::Value(FilterValue::Null))
        }),
        GrammarDefinition::operand("NUMBER", r"-?\d+(?:\.\d+)?", |text| {
            text.parse()
                .map(|number| FilterNode::Value(FilterValue::Number(number)))
                .map_err(|e: std::num::ParseFloatError| e.to_string())
        }),
        GrammarDefinition::operand(
            "PROPERTY",
            r"[A-Za-z_][A-Za-z0-9_]*(?:[/.][A-Za-z_][A-Za-z0-9_]*)*",
            |text| {
                Ok(FilterNode::Property {
                    path: text.split(['/', '.']).map(str::to_string).collect(),
                })
            },
        ),
        GrammarDefinition::ignored("WHITESPACE", r"\s+"),
    ])
}

fn comparison(op: CompareOp, name: &str, pattern: &str) -> GrammarDefinition<FilterNode> {
    GrammarDefinition::binary_operator(name, pattern, 4, move |args| {
        let mut args = args.into_iter();
        match (args.next(), args.next()) {
            (Some(left), Some(right)) => Ok(FilterNode::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
            }),
            _ => Err(format!("`{op}` requires two operands")),
        }
    })
}

fn logical(op: LogicalOp, name: &str, pattern: &str, precedence: u32) -> GrammarDefinition<FilterNode> {
    GrammarDefinition::binary_operator(name, pattern, precedence, move |args| {
        let mut args = args.into_iter();
        match (args.next(), args.next()) {
            (Some(left), Some(right)) => Ok(FilterNode::Logical {
                op,
                left: Box::new(left),
                right: Box::new(right),
            }),
            _ => Err(format!("`{op}` requires two operands")),
        }
    })
}

fn function(
    function: StringFunction,
    name: &str,
    pattern: &str,
    count: usize,
) -> GrammarDefinition<FilterNode> {
    GrammarDefinition::function_call(name, pattern, Some(count), move |args| {
        Ok(FilterNode::Function { function, args })
    })
}

/// Strips the surrounding quotes and collapses the `''` escape, so
/// `'O''Brien'` becomes `O'Brien`.
fn unescape(literal: &str) -> String {
    literal[1..literal.len() - 1].replace("''", "'")
}

/// Accepts RFC 3339 as well as the naive `YYYY-MM-DD[THH:MM[:SS[.f]]]`
/// forms (read as UTC) that OData clients commonly send.
pub(crate) fn parse_datetime(text: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    if let Ok(moment) = DateTime::parse_from_rfc3339(text) {
        return Some(moment.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

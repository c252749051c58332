//! Tests for the OData grammar, the query-string model, and in-memory
//! evaluation.

use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn property(path: &[&str]) -> FilterNode {
    FilterNode::Property {
        path: path.iter().map(|s| (*s).to_string()).collect(),
    }
}

fn string(text: &str) -> FilterNode {
    FilterNode::Value(FilterValue::String(text.to_string()))
}

fn number(value: f64) -> FilterNode {
    FilterNode::Value(FilterValue::Number(value))
}

#[test]
fn parses_simple_comparison() {
    let node = parse_filter("Name eq 'John'").unwrap();
    assert_eq!(
        node,
        FilterNode::Compare {
            op: CompareOp::Eq,
            left: Box::new(property(&["Name"])),
            right: Box::new(string("John")),
        }
    );
}

#[test]
fn parses_property_paths() {
    let node = parse_filter("Address/City ne 'Oslo'").unwrap();
    assert_eq!(
        node,
        FilterNode::Compare {
            op: CompareOp::Ne,
            left: Box::new(property(&["Address", "City"])),
            right: Box::new(string("Oslo")),
        }
    );
}

#[test]
fn and_binds_tighter_than_or() {
    let node = parse_filter("A eq 1 or B eq 2 and C eq 3").unwrap();
    let FilterNode::Logical {
        op: LogicalOp::Or,
        right,
        ..
    } = node
    else {
        panic!("expected top-level or, got {node:?}");
    };
    assert!(matches!(
        *right,
        FilterNode::Logical {
            op: LogicalOp::And,
            ..
        }
    ));
}

#[test]
fn not_negates_the_whole_comparison() {
    let node = parse_filter("not Name eq 'x'").unwrap();
    assert_eq!(
        node,
        FilterNode::Not(Box::new(FilterNode::Compare {
            op: CompareOp::Eq,
            left: Box::new(property(&["Name"])),
            right: Box::new(string("x")),
        }))
    );

    // `not` applies to the comparison on its right, then `and` combines.
    let node = parse_filter("not A eq 1 and B eq 2").unwrap();
    let FilterNode::Logical {
        op: LogicalOp::And,
        left,
        ..
    } = node
    else {
        panic!("expected top-level and, got {node:?}");
    };
    assert!(matches!(*left, FilterNode::Not(_)));
}

#[test]
fn parentheses_group_predicates() {
    let node = parse_filter("A eq 1 and (B eq 2 or C eq 3)").unwrap();
    let FilterNode::Logical {
        op: LogicalOp::And,
        right,
        ..
    } = node
    else {
        panic!("expected top-level and, got {node:?}");
    };
    assert!(matches!(
        *right,
        FilterNode::Logical {
            op: LogicalOp::Or,
            ..
        }
    ));
}

#[test]
fn unescapes_doubled_quotes_in_strings() {
    let node = parse_filter("Name eq 'O''Brien'").unwrap();
    let FilterNode::Compare { right, .. } = node else {
        panic!("expected comparison");
    };
    assert_eq!(*right, string("O'Brien"));
}

#[test]
fn parses_literals() {
    assert_eq!(
        parse_filter("Active eq true").unwrap(),
        FilterNode::Compare {
            op: CompareOp::Eq,
            left: Box::new(property(&["Active"])),
            right: Box::new(FilterNode::Value(FilterValue::Bool(true))),
        }
    );
    assert_eq!(
        parse_filter("Deleted ne null").unwrap(),
        FilterNode::Compare {
            op: CompareOp::Ne,
            left: Box::new(property(&["Deleted"])),
            right: Box::new(FilterNode::Value(FilterValue::Null)),
        }
    );
    assert_eq!(
        parse_filter("Score ge -1.5").unwrap(),
        FilterNode::Compare {
            op: CompareOp::Ge,
            left: Box::new(property(&["Score"])),
            right: Box::new(number(-1.5)),
        }
    );
}

#[test]
fn parses_datetime_literals() {
    let node = parse_filter("Created gt datetime'2024-01-02T03:04:05'").unwrap();
    let FilterNode::Compare { right, .. } = node else {
        panic!("expected comparison");
    };
    let FilterNode::Value(FilterValue::DateTime(moment)) = *right else {
        panic!("expected datetime literal, got {right:?}");
    };
    assert_eq!(moment.to_rfc3339(), "2024-01-02T03:04:05+00:00");

    assert!(matches!(
        parse_filter("Created gt datetime'not a date'"),
        Err(ODataError::Filter(odq_lang::ParseError::Build { .. }))
    ));
}

#[test]
fn keywords_do_not_swallow_property_names() {
    // `Gender` contains `ge`, `Ordered` contains `or`; word boundaries
    // keep them intact.
    let node = parse_filter("Gender eq 'f' and Ordered eq true").unwrap();
    let FilterNode::Logical { left, .. } = node else {
        panic!("expected and");
    };
    let FilterNode::Compare { left: gender, .. } = *left else {
        panic!("expected comparison");
    };
    assert_eq!(*gender, property(&["Gender"]));
}

#[test]
fn parses_string_functions() {
    assert_eq!(
        parse_filter("startswith(Name, 'Jo')").unwrap(),
        FilterNode::Function {
            function: StringFunction::StartsWith,
            args: vec![property(&["Name"]), string("Jo")],
        }
    );
    assert_eq!(
        parse_filter("substringof('ohn', Name)").unwrap(),
        FilterNode::Function {
            function: StringFunction::SubstringOf,
            args: vec![string("ohn"), property(&["Name"])],
        }
    );
    assert_eq!(
        parse_filter("tolower(Name) eq 'john'").unwrap(),
        FilterNode::Compare {
            op: CompareOp::Eq,
            left: Box::new(FilterNode::Function {
                function: StringFunction::ToLower,
                args: vec![property(&["Name"])],
            }),
            right: Box::new(string("john")),
        }
    );
}

#[test]
fn function_argument_counts_are_enforced() {
    assert!(matches!(
        parse_filter("startswith(Name)"),
        Err(ODataError::Filter(
            odq_lang::ParseError::ArgumentCount {
                expected: 2,
                actual: 1,
                ..
            }
        ))
    ));
    assert!(matches!(
        parse_filter("tolower(Name, 'x')"),
        Err(ODataError::Filter(
            odq_lang::ParseError::ArgumentCount {
                expected: 1,
                actual: 2,
                ..
            }
        ))
    ));
}

#[test]
fn rejects_unrecognized_input() {
    assert!(matches!(
        parse_filter("Name == 'x'"),
        Err(ODataError::Filter(
            odq_lang::ParseError::UnrecognizedSpan { .. }
        ))
    ));
}

#[test]
fn parses_orderby_clauses() {
    let clause = OrderByClause::parse("Name desc, Address/City, Age ASC").unwrap();
    assert_eq!(
        clause.nodes,
        vec![
            OrderByNode {
                sequence: 1,
                path: vec!["Name".to_string()],
                direction: OrderByDirection::Descending,
            },
            OrderByNode {
                sequence: 2,
                path: vec!["Address".to_string(), "City".to_string()],
                direction: OrderByDirection::Ascending,
            },
            OrderByNode {
                sequence: 3,
                path: vec!["Age".to_string()],
                direction: OrderByDirection::Ascending,
            },
        ]
    );
}

#[test]
fn rejects_malformed_orderby_entries() {
    assert!(matches!(
        OrderByClause::parse("Name desc extra"),
        Err(ODataError::InvalidOrderBy { .. })
    ));
    assert!(matches!(
        OrderByClause::parse("Name sideways"),
        Err(ODataError::InvalidOrderBy { .. })
    ));
    assert!(matches!(
        OrderByClause::parse("Name,,Age"),
        Err(ODataError::InvalidOrderBy { .. })
    ));
}

#[test]
fn parses_full_query_strings() {
    let query =
        DocumentQuery::parse("?$filter=Age%20gt%2030&$ORDERBY=Name+desc&$skip=5&$top=10").unwrap();
    assert!(query.filter.is_some());
    assert_eq!(query.order_by.nodes.len(), 1);
    assert_eq!(
        query.order_by.nodes[0].direction,
        OrderByDirection::Descending
    );
    assert_eq!(query.skip, Some(5));
    assert_eq!(query.top, Some(10));
}

#[test]
fn empty_query_string_is_an_empty_query() {
    assert_eq!(DocumentQuery::parse("").unwrap(), DocumentQuery::default());
}

#[test]
fn rejects_invalid_paging_values() {
    assert!(matches!(
        DocumentQuery::parse("$skip=abc"),
        Err(ODataError::InvalidSkip(_))
    ));
    assert!(matches!(
        DocumentQuery::parse("$top=-1"),
        Err(ODataError::InvalidTop(_))
    ));
}

fn people() -> Vec<serde_json::Value> {
    vec![
        json!({"Name": "Alice", "Age": 34, "Address": {"City": "Oslo"}}),
        json!({"Name": "Bob", "Age": 28, "Address": {"City": "Bergen"}}),
        json!({"Name": "Carol", "Age": 41, "Address": {"City": "Oslo"}}),
        json!({"Name": "dave", "Age": 34}),
    ]
}

fn names(documents: &[serde_json::Value]) -> Vec<String> {
    documents
        .iter()
        .map(|d| d["Name"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn evaluates_comparisons_against_documents() {
    let query = DocumentQuery::parse("$filter=Age gt 30").unwrap();
    let result = query.apply(&people()).unwrap();
    assert_eq!(names(&result), vec!["Alice", "Carol", "dave"]);
}

#[test]
fn evaluates_nested_paths_and_logic() {
    let query =
        DocumentQuery::parse("$filter=Address/City eq 'Oslo' and not Name eq 'Alice'").unwrap();
    let result = query.apply(&people()).unwrap();
    assert_eq!(names(&result), vec!["Carol"]);
}

#[test]
fn missing_fields_resolve_to_null() {
    // dave has no Address; `ne` treats the missing field as not-equal.
    let query = DocumentQuery::parse("$filter=Address/City ne 'Oslo'").unwrap();
    let result = query.apply(&people()).unwrap();
    assert_eq!(names(&result), vec!["Bob", "dave"]);
}

#[test]
fn evaluates_string_functions() {
    let query = DocumentQuery::parse("$filter=startswith(Name, 'A')").unwrap();
    assert_eq!(names(&query.apply(&people()).unwrap()), vec!["Alice"]);

    let query = DocumentQuery::parse("$filter=substringof('aro', Name)").unwrap();
    assert_eq!(names(&query.apply(&people()).unwrap()), vec!["Carol"]);

    let query = DocumentQuery::parse("$filter=tolower(Name) eq 'dave'").unwrap();
    assert_eq!(names(&query.apply(&people()).unwrap()), vec!["dave"]);
}

#[test]
fn predicates_compose_with_boolean_comparison() {
    let query = DocumentQuery::parse("$filter=startswith(Name, 'A') eq false").unwrap();
    assert_eq!(
        names(&query.apply(&people()).unwrap()),
        vec!["Bob", "Carol", "dave"]
    );
}

#[test]
fn sorts_skips_and_limits() {
    let query = DocumentQuery::parse("$orderby=Age desc, Name").unwrap();
    let result = query.apply(&people()).unwrap();
    assert_eq!(names(&result), vec!["Carol", "Alice", "dave", "Bob"]);

    let query = DocumentQuery::parse("$orderby=Age desc, Name&$skip=1&$top=2").unwrap();
    let result = query.apply(&people()).unwrap();
    assert_eq!(names(&result), vec!["Alice", "dave"]);
}

#[test]
fn compares_datetime_literals_with_string_fields() {
    let documents = vec![
        json!({"Name": "old", "Created": "2020-01-01T00:00:00Z"}),
        json!({"Name": "new", "Created": "2025-06-15T12:00:00Z"}),
    ];
    let query = DocumentQuery::parse("$filter=Created gt datetime'2024-01-01'").unwrap();
    assert_eq!(names(&query.apply(&documents).unwrap()), vec!["new"]);
}

#[test]
fn bare_property_is_not_a_predicate() {
    let query = DocumentQuery::parse("$filter=Name").unwrap();
    assert!(matches!(
        query.apply(&people()),
        Err(ODataError::NotAPredicate { .. })
    ));
}

//! Translation tests: filter trees to query documents.

use pretty_assertions::assert_eq;
use serde_json::json;

use odq_odata::DocumentQuery;

use super::*;

fn build(query: &str) -> MongoQuerySpec {
    let query = DocumentQuery::parse(query).unwrap();
    MongoQueryBuilder::new().build(&query).unwrap()
}

fn filter_doc(filter: &str) -> serde_json::Value {
    build(&format!("$filter={filter}")).filter
}

#[test]
fn translates_field_comparisons() {
    assert_eq!(filter_doc("Name eq 'John'"), json!({"Name": {"$eq": "John"}}));
    assert_eq!(filter_doc("Age gt 30"), json!({"Age": {"$gt": 30.0}}));
    assert_eq!(filter_doc("Age le 30"), json!({"Age": {"$lte": 30.0}}));
    assert_eq!(filter_doc("Deleted ne null"), json!({"Deleted": {"$ne": null}}));
}

#[test]
fn joins_property_paths_with_dots() {
    assert_eq!(
        filter_doc("Address/City eq 'Oslo'"),
        json!({"Address.City": {"$eq": "Oslo"}})
    );
}

#[test]
fn flips_reversed_comparisons() {
    assert_eq!(filter_doc("30 lt Age"), json!({"Age": {"$gt": 30.0}}));
    assert_eq!(filter_doc("'John' eq Name"), json!({"Name": {"$eq": "John"}}));
}

#[test]
fn translates_logic() {
    assert_eq!(
        filter_doc("Age gt 30 and Age lt 40"),
        json!({"$and": [{"Age": {"$gt": 30.0}}, {"Age": {"$lt": 40.0}}]})
    );
    assert_eq!(
        filter_doc("Age lt 18 or Age gt 65"),
        json!({"$or": [{"Age": {"$lt": 18.0}}, {"Age": {"$gt": 65.0}}]})
    );
    assert_eq!(
        filter_doc("not Age gt 30"),
        json!({"$nor": [{"Age": {"$gt": 30.0}}]})
    );
}

#[test]
fn translates_string_predicates_to_anchored_regexes() {
    assert_eq!(
        filter_doc("startswith(Name, 'Jo')"),
        json!({"Name": {"$regex": "^Jo"}})
    );
    assert_eq!(
        filter_doc("endswith(Name, 'son')"),
        json!({"Name": {"$regex": "son$"}})
    );
    assert_eq!(
        filter_doc("substringof('oh', Name)"),
        json!({"Name": {"$regex": "oh"}})
    );
}

#[test]
fn escapes_regex_metacharacters_in_literals() {
    assert_eq!(
        filter_doc("startswith(Code, 'A.B+')"),
        json!({"Code": {"$regex": r"^A\.B\+"}})
    );
}

#[test]
fn translates_case_folding_through_expr() {
    assert_eq!(
        filter_doc("tolower(Name) eq 'john'"),
        json!({"$expr": {"$eq": [{"$toLower": "$Name"}, "john"]}})
    );
    assert_eq!(
        filter_doc("toupper(Code) ne 'AB'"),
        json!({"$expr": {"$ne": [{"$toUpper": "$Code"}, "AB"]}})
    );
}

#[test]
fn translates_field_to_field_comparisons_through_expr() {
    assert_eq!(
        filter_doc("Spent gt Budget"),
        json!({"$expr": {"$gt": ["$Spent", "$Budget"]}})
    );
}

#[test]
fn negates_predicates_compared_to_false() {
    assert_eq!(
        filter_doc("startswith(Name, 'A') eq false"),
        json!({"$nor": [{"Name": {"$regex": "^A"}}]})
    );
    assert_eq!(
        filter_doc("startswith(Name, 'A') ne false"),
        json!({"Name": {"$regex": "^A"}})
    );
}

#[test]
fn renders_datetimes_as_rfc3339() {
    assert_eq!(
        filter_doc("Created ge datetime'2024-01-02T03:04:05'"),
        json!({"Created": {"$gte": "2024-01-02T03:04:05+00:00"}})
    );
}

#[test]
fn builds_ordered_sort_documents() {
    let spec = build("$orderby=Name desc, Address/City");
    assert_eq!(spec.sort, json!({"Name": -1, "Address.City": 1}));
    // Key order is semantic: Name must sort before Address.City.
    let keys: Vec<&String> = spec.sort.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["Name", "Address.City"]);
}

#[test]
fn carries_paging_through() {
    let spec = build("$filter=Age gt 30&$skip=10&$top=5");
    assert_eq!(spec.skip, Some(10));
    assert_eq!(spec.limit, Some(5));
}

#[test]
fn empty_query_builds_empty_documents() {
    let spec = build("");
    assert_eq!(spec.filter, json!({}));
    assert_eq!(spec.sort, json!({}));
    assert_eq!(spec.skip, None);
    assert_eq!(spec.limit, None);
}

#[test]
fn rejects_untranslatable_shapes() {
    let untranslatable = |filter: &str| {
        let query = DocumentQuery::parse(&format!("$filter={filter}")).unwrap();
        MongoQueryBuilder::new().build(&query).unwrap_err()
    };

    assert!(matches!(
        untranslatable("'a' eq 'b'"),
        TranslateError::Unsupported { .. }
    ));
    assert!(matches!(
        untranslatable("startswith(Name, 'A') gt true"),
        TranslateError::Unsupported { .. }
    ));
    assert!(matches!(
        untranslatable("startswith(tolower(Name), 'a')"),
        TranslateError::Unsupported { .. }
    ));
}

//! Tests for the filter module

use super::*;
use crate::error::Error;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

fn resource_table() -> QualifierTable {
    QualifierTable::new()
        .int("id", "resourceId:{} level:self")
        .int("resource_type_id", "resourceTypeId:{} resourceTypeLevel:self")
        .string("resource_type_uri", "resourceTypeId:{} resourceTypeLevel:self")
}

fn notification_table() -> QualifierTable {
    QualifierTable::new()
        .int("id", "id:{}")
        .string("notification_type", "notificationType:{}")
        .timestamp("create_timestamp", "createTimestamp")
}

#[test_case("it's", r"'it\'s'"; "single quote")]
#[test_case(r"a\b", r"'a\\b'"; "backslash")]
#[test_case(r"\'", r"'\\\''"; "backslash then quote")]
#[test_case("plain", "'plain'"; "plain")]
#[test_case("", "''"; "empty")]
fn test_quote(input: &str, expected: &str) {
    assert_eq!(quote(input), expected);
}

#[test_case("limit:250", true; "alone")]
#[test_case("level:self limit:10", true; "trailing")]
#[test_case("limit:10 level:self", true; "leading")]
#[test_case("nolimit:10", false; "prefixed")]
#[test_case("limit:ten", false; "not digits")]
#[test_case("limit:10x", false; "suffixed")]
#[test_case("", false; "empty")]
fn test_has_explicit_limit(text: &str, expected: bool) {
    assert_eq!(has_explicit_limit(text), expected);
}

#[test]
fn test_single_int_qualifier() {
    let table = QualifierTable::new().int("id", "id:{}");
    let filter = FilterBuilder::new()
        .qualifiers(&table, &Qualifiers::new().eq("id", 7_i64))
        .unwrap()
        .build();

    assert!(filter.clauses().contains(&"id:7".to_string()));
    assert_eq!(
        filter.clauses().iter().filter(|c| *c == "limit:5000").count(),
        1
    );
    assert!(filter.paginate());
}

#[test]
fn test_user_limit_disables_pagination() {
    let filter = FilterBuilder::new().free_text("limit:250").build();

    assert_eq!(filter.clauses(), &["limit:250".to_string()]);
    assert!(!filter.paginate());
}

#[test]
fn test_limit_hint_lowers_page_size() {
    let filter = FilterBuilder::new().limit_hint(Some(10)).build();
    assert_eq!(filter.to_variable(), json!(["limit:10"]));

    let filter = FilterBuilder::new().limit_hint(Some(100_000)).build();
    assert_eq!(filter.to_variable(), json!(["limit:5000"]));
}

#[test]
fn test_clause_order() {
    let quals = Qualifiers::new()
        .eq("resource_type_uri", "tmod:@turbot/aws#/resource/types/bucket")
        .eq("id", 42_i64);
    let filter = build_filter(&resource_table(), &quals, Some("$.turbot.tags.env:prod"), None)
        .unwrap();

    assert_eq!(
        filter.to_string(),
        "$.turbot.tags.env:prod resourceId:42 level:self \
         resourceTypeId:'tmod:@turbot/aws#/resource/types/bucket' resourceTypeLevel:self \
         limit:5000"
    );
}

#[test]
fn test_list_values_are_comma_joined() {
    let quals = Qualifiers::new()
        .eq("id", vec![1_i64, 2, 3])
        .eq("resource_type_uri", vec!["a", "b'c"]);
    let filter = build_filter(&resource_table(), &quals, None, None).unwrap();

    assert_eq!(
        filter.clauses(),
        &[
            "resourceId:1,2,3 level:self".to_string(),
            r"resourceTypeId:'a','b\'c' resourceTypeLevel:self".to_string(),
            "limit:5000".to_string(),
        ]
    );
}

#[test]
fn test_unrecognized_qualifiers_are_ignored() {
    let quals = Qualifiers::new().eq("title", "bucket").eq("id", 1_i64);
    let filter = build_filter(&resource_table(), &quals, None, None).unwrap();

    assert_eq!(filter.to_variable(), json!(["resourceId:1 level:self", "limit:5000"]));
}

#[test]
fn test_kind_mismatch_is_rejected() {
    let quals = Qualifiers::new().eq("id", "seven");
    let err = build_filter(&resource_table(), &quals, None, None).unwrap_err();

    assert!(matches!(err, Error::InvalidQualifier { ref name, .. } if name == "id"));
}

#[test]
fn test_range_operator_on_int_is_rejected() {
    let quals = Qualifiers::new().compare("id", Operator::Gt, 7_i64);
    assert!(build_filter(&resource_table(), &quals, None, None).is_err());
}

#[test]
fn test_empty_list_is_rejected() {
    let quals = Qualifiers::new().eq("id", Vec::<i64>::new());
    assert!(build_filter(&resource_table(), &quals, None, None).is_err());
}

#[test_case(Operator::Eq, "createTimestamp:'2023-03-01T12:00:00.000Z'"; "equal")]
#[test_case(Operator::Gt, "createTimestamp:>='2023-03-01T11:59:00.000Z'"; "greater")]
#[test_case(Operator::Ge, "createTimestamp:>='2023-03-01T11:59:00.000Z'"; "greater or equal")]
#[test_case(Operator::Lt, "createTimestamp:<='2023-03-01T12:01:00.000Z'"; "less")]
#[test_case(Operator::Le, "createTimestamp:<='2023-03-01T12:01:00.000Z'"; "less or equal")]
fn test_timestamp_qualifier(operator: Operator, expected: &str) {
    let ts = Utc.with_ymd_and_hms(2023, 3, 1, 12, 0, 0).unwrap();
    let quals = Qualifiers::new().compare("create_timestamp", operator, ts);
    let filter = build_filter(&notification_table(), &quals, None, None).unwrap();

    assert_eq!(filter.clauses()[0], expected);
}

#[test]
fn test_timestamp_window() {
    let start = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2023, 3, 2, 0, 0, 0).unwrap();
    let quals = Qualifiers::new()
        .compare("create_timestamp", Operator::Ge, start)
        .compare("create_timestamp", Operator::Lt, end)
        .eq("notification_type", "resource_updated");
    let filter = build_filter(&notification_table(), &quals, None, Some(50)).unwrap();

    assert_eq!(
        filter.to_variable(),
        json!([
            "notificationType:'resource_updated'",
            "createTimestamp:>='2023-02-28T23:59:00.000Z'",
            "createTimestamp:<='2023-03-02T00:01:00.000Z'",
            "limit:50"
        ])
    );
}

#[test]
fn test_operator_parse() {
    assert_eq!(">=".parse::<Operator>().unwrap(), Operator::Ge);
    assert_eq!(Operator::Le.to_string(), "<=");
    assert!("~~".parse::<Operator>().is_err());
}

#[test]
fn test_blank_free_text_is_dropped() {
    let filter = FilterBuilder::new().free_text("   ").build();
    assert_eq!(filter.to_variable(), json!(["limit:5000"]));
}

//! Tests for the domain error type.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("wrong password"), ErrorCode::Unauthorized)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::photo_limit_reached("full"), ErrorCode::PhotoLimitReached)]
#[case(Error::upstream_format("garbled"), ErrorCode::UpstreamFormat)]
#[case(Error::misconfigured("unset"), ErrorCode::Misconfigured)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn new_captures_scoped_trace_id() {
    let trace_id = TraceId::generate();
    let error = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(trace_id.to_string().as_str()));
}

#[rstest]
fn new_without_scope_has_no_trace_id() {
    assert!(Error::not_found("missing").trace_id().is_none());
}

#[rstest]
fn builders_attach_details_and_trace_id() {
    let error = Error::invalid_request("bad")
        .with_details(json!({ "field": "date" }))
        .with_trace_id("abc");
    assert_eq!(error.trace_id(), Some("abc"));
    assert_eq!(error.details(), Some(&json!({ "field": "date" })));
    assert_eq!(error.to_string(), "bad");
}

#[rstest]
fn error_code_serialises_as_snake_case() {
    let value = serde_json::to_value(ErrorCode::PhotoLimitReached).expect("serialise code");
    assert_eq!(value, json!("photo_limit_reached"));
}

#[rstest]
#[case("", 0)]
#[case("abc", 3)]
fn truncate_excerpt_keeps_short_text(#[case] input: &str, #[case] expected_len: usize) {
    assert_eq!(truncate_excerpt(input).chars().count(), expected_len);
}

#[rstest]
fn truncate_excerpt_counts_characters_not_bytes() {
    let text = "訂".repeat(DIAGNOSTIC_EXCERPT_LIMIT + 20);
    let excerpt = truncate_excerpt(&text);
    assert_eq!(excerpt.chars().count(), DIAGNOSTIC_EXCERPT_LIMIT);
}

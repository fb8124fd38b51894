//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn trace_id() -> TraceId {
    "0c6f8f8e-3d55-4a5b-9c3e-6e0f6a1b2c3d"
        .parse()
        .expect("fixture is a valid UUID")
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no"), ErrorCode::Unauthorized)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("taken"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn constructors_stamp_the_request_trace_id(trace_id: TraceId) {
    let error = trace_id.scope(async { Error::not_found("course 3 not found") }).await;
    assert_eq!(error.trace_id(), Some(trace_id.to_string().as_str()));
}

#[rstest]
fn serialises_camel_case_without_empty_fields() {
    let value = serde_json::to_value(Error::conflict("user already exists")).expect("serialise");
    assert_eq!(
        value,
        json!({ "code": "conflict", "message": "user already exists" })
    );
}

#[rstest]
fn trace_id_and_details_survive_serialisation(trace_id: TraceId) {
    let error = Error::invalid_request("username must not be empty")
        .with_trace_id(trace_id.to_string())
        .with_details(json!({ "field": "username", "code": "empty_username" }));
    let value = serde_json::to_value(&error).expect("serialise");
    assert_eq!(value.get("traceId"), Some(&json!(trace_id.to_string())));

    let decoded: Error = serde_json::from_value(value).expect("deserialise");
    assert_eq!(decoded, error);
}

#[rstest]
#[case(json!({ "code": "not_found", "message": " " }))]
#[case(json!({ "code": "not_found", "message": "gone", "traceId": "" }))]
#[case(json!({ "code": "not_found", "message": "gone", "extra": 1 }))]
#[case(json!({ "code": "teapot", "message": "gone" }))]
fn malformed_payloads_are_rejected(#[case] payload: serde_json::Value) {
    assert!(serde_json::from_value::<Error>(payload).is_err());
}

#[rstest]
#[tokio::test]
async fn decoding_ignores_the_ambient_trace_id(trace_id: TraceId) {
    let decoded = trace_id
        .scope(async {
            serde_json::from_value::<Error>(json!({ "code": "not_found", "message": "gone" }))
        })
        .await
        .expect("payload is valid");
    assert!(decoded.trace_id().is_none());
}

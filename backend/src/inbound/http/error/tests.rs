//! Tests for the JSON error envelope.

use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;

const TRACE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

async fn render(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("body is readable");
    let body = serde_json::from_slice(&bytes).expect("body is JSON");
    (status, header, body)
}

#[rstest]
#[case(Error::invalid_request("name must not be empty"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("not yours"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("car 12 not found"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("company 'Tesla' already exists"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("catalogue store unavailable"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("catalogue query failed"), StatusCode::INTERNAL_SERVER_ERROR)]
fn each_code_has_a_status(#[case] error: Error, #[case] expected: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), expected);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_keep_only_the_trace_id() {
    let error = Error::internal("catalogue query failed: relation \"cars\" does not exist")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "sql": "SELECT 1" }));

    let (status, header, body) = render(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(
        body,
        json!({
            "code": "internal_error",
            "message": "Internal server error",
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_are_sent_unchanged() {
    let error = Error::invalid_request("seats must be positive")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "field": "seats", "code": "not_positive" }));

    let (status, header, body) = render(&error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(body["message"], json!("seats must be positive"));
    assert_eq!(body["details"]["field"], json!("seats"));
}

#[rstest]
#[actix_web::test]
async fn missing_trace_id_omits_the_header() {
    let (_, header, body) = render(&Error::not_found("engine 4 not found")).await;

    assert!(header.is_none());
    assert!(body.get("traceId").is_none());
}

#[rstest]
#[case(ErrorCode::Conflict, "fuel type 'Petrol' already exists")]
#[case(ErrorCode::ServiceUnavailable, "catalogue store unavailable")]
fn only_internal_errors_are_redacted(#[case] code: ErrorCode, #[case] message: &str) {
    let error = Error::new(code, message).with_details(json!({ "retry": true }));

    assert_eq!(public_view(&error), error);
}

#[rstest]
fn actix_errors_become_redacted_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("payload too large").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), REDACTED_MESSAGE);
    assert!(err.details().is_none());
}

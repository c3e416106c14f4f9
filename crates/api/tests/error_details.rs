//! `EXPOSE_ERROR_DETAILS` behaviour.
//!
//! Kept in its own test binary because the switch is process-global.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use kevs_api::error::{set_expose_error_details, AppError};

#[tokio::test]
async fn exposed_details_only_on_server_errors() {
    set_expose_error_details(true);

    let response = AppError::InternalError("pool exhausted".into()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["message"], "An internal error occurred");
    assert_eq!(json["detail"], "Internal error: pool exhausted");

    let response = AppError::BadRequest("Missing fields".into()).into_response();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(json.get("detail").is_none());
}

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

#[tokio::test]
async fn health_returns_ok() {
    let app = common::test_router();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"The requested resource was not found");
}

#[tokio::test]
async fn create_session_rejects_short_content() {
    let app = common::test_router();

    let payload = serde_json::json!({
        "faculty": "Ingegneria",
        "course": "Analisi Matematica I",
        "examType": "WRITTEN",
        "depth": "MEDIUM",
        "examDate": "2030-06-10",
        "content": "troppo corto"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/sessions")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn move_module_rejects_malformed_session_id() {
    let app = common::test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/sessions/not-a-uuid/modules/m1/move")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"date":"2026-09-01"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

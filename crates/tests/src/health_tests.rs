use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use castscribe_api::build_router;
use castscribe_store::MemoryObjectStore;
use serde_json::Value;
use tower::ServiceExt;

use crate::fixtures::engine::MockSpeechEngine;
use crate::fixtures::test_app::{TestApp, app_state};
use crate::fixtures::transcode::CopyTranscoder;

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::spawn().await;

    let resp = app.get("/health").await;

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn unknown_routes_answer_404() {
    let app = build_router(app_state(
        Arc::new(MemoryObjectStore::new("b")),
        Arc::new(MockSpeechEngine::new()),
        Arc::new(CopyTranscoder),
    ));

    let res = app
        .oneshot(
            Request::builder()
                .uri("/transcripts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

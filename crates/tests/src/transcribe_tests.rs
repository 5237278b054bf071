use castscribe_store::ObjectStore;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::fixtures::test_app::TestApp;

#[tokio::test]
async fn transcribe_returns_a_running_job_id() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/transcribe",
            &json!({
                "episodeId": "ep-001",
                "audioUrl": app.media.episode_url("ep-001.mp3"),
            }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "RUNNING");
    let id = json["transcriptionId"].as_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());

    // Exactly one canonical audio object and one job record were written.
    let mut keys = app.store.keys();
    keys.sort();
    assert_eq!(keys, vec!["audio/ep-001.wav".to_string(), format!("jobs/{id}.json")]);
    assert_eq!(app.engine.submit_count(), 1);
}

#[tokio::test]
async fn blank_episode_id_is_rejected() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/transcribe",
            &json!({ "episodeId": "  ", "audioUrl": "https://cdn.example.com/ep.mp3" }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "bad_request");
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn episode_id_with_a_slash_is_rejected() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/transcribe",
            &json!({ "episodeId": "ep/../../etc", "audioUrl": "https://cdn.example.com/ep.mp3" }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 400);
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn non_http_audio_url_is_rejected() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/transcribe",
            &json!({ "episodeId": "ep-001", "audioUrl": "gs://bucket/ep.mp3" }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 400);
    assert!(app.store.is_empty());
    assert_eq!(app.engine.submit_count(), 0);
}

#[tokio::test]
async fn missing_source_creates_no_job() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_json(
            "/transcribe",
            &json!({
                "episodeId": "ep-404",
                "audioUrl": app.media.broken_url("gone.mp3"),
            }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 422);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "validation");

    // Nothing durable was written and the engine never heard about it.
    assert!(app.store.is_empty());
    assert_eq!(app.engine.submit_count(), 0);
}

#[tokio::test]
async fn unreachable_source_host_creates_no_job() {
    // Reserve a port, then close it so the download is refused.
    let parked = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_url = format!("http://{}/audio/ep.mp3", parked.local_addr().unwrap());
    drop(parked);

    let app = TestApp::spawn().await;
    let resp = app
        .post_json(
            "/transcribe",
            &json!({ "episodeId": "ep-dead", "audioUrl": dead_url }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 422);
    assert!(app.store.is_empty());
    assert_eq!(app.engine.submit_count(), 0);
}

#[tokio::test]
async fn corrupt_audio_creates_no_job() {
    let app = TestApp::spawn_with_rejecting_transcoder().await;

    let resp = app
        .post_json(
            "/transcribe",
            &json!({
                "episodeId": "ep-bad",
                "audioUrl": app.media.episode_url("ep-bad.mp3"),
            }),
        )
        .await;

    assert_eq!(resp.status().as_u16(), 422);
    let json: Value = resp.json().await.unwrap();
    assert!(json["message"].as_str().unwrap().contains("Invalid data"));
    assert!(app.store.is_empty());
    assert_eq!(app.engine.submit_count(), 0);
}

#[tokio::test]
async fn reingesting_an_episode_overwrites_its_audio() {
    let app = TestApp::spawn().await;
    let body = json!({
        "episodeId": "ep-007",
        "audioUrl": app.media.episode_url("ep-007.mp3"),
    });

    let first: Value = app.post_json("/transcribe", &body).await.json().await.unwrap();
    let second: Value = app.post_json("/transcribe", &body).await.json().await.unwrap();

    // The canonical audio lives under one deterministic key; the second
    // ingest overwrote it rather than adding a sibling.
    let audio = app.store.get("audio/ep-007.wav").await.unwrap();
    assert_eq!(audio.generation, 2);

    // Each accepted engine operation still gets its own job record.
    assert_ne!(first["transcriptionId"], second["transcriptionId"]);
    assert_eq!(app.store.len(), 3);
}

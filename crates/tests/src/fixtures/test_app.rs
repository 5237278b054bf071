use std::sync::Arc;

use castscribe_api::{build_router, state::AppState};
use castscribe_config::IngestSettings;
use castscribe_recognition::RecognitionConfig;
use castscribe_services::{AudioIngestor, JobResolver, RecognitionSubmitter, Transcoder};
use castscribe_store::{JobStore, MemoryObjectStore};

use super::engine::MockSpeechEngine;
use super::media::MediaServer;
use super::transcode::{CopyTranscoder, RejectingTranscoder};

/// The full castscribe router listening on an ephemeral port, wired to
/// in-memory collaborators the test can inspect and drive: the object store,
/// the engine double, and a local media host for source audio.
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub engine: Arc<MockSpeechEngine>,
    pub store: Arc<MemoryObjectStore>,
    pub media: MediaServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_transcoder(Arc::new(CopyTranscoder)).await
    }

    /// Variant whose transcoder rejects every file, for exercising the
    /// corrupt-source path.
    pub async fn spawn_with_rejecting_transcoder() -> Self {
        Self::spawn_with_transcoder(Arc::new(RejectingTranscoder)).await
    }

    async fn spawn_with_transcoder(transcoder: Arc<dyn Transcoder>) -> Self {
        let store = Arc::new(MemoryObjectStore::new("castscribe-test"));
        let engine = Arc::new(MockSpeechEngine::new());
        let app = build_router(app_state(store.clone(), engine.clone(), transcoder));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            address,
            client: reqwest::Client::new(),
            engine,
            store,
            media: MediaServer::spawn().await,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }
}

/// Router state over in-memory doubles, shared by [`TestApp::spawn`] and the
/// in-process router tests.
pub fn app_state(
    store: Arc<MemoryObjectStore>,
    engine: Arc<MockSpeechEngine>,
    transcoder: Arc<dyn Transcoder>,
) -> AppState {
    let jobs = JobStore::new(store.clone());
    AppState {
        ingestor: Arc::new(
            AudioIngestor::new(&IngestSettings::default(), store, transcoder).unwrap(),
        ),
        submitter: Arc::new(RecognitionSubmitter::new(
            engine.clone(),
            jobs.clone(),
            RecognitionConfig::default(),
        )),
        resolver: JobResolver::new(engine, jobs),
    }
}

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use castscribe_api::{build_router, state::AppState};
use castscribe_config::AppSettings;
use castscribe_recognition::HttpSpeechEngine;
use castscribe_services::{AudioIngestor, FfmpegTranscoder, JobResolver, RecognitionSubmitter};
use castscribe_store::{HttpObjectStore, JobStore, ObjectStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = AppSettings::load()?;

    let store: Arc<dyn ObjectStore> = Arc::new(HttpObjectStore::new(settings.storage.clone())?);
    let engine = Arc::new(HttpSpeechEngine::new(
        settings.engine.endpoint.clone(),
        settings.engine.auth_token.clone(),
        Duration::from_secs(settings.engine.timeout_secs),
    )?);
    let transcoder = Arc::new(FfmpegTranscoder::new(
        &settings.ingest,
        &settings.recognition,
    ));
    let jobs = JobStore::new(store.clone());

    let state = AppState {
        ingestor: Arc::new(AudioIngestor::new(
            &settings.ingest,
            store.clone(),
            transcoder,
        )?),
        submitter: Arc::new(RecognitionSubmitter::new(
            engine.clone(),
            jobs.clone(),
            settings.recognition.clone(),
        )),
        resolver: JobResolver::new(engine, jobs),
    };

    let app = build_router(state);
    let addr: SocketAddr = format!("{}:{}", settings.http.host, settings.http.port).parse()?;
    info!(%addr, engine = %settings.engine.endpoint, "castscribe listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

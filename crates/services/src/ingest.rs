//! Audio ingestion: pull the episode from its feed URL, normalize it, park
//! it in object storage.
//!
//! Everything intermediate lives in a per-ingest temp directory that is
//! dropped when the call returns, success or not. Nothing is written to the
//! job store here; an ingest that dies leaves no trace beyond logs.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use castscribe_config::IngestSettings;
use castscribe_store::{AUDIO_CONTENT_TYPE, ObjectStore, StoreError, audio_key};
use futures::StreamExt;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::transcode::{TranscodeError, Transcoder};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("audio download failed: {0}")]
    Download(#[from] reqwest::Error),
    #[error("audio source returned {code} for {url}")]
    SourceStatus { code: u16, url: String },
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
    #[error("audio upload failed: {0}")]
    Upload(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct AudioIngestor {
    client: reqwest::Client,
    store: Arc<dyn ObjectStore>,
    transcoder: Arc<dyn Transcoder>,
}

impl AudioIngestor {
    pub fn new(
        settings: &IngestSettings,
        store: Arc<dyn ObjectStore>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Result<Self, IngestError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .timeout(Duration::from_secs(settings.download_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            store,
            transcoder,
        })
    }

    /// Runs the full pipeline for one episode and returns the storage URI
    /// of the normalized audio.
    pub async fn ingest(&self, episode_id: &str, audio_url: &str) -> Result<String, IngestError> {
        let workdir = tempfile::tempdir()?;
        let source_path = workdir.path().join("source.audio");
        let wav_path = workdir.path().join("audio.wav");

        self.download(audio_url, &source_path).await?;
        self.transcoder.transcode(&source_path, &wav_path).await?;

        let key = audio_key(episode_id);
        self.store.put_file(&key, &wav_path, AUDIO_CONTENT_TYPE).await?;
        let storage_uri = self.store.uri_for(&key);
        info!(episode_id, %storage_uri, "audio ingested");
        Ok(storage_uri)
    }

    async fn download(&self, url: &str, path: &Path) -> Result<(), IngestError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::SourceStatus {
                code: status.as_u16(),
                url: url.to_string(),
            });
        }

        let mut file = tokio::fs::File::create(path).await?;
        let mut stream = response.bytes_stream();
        let mut total: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            total += chunk.len() as u64;
        }
        file.flush().await?;
        debug!(url, bytes = total, "source audio downloaded");
        Ok(())
    }
}

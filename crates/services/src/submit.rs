//! Submission of stored audio to the recognition engine.
//!
//! The engine is asked first; only once it has accepted the work is the
//! RUNNING record written. The record id is derived from the operation
//! handle, so if the same accepted operation is ever persisted twice the
//! writes land on one record instead of forking.

use std::sync::Arc;

use castscribe_recognition::{EngineError, OperationHandle, RecognitionConfig, SpeechEngine};
use castscribe_store::{JobStore, JobStoreError, TranscriptionJob};
use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Namespace for v5 ids minted from operation handles.
const JOB_NAMESPACE: Uuid = Uuid::from_u128(0x3e1c_2a77_9f4b_4d2e_a6cd_8b5f_1c0d_7e42_u128);

/// Derives the stable job id for an engine operation.
pub fn transcription_id_for(handle: &OperationHandle) -> Uuid {
    Uuid::new_v5(&JOB_NAMESPACE, handle.as_str().as_bytes())
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("engine rejected the submission: {0}")]
    Engine(#[from] EngineError),
    #[error("job record could not be persisted: {0}")]
    Persist(#[from] JobStoreError),
}

pub struct RecognitionSubmitter {
    engine: Arc<dyn SpeechEngine>,
    jobs: JobStore,
    recognition: RecognitionConfig,
}

impl RecognitionSubmitter {
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        jobs: JobStore,
        recognition: RecognitionConfig,
    ) -> Self {
        Self {
            engine,
            jobs,
            recognition,
        }
    }

    /// Hands the stored audio to the engine and persists the RUNNING record.
    pub async fn submit(
        &self,
        episode_id: &str,
        audio_url: &str,
        storage_uri: &str,
    ) -> Result<TranscriptionJob, SubmitError> {
        let handle = self.engine.submit(storage_uri, &self.recognition).await?;
        let transcription_id = transcription_id_for(&handle);

        let job = TranscriptionJob::running(
            transcription_id,
            episode_id.to_string(),
            audio_url.to_string(),
            storage_uri.to_string(),
            handle,
            self.engine.name().to_string(),
            Utc::now(),
        );

        match self.jobs.create(&job).await {
            Ok(()) => {
                info!(
                    %transcription_id,
                    episode_id,
                    engine = %job.engine,
                    "recognition submitted"
                );
                Ok(job)
            }
            // The operation was already recorded; converge on that record.
            Err(JobStoreError::AlreadyExists(id)) => {
                warn!(transcription_id = %id, "operation already recorded");
                let (existing, _) = self.jobs.fetch(id).await?;
                Ok(existing)
            }
            Err(e) => Err(e.into()),
        }
    }
}

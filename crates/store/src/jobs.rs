//! Job records on top of the object store.
//!
//! One JSON object per job under `jobs/{id}.json`. Records are created
//! exactly once and mutated exactly once (RUNNING to a terminal state), so
//! the store's generation precondition is all the coordination needed:
//! whoever writes the terminal record at the creation generation wins, and
//! everyone else observes that write.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{JOB_CONTENT_TYPE, TranscriptionJob, job_key};
use crate::object::{GENERATION_ABSENT, ObjectStore, StoreError};

/// Attempts for the initial record write. The engine is already running by
/// the time we persist, so a transient storage failure is worth retrying
/// before the operation is abandoned unrecorded.
const CREATE_ATTEMPTS: usize = 3;

#[derive(Debug, Error)]
pub enum JobStoreError {
    #[error("job {0} not found")]
    NotFound(Uuid),
    #[error("job {0} already recorded")]
    AlreadyExists(Uuid),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("job record could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// What happened to a finalize attempt.
#[derive(Debug)]
pub enum FinalizeOutcome {
    /// This call wrote the terminal record.
    Applied,
    /// Another writer finalized first; their record is returned.
    Superseded(TranscriptionJob),
}

#[derive(Clone)]
pub struct JobStore {
    store: Arc<dyn ObjectStore>,
}

impl JobStore {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Persists a fresh RUNNING record. Refuses to overwrite an existing
    /// record for the same id.
    pub async fn create(&self, job: &TranscriptionJob) -> Result<(), JobStoreError> {
        let key = job_key(job.transcription_id);
        let data = serde_json::to_vec(job)?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .store
                .put_if_generation(&key, data.clone(), JOB_CONTENT_TYPE, GENERATION_ABSENT)
                .await
            {
                Ok(generation) => {
                    debug!(
                        transcription_id = %job.transcription_id,
                        generation,
                        "job record created"
                    );
                    return Ok(());
                }
                Err(StoreError::PreconditionFailed(_)) => {
                    return Err(JobStoreError::AlreadyExists(job.transcription_id));
                }
                Err(e) if e.is_transient() && attempt < CREATE_ATTEMPTS => {
                    warn!(
                        transcription_id = %job.transcription_id,
                        attempt,
                        error = %e,
                        "job record write failed, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Reads a record along with the generation it was read at, which is the
    /// token a later [`finalize`](Self::finalize) must present.
    pub async fn fetch(&self, id: Uuid) -> Result<(TranscriptionJob, i64), JobStoreError> {
        let object = match self.store.get(&job_key(id)).await {
            Ok(object) => object,
            Err(StoreError::NotFound(_)) => return Err(JobStoreError::NotFound(id)),
            Err(e) => return Err(e.into()),
        };
        let job = serde_json::from_slice(&object.data)?;
        Ok((job, object.generation))
    }

    /// Writes a terminal record, conditional on the record still being at
    /// `generation`. Because finalize is the only mutation after create,
    /// "generation unchanged" is exactly "still RUNNING".
    pub async fn finalize(
        &self,
        job: &TranscriptionJob,
        generation: i64,
    ) -> Result<FinalizeOutcome, JobStoreError> {
        let key = job_key(job.transcription_id);
        let data = serde_json::to_vec(job)?;

        match self
            .store
            .put_if_generation(&key, data, JOB_CONTENT_TYPE, generation)
            .await
        {
            Ok(new_generation) => {
                debug!(
                    transcription_id = %job.transcription_id,
                    status = job.status(),
                    generation = new_generation,
                    "job finalized"
                );
                Ok(FinalizeOutcome::Applied)
            }
            Err(StoreError::PreconditionFailed(_)) => {
                let (current, _) = self.fetch(job.transcription_id).await?;
                debug!(
                    transcription_id = %job.transcription_id,
                    status = current.status(),
                    "finalize superseded by an earlier writer"
                );
                Ok(FinalizeOutcome::Superseded(current))
            }
            Err(e) => Err(e.into()),
        }
    }
}

//! Poll-driven resolution of running jobs.
//!
//! A read of a RUNNING job asks the engine where the operation stands. A
//! pending answer changes nothing. A done answer is folded into a terminal
//! record and written conditionally on the generation the RUNNING record was
//! read at, so concurrent readers racing on the same job settle on a single
//! terminal state. Terminal records are served as stored; the engine is
//! never asked about them again.

use std::sync::Arc;

use castscribe_recognition::{
    EngineError, OperationStatus, RecognitionOutcome, SpeechEngine, dialogue,
};
use castscribe_store::{FinalizeOutcome, JobStore, JobStoreError, TranscriptionJob};
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("job {0} not found")]
    NotFound(Uuid),
    #[error("engine poll failed: {0}")]
    Poll(#[from] EngineError),
    #[error("job store failure: {0}")]
    Store(JobStoreError),
}

impl From<JobStoreError> for ResolveError {
    fn from(err: JobStoreError) -> Self {
        match err {
            JobStoreError::NotFound(id) => ResolveError::NotFound(id),
            other => ResolveError::Store(other),
        }
    }
}

#[derive(Clone)]
pub struct JobResolver {
    engine: Arc<dyn SpeechEngine>,
    jobs: JobStore,
}

impl JobResolver {
    pub fn new(engine: Arc<dyn SpeechEngine>, jobs: JobStore) -> Self {
        Self { engine, jobs }
    }

    /// Returns the job's current record, advancing it to a terminal state
    /// when the engine reports the operation done.
    ///
    /// A poll that cannot be answered surfaces as [`ResolveError::Poll`] and
    /// leaves the record untouched; the next read simply asks again.
    pub async fn resolve(&self, id: Uuid) -> Result<TranscriptionJob, ResolveError> {
        let (job, generation) = self.jobs.fetch(id).await?;
        if job.state.is_terminal() {
            return Ok(job);
        }

        let outcome = match self.engine.poll(&job.operation_handle).await? {
            OperationStatus::Pending => {
                debug!(transcription_id = %id, "operation still running");
                return Ok(job);
            }
            OperationStatus::Done(outcome) => outcome,
        };

        let finished_at = Utc::now();
        let terminal = match outcome {
            RecognitionOutcome::Completed(segments) => match dialogue::assemble(&segments) {
                Ok(result) => job.succeed(result, finished_at),
                // A done operation with nothing usable in it is a failed
                // job, not a server error.
                Err(e) => job.fail(e.to_string(), finished_at),
            },
            RecognitionOutcome::Failed { reason } => job.fail(reason, finished_at),
        };

        match self.jobs.finalize(&terminal, generation).await? {
            FinalizeOutcome::Applied => {
                info!(
                    transcription_id = %id,
                    status = terminal.status(),
                    "job finalized"
                );
                Ok(terminal)
            }
            FinalizeOutcome::Superseded(current) => Ok(current),
        }
    }
}

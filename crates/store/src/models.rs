use castscribe_recognition::{DialogueResult, OperationHandle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Schema version stamped on every job record. Bump when the record shape
/// changes in a way readers must distinguish.
pub const SCHEMA_VERSION: u32 = 1;

/// Content type of stored job records.
pub const JOB_CONTENT_TYPE: &str = "application/json";

/// Content type of stored canonical audio.
pub const AUDIO_CONTENT_TYPE: &str = "audio/wav";

/// Storage key for an episode's transcoded audio.
pub fn audio_key(episode_id: &str) -> String {
    format!("audio/{episode_id}.wav")
}

/// Storage key for a job record.
pub fn job_key(transcription_id: Uuid) -> String {
    format!("jobs/{transcription_id}.json")
}

/// Lifecycle state of a transcription job.
///
/// Serialized internally tagged on `status`, so a record can only carry the
/// payload its state allows: `result` exists exactly when the job succeeded,
/// `failureReason` exactly when it failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum JobState {
    #[serde(rename = "RUNNING")]
    Running,
    #[serde(rename = "SUCCEEDED")]
    Succeeded { result: DialogueResult },
    #[serde(rename = "FAILED")]
    Failed {
        #[serde(rename = "failureReason")]
        failure_reason: String,
    },
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Running)
    }

    pub fn status(&self) -> &'static str {
        match self {
            JobState::Running => "RUNNING",
            JobState::Succeeded { .. } => "SUCCEEDED",
            JobState::Failed { .. } => "FAILED",
        }
    }
}

/// A transcription job record as persisted in object storage and served to
/// clients. One record per recognition operation; `state` flattens into the
/// top level so the wire shape is flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionJob {
    pub version: u32,
    pub transcription_id: Uuid,
    pub episode_id: String,
    /// Source URL the audio was ingested from.
    pub audio_url: String,
    /// Where the transcoded audio landed, e.g. `gs://bucket/audio/ep.wav`.
    pub storage_uri: String,
    pub operation_handle: OperationHandle,
    /// Name of the engine the operation was submitted to.
    pub engine: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub state: JobState,
}

impl TranscriptionJob {
    /// A fresh RUNNING record for a newly submitted operation.
    #[allow(clippy::too_many_arguments)]
    pub fn running(
        transcription_id: Uuid,
        episode_id: String,
        audio_url: String,
        storage_uri: String,
        operation_handle: OperationHandle,
        engine: String,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION,
            transcription_id,
            episode_id,
            audio_url,
            storage_uri,
            operation_handle,
            engine,
            started_at,
            finished_at: None,
            state: JobState::Running,
        }
    }

    pub fn succeed(self, result: DialogueResult, finished_at: DateTime<Utc>) -> Self {
        Self {
            finished_at: Some(finished_at),
            state: JobState::Succeeded { result },
            ..self
        }
    }

    pub fn fail(self, failure_reason: String, finished_at: DateTime<Utc>) -> Self {
        Self {
            finished_at: Some(finished_at),
            state: JobState::Failed { failure_reason },
            ..self
        }
    }

    pub fn status(&self) -> &'static str {
        self.state.status()
    }
}

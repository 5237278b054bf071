//! Contract between the service and an asynchronous recognition engine.
//!
//! Engines accept work and answer with an opaque operation handle; the caller
//! polls that handle until the operation reports done. Implementations only
//! translate wire formats; interpreting the outcome is the caller's job.

mod http;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use http::HttpSpeechEngine;

use crate::config::RecognitionConfig;
use crate::types::RecognizedSegment;

/// Opaque reference to an in-flight recognition operation, minted by the
/// engine at submission. Its contents carry no meaning here; it is only ever
/// echoed back when polling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationHandle(String);

impl OperationHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the engine reports when a handle is polled.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationStatus {
    /// Still running; ask again later.
    Pending,
    /// Finished, one way or the other.
    Done(RecognitionOutcome),
}

/// Terminal outcome of a recognition operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionOutcome {
    /// The engine produced result segments. The list may be empty; callers
    /// decide what an empty completion means.
    Completed(Vec<RecognizedSegment>),
    /// The engine reported the operation itself failed.
    Failed { reason: String },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("engine returned {code}: {body}")]
    Status { code: u16, body: String },
    #[error("engine response could not be decoded: {0}")]
    Decode(String),
}

/// An asynchronous speech recognition engine.
#[async_trait]
pub trait SpeechEngine: Send + Sync + 'static {
    /// Submits audio already resident in object storage and returns the
    /// handle for polling. The engine fetches the audio itself via `uri`.
    async fn submit(
        &self,
        audio_uri: &str,
        config: &RecognitionConfig,
    ) -> Result<OperationHandle, EngineError>;

    /// Asks the engine for the current state of an operation. Errors here
    /// mean the question could not be answered, not that the operation
    /// failed.
    async fn poll(&self, handle: &OperationHandle) -> Result<OperationStatus, EngineError>;

    /// Identifier recorded on jobs so readers can tell which engine
    /// produced a result.
    fn name(&self) -> &str;
}

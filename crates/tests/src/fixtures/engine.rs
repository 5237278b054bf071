use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use castscribe_recognition::{
    EngineError, OperationHandle, OperationStatus, RecognitionConfig, RecognitionOutcome,
    RecognizedSegment, SpeechEngine,
};

/// Engine double whose operations finish when the test says so.
///
/// Submissions are always accepted and start out pending; tests complete or
/// fail them by handle. Call counters let tests assert that terminal jobs are
/// answered without asking the engine.
#[derive(Default)]
pub struct MockSpeechEngine {
    operations: Mutex<HashMap<String, OperationStatus>>,
    submits: AtomicUsize,
    polls: AtomicUsize,
    unreachable: AtomicBool,
}

impl MockSpeechEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an operation succeeded with the given result segments.
    pub fn complete(&self, handle: &str, segments: Vec<RecognizedSegment>) {
        self.operations.lock().unwrap().insert(
            handle.to_string(),
            OperationStatus::Done(RecognitionOutcome::Completed(segments)),
        );
    }

    /// Marks an operation failed engine-side.
    pub fn fail(&self, handle: &str, reason: &str) {
        self.operations.lock().unwrap().insert(
            handle.to_string(),
            OperationStatus::Done(RecognitionOutcome::Failed {
                reason: reason.to_string(),
            }),
        );
    }

    /// Makes every poll error until cleared, like a network partition
    /// between the service and the engine.
    pub fn set_unreachable(&self, down: bool) {
        self.unreachable.store(down, Ordering::SeqCst);
    }

    pub fn submit_count(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechEngine for MockSpeechEngine {
    async fn submit(
        &self,
        _audio_uri: &str,
        _config: &RecognitionConfig,
    ) -> Result<OperationHandle, EngineError> {
        let n = self.submits.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = format!("mock-op-{n}");
        self.operations
            .lock()
            .unwrap()
            .insert(handle.clone(), OperationStatus::Pending);
        Ok(OperationHandle::new(handle))
    }

    async fn poll(&self, handle: &OperationHandle) -> Result<OperationStatus, EngineError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(EngineError::Status {
                code: 503,
                body: "engine offline".to_string(),
            });
        }
        self.operations
            .lock()
            .unwrap()
            .get(handle.as_str())
            .cloned()
            .ok_or_else(|| EngineError::Status {
                code: 404,
                body: format!("unknown operation {handle}"),
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

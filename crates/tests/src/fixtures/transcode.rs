use std::path::Path;

use async_trait::async_trait;
use castscribe_services::{TranscodeError, Transcoder};

/// Transcoder double that copies bytes through unchanged.
pub struct CopyTranscoder;

#[async_trait]
impl Transcoder for CopyTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        tokio::fs::copy(input, output)
            .await
            .map_err(|source| TranscodeError::Spawn {
                command: "copy".to_string(),
                source,
            })?;
        Ok(())
    }
}

/// Transcoder double that rejects every file, the way ffmpeg reports a
/// corrupt or unsupported container.
pub struct RejectingTranscoder;

#[async_trait]
impl Transcoder for RejectingTranscoder {
    async fn transcode(&self, _input: &Path, _output: &Path) -> Result<(), TranscodeError> {
        Err(TranscodeError::Failed {
            status: "exit status: 1".to_string(),
            stderr: "Invalid data found when processing input".to_string(),
        })
    }
}

//! Audio normalization for recognition.
//!
//! The engine expects 16-bit PCM WAV at the sample rate and channel count
//! declared at submission, regardless of what the podcast feed serves. The
//! transcoder reads those knobs from the same recognition settings the
//! submitter uses, so the declared format always matches the artifact.

use std::ffi::OsString;
use std::path::Path;

use async_trait::async_trait;
use castscribe_config::{ClipSettings, IngestSettings};
use castscribe_recognition::RecognitionConfig;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("transcode exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

#[async_trait]
pub trait Transcoder: Send + Sync + 'static {
    /// Converts `input` into engine-ready WAV at `output`.
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}

/// Shells out to ffmpeg. Output is s16 WAV at the configured recognition
/// sample rate and channel count; an optional clip window trims the episode
/// before resampling.
pub struct FfmpegTranscoder {
    ffmpeg_path: String,
    sample_rate_hertz: u32,
    channels: u32,
    clip: Option<ClipSettings>,
}

impl FfmpegTranscoder {
    pub fn new(settings: &IngestSettings, recognition: &RecognitionConfig) -> Self {
        Self {
            ffmpeg_path: settings.ffmpeg_path.clone(),
            sample_rate_hertz: recognition.sample_rate_hertz,
            channels: recognition.channels,
            clip: settings.clip,
        }
    }

    fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-nostdin".into(),
            "-y".into(),
        ];
        // Seek options go before -i so ffmpeg seeks the input instead of
        // decoding and discarding.
        if let Some(clip) = self.clip {
            args.push("-ss".into());
            args.push(clip.offset_secs.to_string().into());
            args.push("-t".into());
            args.push(clip.duration_secs.to_string().into());
        }
        args.push("-i".into());
        args.push(input.into());
        args.push("-ar".into());
        args.push(self.sample_rate_hertz.to_string().into());
        args.push("-ac".into());
        args.push(self.channels.to_string().into());
        args.push("-sample_fmt".into());
        args.push("s16".into());
        args.push("-f".into());
        args.push("wav".into());
        args.push(output.into());
        args
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let args = self.args(input, output);
        debug!(command = %self.ffmpeg_path, "transcoding audio");

        let finished = Command::new(&self.ffmpeg_path)
            .args(&args)
            .output()
            .await
            .map_err(|source| TranscodeError::Spawn {
                command: self.ffmpeg_path.clone(),
                source,
            })?;

        if !finished.status.success() {
            return Err(TranscodeError::Failed {
                status: finished.status.to_string(),
                stderr: String::from_utf8_lossy(&finished.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

//! Engine client speaking the long-running-recognize JSON protocol.
//!
//! Submission posts a recognition request for audio already sitting in
//! object storage and gets back an operation name; polling reads the
//! operation resource until `done` flips. Word offsets arrive as protobuf
//! JSON durations (`"1.400s"`) and are converted to plain seconds here.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EngineError, OperationHandle, OperationStatus, RecognitionOutcome, SpeechEngine};
use crate::config::RecognitionConfig;
use crate::types::{RecognizedSegment, WordToken};

pub struct HttpSpeechEngine {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<String>,
}

impl HttpSpeechEngine {
    pub fn new(
        endpoint: impl Into<String>,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, EngineError> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            auth_token,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, EngineError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(EngineError::Status {
            code: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| EngineError::Decode(e.to_string()))
}

#[async_trait]
impl SpeechEngine for HttpSpeechEngine {
    async fn submit(
        &self,
        audio_uri: &str,
        config: &RecognitionConfig,
    ) -> Result<OperationHandle, EngineError> {
        let body = RecognizeRequest {
            config: RecognizeConfigBody {
                encoding: &config.encoding,
                sample_rate_hertz: config.sample_rate_hertz,
                audio_channel_count: config.channels,
                language_code: &config.language,
                enable_automatic_punctuation: config.punctuation,
                diarization_config: DiarizationConfigBody {
                    enable_speaker_diarization: true,
                    min_speaker_count: config.min_speakers,
                    max_speaker_count: config.max_speakers,
                },
            },
            audio: RecognizeAudio { uri: audio_uri },
        };

        let url = format!("{}/v1/speech:longrunningrecognize", self.endpoint);
        debug!(audio_uri, "submitting long-running recognition");
        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await?;
        let operation: OperationRef = read_json(response).await?;
        debug!(operation = %operation.name, "recognition accepted");
        Ok(OperationHandle::new(operation.name))
    }

    async fn poll(&self, handle: &OperationHandle) -> Result<OperationStatus, EngineError> {
        let url = format!("{}/v1/operations/{}", self.endpoint, handle);
        let response = self.authorize(self.client.get(&url)).send().await?;
        let operation: Operation = read_json(response).await?;
        if !operation.done {
            return Ok(OperationStatus::Pending);
        }
        Ok(OperationStatus::Done(outcome_of(operation)))
    }

    fn name(&self) -> &str {
        "google-speech-v1"
    }
}

fn outcome_of(operation: Operation) -> RecognitionOutcome {
    if let Some(error) = operation.error {
        let reason = error.message.unwrap_or_else(|| match error.code {
            Some(code) => format!("engine error code {code}"),
            None => "engine reported an unspecified error".to_string(),
        });
        return RecognitionOutcome::Failed { reason };
    }
    match operation.response {
        Some(response) => RecognitionOutcome::Completed(segments_of(response)),
        None => RecognitionOutcome::Failed {
            reason: "operation finished without a response payload".to_string(),
        },
    }
}

fn segments_of(response: RecognizeResponse) -> Vec<RecognizedSegment> {
    response
        .results
        .into_iter()
        .filter_map(|result| {
            let alternative = result.alternatives.into_iter().next()?;
            Some(RecognizedSegment {
                transcript: alternative.transcript,
                confidence: alternative.confidence,
                words: alternative.words.into_iter().map(WordToken::from).collect(),
            })
        })
        .collect()
}

/// Parses a protobuf JSON duration such as `"1.400s"` into seconds.
fn duration_secs(value: &str) -> Option<f64> {
    value.strip_suffix('s')?.trim().parse().ok()
}

impl From<WordInfo> for WordToken {
    fn from(info: WordInfo) -> Self {
        Self {
            word: info.word,
            start_time: info
                .start_time
                .as_deref()
                .and_then(duration_secs)
                .unwrap_or(0.0),
            end_time: info
                .end_time
                .as_deref()
                .and_then(duration_secs)
                .unwrap_or(0.0),
            speaker: info.speaker_tag.unwrap_or(0),
        }
    }
}

// ── Wire shapes ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct RecognizeRequest<'a> {
    config: RecognizeConfigBody<'a>,
    audio: RecognizeAudio<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeConfigBody<'a> {
    encoding: &'a str,
    sample_rate_hertz: u32,
    audio_channel_count: u32,
    language_code: &'a str,
    enable_automatic_punctuation: bool,
    diarization_config: DiarizationConfigBody,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiarizationConfigBody {
    enable_speaker_diarization: bool,
    min_speaker_count: u32,
    max_speaker_count: u32,
}

#[derive(Serialize)]
struct RecognizeAudio<'a> {
    uri: &'a str,
}

#[derive(Deserialize)]
struct OperationRef {
    name: String,
}

#[derive(Deserialize)]
struct Operation {
    #[serde(default)]
    done: bool,
    error: Option<OperationError>,
    response: Option<RecognizeResponse>,
}

#[derive(Deserialize)]
struct OperationError {
    code: Option<i64>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechResult>,
}

#[derive(Deserialize)]
struct SpeechResult {
    #[serde(default)]
    alternatives: Vec<SpeechAlternative>,
}

#[derive(Deserialize)]
struct SpeechAlternative {
    #[serde(default)]
    transcript: String,
    confidence: Option<f64>,
    #[serde(default)]
    words: Vec<WordInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WordInfo {
    word: String,
    start_time: Option<String>,
    end_time: Option<String>,
    speaker_tag: Option<u32>,
}

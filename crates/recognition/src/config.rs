use serde::{Deserialize, Serialize};

/// Parameters handed to the recognition engine when work is submitted.
///
/// These describe the audio and the recognition features to enable; they say
/// nothing about where the engine lives (that is connection config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Audio codec of the submitted file. The ingest pipeline always
    /// produces 16-bit little-endian PCM, so this stays `LINEAR16`.
    pub encoding: String,
    /// Sample rate of the submitted file in hertz. The transcoder resamples
    /// to this rate, so the value declared to the engine is always the rate
    /// of the audio it receives.
    pub sample_rate_hertz: u32,
    /// Channel count of the submitted file. Mixed down by the transcoder
    /// like the sample rate.
    pub channels: u32,
    /// BCP-47 language tag for the expected speech.
    pub language: String,
    /// Ask the engine to insert punctuation into transcripts.
    pub punctuation: bool,
    /// Lower bound on the number of distinct speakers to diarize.
    pub min_speakers: u32,
    /// Upper bound on the number of distinct speakers to diarize.
    pub max_speakers: u32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            encoding: "LINEAR16".to_string(),
            sample_rate_hertz: 16_000,
            channels: 1,
            language: "ja-JP".to_string(),
            punctuation: true,
            min_speakers: 2,
            max_speakers: 4,
        }
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single recognized word with its timing and diarization label.
///
/// Times are offsets in seconds from the start of the audio. `speaker` is the
/// engine-assigned label; `0` means the engine could not attribute the word to
/// any speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordToken {
    pub word: String,
    pub start_time: f64,
    pub end_time: f64,
    pub speaker: u32,
}

/// One result segment as returned by the recognition engine: a transcript
/// chunk, its confidence, and the diarized word timeline behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizedSegment {
    pub transcript: String,
    /// Engine confidence in `[0.0, 1.0]`. `None` or `0.0` both mean the
    /// engine did not score this segment.
    pub confidence: Option<f64>,
    pub words: Vec<WordToken>,
}

/// A maximal run of consecutive words attributed to the same speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueTurn {
    pub speaker: u32,
    pub start_time: f64,
    pub end_time: f64,
    pub words: Vec<WordToken>,
}

/// The reconstructed conversation for a finished transcription.
///
/// The same material is kept in four views so readers never have to
/// re-derive it: the full transcript text, the flat word timeline, the
/// ordered speaker turns, and a per-speaker map of utterances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueResult {
    /// All segment transcripts joined with a single space, trimmed.
    pub text: String,
    /// Flat, time-ordered word timeline. Words without a speaker label are
    /// excluded.
    pub segments: Vec<WordToken>,
    /// Speaker turns in conversation order.
    pub turns: Vec<DialogueTurn>,
    /// Speaker label -> utterances, one entry per turn, in turn order.
    pub dialogue: BTreeMap<String, Vec<String>>,
    /// Mean of the non-zero segment confidences, rounded to four decimals.
    /// `None` when no segment carried a usable confidence.
    pub avg_confidence: Option<f64>,
}

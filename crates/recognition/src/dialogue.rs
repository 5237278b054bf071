//! Reconstruction of speaker-attributed dialogue from flat engine output.
//!
//! The engine hands back result segments whose word timelines carry per-word
//! speaker labels. This module folds those timelines into conversation turns:
//! a turn is a maximal run of consecutive words with the same label. Words the
//! engine could not attribute (label `0`) are dropped before grouping so they
//! never appear in any view of the result.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::runs::group_by_key;
use crate::types::{DialogueResult, DialogueTurn, RecognizedSegment, WordToken};

#[derive(Debug, Error, PartialEq)]
pub enum ReconstructionError {
    #[error("recognition completed with no result segments")]
    Empty,
}

/// Rounds to four decimal places, the precision confidences are reported at.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Builds the final [`DialogueResult`] from the engine's result segments.
///
/// Fails only when `segments` is empty; a timeline whose words are all
/// unattributed still produces a result, just one with no turns.
pub fn assemble(segments: &[RecognizedSegment]) -> Result<DialogueResult, ReconstructionError> {
    if segments.is_empty() {
        return Err(ReconstructionError::Empty);
    }

    let text = segments
        .iter()
        .map(|s| s.transcript.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();

    let scored: Vec<f64> = segments
        .iter()
        .filter_map(|s| s.confidence)
        .filter(|c| *c != 0.0)
        .collect();
    let avg_confidence = if scored.is_empty() {
        None
    } else {
        Some(round4(scored.iter().sum::<f64>() / scored.len() as f64))
    };

    let attributed: Vec<WordToken> = segments
        .iter()
        .flat_map(|s| s.words.iter())
        .filter(|w| w.speaker != 0)
        .cloned()
        .collect();

    let turns: Vec<DialogueTurn> = group_by_key(attributed.iter().cloned(), |w| w.speaker)
        .into_iter()
        .map(|run| DialogueTurn {
            speaker: run.key,
            start_time: run.items.first().map(|w| w.start_time).unwrap_or(0.0),
            end_time: run.items.last().map(|w| w.end_time).unwrap_or(0.0),
            words: run.items,
        })
        .collect();

    let mut dialogue: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for turn in &turns {
        let utterance = turn
            .words
            .iter()
            .map(|w| w.word.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        dialogue
            .entry(turn.speaker.to_string())
            .or_default()
            .push(utterance);
    }

    Ok(DialogueResult {
        text,
        segments: attributed,
        turns,
        dialogue,
        avg_confidence,
    })
}

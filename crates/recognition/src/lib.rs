pub mod config;
pub mod dialogue;
pub mod engine;
pub mod runs;
pub mod types;

pub use config::RecognitionConfig;
pub use dialogue::{ReconstructionError, assemble};
pub use engine::{
    EngineError, HttpSpeechEngine, OperationHandle, OperationStatus, RecognitionOutcome,
    SpeechEngine,
};
pub use types::{DialogueResult, DialogueTurn, RecognizedSegment, WordToken};

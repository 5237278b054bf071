pub mod ingest;
pub mod resolve;
pub mod submit;
pub mod transcode;

pub use ingest::{AudioIngestor, IngestError};
pub use resolve::{JobResolver, ResolveError};
pub use submit::{RecognitionSubmitter, SubmitError, transcription_id_for};
pub use transcode::{FfmpegTranscoder, TranscodeError, Transcoder};

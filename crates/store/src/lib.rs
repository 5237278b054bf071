pub mod http;
pub mod jobs;
pub mod models;
pub mod object;

pub use http::HttpObjectStore;
pub use jobs::{FinalizeOutcome, JobStore, JobStoreError};
pub use models::{
    AUDIO_CONTENT_TYPE, JOB_CONTENT_TYPE, JobState, SCHEMA_VERSION, TranscriptionJob, audio_key,
    job_key,
};
pub use object::{GENERATION_ABSENT, MemoryObjectStore, ObjectStore, StoreError, StoredObject};

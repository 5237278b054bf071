use std::sync::Arc;

use castscribe_services::{AudioIngestor, JobResolver, RecognitionSubmitter};

#[derive(Clone)]
pub struct AppState {
    pub ingestor: Arc<AudioIngestor>,
    pub submitter: Arc<RecognitionSubmitter>,
    pub resolver: JobResolver,
}

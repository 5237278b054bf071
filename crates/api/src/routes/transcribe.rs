use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use castscribe_store::TranscriptionJob;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    pub episode_id: String,
    pub audio_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeResponse {
    pub transcription_id: Uuid,
    pub status: &'static str,
}

/// POST /transcribe — ingest the episode, hand it to the engine, answer with
/// the new job's id. Nothing is persisted unless the engine accepted the
/// work, so a failed ingest leaves no job behind.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<TranscribeRequest>,
) -> Result<(StatusCode, Json<TranscribeResponse>), ApiError> {
    let episode_id = body.episode_id.trim();
    if episode_id.is_empty() {
        return Err(ApiError::BadRequest("episodeId must not be empty".to_string()));
    }
    // Episode ids become storage key segments.
    if episode_id.contains('/') {
        return Err(ApiError::BadRequest("episodeId must not contain '/'".to_string()));
    }
    let audio_url = body.audio_url.trim();
    if !audio_url.starts_with("http://") && !audio_url.starts_with("https://") {
        return Err(ApiError::BadRequest(
            "audioUrl must be an http(s) URL".to_string(),
        ));
    }

    let storage_uri = state.ingestor.ingest(episode_id, audio_url).await?;
    let job = state
        .submitter
        .submit(episode_id, audio_url, &storage_uri)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TranscribeResponse {
            transcription_id: job.transcription_id,
            status: job.status(),
        }),
    ))
}

/// GET /transcribe/{transcription_id} — current job record, advancing
/// RUNNING jobs by polling the engine.
pub async fn get(
    State(state): State<AppState>,
    Path(transcription_id): Path<String>,
) -> Result<Json<TranscriptionJob>, ApiError> {
    let id = Uuid::parse_str(&transcription_id)
        .map_err(|_| ApiError::BadRequest("Invalid transcription_id".to_string()))?;

    let job = state.resolver.resolve(id).await?;
    Ok(Json(job))
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use castscribe_recognition::EngineError;
use castscribe_services::{IngestError, ResolveError, SubmitError};
use castscribe_store::{JobStoreError, StoreError};
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Validation(String),
    BadGateway(String),
    Internal(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            ApiError::Validation(msg) => write!(f, "Validation: {msg}"),
            ApiError::BadGateway(msg) => write!(f, "Bad gateway: {msg}"),
            ApiError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation", msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "bad_gateway", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            // The source URL is caller input, so fetch and decode failures
            // surface as 422 rather than 5xx.
            IngestError::Download(e) => {
                ApiError::Validation(format!("audio download failed: {e}"))
            }
            IngestError::SourceStatus { .. } => ApiError::Validation(err.to_string()),
            IngestError::Transcode(e) => ApiError::Validation(e.to_string()),
            IngestError::Upload(e) => storage_error(e),
            IngestError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Engine(e) => engine_error(e),
            SubmitError::Persist(e) => job_store_error(e),
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound(id) => {
                ApiError::NotFound(format!("transcription {id} not found"))
            }
            ResolveError::Poll(e) => ApiError::BadGateway(format!("engine poll failed: {e}")),
            ResolveError::Store(e) => job_store_error(e),
        }
    }
}

fn engine_error(err: EngineError) -> ApiError {
    match err {
        EngineError::Status { code, body } if (400..500).contains(&code) => {
            ApiError::BadRequest(format!("engine returned {code}: {body}"))
        }
        other => ApiError::BadGateway(other.to_string()),
    }
}

fn job_store_error(err: JobStoreError) -> ApiError {
    match err {
        JobStoreError::NotFound(id) => ApiError::NotFound(format!("job {id} not found")),
        JobStoreError::Store(e) => storage_error(e),
        other => ApiError::Internal(other.to_string()),
    }
}

fn storage_error(err: StoreError) -> ApiError {
    match &err {
        StoreError::Http(_)
        | StoreError::Status { .. }
        | StoreError::PreconditionFailed(_)
        | StoreError::NotFound(_) => ApiError::BadGateway(err.to_string()),
        StoreError::Decode(_) | StoreError::Io(_) => ApiError::Internal(err.to_string()),
    }
}

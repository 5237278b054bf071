//! Object store client speaking the JSON storage API.
//!
//! Media uploads go through the `upload/storage/v1` endpoint with the object
//! key as the `name` query parameter; conditional writes ride on
//! `ifGenerationMatch`, which the service answers with `412` when the stored
//! generation moved. Downloads use `alt=media` and report the generation in
//! the `x-goog-generation` header.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use castscribe_config::StorageSettings;
use futures::stream;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::object::{ObjectStore, StoreError, StoredObject};

const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

pub struct HttpObjectStore {
    client: reqwest::Client,
    endpoint: String,
    bucket: String,
    auth_token: Option<String>,
}

impl HttpObjectStore {
    pub fn new(settings: StorageSettings) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            bucket: settings.bucket,
            auth_token: settings.auth_token,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn media_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}?alt=media",
            self.endpoint,
            self.bucket,
            urlencoding::encode(key)
        )
    }

    fn upload_url(&self, key: &str, precondition: Option<i64>) -> String {
        let mut url = format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.endpoint,
            self.bucket,
            urlencoding::encode(key)
        );
        if let Some(expected) = precondition {
            url.push_str(&format!("&ifGenerationMatch={expected}"));
        }
        url
    }

    async fn upload(
        &self,
        key: &str,
        body: reqwest::Body,
        content_type: &str,
        precondition: Option<i64>,
    ) -> Result<i64, StoreError> {
        let url = self.upload_url(key, precondition);
        let response = self
            .authorize(self.client.post(&url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::PRECONDITION_FAILED {
            return Err(StoreError::PreconditionFailed(key.to_string()));
        }
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Status {
                code: status.as_u16(),
                key: key.to_string(),
                body,
            });
        }

        let metadata: ObjectMetadata =
            serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;
        let generation = metadata
            .generation
            .parse()
            .map_err(|_| StoreError::Decode(format!("bad generation for {key}")))?;
        debug!(key, generation, "object written");
        Ok(generation)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<i64, StoreError> {
        self.upload(key, data.into(), content_type, None).await
    }

    async fn put_if_generation(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        expected: i64,
    ) -> Result<i64, StoreError> {
        self.upload(key, data.into(), content_type, Some(expected))
            .await
    }

    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<i64, StoreError> {
        let file = tokio::fs::File::open(path).await?;
        let chunks = stream::unfold(file, |mut file| async move {
            let mut buf = vec![0u8; UPLOAD_CHUNK_BYTES];
            match file.read(&mut buf).await {
                Ok(0) => None,
                Ok(n) => {
                    buf.truncate(n);
                    Some((Ok(buf), file))
                }
                Err(e) => Some((Err(e), file)),
            }
        });
        self.upload(key, reqwest::Body::wrap_stream(chunks), content_type, None)
            .await
    }

    async fn get(&self, key: &str) -> Result<StoredObject, StoreError> {
        let url = self.media_url(key);
        let response = self.authorize(self.client.get(&url)).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(key.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await?;
            return Err(StoreError::Status {
                code: status.as_u16(),
                key: key.to_string(),
                body,
            });
        }

        let generation = response
            .headers()
            .get("x-goog-generation")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| StoreError::Decode(format!("missing generation header for {key}")))?;
        let data = response.bytes().await?.to_vec();
        debug!(key, generation, bytes = data.len(), "object read");
        Ok(StoredObject { data, generation })
    }

    fn uri_for(&self, key: &str) -> String {
        format!("gs://{}/{}", self.bucket, key)
    }
}

#[derive(Deserialize)]
struct ObjectMetadata {
    /// The service reports generations as decimal strings.
    generation: String,
}

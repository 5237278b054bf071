use axum::{Router, http::StatusCode, routing::get};

/// Payload served for every episode. The transcoder double copies bytes
/// through unchanged, so the content only has to be non-empty.
const EPISODE_BYTES: &[u8] = b"ID3\x04\x00\x00castscribe test episode payload";

/// Tiny HTTP host standing in for the podcast CDN episodes are pulled from.
pub struct MediaServer {
    pub base_url: String,
}

impl MediaServer {
    pub async fn spawn() -> Self {
        let app = Router::new()
            .route("/audio/{file}", get(serve_episode))
            .route("/broken/{file}", get(serve_broken));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url }
    }

    /// URL that serves a small fake episode.
    pub fn episode_url(&self, name: &str) -> String {
        format!("{}/audio/{name}", self.base_url)
    }

    /// URL on a live host that always answers 404.
    pub fn broken_url(&self, name: &str) -> String {
        format!("{}/broken/{name}", self.base_url)
    }
}

async fn serve_episode() -> &'static [u8] {
    EPISODE_BYTES
}

async fn serve_broken() -> StatusCode {
    StatusCode::NOT_FOUND
}

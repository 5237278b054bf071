//! Typed settings for the service, loaded from an optional
//! `config/default.toml` with `CASTSCRIBE__`-prefixed environment overrides
//! layered on top. Every knob has a default so a bare environment boots.

use std::path::Path;

use castscribe_recognition::RecognitionConfig;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub http: HttpSettings,
    pub storage: StorageSettings,
    pub engine: EngineSettings,
    pub ingest: IngestSettings,
    pub recognition: RecognitionConfig,
}

impl AppSettings {
    /// Loads settings from `config/default.toml` (when present) and the
    /// environment. `CASTSCRIBE__STORAGE__BUCKET=pods` overrides
    /// `storage.bucket`, and so on.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_path = Path::new("config/default.toml");
        if config_path.exists() {
            builder = builder.add_source(File::from(config_path).required(true));
        }

        builder = builder.add_source(Environment::with_prefix("CASTSCRIBE").separator("__"));

        builder.build()?.try_deserialize()
    }
}

/// Where the HTTP API listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Object storage connection. Audio and job records live in one bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub endpoint: String,
    pub bucket: String,
    pub auth_token: Option<String>,
    /// Per-request timeout for storage reads and writes, in seconds.
    pub timeout_secs: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://storage.googleapis.com".to_string(),
            bucket: "castscribe-media".to_string(),
            auth_token: None,
            timeout_secs: 30,
        }
    }
}

/// Recognition engine connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub endpoint: String,
    pub auth_token: Option<String>,
    /// Per-request timeout for submit and poll calls, in seconds.
    pub timeout_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://speech.googleapis.com".to_string(),
            auth_token: None,
            timeout_secs: 30,
        }
    }
}

/// Audio ingestion knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Timeout for establishing the connection to the audio source.
    pub connect_timeout_secs: u64,
    /// Timeout for downloading the source audio, in seconds.
    pub download_timeout_secs: u64,
    /// Binary used for transcoding. A bare name is resolved via `PATH`.
    pub ffmpeg_path: String,
    /// Optional excerpt window; when set only this slice of the episode is
    /// transcoded and submitted. Unset means the whole episode.
    pub clip: Option<ClipSettings>,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            download_timeout_secs: 60,
            ffmpeg_path: "ffmpeg".to_string(),
            clip: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClipSettings {
    /// Seconds into the episode where the excerpt starts.
    pub offset_secs: f64,
    /// Length of the excerpt in seconds.
    pub duration_secs: f64,
}

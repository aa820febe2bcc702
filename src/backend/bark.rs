//! Client for a Bark text-to-speech model server.

use tracing::debug;

use crate::audio::{Waveform, decode_wav_bytes};

use super::SpeechBackend;
use super::client::HttpClient;
use super::types::{BackendError, GenerateRequest, HealthResponse};

/// HTTP-based Bark backend.
pub struct BarkClient {
    http: HttpClient,
}

impl BarkClient {
    /// Create a new Bark client for the given server URL.
    pub fn new(server_url: &str) -> Result<Self, BackendError> {
        Ok(Self {
            http: HttpClient::new(server_url)?,
        })
    }

    /// Get the base URL for this backend.
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Check server health.
    pub fn health(&self) -> Result<HealthResponse, BackendError> {
        self.http.get_json("/health")
    }
}

impl SpeechBackend for BarkClient {
    fn preload(&self) -> Result<(), BackendError> {
        let health = self.health()?;
        debug!(
            url = self.base_url(),
            device = %health.device,
            "preloading Bark models"
        );
        self.http.post_empty("/preload")
    }

    fn generate(&self, text: &str, voice_preset: &str) -> Result<Waveform, BackendError> {
        let request = GenerateRequest {
            text: text.to_string(),
            voice_preset: voice_preset.to_string(),
        };

        let bytes = self.http.post_bytes("/generate", &request)?;
        debug!(bytes = bytes.len(), "received generated audio");

        decode_wav_bytes(&bytes).map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

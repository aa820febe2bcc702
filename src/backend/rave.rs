//! Client for a RAVE autoencoder model server.

use std::path::Path;

use ndarray::{Ix2, Ix3};
use tracing::{debug, info};

use crate::audio::Waveform;
use crate::latent::{Latent, TensorPayload};

use super::client::HttpClient;
use super::types::{
    BackendError, DecodeRequest, Device, EncodeRequest, HealthResponse, LoadRequest,
    ModelInfo,
};
use super::{LatentBackend, LatentModel};

/// HTTP-based RAVE backend, used to load model artifacts.
pub struct RaveClient {
    http: HttpClient,
}

impl RaveClient {
    /// Create a new RAVE client for the given server URL.
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

impl LatentBackend for RaveClient {
    fn load(&self, model_path: &Path) -> Result<Box<dyn LatentModel>, BackendError> {
        let health = self.health()?;
        let device = Device::select(health.cuda_available);

        info!(model = %model_path.display(), %device, "loading RAVE model");

        let request = LoadRequest::new(model_path, device)?;
        let info: ModelInfo = self.http.post_json("/load", &request)?;
        let info = info.validate()?;

        debug!(?info, "RAVE model loaded");

        Ok(Box::new(RaveModel {
            http: self.http.clone(),
            info,
            device,
        }))
    }
}

/// A model loaded on the RAVE server.
pub struct RaveModel {
    http: HttpClient,
    info: ModelInfo,
    device: Device,
}

impl LatentModel for RaveModel {
    fn encode(&self, waveform: &Waveform) -> Result<Latent, BackendError> {
        let request = EncodeRequest {
            sample_rate: waveform.sample_rate(),
            waveform: TensorPayload::from_array(waveform.samples()),
        };

        let payload: TensorPayload = self.http.post_json("/encode", &request)?;
        payload
            .into_array::<Ix3>()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    fn decode(&self, latent: &Latent) -> Result<Waveform, BackendError> {
        let request = DecodeRequest {
            latent: TensorPayload::from_array(latent),
        };

        let payload: TensorPayload = self.http.post_json("/decode", &request)?;
        let samples = payload
            .into_array::<Ix2>()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Ok(Waveform::new(samples, self.info.sample_rate))
    }

    fn sample_rate(&self) -> u32 {
        self.info.sample_rate
    }

    fn hop_length(&self) -> usize {
        self.info.hop_length
    }

    fn latent_size(&self) -> usize {
        self.info.latent_size
    }

    fn device(&self) -> Device {
        self.device
    }
}

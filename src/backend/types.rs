//! Backend request/response types.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::latent::TensorPayload;

/// Errors that can occur when communicating with a model backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{dependency} not installed")]
    Unavailable { dependency: &'static str },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid model path '{path}': {source}")]
    InvalidModelPath {
        path: String,
        source: std::io::Error,
    },
}

/// Whether a backend's optional dependency was compiled in.
///
/// Resolved once at startup and handed to the engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Missing {
        dependency: &'static str,
        hint: &'static str,
    },
}

pub const BARK_INSTALL_HINT: &str = "Rebuild with `--features bark` and run a Bark model server \
     (pip install git+https://github.com/suno-ai/bark.git scipy)";

pub const RAVE_INSTALL_HINT: &str = "Rebuild with `--features rave` and run a RAVE model server \
     (pip install acids-rave torch torchaudio)";

impl Availability {
    /// Availability of the Bark text-to-speech backend.
    pub fn bark() -> Self {
        if cfg!(feature = "bark") {
            Availability::Available
        } else {
            Availability::Missing {
                dependency: "Bark",
                hint: BARK_INSTALL_HINT,
            }
        }
    }

    /// Availability of the RAVE latent-audio backend.
    pub fn rave() -> Self {
        if cfg!(feature = "rave") {
            Availability::Available
        } else {
            Availability::Missing {
                dependency: "RAVE",
                hint: RAVE_INSTALL_HINT,
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// Compute device a model is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cuda,
    Cpu,
}

impl Device {
    /// Prefer the accelerator when the server has one.
    pub fn select(cuda_available: bool) -> Self {
        if cuda_available {
            Device::Cuda
        } else {
            Device::Cpu
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Cuda => "cuda",
            Device::Cpu => "cpu",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health check response from a model server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub cuda_available: bool,
    #[serde(default)]
    pub gpu: Option<String>,
    pub device: String,
}

/// Text-to-speech generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
    pub voice_preset: String,
}

/// Request to load a model artifact on the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadRequest {
    pub model_path: String,
    pub device: Device,
}

impl LoadRequest {
    /// Build a load request. A relative `model_path` is resolved against
    /// the caller's working directory, not the server's.
    pub fn new(model_path: &Path, device: Device) -> Result<Self, BackendError> {
        let absolute =
            std::path::absolute(model_path).map_err(|source| BackendError::InvalidModelPath {
                path: model_path.display().to_string(),
                source,
            })?;

        Ok(Self {
            model_path: absolute.display().to_string(),
            device,
        })
    }
}

/// Descriptive scalars of a loaded autoencoder model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub sample_rate: u32,
    pub hop_length: usize,
    pub latent_size: usize,
}

impl ModelInfo {
    /// Reject scalars that would make frame arithmetic meaningless.
    pub fn validate(self) -> Result<Self, BackendError> {
        if self.sample_rate == 0 || self.hop_length == 0 || self.latent_size == 0 {
            return Err(BackendError::InvalidResponse(format!(
                "Model reported zero-valued scalars: {self:?}"
            )));
        }
        Ok(self)
    }
}

/// Waveform to encode, as `[channels, frames]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeRequest {
    pub sample_rate: u32,
    pub waveform: TensorPayload,
}

/// Latent to decode, as `[batch, latent_dim, frames]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeRequest {
    pub latent: TensorPayload,
}

//! Stand-in backend for builds without a model backend feature.

use std::path::Path;

use crate::audio::Waveform;

use super::types::{Availability, BARK_INSTALL_HINT, BackendError, RAVE_INSTALL_HINT};
use super::{LatentBackend, LatentModel, SpeechBackend};

/// Backend whose every call fails with [`BackendError::Unavailable`].
#[derive(Debug, Clone, Copy)]
pub struct UnavailableBackend {
    dependency: &'static str,
    hint: &'static str,
}

impl UnavailableBackend {
    pub fn bark() -> Self {
        Self {
            dependency: "Bark",
            hint: BARK_INSTALL_HINT,
        }
    }

    pub fn rave() -> Self {
        Self {
            dependency: "RAVE",
            hint: RAVE_INSTALL_HINT,
        }
    }

    /// The availability this backend stands in for.
    pub fn availability(&self) -> Availability {
        Availability::Missing {
            dependency: self.dependency,
            hint: self.hint,
        }
    }

    fn error(&self) -> BackendError {
        BackendError::Unavailable {
            dependency: self.dependency,
        }
    }
}

impl SpeechBackend for UnavailableBackend {
    fn preload(&self) -> Result<(), BackendError> {
        Err(self.error())
    }

    fn generate(&self, _text: &str, _voice_preset: &str) -> Result<Waveform, BackendError> {
        Err(self.error())
    }
}

impl LatentBackend for UnavailableBackend {
    fn load(&self, _model_path: &Path) -> Result<Box<dyn LatentModel>, BackendError> {
        Err(self.error())
    }
}

//! Engine error type.

use thiserror::Error;

use crate::audio::AudioError;
use crate::backend::{Availability, BackendError};
use crate::cli::ArgsError;
use crate::latent::LatentError;
use crate::report::Report;
use crate::voice::VoiceError;

/// Errors that can occur while running a synthesis or latent operation.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{dependency} not installed")]
    BackendUnavailable {
        dependency: &'static str,
        hint: &'static str,
    },

    #[error("No model loaded")]
    NoModelLoaded,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Args(#[from] ArgsError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Latent(#[from] LatentError),

    #[error(transparent)]
    Voice(#[from] VoiceError),
}

impl EngineError {
    /// Fail with [`EngineError::BackendUnavailable`] if the dependency is missing.
    pub fn check_available(availability: Availability) -> Result<(), EngineError> {
        match availability {
            Availability::Available => Ok(()),
            Availability::Missing { dependency, hint } => {
                Err(EngineError::BackendUnavailable { dependency, hint })
            }
        }
    }

    /// Installation hint for a missing dependency.
    pub fn note(&self) -> Option<&'static str> {
        match self {
            EngineError::BackendUnavailable { hint, .. } => Some(*hint),
            _ => None,
        }
    }
}

impl<T: serde::Serialize> From<EngineError> for Report<T> {
    fn from(error: EngineError) -> Self {
        let note = error.note();
        let report = Report::failure(&error);
        match note {
            Some(note) => report.with_note(note),
            None => report,
        }
    }
}

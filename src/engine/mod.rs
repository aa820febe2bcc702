//! Engines for the two tools.
//!
//! [`VoiceSynthesizer`] drives a text-to-speech backend and
//! [`LatentProcessor`] drives a loaded autoencoder model. Both turn every
//! outcome into a [`crate::report::Report`].

mod error;
mod processor;
mod voice;

pub use error::EngineError;
pub use processor::{LatentProcessor, LatentRequest, interpolation_file_name};
pub use voice::VoiceSynthesizer;

//! genvoice-rs: Bark voice synthesis and RAVE latent-audio tools.
//!
//! This crate backs two command-line tools that drive external generative
//! audio models and report every outcome as a single JSON object:
//! `voice-synth` (Bark text-to-speech) and `latent-audio` (RAVE
//! encode/decode, synthesis, interpolation and latent effects).

pub mod audio;
pub mod backend;
pub mod cli;
pub mod engine;
pub mod latent;
pub mod logging;
pub mod report;
pub mod voice;

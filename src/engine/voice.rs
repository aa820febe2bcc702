//! Voice synthesis: text in, WAV file and JSON report out.

use std::path::Path;

use tracing::{info, warn};

use crate::audio::{ensure_parent_dir, write_wav};
use crate::backend::{Availability, SpeechBackend};
use crate::report::{Report, SynthesisOutput};
use crate::voice::resolve_preset;

use super::EngineError;

/// Runs one text-to-speech generation against a speech backend.
pub struct VoiceSynthesizer<B: SpeechBackend> {
    backend: B,
    availability: Availability,
}

impl<B: SpeechBackend> VoiceSynthesizer<B> {
    /// Create a new synthesizer.
    pub fn new(backend: B, availability: Availability) -> Self {
        Self {
            backend,
            availability,
        }
    }

    /// Generate speech and write it to `output`.
    ///
    /// Never fails: every error is folded into a failure report.
    pub fn generate(
        &self,
        text: &str,
        voice_preset: &str,
        output: &Path,
    ) -> Report<SynthesisOutput> {
        match self.try_generate(text, voice_preset, output) {
            Ok(result) => Report::success(result),
            Err(e) => {
                warn!(error = %e, "voice generation failed");
                e.into()
            }
        }
    }

    /// Generate speech and write it to `output`, propagating errors.
    pub fn try_generate(
        &self,
        text: &str,
        voice_preset: &str,
        output: &Path,
    ) -> Result<SynthesisOutput, EngineError> {
        EngineError::check_available(self.availability)?;

        if text.trim().is_empty() {
            return Err(EngineError::InvalidArgument(
                "Text cannot be empty".to_string(),
            ));
        }

        let preset = resolve_preset(voice_preset)?;

        info!("Loading Bark models...");
        self.backend.preload()?;

        info!("Generating audio with voice preset: {preset}");
        let audio = self.backend.generate(text, &preset)?;

        ensure_parent_dir(output)?;
        write_wav(output, &audio)?;

        info!(
            path = %output.display(),
            frames = audio.frames(),
            "audio written"
        );

        Ok(SynthesisOutput {
            output_path: output.display().to_string(),
            duration: audio.duration(),
            sample_rate: audio.sample_rate(),
            voice_preset: preset,
        })
    }
}

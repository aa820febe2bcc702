//! Latent-audio processing on top of a loaded autoencoder model.

use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::audio::{AudioError, Waveform, ensure_parent_dir, read_wav, write_wav};
use crate::backend::{Availability, LatentBackend, LatentModel};
use crate::latent::{
    Effect, Latent, blend_weights, lerp, num_frames, read_latent, sample_latent,
};
use crate::report::{
    DecodeOutput, EffectOutput, EncodeOutput, InterpolateOutput, LatentOutput, Report,
    SynthesizeOutput,
};

use super::EngineError;

/// One latent-audio command with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum LatentRequest {
    Encode {
        input: PathBuf,
    },
    Decode {
        latent: PathBuf,
        output: PathBuf,
    },
    Synthesize {
        duration: f64,
        temperature: f32,
        output: Option<PathBuf>,
    },
    Interpolate {
        first: PathBuf,
        second: PathBuf,
        steps: usize,
        output_dir: Option<PathBuf>,
    },
    Effect {
        input: PathBuf,
        effect: Effect,
        intensity: f32,
        output: Option<PathBuf>,
    },
}

/// Runs latent-audio operations against an optional loaded model.
pub struct LatentProcessor<M: LatentModel> {
    model: Option<M>,
    rng: StdRng,
}

impl LatentProcessor<Box<dyn LatentModel>> {
    /// Build a processor from a backend, loading `model_path` if given.
    pub fn from_backend(
        availability: Availability,
        backend: &dyn LatentBackend,
        model_path: Option<&Path>,
        seed: Option<u64>,
    ) -> Result<Self, EngineError> {
        EngineError::check_available(availability)?;

        let model = model_path.map(|path| backend.load(path)).transpose()?;
        if let Some(model) = &model {
            info!(
                sample_rate = model.sample_rate(),
                hop_length = model.hop_length(),
                latent_size = model.latent_size(),
                device = %model.device(),
                "model ready"
            );
        }

        Ok(Self::new(model, seed))
    }
}

impl<M: LatentModel> LatentProcessor<M> {
    /// Create a processor. Without a seed, sampling draws from OS entropy.
    pub fn new(model: Option<M>, seed: Option<u64>) -> Self {
        if model.is_none() {
            warn!("No model loaded. Provide --model for processing.");
        }

        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        Self { model, rng }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// The loaded model, if any.
    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    fn loaded_model(&self) -> Result<&M, EngineError> {
        self.model.as_ref().ok_or(EngineError::NoModelLoaded)
    }

    /// Run a request and wrap the result in a report.
    ///
    /// A missing model is reported as a failure; any other error is
    /// returned to the caller.
    pub fn dispatch(
        &mut self,
        request: &LatentRequest,
    ) -> Result<Report<LatentOutput>, EngineError> {
        match self.execute(request) {
            Ok(output) => Ok(Report::success(output)),
            Err(EngineError::NoModelLoaded) => Ok(EngineError::NoModelLoaded.into()),
            Err(e) => Err(e),
        }
    }

    fn execute(&mut self, request: &LatentRequest) -> Result<LatentOutput, EngineError> {
        self.loaded_model()?;

        match request {
            LatentRequest::Encode { input } => self.encode(input).map(LatentOutput::Encode),
            LatentRequest::Decode { latent, output } => {
                let latent = read_latent(latent)?;
                self.decode(&latent, output).map(LatentOutput::Decode)
            }
            LatentRequest::Synthesize {
                duration,
                temperature,
                output,
            } => self
                .synthesize(*duration, *temperature, output.as_deref())
                .map(LatentOutput::Synthesize),
            LatentRequest::Interpolate {
                first,
                second,
                steps,
                output_dir,
            } => self
                .interpolate(first, second, *steps, output_dir.as_deref())
                .map(LatentOutput::Interpolate),
            LatentRequest::Effect {
                input,
                effect,
                intensity,
                output,
            } => self
                .apply_effect(input, effect, *intensity, output.as_deref())
                .map(LatentOutput::Effect),
        }
    }

    /// Encode an audio file and report the latent shape.
    pub fn encode(&self, input: &Path) -> Result<EncodeOutput, EngineError> {
        let model = self.loaded_model()?;
        let waveform = read_wav(input)?;
        let z = model.encode(&waveform)?;

        Ok(EncodeOutput {
            latent_shape: z.shape().to_vec(),
            sample_rate: waveform.sample_rate(),
        })
    }

    /// Decode a latent and write the audio to `output`.
    pub fn decode(&self, latent: &Latent, output: &Path) -> Result<DecodeOutput, EngineError> {
        let model = self.loaded_model()?;
        let audio = model.decode(latent)?;
        save(output, &audio)?;

        Ok(DecodeOutput {
            output_path: output.display().to_string(),
            duration: audio.duration(),
        })
    }

    /// Decode a random latent of `duration` seconds scaled by `temperature`.
    pub fn synthesize(
        &mut self,
        duration: f64,
        temperature: f32,
        output: Option<&Path>,
    ) -> Result<SynthesizeOutput, EngineError> {
        let model = self.model.as_ref().ok_or(EngineError::NoModelLoaded)?;

        if !duration.is_finite() || duration <= 0.0 {
            return Err(EngineError::InvalidArgument(format!(
                "Duration must be positive, got {duration}"
            )));
        }
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(EngineError::InvalidArgument(format!(
                "Temperature must be non-negative, got {temperature}"
            )));
        }

        let frames = num_frames(duration, model.sample_rate(), model.hop_length());
        if frames == 0 {
            return Err(EngineError::InvalidArgument(format!(
                "Duration {duration}s is shorter than one latent frame"
            )));
        }

        let z = sample_latent(&mut self.rng, model.latent_size(), frames, temperature)?;
        debug!(shape = ?z.shape(), "sampled latent");

        let audio = model.decode(&z)?;
        if let Some(path) = output {
            save(path, &audio)?;
        }

        Ok(SynthesizeOutput {
            output_path: output.map(|p| p.display().to_string()),
            duration,
            temperature,
            latent_shape: z.shape().to_vec(),
        })
    }

    /// Blend two encoded inputs in `steps` equal increments.
    ///
    /// Each blend is decoded; when `output_dir` is given it is written as
    /// `interpolation_NNN.wav`.
    pub fn interpolate(
        &self,
        first: &Path,
        second: &Path,
        steps: usize,
        output_dir: Option<&Path>,
    ) -> Result<InterpolateOutput, EngineError> {
        let model = self.loaded_model()?;

        if steps < 2 {
            return Err(EngineError::InvalidArgument(format!(
                "Interpolation needs at least 2 steps, got {steps}"
            )));
        }

        let z1 = model.encode(&read_wav(first)?)?;
        let z2 = model.encode(&read_wav(second)?)?;

        if let Some(dir) = output_dir {
            std::fs::create_dir_all(dir).map_err(AudioError::from)?;
        }

        let mut interpolations = Vec::new();
        for (i, alpha) in blend_weights(steps).into_iter().enumerate() {
            let z = lerp(&z1, &z2, alpha)?;
            let audio = model.decode(&z)?;

            if let Some(dir) = output_dir {
                let path = dir.join(interpolation_file_name(i));
                write_wav(&path, &audio)?;
                interpolations.push(path.display().to_string());
            }
        }

        Ok(InterpolateOutput {
            interpolations,
            num_steps: steps,
        })
    }

    /// Encode, perturb the latent, and decode.
    pub fn apply_effect(
        &mut self,
        input: &Path,
        effect: &Effect,
        intensity: f32,
        output: Option<&Path>,
    ) -> Result<EffectOutput, EngineError> {
        let model = self.model.as_ref().ok_or(EngineError::NoModelLoaded)?;

        let z = model.encode(&read_wav(input)?)?;
        let modified = effect.apply(&z, intensity, &mut self.rng)?;
        debug!(
            effect = effect.as_str(),
            from = ?z.shape(),
            to = ?modified.shape(),
            "effect applied"
        );

        let audio = model.decode(&modified)?;
        if let Some(path) = output {
            save(path, &audio)?;
        }

        Ok(EffectOutput {
            output_path: output.map(|p| p.display().to_string()),
            effect: effect.as_str().to_string(),
            intensity,
        })
    }
}

/// File name of the `index`-th interpolation step.
pub fn interpolation_file_name(index: usize) -> String {
    format!("interpolation_{index:03}.wav")
}

fn save(path: &Path, audio: &Waveform) -> Result<(), EngineError> {
    ensure_parent_dir(path)?;
    write_wav(path, audio)?;
    Ok(())
}

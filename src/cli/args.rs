//! CLI argument definitions and parsing.

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::backend::{DEFAULT_BARK_URL, DEFAULT_RAVE_URL};
use crate::engine::LatentRequest;
use crate::latent::{DEFAULT_EFFECT, Effect};

/// Bark text-to-speech with a JSON report on stdout.
#[derive(Parser, Debug)]
#[command(name = "voice-synth")]
#[command(about = "Generate expressive speech with Bark and report the result as JSON")]
#[command(version)]
pub struct SynthArgs {
    /// Text to synthesize
    #[arg(long)]
    pub text: String,

    /// Bark voice preset ("v2/en_speaker_6") or alias ("neutral", "french", ...)
    #[arg(long)]
    pub voice: String,

    /// Output audio file path
    #[arg(long)]
    pub output: PathBuf,

    /// Bark model server URL
    #[arg(long, env = "BARK_SERVER_URL", default_value = DEFAULT_BARK_URL)]
    pub server: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// RAVE latent-space audio processing with a JSON report on stdout.
#[derive(Parser, Debug)]
#[command(name = "latent-audio")]
#[command(about = "Encode, decode, synthesize and transform audio in RAVE latent space")]
#[command(version)]
pub struct LatentArgs {
    /// Path to RAVE model (.ts file)
    #[arg(long, env = "RAVE_MODEL_PATH")]
    pub model: Option<PathBuf>,

    /// Operation to run
    #[arg(long, value_enum)]
    pub command: LatentCommand,

    /// Input audio file; pass twice for interpolate, a latent JSON file for decode
    #[arg(long)]
    pub input: Vec<PathBuf>,

    /// Output audio file (output directory for interpolate)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Duration in seconds for synthesis
    #[arg(long, default_value = "5.0")]
    pub duration: f64,

    /// Sampling temperature for synthesis
    #[arg(long, default_value = "1.0")]
    pub temperature: f32,

    /// Effect type: timbre_shift, pitch_shift or texture
    #[arg(long, default_value = DEFAULT_EFFECT)]
    pub effect: String,

    /// Effect intensity (0.0 to 1.0)
    #[arg(long, default_value = "0.5", allow_negative_numbers = true)]
    pub intensity: f32,

    /// Number of interpolation steps
    #[arg(long, default_value = "10")]
    pub steps: usize,

    /// Seed for latent sampling and effect noise
    #[arg(long)]
    pub seed: Option<u64>,

    /// RAVE model server URL
    #[arg(long, env = "RAVE_SERVER_URL", default_value = DEFAULT_RAVE_URL)]
    pub server: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Latent-audio operation selection.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LatentCommand {
    Encode,
    Decode,
    Synthesize,
    Interpolate,
    Effect,
}

impl LatentCommand {
    /// Returns the CLI argument string for this command.
    pub fn as_str(&self) -> &'static str {
        match self {
            LatentCommand::Encode => "encode",
            LatentCommand::Decode => "decode",
            LatentCommand::Synthesize => "synthesize",
            LatentCommand::Interpolate => "interpolate",
            LatentCommand::Effect => "effect",
        }
    }
}

impl fmt::Display for LatentCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur when turning arguments into a request.
#[derive(Error, Debug)]
pub enum ArgsError {
    #[error("{command} expects {expected} --input value(s), got {got}")]
    InputCount {
        command: LatentCommand,
        expected: usize,
        got: usize,
    },

    #[error("{0} requires --output")]
    MissingOutput(LatentCommand),
}

impl LatentArgs {
    /// Build the request for the selected command.
    ///
    /// # Returns
    /// * `Ok(LatentRequest)` if the command has the inputs it needs
    /// * `Err(ArgsError)` if an input or output path is missing
    pub fn to_request(&self) -> Result<LatentRequest, ArgsError> {
        let request = match self.command {
            LatentCommand::Encode => LatentRequest::Encode {
                input: self.single_input()?,
            },
            LatentCommand::Decode => LatentRequest::Decode {
                latent: self.single_input()?,
                output: self
                    .output
                    .clone()
                    .ok_or(ArgsError::MissingOutput(self.command))?,
            },
            LatentCommand::Synthesize => LatentRequest::Synthesize {
                duration: self.duration,
                temperature: self.temperature,
                output: self.output.clone(),
            },
            LatentCommand::Interpolate => match self.input.as_slice() {
                [first, second] => LatentRequest::Interpolate {
                    first: first.clone(),
                    second: second.clone(),
                    steps: self.steps,
                    output_dir: self.output.clone(),
                },
                inputs => {
                    return Err(ArgsError::InputCount {
                        command: self.command,
                        expected: 2,
                        got: inputs.len(),
                    });
                }
            },
            LatentCommand::Effect => LatentRequest::Effect {
                input: self.single_input()?,
                effect: Effect::from(self.effect.as_str()),
                intensity: self.intensity,
                output: self.output.clone(),
            },
        };

        Ok(request)
    }

    fn single_input(&self) -> Result<PathBuf, ArgsError> {
        match self.input.as_slice() {
            [input] => Ok(input.clone()),
            inputs => Err(ArgsError::InputCount {
                command: self.command,
                expected: 1,
                got: inputs.len(),
            }),
        }
    }
}

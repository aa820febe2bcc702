//! JSON result reports.
//!
//! Every invocation of either tool prints exactly one [`Report`] to stdout.
//! The report is a flat object: `success` plus the operation's output
//! fields on success, or `error` (and sometimes `note`) on failure.

use std::fmt::Display;
use std::io::{self, Write};

use serde::Serialize;

/// Result report printed once per invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report<T> {
    pub success: bool,
    #[serde(flatten)]
    pub output: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl<T: Serialize> Report<T> {
    pub fn success(output: T) -> Self {
        Self {
            success: true,
            output: Some(output),
            error: None,
            note: None,
        }
    }

    pub fn failure(error: impl Display) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.to_string()),
            note: None,
        }
    }

    /// Attach an installation or usage hint.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Serialize to a single-line JSON object.
    ///
    /// Never fails: a serialization error becomes a failure object.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({
                "success": false,
                "error": format!("Failed to serialize report: {e}"),
            })
            .to_string()
        })
    }

    /// Print the report to stdout.
    pub fn emit(&self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", self.to_json())?;
        stdout.flush()
    }
}

/// Output of a voice synthesis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisOutput {
    pub output_path: String,
    pub duration: f64,
    pub sample_rate: u32,
    pub voice_preset: String,
}

/// Output of `encode`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodeOutput {
    pub latent_shape: Vec<usize>,
    pub sample_rate: u32,
}

/// Output of `decode`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeOutput {
    pub output_path: String,
    pub duration: f64,
}

/// Output of `synthesize`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesizeOutput {
    pub output_path: Option<String>,
    pub duration: f64,
    pub temperature: f32,
    pub latent_shape: Vec<usize>,
}

/// Output of `interpolate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterpolateOutput {
    pub interpolations: Vec<String>,
    pub num_steps: usize,
}

/// Output of `effect`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectOutput {
    pub output_path: Option<String>,
    pub effect: String,
    pub intensity: f32,
}

/// Output of any latent-audio command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LatentOutput {
    Encode(EncodeOutput),
    Decode(DecodeOutput),
    Synthesize(SynthesizeOutput),
    Interpolate(InterpolateOutput),
    Effect(EffectOutput),
}

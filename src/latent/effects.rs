//! Latent-space effects.

use rand::Rng;

use super::tensor::{Latent, LatentError, gaussian_like, resample_time};

/// Name of the effect used when none is requested.
pub const DEFAULT_EFFECT: &str = "timbre_shift";

/// A perturbation applied to a latent before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Additive Gaussian noise.
    TimbreShift,
    /// Linear time-stretch of the latent sequence.
    PitchShift,
    /// Multiplicative Gaussian noise.
    Texture,
    /// Any unrecognized name; leaves the latent untouched.
    Passthrough(String),
}

impl From<&str> for Effect {
    fn from(name: &str) -> Self {
        match name {
            "timbre_shift" => Effect::TimbreShift,
            "pitch_shift" => Effect::PitchShift,
            "texture" => Effect::Texture,
            other => Effect::Passthrough(other.to_string()),
        }
    }
}

impl Effect {
    /// Returns the effect name as given on the command line.
    pub fn as_str(&self) -> &str {
        match self {
            Effect::TimbreShift => "timbre_shift",
            Effect::PitchShift => "pitch_shift",
            Effect::Texture => "texture",
            Effect::Passthrough(name) => name,
        }
    }

    /// Apply the effect at the given intensity.
    ///
    /// Intensity is nominally in `[0, 1]` but is not checked. A pitch
    /// shift that would stretch the latent past its size limit fails.
    pub fn apply<R: Rng>(
        &self,
        z: &Latent,
        intensity: f32,
        rng: &mut R,
    ) -> Result<Latent, LatentError> {
        match self {
            Effect::TimbreShift => {
                let noise = gaussian_like(rng, z);
                Ok(z + &(noise * (intensity * 0.1)))
            }
            Effect::PitchShift => resample_time(z, 1.0 + f64::from(intensity) * 0.2),
            Effect::Texture => {
                let noise = gaussian_like(rng, z);
                Ok(z * &noise.mapv(|n| 1.0 + n * intensity * 0.05))
            }
            Effect::Passthrough(_) => Ok(z.clone()),
        }
    }
}

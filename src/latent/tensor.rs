//! Latent arrays, blending, time resampling and their JSON tensor form.

use std::path::Path;

use ndarray::{Array, Array3, ArrayBase, ArrayD, Axis, Data, Dimension, Ix3, IxDyn};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A latent sequence shaped `[batch, latent_dim, frames]`.
pub type Latent = Array3<f32>;

/// Largest latent, in elements, that is ever allocated (1 GiB of `f32`).
pub const MAX_LATENT_ELEMENTS: usize = 1 << 28;

/// Errors that can occur while handling latent tensors.
#[derive(Error, Debug)]
pub enum LatentError {
    #[error("Latent shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    #[error("Invalid tensor: {0}")]
    InvalidTensor(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Row-major tensor as exchanged with model servers and latent files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorPayload {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl TensorPayload {
    /// Flatten an array in logical (row-major) order.
    pub fn from_array<S, D>(array: &ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        Self {
            shape: array.shape().to_vec(),
            data: array.iter().copied().collect(),
        }
    }

    /// Rebuild an array of fixed dimensionality.
    pub fn into_array<D: Dimension>(self) -> Result<Array<f32, D>, LatentError> {
        let shape = self.shape.clone();
        ArrayD::from_shape_vec(IxDyn(&self.shape), self.data)
            .map_err(|e| LatentError::InvalidTensor(format!("{e} for shape {shape:?}")))?
            .into_dimensionality::<D>()
            .map_err(|_| {
                LatentError::InvalidTensor(format!(
                    "Expected {} dimensions, got shape {shape:?}",
                    D::NDIM.unwrap_or(0)
                ))
            })
    }
}

/// Load a `{shape, data}` JSON latent file.
pub fn read_latent(path: &Path) -> Result<Latent, LatentError> {
    let json = std::fs::read_to_string(path)?;
    let payload: TensorPayload = serde_json::from_str(&json)?;
    payload.into_array::<Ix3>()
}

/// Number of latent frames covering `duration` seconds, truncated.
pub fn num_frames(duration: f64, sample_rate: u32, hop_length: usize) -> usize {
    (duration * f64::from(sample_rate) / hop_length as f64) as usize
}

/// Check that a `[batch, dims, frames]` latent fits within [`MAX_LATENT_ELEMENTS`].
pub fn check_latent_size(batch: usize, dims: usize, frames: usize) -> Result<(), LatentError> {
    batch
        .checked_mul(dims)
        .and_then(|n| n.checked_mul(frames))
        .filter(|&n| n <= MAX_LATENT_ELEMENTS)
        .map(|_| ())
        .ok_or_else(|| {
            LatentError::InvalidTensor(format!(
                "Latent shape [{batch}, {dims}, {frames}] exceeds {MAX_LATENT_ELEMENTS} elements"
            ))
        })
}

/// Draw a `[1, latent_size, frames]` standard-normal latent scaled by `temperature`.
pub fn sample_latent<R: Rng>(
    rng: &mut R,
    latent_size: usize,
    frames: usize,
    temperature: f32,
) -> Result<Latent, LatentError> {
    check_latent_size(1, latent_size, frames)?;
    Ok(Array3::from_shape_simple_fn((1, latent_size, frames), || {
        rng.sample::<f32, _>(StandardNormal) * temperature
    }))
}

/// Standard-normal noise with the same shape as `like`.
pub fn gaussian_like<R: Rng>(rng: &mut R, like: &Latent) -> Latent {
    Array3::from_shape_simple_fn(like.raw_dim(), || rng.sample::<f32, _>(StandardNormal))
}

/// Blend weights `i / (steps - 1)` for `steps >= 2`.
pub fn blend_weights(steps: usize) -> Vec<f32> {
    let last = steps.saturating_sub(1).max(1) as f32;
    (0..steps).map(|i| i as f32 / last).collect()
}

/// Linear blend `(1 - alpha) * z1 + alpha * z2`.
pub fn lerp(z1: &Latent, z2: &Latent, alpha: f32) -> Result<Latent, LatentError> {
    if z1.shape() != z2.shape() {
        return Err(LatentError::ShapeMismatch {
            left: z1.shape().to_vec(),
            right: z2.shape().to_vec(),
        });
    }

    let mut blended = z1 * (1.0 - alpha);
    blended.scaled_add(alpha, z2);
    Ok(blended)
}

/// Resample along the time axis with linear interpolation.
///
/// Output length is `floor(frames * scale)`; source positions use
/// half-pixel centers (`align_corners = false`), clamped at zero.
/// Fails when the stretched latent would exceed [`MAX_LATENT_ELEMENTS`].
pub fn resample_time(z: &Latent, scale: f64) -> Result<Latent, LatentError> {
    let (batch, dims, frames) = z.dim();
    let stretched = (frames as f64 * scale).floor();

    // NaN and non-positive lengths collapse to an empty sequence
    if frames == 0 || !(stretched >= 1.0) {
        return Ok(Array3::zeros((batch, dims, 0)));
    }

    let out_frames = stretched as usize;
    check_latent_size(batch, dims, out_frames)?;

    let mut out = Array3::zeros((batch, dims, out_frames));
    for (dst, mut column) in out.axis_iter_mut(Axis(2)).enumerate() {
        let src = ((dst as f64 + 0.5) / scale - 0.5).max(0.0);
        let i0 = (src.floor() as usize).min(frames - 1);
        let i1 = (i0 + 1).min(frames - 1);
        let lambda = (src - i0 as f64) as f32;

        let left = z.index_axis(Axis(2), i0);
        let right = z.index_axis(Axis(2), i1);
        column.assign(&(&left * (1.0 - lambda) + &right * lambda));
    }

    Ok(out)
}

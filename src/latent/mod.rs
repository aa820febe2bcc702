//! Latent-space operations for autoencoder audio models.
//!
//! Everything here is pure array math on `[batch, latent_dim, frames]`
//! latents; encoding and decoding stay behind the model backend.

mod effects;
mod tensor;

pub use effects::{DEFAULT_EFFECT, Effect};
pub use tensor::{
    Latent, LatentError, MAX_LATENT_ELEMENTS, TensorPayload, blend_weights, check_latent_size,
    gaussian_like, lerp, num_frames, read_latent, resample_time, sample_latent,
};

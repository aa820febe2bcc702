//! Waveform container and WAV file I/O.
//!
//! All audio is held as 32-bit float samples in a `[channels, frames]`
//! array and written back out as 32-bit float WAV.

mod wav;

pub use wav::{AudioError, Waveform, decode_wav_bytes, ensure_parent_dir, read_wav, write_wav};

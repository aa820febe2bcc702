//! Voice preset handling for the Bark text-to-speech backend.

mod presets;

pub use presets::{PRESET_ALIASES, VoiceError, resolve_preset};

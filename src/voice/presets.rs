//! Bark voice preset resolution.

use thiserror::Error;

/// Errors that can occur when resolving a voice preset.
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Invalid voice preset: {0}")]
    InvalidPreset(String),
}

/// Friendly aliases for Bark history prompts.
pub const PRESET_ALIASES: &[(&str, &str)] = &[
    ("digital_female", "v2/en_speaker_6"),
    ("energetic_female", "v2/en_speaker_9"),
    ("confident_male", "v2/en_speaker_0"),
    ("smooth_male", "v2/en_speaker_8"),
    ("neutral", "v2/en_speaker_1"),
    ("spanish", "v2/es_speaker_3"),
    ("french", "v2/fr_speaker_5"),
    ("german", "v2/de_speaker_3"),
    ("italian", "v2/it_speaker_0"),
    ("portuguese", "v2/pt_speaker_4"),
    ("chinese", "v2/zh_speaker_7"),
    ("japanese", "v2/ja_speaker_2"),
    ("korean", "v2/ko_speaker_1"),
];

/// Resolve a preset name to the history prompt sent to Bark.
///
/// Aliases are matched case-insensitively; anything else, such as
/// `v2/en_speaker_3` or a custom prompt file, is passed through trimmed.
pub fn resolve_preset(name: &str) -> Result<String, VoiceError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(VoiceError::InvalidPreset(
            "Preset cannot be empty".to_string(),
        ));
    }

    let resolved = PRESET_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .map_or(name, |&(_, prompt)| prompt);

    Ok(resolved.to_string())
}

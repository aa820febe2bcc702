//! WAV file reading and writing.

use std::io::{Cursor, Read};
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use ndarray::{Array1, Array2, Axis};
use thiserror::Error;

/// Errors that can occur while reading or writing audio.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid audio: {0}")]
    InvalidAudio(String),

    #[error("WAV error: {0}")]
    WavError(#[from] hound::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Audio samples laid out as `[channels, frames]` at a fixed sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Array2<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Create a waveform from a `[channels, frames]` array.
    pub fn new(samples: Array2<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Create a single-channel waveform.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self::new(Array1::from(samples).insert_axis(Axis(0)), sample_rate)
    }

    pub fn samples(&self) -> &Array2<f32> {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.samples.nrows()
    }

    /// Number of samples per channel.
    pub fn frames(&self) -> usize {
        self.samples.ncols()
    }

    /// Duration in seconds: frame count divided by sample rate.
    pub fn duration(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Read a WAV file into a float waveform.
///
/// Integer PCM is scaled into `[-1.0, 1.0)`.
pub fn read_wav(path: &Path) -> Result<Waveform, AudioError> {
    if !path.exists() {
        return Err(AudioError::FileNotFound(path.display().to_string()));
    }

    decode(WavReader::open(path)?)
}

/// Decode an in-memory WAV file, as returned by a model server.
pub fn decode_wav_bytes(bytes: &[u8]) -> Result<Waveform, AudioError> {
    decode(WavReader::new(Cursor::new(bytes))?)
}

fn decode<R: Read>(reader: WavReader<R>) -> Result<Waveform, AudioError> {
    let spec = reader.spec();
    let channels = usize::from(spec.channels);

    if channels == 0 {
        return Err(AudioError::InvalidAudio("WAV has zero channels".to_string()));
    }

    let mut interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    // Drop a trailing partial frame
    let frames = interleaved.len() / channels;
    interleaved.truncate(frames * channels);

    let samples = Array2::from_shape_vec((frames, channels), interleaved)
        .map_err(|e| AudioError::InvalidAudio(e.to_string()))?
        .reversed_axes();

    Ok(Waveform::new(samples, spec.sample_rate))
}

/// Write a waveform as 32-bit float WAV at its own sample rate.
pub fn write_wav(path: &Path, waveform: &Waveform) -> Result<(), AudioError> {
    let channels = u16::try_from(waveform.channels()).map_err(|_| {
        AudioError::InvalidAudio(format!("Too many channels: {}", waveform.channels()))
    })?;

    if channels == 0 {
        return Err(AudioError::InvalidAudio(
            "Waveform has zero channels".to_string(),
        ));
    }

    let spec = WavSpec {
        channels,
        sample_rate: waveform.sample_rate(),
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for frame in waveform.samples().axis_iter(Axis(1)) {
        for &sample in frame {
            writer.write_sample(sample)?;
        }
    }
    writer.finalize()?;

    Ok(())
}

/// Create every missing parent directory of `path`.
pub fn ensure_parent_dir(path: &Path) -> Result<(), AudioError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(())
}

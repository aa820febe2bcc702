//! Model backends for text-to-speech and latent-audio processing.
//!
//! The models themselves run in external model servers. This module
//! defines the capability traits the engines depend on, the HTTP clients
//! that implement them, and a stand-in used when a backend feature is
//! compiled out.

#[cfg(any(feature = "bark", feature = "rave"))]
mod client;
mod types;
mod unavailable;

#[cfg(feature = "bark")]
mod bark;
#[cfg(feature = "rave")]
mod rave;

#[cfg(feature = "bark")]
pub use bark::BarkClient;
#[cfg(feature = "rave")]
pub use rave::{RaveClient, RaveModel};
pub use types::{
    Availability, BARK_INSTALL_HINT, BackendError, DecodeRequest, Device, EncodeRequest,
    GenerateRequest, HealthResponse, LoadRequest, ModelInfo, RAVE_INSTALL_HINT,
};
pub use unavailable::UnavailableBackend;

use std::path::Path;

use crate::audio::Waveform;
use crate::latent::Latent;

/// Default Bark server address.
pub const DEFAULT_BARK_URL: &str = "http://localhost:9290";

/// Default RAVE server address.
pub const DEFAULT_RAVE_URL: &str = "http://localhost:9291";

/// Trait for text-to-speech backends.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechBackend {
    /// Download or load model weights. Safe to call repeatedly.
    fn preload(&self) -> Result<(), BackendError>;

    /// Generate speech for `text` conditioned on a voice preset.
    ///
    /// # Returns
    /// Audio at the backend's native sample rate
    fn generate(&self, text: &str, voice_preset: &str) -> Result<Waveform, BackendError>;
}

/// A loaded autoencoder model.
///
/// All calls are inference only.
#[cfg_attr(test, mockall::automock)]
pub trait LatentModel {
    /// Encode a waveform into a `[batch, latent_dim, frames]` latent.
    fn encode(&self, waveform: &Waveform) -> Result<Latent, BackendError>;

    /// Decode a latent back into audio at [`LatentModel::sample_rate`].
    fn decode(&self, latent: &Latent) -> Result<Waveform, BackendError>;

    fn sample_rate(&self) -> u32;

    /// Audio samples per latent frame.
    fn hop_length(&self) -> usize;

    /// Latent dimensionality.
    fn latent_size(&self) -> usize;

    /// Device chosen when the model was loaded.
    fn device(&self) -> Device;
}

/// Trait for backends that load autoencoder models.
pub trait LatentBackend {
    /// Load a model artifact and pick its device.
    fn load(&self, model_path: &Path) -> Result<Box<dyn LatentModel>, BackendError>;
}

impl<T: SpeechBackend + ?Sized> SpeechBackend for Box<T> {
    fn preload(&self) -> Result<(), BackendError> {
        (**self).preload()
    }

    fn generate(&self, text: &str, voice_preset: &str) -> Result<Waveform, BackendError> {
        (**self).generate(text, voice_preset)
    }
}

impl<T: LatentModel + ?Sized> LatentModel for Box<T> {
    fn encode(&self, waveform: &Waveform) -> Result<Latent, BackendError> {
        (**self).encode(waveform)
    }

    fn decode(&self, latent: &Latent) -> Result<Waveform, BackendError> {
        (**self).decode(latent)
    }

    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn hop_length(&self) -> usize {
        (**self).hop_length()
    }

    fn latent_size(&self) -> usize {
        (**self).latent_size()
    }

    fn device(&self) -> Device {
        (**self).device()
    }
}

/// Create the text-to-speech backend for this build.
pub fn create_speech_backend(server_url: &str) -> Result<Box<dyn SpeechBackend>, BackendError> {
    #[cfg(feature = "bark")]
    {
        Ok(Box::new(BarkClient::new(server_url)?))
    }

    #[cfg(not(feature = "bark"))]
    {
        let _ = server_url;
        Ok(Box::new(UnavailableBackend::bark()))
    }
}

/// Create the latent-audio backend for this build.
pub fn create_latent_backend(server_url: &str) -> Result<Box<dyn LatentBackend>, BackendError> {
    #[cfg(feature = "rave")]
    {
        Ok(Box::new(RaveClient::new(server_url)?))
    }

    #[cfg(not(feature = "rave"))]
    {
        let _ = server_url;
        Ok(Box::new(UnavailableBackend::rave()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    // ===========================================
    // Mocked capability traits
    // ===========================================

    #[test]
    fn test_mock_speech_backend_generate() {
        let mut mock = MockSpeechBackend::new();

        mock.expect_generate()
            .withf(|text, preset| text == "Hello world" && preset == "v2/en_speaker_6")
            .times(1)
            .returning(|_, _| Ok(Waveform::mono(vec![0.0; 240], 24_000)));

        let boxed: Box<dyn SpeechBackend> = Box::new(mock);
        let audio = boxed.generate("Hello world", "v2/en_speaker_6").unwrap();

        assert_eq!(audio.frames(), 240);
        assert_eq!(audio.sample_rate(), 24_000);
    }

    #[test]
    fn test_mock_speech_backend_preload_failure() {
        let mut mock = MockSpeechBackend::new();

        mock.expect_preload().times(1).returning(|| {
            Err(BackendError::ConnectionFailed(
                "Connection refused".to_string(),
            ))
        });

        let result = mock.preload();
        assert!(matches!(
            result.unwrap_err(),
            BackendError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_boxed_latent_model_delegates() {
        let mut mock = MockLatentModel::new();
        mock.expect_sample_rate().return_const(48_000_u32);
        mock.expect_hop_length().return_const(2048_usize);
        mock.expect_latent_size().return_const(16_usize);
        mock.expect_device().return_const(Device::Cpu);
        mock.expect_encode()
            .times(1)
            .returning(|_| Ok(Array3::zeros((1, 16, 4))));

        let model: Box<dyn LatentModel> = Box::new(mock);
        assert_eq!(model.sample_rate(), 48_000);
        assert_eq!(model.hop_length(), 2048);
        assert_eq!(model.latent_size(), 16);
        assert_eq!(model.device(), Device::Cpu);

        let z = model.encode(&Waveform::mono(vec![0.0; 8192], 48_000)).unwrap();
        assert_eq!(z.shape(), &[1, 16, 4]);
    }

    // ===========================================
    // Unavailable backend
    // ===========================================

    #[test]
    fn test_unavailable_speech_backend_always_fails() {
        let backend = UnavailableBackend::bark();

        assert_eq!(
            backend.availability(),
            Availability::Missing {
                dependency: "Bark",
                hint: BARK_INSTALL_HINT,
            }
        );
        assert!(backend.preload().is_err());

        let err = backend.generate("Hello", "v2/en_speaker_1").unwrap_err();
        assert_eq!(err.to_string(), "Bark not installed");
    }

    #[test]
    fn test_unavailable_latent_backend_always_fails() {
        let backend = UnavailableBackend::rave();

        assert!(!backend.availability().is_available());

        let err = backend.load(Path::new("model.ts")).err().unwrap();
        assert!(matches!(
            err,
            BackendError::Unavailable { dependency: "RAVE" }
        ));
        assert_eq!(err.to_string(), "RAVE not installed");
    }

    // ===========================================
    // Availability and device selection
    // ===========================================

    #[test]
    fn test_availability_matches_features() {
        assert_eq!(Availability::bark().is_available(), cfg!(feature = "bark"));
        assert_eq!(Availability::rave().is_available(), cfg!(feature = "rave"));
    }

    #[cfg(not(feature = "bark"))]
    #[test]
    fn test_speech_factory_without_feature_is_null() {
        let speech = create_speech_backend(DEFAULT_BARK_URL).unwrap();
        assert!(matches!(
            speech.preload().unwrap_err(),
            BackendError::Unavailable { dependency: "Bark" }
        ));
    }

    #[cfg(not(feature = "rave"))]
    #[test]
    fn test_latent_factory_without_feature_is_null() {
        let latent = create_latent_backend(DEFAULT_RAVE_URL).unwrap();
        assert!(latent.load(Path::new("model.ts")).is_err());
    }

    #[test]
    fn test_device_prefers_cuda() {
        assert_eq!(Device::select(true), Device::Cuda);
        assert_eq!(Device::select(false), Device::Cpu);
        assert_eq!(Device::Cuda.to_string(), "cuda");
    }

    #[test]
    fn test_device_serializes_lowercase() {
        let request = LoadRequest {
            model_path: "/models/vintage.ts".to_string(),
            device: Device::Cuda,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["device"], "cuda");
        assert_eq!(json["model_path"], "/models/vintage.ts");
    }

    #[test]
    fn test_load_request_resolves_relative_model_path() {
        let request = LoadRequest::new(Path::new("models/vintage.ts"), Device::Cpu).unwrap();
        let expected = std::env::current_dir().unwrap().join("models/vintage.ts");

        assert!(Path::new(&request.model_path).is_absolute());
        assert_eq!(request.model_path, expected.display().to_string());
    }

    #[test]
    fn test_load_request_keeps_absolute_model_path() {
        let request = LoadRequest::new(Path::new("/models/vintage.ts"), Device::Cpu).unwrap();
        assert_eq!(request.model_path, "/models/vintage.ts");
    }

    #[test]
    fn test_load_request_rejects_empty_model_path() {
        let result = LoadRequest::new(Path::new(""), Device::Cpu);
        assert!(matches!(
            result.unwrap_err(),
            BackendError::InvalidModelPath { .. }
        ));
    }

    // ===========================================
    // Wire types
    // ===========================================

    #[test]
    fn test_health_response_deserialize() {
        let json = r#"{
            "status": "healthy",
            "model": "rave",
            "cuda_available": true,
            "gpu": "NVIDIA RTX 5060",
            "device": "cuda:0"
        }"#;

        let response: HealthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "healthy");
        assert!(response.cuda_available);
        assert_eq!(response.gpu, Some("NVIDIA RTX 5060".to_string()));
    }

    #[test]
    fn test_health_response_without_gpu() {
        let json = r#"{
            "status": "healthy",
            "model": "bark",
            "cuda_available": false,
            "device": "cpu"
        }"#;

        let response: HealthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.gpu, None);
        assert_eq!(Device::select(response.cuda_available), Device::Cpu);
    }

    #[test]
    fn test_model_info_validate() {
        let info = ModelInfo {
            sample_rate: 48_000,
            hop_length: 2048,
            latent_size: 16,
        };
        assert_eq!(info.validate().unwrap(), info);

        let broken = ModelInfo {
            hop_length: 0,
            ..info
        };
        assert!(matches!(
            broken.validate().unwrap_err(),
            BackendError::InvalidResponse(_)
        ));
    }

    #[cfg(feature = "bark")]
    #[test]
    fn test_bark_client_trims_trailing_slash() {
        let client = BarkClient::new("http://localhost:9290/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9290");
    }

    #[cfg(feature = "rave")]
    #[test]
    fn test_rave_client_base_url() {
        let client = RaveClient::new(DEFAULT_RAVE_URL).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9291");
    }

    // ===========================================
    // Bark client against a canned server
    // ===========================================

    /// Serve one canned `(status, body)` reply per connection and return
    /// the request lines that were received.
    #[cfg(feature = "bark")]
    fn serve(
        replies: Vec<(u16, &'static str)>,
    ) -> (String, std::thread::JoinHandle<Vec<String>>) {
        use std::io::{BufRead, BufReader, Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = std::thread::spawn(move || {
            let mut seen = Vec::new();
            for (status, body) in replies {
                let (stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                seen.push(request_line.trim_end().to_string());

                let mut content_length = 0;
                loop {
                    let mut header = String::new();
                    reader.read_line(&mut header).unwrap();
                    if header.trim().is_empty() {
                        break;
                    }
                    let header = header.to_ascii_lowercase();
                    if let Some(value) = header.strip_prefix("content-length:") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                let mut request_body = vec![0; content_length];
                reader.read_exact(&mut request_body).unwrap();

                let mut stream = stream;
                write!(
                    stream,
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                )
                .unwrap();
                stream.flush().unwrap();
            }
            seen
        });

        (url, handle)
    }

    #[cfg(feature = "bark")]
    const BARK_HEALTH: &str =
        r#"{"status": "healthy", "model": "bark", "cuda_available": false, "device": "cpu"}"#;

    #[cfg(feature = "bark")]
    #[test]
    fn test_bark_preload_checks_health_first() {
        let (url, server) = serve(vec![(200, BARK_HEALTH), (200, "")]);
        let client = BarkClient::new(&url).unwrap();

        client.preload().unwrap();

        let seen = server.join().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].starts_with("GET /health "));
        assert!(seen[1].starts_with("POST /preload "));
    }

    #[cfg(feature = "bark")]
    #[test]
    fn test_bark_unhealthy_server_skips_preload() {
        let (url, server) = serve(vec![(503, "loading")]);
        let client = BarkClient::new(&url).unwrap();

        let err = client.preload().unwrap_err();

        assert!(matches!(err, BackendError::RequestFailed(_)));
        assert_eq!(server.join().unwrap(), vec!["GET /health HTTP/1.1".to_string()]);
    }
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Locally cached model files resolved through the hub
#[derive(Debug, Clone)]
pub struct ModelAssets {
    /// Diffusion transformer checkpoint
    pub checkpoint: PathBuf,

    /// Vocabulary/config file
    pub vocab: PathBuf,
}

/// Request body for the /synthesize endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SynthesizeRequest {
    /// Reference audio handle returned by /preprocess
    pub ref_audio: String,

    /// Reference transcript, already lower-cased
    pub ref_text: String,

    /// Target text, normalized and lower-cased
    pub text: String,

    /// Speech rate (1.0 is normal speed)
    pub speed: f32,

    /// ODE solver steps
    pub nfe_steps: u32,
}

/// Response of the /synthesize endpoint. The server writes the waveform to
/// its own scratch directory and hands back the path together with the mel.
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesizeResponse {
    pub audio_path: String,
    pub sample_rate: u32,
    pub mel: Vec<Vec<f32>>,
}

/// Response of the /preprocess endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PreprocessResponse {
    /// Server-side handle to the normalized reference clip
    pub audio_path: String,

    /// Resolved transcript (auto-transcribed when the upload had none)
    pub text: String,
}

/// Request/response of the /normalize endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeText {
    pub text: String,
}

/// Response of the /health endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
}

/// Error types for F5-TTS engine operations
#[derive(Debug, thiserror::Error)]
pub enum F5Error {
    #[error("Failed to resolve model assets: {0}")]
    AssetError(String),

    #[error("Failed to start inference server: {0}")]
    ServerError(String),

    #[error("Failed to generate speech: {0}")]
    GenerationError(String),

    #[error("Inference server is not ready")]
    NotReady,

    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// Type alias for Result with F5Error
pub type F5Result<T> = Result<T, F5Error>;

impl From<reqwest::Error> for F5Error {
    fn from(err: reqwest::Error) -> Self {
        F5Error::NetworkError(err.to_string())
    }
}

impl From<F5Error> for crate::errors::AppError {
    fn from(err: F5Error) -> Self {
        crate::errors::AppError::EngineError(err.to_string())
    }
}

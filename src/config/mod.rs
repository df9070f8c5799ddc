// Configuration module
// Centralized management of application configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod engine; // Inference engine configuration

/// Speed slider bounds exposed by the UI
pub const MIN_SPEED: f32 = 0.3;
pub const MAX_SPEED: f32 = 2.0;

/// Hard ceiling on the target text length, whitespace-split words
pub const MAX_TARGET_WORDS: usize = 1000;

/// Env variable holding the model hub token, read once at startup
pub const HUB_TOKEN_VAR: &str = "HUGGINGFACEHUB_API_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root directory with voice samples
    pub samples_dir: PathBuf,

    /// Subdirectory with additional audio samples
    pub samples_wavs_dir: PathBuf,

    /// Subdirectory with sample transcripts
    pub samples_txt_dir: PathBuf,

    /// How many generated artifacts (wav + png pairs) to keep before
    /// evicting the oldest ones
    pub max_artifacts: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let samples_dir = PathBuf::from("samples");
        Self {
            samples_wavs_dir: samples_dir.join("wavs"),
            samples_txt_dir: samples_dir.join("txt"),
            samples_dir,
            max_artifacts: 32,
        }
    }
}

impl AppConfig {
    /// Create the sample directories if they don't exist yet
    pub fn ensure_sample_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.samples_wavs_dir)?;
        std::fs::create_dir_all(&self.samples_txt_dir)?;
        Ok(())
    }
}

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::errors::{AppError, AppResult};

/// Hub repository with the pretrained Vietnamese checkpoint
pub const MODEL_REPO: &str = "hynt/F5-TTS-Vietnamese-ViVoice";

/// Checkpoint file inside the hub repo
pub const MODEL_CHECKPOINT_FILE: &str = "model_last.pt";

/// Vocabulary/config file inside the hub repo
pub const MODEL_VOCAB_FILE: &str = "config.json";

/// DiT backbone hyperparameters, forwarded to the inference server at load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DitArchitecture {
    pub dim: usize,
    pub depth: usize,
    pub heads: usize,
    pub ff_mult: usize,
    pub text_dim: usize,
    pub conv_layers: usize,
}

impl Default for DitArchitecture {
    fn default() -> Self {
        Self {
            dim: 1024,
            depth: 22,
            heads: 16,
            ff_mult: 2,
            text_dim: 512,
            conv_layers: 4,
        }
    }
}

/// Configuration for the F5-TTS inference engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Remote API endpoint. When set, no local server is started
    pub api_endpoint: Option<String>,

    /// Port for the locally spawned inference server
    pub api_port: Option<u16>,

    /// Path to the inference server installation (venv etc.)
    pub install_path: PathBuf,

    /// Device to use for inference (e.g., "cuda", "cpu", "mps")
    pub device: String,

    /// Number of function evaluations for the ODE solver
    pub nfe_steps: u32,

    /// Per-request timeout, seconds
    pub request_timeout_secs: u64,

    /// DiT backbone shape
    #[serde(default)]
    pub architecture: DitArchitecture,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));

        EngineConfig {
            api_endpoint: None,
            api_port: Some(7860),
            install_path: home_dir.join(".vivoice").join("f5-tts"),
            device: "auto".to_string(),
            nfe_steps: 32,
            request_timeout_secs: 300,
            architecture: DitArchitecture::default(),
        }
    }
}

// Кэш для конфигурации
static CONFIG: Lazy<Arc<Mutex<Option<EngineConfig>>>> = Lazy::new(|| Arc::new(Mutex::new(None)));

const CONFIG_FILENAME: &str = "engine_config.json";

/// Get the path to the config file
fn get_config_path() -> PathBuf {
    let app_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vivoice");

    // Ensure the directory exists
    if !app_dir.exists() {
        let _ = fs::create_dir_all(&app_dir);
    }

    app_dir.join(CONFIG_FILENAME)
}

/// Save configuration to disk
fn save_config(config: &EngineConfig) -> AppResult<()> {
    let config_path = get_config_path();
    let json = serde_json::to_string_pretty(config)?;

    fs::write(config_path, json)?;

    Ok(())
}

/// Load the engine configuration, falling back to defaults when the config
/// file is missing or unreadable
pub fn get_config() -> AppResult<EngineConfig> {
    let mut cache = CONFIG
        .lock()
        .map_err(|e| AppError::ConfigurationError(e.to_string()))?;

    // Если конфигурация уже загружена в кэш, вернем ее
    if let Some(config) = &*cache {
        return Ok(config.clone());
    }

    let config_path = get_config_path();
    let config = if config_path.exists() {
        let json = fs::read_to_string(&config_path)?;
        serde_json::from_str(&json)
            .map_err(|e| AppError::ConfigurationError(format!("Failed to parse engine config: {}", e)))?
    } else {
        let config = EngineConfig::default();
        save_config(&config)?;
        config
    };

    *cache = Some(config.clone());
    Ok(config)
}

/// Replace the engine configuration and persist it
pub fn set_config(config: EngineConfig) -> AppResult<()> {
    {
        let mut cache = CONFIG
            .lock()
            .map_err(|e| AppError::ConfigurationError(e.to_string()))?;
        *cache = Some(config.clone());
    }

    save_config(&config)
}

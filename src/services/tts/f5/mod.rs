// F5-TTS engine integration
// Talks to a local inference server process that owns the pretrained DiT
// model, the vocoder and the vinorm text normalizer

mod api;
mod assets;
mod models;

use async_trait::async_trait;
use log::info;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::engine::EngineConfig;
use crate::errors::{AppError, AppResult};
use crate::services::audio;
use crate::services::text::TextNormalizer;
use crate::services::tts::{RawSynthesis, ReferencePrompt, SpeechEngine};

pub use assets::hub_token;
pub use models::{ModelAssets, SynthesizeRequest};

/// Client of the F5-TTS inference sidecar
pub struct F5TtsEngine {
    config: EngineConfig,
    ready: AtomicBool,
    init_lock: tokio::sync::Mutex<()>,
}

impl F5TtsEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ready: AtomicBool::new(false),
            init_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Shut the sidecar down
    pub async fn shutdown(&self) -> AppResult<()> {
        api::stop_api_server().await?;
        self.ready.store(false, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl SpeechEngine for F5TtsEngine {
    async fn preprocess_reference(
        &self,
        audio_path: &str,
        text: &str,
    ) -> AppResult<ReferencePrompt> {
        self.ensure_ready().await?;

        audio::warn_on_reference_duration(Path::new(audio_path));

        let response = api::preprocess_reference(&self.config, audio_path, text).await?;
        Ok(ReferencePrompt {
            audio_path: response.audio_path,
            text: response.text,
        })
    }

    async fn synthesize(
        &self,
        prompt: &ReferencePrompt,
        text: &str,
        speed: f32,
    ) -> AppResult<RawSynthesis> {
        self.ensure_ready().await?;

        let request = SynthesizeRequest {
            ref_audio: prompt.audio_path.clone(),
            ref_text: prompt.text.clone(),
            text: text.to_string(),
            speed,
            nfe_steps: self.config.nfe_steps,
        };

        let response = api::synthesize(&self.config, &request).await?;

        // The server writes the waveform next to its scratch dir; read it
        // back so the caller owns the samples
        let (samples, sample_rate) = audio::read_wav(Path::new(&response.audio_path))?;
        if sample_rate != response.sample_rate {
            log::debug!(
                "Server reported {} Hz but the wav header says {} Hz",
                response.sample_rate,
                sample_rate
            );
        }

        Ok(RawSynthesis {
            samples,
            sample_rate,
            mel: response.mel,
        })
    }

    async fn ensure_ready(&self) -> AppResult<()> {
        if self.ready.load(Ordering::SeqCst) {
            return Ok(());
        }

        // Only one caller resolves assets and spawns the server
        let _guard = self.init_lock.lock().await;
        if self.ready.load(Ordering::SeqCst) {
            return Ok(());
        }

        if api::is_server_healthy(&self.config).await {
            self.ready.store(true, Ordering::SeqCst);
            return Ok(());
        }

        info!("Bringing up the F5-TTS engine");

        let assets = tokio::task::spawn_blocking(assets::resolve_model_assets)
            .await
            .map_err(|e| AppError::EngineError(e.to_string()))??;

        api::start_api_server(&self.config, &assets).await?;
        self.ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextNormalizer for F5TtsEngine {
    async fn normalize(&self, text: &str) -> AppResult<String> {
        self.ensure_ready().await?;
        Ok(api::normalize_text(&self.config, text).await?)
    }
}

// TTS services module
// Capability boundary around the external speech synthesis engine

pub mod f5;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::engine::EngineConfig;
use crate::errors::AppResult;

/// Обновления о прогрессе синтеза речи
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProgressUpdate {
    /// Начало синтеза
    Started,
    /// Подготовка референсного аудио
    PreparingReference,
    /// Нормализация текста
    NormalizingText,
    /// Генерация речи
    GeneratingSpeech,
    /// Рендеринг спектрограммы
    RenderingSpectrogram,
    /// Завершение
    Completed,
    /// Ошибка
    Error(String),
}

/// A preprocessed reference clip together with its resolved transcript.
/// The transcript is the caller's text when one was supplied, otherwise the
/// engine's automatic transcription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferencePrompt {
    pub audio_path: String,
    pub text: String,
}

/// Raw output of one inference call
#[derive(Debug, Clone)]
pub struct RawSynthesis {
    /// Mono waveform
    pub samples: Vec<f32>,
    /// Частота дискретизации
    pub sample_rate: u32,
    /// Mel spectrogram, n_mels rows by frames columns
    pub mel: Vec<Vec<f32>>,
}

/// Trait the speech synthesis engine must implement
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Normalize the reference audio and resolve its transcript
    async fn preprocess_reference(
        &self,
        audio_path: &str,
        text: &str,
    ) -> AppResult<ReferencePrompt>;

    /// Run one inference call: reference prompt + target text + speed
    async fn synthesize(
        &self,
        prompt: &ReferencePrompt,
        text: &str,
        speed: f32,
    ) -> AppResult<RawSynthesis>;

    /// Bring the engine up (model assets, server) if it isn't yet
    async fn ensure_ready(&self) -> AppResult<()>;

    /// Whether the engine can take requests right now
    fn is_ready(&self) -> bool;
}

/// Construct the speech engine configured for this process
pub fn create_engine(config: EngineConfig) -> Arc<f5::F5TtsEngine> {
    Arc::new(f5::F5TtsEngine::new(config))
}

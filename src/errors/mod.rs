// Error handling module
// Contains custom error types and error handling utilities

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc::error::SendError;

// Application error type
#[derive(Debug, Error, Serialize)]
pub enum AppError {
    /// User-correctable input problem (missing reference audio, empty or
    /// oversized target text). Surfaced verbatim to the UI, never retried.
    #[error("{0}")]
    InputError(String),

    /// Any failure inside the synthesis pipeline (preprocessing,
    /// normalization, model inference, artifact persistence), wrapped once
    /// with the underlying cause's message.
    #[error("Ошибка синтеза речи: {0}")]
    SynthesisError(String),

    #[error("Ошибка конфигурации: {0}")]
    ConfigurationError(String),

    #[error("Ошибка движка TTS: {0}")]
    EngineError(String),

    #[error("Ошибка API: {0}")]
    ApiError(String),

    #[error("Ошибка ввода/вывода: {0}")]
    #[serde(serialize_with = "serialize_io_error")]
    IoError(#[from] std::io::Error),

    #[error("Ошибка сериализации: {0}")]
    SerializationError(String),

    #[error("Другая ошибка: {0}")]
    Other(String),

    #[error(transparent)]
    #[serde(skip)]
    AnyhowError(#[from] anyhow::Error),
}

impl AppError {
    /// Wrap a pipeline failure as a user-facing synthesis error.
    /// One level of wrapping only: the original message is carried as-is.
    pub fn synthesis(cause: impl std::fmt::Display) -> Self {
        AppError::SynthesisError(cause.to_string())
    }

    pub fn input(message: impl Into<String>) -> Self {
        AppError::InputError(message.into())
    }
}

// Функция для сериализации std::io::Error, которая не реализует serde::Serialize
fn serialize_io_error<S>(err: &std::io::Error, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&err.to_string())
}

// Реализация трейтов From для различных типов ошибок
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ApiError(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Other(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Other(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

// Реализация From для SendError различных типов сообщений
impl<T> From<SendError<T>> for AppError {
    fn from(err: SendError<T>) -> Self {
        AppError::Other(format!("Failed to send message: {}", err))
    }
}

// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

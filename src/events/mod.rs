// Events module
// Contains event handling and emitting logic

use log::error;
use serde_json::json;
use tauri::{Emitter, Window};

use crate::errors::AppError;

/// Surface an error to the frontend as a blocking, dismissible message
pub fn emit_error(window: &Window, error: &AppError) {
    window
        .emit(
            "error",
            json!({
                "message": error.to_string(),
                "type": match error {
                    AppError::InputError(_) => "input",
                    AppError::SynthesisError(_) => "synthesis",
                    AppError::ConfigurationError(_) => "configuration",
                    AppError::EngineError(_) => "engine",
                    AppError::ApiError(_) => "api",
                    AppError::IoError(_) => "io",
                    AppError::SerializationError(_) => "serialization",
                    AppError::Other(_) => "other",
                    AppError::AnyhowError(_) => "other",
                }
            }),
        )
        .unwrap_or_else(|e| {
            error!("Failed to emit error event: {}", e);
        });
}

pub fn emit_progress<T: serde::Serialize + Clone>(window: &Window, event: &str, progress: T) {
    window.emit(event, progress).unwrap_or_else(|e| {
        error!("Failed to emit progress event: {}", e);
    });
}

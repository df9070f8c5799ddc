use log::info;
use tauri::{State, Window};

use crate::errors::AppResult;
use crate::events;
use crate::models::{EngineStatus, SynthesisRequest, SynthesisResult};
use crate::AppState;

/// Run the synthesis pipeline for one request, streaming progress updates
/// to the frontend as "synthesis-progress" events
#[tauri::command]
pub async fn synthesize_speech(
    window: Window,
    state: State<'_, AppState>,
    request: SynthesisRequest,
) -> AppResult<SynthesisResult> {
    info!(
        "Synthesis requested: {} words, speed {}",
        request.gen_text.split_whitespace().count(),
        request.speed
    );

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel(32);

    let window_clone = window.clone();
    tokio::spawn(async move {
        while let Some(progress) = progress_rx.recv().await {
            events::emit_progress(&window_clone, "synthesis-progress", progress);
        }
    });

    let result = state.synthesis.synthesize(&request, Some(progress_tx)).await;

    if let Err(e) = &result {
        events::emit_error(&window, e);
    }

    result
}

/// Report whether the inference engine is up
#[tauri::command]
pub async fn get_engine_status(state: State<'_, AppState>) -> AppResult<EngineStatus> {
    let ready = state.synthesis.engine_ready();
    Ok(EngineStatus {
        ready,
        message: if ready {
            "Engine is ready".to_string()
        } else {
            "Engine is starting, model files may still be downloading".to_string()
        },
    })
}

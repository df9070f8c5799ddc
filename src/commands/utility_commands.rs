use std::path::Path;
use tauri::State;

use crate::errors::AppResult;
use crate::utils::common::check_file_exists_and_valid;
use crate::AppState;

/// Check if a file exists and has non-empty content
#[tauri::command]
pub async fn check_file_exists_command(path: String) -> Result<bool, String> {
    Ok(check_file_exists_and_valid(Path::new(&path)).await)
}

/// Delete all generated artifacts (wav files and spectrograms)
#[tauri::command]
pub async fn cleanup_artifacts(state: State<'_, AppState>) -> AppResult<usize> {
    let removed = state.synthesis.artifacts().clear()?;
    log::info!("Removed {} generated artifacts", removed);
    Ok(removed)
}

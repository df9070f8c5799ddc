use tauri::State;

use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::models::SampleResolution;
use crate::services::samples::SampleCatalog;

/// List the voice sample catalog. Every call rescans the sample
/// directories, so this also backs the refresh button.
#[tauri::command]
pub async fn list_voice_samples(config: State<'_, AppConfig>) -> AppResult<Vec<String>> {
    let catalog = SampleCatalog::new(&config);
    Ok(catalog.list())
}

/// Resolve a selected sample to its audio file and transcript
#[tauri::command]
pub async fn resolve_voice_sample(
    config: State<'_, AppConfig>,
    name: String,
) -> AppResult<SampleResolution> {
    let catalog = SampleCatalog::new(&config);
    Ok(catalog.resolve(&name))
}

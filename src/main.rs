// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use log::{error, info};
use std::sync::Arc;
use tauri::menu::{MenuBuilder, SubmenuBuilder};
use tauri::{Emitter, Manager};
use tauri_plugin_store::StoreExt;

mod commands;
mod config;
mod errors;
mod events;
mod models;
mod services;
mod utils;

use config::AppConfig;
use services::synthesis::SynthesisService;
use services::text::TextNormalizer;
use services::tts::SpeechEngine;
use utils::artifacts::ArtifactStore;

/// Process-wide immutable services, built once at startup
pub struct AppState {
    pub synthesis: Arc<SynthesisService>,
}

fn main() {
    // Инициализируем логгер с тонкой настройкой
    utils::logger::init_logger();

    let app_config = AppConfig::default();
    if let Err(e) = app_config.ensure_sample_dirs() {
        error!("Failed to create sample directories: {}", e);
    }

    // Токен хаба читается из окружения один раз при старте
    if services::tts::f5::hub_token().is_some() {
        info!("Model hub token found in the environment");
    } else {
        info!("No model hub token set, downloading public model files anonymously");
    }

    let engine_config = match config::engine::get_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Falling back to default engine config: {}", e);
            config::engine::EngineConfig::default()
        }
    };

    let artifacts = match ArtifactStore::new(app_config.max_artifacts) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("Failed to prepare the artifact store: {}", e);
            std::process::exit(1);
        }
    };

    let engine = services::tts::create_engine(engine_config);
    let synthesis = Arc::new(SynthesisService::new(
        engine.clone() as Arc<dyn SpeechEngine>,
        engine.clone() as Arc<dyn TextNormalizer>,
        artifacts,
    ));

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::default().build())
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(app_config)
        .manage(AppState { synthesis })
        .setup(move |app| {
            // Create app submenu
            let app_menu = SubmenuBuilder::new(app, "App")
                .text("about", "About ViVoice")
                .separator()
                .text("settings", "Settings")
                .separator()
                .quit()
                .build()?;

            let edit_menu = SubmenuBuilder::new(app, "Edit")
                .cut()
                .copy()
                .paste()
                .select_all()
                .build()?;
            // Create main menu
            let menu = MenuBuilder::new(app).items(&[&app_menu, &edit_menu]).build()?;

            app.set_menu(menu)?;

            // Initialize store
            let _store = app.store(".settings.dat")?;

            // Прогреваем движок в фоне: скачивание модели и запуск сервера
            // занимают заметное время при первом старте
            let warmup_engine = engine.clone();
            let main_window = app.get_webview_window("main");
            tauri::async_runtime::spawn(async move {
                match warmup_engine.ensure_ready().await {
                    Ok(()) => {
                        info!("Inference engine is ready");
                        if let Some(window) = &main_window {
                            let _ = window.emit("engine-ready", true);
                        }
                    }
                    Err(e) => {
                        error!("Failed to initialize inference engine: {}", e);
                        if let Some(window) = &main_window {
                            let _ = window.emit("engine-ready", false);
                        }
                    }
                }
            });

            Ok(())
        })
        .on_menu_event(|app_handle, event| {
            let window = app_handle.get_webview_window("main").unwrap();
            match event.id().0.as_str() {
                "settings" => {
                    // Emit event to show settings
                    window.emit("show-settings", ()).unwrap();
                }
                _ => {}
            }
        })
        .invoke_handler(tauri::generate_handler![
            commands::list_voice_samples,
            commands::resolve_voice_sample,
            commands::synthesize_speech,
            commands::get_engine_status,
            commands::cleanup_artifacts,
            commands::check_file_exists_command,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

use super::models::{
    F5Error, F5Result, HealthResponse, ModelAssets, NormalizeText, PreprocessResponse,
    SynthesizeRequest, SynthesizeResponse,
};
use crate::config::engine::EngineConfig;
use once_cell::sync::Lazy;
use reqwest::{multipart, Client};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;

// API client instance
static API_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(std::time::Duration::from_secs(300))
        .build()
        .expect("Failed to create HTTP client")
});

// API server instance
static API_SERVER: Lazy<Arc<tokio::sync::Mutex<Option<tokio::process::Child>>>> =
    Lazy::new(|| Arc::new(tokio::sync::Mutex::new(None)));

// API connection info
#[derive(Debug, Clone)]
struct ApiConnection {
    url: String,
    port: u16,
    is_local: bool,
}

/// Get the API URL
fn get_api_connection(config: &EngineConfig) -> ApiConnection {
    if let Some(endpoint) = &config.api_endpoint {
        return ApiConnection {
            url: endpoint.clone(),
            port: 0, // Port is included in the endpoint
            is_local: false,
        };
    }

    // Default to local API
    let port = config.api_port.unwrap_or(7860);

    ApiConnection {
        url: format!("http://127.0.0.1:{}", port),
        port,
        is_local: true,
    }
}

fn find_python(install_path: &Path) -> F5Result<PathBuf> {
    let venv_python = if cfg!(target_os = "windows") {
        install_path.join("venv/Scripts/python.exe")
    } else {
        install_path.join("venv/bin/python")
    };

    if venv_python.exists() {
        return Ok(venv_python);
    }

    which::which("python3")
        .or_else(|_| which::which("python"))
        .map_err(|_| {
            F5Error::ServerError(
                "No python interpreter found for the inference server".to_string(),
            )
        })
}

/// Start the inference server if it isn't running yet
pub async fn start_api_server(config: &EngineConfig, assets: &ModelAssets) -> F5Result<()> {
    let mut server_guard = API_SERVER.lock().await;

    // Check if server is already running
    if let Some(child) = &mut *server_guard {
        if let Ok(None) = child.try_wait() {
            // Server is already running
            return Ok(());
        }
    }

    let api_connection = get_api_connection(config);

    if !api_connection.is_local {
        // Using remote API, no need to start a server
        return Ok(());
    }

    log::info!("Starting F5-TTS inference server...");

    let python_exec = find_python(&config.install_path)?;

    let mut cmd = TokioCommand::new(&python_exec);
    cmd.args(["tools/api_server.py"]);

    // Configure API options
    cmd.args([
        "--listen",
        "127.0.0.1",
        "--port",
        &api_connection.port.to_string(),
        "--ckpt",
        &assets.checkpoint.to_string_lossy(),
        "--vocab",
        &assets.vocab.to_string_lossy(),
        "--nfe",
        &config.nfe_steps.to_string(),
    ]);

    // Add device flag if set
    if config.device != "auto" {
        cmd.args(["--device", &config.device]);
    }

    // Run in the installation directory
    cmd.current_dir(&config.install_path);

    // Capture stdout and stderr
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    // Start the process
    let mut child = cmd
        .spawn()
        .map_err(|e| F5Error::ServerError(format!("Failed to start inference server: {}", e)))?;

    // Read stdout and stderr for logging
    if let Some(stdout) = child.stdout.take() {
        let stdout_reader = BufReader::new(stdout);
        tokio::spawn(async move {
            let mut lines = stdout_reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                log::info!("F5-TTS server: {}", line);
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        let stderr_reader = BufReader::new(stderr);
        tokio::spawn(async move {
            let mut lines = stderr_reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                log::error!("F5-TTS server: {}", line);
            }
        });
    }

    // Wait for API to start. Model load can take a while on first run
    let api_url = format!("{}/health", api_connection.url);

    for _ in 0..240 {
        match API_CLIENT.get(&api_url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response
                    .json()
                    .await
                    .map_err(|e| F5Error::InvalidResponse(e.to_string()))?;
                if health.model_loaded {
                    log::info!("F5-TTS inference server started successfully");
                    *server_guard = Some(child);
                    return Ok(());
                }
                tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
            }
            _ => {
                // API not ready yet, wait and retry
                tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
            }
        }
    }

    // Fail if API didn't start after timeout
    let _ = child.kill().await;
    Err(F5Error::ServerError(
        "Failed to start inference server: timeout".to_string(),
    ))
}

/// Stop the API server
pub async fn stop_api_server() -> F5Result<()> {
    let mut server_guard = API_SERVER.lock().await;

    if let Some(child) = &mut *server_guard {
        // Try to terminate gracefully
        if let Err(e) = child.kill().await {
            log::warn!("Failed to kill inference server: {}", e);
        }

        // Remove from global state
        *server_guard = None;
    }

    Ok(())
}

/// Check whether the server answers its health endpoint
pub async fn is_server_healthy(config: &EngineConfig) -> bool {
    let api_connection = get_api_connection(config);
    let url = format!("{}/health", api_connection.url);

    match API_CLIENT.get(&url).send().await {
        Ok(response) if response.status().is_success() => response
            .json::<HealthResponse>()
            .await
            .map(|h| h.model_loaded)
            .unwrap_or(false),
        _ => false,
    }
}

async fn check_response(response: reqwest::Response) -> F5Result<reqwest::Response> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(F5Error::GenerationError(format!(
            "API request failed with status {}: {}",
            status, error_text
        )));
    }
    Ok(response)
}

/// Upload a reference clip for preprocessing. Returns the server-side handle
/// of the normalized clip and the resolved transcript.
pub async fn preprocess_reference(
    config: &EngineConfig,
    audio_path: &str,
    text: &str,
) -> F5Result<PreprocessResponse> {
    let api_connection = get_api_connection(config);

    let file_name = Path::new(audio_path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("reference.wav")
        .to_string();
    let audio_bytes = tokio::fs::read(audio_path).await?;

    let form = multipart::Form::new()
        .part(
            "audio",
            multipart::Part::bytes(audio_bytes).file_name(file_name),
        )
        .text("text", text.to_string());

    let url = format!("{}/preprocess", api_connection.url);
    let response = API_CLIENT.post(&url).multipart(form).send().await?;
    let response = check_response(response).await?;

    response
        .json::<PreprocessResponse>()
        .await
        .map_err(|e| F5Error::InvalidResponse(e.to_string()))
}

/// Run one inference call
pub async fn synthesize(
    config: &EngineConfig,
    request: &SynthesizeRequest,
) -> F5Result<SynthesizeResponse> {
    let api_connection = get_api_connection(config);

    let url = format!("{}/synthesize", api_connection.url);
    let response = API_CLIENT.post(&url).json(request).send().await?;
    let response = check_response(response).await?;

    let result: SynthesizeResponse = response
        .json()
        .await
        .map_err(|e| F5Error::InvalidResponse(e.to_string()))?;

    if result.sample_rate == 0 {
        return Err(F5Error::InvalidResponse(
            "Server returned a zero sample rate".to_string(),
        ));
    }

    Ok(result)
}

/// Normalize Vietnamese text through the server-side vinorm pipeline
pub async fn normalize_text(config: &EngineConfig, text: &str) -> F5Result<String> {
    let api_connection = get_api_connection(config);

    let url = format!("{}/normalize", api_connection.url);
    let response = API_CLIENT
        .post(&url)
        .json(&NormalizeText {
            text: text.to_string(),
        })
        .send()
        .await?;
    let response = check_response(response).await?;

    let normalized: NormalizeText = response
        .json()
        .await
        .map_err(|e| F5Error::InvalidResponse(e.to_string()))?;

    Ok(normalized.text)
}

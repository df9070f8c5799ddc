//! Model asset resolution.
//!
//! The checkpoint and vocabulary are pulled through the hub's
//! content-addressable cache, so repeated startups reuse the local copy.
//! The hub token is read from the environment once per process and used
//! for authentication before any model file is fetched.

use hf_hub::api::sync::{Api, ApiBuilder};
use log::info;
use once_cell::sync::Lazy;

use super::models::{F5Error, F5Result, ModelAssets};
use crate::config::engine::{MODEL_CHECKPOINT_FILE, MODEL_REPO, MODEL_VOCAB_FILE};
use crate::config::HUB_TOKEN_VAR;

static HUB_TOKEN: Lazy<Option<String>> = Lazy::new(|| {
    std::env::var(HUB_TOKEN_VAR)
        .ok()
        .filter(|token| !token.trim().is_empty())
});

/// The hub token from the environment, if one was set at startup
pub fn hub_token() -> Option<&'static str> {
    HUB_TOKEN.as_deref()
}

fn build_api() -> F5Result<Api> {
    let builder = match hub_token() {
        Some(token) => {
            info!("Authenticating against the model hub with the configured token");
            ApiBuilder::new().with_token(Some(token.to_string()))
        }
        None => ApiBuilder::new(),
    };

    builder
        .build()
        .map_err(|e| F5Error::AssetError(e.to_string()))
}

/// Resolve the checkpoint and vocabulary through the hub cache.
/// Blocking: call from `spawn_blocking` in async contexts.
pub fn resolve_model_assets() -> F5Result<ModelAssets> {
    let api = build_api()?;
    let repo = api.model(MODEL_REPO.to_string());

    info!("Resolving model assets from {}", MODEL_REPO);

    let checkpoint = repo
        .get(MODEL_CHECKPOINT_FILE)
        .map_err(|e| F5Error::AssetError(format!("{}: {}", MODEL_CHECKPOINT_FILE, e)))?;
    let vocab = repo
        .get(MODEL_VOCAB_FILE)
        .map_err(|e| F5Error::AssetError(format!("{}: {}", MODEL_VOCAB_FILE, e)))?;

    info!("Model checkpoint cached at {}", checkpoint.display());

    Ok(ModelAssets { checkpoint, vocab })
}

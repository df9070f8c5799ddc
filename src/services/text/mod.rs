// Text services
// Normalization of Vietnamese text before synthesis and cleanup of the
// normalizer's output

mod postprocess;

pub use postprocess::clean;

use async_trait::async_trait;

use crate::errors::AppResult;

/// Locale-specific text normalization: numerals, dates and symbols expanded
/// into spoken Vietnamese. The production implementation lives engine-side;
/// tests substitute fakes.
#[async_trait]
pub trait TextNormalizer: Send + Sync {
    async fn normalize(&self, text: &str) -> AppResult<String>;
}

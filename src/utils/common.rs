//! Common utility functions used across the application

use std::path::Path;

/// Check whether a filename carries one of the recognized audio extensions
/// (case-insensitive)
pub fn has_audio_extension(name: &str, extensions: &[&str]) -> bool {
    let lower = name.to_lowercase();
    extensions.iter().any(|ext| lower.ends_with(ext))
}

/// Base name of a file without its extension ("voice.wav" -> "voice")
pub fn base_name(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) => &name[..pos],
        None => name,
    }
}

/// Check if a file exists and has valid content (non-zero size)
pub async fn check_file_exists_and_valid(path: &Path) -> bool {
    if let Ok(metadata) = tokio::fs::metadata(path).await {
        if metadata.is_file() && metadata.len() > 0 {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_audio_extension() {
        let exts = [".wav", ".mp3", ".m4a", ".flac"];
        assert!(has_audio_extension("voice.wav", &exts));
        assert!(has_audio_extension("VOICE.WAV", &exts));
        assert!(has_audio_extension("clip.Mp3", &exts));
        assert!(!has_audio_extension("notes.txt", &exts));
        assert!(!has_audio_extension("wav", &exts));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("voice.wav"), "voice");
        assert_eq!(base_name("voice.sample.flac"), "voice.sample");
        assert_eq!(base_name("noext"), "noext");
    }
}

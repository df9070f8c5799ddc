// Voice sample catalog
// Scans the sample directories and resolves a selected sample to its audio
// file and transcript

use log::warn;
use path_clean::PathClean;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::models::SampleResolution;
use crate::utils::common::{base_name, has_audio_extension};

/// Catalog entry shown when no sample is selected
pub const NONE_SENTINEL: &str = "None";

/// Recognized audio extensions, matched case-insensitively
pub const AUDIO_EXTENSIONS: [&str; 4] = [".wav", ".mp3", ".m4a", ".flac"];

pub struct SampleCatalog {
    /// Root samples directory
    samples_dir: PathBuf,
    /// Audio subdirectory, checked before the root
    wavs_dir: PathBuf,
    /// Transcript subdirectory, checked before the root
    txt_dir: PathBuf,
}

impl SampleCatalog {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            samples_dir: config.samples_dir.clone(),
            wavs_dir: config.samples_wavs_dir.clone(),
            txt_dir: config.samples_txt_dir.clone(),
        }
    }

    /// Каталог с явными директориями (для тестов)
    pub fn with_dirs(
        samples_dir: impl Into<PathBuf>,
        wavs_dir: impl Into<PathBuf>,
        txt_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            samples_dir: samples_dir.into(),
            wavs_dir: wavs_dir.into(),
            txt_dir: txt_dir.into(),
        }
    }

    /// List all known sample names, sentinel first, the rest sorted
    /// ascending with duplicates removed. The listing is a fresh snapshot
    /// of the filesystem on every call.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();

        for dir in [&self.samples_dir, &self.wavs_dir] {
            for name in scan_audio_files(dir) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }

        names.sort();

        let mut catalog = Vec::with_capacity(names.len() + 1);
        catalog.push(NONE_SENTINEL.to_string());
        catalog.extend(names);
        catalog
    }

    /// Resolve a catalog name to its audio path and transcript text.
    /// The audio file is searched in wavs/ first, then the samples root;
    /// the transcript in txt/ first, then the samples root. A missing
    /// transcript is not an error — the text comes back empty.
    pub fn resolve(&self, name: &str) -> SampleResolution {
        if name.is_empty() || name == NONE_SENTINEL {
            return SampleResolution {
                audio_path: None,
                text: String::new(),
            };
        }

        let audio_candidates = [
            self.wavs_dir.join(name).clean(),
            self.samples_dir.join(name).clean(),
        ];
        let audio_path = audio_candidates.iter().find(|p| p.exists()).cloned();

        let Some(audio_path) = audio_path else {
            return SampleResolution {
                audio_path: None,
                text: String::new(),
            };
        };

        let txt_name = format!("{}.txt", base_name(name));
        let text_candidates = [self.txt_dir.join(&txt_name), self.samples_dir.join(&txt_name)];
        let text = text_candidates
            .iter()
            .find(|p| p.exists())
            .map(|p| read_transcript(p))
            .unwrap_or_default();

        SampleResolution {
            audio_path: Some(audio_path.to_string_lossy().to_string()),
            text,
        }
    }
}

fn scan_audio_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    entries
        .flatten()
        .filter(|e| e.path().is_file())
        .filter_map(|e| e.file_name().to_str().map(|s| s.to_string()))
        .filter(|name| has_audio_extension(name, &AUDIO_EXTENSIONS))
        .collect()
}

fn read_transcript(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("Failed to read transcript {}: {}", path.display(), e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (tempfile::TempDir, SampleCatalog) {
        let tmp = tempfile::tempdir().unwrap();
        let samples = tmp.path().join("samples");
        let wavs = samples.join("wavs");
        let txt = samples.join("txt");
        fs::create_dir_all(&wavs).unwrap();
        fs::create_dir_all(&txt).unwrap();
        let catalog = SampleCatalog::with_dirs(&samples, &wavs, &txt);
        (tmp, catalog)
    }

    #[test]
    fn listing_starts_with_sentinel_and_sorts() {
        let (tmp, catalog) = fixture();
        let samples = tmp.path().join("samples");
        fs::write(samples.join("b.wav"), b"x").unwrap();
        fs::write(samples.join("wavs").join("a.mp3"), b"x").unwrap();
        fs::write(samples.join("notes.txt"), b"x").unwrap();

        let listing = catalog.list();
        assert_eq!(listing, vec!["None", "a.mp3", "b.wav"]);
    }

    #[test]
    fn listing_dedupes_across_directories() {
        let (tmp, catalog) = fixture();
        let samples = tmp.path().join("samples");
        fs::write(samples.join("voice.wav"), b"root").unwrap();
        fs::write(samples.join("wavs").join("voice.wav"), b"wavs").unwrap();

        let listing = catalog.list();
        assert_eq!(listing, vec!["None", "voice.wav"]);
    }

    #[test]
    fn listing_is_case_insensitive_on_extension() {
        let (tmp, catalog) = fixture();
        let samples = tmp.path().join("samples");
        fs::write(samples.join("loud.FLAC"), b"x").unwrap();

        assert_eq!(catalog.list(), vec!["None", "loud.FLAC"]);
    }

    #[test]
    fn every_listed_name_resolves_to_existing_audio() {
        let (tmp, catalog) = fixture();
        let samples = tmp.path().join("samples");
        fs::write(samples.join("one.wav"), b"x").unwrap();
        fs::write(samples.join("wavs").join("two.m4a"), b"x").unwrap();

        for name in catalog.list().into_iter().skip(1) {
            let resolved = catalog.resolve(&name);
            let path = resolved.audio_path.expect("audio path must be present");
            assert!(Path::new(&path).exists());
        }
    }

    #[test]
    fn resolve_prefers_wavs_dir_and_trims_transcript() {
        let (tmp, catalog) = fixture();
        let samples = tmp.path().join("samples");
        fs::write(samples.join("wavs").join("a.wav"), b"x").unwrap();
        fs::write(samples.join("txt").join("a.txt"), "  xin chào  \n").unwrap();

        let resolved = catalog.resolve("a.wav");
        assert_eq!(
            resolved.audio_path.as_deref(),
            samples.join("wavs").join("a.wav").to_str()
        );
        assert_eq!(resolved.text, "xin chào");
    }

    #[test]
    fn resolve_falls_back_to_samples_root() {
        let (tmp, catalog) = fixture();
        let samples = tmp.path().join("samples");
        fs::write(samples.join("b.mp3"), b"x").unwrap();
        fs::write(samples.join("b.txt"), "transcript in root").unwrap();

        let resolved = catalog.resolve("b.mp3");
        assert_eq!(
            resolved.audio_path.as_deref(),
            samples.join("b.mp3").to_str()
        );
        assert_eq!(resolved.text, "transcript in root");
    }

    #[test]
    fn missing_transcript_is_empty_not_error() {
        let (tmp, catalog) = fixture();
        let samples = tmp.path().join("samples");
        fs::write(samples.join("c.wav"), b"x").unwrap();

        let resolved = catalog.resolve("c.wav");
        assert!(resolved.audio_path.is_some());
        assert_eq!(resolved.text, "");
    }

    #[test]
    fn sentinel_and_unknown_names_resolve_to_nothing() {
        let (_tmp, catalog) = fixture();

        let resolved = catalog.resolve(NONE_SENTINEL);
        assert!(resolved.audio_path.is_none());
        assert_eq!(resolved.text, "");

        let resolved = catalog.resolve("ghost.wav");
        assert!(resolved.audio_path.is_none());
        assert_eq!(resolved.text, "");
    }
}

//! Bounded store for generated artifacts (wav files, spectrogram images).
//!
//! Each synthesis call allocates uniquely named files inside one app-scoped
//! temporary directory. The store prunes the oldest files beyond the
//! configured cap, so repeated use does not accumulate artifacts forever.

use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::errors::{AppError, AppResult};

pub struct ArtifactStore {
    /// Directory holding all generated artifacts
    dir: PathBuf,

    /// Сколько файлов держим до вытеснения старых
    max_files: usize,
}

impl ArtifactStore {
    /// Create a store rooted in the system temp directory
    pub fn new(max_files: usize) -> AppResult<Self> {
        let dir = std::env::temp_dir().join("vivoice");
        Self::at(dir, max_files)
    }

    /// Create a store rooted at an explicit directory
    pub fn at(dir: impl Into<PathBuf>, max_files: usize) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        if max_files == 0 {
            return Err(AppError::ConfigurationError(
                "artifact store capacity must be positive".to_string(),
            ));
        }
        Ok(Self { dir, max_files })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reserve a unique path for a new artifact. The file itself is written
    /// by the caller; eviction runs before the path is handed out.
    pub fn allocate(&self, prefix: &str, extension: &str) -> AppResult<PathBuf> {
        self.prune()?;
        let file_name = format!("{}_{}.{}", prefix, uuid::Uuid::new_v4(), extension);
        Ok(self.dir.join(file_name))
    }

    /// Remove the oldest artifacts until the store fits the cap again
    fn prune(&self) -> AppResult<()> {
        let mut entries: Vec<(PathBuf, SystemTime)> = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            entries.push((path, modified));
        }

        // Leave room for the artifact about to be written
        if entries.len() < self.max_files {
            return Ok(());
        }

        entries.sort_by_key(|(_, modified)| *modified);
        let excess = entries.len() + 1 - self.max_files;
        for (path, _) in entries.into_iter().take(excess) {
            debug!("Evicting old artifact: {}", path.display());
            if let Err(e) = fs::remove_file(&path) {
                warn!("Failed to evict artifact {}: {}", path.display(), e);
            }
        }

        Ok(())
    }

    /// Delete every artifact in the store
    pub fn clear(&self) -> AppResult<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn allocate_produces_unique_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::at(tmp.path().join("store"), 8).unwrap();

        let a = store.allocate("speech", "wav").unwrap();
        let b = store.allocate("speech", "wav").unwrap();
        assert_ne!(a, b);
        assert!(a.file_name().unwrap().to_str().unwrap().starts_with("speech_"));
        assert!(a.extension().unwrap() == "wav");
    }

    #[test]
    fn prune_evicts_oldest_beyond_cap() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::at(tmp.path().join("store"), 3).unwrap();

        let mut paths = Vec::new();
        for _ in 0..3 {
            let p = store.allocate("a", "png").unwrap();
            touch(&p);
            paths.push(p);
            // Keep mtimes strictly ordered
            std::thread::sleep(std::time::Duration::from_millis(20));
        }

        // Fourth allocation must evict the first file
        let p = store.allocate("a", "png").unwrap();
        touch(&p);

        assert!(!paths[0].exists(), "oldest artifact should be evicted");
        assert!(paths[2].exists());
    }

    #[test]
    fn clear_removes_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::at(tmp.path().join("store"), 8).unwrap();
        for _ in 0..4 {
            let p = store.allocate("s", "wav").unwrap();
            touch(&p);
        }

        let removed = store.clear().unwrap();
        assert_eq!(removed, 4);
        assert_eq!(fs::read_dir(store.dir()).unwrap().count(), 0);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(ArtifactStore::at(tmp.path().join("store"), 0).is_err());
    }
}

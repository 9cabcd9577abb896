// src/snapshot/file.rs
// =============================================================================
// JSON file snapshots.
//
// The file is a flat object of URL -> "Checked" | "Not-checked". Each save
// writes `<path>.tmp` first and renames it over `<path>`, so killing the
// process mid-write leaves the previous snapshot readable.
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use super::SnapshotSink;
use crate::crawl::Frontier;
use crate::error::PersistenceError;

#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads a snapshot written by `save`.
    pub fn load(&self) -> Result<Frontier, PersistenceError> {
        let bytes = fs::read(&self.path).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Deserialize {
            path: self.path.clone(),
            source,
        })
    }

    /// Like `load`, but a missing file is `Ok(None)`.
    pub fn load_if_present(&self) -> Result<Option<Frontier>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        self.load().map(Some)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SnapshotSink for JsonFileSink {
    fn save(&self, frontier: &Frontier) -> Result<(), PersistenceError> {
        let json = serde_json::to_vec_pretty(frontier)?;
        let tmp = self.temp_path();

        fs::write(&tmp, json).map_err(|source| PersistenceError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

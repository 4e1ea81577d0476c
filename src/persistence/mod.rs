//! Stage progress persistence
//!
//! The only durable state is the current stage number. It is read once at
//! startup and written whenever a stage is cleared.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Persisted player progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Current stage (1-based)
    pub stage: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self { stage: 1 }
    }
}

impl Progress {
    pub fn new(stage: u32) -> Self {
        Self {
            stage: stage.max(1),
        }
    }

    /// Stage 0 never reaches the simulation
    fn normalized(self) -> Self {
        Self::new(self.stage)
    }
}

/// Storage backend for [`Progress`]
pub trait ProgressStore {
    fn load(&self) -> Result<Progress>;
    fn save(&self, progress: &Progress) -> Result<()>;
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl ProgressStore for FileStore {
    fn load(&self) -> Result<Progress> {
        if !self.path.exists() {
            log::info!("No progress at {}, starting at stage 1", self.path.display());
            return Ok(Progress::default());
        }

        let json = fs::read_to_string(&self.path)?;
        let progress: Progress = serde_json::from_str(&json)?;
        log::info!("Loaded progress: stage {}", progress.stage);
        Ok(progress.normalized())
    }

    fn save(&self, progress: &Progress) -> Result<()> {
        // Write a sibling file, then rename it over the target
        let tmp = self.tmp_path();
        fs::write(&tmp, serde_json::to_string(&progress.normalized())?)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("Progress saved (stage {})", progress.stage);
        Ok(())
    }
}

/// In-memory store (tests, embedding without a filesystem)
#[derive(Debug, Default)]
pub struct MemoryStore {
    progress: RefCell<Option<Progress>>,
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Result<Progress> {
        Ok(self.progress.borrow().unwrap_or_default())
    }

    fn save(&self, progress: &Progress) -> Result<()> {
        *self.progress.borrow_mut() = Some(progress.normalized());
        Ok(())
    }
}

//! Job board persistence.
//!
//! The board itself never touches storage; handlers call `save` with a snapshot
//! after each mutation and `load` once at startup.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;

use crate::jobs::models::JobApplication;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job store IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("job store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn load(&self) -> Result<Vec<JobApplication>, StoreError>;
    async fn save(&self, jobs: &[JobApplication]) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct JobsFile {
    jobs: Vec<JobApplication>,
}

/// JSON file on disk. A missing or empty file loads as an empty board.
#[derive(Debug, Clone)]
pub struct FileJobStore {
    path: PathBuf,
}

impl FileJobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl JobStore for FileJobStore {
    async fn load(&self) -> Result<Vec<JobApplication>, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        let file: JobsFile = serde_json::from_slice(&bytes)?;
        Ok(file.jobs)
    }

    async fn save(&self, jobs: &[JobApplication]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(&JobsFile {
            jobs: jobs.to_vec(),
        })?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, bytes).await?;
        fs::rename(tmp_path, &self.path).await?;
        Ok(())
    }
}

/// Keeps the last saved snapshot in memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    snapshot: Mutex<Vec<JobApplication>>,
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn load(&self) -> Result<Vec<JobApplication>, StoreError> {
        Ok(self.snapshot.lock().await.clone())
    }

    async fn save(&self, jobs: &[JobApplication]) -> Result<(), StoreError> {
        *self.snapshot.lock().await = jobs.to_vec();
        Ok(())
    }
}

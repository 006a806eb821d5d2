use crate::errors::{MappingError, StorageError};
use crate::mapping::HizbMapping;
use crate::models::Progress;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

/// Slot name of the progress snapshot inside the data file.
pub const PROGRESS_KEY: &str = "hizb_done_v1";

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub done: Vec<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

/// A JSON file of named slots; progress lives under [`PROGRESS_KEY`].
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best effort: anything unreadable yields the all-false default.
    pub async fn load(&self) -> Progress {
        let slots = match self.read_slots().await {
            Ok(slots) => slots,
            Err(err) => {
                warn!("ignoring unreadable progress file: {err}");
                return Progress::default();
            }
        };

        let Some(slot) = slots.get(PROGRESS_KEY) else {
            return Progress::default();
        };

        match ProgressSnapshot::deserialize(slot) {
            Ok(snapshot) => Progress::from_slice(&snapshot.done).unwrap_or_else(|| {
                warn!(
                    len = snapshot.done.len(),
                    "ignoring progress snapshot with wrong length"
                );
                Progress::default()
            }),
            Err(err) => {
                warn!("ignoring malformed progress snapshot: {err}");
                Progress::default()
            }
        }
    }

    pub async fn save(&self, progress: &Progress) -> Result<(), StorageError> {
        let mut slots = match self.read_slots().await {
            Ok(slots) => slots,
            Err(err) => {
                warn!("replacing unreadable progress file: {err}");
                Map::new()
            }
        };

        let snapshot = ProgressSnapshot {
            done: progress.as_slice().to_vec(),
            saved_at: Some(Local::now().to_rfc3339()),
        };
        slots.insert(PROGRESS_KEY.to_string(), serde_json::to_value(snapshot)?);

        let payload = serde_json::to_vec_pretty(&slots)?;
        fs::write(&self.path, payload).await?;
        Ok(())
    }

    async fn read_slots(&self) -> Result<Map<String, Value>, StorageError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(err) => Err(err.into()),
        }
    }
}

pub async fn load_mapping(path: &Path) -> Result<HizbMapping, MappingError> {
    let bytes = fs::read(path).await.map_err(|source| MappingError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    HizbMapping::from_json(&bytes)
}

#[cfg(test)]
pub(crate) fn unique_path(prefix: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("{prefix}_{}_{}.json", std::process::id(), nanos));
    path
}

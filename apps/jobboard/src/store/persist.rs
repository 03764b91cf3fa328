//! On-disk snapshot of the client store.
//!
//! Only the auth token and the `root` snapshot are persisted. Everything else the client
//! holds (recommendations, job pages, progress state) lives for one process only.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::errors::ClientError;
use crate::models::User;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedSnapshot {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub root: RootSnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootSnapshot {
    #[serde(default)]
    pub auth: AuthSnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    #[serde(default)]
    pub user: Option<User>,
}

/// JSON state file holding one `PersistedSnapshot`.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file → empty snapshot. A corrupt file is logged and treated as empty,
    /// so a bad write never locks the user out of logging in again.
    pub fn load(&self) -> Result<PersistedSnapshot, ClientError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PersistedSnapshot::default()),
            Err(e) => return Err(ClientError::Storage(e)),
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                warn!("Ignoring unreadable state file {}: {e}", self.path.display());
                Ok(PersistedSnapshot::default())
            }
        }
    }

    /// Writes through a uniquely named sibling temp file and renames it into place.
    pub fn save(&self, snapshot: &PersistedSnapshot) -> Result<(), ClientError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let encoded = serde_json::to_vec_pretty(snapshot)?;
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&encoded)?;
        tmp.persist(&self.path).map_err(|e| ClientError::Storage(e.error))?;

        debug!("State written to {}", self.path.display());
        Ok(())
    }

    pub fn remove(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(e)),
        }
    }
}

//! Persistence gateway
//!
//! Serializes the full application state, encrypts it, and writes it
//! under a single fixed key in the local store. Corrupt or unreadable
//! data loads as "no data" - callers treat that identically to a first
//! run. The plaintext backup pair exists for portability across
//! storage backends and is deliberately unencrypted.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cipher;
use crate::error::StoreError;
use crate::kv::KvStore;
use crate::record::{Document, Project, Settings};

/// Fixed key the snapshot blob is stored under
pub const STATE_KEY: &str = "scribe.state";

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

fn current_version() -> u32 {
    SNAPSHOT_VERSION
}

/// The full application state as one serializable unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot format version
    #[serde(default = "current_version")]
    pub version: u32,

    /// When the snapshot was taken (Unix milliseconds)
    pub timestamp: i64,

    pub projects: Vec<Project>,
    pub documents: Vec<Document>,

    #[serde(default)]
    pub settings: Settings,
}

/// Saves and loads encrypted snapshots through a [`KvStore`]
pub struct PersistenceGateway {
    kv: Box<dyn KvStore>,
    key: [u8; 32],
}

impl PersistenceGateway {
    pub fn new(kv: Box<dyn KvStore>, key: [u8; 32]) -> Self {
        Self { kv, key }
    }

    /// Serialize, encrypt and write a snapshot
    pub fn save(&mut self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string(snapshot)?;
        let blob = cipher::seal(&json, &self.key)?;
        self.kv.put(STATE_KEY, &blob)?;
        debug!(
            projects = snapshot.projects.len(),
            documents = snapshot.documents.len(),
            "Saved snapshot"
        );
        Ok(())
    }

    /// Read, decrypt and parse the stored snapshot
    ///
    /// Any failure - store unavailable, wrong key, tampered blob,
    /// unparseable JSON - returns `None` so the caller starts from an
    /// empty state, as on first run.
    pub fn load(&self) -> Option<Snapshot> {
        let blob = match self.kv.get(STATE_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!("No stored snapshot, starting empty");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Store unavailable, starting empty");
                return None;
            }
        };

        let json = match cipher::open(&blob, &self.key) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Stored snapshot unreadable, starting empty");
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(error = %e, "Stored snapshot unparseable, starting empty");
                None
            }
        }
    }

    /// Render a snapshot as plaintext JSON for backup
    pub fn export_backup(&self, snapshot: &Snapshot) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(snapshot)?)
    }

    /// Parse a plaintext backup
    ///
    /// Unlike [`load`](Self::load), a malformed backup is a real error:
    /// the user asked for this import and must hear that it failed.
    pub fn import_backup(&self, text: &str) -> Result<Snapshot, StoreError> {
        Ok(serde_json::from_str(text)?)
    }
}

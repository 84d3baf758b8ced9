//! On-disk snapshots.
//!
//! A snapshot is JSON holding each record's raw layout as hex. Loading runs
//! every record back through [`crate::layout`], so a file whose composite or
//! tier was edited by hand is refused rather than served.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::SovereignConfig;
use crate::error::PersistenceError;
use crate::layout;
use crate::service::Sovereign;
use crate::types::Dimension;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// Identity layouts, hex encoded
    pub identities: Vec<String>,
    #[serde(default)]
    pub details: Vec<DetailEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailEntry {
    pub dimension: Dimension,
    /// Detail layout, hex encoded
    pub data: String,
}

impl Snapshot {
    /// Capture every record currently held by `sovereign`.
    pub fn capture(sovereign: &Sovereign) -> Self {
        let identities = sovereign
            .identities()
            .records()
            .iter()
            .map(|(_, record)| hex::encode(layout::encode_identity(record)))
            .collect();
        let details = sovereign
            .details()
            .records()
            .iter()
            .map(|(_, record)| DetailEntry {
                dimension: record.dimension(),
                data: hex::encode(layout::encode_detail(record)),
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            identities,
            details,
        }
    }

    /// Rebuild state from this snapshot.
    pub fn restore(&self, config: &SovereignConfig, clock: Arc<dyn Clock>) -> Result<Sovereign, PersistenceError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::SnapshotVersion(self.version));
        }

        let sovereign = Sovereign::with_config(config, clock);
        for raw in &self.identities {
            let record = layout::decode_identity(&hex::decode(raw)?)?;
            sovereign.identities().restore(record)?;
        }
        for entry in &self.details {
            let record = layout::decode_detail(entry.dimension, &hex::decode(&entry.data)?)?;
            sovereign.details().restore(record)?;
        }
        Ok(sovereign)
    }
}

impl Sovereign {
    /// Write all records to `path` as a JSON snapshot.
    ///
    /// Writes to a sibling temp file first and renames it into place.
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let snapshot = Snapshot::capture(self);
        let json = serde_json::to_vec_pretty(&snapshot)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;

        info!(
            path = %path.display(),
            identities = snapshot.identities.len(),
            details = snapshot.details.len(),
            "Saved snapshot"
        );
        Ok(())
    }

    /// Load a snapshot from `path`, or start empty if the file does not exist.
    pub fn load_snapshot<P: AsRef<Path>>(
        path: P,
        config: &SovereignConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No snapshot, starting empty");
            return Ok(Self::with_config(config, clock));
        }

        let content = std::fs::read(path)?;
        let snapshot: Snapshot = serde_json::from_slice(&content)?;
        let sovereign = snapshot.restore(config, clock)?;
        debug!(
            path = %path.display(),
            identities = sovereign.identities().len(),
            details = sovereign.details().len(),
            "Loaded snapshot"
        );
        Ok(sovereign)
    }
}

//! In-memory snapshot slot.
//!
//! Holds the snapshot as serialized JSON, so a save/load cycle goes through
//! the same encoding a durable store would.

use super::{EstimateSnapshot, SnapshotStore};
use crate::errors::EstimateResult;

#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    json: Option<String>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        MemorySnapshotStore::default()
    }

    /// Pre-seed the slot with raw JSON (e.g. from browser storage)
    pub fn with_json(json: impl Into<String>) -> Self {
        MemorySnapshotStore { json: Some(json.into()) }
    }

    /// Raw JSON currently held
    pub fn json(&self) -> Option<&str> {
        self.json.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.json.is_none()
    }

    pub fn clear(&mut self) {
        self.json = None;
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> EstimateResult<Option<EstimateSnapshot>> {
        self.json.as_deref().map(EstimateSnapshot::from_json).transpose()
    }

    fn save(&mut self, snapshot: &EstimateSnapshot) -> EstimateResult<()> {
        self.json = Some(snapshot.to_json()?);
        Ok(())
    }
}

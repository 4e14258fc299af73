//! # Persistence
//!
//! Saving and restoring an estimate in progress.
//!
//! The store never writes on its own. Callers decide when to persist and
//! hand an adapter to [`EstimateStore::save_estimate`](crate::store::EstimateStore::save_estimate)
//! / [`load_estimate`](crate::store::EstimateStore::load_estimate).
//!
//! ## What is persisted
//!
//! An [`EstimateSnapshot`]: customer, building, accessories, door
//! positions, colors, concrete and contract. The wizard position and the
//! pricing breakdown are never stored; they are reset and recomputed on load.
//!
//! ## Adapters
//!
//! - [`FileSnapshotStore`] - JSON `.est` file with atomic writes and a lock file
//! - [`MemorySnapshotStore`] - in-memory slot for tests and embedding

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
pub mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::model::{
    AccessoriesConfig, BuildingConfig, ColorConfig, ConcreteConfig, ContractConfig, CustomerInfo, DoorPositions,
};
use crate::patch::Validate;

/// Current schema version for snapshots
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Durable storage for one estimate.
pub trait SnapshotStore {
    /// Read the stored snapshot. `Ok(None)` means nothing has been saved yet.
    fn load(&self) -> EstimateResult<Option<EstimateSnapshot>>;

    /// Replace the stored snapshot.
    fn save(&mut self, snapshot: &EstimateSnapshot) -> EstimateResult<()>;
}

/// Snapshot header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub saved_at: DateTime<Utc>,
}

impl SnapshotMeta {
    pub fn now() -> Self {
        SnapshotMeta {
            version: SCHEMA_VERSION.to_string(),
            saved_at: Utc::now(),
        }
    }
}

/// The persisted subset of an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateSnapshot {
    pub meta: SnapshotMeta,
    pub customer: CustomerInfo,
    pub building: BuildingConfig,
    pub accessories: AccessoriesConfig,
    #[serde(default)]
    pub door_positions: DoorPositions,
    pub colors: ColorConfig,
    pub concrete: ConcreteConfig,
    pub contract: ContractConfig,
}

impl EstimateSnapshot {
    /// Serialize to pretty JSON
    pub fn to_json(&self) -> EstimateResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EstimateError::SerializationError {
            reason: e.to_string(),
        })
    }

    /// Parse JSON and check the schema version
    pub fn from_json(json: &str) -> EstimateResult<Self> {
        let snapshot: EstimateSnapshot = serde_json::from_str(json).map_err(|e| EstimateError::SerializationError {
            reason: format!("Invalid snapshot JSON: {}", e),
        })?;
        validate_version(&snapshot.meta.version)?;
        Ok(snapshot)
    }
}

/// A snapshot read from outside must describe a building the store could
/// have produced: allowed dimensions and an offered slab thickness.
/// Accessories are normalized on load rather than rejected.
impl Validate for EstimateSnapshot {
    fn validate(&self) -> EstimateResult<()> {
        self.building.validate()?;
        self.concrete.validate()
    }
}

/// Validate that a snapshot version is compatible with the current schema.
///
/// Major versions must match. While the schema is 0.x, a snapshot with a
/// newer minor version is rejected as well.
pub fn validate_version(file_version: &str) -> EstimateResult<()> {
    let mismatch = || EstimateError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file = Version::parse(file_version).map_err(|_| mismatch())?;
    let current = Version::parse(SCHEMA_VERSION).map_err(|e| EstimateError::Internal {
        message: format!("Bad SCHEMA_VERSION: {}", e),
    })?;

    if file.major != current.major {
        return Err(mismatch());
    }
    if current.major == 0 && file.minor > current.minor {
        return Err(mismatch());
    }
    Ok(())
}

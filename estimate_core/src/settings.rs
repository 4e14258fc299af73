//! # Estimator Settings
//!
//! Deployment-level configuration: the rate table, the default delivery
//! distance, where snapshots are stored, and the log filter the CLI installs.
//!
//! Settings are a JSON file. Every field is optional; anything missing
//! falls back to [`EstimatorSettings::default`].
//!
//! ```json
//! {
//!   "delivery_miles": 40,
//!   "storage_path": "estimates/current.est",
//!   "rates": { "labor_per_sqft": 3.75 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::pricing::PricingRates;

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info,estimate_core=debug";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorSettings {
    pub rates: PricingRates,
    /// Distance from the plant to the build site (miles)
    pub delivery_miles: Decimal,
    /// Snapshot file; `None` disables persistence in the CLI
    pub storage_path: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive string
    pub log_filter: String,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        EstimatorSettings {
            rates: PricingRates::default(),
            delivery_miles: Decimal::ZERO,
            storage_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EstimatorSettings {
    /// Parse settings JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> EstimateResult<Self> {
        let settings: EstimatorSettings = serde_json::from_str(json).map_err(|e| EstimateError::SerializationError {
            reason: format!("Invalid settings: {}", e),
        })?;
        if settings.delivery_miles < Decimal::ZERO {
            return Err(EstimateError::invalid_input(
                "delivery_miles",
                settings.delivery_miles.to_string(),
                "Delivery distance cannot be negative",
            ));
        }
        Ok(settings)
    }
}

/// Load settings from a JSON file.
pub fn load_settings(path: &Path) -> EstimateResult<EstimatorSettings> {
    let contents = fs::read_to_string(path)
        .map_err(|e| EstimateError::file_error("read settings", path.display().to_string(), e.to_string()))?;
    EstimatorSettings::from_json(&contents)
}

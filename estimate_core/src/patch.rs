//! # Boundary Parsing
//!
//! The store's setters never fail. Anything arriving from outside (a form
//! post, an API call) is parsed and validated here first, so malformed
//! payloads are rejected before they can reach the store's merge logic.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::model::BuildingPatch;
//! use estimate_core::patch::parse_patch;
//!
//! let patch: BuildingPatch = parse_patch(r#"{"width": 30, "leg_type": "certified"}"#).unwrap();
//! assert!(patch.width.is_some());
//!
//! // Unknown fields and disallowed values are rejected
//! assert!(parse_patch::<BuildingPatch>(r#"{"wdth": 30}"#).is_err());
//! assert!(parse_patch::<BuildingPatch>(r#"{"width": 31}"#).is_err());
//! ```

use serde::de::DeserializeOwned;

use crate::errors::{EstimateError, EstimateResult};

/// Input that can check itself against the estimator's allowed values.
pub trait Validate {
    fn validate(&self) -> EstimateResult<()>;
}

/// Deserialize a JSON payload and validate it.
///
/// Patch types deny unknown fields, so a payload naming a field outside the
/// schema fails here with a `SerializationError`.
pub fn parse_patch<T>(json: &str) -> EstimateResult<T>
where
    T: DeserializeOwned + Validate,
{
    let value: T = serde_json::from_str(json).map_err(|e| EstimateError::SerializationError {
        reason: format!("Invalid payload: {}", e),
    })?;
    value.validate()?;
    Ok(value)
}

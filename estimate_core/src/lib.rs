//! # estimate_core - Metal Building Estimator Engine
//!
//! `estimate_core` holds everything behind the estimator wizard: the
//! configuration store, the pricing engine and the wizard cursors. There is
//! no UI here; a front end drives the store and renders what it reads back.
//!
//! ## Design Philosophy
//!
//! - **Explicit state**: one [`EstimateStore`] value per estimate, constructed and passed around
//! - **Pure pricing**: [`compute_pricing`] is a function of its inputs, in exact decimal
//! - **Forgiving setters**: the store clamps or ignores bad values; strict checks live at [`patch::parse_patch`]
//! - **JSON-First**: every record implements Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use estimate_core::{EstimateStore, EstimatorSettings};
//! use estimate_core::model::{DoorConfig, OpeningSize};
//!
//! let mut store = EstimateStore::new(&EstimatorSettings::default());
//! store.add_door(DoorConfig::roll_up(OpeningSize::new(8, 8)));
//!
//! for (label, amount) in store.pricing().line_items() {
//!     println!("{label}: ${amount}");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`store`] - The estimate store: setters, door/window CRUD, navigation, load/save
//! - [`model`] - Customer, building, accessories, colors, concrete and contract records
//! - [`pricing`] - Pricing engine and rate table
//! - [`wizard`] - Bounded step cursors
//! - [`persistence`] - Snapshot format and storage adapters
//! - [`patch`] - Validated parsing of partial-update payloads
//! - [`settings`] - Deployment settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod errors;
pub mod model;
pub mod patch;
pub mod persistence;
pub mod pricing;
pub mod settings;
pub mod store;
pub mod units;
pub mod wizard;

// Re-export commonly used types at crate root for convenience
pub use errors::{EstimateError, EstimateResult};
pub use persistence::{EstimateSnapshot, MemorySnapshotStore, SnapshotStore};
#[cfg(not(target_arch = "wasm32"))]
pub use persistence::FileSnapshotStore;
pub use pricing::{compute_pricing, PricingBreakdown, PricingRates};
pub use settings::{load_settings, EstimatorSettings};
pub use store::EstimateStore;

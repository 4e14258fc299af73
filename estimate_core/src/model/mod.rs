//! # Estimate Data Model
//!
//! Plain, serializable records describing the order in progress. Every
//! entity is composed by value; the [`EstimateStore`](crate::store::EstimateStore)
//! owns all of them and hands out shared references only.
//!
//! ## Structure
//!
//! ```text
//! Estimate
//! ├── customer: CustomerInfo
//! ├── building: BuildingConfig (width × length × height, legs, breezeways)
//! ├── accessories: AccessoriesConfig
//! │   ├── doors: IndexMap<DoorId, DoorConfig> (walk + roll-up, kind on each door)
//! │   ├── windows: Vec<WindowConfig>
//! │   └── insulation / ventilation / gutters
//! ├── colors: ColorConfig
//! ├── concrete: ConcreteConfig
//! └── contract: ContractConfig
//! ```
//!
//! Each entity has a matching `*Patch` type: all fields optional, shallow
//! merged into the entity by the store's setters.

pub mod accessories;
pub mod building;
pub mod colors;
pub mod concrete;
pub mod contract;
pub mod customer;

pub use accessories::{
    AccessoriesConfig, AccessoriesPatch, DoorConfig, DoorId, DoorKind, DoorPatch, Insulation,
    WindowConfig, WindowId, MAX_QUANTITY, MIN_QUANTITY,
};
pub use building::{BuildingConfig, BuildingPatch, BuildingView, Breezeway, LegType};
pub use colors::{palette_name, ColorConfig, ColorPatch};
pub use concrete::{ConcreteConfig, ConcreteKind, ConcretePatch};
pub use contract::{ContractConfig, ContractPatch, SignatureData};
pub use customer::{CustomerInfo, CustomerPatch};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Door placement offsets remembered per view, keyed `"{door_id}-{view}"`.
///
/// Only used to restore where a door was dragged to when the preview
/// switches sides; never priced.
pub type DoorPositions = BTreeMap<String, f64>;

/// Key into [`DoorPositions`] for a door seen from a view
pub fn door_position_key(door_id: &DoorId, view: BuildingView) -> String {
    format!("{}-{}", door_id, view.key())
}

/// One of the four exterior walls of the building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Wall {
    #[default]
    Front,
    Back,
    Left,
    Right,
}

impl Wall {
    /// All walls for UI selection
    pub const ALL: [Wall; 4] = [Wall::Front, Wall::Back, Wall::Left, Wall::Right];

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Wall::Front => "Front Wall",
            Wall::Back => "Back Wall",
            Wall::Left => "Left Wall",
            Wall::Right => "Right Wall",
        }
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Width × height descriptor for a door or window opening.
///
/// Written as `"WxH"` (e.g. `"10x10"` for a 10' × 10' roll-up door,
/// `"30x36"` for a 30" × 36" window). The unit is fixed by the price table
/// the size is looked up in: feet for doors, inches for windows.
///
/// Serializes as the `"WxH"` string so it can key JSON price tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OpeningSize {
    pub width: u32,
    pub height: u32,
}

impl OpeningSize {
    pub const fn new(width: u32, height: u32) -> Self {
        OpeningSize { width, height }
    }

    /// Same width, different height
    pub fn with_height(self, height: u32) -> Self {
        OpeningSize { height, ..self }
    }
}

impl fmt::Display for OpeningSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for OpeningSize {
    type Err = EstimateError;

    fn from_str(s: &str) -> EstimateResult<Self> {
        let invalid = || EstimateError::invalid_input("size", s, "Expected WxH with positive integers, e.g. 10x10");
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(OpeningSize { width, height })
    }
}

impl TryFrom<String> for OpeningSize {
    type Error = EstimateError;

    fn try_from(s: String) -> EstimateResult<Self> {
        s.parse()
    }
}

impl From<OpeningSize> for String {
    fn from(size: OpeningSize) -> Self {
        size.to_string()
    }
}

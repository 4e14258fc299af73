//! # Accessories
//!
//! Doors, windows, insulation, ventilation and gutters.
//!
//! Walk doors and roll-up doors live in a single insertion-ordered map keyed
//! by [`DoorId`], with the [`DoorKind`] recorded on each door. The two
//! per-kind lists the UI shows are ordered views over that map, so an id is
//! unique across both kinds by construction.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::model::{AccessoriesConfig, DoorConfig, OpeningSize};
//!
//! let mut accessories = AccessoriesConfig::default();
//! let door = DoorConfig::roll_up(OpeningSize::new(10, 10));
//! let id = door.id;
//! accessories.doors.insert(id, door);
//!
//! assert_eq!(accessories.roll_up_doors().count(), 1);
//! assert_eq!(accessories.walk_doors().count(), 0);
//! ```

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{OpeningSize, Wall};
use crate::errors::{EstimateError, EstimateResult};
use crate::patch::Validate;
use crate::units::Feet;

/// Smallest quantity a door or window line can carry
pub const MIN_QUANTITY: u32 = 1;
/// Largest quantity a door or window line can carry
pub const MAX_QUANTITY: u32 = 10;

/// Clamp a line quantity into `MIN_QUANTITY..=MAX_QUANTITY`
pub fn clamp_quantity(quantity: u32) -> u32 {
    quantity.clamp(MIN_QUANTITY, MAX_QUANTITY)
}

fn validate_quantity(quantity: u32) -> EstimateResult<()> {
    if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
        return Err(EstimateError::invalid_input(
            "quantity",
            quantity.to_string(),
            format!("Quantity must be between {} and {}", MIN_QUANTITY, MAX_QUANTITY),
        ));
    }
    Ok(())
}

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! opaque_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random id
            pub fn new() -> Self {
                $name(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = EstimateError;

            fn from_str(s: &str) -> EstimateResult<Self> {
                Uuid::parse_str(s)
                    .map($name)
                    .map_err(|e| EstimateError::invalid_input("id", s, e.to_string()))
            }
        }
    };
}

opaque_id!(DoorId);
opaque_id!(WindowId);

// ============================================================================
// Doors
// ============================================================================

/// Door category. Each kind has its own size options and price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DoorKind {
    /// Personnel door
    #[default]
    Walk,
    /// Overhead roll-up door
    RollUp,
}

impl DoorKind {
    pub const ALL: [DoorKind; 2] = [DoorKind::Walk, DoorKind::RollUp];

    pub fn display_name(&self) -> &'static str {
        match self {
            DoorKind::Walk => "Walk Door",
            DoorKind::RollUp => "Roll-Up Door",
        }
    }

    /// Default size for a newly added door of this kind (ft)
    pub fn default_size(&self) -> OpeningSize {
        match self {
            DoorKind::Walk => OpeningSize::new(3, 7),
            DoorKind::RollUp => OpeningSize::new(10, 10),
        }
    }
}

impl fmt::Display for DoorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A door line on the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DoorConfig {
    pub id: DoorId,
    pub kind: DoorKind,
    /// Width × height in feet; keys the price table
    pub size: OpeningSize,
    pub wall: Wall,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_ft: Option<Feet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_ft: Option<Feet>,
    /// Offset of the door's left jamb from the wall's left edge (ft)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_ft: Option<f64>,
    pub quantity: u32,
}

impl DoorConfig {
    /// New door of the given kind and size with a fresh id, on the front wall.
    pub fn new(kind: DoorKind, size: OpeningSize) -> Self {
        DoorConfig {
            id: DoorId::new(),
            kind,
            size,
            wall: Wall::Front,
            width_ft: None,
            height_ft: None,
            position_ft: None,
            quantity: 1,
        }
    }

    pub fn walk(size: OpeningSize) -> Self {
        DoorConfig::new(DoorKind::Walk, size)
    }

    pub fn roll_up(size: OpeningSize) -> Self {
        DoorConfig::new(DoorKind::RollUp, size)
    }

    pub fn with_wall(mut self, wall: Wall) -> Self {
        self.wall = wall;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Opening height: the explicit height if set, otherwise the size's
    pub fn effective_height(&self) -> Feet {
        self.height_ft.unwrap_or(Feet(self.size.height))
    }

    /// Shallow-merge a patch into this door.
    pub fn apply(&mut self, patch: DoorPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(wall) = patch.wall {
            self.wall = wall;
        }
        if let Some(width) = patch.width_ft {
            self.width_ft = Some(width);
        }
        if let Some(height) = patch.height_ft {
            self.height_ft = Some(height);
        }
        if let Some(position) = patch.position_ft {
            self.position_ft = Some(position);
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
    }
}

impl Validate for DoorConfig {
    fn validate(&self) -> EstimateResult<()> {
        validate_quantity(self.quantity)?;
        if let Some(position) = self.position_ft {
            if !position.is_finite() || position < 0.0 {
                return Err(EstimateError::invalid_input(
                    "position_ft",
                    position.to_string(),
                    "Position must be a non-negative distance",
                ));
            }
        }
        Ok(())
    }
}

/// Partial update for a [`DoorConfig`]. The id is not patchable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DoorPatch {
    pub kind: Option<DoorKind>,
    pub size: Option<OpeningSize>,
    pub wall: Option<Wall>,
    pub width_ft: Option<Feet>,
    pub height_ft: Option<Feet>,
    pub position_ft: Option<f64>,
    pub quantity: Option<u32>,
}

impl DoorPatch {
    pub fn quantity(quantity: u32) -> Self {
        DoorPatch {
            quantity: Some(quantity),
            ..Default::default()
        }
    }
}

impl Validate for DoorPatch {
    fn validate(&self) -> EstimateResult<()> {
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        if let Some(position) = self.position_ft {
            if !position.is_finite() || position < 0.0 {
                return Err(EstimateError::invalid_input(
                    "position_ft",
                    position.to_string(),
                    "Position must be a non-negative distance",
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Windows
// ============================================================================

/// A window line on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowConfig {
    pub id: WindowId,
    /// Width × height in inches; keys the price table
    pub size: OpeningSize,
    pub wall: Wall,
    pub quantity: u32,
}

impl WindowConfig {
    /// Standard window sizes (in)
    pub const SIZES: [OpeningSize; 2] = [OpeningSize::new(30, 36), OpeningSize::new(36, 48)];

    pub fn new(size: OpeningSize) -> Self {
        WindowConfig {
            id: WindowId::new(),
            size,
            wall: Wall::Front,
            quantity: 1,
        }
    }

    pub fn with_wall(mut self, wall: Wall) -> Self {
        self.wall = wall;
        self
    }
}

impl Validate for WindowConfig {
    fn validate(&self) -> EstimateResult<()> {
        validate_quantity(self.quantity)
    }
}

// ============================================================================
// Insulation
// ============================================================================

/// Insulation package. `Full` covers both ceiling and walls but is priced
/// as its own level, not as the sum of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Insulation {
    #[default]
    None,
    Ceiling,
    Wall,
    Full,
}

impl Insulation {
    pub const ALL: [Insulation; 4] = [Insulation::None, Insulation::Ceiling, Insulation::Wall, Insulation::Full];

    pub fn display_name(&self) -> &'static str {
        match self {
            Insulation::None => "No Insulation",
            Insulation::Ceiling => "Ceiling Only (R-19)",
            Insulation::Wall => "Walls Only",
            Insulation::Full => "Full Insulation (Ceiling + Walls)",
        }
    }
}

impl fmt::Display for Insulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Accessories aggregate
// ============================================================================

/// Everything added to the bare shell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessoriesConfig {
    /// Walk and roll-up doors, in the order they were added
    pub doors: IndexMap<DoorId, DoorConfig>,
    pub windows: Vec<WindowConfig>,
    pub insulation: Insulation,
    pub ventilation: bool,
    pub gutters: bool,
}

impl AccessoriesConfig {
    /// Walk doors in insertion order
    pub fn walk_doors(&self) -> impl Iterator<Item = &DoorConfig> {
        self.doors_of(DoorKind::Walk)
    }

    /// Roll-up doors in insertion order
    pub fn roll_up_doors(&self) -> impl Iterator<Item = &DoorConfig> {
        self.doors_of(DoorKind::RollUp)
    }

    pub fn doors_of(&self, kind: DoorKind) -> impl Iterator<Item = &DoorConfig> {
        self.doors.values().filter(move |d| d.kind == kind)
    }

    pub fn door(&self, id: &DoorId) -> Option<&DoorConfig> {
        self.doors.get(id)
    }

    pub fn window(&self, id: &WindowId) -> Option<&WindowConfig> {
        self.windows.iter().find(|w| w.id == *id)
    }
}

/// Partial update for [`AccessoriesConfig`]. Door and window lists, when
/// given, replace the current lists wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessoriesPatch {
    pub doors: Option<Vec<DoorConfig>>,
    pub windows: Option<Vec<WindowConfig>>,
    pub insulation: Option<Insulation>,
    pub ventilation: Option<bool>,
    pub gutters: Option<bool>,
}

impl Validate for AccessoriesPatch {
    fn validate(&self) -> EstimateResult<()> {
        if let Some(doors) = &self.doors {
            for door in doors {
                door.validate()?;
            }
        }
        if let Some(windows) = &self.windows {
            for window in windows {
                window.validate()?;
            }
        }
        Ok(())
    }
}

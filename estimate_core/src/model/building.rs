//! # Building Configuration
//!
//! Footprint, eave height, frame rating and breezeways.
//!
//! Dimensions are restricted to the sizes the manufacturer actually builds:
//!
//! | Dimension | Allowed values (ft)                         |
//! |-----------|---------------------------------------------|
//! | Width     | 12 - 40, every 2'                           |
//! | Length    | 20 - 100 (see [`LENGTH_OPTIONS`])           |
//! | Height    | 8 - 16, every 1'                            |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::patch::Validate;
use crate::units::{Feet, LinFt, SqFt};

/// Allowed building widths (ft)
pub const WIDTH_OPTIONS: [u32; 15] = [12, 14, 16, 18, 20, 22, 24, 26, 28, 30, 32, 34, 36, 38, 40];

/// Allowed building lengths (ft)
pub const LENGTH_OPTIONS: [u32; 23] = [
    20, 21, 25, 26, 30, 31, 35, 36, 40, 41, 45, 46, 50, 55, 60, 65, 70, 75, 80, 85, 90, 95, 100,
];

/// Allowed eave heights (ft)
pub const HEIGHT_OPTIONS: [u32; 9] = [8, 9, 10, 11, 12, 13, 14, 15, 16];

/// Headroom a roll-up door must leave below the eave (ft)
pub const DOOR_HEADROOM_FT: u32 = 2;

/// Frame rating. Certified frames are engineered for higher wind and snow
/// loads and carry a base-price multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LegType {
    #[default]
    Standard,
    Certified,
}

impl LegType {
    pub const ALL: [LegType; 2] = [LegType::Standard, LegType::Certified];

    pub fn display_name(&self) -> &'static str {
        match self {
            LegType::Standard => "Standard (29 gauge)",
            LegType::Certified => "Certified (26 gauge - Wind/Snow rated)",
        }
    }
}

impl fmt::Display for LegType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Which side of the building the preview is showing. Not priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BuildingView {
    #[default]
    Front,
    Back,
    Left,
    Right,
}

impl BuildingView {
    pub const ALL: [BuildingView; 4] = [
        BuildingView::Front,
        BuildingView::Back,
        BuildingView::Left,
        BuildingView::Right,
    ];

    /// Key fragment used in the door position map
    pub fn key(&self) -> &'static str {
        match self {
            BuildingView::Front => "front",
            BuildingView::Back => "back",
            BuildingView::Left => "left",
            BuildingView::Right => "right",
        }
    }
}

impl fmt::Display for BuildingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Breezeway flags: doors centered on opposing walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Breezeway {
    pub front_back: bool,
    pub side_side: bool,
}

/// Building shell configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingConfig {
    pub width: Feet,
    pub length: Feet,
    /// Eave height
    pub height: Feet,
    pub leg_type: LegType,
    pub building_view: BuildingView,
    pub breezeway: Breezeway,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        BuildingConfig {
            width: Feet(24),
            length: Feet(30),
            height: Feet(10),
            leg_type: LegType::Standard,
            building_view: BuildingView::Front,
            breezeway: Breezeway::default(),
        }
    }
}

impl BuildingConfig {
    /// Footprint area
    pub fn square_footage(&self) -> SqFt {
        self.width * self.length
    }

    /// Footprint perimeter, used as the gutter run
    pub fn perimeter(&self) -> LinFt {
        self.width.perimeter_with(self.length)
    }

    /// Tallest roll-up door that still leaves [`DOOR_HEADROOM_FT`] below the eave
    pub fn max_roll_up_door_height(&self) -> Feet {
        self.height - Feet(DOOR_HEADROOM_FT)
    }

    /// Shallow-merge a patch. Dimensions outside the allowed sets are
    /// skipped; the names of skipped fields are returned.
    pub fn apply(&mut self, patch: BuildingPatch) -> Vec<&'static str> {
        let mut skipped = Vec::new();
        if let Some(width) = patch.width {
            if is_allowed_width(width) {
                self.width = width;
            } else {
                skipped.push("width");
            }
        }
        if let Some(length) = patch.length {
            if is_allowed_length(length) {
                self.length = length;
            } else {
                skipped.push("length");
            }
        }
        if let Some(height) = patch.height {
            if is_allowed_height(height) {
                self.height = height;
            } else {
                skipped.push("height");
            }
        }
        if let Some(leg_type) = patch.leg_type {
            self.leg_type = leg_type;
        }
        if let Some(view) = patch.building_view {
            self.building_view = view;
        }
        if let Some(breezeway) = patch.breezeway {
            self.breezeway = breezeway;
        }
        skipped
    }
}

pub fn is_allowed_width(width: Feet) -> bool {
    WIDTH_OPTIONS.contains(&width.0)
}

pub fn is_allowed_length(length: Feet) -> bool {
    LENGTH_OPTIONS.contains(&length.0)
}

pub fn is_allowed_height(height: Feet) -> bool {
    HEIGHT_OPTIONS.contains(&height.0)
}

/// Partial update for [`BuildingConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildingPatch {
    pub width: Option<Feet>,
    pub length: Option<Feet>,
    pub height: Option<Feet>,
    pub leg_type: Option<LegType>,
    pub building_view: Option<BuildingView>,
    pub breezeway: Option<Breezeway>,
}

fn check_width(width: Feet) -> EstimateResult<()> {
    if !is_allowed_width(width) {
        return Err(EstimateError::invalid_input(
            "width",
            width.0.to_string(),
            "Width must be 12-40 ft in 2 ft steps",
        ));
    }
    Ok(())
}

fn check_length(length: Feet) -> EstimateResult<()> {
    if !is_allowed_length(length) {
        return Err(EstimateError::invalid_input(
            "length",
            length.0.to_string(),
            "Length is not a standard building length",
        ));
    }
    Ok(())
}

fn check_height(height: Feet) -> EstimateResult<()> {
    if !is_allowed_height(height) {
        return Err(EstimateError::invalid_input(
            "height",
            height.0.to_string(),
            "Height must be 8-16 ft",
        ));
    }
    Ok(())
}

/// A complete configuration (e.g. one read back from a snapshot) must use
/// only the allowed dimensions.
impl Validate for BuildingConfig {
    fn validate(&self) -> EstimateResult<()> {
        check_width(self.width)?;
        check_length(self.length)?;
        check_height(self.height)
    }
}

impl Validate for BuildingPatch {
    fn validate(&self) -> EstimateResult<()> {
        self.width.map_or(Ok(()), check_width)?;
        self.length.map_or(Ok(()), check_length)?;
        self.height.map_or(Ok(()), check_height)
    }
}

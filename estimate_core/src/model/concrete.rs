//! Concrete foundation options.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::patch::Validate;
use crate::units::Inches;

/// Slab thicknesses offered (in)
pub const THICKNESS_OPTIONS: [u32; 3] = [4, 5, 6];

/// Foundation package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConcreteKind {
    /// Customer handles the foundation
    #[default]
    None,
    /// Piers under each leg.
    ///
    /// Priced per pier in practice, but the pier count is not modeled, so
    /// the reference rate table has no per-sq-ft rate for piers and they
    /// quote at $0. Deployments that sell piers should add a
    /// `concrete_per_sqft` entry in their settings or quote piers separately.
    Piers,
    /// Poured slab
    Slab,
    /// Slab with site prep, forms and finishing
    Turnkey,
}

impl ConcreteKind {
    pub const ALL: [ConcreteKind; 4] = [
        ConcreteKind::None,
        ConcreteKind::Piers,
        ConcreteKind::Slab,
        ConcreteKind::Turnkey,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ConcreteKind::None => "No Concrete",
            ConcreteKind::Piers => "Concrete Piers",
            ConcreteKind::Slab => "Concrete Slab",
            ConcreteKind::Turnkey => "Turnkey Slab",
        }
    }
}

impl fmt::Display for ConcreteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcreteConfig {
    pub kind: ConcreteKind,
    /// Site already has a usable pad
    pub existing_pad: bool,
    pub thickness: Inches,
}

impl Default for ConcreteConfig {
    fn default() -> Self {
        ConcreteConfig {
            kind: ConcreteKind::None,
            existing_pad: false,
            thickness: Inches(4),
        }
    }
}

impl ConcreteConfig {
    pub fn apply(&mut self, patch: ConcretePatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(existing_pad) = patch.existing_pad {
            self.existing_pad = existing_pad;
        }
        if let Some(thickness) = patch.thickness {
            self.thickness = thickness;
        }
    }
}

/// Partial update for [`ConcreteConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConcretePatch {
    pub kind: Option<ConcreteKind>,
    pub existing_pad: Option<bool>,
    pub thickness: Option<Inches>,
}

impl Validate for ConcretePatch {
    fn validate(&self) -> EstimateResult<()> {
        self.thickness.map_or(Ok(()), check_thickness)
    }
}

impl Validate for ConcreteConfig {
    fn validate(&self) -> EstimateResult<()> {
        check_thickness(self.thickness)
    }
}

fn check_thickness(thickness: Inches) -> EstimateResult<()> {
    if !THICKNESS_OPTIONS.contains(&thickness.0) {
        return Err(EstimateError::invalid_input(
            "thickness",
            thickness.0.to_string(),
            "Thickness must be 4, 5 or 6 inches",
        ));
    }
    Ok(())
}

//! # Rate Table
//!
//! Every number the pricing engine multiplies by. Rates are data, not
//! logic: a deployment can ship its own table in the settings file and the
//! engine does not change.
//!
//! ## Reference Rates
//!
//! | Item                         | Rate                         |
//! |------------------------------|------------------------------|
//! | Base (per sq ft)             | $8.50                        |
//! | Leg multiplier               | standard 1.00, certified 1.15|
//! | Gutters (per linear ft)      | $4.50                        |
//! | Ventilation                  | $150 flat                    |
//! | Slab / turnkey (per sq ft)   | $6.50 / $8.75                |
//! | Thickness multiplier         | 4" 1.00, 5" 1.15, 6" 1.30    |
//! | Labor (per sq ft)            | $3.50                        |
//! | Delivery                     | $500 + $3.50/mile            |
//! | Deposit                      | 35%                          |
//!
//! Any lookup that misses the table prices as zero.
//! Piers have no per-sq-ft rate (they are sold per pier and the pier count
//! is not part of the configuration), so a piers foundation quotes at $0
//! unless a deployment adds its own `concrete_per_sqft` entry.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{ConcreteKind, DoorKind, Insulation, LegType, OpeningSize};
use crate::units::Inches;

/// `Decimal` from an integer number of cents
fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

static REFERENCE_RATES: Lazy<PricingRates> = Lazy::new(|| PricingRates {
    base_per_sqft: cents(850),
    leg_multipliers: BTreeMap::from([
        (LegType::Standard, cents(100)),
        (LegType::Certified, cents(115)),
    ]),
    walk_doors: BTreeMap::from([
        (OpeningSize::new(3, 7), cents(35_000)),
        (OpeningSize::new(4, 7), cents(40_000)),
        (OpeningSize::new(6, 7), cents(55_000)),
        (OpeningSize::new(8, 8), Decimal::ZERO),
        (OpeningSize::new(10, 10), Decimal::ZERO),
        (OpeningSize::new(12, 12), Decimal::ZERO),
    ]),
    roll_up_doors: BTreeMap::from([
        (OpeningSize::new(3, 7), Decimal::ZERO),
        (OpeningSize::new(4, 7), Decimal::ZERO),
        (OpeningSize::new(6, 7), Decimal::ZERO),
        (OpeningSize::new(8, 8), cents(85_000)),
        (OpeningSize::new(10, 10), cents(110_000)),
        (OpeningSize::new(12, 12), cents(145_000)),
    ]),
    windows: BTreeMap::from([
        (OpeningSize::new(30, 36), cents(17_500)),
        (OpeningSize::new(36, 48), cents(22_500)),
    ]),
    insulation: BTreeMap::from([
        (Insulation::None, Decimal::ZERO),
        (Insulation::Ceiling, cents(125)),
        (Insulation::Full, cents(250)),
    ]),
    ventilation: cents(15_000),
    gutters_per_lin_ft: cents(450),
    concrete_per_sqft: BTreeMap::from([
        (ConcreteKind::Slab, cents(650)),
        (ConcreteKind::Turnkey, cents(875)),
    ]),
    thickness_multipliers: BTreeMap::from([(4, cents(100)), (5, cents(115)), (6, cents(130))]),
    labor_per_sqft: cents(350),
    delivery_base: cents(50_000),
    delivery_per_mile: cents(350),
    deposit_fraction: cents(35),
});

/// Price table consumed by [`compute_pricing`](super::compute_pricing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingRates {
    pub base_per_sqft: Decimal,
    pub leg_multipliers: BTreeMap<LegType, Decimal>,
    /// Walk door unit prices keyed by size in feet
    pub walk_doors: BTreeMap<OpeningSize, Decimal>,
    /// Roll-up door unit prices keyed by size in feet
    pub roll_up_doors: BTreeMap<OpeningSize, Decimal>,
    /// Window unit prices keyed by size in inches
    pub windows: BTreeMap<OpeningSize, Decimal>,
    /// Flat price per insulation level
    pub insulation: BTreeMap<Insulation, Decimal>,
    pub ventilation: Decimal,
    pub gutters_per_lin_ft: Decimal,
    pub concrete_per_sqft: BTreeMap<ConcreteKind, Decimal>,
    /// Multiplier keyed by slab thickness in inches
    pub thickness_multipliers: BTreeMap<u32, Decimal>,
    pub labor_per_sqft: Decimal,
    pub delivery_base: Decimal,
    pub delivery_per_mile: Decimal,
    pub deposit_fraction: Decimal,
}

impl Default for PricingRates {
    fn default() -> Self {
        REFERENCE_RATES.clone()
    }
}

impl PricingRates {
    pub fn leg_multiplier(&self, leg_type: LegType) -> Decimal {
        lookup(&self.leg_multipliers, &leg_type)
    }

    pub fn door_unit_price(&self, kind: DoorKind, size: OpeningSize) -> Decimal {
        let table = match kind {
            DoorKind::Walk => &self.walk_doors,
            DoorKind::RollUp => &self.roll_up_doors,
        };
        lookup(table, &size)
    }

    pub fn window_unit_price(&self, size: OpeningSize) -> Decimal {
        lookup(&self.windows, &size)
    }

    pub fn insulation_price(&self, level: Insulation) -> Decimal {
        lookup(&self.insulation, &level)
    }

    pub fn concrete_rate(&self, kind: ConcreteKind) -> Decimal {
        lookup(&self.concrete_per_sqft, &kind)
    }

    pub fn thickness_multiplier(&self, thickness: Inches) -> Decimal {
        lookup(&self.thickness_multipliers, &thickness.0)
    }
}

fn lookup<K: Ord>(table: &BTreeMap<K, Decimal>, key: &K) -> Decimal {
    table.get(key).copied().unwrap_or(Decimal::ZERO)
}

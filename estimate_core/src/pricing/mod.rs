//! # Pricing Engine
//!
//! A pure function from configuration to an itemized price. No state, no
//! I/O: the same inputs always give the same [`PricingBreakdown`].
//!
//! ## Formula
//!
//! ```text
//! sqft        = width × length
//! base        = sqft × base_rate × leg_multiplier
//! accessories = Σ door_price(kind, size) × qty
//!             + Σ window_price(size) × qty
//!             + insulation_price(level)
//!             + ventilation (if selected)
//!             + gutter_rate × perimeter (if selected)
//! concrete    = 0                                          (none)
//!             = sqft × concrete_rate(kind) × thickness_mult (otherwise)
//! labor       = sqft × labor_rate
//! delivery    = delivery_base + delivery_per_mile × miles
//! grand       = base + accessories + concrete + labor + delivery
//! deposit     = grand × deposit_fraction
//! ```
//!
//! All arithmetic is exact decimal. Each subtotal is rounded to the cent
//! before summing, so `grand_total` is exactly the sum of the parts.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::model::{AccessoriesConfig, BuildingConfig, ConcreteConfig};
//! use estimate_core::pricing::{compute_pricing, PricingRates};
//! use rust_decimal::Decimal;
//!
//! let pricing = compute_pricing(
//!     &BuildingConfig::default(),
//!     &AccessoriesConfig::default(),
//!     &ConcreteConfig::default(),
//!     &PricingRates::default(),
//!     Decimal::ZERO,
//! );
//! // 720 sq ft: 6120 base + 2520 labor + 500 delivery
//! assert_eq!(pricing.grand_total(), Decimal::from(9140));
//! ```

pub mod rates;

pub use rates::PricingRates;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::model::{AccessoriesConfig, BuildingConfig, ConcreteConfig, ConcreteKind};

/// Itemized estimate. Only the engine builds one; fields are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PricingBreakdown {
    base_price: Decimal,
    accessories_total: Decimal,
    concrete_total: Decimal,
    labor_total: Decimal,
    delivery_total: Decimal,
    grand_total: Decimal,
    deposit_amount: Decimal,
}

impl PricingBreakdown {
    /// All-zero breakdown, used before the first computation and after reset
    pub fn zero() -> Self {
        PricingBreakdown::default()
    }

    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    pub fn accessories_total(&self) -> Decimal {
        self.accessories_total
    }

    pub fn concrete_total(&self) -> Decimal {
        self.concrete_total
    }

    pub fn labor_total(&self) -> Decimal {
        self.labor_total
    }

    pub fn delivery_total(&self) -> Decimal {
        self.delivery_total
    }

    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }

    pub fn deposit_amount(&self) -> Decimal {
        self.deposit_amount
    }

    /// What is owed after the deposit
    pub fn balance_due(&self) -> Decimal {
        self.grand_total - self.deposit_amount
    }

    /// Labeled line items in display order
    pub fn line_items(&self) -> [(&'static str, Decimal); 7] {
        [
            ("Base Building", self.base_price),
            ("Accessories", self.accessories_total),
            ("Concrete", self.concrete_total),
            ("Labor", self.labor_total),
            ("Delivery", self.delivery_total),
            ("Grand Total", self.grand_total),
            ("Deposit Due", self.deposit_amount),
        ]
    }
}

fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Base shell price: footprint × base rate × leg multiplier
pub fn base_price(building: &BuildingConfig, rates: &PricingRates) -> Decimal {
    building.square_footage().as_decimal() * rates.base_per_sqft * rates.leg_multiplier(building.leg_type)
}

/// Doors, windows, insulation, ventilation and gutters
pub fn accessories_total(building: &BuildingConfig, accessories: &AccessoriesConfig, rates: &PricingRates) -> Decimal {
    let doors: Decimal = accessories
        .doors
        .values()
        .map(|door| rates.door_unit_price(door.kind, door.size) * Decimal::from(door.quantity))
        .sum();

    let windows: Decimal = accessories
        .windows
        .iter()
        .map(|window| rates.window_unit_price(window.size) * Decimal::from(window.quantity))
        .sum();

    let insulation = rates.insulation_price(accessories.insulation);

    let ventilation = if accessories.ventilation {
        rates.ventilation
    } else {
        Decimal::ZERO
    };

    let gutters = if accessories.gutters {
        rates.gutters_per_lin_ft * building.perimeter().as_decimal()
    } else {
        Decimal::ZERO
    };

    doors + windows + insulation + ventilation + gutters
}

/// Foundation price; zero when no concrete is ordered
pub fn concrete_total(building: &BuildingConfig, concrete: &ConcreteConfig, rates: &PricingRates) -> Decimal {
    if concrete.kind == ConcreteKind::None {
        return Decimal::ZERO;
    }
    building.square_footage().as_decimal()
        * rates.concrete_rate(concrete.kind)
        * rates.thickness_multiplier(concrete.thickness)
}

pub fn labor_total(building: &BuildingConfig, rates: &PricingRates) -> Decimal {
    building.square_footage().as_decimal() * rates.labor_per_sqft
}

pub fn delivery_total(rates: &PricingRates, delivery_miles: Decimal) -> Decimal {
    rates.delivery_base + rates.delivery_per_mile * delivery_miles.max(Decimal::ZERO)
}

/// Compute the full breakdown for a configuration.
///
/// # Arguments
///
/// * `building` - Shell dimensions and frame
/// * `accessories` - Doors, windows and options
/// * `concrete` - Foundation selection
/// * `rates` - Price table
/// * `delivery_miles` - Distance from the plant to the site (negative treated as zero)
pub fn compute_pricing(
    building: &BuildingConfig,
    accessories: &AccessoriesConfig,
    concrete: &ConcreteConfig,
    rates: &PricingRates,
    delivery_miles: Decimal,
) -> PricingBreakdown {
    let base_price = to_cents(base_price(building, rates));
    let accessories_total = to_cents(accessories_total(building, accessories, rates));
    let concrete_total = to_cents(concrete_total(building, concrete, rates));
    let labor_total = to_cents(labor_total(building, rates));
    let delivery_total = to_cents(delivery_total(rates, delivery_miles));

    let grand_total = base_price + accessories_total + concrete_total + labor_total + delivery_total;
    let deposit_amount = to_cents(grand_total * rates.deposit_fraction);

    PricingBreakdown {
        base_price,
        accessories_total,
        concrete_total,
        labor_total,
        delivery_total,
        grand_total,
        deposit_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        BuildingPatch, ConcretePatch, DoorConfig, DoorKind, Insulation, LegType, OpeningSize, WindowConfig,
    };
    use crate::units::{Feet, Inches};

    fn price(building: &BuildingConfig, accessories: &AccessoriesConfig, concrete: &ConcreteConfig) -> PricingBreakdown {
        compute_pricing(building, accessories, concrete, &PricingRates::default(), Decimal::ZERO)
    }

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_bare_building() {
        let pricing = price(
            &BuildingConfig::default(),
            &AccessoriesConfig::default(),
            &ConcreteConfig::default(),
        );
        // 720 sqft × 8.50 × 1.00
        assert_eq!(pricing.base_price(), d("6120"));
        assert_eq!(pricing.accessories_total(), Decimal::ZERO);
        assert_eq!(pricing.concrete_total(), Decimal::ZERO);
        assert_eq!(pricing.labor_total(), d("2520"));
        assert_eq!(pricing.delivery_total(), d("500"));
        assert_eq!(pricing.grand_total(), d("9140"));
        assert_eq!(pricing.deposit_amount(), d("3199.00"));
        assert_eq!(pricing.balance_due(), d("5941"));
    }

    #[test]
    fn test_slab_adds_exactly_concrete_total() {
        let building = BuildingConfig::default();
        let accessories = AccessoriesConfig::default();
        let none = price(&building, &accessories, &ConcreteConfig::default());

        let mut slab = ConcreteConfig::default();
        slab.apply(ConcretePatch {
            kind: Some(ConcreteKind::Slab),
            ..Default::default()
        });
        let with_slab = price(&building, &accessories, &slab);

        // 720 × 6.50 × 1.00
        assert_eq!(with_slab.concrete_total(), d("4680"));
        assert_eq!(with_slab.grand_total() - none.grand_total(), d("4680"));
        assert_eq!(with_slab.deposit_amount(), d("4837.00"));
    }

    #[test]
    fn test_thickness_and_turnkey() {
        let concrete = ConcreteConfig {
            kind: ConcreteKind::Turnkey,
            existing_pad: false,
            thickness: Inches(6),
        };
        let pricing = price(&BuildingConfig::default(), &AccessoriesConfig::default(), &concrete);
        // 720 × 8.75 × 1.30 = 8190
        assert_eq!(pricing.concrete_total(), d("8190"));
    }

    #[test]
    fn test_piers_unmapped_price_zero() {
        let concrete = ConcreteConfig {
            kind: ConcreteKind::Piers,
            ..Default::default()
        };
        let pricing = price(&BuildingConfig::default(), &AccessoriesConfig::default(), &concrete);
        assert_eq!(pricing.concrete_total(), Decimal::ZERO);
    }

    #[test]
    fn test_certified_multiplier() {
        let mut building = BuildingConfig::default();
        building.apply(BuildingPatch {
            leg_type: Some(LegType::Certified),
            ..Default::default()
        });
        let pricing = price(&building, &AccessoriesConfig::default(), &ConcreteConfig::default());
        // 6120 × 1.15
        assert_eq!(pricing.base_price(), d("7038"));
    }

    #[test]
    fn test_doors_and_windows() {
        let mut accessories = AccessoriesConfig::default();
        let roll_up = DoorConfig::roll_up(OpeningSize::new(10, 10)).with_quantity(2);
        let walk = DoorConfig::walk(OpeningSize::new(3, 7));
        let wrong_kind = DoorConfig::new(DoorKind::Walk, OpeningSize::new(12, 12));
        for door in [roll_up, walk, wrong_kind] {
            accessories.doors.insert(door.id, door);
        }
        accessories.windows.push(WindowConfig::new(OpeningSize::new(36, 48)));

        let total = accessories_total(&BuildingConfig::default(), &accessories, &PricingRates::default());
        // 2 × 1100 + 350 + 0 + 225
        assert_eq!(total, d("2775"));
    }

    #[test]
    fn test_options() {
        let accessories = AccessoriesConfig {
            insulation: Insulation::Full,
            ventilation: true,
            gutters: true,
            ..Default::default()
        };
        let total = accessories_total(&BuildingConfig::default(), &accessories, &PricingRates::default());
        // 2.50 + 150 + 4.50 × 108
        assert_eq!(total, d("638.50"));
    }

    #[test]
    fn test_delivery_distance() {
        let rates = PricingRates::default();
        assert_eq!(delivery_total(&rates, d("40")), d("640"));
        assert_eq!(delivery_total(&rates, d("-5")), d("500"));
    }

    #[test]
    fn test_grand_total_is_sum_of_parts() {
        let building = BuildingConfig {
            width: Feet(30),
            length: Feet(45),
            leg_type: LegType::Certified,
            ..Default::default()
        };
        let accessories = AccessoriesConfig {
            insulation: Insulation::Ceiling,
            gutters: true,
            ..Default::default()
        };
        let concrete = ConcreteConfig {
            kind: ConcreteKind::Slab,
            existing_pad: false,
            thickness: Inches(5),
        };
        let pricing = compute_pricing(&building, &accessories, &concrete, &PricingRates::default(), d("12.5"));
        let sum = pricing.base_price()
            + pricing.accessories_total()
            + pricing.concrete_total()
            + pricing.labor_total()
            + pricing.delivery_total();
        assert_eq!(pricing.grand_total(), sum);
        assert_eq!(pricing.deposit_amount(), to_cents(sum * d("0.35")));
    }

    #[test]
    fn test_deterministic() {
        let building = BuildingConfig::default();
        let accessories = AccessoriesConfig::default();
        let concrete = ConcreteConfig::default();
        let first = price(&building, &accessories, &concrete);
        let second = price(&building, &accessories, &concrete);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

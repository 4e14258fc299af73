//! # Estimate Store
//!
//! The single owner of an estimate in progress: customer, building,
//! accessories, colors, concrete, contract, the wizard position and the
//! current [`PricingBreakdown`].
//!
//! Mutations never fail. Out-of-range values are clamped or ignored and the
//! adjustment is logged; payloads from outside should go through
//! [`parse_patch`](crate::patch::parse_patch) first. Every mutation that can
//! change the price recomputes the breakdown before it returns, so
//! [`EstimateStore::pricing`] always matches the configuration.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::model::{BuildingPatch, ConcreteKind, ConcretePatch, LegType};
//! use estimate_core::settings::EstimatorSettings;
//! use estimate_core::store::EstimateStore;
//! use estimate_core::units::Feet;
//!
//! let mut store = EstimateStore::new(&EstimatorSettings::default());
//! store.set_building_config(BuildingPatch {
//!     width: Some(Feet(30)),
//!     leg_type: Some(LegType::Certified),
//!     ..Default::default()
//! });
//! store.set_concrete_config(ConcretePatch {
//!     kind: Some(ConcreteKind::Slab),
//!     ..Default::default()
//! });
//!
//! assert!(store.pricing().concrete_total() > rust_decimal::Decimal::ZERO);
//! ```

use std::collections::HashSet;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::errors::EstimateResult;
use crate::model::accessories::clamp_quantity;
use crate::model::{
    door_position_key, AccessoriesConfig, AccessoriesPatch, BuildingConfig, BuildingPatch, BuildingView, ColorConfig,
    ColorPatch, ConcreteConfig, ConcretePatch, ContractConfig, ContractPatch, CustomerInfo, CustomerPatch, DoorConfig,
    DoorId, DoorKind, DoorPatch, DoorPositions, WindowConfig, WindowId,
};
use crate::patch::Validate;
use crate::persistence::{EstimateSnapshot, SnapshotMeta, SnapshotStore};
use crate::pricing::{compute_pricing, PricingBreakdown, PricingRates};
use crate::settings::EstimatorSettings;
use crate::units::{Feet, SqFt};
use crate::wizard::WizardPosition;

/// Configuration, navigation and pricing state for one estimate.
#[derive(Debug, Clone)]
pub struct EstimateStore {
    rates: PricingRates,
    delivery_miles: Decimal,
    customer: CustomerInfo,
    building: BuildingConfig,
    accessories: AccessoriesConfig,
    door_positions: DoorPositions,
    colors: ColorConfig,
    concrete: ConcreteConfig,
    contract: ContractConfig,
    wizard: WizardPosition,
    pricing: PricingBreakdown,
}

impl EstimateStore {
    /// New store with default configuration, priced with the settings' rates.
    pub fn new(settings: &EstimatorSettings) -> Self {
        EstimateStore::with_rates(settings.rates.clone(), settings.delivery_miles)
    }

    pub fn with_rates(rates: PricingRates, delivery_miles: Decimal) -> Self {
        EstimateStore {
            rates,
            delivery_miles: delivery_miles.max(Decimal::ZERO),
            customer: CustomerInfo::default(),
            building: BuildingConfig::default(),
            accessories: AccessoriesConfig::default(),
            door_positions: DoorPositions::new(),
            colors: ColorConfig::default(),
            concrete: ConcreteConfig::default(),
            contract: ContractConfig::default(),
            wizard: WizardPosition::default(),
            pricing: PricingBreakdown::zero(),
        }
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn rates(&self) -> &PricingRates {
        &self.rates
    }

    pub fn delivery_miles(&self) -> Decimal {
        self.delivery_miles
    }

    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    pub fn building(&self) -> &BuildingConfig {
        &self.building
    }

    pub fn accessories(&self) -> &AccessoriesConfig {
        &self.accessories
    }

    pub fn door_positions(&self) -> &DoorPositions {
        &self.door_positions
    }

    pub fn colors(&self) -> &ColorConfig {
        &self.colors
    }

    pub fn concrete(&self) -> &ConcreteConfig {
        &self.concrete
    }

    pub fn contract(&self) -> &ContractConfig {
        &self.contract
    }

    pub fn pricing(&self) -> &PricingBreakdown {
        &self.pricing
    }

    pub fn wizard(&self) -> &WizardPosition {
        &self.wizard
    }

    /// Current wizard step (1-based)
    pub fn step(&self) -> u8 {
        self.wizard.step.current()
    }

    /// Current contract section (1-based)
    pub fn contract_section(&self) -> u8 {
        self.wizard.contract_section.current()
    }

    pub fn square_footage(&self) -> SqFt {
        self.building.square_footage()
    }

    /// Remembered placement of a door as seen from `view`
    pub fn door_position(&self, door_id: &DoorId, view: BuildingView) -> Option<f64> {
        self.door_positions.get(&door_position_key(door_id, view)).copied()
    }

    /// The persisted subset of the current state.
    pub fn snapshot(&self) -> EstimateSnapshot {
        EstimateSnapshot {
            meta: SnapshotMeta::now(),
            customer: self.customer.clone(),
            building: self.building.clone(),
            accessories: self.accessories.clone(),
            door_positions: self.door_positions.clone(),
            colors: self.colors.clone(),
            concrete: self.concrete.clone(),
            contract: self.contract.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn advance_step(&mut self) {
        if self.wizard.step.advance() {
            debug!(step = self.step(), "Advanced wizard step");
            self.calculate_pricing();
        } else {
            debug!(step = self.step(), "Already at last step");
        }
    }

    pub fn retreat_step(&mut self) {
        if !self.wizard.step.retreat() {
            debug!("Already at first step");
        }
    }

    /// Jump to `step`. Out-of-range targets are ignored.
    pub fn go_to_step(&mut self, step: u8) {
        if self.wizard.step.go_to(step) {
            debug!(step, "Jumped to wizard step");
            self.calculate_pricing();
        } else {
            debug!(step, "Ignoring out-of-range step");
        }
    }

    pub fn advance_contract_section(&mut self) {
        if !self.wizard.contract_section.advance() {
            debug!("Already at last contract section");
        }
    }

    pub fn retreat_contract_section(&mut self) {
        if !self.wizard.contract_section.retreat() {
            debug!("Already at first contract section");
        }
    }

    // ------------------------------------------------------------------
    // Entity setters
    // ------------------------------------------------------------------

    pub fn set_customer_info(&mut self, patch: CustomerPatch) {
        self.customer.apply(patch);
    }

    /// Merge building changes and reprice.
    ///
    /// Dimensions outside the allowed sets are skipped. Lowering the height
    /// is accepted even when existing roll-up doors no longer fit; those
    /// are reported by [`door_clearance_conflicts`](Self::door_clearance_conflicts).
    pub fn set_building_config(&mut self, patch: BuildingPatch) {
        let skipped = self.building.apply(patch);
        if !skipped.is_empty() {
            warn!(fields = ?skipped, "Skipped building dimensions outside the allowed sizes");
        }

        let conflicts = self.door_clearance_conflicts();
        if !conflicts.is_empty() {
            warn!(
                count = conflicts.len(),
                max_height = self.building.max_roll_up_door_height().0,
                "Roll-up doors exceed the building's door clearance"
            );
        }
        self.calculate_pricing();
    }

    /// Merge accessory changes and reprice. Door and window lists, when
    /// given, replace the current ones.
    pub fn set_accessories(&mut self, patch: AccessoriesPatch) {
        if let Some(doors) = patch.doors {
            self.accessories.doors = rebuild_doors(doors, self.building.max_roll_up_door_height());
            retain_known_positions(&mut self.door_positions, &self.accessories.doors);
        }
        if let Some(windows) = patch.windows {
            self.accessories.windows = rebuild_windows(windows);
        }
        if let Some(insulation) = patch.insulation {
            self.accessories.insulation = insulation;
        }
        if let Some(ventilation) = patch.ventilation {
            self.accessories.ventilation = ventilation;
        }
        if let Some(gutters) = patch.gutters {
            self.accessories.gutters = gutters;
        }
        self.calculate_pricing();
    }

    pub fn set_colors(&mut self, patch: ColorPatch) {
        self.colors.apply(patch);
    }

    pub fn set_concrete_config(&mut self, patch: ConcretePatch) {
        self.concrete.apply(patch);
        self.calculate_pricing();
    }

    pub fn set_contract_data(&mut self, patch: ContractPatch) {
        self.contract.apply(patch);
    }

    /// Remember where a door sits when seen from `view`. Not priced.
    pub fn set_door_position(&mut self, door_id: DoorId, view: BuildingView, position: f64) {
        if !position.is_finite() {
            warn!(door_id = %door_id, "Ignoring non-finite door position");
            return;
        }
        self.door_positions.insert(door_position_key(&door_id, view), position);
    }

    // ------------------------------------------------------------------
    // Doors and windows
    // ------------------------------------------------------------------

    /// Add a door. A door whose id is already present is ignored.
    ///
    /// A roll-up door taller than the building's clearance keeps its
    /// catalogue size (and price); only its opening height is lowered.
    pub fn add_door(&mut self, mut door: DoorConfig) {
        if self.accessories.doors.contains_key(&door.id) {
            warn!(door_id = %door.id, "Door id already present, ignoring add");
            return;
        }
        clamp_door(&mut door, self.building.max_roll_up_door_height());
        debug!(door_id = %door.id, kind = ?door.kind, size = %door.size, "Added door");
        self.accessories.doors.insert(door.id, door);
        self.calculate_pricing();
    }

    pub fn remove_door(&mut self, door_id: &DoorId) {
        if self.accessories.doors.shift_remove(door_id).is_none() {
            debug!(door_id = %door_id, "No such door to remove");
            return;
        }
        for view in BuildingView::ALL {
            self.door_positions.remove(&door_position_key(door_id, view));
        }
        self.calculate_pricing();
    }

    /// Merge changes into an existing door. The same clamps as
    /// [`add_door`](Self::add_door) apply afterwards.
    pub fn update_door(&mut self, door_id: &DoorId, patch: DoorPatch) {
        let max_height = self.building.max_roll_up_door_height();
        match self.accessories.doors.get_mut(door_id) {
            Some(door) => {
                door.apply(patch);
                clamp_door(door, max_height);
            }
            None => {
                debug!(door_id = %door_id, "No such door to update");
                return;
            }
        }
        self.calculate_pricing();
    }

    /// Add a window. A window whose id is already present is ignored.
    pub fn add_window(&mut self, mut window: WindowConfig) {
        if self.accessories.window(&window.id).is_some() {
            warn!(window_id = %window.id, "Window id already present, ignoring add");
            return;
        }
        window.quantity = clamp_quantity(window.quantity);
        self.accessories.windows.push(window);
        self.calculate_pricing();
    }

    pub fn remove_window(&mut self, window_id: &WindowId) {
        let before = self.accessories.windows.len();
        self.accessories.windows.retain(|w| w.id != *window_id);
        if self.accessories.windows.len() == before {
            debug!(window_id = %window_id, "No such window to remove");
            return;
        }
        self.calculate_pricing();
    }

    /// Roll-up doors whose opening is taller than the building currently allows.
    pub fn door_clearance_conflicts(&self) -> Vec<DoorId> {
        let max_height = self.building.max_roll_up_door_height();
        self.accessories
            .roll_up_doors()
            .filter(|door| door.effective_height() > max_height)
            .map(|door| door.id)
            .collect()
    }

    // ------------------------------------------------------------------
    // Pricing and lifecycle
    // ------------------------------------------------------------------

    /// Recompute the breakdown from the current configuration.
    pub fn calculate_pricing(&mut self) {
        self.pricing = compute_pricing(
            &self.building,
            &self.accessories,
            &self.concrete,
            &self.rates,
            self.delivery_miles,
        );
    }

    /// Back to a blank estimate. Rates and delivery distance are kept.
    pub fn reset_estimate(&mut self) {
        *self = EstimateStore::with_rates(self.rates.clone(), self.delivery_miles);
        info!("Estimate reset");
    }

    /// Restore a saved estimate from `adapter`.
    ///
    /// Returns `Ok(false)` when nothing was stored. A snapshot with
    /// dimensions or a thickness outside the allowed sets is rejected with
    /// `InvalidInput`. On error the store is left exactly as it was.
    ///
    /// Loaded doors and windows go through the same normalization as
    /// [`set_accessories`](Self::set_accessories): doors are re-keyed by
    /// their own id, duplicates dropped and quantities clamped.
    pub fn load_estimate(&mut self, adapter: &impl SnapshotStore) -> EstimateResult<bool> {
        let snapshot = match adapter.load().and_then(|loaded| {
            if let Some(snapshot) = &loaded {
                snapshot.validate()?;
            }
            Ok(loaded)
        }) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!("No saved estimate");
                return Ok(false);
            }
            Err(e) => {
                warn!(error = %e, "Failed to load estimate");
                return Err(e);
            }
        };

        let mut accessories = snapshot.accessories;
        accessories.doors = rebuild_doors(
            accessories.doors.into_values(),
            snapshot.building.max_roll_up_door_height(),
        );
        accessories.windows = rebuild_windows(accessories.windows);
        let mut door_positions = snapshot.door_positions;
        retain_known_positions(&mut door_positions, &accessories.doors);

        self.customer = snapshot.customer;
        self.building = snapshot.building;
        self.accessories = accessories;
        self.door_positions = door_positions;
        self.colors = snapshot.colors;
        self.concrete = snapshot.concrete;
        self.contract = snapshot.contract;
        self.wizard = WizardPosition::default();
        self.calculate_pricing();

        info!(
            version = %snapshot.meta.version,
            saved_at = %snapshot.meta.saved_at,
            doors = self.accessories.doors.len(),
            "Loaded estimate"
        );
        Ok(true)
    }

    /// Write the current configuration to `adapter`.
    pub fn save_estimate(&self, adapter: &mut impl SnapshotStore) -> EstimateResult<()> {
        match adapter.save(&self.snapshot()) {
            Ok(()) => {
                info!("Saved estimate");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to save estimate");
                Err(e)
            }
        }
    }
}

impl Default for EstimateStore {
    fn default() -> Self {
        EstimateStore::new(&EstimatorSettings::default())
    }
}

/// Clamp quantity and, for roll-up doors, the opening height.
///
/// `size` is the price-table key and is never rewritten; a roll-up door
/// that is too tall gets an explicit `height_ft` at the clearance instead.
fn clamp_door(door: &mut DoorConfig, max_height: Feet) {
    let quantity = clamp_quantity(door.quantity);
    if quantity != door.quantity {
        warn!(door_id = %door.id, requested = door.quantity, clamped = quantity, "Door quantity clamped");
        door.quantity = quantity;
    }

    if door.kind != DoorKind::RollUp {
        return;
    }
    let height = door.effective_height();
    if height > max_height {
        warn!(
            door_id = %door.id,
            size = %door.size,
            requested = height.0,
            clamped = max_height.0,
            "Roll-up door opening lowered to building clearance"
        );
        door.height_ft = Some(max_height);
    }
}

/// Key doors by their own id, dropping repeats and clamping each one.
fn rebuild_doors(doors: impl IntoIterator<Item = DoorConfig>, max_height: Feet) -> IndexMap<DoorId, DoorConfig> {
    let mut rebuilt = IndexMap::new();
    for mut door in doors {
        if rebuilt.contains_key(&door.id) {
            warn!(door_id = %door.id, "Dropping door with duplicate id");
            continue;
        }
        clamp_door(&mut door, max_height);
        rebuilt.insert(door.id, door);
    }
    rebuilt
}

fn rebuild_windows(windows: Vec<WindowConfig>) -> Vec<WindowConfig> {
    let mut seen = HashSet::new();
    windows
        .into_iter()
        .filter(|w| {
            let fresh = seen.insert(w.id);
            if !fresh {
                warn!(window_id = %w.id, "Dropping window with duplicate id");
            }
            fresh
        })
        .map(|mut w| {
            w.quantity = clamp_quantity(w.quantity);
            w
        })
        .collect()
}

/// Forget placements of doors that are no longer on the order.
fn retain_known_positions(positions: &mut DoorPositions, doors: &IndexMap<DoorId, DoorConfig>) {
    let known: HashSet<String> = doors.keys().map(|id| id.to_string()).collect();
    positions.retain(|key, _| {
        key.rsplit_once('-')
            .map(|(id, _view)| known.contains(id))
            .unwrap_or(false)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EstimateError;
    use crate::model::{ConcreteKind, Insulation, LegType, OpeningSize, Wall};
    use crate::persistence::MemorySnapshotStore;
    use crate::wizard::{CONTRACT_SECTION_COUNT, STEP_COUNT};
    use proptest::prelude::*;

    fn store() -> EstimateStore {
        EstimateStore::default()
    }

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    struct FailingStore;

    impl SnapshotStore for FailingStore {
        fn load(&self) -> EstimateResult<Option<EstimateSnapshot>> {
            Err(EstimateError::file_error("read", "broken.est", "disk on fire"))
        }

        fn save(&mut self, _snapshot: &EstimateSnapshot) -> EstimateResult<()> {
            Err(EstimateError::file_error("write", "broken.est", "disk on fire"))
        }
    }

    #[test]
    fn test_initial_state() {
        let store = store();
        assert_eq!(store.step(), 1);
        assert_eq!(store.contract_section(), 1);
        assert_eq!(store.building(), &BuildingConfig::default());
        assert!(store.accessories().doors.is_empty());
        assert_eq!(store.pricing(), &PricingBreakdown::zero());
    }

    #[test]
    fn test_bare_building_pricing() {
        let mut store = store();
        store.calculate_pricing();
        assert_eq!(store.pricing().grand_total(), d("9140"));
        assert_eq!(store.pricing().deposit_amount(), d("3199.00"));
    }

    #[test]
    fn test_slab_pricing() {
        let mut store = store();
        store.set_concrete_config(ConcretePatch {
            kind: Some(ConcreteKind::Slab),
            ..Default::default()
        });
        assert_eq!(store.pricing().concrete_total(), d("4680"));
        assert_eq!(store.pricing().grand_total(), d("13820"));
    }

    #[test]
    fn test_calculate_pricing_idempotent() {
        let mut store = store();
        store.set_accessories(AccessoriesPatch {
            insulation: Some(Insulation::Ceiling),
            gutters: Some(true),
            ..Default::default()
        });
        let first = store.pricing().clone();
        store.calculate_pricing();
        assert_eq!(store.pricing(), &first);
    }

    #[test]
    fn test_navigation_bounds() {
        let mut store = store();
        store.retreat_step();
        assert_eq!(store.step(), 1);
        for _ in 0..10 {
            store.advance_step();
        }
        assert_eq!(store.step(), STEP_COUNT);
        store.go_to_step(0);
        assert_eq!(store.step(), STEP_COUNT);
        store.go_to_step(3);
        assert_eq!(store.step(), 3);

        for _ in 0..10 {
            store.advance_contract_section();
        }
        assert_eq!(store.contract_section(), CONTRACT_SECTION_COUNT);
        store.retreat_contract_section();
        assert_eq!(store.contract_section(), CONTRACT_SECTION_COUNT - 1);
    }

    #[test]
    fn test_advance_step_reprices() {
        let mut store = store();
        assert_eq!(store.pricing().grand_total(), Decimal::ZERO);
        store.advance_step();
        assert_eq!(store.pricing().grand_total(), d("9140"));
    }

    #[test]
    fn test_mapped_roll_up_door_raises_accessories() {
        let mut store = store();
        store.calculate_pricing();
        let before = store.pricing().accessories_total();

        store.add_door(DoorConfig::roll_up(OpeningSize::new(8, 8)).with_quantity(2));
        assert_eq!(store.pricing().accessories_total() - before, d("1700"));
    }

    #[test]
    fn test_tall_roll_up_door_keeps_catalogue_price() {
        // 10' eave leaves 8' of clearance; a 10x10 door still prices as 10x10
        let mut store = store();
        store.calculate_pricing();
        let before = store.pricing().accessories_total();

        let door = DoorConfig::roll_up(OpeningSize::new(10, 10));
        let id = door.id;
        store.add_door(door);

        let stored = store.accessories().door(&id).unwrap();
        assert_eq!(stored.size, OpeningSize::new(10, 10));
        assert_eq!(stored.effective_height(), Feet(8));
        assert_eq!(store.pricing().accessories_total() - before, d("1100"));
        assert!(store.door_clearance_conflicts().is_empty());
    }

    #[test]
    fn test_unmapped_roll_up_door_prices_zero() {
        let mut store = store();
        store.calculate_pricing();
        let before = store.pricing().clone();
        store.add_door(DoorConfig::roll_up(OpeningSize::new(3, 7)));
        assert_eq!(store.accessories().roll_up_doors().count(), 1);
        assert_eq!(store.pricing(), &before);
    }

    #[test]
    fn test_roll_up_height_clamped_on_add() {
        let mut store = store();
        let mut door = DoorConfig::roll_up(OpeningSize::new(10, 10));
        door.height_ft = Some(Feet(12));
        let id = door.id;
        store.add_door(door);

        let stored = store.accessories().door(&id).unwrap();
        assert_eq!(stored.size, OpeningSize::new(10, 10));
        assert_eq!(stored.height_ft, Some(Feet(8)));
        assert!(store.door_clearance_conflicts().is_empty());

        store.update_door(
            &id,
            DoorPatch {
                size: Some(OpeningSize::new(12, 12)),
                height_ft: Some(Feet(12)),
                ..Default::default()
            },
        );
        let stored = store.accessories().door(&id).unwrap();
        assert_eq!(stored.size, OpeningSize::new(12, 12));
        assert_eq!(stored.height_ft, Some(Feet(8)));
        assert_eq!(store.pricing().accessories_total(), d("1450"));
    }

    #[test]
    fn test_walk_door_not_height_clamped() {
        let mut store = store();
        store.set_building_config(BuildingPatch {
            height: Some(Feet(8)),
            ..Default::default()
        });
        let door = DoorConfig::walk(OpeningSize::new(3, 7));
        let id = door.id;
        store.add_door(door);
        assert_eq!(store.accessories().door(&id).unwrap().size, OpeningSize::new(3, 7));
    }

    #[test]
    fn test_duplicate_door_ignored() {
        let mut store = store();
        let door = DoorConfig::walk(OpeningSize::new(3, 7));
        store.add_door(door.clone());
        store.add_door(door.with_wall(Wall::Back));
        assert_eq!(store.accessories().doors.len(), 1);
        assert_eq!(store.accessories().walk_doors().next().unwrap().wall, Wall::Front);
    }

    #[test]
    fn test_quantity_clamped() {
        let mut store = store();
        let door = DoorConfig::walk(OpeningSize::new(3, 7)).with_quantity(25);
        let id = door.id;
        store.add_door(door);
        assert_eq!(store.accessories().door(&id).unwrap().quantity, 10);

        store.update_door(&id, DoorPatch::quantity(0));
        assert_eq!(store.accessories().door(&id).unwrap().quantity, 1);
    }

    #[test]
    fn test_update_door_changes_kind() {
        let mut store = store();
        let door = DoorConfig::walk(OpeningSize::new(3, 7));
        let id = door.id;
        store.add_door(door);
        store.update_door(
            &id,
            DoorPatch {
                kind: Some(DoorKind::RollUp),
                size: Some(OpeningSize::new(8, 8)),
                ..Default::default()
            },
        );
        assert_eq!(store.accessories().walk_doors().count(), 0);
        assert_eq!(store.accessories().roll_up_doors().count(), 1);
        assert_eq!(store.pricing().accessories_total(), d("850"));
    }

    #[test]
    fn test_lowering_height_flags_conflicts() {
        let mut store = store();
        store.set_building_config(BuildingPatch {
            height: Some(Feet(14)),
            ..Default::default()
        });
        let door = DoorConfig::roll_up(OpeningSize::new(12, 12));
        let id = door.id;
        store.add_door(door);
        assert!(store.door_clearance_conflicts().is_empty());

        store.set_building_config(BuildingPatch {
            height: Some(Feet(10)),
            ..Default::default()
        });
        assert_eq!(store.building().height, Feet(10));
        assert_eq!(store.door_clearance_conflicts(), vec![id]);
        // Not clamped retroactively
        assert_eq!(store.accessories().door(&id).unwrap().size, OpeningSize::new(12, 12));
    }

    #[test]
    fn test_disallowed_dimension_skipped() {
        let mut store = store();
        store.set_building_config(BuildingPatch {
            width: Some(Feet(13)),
            leg_type: Some(LegType::Certified),
            ..Default::default()
        });
        assert_eq!(store.building().width, Feet(24));
        assert_eq!(store.building().leg_type, LegType::Certified);
        assert_eq!(store.pricing().base_price(), d("7038"));
    }

    #[test]
    fn test_set_accessories_replaces_lists() {
        let mut store = store();
        store.add_door(DoorConfig::walk(OpeningSize::new(3, 7)));
        let keep = DoorConfig::walk(OpeningSize::new(4, 7));
        store.set_accessories(AccessoriesPatch {
            doors: Some(vec![keep.clone(), keep.clone()]),
            windows: Some(vec![WindowConfig::new(OpeningSize::new(30, 36))]),
            ..Default::default()
        });
        assert_eq!(store.accessories().doors.len(), 1);
        assert!(store.accessories().door(&keep.id).is_some());
        assert_eq!(store.pricing().accessories_total(), d("575"));
    }

    #[test]
    fn test_windows_crud() {
        let mut store = store();
        let window = WindowConfig::new(OpeningSize::new(36, 48));
        let id = window.id;
        store.add_window(window.clone());
        store.add_window(window);
        assert_eq!(store.accessories().windows.len(), 1);
        assert_eq!(store.pricing().accessories_total(), d("225"));

        store.remove_window(&id);
        assert!(store.accessories().windows.is_empty());
        assert_eq!(store.pricing().accessories_total(), Decimal::ZERO);
    }

    #[test]
    fn test_door_positions() {
        let mut store = store();
        let door = DoorConfig::walk(OpeningSize::new(3, 7));
        let id = door.id;
        store.add_door(door);
        store.set_door_position(id, BuildingView::Left, 6.5);
        assert_eq!(store.door_position(&id, BuildingView::Left), Some(6.5));
        assert_eq!(store.door_position(&id, BuildingView::Front), None);

        store.set_door_position(id, BuildingView::Front, f64::NAN);
        assert_eq!(store.door_position(&id, BuildingView::Front), None);

        store.remove_door(&id);
        assert!(store.door_positions().is_empty());
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut store = store();
        store.calculate_pricing();
        let before = store.pricing().clone();
        store.remove_door(&DoorId::new());
        store.update_door(&DoorId::new(), DoorPatch::quantity(3));
        store.remove_window(&WindowId::new());
        assert_eq!(store.pricing(), &before);
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut store = store();
        store.set_customer_info(CustomerPatch {
            name: Some("Dana".to_string()),
            ..Default::default()
        });
        store.add_door(DoorConfig::walk(OpeningSize::new(3, 7)));
        store.set_colors(ColorPatch {
            roof: Some("#8B0000".to_string()),
            ..Default::default()
        });
        store.set_contract_data(ContractPatch {
            agreed_to_terms: Some(true),
            ..Default::default()
        });
        store.go_to_step(5);
        store.advance_contract_section();

        store.reset_estimate();

        let fresh = EstimateStore::default();
        assert_eq!(store.customer(), fresh.customer());
        assert_eq!(store.accessories(), fresh.accessories());
        assert_eq!(store.colors(), fresh.colors());
        assert_eq!(store.contract(), fresh.contract());
        assert_eq!(store.step(), 1);
        assert_eq!(store.contract_section(), 1);
        assert_eq!(store.pricing(), &PricingBreakdown::zero());
    }

    #[test]
    fn test_save_and_load_through_memory_store() {
        let mut adapter = MemorySnapshotStore::new();
        let mut store = store();
        store.set_building_config(BuildingPatch {
            width: Some(Feet(30)),
            ..Default::default()
        });
        store.add_door(DoorConfig::roll_up(OpeningSize::new(8, 8)));
        store.go_to_step(4);
        store.save_estimate(&mut adapter).unwrap();

        let mut restored = EstimateStore::default();
        assert!(restored.load_estimate(&adapter).unwrap());
        assert_eq!(restored.building(), store.building());
        assert_eq!(restored.accessories(), store.accessories());
        assert_eq!(restored.pricing(), store.pricing());
        assert_eq!(restored.step(), 1);
    }

    #[test]
    fn test_load_from_empty_store() {
        let mut store = store();
        assert!(!store.load_estimate(&MemorySnapshotStore::new()).unwrap());
        assert_eq!(store.building(), &BuildingConfig::default());
    }

    #[test]
    fn test_failed_load_leaves_state_untouched() {
        let mut store = store();
        store.set_customer_info(CustomerPatch {
            name: Some("Kept".to_string()),
            ..Default::default()
        });
        let err = store.load_estimate(&FailingStore).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(store.customer().name, "Kept");

        let corrupt = MemorySnapshotStore::with_json("{");
        assert!(store.load_estimate(&corrupt).is_err());
        assert_eq!(store.customer().name, "Kept");
    }

    #[test]
    fn test_out_of_range_snapshot_rejected() {
        let mut saved = EstimateStore::default().snapshot();
        saved.building.width = Feet(100_000);
        saved.building.length = Feet(100_000);
        let mut adapter = MemorySnapshotStore::new();
        adapter.save(&saved).unwrap();

        let mut store = store();
        store.calculate_pricing();
        let err = store.load_estimate(&adapter).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(store.building(), &BuildingConfig::default());
        assert_eq!(store.pricing().grand_total(), d("9140"));

        let mut thick = EstimateStore::default().snapshot();
        thick.concrete.thickness = crate::units::Inches(40);
        adapter.save(&thick).unwrap();
        assert_eq!(store.load_estimate(&adapter).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_tampered_accessories_normalized_on_load() {
        let door = DoorConfig::walk(OpeningSize::new(3, 7)).with_quantity(5000);
        let door_id = door.id;
        let window = WindowConfig::new(OpeningSize::new(30, 36));

        let mut saved = EstimateStore::default().snapshot();
        // Map key disagrees with the door's own id
        saved.accessories.doors.insert(DoorId::new(), door);
        saved.accessories.windows = vec![window.clone(), window];
        let mut adapter = MemorySnapshotStore::new();
        adapter.save(&saved).unwrap();

        let mut store = store();
        assert!(store.load_estimate(&adapter).unwrap());

        let loaded = store.accessories().door(&door_id).unwrap();
        assert_eq!(loaded.quantity, 10);
        assert_eq!(store.accessories().windows.len(), 1);
        // 10 × 350 + 175
        assert_eq!(store.pricing().accessories_total(), d("3675"));

        store.remove_door(&door_id);
        assert!(store.accessories().doors.is_empty());
    }

    #[test]
    fn test_loaded_positions_of_missing_doors_dropped() {
        let door = DoorConfig::walk(OpeningSize::new(3, 7));
        let mut saved = EstimateStore::default().snapshot();
        saved
            .door_positions
            .insert(door_position_key(&door.id, BuildingView::Back), 4.0);
        saved.door_positions.insert(door_position_key(&DoorId::new(), BuildingView::Back), 9.0);
        saved.accessories.doors.insert(door.id, door.clone());
        let mut adapter = MemorySnapshotStore::new();
        adapter.save(&saved).unwrap();

        let mut store = store();
        store.load_estimate(&adapter).unwrap();
        assert_eq!(store.door_positions().len(), 1);
        assert_eq!(store.door_position(&door.id, BuildingView::Back), Some(4.0));
    }

    #[test]
    fn test_failed_save_is_reported() {
        let store = store();
        let err = store.save_estimate(&mut FailingStore).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    fn door_strategy() -> impl Strategy<Value = DoorConfig> {
        (any::<bool>(), 0usize..6, 1u32..=10).prop_map(|(roll_up, size_idx, quantity)| {
            let sizes = [(3, 7), (4, 7), (6, 7), (8, 8), (10, 10), (12, 12)];
            let (w, h) = sizes[size_idx];
            let kind = if roll_up { DoorKind::RollUp } else { DoorKind::Walk };
            DoorConfig::new(kind, OpeningSize::new(w, h)).with_quantity(quantity)
        })
    }

    proptest! {
        #[test]
        fn add_then_remove_restores_doors(existing in proptest::collection::vec(door_strategy(), 0..5), door in door_strategy()) {
            let mut store = store();
            for d in existing {
                store.add_door(d);
            }
            let walk_before: Vec<_> = store.accessories().walk_doors().cloned().collect();
            let roll_before: Vec<_> = store.accessories().roll_up_doors().cloned().collect();

            let id = door.id;
            store.add_door(door);
            store.remove_door(&id);

            let walk_after: Vec<_> = store.accessories().walk_doors().cloned().collect();
            let roll_after: Vec<_> = store.accessories().roll_up_doors().cloned().collect();
            prop_assert_eq!(walk_before, walk_after);
            prop_assert_eq!(roll_before, roll_after);
        }

        #[test]
        fn update_quantity_touches_only_quantity(doors in proptest::collection::vec(door_strategy(), 1..5), pick in any::<prop::sample::Index>(), quantity in 1u32..=10) {
            let mut store = store();
            for d in doors {
                store.add_door(d);
            }
            let before = store.accessories().doors.clone();
            let id = *pick.get(&before.keys().copied().collect::<Vec<_>>());

            store.update_door(&id, DoorPatch::quantity(quantity));

            for (door_id, door) in &store.accessories().doors {
                let mut expected = before[door_id].clone();
                if *door_id == id {
                    expected.quantity = quantity;
                }
                prop_assert_eq!(door, &expected);
            }
        }

        #[test]
        fn go_to_step_sets_only_in_range(target in any::<u8>()) {
            let mut store = store();
            store.go_to_step(2);
            store.go_to_step(target);
            if (1..=STEP_COUNT).contains(&target) {
                prop_assert_eq!(store.step(), target);
            } else {
                prop_assert_eq!(store.step(), 2);
            }
        }

        #[test]
        fn grand_total_always_sum_of_parts(width_idx in 0usize..15, length_idx in 0usize..23, doors in proptest::collection::vec(door_strategy(), 0..4)) {
            let mut store = store();
            store.set_building_config(BuildingPatch {
                width: Some(Feet(crate::model::building::WIDTH_OPTIONS[width_idx])),
                length: Some(Feet(crate::model::building::LENGTH_OPTIONS[length_idx])),
                ..Default::default()
            });
            for d in doors {
                store.add_door(d);
            }
            let p = store.pricing();
            prop_assert_eq!(
                p.grand_total(),
                p.base_price() + p.accessories_total() + p.concrete_total() + p.labor_total() + p.delivery_total()
            );
        }
    }
}

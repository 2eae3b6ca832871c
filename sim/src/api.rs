//! Public API for the simulation.
//!
//! [`WaterSim`] is the only thing a host needs: placement tools register and
//! remove cells and barriers, gameplay adds water, and the host calls
//! [`WaterSim::tick`] with its frame delta. Nothing runs unless the host
//! ticks, and the simulation never reads a clock or touches I/O.
//!
//! Defensive calls (unknown cells, bad edge indices, non-adjacent pairs)
//! return `false`/`0.0` instead of failing, since tools fire them every frame.

use crate::barriers::{BarrierKey, BarrierRegistry};
use crate::bridge::snapshot_to_flatbuffer;
use crate::cells::{CellRegistry, WaterCell};
use crate::config::{ConfigError, WaterConfig};
use crate::hex::{Edge, HexAddress};
use crate::soil::SoilType;
use crate::systems::*;
use crate::world::{collect_barriers, collect_cells, BarrierSnapshot, CellSnapshot, WaterSnapshot};
use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;

/// The water simulation container.
///
/// Owns the ECS world holding every registry, and the schedule that runs
/// the flow passes. Independent instances share nothing.
pub struct WaterSim {
    world: World,
    schedule: Schedule,
    time: f32,
}

impl WaterSim {
    /// Create an empty simulation with default soils and rates.
    pub fn new() -> Self {
        Self::with_config(WaterConfig::default())
    }

    /// Create an empty simulation with custom configuration.
    ///
    /// An invalid configuration is logged and replaced by the defaults.
    pub fn with_config(config: WaterConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                log::warn!("[WATER CONFIG] rejected ({}), using defaults", err);
                WaterConfig::default()
            }
        };

        let mut world = World::new();
        world.insert_resource(DeltaTime(0.0));
        world.insert_resource(Temperature(config.initial_temperature));
        world.insert_resource(SimTick(0));
        world.insert_resource(CellRegistry::new());
        world.insert_resource(BarrierRegistry::new());
        world.insert_resource(WaterBudget::default());
        world.insert_resource(config);

        // Every pass mutates the same registries, so they run strictly in order.
        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                evaporation_system,
                gravity_system,
                lateral_diffusion_system,
                oversaturation_relief_system,
                clamp_system,
                budget_rollup_system,
            )
                .chain(),
        );

        Self {
            world,
            schedule,
            time: 0.0,
        }
    }

    // Registries are inserted in `with_config` and the world is private, so
    // these lookups cannot miss.

    fn cells(&self) -> &CellRegistry {
        self.world.resource::<CellRegistry>()
    }

    fn cells_mut(&mut self) -> Mut<'_, CellRegistry> {
        self.world.resource_mut::<CellRegistry>()
    }

    fn barriers(&self) -> &BarrierRegistry {
        self.world.resource::<BarrierRegistry>()
    }

    fn barriers_mut(&mut self) -> Mut<'_, BarrierRegistry> {
        self.world.resource_mut::<BarrierRegistry>()
    }

    fn budget(&self) -> &WaterBudget {
        self.world.resource::<WaterBudget>()
    }

    // --- Cells -----------------------------------------------------------

    /// Register a cell with empty content.
    ///
    /// Returns `false` for desert (which is the absence of a cell) and for an
    /// address that already holds a cell; the existing cell is left as is.
    pub fn add_hex(&mut self, address: HexAddress, soil: SoilType) -> bool {
        let props = self.config().soils.lookup(soil);
        let added = self.cells_mut().insert(address, soil, props);
        if !added {
            log::trace!("[WATER] add_hex {} ({}) rejected", address, soil.name());
        }
        added
    }

    /// Unregister a cell, dropping its water and every barrier touching it.
    pub fn remove_hex(&mut self, address: HexAddress) -> bool {
        if self.cells_mut().remove(&address).is_none() {
            return false;
        }
        let dropped = self.barriers_mut().remove_referencing(&address);
        if dropped > 0 {
            log::trace!("[WATER] removed {} with {} barriers", address, dropped);
        }
        true
    }

    pub fn get_cell(&self, address: HexAddress) -> Option<WaterCell> {
        self.cells().get(&address).copied()
    }

    pub fn has_hex(&self, address: HexAddress) -> bool {
        self.cells().contains(&address)
    }

    pub fn hex_count(&self) -> usize {
        self.cells().len()
    }

    /// Pour water into a cell. Anything beyond capacity is discarded.
    ///
    /// Returns `false` without changing anything when there is no cell, the
    /// cell has no capacity, or `amount` is negative or not finite.
    pub fn add_water(&mut self, address: HexAddress, amount: f32) -> bool {
        if !amount.is_finite() || amount < 0.0 {
            log::trace!("[WATER] add_water {} rejected: bad amount {}", address, amount);
            return false;
        }
        let mut cells = self.cells_mut();
        match cells.get_mut(&address) {
            Some(cell) if cell.capacity > 0.0 => {
                cell.fill(amount);
                true
            }
            _ => {
                log::trace!("[WATER] add_water {} rejected: no cell", address);
                false
            }
        }
    }

    /// Saturation in `[0, 1]`, 0 when there is no cell.
    pub fn get_saturation(&self, address: HexAddress) -> f32 {
        self.cells().get(&address).map_or(0.0, WaterCell::saturation)
    }

    /// Water held, 0 when there is no cell.
    pub fn get_water_ml(&self, address: HexAddress) -> f32 {
        self.cells().get(&address).map_or(0.0, |cell| cell.content)
    }

    /// Every cell in address order.
    pub fn get_all_hexes(&self) -> Vec<CellSnapshot> {
        collect_cells(self.cells())
    }

    // --- Barriers --------------------------------------------------------

    fn insert_barrier(&mut self, key: BarrierKey) -> bool {
        if !key.is_anchored(self.cells()) {
            log::trace!("[WATER] barrier {:?} rejected: no owning cell", key);
            return false;
        }
        self.barriers_mut().insert(key);
        true
    }

    /// Block the edge between two adjacent addresses, in both directions.
    ///
    /// Works for lateral neighbors and for vertically stacked pairs in either
    /// order. Returns `true` if the edge is blocked afterwards.
    pub fn add_edge_barrier(&mut self, a: HexAddress, b: HexAddress) -> bool {
        match BarrierKey::between(a, b) {
            Some(key) => self.insert_barrier(key),
            None => {
                log::trace!("[WATER] barrier {} / {} rejected: not adjacent", a, b);
                false
            }
        }
    }

    /// Block one edge of a cell: 0-5 lateral, 6 the downward edge.
    pub fn add_barrier(&mut self, address: HexAddress, edge_index: u8) -> bool {
        match Edge::from_index(edge_index) {
            Some(edge) => self.insert_barrier(BarrierKey::for_edge(address, edge)),
            None => {
                log::trace!("[WATER] barrier {} rejected: edge index {}", address, edge_index);
                false
            }
        }
    }

    pub fn remove_edge_barrier(&mut self, a: HexAddress, b: HexAddress) -> bool {
        match BarrierKey::between(a, b) {
            Some(key) => self.barriers_mut().remove(&key),
            None => false,
        }
    }

    pub fn remove_barrier(&mut self, address: HexAddress, edge_index: u8) -> bool {
        match Edge::from_index(edge_index) {
            Some(edge) => self.barriers_mut().remove(&BarrierKey::for_edge(address, edge)),
            None => false,
        }
    }

    pub fn is_blocked(&self, a: HexAddress, b: HexAddress) -> bool {
        BarrierKey::between(a, b).is_some_and(|key| self.barriers().contains(&key))
    }

    pub fn is_edge_blocked(&self, address: HexAddress, edge_index: u8) -> bool {
        Edge::from_index(edge_index)
            .is_some_and(|edge| self.barriers().is_edge_blocked(address, edge))
    }

    /// Every barrier in edge order.
    pub fn get_all_edge_barriers(&self) -> Vec<BarrierSnapshot> {
        collect_barriers(self.barriers())
    }

    // --- Environment and configuration -----------------------------------

    /// Set the air temperature in Celsius. Non-finite values are ignored.
    pub fn set_temperature(&mut self, celsius: f32) {
        if !celsius.is_finite() {
            log::trace!("[WATER] temperature {} ignored", celsius);
            return;
        }
        self.world.resource_mut::<Temperature>().0 = celsius;
    }

    pub fn temperature(&self) -> f32 {
        self.world.resource::<Temperature>().0
    }

    pub fn config(&self) -> &WaterConfig {
        self.world.resource::<WaterConfig>()
    }

    /// Replace the configuration. Rates apply from the next tick; cells
    /// already placed keep their capacity and permeability.
    ///
    /// An invalid configuration is rejected and the current one kept.
    pub fn set_config(&mut self, config: WaterConfig) -> Result<(), ConfigError> {
        if let Err(err) = config.validate() {
            log::warn!("[WATER CONFIG] rejected: {}", err);
            return Err(err);
        }
        self.world.insert_resource(config);
        Ok(())
    }

    // --- Ticking ---------------------------------------------------------

    /// Advance the simulation by `dt` seconds.
    ///
    /// `dt <= 0` or a non-finite `dt` does nothing.
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            log::trace!("[WATER TICK] skipped, dt = {}", dt);
            return;
        }

        self.world.resource_mut::<DeltaTime>().0 = dt;
        self.world.resource_mut::<WaterBudget>().begin_tick();
        self.world.resource_mut::<SimTick>().increment();

        self.schedule.run(&mut self.world);

        self.time += dt;

        let budget = self.budget().current;
        log::debug!(
            "[WATER TICK] #{} dt={:.3} cells={} total={:.2} lost={:.3} moved={:.3}",
            self.current_tick(),
            dt,
            self.cells().len(),
            self.cells().total_water(),
            budget.losses(),
            budget.moved
        );
    }

    /// Number of ticks that actually ran.
    pub fn current_tick(&self) -> u64 {
        self.world.resource::<SimTick>().0
    }

    /// Sum of every accepted `dt`.
    pub fn current_time(&self) -> f32 {
        self.time
    }

    /// Losses and movement of the most recent tick.
    pub fn last_budget(&self) -> TickBudget {
        self.budget().current
    }

    /// Losses and movement since the simulation was created.
    pub fn total_budget(&self) -> TickBudget {
        self.budget().total
    }

    pub fn total_water(&self) -> f32 {
        self.cells().total_water()
    }

    // --- Snapshots -------------------------------------------------------

    pub fn snapshot(&self) -> WaterSnapshot {
        WaterSnapshot::from_world(&self.world, self.time)
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&self) -> String {
        self.snapshot().to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Flat `f32` buffer for overlays; see [`crate::bridge`] for the layout.
    pub fn overlay_buffer(&self) -> Vec<f32> {
        snapshot_to_flatbuffer(&self.snapshot())
    }

    /// Set a cell's content directly, ignoring capacity.
    ///
    /// The next tick relieves any excess.
    #[cfg(any(test, feature = "debug-tools"))]
    pub fn force_content(&mut self, address: HexAddress, amount: f32) -> bool {
        if !amount.is_finite() {
            return false;
        }
        match self.cells_mut().get_mut(&address) {
            Some(cell) => {
                cell.content = amount;
                true
            }
            None => false,
        }
    }
}

impl Default for WaterSim {
    fn default() -> Self {
        Self::new()
    }
}

//! Sparse registry of soil cells and the water they hold.

use crate::hex::HexAddress;
use crate::soil::{SoilProperties, SoilType};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Water state of one soil cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterCell {
    pub address: HexAddress,
    pub soil: SoilType,
    /// Fixed when the cell is placed.
    pub capacity: f32,
    /// Fixed when the cell is placed.
    pub permeability: f32,
    /// Current water volume, within `[0, capacity]` between ticks.
    pub content: f32,
}

impl WaterCell {
    pub fn new(address: HexAddress, soil: SoilType, props: SoilProperties) -> Self {
        Self {
            address,
            soil,
            capacity: props.capacity,
            permeability: props.permeability,
            content: 0.0,
        }
    }

    /// Fraction of capacity filled, 0 for zero-capacity cells.
    pub fn saturation(&self) -> f32 {
        if self.capacity <= 0.0 {
            0.0
        } else {
            self.content / self.capacity
        }
    }

    /// Room left before the cell is full.
    pub fn headroom(&self) -> f32 {
        (self.capacity - self.content).max(0.0)
    }

    /// Volume above capacity (only non-zero after forced injection).
    pub fn excess(&self) -> f32 {
        (self.content - self.capacity).max(0.0)
    }

    /// Add water up to capacity. Returns the amount actually absorbed.
    pub fn fill(&mut self, amount: f32) -> f32 {
        let absorbed = amount.min(self.headroom()).max(0.0);
        self.content += absorbed;
        absorbed
    }

    /// Remove up to `amount`. Returns the amount actually removed.
    pub fn drain(&mut self, amount: f32) -> f32 {
        let removed = amount.min(self.content).max(0.0);
        self.content -= removed;
        removed
    }
}

/// All registered cells, keyed by address.
///
/// Ordered so every pass visits cells in the same sequence, which keeps float
/// accumulation (and so the whole simulation) reproducible.
#[derive(Resource, Debug, Default, Clone)]
pub struct CellRegistry {
    cells: BTreeMap<HexAddress, WaterCell>,
}

impl CellRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new cell. Returns `false` if the address is taken or the
    /// soil has no capacity.
    pub fn insert(&mut self, address: HexAddress, soil: SoilType, props: SoilProperties) -> bool {
        if soil == SoilType::Desert || props.capacity <= 0.0 || self.cells.contains_key(&address) {
            return false;
        }
        self.cells.insert(address, WaterCell::new(address, soil, props));
        true
    }

    pub fn remove(&mut self, address: &HexAddress) -> Option<WaterCell> {
        self.cells.remove(address)
    }

    pub fn get(&self, address: &HexAddress) -> Option<&WaterCell> {
        self.cells.get(address)
    }

    pub(crate) fn get_mut(&mut self, address: &HexAddress) -> Option<&mut WaterCell> {
        self.cells.get_mut(address)
    }

    pub fn contains(&self, address: &HexAddress) -> bool {
        self.cells.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WaterCell> {
        self.cells.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut WaterCell> {
        self.cells.values_mut()
    }

    /// Addresses in ascending order.
    pub fn sorted_addresses(&self) -> Vec<HexAddress> {
        self.cells.keys().copied().collect()
    }

    /// Whether the cell at `address` has no cell directly above it.
    pub fn is_exposed(&self, address: &HexAddress) -> bool {
        !self.cells.contains_key(&address.above())
    }

    /// Sum of water held by every cell.
    pub fn total_water(&self) -> f32 {
        self.cells.values().map(|c| c.content).sum()
    }
}

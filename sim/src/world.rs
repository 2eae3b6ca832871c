//! Serializable views of the simulation state.
//!
//! Snapshots are what debug overlays, tooltips and tests consume; they never
//! hand out references into the live registries.

use crate::barriers::{BarrierKey, BarrierRegistry};
use crate::cells::{CellRegistry, WaterCell};
use crate::hex::{Edge, HexAddress};
use crate::soil::SoilType;
use crate::systems::{SimTick, Temperature, TickBudget, WaterBudget};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Snapshot of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub address: HexAddress,
    pub soil: SoilType,
    pub capacity: f32,
    pub content: f32,
    pub saturation: f32,
    /// No cell directly above, so it evaporates.
    pub exposed: bool,
}

impl CellSnapshot {
    pub fn from_cell(cell: &WaterCell, exposed: bool) -> Self {
        Self {
            address: cell.address,
            soil: cell.soil,
            capacity: cell.capacity,
            content: cell.content,
            saturation: cell.saturation(),
            exposed,
        }
    }
}

/// Snapshot of one blocked edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrierSnapshot {
    pub a: HexAddress,
    pub b: HexAddress,
    /// Edge index as seen from `a` (0-5 lateral, 6 = down to `b`).
    pub edge_index: u8,
}

impl BarrierSnapshot {
    pub fn from_key(key: &BarrierKey) -> Self {
        let (a, b) = key.endpoints();
        let edge_index = match key {
            BarrierKey::Vertical(_) => Edge::DOWN_INDEX,
            BarrierKey::Lateral(..) => a.shared_edge(&b).map_or(Edge::DOWN_INDEX, |d| d.index()),
        };
        Self { a, b, edge_index }
    }

    pub fn is_vertical(&self) -> bool {
        self.edge_index == Edge::DOWN_INDEX
    }
}

/// Complete water state snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaterSnapshot {
    /// Completed ticks.
    pub tick: u64,
    /// Sum of all accepted `dt` values.
    pub time: f32,
    pub temperature: f32,
    /// All cells, ordered by address.
    pub cells: Vec<CellSnapshot>,
    /// All barriers, ordered by edge.
    pub barriers: Vec<BarrierSnapshot>,
    pub total_water: f32,
    /// Losses and movement during the last tick.
    pub last_tick: TickBudget,
}

impl WaterSnapshot {
    /// Create a snapshot from the ECS world.
    pub fn from_world(world: &World, time: f32) -> Self {
        let tick = world.get_resource::<SimTick>().map_or(0, |t| t.0);
        let cells = world
            .get_resource::<CellRegistry>()
            .map(collect_cells)
            .unwrap_or_default();
        let barriers = world
            .get_resource::<BarrierRegistry>()
            .map(collect_barriers)
            .unwrap_or_default();
        let temperature = world
            .get_resource::<Temperature>()
            .copied()
            .unwrap_or_default()
            .0;
        let last_tick = world
            .get_resource::<WaterBudget>()
            .map(|b| b.current)
            .unwrap_or_default();
        let total_water = cells.iter().map(|c| c.content).sum();

        Self {
            tick,
            time,
            temperature,
            cells,
            barriers,
            total_water,
            last_tick,
        }
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Every cell in address order.
pub fn collect_cells(cells: &CellRegistry) -> Vec<CellSnapshot> {
    cells
        .sorted_addresses()
        .into_iter()
        .filter_map(|addr| {
            cells
                .get(&addr)
                .map(|c| CellSnapshot::from_cell(c, cells.is_exposed(&addr)))
        })
        .collect()
}

/// Every barrier in edge order.
pub fn collect_barriers(barriers: &BarrierRegistry) -> Vec<BarrierSnapshot> {
    barriers.sorted().iter().map(BarrierSnapshot::from_key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::HexDirection;

    #[test]
    fn test_barrier_snapshot_indices() {
        let a = HexAddress::new(0, 0, 0);
        let key = BarrierKey::between(a, a.neighbor(HexDirection::West)).unwrap();
        let lateral = BarrierSnapshot::from_key(&key);
        // The lower address comes first, so the edge is seen from the western cell.
        assert_eq!(lateral.a, a.neighbor(HexDirection::West));
        assert_eq!(lateral.edge_index, HexDirection::East.index());
        assert!(!lateral.is_vertical());

        let vertical = BarrierSnapshot::from_key(&BarrierKey::Vertical(a));
        assert_eq!(vertical.b, a.below());
        assert!(vertical.is_vertical());
    }

    #[test]
    fn test_snapshot_orders_cells() {
        let mut world = World::new();
        let mut cells = CellRegistry::new();
        for addr in [
            HexAddress::new(2, 0, 0),
            HexAddress::new(-1, 0, 0),
            HexAddress::new(0, 0, 1),
        ] {
            cells.insert(addr, SoilType::Loam, SoilType::Loam.default_properties());
        }
        world.insert_resource(cells);
        world.insert_resource(SimTick(3));

        let snapshot = WaterSnapshot::from_world(&world, 0.3);
        let addresses: Vec<HexAddress> = snapshot.cells.iter().map(|c| c.address).collect();
        let mut sorted = addresses.clone();
        sorted.sort();
        assert_eq!(addresses, sorted);
        assert_eq!(snapshot.tick, 3);
        assert!(snapshot.barriers.is_empty());
    }
}

//! Gravity pass: water settles down each column.
//!
//! A cell with an open downward edge pushes
//! `vertical_rate * gravity_bias * permeability * dt` toward `(q, r, y-1)`.
//! If that address has a cell the flow is limited by its headroom; if not,
//! the water drains into the ground and is gone. This is the dominant loss
//! path for any column without a barrier under its lowest cell.

use super::budget::WaterBudget;
use super::environment::DeltaTime;
use super::transfer::TransferPlan;
use crate::barriers::BarrierRegistry;
use crate::cells::CellRegistry;
use crate::config::WaterConfig;
use crate::hex::Edge;
use bevy_ecs::prelude::*;

pub fn gravity_system(
    dt: Res<DeltaTime>,
    config: Res<WaterConfig>,
    barriers: Res<BarrierRegistry>,
    mut cells: ResMut<CellRegistry>,
    mut budget: ResMut<WaterBudget>,
) {
    let rate = config.vertical_rate * config.gravity_bias * dt.0;
    if !(rate > 0.0) {
        return;
    }

    let mut plan = TransferPlan::new();
    for cell in cells.iter() {
        if cell.content <= 0.0 || barriers.is_edge_blocked(cell.address, Edge::Down) {
            continue;
        }
        let wanted = (rate * cell.permeability).min(cell.content);
        let below = cell.address.below();
        match cells.get(&below) {
            Some(target) => plan.send_to_cell(cell.address, below, wanted.min(target.headroom())),
            None => plan.send_to_sink(cell.address, wanted),
        }
    }
    if plan.is_empty() {
        return;
    }

    plan.bound(&cells);
    let applied = plan.apply(&mut cells);
    budget.current.drained_down += applied.sunk;
    budget.current.moved += applied.moved;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barriers::BarrierKey;
    use crate::hex::HexAddress;
    use crate::soil::SoilType;
    use crate::systems::{run_system, test_world};

    fn place(world: &mut World, addr: HexAddress, soil: SoilType, content: f32) {
        let mut cells = world.resource_mut::<CellRegistry>();
        cells.insert(addr, soil, soil.default_properties());
        cells.get_mut(&addr).unwrap().content = content;
    }

    #[test]
    fn test_bottom_cell_drains_into_ground() {
        let mut world = test_world(WaterConfig::default());
        let addr = HexAddress::new(0, 0, 0);
        place(&mut world, addr, SoilType::Loam, 200.0);

        run_system(&mut world, gravity_system);

        let left = world.resource::<CellRegistry>().get(&addr).unwrap().content;
        assert!(left < 200.0);
        let budget = world.resource::<WaterBudget>();
        assert!((budget.current.drained_down - (200.0 - left)).abs() < 1e-4);
    }

    #[test]
    fn test_downward_barrier_stops_drainage() {
        let mut world = test_world(WaterConfig::default());
        let addr = HexAddress::new(0, 0, 0);
        place(&mut world, addr, SoilType::Sand, 200.0);
        world
            .resource_mut::<BarrierRegistry>()
            .insert(BarrierKey::for_edge(addr, Edge::Down));

        run_system(&mut world, gravity_system);

        assert_eq!(world.resource::<CellRegistry>().get(&addr).unwrap().content, 200.0);
    }

    #[test]
    fn test_flow_into_lower_cell_respects_headroom() {
        let mut world = test_world(WaterConfig::default());
        let top = HexAddress::new(0, 0, 1);
        let bottom = top.below();
        place(&mut world, top, SoilType::Sand, 250.0);
        place(&mut world, bottom, SoilType::Clay, 549.0);
        world
            .resource_mut::<BarrierRegistry>()
            .insert(BarrierKey::for_edge(bottom, Edge::Down));

        run_system(&mut world, gravity_system);

        let cells = world.resource::<CellRegistry>();
        assert!((cells.get(&bottom).unwrap().content - 550.0).abs() < 1e-3);
        assert!((cells.get(&top).unwrap().content - 249.0).abs() < 1e-3);
    }

    #[test]
    fn test_permeable_soil_falls_faster() {
        let moved = |soil: SoilType| {
            let mut world = test_world(WaterConfig::default());
            let top = HexAddress::new(0, 0, 1);
            let bottom = top.below();
            place(&mut world, top, soil, 200.0);
            place(&mut world, bottom, SoilType::Clay, 0.0);
            world
                .resource_mut::<BarrierRegistry>()
                .insert(BarrierKey::for_edge(bottom, Edge::Down));
            run_system(&mut world, gravity_system);
            world.resource::<CellRegistry>().get(&bottom).unwrap().content
        };

        assert!(moved(SoilType::Sand) > moved(SoilType::Loam));
        assert!(moved(SoilType::Loam) > moved(SoilType::Clay));
    }
}

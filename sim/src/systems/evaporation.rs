//! Evaporation pass: exposed column tops lose water to the air.

use super::budget::WaterBudget;
use super::environment::{DeltaTime, Temperature};
use crate::cells::CellRegistry;
use crate::config::WaterConfig;
use crate::hex::HexAddress;
use bevy_ecs::prelude::*;

/// Subtracts `evaporation.rate(temperature) * dt` from every cell with no cell
/// directly above it. Covered cells never evaporate.
pub fn evaporation_system(
    dt: Res<DeltaTime>,
    temperature: Res<Temperature>,
    config: Res<WaterConfig>,
    mut cells: ResMut<CellRegistry>,
    mut budget: ResMut<WaterBudget>,
) {
    let amount = config.evaporation.rate(temperature.0) * dt.0;
    if !(amount > 0.0) {
        return;
    }

    let registry: &CellRegistry = &cells;
    let exposed: Vec<HexAddress> = registry
        .iter()
        .filter(|cell| cell.content > 0.0 && registry.is_exposed(&cell.address))
        .map(|cell| cell.address)
        .collect();

    let mut evaporated = 0.0;
    for address in exposed {
        if let Some(cell) = cells.get_mut(&address) {
            evaporated += cell.drain(amount);
        }
    }
    budget.current.evaporated += evaporated;
}

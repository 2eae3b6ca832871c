//! Lateral diffusion pass.
//!
//! Neighboring cells on the same layer equalise saturation: the wetter cell
//! sends `(sat_hi - sat_lo) * min(perm_a, perm_b) * lateral_rate * dt` to the
//! drier one, never more than would make their saturations cross. Open
//! lateral edges facing unregistered ground seep `lateral_sink_rate * dt`
//! each, which is why a lone cell dries out even with a barrier beneath it.

use super::budget::WaterBudget;
use super::environment::DeltaTime;
use super::transfer::TransferPlan;
use crate::barriers::BarrierRegistry;
use crate::cells::{CellRegistry, WaterCell};
use crate::config::WaterConfig;
use crate::hex::{Edge, HexDirection};
use bevy_ecs::prelude::*;

/// Volume that would bring two cells to equal saturation.
fn equalising_volume(high: &WaterCell, low: &WaterCell) -> f32 {
    let total_capacity = high.capacity + low.capacity;
    if total_capacity <= 0.0 {
        return 0.0;
    }
    let diff = high.saturation() - low.saturation();
    (diff * high.capacity * low.capacity / total_capacity).max(0.0)
}

pub fn lateral_diffusion_system(
    dt: Res<DeltaTime>,
    config: Res<WaterConfig>,
    barriers: Res<BarrierRegistry>,
    mut cells: ResMut<CellRegistry>,
    mut budget: ResMut<WaterBudget>,
) {
    let diffusion = config.lateral_rate * dt.0;
    let seepage = config.lateral_sink_rate * dt.0;
    if !(diffusion > 0.0) && !(seepage > 0.0) {
        return;
    }

    let mut plan = TransferPlan::new();
    let mut open_edges = 0usize;
    for cell in cells.iter() {
        for dir in HexDirection::ALL {
            if barriers.is_edge_blocked(cell.address, Edge::Lateral(dir)) {
                continue;
            }
            let neighbor_addr = cell.address.neighbor(dir);
            let Some(neighbor) = cells.get(&neighbor_addr) else {
                if cell.content > 0.0 && seepage > 0.0 {
                    plan.send_to_sink(cell.address, seepage);
                    open_edges += 1;
                }
                continue;
            };

            // Visit each pair once, from its lower address.
            if neighbor_addr < cell.address || diffusion <= 0.0 {
                continue;
            }
            let (high, low) = if cell.saturation() >= neighbor.saturation() {
                (cell, neighbor)
            } else {
                (neighbor, cell)
            };
            let diff = high.saturation() - low.saturation();
            if diff <= 0.0 {
                continue;
            }
            let amount = (diff * high.permeability.min(low.permeability) * diffusion)
                .min(equalising_volume(high, low))
                .min(high.content)
                .min(low.headroom());
            plan.send_to_cell(high.address, low.address, amount);
        }
    }
    if plan.is_empty() {
        return;
    }

    plan.bound(&cells);
    let applied = plan.apply(&mut cells);
    budget.current.seeped_lateral += applied.sunk;
    budget.current.moved += applied.moved;
    log::trace!(
        "[LATERAL] {} open desert edges, moved {:.3}, seeped {:.3}",
        open_edges,
        applied.moved,
        applied.sunk
    );
}

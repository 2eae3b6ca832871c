//! Oversaturation relief and the end-of-tick clamp.
//!
//! Normal passes never push a cell past capacity, so excess only appears after
//! forced injection. Relief routes that excess out through open lateral edges
//! first (into neighbor headroom or desert), then down, each outlet limited to
//! `oversaturation_multiplier * lateral_rate * dt`. Whatever is still left is
//! removed by the clamp.

use super::budget::WaterBudget;
use super::environment::DeltaTime;
use super::transfer::TransferPlan;
use crate::barriers::BarrierRegistry;
use crate::cells::CellRegistry;
use crate::config::WaterConfig;
use crate::hex::Edge;
use bevy_ecs::prelude::*;

/// Clamp residue below this is float drift and is not logged.
const DRIFT_EPSILON: f32 = 1e-3;

pub fn oversaturation_relief_system(
    dt: Res<DeltaTime>,
    config: Res<WaterConfig>,
    barriers: Res<BarrierRegistry>,
    mut cells: ResMut<CellRegistry>,
    mut budget: ResMut<WaterBudget>,
) {
    let outlet_limit = config.oversaturation_multiplier * config.lateral_rate * dt.0;
    if !(outlet_limit > 0.0) {
        return;
    }

    let mut plan = TransferPlan::new();
    for cell in cells.iter().filter(|c| c.excess() > 0.0) {
        let mut remaining = cell.excess();
        // Lateral outlets in canonical order, then the downward edge.
        for edge in Edge::ALL {
            if remaining <= 0.0 {
                break;
            }
            if barriers.is_edge_blocked(cell.address, edge) {
                continue;
            }
            let target = cell.address.across(edge);
            let amount = match cells.get(&target) {
                Some(neighbor) => {
                    let amount = outlet_limit.min(remaining).min(neighbor.headroom());
                    plan.send_to_cell(cell.address, target, amount);
                    amount
                }
                None => {
                    let amount = outlet_limit.min(remaining);
                    plan.send_to_sink(cell.address, amount);
                    amount
                }
            };
            remaining -= amount;
        }
    }
    if plan.is_empty() {
        return;
    }

    plan.bound(&cells);
    let applied = plan.apply(&mut cells);
    budget.current.relieved += applied.sunk;
    budget.current.moved += applied.moved;
    log::debug!(
        "[OVERSATURATION] relieved {:.3} into sinks, {:.3} into neighbors",
        applied.sunk,
        applied.moved
    );
}

/// Clamps every cell's content to `[0, capacity]`.
pub fn clamp_system(mut cells: ResMut<CellRegistry>, mut budget: ResMut<WaterBudget>) {
    let mut clamped = 0.0;
    for cell in cells.iter_mut() {
        let before = cell.content;
        let after = if before.is_finite() {
            before.clamp(0.0, cell.capacity)
        } else {
            0.0
        };
        if after != before {
            if before.is_finite() {
                clamped += before - after;
            }
            if (before - after).abs() > DRIFT_EPSILON || !before.is_finite() {
                log::debug!(
                    "[WATER CLAMP] {} clamped from {:.3} to {:.3}",
                    cell.address,
                    before,
                    after
                );
            }
            cell.content = after;
        }
    }
    budget.current.clamped += clamped;
}

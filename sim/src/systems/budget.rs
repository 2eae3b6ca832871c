//! Water accounting.
//!
//! Every pass records how much water it removed from the lattice and how much
//! it moved between cells, so conservation can be checked from outside:
//! `total_before - losses == total_after`.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Water removed or moved during one tick (or accumulated over many).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickBudget {
    /// Lost from exposed surfaces.
    pub evaporated: f32,
    /// Lost through open downward edges with nothing below.
    pub drained_down: f32,
    /// Lost through open lateral edges facing unregistered ground.
    pub seeped_lateral: f32,
    /// Excess pushed into sinks while relieving oversaturation.
    pub relieved: f32,
    /// Net amount removed by the end-of-tick clamp (negative if it added drift back).
    pub clamped: f32,
    /// Volume that moved between registered cells (not a loss).
    pub moved: f32,
}

impl TickBudget {
    /// Everything that left the lattice.
    pub fn losses(&self) -> f32 {
        self.evaporated + self.drained_down + self.seeped_lateral + self.relieved + self.clamped
    }

    pub fn accumulate(&mut self, other: &TickBudget) {
        self.evaporated += other.evaporated;
        self.drained_down += other.drained_down;
        self.seeped_lateral += other.seeped_lateral;
        self.relieved += other.relieved;
        self.clamped += other.clamped;
        self.moved += other.moved;
    }
}

/// Budget for the running tick plus the lifetime total.
#[derive(Resource, Debug, Clone, Default)]
pub struct WaterBudget {
    pub current: TickBudget,
    pub total: TickBudget,
}

impl WaterBudget {
    /// Reset the per-tick counters before the passes run.
    pub fn begin_tick(&mut self) {
        self.current = TickBudget::default();
    }
}

/// Final system of the tick: folds this tick's budget into the running total.
pub fn budget_rollup_system(mut budget: ResMut<WaterBudget>) {
    let current = budget.current;
    budget.total.accumulate(&current);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_losses_exclude_moved() {
        let budget = TickBudget {
            evaporated: 1.0,
            drained_down: 2.0,
            seeped_lateral: 3.0,
            relieved: 4.0,
            clamped: 0.5,
            moved: 100.0,
        };
        assert_eq!(budget.losses(), 10.5);
    }

    #[test]
    fn test_rollup_accumulates() {
        let mut world = World::new();
        world.insert_resource(WaterBudget::default());

        let mut schedule = Schedule::default();
        schedule.add_systems(budget_rollup_system);

        for _ in 0..3 {
            let mut budget = world.resource_mut::<WaterBudget>();
            budget.begin_tick();
            budget.current.evaporated = 1.5;
            schedule.run(&mut world);
        }

        let budget = world.resource::<WaterBudget>();
        assert_eq!(budget.current.evaporated, 1.5);
        assert_eq!(budget.total.evaporated, 4.5);
    }
}

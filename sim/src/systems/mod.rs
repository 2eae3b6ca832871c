//! ECS systems for the water flow engine.
//!
//! One tick runs these systems strictly in order on a single thread:
//!
//! 1. `evaporation_system` - exposed column tops lose water to the air
//! 2. `gravity_system` - water settles downward or drains into the ground
//! 3. `lateral_diffusion_system` - neighbors equalise saturation, open edges seep
//! 4. `oversaturation_relief_system` - forced excess is pushed out fast
//! 5. `clamp_system` - content is clamped to `[0, capacity]`
//! 6. `budget_rollup_system` - the tick's losses are added to the running total
//!
//! Every pass reads the registries as they were at the start of that pass and
//! writes through a [`TransferPlan`], so the outcome never depends on map
//! iteration order.

pub mod budget;
pub mod environment;
pub mod evaporation;
pub mod gravity;
pub mod lateral;
pub mod oversaturation;
pub mod transfer;

pub use budget::*;
pub use environment::*;
pub use evaporation::*;
pub use gravity::*;
pub use lateral::*;
pub use oversaturation::*;
pub use transfer::{AppliedTransfer, Flow, TransferPlan};

#[cfg(test)]
pub(crate) fn test_world(config: crate::config::WaterConfig) -> bevy_ecs::world::World {
    use crate::barriers::BarrierRegistry;
    use crate::cells::CellRegistry;

    let mut world = bevy_ecs::world::World::new();
    world.insert_resource(DeltaTime(0.1));
    world.insert_resource(Temperature(config.initial_temperature));
    world.insert_resource(CellRegistry::new());
    world.insert_resource(BarrierRegistry::new());
    world.insert_resource(WaterBudget::default());
    world.insert_resource(config);
    world
}

#[cfg(test)]
pub(crate) fn run_system<M>(
    world: &mut bevy_ecs::world::World,
    systems: impl bevy_ecs::schedule::IntoSystemConfigs<M>,
) {
    let mut schedule = bevy_ecs::schedule::Schedule::default();
    schedule.add_systems(systems);
    schedule.run(world);
}

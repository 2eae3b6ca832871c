//! Per-tick environment resources.

use bevy_ecs::prelude::*;

/// Resource containing the caller-provided delta time for the current tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DeltaTime(pub f32);

/// Air temperature in degrees Celsius. Drives the evaporation rate.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Temperature(pub f32);

impl Default for Temperature {
    fn default() -> Self {
        Self(20.0)
    }
}

/// Number of completed ticks. Advances only when a tick actually runs.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

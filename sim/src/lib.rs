//! Soil Water - Simulation Core
//!
//! A deterministic, caller-paced water simulation over a sparse 3D hex
//! lattice of soil cells: gravity, lateral diffusion, per-edge barriers and
//! temperature-driven evaporation.
//! Uses `bevy_ecs` for resources and the per-tick system schedule.

pub mod api;
pub mod barriers;
pub mod bridge;
pub mod cells;
pub mod config;
pub mod hex;
pub mod soil;
pub mod systems;
pub mod world;

pub use api::WaterSim;
pub use barriers::{BarrierKey, BarrierRegistry};
pub use cells::{CellRegistry, WaterCell};
pub use config::{ConfigError, EvaporationCurve, WaterConfig};
pub use hex::{Edge, HexAddress, HexDirection};
pub use soil::{SoilCatalog, SoilProperties, SoilType};
pub use systems::{TickBudget, WaterBudget};
pub use world::{BarrierSnapshot, CellSnapshot, WaterSnapshot};

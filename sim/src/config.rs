//! Tunable simulation parameters.
//!
//! All rates are in volume units per second and are multiplied by the
//! caller-provided `dt` each tick.

use crate::soil::{SoilCatalog, SoilType};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Evaporation rate as a function of air temperature.
///
/// The rate doubles every `doubling_celsius` degrees above
/// `reference_celsius` and halves every `doubling_celsius` below it, so it is
/// strictly increasing in temperature and never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaporationCurve {
    /// Rate at the reference temperature.
    pub base_rate: f32,
    pub reference_celsius: f32,
    pub doubling_celsius: f32,
}

impl Default for EvaporationCurve {
    fn default() -> Self {
        Self {
            base_rate: 2.0,
            reference_celsius: 20.0,
            doubling_celsius: 10.0,
        }
    }
}

impl EvaporationCurve {
    pub fn rate(&self, celsius: f32) -> f32 {
        let exponent = (celsius - self.reference_celsius) / self.doubling_celsius;
        (self.base_rate * exponent.exp2()).max(0.0)
    }
}

/// Configuration for the water simulation.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    /// Capacity/permeability per soil. Capacity is captured when a cell is placed.
    pub soils: SoilCatalog,
    pub evaporation: EvaporationCurve,
    /// Multiplier applied to downward flow only.
    pub gravity_bias: f32,
    /// Downward flow rate at permeability 1 before the gravity bias.
    pub vertical_rate: f32,
    /// Lateral diffusion rate for a full saturation difference at permeability 1.
    pub lateral_rate: f32,
    /// Seepage per open lateral edge facing unregistered ground.
    pub lateral_sink_rate: f32,
    /// Speed-up applied to each outlet while relieving oversaturation.
    pub oversaturation_multiplier: f32,
    /// Air temperature a fresh simulation starts at.
    pub initial_temperature: f32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            soils: SoilCatalog::default(),
            evaporation: EvaporationCurve::default(),
            gravity_bias: 3.0,
            vertical_rate: 20.0,
            lateral_rate: 20.0,
            lateral_sink_rate: 1.5,
            oversaturation_multiplier: 8.0,
            initial_temperature: 20.0,
        }
    }
}

impl WaterConfig {
    /// Parse a config from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WaterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check every parameter is inside its meaningful range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (soil, props) in self.soils.placeable() {
            if !(props.capacity > 0.0) || !props.capacity.is_finite() {
                return Err(ConfigError::NonPositiveCapacity {
                    soil,
                    capacity: props.capacity,
                });
            }
            if !(props.permeability > 0.0 && props.permeability <= 1.0) {
                return Err(ConfigError::PermeabilityOutOfRange {
                    soil,
                    permeability: props.permeability,
                });
            }
        }

        let rates = [
            ("evaporation.base_rate", self.evaporation.base_rate),
            ("vertical_rate", self.vertical_rate),
            ("lateral_rate", self.lateral_rate),
            ("lateral_sink_rate", self.lateral_sink_rate),
            ("oversaturation_multiplier", self.oversaturation_multiplier),
        ];
        for (name, value) in rates {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::NegativeRate { name, value });
            }
        }
        if !(self.evaporation.doubling_celsius > 0.0) {
            return Err(ConfigError::NegativeRate {
                name: "evaporation.doubling_celsius",
                value: self.evaporation.doubling_celsius,
            });
        }

        if !(self.gravity_bias >= 1.0) || !self.gravity_bias.is_finite() {
            return Err(ConfigError::GravityBiasTooSmall(self.gravity_bias));
        }
        Ok(())
    }
}

/// Errors produced while loading or validating a [`WaterConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    Json(serde_json::Error),
    /// A placeable soil was given zero, negative or non-finite capacity.
    NonPositiveCapacity { soil: SoilType, capacity: f32 },
    /// Permeability must be in (0, 1].
    PermeabilityOutOfRange { soil: SoilType, permeability: f32 },
    /// A rate that must be non-negative was not.
    NegativeRate { name: &'static str, value: f32 },
    /// Gravity must not be weaker than lateral flow.
    GravityBiasTooSmall(f32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "invalid config JSON: {e}"),
            ConfigError::NonPositiveCapacity { soil, capacity } => {
                write!(f, "{} capacity must be positive, got {capacity}", soil.name())
            }
            ConfigError::PermeabilityOutOfRange { soil, permeability } => write!(
                f,
                "{} permeability must be in (0, 1], got {permeability}",
                soil.name()
            ),
            ConfigError::NegativeRate { name, value } => {
                write!(f, "{name} must be non-negative, got {value}")
            }
            ConfigError::GravityBiasTooSmall(bias) => {
                write!(f, "gravity_bias must be at least 1.0, got {bias}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

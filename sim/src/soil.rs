//! Soil types and their water-holding properties.
//!
//! Capacity is the volume of water a cell of that soil can hold (abstract
//! units, reported as millilitres). Permeability in (0, 1] scales how fast
//! water moves into and out of the soil.

use serde::{Deserialize, Serialize};

/// Soil placed in a cell.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum SoilType {
    /// No real soil. Stands for the unregistered exterior and is never
    /// instantiated as a cell.
    Desert,
    /// Drains fast, holds little.
    Sand,
    /// Balanced soil.
    #[default]
    Loam,
    /// Holds a lot, drains slowly.
    Clay,
}

impl SoilType {
    pub const ALL: [SoilType; 4] = [
        SoilType::Desert,
        SoilType::Sand,
        SoilType::Loam,
        SoilType::Clay,
    ];

    /// Built-in capacity/permeability for this soil.
    pub fn default_properties(&self) -> SoilProperties {
        match self {
            SoilType::Desert => SoilProperties::new(0.0, 1.0),
            SoilType::Sand => SoilProperties::new(250.0, 0.9),
            SoilType::Loam => SoilProperties::new(400.0, 0.5),
            SoilType::Clay => SoilProperties::new(550.0, 0.2),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SoilType::Desert => "Desert",
            SoilType::Sand => "Sand",
            SoilType::Loam => "Loam",
            SoilType::Clay => "Clay",
        }
    }
}

/// Water-holding properties of one soil type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilProperties {
    /// Maximum water volume per cell.
    pub capacity: f32,
    /// Flow scaling in (0, 1].
    pub permeability: f32,
}

impl SoilProperties {
    pub const fn new(capacity: f32, permeability: f32) -> Self {
        Self { capacity, permeability }
    }
}

/// Tunable per-soil property table.
///
/// Desert has no entry: it always resolves to zero capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoilCatalog {
    pub sand: SoilProperties,
    pub loam: SoilProperties,
    pub clay: SoilProperties,
}

impl Default for SoilCatalog {
    fn default() -> Self {
        Self {
            sand: SoilType::Sand.default_properties(),
            loam: SoilType::Loam.default_properties(),
            clay: SoilType::Clay.default_properties(),
        }
    }
}

impl SoilCatalog {
    pub fn lookup(&self, soil: SoilType) -> SoilProperties {
        match soil {
            SoilType::Desert => SoilType::Desert.default_properties(),
            SoilType::Sand => self.sand,
            SoilType::Loam => self.loam,
            SoilType::Clay => self.clay,
        }
    }

    /// Override the properties of one soil. Desert cannot be overridden.
    pub fn set(&mut self, soil: SoilType, props: SoilProperties) -> bool {
        match soil {
            SoilType::Desert => return false,
            SoilType::Sand => self.sand = props,
            SoilType::Loam => self.loam = props,
            SoilType::Clay => self.clay = props,
        }
        true
    }

    /// Soils that can be placed as real cells.
    pub fn placeable(&self) -> impl Iterator<Item = (SoilType, SoilProperties)> + '_ {
        [SoilType::Sand, SoilType::Loam, SoilType::Clay]
            .into_iter()
            .map(|s| (s, self.lookup(s)))
    }
}

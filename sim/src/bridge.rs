//! Flat overlay buffer.
//!
//! Debug overlays and hover tooltips usually live in a renderer or scripting
//! layer that is happier with one contiguous `f32` array than with nested
//! structs. This module packs a [`WaterSnapshot`] into that array.
//!
//! # Buffer Layout (Version 1.0)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ HEADER (1 element)                                              │
//! │ [0] cell_count (as f32)                                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ For each cell i (offset = 1 + i * CELL_STRIDE):                 │
//! │   [+0] q          - Axial q                                     │
//! │   [+1] r          - Axial r                                     │
//! │   [+2] y          - Layer                                       │
//! │   [+3] soil_id    - Soil (see SOIL_* constants)                 │
//! │   [+4] content    - Water held                                  │
//! │   [+5] capacity   - Water capacity                              │
//! │   [+6] saturation - content / capacity (0.0-1.0)                │
//! │   [+7] exposed    - 1.0 if nothing is above the cell            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cells appear in address order, so the same snapshot always produces the
//! same buffer.

use crate::soil::SoilType;
use crate::world::WaterSnapshot;

/// Number of f32 values per cell. Part of the buffer contract.
pub const CELL_STRIDE: usize = 8;

/// Number of f32 values in the buffer header.
pub const HEADER_SIZE: usize = 1;

pub const SOIL_DESERT: f32 = 0.0;
pub const SOIL_SAND: f32 = 1.0;
pub const SOIL_LOAM: f32 = 2.0;
pub const SOIL_CLAY: f32 = 3.0;

pub const FIELD_Q: usize = 0;
pub const FIELD_R: usize = 1;
pub const FIELD_Y: usize = 2;
pub const FIELD_SOIL: usize = 3;
pub const FIELD_CONTENT: usize = 4;
pub const FIELD_CAPACITY: usize = 5;
pub const FIELD_SATURATION: usize = 6;
pub const FIELD_EXPOSED: usize = 7;

#[inline]
pub fn soil_to_id(soil: SoilType) -> f32 {
    match soil {
        SoilType::Desert => SOIL_DESERT,
        SoilType::Sand => SOIL_SAND,
        SoilType::Loam => SOIL_LOAM,
        SoilType::Clay => SOIL_CLAY,
    }
}

/// Pack a snapshot's cells into a flat buffer.
pub fn snapshot_to_flatbuffer(snapshot: &WaterSnapshot) -> Vec<f32> {
    let cell_count = snapshot.cells.len();
    let mut buffer = Vec::with_capacity(calculate_buffer_size(cell_count));
    buffer.push(cell_count as f32);

    for cell in &snapshot.cells {
        buffer.push(cell.address.q as f32);
        buffer.push(cell.address.r as f32);
        buffer.push(cell.address.y as f32);
        buffer.push(soil_to_id(cell.soil));
        buffer.push(cell.content);
        buffer.push(cell.capacity);
        buffer.push(cell.saturation);
        buffer.push(if cell.exposed { 1.0 } else { 0.0 });
    }

    debug_assert_eq!(buffer.len(), calculate_buffer_size(cell_count), "Buffer size mismatch");
    buffer
}

#[inline]
pub fn calculate_buffer_size(cell_count: usize) -> usize {
    HEADER_SIZE + cell_count * CELL_STRIDE
}

/// Cell count from a buffer header, `None` if the buffer is empty.
#[inline]
pub fn parse_cell_count(buffer: &[f32]) -> Option<usize> {
    buffer.first().map(|&count| count as usize)
}

#[inline]
pub const fn cell_offset(cell_index: usize) -> usize {
    HEADER_SIZE + cell_index * CELL_STRIDE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::WaterSim;
    use crate::hex::HexAddress;

    #[test]
    fn test_empty_buffer_is_header_only() {
        let sim = WaterSim::new();
        let buffer = snapshot_to_flatbuffer(&sim.snapshot());
        assert_eq!(buffer, vec![0.0]);
        assert_eq!(parse_cell_count(&buffer), Some(0));
        assert_eq!(parse_cell_count(&[]), None);
    }

    #[test]
    fn test_cells_are_packed_in_address_order() {
        let mut sim = WaterSim::new();
        let low = HexAddress::new(0, 0, 0);
        let high = low.above();
        sim.add_hex(high, SoilType::Sand);
        sim.add_hex(low, SoilType::Clay);
        sim.add_water(low, 110.0);

        let buffer = snapshot_to_flatbuffer(&sim.snapshot());
        assert_eq!(buffer.len(), calculate_buffer_size(2));

        let first = cell_offset(0);
        assert_eq!(buffer[first + FIELD_Y], 0.0);
        assert_eq!(buffer[first + FIELD_SOIL], SOIL_CLAY);
        assert_eq!(buffer[first + FIELD_CONTENT], 110.0);
        assert!((buffer[first + FIELD_SATURATION] - 0.2).abs() < 1e-6);
        assert_eq!(buffer[first + FIELD_EXPOSED], 0.0);

        let second = cell_offset(1);
        assert_eq!(buffer[second + FIELD_Y], 1.0);
        assert_eq!(buffer[second + FIELD_SOIL], SOIL_SAND);
        assert_eq!(buffer[second + FIELD_EXPOSED], 1.0);
    }

    #[test]
    fn test_field_offsets_fit_stride() {
        assert_eq!(CELL_STRIDE, FIELD_EXPOSED + 1);
        let fields = [
            FIELD_Q,
            FIELD_R,
            FIELD_Y,
            FIELD_SOIL,
            FIELD_CONTENT,
            FIELD_CAPACITY,
            FIELD_SATURATION,
        ];
        assert!(fields.iter().all(|&f| f < CELL_STRIDE));
    }
}

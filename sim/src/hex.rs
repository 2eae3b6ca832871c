//! Hex addressing and neighbor math.
//!
//! Columns use axial coordinates (q, r) with an implicit third axis
//! s = -q - r. Each column is stacked in integer layers `y`, so a soil cell is
//! addressed by `(q, r, y)`.
//!
//! Every cell has seven flow edges: six lateral edges in a fixed canonical
//! order (indices 0-5) and one downward edge (index 6). There is no upward
//! edge; water only reaches a cell from above through that upper cell's own
//! downward edge.
//!
//! Coordinate arithmetic wraps at the `i32` limits, so every address has
//! well-defined neighbors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell position in the 3D hex lattice.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct HexAddress {
    /// First axial coordinate.
    pub q: i32,
    /// Second axial coordinate.
    pub r: i32,
    /// Vertical layer (higher is up).
    pub y: i32,
}

impl HexAddress {
    pub const fn new(q: i32, r: i32, y: i32) -> Self {
        Self { q, r, y }
    }

    /// Implicit third axial coordinate.
    pub const fn s(&self) -> i32 {
        self.q.wrapping_neg().wrapping_sub(self.r)
    }

    /// Lateral neighbor in `dir`, same layer.
    pub fn neighbor(&self, dir: HexDirection) -> Self {
        let (dq, dr) = dir.offset();
        Self::new(self.q.wrapping_add(dq), self.r.wrapping_add(dr), self.y)
    }

    /// The six lateral neighbors in canonical direction order.
    pub fn lateral_neighbors(&self) -> [Self; 6] {
        HexDirection::ALL.map(|d| self.neighbor(d))
    }

    /// The cell directly beneath this one (target of edge 6).
    pub fn below(&self) -> Self {
        Self::new(self.q, self.r, self.y.wrapping_sub(1))
    }

    /// The cell directly above this one. Only used to test surface exposure.
    pub fn above(&self) -> Self {
        Self::new(self.q, self.r, self.y.wrapping_add(1))
    }

    /// Address on the other side of `edge`.
    pub fn across(&self, edge: Edge) -> Self {
        match edge {
            Edge::Lateral(dir) => self.neighbor(dir),
            Edge::Down => self.below(),
        }
    }

    /// Direction from `self` to a laterally adjacent `other` on the same layer.
    ///
    /// Returns `None` for non-adjacent pairs, identical addresses, or pairs on
    /// different layers. Vertical adjacency is addressed through [`Edge::Down`].
    pub fn shared_edge(&self, other: &Self) -> Option<HexDirection> {
        if self.y != other.y {
            return None;
        }
        let delta = (other.q.wrapping_sub(self.q), other.r.wrapping_sub(self.r));
        HexDirection::ALL.into_iter().find(|d| d.offset() == delta)
    }

    /// Planar hex distance, ignoring layers. Saturates at `u32::MAX`.
    pub fn hex_distance(&self, other: &Self) -> u32 {
        let dq = i64::from(self.q) - i64::from(other.q);
        let dr = i64::from(self.r) - i64::from(other.r);
        let ds = -dq - dr;
        let distance = dq
            .unsigned_abs()
            .max(dr.unsigned_abs())
            .max(ds.unsigned_abs());
        u32::try_from(distance).unwrap_or(u32::MAX)
    }
}

impl fmt::Display for HexAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.q, self.r, self.y)
    }
}

/// The six lateral directions, in canonical barrier-index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HexDirection {
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    pub const ALL: [HexDirection; 6] = [
        HexDirection::East,
        HexDirection::NorthEast,
        HexDirection::NorthWest,
        HexDirection::West,
        HexDirection::SouthWest,
        HexDirection::SouthEast,
    ];

    /// Axial (dq, dr) offset for this direction.
    pub const fn offset(&self) -> (i32, i32) {
        match self {
            HexDirection::East => (1, 0),
            HexDirection::NorthEast => (1, -1),
            HexDirection::NorthWest => (0, -1),
            HexDirection::West => (-1, 0),
            HexDirection::SouthWest => (-1, 1),
            HexDirection::SouthEast => (0, 1),
        }
    }

    pub const fn index(&self) -> u8 {
        match self {
            HexDirection::East => 0,
            HexDirection::NorthEast => 1,
            HexDirection::NorthWest => 2,
            HexDirection::West => 3,
            HexDirection::SouthWest => 4,
            HexDirection::SouthEast => 5,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Direction pointing back across the same edge.
    pub fn opposite(&self) -> Self {
        Self::ALL[(self.index() as usize + 3) % 6]
    }
}

/// One of the seven flow edges of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Edge {
    /// Edge to a same-layer neighbor (indices 0-5).
    Lateral(HexDirection),
    /// Edge to the cell below (index 6).
    Down,
}

impl Edge {
    pub const DOWN_INDEX: u8 = 6;

    /// All seven edges in index order.
    pub const ALL: [Edge; 7] = [
        Edge::Lateral(HexDirection::East),
        Edge::Lateral(HexDirection::NorthEast),
        Edge::Lateral(HexDirection::NorthWest),
        Edge::Lateral(HexDirection::West),
        Edge::Lateral(HexDirection::SouthWest),
        Edge::Lateral(HexDirection::SouthEast),
        Edge::Down,
    ];

    pub const fn index(&self) -> u8 {
        match self {
            Edge::Lateral(dir) => dir.index(),
            Edge::Down => Self::DOWN_INDEX,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        if index == Self::DOWN_INDEX {
            Some(Edge::Down)
        } else {
            HexDirection::from_index(index).map(Edge::Lateral)
        }
    }
}

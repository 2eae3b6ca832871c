//! Per-edge flow barriers.
//!
//! Barriers are stored once per physical edge, so blocking A->B blocks B->A.
//! Lateral edges are keyed by their ordered endpoint pair; the vertical edge
//! between a cell and the one below is keyed by the upper cell, which owns
//! the downward edge.

use crate::cells::CellRegistry;
use crate::hex::{Edge, HexAddress};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Canonical identity of one blockable edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BarrierKey {
    /// Edge between two same-layer neighbors, lower address first.
    Lateral(HexAddress, HexAddress),
    /// Downward edge of the given (upper) cell.
    Vertical(HexAddress),
}

impl BarrierKey {
    /// Key for the edge leaving `address` through `edge`.
    pub fn for_edge(address: HexAddress, edge: Edge) -> Self {
        match edge {
            Edge::Lateral(dir) => Self::lateral_unchecked(address, address.neighbor(dir)),
            Edge::Down => BarrierKey::Vertical(address),
        }
    }

    /// Key for the edge joining `a` and `b`, if they are adjacent.
    ///
    /// Vertical pairs resolve to the upper cell's downward edge in either
    /// argument order.
    pub fn between(a: HexAddress, b: HexAddress) -> Option<Self> {
        if a.shared_edge(&b).is_some() {
            Some(Self::lateral_unchecked(a, b))
        } else if b == a.below() {
            Some(BarrierKey::Vertical(a))
        } else if a == b.below() {
            Some(BarrierKey::Vertical(b))
        } else {
            None
        }
    }

    fn lateral_unchecked(a: HexAddress, b: HexAddress) -> Self {
        if a <= b {
            BarrierKey::Lateral(a, b)
        } else {
            BarrierKey::Lateral(b, a)
        }
    }

    /// The two addresses this edge connects.
    pub fn endpoints(&self) -> (HexAddress, HexAddress) {
        match *self {
            BarrierKey::Lateral(a, b) => (a, b),
            BarrierKey::Vertical(upper) => (upper, upper.below()),
        }
    }

    pub fn references(&self, address: &HexAddress) -> bool {
        let (a, b) = self.endpoints();
        a == *address || b == *address
    }

    /// Whether the barrier is attached to a registered cell.
    ///
    /// Lateral barriers need either side registered (so a cell can be walled
    /// off from open desert). A vertical barrier needs the upper cell, since
    /// nothing flows upward out of the lower one.
    pub fn is_anchored(&self, cells: &CellRegistry) -> bool {
        match self {
            BarrierKey::Lateral(a, b) => cells.contains(a) || cells.contains(b),
            BarrierKey::Vertical(upper) => cells.contains(upper),
        }
    }
}

/// Set of blocked edges.
#[derive(Resource, Debug, Default, Clone)]
pub struct BarrierRegistry {
    edges: HashSet<BarrierKey>,
}

impl BarrierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the edge was not already blocked.
    pub fn insert(&mut self, key: BarrierKey) -> bool {
        self.edges.insert(key)
    }

    pub fn remove(&mut self, key: &BarrierKey) -> bool {
        self.edges.remove(key)
    }

    pub fn contains(&self, key: &BarrierKey) -> bool {
        self.edges.contains(key)
    }

    /// Whether flow out of `address` through `edge` is blocked.
    pub fn is_edge_blocked(&self, address: HexAddress, edge: Edge) -> bool {
        !self.edges.is_empty() && self.edges.contains(&BarrierKey::for_edge(address, edge))
    }

    /// Drop every barrier touching `address`. Returns how many were dropped.
    pub fn remove_referencing(&mut self, address: &HexAddress) -> usize {
        let before = self.edges.len();
        self.edges.retain(|key| !key.references(address));
        before - self.edges.len()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// All barriers in deterministic order.
    pub fn sorted(&self) -> Vec<BarrierKey> {
        let mut keys: Vec<BarrierKey> = self.edges.iter().copied().collect();
        keys.sort_unstable();
        keys
    }
}

//! Two-phase water transfers shared by the flow passes.
//!
//! A pass first records every desired flow against the state at the start of
//! the pass, then scales them so no cell sends more than it holds or receives
//! more than its headroom, and only then applies them. The result does not
//! depend on cell iteration order.

use crate::cells::CellRegistry;
use crate::hex::HexAddress;
use std::collections::HashMap;

/// Flows below this are dropped as noise.
pub const MIN_TRANSFER: f32 = 1e-6;

/// One planned movement of water. `to == None` means an exterior sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flow {
    pub from: HexAddress,
    pub to: Option<HexAddress>,
    pub amount: f32,
}

/// Totals actually moved when a plan is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AppliedTransfer {
    /// Water moved between registered cells.
    pub moved: f32,
    /// Water removed into sinks.
    pub sunk: f32,
}

#[derive(Debug, Default)]
pub struct TransferPlan {
    flows: Vec<Flow>,
}

impl TransferPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan moving `amount` from `from` into cell `to`.
    pub fn send_to_cell(&mut self, from: HexAddress, to: HexAddress, amount: f32) {
        self.push(Flow { from, to: Some(to), amount });
    }

    /// Plan draining `amount` from `from` into the exterior.
    pub fn send_to_sink(&mut self, from: HexAddress, amount: f32) {
        self.push(Flow { from, to: None, amount });
    }

    fn push(&mut self, flow: Flow) {
        if flow.amount > MIN_TRANSFER && flow.amount.is_finite() {
            self.flows.push(flow);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    /// Scale flows so each source sends at most its content and each target
    /// receives at most its headroom, both measured before any flow applies.
    pub fn bound(&mut self, cells: &CellRegistry) {
        let mut outgoing: HashMap<HexAddress, f32> = HashMap::new();
        let mut incoming: HashMap<HexAddress, f32> = HashMap::new();
        for flow in &self.flows {
            *outgoing.entry(flow.from).or_insert(0.0) += flow.amount;
            if let Some(to) = flow.to {
                *incoming.entry(to).or_insert(0.0) += flow.amount;
            }
        }

        let ratio = |available: f32, wanted: f32| -> f32 {
            if wanted <= available {
                1.0
            } else if wanted > 0.0 {
                (available / wanted).clamp(0.0, 1.0)
            } else {
                0.0
            }
        };

        let source_scale: HashMap<HexAddress, f32> = outgoing
            .iter()
            .map(|(addr, &wanted)| {
                let available = cells.get(addr).map_or(0.0, |c| c.content.max(0.0));
                (*addr, ratio(available, wanted))
            })
            .collect();
        let target_scale: HashMap<HexAddress, f32> = incoming
            .iter()
            .map(|(addr, &wanted)| {
                let headroom = cells.get(addr).map_or(0.0, |c| c.headroom());
                (*addr, ratio(headroom, wanted))
            })
            .collect();

        for flow in &mut self.flows {
            let mut scale = source_scale.get(&flow.from).copied().unwrap_or(0.0);
            if let Some(to) = flow.to {
                scale = scale.min(target_scale.get(&to).copied().unwrap_or(0.0));
            }
            flow.amount *= scale;
        }
        self.flows.retain(|f| f.amount > MIN_TRANSFER);
    }

    /// Apply every flow. Anything a target cannot absorb stays in the source.
    pub fn apply(self, cells: &mut CellRegistry) -> AppliedTransfer {
        let mut applied = AppliedTransfer::default();
        for flow in self.flows {
            let removed = match cells.get_mut(&flow.from) {
                Some(source) => source.drain(flow.amount),
                None => continue,
            };
            if removed <= 0.0 {
                continue;
            }
            match flow.to {
                None => applied.sunk += removed,
                Some(to) => {
                    let absorbed = cells
                        .get_mut(&to)
                        .map_or(0.0, |target| target.fill(removed));
                    applied.moved += absorbed;
                    let leftover = removed - absorbed;
                    if leftover > 0.0 {
                        if let Some(source) = cells.get_mut(&flow.from) {
                            source.content += leftover;
                        }
                    }
                }
            }
        }
        applied
    }
}

//! Peer-update step run by the bus after every write.
//!
//! A textbook MESI/MOESI bus broadcasts an invalidation when a line becomes
//! `Modified` or `Owned`, so no other cache keeps a stale copy. The simulated
//! protocol does not do that: other lines are left untouched. The whole
//! difference is confined to this trait so either behavior can be selected:
//!
//! - [`NoBroadcast`] keeps the simplified protocol (the default).
//! - [`InvalidateBroadcast`] invalidates every other valid copy of the written address.

use serde::Deserialize;

use crate::common::{Addr, ProcessorId};
use crate::core::Processor;

/// Hook invoked by the bus once per write, after the writer's line is updated.
///
/// Implementations may change any line except the writer's. The return value is
/// the number of peer lines invalidated, added to the `invalidations` counter.
pub trait PeerPolicy {
    /// Short name shown in debug output.
    fn name(&self) -> &'static str;

    /// Reacts to `writer` having written `addr`. `roster` is the full processor
    /// roster, indexed by processor id.
    fn on_write(&mut self, writer: ProcessorId, addr: Addr, roster: &mut [Processor]) -> u64;
}

/// Leaves every peer line as it is.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBroadcast;

impl PeerPolicy for NoBroadcast {
    fn name(&self) -> &'static str {
        "none"
    }

    fn on_write(&mut self, _writer: ProcessorId, _addr: Addr, _roster: &mut [Processor]) -> u64 {
        0
    }
}

/// Invalidates every other line holding the written address.
#[derive(Clone, Copy, Debug, Default)]
pub struct InvalidateBroadcast;

impl PeerPolicy for InvalidateBroadcast {
    fn name(&self) -> &'static str {
        "invalidate"
    }

    fn on_write(&mut self, writer: ProcessorId, addr: Addr, roster: &mut [Processor]) -> u64 {
        let mut invalidated = 0;
        for peer in roster.iter_mut().filter(|p| p.id() != writer) {
            if peer.line().holds(addr) && peer.line_mut().invalidate() {
                tracing::debug!(
                    processor = peer.id().val(),
                    addr = addr.val(),
                    "peer line invalidated"
                );
                invalidated += 1;
            }
        }
        invalidated
    }
}

/// Peer-update behavior selected in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PeerUpdate {
    /// No broadcast; other lines keep stale copies.
    #[default]
    None,
    /// Invalidate other copies on every write.
    Invalidate,
}

impl PeerUpdate {
    /// Builds the policy object for this selection.
    pub fn build(self) -> Box<dyn PeerPolicy> {
        match self {
            Self::None => Box::new(NoBroadcast),
            Self::Invalidate => Box::new(InvalidateBroadcast),
        }
    }
}

//! Line state transition rules.
//!
//! Every instruction walks the addressed line through at most two steps:
//! 1. **Fill:** on a miss the line is re-tagged and given a fresh state. MESI always
//!    fills `Shared`. MOESI fills `Shared` when another processor already holds the
//!    address `Owned`, and `Owned` otherwise.
//! 2. **Write:** a write from `Shared` goes to `Owned` under MOESI and `Modified`
//!    under MESI; a write from any other state goes to `Modified`.
//!
//! Reads never transition. No rule produces `Exclusive`.
//!
//! These functions are pure: the bus gathers the inputs (including the peer scan)
//! and applies the result.

use super::{LineState, ProtocolKind};
use crate::common::Addr;

/// Returns `true` if an access to `addr` misses a line tagged `tag` in `state`.
///
/// A line misses when it holds a different address or is `Invalid`.
#[inline]
pub fn is_miss(state: LineState, tag: Option<Addr>, addr: Addr) -> bool {
    tag != Some(addr) || state == LineState::Invalid
}

/// State given to a line freshly filled on a miss.
///
/// `owned_elsewhere` is the result of the bus scan: another processor's line
/// holds the same address in `Owned`. MESI ignores it.
#[inline]
pub const fn fill_state(kind: ProtocolKind, owned_elsewhere: bool) -> LineState {
    match kind {
        ProtocolKind::Mesi => LineState::Shared,
        ProtocolKind::Moesi => {
            if owned_elsewhere {
                LineState::Shared
            } else {
                LineState::Owned
            }
        }
    }
}

/// State after a write to a line currently in `current`.
#[inline]
pub const fn write_state(kind: ProtocolKind, current: LineState) -> LineState {
    match (kind, current) {
        (ProtocolKind::Moesi, LineState::Shared) => LineState::Owned,
        _ => LineState::Modified,
    }
}

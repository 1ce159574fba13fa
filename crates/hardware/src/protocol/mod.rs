//! Coherence protocol descriptor and cache line states.
//!
//! This module defines what a protocol is, independent of how lines move between states:
//! 1. **States:** The five MOESI line states; MESI uses the subset without `Owned`.
//! 2. **Kinds:** `Mesi` or `Moesi`, parsed from a case-sensitive literal with a MESI fallback.
//! 3. **Descriptor:** The immutable `Protocol` value answering "is this state valid here".
//!
//! The transition rules live in [`transitions`]; the hook for peer invalidation lives in [`peer`].

/// Pluggable peer-update step run after every write.
pub mod peer;
/// Line state transition rules.
pub mod transitions;

use std::fmt;

use serde::Deserialize;

/// State of a single cache line.
///
/// `Exclusive` is declared valid under both protocols but the transition rules
/// never assign it: no edge of [`transitions`] leads into it. It is kept so the
/// state set stays complete for protocol checks and future extensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineState {
    /// Line holds no usable data.
    #[default]
    Invalid,
    /// Clean copy that other caches may also hold.
    Shared,
    /// Clean and sole copy. Never entered by the current transition rules.
    Exclusive,
    /// Dirty copy shared with other caches; this cache owns the write-back (MOESI only).
    Owned,
    /// Dirty and sole copy.
    Modified,
}

impl LineState {
    /// All states, in `I S E O M` order.
    pub const ALL: [Self; 5] = [
        Self::Invalid,
        Self::Shared,
        Self::Exclusive,
        Self::Owned,
        Self::Modified,
    ];

    /// Single-letter mnemonic used in dumps and traces.
    pub const fn letter(self) -> char {
        match self {
            Self::Invalid => 'I',
            Self::Shared => 'S',
            Self::Exclusive => 'E',
            Self::Owned => 'O',
            Self::Modified => 'M',
        }
    }
}

impl fmt::Display for LineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Coherence protocol selection.
///
/// Deserializes from the literal `"MESI"` or `"MOESI"`. Matching is
/// case-sensitive; any other literal selects MESI and logs a warning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ProtocolKind {
    /// Modified, Exclusive, Shared, Invalid.
    #[default]
    Mesi,
    /// MESI plus Owned.
    Moesi,
}

impl ProtocolKind {
    /// Both protocols, MESI first.
    pub const ALL: [Self; 2] = [Self::Mesi, Self::Moesi];

    /// Parses a protocol literal, falling back to MESI for anything unrecognised.
    pub fn from_literal(literal: &str) -> Self {
        match literal {
            "MESI" => Self::Mesi,
            "MOESI" => Self::Moesi,
            other => {
                tracing::warn!(literal = other, "unknown protocol, defaulting to MESI");
                Self::Mesi
            }
        }
    }

    /// Canonical upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mesi => "MESI",
            Self::Moesi => "MOESI",
        }
    }
}

impl From<String> for ProtocolKind {
    fn from(literal: String) -> Self {
        Self::from_literal(&literal)
    }
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const MESI_STATES: &[LineState] = &[
    LineState::Modified,
    LineState::Exclusive,
    LineState::Shared,
    LineState::Invalid,
];

const MOESI_STATES: &[LineState] = &[
    LineState::Modified,
    LineState::Owned,
    LineState::Exclusive,
    LineState::Shared,
    LineState::Invalid,
];

/// Immutable protocol descriptor shared by the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Protocol {
    kind: ProtocolKind,
    valid_states: &'static [LineState],
}

impl Protocol {
    /// Builds the descriptor for `kind`.
    pub const fn new(kind: ProtocolKind) -> Self {
        let valid_states = match kind {
            ProtocolKind::Mesi => MESI_STATES,
            ProtocolKind::Moesi => MOESI_STATES,
        };
        Self { kind, valid_states }
    }

    /// Which protocol this is.
    pub const fn kind(&self) -> ProtocolKind {
        self.kind
    }

    /// The protocol's state set, in `M (O) E S I` order.
    pub const fn valid_states(&self) -> &'static [LineState] {
        self.valid_states
    }

    /// Returns `true` if `state` exists under this protocol.
    pub fn is_valid(&self, state: LineState) -> bool {
        self.valid_states.contains(&state)
    }
}

impl From<ProtocolKind> for Protocol {
    fn from(kind: ProtocolKind) -> Self {
        Self::new(kind)
    }
}

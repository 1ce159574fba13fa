//! Mock implementations of simulator traits.

/// Mock peer-update policy.
pub mod peer;

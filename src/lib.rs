//! setlfu: LFU victim-set selection for set-associative cache simulators.
//!
//! See `DESIGN.md` for internal architecture and invariants.

pub mod error;
pub mod prelude;
pub mod tracker;

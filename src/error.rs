//! Error types for the setlfu library.
//!
//! ## Key Components
//!
//! - [`UnknownSet`]: Returned when an access is recorded against a set
//!   identifier that was never registered.
//! - [`EmptyTracker`]: Returned when a victim is requested from a tracker
//!   with no registered sets.
//!
//! Both conditions are caller-contract violations: they are reported to the
//! immediate caller and are recoverable, never fatal.
//!
//! ## Example Usage
//!
//! ```
//! use setlfu::error::{EmptyTracker, UnknownSet};
//! use setlfu::tracker::SetFrequencyTracker;
//!
//! let mut tracker = SetFrequencyTracker::new();
//!
//! // Recording an access to an unregistered set is reported, not absorbed.
//! assert_eq!(tracker.record_access(7), Err(UnknownSet::new(7)));
//!
//! // An empty tracker has no victim to offer.
//! assert_eq!(tracker.least_used_set(), Err(EmptyTracker));
//! ```

use std::fmt;

use crate::tracker::SetId;

// ---------------------------------------------------------------------------
// UnknownSet
// ---------------------------------------------------------------------------

/// Error returned when an operation names a set that was never registered.
///
/// Produced by [`SetFrequencyTracker::record_access`](crate::tracker::SetFrequencyTracker::record_access).
/// Carries the offending set identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownSet(SetId);

impl UnknownSet {
    /// Creates a new `UnknownSet` for the given set identifier.
    #[inline]
    pub fn new(set: SetId) -> Self {
        Self(set)
    }

    /// Returns the set identifier that was not registered.
    #[inline]
    pub fn set(&self) -> SetId {
        self.0
    }
}

impl fmt::Display for UnknownSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "set {} is not registered", self.0)
    }
}

impl std::error::Error for UnknownSet {}

// ---------------------------------------------------------------------------
// EmptyTracker
// ---------------------------------------------------------------------------

/// Error returned when a victim is requested but no sets are registered.
///
/// Produced by [`SetFrequencyTracker::least_used_set`](crate::tracker::SetFrequencyTracker::least_used_set).
/// There is no identifier to return in this state; the absence is reported
/// explicitly rather than through a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyTracker;

impl fmt::Display for EmptyTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no sets are registered")
    }
}

impl std::error::Error for EmptyTracker {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- UnknownSet -------------------------------------------------------

    #[test]
    fn unknown_set_display_names_the_set() {
        let err = UnknownSet::new(42);
        assert_eq!(err.to_string(), "set 42 is not registered");
    }

    #[test]
    fn unknown_set_debug_includes_id() {
        let err = UnknownSet::new(7);
        let dbg = format!("{:?}", err);
        assert!(dbg.contains('7'));
    }

    #[test]
    fn unknown_set_accessor() {
        let err = UnknownSet::new(3);
        assert_eq!(err.set(), 3);
    }

    #[test]
    fn unknown_set_clone_and_eq() {
        let a = UnknownSet::new(1);
        let b = a;
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_set_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<UnknownSet>();
    }

    // -- EmptyTracker -----------------------------------------------------

    #[test]
    fn empty_tracker_display_message() {
        assert_eq!(EmptyTracker.to_string(), "no sets are registered");
    }

    #[test]
    fn empty_tracker_clone_and_eq() {
        let a = EmptyTracker;
        let b = a;
        assert_eq!(a, b);
    }

    #[test]
    fn empty_tracker_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EmptyTracker>();
    }
}

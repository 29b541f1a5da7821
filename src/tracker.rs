//! Per-set access-frequency tracking with LFU victim selection.
//!
//! The tracker is the in-process collaborator of a set-associative cache
//! simulator: the simulator registers every cache set once at
//! initialization, records an access on every simulated reference, and asks
//! for the least-frequently-used set whenever it needs a victim for an LFU
//! replacement decision.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │                       SetFrequencyTracker Layout                       │
//! │                                                                        │
//! │   ┌────────────────────────────────────────────────────────────────┐   │
//! │   │  entries: FxHashMap<SetId, SetEntry>  (authoritative)          │   │
//! │   │                                                                │   │
//! │   │    ┌────────┬───────────┬──────────────────┐                   │   │
//! │   │    │  set   │ frequency │ ways             │                   │   │
//! │   │    ├────────┼───────────┼──────────────────┤                   │   │
//! │   │    │   0    │     5     │ {0, 1, 2, 3}     │                   │   │
//! │   │    │   1    │     2     │ {0, 1, 2, 3}     │                   │   │
//! │   │    │   2    │     9     │ {0, 1, 2, 3}     │                   │   │
//! │   │    └────────┴───────────┴──────────────────┘                   │   │
//! │   └────────────────────────────────────────────────────────────────┘   │
//! │                                                                        │
//! │   ┌────────────────────────────────────────────────────────────────┐   │
//! │   │  min_heap: BinaryHeap<Reverse<(freq, set)>>  (may be stale)    │   │
//! │   │                                                                │   │
//! │   │    (2, 1)  ← current min, matches entries[1].frequency         │   │
//! │   │    (4, 0)  ← STALE: entries[0].frequency = 5, not 4            │   │
//! │   │    (5, 0)  ← valid                                             │   │
//! │   │    (9, 2)  ← valid                                             │   │
//! │   └────────────────────────────────────────────────────────────────┘   │
//! └────────────────────────────────────────────────────────────────────────┘
//!
//! Access Flow
//! ───────────
//!   record_access(0):
//!     1. entries[0].frequency += 1     (authoritative update)
//!     2. heap.push((new_freq, 0))      (old entries for set 0 become stale)
//!     3. rebuild heap if it outgrew the live-entry bound
//!
//! Selection Flow
//! ──────────────
//!   least_used_set():
//!     loop:
//!       peek heap top (freq, set)
//!       if entries[set].frequency == freq  → return set
//!       else pop and discard (stale)
//! ```
//!
//! ## Key Concepts
//!
//! - **Authoritative map**: the frequency that counts is always the one in
//!   `entries`; heap entries are hints that may be out of date.
//! - **Lazy deletion**: incrementing a frequency pushes a fresh heap entry
//!   instead of updating in place; stale entries are skipped at read time.
//! - **Bounded staleness**: when the heap grows past a fixed multiple of the
//!   live entry count it is rebuilt from the map.
//! - **Deterministic tie-break**: heap order is `(frequency, set)`, so among
//!   equal minimum frequencies the smallest set identifier wins.
//!
//! ## Operations
//!
//! | Operation         | Description                              | Complexity         |
//! |-------------------|------------------------------------------|--------------------|
//! | `register`        | Insert/overwrite a set at frequency 0    | O(associativity)   |
//! | `record_access`   | Increment a set's frequency by one       | O(log n)           |
//! | `least_used_set`  | Identifier of the minimum-frequency set  | Amortized O(log n) |
//! | `frequency`       | Current counter for a set                | O(1)               |
//! | `associativity`   | Way count recorded at registration       | O(1)               |
//!
//! ## Example Usage
//!
//! ```
//! use setlfu::tracker::SetFrequencyTracker;
//!
//! let mut tracker = SetFrequencyTracker::new();
//!
//! // One registration per cache set at simulator start-up.
//! tracker.register(0, 4);
//! tracker.register(1, 4);
//! tracker.register(2, 4);
//!
//! // One call per simulated access.
//! tracker.record_access(0).unwrap();
//! tracker.record_access(0).unwrap();
//! tracker.record_access(1).unwrap();
//!
//! // Set 2 was never accessed, so it is the LFU victim.
//! assert_eq!(tracker.least_used_set(), Ok(2));
//! ```
//!
//! ## Thread Safety
//!
//! `SetFrequencyTracker` is not thread-safe; the owning simulator must
//! synchronize access externally. With the `concurrency` feature enabled,
//! [`ConcurrentSetFrequencyTracker`] wraps the tracker in a single
//! `parking_lot::Mutex` for shared use.
//!
//! ## Implementation Notes
//!
//! - Frequencies are monotonically non-decreasing for the lifetime of an
//!   entry; only re-registration resets a counter to 0.
//! - There is no per-entry removal; entries live until the tracker is
//!   dropped.
//! - `least_used_set` takes `&mut self` because stale heap entries are
//!   popped during the read.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{EmptyTracker, UnknownSet};

/// Identifier of one cache set, assigned by the caller.
pub type SetId = u32;

#[derive(Debug, Clone)]
struct SetEntry {
    frequency: u64,
    ways: FxHashSet<u32>,
}

/// Tracks per-set access frequencies and selects the LFU victim set.
///
/// See the module-level documentation for the data layout and the lazy
/// heap-maintenance discipline.
///
/// # Example
///
/// ```
/// use setlfu::tracker::SetFrequencyTracker;
///
/// let mut tracker = SetFrequencyTracker::new();
/// tracker.register(3, 8);
/// tracker.register(5, 8);
///
/// assert_eq!(tracker.record_access(3), Ok(1));
/// assert_eq!(tracker.least_used_set(), Ok(5));
/// ```
#[derive(Debug)]
pub struct SetFrequencyTracker {
    entries: FxHashMap<SetId, SetEntry>,
    // Min-heap of (frequency, set): smallest frequency first, then smallest
    // set identifier. May contain stale entries; `entries` is authoritative.
    min_heap: BinaryHeap<Reverse<(u64, SetId)>>,
}

impl SetFrequencyTracker {
    const MAX_HEAP_FACTOR: usize = 4;

    /// Creates an empty tracker.
    ///
    /// # Example
    ///
    /// ```
    /// use setlfu::tracker::SetFrequencyTracker;
    ///
    /// let tracker = SetFrequencyTracker::new();
    /// assert!(tracker.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
            min_heap: BinaryHeap::new(),
        }
    }

    /// Creates an empty tracker with pre-allocated capacity for `capacity`
    /// sets.
    ///
    /// # Example
    ///
    /// ```
    /// use setlfu::tracker::SetFrequencyTracker;
    ///
    /// let tracker = SetFrequencyTracker::with_capacity(1024);
    /// assert!(tracker.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            min_heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Reserves capacity for at least `additional` more sets.
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
        self.min_heap.reserve(additional);
    }

    /// Returns the number of registered sets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no sets are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `set` is registered.
    pub fn contains(&self, set: SetId) -> bool {
        self.entries.contains_key(&set)
    }

    /// Returns the current access frequency of `set`, if registered.
    ///
    /// # Example
    ///
    /// ```
    /// use setlfu::tracker::SetFrequencyTracker;
    ///
    /// let mut tracker = SetFrequencyTracker::new();
    /// tracker.register(0, 2);
    ///
    /// assert_eq!(tracker.frequency(0), Some(0));
    /// assert_eq!(tracker.frequency(9), None);
    /// ```
    pub fn frequency(&self, set: SetId) -> Option<u64> {
        self.entries.get(&set).map(|entry| entry.frequency)
    }

    /// Returns the number of ways recorded for `set` at registration, if
    /// registered.
    pub fn associativity(&self, set: SetId) -> Option<usize> {
        self.entries.get(&set).map(|entry| entry.ways.len())
    }

    /// Returns the underlying heap length (may exceed [`len`](Self::len)
    /// due to stale entries).
    pub fn heap_len(&self) -> usize {
        self.min_heap.len()
    }

    /// Registers `set` with `associativity` ways at frequency 0.
    ///
    /// A duplicate identifier silently re-initializes the entry: the
    /// frequency resets to 0 and the way-index set is rebuilt.
    ///
    /// # Example
    ///
    /// ```
    /// use setlfu::tracker::SetFrequencyTracker;
    ///
    /// let mut tracker = SetFrequencyTracker::new();
    /// tracker.register(0, 4);
    /// tracker.record_access(0).unwrap();
    /// assert_eq!(tracker.frequency(0), Some(1));
    ///
    /// // Re-registration resets the counter.
    /// tracker.register(0, 8);
    /// assert_eq!(tracker.frequency(0), Some(0));
    /// assert_eq!(tracker.associativity(0), Some(8));
    /// ```
    pub fn register(&mut self, set: SetId, associativity: u32) {
        let ways = (0..associativity).collect();
        self.entries.insert(
            set,
            SetEntry {
                frequency: 0,
                ways,
            },
        );
        self.push_to_heap(set, 0);
    }

    /// Increments the access frequency of `set` by exactly 1 and returns
    /// the new value.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownSet`] if `set` was never registered. Registration is
    /// explicit; an access to an unknown identifier is a caller error, not
    /// an implicit insert.
    ///
    /// # Example
    ///
    /// ```
    /// use setlfu::tracker::SetFrequencyTracker;
    ///
    /// let mut tracker = SetFrequencyTracker::new();
    /// tracker.register(1, 4);
    ///
    /// assert_eq!(tracker.record_access(1), Ok(1));
    /// assert_eq!(tracker.record_access(1), Ok(2));
    /// assert!(tracker.record_access(2).is_err());
    /// ```
    pub fn record_access(&mut self, set: SetId) -> Result<u64, UnknownSet> {
        let entry = self.entries.get_mut(&set).ok_or(UnknownSet::new(set))?;
        entry.frequency += 1;
        let frequency = entry.frequency;
        self.push_to_heap(set, frequency);
        Ok(frequency)
    }

    /// Returns the registered set with the smallest access frequency.
    ///
    /// Ties among equal minimum frequencies break deterministically toward
    /// the smallest set identifier. Stale heap entries are skipped (and
    /// discarded) during the read, which is why this takes `&mut self`; the
    /// selected set itself is not removed.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyTracker`] if no sets are registered.
    ///
    /// # Example
    ///
    /// ```
    /// use setlfu::tracker::SetFrequencyTracker;
    ///
    /// let mut tracker = SetFrequencyTracker::new();
    /// assert!(tracker.least_used_set().is_err());
    ///
    /// tracker.register(4, 2);
    /// tracker.register(7, 2);
    /// tracker.record_access(4).unwrap();
    ///
    /// assert_eq!(tracker.least_used_set(), Ok(7));
    /// ```
    pub fn least_used_set(&mut self) -> Result<SetId, EmptyTracker> {
        if self.entries.is_empty() {
            return Err(EmptyTracker);
        }

        loop {
            match self.min_heap.peek() {
                Some(&Reverse((frequency, set))) => {
                    match self.entries.get(&set) {
                        Some(entry) if entry.frequency == frequency => return Ok(set),
                        // Stale: the set's frequency moved on after this
                        // entry was pushed.
                        _ => {
                            self.min_heap.pop();
                        }
                    }
                }
                // Every registered set has a live heap entry, so an empty
                // heap over a non-empty map only happens if that invariant
                // was broken; repopulate from the authoritative map.
                None => self.rebuild_heap(),
            }
        }
    }

    fn push_to_heap(&mut self, set: SetId, frequency: u64) {
        self.min_heap.push(Reverse((frequency, set)));
        self.maybe_rebuild_heap();
    }

    /// Bound the heap size by rebuilding from the authoritative entries map.
    fn maybe_rebuild_heap(&mut self) {
        let live_entries = self.entries.len().max(1);
        let max_heap_len = live_entries.saturating_mul(Self::MAX_HEAP_FACTOR);

        if self.min_heap.len() <= max_heap_len {
            return;
        }

        self.rebuild_heap();
    }

    fn rebuild_heap(&mut self) {
        self.min_heap.clear();
        self.min_heap.reserve(self.entries.len());
        for (&set, entry) in &self.entries {
            self.min_heap.push(Reverse((entry.frequency, set)));
        }
    }

    #[cfg(any(test, debug_assertions))]
    /// Validates internal invariants (debug/test builds only).
    pub fn debug_validate_invariants(&self) {
        assert!(
            self.min_heap.len() >= self.entries.len(),
            "heap must hold at least one entry per registered set"
        );
        let max_heap_len = self
            .entries
            .len()
            .max(1)
            .saturating_mul(Self::MAX_HEAP_FACTOR);
        assert!(
            self.min_heap.len() <= max_heap_len,
            "heap staleness exceeded the rebuild bound"
        );
        for (&set, entry) in &self.entries {
            assert!(
                self.min_heap
                    .iter()
                    .any(|&Reverse((frequency, id))| id == set && frequency == entry.frequency),
                "set {set} has no live heap entry"
            );
        }
    }
}

impl Default for SetFrequencyTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "concurrency")]
#[derive(Debug)]
pub struct ConcurrentSetFrequencyTracker {
    inner: parking_lot::Mutex<SetFrequencyTracker>,
}

#[cfg(feature = "concurrency")]
impl ConcurrentSetFrequencyTracker {
    pub fn new() -> Self {
        Self {
            inner: parking_lot::Mutex::new(SetFrequencyTracker::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: parking_lot::Mutex::new(SetFrequencyTracker::with_capacity(capacity)),
        }
    }

    pub fn register(&self, set: SetId, associativity: u32) {
        let mut tracker = self.inner.lock();
        tracker.register(set, associativity);
    }

    pub fn record_access(&self, set: SetId) -> Result<u64, UnknownSet> {
        let mut tracker = self.inner.lock();
        tracker.record_access(set)
    }

    pub fn least_used_set(&self) -> Result<SetId, EmptyTracker> {
        let mut tracker = self.inner.lock();
        tracker.least_used_set()
    }

    pub fn contains(&self, set: SetId) -> bool {
        let tracker = self.inner.lock();
        tracker.contains(set)
    }

    pub fn frequency(&self, set: SetId) -> Option<u64> {
        let tracker = self.inner.lock();
        tracker.frequency(set)
    }

    pub fn associativity(&self, set: SetId) -> Option<usize> {
        let tracker = self.inner.lock();
        tracker.associativity(set)
    }

    pub fn len(&self) -> usize {
        let tracker = self.inner.lock();
        tracker.len()
    }

    pub fn is_empty(&self) -> bool {
        let tracker = self.inner.lock();
        tracker.is_empty()
    }
}

#[cfg(feature = "concurrency")]
impl Default for ConcurrentSetFrequencyTracker {
    fn default() -> Self {
        Self::new()
    }
}

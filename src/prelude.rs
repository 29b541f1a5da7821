pub use crate::error::{EmptyTracker, UnknownSet};
pub use crate::tracker::{SetFrequencyTracker, SetId};

#[cfg(feature = "concurrency")]
pub use crate::tracker::ConcurrentSetFrequencyTracker;

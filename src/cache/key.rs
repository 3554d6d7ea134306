//! The ordered key every eviction strategy produces.
//!
//! A key is a `(rank, time)` pair compared lexicographically: first by the
//! integer `rank`, then by `time`. Lower keys are evicted first, for every
//! strategy, so the cache manager needs exactly one comparator.

use std::cmp::Ordering;
use std::fmt;

use crate::cache::node::Timestamp;

/// Eviction priority of a single node. Smaller evicts sooner.
///
/// `rank` is wide enough to hold any `u64` hit count and any `i64` tier
/// without loss. `time` is compared with the IEEE-754 total order, so
/// every key is totally ordered, NaN included.
#[derive(Debug, Clone, Copy)]
pub struct EvictionKey {
    rank: i128,
    time: Timestamp,
}

impl EvictionKey {
    /// A key ordered by time alone.
    pub fn from_time(time: Timestamp) -> Self {
        Self::ranked(0, time)
    }

    /// A key ordered by `rank`, then by `time` within equal ranks.
    pub fn ranked(rank: impl Into<i128>, time: Timestamp) -> Self {
        // Collapse -0.0 into 0.0 so total_cmp agrees with `==` on timestamps.
        Self {
            rank: rank.into(),
            time: time + 0.0,
        }
    }

    pub fn rank(&self) -> i128 {
        self.rank
    }

    pub fn time(&self) -> Timestamp {
        self.time
    }
}

impl PartialEq for EvictionKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EvictionKey {}

impl PartialOrd for EvictionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EvictionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| self.time.total_cmp(&other.time))
    }
}

impl fmt::Display for EvictionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rank, self.time)
    }
}

//! Read-only view of a cached radix-tree node.
//!
//! The cache manager owns the node and updates its statistics on every hit.
//! Eviction strategies only ever read them through [`CacheNode`].

use serde::{Deserialize, Serialize};

/// Seconds on the cache manager's monotonic clock.
pub type Timestamp = f64;

/// Statistics an eviction strategy may read from a cached node.
///
/// Implementors must hand out a consistent snapshot: the manager is
/// responsible for whatever locking keeps these fields from being read
/// mid-update.
pub trait CacheNode {
    /// Time of the most recent hit. Never decreases.
    fn last_access_time(&self) -> Timestamp;

    /// Time the node was inserted. Fixed for the node's lifetime.
    fn creation_time(&self) -> Timestamp;

    /// Number of hits so far.
    fn hit_count(&self) -> u64;

    /// Application-assigned importance tier (lower = evicted sooner).
    fn priority(&self) -> i64 {
        0
    }

    /// Position of this node's first token within the sequence it came from.
    ///
    /// `None` means the node is never eligible for sink protection.
    fn seq_start_offset(&self) -> Option<u64> {
        None
    }
}

impl<N: CacheNode + ?Sized> CacheNode for &N {
    fn last_access_time(&self) -> Timestamp {
        (**self).last_access_time()
    }

    fn creation_time(&self) -> Timestamp {
        (**self).creation_time()
    }

    fn hit_count(&self) -> u64 {
        (**self).hit_count()
    }

    fn priority(&self) -> i64 {
        (**self).priority()
    }

    fn seq_start_offset(&self) -> Option<u64> {
        (**self).seq_start_offset()
    }
}

/// Plain-data snapshot of a node's statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeStats {
    /// Time of the most recent hit.
    pub last_access_time: Timestamp,

    /// Time the node was inserted.
    pub creation_time: Timestamp,

    /// Number of hits so far.
    #[serde(default)]
    pub hit_count: u64,

    /// Importance tier, default 0.
    #[serde(default)]
    pub priority: i64,

    /// Offset of the node's first token in its originating sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq_start_offset: Option<u64>,
}

impl NodeStats {
    /// A freshly inserted node: never hit, accessed at creation, tier 0.
    pub fn new(creation_time: Timestamp) -> Self {
        Self {
            last_access_time: creation_time,
            creation_time,
            hit_count: 0,
            priority: 0,
            seq_start_offset: None,
        }
    }

    pub fn with_last_access(mut self, last_access_time: Timestamp) -> Self {
        self.last_access_time = last_access_time;
        self
    }

    pub fn with_hits(mut self, hit_count: u64) -> Self {
        self.hit_count = hit_count;
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_seq_start_offset(mut self, offset: u64) -> Self {
        self.seq_start_offset = Some(offset);
        self
    }
}

impl CacheNode for NodeStats {
    fn last_access_time(&self) -> Timestamp {
        self.last_access_time
    }

    fn creation_time(&self) -> Timestamp {
        self.creation_time
    }

    fn hit_count(&self) -> u64 {
        self.hit_count
    }

    fn priority(&self) -> i64 {
        self.priority
    }

    fn seq_start_offset(&self) -> Option<u64> {
        self.seq_start_offset
    }
}

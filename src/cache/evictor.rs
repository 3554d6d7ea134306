//! Victim selection: ranks candidate nodes with an [`EvictionStrategy`].
//!
//! The evictor only decides *which* nodes to reclaim. Unlinking them from the
//! tree and freeing their memory stays with the cache manager.
//!
//! Candidates with equal keys are ordered by node id, so the same node
//! states always produce the same victim order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::cache::key::EvictionKey;
use crate::cache::node::CacheNode;
use crate::cache::strategy::EvictionStrategy;

/// Identity the cache manager assigns to a node.
pub type NodeId = u64;

/// An eviction candidate with its computed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionCandidate {
    pub node_id: NodeId,
    pub key: EvictionKey,
}

// Lower key = evicted first; node id breaks exact ties.
impl PartialOrd for EvictionCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EvictionCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.node_id.cmp(&other.node_id))
    }
}

/// Selects eviction victims with a fixed strategy.
#[derive(Debug, Clone, Copy)]
pub struct Evictor {
    strategy: EvictionStrategy,
}

impl Evictor {
    pub fn new(strategy: EvictionStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> EvictionStrategy {
        self.strategy
    }

    /// Score a single node.
    pub fn candidate<N: CacheNode + ?Sized>(&self, node_id: NodeId, node: &N) -> EvictionCandidate {
        EvictionCandidate {
            node_id,
            key: self.strategy.priority(node),
        }
    }

    /// Select up to `count` nodes to evict.
    ///
    /// Returns candidates in eviction order (lowest key first). Nodes in the
    /// protected set (e.g. locked by in-flight requests) are excluded.
    pub fn select_victims<I, N>(
        &self,
        nodes: I,
        count: usize,
        protected_node_ids: &[NodeId],
    ) -> Vec<EvictionCandidate>
    where
        I: IntoIterator<Item = (NodeId, N)>,
        N: CacheNode,
    {
        if count == 0 {
            return Vec::new();
        }

        // Max-heap holding the `count` smallest candidates seen so far.
        let mut heap = BinaryHeap::with_capacity(count + 1);
        let mut scanned = 0usize;

        for (node_id, node) in nodes {
            if protected_node_ids.contains(&node_id) {
                continue;
            }
            scanned += 1;

            heap.push(self.candidate(node_id, &node));
            if heap.len() > count {
                heap.pop();
            }
        }

        let victims = heap.into_sorted_vec();
        debug!(
            strategy = %self.strategy,
            scanned,
            selected = victims.len(),
            "Selected eviction victims"
        );
        victims
    }

    /// Rank every unprotected node, lowest key first.
    pub fn rank<I, N>(&self, nodes: I, protected_node_ids: &[NodeId]) -> Vec<EvictionCandidate>
    where
        I: IntoIterator<Item = (NodeId, N)>,
        N: CacheNode,
    {
        let mut ranked: Vec<EvictionCandidate> = nodes
            .into_iter()
            .filter(|(node_id, _)| !protected_node_ids.contains(node_id))
            .map(|(node_id, node)| self.candidate(node_id, &node))
            .collect();
        ranked.sort_unstable();
        ranked
    }
}

//! Eviction strategies: pure functions from node statistics to an
//! [`EvictionKey`].
//!
//! The catalog is closed, so strategies are an enum dispatched with a
//! `match` rather than trait objects. Adding a strategy means adding a
//! variant, a [`PolicyKind`] and a match arm.
//!
//! | Policy     | Key                                    |
//! |------------|----------------------------------------|
//! | `lru`      | `(0, last_access_time)`                |
//! | `lfu`      | `(hit_count, last_access_time)`        |
//! | `fifo`     | `(0, creation_time)`                   |
//! | `mru`      | `(0, -last_access_time)`               |
//! | `filo`     | `(0, -creation_time)`                  |
//! | `priority` | `(priority, last_access_time)`         |
//! | `sink_lru` | `(is_sink as 0/1, last_access_time)`   |

use std::fmt;
use std::str::FromStr;

use crate::cache::key::EvictionKey;
use crate::cache::node::CacheNode;
use crate::config::ConfigError;

/// Sink tokens protected by `sink_lru` when no count is configured.
pub const DEFAULT_SINK_TOKEN_COUNT: u64 = 4;

/// Catalog names, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Lru,
    Lfu,
    Fifo,
    Mru,
    Filo,
    Priority,
    SinkLru,
}

impl PolicyKind {
    /// Every catalog entry, in catalog order.
    pub const ALL: [PolicyKind; 7] = [
        PolicyKind::Lru,
        PolicyKind::Lfu,
        PolicyKind::Fifo,
        PolicyKind::Mru,
        PolicyKind::Filo,
        PolicyKind::Priority,
        PolicyKind::SinkLru,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PolicyKind::Lru => "lru",
            PolicyKind::Lfu => "lfu",
            PolicyKind::Fifo => "fifo",
            PolicyKind::Mru => "mru",
            PolicyKind::Filo => "filo",
            PolicyKind::Priority => "priority",
            PolicyKind::SinkLru => "sink_lru",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PolicyKind {
    type Err = ConfigError;

    /// Case-insensitive; `-` is accepted in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        PolicyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| ConfigError::UnknownPolicy(s.to_string()))
    }
}

/// Strategy-specific construction parameters.
///
/// Signed so that a negative count coming from configuration is reported as
/// a configuration error instead of being unrepresentable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrategyParams {
    pub sink_token_count: Option<i64>,
}

/// A configured eviction strategy. Lower keys are evicted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvictionStrategy {
    /// Least recently accessed first.
    Lru,
    /// Fewest hits first, older access breaking ties.
    Lfu,
    /// Oldest created first.
    Fifo,
    /// Most recently accessed first.
    Mru,
    /// Most recently created first.
    Filo,
    /// Lowest tier first, least recently accessed within a tier.
    Priority,
    /// LRU that never evicts an attention-sink node while any other node
    /// remains.
    ///
    /// A node is a sink when its `seq_start_offset` is below
    /// `sink_token_count`. The first tokens of a sequence anchor attention in
    /// streaming inference (StreamingLLM, arXiv:2309.17453), so they must
    /// outlive recency churn.
    SinkLru { sink_token_count: u64 },
}

impl EvictionStrategy {
    /// Build a strategy from its catalog name and parameters.
    ///
    /// Fails on an unknown name, a negative sink count, or a parameter the
    /// chosen strategy does not take.
    pub fn new(name: &str, params: StrategyParams) -> Result<Self, ConfigError> {
        let kind: PolicyKind = name.parse()?;
        Self::from_kind(kind, params)
    }

    /// Build a strategy from an already-parsed catalog entry.
    pub fn from_kind(kind: PolicyKind, params: StrategyParams) -> Result<Self, ConfigError> {
        if kind != PolicyKind::SinkLru && params.sink_token_count.is_some() {
            return Err(ConfigError::UnexpectedParameter {
                policy: kind,
                parameter: "sink_token_count",
            });
        }

        let strategy = match kind {
            PolicyKind::Lru => EvictionStrategy::Lru,
            PolicyKind::Lfu => EvictionStrategy::Lfu,
            PolicyKind::Fifo => EvictionStrategy::Fifo,
            PolicyKind::Mru => EvictionStrategy::Mru,
            PolicyKind::Filo => EvictionStrategy::Filo,
            PolicyKind::Priority => EvictionStrategy::Priority,
            PolicyKind::SinkLru => {
                let sink_token_count = match params.sink_token_count {
                    None => DEFAULT_SINK_TOKEN_COUNT,
                    Some(count) => u64::try_from(count)
                        .map_err(|_| ConfigError::NegativeSinkTokenCount(count))?,
                };
                EvictionStrategy::SinkLru { sink_token_count }
            }
        };
        Ok(strategy)
    }

    /// `sink_lru` with the default sink count.
    pub fn sink_lru() -> Self {
        EvictionStrategy::SinkLru {
            sink_token_count: DEFAULT_SINK_TOKEN_COUNT,
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            EvictionStrategy::Lru => PolicyKind::Lru,
            EvictionStrategy::Lfu => PolicyKind::Lfu,
            EvictionStrategy::Fifo => PolicyKind::Fifo,
            EvictionStrategy::Mru => PolicyKind::Mru,
            EvictionStrategy::Filo => PolicyKind::Filo,
            EvictionStrategy::Priority => PolicyKind::Priority,
            EvictionStrategy::SinkLru { .. } => PolicyKind::SinkLru,
        }
    }

    /// Compute the eviction key for a node.
    ///
    /// Pure and constant time: reads the node, never mutates it, and returns
    /// the same key for the same field values.
    #[inline]
    pub fn priority<N: CacheNode + ?Sized>(&self, node: &N) -> EvictionKey {
        match *self {
            EvictionStrategy::Lru => EvictionKey::from_time(node.last_access_time()),
            EvictionStrategy::Lfu => {
                EvictionKey::ranked(node.hit_count(), node.last_access_time())
            }
            EvictionStrategy::Fifo => EvictionKey::from_time(node.creation_time()),
            EvictionStrategy::Mru => EvictionKey::from_time(-node.last_access_time()),
            EvictionStrategy::Filo => EvictionKey::from_time(-node.creation_time()),
            EvictionStrategy::Priority => {
                EvictionKey::ranked(node.priority(), node.last_access_time())
            }
            EvictionStrategy::SinkLru { sink_token_count } => {
                let protected = is_sink(node.seq_start_offset(), sink_token_count);
                EvictionKey::ranked(u8::from(protected), node.last_access_time())
            }
        }
    }
}

impl fmt::Display for EvictionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionStrategy::SinkLru { sink_token_count } => {
                write!(f, "sink_lru(sink_token_count={sink_token_count})")
            }
            other => f.write_str(other.kind().name()),
        }
    }
}

/// Whether a node starting at `seq_start_offset` falls inside the first
/// `sink_token_count` tokens of its sequence.
#[inline]
pub fn is_sink(seq_start_offset: Option<u64>, sink_token_count: u64) -> bool {
    seq_start_offset.is_some_and(|offset| offset < sink_token_count)
}

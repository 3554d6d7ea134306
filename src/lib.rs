//! kv-cache-evict: eviction-priority policies for radix/prefix KV caches.
//!
//! A cache manager that stores reusable attention state must reclaim space
//! under memory pressure. This crate ranks its nodes for removal:
//! an [`EvictionStrategy`] maps a node's statistics to an [`EvictionKey`],
//! and the node with the lowest key is evicted first, whatever the strategy.
//!
//! ```
//! use kv_cache_evict::{Config, NodeStats};
//!
//! let mut config = Config::default();
//! config.eviction.policy = "sink_lru".into();
//! let strategy = config.build_strategy().unwrap();
//!
//! let sink = NodeStats::new(0.0).with_seq_start_offset(0);
//! let tail = NodeStats::new(5.0).with_seq_start_offset(512);
//! assert!(strategy.priority(&tail) < strategy.priority(&sink));
//! ```

pub mod cache;
pub mod config;

pub use cache::evictor::{EvictionCandidate, Evictor, NodeId};
pub use cache::key::EvictionKey;
pub use cache::node::{CacheNode, NodeStats, Timestamp};
pub use cache::strategy::{EvictionStrategy, PolicyKind, StrategyParams, DEFAULT_SINK_TOKEN_COUNT};
pub use config::{Config, ConfigError, EvictionConfig};

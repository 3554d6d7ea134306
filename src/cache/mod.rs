//! Eviction-priority policies for a radix/prefix KV cache.
//!
//! This module contains the policy framework:
//! - [`node`]: the read-only node statistics a strategy consumes
//! - [`key`]: the totally ordered key a strategy produces
//! - [`strategy`]: the strategy catalog (LRU, LFU, FIFO, MRU, FILO, priority, sink-protected LRU)
//! - [`evictor`]: victim selection with deterministic tie-breaking

pub mod evictor;
pub mod key;
pub mod node;
pub mod strategy;

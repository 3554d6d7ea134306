//! Integration tests for the eviction strategies and victim selection.

use kv_cache_evict::{
    ConfigError, EvictionStrategy, Evictor, NodeId, NodeStats, PolicyKind, StrategyParams,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn make_test_node(created: f64, accessed: f64) -> NodeStats {
    NodeStats::new(created).with_last_access(accessed)
}

fn victim_ids(evictor: &Evictor, nodes: &[(NodeId, NodeStats)], count: usize) -> Vec<NodeId> {
    evictor
        .select_victims(nodes.iter().map(|(id, n)| (*id, n)), count, &[])
        .into_iter()
        .map(|c| c.node_id)
        .collect()
}

#[test]
fn test_explicit_priority_scenario() {
    let strategy = EvictionStrategy::new("priority", StrategyParams::default()).unwrap();

    let a = make_test_node(0.0, 500.0).with_priority(1);
    let b = make_test_node(0.0, 1.0).with_priority(5);

    // Lower tier wins regardless of recency.
    assert!(strategy.priority(&a) < strategy.priority(&b));
}

#[test]
fn test_sink_protection_survives_adversarial_recency() {
    init_tracing();
    let strategy = EvictionStrategy::new(
        "sink_lru",
        StrategyParams {
            sink_token_count: Some(4),
        },
    )
    .unwrap();
    let evictor = Evictor::new(strategy);

    let nodes = vec![
        (0, make_test_node(0.0, 0.0).with_seq_start_offset(2)), // sink, far older
        (1, make_test_node(0.0, 900.0).with_seq_start_offset(10)),
        (2, make_test_node(0.0, 950.0)), // no offset: never a sink
        (3, make_test_node(0.0, 1.0).with_seq_start_offset(0)), // sink
    ];

    // Every non-sink node goes before any sink node; recency orders each group.
    assert_eq!(victim_ids(&evictor, &nodes, 4), vec![1, 2, 0, 3]);
    assert_eq!(victim_ids(&evictor, &nodes, 2), vec![1, 2]);
}

#[test]
fn test_fifo_ties_compare_equal_and_resolve_by_id() {
    let strategy = EvictionStrategy::Fifo;
    let first = make_test_node(42.0, 50.0);
    let second = make_test_node(42.0, 60.0);
    assert_eq!(strategy.priority(&first), strategy.priority(&second));

    let evictor = Evictor::new(strategy);
    let nodes = vec![(7, first), (2, second)];
    for _ in 0..10 {
        assert_eq!(victim_ids(&evictor, &nodes, 2), vec![2, 7]);
    }
}

#[test]
fn test_lfu_eviction_order() {
    let evictor = Evictor::new(EvictionStrategy::Lfu);

    let nodes = vec![
        (0, make_test_node(0.0, 10.0).with_hits(5)),
        (1, make_test_node(0.0, 99.0).with_hits(0)), // fewest hits → evict first
        (2, make_test_node(0.0, 20.0).with_hits(2)),
        (3, make_test_node(0.0, 15.0).with_hits(2)), // same hits, older access
    ];

    assert_eq!(victim_ids(&evictor, &nodes, 4), vec![1, 3, 2, 0]);
}

#[test]
fn test_every_strategy_is_idempotent() {
    let node = make_test_node(3.0, 7.0)
        .with_hits(11)
        .with_priority(-4)
        .with_seq_start_offset(1);
    let before = node;

    for kind in PolicyKind::ALL {
        let strategy = EvictionStrategy::from_kind(kind, StrategyParams::default()).unwrap();
        assert_eq!(strategy.priority(&node), strategy.priority(&node), "{kind}");
    }
    assert_eq!(node, before);
}

#[test]
fn test_negative_sink_count_fails_at_construction() {
    let result = EvictionStrategy::new(
        "sink_lru",
        StrategyParams {
            sink_token_count: Some(-1),
        },
    );
    assert_eq!(result, Err(ConfigError::NegativeSinkTokenCount(-1)));
}

#[test]
fn test_protected_ids_and_empty_input() {
    let evictor = Evictor::new(EvictionStrategy::Mru);

    let nodes: Vec<(NodeId, NodeStats)> = vec![];
    assert!(evictor.select_victims(nodes, 5, &[]).is_empty());

    let nodes = vec![
        (0, make_test_node(0.0, 100.0)),
        (1, make_test_node(0.0, 50.0)),
        (2, make_test_node(0.0, 10.0)),
    ];
    let victims = evictor.select_victims(nodes, 10, &[0]);
    let ids: Vec<NodeId> = victims.iter().map(|c| c.node_id).collect();
    assert_eq!(ids, vec![1, 2]);
}

use subgroup_mcts::{
    policy::backpropagation::{BackpropagationPolicy, StandardPolicy, WeightedPolicy},
    NodeStats,
};

#[test]
fn test_standard_policy() {
    let mut stats = NodeStats::default();
    let policy = StandardPolicy::new();

    // Initial state
    assert_eq!(stats.visits(), 0);
    assert_eq!(stats.total_reward(), 0.0);
    assert_eq!(stats.value(), 0.0);

    // Update once
    policy.update_stats(&mut stats, 0, -2.0);
    assert_eq!(stats.visits(), 1);
    assert_eq!(stats.total_reward(), -2.0);

    // Update again, depth does not matter
    policy.update_stats(&mut stats, 7, -4.0);
    assert_eq!(stats.visits(), 2);
    assert_eq!(stats.total_reward(), -6.0);
    assert_eq!(stats.value(), -3.0);
}

#[test]
fn test_weighted_policy() {
    let policy = WeightedPolicy::new(0.5);

    // At the root the weight is 1
    let mut root = NodeStats::default();
    policy.update_stats(&mut root, 0, -4.0);
    assert_eq!(root.visits(), 1);
    assert_eq!(root.total_reward(), -4.0);

    // Two levels down: 1 / (1 + 0.5 * 2) = 0.5
    let mut deep = NodeStats::default();
    policy.update_stats(&mut deep, 2, -4.0);
    assert_eq!(deep.visits(), 1);
    assert_eq!(deep.total_reward(), -2.0);
}

#[test]
fn test_boxed_policy_delegates() {
    let boxed: Box<dyn BackpropagationPolicy> = Box::new(WeightedPolicy::new(1.0));
    let cloned = boxed.clone_box();

    let mut stats = NodeStats::default();
    boxed.update_stats(&mut stats, 1, -2.0);
    cloned.update_stats(&mut stats, 1, -2.0);

    assert_eq!(stats.visits(), 2);
    assert_eq!(stats.total_reward(), -2.0);
}

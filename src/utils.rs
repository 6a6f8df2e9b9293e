//! Scoring helpers shared by the selection policies and the engine

/// Calculates the exploitation term for UCB1
///
/// This is simply the mean reward of a node.
pub fn exploitation_term(total_reward: f64, visits: u64) -> f64 {
    if visits == 0 {
        return 0.0;
    }
    total_reward / visits as f64
}

/// Calculates the exploration term for UCB1
///
/// Unvisited children get an infinite bonus so they are always tried first.
pub fn exploration_term(parent_visits: u64, child_visits: u64, exploration_constant: f64) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }

    exploration_constant * ((parent_visits as f64).ln() / child_visits as f64).sqrt()
}

/// Calculates the UCB1 value for a node
///
/// `mean_reward + C * sqrt(ln(parent_visits) / visits)`, infinite when the
/// node has never been visited.
pub fn ucb1_value(
    total_reward: f64,
    visits: u64,
    parent_visits: u64,
    exploration_constant: f64,
) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }

    let exploitation = exploitation_term(total_reward, visits);
    let exploration = exploration_term(parent_visits, visits, exploration_constant);

    exploitation + exploration
}

/// Mean reward used to pick the final answer
///
/// Unvisited nodes score negative infinity so any visited node beats them.
pub fn choice_score(total_reward: f64, visits: u64) -> f64 {
    if visits == 0 {
        return f64::NEG_INFINITY;
    }
    total_reward / visits as f64
}

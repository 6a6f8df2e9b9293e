//! Main implementation of the Monte Carlo Tree Search algorithm
//!
//! This module contains the core MCTS implementation, orchestrating the
//! four phases of selection, expansion, simulation, and backpropagation.

use std::time::{Duration, Instant};

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::{BestChildCriteria, MCTSConfig},
    policy::{
        backpropagation::{BackpropagationPolicy, StandardPolicy},
        selection::{SelectionPolicy, UCB1Policy},
        simulation::{RandomPolicy, SimulationPolicy},
    },
    state::SearchState,
    stats::SearchStatistics,
    tree::{NodePath, NodeStats, SearchTree},
    utils, MCTSError, Result,
};

/// Callback invoked with `(completed, total)` rollouts
pub type ProgressCallback = Box<dyn FnMut(usize, usize) + Send>;

/// The main Monte Carlo Tree Search implementation
///
/// The engine owns the statistics table for one search run. Every rollout
/// starts from the root it was created with.
pub struct MCTS<S: SearchState> {
    /// Root state of the search
    root: S,

    /// Configuration for the search
    config: MCTSConfig,

    /// Statistics table keyed by state identity
    tree: SearchTree<S>,

    /// Statistics gathered during search
    statistics: SearchStatistics,

    /// Policy for selecting nodes during the selection phase
    selection_policy: Box<dyn SelectionPolicy>,

    /// Policy for playing out rollouts during the simulation phase
    simulation_policy: Box<dyn SimulationPolicy<S>>,

    /// Policy for backpropagating results
    backpropagation_policy: Box<dyn BackpropagationPolicy>,

    /// Random source shared by every playout
    rng: StdRng,

    /// Optional progress reporter
    progress: Option<ProgressCallback>,
}

impl<S: SearchState + 'static> MCTS<S> {
    /// Creates a new MCTS instance with the given root state and configuration
    pub fn new(root: S, config: MCTSConfig) -> Self {
        let selection_policy: Box<dyn SelectionPolicy> =
            Box::new(UCB1Policy::new(config.exploration_constant));

        let simulation_policy: Box<dyn SimulationPolicy<S>> = Box::new(RandomPolicy::new());

        let backpropagation_policy: Box<dyn BackpropagationPolicy> =
            Box::new(StandardPolicy::new());

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        MCTS {
            root,
            config,
            tree: SearchTree::new(),
            statistics: SearchStatistics::new(),
            selection_policy,
            simulation_policy,
            backpropagation_policy,
            rng,
            progress: None,
        }
    }

    /// Sets the selection policy to use
    pub fn with_selection_policy<P: SelectionPolicy + 'static>(mut self, policy: P) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Sets the simulation policy to use
    pub fn with_simulation_policy<P: SimulationPolicy<S> + 'static>(mut self, policy: P) -> Self {
        self.simulation_policy = Box::new(policy);
        self
    }

    /// Sets the backpropagation policy to use
    pub fn with_backpropagation_policy<P: BackpropagationPolicy + 'static>(
        mut self,
        policy: P,
    ) -> Self {
        self.backpropagation_policy = Box::new(policy);
        self
    }

    /// Sets a callback receiving `(completed, total)` after every rollout
    pub fn with_progress_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(usize, usize) + Send + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    /// The root state of the search
    pub fn root(&self) -> &S {
        &self.root
    }

    /// The configuration in use
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// The statistics table
    pub fn tree(&self) -> &SearchTree<S> {
        &self.tree
    }

    /// Statistics of a state, zero if it was never recorded
    pub fn stats(&self, state: &S) -> NodeStats {
        self.tree.stats(state)
    }

    /// Visit count of a state
    pub fn visits(&self, state: &S) -> u64 {
        self.tree.visits(state)
    }

    /// Runs the configured number of rollouts and returns the best child
    /// of the root
    pub fn search(&mut self) -> Result<S> {
        self.search_for_iterations(self.config.max_iterations)
    }

    /// Runs the search for the specified number of rollouts
    ///
    /// Statistics gathered by earlier calls are kept, so repeated calls
    /// keep refining the same tree. A terminal root fails with
    /// [`MCTSError::NoChildren`] before any rollout is attempted.
    pub fn search_for_iterations(&mut self, iterations: usize) -> Result<S> {
        self.config.validate()?;

        // Reset statistics
        self.statistics = SearchStatistics::new();

        if self.root.is_terminal() {
            return Err(MCTSError::NoChildren);
        }

        let start_time = Instant::now();
        let max_time = self.config.max_time;
        let progress_step = (iterations / 10).max(1);

        log::info!("Starting subgroup search with {} rollouts", iterations);

        // Main search loop
        for i in 0..iterations {
            // Check time constraints if set
            if let Some(max_duration) = max_time {
                if start_time.elapsed() >= max_duration {
                    self.statistics.stopped_early = true;
                    log::warn!("Search stopped early due to time limit after {} rollouts", i);
                    break;
                }
            }

            if i % progress_step == 0 {
                log::info!("{}% complete", i * 100 / iterations);
            }

            // Execute one rollout of MCTS
            self.execute_rollout()?;

            // Update stats
            self.statistics.iterations = i + 1;

            if let Some(progress) = self.progress.as_mut() {
                progress(i + 1, iterations);
            }
        }

        self.statistics.total_time = start_time.elapsed();
        self.statistics.tree_size = self.tree.len();
        log::info!(
            "{}% complete",
            self.statistics.iterations * 100 / iterations.max(1)
        );
        log::debug!("{}", self.statistics.summary());

        self.choose(&self.root)
    }

    /// Runs the search until `duration` elapses
    ///
    /// The rollout count is capped by `max_iterations`; if that is
    /// unbounded a cap of one million rollouts is used.
    pub fn search_for_time(&mut self, duration: Duration) -> Result<S> {
        let previous = self.config.max_time.replace(duration);

        // Keep a reasonable max iterations to prevent runaway search
        // if time checking fails for some reason
        let iterations = if self.config.max_iterations == usize::MAX {
            1_000_000
        } else {
            self.config.max_iterations
        };

        let result = self.search_for_iterations(iterations);
        self.config.max_time = previous;
        result
    }

    /// Execute a single rollout of the MCTS algorithm
    pub fn execute_rollout(&mut self) -> Result<()> {
        // 1. Selection phase
        let mut path = self.selection();

        // 2. Expansion phase
        let leaf = path.leaf().clone();
        self.expansion(&leaf);

        // 3. Simulation phase
        let playout = self.simulation_policy.simulate(&leaf, &mut self.rng)?;
        if playout.dead_end {
            self.statistics.dead_ends += 1;
            log::debug!(
                "Playout ended without children at depth {}",
                leaf.depth() + playout.trace.len()
            );
        } else {
            self.statistics.terminal_hits += 1;
        }
        path.extend(playout.trace);

        // 4. Backpropagation phase
        self.backpropagation(&path, playout.reward);

        Ok(())
    }

    /// Selection phase: descend through expanded states by UCB1
    ///
    /// Stops at the first state that is terminal, not yet expanded, or
    /// expanded without children.
    fn selection(&mut self) -> NodePath<S> {
        let mut path = NodePath::new(self.root.clone());
        let mut current = self.root.clone();

        while !current.is_terminal() && self.tree.is_expanded(&current) {
            let children = current.expand();
            if children.is_empty() {
                break;
            }

            let parent_stats = self.tree.stats(&current);
            let child_stats: Vec<NodeStats> =
                children.iter().map(|child| self.tree.stats(child)).collect();

            // Select the best child according to the selection policy
            let best_child_idx = self
                .selection_policy
                .select_child(&parent_stats, &child_stats);

            let next = children[best_child_idx].clone();
            path.push(next.clone());
            current = next;
        }

        self.statistics.max_depth = self.statistics.max_depth.max(path.depth());
        path
    }

    /// Expansion phase: register the children of the selected state
    fn expansion(&mut self, state: &S) {
        if state.is_terminal() || self.tree.is_expanded(state) {
            return;
        }

        let added = self.tree.register_children(state);
        log::trace!("Registered {} new states", added);
    }

    /// Backpropagation phase: update every state from the root to the end
    /// of the playout
    fn backpropagation(&mut self, path: &NodePath<S>, reward: f64) {
        for (depth, state) in path.states().iter().enumerate() {
            let stats = self.tree.entry(state);
            self.backpropagation_policy.update_stats(stats, depth, reward);
        }

        self.statistics.max_depth = self.statistics.max_depth.max(path.depth());
    }

    /// Returns the best child of `state` according to the configured criteria
    ///
    /// Only children with at least one visit are eligible; ties go to the
    /// earliest child. Fails with [`MCTSError::NoChildren`] if `state` is
    /// terminal or none of its children has been visited.
    pub fn choose(&self, state: &S) -> Result<S> {
        if state.is_terminal() {
            return Err(MCTSError::NoChildren);
        }

        let mut best: Option<(&S, f64)> = None;

        for child in state.expand() {
            let stats = match self.tree.get(child) {
                Some(stats) if stats.visits > 0 => stats,
                _ => continue,
            };

            let score = match self.config.best_child_criteria {
                BestChildCriteria::HighestValue => {
                    utils::choice_score(stats.total_reward, stats.visits)
                }
                BestChildCriteria::MostVisits => stats.visits as f64,
            };

            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child, score)),
            }
        }

        best.map(|(child, _)| child.clone())
            .ok_or(MCTSError::NoChildren)
    }

    /// Follows the best visited child from `state` down as far as possible
    ///
    /// This is the deterministic final rollout used to resolve a chosen
    /// state: the returned path starts at `state` and ends at a terminal
    /// state, a state without visited children, or a dead end.
    pub fn principal_path(&self, state: &S) -> Vec<S> {
        let mut path = vec![state.clone()];
        let mut current = state.clone();

        while let Ok(next) = self.choose(&current) {
            path.push(next.clone());
            current = next;
        }

        path
    }

    /// Returns the search statistics
    pub fn get_statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Forgets every statistic gathered so far
    ///
    /// Children memoized by the states themselves are kept: the root still
    /// holds every node built by earlier rollouts, views included. Build a
    /// fresh root and engine to release that memory.
    pub fn reset(&mut self) {
        self.tree.clear();
        self.statistics = SearchStatistics::new();
    }

    /// Returns a visualization of the visited part of the tree
    ///
    /// Only states with at least one visit are shown, down to `max_depth`
    /// levels below the root.
    pub fn visualize_tree(&self, max_depth: usize) -> String
    where
        S: std::fmt::Display,
    {
        let mut result = String::new();
        self.visualize_node(&self.root, 0, max_depth, &mut result);
        result
    }

    /// Helper method to visualize a node and its children
    fn visualize_node(&self, state: &S, depth: usize, max_depth: usize, output: &mut String)
    where
        S: std::fmt::Display,
    {
        let indent = "  ".repeat(depth);
        let stats = self.tree.stats(state);

        output.push_str(&format!(
            "{}{} (visits: {}, value: {:.3})\n",
            indent,
            state,
            stats.visits(),
            stats.value()
        ));

        if depth >= max_depth || !self.tree.is_expanded(state) {
            return;
        }

        for child in state.expand() {
            if self.tree.visits(child) > 0 {
                self.visualize_node(child, depth + 1, max_depth, output);
            }
        }
    }
}

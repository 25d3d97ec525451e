//! The immutable configuration record threaded through the orchestrator and
//! every heuristic entry point (Design Notes: "collect the globals into one
//! orchestrator-owned value"). One field per CLI flag in §6; `narwhal-cli`
//! is the only place that constructs one.

use std::time::Duration;

use crate::stats::ParetoPair;
use crate::weight::SentinelPolicy;

/// `-h NAME` main heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    Median,
    Barycenter,
    ModifiedBarycenter,
    StaticBarycenter,
    AltBarycenter,
    UpDownBarycenter,
    RotateBarycenter,
    SlabBarycenter,
    Mcn,
    Mce,
    MceS,
    Mse,
    Sifting,
}

/// `-p NAME` preprocessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preprocessor {
    Bfs,
    Dfs,
    Mds,
}

/// `-s OPT` sifting node order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiftingOrder {
    Layer,
    Degree,
    Random,
}

/// `-e OPT` mce stop rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MceStopRule {
    Nodes,
    Edges,
    Early,
    OneNode,
}

/// `-g OPT` sifting objective style (used by the `sifting` heuristic and by
/// mce/mce_s's endpoint reinsertion).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiftingObjective {
    Total,
    Max,
}

/// The fully-resolved, immutable run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub heuristic: Heuristic,
    pub preprocessor: Option<Preprocessor>,
    pub post_process: bool,
    pub max_iterations: Option<u64>,
    pub max_runtime: Option<Duration>,
    pub randomize_seed: Option<u64>,
    pub pareto_pair: ParetoPair,
    pub sentinel_policy: SentinelPolicy,
    pub balanced: bool,
    pub sifting_order: SiftingOrder,
    pub mce_stop_rule: MceStopRule,
    pub sifting_objective: SiftingObjective,
    pub capture_iteration: Option<u64>,
    pub snapshot_base: Option<String>,
    pub processor_count: usize,
    pub worker_count: usize,
    pub trace_frequency: i64,
    pub verbose: bool,
    pub favored_edges: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            heuristic: Heuristic::Barycenter,
            preprocessor: None,
            post_process: false,
            max_iterations: None,
            max_runtime: None,
            randomize_seed: None,
            pareto_pair: ParetoPair::BottleneckTotal,
            sentinel_policy: SentinelPolicy::None,
            balanced: false,
            sifting_order: SiftingOrder::Degree,
            mce_stop_rule: MceStopRule::Nodes,
            sifting_objective: SiftingObjective::Total,
            capture_iteration: None,
            snapshot_base: None,
            processor_count: 1,
            worker_count: 1,
            trace_frequency: 0,
            verbose: false,
            favored_edges: false,
        }
    }
}

impl Config {
    /// "Standard termination" (§4.J) applies only when neither an iteration
    /// cap nor a runtime cap has been configured.
    pub fn standard_termination(&self) -> bool {
        self.max_iterations.is_none() && self.max_runtime.is_none()
    }
}

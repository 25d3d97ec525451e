//! Best-so-far bookkeeping across the run's tracked objectives (component I):
//! one [`CrossingStats`] tracker per objective, a [`ParetoFrontier`] over a
//! configurable pair of them, and the two supplemented accumulators
//! ([`GraphStatistics`], [`FavoredEdgeCrossings`]) that the `-v`/`-f` flags
//! turn on.
//!
//! Grounded in `stats.c`/`stats.h`: `CROSSING_STATS_INT`/`_DOUBLE` become one
//! generic struct parameterized over the value type, `pareto_insert`'s
//! five-branch recursion is ported verbatim, and the degree-statistics block
//! of `print_graph_statistics` becomes [`GraphStatistics::compute`].

use crate::graph::{Graph, NodeId, OrderSnapshot};

/// A value a [`CrossingStats`] tracker can hold: crossing counts (`u32`) or
/// stretch totals (`f64`). `WORST` seeds `best`/`previous_best` so the first
/// observation always counts as an improvement.
pub trait StatValue: Copy + PartialOrd {
    const WORST: Self;
}

impl StatValue for u32 {
    const WORST: u32 = u32::MAX;
}

impl StatValue for f64 {
    const WORST: f64 = f64::MAX;
}

/// One objective's lifecycle: value at each pipeline stage transition, the
/// best value seen so far and the order that achieved it, and the bookkeeping
/// `has_improved` needs to detect stalls across pass boundaries.
#[derive(Debug, Clone)]
pub struct CrossingStats<T: StatValue> {
    pub name: &'static str,
    pub at_beginning: T,
    pub after_preprocessing: T,
    pub after_heuristic: T,
    pub after_post_processing: T,
    pub best: T,
    pub previous_best: T,
    pub best_heuristic_iteration: u64,
    pub post_processing_iteration: u64,
    pub best_order: OrderSnapshot,
}

impl<T: StatValue> CrossingStats<T> {
    pub fn new(name: &'static str) -> Self {
        CrossingStats {
            name,
            at_beginning: T::WORST,
            after_preprocessing: T::WORST,
            after_heuristic: T::WORST,
            after_post_processing: T::WORST,
            best: T::WORST,
            previous_best: T::WORST,
            best_heuristic_iteration: 0,
            post_processing_iteration: 0,
            best_order: OrderSnapshot::default(),
        }
    }

    pub fn capture_beginning(&mut self, value: T) {
        self.at_beginning = value;
    }

    pub fn capture_preprocessing(&mut self, value: T) {
        self.after_preprocessing = value;
    }

    pub fn capture_heuristic(&mut self, value: T) {
        self.after_heuristic = value;
    }

    pub fn capture_post_processing(&mut self, value: T, iteration: u64) {
        self.after_post_processing = value;
        self.post_processing_iteration = iteration;
    }

    /// 4.I `update_best_X`: if `value` beats `best`, overwrite `best`, record
    /// `iteration`, and overwrite `best_order` from `graph`'s current layout.
    pub fn update_best(&mut self, value: T, iteration: u64, graph: &Graph) -> bool {
        if value < self.best {
            self.best = value;
            self.best_heuristic_iteration = iteration;
            self.best_order.save(graph);
            true
        } else {
            false
        }
    }

    /// 4.I `has_improved_X`: side-effecting — copies `best` into
    /// `previous_best` every time it's called, regardless of the result.
    pub fn has_improved(&mut self) -> bool {
        let improved = self.best < self.previous_best;
        self.previous_best = self.best;
        improved
    }
}

/// One point on the Pareto frontier: the two tracked objective values and the
/// iteration at which the point was observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParetoPoint {
    pub first: i64,
    pub second: i64,
    pub iteration: u64,
}

/// Ordered list of points with strictly increasing `first` and strictly
/// decreasing `second` (4.I). `insert` is a direct port of `pareto_insert`'s
/// five-branch recursion over a singly-linked list, expressed over a slice.
#[derive(Debug, Clone, Default)]
pub struct ParetoFrontier {
    points: Vec<ParetoPoint>,
}

impl ParetoFrontier {
    pub fn points(&self) -> &[ParetoPoint] {
        &self.points
    }

    pub fn insert(&mut self, first: i64, second: i64, iteration: u64) {
        self.points = Self::insert_rec(&self.points, first, second, iteration);
    }

    fn insert_rec(list: &[ParetoPoint], first: i64, second: i64, iteration: u64) -> Vec<ParetoPoint> {
        let Some(&head) = list.first() else {
            return vec![ParetoPoint {
                first,
                second,
                iteration,
            }];
        };
        if first < head.first && second > head.second {
            let mut out = vec![ParetoPoint {
                first,
                second,
                iteration,
            }];
            out.extend_from_slice(list);
            out
        } else if first < head.first && second == head.second {
            let mut out = list.to_vec();
            out[0].first = first;
            out[0].iteration = iteration;
            out
        } else if first <= head.first && second < head.second {
            Self::insert_rec(&list[1..], first, second, iteration)
        } else if first > head.first && second < head.second {
            let mut out = vec![head];
            out.extend(Self::insert_rec(&list[1..], first, second, iteration));
            out
        } else {
            list.to_vec()
        }
    }
}

/// Which pair of objectives feeds the Pareto frontier (`-P` flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParetoPair {
    BottleneckTotal,
    StretchTotal,
    BottleneckStretch,
}

/// `-v` verbose graph statistics: size and degree-distribution summary,
/// computed once at startup. Grounded in `stats.c`'s degree-statistics
/// helpers (`compute_degree_statistics`/`print_degree_statistics`), which in
/// turn delegate min/median/mean/max to `Statistics.c`'s insertion-sorted
/// accumulator; `narwhal` inlines the equivalent arithmetic over a sorted
/// `Vec<usize>` rather than porting that class, since the accumulator is used
/// exactly once per run.
#[derive(Debug, Clone)]
pub struct GraphStatistics {
    pub graph_name: String,
    pub number_of_layers: usize,
    pub number_of_nodes: usize,
    pub isolated_nodes: usize,
    pub effective_nodes: usize,
    pub number_of_edges: usize,
    pub edge_density: f64,
    pub min_degree: usize,
    pub max_degree: usize,
    pub mean_degree: f64,
    pub median_degree: f64,
}

impl GraphStatistics {
    pub fn compute(graph: &Graph) -> Self {
        let number_of_nodes = graph.node_count();
        let number_of_edges = graph.edge_count();
        let mut degrees: Vec<usize> = graph.node_ids().map(|id| graph.node(id).degree()).collect();
        degrees.sort_unstable();
        let isolated_nodes = degrees.iter().filter(|&&d| d == 0).count();
        let effective_nodes = number_of_nodes - isolated_nodes;
        let sum: usize = degrees.iter().sum();
        let mean_degree = if number_of_nodes > 0 {
            sum as f64 / number_of_nodes as f64
        } else {
            0.0
        };
        let median_degree = median_of_sorted(&degrees);
        let min_degree = degrees.first().copied().unwrap_or(0);
        let max_degree = degrees.last().copied().unwrap_or(0);
        let edge_density = if number_of_nodes > 1 {
            number_of_edges as f64 / (number_of_nodes * (number_of_nodes - 1) / 2) as f64
        } else {
            0.0
        };
        GraphStatistics {
            graph_name: graph.name.clone(),
            number_of_layers: graph.layer_count(),
            number_of_nodes,
            isolated_nodes,
            effective_nodes,
            number_of_edges,
            edge_density,
            min_degree,
            max_degree,
            mean_degree,
            median_degree,
        }
    }
}

fn median_of_sorted(sorted: &[usize]) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    if n % 2 == 0 {
        let end_of_first_half = sorted[(n - 1) / 2];
        let start_of_second_half = sorted[n / 2];
        (end_of_first_half + start_of_second_half) as f64 / 2.0
    } else {
        sorted[n / 2] as f64
    }
}

/// `-f` favored edges: the auxiliary tracker built from the
/// descendants-and-ancestors edge set of a chosen node, grounded in
/// `priority_edges.c`'s `createFanoutList`/`upDFS`/`downDFS`. Those two
/// traversals reuse `Node::fixed` as their visited marker, so this must run
/// before any heuristic starts consuming `fixed` for its own protocol (mcn,
/// mce, mce_s, mse, modified_barycenter), exactly as the reference
/// implementation's own caveat requires.
#[derive(Debug, Clone, Default)]
pub struct FavoredEdgeCrossings {
    pub edges: Vec<crate::graph::EdgeId>,
}

impl FavoredEdgeCrossings {
    /// Builds the fanout list from the middle node of the middle layer:
    /// clears every node's `fixed` flag, walks upward from that node
    /// (`upDFS`, recording every traversed edge), walks downward
    /// (`downDFS`), then clears `fixed` again so the flag is left unused by
    /// later heuristics.
    pub fn from_middle_node(graph: &mut Graph) -> Self {
        graph.clear_fixed_nodes();
        let middle_layer = graph.layer_count() / 2;
        let middle_position = graph.layer(middle_layer).len() / 2;
        let Some(&start) = graph.layer(middle_layer).nodes.get(middle_position) else {
            return FavoredEdgeCrossings::default();
        };
        let mut edges = Vec::new();
        up_dfs(graph, start, &mut edges);
        down_dfs(graph, start, &mut edges);
        graph.clear_fixed_nodes();
        FavoredEdgeCrossings { edges }
    }

    pub fn crossings(&self, graph: &Graph) -> u32 {
        self.edges.iter().map(|&e| graph.edge(e).crossings).sum()
    }
}

fn up_dfs(graph: &mut Graph, node: NodeId, edges: &mut Vec<crate::graph::EdgeId>) {
    if graph.is_fixed_node(node) {
        return;
    }
    graph.fix_node(node);
    for &edge in &graph.node(node).up_edges.clone() {
        edges.push(edge);
        let up = graph.edge(edge).up_node;
        up_dfs(graph, up, edges);
    }
}

fn down_dfs(graph: &mut Graph, node: NodeId, edges: &mut Vec<crate::graph::EdgeId>) {
    if graph.is_fixed_node(node) {
        return;
    }
    graph.fix_node(node);
    for &edge in &graph.node(node).down_edges.clone() {
        edges.push(edge);
        let down = graph.edge(edge).down_node;
        down_dfs(graph, down, edges);
    }
}

/// All four mandatory objective trackers plus the Pareto frontier and the
/// optional favored-edges tracker, bundled the way the orchestrator owns
/// them for the run's lifetime.
#[derive(Debug, Clone)]
pub struct Stats {
    pub total_crossings: CrossingStats<u32>,
    pub bottleneck_crossings: CrossingStats<u32>,
    pub total_stretch: CrossingStats<f64>,
    pub bottleneck_stretch: CrossingStats<f64>,
    pub favored_edge_crossings: Option<CrossingStats<u32>>,
    pub pareto: ParetoFrontier,
    pub pareto_pair: ParetoPair,
}

impl Stats {
    pub fn new(pareto_pair: ParetoPair, track_favored_edges: bool) -> Self {
        Stats {
            total_crossings: CrossingStats::new("total_crossings"),
            bottleneck_crossings: CrossingStats::new("bottleneck_crossings"),
            total_stretch: CrossingStats::new("total_stretch"),
            bottleneck_stretch: CrossingStats::new("bottleneck_stretch"),
            favored_edge_crossings: track_favored_edges
                .then(|| CrossingStats::new("favored_edge_crossings")),
            pareto: ParetoFrontier::default(),
            pareto_pair,
        }
    }

    /// `update_best_all`: updates every tracker from the graph's current
    /// state and inserts the resulting point into the Pareto frontier.
    pub fn update_best_all(
        &mut self,
        graph: &Graph,
        iteration: u64,
        total_crossings: u32,
        bottleneck_crossings: u32,
        total_stretch: f64,
        bottleneck_stretch: f64,
        favored_edge_crossings: Option<u32>,
    ) {
        self.total_crossings
            .update_best(total_crossings, iteration, graph);
        self.bottleneck_crossings
            .update_best(bottleneck_crossings, iteration, graph);
        self.total_stretch
            .update_best(total_stretch, iteration, graph);
        self.bottleneck_stretch
            .update_best(bottleneck_stretch, iteration, graph);
        if let (Some(tracker), Some(value)) =
            (self.favored_edge_crossings.as_mut(), favored_edge_crossings)
        {
            tracker.update_best(value, iteration, graph);
        }

        let (first, second) = match self.pareto_pair {
            ParetoPair::BottleneckTotal => {
                (bottleneck_crossings as i64, total_crossings as i64)
            }
            ParetoPair::StretchTotal => (
                (total_stretch * 1000.0).round() as i64,
                total_crossings as i64,
            ),
            ParetoPair::BottleneckStretch => (
                bottleneck_crossings as i64,
                (total_stretch * 1000.0).round() as i64,
            ),
        };
        self.pareto.insert(first, second, iteration);
    }

    /// `no_improvement`: calls `has_improved` on every tracked objective
    /// without short-circuiting, since each call has a side effect that must
    /// run regardless of the others' results.
    pub fn no_improvement(&mut self) -> bool {
        let total = self.total_crossings.has_improved();
        let bottleneck = self.bottleneck_crossings.has_improved();
        let stretch = self.total_stretch.has_improved();
        let bottleneck_stretch = self.bottleneck_stretch.has_improved();
        let favored = self
            .favored_edge_crossings
            .as_mut()
            .map(|t| t.has_improved())
            .unwrap_or(false);
        !(total || bottleneck || stretch || bottleneck_stretch || favored)
    }
}

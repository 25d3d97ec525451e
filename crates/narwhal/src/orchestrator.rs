//! The orchestrator (component J): owns the graph, the crossings/stretch
//! indices, the stats bundle and the run's immutable configuration, and
//! drives the fixed pipeline from §4.J — load, preprocess, run the main
//! heuristic, optionally post-process, emit snapshots.
//!
//! Grounded in `heuristics.c`'s `main`/`run_heuristic`/`end_of_iteration`.
//! The reference implementation keeps `layers`, `iteration` and the stats
//! structs as module globals threaded implicitly through every function;
//! here they are fields of one value passed explicitly to every heuristic
//! entry point, per the Design Notes' "collect the globals" guidance.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::config::{Config, Heuristic, Preprocessor};
use crate::crossings::Crossings;
use crate::graph::{EdgeId, Graph, NodeId};
use crate::heuristics;
use crate::io::{SnapshotTag, snapshot_file_name};
use crate::preprocess;
use crate::stats::{FavoredEdgeCrossings, GraphStatistics, Stats};
use crate::stretch;

fn heuristic_name(h: Heuristic) -> &'static str {
    match h {
        Heuristic::Median => "median",
        Heuristic::Barycenter => "bary",
        Heuristic::ModifiedBarycenter => "mod_bary",
        Heuristic::StaticBarycenter => "static_bary",
        Heuristic::AltBarycenter => "alt_bary",
        Heuristic::UpDownBarycenter => "up_down_bary",
        Heuristic::RotateBarycenter => "rotate_bary",
        Heuristic::SlabBarycenter => "slab_bary",
        Heuristic::Mcn => "mcn",
        Heuristic::Mce => "mce",
        Heuristic::MceS => "mce_s",
        Heuristic::Mse => "mse",
        Heuristic::Sifting => "sifting",
    }
}

fn preprocessor_name(p: Preprocessor) -> &'static str {
    match p {
        Preprocessor::Bfs => "bfs",
        Preprocessor::Dfs => "dfs",
        Preprocessor::Mds => "mds",
    }
}

/// Owns the graph and every piece of per-run state the reference
/// implementation keeps as globals. `narwhal-cli` constructs one `Config`
/// and one `Graph`, builds an `Orchestrator`, and calls [`Orchestrator::run`].
pub struct Orchestrator {
    pub config: Config,
    pub graph: Graph,
    pub crossings: Crossings,
    pub stats: Stats,
    pub favored_edges: Option<FavoredEdgeCrossings>,
    pub graph_statistics: Option<GraphStatistics>,
    pub iteration: u64,
    /// The `(filename, contents)` pair produced when `-c ITER`'s iteration
    /// is reached, populated by [`Orchestrator::end_of_iteration`] and
    /// drained by `narwhal-cli` via [`Orchestrator::take_captured_snapshot`].
    captured_snapshot: Option<(String, String)>,
    start_time: Instant,
    rng: Option<ChaCha8Rng>,
}

/// What the orchestrator hands back once the pipeline completes: enough to
/// drive `-o`/`-v` CLI reporting without `narwhal` doing any file I/O itself.
pub struct RunReport {
    pub iterations: u64,
    pub final_total_crossings: u32,
}

impl Orchestrator {
    pub fn new(mut graph: Graph, config: Config) -> Self {
        let crossings = Crossings::init(&mut graph);
        let stats = Stats::new(config.pareto_pair, config.favored_edges);
        let rng = config.randomize_seed.map(ChaCha8Rng::seed_from_u64);
        Orchestrator {
            config,
            graph,
            crossings,
            stats,
            favored_edges: None,
            graph_statistics: None,
            iteration: 0,
            captured_snapshot: None,
            start_time: Instant::now(),
            rng,
        }
    }

    /// Takes the `-c ITER` snapshot captured during the run, if its
    /// iteration was reached. `narwhal-cli` is the one that writes it to
    /// disk, same as [`Orchestrator::emit_snapshots`]'s results.
    pub fn take_captured_snapshot(&mut self) -> Option<(String, String)> {
        self.captured_snapshot.take()
    }

    pub fn randomized(&self) -> bool {
        self.rng.is_some()
    }

    /// All node ids, in master-list order unless randomized tie-break is
    /// enabled, in which case the list is shuffled before every call — the
    /// reference implementation's "the list's identity afterward is
    /// undefined" contract (§4.D) is satisfied trivially since this returns
    /// a fresh `Vec` each time.
    pub fn node_scan_order(&mut self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.graph.node_ids().collect();
        if let Some(rng) = self.rng.as_mut() {
            ids.shuffle(rng);
        }
        ids
    }

    pub fn edge_scan_order(&mut self) -> Vec<EdgeId> {
        let mut ids: Vec<EdgeId> = self.graph.edge_ids().collect();
        if let Some(rng) = self.rng.as_mut() {
            ids.shuffle(rng);
        }
        ids
    }

    pub fn layer_scan_order(&mut self) -> Vec<usize> {
        let mut layers: Vec<usize> = (0..self.graph.layer_count()).collect();
        if let Some(rng) = self.rng.as_mut() {
            layers.shuffle(rng);
        }
        layers
    }

    fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Bottleneck (max-edge) crossings over every edge, ignoring `fixed` —
    /// the globally-reported objective, distinct from the `fixed`-aware scan
    /// `mce`/`mce_s` use to pick a local-search target.
    fn bottleneck_crossings(&self) -> u32 {
        let edges: Vec<EdgeId> = self.graph.edge_ids().collect();
        self.crossings.max_edge_crossings(&self.graph, &edges)
    }

    /// §4.J's `end_of_iteration`: emits a requested snapshot, updates every
    /// objective's best-so-far, advances the iteration counter, and reports
    /// whether an iteration or runtime cap has been hit. Every heuristic
    /// controller calls this after each local reorder and must stop
    /// promptly when it returns `true`.
    pub fn end_of_iteration(&mut self) -> bool {
        if self.config.capture_iteration == Some(self.iteration) {
            tracing::debug!(iteration = self.iteration, "snapshot capture point reached");
            let base = self.config.snapshot_base.clone().unwrap_or_else(|| {
                tracing::warn!("no output base name specified (-o), using \"temp\"");
                "temp".to_string()
            });
            let heuristic = heuristic_name(self.config.heuristic);
            let preprocessor = self.config.preprocessor.map(preprocessor_name);
            let filename = crate::io::capture_file_name(&base, preprocessor, heuristic, self.iteration);
            let contents = crate::io::write_graph_ord(&self.graph, heuristic);
            self.captured_snapshot = Some((filename, contents));
        }

        let total = self.crossings.total();
        let bottleneck = self.bottleneck_crossings();
        let stretch_total = stretch::total_stretch(&self.graph);
        let bottleneck_stretch = stretch::max_edge_stretch(&self.graph);
        let favored = self
            .favored_edges
            .as_ref()
            .map(|tracker| tracker.crossings(&self.graph));
        self.stats.update_best_all(
            &self.graph,
            self.iteration,
            total,
            bottleneck,
            stretch_total,
            bottleneck_stretch,
            favored,
        );

        if self.config.trace_frequency > 0
            && self.iteration % self.config.trace_frequency as u64 == 0
        {
            tracing::debug!(
                iteration = self.iteration,
                total_crossings = total,
                bottleneck_crossings = bottleneck,
                "iteration"
            );
        }

        self.iteration += 1;

        let hit_iteration_cap = self
            .config
            .max_iterations
            .is_some_and(|cap| self.iteration >= cap);
        let hit_runtime_cap = self.config.max_runtime.is_some_and(|cap| self.elapsed() >= cap);
        if hit_iteration_cap {
            tracing::info!(iteration = self.iteration, "iteration cap reached");
        }
        if hit_runtime_cap {
            tracing::info!(elapsed = ?self.elapsed(), "runtime cap reached");
        }
        hit_iteration_cap || hit_runtime_cap
    }

    fn trace_pass_boundary(&self, label: &str) {
        if self.config.trace_frequency >= 0 {
            tracing::info!(
                iteration = self.iteration,
                total_crossings = self.crossings.total(),
                "{label}"
            );
        }
    }

    /// "Standard termination" (§4.J): applies only when neither an
    /// iteration cap nor a runtime cap is configured, and stops a heuristic
    /// once every tracked objective has stalled since the last pass
    /// boundary. `Stats::no_improvement` evaluates every objective's
    /// `has_improved` without short-circuiting, since each has a
    /// side effect that must run regardless of the others' outcome.
    pub fn standard_termination_reached(&mut self) -> bool {
        self.config.standard_termination() && self.stats.no_improvement()
    }

    /// Builds the five `BASE-PRE+HEUR[_TAG].ord` snapshot files (§6) from
    /// each objective's current best-so-far order. Returns `(filename,
    /// contents)` pairs; `narwhal-cli` is the one that writes them to disk.
    pub fn emit_snapshots(&self, base: &str) -> Vec<(String, String)> {
        let heuristic = heuristic_name(self.config.heuristic);
        let preprocessor = self.config.preprocessor.map(preprocessor_name);
        let entries = [
            (SnapshotTag::TotalCrossings, &self.stats.total_crossings.best_order),
            (
                SnapshotTag::PostProcessedTotalCrossings,
                &self.stats.total_crossings.best_order,
            ),
            (
                SnapshotTag::BottleneckCrossings,
                &self.stats.bottleneck_crossings.best_order,
            ),
            (SnapshotTag::TotalStretch, &self.stats.total_stretch.best_order),
            (
                SnapshotTag::BottleneckStretch,
                &self.stats.bottleneck_stretch.best_order,
            ),
        ];
        entries
            .into_iter()
            .map(|(tag, snapshot)| {
                let filename = snapshot_file_name(base, preprocessor, heuristic, tag);
                let layers: Vec<Vec<&str>> = snapshot
                    .layers()
                    .iter()
                    .map(|ids| {
                        ids.iter()
                            .map(|&id| self.graph.node(id).name.as_str())
                            .collect()
                    })
                    .collect();
                let contents = crate::io::ord::write_ord(&self.graph.name, heuristic, &layers);
                (filename, contents)
            })
            .collect()
    }

    /// The fixed pipeline (§4.J): initialize → update all crossings →
    /// capture_beginning → preprocess → update all crossings →
    /// capture_preprocessing → `end_of_iteration()` (iteration-0 boundary)
    /// → heuristic → capture_heuristic → optional post-processing →
    /// capture_post_processing. If the iteration-0 boundary already reports
    /// a cap reached (e.g. `-i 0`), the heuristic and post-processing steps
    /// are skipped entirely: per scenario (f), a cap hit at that boundary
    /// must perform zero layer sorts.
    pub fn run(&mut self) -> RunReport {
        if self.config.verbose {
            let stats = GraphStatistics::compute(&self.graph);
            tracing::info!(?stats, "graph statistics");
            self.graph_statistics = Some(stats);
        }
        if self.config.favored_edges {
            self.favored_edges = Some(FavoredEdgeCrossings::from_middle_node(&mut self.graph));
        }

        self.crossings.update_all(&mut self.graph);
        self.capture_stage(Stage::Beginning);

        if let Some(preprocessor) = self.config.preprocessor {
            match preprocessor {
                Preprocessor::Bfs => preprocess::bfs(&mut self.graph),
                Preprocessor::Dfs => preprocess::dfs(&mut self.graph),
                Preprocessor::Mds => preprocess::mds(&mut self.graph),
            }
        }
        self.crossings.update_all(&mut self.graph);
        self.capture_stage(Stage::Preprocessing);
        self.trace_pass_boundary("preprocessing complete");
        let cap_already_reached = self.end_of_iteration();

        if !cap_already_reached {
            heuristics::run(self);
        }
        self.capture_stage(Stage::Heuristic);
        self.trace_pass_boundary("heuristic complete");

        if !cap_already_reached && self.config.post_process {
            let best = self.stats.total_crossings.best_order.clone();
            best.restore(&mut self.graph);
            self.crossings.update_all(&mut self.graph);
            heuristics::post_process(self);
        }
        let post_processing_total = self.crossings.total();
        self.stats
            .total_crossings
            .capture_post_processing(post_processing_total, self.iteration);
        self.stats
            .bottleneck_crossings
            .capture_post_processing(self.bottleneck_crossings(), self.iteration);
        self.stats.total_stretch.capture_post_processing(
            stretch::total_stretch(&self.graph),
            self.iteration,
        );
        self.stats.bottleneck_stretch.capture_post_processing(
            stretch::max_edge_stretch(&self.graph),
            self.iteration,
        );
        self.trace_pass_boundary("post-processing complete");

        RunReport {
            iterations: self.iteration,
            final_total_crossings: post_processing_total,
        }
    }

    fn capture_stage(&mut self, stage: Stage) {
        let total = self.crossings.total();
        let bottleneck = self.bottleneck_crossings();
        let stretch_total = stretch::total_stretch(&self.graph);
        let bottleneck_stretch = stretch::max_edge_stretch(&self.graph);
        match stage {
            Stage::Beginning => {
                self.stats.total_crossings.capture_beginning(total);
                self.stats.bottleneck_crossings.capture_beginning(bottleneck);
                self.stats.total_stretch.capture_beginning(stretch_total);
                self.stats
                    .bottleneck_stretch
                    .capture_beginning(bottleneck_stretch);
            }
            Stage::Preprocessing => {
                self.stats.total_crossings.capture_preprocessing(total);
                self.stats
                    .bottleneck_crossings
                    .capture_preprocessing(bottleneck);
                self.stats
                    .total_stretch
                    .capture_preprocessing(stretch_total);
                self.stats
                    .bottleneck_stretch
                    .capture_preprocessing(bottleneck_stretch);
            }
            Stage::Heuristic => {
                self.stats.total_crossings.capture_heuristic(total);
                self.stats.bottleneck_crossings.capture_heuristic(bottleneck);
                self.stats.total_stretch.capture_heuristic(stretch_total);
                self.stats
                    .bottleneck_stretch
                    .capture_heuristic(bottleneck_stretch);
            }
        }
    }
}

enum Stage {
    Beginning,
    Preprocessing,
    Heuristic,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Heuristic;
    use crate::graph::Graph;

    fn k33() -> Graph {
        let mut g = Graph::new("k33", 2);
        let a = g.add_node("a", 0);
        let b = g.add_node("b", 0);
        let c = g.add_node("c", 0);
        let x = g.add_node("x", 1);
        let y = g.add_node("y", 1);
        let z = g.add_node("z", 1);
        for &up in &[x, y, z] {
            for &down in &[a, b, c] {
                g.add_edge(up, down);
            }
        }
        g
    }

    #[test]
    fn barycenter_run_never_worsens_k33() {
        let mut config = Config::default();
        config.heuristic = Heuristic::Barycenter;
        let mut orch = Orchestrator::new(k33(), config);
        let report = orch.run();
        assert!(report.final_total_crossings <= 9);
    }

    #[test]
    fn iteration_cap_zero_skips_the_heuristic_entirely() {
        // K3,3's complete bipartite symmetry means a barycenter pass can
        // leave total crossings unchanged even if it runs, so that
        // assertion alone can't catch a missing cap check (scenario (f)).
        // Build a graph whose first barycenter sort would visibly reorder
        // a layer, and assert that order is untouched under `-i 0`.
        let mut g = Graph::new("cap0", 2);
        let a = g.add_node("a", 0);
        let b = g.add_node("b", 0);
        let x = g.add_node("x", 1);
        let y = g.add_node("y", 1);
        g.add_edge(x, b);
        g.add_edge(y, a);
        let initial_order: Vec<NodeId> = g.layer(1).nodes.clone();

        let mut config = Config::default();
        config.heuristic = Heuristic::Barycenter;
        config.max_iterations = Some(0);
        let mut orch = Orchestrator::new(g, config);
        orch.run();

        assert_eq!(
            orch.stats.total_crossings.after_heuristic,
            orch.stats.total_crossings.after_preprocessing
        );
        assert_eq!(
            orch.graph.layer(1).nodes, initial_order,
            "no layer sort should run when the iteration cap is already reached at the iteration-0 boundary"
        );
    }

    #[test]
    fn mcn_resolves_a_single_crossing() {
        let mut g = Graph::new("cross", 2);
        let a = g.add_node("a", 0);
        let b = g.add_node("b", 0);
        let x = g.add_node("x", 1);
        let y = g.add_node("y", 1);
        g.add_edge(y, a);
        g.add_edge(x, b);
        let mut config = Config::default();
        config.heuristic = Heuristic::Mcn;
        let mut orch = Orchestrator::new(g, config);
        let report = orch.run();
        assert_eq!(report.final_total_crossings, 0);
    }
}

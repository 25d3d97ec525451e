//! Heuristic controllers (component H): the main `-h` dispatch plus the
//! post-processing adjacent-swap pass `-P` turns on. Every controller drives
//! itself via `orch.end_of_iteration()`, stopping the instant it reports a
//! cap has been hit, and (absent a cap) via `orch.standard_termination_reached()`.
//!
//! Grounded directly in `heuristics.c`: `median`/`barycenter` share one sweep
//! loop, the four `static`/`alt`/`up_down`/`rotate`/`slab` variants share one
//! "sort set" primitive run as a synchronous oracle (§5), `mcn`/`mce`/`mce_s`/
//! `mse` share one greedy-selection-and-sift loop parameterized by what they
//! select and how they sift, and `sifting` alternates node-visitation order.

use crate::config::{Heuristic, MceStopRule, SiftingObjective, SiftingOrder};
use crate::graph::{EdgeId, Graph, NodeId};
use crate::orchestrator::Orchestrator;
use crate::sift;
use crate::sort::sort_by_degree;
use crate::stretch;
use crate::weight::{self, Orientation};

const MAX_FAILS: u32 = 1;

pub fn run(orch: &mut Orchestrator) {
    match orch.config.heuristic {
        Heuristic::Median => sweep(orch, true),
        Heuristic::Barycenter => sweep(orch, false),
        Heuristic::ModifiedBarycenter => modified_barycenter(orch),
        Heuristic::StaticBarycenter => static_barycenter(orch),
        Heuristic::AltBarycenter => alt_barycenter(orch),
        Heuristic::UpDownBarycenter => up_down_barycenter(orch),
        Heuristic::RotateBarycenter => rotate_barycenter(orch),
        Heuristic::SlabBarycenter => slab_barycenter(orch),
        Heuristic::Mcn => mcn(orch),
        Heuristic::Mce => mce(orch, MceObjective::MaxEdge),
        Heuristic::MceS => mce(orch, MceObjective::TotalCrossings),
        Heuristic::Mse => mse(orch),
        Heuristic::Sifting => sifting(orch),
    }
}

/// Assigns weight to every node on `layer` (median or barycenter, per
/// `median`), layer-sorts it, recomputes the adjacent channels, and reports
/// the orchestrator's stop signal.
fn reorder_layer(orch: &mut Orchestrator, layer: usize, orientation: Orientation, median: bool) -> bool {
    if median {
        weight::median_weights(&mut orch.graph, layer, orientation, orch.config.sentinel_policy);
    } else {
        weight::barycenter_weights(
            &mut orch.graph,
            layer,
            orientation,
            orch.config.balanced,
            orch.config.sentinel_policy,
            false,
        );
    }
    crate::sort::layer_sort(&mut orch.graph, layer);
    orch.crossings.update_for_layer(&mut orch.graph, layer);
    orch.end_of_iteration()
}

/// Sweeps layers 1..L-1 top-down, pulling each toward its already-settled
/// upper neighbor.
fn upward_sweep(orch: &mut Orchestrator, median: bool) -> bool {
    for layer in 1..orch.graph.layer_count() {
        if reorder_layer(orch, layer, Orientation::Downward, median) {
            return true;
        }
    }
    false
}

/// Sweeps layers L-2..=0 bottom-up, pulling each toward its already-settled
/// lower neighbor.
fn downward_sweep(orch: &mut Orchestrator, median: bool) -> bool {
    for layer in (0..orch.graph.layer_count().saturating_sub(1)).rev() {
        if reorder_layer(orch, layer, Orientation::Upward, median) {
            return true;
        }
    }
    false
}

/// `median`/`barycenter`: alternate upward and downward sweeps until no
/// tracked objective improves across a full up-down pass (or a cap is hit).
fn sweep(orch: &mut Orchestrator, median: bool) {
    loop {
        if upward_sweep(orch, median) || downward_sweep(orch, median) {
            return;
        }
        if orch.standard_termination_reached() {
            return;
        }
    }
}

/// `modified_barycenter`: repeatedly picks the worst non-fixed layer,
/// reorders it with both-direction barycenter weights, fixes it, then
/// sweeps every layer above it downward and every layer below it upward
/// before picking the next worst layer. Fixed layers are cleared at the
/// start of each outer round.
fn modified_barycenter(orch: &mut Orchestrator) {
    loop {
        orch.graph.clear_fixed_layers();
        loop {
            let order = orch.layer_scan_order();
            let Some(layer) = orch.crossings.max_layer(&orch.graph, &order) else {
                break;
            };
            if reorder_layer(orch, layer, Orientation::Both, false) {
                return;
            }
            orch.graph.layers[layer].fixed = true;
            for above in (layer + 1)..orch.graph.layer_count() {
                if reorder_layer(orch, above, Orientation::Downward, false) {
                    return;
                }
            }
            for below in (0..layer).rev() {
                if reorder_layer(orch, below, Orientation::Upward, false) {
                    return;
                }
            }
        }
        if orch.standard_termination_reached() {
            return;
        }
    }
}

/// Runs one synchronous "sort set" pass (Design Notes §5): computes every
/// layer's weights from a snapshot of positions taken before any of them are
/// resorted, then applies the resorts — in chunks of `processor_count`
/// layers at a time (0 meaning "one chunk, the whole set"), capturing an
/// iteration after each chunk. Returns `true` if the orchestrator signaled a
/// stop partway through.
fn run_sort_set(orch: &mut Orchestrator, set: &[usize], orientation: Orientation) -> bool {
    for &layer in set {
        weight::barycenter_weights(
            &mut orch.graph,
            layer,
            orientation,
            orch.config.balanced,
            orch.config.sentinel_policy,
            true,
        );
    }
    let chunk_size = if orch.config.processor_count == 0 {
        set.len().max(1)
    } else {
        orch.config.processor_count
    };
    for chunk in set.chunks(chunk_size) {
        for &layer in chunk {
            crate::sort::layer_sort(&mut orch.graph, layer);
            orch.crossings.update_for_layer(&mut orch.graph, layer);
        }
        if orch.end_of_iteration() {
            return true;
        }
    }
    false
}

fn all_layers(graph: &Graph) -> Vec<usize> {
    (0..graph.layer_count()).collect()
}

fn layers_with_parity(graph: &Graph, parity: usize) -> Vec<usize> {
    (0..graph.layer_count()).filter(|l| l % 2 == parity).collect()
}

/// `static`: every pass is one synchronous sort set over every layer with
/// Both-direction weights.
fn static_barycenter(orch: &mut Orchestrator) {
    loop {
        let set = all_layers(&orch.graph);
        if run_sort_set(orch, &set, Orientation::Both) {
            return;
        }
        if orch.standard_termination_reached() {
            return;
        }
    }
}

/// `alt`: the sort set alternates between odd- and even-indexed layers each
/// pass, orientation fixed at Both.
fn alt_barycenter(orch: &mut Orchestrator) {
    let mut parity = 0usize;
    loop {
        let set = layers_with_parity(&orch.graph, parity);
        if run_sort_set(orch, &set, Orientation::Both) {
            return;
        }
        parity = 1 - parity;
        if orch.standard_termination_reached() {
            return;
        }
    }
}

/// `up_down`: both the sort set's parity and its orientation (Downward then
/// Upward) alternate together each pass.
fn up_down_barycenter(orch: &mut Orchestrator) {
    let mut parity = 0usize;
    loop {
        let orientation = if parity == 0 {
            Orientation::Downward
        } else {
            Orientation::Upward
        };
        let set = layers_with_parity(&orch.graph, parity);
        if run_sort_set(orch, &set, orientation) {
            return;
        }
        parity = 1 - parity;
        if orch.standard_termination_reached() {
            return;
        }
    }
}

/// `rotate`: orientation cycles Downward -> Upward -> Both while the sort
/// set's parity toggles every pass, independently.
fn rotate_barycenter(orch: &mut Orchestrator) {
    const ORIENTATIONS: [Orientation; 3] = [Orientation::Downward, Orientation::Upward, Orientation::Both];
    let mut pass = 0usize;
    loop {
        let orientation = ORIENTATIONS[pass % 3];
        let set = layers_with_parity(&orch.graph, pass % 2);
        if run_sort_set(orch, &set, orientation) {
            return;
        }
        pass += 1;
        if orch.standard_termination_reached() {
            return;
        }
    }
}

/// `slab`: partitions the layers into contiguous slabs of `ceil(L / P)`
/// layers each (`P = max(processor_count, 2)`), then advances one "active
/// offset" at a time — one layer per slab, all reordered in the same
/// synchronous sort set — sweeping offsets upward with Downward orientation
/// (mirroring an upward sweep: each slab's current layer pulled toward its
/// lower, already-settled neighbor) and then sweeping back down with Upward
/// orientation.
fn slab_barycenter(orch: &mut Orchestrator) {
    loop {
        let processors = orch.config.processor_count.max(2);
        let layer_count = orch.graph.layer_count();
        if layer_count == 0 {
            return;
        }
        let slab_size = layer_count.div_ceil(processors);
        let slab_starts: Vec<usize> = (0..layer_count).step_by(slab_size).collect();

        for offset in 0..slab_size {
            let set: Vec<usize> = slab_starts
                .iter()
                .filter_map(|&start| {
                    let layer = start + offset;
                    (layer < layer_count).then_some(layer)
                })
                .collect();
            if run_sort_set(orch, &set, Orientation::Downward) {
                return;
            }
        }
        for offset in (0..slab_size).rev() {
            let set: Vec<usize> = slab_starts
                .iter()
                .filter_map(|&start| {
                    let layer = start + offset;
                    (layer < layer_count).then_some(layer)
                })
                .collect();
            if run_sort_set(orch, &set, Orientation::Upward) {
                return;
            }
        }
        if orch.standard_termination_reached() {
            return;
        }
    }
}

/// `mcn`: repeatedly sifts the worst non-fixed node (total-crossings
/// objective) and fixes it, clearing every node's fixed flag at the start of
/// each outer round.
fn mcn(orch: &mut Orchestrator) {
    loop {
        orch.graph.clear_fixed_nodes();
        loop {
            let order = orch.node_scan_order();
            let Some(node) = orch.crossings.max_node(&orch.graph, &order) else {
                break;
            };
            sift::sift(&mut orch.graph, &mut orch.crossings, node);
            orch.graph.fix_node(node);
            if orch.end_of_iteration() {
                return;
            }
        }
        if orch.standard_termination_reached() {
            return;
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum MceObjective {
    MaxEdge,
    TotalCrossings,
}

fn apply_endpoint_sift(orch: &mut Orchestrator, objective: MceObjective, edge: EdgeId, node: NodeId) {
    match objective {
        MceObjective::MaxEdge => {
            sift::sift_node_for_edge_crossings(&mut orch.graph, &mut orch.crossings, edge, node)
        }
        MceObjective::TotalCrossings => sift::sift(&mut orch.graph, &mut orch.crossings, node),
    }
}

/// `mce`/`mce_s`: repeatedly selects the worst non-fixed edge and sifts its
/// endpoints, per the four `-e` stop rules (§4.H): `Early` skips an edge
/// whose endpoints are already both fixed instead of processing it again;
/// `OneNode` sifts only the endpoint with more of its own crossings, not
/// both; `Nodes`/`Edges` sift every unfixed endpoint. `mce` sifts by max edge
/// crossings, `mce_s` by total crossings — selected via `objective`.
fn mce(orch: &mut Orchestrator, objective: MceObjective) {
    loop {
        orch.graph.clear_fixed_nodes();
        orch.graph.clear_fixed_edges();
        loop {
            let order = orch.edge_scan_order();
            let Some(edge) = orch.crossings.max_edge(&orch.graph, &order) else {
                break;
            };
            let up = orch.graph.edge(edge).up_node;
            let down = orch.graph.edge(edge).down_node;
            let up_fixed = orch.graph.is_fixed_node(up);
            let down_fixed = orch.graph.is_fixed_node(down);

            if orch.config.mce_stop_rule == MceStopRule::Early && up_fixed && down_fixed {
                orch.graph.fix_edge(edge);
                continue;
            }

            if orch.config.mce_stop_rule == MceStopRule::OneNode && !up_fixed && !down_fixed {
                let up_crossings = orch.graph.node(up).crossings();
                let down_crossings = orch.graph.node(down).crossings();
                let node = if up_crossings >= down_crossings { up } else { down };
                apply_endpoint_sift(orch, objective, edge, node);
            } else {
                if !up_fixed {
                    apply_endpoint_sift(orch, objective, edge, up);
                }
                if !down_fixed {
                    apply_endpoint_sift(orch, objective, edge, down);
                }
            }

            orch.graph.fix_node(up);
            orch.graph.fix_node(down);
            orch.graph.fix_edge(edge);
            if orch.end_of_iteration() {
                return;
            }

            let done = match orch.config.mce_stop_rule {
                MceStopRule::Edges => orch.graph.edge_ids().all(|e| orch.graph.is_fixed_edge(e)),
                _ => orch.graph.all_nodes_fixed(),
            };
            if done {
                break;
            }
        }
        if orch.standard_termination_reached() {
            return;
        }
    }
}

/// `mse`: the stretch analogue of `mce`/`mce_s` — selects the worst non-fixed
/// edge by stretch rather than crossings, and sifts endpoints for total
/// stretch rather than crossings.
fn mse(orch: &mut Orchestrator) {
    loop {
        orch.graph.clear_fixed_nodes();
        orch.graph.clear_fixed_edges();
        loop {
            let order = orch.edge_scan_order();
            let Some(edge) = stretch::max_stretch_edge(&orch.graph, &order) else {
                break;
            };
            let up = orch.graph.edge(edge).up_node;
            let down = orch.graph.edge(edge).down_node;
            let up_fixed = orch.graph.is_fixed_node(up);
            let down_fixed = orch.graph.is_fixed_node(down);

            if orch.config.mce_stop_rule == MceStopRule::Early && up_fixed && down_fixed {
                orch.graph.fix_edge(edge);
                continue;
            }

            if orch.config.mce_stop_rule == MceStopRule::OneNode && !up_fixed && !down_fixed {
                let up_crossings = orch.graph.node(up).crossings();
                let down_crossings = orch.graph.node(down).crossings();
                let node = if up_crossings >= down_crossings { up } else { down };
                sift::sift_node_for_total_stretch(&mut orch.graph, &mut orch.crossings, node);
            } else {
                if !up_fixed {
                    sift::sift_node_for_total_stretch(&mut orch.graph, &mut orch.crossings, up);
                }
                if !down_fixed {
                    sift::sift_node_for_total_stretch(&mut orch.graph, &mut orch.crossings, down);
                }
            }

            orch.graph.fix_node(up);
            orch.graph.fix_node(down);
            orch.graph.fix_edge(edge);
            if orch.end_of_iteration() {
                return;
            }

            let done = match orch.config.mce_stop_rule {
                MceStopRule::Edges => orch.graph.edge_ids().all(|e| orch.graph.is_fixed_edge(e)),
                _ => orch.graph.all_nodes_fixed(),
            };
            if done {
                break;
            }
        }
        if orch.standard_termination_reached() {
            return;
        }
    }
}

/// Picks `node`'s incident edge with the highest current crossing count;
/// used by [`sift_objective`] when `-g max` is in effect.
fn node_worst_incident_edge(graph: &Graph, node: NodeId) -> Option<EdgeId> {
    graph
        .node(node)
        .up_edges
        .iter()
        .chain(graph.node(node).down_edges.iter())
        .copied()
        .max_by_key(|&e| graph.edge(e).crossings)
}

fn sift_objective(orch: &mut Orchestrator, node: NodeId) {
    match orch.config.sifting_objective {
        SiftingObjective::Total => sift::sift(&mut orch.graph, &mut orch.crossings, node),
        SiftingObjective::Max => {
            if let Some(edge) = node_worst_incident_edge(&orch.graph, node) {
                sift::sift_node_for_edge_crossings(&mut orch.graph, &mut orch.crossings, edge, node);
            }
        }
    }
}

/// `sifting`: visits every node once per pass in an order selected by `-s`
/// (`Layer` = node-id order, `Degree` = ascending degree with the direction
/// reversed every other pass, `Random` = freshly shuffled every pass),
/// sifting each. Stops after `MAX_FAILS` consecutive passes with no
/// improvement in total crossings.
fn sifting(orch: &mut Orchestrator) {
    let mut decreasing = false;
    let mut consecutive_fails = 0u32;
    loop {
        let mut order = orch.node_scan_order();
        if orch.config.sifting_order == SiftingOrder::Degree {
            sort_by_degree(&orch.graph, &mut order);
            if decreasing {
                order.reverse();
            }
        }

        let pass_start_total = orch.crossings.total();
        for node in order {
            sift_objective(orch, node);
            if orch.end_of_iteration() {
                return;
            }
        }

        let improved = orch.crossings.total() < pass_start_total;
        decreasing = !decreasing;
        consecutive_fails = if improved { 0 } else { consecutive_fails + 1 };

        if orch.standard_termination_reached() && consecutive_fails >= MAX_FAILS {
            return;
        }
    }
}

fn swap_adjacent(graph: &mut Graph, layer: usize, i: usize) {
    let mut nodes = graph.layer(layer).nodes.clone();
    nodes.swap(i, i + 1);
    graph.set_layer_order(layer, nodes);
    graph.update_node_positions(layer);
}

/// `-P` post-processing: repeated odd/even double-passes of adjacent-swap
/// local search (`swap.c`'s `post_processing`). Within each parity, every
/// disjoint adjacent pair on every layer of that parity is compared (via
/// [`sift::node_crossings`]'s crossing delta) and swapped if doing so strictly
/// reduces the pair's own contribution; after both parities, the real
/// crossing counts are recomputed once and one iteration is captured. Stops
/// once a full double-pass makes no swap at all.
pub fn post_process(orch: &mut Orchestrator) {
    loop {
        let mut improved_any = false;
        for parity in 0..2 {
            for layer in 0..orch.graph.layer_count() {
                if layer % 2 != parity {
                    continue;
                }
                let len = orch.graph.layer(layer).len();
                let mut i = parity;
                while i + 1 < len {
                    let nodes = orch.graph.layer(layer).nodes.clone();
                    let left = nodes[i];
                    let right = nodes[i + 1];
                    let forward = sift::node_crossings(&mut orch.graph, left, right) as i64;
                    let backward = sift::node_crossings(&mut orch.graph, right, left) as i64;
                    if backward < forward {
                        swap_adjacent(&mut orch.graph, layer, i);
                        improved_any = true;
                    }
                    i += 2;
                }
            }
        }
        orch.crossings.update_all(&mut orch.graph);
        if orch.end_of_iteration() {
            return;
        }
        if !improved_any {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::graph::Graph;
    use crate::orchestrator::Orchestrator;

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
    fn sifting_heuristic_never_worsens_k33() {
        let mut config = Config::default();
        config.heuristic = Heuristic::Sifting;
        let mut orch = Orchestrator::new(k33(), config);
        let before = orch.crossings.total();
        run(&mut orch);
        assert!(orch.crossings.total() <= before);
    }

    #[test]
    fn static_barycenter_never_worsens_k33() {
        let mut config = Config::default();
        config.heuristic = Heuristic::StaticBarycenter;
        config.processor_count = 0;
        let mut orch = Orchestrator::new(k33(), config);
        let before = orch.crossings.total();
        run(&mut orch);
        assert!(orch.crossings.total() <= before);
    }

    #[test]
    fn post_processing_resolves_two_parallel_swapped_edges() {
        let mut g = Graph::new("two-parallel", 2);
        let a = g.add_node("a", 0);
        let b = g.add_node("b", 0);
        let x = g.add_node("x", 1);
        let y = g.add_node("y", 1);
        g.add_edge(y, a);
        g.add_edge(x, b);
        let config = Config::default();
        let mut orch = Orchestrator::new(g, config);
        assert_eq!(orch.crossings.total(), 1);
        post_process(&mut orch);
        assert_eq!(orch.crossings.total(), 0);
    }

    #[test]
    fn mcn_never_worsens_k33() {
        let mut config = Config::default();
        config.heuristic = Heuristic::Mcn;
        let mut orch = Orchestrator::new(k33(), config);
        let before = orch.crossings.total();
        run(&mut orch);
        assert!(orch.crossings.total() <= before);
    }
}

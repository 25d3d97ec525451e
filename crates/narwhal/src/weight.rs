//! Node weight assignment for the sweep heuristics (component F):
//! barycenter (average neighbor position) and median (median neighbor
//! position), each directional (`Upward`/`Downward`) or combining both
//! sides, plus the sentinel-resolution policies applied when a node has no
//! neighbors in the requested direction.
//!
//! A node with no neighbors in the requested direction gets [`Weight::Missing`]
//! unless [`SentinelPolicy::None`] is in effect (which places it at position
//! zero, i.e. the far left) or the node is isolated outright (no edges at
//! all), which is always placed leftmost regardless of policy. `Left`/`Avg`
//! then resolve the remaining `Missing` weights in a second, layer-wide pass
//! — a node can't be resolved from its own neighbors, only from its
//! neighbors *on the layer*, so this has to happen after every node's first
//! pass weight is known.

use crate::graph::{Graph, NodeId, Weight};
use crate::sort::{sort_by_down_node_position, sort_by_up_node_position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Upward,
    Downward,
    Both,
}

/// How a layer-wide pass resolves nodes left with [`Weight::Missing`] after
/// the per-node computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelPolicy {
    /// Leave unresolved nodes at position zero; never actually produces
    /// `Missing` in the first place (see [`barycenter_node_weight`]).
    None,
    /// Copy the nearest resolved neighbor's weight to the left.
    Left,
    /// Average the two layer-neighbors' weights (or take whichever one is
    /// resolved, if only one is).
    Avg,
}

fn is_isolated(graph: &Graph, node: NodeId) -> bool {
    graph.node(node).degree() == 0
}

/// Barycenter weight: the average position of `node`'s neighbors in the
/// given direction (or both, unweighted pool of positions).
pub fn barycenter_node_weight(
    graph: &mut Graph,
    node: NodeId,
    orientation: Orientation,
    sentinel_policy: SentinelPolicy,
) {
    let mut total_degree = 0usize;
    let mut total_of_positions = 0usize;
    if orientation != Orientation::Upward {
        for &edge in &graph.node(node).down_edges {
            total_of_positions += graph.node(graph.edge(edge).down_node).position;
        }
        total_degree += graph.node(node).down_degree();
    }
    if orientation != Orientation::Downward {
        for &edge in &graph.node(node).up_edges {
            total_of_positions += graph.node(graph.edge(edge).up_node).position;
        }
        total_degree += graph.node(node).up_degree();
    }
    let weight = if total_degree > 0 {
        Weight::Value(total_of_positions as f64 / total_degree as f64)
    } else if sentinel_policy == SentinelPolicy::None || is_isolated(graph, node) {
        Weight::Value(0.0)
    } else {
        Weight::Missing
    };
    graph.node_mut(node).weight = weight;
}

/// Balanced two-sided barycenter: `(downward_average + upward_average) / 2`,
/// each side defaulting to 0 if `node` has no neighbors on that side —
/// distinct from [`barycenter_node_weight`]`(Both, ..)`, which pools both
/// sides' positions into one average rather than averaging two averages.
pub fn balanced_node_weight(graph: &mut Graph, node: NodeId) {
    let down_edges = &graph.node(node).down_edges;
    let downward_average = if down_edges.is_empty() {
        0.0
    } else {
        let sum: usize = down_edges
            .iter()
            .map(|&e| graph.node(graph.edge(e).down_node).position)
            .sum();
        sum as f64 / down_edges.len() as f64
    };
    let up_edges = &graph.node(node).up_edges;
    let upward_average = if up_edges.is_empty() {
        0.0
    } else {
        let sum: usize = up_edges
            .iter()
            .map(|&e| graph.node(graph.edge(e).up_node).position)
            .sum();
        sum as f64 / up_edges.len() as f64
    };
    graph.node_mut(node).weight = Weight::Value((downward_average + upward_average) / 2.0);
}

/// The median position of `node`'s up-neighbors, or `Missing` if it has none.
fn upper_median(graph: &mut Graph, node: NodeId) -> Weight {
    if graph.node(node).up_degree() == 0 {
        return Weight::Missing;
    }
    let mut up_edges = graph.node(node).up_edges.clone();
    sort_by_up_node_position(graph, &mut up_edges);
    let median_index = (up_edges.len() - 1) / 2;
    let median_edge = up_edges[median_index];
    graph.node_mut(node).up_edges = up_edges;
    Weight::Value(graph.node(graph.edge(median_edge).up_node).position as f64)
}

/// The median position of `node`'s down-neighbors, or `Missing` if it has none.
fn lower_median(graph: &mut Graph, node: NodeId) -> Weight {
    if graph.node(node).down_degree() == 0 {
        return Weight::Missing;
    }
    let mut down_edges = graph.node(node).down_edges.clone();
    sort_by_down_node_position(graph, &mut down_edges);
    let median_index = (down_edges.len() - 1) / 2;
    let median_edge = down_edges[median_index];
    graph.node_mut(node).down_edges = down_edges;
    Weight::Value(graph.node(graph.edge(median_edge).down_node).position as f64)
}

/// Median weight, directional only (`Both` is handled by
/// [`two_layer_median_weight`] since it averages two medians rather than
/// picking one).
pub fn median_node_weight(graph: &mut Graph, node: NodeId, orientation: Orientation) {
    debug_assert_ne!(orientation, Orientation::Both);
    let weight = match orientation {
        Orientation::Upward => upper_median(graph, node),
        Orientation::Downward => lower_median(graph, node),
        Orientation::Both => unreachable!(),
    };
    graph.node_mut(node).weight = weight;
}

/// `(upper_median + lower_median) / 2`; `Missing` propagates as 0.0 into the
/// sum, matching the reference implementation's untyped `-1` arithmetic —
/// a node with neighbors on only one side gets pulled toward 0, then is left
/// for `adjust_weights_*` to correct if a sentinel policy is active.
pub fn two_layer_median_weight(graph: &mut Graph, node: NodeId) {
    let upper = upper_median(graph, node).or(-1.0);
    let lower = lower_median(graph, node).or(-1.0);
    graph.node_mut(node).weight = Weight::Value((upper + lower) / 2.0);
}

/// Resolves every `Missing` weight on `layer` to its left neighbor's weight
/// (or 0.0 for the leftmost node). Processes left to right so an already-
/// resolved neighbor is always available.
pub fn adjust_weights_left(graph: &mut Graph, layer: usize) {
    let ids = graph.layer(layer).nodes.clone();
    for (i, &id) in ids.iter().enumerate() {
        if graph.node(id).weight.value().is_some() {
            continue;
        }
        let resolved = if i == 0 {
            0.0
        } else {
            graph.node(ids[i - 1]).weight.or(0.0)
        };
        graph.node_mut(id).weight = Weight::Value(resolved);
    }
}

/// Resolves every `Missing` weight on `layer` to the average of its two
/// layer-neighbors (or whichever one is resolved, if only one is).
/// `parallel` selects between two reference behaviors: the barycenter
/// heuristic's data-parallel variants read every neighbor's *pre-pass*
/// weight from a snapshot taken before any adjustment on this layer, so a
/// node's resolution never depends on another node's resolution in the same
/// pass; the sequential variants read weights live, so a left neighbor
/// resolved earlier in this same pass is visible.
pub fn adjust_weights_avg(graph: &mut Graph, layer: usize, parallel: bool) {
    let ids = graph.layer(layer).nodes.clone();
    let snapshot: Vec<Weight> = if parallel {
        ids.iter().map(|&id| graph.node(id).weight).collect()
    } else {
        Vec::new()
    };
    for i in 0..ids.len() {
        let current = if parallel {
            snapshot[i]
        } else {
            graph.node(ids[i]).weight
        };
        if current.value().is_some() {
            continue;
        }
        let left = if i > 0 {
            if parallel {
                snapshot[i - 1]
            } else {
                graph.node(ids[i - 1]).weight
            }
        } else {
            Weight::Missing
        };
        let right = if i + 1 < ids.len() {
            if parallel {
                snapshot[i + 1]
            } else {
                graph.node(ids[i + 1]).weight
            }
        } else {
            Weight::Missing
        };
        let resolved = match (left.value(), right.value()) {
            (Some(l), Some(r)) => (l + r) / 2.0,
            (Some(l), None) => l,
            (None, Some(r)) => r,
            (None, None) => {
                if parallel {
                    0.0
                } else {
                    left.or(0.0)
                }
            }
        };
        graph.node_mut(ids[i]).weight = Weight::Value(resolved);
    }
}

/// Matches the median heuristic's own `adjust_weights_avg`, which is never
/// parallel-aware: the left neighbor is always read live (already resolved,
/// since the pass runs left to right) while the right neighbor is only used
/// if it is *already* resolved (not itself still `Missing`).
pub fn adjust_weights_avg_median(graph: &mut Graph, layer: usize) {
    let ids = graph.layer(layer).nodes.clone();
    for i in 0..ids.len() {
        if graph.node(ids[i]).weight.value().is_some() {
            continue;
        }
        let mut total = 0.0;
        let mut count = 0;
        if i > 0 {
            total += graph.node(ids[i - 1]).weight.or(0.0);
            count += 1;
        }
        if i + 1 < ids.len() {
            if let Some(right) = graph.node(ids[i + 1]).weight.value() {
                total += right;
                count += 1;
            }
        }
        let resolved = if count > 0 { total / count as f64 } else { 0.0 };
        graph.node_mut(ids[i]).weight = Weight::Value(resolved);
    }
}

/// Assigns barycenter weights to every node on `layer`, then resolves
/// sentinels per `sentinel_policy`.
pub fn barycenter_weights(
    graph: &mut Graph,
    layer: usize,
    orientation: Orientation,
    balanced: bool,
    sentinel_policy: SentinelPolicy,
    parallel: bool,
) {
    let ids = graph.layer(layer).nodes.clone();
    for &id in &ids {
        if orientation == Orientation::Both && balanced {
            balanced_node_weight(graph, id);
        } else {
            barycenter_node_weight(graph, id, orientation, sentinel_policy);
        }
    }
    match sentinel_policy {
        SentinelPolicy::Left => adjust_weights_left(graph, layer),
        SentinelPolicy::Avg => adjust_weights_avg(graph, layer, parallel),
        SentinelPolicy::None => {}
    }
}

/// Assigns median weights to every node on `layer`, then resolves sentinels.
pub fn median_weights(
    graph: &mut Graph,
    layer: usize,
    orientation: Orientation,
    sentinel_policy: SentinelPolicy,
) {
    let ids = graph.layer(layer).nodes.clone();
    for &id in &ids {
        if orientation == Orientation::Both {
            two_layer_median_weight(graph, id);
        } else {
            median_node_weight(graph, id, orientation);
        }
    }
    match sentinel_policy {
        SentinelPolicy::Left => adjust_weights_left(graph, layer),
        SentinelPolicy::Avg => adjust_weights_avg_median(graph, layer),
        SentinelPolicy::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn two_layer() -> (Graph, NodeId, NodeId, NodeId) {
        let mut g = Graph::new("weights", 2);
        let a = g.add_node("a", 0);
        let x = g.add_node("x", 1);
        let y = g.add_node("y", 1);
        g.add_edge(x, a);
        g.update_all_positions();
        (g, a, x, y)
    }

    #[test]
    fn isolated_node_gets_zero_regardless_of_policy() {
        let (mut g, _a, _x, y) = two_layer();
        barycenter_node_weight(&mut g, y, Orientation::Downward, SentinelPolicy::Left);
        assert_eq!(g.node(y).weight, Weight::Value(0.0));
    }

    #[test]
    fn missing_weight_resolves_left_then_right() {
        let mut g = Graph::new("line", 1);
        let a = g.add_node("a", 0);
        let b = g.add_node("b", 0);
        let c = g.add_node("c", 0);
        g.node_mut(a).weight = Weight::Value(4.0);
        g.node_mut(b).weight = Weight::Missing;
        g.node_mut(c).weight = Weight::Value(10.0);
        adjust_weights_left(&mut g, 0);
        assert_eq!(g.node(b).weight, Weight::Value(4.0));
    }

    #[test]
    fn avg_policy_averages_both_neighbors() {
        let mut g = Graph::new("line", 1);
        let a = g.add_node("a", 0);
        let b = g.add_node("b", 0);
        let c = g.add_node("c", 0);
        g.node_mut(a).weight = Weight::Value(2.0);
        g.node_mut(b).weight = Weight::Missing;
        g.node_mut(c).weight = Weight::Value(8.0);
        adjust_weights_avg(&mut g, 0, false);
        assert_eq!(g.node(b).weight, Weight::Value(5.0));
    }

    #[test]
    fn barycenter_averages_neighbor_positions() {
        let mut g = Graph::new("bary", 2);
        let a = g.add_node("a", 0);
        let x = g.add_node("x", 1);
        let y = g.add_node("y", 1);
        let z = g.add_node("z", 1);
        g.add_edge(x, a);
        g.add_edge(z, a);
        g.update_all_positions();
        barycenter_node_weight(&mut g, a, Orientation::Upward, SentinelPolicy::None);
        // x at position 0, z at position 2 -> average 1.0
        let _ = y;
        assert_eq!(g.node(a).weight, Weight::Value(1.0));
    }
}

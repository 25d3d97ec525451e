//! Preprocessors (the last tier of component H): one pass of initial-order
//! assignment run once, before the main heuristic, selected by `-p`.
//!
//! Grounded in `heuristics.c`'s `bfs_preprocess`/`dfs_preprocess`/
//! `mds_preprocess`. `bfs` is carried over as the reference implementation
//! has it: a documented no-op, left in place in case a future revision of
//! this engine wants to seed the initial order from a breadth-first
//! numbering instead of whatever `.ord`/`.sgf` happened to supply.

use crate::graph::{Graph, Weight};
use crate::sort::{layer_sort, sort_by_degree};

/// No-op placeholder, matching the reference implementation.
pub fn bfs(_graph: &mut Graph) {}

/// Depth-first preorder numbering: visits every node (several trees, one per
/// connected component), preferring a node's upward edges over its downward
/// edges when choosing which neighbor to recurse into next, then uses the
/// preorder number as every node's sort weight and layer-sorts every layer.
pub fn dfs(graph: &mut Graph) {
    for id in graph.node_ids().collect::<Vec<_>>() {
        graph.node_mut(id).marked = false;
        graph.node_mut(id).preorder_number = None;
    }
    let mut counter = 0u32;
    for id in graph.node_ids().collect::<Vec<_>>() {
        visit(graph, id, &mut counter);
    }
    for layer in 0..graph.layer_count() {
        layer_sort(graph, layer);
    }
}

fn visit(graph: &mut Graph, node: crate::graph::NodeId, counter: &mut u32) {
    if graph.node(node).marked {
        return;
    }
    graph.node_mut(node).marked = true;
    graph.node_mut(node).preorder_number = Some(*counter);
    graph.node_mut(node).weight = Weight::Value(*counter as f64);
    *counter += 1;
    for edge in graph.node(node).up_edges.clone() {
        let up = graph.edge(edge).up_node;
        visit(graph, up, counter);
    }
    for edge in graph.node(node).down_edges.clone() {
        let down = graph.edge(edge).down_node;
        visit(graph, down, counter);
    }
}

/// "Middle-degree sort": within each layer, the highest-degree node is
/// placed in the middle, with decreasing degree fanning out alternately
/// left and right toward the ends. Grounded in `heuristics.c`'s
/// `mds_preprocess`, which achieves the same placement by assigning each
/// node a target slot and then sorting by it.
pub fn mds(graph: &mut Graph) {
    for layer in 0..graph.layer_count() {
        let mut nodes = graph.layer(layer).nodes.clone();
        sort_by_degree(graph, &mut nodes);
        let slots = fan_out_slots(nodes.len());
        for (rank, &node) in nodes.iter().rev().enumerate() {
            graph.node_mut(node).weight = Weight::Value(slots[rank] as f64);
        }
        layer_sort(graph, layer);
    }
}

/// Slot visitation order for `n` positions, starting at the middle and
/// alternating outward to the left and right of it.
fn fan_out_slots(n: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let mid = n / 2;
    let mut slots = vec![mid];
    let mut left = mid as isize - 1;
    let mut right = mid as isize + 1;
    let mut take_left = true;
    while slots.len() < n {
        if take_left && left >= 0 {
            slots.push(left as usize);
            left -= 1;
        } else if right < n as isize {
            slots.push(right as usize);
            right += 1;
        } else if left >= 0 {
            slots.push(left as usize);
            left -= 1;
        }
        take_left = !take_left;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn star(n: usize) -> Graph {
        let mut g = Graph::new("star", 2);
        let hub = g.add_node("hub", 1);
        for i in 0..n {
            let leaf = g.add_node(format!("l{i}"), 0);
            g.add_edge(hub, leaf);
        }
        g
    }

    #[test]
    fn dfs_assigns_distinct_preorder_weights_to_every_node() {
        let mut g = star(4);
        g.update_all_positions();
        dfs(&mut g);
        let weights: Vec<f64> = g.node_ids().map(|id| g.node(id).weight.or(-99.0)).collect();
        let mut sorted = weights.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        sorted.dedup();
        assert_eq!(sorted.len(), weights.len());
    }

    #[test]
    fn mds_places_the_only_hub_alone_in_its_singleton_layer() {
        let mut g = star(5);
        g.update_all_positions();
        mds(&mut g);
        assert_eq!(g.layer(1).len(), 1);
    }

    #[test]
    fn fan_out_slots_covers_every_position_exactly_once() {
        for n in 0..8 {
            let mut slots = fan_out_slots(n);
            slots.sort_unstable();
            assert_eq!(slots, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn mds_orders_a_layer_with_highest_degree_in_the_middle() {
        let mut g = Graph::new("mds", 2);
        let hub = g.add_node("hub", 1);
        let other_hub = g.add_node("other", 1);
        let a = g.add_node("a", 0);
        let b = g.add_node("b", 0);
        let c = g.add_node("c", 0);
        g.add_edge(hub, a);
        g.add_edge(hub, b);
        g.add_edge(hub, c);
        g.add_edge(other_hub, a);
        g.update_all_positions();
        mds(&mut g);
        // `a` has degree 2 (highest among layer 0's three nodes) and should
        // land in the middle position.
        assert_eq!(g.layer(0).nodes[1], a);
    }
}

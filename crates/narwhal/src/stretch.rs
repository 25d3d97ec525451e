//! Edge "stretch": how far an edge's endpoints deviate from the same
//! relative position on their respective layers, normalized by layer size
//! (component E).
//!
//! `stretch(e) = |p(v)/s(L(v)) - p(w)/s(L(w))|` where `p` is position, `L`
//! is layer, and `s(layer) = max(|layer| - 1, 1)` except that a
//! single-node layer uses a divisor of 2 (there is no meaningful "relative
//! position" to normalize by when `|layer| - 1 == 0`, so the reference
//! implementation falls back to a fixed scale rather than dividing by zero).

use crate::graph::{EdgeId, Graph};

fn layer_scale(layer_size: usize) -> f64 {
    if layer_size > 1 {
        (layer_size - 1) as f64
    } else {
        2.0
    }
}

/// The stretch of a single edge, assuming node positions are current.
pub fn stretch(graph: &Graph, edge: EdgeId) -> f64 {
    let e = graph.edge(edge);
    let v = graph.node(e.down_node);
    let w = graph.node(e.up_node);
    let v_scale = layer_scale(graph.layer(v.layer).len());
    let w_scale = layer_scale(graph.layer(w.layer).len());
    (v.position as f64 / v_scale - w.position as f64 / w_scale).abs()
}

/// Sum of stretch over every edge in channel `i`.
pub fn total_channel_stretch(graph: &Graph, channel_edges: &[EdgeId]) -> f64 {
    channel_edges.iter().map(|&e| stretch(graph, e)).sum()
}

/// Largest stretch among channel `i`'s edges, or 0.0 if the channel is empty.
pub fn max_edge_stretch_in_channel(graph: &Graph, channel_edges: &[EdgeId]) -> f64 {
    channel_edges
        .iter()
        .map(|&e| stretch(graph, e))
        .fold(0.0, f64::max)
}

/// Sum of stretch over every edge in the graph.
pub fn total_stretch(graph: &Graph) -> f64 {
    graph.edge_ids().map(|e| stretch(graph, e)).sum()
}

/// Largest stretch among all edges.
pub fn max_edge_stretch(graph: &Graph) -> f64 {
    graph
        .edge_ids()
        .map(|e| stretch(graph, e))
        .fold(0.0, f64::max)
}

/// Highest-stretch unfixed edge, scanning `order` (caller-supplied, already
/// shuffled when randomized tie-break is in effect).
pub fn max_stretch_edge(graph: &Graph, order: &[EdgeId]) -> Option<EdgeId> {
    let mut best: Option<(EdgeId, f64)> = None;
    for &edge in order {
        if graph.is_fixed_edge(edge) {
            continue;
        }
        let s = stretch(graph, edge);
        if best.is_none_or(|(_, max)| s > max) {
            best = Some((edge, s));
        }
    }
    best.map(|(edge, _)| edge)
}

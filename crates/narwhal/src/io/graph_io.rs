//! Combines a parsed `.ord` layering and `.dot` edge list into a [`Graph`].
//! Grounded in the reference implementation's `graph_io.c::readGraph`: the
//! `.ord` file alone determines the node set, its layers and the position of
//! each node within a layer; the `.dot` file supplies edges, validated
//! against that node set and the adjacent-layers invariant before being
//! added, exactly as `addEdge` does there.

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::io::dot::{self, DotFile};
use crate::io::ord::{self, OrdFile};

pub fn read_graph(dot_input: &str, ord_input: &str) -> Result<Graph> {
    let OrdFile {
        name: ord_name,
        layers,
    } = ord::parse_ord(ord_input)?;
    let DotFile {
        name: dot_name,
        edges,
    } = dot::parse_dot(dot_input)?;

    let graph_name = ord_name.unwrap_or(dot_name);
    let mut graph = Graph::new(graph_name, layers.len());
    for (layer_index, nodes) in layers.iter().enumerate() {
        for node_name in nodes {
            graph.add_node(node_name.clone(), layer_index);
        }
    }

    for (src, dst) in &edges {
        add_validated_edge(&mut graph, src, dst)?;
    }
    Ok(graph)
}

/// Resolves `src`/`dst` to node ids, checks the same-layer and
/// adjacent-layers invariants (both fatal "input-structure" errors per §7),
/// then delegates to [`Graph::add_edge`] with the endpoints in up/down order.
fn add_validated_edge(graph: &mut Graph, src: &str, dst: &str) -> Result<()> {
    let src_id = graph
        .node_by_name(src)
        .ok_or_else(|| Error::UnknownNode {
            name: src.to_string(),
        })?;
    let dst_id = graph
        .node_by_name(dst)
        .ok_or_else(|| Error::UnknownNode {
            name: dst.to_string(),
        })?;
    let src_layer = graph.node(src_id).layer;
    let dst_layer = graph.node(dst_id).layer;
    if src_layer == dst_layer {
        return Err(Error::SameLayerEdge {
            node1: src.to_string(),
            node2: dst.to_string(),
            layer: src_layer,
        });
    }
    let (upper, lower, upper_layer, lower_layer) = if src_layer > dst_layer {
        (src_id, dst_id, src_layer, dst_layer)
    } else {
        (dst_id, src_id, dst_layer, src_layer)
    };
    if upper_layer - lower_layer != 1 {
        return Err(Error::NonAdjacentLayers {
            node1: src.to_string(),
            layer1: src_layer,
            node2: dst.to_string(),
            layer2: dst_layer,
        });
    }
    graph.add_edge(upper, lower);
    Ok(())
}

pub fn write_graph_ord(graph: &Graph, generation_method: &str) -> String {
    let layers: Vec<Vec<&str>> = (0..graph.layer_count())
        .map(|l| {
            graph
                .layer(l)
                .nodes
                .iter()
                .map(|&n| graph.node(n).name.as_str())
                .collect()
        })
        .collect();
    ord::write_ord(&graph.name, generation_method, &layers)
}

pub fn write_graph_dot(graph: &Graph, header: &str) -> String {
    let edges: Vec<(&str, &str)> = graph
        .edge_ids()
        .map(|e| {
            let edge = graph.edge(e);
            (
                graph.node(edge.up_node).name.as_str(),
                graph.node(edge.down_node).name.as_str(),
            )
        })
        .collect();
    dot::write_dot(&graph.name, header, &edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORD: &str = "# Ordering for graph widgets\n# seed\n\n0 { a b }\n1 { c d }\n";
    const DOT: &str = "digraph widgets {\n a -> c;\n b -> d;\n b -> c;\n}\n";

    #[test]
    fn builds_a_graph_from_dot_and_ord() {
        let g = read_graph(DOT, ORD).unwrap();
        assert_eq!(g.name, "widgets");
        assert_eq!(g.layer_count(), 2);
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn rejects_edge_between_unknown_node() {
        let dot = "digraph widgets {\n a -> z;\n}\n";
        let err = read_graph(dot, ORD).unwrap_err();
        assert!(matches!(err, Error::UnknownNode { .. }));
    }

    #[test]
    fn rejects_same_layer_edge() {
        let dot = "digraph widgets {\n a -> b;\n}\n";
        let err = read_graph(dot, ORD).unwrap_err();
        assert!(matches!(err, Error::SameLayerEdge { .. }));
    }

    #[test]
    fn round_trips_ord_output_through_the_parser() {
        let g = read_graph(DOT, ORD).unwrap();
        let written = write_graph_ord(&g, "heuristic-based");
        let reparsed = crate::io::ord::parse_ord(&written).unwrap();
        assert_eq!(reparsed.layers.len(), 2);
        assert_eq!(reparsed.layers[0], vec!["a".to_string(), "b".to_string()]);
    }
}

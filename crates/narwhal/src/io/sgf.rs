//! Reader/writer for the unified `.sgf` format (§6): a single line-oriented
//! file combining what `.dot`+`.ord` split in two. No grounding source file
//! exists for this format in the reference implementation (it predates the
//! split into separate dot/ord readers); the grammar below follows the
//! specification's prose exactly:
//!
//! ```text
//! c comment
//! t NAME N M L
//! n ID LAYER POSITION
//! e SRC_ID DST_ID
//! ```
//!
//! `N`/`M`/`L` are the node, edge and layer counts; edges are directed from
//! the earlier-appearing endpoint (lower layer) to the later one.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graph::Graph;

fn err(line: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        source: "sgf",
        line,
        message: message.into(),
    }
}

struct Header {
    name: String,
    node_count: usize,
    edge_count: usize,
    layer_count: usize,
}

fn split_fields<'a>(line_no: usize, rest: &'a str, expected: usize) -> Result<Vec<&'a str>> {
    let fields: Vec<&str> = rest.split_whitespace().collect();
    if fields.len() != expected {
        return Err(err(
            line_no,
            format!("expected {expected} fields, got {}", fields.len()),
        ));
    }
    Ok(fields)
}

fn parse_usize(line_no: usize, field: &str) -> Result<usize> {
    field
        .parse()
        .map_err(|_| err(line_no, format!("expected an integer, got '{field}'")))
}

pub fn read_sgf(input: &str) -> Result<Graph> {
    let mut header: Option<Header> = None;
    let mut node_lines: Vec<(usize, String, usize, usize)> = Vec::new(); // line, id, layer, position
    let mut edge_lines: Vec<(usize, String, String)> = Vec::new();

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let (tag, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));
        match tag {
            "c" => continue,
            "t" => {
                if header.is_some() {
                    return Err(err(line_no, "duplicate 't' header line"));
                }
                let fields = split_fields(line_no, rest, 4)?;
                header = Some(Header {
                    name: fields[0].to_string(),
                    node_count: parse_usize(line_no, fields[1])?,
                    edge_count: parse_usize(line_no, fields[2])?,
                    layer_count: parse_usize(line_no, fields[3])?,
                });
            }
            "n" => {
                let fields = split_fields(line_no, rest, 3)?;
                let id = fields[0].to_string();
                let layer = parse_usize(line_no, fields[1])?;
                let position = parse_usize(line_no, fields[2])?;
                node_lines.push((line_no, id, layer, position));
            }
            "e" => {
                let fields = split_fields(line_no, rest, 2)?;
                edge_lines.push((line_no, fields[0].to_string(), fields[1].to_string()));
            }
            other => return Err(err(line_no, format!("unexpected line tag '{other}'"))),
        }
    }

    let header = header.ok_or_else(|| err(0, "missing 't' header line"))?;
    if node_lines.len() != header.node_count {
        return Err(Error::OrderNodeCountMismatch {
            graph_count: node_lines.len(),
            order_count: header.node_count,
        });
    }
    if edge_lines.len() != header.edge_count {
        return Err(err(
            0,
            format!(
                "header declares {} edges, found {}",
                header.edge_count,
                edge_lines.len()
            ),
        ));
    }

    let mut by_layer: Vec<Vec<(usize, String)>> = vec![Vec::new(); header.layer_count];
    for (line_no, id, layer, position) in &node_lines {
        let slot = by_layer
            .get_mut(*layer)
            .ok_or_else(|| err(*line_no, format!("layer {layer} exceeds declared L")))?;
        slot.push((*position, id.clone()));
    }

    let mut graph = Graph::new(header.name, header.layer_count);
    let mut id_to_node = FxHashMap::default();
    for (layer_index, mut slot) in by_layer.into_iter().enumerate() {
        slot.sort_by_key(|(position, _)| *position);
        for (expected_position, (position, id)) in slot.iter().enumerate() {
            if *position != expected_position {
                return Err(err(
                    0,
                    format!(
                        "layer {layer_index} positions are not a contiguous permutation \
                         starting at 0"
                    ),
                ));
            }
            let node_id = graph.add_node(id.clone(), layer_index);
            id_to_node.insert(id.clone(), node_id);
        }
    }

    for (line_no, src, dst) in &edge_lines {
        let src_id = *id_to_node
            .get(src)
            .ok_or_else(|| Error::UnknownNode { name: src.clone() })?;
        let dst_id = *id_to_node
            .get(dst)
            .ok_or_else(|| Error::UnknownNode { name: dst.clone() })?;
        let src_layer = graph.node(src_id).layer;
        let dst_layer = graph.node(dst_id).layer;
        if src_layer == dst_layer {
            return Err(Error::SameLayerEdge {
                node1: src.clone(),
                node2: dst.clone(),
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
                node1: src.clone(),
                layer1: src_layer,
                node2: dst.clone(),
                layer2: dst_layer,
            });
        }
        let _ = line_no;
        graph.add_edge(upper, lower);
    }

    Ok(graph)
}

pub fn write_sgf(graph: &Graph) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    writeln!(out, "c generated by narwhal").unwrap();
    writeln!(
        out,
        "t {} {} {} {}",
        graph.name,
        graph.node_count(),
        graph.edge_count(),
        graph.layer_count()
    )
    .unwrap();
    for layer in 0..graph.layer_count() {
        for (position, &node_id) in graph.layer(layer).nodes.iter().enumerate() {
            writeln!(
                out,
                "n {} {} {}",
                graph.node(node_id).name,
                layer,
                position
            )
            .unwrap();
        }
    }
    for edge_id in graph.edge_ids() {
        let edge = graph.edge(edge_id);
        writeln!(
            out,
            "e {} {}",
            graph.node(edge.down_node).name,
            graph.node(edge.up_node).name
        )
        .unwrap();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SGF: &str = "c a tiny graph\nt widgets 4 2 2\nn a 0 0\nn b 0 1\nn c 1 0\nn d 1 1\ne a c\ne b d\n";

    #[test]
    fn reads_a_small_sgf_graph() {
        let g = read_sgf(SGF).unwrap();
        assert_eq!(g.name, "widgets");
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.layer_count(), 2);
    }

    #[test]
    fn rejects_node_count_mismatch() {
        let sgf = "t widgets 5 2 2\nn a 0 0\nn b 0 1\nn c 1 0\nn d 1 1\ne a c\ne b d\n";
        let err = read_sgf(sgf).unwrap_err();
        assert!(matches!(err, Error::OrderNodeCountMismatch { .. }));
    }

    #[test]
    fn round_trips_through_write_sgf() {
        let g = read_sgf(SGF).unwrap();
        let written = write_sgf(&g);
        let reparsed = read_sgf(&written).unwrap();
        assert_eq!(reparsed.node_count(), 4);
        assert_eq!(reparsed.edge_count(), 2);
    }
}

//! The layered graph: nodes with stable ids and mutable `(layer, position)`,
//! directed edges with up/down endpoints, and the layer table that is the
//! authoritative ordering for every layer.
//!
//! Node/edge storage is a pair of arenas (`narwhal_graph::Arena`) addressed
//! by dense ids; every "pointer" the reference implementation stores
//! (`up_node`, `down_node`, a node's `up_edges`/`down_edges`, a layer's node
//! sequence) is an id into one of these arenas.

use narwhal_graph::Arena;
pub use narwhal_graph::{EdgeId, NodeId};
use rustc_hash::FxHashMap;

/// A node's sort weight. `Missing` replaces the reference implementation's
/// `-1.0` sentinel ("no edges in the relevant orientation") with a real sum
/// type, per the Design Notes: sentinel values are fragile because they
/// collide with legitimate negative weights should the model ever grow one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Weight {
    Missing,
    Value(f64),
}

impl Weight {
    pub fn value(self) -> Option<f64> {
        match self {
            Weight::Missing => None,
            Weight::Value(v) => Some(v),
        }
    }

    pub fn or(self, fallback: f64) -> f64 {
        self.value().unwrap_or(fallback)
    }
}

impl Default for Weight {
    fn default() -> Self {
        Weight::Missing
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub layer: usize,
    pub position: usize,
    /// Edges on which this node is the `down_node` (i.e. edges reaching
    /// upward from this node to the layer above).
    pub up_edges: Vec<EdgeId>,
    /// Edges on which this node is the `up_node` (i.e. edges reaching
    /// downward from this node to the layer below).
    pub down_edges: Vec<EdgeId>,
    pub weight: Weight,
    pub up_crossings: u32,
    pub down_crossings: u32,
    pub fixed: bool,
    pub marked: bool,
    pub preorder_number: Option<u32>,
}

impl Node {
    fn new(name: String, layer: usize) -> Self {
        Node {
            name,
            layer,
            position: 0,
            up_edges: Vec::new(),
            down_edges: Vec::new(),
            weight: Weight::Missing,
            up_crossings: 0,
            down_crossings: 0,
            fixed: false,
            marked: false,
            preorder_number: None,
        }
    }

    pub fn up_degree(&self) -> usize {
        self.up_edges.len()
    }

    pub fn down_degree(&self) -> usize {
        self.down_edges.len()
    }

    pub fn degree(&self) -> usize {
        self.up_degree() + self.down_degree()
    }

    pub fn crossings(&self) -> u32 {
        self.up_crossings + self.down_crossings
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub up_node: NodeId,
    pub down_node: NodeId,
    pub crossings: u32,
    pub fixed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Layer {
    pub nodes: Vec<NodeId>,
    pub fixed: bool,
}

impl Layer {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Channel `i` (1 <= i < layer_count): the edges whose `up_node` is on layer
/// `i`, kept sorted lexicographically by `(up_node.position, down_node.position)`
/// after each recount. Materialized lazily by `Crossings::init` (component D).
#[derive(Debug, Clone, Default)]
pub struct Channel {
    pub edges: Vec<EdgeId>,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub name: String,
    nodes: Arena<NodeId, Node>,
    edges: Arena<EdgeId, Edge>,
    pub layers: Vec<Layer>,
    name_to_id: FxHashMap<String, NodeId>,
}

impl Graph {
    pub fn new(name: impl Into<String>, layer_count: usize) -> Self {
        Graph {
            name: name.into(),
            nodes: Arena::new(),
            edges: Arena::new(),
            layers: (0..layer_count).map(|_| Layer::default()).collect(),
            name_to_id: FxHashMap::default(),
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Adds a node to `layer`, appending it at the end of the layer's current
    /// order. Returns the new node's id.
    pub fn add_node(&mut self, name: impl Into<String>, layer: usize) -> NodeId {
        let name = name.into();
        let position = self.layers[layer].nodes.len();
        let mut node = Node::new(name.clone(), layer);
        node.position = position;
        let id = self.nodes.push(node);
        self.layers[layer].nodes.push(id);
        self.name_to_id.insert(name, id);
        id
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.name_to_id.get(name).copied()
    }

    /// Adds an edge between `up` (higher layer) and `down` (lower layer).
    /// Panics if the endpoints are not on adjacent layers — this is an
    /// invariant-violation condition, not a recoverable error, per §7.
    pub fn add_edge(&mut self, up: NodeId, down: NodeId) -> EdgeId {
        assert_eq!(
            self.node(up).layer,
            self.node(down).layer + 1,
            "edge endpoints must be on adjacent layers"
        );
        let id = self.edges.push(Edge {
            up_node: up,
            down_node: down,
            crossings: 0,
            fixed: false,
        });
        self.node_mut(up).down_edges.push(id);
        self.node_mut(down).up_edges.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id]
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::from)
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId::from)
    }

    pub fn layer(&self, layer: usize) -> &Layer {
        &self.layers[layer]
    }

    /// 4.A(i): reassigns `position` for every node on `layer`, in the order
    /// the layer's node sequence currently holds them.
    pub fn update_node_positions(&mut self, layer: usize) {
        let ids: Vec<NodeId> = self.layers[layer].nodes.clone();
        for (position, id) in ids.into_iter().enumerate() {
            self.node_mut(id).position = position;
        }
    }

    pub fn update_all_positions(&mut self) {
        for layer in 0..self.layer_count() {
            self.update_node_positions(layer);
        }
    }

    /// 4.A(ii): replaces the node sequence on `layer` with `order`, which
    /// must be a permutation of the layer's current nodes. Positions are not
    /// updated; callers follow with `update_node_positions`.
    pub fn set_layer_order(&mut self, layer: usize, order: Vec<NodeId>) {
        debug_assert_eq!(order.len(), self.layers[layer].nodes.len());
        self.layers[layer].nodes = order;
    }

    pub fn is_fixed_node(&self, id: NodeId) -> bool {
        self.node(id).fixed
    }

    pub fn is_fixed_edge(&self, id: EdgeId) -> bool {
        self.edge(id).fixed
    }

    pub fn fix_node(&mut self, id: NodeId) {
        self.node_mut(id).fixed = true;
    }

    pub fn fix_edge(&mut self, id: EdgeId) {
        self.edge_mut(id).fixed = true;
    }

    pub fn clear_fixed_nodes(&mut self) {
        for id in self.node_ids().collect::<Vec<_>>() {
            self.node_mut(id).fixed = false;
        }
    }

    pub fn clear_fixed_edges(&mut self) {
        for id in self.edge_ids().collect::<Vec<_>>() {
            self.edge_mut(id).fixed = false;
        }
    }

    pub fn clear_fixed_layers(&mut self) {
        for layer in &mut self.layers {
            layer.fixed = false;
        }
    }

    pub fn all_nodes_fixed(&self) -> bool {
        self.node_ids().all(|id| self.is_fixed_node(id))
    }
}

/// An order snapshot: the exact node sequence of every layer at capture time
/// (4.I `save_order`/`restore_order`).
#[derive(Debug, Clone, Default)]
pub struct OrderSnapshot {
    layers: Vec<Vec<NodeId>>,
}

impl OrderSnapshot {
    pub fn layers(&self) -> &[Vec<NodeId>] {
        &self.layers
    }

    pub fn capture(graph: &Graph) -> Self {
        OrderSnapshot {
            layers: graph.layers.iter().map(|l| l.nodes.clone()).collect(),
        }
    }

    /// Overwrites `self` in place from `graph`'s current order, avoiding a
    /// fresh allocation on every "new best" event when the snapshot already
    /// has the right shape.
    pub fn save(&mut self, graph: &Graph) {
        if self.layers.len() != graph.layers.len() {
            *self = Self::capture(graph);
            return;
        }
        for (dst, layer) in self.layers.iter_mut().zip(&graph.layers) {
            dst.clear();
            dst.extend_from_slice(&layer.nodes);
        }
    }

    /// Restores `graph`'s layer orders and node positions to this snapshot.
    pub fn restore(&self, graph: &mut Graph) {
        for (layer_idx, nodes) in self.layers.iter().enumerate() {
            graph.set_layer_order(layer_idx, nodes.clone());
        }
        graph.update_all_positions();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_layer_k33() -> Graph {
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
    fn node_positions_match_layer_order_invariant() {
        let mut g = two_layer_k33();
        g.update_all_positions();
        for layer in 0..g.layer_count() {
            for (position, &id) in g.layer(layer).nodes.iter().enumerate() {
                assert_eq!(g.node(id).position, position);
            }
        }
    }

    #[test]
    fn every_edge_counted_once_in_down_edges() {
        let g = two_layer_k33();
        let total: usize = g.node_ids().map(|id| g.node(id).down_edges.len()).sum();
        assert_eq!(total, g.edge_count());
    }

    #[test]
    fn save_restore_round_trips_positions() {
        let mut g = two_layer_k33();
        g.update_all_positions();
        let snapshot = OrderSnapshot::capture(&g);
        let reversed: Vec<NodeId> = g.layer(0).nodes.iter().rev().copied().collect();
        g.set_layer_order(0, reversed);
        g.update_all_positions();
        snapshot.restore(&mut g);
        for (position, &id) in g.layer(0).nodes.iter().enumerate() {
            assert_eq!(g.node(id).position, position);
        }
    }
}

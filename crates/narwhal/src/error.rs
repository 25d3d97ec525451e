//! Error types for graph I/O and configuration validation.
//!
//! Invariant violations inside the engine itself (mismatched layers on an
//! edge, an order permutation of the wrong length) are programmer errors and
//! stay as `assert!`/`debug_assert!` panics rather than `Result` — see the
//! note on [`crate::graph::Graph::add_edge`]. `Error` covers the boundary:
//! malformed input files and invalid CLI configurations.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error at {source} line {line}: {message}")]
    Parse {
        source: &'static str,
        line: usize,
        message: String,
    },

    #[error(
        "order file lists {order_count} nodes but the graph file has {graph_count}; \
         a .ord file must enumerate exactly the nodes its .dot defines"
    )]
    OrderNodeCountMismatch {
        graph_count: usize,
        order_count: usize,
    },

    #[error("order file references unknown node {name:?}")]
    UnknownNode { name: String },

    #[error("edge connects {node1:?} and {node2:?}, both on layer {layer}")]
    SameLayerEdge {
        node1: String,
        node2: String,
        layer: usize,
    },

    #[error(
        "edge connects {node1:?} (layer {layer1}) and {node2:?} (layer {layer2}), \
         which are not adjacent"
    )]
    NonAdjacentLayers {
        node1: String,
        layer1: usize,
        node2: String,
        layer2: usize,
    },

    #[error("expected layer {expected}, found layer {found}")]
    LayerDiscontinuity { expected: usize, found: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

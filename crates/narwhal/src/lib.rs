//! narwhal: a layered-graph crossing-minimization engine.
//!
//! Given a DAG already partitioned into layers, narwhal reorders the nodes
//! within each layer to reduce edge crossings, using the same family of
//! iterative heuristics (barycenter and median sweeps, sifting, local
//! search on the worst layer/node/edge) that the layered-drawing literature
//! has relied on since Sugiyama's original framework. It does not assign
//! coordinates and does not attempt an exact (ILP) optimum.

pub mod config;
pub mod crossing_count;
pub mod crossings;
pub mod error;
pub mod graph;
pub mod heuristics;
pub mod io;
pub mod orchestrator;
pub mod preprocess;
pub mod sift;
pub mod sort;
pub mod stats;
pub mod stretch;
pub mod weight;

pub use config::Config;
pub use crossings::Crossings;
pub use error::Error;
pub use graph::{Channel, Edge, Graph, Layer, Node, OrderSnapshot, Weight};
pub use narwhal_graph::{EdgeId, NodeId};
pub use orchestrator::{Orchestrator, RunReport};
pub use stats::Stats;

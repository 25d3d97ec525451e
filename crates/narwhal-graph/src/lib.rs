//! Dense, arena-indexed storage primitives.
//!
//! `narwhal` models its layered graph as a single-owner arena per node/edge
//! kind, addressed by dense integer ids rather than by pointer or string key.
//! This crate provides the reusable parts of that idea: newtype indices and a
//! push-only, `Vec`-backed arena indexed by them.

mod arena;
mod ids;

pub use arena::Arena;
pub use ids::{EdgeId, NodeId};

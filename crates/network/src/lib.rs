//! Typed in-memory model of an electrical distribution network.

pub mod graph;
pub mod line;
pub mod node;

pub use graph::*;
pub use line::*;
pub use node::*;

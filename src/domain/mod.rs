//! Domain layer: tree data model and iteration
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod iter;
pub mod node;

pub use iter::{PostOrderIter, PreOrderIter};
pub use node::{Node, NodeInTree};

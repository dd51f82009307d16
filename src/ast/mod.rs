//! Typed syntax tree for ES|QL pipelines.
//!
//! - `location` : half-open byte ranges shared by every stage.
//! - `node`     : the node variants and their accessors.
//! - `walk`     : traversal and cursor lookup helpers.
mod location;
mod node;
mod walk;

pub use location::*;
pub use node::*;

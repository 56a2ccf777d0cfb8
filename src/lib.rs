pub mod node;
pub mod color;
pub mod tree;
pub mod compress;
pub mod index;
pub mod metrics;

pub use node::*;

pub use color::{Color, Hex};
pub use index::ColorIndex;
pub use tree::Quadtree;

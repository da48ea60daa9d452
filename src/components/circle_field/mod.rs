//! Home navigation drawn as a cluster of packed circles.
//!
//! A layout is generated once per mount and on every window resize: nodes
//! are seeded near the viewport center, relaxed by a pairwise-repulsion
//! packer with gravity, fitted to the screen, and popped in by the entrance
//! scheduler. Physics never runs after a layout has been produced.

mod component;
pub mod entrance;
pub mod fit;
pub mod packing;
mod render;
pub mod state;
pub mod types;

pub use component::CircleField;
pub use state::{CircleFieldState, LayoutConfig, LayoutError, generate_layout};
pub use types::{ClusterSpec, Node, NodeKind, Payload};

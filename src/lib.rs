//! Barnes-Hut gravity over a kd-tree that is rebuilt from scratch every step.
//!
//! The tree lives in a flat [`kd_tree::NodeArena`] and is addressed purely by
//! node index. A [`kd_tree::System`] owns the arena, the particle permutation
//! and the acceleration buffer, and is reused across steps.

pub mod config;
pub mod error;
pub mod kd_tree;
pub mod particle;
pub mod quickstat;
pub mod tree_dump;
pub mod vector;

pub use config::SimConfig;
pub use error::SimError;
pub use kd_tree::{KDTree, NodeArena, System, MAX_PARTS, THETA};
pub use particle::Particle;
pub use vector::F64x3;

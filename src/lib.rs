//! Arena-backed parse trees for recursive neural tensor networks.
//!
//! A [`TreeArena`] owns every node; nodes are addressed by [`NodeId`] and
//! linked with [`TreeArena::connect`]. Each node carries parse labels plus
//! the numeric state (vector, prediction, error) assigned during training.

pub mod arena;
pub mod config;
pub mod equality;
pub mod errors;
pub mod node;
pub mod query;
pub mod traversal;
pub mod tree_traits;
pub mod util;

pub use arena::{NodeId, TreeArena, TreeNode};
pub use config::{RenderSettings, Settings};
pub use errors::{TreeError, TreeResult};
pub use node::NodeData;
pub use tree_traits::TreeNodeConvert;

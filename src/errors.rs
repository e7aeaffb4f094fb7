use thiserror::Error;

use crate::arena::NodeId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("ancestor: height cannot be negative: {0}")]
    NegativeHeight(isize),

    #[error("Node not found in arena: {0:?}")]
    NodeNotFound(NodeId),

    #[error("Cycle detected when connecting children to node: {0:?}")]
    CycleDetected(NodeId),

    #[error("config error: {message}")]
    Config { message: String },
}

pub type TreeResult<T> = Result<T, TreeError>;

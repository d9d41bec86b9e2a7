//! Error types for DOM operations
//!
//! Simple, flat error hierarchy. Malformed markup is never an error:
//! parsing is lenient and total, so the only failures here are structural
//! preconditions on the live tree.

use crate::types::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// The outer-replacement form requires a parent to replace into.
    #[error("Node is not attached to a tree")]
    NotAttached,

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Hierarchy violation: {0}")]
    HierarchyViolation(&'static str),

    /// Range/node queries are only defined within a single tree.
    #[error("Range and node belong to different trees")]
    DisjointTrees,
}

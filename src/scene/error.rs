//! Scene graph errors

use thiserror::Error;

use super::node::SceneNodeId;

/// Failures raised by scene graph primitives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("Unknown scene node {0:?}")]
    UnknownNode(SceneNodeId),

    #[error("A node named '{0}' already exists")]
    DuplicateName(String),

    #[error("The scene root cannot be {0}")]
    RootImmutable(&'static str),

    #[error("Node {0:?} has no parent")]
    NotAttached(SceneNodeId),

    #[error("Node {0:?} already has a parent")]
    AlreadyAttached(SceneNodeId),

    #[error("Attaching {node:?} under {parent:?} would create a cycle")]
    Cycle {
        node: SceneNodeId,
        parent: SceneNodeId,
    },

    #[error("Node {0:?} is already held by an attachment point")]
    AlreadyHeld(SceneNodeId),

    #[error("Node {0:?} already carries an entity")]
    EntityAlreadySet(SceneNodeId),

    #[error("Skeleton error: {0}")]
    Skeleton(String),

    #[error("Degenerate transform on node {0:?}")]
    DegenerateTransform(SceneNodeId),
}

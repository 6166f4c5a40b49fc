//! Scene graph collaborator: the engine-facing port and an in-memory implementation

pub mod entity;
pub mod error;
pub mod graph;
pub mod node;
pub mod port;
pub mod skeleton;

pub use entity::{AttachmentPoint, Entity, EntityId, EntityKind, MeshData};
pub use error::SceneError;
pub use graph::{SceneGraph, ROOT_NODE_NAME};
pub use node::{DerivedTransform, LocalTransform, SceneNode, SceneNodeId};
pub use port::{ListenerHandle, ListenerId, SceneGraphListener, SceneGraphPort};
pub use skeleton::{Bone, BoneIndex, Skeleton, SkeletonBuilder};

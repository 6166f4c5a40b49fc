//! Scene outline model
//!
//! Projects a scene graph into a two-column tree (Name, Type) for outliner
//! views, keeps it in sync with scene notifications, and reparents scene
//! nodes on drag and drop.

pub mod bridge;
pub mod deferred;
pub mod error;
pub mod model;
pub mod node;
pub mod projector;
pub mod registry;
pub mod reparent;
pub mod signals;
pub mod tree;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use deferred::{DeferredQueue, DeferredTask};
pub use error::OutlineError;
pub use model::SceneNodeModel;
pub use node::{ExternalRef, NodeKind, OutlineId, TreeNode};
pub use projector::TreeProjector;
pub use registry::NodeRegistry;
pub use reparent::{DropOutcome, ItemOutcome, MimeData, SkipReason};
pub use signals::{BracketKind, ChangeSignals, ModelEvent, ObserverId};
pub use tree::OutlineTree;
pub use view::{Alignment, Column, DropAction, DropActions, ItemData, ItemFlags, ItemModel, ItemRole, ModelIndex, Orientation};

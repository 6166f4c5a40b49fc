//! Contract between the outliner and the scene-graph engine.
//!
//! The outliner never reaches into engine storage. Everything it needs to read
//! or change goes through [`SceneGraphPort`], and structural changes come back
//! through [`SceneGraphListener`] callbacks delivered synchronously on the
//! mutating thread.

use std::cell::RefCell;
use std::rc::Weak;

use glam::{Quat, Vec3};

use super::entity::EntityId;
use super::error::SceneError;
use super::node::SceneNodeId;
use super::skeleton::{BoneIndex, Skeleton};

/// Handle returned by [`SceneGraphPort::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Receiver of scene-graph structure notifications.
pub trait SceneGraphListener {
    /// `node` was created and linked under its parent.
    fn on_node_added(&mut self, scene: &dyn SceneGraphPort, node: SceneNodeId);

    /// `node` is about to be destroyed. It is still fully resolvable.
    fn on_node_removing(&mut self, scene: &dyn SceneGraphPort, node: SceneNodeId);

    /// Name or other presentation data of `node` changed.
    fn on_node_changed(&mut self, _scene: &dyn SceneGraphPort, _node: SceneNodeId) {}

    /// The graph changed in a way that cannot be described incrementally.
    fn on_graph_dirty(&mut self, _scene: &dyn SceneGraphPort) {}
}

/// Shared handle type under which listeners are registered.
pub type ListenerHandle = Weak<RefCell<dyn SceneGraphListener>>;

/// Primitives the outliner consumes from a scene-graph engine.
pub trait SceneGraphPort {
    /// Display name of the scene itself.
    fn scene_name(&self) -> &str;

    /// The scene's root spatial node.
    fn root(&self) -> SceneNodeId;

    /// Children of a node in stable order. Unknown nodes have none.
    fn children(&self, node: SceneNodeId) -> Vec<SceneNodeId>;

    fn child_count(&self, node: SceneNodeId) -> usize;

    /// Current parent of a node.
    fn parent(&self, node: SceneNodeId) -> Option<SceneNodeId>;

    /// Stable identifier of a node.
    fn node_name(&self, node: SceneNodeId) -> Option<&str>;

    /// Look a node up by its stable identifier.
    fn find_node(&self, name: &str) -> Option<SceneNodeId>;

    /// Entity attached to a node.
    fn entity_of(&self, node: SceneNodeId) -> Option<EntityId>;

    fn entity_name(&self, entity: EntityId) -> Option<&str>;

    fn entity_type_name(&self, entity: EntityId) -> Option<&str>;

    fn is_mesh_based(&self, entity: EntityId) -> bool;

    fn skeleton(&self, entity: EntityId) -> Option<&Skeleton>;

    /// Held nodes of the attachment points registered for a bone name.
    fn attachments_for_bone(&self, entity: EntityId, bone: &str) -> Vec<SceneNodeId>;

    /// Name of a bone of an entity's skeleton.
    fn bone_name(&self, entity: EntityId, bone: BoneIndex) -> Option<&str> {
        self.skeleton(entity)?.bone_name(bone)
    }

    /// Unlink a node from its parent. The node and its subtree stay alive.
    fn detach(&mut self, node: SceneNodeId) -> Result<(), SceneError>;

    /// Link an unparented node as the last child of `parent`.
    fn attach(&mut self, node: SceneNodeId, parent: SceneNodeId) -> Result<(), SceneError>;

    fn derived_position(&self, node: SceneNodeId) -> Result<Vec3, SceneError>;

    fn derived_orientation(&self, node: SceneNodeId) -> Result<Quat, SceneError>;

    /// Place a node so that its world-space position becomes `position`.
    fn set_derived_position(&mut self, node: SceneNodeId, position: Vec3) -> Result<(), SceneError>;

    /// Rotate a node so that its world-space orientation becomes `orientation`.
    fn set_derived_orientation(&mut self, node: SceneNodeId, orientation: Quat) -> Result<(), SceneError>;

    /// Register a listener. Dropped listeners are pruned automatically.
    fn subscribe(&mut self, listener: ListenerHandle) -> ListenerId;

    /// Remove a listener. Returns false if it was not registered.
    fn unsubscribe(&mut self, id: ListenerId) -> bool;
}

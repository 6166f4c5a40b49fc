//! Builds the outline tree from a scene graph.

use std::cell::RefCell;
use std::collections::HashSet;

use crate::scene::{BoneIndex, EntityId, SceneGraphPort, SceneNodeId};

use super::node::{ExternalRef, NodeKind, OutlineId, TreeNode};
use super::tree::OutlineTree;

/// Walks a scene through its port and mirrors it into outline nodes.
///
/// Below the scene container every spatial node becomes a `SpatialNode`, or
/// an `Entity` when it carries one. Skeletal mesh entities get their bones
/// first, each bone followed by the attachment-held nodes registered against
/// its name and then by its child bones. A node's own scene children always
/// come after its bones.
///
/// A scene node is projected at most once per projector. Attachment points
/// whose held node is gone, or is also part of the hierarchy, are left out.
pub struct TreeProjector<'a> {
    scene: &'a dyn SceneGraphPort,
    projected: RefCell<HashSet<SceneNodeId>>,
}

impl<'a> TreeProjector<'a> {
    pub fn new(scene: &'a dyn SceneGraphPort) -> Self {
        Self {
            scene,
            projected: RefCell::new(HashSet::new()),
        }
    }

    /// Mark `node` as projected; false when it already was.
    fn claim(&self, node: SceneNodeId) -> bool {
        let claimed = self.projected.borrow_mut().insert(node);
        if !claimed {
            log::warn!("Scene node {:?} is reachable twice, keeping the first row", node);
        }
        claimed
    }

    /// Project the whole scene into a fresh tree.
    pub fn build(&self) -> OutlineTree {
        let mut tree = OutlineTree::new();
        let scene_root = self.scene.root();
        let container = TreeNode::new(
            NodeKind::SceneContainer,
            Some(ExternalRef::Spatial(scene_root)),
            self.scene.scene_name(),
            NodeKind::SceneContainer.label(),
        );

        let root = tree.root();
        self.claim(scene_root);
        if let Some(container) = tree.add_child(root, container) {
            self.populate_children(&mut tree, container, scene_root);
        }
        log::debug!("Projected scene '{}' into {} outline nodes", self.scene.scene_name(), tree.node_count());
        tree
    }

    /// Project `node` and everything below it as the last child of `parent`.
    pub fn project_node(&self, tree: &mut OutlineTree, parent: OutlineId, node: SceneNodeId) -> Option<OutlineId> {
        if !self.claim(node) {
            return None;
        }
        let entity = self.scene.entity_of(node);
        let id = tree.add_child(parent, self.describe(node))?;

        if let Some(entity) = entity.filter(|e| self.scene.is_mesh_based(*e)) {
            if let Some(skeleton) = self.scene.skeleton(entity) {
                for bone in skeleton.root_bones() {
                    self.populate_bone(tree, id, entity, bone);
                }
            }
        }

        self.populate_children(tree, id, node);
        Some(id)
    }

    /// Unlinked outline node describing a spatial node.
    pub fn describe(&self, node: SceneNodeId) -> TreeNode {
        let node_name = self.scene.node_name(node).unwrap_or_default();
        match self.scene.entity_of(node) {
            Some(entity) => TreeNode::new(
                NodeKind::Entity,
                Some(ExternalRef::Entity { node, entity }),
                self.scene.entity_name(entity).unwrap_or(node_name),
                self.scene.entity_type_name(entity).unwrap_or(NodeKind::Entity.label()),
            ),
            None => TreeNode::new(
                NodeKind::SpatialNode,
                Some(ExternalRef::Spatial(node)),
                node_name,
                NodeKind::SpatialNode.label(),
            ),
        }
    }

    fn populate_children(&self, tree: &mut OutlineTree, parent: OutlineId, node: SceneNodeId) {
        for child in self.scene.children(node) {
            self.project_node(tree, parent, child);
        }
    }

    fn populate_bone(&self, tree: &mut OutlineTree, parent: OutlineId, entity: EntityId, bone: BoneIndex) {
        let Some(skeleton) = self.scene.skeleton(entity) else {
            return;
        };
        let bone_name = skeleton.bone_name(bone).unwrap_or_default();
        let node = TreeNode::new(
            NodeKind::Bone,
            Some(ExternalRef::Bone { entity, bone }),
            bone_name,
            NodeKind::Bone.label(),
        );
        let Some(id) = tree.add_child(parent, node) else {
            return;
        };

        for held in self.scene.attachments_for_bone(entity, bone_name) {
            let Some(held_name) = self.scene.node_name(held) else {
                log::warn!("Bone '{}' holds missing scene node {:?}", bone_name, held);
                continue;
            };
            if self.scene.parent(held).is_some() {
                log::warn!("Held node '{}' is also in the hierarchy, skipping attachment", held_name);
                continue;
            }
            if !self.claim(held) {
                continue;
            }
            let attachment = TreeNode::new(
                NodeKind::Attachment,
                Some(ExternalRef::Spatial(held)),
                held_name,
                NodeKind::Attachment.label(),
            );
            if let Some(attachment) = tree.add_child(id, attachment) {
                self.populate_children(tree, attachment, held);
            }
        }

        for child in skeleton.children(bone) {
            self.populate_bone(tree, id, entity, child);
        }
    }
}

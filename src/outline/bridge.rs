//! Keeps the outline in step with scene notifications.

use crate::scene::{SceneGraphListener, SceneGraphPort, SceneNodeId};

use super::error::OutlineError;
use super::model::SceneNodeModel;
use super::node::{NodeKind, OutlineId};
use super::projector::TreeProjector;
use super::view::Column;

impl SceneNodeModel {
    /// Project a newly created scene node (with its subtree) under its parent.
    ///
    /// Returns the new outline node, or `None` when nothing had to change.
    pub fn node_added(&mut self, scene: &dyn SceneGraphPort, node: SceneNodeId) -> Result<Option<OutlineId>, OutlineError> {
        if !self.has_scene() {
            return Ok(None);
        }
        if self.registry.resolve(&self.tree, scene, node).is_some() {
            log::debug!("Scene node {:?} is already in the outline", node);
            return Ok(None);
        }
        let Some(parent) = scene
            .parent(node)
            .and_then(|p| self.registry.resolve(&self.tree, scene, p))
        else {
            log::debug!("Parent of scene node {:?} is not in the outline, ignoring", node);
            return Ok(None);
        };

        let row = self.tree.children(parent).len();
        let parent_index = self.index_for(parent);

        self.signals.begin_insert_rows(parent_index, row, row)?;
        let id = TreeProjector::new(scene).project_node(&mut self.tree, parent, node);
        if let Some(id) = id {
            self.registry.register_subtree(&self.tree, id);
        }
        self.signals.end_insert_rows()?;

        if let Some(index) = id.and_then(|id| self.index_for(id)) {
            self.signals
                .data_changed(index, index.sibling_at_column(Column::Type as usize));
        }
        Ok(id)
    }

    /// Remove the outline subtree of a scene node that is about to be destroyed.
    pub fn node_removing(&mut self, scene: &dyn SceneGraphPort, node: SceneNodeId) -> Result<bool, OutlineError> {
        if !self.has_scene() {
            return Ok(false);
        }
        let Some(id) = self.registry.resolve(&self.tree, scene, node) else {
            return Ok(false);
        };
        let (Some(parent), Some(row)) = (self.tree.parent(id), self.tree.row_of(id)) else {
            return Ok(false);
        };
        if self.tree.get(id).is_some_and(|n| n.kind == NodeKind::SceneContainer) {
            log::warn!("Refusing to remove the scene container");
            return Ok(false);
        }

        let parent_index = self.index_for(parent);
        self.signals.begin_remove_rows(parent_index, row, row)?;
        let removed_ids = self.tree.descendants(id);
        let removed = self.tree.remove(id);
        for (outline, tree_node) in removed_ids.iter().zip(&removed) {
            if let Some(spatial) = tree_node.spatial_node() {
                self.registry.unregister(spatial, *outline);
            }
        }
        self.dropped.retain(|d| !removed_ids.contains(d));
        self.signals.end_remove_rows()?;

        log::debug!("Removed {} outline node(s) for scene node {:?}", removed.len(), node);
        Ok(true)
    }

    /// Refresh the cached texts of a scene node's outline item.
    pub fn node_changed(&mut self, scene: &dyn SceneGraphPort, node: SceneNodeId) -> Result<bool, OutlineError> {
        if !self.has_scene() {
            return Ok(false);
        }
        let Some(id) = self.registry.resolve(&self.tree, scene, node) else {
            return Ok(false);
        };
        let Some(kind) = self.tree.get(id).map(|n| n.kind) else {
            return Ok(false);
        };

        let (name, type_name) = match kind {
            NodeKind::SceneContainer => (scene.scene_name().to_string(), kind.label().to_string()),
            NodeKind::Attachment => (
                scene.node_name(node).unwrap_or_default().to_string(),
                kind.label().to_string(),
            ),
            _ => {
                let fresh = TreeProjector::new(scene).describe(node);
                if fresh.kind != kind {
                    // Entity appeared or vanished; the subtree shape differs.
                    return self.refresh_all(scene).map(|_| true);
                }
                (fresh.name, fresh.type_name)
            }
        };

        if let Some(tree_node) = self.tree.get_mut(id) {
            tree_node.name = name;
            tree_node.type_name = type_name;
        }
        if let Some(index) = self.index_for(id) {
            self.signals
                .data_changed(index, index.sibling_at_column(Column::Type as usize));
        }
        Ok(true)
    }
}

impl SceneGraphListener for SceneNodeModel {
    fn on_node_added(&mut self, scene: &dyn SceneGraphPort, node: SceneNodeId) {
        if let Err(e) = self.node_added(scene, node) {
            log::error!("Failed to project added node {:?}: {}", node, e);
        }
    }

    fn on_node_removing(&mut self, scene: &dyn SceneGraphPort, node: SceneNodeId) {
        if let Err(e) = self.node_removing(scene, node) {
            log::error!("Failed to remove node {:?} from the outline: {}", node, e);
        }
    }

    fn on_node_changed(&mut self, scene: &dyn SceneGraphPort, node: SceneNodeId) {
        if let Err(e) = self.node_changed(scene, node) {
            log::error!("Failed to refresh node {:?}: {}", node, e);
        }
    }

    fn on_graph_dirty(&mut self, scene: &dyn SceneGraphPort) {
        log::debug!("Scene '{}' reported a bulk change, rebuilding outline", scene.scene_name());
        if let Err(e) = self.refresh_all(scene) {
            log::error!("Failed to rebuild outline: {}", e);
        }
    }
}

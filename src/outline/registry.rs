//! Lookup from scene nodes to outline nodes.
//!
//! Resolution first walks the scene's parent chain from the node up to the
//! scene root and replays that path down the outline tree. Nodes held by
//! attachment points have no chain to the root; for those the registry map
//! built alongside the tree is consulted.

use std::collections::HashMap;

use crate::scene::{SceneGraphPort, SceneNodeId};

use super::node::OutlineId;
use super::tree::OutlineTree;

/// Scene node to outline node index.
#[derive(Clone, Debug, Default)]
pub struct NodeRegistry {
    by_node: HashMap<SceneNodeId, OutlineId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `node` is represented by `outline`. Returns the previous entry.
    pub fn register(&mut self, node: SceneNodeId, outline: OutlineId) -> Option<OutlineId> {
        let previous = self.by_node.insert(node, outline);
        if let Some(prev) = previous.filter(|prev| *prev != outline) {
            log::warn!("Scene node {:?} was already registered as {:?}", node, prev);
        }
        previous
    }

    /// Forget `node`, but only while it still maps to `outline`.
    pub fn unregister(&mut self, node: SceneNodeId, outline: OutlineId) -> bool {
        if self.by_node.get(&node) == Some(&outline) {
            self.by_node.remove(&node);
            true
        } else {
            false
        }
    }

    /// Register every spatial node found in the subtree under `top`.
    pub fn register_subtree(&mut self, tree: &OutlineTree, top: OutlineId) {
        for id in tree.descendants(top) {
            if let Some(node) = tree.get(id).and_then(|n| n.spatial_node()) {
                self.register(node, id);
            }
        }
    }

    /// Rebuild the whole map from the tree.
    pub fn rebuild(&mut self, tree: &OutlineTree) {
        self.by_node.clear();
        self.register_subtree(tree, tree.root());
        log::debug!("Node registry rebuilt with {} entries", self.by_node.len());
    }

    pub fn clear(&mut self) {
        self.by_node.clear();
    }

    /// Direct map lookup, validated against the tree.
    pub fn lookup(&self, tree: &OutlineTree, node: SceneNodeId) -> Option<OutlineId> {
        self.by_node
            .get(&node)
            .copied()
            .filter(|id| tree.get(*id).and_then(|n| n.spatial_node()) == Some(node))
    }

    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }

    /// Find the outline node standing for `node`.
    pub fn resolve(
        &self,
        tree: &OutlineTree,
        scene: &dyn SceneGraphPort,
        node: SceneNodeId,
    ) -> Option<OutlineId> {
        resolve_path(tree, scene, node).or_else(|| self.lookup(tree, node))
    }
}

/// Replay the scene path from the root down to `node` through the outline.
///
/// Fails when the chain does not reach the scene root, or when some node on
/// it has no outline counterpart yet.
pub fn resolve_path(tree: &OutlineTree, scene: &dyn SceneGraphPort, node: SceneNodeId) -> Option<OutlineId> {
    let scene_root = scene.root();
    let mut path = vec![node];
    let mut current = node;
    while current != scene_root {
        current = scene.parent(current)?;
        path.push(current);
    }

    let mut cursor = tree.root();
    for step in path.into_iter().rev() {
        cursor = tree
            .children(cursor)
            .iter()
            .copied()
            .find(|child| tree.get(*child).and_then(|n| n.spatial_node()) == Some(step))?;
    }
    Some(cursor)
}

/// Row of an outline node within its parent.
pub fn index_of(tree: &OutlineTree, id: OutlineId) -> Option<usize> {
    tree.row_of(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::projector::TreeProjector;
    use crate::outline::testing::{knight_scene, simple_scene};

    #[test]
    fn test_resolve_path_matches_tree() {
        let (scene, ids) = simple_scene();
        let tree = TreeProjector::new(&scene).build();

        let b = resolve_path(&tree, &scene, ids.b).unwrap();
        assert_eq!(tree.get(b).unwrap().name, "B");
        assert_eq!(tree.get(tree.parent(b).unwrap()).unwrap().name, "A");

        let container = resolve_path(&tree, &scene, scene.root()).unwrap();
        assert_eq!(tree.parent(container), Some(tree.root()));
    }

    #[test]
    fn test_resolve_path_fails_off_hierarchy() {
        let (scene, ids) = knight_scene();
        let tree = TreeProjector::new(&scene).build();

        assert!(resolve_path(&tree, &scene, ids.sword).is_none());
    }

    #[test]
    fn test_resolve_falls_back_to_registry() {
        let (scene, ids) = knight_scene();
        let tree = TreeProjector::new(&scene).build();
        let mut registry = NodeRegistry::new();
        registry.rebuild(&tree);

        let sword = registry.resolve(&tree, &scene, ids.sword).unwrap();
        assert_eq!(tree.get(sword).unwrap().name, "sword");

        let gem = registry.resolve(&tree, &scene, ids.gem).unwrap();
        assert_eq!(tree.parent(gem), Some(sword));
    }

    #[test]
    fn test_rebuild_registers_every_spatial_node() {
        let (scene, ids) = simple_scene();
        let tree = TreeProjector::new(&scene).build();
        let mut registry = NodeRegistry::new();
        registry.rebuild(&tree);

        // root, A, B, C
        assert_eq!(registry.len(), 4);
        let c = registry.lookup(&tree, ids.c).unwrap();
        assert_eq!(index_of(&tree, c), Some(1));
    }

    #[test]
    fn test_unregister_only_matching_entry() {
        let mut registry = NodeRegistry::new();
        registry.register(SceneNodeId(1), OutlineId(5));

        assert!(!registry.unregister(SceneNodeId(1), OutlineId(6)));
        assert!(registry.unregister(SceneNodeId(1), OutlineId(5)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_ignores_stale_entries() {
        let (scene, ids) = simple_scene();
        let mut tree = TreeProjector::new(&scene).build();
        let mut registry = NodeRegistry::new();
        registry.rebuild(&tree);

        let b = registry.lookup(&tree, ids.b).unwrap();
        tree.remove(b);
        assert!(registry.lookup(&tree, ids.b).is_none());
    }
}

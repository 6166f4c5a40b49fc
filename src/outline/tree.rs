//! Outline tree storage.
//!
//! Nodes live in a flat map keyed by [`OutlineId`]; parents own the ordered
//! list of their children, and a child's row is its position in that list.

use std::collections::HashMap;

use super::node::{NodeKind, OutlineId, TreeNode};

/// Arena holding every node of the outline.
#[derive(Clone, Debug)]
pub struct OutlineTree {
    nodes: HashMap<OutlineId, TreeNode>,
    root: OutlineId,
    next_id: u64,
}

impl Default for OutlineTree {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineTree {
    /// Create a tree holding only the invisible root.
    pub fn new() -> Self {
        let root = OutlineId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, TreeNode::new(NodeKind::Root, None, "", ""));

        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    pub fn root(&self) -> OutlineId {
        self.root
    }

    fn alloc_id(&mut self) -> OutlineId {
        let id = OutlineId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append `node` as the last child of `parent`. Returns `None` if the parent is unknown.
    pub fn add_child(&mut self, parent: OutlineId, mut node: TreeNode) -> Option<OutlineId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }

        let id = self.alloc_id();
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.insert(id, node);

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        Some(id)
    }

    /// Remove a node and its entire subtree. Cannot remove the root.
    ///
    /// Returns the removed nodes, the subtree top first.
    pub fn remove(&mut self, id: OutlineId) -> Vec<TreeNode> {
        if id == self.root || !self.nodes.contains_key(&id) {
            return Vec::new();
        }

        let doomed = self.descendants(id);

        // Detach from parent
        if let Some(parent_id) = self.parent(id) {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.retain(|c| *c != id);
            }
        }

        doomed
            .into_iter()
            .filter_map(|nid| self.nodes.remove(&nid))
            .collect()
    }

    /// Move a node to the end of `new_parent`'s children.
    ///
    /// Refuses to move the root, unknown nodes, or a node under its own subtree.
    pub fn reparent(&mut self, id: OutlineId, new_parent: OutlineId) -> bool {
        if id == self.root
            || !self.nodes.contains_key(&id)
            || !self.nodes.contains_key(&new_parent)
            || self.is_ancestor_or_self(id, new_parent)
        {
            return false;
        }

        if let Some(old_parent_id) = self.parent(id) {
            if let Some(old_parent) = self.nodes.get_mut(&old_parent_id) {
                old_parent.children.retain(|c| *c != id);
            }
        }

        if let Some(new_parent_node) = self.nodes.get_mut(&new_parent) {
            new_parent_node.children.push(id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(new_parent);
        }
        true
    }

    /// Drop every node except the root.
    pub fn clear(&mut self) {
        self.nodes.retain(|id, _| *id == self.root);
        if let Some(root) = self.nodes.get_mut(&self.root) {
            root.children.clear();
        }
    }

    pub fn get(&self, id: OutlineId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: OutlineId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: OutlineId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Children of a node in row order. Unknown nodes have none.
    pub fn children(&self, id: OutlineId) -> &[OutlineId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: OutlineId) -> Option<OutlineId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Position of a node among its siblings. The root has no row.
    pub fn row_of(&self, id: OutlineId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    pub fn child_at(&self, parent: OutlineId, row: usize) -> Option<OutlineId> {
        self.children(parent).get(row).copied()
    }

    /// Whether `ancestor` is `node` or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: OutlineId, node: OutlineId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// `id` and everything below it, parents before children.
    pub fn descendants(&self, id: OutlineId) -> Vec<OutlineId> {
        if !self.nodes.contains_key(&id) {
            return Vec::new();
        }

        let mut out = vec![id];
        let mut i = 0;
        while i < out.len() {
            out.extend_from_slice(self.children(out[i]));
            i += 1;
        }
        out
    }

    /// Total number of nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Indented text rendering of the tree below the root, one node per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.root) {
            self.render_node(*child, 0, &mut out);
        }
        out
    }

    fn render_node(&self, id: OutlineId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        out.push_str(&"  ".repeat(depth));
        out.push_str(&node.name);
        out.push_str(" [");
        out.push_str(&node.type_name);
        out.push_str("]\n");
        for child in &node.children {
            self.render_node(*child, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(name: &str) -> TreeNode {
        TreeNode::new(NodeKind::SpatialNode, None, name, NodeKind::SpatialNode.label())
    }

    #[test]
    fn test_new_tree() {
        let tree = OutlineTree::new();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.get(tree.root()).unwrap().kind, NodeKind::Root);
        assert!(tree.children(tree.root()).is_empty());
        assert_eq!(tree.row_of(tree.root()), None);
    }

    #[test]
    fn test_add_child_assigns_rows() {
        let mut tree = OutlineTree::new();
        let root = tree.root();

        let a = tree.add_child(root, plain("a")).unwrap();
        let b = tree.add_child(root, plain("b")).unwrap();
        let c = tree.add_child(a, plain("c")).unwrap();

        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.row_of(b), Some(1));
        assert_eq!(tree.row_of(c), Some(0));
        assert_eq!(tree.parent(c), Some(a));
        assert_eq!(tree.child_at(root, 1), Some(b));
        assert_eq!(tree.child_at(root, 2), None);
    }

    #[test]
    fn test_add_child_unknown_parent() {
        let mut tree = OutlineTree::new();
        assert!(tree.add_child(OutlineId(99), plain("a")).is_none());
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = OutlineTree::new();
        let root = tree.root();
        let a = tree.add_child(root, plain("a")).unwrap();
        let b = tree.add_child(a, plain("b")).unwrap();
        let _c = tree.add_child(b, plain("c")).unwrap();
        let d = tree.add_child(root, plain("d")).unwrap();

        let removed = tree.remove(a);

        assert_eq!(removed.len(), 3);
        assert_eq!(removed[0].name, "a");
        assert_eq!(tree.children(root), &[d]);
        assert_eq!(tree.node_count(), 2);
        assert!(!tree.contains(b));
    }

    #[test]
    fn test_cannot_remove_root() {
        let mut tree = OutlineTree::new();
        let root = tree.root();
        tree.add_child(root, plain("a")).unwrap();

        assert!(tree.remove(root).is_empty());
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn test_reparent_appends() {
        let mut tree = OutlineTree::new();
        let root = tree.root();
        let a = tree.add_child(root, plain("a")).unwrap();
        let b = tree.add_child(root, plain("b")).unwrap();
        let c = tree.add_child(b, plain("c")).unwrap();

        assert!(tree.reparent(a, b));
        assert_eq!(tree.children(root), &[b]);
        assert_eq!(tree.children(b), &[c, a]);
        assert_eq!(tree.row_of(a), Some(1));
    }

    #[test]
    fn test_reparent_refuses_cycle() {
        let mut tree = OutlineTree::new();
        let root = tree.root();
        let a = tree.add_child(root, plain("a")).unwrap();
        let b = tree.add_child(a, plain("b")).unwrap();

        assert!(!tree.reparent(a, b));
        assert!(!tree.reparent(a, a));
        assert!(!tree.reparent(root, a));
        assert_eq!(tree.parent(b), Some(a));
    }

    #[test]
    fn test_descendants_parents_first() {
        let mut tree = OutlineTree::new();
        let root = tree.root();
        let a = tree.add_child(root, plain("a")).unwrap();
        let b = tree.add_child(a, plain("b")).unwrap();
        let c = tree.add_child(a, plain("c")).unwrap();

        assert_eq!(tree.descendants(a), vec![a, b, c]);
        assert!(tree.descendants(OutlineId(42)).is_empty());
    }

    #[test]
    fn test_clear_keeps_root() {
        let mut tree = OutlineTree::new();
        let root = tree.root();
        let a = tree.add_child(root, plain("a")).unwrap();
        tree.add_child(a, plain("b")).unwrap();

        tree.clear();
        assert_eq!(tree.node_count(), 1);
        assert!(tree.children(root).is_empty());
    }

    #[test]
    fn test_render() {
        let mut tree = OutlineTree::new();
        let root = tree.root();
        let a = tree.add_child(root, plain("a")).unwrap();
        tree.add_child(a, plain("b")).unwrap();

        assert_eq!(tree.render(), "a [Scene Node]\n  b [Scene Node]\n");
    }
}

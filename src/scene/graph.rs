//! Scene graph: in-memory hierarchy of spatial nodes and entities.
//!
//! Implements [`SceneGraphPort`] so the outliner can run against it without a
//! rendering engine. Creation, destruction, renames and entity changes are
//! broadcast to subscribed listeners; `detach`/`attach` are silent, matching
//! how engines treat reparenting as a transform-level operation.

use std::collections::{HashMap, HashSet};

use glam::{Quat, Vec3};

use super::entity::{Entity, EntityId, EntityKind, MeshData};
use super::error::SceneError;
use super::node::{DerivedTransform, LocalTransform, SceneNode, SceneNodeId};
use super::port::{ListenerHandle, ListenerId, SceneGraphListener, SceneGraphPort};
use super::skeleton::Skeleton;

/// Name given to the root node of every graph.
pub const ROOT_NODE_NAME: &str = "root";

/// CPU-side scene graph.
pub struct SceneGraph {
    name: String,
    nodes: HashMap<SceneNodeId, SceneNode>,
    names: HashMap<String, SceneNodeId>,
    entities: HashMap<EntityId, Entity>,
    root: SceneNodeId,
    next_id: u64,
    next_entity_id: u64,
    listeners: Vec<(ListenerId, ListenerHandle)>,
    next_listener_id: u64,
}

impl SceneGraph {
    /// Create a new scene graph with an empty root node.
    pub fn new(name: impl Into<String>) -> Self {
        let root_id = SceneNodeId(0);
        let root_node = SceneNode::new(root_id, ROOT_NODE_NAME, LocalTransform::identity());

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root_node);
        let mut names = HashMap::new();
        names.insert(ROOT_NODE_NAME.to_string(), root_id);

        Self {
            name: name.into(),
            nodes,
            names,
            entities: HashMap::new(),
            root: root_id,
            next_id: 1,
            next_entity_id: 1,
            listeners: Vec::new(),
            next_listener_id: 1,
        }
    }

    /// Allocate a fresh node ID.
    fn alloc_id(&mut self) -> SceneNodeId {
        let id = SceneNodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert_node(&mut self, name: String, transform: LocalTransform) -> Result<SceneNodeId, SceneError> {
        if self.names.contains_key(&name) {
            return Err(SceneError::DuplicateName(name));
        }
        let id = self.alloc_id();
        self.names.insert(name.clone(), id);
        self.nodes.insert(id, SceneNode::new(id, name, transform));
        Ok(id)
    }

    /// Create a node under `parent` and announce it to listeners.
    pub fn create_child(
        &mut self,
        parent: SceneNodeId,
        name: impl Into<String>,
        transform: LocalTransform,
    ) -> Result<SceneNodeId, SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::UnknownNode(parent));
        }

        let id = self.insert_node(name.into(), transform)?;
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(parent);
        }
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }

        log::debug!("Scene node {:?} created under {:?}", id, parent);
        self.notify(|listener, scene| listener.on_node_added(scene, id));
        Ok(id)
    }

    /// Create a node outside the hierarchy (e.g. held by an attachment point).
    ///
    /// No notification is sent; the node becomes visible once something
    /// references it.
    pub fn create_detached(
        &mut self,
        name: impl Into<String>,
        transform: LocalTransform,
    ) -> Result<SceneNodeId, SceneError> {
        self.insert_node(name.into(), transform)
    }

    /// Destroy a node with its subtree, entities and attachment-held nodes.
    ///
    /// Listeners get `on_node_removing` for every doomed node, deepest first,
    /// while the whole subtree is still intact.
    pub fn destroy(&mut self, id: SceneNodeId) -> Result<(), SceneError> {
        if id == self.root {
            return Err(SceneError::RootImmutable("destroyed"));
        }
        if !self.nodes.contains_key(&id) {
            return Err(SceneError::UnknownNode(id));
        }

        let mut doomed = Vec::new();
        self.collect_postorder(id, &mut doomed);

        for &nid in &doomed {
            self.notify(|listener, scene| listener.on_node_removing(scene, nid));
        }

        // Detach from parent
        if let Some(parent_id) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.retain(|c| *c != id);
            }
        }

        for &nid in &doomed {
            if let Some(node) = self.nodes.remove(&nid) {
                self.names.remove(&node.name);
                if let Some(entity) = node.entity {
                    self.entities.remove(&entity);
                }
            }
        }

        // Surviving entities must not keep pointing at destroyed held nodes
        for entity in self.entities.values_mut() {
            if let EntityKind::Mesh(mesh) = &mut entity.kind {
                mesh.attachments.retain(|ap| !doomed.contains(&ap.node));
            }
        }

        log::debug!("Scene node {:?} destroyed", id);
        Ok(())
    }

    fn collect_postorder(&self, id: SceneNodeId, out: &mut Vec<SceneNodeId>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        for &child in &node.children {
            self.collect_postorder(child, out);
        }
        if let Some(entity) = node.entity.and_then(|e| self.entities.get(&e)) {
            for ap in entity.attachments() {
                self.collect_postorder(ap.node, out);
            }
        }
        out.push(id);
    }

    /// Change a node's stable identifier.
    pub fn rename(&mut self, id: SceneNodeId, name: impl Into<String>) -> Result<(), SceneError> {
        let name = name.into();
        let old = match self.nodes.get(&id) {
            Some(node) if node.name == name => return Ok(()),
            Some(node) => node.name.clone(),
            None => return Err(SceneError::UnknownNode(id)),
        };
        if self.names.contains_key(&name) {
            return Err(SceneError::DuplicateName(name));
        }

        self.names.remove(&old);
        self.names.insert(name.clone(), id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = name;
        }

        self.notify(|listener, scene| listener.on_node_changed(scene, id));
        Ok(())
    }

    /// Attach a new entity to a node.
    ///
    /// Bones and attachments appear underneath the node, which cannot be
    /// described as a single insertion, so listeners receive `on_graph_dirty`.
    pub fn set_entity(
        &mut self,
        node: SceneNodeId,
        name: impl Into<String>,
        kind: EntityKind,
    ) -> Result<EntityId, SceneError> {
        let scene_node = self.nodes.get(&node).ok_or(SceneError::UnknownNode(node))?;
        if scene_node.entity.is_some() {
            return Err(SceneError::EntityAlreadySet(node));
        }
        if let EntityKind::Mesh(mesh) = &kind {
            self.check_attachments(mesh)?;
        }

        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        self.entities.insert(id, Entity { id, name: name.into(), kind });
        if let Some(scene_node) = self.nodes.get_mut(&node) {
            scene_node.entity = Some(id);
        }

        self.notify(|listener, scene| listener.on_graph_dirty(scene));
        Ok(id)
    }

    /// Held nodes must exist outside the hierarchy and belong to one
    /// attachment point only.
    fn check_attachments(&self, mesh: &MeshData) -> Result<(), SceneError> {
        let mut held = HashSet::new();
        for ap in &mesh.attachments {
            let node = self.nodes.get(&ap.node).ok_or(SceneError::UnknownNode(ap.node))?;
            if ap.node == self.root {
                return Err(SceneError::RootImmutable("held by an attachment point"));
            }
            if node.parent.is_some() {
                return Err(SceneError::AlreadyAttached(ap.node));
            }
            if !held.insert(ap.node) || self.holder_of(ap.node).is_some() {
                return Err(SceneError::AlreadyHeld(ap.node));
            }
        }
        Ok(())
    }

    /// Entity whose attachment point holds `node`.
    pub fn holder_of(&self, node: SceneNodeId) -> Option<EntityId> {
        self.entities
            .values()
            .find(|entity| entity.attachments().iter().any(|ap| ap.node == node))
            .map(|entity| entity.id)
    }

    /// Set the local transform of a node.
    pub fn set_transform(&mut self, id: SceneNodeId, transform: LocalTransform) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::UnknownNode(id))?;
        node.local_transform = transform;
        Ok(())
    }

    /// Get an immutable reference to a node.
    pub fn get(&self, id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Get an entity by ID.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Total number of nodes, including nodes outside the hierarchy.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.iter().filter(|(_, l)| l.strong_count() > 0).count()
    }

    /// World-space placement of a node, accumulated from the top of its chain.
    pub fn derived(&self, id: SceneNodeId) -> Result<DerivedTransform, SceneError> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(nid) = current {
            let node = self.nodes.get(&nid).ok_or(SceneError::UnknownNode(nid))?;
            chain.push(&node.local_transform);
            current = node.parent;
        }

        Ok(chain
            .iter()
            .rev()
            .fold(DerivedTransform::IDENTITY, |acc, local| acc.compose(local)))
    }

    fn parent_frame(&self, id: SceneNodeId) -> Result<DerivedTransform, SceneError> {
        let node = self.nodes.get(&id).ok_or(SceneError::UnknownNode(id))?;
        let frame = match node.parent {
            Some(parent) => self.derived(parent)?,
            None => DerivedTransform::IDENTITY,
        };
        if frame.scale.abs() <= f32::EPSILON {
            return Err(SceneError::DegenerateTransform(id));
        }
        Ok(frame)
    }

    /// Deliver a notification to every live listener.
    fn notify(&mut self, mut deliver: impl FnMut(&mut dyn SceneGraphListener, &dyn SceneGraphPort)) {
        self.listeners.retain(|(_, l)| l.strong_count() > 0);
        let live: Vec<_> = self.listeners.iter().filter_map(|(_, l)| l.upgrade()).collect();

        for listener in live {
            match listener.try_borrow_mut() {
                Ok(mut listener) => deliver(&mut *listener, &*self),
                Err(_) => log::warn!("Scene listener is busy, notification dropped"),
            }
        }
    }
}

impl SceneGraphPort for SceneGraph {
    fn scene_name(&self) -> &str {
        &self.name
    }

    fn root(&self) -> SceneNodeId {
        self.root
    }

    fn children(&self, node: SceneNodeId) -> Vec<SceneNodeId> {
        self.nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn child_count(&self, node: SceneNodeId) -> usize {
        self.nodes.get(&node).map_or(0, |n| n.children.len())
    }

    fn parent(&self, node: SceneNodeId) -> Option<SceneNodeId> {
        self.nodes.get(&node)?.parent
    }

    fn node_name(&self, node: SceneNodeId) -> Option<&str> {
        self.nodes.get(&node).map(|n| n.name.as_str())
    }

    fn find_node(&self, name: &str) -> Option<SceneNodeId> {
        self.names.get(name).copied()
    }

    fn entity_of(&self, node: SceneNodeId) -> Option<EntityId> {
        self.nodes.get(&node)?.entity
    }

    fn entity_name(&self, entity: EntityId) -> Option<&str> {
        self.entities.get(&entity).map(|e| e.name.as_str())
    }

    fn entity_type_name(&self, entity: EntityId) -> Option<&str> {
        self.entities.get(&entity).map(|e| e.type_name())
    }

    fn is_mesh_based(&self, entity: EntityId) -> bool {
        self.entities.get(&entity).is_some_and(|e| e.is_mesh_based())
    }

    fn skeleton(&self, entity: EntityId) -> Option<&Skeleton> {
        self.entities.get(&entity)?.skeleton()
    }

    fn attachments_for_bone(&self, entity: EntityId, bone: &str) -> Vec<SceneNodeId> {
        self.entities
            .get(&entity)
            .map(|e| e.attachments_for_bone(bone))
            .unwrap_or_default()
    }

    fn detach(&mut self, node: SceneNodeId) -> Result<(), SceneError> {
        if node == self.root {
            return Err(SceneError::RootImmutable("detached"));
        }
        let parent = self
            .nodes
            .get(&node)
            .ok_or(SceneError::UnknownNode(node))?
            .parent
            .ok_or(SceneError::NotAttached(node))?;

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.retain(|c| *c != node);
        }
        if let Some(scene_node) = self.nodes.get_mut(&node) {
            scene_node.parent = None;
        }
        Ok(())
    }

    fn attach(&mut self, node: SceneNodeId, parent: SceneNodeId) -> Result<(), SceneError> {
        if node == self.root {
            return Err(SceneError::RootImmutable("attached"));
        }
        let scene_node = self.nodes.get(&node).ok_or(SceneError::UnknownNode(node))?;
        if scene_node.parent.is_some() {
            return Err(SceneError::AlreadyAttached(node));
        }
        if self.holder_of(node).is_some() {
            return Err(SceneError::AlreadyHeld(node));
        }
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::UnknownNode(parent));
        }

        // Walk up from the new parent; meeting `node` means a cycle
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == node {
                return Err(SceneError::Cycle { node, parent });
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(node);
        }
        if let Some(scene_node) = self.nodes.get_mut(&node) {
            scene_node.parent = Some(parent);
        }
        Ok(())
    }

    fn derived_position(&self, node: SceneNodeId) -> Result<Vec3, SceneError> {
        Ok(self.derived(node)?.position)
    }

    fn derived_orientation(&self, node: SceneNodeId) -> Result<Quat, SceneError> {
        Ok(self.derived(node)?.rotation)
    }

    fn set_derived_position(&mut self, node: SceneNodeId, position: Vec3) -> Result<(), SceneError> {
        let frame = self.parent_frame(node)?;
        let local = frame.world_to_local_position(position);
        if let Some(scene_node) = self.nodes.get_mut(&node) {
            scene_node.local_transform.position = local;
        }
        Ok(())
    }

    fn set_derived_orientation(&mut self, node: SceneNodeId, orientation: Quat) -> Result<(), SceneError> {
        let frame = self.parent_frame(node)?;
        let local = frame.world_to_local_rotation(orientation);
        if let Some(scene_node) = self.nodes.get_mut(&node) {
            scene_node.local_transform.rotation = local;
        }
        Ok(())
    }

    fn subscribe(&mut self, listener: ListenerHandle) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }
}

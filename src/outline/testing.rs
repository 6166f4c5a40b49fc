//! Shared fixtures for outline tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

use glam::{Quat, Vec3};

use crate::core::OutlinerConfig;
use crate::scene::{
    EntityId, EntityKind, ListenerHandle, ListenerId, LocalTransform, MeshData, SceneError, SceneGraph,
    SceneGraphPort, SceneNodeId, Skeleton, SkeletonBuilder,
};

use super::model::SceneNodeModel;
use super::node::{ExternalRef, NodeKind, OutlineId};
use super::signals::ModelEvent;
use super::tree::OutlineTree;

pub struct SimpleIds {
    pub a: SceneNodeId,
    pub b: SceneNodeId,
    pub c: SceneNodeId,
}

/// `level`: root -> A -> B, root -> C. C is rotated and scaled.
pub fn simple_scene() -> (SceneGraph, SimpleIds) {
    let mut scene = SceneGraph::new("level");
    let root = scene.root();
    let a = scene
        .create_child(root, "A", LocalTransform::from_position(Vec3::new(1.0, 0.0, 0.0)))
        .unwrap();
    let b = scene
        .create_child(a, "B", LocalTransform::from_position(Vec3::new(0.0, 2.0, 0.0)))
        .unwrap();
    let c = scene
        .create_child(
            root,
            "C",
            LocalTransform::from_position(Vec3::new(5.0, 0.0, -3.0))
                .with_rotation(Quat::from_rotation_y(FRAC_PI_2))
                .with_scale(2.0),
        )
        .unwrap();
    (scene, SimpleIds { a, b, c })
}

pub struct KnightIds {
    pub knight: SceneNodeId,
    pub sword: SceneNodeId,
    pub gem: SceneNodeId,
    pub cape: SceneNodeId,
    pub lamp: SceneNodeId,
}

/// `castle`: a skinned knight holding a sword on its hand bone, plus a lamp.
pub fn knight_scene() -> (SceneGraph, KnightIds) {
    let mut scene = SceneGraph::new("castle");
    let root = scene.root();

    let knight = scene.create_child(root, "knight", LocalTransform::identity()).unwrap();
    let sword = scene.create_detached("sword", LocalTransform::identity()).unwrap();
    let gem = scene
        .create_child(sword, "gem", LocalTransform::from_position(Vec3::new(0.0, 0.5, 0.0)))
        .unwrap();

    let skeleton = SkeletonBuilder::new()
        .add_root("hips")
        .add_bone("spine", "hips")
        .add_bone("hand", "hips")
        .build()
        .unwrap();
    scene
        .set_entity(
            knight,
            "knight",
            EntityKind::Mesh(MeshData::with_skeleton(skeleton).with_attachment("grip", "hand", sword)),
        )
        .unwrap();
    let cape = scene.create_child(knight, "cape", LocalTransform::identity()).unwrap();

    let lamp = scene.create_child(root, "lamp_post", LocalTransform::identity()).unwrap();
    scene.set_entity(lamp, "lamp", EntityKind::Light).unwrap();

    (
        scene,
        KnightIds {
            knight,
            sword,
            gem,
            cape,
            lamp,
        },
    )
}

/// Model projecting `scene` and subscribed to it.
pub fn attached_model(scene: &mut SceneGraph) -> Rc<RefCell<SceneNodeModel>> {
    let model = Rc::new(RefCell::new(SceneNodeModel::new(OutlinerConfig::default())));
    SceneNodeModel::attach(&model, scene).unwrap();
    model
}

/// Collect every event the model publishes from now on.
pub fn record_events(model: &mut SceneNodeModel) -> Rc<RefCell<Vec<ModelEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    model.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

/// Check that the outline mirrors the scene and that the registry is 1:1.
pub fn assert_mirrors_scene(model: &SceneNodeModel, scene: &dyn SceneGraphPort) {
    let tree = model.tree();
    let top = tree.children(tree.root());
    assert_eq!(top.len(), 1, "expected a single scene container");
    assert_mirrors_node(tree, scene, top[0]);

    let mut spatial = 0;
    for id in tree.descendants(tree.root()) {
        if let Some(node) = tree.get(id).and_then(|n| n.spatial_node()) {
            spatial += 1;
            assert_eq!(model.registry().lookup(tree, node), Some(id), "registry entry for {:?}", node);
        }
    }
    assert_eq!(model.registry().len(), spatial);
}

fn assert_mirrors_node(tree: &OutlineTree, scene: &dyn SceneGraphPort, id: OutlineId) {
    let node = tree.get(id).unwrap();
    let children = tree.children(id);

    match node.external {
        Some(ExternalRef::Bone { entity, bone }) => {
            let bone_name = scene.bone_name(entity, bone).unwrap();
            let held: Vec<_> = children
                .iter()
                .filter_map(|c| tree.get(*c))
                .filter(|c| c.kind == NodeKind::Attachment)
                .filter_map(|c| c.spatial_node())
                .collect();
            assert_eq!(held, scene.attachments_for_bone(entity, bone_name), "attachments of bone {}", node.name);
        }
        _ => {
            let spatial = node.spatial_node().unwrap();
            let mirrored: Vec<_> = children
                .iter()
                .filter_map(|c| tree.get(*c))
                .filter(|c| c.kind != NodeKind::Bone)
                .filter_map(|c| c.spatial_node())
                .collect();
            assert_eq!(mirrored, scene.children(spatial), "children of {}", node.name);
        }
    }

    for child in children {
        assert_mirrors_node(tree, scene, *child);
    }
}

/// Scene wrapper that makes chosen primitives fail.
pub struct FlakyScene {
    pub inner: SceneGraph,
    /// Nodes whose detach fails
    pub fail_detach: HashSet<SceneNodeId>,
    /// Parents under which attach fails
    pub fail_attach_under: HashSet<SceneNodeId>,
    /// Nodes whose world orientation cannot be restored
    pub fail_orientation: HashSet<SceneNodeId>,
    /// Attachment points reported on top of the real ones, unchecked
    pub extra_attachments: Vec<(EntityId, String, SceneNodeId)>,
}

impl FlakyScene {
    pub fn new(inner: SceneGraph) -> Self {
        Self {
            inner,
            fail_detach: HashSet::new(),
            fail_attach_under: HashSet::new(),
            fail_orientation: HashSet::new(),
            extra_attachments: Vec::new(),
        }
    }
}

impl SceneGraphPort for FlakyScene {
    fn scene_name(&self) -> &str {
        self.inner.scene_name()
    }

    fn root(&self) -> SceneNodeId {
        self.inner.root()
    }

    fn children(&self, node: SceneNodeId) -> Vec<SceneNodeId> {
        self.inner.children(node)
    }

    fn child_count(&self, node: SceneNodeId) -> usize {
        self.inner.child_count(node)
    }

    fn parent(&self, node: SceneNodeId) -> Option<SceneNodeId> {
        self.inner.parent(node)
    }

    fn node_name(&self, node: SceneNodeId) -> Option<&str> {
        self.inner.node_name(node)
    }

    fn find_node(&self, name: &str) -> Option<SceneNodeId> {
        self.inner.find_node(name)
    }

    fn entity_of(&self, node: SceneNodeId) -> Option<EntityId> {
        self.inner.entity_of(node)
    }

    fn entity_name(&self, entity: EntityId) -> Option<&str> {
        self.inner.entity_name(entity)
    }

    fn entity_type_name(&self, entity: EntityId) -> Option<&str> {
        self.inner.entity_type_name(entity)
    }

    fn is_mesh_based(&self, entity: EntityId) -> bool {
        self.inner.is_mesh_based(entity)
    }

    fn skeleton(&self, entity: EntityId) -> Option<&Skeleton> {
        self.inner.skeleton(entity)
    }

    fn attachments_for_bone(&self, entity: EntityId, bone: &str) -> Vec<SceneNodeId> {
        let mut held = self.inner.attachments_for_bone(entity, bone);
        held.extend(
            self.extra_attachments
                .iter()
                .filter(|(e, b, _)| *e == entity && b == bone)
                .map(|(_, _, node)| *node),
        );
        held
    }

    fn detach(&mut self, node: SceneNodeId) -> Result<(), SceneError> {
        if self.fail_detach.contains(&node) {
            return Err(SceneError::UnknownNode(node));
        }
        self.inner.detach(node)
    }

    fn attach(&mut self, node: SceneNodeId, parent: SceneNodeId) -> Result<(), SceneError> {
        if self.fail_attach_under.contains(&parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        self.inner.attach(node, parent)
    }

    fn derived_position(&self, node: SceneNodeId) -> Result<Vec3, SceneError> {
        self.inner.derived_position(node)
    }

    fn derived_orientation(&self, node: SceneNodeId) -> Result<Quat, SceneError> {
        self.inner.derived_orientation(node)
    }

    fn set_derived_position(&mut self, node: SceneNodeId, position: Vec3) -> Result<(), SceneError> {
        self.inner.set_derived_position(node, position)
    }

    fn set_derived_orientation(&mut self, node: SceneNodeId, orientation: Quat) -> Result<(), SceneError> {
        if self.fail_orientation.contains(&node) {
            return Err(SceneError::DegenerateTransform(node));
        }
        self.inner.set_derived_orientation(node, orientation)
    }

    fn subscribe(&mut self, listener: ListenerHandle) -> ListenerId {
        self.inner.subscribe(listener)
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.inner.unsubscribe(id)
    }
}

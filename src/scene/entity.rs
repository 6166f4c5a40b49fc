//! Renderable entities attached to scene nodes

use super::node::SceneNodeId;
use super::skeleton::Skeleton;

/// Unique identifier for an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// A named anchor on a bone holding an independent spatial node.
///
/// The held node lives outside the main hierarchy: it has no scene parent and
/// is placed by the skeleton rather than by the node chain.
#[derive(Clone, Debug, PartialEq)]
pub struct AttachmentPoint {
    pub name: String,
    pub bone: String,
    pub node: SceneNodeId,
}

/// Mesh payload of an entity.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub skeleton: Option<Skeleton>,
    pub attachments: Vec<AttachmentPoint>,
}

impl MeshData {
    /// Mesh without skeleton.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mesh driven by a skeleton.
    pub fn with_skeleton(skeleton: Skeleton) -> Self {
        Self {
            skeleton: Some(skeleton),
            attachments: Vec::new(),
        }
    }

    /// Register an attachment point against a bone name.
    pub fn with_attachment(mut self, name: impl Into<String>, bone: impl Into<String>, node: SceneNodeId) -> Self {
        self.attachments.push(AttachmentPoint {
            name: name.into(),
            bone: bone.into(),
            node,
        });
        self
    }
}

/// What kind of renderable an entity is.
#[derive(Clone, Debug)]
pub enum EntityKind {
    Mesh(MeshData),
    Light,
    Camera,
}

/// A renderable object attached to a spatial node.
#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
}

impl Entity {
    /// Whether this entity is backed by mesh geometry.
    pub fn is_mesh_based(&self) -> bool {
        matches!(self.kind, EntityKind::Mesh(_))
    }

    /// Skeleton of a mesh entity, if it has one.
    pub fn skeleton(&self) -> Option<&Skeleton> {
        match &self.kind {
            EntityKind::Mesh(mesh) => mesh.skeleton.as_ref(),
            _ => None,
        }
    }

    /// Attachment points of a mesh entity.
    pub fn attachments(&self) -> &[AttachmentPoint] {
        match &self.kind {
            EntityKind::Mesh(mesh) => &mesh.attachments,
            _ => &[],
        }
    }

    /// Held nodes of every attachment point registered for `bone`, in registration order.
    pub fn attachments_for_bone(&self, bone: &str) -> Vec<SceneNodeId> {
        self.attachments()
            .iter()
            .filter(|ap| ap.bone == bone)
            .map(|ap| ap.node)
            .collect()
    }

    /// Human readable type label.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            EntityKind::Mesh(_) => "Mesh Entity",
            EntityKind::Light => "Light",
            EntityKind::Camera => "Camera",
        }
    }
}

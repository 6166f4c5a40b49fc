//! Scene graph node types
//!
//! Core types for the in-memory scene graph: node IDs, transforms and nodes.

use glam::{Mat4, Quat, Vec3};

use super::entity::EntityId;

/// Unique identifier for a scene graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneNodeId(pub u64);

/// Local transform relative to the parent node.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl LocalTransform {
    /// Identity transform (no translation, rotation, or scaling).
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a translation-only transform.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Replace the rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Replace the uniform scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a 4x4 matrix.
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.position,
        )
    }
}

/// World-space placement of a node, accumulated through its parent chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivedTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl DerivedTransform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };

    /// Compose a child's local transform onto this (parent) placement.
    pub fn compose(&self, local: &LocalTransform) -> Self {
        Self {
            position: self.position + self.rotation * (local.position * self.scale),
            rotation: (self.rotation * local.rotation).normalize(),
            scale: self.scale * local.scale,
        }
    }

    /// Express a world-space position in this placement's local frame.
    pub fn world_to_local_position(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.position) / self.scale
    }

    /// Express a world-space orientation in this placement's local frame.
    pub fn world_to_local_rotation(&self, world: Quat) -> Quat {
        (self.rotation.inverse() * world).normalize()
    }
}

/// A single node in the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub id: SceneNodeId,
    /// Stable identifier, unique within the graph.
    pub name: String,
    pub parent: Option<SceneNodeId>,
    pub children: Vec<SceneNodeId>,
    pub local_transform: LocalTransform,
    /// Entity attached to this node, if any.
    pub entity: Option<EntityId>,
}

impl SceneNode {
    /// Create a new, unparented scene node.
    pub fn new(id: SceneNodeId, name: impl Into<String>, local_transform: LocalTransform) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local_transform,
            entity: None,
        }
    }
}

//! Outline tree node types

use crate::scene::{BoneIndex, EntityId, SceneNodeId};

/// Identifier of a node in the outline tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutlineId(pub u64);

/// What an outline node stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Invisible top of the tree.
    Root,
    /// The attached scene; stands for the scene's root spatial node.
    SceneContainer,
    /// A spatial node without an entity.
    SpatialNode,
    /// A spatial node carrying an entity.
    Entity,
    /// A bone of a mesh entity's skeleton.
    Bone,
    /// A spatial node held by a bone attachment point.
    Attachment,
}

impl NodeKind {
    /// Whether the view may start a drag on nodes of this kind.
    pub fn is_draggable(self) -> bool {
        !matches!(self, Self::Root | Self::SceneContainer | Self::Bone)
    }

    /// Type column label for kinds that do not take it from the entity.
    pub fn label(self) -> &'static str {
        match self {
            Self::Root => "",
            Self::SceneContainer => "Scene",
            Self::SpatialNode => "Scene Node",
            Self::Entity => "Entity",
            Self::Bone => "Bone",
            Self::Attachment => "Attachment",
        }
    }
}

/// Non-owning association with the external object behind an outline node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExternalRef {
    Spatial(SceneNodeId),
    Entity { node: SceneNodeId, entity: EntityId },
    Bone { entity: EntityId, bone: BoneIndex },
}

impl ExternalRef {
    /// The spatial node behind this reference. Bones have none.
    pub fn spatial_node(&self) -> Option<SceneNodeId> {
        match *self {
            Self::Spatial(node) | Self::Entity { node, .. } => Some(node),
            Self::Bone { .. } => None,
        }
    }
}

/// A single node of the outline tree.
#[derive(Clone, Debug)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub external: Option<ExternalRef>,
    pub parent: Option<OutlineId>,
    /// Owned children; their order defines row numbers.
    pub children: Vec<OutlineId>,
    /// Cached Name column text
    pub name: String,
    /// Cached Type column text
    pub type_name: String,
}

impl TreeNode {
    /// Create an unlinked node.
    pub fn new(
        kind: NodeKind,
        external: Option<ExternalRef>,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            external,
            parent: None,
            children: Vec::new(),
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// The spatial node behind this outline node, if any.
    pub fn spatial_node(&self) -> Option<SceneNodeId> {
        self.external.and_then(|e| e.spatial_node())
    }
}

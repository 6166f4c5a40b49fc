//! Bone hierarchy of a mesh entity
//!
//! The outliner only needs names and parent links, so a skeleton here is a
//! rig description: no poses, no animation state.

use std::collections::HashMap;

use super::error::SceneError;

/// Index of a bone within its skeleton.
pub type BoneIndex = usize;

/// A named joint of a skeleton.
#[derive(Clone, Debug)]
pub struct Bone {
    pub name: String,
    pub parent: Option<BoneIndex>,
}

impl Bone {
    pub fn new(name: impl Into<String>, parent: Option<BoneIndex>) -> Self {
        Self {
            name: name.into(),
            parent,
        }
    }
}

/// Bones in insertion order, with root and child lists kept in that order.
#[derive(Clone, Debug, Default)]
pub struct Skeleton {
    bones: Vec<Bone>,
    by_name: HashMap<String, BoneIndex>,
    roots: Vec<BoneIndex>,
    child_lists: Vec<Vec<BoneIndex>>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bone. Its parent must already be part of the rig and its
    /// name must be unused.
    pub fn add_bone(&mut self, bone: Bone) -> Result<BoneIndex, SceneError> {
        if self.by_name.contains_key(&bone.name) {
            return Err(SceneError::Skeleton(format!("duplicate bone '{}'", bone.name)));
        }
        let index = self.bones.len();
        match bone.parent {
            Some(parent) => match self.child_lists.get_mut(parent) {
                Some(children) => children.push(index),
                None => return Err(SceneError::Skeleton(format!("bone '{}' has unknown parent {}", bone.name, parent))),
            },
            None => self.roots.push(index),
        }

        self.by_name.insert(bone.name.clone(), index);
        self.child_lists.push(Vec::new());
        self.bones.push(bone);
        Ok(index)
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn get_bone(&self, index: BoneIndex) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn bone_name(&self, index: BoneIndex) -> Option<&str> {
        self.bones.get(index).map(|bone| bone.name.as_str())
    }

    pub fn find_bone(&self, name: &str) -> Option<BoneIndex> {
        self.by_name.get(name).copied()
    }

    pub fn parent_index(&self, index: BoneIndex) -> Option<BoneIndex> {
        self.bones.get(index).and_then(|bone| bone.parent)
    }

    /// Bones without a parent
    pub fn root_bones(&self) -> Vec<BoneIndex> {
        self.roots.clone()
    }

    /// Direct child bones; empty for an unknown index
    pub fn children(&self, index: BoneIndex) -> Vec<BoneIndex> {
        self.child_lists.get(index).cloned().unwrap_or_default()
    }
}

/// Name-based rig construction. The first failure sticks and is reported
/// by `build`.
#[derive(Default)]
pub struct SkeletonBuilder {
    skeleton: Skeleton,
    error: Option<SceneError>,
}

impl SkeletonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(self, name: &str) -> Self {
        self.push(Bone::new(name, None))
    }

    pub fn add_bone(self, name: &str, parent: &str) -> Self {
        match self.skeleton.find_bone(parent) {
            Some(parent) => self.push(Bone::new(name, Some(parent))),
            None => self.fail(SceneError::Skeleton(format!("Parent bone '{}' not found", parent))),
        }
    }

    pub fn build(self) -> Result<Skeleton, SceneError> {
        match self.error {
            Some(error) => Err(error),
            None if self.skeleton.bone_count() == 0 => Err(SceneError::Skeleton("empty skeleton".into())),
            None => Ok(self.skeleton),
        }
    }

    fn push(mut self, bone: Bone) -> Self {
        if self.error.is_none() {
            if let Err(error) = self.skeleton.add_bone(bone) {
                self.error = Some(error);
            }
        }
        self
    }

    fn fail(mut self, error: SceneError) -> Self {
        self.error.get_or_insert(error);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> Skeleton {
        SkeletonBuilder::new()
            .add_root("hips")
            .add_bone("spine", "hips")
            .add_bone("thigh_l", "hips")
            .add_bone("hand_r", "spine")
            .build()
            .unwrap()
    }

    #[test]
    fn test_rig_lookup() {
        let skeleton = rig();

        assert_eq!(skeleton.bone_count(), 4);
        assert_eq!(skeleton.find_bone("hand_r"), Some(3));
        assert_eq!(skeleton.bone_name(1), Some("spine"));
        assert_eq!(skeleton.bone_name(9), None);
        assert_eq!(skeleton.parent_index(3), Some(1));
    }

    #[test]
    fn test_children_follow_insertion_order() {
        let skeleton = rig();

        assert_eq!(skeleton.root_bones(), vec![0]);
        assert_eq!(skeleton.children(0), vec![1, 2]);
        assert_eq!(skeleton.children(1), vec![3]);
        assert!(skeleton.children(3).is_empty());
    }

    #[test]
    fn test_multiple_root_bones() {
        let mut skeleton = Skeleton::new();
        let hips = skeleton.add_bone(Bone::new("hips", None)).unwrap();
        let prop = skeleton.add_bone(Bone::new("prop", None)).unwrap();
        skeleton.add_bone(Bone::new("spine", Some(hips))).unwrap();

        assert_eq!(skeleton.root_bones(), vec![hips, prop]);
        assert!(skeleton.children(prop).is_empty());
    }

    #[test]
    fn test_builder_rejects_unknown_parent() {
        let result = SkeletonBuilder::new()
            .add_root("hips")
            .add_bone("hand_r", "arm_r")
            .build();

        assert_eq!(result.err(), Some(SceneError::Skeleton("Parent bone 'arm_r' not found".into())));
    }

    #[test]
    fn test_builder_rejects_empty_rig() {
        assert!(matches!(SkeletonBuilder::new().build(), Err(SceneError::Skeleton(_))));
    }

    #[test]
    fn test_add_bone_validation() {
        let mut skeleton = Skeleton::new();
        skeleton.add_bone(Bone::new("hips", None)).unwrap();

        assert!(skeleton.add_bone(Bone::new("hips", None)).is_err());
        assert!(skeleton.add_bone(Bone::new("loose", Some(7))).is_err());
        assert_eq!(skeleton.bone_count(), 1);
    }
}

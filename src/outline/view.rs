//! Hierarchical read contract consumed by views.
//!
//! Indexes address a cell by row and column under a parent; `None` stands for
//! the invisible root. Reads never change the model and degrade to empty
//! results when no scene is attached or an index has gone stale.

use bitflags::bitflags;

use crate::core::config::COLUMN_COUNT;

use super::model::SceneNodeModel;
use super::node::OutlineId;

/// Address of one cell of the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModelIndex {
    pub row: usize,
    pub column: usize,
    pub node: OutlineId,
}

impl ModelIndex {
    /// Same row, different column.
    pub fn sibling_at_column(self, column: usize) -> Self {
        Self { column, ..self }
    }
}

/// The model's columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Name = 0,
    Type = 1,
}

impl Column {
    pub fn from_index(column: usize) -> Option<Self> {
        match column {
            0 => Some(Self::Name),
            1 => Some(Self::Type),
            _ => None,
        }
    }
}

bitflags! {
    /// Per-item capabilities reported to the view.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ItemFlags: u32 {
        const SELECTABLE = 1 << 0;
        const EDITABLE = 1 << 1;
        const DRAG_ENABLED = 1 << 2;
        const DROP_ENABLED = 1 << 3;
        const ENABLED = 1 << 5;
    }
}

bitflags! {
    /// Set of drag-and-drop actions.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DropActions: u32 {
        const COPY = 1 << 0;
        const MOVE = 1 << 1;
        const LINK = 1 << 2;
    }
}

bitflags! {
    /// Text alignment hint.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Alignment: u32 {
        const LEFT = 0x01;
        const RIGHT = 0x02;
        const HCENTER = 0x04;
        const TOP = 0x20;
        const BOTTOM = 0x40;
        const VCENTER = 0x80;
    }
}

/// Action requested by a drop gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DropAction {
    Ignore,
    Copy,
    Move,
    Link,
}

/// What a `data` query asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemRole {
    Display,
    Edit,
    ToolTip,
    Decoration,
    TextAlignment,
}

/// Answer to a `data` or `header_data` query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemData {
    Text(String),
    Alignment(Alignment),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Read contract of a hierarchical item model.
pub trait ItemModel {
    fn index(&self, row: usize, column: usize, parent: Option<ModelIndex>) -> Option<ModelIndex>;

    fn parent(&self, index: ModelIndex) -> Option<ModelIndex>;

    fn row_count(&self, parent: Option<ModelIndex>) -> usize;

    fn column_count(&self, parent: Option<ModelIndex>) -> usize;

    fn data(&self, index: ModelIndex, role: ItemRole) -> Option<ItemData>;

    fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole) -> Option<ItemData>;

    fn flags(&self, index: Option<ModelIndex>) -> ItemFlags;

    fn has_children(&self, parent: Option<ModelIndex>) -> bool {
        self.row_count(parent) > 0
    }
}

impl SceneNodeModel {
    /// Outline node addressed by `parent`, where `None` is the root.
    fn parent_node(&self, parent: Option<ModelIndex>) -> Option<OutlineId> {
        match parent {
            None => Some(self.tree().root()),
            Some(index) if index.column != 0 => None,
            Some(index) => self.tree().contains(index.node).then_some(index.node),
        }
    }
}

impl ItemModel for SceneNodeModel {
    fn index(&self, row: usize, column: usize, parent: Option<ModelIndex>) -> Option<ModelIndex> {
        if !self.has_scene() || column >= COLUMN_COUNT {
            return None;
        }
        let parent = self.parent_node(parent)?;
        let node = self.tree().child_at(parent, row)?;
        Some(ModelIndex { row, column, node })
    }

    fn parent(&self, index: ModelIndex) -> Option<ModelIndex> {
        let parent = self.tree().parent(index.node)?;
        self.index_for(parent)
    }

    fn row_count(&self, parent: Option<ModelIndex>) -> usize {
        if !self.has_scene() {
            return 0;
        }
        self.parent_node(parent)
            .map_or(0, |id| self.tree().children(id).len())
    }

    fn column_count(&self, parent: Option<ModelIndex>) -> usize {
        match parent {
            Some(index) if index.column != 0 => 0,
            _ => COLUMN_COUNT,
        }
    }

    fn data(&self, index: ModelIndex, role: ItemRole) -> Option<ItemData> {
        if !self.has_scene() {
            return None;
        }
        let column = Column::from_index(index.column)?;
        let node = self.tree().get(index.node)?;

        match role {
            ItemRole::Display | ItemRole::Edit | ItemRole::ToolTip => Some(ItemData::Text(match column {
                Column::Name => node.name.clone(),
                Column::Type => node.type_name.clone(),
            })),
            ItemRole::TextAlignment => Some(ItemData::Alignment(Alignment::LEFT | Alignment::VCENTER)),
            ItemRole::Decoration => None,
        }
    }

    fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole) -> Option<ItemData> {
        if orientation != Orientation::Horizontal || role != ItemRole::Display {
            return None;
        }
        self.config()
            .column_headers
            .get(section)
            .map(|label| ItemData::Text(label.clone()))
    }

    fn flags(&self, index: Option<ModelIndex>) -> ItemFlags {
        let Some(index) = index else {
            return ItemFlags::empty();
        };
        let Some(node) = self.tree().get(index.node) else {
            return ItemFlags::empty();
        };

        let mut flags = ItemFlags::SELECTABLE | ItemFlags::ENABLED;
        if index.column == Column::Name as usize {
            flags |= ItemFlags::EDITABLE | ItemFlags::DROP_ENABLED;
            if node.kind.is_draggable() {
                flags |= ItemFlags::DRAG_ENABLED;
            }
        }
        flags
    }
}

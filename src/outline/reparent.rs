//! Drag-and-drop reparenting.
//!
//! A drag publishes the stable names of the dragged scene nodes as a JSON
//! array under the configured content type. A drop moves every named node
//! under the drop target's scene node, keeping its world position and
//! orientation. Items are handled one at a time: a failure abandons that item
//! and the rest of the drop continues. Dropping a node on its current parent
//! moves it one level up instead, unless it already sits at the top.

use std::collections::HashSet;

use crate::scene::{SceneError, SceneGraphPort, SceneNodeId};

use super::deferred::DeferredTask;
use super::error::OutlineError;
use super::model::SceneNodeModel;
use super::node::{NodeKind, OutlineId};
use super::view::{DropAction, DropActions, ModelIndex};

/// Drag payload keyed by content type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MimeData {
    entries: Vec<(String, Vec<u8>)>,
}

impl MimeData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` under `format`, replacing any previous entry.
    pub fn set_data(&mut self, format: impl Into<String>, data: Vec<u8>) {
        let format = format.into();
        match self.entries.iter_mut().find(|(f, _)| *f == format) {
            Some(entry) => entry.1 = data,
            None => self.entries.push((format, data)),
        }
    }

    pub fn data(&self, format: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(f, _)| f == format)
            .map(|(_, d)| d.as_slice())
    }

    pub fn has_format(&self, format: &str) -> bool {
        self.data(format).is_some()
    }

    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }
}

/// Serialize node names into a drag payload body.
pub fn encode_node_names(names: &[String]) -> Result<Vec<u8>, OutlineError> {
    serde_json::to_vec(names).map_err(|e| OutlineError::MalformedPayload(e.to_string()))
}

/// Parse a drag payload body back into node names.
pub fn decode_node_names(bytes: &[u8]) -> Result<Vec<String>, OutlineError> {
    serde_json::from_slice(bytes).map_err(|e| OutlineError::MalformedPayload(e.to_string()))
}

/// Why a dropped item was left alone.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    /// No scene node carries the name.
    UnknownNode,
    /// The scene node has no outline counterpart.
    Unresolved,
    /// The effective target has no outline counterpart.
    NoTarget,
    /// The target lies inside the dragged node's own subtree.
    WouldCreateCycle,
    /// A scene primitive failed.
    Engine(SceneError),
    /// The outline could not follow a change the scene already made.
    Model(OutlineError),
}

/// Result of one dropped item.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemOutcome {
    Moved {
        node: OutlineId,
        from_row: usize,
        to_row: usize,
    },
    /// Dropped on its own top-level parent; selected but not moved.
    Unchanged { node: OutlineId },
    Skipped { name: String, reason: SkipReason },
}

/// Per-item results of a drop, in payload order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DropOutcome {
    pub items: Vec<ItemOutcome>,
}

impl DropOutcome {
    pub fn moved_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i, ItemOutcome::Moved { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i, ItemOutcome::Skipped { .. }))
            .count()
    }

    /// Outline nodes that were moved or deliberately left in place.
    pub fn affected(&self) -> Vec<OutlineId> {
        self.items
            .iter()
            .filter_map(|i| match i {
                ItemOutcome::Moved { node, .. } | ItemOutcome::Unchanged { node } => Some(*node),
                ItemOutcome::Skipped { .. } => None,
            })
            .collect()
    }
}

/// How a scene-side move failed.
enum MoveFailure {
    /// Nothing changed structurally.
    Rejected(SceneError),
    /// The node went back under its old parent, now as the last child.
    Restored(SceneError),
    /// The node is under its new parent but its world placement was not restored.
    Misplaced(SceneError),
    /// Putting the node back failed as well; it is out of the hierarchy.
    Stranded(SceneError),
}

impl SceneNodeModel {
    /// Content types this model publishes and accepts.
    pub fn mime_types(&self) -> Vec<String> {
        vec![self.config.mime_type.clone()]
    }

    pub fn supported_drag_actions(&self) -> DropActions {
        DropActions::MOVE
    }

    pub fn supported_drop_actions(&self) -> DropActions {
        DropActions::MOVE
    }

    /// Build the drag payload for `indexes`.
    ///
    /// Each distinct row contributes the stable name of its scene node once;
    /// bones and stale indexes contribute nothing.
    pub fn mime_data(&self, scene: &dyn SceneGraphPort, indexes: &[ModelIndex]) -> Result<MimeData, OutlineError> {
        let mut seen = HashSet::new();
        let names: Vec<String> = indexes
            .iter()
            .filter(|index| seen.insert(index.node))
            .filter_map(|index| self.tree.get(index.node))
            .filter_map(|node| node.spatial_node())
            .filter_map(|node| scene.node_name(node))
            .map(str::to_string)
            .collect();

        let mut data = MimeData::new();
        data.set_data(self.config.mime_type.clone(), encode_node_names(&names)?);
        Ok(data)
    }

    /// View-facing drop entry point. Returns whether the drop was accepted.
    ///
    /// `row` is accepted for interface compatibility; dropped nodes always
    /// become the last children of their new parent.
    pub fn drop_mime_data(
        &mut self,
        scene: &mut dyn SceneGraphPort,
        data: Option<&MimeData>,
        action: DropAction,
        row: Option<usize>,
        column: Option<usize>,
        parent: Option<ModelIndex>,
    ) -> bool {
        match self.drop_nodes(scene, data, action, column, parent) {
            Ok(outcome) => {
                log::debug!("Drop at row {:?} finished: {:?}", row, outcome);
                true
            }
            Err(e) => {
                log::debug!("Drop rejected: {}", e);
                false
            }
        }
    }

    /// Validate a drop and move every named node under `parent`.
    pub fn drop_nodes(
        &mut self,
        scene: &mut dyn SceneGraphPort,
        data: Option<&MimeData>,
        action: DropAction,
        column: Option<usize>,
        parent: Option<ModelIndex>,
    ) -> Result<DropOutcome, OutlineError> {
        match action {
            DropAction::Ignore => return Ok(DropOutcome::default()),
            DropAction::Move => {}
            other => return Err(OutlineError::UnsupportedAction(other)),
        }
        if let Some(column) = column.filter(|c| *c > 0) {
            return Err(OutlineError::UnsupportedColumn(column));
        }
        let data = data.ok_or(OutlineError::MissingPayload)?;
        let bytes = data
            .data(&self.config.mime_type)
            .ok_or_else(|| OutlineError::UnsupportedFormat(self.config.mime_type.clone()))?;
        if !self.has_scene() {
            return Err(OutlineError::NoScene);
        }

        let target = match parent {
            Some(index) if self.tree.contains(index.node) => index.node,
            Some(_) => return Err(OutlineError::StaleIndex),
            None => self.tree.root(),
        };
        let drop_parent = self
            .tree
            .get(target)
            .and_then(|n| n.spatial_node())
            .ok_or(OutlineError::NoDropTarget)?;
        let names = decode_node_names(bytes)?;

        let mut outcome = DropOutcome::default();
        for name in names {
            let item = self.drop_one(scene, name, target, drop_parent);
            outcome.items.push(item);
        }
        self.dropped = outcome.affected();

        if self.config.select_after_drop {
            self.deferred.push_unique(DeferredTask::SelectDropped);
        } else {
            self.dropped.clear();
        }

        log::info!(
            "Dropped {} item(s): {} moved, {} skipped",
            outcome.items.len(),
            outcome.moved_count(),
            outcome.skipped_count()
        );
        Ok(outcome)
    }

    fn drop_one(
        &mut self,
        scene: &mut dyn SceneGraphPort,
        name: String,
        target: OutlineId,
        drop_parent: SceneNodeId,
    ) -> ItemOutcome {
        let skip = |name: String, reason: SkipReason| -> ItemOutcome {
            log::warn!("Skipping dropped node '{}': {:?}", name, reason);
            ItemOutcome::Skipped { name, reason }
        };

        let Some(node) = scene.find_node(&name) else {
            return skip(name, SkipReason::UnknownNode);
        };
        let Some(id) = self.registry.resolve(&self.tree, &*scene, node) else {
            return skip(name, SkipReason::Unresolved);
        };
        let current_parent = scene.parent(node);

        let (new_parent, new_parent_id) = if current_parent == Some(drop_parent) {
            let target_is_top_level = self
                .tree
                .parent(target)
                .and_then(|p| self.tree.get(p))
                .is_some_and(|p| p.kind == NodeKind::SceneContainer);
            let grandparent = scene.parent(drop_parent);

            match grandparent {
                Some(grandparent) if !target_is_top_level => {
                    match self.registry.resolve(&self.tree, &*scene, grandparent) {
                        Some(grandparent_id) => (grandparent, grandparent_id),
                        None => return skip(name, SkipReason::NoTarget),
                    }
                }
                _ => return ItemOutcome::Unchanged { node: id },
            }
        } else {
            (drop_parent, target)
        };

        if is_scene_ancestor_or_self(&*scene, node, new_parent) || self.tree.is_ancestor_or_self(id, new_parent_id) {
            return skip(name, SkipReason::WouldCreateCycle);
        }
        let Some(source_parent) = self.tree.parent(id) else {
            return skip(name, SkipReason::Unresolved);
        };

        let misplaced = match move_in_scene(scene, node, current_parent, new_parent) {
            Ok(()) => None,
            Err(MoveFailure::Rejected(e)) => return skip(name, SkipReason::Engine(e)),
            Err(MoveFailure::Restored(e)) => {
                // Sibling order must follow the re-attached scene node
                if let Err(model) = self.move_row(id, source_parent) {
                    return skip(name, SkipReason::Model(model));
                }
                return skip(name, SkipReason::Engine(e));
            }
            Err(MoveFailure::Stranded(e)) => {
                // The scene dropped the node from its hierarchy; so does the outline
                if let Err(model) = self.node_removing(&*scene, node) {
                    return skip(name, SkipReason::Model(model));
                }
                return skip(name, SkipReason::Engine(e));
            }
            Err(MoveFailure::Misplaced(e)) => Some(e),
        };

        let (from_row, to_row) = match self.move_row(id, new_parent_id) {
            Ok(rows) => rows,
            Err(model) => return skip(name, SkipReason::Model(model)),
        };
        if let Some(e) = misplaced {
            return skip(name, SkipReason::Engine(e));
        }
        log::debug!("Moved '{}' from row {} to row {}", name, from_row, to_row);
        ItemOutcome::Moved { node: id, from_row, to_row }
    }

    /// Move an outline row to the end of `new_parent` inside a move bracket.
    ///
    /// Returns the old row and the destination row announced to views.
    fn move_row(&mut self, id: OutlineId, new_parent: OutlineId) -> Result<(usize, usize), OutlineError> {
        let (Some(source_parent), Some(from_row)) = (self.tree.parent(id), self.tree.row_of(id)) else {
            return Err(OutlineError::StaleIndex);
        };
        let to_row = self.tree.children(new_parent).len();
        if source_parent == new_parent && from_row + 1 == to_row {
            return Ok((from_row, from_row));
        }

        let source_index = self.index_for(source_parent);
        let destination_index = self.index_for(new_parent);
        self.signals
            .begin_move_rows(source_index, from_row, from_row, destination_index, to_row)?;
        self.tree.reparent(id, new_parent);
        self.signals.end_move_rows()?;
        Ok((from_row, to_row))
    }
}

fn is_scene_ancestor_or_self(scene: &dyn SceneGraphPort, ancestor: SceneNodeId, node: SceneNodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = scene.parent(id);
    }
    false
}

/// Move `node` under `new_parent` in the scene, keeping its world placement.
fn move_in_scene(
    scene: &mut dyn SceneGraphPort,
    node: SceneNodeId,
    old_parent: Option<SceneNodeId>,
    new_parent: SceneNodeId,
) -> Result<(), MoveFailure> {
    let position = scene.derived_position(node).map_err(MoveFailure::Rejected)?;
    let orientation = scene.derived_orientation(node).map_err(MoveFailure::Rejected)?;

    scene.detach(node).map_err(MoveFailure::Rejected)?;
    if let Err(e) = scene.attach(node, new_parent) {
        let Some(old_parent) = old_parent else {
            return Err(MoveFailure::Stranded(e));
        };
        return match scene.attach(node, old_parent) {
            Ok(()) => Err(MoveFailure::Restored(e)),
            Err(restore) => {
                log::error!("Could not put {:?} back under {:?}: {}", node, old_parent, restore);
                Err(MoveFailure::Stranded(e))
            }
        };
    }

    scene
        .set_derived_position(node, position)
        .map_err(MoveFailure::Misplaced)?;
    scene
        .set_derived_orientation(node, orientation)
        .map_err(MoveFailure::Misplaced)?;
    Ok(())
}

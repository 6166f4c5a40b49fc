//! Structural change notifications for views.
//!
//! Every structural edit of the outline is wrapped in a bracket: an announce
//! event before the tree changes and the matching commit event after. At most
//! one bracket is open at a time.

use super::error::OutlineError;
use super::view::ModelIndex;

/// Events published to model observers. `None` parents mean the invisible root.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelEvent {
    AboutToReset,
    Reset,
    AboutToInsertRows {
        parent: Option<ModelIndex>,
        first: usize,
        last: usize,
    },
    RowsInserted {
        parent: Option<ModelIndex>,
        first: usize,
        last: usize,
    },
    AboutToRemoveRows {
        parent: Option<ModelIndex>,
        first: usize,
        last: usize,
    },
    RowsRemoved {
        parent: Option<ModelIndex>,
        first: usize,
        last: usize,
    },
    AboutToMoveRows {
        source_parent: Option<ModelIndex>,
        first: usize,
        last: usize,
        destination_parent: Option<ModelIndex>,
        destination_row: usize,
    },
    RowsMoved {
        source_parent: Option<ModelIndex>,
        first: usize,
        last: usize,
        destination_parent: Option<ModelIndex>,
        destination_row: usize,
    },
    DataChanged {
        top_left: ModelIndex,
        bottom_right: ModelIndex,
    },
    /// Deferred request for the view to select these items.
    SelectionRequested(Vec<ModelIndex>),
}

/// Kinds of structural bracket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BracketKind {
    Reset,
    Insert,
    Remove,
    Move,
}

/// Handle returned by [`ChangeSignals::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

type Observer = Box<dyn FnMut(&ModelEvent)>;

/// Observer list plus the currently open bracket.
#[derive(Default)]
pub struct ChangeSignals {
    observers: Vec<(ObserverId, Observer)>,
    next_observer_id: u64,
    open: Option<(BracketKind, ModelEvent)>,
}

impl ChangeSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&ModelEvent) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// The bracket currently open, if any.
    pub fn open_bracket(&self) -> Option<BracketKind> {
        self.open.as_ref().map(|(kind, _)| *kind)
    }

    pub fn begin_reset(&mut self) -> Result<(), OutlineError> {
        self.begin(BracketKind::Reset, ModelEvent::AboutToReset, ModelEvent::Reset)
    }

    pub fn end_reset(&mut self) -> Result<(), OutlineError> {
        self.end(BracketKind::Reset)
    }

    pub fn begin_insert_rows(&mut self, parent: Option<ModelIndex>, first: usize, last: usize) -> Result<(), OutlineError> {
        self.begin(
            BracketKind::Insert,
            ModelEvent::AboutToInsertRows { parent, first, last },
            ModelEvent::RowsInserted { parent, first, last },
        )
    }

    pub fn end_insert_rows(&mut self) -> Result<(), OutlineError> {
        self.end(BracketKind::Insert)
    }

    pub fn begin_remove_rows(&mut self, parent: Option<ModelIndex>, first: usize, last: usize) -> Result<(), OutlineError> {
        self.begin(
            BracketKind::Remove,
            ModelEvent::AboutToRemoveRows { parent, first, last },
            ModelEvent::RowsRemoved { parent, first, last },
        )
    }

    pub fn end_remove_rows(&mut self) -> Result<(), OutlineError> {
        self.end(BracketKind::Remove)
    }

    /// Announce moving rows `first..=last` of `source_parent` before `destination_row` of `destination_parent`.
    pub fn begin_move_rows(
        &mut self,
        source_parent: Option<ModelIndex>,
        first: usize,
        last: usize,
        destination_parent: Option<ModelIndex>,
        destination_row: usize,
    ) -> Result<(), OutlineError> {
        self.begin(
            BracketKind::Move,
            ModelEvent::AboutToMoveRows {
                source_parent,
                first,
                last,
                destination_parent,
                destination_row,
            },
            ModelEvent::RowsMoved {
                source_parent,
                first,
                last,
                destination_parent,
                destination_row,
            },
        )
    }

    pub fn end_move_rows(&mut self) -> Result<(), OutlineError> {
        self.end(BracketKind::Move)
    }

    pub fn data_changed(&mut self, top_left: ModelIndex, bottom_right: ModelIndex) {
        self.emit(&ModelEvent::DataChanged { top_left, bottom_right });
    }

    pub fn selection_requested(&mut self, indexes: Vec<ModelIndex>) {
        self.emit(&ModelEvent::SelectionRequested(indexes));
    }

    fn begin(&mut self, kind: BracketKind, announce: ModelEvent, commit: ModelEvent) -> Result<(), OutlineError> {
        if let Some(open) = self.open_bracket() {
            return Err(OutlineError::BracketInFlight(open));
        }
        self.emit(&announce);
        self.open = Some((kind, commit));
        Ok(())
    }

    fn end(&mut self, kind: BracketKind) -> Result<(), OutlineError> {
        match self.open.take() {
            Some((open, commit)) if open == kind => {
                self.emit(&commit);
                Ok(())
            }
            other => {
                self.open = other;
                Err(OutlineError::BracketNotOpen(kind))
            }
        }
    }

    fn emit(&mut self, event: &ModelEvent) {
        log::trace!("Model event {:?}", event);
        for (_, observer) in &mut self.observers {
            observer(event);
        }
    }
}

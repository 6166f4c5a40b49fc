//! The scene outline model.
//!
//! [`SceneNodeModel`] owns the projected tree, the scene-node registry and the
//! change signals. It reads the scene only through [`SceneGraphPort`], is kept
//! in sync by the listener callbacks in `bridge`, and edits the scene on drops
//! (see `reparent`).

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::OutlinerConfig;
use crate::scene::{ListenerId, SceneGraphListener, SceneGraphPort, SceneNodeId};

use super::deferred::{DeferredQueue, DeferredTask};
use super::error::OutlineError;
use super::node::{OutlineId, TreeNode};
use super::projector::TreeProjector;
use super::registry::NodeRegistry;
use super::signals::{ChangeSignals, ModelEvent, ObserverId};
use super::tree::OutlineTree;
use super::view::ModelIndex;

/// Tree model projecting a scene graph for an outliner view.
pub struct SceneNodeModel {
    pub(crate) config: OutlinerConfig,
    pub(crate) tree: OutlineTree,
    pub(crate) registry: NodeRegistry,
    pub(crate) signals: ChangeSignals,
    /// Root spatial node of the attached scene
    pub(crate) scene_root: Option<SceneNodeId>,
    pub(crate) listener: Option<ListenerId>,
    /// Nodes affected by the last drop, selected once deferred work runs
    pub(crate) dropped: Vec<OutlineId>,
    pub(crate) deferred: DeferredQueue<DeferredTask>,
}

impl SceneNodeModel {
    /// Create a model with no scene attached.
    pub fn new(config: OutlinerConfig) -> Self {
        Self {
            config,
            tree: OutlineTree::new(),
            registry: NodeRegistry::new(),
            signals: ChangeSignals::new(),
            scene_root: None,
            listener: None,
            dropped: Vec::new(),
            deferred: DeferredQueue::new(),
        }
    }

    pub fn config(&self) -> &OutlinerConfig {
        &self.config
    }

    pub fn tree(&self) -> &OutlineTree {
        &self.tree
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn has_scene(&self) -> bool {
        self.scene_root.is_some()
    }

    /// Listener registration held with the attached scene, if any.
    pub fn listener_id(&self) -> Option<ListenerId> {
        self.listener
    }

    /// Observe structural and content events.
    pub fn subscribe(&mut self, observer: impl FnMut(&ModelEvent) + 'static) -> ObserverId {
        self.signals.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.signals.unsubscribe(id)
    }

    /// Replace the projected scene, or clear the model with `None`.
    ///
    /// The whole change is one reset bracket. The model does not subscribe to
    /// the scene here; see [`SceneNodeModel::attach`].
    pub fn set_scene(&mut self, scene: Option<&dyn SceneGraphPort>) -> Result<(), OutlineError> {
        self.signals.begin_reset()?;

        self.dropped.clear();
        match scene {
            Some(scene) => {
                self.tree = TreeProjector::new(scene).build();
                self.registry.rebuild(&self.tree);
                self.scene_root = Some(scene.root());
                log::info!(
                    "Outline reset for scene '{}' ({} nodes)",
                    scene.scene_name(),
                    self.tree.node_count() - 1
                );
            }
            None => {
                self.tree.clear();
                self.registry.clear();
                self.scene_root = None;
                log::info!("Outline cleared");
            }
        }

        self.signals.end_reset()
    }

    /// Discard the projection and rebuild it from the current scene.
    ///
    /// Does nothing while no scene is attached.
    pub fn refresh_all(&mut self, scene: &dyn SceneGraphPort) -> Result<(), OutlineError> {
        if !self.has_scene() {
            return Ok(());
        }
        self.set_scene(Some(scene))
    }

    /// Project `scene` and subscribe the shared model to its notifications.
    pub fn attach(model: &Rc<RefCell<Self>>, scene: &mut dyn SceneGraphPort) -> Result<(), OutlineError> {
        if let Some(stale) = model.borrow().listener {
            log::warn!("Model still holds listener {:?}; detach it from its previous scene first", stale);
        }

        model.borrow_mut().set_scene(Some(&*scene))?;

        let handle: Rc<RefCell<dyn SceneGraphListener>> = model.clone();
        let id = scene.subscribe(Rc::downgrade(&handle));
        model.borrow_mut().listener = Some(id);
        log::debug!("Outline model subscribed to scene '{}' as {:?}", scene.scene_name(), id);
        Ok(())
    }

    /// Unsubscribe from `scene` and clear the model.
    pub fn detach(model: &Rc<RefCell<Self>>, scene: &mut dyn SceneGraphPort) -> Result<(), OutlineError> {
        let listener = model.borrow_mut().listener.take();
        if let Some(id) = listener {
            if !scene.unsubscribe(id) {
                log::warn!("Listener {:?} was not registered with scene '{}'", id, scene.scene_name());
            }
        }
        model.borrow_mut().set_scene(None)
    }

    /// Outline node addressed by `index`; `None` addresses the root.
    pub fn node_for_index(&self, index: Option<ModelIndex>) -> Option<&TreeNode> {
        match index {
            None => self.tree.get(self.tree.root()),
            Some(index) => self.tree.get(index.node),
        }
    }

    /// Column-0 index of an outline node. The root and unknown nodes have none.
    pub fn index_for(&self, id: OutlineId) -> Option<ModelIndex> {
        let row = self.tree.row_of(id)?;
        Some(ModelIndex { row, column: 0, node: id })
    }

    /// Column-0 index of the outline node standing for a scene node.
    pub fn index_from_node(&self, scene: &dyn SceneGraphPort, node: SceneNodeId) -> Option<ModelIndex> {
        if !self.has_scene() {
            return None;
        }
        let id = self.registry.resolve(&self.tree, scene, node)?;
        self.index_for(id)
    }

    /// Whether deferred work is waiting for [`SceneNodeModel::run_deferred`].
    pub fn has_pending_tasks(&self) -> bool {
        !self.deferred.is_empty()
    }

    /// Run deferred work queued by earlier operations. Returns the number of tasks run.
    ///
    /// Hosts call this once control is back in their event loop, after the
    /// gesture that queued the work has finished.
    pub fn run_deferred(&mut self) -> usize {
        let tasks = self.deferred.take_all();
        let count = tasks.len();
        for task in tasks {
            match task {
                DeferredTask::SelectDropped => self.select_dropped(),
            }
        }
        count
    }

    fn select_dropped(&mut self) {
        let dropped = std::mem::take(&mut self.dropped);
        let indexes: Vec<ModelIndex> = dropped.into_iter().filter_map(|id| self.index_for(id)).collect();
        log::debug!("Requesting selection of {} dropped item(s)", indexes.len());
        self.signals.selection_requested(indexes);
    }
}

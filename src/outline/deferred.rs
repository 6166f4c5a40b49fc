//! Work postponed until the host's event loop regains control.

use std::collections::VecDeque;

/// Tasks the model queues for later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredTask {
    /// Request selection of the nodes affected by the last drop.
    SelectDropped,
}

/// FIFO of pending tasks.
#[derive(Clone, Debug)]
pub struct DeferredQueue<T> {
    tasks: VecDeque<T>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self { tasks: VecDeque::new() }
    }

    pub fn push(&mut self, task: T) {
        self.tasks.push_back(task);
    }

    /// Take every queued task, oldest first.
    pub fn take_all(&mut self) -> Vec<T> {
        self.tasks.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<T: PartialEq> DeferredQueue<T> {
    /// Queue `task` unless an equal task is already waiting.
    pub fn push_unique(&mut self, task: T) -> bool {
        if self.tasks.contains(&task) {
            return false;
        }
        self.tasks.push_back(task);
        true
    }
}

//! Tick-ordered queue of deferred continuations.

use std::collections::{BTreeMap, HashMap};

use palxel_core::{Task, TaskHandle};

/// Deferred tasks keyed by due tick and then by submission order.
#[derive(Debug)]
pub(crate) struct TaskQueue {
    queue: BTreeMap<(u64, TaskHandle), Task>,
    due_ticks: HashMap<TaskHandle, u64>,
    next_handle: u64,
}

impl TaskQueue {
    /// Creates an empty queue.
    pub(crate) fn new() -> Self {
        Self {
            queue: BTreeMap::new(),
            due_ticks: HashMap::new(),
            next_handle: 1,
        }
    }

    /// Queues `task` to become due at `due_tick`.
    pub(crate) fn push(&mut self, due_tick: u64, task: Task) -> TaskHandle {
        let handle = TaskHandle::new(self.next_handle);
        self.next_handle += 1;
        let _ = self.queue.insert((due_tick, handle), task);
        let _ = self.due_ticks.insert(handle, due_tick);
        handle
    }

    /// Drops a queued task. Returns `false` if it already ran or never existed.
    pub(crate) fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.due_ticks.remove(&handle) {
            Some(due_tick) => self.queue.remove(&(due_tick, handle)).is_some(),
            None => false,
        }
    }

    /// Removes and returns every task due at or before `tick`, oldest first.
    pub(crate) fn drain_due(&mut self, tick: u64) -> Vec<(TaskHandle, Task)> {
        let pending = self.queue.split_off(&(tick + 1, TaskHandle::new(0)));
        let due = std::mem::replace(&mut self.queue, pending);
        due.into_iter()
            .map(|((_, handle), task)| {
                let _ = self.due_ticks.remove(&handle);
                (handle, task)
            })
            .collect()
    }

    /// Number of tasks still waiting.
    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    /// Reports whether `handle` is still waiting.
    pub(crate) fn contains(&self, handle: TaskHandle) -> bool {
        self.due_ticks.contains_key(&handle)
    }
}

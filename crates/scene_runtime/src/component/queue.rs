//! Deferred update queue
//!
//! Mid-frame mutations from input, gameplay logic, or callbacks are not
//! applied where they occur. They are queued on the target node and drained
//! in FIFO order at that node's apply step, before its cells advance, so
//! every reader within a frame observes the same state.

use super::node::ComponentNode;

/// A deferred mutation applied at the owning node's next apply step
pub type PendingUpdate = Box<dyn FnOnce(&mut ComponentNode)>;

/// FIFO queue of pending updates for one node
#[derive(Default)]
pub struct UpdateQueue {
    pending: Vec<PendingUpdate>,
}

impl UpdateQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action; order of arrival is order of execution
    pub fn push(&mut self, action: PendingUpdate) {
        self.pending.push(action);
    }

    /// Number of queued actions
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the queue holds no actions
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Discard all queued actions without executing them
    pub(crate) fn clear(&mut self) {
        self.pending.clear();
    }

    /// Take all queued actions, leaving the queue empty
    ///
    /// Actions queued while the drained batch executes land in the fresh
    /// queue and run next frame.
    pub(crate) fn take(&mut self) -> Vec<PendingUpdate> {
        std::mem::take(&mut self.pending)
    }
}

impl std::fmt::Debug for UpdateQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateQueue")
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_drains_in_fifo_order() {
        let mut queue = UpdateQueue::new();
        queue.push(Box::new(|_| {}));
        queue.push(Box::new(|_| {}));
        assert_eq!(queue.len(), 2);

        let drained = queue.take();
        assert_eq!(drained.len(), 2);
        assert!(queue.is_empty());
    }
}

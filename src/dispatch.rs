//! Result delivery abstraction.
//!
//! Scans run on the blocking pool; their callbacks are handed to a
//! [`ResultDispatcher`] which decides on which thread they finally run.
//! Hosts with a UI thread drain a [`DispatchQueue`] from that thread.

use std::sync::Arc;

use tokio::sync::mpsc;

/// A callback ready to run.
pub type DispatchTask = Box<dyn FnOnce() + Send + 'static>;

/// Delivers completed scan results to their callbacks.
pub trait ResultDispatcher: Send + Sync {
    /// Schedule `task` to run exactly once.
    fn dispatch(&self, task: DispatchTask);
}

/// Shared reference to a ResultDispatcher implementation.
pub type SharedDispatcher = Arc<dyn ResultDispatcher>;

/// Runs callbacks immediately on the thread that completed the scan.
#[derive(Debug, Clone, Default)]
pub struct InlineDispatcher;

impl ResultDispatcher for InlineDispatcher {
    fn dispatch(&self, task: DispatchTask) {
        task();
    }
}

/// Queues callbacks for a host-owned thread.
#[derive(Debug, Clone)]
pub struct TaskQueueDispatcher {
    sender: mpsc::UnboundedSender<DispatchTask>,
}

/// Receiving side of a [`TaskQueueDispatcher`].
pub struct DispatchQueue {
    receiver: mpsc::UnboundedReceiver<DispatchTask>,
}

impl TaskQueueDispatcher {
    /// Create a dispatcher and the queue the host thread drains.
    pub fn new() -> (Self, DispatchQueue) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, DispatchQueue { receiver })
    }
}

impl ResultDispatcher for TaskQueueDispatcher {
    fn dispatch(&self, task: DispatchTask) {
        if self.sender.send(task).is_err() {
            tracing::warn!("Dispatch queue closed, dropping callback");
        }
    }
}

impl DispatchQueue {
    /// Run every queued callback without blocking. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Wait for the next callback and run it. Returns `false` once every
    /// dispatcher has been dropped.
    pub async fn run_next(&mut self) -> bool {
        match self.receiver.recv().await {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }
}

//! Event loop plumbing for the loader.
//!
//! Fetchers may run anywhere (inline, on host threads, on a tokio runtime),
//! but they never touch the dependency graph. They report through a
//! [`FetchCompletion`], which posts a [`FetchTask`] onto a channel owned by
//! this loop. The [`Loader`](crate::Loader) is the single consumer: it pulls
//! tasks off the channel one at a time and, after each one, drains the
//! [`ReadyQueue`] so readiness propagates without recursive callbacks.

use crate::fetcher::{FetchCompletion, FetchRequest};
use crate::task_queue::{FetchTask, ReadyQueue};
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Completion channel plus ready-propagation queue.
#[derive(Debug)]
pub struct EventLoop {
    sender: Sender<FetchTask>,
    receiver: Receiver<FetchTask>,
    ready_queue: ReadyQueue,
    outstanding: usize,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates an event loop with empty queues.
    pub fn new() -> Self {
        let (sender, receiver) = channel::unbounded();
        Self {
            sender,
            receiver,
            ready_queue: ReadyQueue::new(),
            outstanding: 0,
        }
    }

    /// Issues the completion handle for a newly scheduled fetch.
    pub fn completion(&mut self, request: FetchRequest) -> FetchCompletion {
        self.outstanding += 1;
        FetchCompletion::new(request, self.sender.clone())
    }

    /// Number of fetches scheduled but not yet received back.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Takes the next completed fetch without blocking.
    pub fn try_next_task(&mut self) -> Option<FetchTask> {
        let task = self.receiver.try_recv().ok()?;
        self.outstanding = self.outstanding.saturating_sub(1);
        Some(task)
    }

    /// Blocks until a fetch completes.
    pub fn next_task(&mut self) -> Option<FetchTask> {
        let task = self.receiver.recv().ok()?;
        self.outstanding = self.outstanding.saturating_sub(1);
        Some(task)
    }

    /// Blocks until a fetch completes or `timeout` passes.
    pub fn next_task_timeout(&mut self, timeout: Duration) -> Option<FetchTask> {
        match self.receiver.recv_timeout(timeout) {
            Ok(task) => {
                self.outstanding = self.outstanding.saturating_sub(1);
                Some(task)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Records that `name` became Ready.
    pub fn enqueue_ready(&mut self, name: String) {
        self.ready_queue.enqueue(name);
    }

    /// Takes the next Ready unit whose dependents need a re-check.
    pub fn next_ready(&mut self) -> Option<String> {
        self.ready_queue.dequeue()
    }

    /// Returns true if no readiness event is waiting.
    pub fn is_ready_queue_empty(&self) -> bool {
        self.ready_queue.is_empty()
    }
}

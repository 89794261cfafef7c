//! Task and ready-queue types used by the event loop.
//!
//! Fetch completions arrive as [`FetchTask`]s, one per scheduled fetch.
//! Units that just became Ready are queued on the [`ReadyQueue`]; after each
//! task the loop drains it so every dependent gets re-checked.

use crate::fetcher::{FetchRequest, Script};
use std::collections::VecDeque;
use std::fmt;

/// The outcome of one scheduled fetch.
pub enum FetchTask {
    /// The code was retrieved and must now be executed
    Completed {
        /// The request being answered
        request: FetchRequest,
        /// The fetched code
        script: Script,
    },
    /// The fetcher gave up without completing
    Abandoned {
        /// The request being answered
        request: FetchRequest,
    },
}

impl FetchTask {
    /// The request this task answers.
    pub fn request(&self) -> &FetchRequest {
        match self {
            FetchTask::Completed { request, .. } | FetchTask::Abandoned { request } => request,
        }
    }
}

impl fmt::Debug for FetchTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchTask::Completed { request, .. } => {
                f.debug_struct("Completed").field("request", request).finish()
            }
            FetchTask::Abandoned { request } => {
                f.debug_struct("Abandoned").field("request", request).finish()
            }
        }
    }
}

/// FIFO of units that became Ready and whose dependents await a re-check.
#[derive(Debug, Default)]
pub struct ReadyQueue {
    queue: VecDeque<String>,
}

impl ReadyQueue {
    /// Creates a new empty ReadyQueue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Adds a unit name to the end of the queue.
    pub fn enqueue(&mut self, name: String) {
        self.queue.push_back(name);
    }

    /// Removes and returns the next unit name.
    pub fn dequeue(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued names.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

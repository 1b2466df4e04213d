//=========================================================================
// Transition Queue
//=========================================================================
//
// FIFO of requested transitions.
//
// Requests are queued at any time and started at tick boundaries, one
// at a time: a request only starts once the previous transition has
// returned to `Idle`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

//=== TransitionRequest ===================================================

/// A transition entry point to invoke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionRequest {
    /// Cold start via `initialize_first_scene`.
    InitializeFirstScene,

    /// `navigate_to_scene` with an optional explicit target.
    NavigateTo(Option<String>),
}

//=== TransitionQueue =====================================================

/// FIFO of pending transition requests.
pub struct TransitionQueue {
    queue: VecDeque<TransitionRequest>,
}

impl TransitionQueue {
    /// Creates a new empty transition queue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Queues a request behind any already pending.
    pub fn push(&mut self, request: TransitionRequest) {
        self.queue.push_back(request);
    }

    /// Removes and returns the oldest pending request.
    pub fn pop_next(&mut self) -> Option<TransitionRequest> {
        self.queue.pop_front()
    }

    /// Returns an iterator over the pending requests, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TransitionRequest> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Drops every pending request.
    pub fn clear(&mut self) {
        self.queue.clear()
    }
}

impl Default for TransitionQueue {
    fn default() -> Self {
        Self::new()
    }
}

//=== Tests ===============================================================

//! Click event model for asynchronous click counting.

/// A served redirect, queued for the background click worker.
///
/// Sent over a bounded channel with `try_send`, so the redirect path never
/// waits on analytics. Events are dropped when the queue is full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub code: String,
}

impl ClickEvent {
    /// Creates a new click event for a short code.
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

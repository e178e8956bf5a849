//! Side effects requested by the event handler.
//!
//! [`handle_event`](super::handle_event) never performs I/O. It returns a list
//! of actions and the runtime executes them in order.

use crate::worker::WorkerMessage;

/// Commands the runtime executes after an event has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hands a request to the search worker.
    ///
    /// The response comes back later as [`Event::WorkerResponse`](super::Event::WorkerResponse).
    PostToWorker(WorkerMessage),

    /// Replaces the current location query string.
    ///
    /// User edits never change [`FilterState`](crate::domain::FilterState)
    /// directly. The runtime stores the new location and dispatches
    /// [`Event::Navigate`](super::Event::Navigate) for it.
    PushLocation(String),
}

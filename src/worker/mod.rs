//! Background execution of search and detail requests.
//!
//! The orchestrator never awaits the network. It emits a [`WorkerMessage`],
//! the runtime hands it to a [`SearchWorker`], and the resulting
//! [`WorkerResponse`] comes back as an event on a later turn.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol with request tokens and trace context propagation
//! - `handler`: Worker implementation over a [`SearchApi`](crate::client::SearchApi)

pub mod handler;
pub mod messages;

pub use handler::SearchWorker;
pub use messages::{RequestToken, SearchOutcome, TraceContext, WorkerMessage, WorkerResponse};

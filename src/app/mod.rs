//! Application layer: the search orchestrator.
//!
//! Sits between the runtime driver and the domain/worker layers. Every change
//! to the search session flows through one function, [`handle_event`].
//!
//! # Architecture
//!
//! ```text
//! location ─▶ Navigate ─▶ handle_event ─▶ state transitions ─▶ Actions
//!    ▲                         ▲                                  │
//!    │                         └──── WorkerResponse ◀── worker ◀──┤ PostToWorker
//!    └────────────────────────────────────────────────────────────┘ PushLocation
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects returned by the handler
//! - [`filter`]: Local type/year refinement of cached results
//! - [`handler`]: Events and the transition function
//! - [`modes`]: Fetch lifecycle status
//! - [`state`]: The search context and its session

pub mod actions;
pub mod filter;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use filter::FilteredView;
pub use handler::{handle_event, Event};
pub use modes::SearchStatus;
pub use state::{AppState, SearchSession};

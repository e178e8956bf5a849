//! Presentation hand-off.
//!
//! Rendering is left to whatever consumes the crate. This layer only derives
//! the data a presenter needs:
//!
//! ```text
//! AppState → compute_viewmodel → SearchViewModel → presenter
//! ```

pub mod viewmodel;

pub use viewmodel::SearchViewModel;

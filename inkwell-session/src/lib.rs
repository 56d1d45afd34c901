//! # Inkwell Session
//!
//! The page-level coordinator of a practice session. It owns the session
//! state and one long-lived analysis client, turns widget events into state
//! transitions, and runs the analyses those transitions trigger.
//!
//! ```rust,no_run
//! use inkwell_core::StrokeSequence;
//! use inkwell_session::Coordinator;
//!
//! # async fn demo() -> Result<(), inkwell_session::SessionError> {
//! let coordinator = Coordinator::from_env()?;
//!
//! let strokes = StrokeSequence::from_json("[[[0, 0], [10, 10]]]").expect("strokes");
//! coordinator.on_drawing_state_change(true);
//! coordinator.on_stroke_update(strokes);
//! if let Some(task) = coordinator.on_drawing_state_change(false) {
//!     let _ = task.await;
//! }
//!
//! let snapshot = coordinator.snapshot();
//! println!("{:?}", snapshot.results);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod coordinator;
pub mod error;
mod sink;

pub use coordinator::{AnalysisTask, Coordinator};
pub use error::{SessionError, SessionResult};

//! Core state machine types.
//!
//! This module contains the pieces a state implementation touches directly:
//! - State behavior via the [`State`] trait and its hook surface
//! - Typed events and per-state capability filters
//! - The [`Control`] surface for raising transition requests from hooks

mod control;
mod event;
mod state;

pub use control::{ChangePriority, Control};
pub use event::{Event, EventFilter, NoEvent};
pub use state::{AsAny, SinglePhase, State, StateId};

pub(crate) use control::ChangeRequest;

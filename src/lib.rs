//! Canopy: a hierarchical state machine engine.
//!
//! A machine is declared once as a tree of states, flattened into a runtime
//! hierarchy at construction, and then driven every tick by transition
//! requests, update passes, and typed events. Steady-state dispatch is
//! allocation-free: transient buffers are drawn from pools owned by the
//! machine and recycled before each call returns.
//!
//! # Core Concepts
//!
//! - **State**: behavior via the [`core::State`] hook surface
//!   (`enter`/`update`/`leave`/`react`)
//! - **Hierarchy**: built with the [`builder`] combinators
//!   (`root`/`composite`/`leaf`) and frozen at machine construction
//! - **Control**: hooks raise transition requests through [`core::Control`];
//!   requests resolve fully before the triggering call returns
//! - **Events**: typed broadcasts filtered per state by event kind
//!
//! # Example
//!
//! ```rust
//! use canopy::builder::{composite, leaf, root};
//! use canopy::core::{Control, SinglePhase, State};
//! use canopy::machine::Machine;
//!
//! #[derive(Default)]
//! struct Room {
//!     switch_on: bool,
//! }
//!
//! struct Light;
//! struct On;
//! struct Off;
//!
//! impl State<Room> for Light {
//!     fn enter(&mut self, _room: &mut Room, control: &mut Control) {
//!         control.change_to::<Off>();
//!     }
//! }
//!
//! impl State<Room> for Off {
//!     fn update(&mut self, room: &mut Room, _phase: SinglePhase, control: &mut Control) {
//!         if room.switch_on {
//!             control.change_to::<On>();
//!         }
//!     }
//! }
//!
//! impl State<Room> for On {}
//!
//! let mut machine: Machine<Room> =
//!     root(composite(Light, vec![leaf(On), leaf(Off)])).into_machine(Room::default())?;
//!
//! machine.start();
//! assert!(machine.is_active::<Off>());
//!
//! machine.context_mut().switch_on = true;
//! machine.update(SinglePhase::Default);
//! assert!(machine.is_active::<On>());
//! # Ok::<(), canopy::builder::BuildError>(())
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod pool;

// Re-export commonly used types
pub use builder::{composite, leaf, root, BuildError};
pub use core::{ChangePriority, Control, Event, EventFilter, SinglePhase, State};
pub use machine::Machine;

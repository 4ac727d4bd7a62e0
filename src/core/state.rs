//! The state hook surface and build-time state handles.

use std::any::Any;

use crate::core::control::Control;
use crate::core::event::{Event, EventFilter, NoEvent};

/// Handle for a declared state, assigned when the hierarchy is flattened.
///
/// All internal identity comparisons are integer equality on these handles;
/// type-based lookups happen only at the public API boundary. Handle 0 is
/// always the root state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StateId(u32);

impl StateId {
    pub(crate) const ROOT: StateId = StateId(0);

    pub(crate) fn new(index: usize) -> Self {
        StateId(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Update-phase tag for machines with a single update pass per tick.
///
/// Hosts that split a tick into several passes (input, physics, render, ...)
/// supply their own phase enum instead.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SinglePhase {
    #[default]
    Default,
}

/// Downcast support for boxed state objects.
///
/// Implemented for every `'static` type; lets
/// [`Machine::access`](crate::machine::Machine::access) recover the concrete
/// state behind a `dyn State`.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behavior of a single declared state.
///
/// Every hook has an empty default implementation, so states implement only
/// what they use. Hooks receive the machine's context exclusively and a
/// [`Control`] for raising transition requests; a request raised inside a
/// hook is resolved before the triggering machine call returns.
///
/// `C` is the caller-supplied context type, `P` the update-phase tag passed
/// to every [`update`](State::update), and `E` the event type broadcast via
/// [`react`](State::react).
///
/// # Example
///
/// ```rust
/// use canopy::core::{Control, SinglePhase, State};
///
/// struct Guard {
///     alerted: bool,
/// }
///
/// struct Patrol {
///     waypoint: usize,
/// }
///
/// struct Chase;
///
/// impl State<Guard> for Patrol {
///     fn update(&mut self, context: &mut Guard, _phase: SinglePhase, control: &mut Control) {
///         if context.alerted {
///             control.change_to::<Chase>();
///         } else {
///             self.waypoint += 1;
///         }
///     }
/// }
///
/// impl State<Guard> for Chase {}
/// ```
#[allow(unused_variables)]
pub trait State<C, P = SinglePhase, E = NoEvent>: AsAny
where
    E: Event,
{
    /// Declare the event kinds this state reacts to. Called once when the
    /// hierarchy is built; states with an empty filter never see events.
    fn filter_events(&self, filter: &mut EventFilter<E::Kind>) {}

    /// Called when the state becomes active, outermost ancestor first.
    fn enter(&mut self, context: &mut C, control: &mut Control) {}

    /// Called once per visited stack position on every update pass.
    fn update(&mut self, context: &mut C, phase: P, control: &mut Control) {}

    /// Called when the state is deactivated, innermost descendant first.
    /// Requests raised here are discarded.
    fn leave(&mut self, context: &mut C, control: &mut Control) {}

    /// Called for a broadcast event whose kind passes this state's filter.
    fn react(&mut self, context: &mut C, event: &E, control: &mut Control) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        entered: u32,
    }

    impl State<()> for Probe {
        fn enter(&mut self, _context: &mut (), _control: &mut Control) {
            self.entered += 1;
        }
    }

    #[test]
    fn default_hooks_are_no_ops() {
        let mut probe = Probe { entered: 0 };
        let mut control = Control::default();

        probe.update(&mut (), SinglePhase::Default, &mut control);
        probe.leave(&mut (), &mut control);
        assert_eq!(probe.entered, 0);
        assert!(control.first_request().is_none());
    }

    #[test]
    fn as_any_recovers_concrete_state() {
        let probe: Box<dyn State<()>> = Box::new(Probe { entered: 3 });

        let concrete = probe
            .as_any()
            .downcast_ref::<Probe>()
            .expect("boxed state downcasts to its concrete type");
        assert_eq!(concrete.entered, 3);
    }

    #[test]
    fn state_id_round_trips_through_index() {
        let id = StateId::new(7);
        assert_eq!(id.index(), 7);
        assert_ne!(id, StateId::ROOT);
    }
}

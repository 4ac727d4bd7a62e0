//! Typed events and per-state capability filters.
//!
//! Events are broadcast over the active-state stack by
//! [`Machine::react`](crate::machine::Machine::react). A state only receives
//! an event when the [`EventFilter`] it declared at build time through
//! [`State::filter_events`](crate::core::State::filter_events) includes the
//! event's kind.

use std::fmt::Debug;

/// A typed event that can be broadcast to the active states.
///
/// `Kind` is a cheap discriminant used for capability filtering, so states
/// can declare which events they care about without naming payloads. The
/// [`event_enum!`](crate::event_enum) macro generates the kind enum and this
/// impl for plain event enums.
pub trait Event {
    /// Discriminant type used by [`EventFilter`].
    type Kind: Copy + PartialEq + Debug + 'static;

    /// The kind of this particular event value.
    fn kind(&self) -> Self::Kind;
}

/// Event type for machines that never react to anything.
///
/// `NoEvent` is uninhabited, so `react` can never be called on such a
/// machine; it exists purely to satisfy the event type parameter.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NoEvent {}

impl Event for NoEvent {
    type Kind = NoEvent;

    fn kind(&self) -> NoEvent {
        match *self {}
    }
}

/// Per-state allow-list of event kinds.
///
/// Filters are captured once per state when the hierarchy is built and
/// consulted on every broadcast; a state whose filter excludes an event's
/// kind is skipped entirely.
///
/// # Example
///
/// ```rust
/// use canopy::core::EventFilter;
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Kind {
///     Damage,
///     Heal,
/// }
///
/// let mut filter = EventFilter::new();
/// filter.support(Kind::Damage).support(Kind::Heal);
///
/// assert!(filter.supports(Kind::Damage));
/// ```
pub struct EventFilter<K> {
    kinds: Vec<K>,
}

impl<K: Copy + PartialEq> EventFilter<K> {
    /// Create a filter that supports nothing.
    pub fn new() -> Self {
        Self { kinds: Vec::new() }
    }

    /// Declare support for an event kind. Chainable.
    pub fn support(&mut self, kind: K) -> &mut Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    /// Merge every kind supported by `other` into this filter. Chainable.
    pub fn merge(&mut self, other: &EventFilter<K>) -> &mut Self {
        for &kind in &other.kinds {
            self.support(kind);
        }
        self
    }

    /// Whether this filter includes `kind`.
    pub fn supports(&self, kind: K) -> bool {
        self.kinds.contains(&kind)
    }

    /// Whether this filter supports anything at all.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl<K: Copy + PartialEq> Default for EventFilter<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate an event enum together with its kind enum and [`Event`] impl.
///
/// The kind enum carries one unit variant per event variant, named
/// identically, so payload-carrying events can still be filtered cheaply.
///
/// # Example
///
/// ```rust
/// use canopy::event_enum;
///
/// event_enum! {
///     pub enum CombatEvent(CombatEventKind) {
///         Damage { amount: u32 },
///         Heal { amount: u32 },
///         Died,
///     }
/// }
///
/// use canopy::core::Event;
/// let event = CombatEvent::Damage { amount: 7 };
/// assert_eq!(event.kind(), CombatEventKind::Damage);
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($kind:ident) {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($body:tt)* } )? $( ( $($tuple:tt)* ) )?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant $( { $($body)* } )? $( ( $($tuple)* ) )?
            ),*
        }

        #[derive(Clone, Copy, PartialEq, Eq, Debug)]
        $vis enum $kind {
            $($variant),*
        }

        impl $crate::core::Event for $name {
            type Kind = $kind;

            fn kind(&self) -> $kind {
                match self {
                    $(Self::$variant { .. } => $kind::$variant),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Debug)]
    enum TestKind {
        Ping,
        Pong,
        Reset,
    }

    #[test]
    fn empty_filter_supports_nothing() {
        let filter: EventFilter<TestKind> = EventFilter::new();

        assert!(filter.is_empty());
        assert!(!filter.supports(TestKind::Ping));
    }

    #[test]
    fn filter_supports_declared_kinds() {
        let mut filter = EventFilter::new();
        filter.support(TestKind::Ping).support(TestKind::Reset);

        assert!(filter.supports(TestKind::Ping));
        assert!(filter.supports(TestKind::Reset));
        assert!(!filter.supports(TestKind::Pong));
    }

    #[test]
    fn duplicate_support_is_idempotent() {
        let mut filter = EventFilter::new();
        filter.support(TestKind::Ping).support(TestKind::Ping);

        assert!(filter.supports(TestKind::Ping));
        assert_eq!(filter.kinds.len(), 1);
    }

    #[test]
    fn merge_combines_filters() {
        let mut a = EventFilter::new();
        a.support(TestKind::Ping);

        let mut b = EventFilter::new();
        b.support(TestKind::Pong).support(TestKind::Ping);

        a.merge(&b);
        assert!(a.supports(TestKind::Ping));
        assert!(a.supports(TestKind::Pong));
        assert_eq!(a.kinds.len(), 2);
    }

    #[test]
    fn event_enum_macro_maps_variants_to_kinds() {
        event_enum! {
            enum TestEvent(TestEventKind) {
                Plain,
                WithBody { value: u32 },
                WithTuple(u32, u32),
            }
        }

        assert_eq!(TestEvent::Plain.kind(), TestEventKind::Plain);
        assert_eq!(
            TestEvent::WithBody { value: 3 }.kind(),
            TestEventKind::WithBody
        );
        assert_eq!(TestEvent::WithTuple(1, 2).kind(), TestEventKind::WithTuple);
    }
}

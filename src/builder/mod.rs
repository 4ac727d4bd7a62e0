//! Declarative construction of state hierarchies.
//!
//! A machine is declared once as a tree of nodes and then flattened into its
//! runtime form. Only the resulting tree shape matters; the combinators are
//! thin sugar over [`StateNode`]:
//!
//! ```rust
//! use canopy::builder::{composite, leaf, root};
//! use canopy::core::{Control, State};
//! use canopy::machine::Machine;
//!
//! #[derive(Default)]
//! struct Door {
//!     locked: bool,
//! }
//!
//! struct Hinge;
//! struct Open;
//! struct Closed;
//!
//! impl State<Door> for Hinge {
//!     fn enter(&mut self, _context: &mut Door, control: &mut Control) {
//!         control.change_to::<Closed>();
//!     }
//! }
//! impl State<Door> for Open {}
//! impl State<Door> for Closed {}
//!
//! let mut machine: Machine<Door> =
//!     root(composite(Hinge, vec![leaf(Open), leaf(Closed)])).into_machine(Door::default())?;
//!
//! machine.start();
//! assert!(machine.is_active::<Closed>());
//! # Ok::<(), canopy::builder::BuildError>(())
//! ```

pub mod error;

pub use error::BuildError;

use std::any::TypeId;

use crate::core::{Event, NoEvent, SinglePhase, State};
use crate::machine::Machine;

/// One node of a declared state tree: a leaf, or a composite wrapping its
/// own top state plus an ordered list of children.
///
/// The node's identity is the declared state's type; for a composite, the
/// top state both identifies the node and carries its behavior, so entering
/// the composite runs the top state's hooks.
pub struct StateNode<C, P = SinglePhase, E = NoEvent>
where
    C: 'static,
    P: 'static,
    E: Event + 'static,
{
    pub(crate) behavior: Box<dyn State<C, P, E>>,
    pub(crate) type_id: TypeId,
    pub(crate) name: &'static str,
    pub(crate) composite: bool,
    pub(crate) children: Vec<StateNode<C, P, E>>,
}

/// Declare a leaf state.
pub fn leaf<C, P, E, S>(state: S) -> StateNode<C, P, E>
where
    C: 'static,
    P: 'static,
    E: Event + 'static,
    S: State<C, P, E>,
{
    StateNode {
        behavior: Box::new(state),
        type_id: TypeId::of::<S>(),
        name: std::any::type_name::<S>(),
        composite: false,
        children: Vec::new(),
    }
}

/// Declare a composite state: `top` carries the composite's own behavior and
/// identity, `children` the wrapped structure.
///
/// A composite must declare at least one child; an empty list is rejected
/// when the hierarchy is built.
pub fn composite<C, P, E, S>(top: S, children: Vec<StateNode<C, P, E>>) -> StateNode<C, P, E>
where
    C: 'static,
    P: 'static,
    E: Event + 'static,
    S: State<C, P, E>,
{
    StateNode {
        behavior: Box::new(top),
        type_id: TypeId::of::<S>(),
        name: std::any::type_name::<S>(),
        composite: true,
        children,
    }
}

/// The single top-level wrapper around a declared hierarchy.
pub struct RootNode<C, P = SinglePhase, E = NoEvent>
where
    C: 'static,
    P: 'static,
    E: Event + 'static,
{
    pub(crate) node: StateNode<C, P, E>,
}

/// Wrap a declared tree as the machine's root.
pub fn root<C, P, E>(node: StateNode<C, P, E>) -> RootNode<C, P, E>
where
    C: 'static,
    P: 'static,
    E: Event + 'static,
{
    RootNode { node }
}

impl<C, P, E> RootNode<C, P, E>
where
    C: 'static,
    P: 'static,
    E: Event + 'static,
{
    /// Finalize the declaration into a runtime machine bound to `context`.
    pub fn into_machine(self, context: C) -> Result<Machine<C, P, E>, BuildError>
    where
        P: Copy,
    {
        Machine::new(self, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Control;

    struct Top;
    struct ChildA;
    struct ChildB;

    impl State<()> for Top {
        fn enter(&mut self, _context: &mut (), control: &mut Control) {
            control.change_to::<ChildA>();
        }
    }
    impl State<()> for ChildA {}
    impl State<()> for ChildB {}

    #[test]
    fn leaf_declares_no_children() {
        let node: StateNode<()> = leaf(ChildA);

        assert!(!node.composite);
        assert!(node.children.is_empty());
        assert_eq!(node.type_id, TypeId::of::<ChildA>());
    }

    #[test]
    fn composite_keeps_declaration_order() {
        let node: StateNode<()> = composite(Top, vec![leaf(ChildA), leaf(ChildB)]);

        assert!(node.composite);
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0].type_id, TypeId::of::<ChildA>());
        assert_eq!(node.children[1].type_id, TypeId::of::<ChildB>());
    }

    #[test]
    fn node_name_reflects_the_state_type() {
        let node: StateNode<()> = leaf(ChildB);
        assert!(node.name.ends_with("ChildB"));
    }

    #[test]
    fn root_wraps_a_single_node() {
        let wrapped: RootNode<()> = root(composite(Top, vec![leaf(ChildA)]));
        assert_eq!(wrapped.node.type_id, TypeId::of::<Top>());
    }
}

//! The flattened runtime hierarchy.
//!
//! Built exactly once per machine instance from the declared tree and
//! read-only thereafter: a flat array of state entries in discovery order,
//! an identity map from state type to [`StateId`], and parent/children
//! links with precomputed depths.

use std::any::TypeId;
use std::collections::HashMap;

use crate::builder::{BuildError, RootNode, StateNode};
use crate::core::{Event, EventFilter, State, StateId};

pub(crate) struct StateEntry<C, P, E>
where
    C: 'static,
    P: 'static,
    E: Event + 'static,
{
    pub(crate) behavior: Box<dyn State<C, P, E>>,
    pub(crate) filter: EventFilter<E::Kind>,
    pub(crate) type_id: TypeId,
    pub(crate) name: &'static str,
    pub(crate) composite: bool,
    pub(crate) parent: Option<StateId>,
    pub(crate) children: Vec<StateId>,
    pub(crate) depth: usize,
}

pub(crate) struct Hierarchy<C, P, E>
where
    C: 'static,
    P: 'static,
    E: Event + 'static,
{
    entries: Vec<StateEntry<C, P, E>>,
    index: HashMap<TypeId, StateId>,
}

impl<C, P, E> Hierarchy<C, P, E>
where
    C: 'static,
    P: 'static,
    E: Event + 'static,
{
    /// Flatten a declared tree. Iterative: an explicit work stack carries
    /// each registered state together with the children it declared.
    pub(crate) fn build(root: RootNode<C, P, E>) -> Result<Self, BuildError> {
        let mut hierarchy = Self {
            entries: Vec::new(),
            index: HashMap::new(),
        };

        let mut work = Vec::new();
        work.push(hierarchy.register(root.node, None)?);

        while let Some((parent, children)) = work.pop() {
            for child in children {
                work.push(hierarchy.register(child, Some(parent))?);
            }
        }

        debug_assert!(hierarchy.entries.iter().enumerate().all(|(index, entry)| {
            entry.children.iter().all(|&child| {
                hierarchy.entries[child.index()].parent == Some(StateId::new(index))
            })
        }));

        tracing::debug!(
            "hierarchy built: {} states ({} composite)",
            hierarchy.entries.len(),
            hierarchy.entries.iter().filter(|entry| entry.composite).count()
        );
        Ok(hierarchy)
    }

    fn register(
        &mut self,
        node: StateNode<C, P, E>,
        parent: Option<StateId>,
    ) -> Result<(StateId, Vec<StateNode<C, P, E>>), BuildError> {
        let StateNode {
            behavior,
            type_id,
            name,
            composite,
            children,
        } = node;

        if composite && children.is_empty() {
            return Err(BuildError::EmptyComposite { state: name });
        }

        let id = StateId::new(self.entries.len());
        if self.index.insert(type_id, id).is_some() {
            return Err(BuildError::DuplicateState { state: name });
        }

        let depth = parent.map_or(0, |p| self.entries[p.index()].depth + 1);
        let mut filter = EventFilter::new();
        behavior.filter_events(&mut filter);

        self.entries.push(StateEntry {
            behavior,
            filter,
            type_id,
            name,
            composite,
            parent,
            children: Vec::new(),
            depth,
        });

        if let Some(p) = parent {
            self.entries[p.index()].children.push(id);
        }

        Ok((id, children))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn max_depth(&self) -> usize {
        self.entries.iter().map(|entry| entry.depth).max().unwrap_or(0)
    }

    pub(crate) fn entry(&self, id: StateId) -> &StateEntry<C, P, E> {
        &self.entries[id.index()]
    }

    pub(crate) fn entry_mut(&mut self, id: StateId) -> &mut StateEntry<C, P, E> {
        &mut self.entries[id.index()]
    }

    pub(crate) fn depth(&self, id: StateId) -> usize {
        self.entries[id.index()].depth
    }

    /// Resolve a state type to its handle. Looking up a type that was never
    /// declared is a programmer error and fatal.
    pub(crate) fn resolve(&self, type_id: TypeId, name: &str) -> StateId {
        match self.index.get(&type_id) {
            Some(&id) => id,
            None => panic!("state `{name}` was never declared in this machine's hierarchy"),
        }
    }

    /// Compute the root-to-`target` activation path into `path`, and return
    /// the deepest index at which `stack` already holds the same state (the
    /// innermost active ancestor). `None` means no overlap at all, which
    /// only arises on the very first activation.
    pub(crate) fn activation_path(
        &self,
        target: StateId,
        path: &mut Vec<StateId>,
        stack: &[StateId],
    ) -> Option<usize> {
        path.clear();

        let mut current = Some(target);
        while let Some(id) = current {
            path.push(id);
            current = self.entries[id.index()].parent;
        }
        path.reverse();

        (0..path.len())
            .rev()
            .find(|&depth| stack.get(depth) == Some(&path[depth]))
    }
}

//! The machine runtime: activation, per-tick dispatch, event broadcast.
//!
//! A [`Machine`] owns the flattened hierarchy, the active-state stack, the
//! caller-supplied context, and pools for the transient containers the hot
//! path needs. Every public call settles the stack completely before it
//! returns: a request raised inside a hook, including any chain of further
//! redirections, is resolved within the same call.

mod hierarchy;

use std::any::TypeId;

use crate::builder::{BuildError, RootNode};
use crate::core::{
    AsAny, ChangePriority, ChangeRequest, Control, Event, NoEvent, SinglePhase, State, StateId,
};
use crate::pool::Pool;

use hierarchy::Hierarchy;

/// A running hierarchical state machine.
///
/// `C` is the context value shared by every state, `P` the update-phase tag
/// the host passes to [`update`](Machine::update), and `E` the event type
/// accepted by [`react`](Machine::react).
///
/// The machine is single-threaded and cooperative: hooks run synchronously
/// on the caller's thread, and concurrent calls on one instance must be
/// serialized by the caller.
pub struct Machine<C, P = SinglePhase, E = NoEvent>
where
    C: 'static,
    P: 'static,
    E: Event + 'static,
{
    hierarchy: Hierarchy<C, P, E>,
    stack: Vec<StateId>,
    context: C,
    controls: Pool<Control>,
    buffers: Pool<Vec<StateId>>,
}

impl<C, P, E> Machine<C, P, E>
where
    C: 'static,
    P: Copy + 'static,
    E: Event + 'static,
{
    /// Flatten the declared tree and bind the machine to `context`.
    ///
    /// Construction is all-or-nothing and happens exactly once; the
    /// hierarchy is read-only for the machine's entire lifetime.
    pub fn new(root: RootNode<C, P, E>, context: C) -> Result<Self, BuildError> {
        let hierarchy = Hierarchy::build(root)?;
        let stack = Vec::with_capacity(hierarchy.max_depth() + 1);

        Ok(Self {
            hierarchy,
            stack,
            context,
            controls: Pool::new(),
            buffers: Pool::new(),
        })
    }

    /// Activate the default path from the root. No-op if already active.
    pub fn start(&mut self) {
        if !self.stack.is_empty() {
            return;
        }

        tracing::debug!("starting machine");
        let entry = self.hierarchy.entry(StateId::ROOT);
        let request = ChangeRequest {
            target: entry.type_id,
            name: entry.name,
            priority: ChangePriority::Default,
        };

        let mut control = self.controls.get();
        control.push(request);
        self.process_transitions(&mut control);
        self.controls.recycle(control);
    }

    /// Deactivate every state down to and including the root. No-op if
    /// already inactive.
    pub fn stop(&mut self) {
        if self.stack.is_empty() {
            return;
        }

        tracing::debug!("stopping machine");
        self.pop_to_depth(0);
    }

    /// Run one update pass over the active states, outermost first. No-op if
    /// inactive.
    ///
    /// The live stack is re-read by index on every iteration, so a
    /// transition triggered by an ancestor changes which deeper positions
    /// are subsequently visited.
    pub fn update(&mut self, phase: P) {
        if self.stack.is_empty() {
            return;
        }

        let mut control = self.controls.get();
        let mut depth = 0;
        while depth < self.stack.len() {
            let id = self.stack[depth];
            control.clear();
            self.hierarchy
                .entry_mut(id)
                .behavior
                .update(&mut self.context, phase, &mut control);
            self.process_transitions(&mut control);
            depth += 1;
        }
        self.controls.recycle(control);
    }

    /// Request a transition to the declared state `S` and resolve it fully
    /// before returning. Fatal if `S` was never declared.
    pub fn change_to<S: 'static>(&mut self) {
        let mut control = self.controls.get();
        control.change_to::<S>();
        self.process_transitions(&mut control);
        self.controls.recycle(control);
    }

    /// Broadcast `event` over the active states, outermost first, honoring
    /// each state's event filter.
    ///
    /// The stack is snapshotted at call start; dispatch halts entirely at
    /// the first position where the live stack no longer matches the
    /// snapshot, since deeper snapshot entries are no longer meaningful.
    pub fn react(&mut self, event: &E) {
        let mut control = self.controls.get();
        let mut snapshot = self.buffers.get_with_capacity(self.stack.len());
        snapshot.extend_from_slice(&self.stack);
        let kind = event.kind();

        let mut depth = 0;
        while depth < self.stack.len() {
            if snapshot.get(depth) != Some(&self.stack[depth]) {
                tracing::trace!("active states diverged during event dispatch");
                break;
            }

            let id = self.stack[depth];
            if self.hierarchy.entry(id).filter.supports(kind) {
                control.clear();
                self.hierarchy
                    .entry_mut(id)
                    .behavior
                    .react(&mut self.context, event, &mut control);
                self.process_transitions(&mut control);
            }
            depth += 1;
        }

        self.buffers.recycle(snapshot);
        self.controls.recycle(control);
    }

    /// Fetch the live instance registered for the declared state `S`. Fatal
    /// if `S` was never declared.
    pub fn access<S: 'static>(&self) -> &S {
        let id = self.resolve::<S>();
        self.hierarchy
            .entry(id)
            .behavior
            .as_any()
            .downcast_ref::<S>()
            .expect("registered state instance matches its identity type")
    }

    /// Mutable variant of [`access`](Machine::access).
    pub fn access_mut<S: 'static>(&mut self) -> &mut S {
        let id = self.resolve::<S>();
        self.hierarchy
            .entry_mut(id)
            .behavior
            .as_any_mut()
            .downcast_mut::<S>()
            .expect("registered state instance matches its identity type")
    }

    /// Whether the declared state `S` is on the active-state stack. Fatal if
    /// `S` was never declared.
    pub fn is_active<S: 'static>(&self) -> bool {
        let id = self.resolve::<S>();
        self.stack.contains(&id)
    }

    /// The context value the machine was bound to.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutable access to the bound context.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    fn resolve<S: 'static>(&self) -> StateId {
        self.hierarchy
            .resolve(TypeId::of::<S>(), std::any::type_name::<S>())
    }

    /// Resolve pending change requests, one per outer iteration, until none
    /// remain. Each resolution exits stale states down to the target's
    /// depth, then walks the activation path inward, applying the chained
    /// request priority rule to redirects raised from enter hooks.
    fn process_transitions(&mut self, control: &mut Control) {
        if !control.has_requests() {
            return;
        }

        while let Some(request) = control.first_request() {
            let target = self.hierarchy.resolve(request.target, request.name);
            let target_depth = self.hierarchy.depth(target);

            // A re-request of a state already active at its depth is
            // silently absorbed, along with the rest of the pending batch.
            if self.stack.get(target_depth) == Some(&target) {
                control.clear();
                return;
            }

            tracing::trace!("transition to `{}`", self.hierarchy.entry(target).name);
            self.pop_to_depth(target_depth);

            let mut path = self.buffers.get();
            let innermost_active = self.hierarchy.activation_path(target, &mut path, &self.stack);
            let first_to_enter = innermost_active.map_or(0, |depth| depth + 1);

            for position in first_to_enter..path.len() {
                control.clear();
                let id = path[position];
                tracing::trace!("entering `{}`", self.hierarchy.entry(id).name);
                self.hierarchy
                    .entry_mut(id)
                    .behavior
                    .enter(&mut self.context, control);
                self.stack.push(id);

                if let Some(chained) = control.first_request() {
                    let is_final = position + 1 == path.len();
                    if !is_final && chained.priority == ChangePriority::Default {
                        // An intermediate ancestor may not redirect an
                        // in-progress activation at default priority; the
                        // request dies with the next clear.
                        tracing::trace!(
                            "discarding redirect to `{}` raised mid-activation",
                            chained.name
                        );
                    } else {
                        // Leave the chained request pending; the outer loop
                        // re-resolves against the new target.
                        break;
                    }
                }
            }

            self.buffers.recycle(path);
        }
    }

    /// Pop active states down to `depth`, innermost first, invoking each
    /// leave hook. Requests raised while leaving are discarded.
    fn pop_to_depth(&mut self, depth: usize) {
        let mut control = self.controls.get();

        while self.stack.len() > depth {
            let id = self
                .stack
                .pop()
                .expect("stack is non-empty above the target depth");
            tracing::trace!("leaving `{}`", self.hierarchy.entry(id).name);
            self.hierarchy
                .entry_mut(id)
                .behavior
                .leave(&mut self.context, &mut control);
            control.clear();
        }

        self.controls.recycle(control);
    }
}

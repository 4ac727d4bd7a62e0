//! The control surface handed to state hooks.
//!
//! A [`Control`] carries transition requests out of hook invocations. Each
//! hook invocation gets a cleared control; only the first request raised in
//! an invocation is honored, and the whole pending set is dropped once that
//! window resolves or is reused.

use std::any::TypeId;

use crate::pool::Pooled;

/// Governs whether a transition request raised during an in-progress entry
/// walk preempts that walk.
///
/// A `Default` request raised by an intermediate ancestor while it is being
/// entered on the way to a deeper target is discarded; `Always` preempts the
/// walk regardless. Requests from the walk's final state always take effect.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ChangePriority {
    #[default]
    Default,
    Always,
}

/// A pending instruction to make a declared state active.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ChangeRequest {
    pub(crate) target: TypeId,
    pub(crate) name: &'static str,
    pub(crate) priority: ChangePriority,
}

/// Request carrier passed to every state hook.
///
/// Controls are pooled by the machine and recycled once the triggering call
/// has fully settled the active-state stack.
#[derive(Default)]
pub struct Control {
    requests: Vec<ChangeRequest>,
}

impl Control {
    /// Request a transition to `S` at [`ChangePriority::Default`].
    pub fn change_to<S: 'static>(&mut self) {
        self.change_to_with::<S>(ChangePriority::Default);
    }

    /// Request a transition to `S` with an explicit priority.
    pub fn change_to_with<S: 'static>(&mut self, priority: ChangePriority) {
        self.requests.push(ChangeRequest {
            target: TypeId::of::<S>(),
            name: std::any::type_name::<S>(),
            priority,
        });
    }

    /// Discard every pending request.
    pub fn clear(&mut self) {
        self.requests.clear();
    }

    pub(crate) fn push(&mut self, request: ChangeRequest) {
        self.requests.push(request);
    }

    /// The first request raised in the current invocation window, if any.
    /// Later requests from the same window are never honored.
    pub(crate) fn first_request(&self) -> Option<ChangeRequest> {
        self.requests.first().copied()
    }

    pub(crate) fn has_requests(&self) -> bool {
        !self.requests.is_empty()
    }
}

impl Pooled for Control {
    fn reset(&mut self) {
        self.requests.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TargetA;
    struct TargetB;

    #[test]
    fn change_to_records_a_default_priority_request() {
        let mut control = Control::default();
        control.change_to::<TargetA>();

        let request = control.first_request().expect("request was raised");
        assert_eq!(request.target, TypeId::of::<TargetA>());
        assert_eq!(request.priority, ChangePriority::Default);
    }

    #[test]
    fn change_to_with_records_the_given_priority() {
        let mut control = Control::default();
        control.change_to_with::<TargetB>(ChangePriority::Always);

        let request = control.first_request().expect("request was raised");
        assert_eq!(request.target, TypeId::of::<TargetB>());
        assert_eq!(request.priority, ChangePriority::Always);
    }

    #[test]
    fn first_request_returns_the_earliest() {
        let mut control = Control::default();
        control.change_to::<TargetA>();
        control.change_to::<TargetB>();

        let request = control.first_request().expect("requests were raised");
        assert_eq!(request.target, TypeId::of::<TargetA>());
    }

    #[test]
    fn clear_discards_pending_requests() {
        let mut control = Control::default();
        control.change_to::<TargetA>();
        control.clear();

        assert!(!control.has_requests());
        assert!(control.first_request().is_none());
    }

    #[test]
    fn request_names_the_target_type() {
        let mut control = Control::default();
        control.change_to::<TargetA>();

        let request = control.first_request().expect("request was raised");
        assert!(request.name.ends_with("TargetA"));
    }
}

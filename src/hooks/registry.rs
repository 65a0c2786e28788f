//! Hook registration and dispatch.

use std::collections::HashMap;

use tracing::trace;

use crate::entity::Entity;

/// Lifecycle events observers can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    BeforeDelete,
    AfterDelete,
    BeforeSave,
    AfterSave,
}

impl HookEvent {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HookEvent::BeforeDelete => "before_delete",
            HookEvent::AfterDelete => "after_delete",
            HookEvent::BeforeSave => "before_save",
            HookEvent::AfterSave => "after_save",
        }
    }
}

/// What an observer decided.
///
/// `Halt` stops the surrounding operation and supplies its return value,
/// replacing the stoppable-event-object protocol of classic ORM layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Continue,
    Halt(bool),
}

type HookFn = dyn Fn(&Entity) -> HookOutcome + Send + Sync;

/// Registered observers, dispatched in registration order.
#[derive(Default)]
pub struct HookRegistry {
    listeners: HashMap<HookEvent, Vec<Box<HookFn>>>,
}

impl HookRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an observer to an event.
    pub fn on<F>(&mut self, event: HookEvent, listener: F)
    where
        F: Fn(&Entity) -> HookOutcome + Send + Sync + 'static,
    {
        self.listeners.entry(event).or_default().push(Box::new(listener));
    }

    /// Notify observers where the outcome cannot halt anything.
    pub fn notify(&self, event: HookEvent, entity: &Entity) {
        let _ = self.dispatch(event, entity);
    }

    /// Notify observers of `event`; the first `Halt` wins.
    #[must_use]
    pub fn dispatch(&self, event: HookEvent, entity: &Entity) -> HookOutcome {
        if let Some(listeners) = self.listeners.get(&event) {
            for listener in listeners {
                if let HookOutcome::Halt(result) = listener(entity) {
                    trace!(event = event.as_str(), result, "hook halted operation");
                    return HookOutcome::Halt(result);
                }
            }
        }
        HookOutcome::Continue
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

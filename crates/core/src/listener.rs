// SPDX-License-Identifier: MIT

//! The event listener contract.

use crate::change_event::ChangeEvent;

/// Consumed by `Instance::run()` dispatch. Implementations must be
/// re-entrant-safe: they may be invoked from the scheduler's tick worker,
/// and a panic or error inside one listener must not prevent subsequent
/// listeners (or the caller) from proceeding — `Instance` catches panics
/// at the call site, not here.
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &ChangeEvent);
}

impl<F> EventListener for F
where
    F: Fn(&ChangeEvent) + Send + Sync,
{
    fn on_event(&self, event: &ChangeEvent) {
        self(event)
    }
}

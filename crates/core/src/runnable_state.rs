// SPDX-License-Identifier: MIT

//! The `RunnableState` machine shared by `Instance` and `Block`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state shared by instances and blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnableState {
    NotConfigured,
    Ready,
    Running,
    Paused,
    Done,
    Stopped,
    Aborted,
}

impl RunnableState {
    /// A state is ready-to-run iff it is `Ready` or `Running`.
    pub fn is_ready_to_run(&self) -> bool {
        matches!(self, RunnableState::Ready | RunnableState::Running)
    }

    /// Terminal states never transition back to `Running` without an
    /// intervening `reset()` or `setReady()`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunnableState::Done | RunnableState::Stopped | RunnableState::Aborted
        )
    }
}

impl fmt::Display for RunnableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunnableState::NotConfigured => "not_configured",
            RunnableState::Ready => "ready",
            RunnableState::Running => "running",
            RunnableState::Paused => "paused",
            RunnableState::Done => "done",
            RunnableState::Stopped => "stopped",
            RunnableState::Aborted => "aborted",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
#[path = "runnable_state_tests.rs"]
mod tests;

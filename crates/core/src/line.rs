// SPDX-License-Identifier: MIT

//! Directed edges between blocks.

use crate::id::BlockId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Activation state of a [`Line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineState {
    On,
    Off,
}

impl fmt::Display for LineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineState::On => write!(f, "on"),
            LineState::Off => write!(f, "off"),
        }
    }
}

/// A directed edge between two blocks in the same instance.
///
/// `block_from`/`block_to` are borrowing references expressed as
/// [`BlockId`]s, not owning references — the owning instance resolves them
/// through its block index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    block_from: BlockId,
    block_to: BlockId,
    state: LineState,
    #[serde(skip, default)]
    modified: bool,
}

impl Line {
    pub fn new(block_from: BlockId, block_to: BlockId) -> Self {
        Self {
            block_from,
            block_to,
            state: LineState::Off,
            modified: false,
        }
    }

    pub fn block_from(&self) -> &BlockId {
        &self.block_from
    }

    pub fn block_to(&self) -> &BlockId {
        &self.block_to
    }

    pub fn state(&self) -> LineState {
        self.state
    }

    /// Set the activation state. Marks the line modified only if the state
    /// actually changed.
    pub fn set_state(&mut self, state: LineState) {
        if self.state != state {
            self.state = state;
            self.modified = true;
        }
    }

    /// Reset to `OFF`. Marks the line modified only if it wasn't already
    /// `OFF`.
    pub fn reset(&mut self) {
        self.set_state(LineState::Off);
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn reset_modified(&mut self) {
        self.modified = false;
    }

    pub fn snapshot(&self) -> LineSnapshot {
        LineSnapshot {
            block_from: self.block_from.clone(),
            block_to: self.block_to.clone(),
            state: self.state,
        }
    }
}

/// Owned, read-only copy of a [`Line`]'s observable state, handed to change
/// listeners so they cannot mutate live engine state through a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub block_from: BlockId,
    pub block_to: BlockId,
    pub state: LineState,
}

#[cfg(test)]
#[path = "line_tests.rs"]
mod tests;

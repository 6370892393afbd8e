// SPDX-License-Identifier: MIT

//! The `Block` contract: the abstract capability set an instance drives.
//!
//! Concrete block implementations are user code and out of scope for this
//! crate (see spec §1) — `Block` is the seam the instance code against.
//! A minimal fake implementation is provided under `test-support` for this
//! workspace's own tests and for downstream crates that need a `Block`
//! without pulling in a real plugin.

use crate::error::EngineError;
use crate::id::{BlockId, BlockTypeId};
use crate::runnable_state::RunnableState;
use serde::{Deserialize, Serialize};

/// Unit of computation: text in, text out, with its own lifecycle.
///
/// Mutations are only ever made by the owning instance's thread of control
/// (enforced by the instance holding blocks behind its own mutex, not by
/// this trait).
pub trait Block: Send {
    fn internal_block_id(&self) -> &BlockId;
    fn block_type_id(&self) -> &BlockTypeId;
    fn state(&self) -> RunnableState;

    /// Advance the block one step. Implementations decide internally how
    /// many calls it takes to reach `Done`.
    fn run(&mut self);
    fn stop(&mut self);
    fn abort(&mut self);

    /// Any state → `Ready`. Clears the block's own error, if any.
    fn reset(&mut self);

    /// `Done|Stopped|Aborted` → `Ready` without resetting accumulated
    /// progress. A no-op from other states.
    fn set_ready(&mut self) -> Result<(), EngineError>;

    fn set_input_text(&mut self, text: String);
    fn input_text(&self) -> &str;

    /// `None` until the block reaches `Done`; frozen thereafter until the
    /// next `reset()`.
    fn result_text(&self) -> Option<&str>;
    fn set_result_text(&mut self, text: String);

    /// Whether this block has an incoming line in the owning instance.
    /// Blocks without one are the planner's source blocks (§4.3 step 3).
    fn has_incoming_lines(&self) -> bool;
    fn set_has_incoming_lines(&mut self, has_incoming: bool);

    fn is_modified(&self) -> bool;
    fn reset_modified(&mut self);

    fn snapshot(&self) -> BlockSnapshot;
}

/// Owned, read-only copy of a [`Block`]'s observable state, handed to
/// change listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub internal_block_id: BlockId,
    pub block_type_id: BlockTypeId,
    pub state: RunnableState,
    pub input_text: String,
    pub result_text: Option<String>,
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

#[cfg(test)]
#[path = "block_tests.rs"]
mod tests;

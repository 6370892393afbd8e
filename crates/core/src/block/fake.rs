// SPDX-License-Identifier: MIT

//! A deterministic [`Block`] for engine tests.
//!
//! Completes after a configurable number of `run()` calls so planner tests
//! can exercise both "done on first tick" and "stays queued for N ticks"
//! without a real plugin.

use crate::block::{Block, BlockSnapshot};
use crate::error::EngineError;
use crate::id::{BlockId, BlockTypeId};
use crate::runnable_state::RunnableState;

#[derive(Debug, Clone)]
pub struct FakeBlock {
    id: BlockId,
    type_id: BlockTypeId,
    state: RunnableState,
    input: String,
    result: Option<String>,
    has_incoming: bool,
    modified: bool,
    runs_to_complete: u32,
    runs_done: u32,
}

impl FakeBlock {
    pub fn new(id: BlockId, type_id: BlockTypeId) -> Self {
        Self {
            id,
            type_id,
            state: RunnableState::Ready,
            input: String::new(),
            result: None,
            has_incoming: false,
            modified: false,
            runs_to_complete: 1,
            runs_done: 0,
        }
    }

    /// Require `n` `run()` calls (while `Running`) before reaching `Done`.
    pub fn with_runs_to_complete(mut self, n: u32) -> Self {
        self.runs_to_complete = n.max(1);
        self
    }
}

impl Block for FakeBlock {
    fn internal_block_id(&self) -> &BlockId {
        &self.id
    }

    fn block_type_id(&self) -> &BlockTypeId {
        &self.type_id
    }

    fn state(&self) -> RunnableState {
        self.state
    }

    fn run(&mut self) {
        if self.state == RunnableState::Ready {
            self.state = RunnableState::Running;
            self.modified = true;
        }
        if self.state != RunnableState::Running {
            return;
        }
        self.runs_done += 1;
        if self.runs_done >= self.runs_to_complete {
            self.result = Some(format!("{}:{}", self.type_id.as_str(), self.input));
            self.state = RunnableState::Done;
        }
        self.modified = true;
    }

    fn stop(&mut self) {
        if self.state != RunnableState::Stopped {
            self.state = RunnableState::Stopped;
            self.modified = true;
        }
    }

    fn abort(&mut self) {
        if self.state != RunnableState::Aborted {
            self.state = RunnableState::Aborted;
            self.modified = true;
        }
    }

    fn reset(&mut self) {
        self.state = RunnableState::Ready;
        self.result = None;
        self.runs_done = 0;
        self.modified = true;
    }

    fn set_ready(&mut self) -> Result<(), EngineError> {
        if matches!(
            self.state,
            RunnableState::Done | RunnableState::Stopped | RunnableState::Aborted
        ) {
            self.state = RunnableState::Ready;
            self.modified = true;
        }
        Ok(())
    }

    fn set_input_text(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.modified = true;
        }
    }

    fn input_text(&self) -> &str {
        &self.input
    }

    fn result_text(&self) -> Option<&str> {
        self.result.as_deref()
    }

    fn set_result_text(&mut self, text: String) {
        self.result = Some(text);
        self.modified = true;
    }

    fn has_incoming_lines(&self) -> bool {
        self.has_incoming
    }

    fn set_has_incoming_lines(&mut self, has_incoming: bool) {
        self.has_incoming = has_incoming;
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn reset_modified(&mut self) {
        self.modified = false;
    }

    fn snapshot(&self) -> BlockSnapshot {
        BlockSnapshot {
            internal_block_id: self.id.clone(),
            block_type_id: self.type_id.clone(),
            state: self.state,
            input_text: self.input.clone(),
            result_text: self.result.clone(),
        }
    }
}

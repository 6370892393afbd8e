// SPDX-License-Identifier: MIT

//! `Instance`: the whole procedure — a stateful, long-lived graph of
//! blocks and lines, advanced one tick at a time by `run()`.

use flowforge_core::{
    Block, BlockId, ChangeEvent, EngineError, EventListener, InstanceId, InstanceParameters, Line,
    LineState, ModifiedObject, RunnableState, TemplateId, UserId,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Inputs to [`Instance::new`]. `parameters`, `blocks`, and `lines` default
/// to empty when omitted.
pub struct InstanceConfig {
    pub instance_id: InstanceId,
    pub template_id: TemplateId,
    pub instance_user_id: UserId,
    pub instance_name: String,
    pub parameters: InstanceParameters,
    pub blocks: Vec<Box<dyn Block>>,
    pub lines: Vec<Line>,
}

impl InstanceConfig {
    pub fn new(
        instance_id: InstanceId,
        template_id: TemplateId,
        instance_user_id: UserId,
        instance_name: impl Into<String>,
    ) -> Self {
        Self {
            instance_id,
            template_id,
            instance_user_id,
            instance_name: instance_name.into(),
            parameters: InstanceParameters::default(),
            blocks: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: InstanceParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_blocks(mut self, blocks: Vec<Box<dyn Block>>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn with_lines(mut self, lines: Vec<Line>) -> Self {
        self.lines = lines;
        self
    }
}

/// Mutable instance state, held behind a single mutex so every externally
/// visible operation (§5) is mutually exclusive with every other one on the
/// same instance.
struct InstanceState {
    blocks: Vec<Box<dyn Block>>,
    block_index: HashMap<BlockId, usize>,
    lines: Vec<Line>,
    parameters: InstanceParameters,
    state: RunnableState,
    modified: bool,
    error: Option<String>,
    plan: Vec<BlockId>,
    listeners: Vec<Arc<dyn EventListener>>,
}

impl InstanceState {
    /// Planning phase: `Ready → Running`. No block executes this tick.
    fn plan_tick(&mut self) {
        for block in &mut self.blocks {
            if let Some(param) = self.parameters.get(block.internal_block_id()) {
                block.set_input_text(param.parameter_value().to_string());
            }
        }
        self.plan.clear();
        for block in &self.blocks {
            if !block.has_incoming_lines() {
                self.plan.push(block.internal_block_id().clone());
            }
        }
    }

    /// Run every block currently queued, in plan order.
    fn run_planned_blocks(&mut self) {
        let queued = self.plan.clone();
        for block_id in queued {
            if let Some(&idx) = self.block_index.get(&block_id) {
                self.blocks[idx].run();
            }
        }
    }

    /// Turn on every line whose source block has reached `Done`. A line
    /// only ever transitions `Off -> On`; it is switched back off by
    /// `reset()`/`stop()`/`abort()`, never by the planner.
    fn activate_lines(&mut self) {
        for line in &mut self.lines {
            if line.state() == LineState::Off {
                if let Some(&idx) = self.block_index.get(line.block_from()) {
                    if self.blocks[idx].state() == RunnableState::Done {
                        line.set_state(LineState::On);
                    }
                }
            }
        }
    }

    /// Every block and line whose `is_modified()` is true, blocks first.
    fn collect_modified(&self) -> Vec<ModifiedObject> {
        let mut modified = Vec::new();
        for block in &self.blocks {
            if block.is_modified() {
                modified.push(ModifiedObject::Block(block.snapshot()));
            }
        }
        for line in &self.lines {
            if line.is_modified() {
                modified.push(ModifiedObject::Line(line.snapshot()));
            }
        }
        modified
    }

    /// Drop completed blocks from the plan, then enqueue destinations of
    /// any `ON` line not already queued. A line stays `ON` for the rest of
    /// the run once it fires (`activate_lines` never turns one back off),
    /// so a destination already `Done` must be skipped here too — otherwise
    /// a block the first loop just dropped for being `Done` would be
    /// re-queued by its own still-`ON` incoming line on every later tick.
    fn advance_plan(&mut self) {
        let still_pending: Vec<BlockId> = self
            .plan
            .iter()
            .filter(|block_id| {
                let idx = self.block_index[*block_id];
                self.blocks[idx].state() != RunnableState::Done
            })
            .cloned()
            .collect();
        self.plan = still_pending;

        for line in &self.lines {
            if line.state() == LineState::On {
                let to = line.block_to().clone();
                let idx = self.block_index[&to];
                if self.blocks[idx].state() != RunnableState::Done && !self.plan.contains(&to) {
                    self.plan.push(to);
                }
            }
        }
    }
}

/// A live procedure: an owned graph of blocks and lines with its own
/// lifecycle state.
pub struct Instance {
    instance_id: InstanceId,
    template_id: TemplateId,
    instance_user_id: UserId,
    instance_name: String,
    inner: Mutex<InstanceState>,
}

/// Snapshot of an instance's listing fields, as returned by
/// `ProcessingUnit::instance_list_items`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceListItem {
    pub instance_id: InstanceId,
    pub owner_id: UserId,
    pub name: String,
    pub state: RunnableState,
}

impl Instance {
    /// Construct a new instance. Fails with `ConfigurationMismatch` if
    /// `lines` is non-empty while `blocks` is empty, or if any line refers
    /// to a block not present in `blocks`; fails with `NullArgument` if
    /// `instance_name` is blank.
    pub fn new(config: InstanceConfig) -> Result<Self, EngineError> {
        if config.instance_name.trim().is_empty() {
            return Err(EngineError::NullArgument {
                argument: "instance_name",
            });
        }
        if config.blocks.is_empty() && !config.lines.is_empty() {
            return Err(EngineError::ConfigurationMismatch(
                "lines present with no blocks".to_string(),
            ));
        }

        let mut block_index = HashMap::with_capacity(config.blocks.len());
        for (idx, block) in config.blocks.iter().enumerate() {
            block_index.insert(block.internal_block_id().clone(), idx);
        }
        for line in &config.lines {
            if !block_index.contains_key(line.block_from()) {
                return Err(EngineError::ConfigurationMismatch(format!(
                    "line references unknown block_from {}",
                    line.block_from()
                )));
            }
            if !block_index.contains_key(line.block_to()) {
                return Err(EngineError::ConfigurationMismatch(format!(
                    "line references unknown block_to {}",
                    line.block_to()
                )));
            }
        }

        let mut blocks = config.blocks;
        for block in &mut blocks {
            let has_incoming = config
                .lines
                .iter()
                .any(|l| l.block_to() == block.internal_block_id());
            block.set_has_incoming_lines(has_incoming);
        }

        Ok(Self {
            instance_id: config.instance_id,
            template_id: config.template_id,
            instance_user_id: config.instance_user_id,
            instance_name: config.instance_name,
            inner: Mutex::new(InstanceState {
                blocks,
                block_index,
                lines: config.lines,
                parameters: config.parameters,
                state: RunnableState::Ready,
                modified: true,
                error: None,
                plan: Vec::new(),
                listeners: Vec::new(),
            }),
        })
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    pub fn template_id(&self) -> TemplateId {
        self.template_id
    }

    pub fn instance_user_id(&self) -> UserId {
        self.instance_user_id
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    pub fn state(&self) -> RunnableState {
        self.inner.lock().state
    }

    pub fn is_modified(&self) -> bool {
        self.inner.lock().modified
    }

    pub fn reset_modified(&self) {
        self.inner.lock().modified = false;
    }

    pub fn has_error(&self) -> bool {
        self.inner.lock().error.is_some()
    }

    pub fn error_message(&self) -> Option<String> {
        self.inner.lock().error.clone()
    }

    pub fn plan_len(&self) -> usize {
        self.inner.lock().plan.len()
    }

    pub fn list_item(&self) -> InstanceListItem {
        let inner = self.inner.lock();
        InstanceListItem {
            instance_id: self.instance_id,
            owner_id: self.instance_user_id,
            name: self.instance_name.clone(),
            state: inner.state,
        }
    }

    /// Register a change listener. Registration is visible starting with
    /// the next dispatched event (§4.4).
    pub fn add_listener(&self, listener: Arc<dyn EventListener>) {
        self.inner.lock().listeners.push(listener);
    }

    /// Remove a previously registered listener by reference identity. Per
    /// §4.4 this may or may not apply to an event currently being
    /// dispatched (dispatch works off a snapshot), but never corrupts
    /// traversal.
    pub fn remove_listener(&self, listener: &Arc<dyn EventListener>) {
        let mut inner = self.inner.lock();
        inner.listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// `reset()`: any → `Ready`. Clears the error flag and resets every
    /// block and line.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        for block in &mut inner.blocks {
            block.reset();
        }
        for line in &mut inner.lines {
            line.reset();
        }
        inner.plan.clear();
        inner.error = None;
        inner.state = RunnableState::Ready;
        inner.modified = true;
    }

    /// `stop()`: any → `Stopped`. Propagates `stop` to every block and
    /// switches every line to `Off`.
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        for block in &mut inner.blocks {
            block.stop();
        }
        for line in &mut inner.lines {
            line.reset();
        }
        inner.plan.clear();
        inner.state = RunnableState::Stopped;
        inner.modified = true;
    }

    /// `abort()`: any → `Aborted`. Propagates `abort` to every block and
    /// switches every line to `Off`.
    pub fn abort(&self) {
        let mut inner = self.inner.lock();
        for block in &mut inner.blocks {
            block.abort();
        }
        for line in &mut inner.lines {
            line.reset();
        }
        inner.plan.clear();
        inner.state = RunnableState::Aborted;
        inner.modified = true;
    }

    /// `setReady()`: `Done|Stopped|Aborted` → `Ready` *without* resetting
    /// blocks. Fails with `ConfigurationMismatch` if the error flag is set.
    /// A no-op from any other state.
    pub fn set_ready(&self) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        if !matches!(
            inner.state,
            RunnableState::Done | RunnableState::Stopped | RunnableState::Aborted
        ) {
            return Ok(());
        }
        if inner.error.is_some() {
            return Err(EngineError::ConfigurationMismatch(
                "cannot set_ready an instance with a pending error".to_string(),
            ));
        }
        inner.state = RunnableState::Ready;
        inner.modified = true;
        Ok(())
    }

    /// Reserved transition, not yet implemented by any block or instance
    /// semantics (spec §4.3 lists `PAUSE`/`RESUME` as accepted commands
    /// with no defined effect). Always fails so callers don't mistake
    /// silent acceptance for a real pause.
    pub fn pause(&self) -> Result<(), EngineError> {
        Err(EngineError::NotImplemented("pause".to_string()))
    }

    /// See [`Instance::pause`].
    pub fn resume(&self) -> Result<(), EngineError> {
        Err(EngineError::NotImplemented("resume".to_string()))
    }

    /// Advance the instance one tick. See spec §4.3.
    ///
    /// On a `READY` instance this only plans (no block executes). On a
    /// `RUNNING` instance this dispatches queued blocks, publishes a
    /// change event, and advances or completes the plan. Any other state
    /// is a no-op. `NOT_CONFIGURED` sets the error flag and fails.
    pub fn run(&self) -> Result<(), EngineError> {
        let mut inner = self.inner.lock();
        match inner.state {
            RunnableState::NotConfigured => {
                inner.error = Some("instance is not configured".to_string());
                inner.modified = true;
                Err(EngineError::ConfigurationMismatch(
                    "run() called on a NOT_CONFIGURED instance".to_string(),
                ))
            }
            RunnableState::Ready => {
                inner.plan_tick();
                inner.state = RunnableState::Running;
                inner.modified = true;
                Ok(())
            }
            RunnableState::Running => {
                self.dispatch_tick(&mut inner);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Dispatch phase: `Running → Running | Done`.
    fn dispatch_tick(&self, inner: &mut InstanceState) {
        inner.run_planned_blocks();
        inner.activate_lines();

        let modified_objects = inner.collect_modified();
        let event = ChangeEvent::new(self.instance_id, modified_objects);
        for listener in inner.listeners.clone() {
            let result = panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(&event)));
            if result.is_err() {
                tracing::warn!(
                    instance_id = %self.instance_id,
                    "change event listener panicked; continuing with remaining listeners"
                );
            }
        }

        inner.advance_plan();

        if inner.plan.is_empty() {
            inner.state = RunnableState::Done;
            inner.modified = true;
        }
    }

    /// Test-only constructor that bypasses construction validation to put
    /// an instance directly into `NOT_CONFIGURED`, exercising the
    /// defensive `run()` branch that never arises from normal
    /// construction (spec §8: "`run()` on a `NOT_CONFIGURED` instance
    /// raises `ConfigurationMismatch`").
    #[cfg(any(test, feature = "test-support"))]
    pub fn new_not_configured(
        instance_id: InstanceId,
        template_id: TemplateId,
        instance_user_id: UserId,
        instance_name: impl Into<String>,
    ) -> Self {
        Self {
            instance_id,
            template_id,
            instance_user_id,
            instance_name: instance_name.into(),
            inner: Mutex::new(InstanceState {
                blocks: Vec::new(),
                block_index: HashMap::new(),
                lines: Vec::new(),
                parameters: InstanceParameters::default(),
                state: RunnableState::NotConfigured,
                modified: false,
                error: None,
                plan: Vec::new(),
                listeners: Vec::new(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;

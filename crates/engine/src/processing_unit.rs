// SPDX-License-Identifier: MIT

//! `ProcessingUnit`: drives every registered instance forward on a fixed
//! tick, draining the command queue first each tick (spec §4.5).

use crate::instance::{Instance, InstanceListItem};
use crossbeam_queue::SegQueue;
use flowforge_core::{Command, CommandKind, EngineError, InstanceId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Cheap to clone: everything it touches lives behind an `Arc`. Clones
/// share the same instance table, command queue, and running tick worker.
#[derive(Clone)]
pub struct ProcessingUnit {
    inner: Arc<Inner>,
}

struct Inner {
    instances: Mutex<HashMap<InstanceId, Arc<Instance>>>,
    commands: SegQueue<Command>,
    tick_interval: Duration,
    shutdown_grace: Duration,
    running: Mutex<Option<RunningHandle>>,
}

struct RunningHandle {
    stop: Arc<Notify>,
    task: JoinHandle<()>,
}

impl ProcessingUnit {
    /// `tick_interval` is the fixed delay between ticks; `shutdown_grace`
    /// bounds how long `stop_processing` waits for the tick in progress
    /// before aborting the worker task outright.
    pub fn new(tick_interval: Duration, shutdown_grace: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                instances: Mutex::new(HashMap::new()),
                commands: SegQueue::new(),
                tick_interval,
                shutdown_grace,
                running: Mutex::new(None),
            }),
        }
    }

    /// Register a new instance. Fails with `ObjectAlreadyExists` if its id
    /// is already present.
    pub fn add_instance(&self, instance: Instance) -> Result<Arc<Instance>, EngineError> {
        let instance = Arc::new(instance);
        let mut instances = self.inner.instances.lock();
        if instances.contains_key(&instance.instance_id()) {
            return Err(EngineError::ObjectAlreadyExists(
                instance.instance_id().to_string(),
            ));
        }
        instances.insert(instance.instance_id(), instance.clone());
        Ok(instance)
    }

    pub fn instance(&self, instance_id: InstanceId) -> Option<Arc<Instance>> {
        self.inner.instances.lock().get(&instance_id).cloned()
    }

    pub fn instance_list_items(&self) -> Vec<InstanceListItem> {
        self.inner
            .instances
            .lock()
            .values()
            .map(|instance| instance.list_item())
            .collect()
    }

    /// Enqueue a command for the next tick to drain. Never blocks and
    /// never fails: `crossbeam_queue::SegQueue` is unbounded.
    pub fn put_command(&self, command: Command) {
        self.inner.commands.push(command);
    }

    /// Start the tick worker on the current Tokio runtime. A no-op if
    /// already running.
    pub fn start_processing(&self) {
        let mut running = self.inner.running.lock();
        if running.is_some() {
            return;
        }
        let stop = Arc::new(Notify::new());
        let stop_signal = stop.clone();
        let unit = self.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(unit.inner.tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = interval.tick() => unit.process_tick(),
                    _ = stop_signal.notified() => break,
                }
            }
        });
        *running = Some(RunningHandle { stop, task });
    }

    /// Signal the tick worker to stop and wait up to `shutdown_grace` for
    /// the tick in progress to finish. Aborts the worker task if it
    /// doesn't stop in time. A no-op if not running.
    pub async fn stop_processing(&self) {
        let handle = self.inner.running.lock().take();
        let Some(RunningHandle { stop, mut task }) = handle else {
            return;
        };
        stop.notify_one();
        tokio::select! {
            result = &mut task => {
                if let Err(err) = result {
                    tracing::warn!(error = %err, "tick worker task ended abnormally");
                }
            }
            _ = tokio::time::sleep(self.inner.shutdown_grace) => {
                tracing::warn!("tick worker did not stop within the grace period; aborting");
                task.abort();
            }
        }
    }

    /// One scheduler tick: drain pending commands, then run every
    /// ready-to-run instance once.
    fn process_tick(&self) {
        self.drain_commands();

        let instances: Vec<Arc<Instance>> =
            self.inner.instances.lock().values().cloned().collect();
        for instance in instances {
            if !instance.state().is_ready_to_run() {
                continue;
            }
            if let Err(err) = instance.run() {
                tracing::warn!(
                    instance_id = %instance.instance_id(),
                    error = %err,
                    "instance tick failed"
                );
            }
        }
    }

    fn drain_commands(&self) {
        while let Some(command) = self.inner.commands.pop() {
            let instance = self.inner.instances.lock().get(&command.instance_id).cloned();
            let Some(instance) = instance else {
                tracing::warn!(
                    instance_id = %command.instance_id,
                    "command for unknown instance dropped"
                );
                continue;
            };

            let result = match command.kind {
                CommandKind::SetReady => instance.set_ready(),
                CommandKind::Pause => instance.pause(),
                CommandKind::Resume => instance.resume(),
                CommandKind::Stop => {
                    instance.stop();
                    Ok(())
                }
                CommandKind::Abort => {
                    instance.abort();
                    Ok(())
                }
                CommandKind::Reset => {
                    instance.reset();
                    Ok(())
                }
                CommandKind::Remove => {
                    self.inner.instances.lock().remove(&command.instance_id);
                    Ok(())
                }
            };

            if let Err(err) = result {
                tracing::warn!(
                    instance_id = %command.instance_id,
                    error = %err,
                    "command failed"
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "processing_unit_tests.rs"]
mod tests;

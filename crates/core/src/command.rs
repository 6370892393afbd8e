// SPDX-License-Identifier: MIT

//! Commands through which outside agents steer instances.

use crate::id::InstanceId;
use serde::{Deserialize, Serialize};

/// The operation a [`Command`] requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandKind {
    SetReady,
    Pause,
    Resume,
    Stop,
    Abort,
    Reset,
    Remove,
}

/// A tagged value enqueued on the scheduler's command queue, consumed
/// exactly once then discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    pub instance_id: InstanceId,
}

impl Command {
    pub fn new(kind: CommandKind, instance_id: InstanceId) -> Self {
        Self { kind, instance_id }
    }
}

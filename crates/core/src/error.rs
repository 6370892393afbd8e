// SPDX-License-Identifier: MIT

//! Error taxonomy shared across the engine, scheduler, and block registry.

use thiserror::Error;

/// Errors that can occur anywhere in the core engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A required argument was missing, blank, or non-positive.
    #[error("null argument: {argument}")]
    NullArgument { argument: &'static str },

    /// A structural precondition of construction or loading was violated.
    #[error("configuration mismatch: {0}")]
    ConfigurationMismatch(String),

    /// `addInstance` was called with an id already present.
    #[error("object already exists: {0}")]
    ObjectAlreadyExists(String),

    /// Unexpected storage failure while adding an instance.
    #[error("failed to add instance {instance_id}: {reason}")]
    InstanceAddFailed { instance_id: String, reason: String },

    /// A command could not be enqueued.
    #[error("command failed: {0}")]
    CommandFailed(String),

    /// `createBlock` was called with an unregistered `blockTypeId`.
    #[error("block type not found: {0}")]
    BlockTypeNotFound(String),

    /// A builder service failed to construct a block.
    #[error("instantiation failed for block type {block_type_id}: {reason}")]
    Instantiation {
        block_type_id: String,
        reason: String,
    },

    /// Reserved transition with no effect yet (`PAUSE`/`RESUME`).
    ///
    /// Not surfaced to callers as a failure — kept here so call sites that
    /// want to log or assert on the reserved-no-op path have a named value
    /// to match on.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

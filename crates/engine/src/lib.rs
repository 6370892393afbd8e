// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! flowforge-engine: the orchestration layer that drives `Instance`s
//! forward one tick at a time.
//!
//! `flowforge-core` defines what a block, line, or instance *is*;
//! this crate owns the scheduling loop that advances them
//! ([`ProcessingUnit`]) and the instance-local planner/dispatcher
//! ([`Instance`]) that decides which blocks run on a given tick.

pub mod error;
pub mod instance;
pub mod processing_unit;

pub use error::EngineError;
pub use instance::{Instance, InstanceConfig, InstanceListItem};
pub use processing_unit::ProcessingUnit;

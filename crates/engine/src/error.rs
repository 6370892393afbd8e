// SPDX-License-Identifier: MIT

//! Re-exports the shared error taxonomy for this crate's public API.
//!
//! `flowforge-engine` raises the same [`EngineError`] variants
//! `flowforge-core` and `flowforge-registry` do — see spec §7 — so a
//! caller driving all three never has to match on more than one error
//! type.

pub use flowforge_core::EngineError;

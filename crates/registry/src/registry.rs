// SPDX-License-Identifier: MIT

//! `BlockRegistry`: discovers block implementations from a directory of
//! plugin archives and builds `Block`s by `blockTypeId` on demand
//! (spec §4.6).

use crate::loader::{list_plugin_subdirectories, load_subdirectory};
use crate::state::RegistryState;
use arc_swap::ArcSwap;
use flowforge_core::{Block, BlockTypeId, EngineError};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Plugin loader and block factory. Cheap to clone: the state it guards
/// lives behind an `ArcSwap`, itself behind an `Arc`.
#[derive(Clone)]
pub struct BlockRegistry {
    inner: Arc<Inner>,
}

struct Inner {
    acceptable_engine_versions: HashSet<String>,
    state: ArcSwap<RegistryState>,
}

impl BlockRegistry {
    /// `acceptable_engine_versions` is supplied once at construction; an
    /// operator configures it from outside the core (spec §6,
    /// "Environment").
    pub fn new(acceptable_engine_versions: impl IntoIterator<Item = String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                acceptable_engine_versions: acceptable_engine_versions.into_iter().collect(),
                state: ArcSwap::from_pointee(RegistryState::empty()),
            }),
        }
    }

    /// Scan `top_level_path` for plugin subdirectories and atomically
    /// replace the registry's state with what was found. A subdirectory
    /// that fails to load, or whose service targets an engine version
    /// outside `acceptable_engine_versions`, aborts the whole reload — the
    /// registry keeps serving its previous state untouched (spec §4.6
    /// steps 2-6).
    pub fn load(
        &self,
        top_level_path: &Path,
        host_archive_names: &HashSet<String>,
        remove_duplicate_dependencies: bool,
    ) -> Result<(), EngineError> {
        let subdirectories = list_plugin_subdirectories(top_level_path)?;

        let mut loaders = Vec::with_capacity(subdirectories.len());
        for subdirectory in &subdirectories {
            let loader = load_subdirectory(
                subdirectory,
                host_archive_names,
                remove_duplicate_dependencies,
            )?;
            for service in loader.services() {
                if !self
                    .inner
                    .acceptable_engine_versions
                    .contains(service.expected_engine_version())
                {
                    return Err(EngineError::ConfigurationMismatch(format!(
                        "plugin in {} targets unsupported engine version {}",
                        subdirectory.display(),
                        service.expected_engine_version()
                    )));
                }
            }
            loaders.push(loader);
        }

        let new_state = Arc::new(RegistryState::from_loaders(loaders));
        // Dropping the outgoing state here closes its loaders' native
        // libraries; `libloading::Library`'s `Drop` impl swallows dlclose
        // failures, matching "failures to close are logged, not raised".
        let previous = self.inner.state.swap(new_state);
        tracing::info!(
            subdirectories = subdirectories.len(),
            "block registry reloaded"
        );
        drop(previous);
        Ok(())
    }

    /// Build a block of the given type. Fails with `BlockTypeNotFound` if
    /// no loaded service declares it.
    pub fn create_block(
        &self,
        block_type_id: &BlockTypeId,
        args: &[String],
    ) -> Result<Box<dyn Block>, EngineError> {
        let state = self.inner.state.load();
        let service = state
            .service_for(block_type_id)
            .ok_or_else(|| EngineError::BlockTypeNotFound(block_type_id.to_string()))?;
        service.build_block(block_type_id, args)
    }

    /// Atomically swap in an empty state, closing every outgoing loader.
    pub fn close(&self) {
        let previous = self.inner.state.swap(Arc::new(RegistryState::empty()));
        drop(previous);
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

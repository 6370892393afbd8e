// SPDX-License-Identifier: MIT

//! The atomically-swapped `(services, loaders)` pair a [`BlockRegistry`]
//! holds (spec §4.6, "Atomicity").

use crate::loader::PluginLoader;
use crate::service::BlockBuilderService;
use flowforge_core::BlockTypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// An immutable snapshot of everything the registry can currently build
/// blocks from. Readers load one `Arc<RegistryState>` and work off it;
/// a reload builds a new one off to the side and swaps it in.
#[derive(Default)]
pub struct RegistryState {
    services: HashMap<BlockTypeId, Arc<dyn BlockBuilderService>>,
    loaders: Vec<PluginLoader>,
}

impl RegistryState {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_loaders(loaders: Vec<PluginLoader>) -> Self {
        let mut services = HashMap::new();
        for loader in &loaders {
            for service in loader.services() {
                for block_type_id in service.supported_block_type_ids() {
                    services.insert(block_type_id, service.clone());
                }
            }
        }
        Self { services, loaders }
    }

    pub fn service_for(&self, block_type_id: &BlockTypeId) -> Option<Arc<dyn BlockBuilderService>> {
        self.services.get(block_type_id).cloned()
    }

    pub fn loaders(&self) -> &[PluginLoader] {
        &self.loaders
    }
}

// SPDX-License-Identifier: MIT

use super::*;
use flowforge_core::BlockTypeId;
use std::collections::HashSet;

#[test]
fn freshly_constructed_registry_has_no_services() {
    let registry = BlockRegistry::new(["1.0".to_string()]);
    let result = registry.create_block(&BlockTypeId::new("echo").unwrap(), &[]);
    assert!(matches!(result, Err(EngineError::BlockTypeNotFound(_))));
}

#[test]
fn close_on_an_empty_registry_is_safe() {
    let registry = BlockRegistry::new(["1.0".to_string()]);
    registry.close();
    let result = registry.create_block(&BlockTypeId::new("echo").unwrap(), &[]);
    assert!(matches!(result, Err(EngineError::BlockTypeNotFound(_))));
}

#[test]
fn load_fails_for_a_missing_top_level_path() {
    let registry = BlockRegistry::new(["1.0".to_string()]);
    let result = registry.load(
        Path::new("/nonexistent/flowforge-plugins"),
        &HashSet::new(),
        false,
    );
    assert!(matches!(result, Err(EngineError::ConfigurationMismatch(_))));
}

#[test]
fn a_failed_load_leaves_the_previous_state_untouched() {
    let registry = BlockRegistry::new(["1.0".to_string()]);
    let top = tempfile::tempdir().unwrap();
    std::fs::create_dir(top.path().join("empty-plugin")).unwrap();

    // The one subdirectory has no archives, so the whole reload fails --
    // the registry must still be serving its (empty) prior state, not a
    // half-built one.
    let result = registry.load(top.path(), &HashSet::new(), false);
    assert!(matches!(result, Err(EngineError::ConfigurationMismatch(_))));

    let block_result = registry.create_block(&BlockTypeId::new("echo").unwrap(), &[]);
    assert!(matches!(block_result, Err(EngineError::BlockTypeNotFound(_))));
}

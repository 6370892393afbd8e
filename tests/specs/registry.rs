// SPDX-License-Identifier: MIT

use flowforge_core::{BlockTypeId, EngineError};
use flowforge_registry::BlockRegistry;
use std::collections::HashSet;

#[test]
fn unknown_block_types_are_reported_as_not_found() {
    let registry = BlockRegistry::new(["1.0".to_string()]);
    let result = registry.create_block(&BlockTypeId::new("no-such-type").unwrap(), &[]);
    assert!(matches!(result, Err(EngineError::BlockTypeNotFound(_))));
}

#[test]
fn reload_from_a_directory_with_no_plugins_still_requires_subdirectories() {
    let registry = BlockRegistry::new(["1.0".to_string()]);
    let top = tempfile::tempdir().unwrap();
    // An existing-but-empty top-level directory has zero plugin
    // subdirectories: `load` succeeds trivially, leaving the registry
    // with no services.
    registry.load(top.path(), &HashSet::new(), false).unwrap();
    let result = registry.create_block(&BlockTypeId::new("echo").unwrap(), &[]);
    assert!(matches!(result, Err(EngineError::BlockTypeNotFound(_))));
}

#[test]
fn a_malformed_plugin_subdirectory_aborts_the_whole_reload() {
    let registry = BlockRegistry::new(["1.0".to_string()]);
    let top = tempfile::tempdir().unwrap();
    std::fs::create_dir(top.path().join("broken-plugin")).unwrap();

    let result = registry.load(top.path(), &HashSet::new(), false);
    assert!(matches!(result, Err(EngineError::ConfigurationMismatch(_))));

    // The failed reload must not have left a half-built state behind.
    let block_result = registry.create_block(&BlockTypeId::new("echo").unwrap(), &[]);
    assert!(matches!(block_result, Err(EngineError::BlockTypeNotFound(_))));
}

#[test]
fn close_is_idempotent() {
    let registry = BlockRegistry::new(["1.0".to_string()]);
    registry.close();
    registry.close();
}

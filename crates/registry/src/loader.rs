// SPDX-License-Identifier: MIT

//! Per-subdirectory plugin discovery: archive collection, duplicate
//! detection against the host's own archives, and loading into an
//! isolated set of native libraries (spec §4.6 step 1-4).

use crate::service::{BlockBuilderService, RegisterServicesFn, PLUGIN_ENTRY_SYMBOL};
use flowforge_core::EngineError;
use libloading::Library;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The native dynamic library extension on this platform, standing in for
/// the `.jar`-equivalent archive convention (spec §4.6).
pub fn archive_extension() -> &'static str {
    std::env::consts::DLL_EXTENSION
}

/// One loaded plugin subdirectory: the native libraries kept open to back
/// its services, plus the services themselves. Field order matters —
/// `services` (and anything derived from a library's code) must drop
/// before `libraries` does.
pub struct PluginLoader {
    subdirectory: PathBuf,
    services: Vec<Arc<dyn BlockBuilderService>>,
    libraries: Vec<Library>,
}

impl PluginLoader {
    pub fn subdirectory(&self) -> &Path {
        &self.subdirectory
    }

    pub fn services(&self) -> &[Arc<dyn BlockBuilderService>] {
        &self.services
    }

    pub fn library_count(&self) -> usize {
        self.libraries.len()
    }
}

/// List archive files directly inside `dir` (non-recursive), matching
/// [`archive_extension`].
fn collect_archive_paths(dir: &Path) -> Result<Vec<PathBuf>, EngineError> {
    let ext = archive_extension();
    let mut archives = Vec::new();
    let entries = fs::read_dir(dir).map_err(|err| {
        EngineError::ConfigurationMismatch(format!(
            "failed to read plugin directory {}: {err}",
            dir.display()
        ))
    })?;
    for entry in entries {
        let entry = entry.map_err(|err| {
            EngineError::ConfigurationMismatch(format!(
                "failed to read entry in {}: {err}",
                dir.display()
            ))
        })?;
        let path = entry.path();
        if path.extension().and_then(OsStr::to_str) == Some(ext) {
            archives.push(path);
        }
    }
    Ok(archives)
}

/// Load one plugin subdirectory: detect (and optionally remove) archives
/// that duplicate one of the host's own, collect the remaining archives,
/// open each as a library, and pull every declared service out of it.
pub fn load_subdirectory(
    dir: &Path,
    host_archive_names: &HashSet<String>,
    remove_duplicate_dependencies: bool,
) -> Result<PluginLoader, EngineError> {
    let mut archives = collect_archive_paths(dir)?;

    let duplicates: Vec<PathBuf> = archives
        .iter()
        .filter(|path| {
            path.file_name()
                .and_then(OsStr::to_str)
                .map(|name| host_archive_names.contains(name))
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    if !duplicates.is_empty() {
        tracing::warn!(
            directory = %dir.display(),
            count = duplicates.len(),
            "plugin directory shadows host archives"
        );
        if remove_duplicate_dependencies {
            for duplicate in &duplicates {
                fs::remove_file(duplicate).map_err(|err| {
                    EngineError::ConfigurationMismatch(format!(
                        "failed to remove duplicate archive {}: {err}",
                        duplicate.display()
                    ))
                })?;
            }
            archives.retain(|path| !duplicates.contains(path));
        }
    }

    if archives.is_empty() {
        return Err(EngineError::ConfigurationMismatch(format!(
            "plugin directory {} has no archives",
            dir.display()
        )));
    }

    let mut libraries = Vec::with_capacity(archives.len());
    let mut services = Vec::new();
    for archive in &archives {
        // SAFETY: archives are operator-supplied plugin bundles loaded once
        // at startup or reload; the engine trusts their entry point's ABI
        // to match `RegisterServicesFn`, as documented on
        // `PLUGIN_ENTRY_SYMBOL`.
        let library = unsafe { Library::new(archive) }.map_err(|err| {
            EngineError::ConfigurationMismatch(format!(
                "failed to load plugin archive {}: {err}",
                archive.display()
            ))
        })?;

        // Only implementation archives export the entry point; dependency
        // archives are kept open for symbol resolution but contribute no
        // services themselves.
        if let Ok(entry) = unsafe { library.get::<RegisterServicesFn>(PLUGIN_ENTRY_SYMBOL) } {
            // SAFETY: the entry point hands us ownership of a
            // heap-allocated `Vec` it built with `Box::into_raw`; we
            // reconstitute it immediately and never touch the raw pointer
            // again.
            let raw = unsafe { entry() };
            if raw.is_null() {
                return Err(EngineError::ConfigurationMismatch(format!(
                    "plugin entry point in {} returned a null service list",
                    archive.display()
                )));
            }
            let declared: Vec<Box<dyn BlockBuilderService>> = *unsafe { Box::from_raw(raw) };
            services.extend(declared.into_iter().map(Arc::from));
        }

        libraries.push(library);
    }

    Ok(PluginLoader {
        subdirectory: dir.to_path_buf(),
        services,
        libraries,
    })
}

/// Enumerate the direct subdirectories of `top_level_path`. Fails with
/// `ConfigurationMismatch` if `top_level_path` is not an existing
/// directory.
pub fn list_plugin_subdirectories(top_level_path: &Path) -> Result<Vec<PathBuf>, EngineError> {
    if !top_level_path.is_dir() {
        return Err(EngineError::ConfigurationMismatch(format!(
            "{} is not an existing directory",
            top_level_path.display()
        )));
    }
    let mut dirs = Vec::new();
    let entries = fs::read_dir(top_level_path).map_err(|err| {
        EngineError::ConfigurationMismatch(format!(
            "failed to read {}: {err}",
            top_level_path.display()
        ))
    })?;
    for entry in entries {
        let entry = entry.map_err(|err| {
            EngineError::ConfigurationMismatch(format!(
                "failed to read entry in {}: {err}",
                top_level_path.display()
            ))
        })?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    Ok(dirs)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

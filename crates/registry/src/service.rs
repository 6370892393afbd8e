// SPDX-License-Identifier: MIT

//! The `BlockBuilderService` contract plugins implement, and the dynamic
//! library entry point the registry looks up to obtain one or more of
//! them from a loaded archive.

use flowforge_core::{Block, BlockTypeId, EngineError};

/// Implemented by plugin code. One service may back several
/// `blockTypeId`s, each built from the same engine version.
pub trait BlockBuilderService: Send + Sync {
    /// Engine version this service was built against, checked at load
    /// time against the registry's `acceptable_engine_versions`.
    fn expected_engine_version(&self) -> &str;

    /// Every `blockTypeId` this service can construct.
    fn supported_block_type_ids(&self) -> Vec<BlockTypeId>;

    /// Construct a block. The service decides internally how to resolve
    /// `args` into its own constructor; an unresolvable argument list is
    /// an `Instantiation` error, not a panic.
    fn build_block(
        &self,
        block_type_id: &BlockTypeId,
        args: &[String],
    ) -> Result<Box<dyn Block>, EngineError>;
}

/// Symbol name every plugin archive must export. Looked up with
/// `libloading::Library::get` immediately after the library is opened.
pub const PLUGIN_ENTRY_SYMBOL: &[u8] = b"flowforge_register_services\0";

/// Signature of the exported entry point. A plugin implements this as:
///
/// ```ignore
/// #[no_mangle]
/// pub extern "C" fn flowforge_register_services() -> *mut Vec<Box<dyn BlockBuilderService>> {
///     Box::into_raw(Box::new(vec![Box::new(MyService) as Box<dyn BlockBuilderService>]))
/// }
/// ```
///
/// The registry takes ownership of the returned box via `Box::from_raw`
/// immediately after the call, inside the same `unsafe` block that looked
/// the symbol up.
pub type RegisterServicesFn =
    unsafe extern "C" fn() -> *mut Vec<Box<dyn BlockBuilderService>>;

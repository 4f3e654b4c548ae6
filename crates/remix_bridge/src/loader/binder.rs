//! Mapping the renderer binary and populating the entry-point table

use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};
use std::ptr;

use libloading::{Library, Symbol};

use crate::error::{BridgeError, BridgeResult};
use crate::ffi::{
    FunctionTable, InitializeLibraryInfo, PfnInitializeLibrary, StructType,
    INITIALIZE_LIBRARY_SYMBOL, REMIXAPI_VERSION,
};

/// Ownership token for a library mapped into the process
///
/// Dropping the handle releases the OS reference. Function pointers obtained
/// from the library must not be called afterwards.
pub struct LibraryHandle {
    path: PathBuf,
    _owner: Box<dyn Any + Send>,
}

impl LibraryHandle {
    /// Wrap whatever keeps the mapping alive
    pub fn new<T: Any + Send>(path: impl Into<PathBuf>, owner: T) -> Self {
        Self {
            path: path.into(),
            _owner: Box::new(owner),
        }
    }

    /// Path the library was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for LibraryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryHandle").field("path", &self.path).finish_non_exhaustive()
    }
}

impl Drop for LibraryHandle {
    fn drop(&mut self) {
        log::debug!("Unloading renderer library {}", self.path.display());
    }
}

/// A fully populated table together with the mapping that backs it
#[derive(Debug)]
pub struct BoundLibrary {
    /// Every required entry is bound
    pub table: FunctionTable,
    /// Keeps `table` callable
    pub handle: LibraryHandle,
}

/// Loads a renderer binary and produces its entry-point table
pub trait LibraryBinder: Send {
    /// Map the binary at `path` and bind every entry point
    ///
    /// Each successful call holds one library reference until the returned
    /// handle is dropped.
    fn load(&mut self, path: &Path) -> BridgeResult<BoundLibrary>;
}

/// Binder backed by the OS dynamic loader
#[derive(Debug, Clone)]
pub struct DynamicBinder {
    version: u64,
}

impl DynamicBinder {
    /// Request the interface version this crate mirrors
    pub fn new() -> Self {
        Self {
            version: REMIXAPI_VERSION,
        }
    }

    /// Request a specific interface version
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Resolve the bootstrap export and bind through it
    ///
    /// # Safety
    /// `library` must be a Remix runtime whose `remixapi_InitializeLibrary`
    /// matches [`PfnInitializeLibrary`].
    unsafe fn initialize(&self, library: &Library, path: &Path) -> BridgeResult<FunctionTable> {
        let bootstrap: Symbol<'_, PfnInitializeLibrary> =
            unsafe { library.get(INITIALIZE_LIBRARY_SYMBOL) }.map_err(|e| BridgeError::BindFailed {
                path: path.to_path_buf(),
                reason: format!("missing export remixapi_InitializeLibrary: {e}"),
            })?;

        // SAFETY: forwarded from the caller.
        unsafe { bind_with(*bootstrap, self.version, path) }
    }
}

/// Call the bootstrap and validate the resulting table
///
/// A table with any required entry missing is never returned.
///
/// # Safety
/// `bootstrap` must be callable for the duration of the call.
unsafe fn bind_with(bootstrap: PfnInitializeLibrary, version: u64, path: &Path) -> BridgeResult<FunctionTable> {
    let bind_failed = |reason: String| BridgeError::BindFailed {
        path: path.to_path_buf(),
        reason,
    };

    let info = InitializeLibraryInfo {
        s_type: StructType::INITIALIZE_LIBRARY_INFO,
        p_next: ptr::null_mut(),
        version,
    };
    let mut table = FunctionTable::default();
    let code = unsafe { bootstrap(&info, &mut table) };
    if !code.is_success() {
        return Err(bind_failed(format!("remixapi_InitializeLibrary returned {code}")));
    }

    let missing = table.missing_entries();
    if !missing.is_empty() {
        return Err(bind_failed(format!("entry points not provided: {}", missing.join(", "))));
    }
    Ok(table)
}

impl Default for DynamicBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryBinder for DynamicBinder {
    fn load(&mut self, path: &Path) -> BridgeResult<BoundLibrary> {
        log::info!("Loading renderer library {}", path.display());

        // SAFETY: loading runs the library's initialisers; the Remix runtime
        // has no load-time requirements beyond being on a supported system.
        let library = unsafe { Library::new(path) }.map_err(|source| BridgeError::LoadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        // SAFETY: the export is declared in remix_c.h with this signature.
        let table = unsafe { self.initialize(&library, path) }?;

        Ok(BoundLibrary {
            table,
            handle: LibraryHandle::new(path, library),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::ErrorCode;
    use std::os::raw::c_char;

    #[test]
    fn test_missing_binary_reports_load_failure() {
        let mut binder = DynamicBinder::new();
        let err = binder.load(Path::new("definitely/not/here/d3d9.dll")).unwrap_err();
        match err {
            BridgeError::LoadFailed { path, .. } => {
                assert_eq!(path, PathBuf::from("definitely/not/here/d3d9.dll"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    unsafe extern "system" fn noop() -> ErrorCode {
        ErrorCode::SUCCESS
    }
    unsafe extern "system" fn noop_info<T>(_info: *const T) -> ErrorCode {
        ErrorCode::SUCCESS
    }
    unsafe extern "system" fn noop_create<T, H>(_info: *const T, _out: *mut H) -> ErrorCode {
        ErrorCode::SUCCESS
    }
    unsafe extern "system" fn noop_handle<H>(_handle: H) -> ErrorCode {
        ErrorCode::SUCCESS
    }
    unsafe extern "system" fn noop_config(_key: *const c_char, _value: *const c_char) -> ErrorCode {
        ErrorCode::SUCCESS
    }

    /// Every required entry except `Present`
    unsafe extern "system" fn bootstrap_without_present(
        _info: *const InitializeLibraryInfo,
        out: *mut FunctionTable,
    ) -> ErrorCode {
        let table = unsafe { &mut *out };
        table.shutdown = Some(noop);
        table.create_material = Some(noop_create);
        table.destroy_material = Some(noop_handle);
        table.create_mesh = Some(noop_create);
        table.destroy_mesh = Some(noop_handle);
        table.setup_camera = Some(noop_info);
        table.draw_instance = Some(noop_info);
        table.create_light = Some(noop_create);
        table.destroy_light = Some(noop_handle);
        table.draw_light_instance = Some(noop_handle);
        table.set_config_variable = Some(noop_config);
        table.startup = Some(noop_info);
        ErrorCode::SUCCESS
    }

    unsafe extern "system" fn bootstrap_complete(
        info: *const InitializeLibraryInfo,
        out: *mut FunctionTable,
    ) -> ErrorCode {
        let code = unsafe { bootstrap_without_present(info, out) };
        unsafe { (*out).present = Some(noop_info) };
        code
    }

    unsafe extern "system" fn bootstrap_incompatible(
        _info: *const InitializeLibraryInfo,
        _out: *mut FunctionTable,
    ) -> ErrorCode {
        ErrorCode::INCOMPATIBLE_VERSION
    }

    #[test]
    fn test_missing_entry_fails_binding() {
        let path = Path::new("bin/d3d9.dll");
        let err = unsafe { bind_with(bootstrap_without_present, REMIXAPI_VERSION, path) }.unwrap_err();
        match err {
            BridgeError::BindFailed { path, reason } => {
                assert_eq!(path, PathBuf::from("bin/d3d9.dll"));
                assert!(reason.contains("Present"), "{reason}");
                assert!(!reason.contains("Startup"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bootstrap_error_fails_binding() {
        let err = unsafe { bind_with(bootstrap_incompatible, REMIXAPI_VERSION, Path::new("d3d9.dll")) }
            .unwrap_err();
        match err {
            BridgeError::BindFailed { reason, .. } => {
                assert!(reason.contains("INCOMPATIBLE_VERSION"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_complete_table_is_bound() {
        let table = unsafe { bind_with(bootstrap_complete, REMIXAPI_VERSION, Path::new("d3d9.dll")) }.unwrap();
        assert!(table.is_bound());
        assert!(table.missing_entries().is_empty());
    }

    #[test]
    fn test_handle_reports_path() {
        let handle = LibraryHandle::new("bin/d3d9.dll", ());
        assert_eq!(handle.path(), Path::new("bin/d3d9.dll"));
    }
}

//! In-process stand-in for the renderer binary
//!
//! Entry points record into thread-local state, so each test thread sees only
//! its own calls.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::path::{Path, PathBuf};

use crate::error::{BridgeError, BridgeResult};
use crate::ffi::{
    CameraInfo, ErrorCode, FunctionTable, InstanceInfo, LightInfo, MaterialInfo, MeshInfo,
    MeshInfoSurfaceTriangles, PresentInfo, RawLightHandle, RawMaterialHandle, RawMeshHandle,
    StartupInfo,
};
use crate::loader::{BoundLibrary, LibraryBinder, LibraryHandle};

#[derive(Default)]
struct MockState {
    calls: Vec<&'static str>,
    fail_next: HashMap<&'static str, ErrorCode>,
    next_handle: usize,
    loads: usize,
    unloads: usize,
    loaded_paths: Vec<PathBuf>,
    last_startup: Option<(usize, bool)>,
    last_present: Option<Option<usize>>,
    last_mesh_materials: Vec<usize>,
    config_variables: Vec<(String, String)>,
}

thread_local! {
    static STATE: RefCell<MockState> = RefCell::new(MockState {
        next_handle: 0x1000,
        ..MockState::default()
    });
}

fn with_state<R>(f: impl FnOnce(&mut MockState) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

fn record(op: &'static str) -> ErrorCode {
    with_state(|s| {
        s.calls.push(op);
        s.fail_next.remove(op).unwrap_or(ErrorCode::SUCCESS)
    })
}

fn mint() -> *mut std::ffi::c_void {
    with_state(|s| {
        s.next_handle += 0x10;
        s.next_handle as *mut _
    })
}

/// Make the next call to `op` return `code`
pub(crate) fn fail_next(op: &'static str, code: ErrorCode) {
    with_state(|s| {
        s.fail_next.insert(op, code);
    });
}

pub(crate) fn calls() -> Vec<&'static str> {
    with_state(|s| s.calls.clone())
}

pub(crate) fn calls_to(op: &str) -> usize {
    with_state(|s| s.calls.iter().filter(|&&c| c == op).count())
}

pub(crate) fn loads() -> usize {
    with_state(|s| s.loads)
}

pub(crate) fn unloads() -> usize {
    with_state(|s| s.unloads)
}

pub(crate) fn loaded_paths() -> Vec<PathBuf> {
    with_state(|s| s.loaded_paths.clone())
}

/// `(hwnd, editor_mode_enabled)` of the last Startup
pub(crate) fn last_startup() -> Option<(usize, bool)> {
    with_state(|s| s.last_startup)
}

/// `None` if Present was never called, `Some(None)` for a null info pointer
pub(crate) fn last_present() -> Option<Option<usize>> {
    with_state(|s| s.last_present)
}

pub(crate) fn last_mesh_materials() -> Vec<usize> {
    with_state(|s| s.last_mesh_materials.clone())
}

pub(crate) fn config_variables() -> Vec<(String, String)> {
    with_state(|s| s.config_variables.clone())
}

unsafe extern "system" fn shutdown() -> ErrorCode {
    record("Shutdown")
}

unsafe extern "system" fn startup(info: *const StartupInfo) -> ErrorCode {
    let code = record("Startup");
    let info = unsafe { &*info };
    with_state(|s| s.last_startup = Some((info.hwnd as usize, info.editor_mode_enabled != 0)));
    code
}

unsafe extern "system" fn present(info: *const PresentInfo) -> ErrorCode {
    let code = record("Present");
    let hwnd = (!info.is_null()).then(|| unsafe { (*info).hwnd_override as usize });
    with_state(|s| s.last_present = Some(hwnd));
    code
}

unsafe extern "system" fn setup_camera(_info: *const CameraInfo) -> ErrorCode {
    record("SetupCamera")
}

unsafe extern "system" fn create_mesh(info: *const MeshInfo, out: *mut RawMeshHandle) -> ErrorCode {
    let code = record("CreateMesh");
    let info = unsafe { &*info };
    let surfaces: &[MeshInfoSurfaceTriangles] = if info.surfaces_values.is_null() {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(info.surfaces_values, info.surfaces_count as usize) }
    };
    let materials = surfaces.iter().map(|s| s.material.0 as usize).collect();
    with_state(|s| s.last_mesh_materials = materials);
    if code.is_success() {
        unsafe { *out = RawMeshHandle(mint()) };
    }
    code
}

unsafe extern "system" fn destroy_mesh(_handle: RawMeshHandle) -> ErrorCode {
    record("DestroyMesh")
}

unsafe extern "system" fn create_material(_info: *const MaterialInfo, out: *mut RawMaterialHandle) -> ErrorCode {
    let code = record("CreateMaterial");
    if code.is_success() {
        unsafe { *out = RawMaterialHandle(mint()) };
    }
    code
}

unsafe extern "system" fn destroy_material(_handle: RawMaterialHandle) -> ErrorCode {
    record("DestroyMaterial")
}

unsafe extern "system" fn create_light(_info: *const LightInfo, out: *mut RawLightHandle) -> ErrorCode {
    let code = record("CreateLight");
    if code.is_success() {
        unsafe { *out = RawLightHandle(mint()) };
    }
    code
}

unsafe extern "system" fn destroy_light(_handle: RawLightHandle) -> ErrorCode {
    record("DestroyLight")
}

unsafe extern "system" fn draw_instance(_info: *const InstanceInfo) -> ErrorCode {
    record("DrawInstance")
}

unsafe extern "system" fn draw_light_instance(_handle: RawLightHandle) -> ErrorCode {
    record("DrawLightInstance")
}

unsafe extern "system" fn set_config_variable(key: *const c_char, value: *const c_char) -> ErrorCode {
    let code = record("SetConfigVariable");
    let key = unsafe { CStr::from_ptr(key) }.to_string_lossy().into_owned();
    let value = unsafe { CStr::from_ptr(value) }.to_string_lossy().into_owned();
    with_state(|s| s.config_variables.push((key, value)));
    code
}

/// Table with every required entry pointing at the mock
pub(crate) fn table() -> FunctionTable {
    FunctionTable {
        shutdown: Some(shutdown),
        create_material: Some(create_material),
        destroy_material: Some(destroy_material),
        create_mesh: Some(create_mesh),
        destroy_mesh: Some(destroy_mesh),
        setup_camera: Some(setup_camera),
        draw_instance: Some(draw_instance),
        create_light: Some(create_light),
        destroy_light: Some(destroy_light),
        draw_light_instance: Some(draw_light_instance),
        set_config_variable: Some(set_config_variable),
        startup: Some(startup),
        present: Some(present),
        ..FunctionTable::default()
    }
}

/// Counts an unload when the owning handle drops
struct MappedToken;

impl Drop for MappedToken {
    fn drop(&mut self) {
        with_state(|s| s.unloads += 1);
    }
}

/// Binder that "maps" the mock table
pub(crate) struct MockBinder {
    table: FunctionTable,
    fail: bool,
}

impl MockBinder {
    pub(crate) fn new() -> Self {
        Self::with_table(table())
    }

    pub(crate) fn with_table(table: FunctionTable) -> Self {
        Self { table, fail: false }
    }

    /// Binder whose every load fails to bind
    pub(crate) fn failing() -> Self {
        Self {
            table: table(),
            fail: true,
        }
    }
}

impl LibraryBinder for MockBinder {
    fn load(&mut self, path: &Path) -> BridgeResult<BoundLibrary> {
        if self.fail {
            return Err(BridgeError::BindFailed {
                path: path.to_path_buf(),
                reason: "mock refuses to bind".into(),
            });
        }
        with_state(|s| {
            s.loads += 1;
            s.loaded_paths.push(path.to_path_buf());
        });
        Ok(BoundLibrary {
            table: self.table,
            handle: LibraryHandle::new(path, MappedToken),
        })
    }
}

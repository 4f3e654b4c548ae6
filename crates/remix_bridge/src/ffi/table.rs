//! The bound entry-point table (`remixapi_Interface`) and the bootstrap export

use std::os::raw::c_char;

use super::error_code::ErrorCode;
use super::types::{
    CameraInfo, InitializeLibraryInfo, InstanceInfo, LightInfo, MaterialInfo, MeshInfo,
    PresentInfo, RawLightHandle, RawMaterialHandle, RawMeshHandle, StartupInfo,
};

/// Name of the export that fills a [`FunctionTable`]
pub const INITIALIZE_LIBRARY_SYMBOL: &[u8] = b"remixapi_InitializeLibrary\0";

/// Interface major version this crate mirrors
pub const VERSION_MAJOR: u64 = 0;
/// Interface minor version this crate mirrors
pub const VERSION_MINOR: u64 = 4;
/// Interface patch version this crate mirrors
pub const VERSION_PATCH: u64 = 1;

/// `REMIXAPI_VERSION_MAKE`
pub const fn make_version(major: u64, minor: u64, patch: u64) -> u64 {
    (major << 48) | (minor << 16) | patch
}

/// Version requested from `remixapi_InitializeLibrary`
pub const REMIXAPI_VERSION: u64 = make_version(VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH);

/// `PFN_remixapi_Shutdown`
pub type PfnShutdown = unsafe extern "system" fn() -> ErrorCode;
/// `PFN_remixapi_Startup`
pub type PfnStartup = unsafe extern "system" fn(info: *const StartupInfo) -> ErrorCode;
/// `PFN_remixapi_Present`
pub type PfnPresent = unsafe extern "system" fn(info: *const PresentInfo) -> ErrorCode;
/// `PFN_remixapi_SetupCamera`
pub type PfnSetupCamera = unsafe extern "system" fn(info: *const CameraInfo) -> ErrorCode;
/// `PFN_remixapi_CreateMesh`
pub type PfnCreateMesh =
    unsafe extern "system" fn(info: *const MeshInfo, out_handle: *mut RawMeshHandle) -> ErrorCode;
/// `PFN_remixapi_DestroyMesh`
pub type PfnDestroyMesh = unsafe extern "system" fn(handle: RawMeshHandle) -> ErrorCode;
/// `PFN_remixapi_CreateMaterial`
pub type PfnCreateMaterial = unsafe extern "system" fn(
    info: *const MaterialInfo,
    out_handle: *mut RawMaterialHandle,
) -> ErrorCode;
/// `PFN_remixapi_DestroyMaterial`
pub type PfnDestroyMaterial = unsafe extern "system" fn(handle: RawMaterialHandle) -> ErrorCode;
/// `PFN_remixapi_CreateLight`
pub type PfnCreateLight =
    unsafe extern "system" fn(info: *const LightInfo, out_handle: *mut RawLightHandle) -> ErrorCode;
/// `PFN_remixapi_DestroyLight`
pub type PfnDestroyLight = unsafe extern "system" fn(handle: RawLightHandle) -> ErrorCode;
/// `PFN_remixapi_DrawInstance`
pub type PfnDrawInstance = unsafe extern "system" fn(info: *const InstanceInfo) -> ErrorCode;
/// `PFN_remixapi_DrawLightInstance`
pub type PfnDrawLightInstance = unsafe extern "system" fn(handle: RawLightHandle) -> ErrorCode;
/// `PFN_remixapi_SetConfigVariable`
pub type PfnSetConfigVariable =
    unsafe extern "system" fn(key: *const c_char, value: *const c_char) -> ErrorCode;

/// Placeholder for DXVK interop and picking entries the bridge never forwards.
/// Only the slot width matters for the table layout.
pub type RawProc = unsafe extern "system" fn();

/// `PFN_remixapi_InitializeLibrary`, the only symbol resolved by name
pub type PfnInitializeLibrary = unsafe extern "system" fn(
    info: *const InitializeLibraryInfo,
    out_result: *mut FunctionTable,
) -> ErrorCode;

/// `remixapi_Interface`
///
/// Filled once by `remixapi_InitializeLibrary` and never mutated afterwards.
/// The default value has every slot empty, which is also what the bridge
/// resets to at shutdown so a stale call fails instead of jumping into an
/// unmapped library.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionTable {
    /// Tear the renderer down
    pub shutdown: Option<PfnShutdown>,
    /// Create a material
    pub create_material: Option<PfnCreateMaterial>,
    /// Destroy a material
    pub destroy_material: Option<PfnDestroyMaterial>,
    /// Create a mesh
    pub create_mesh: Option<PfnCreateMesh>,
    /// Destroy a mesh
    pub destroy_mesh: Option<PfnDestroyMesh>,
    /// Set the frame camera
    pub setup_camera: Option<PfnSetupCamera>,
    /// Draw a mesh instance
    pub draw_instance: Option<PfnDrawInstance>,
    /// Create a light
    pub create_light: Option<PfnCreateLight>,
    /// Destroy a light
    pub destroy_light: Option<PfnDestroyLight>,
    /// Draw a light
    pub draw_light_instance: Option<PfnDrawLightInstance>,
    /// Set a renderer option
    pub set_config_variable: Option<PfnSetConfigVariable>,

    /// DXVK interop, unused
    pub dxvk_create_d3d9: Option<RawProc>,
    #[allow(missing_docs)]
    pub dxvk_register_d3d9_device: Option<RawProc>,
    #[allow(missing_docs)]
    pub dxvk_get_external_swapchain: Option<RawProc>,
    #[allow(missing_docs)]
    pub dxvk_get_vk_image: Option<RawProc>,
    #[allow(missing_docs)]
    pub dxvk_copy_rendering_output: Option<RawProc>,
    #[allow(missing_docs)]
    pub dxvk_set_default_output: Option<RawProc>,

    /// Object picking, unused
    pub pick_request_object_picking: Option<RawProc>,
    #[allow(missing_docs)]
    pub pick_highlight_objects: Option<RawProc>,

    /// Start the renderer
    pub startup: Option<PfnStartup>,
    /// Finish the frame
    pub present: Option<PfnPresent>,
}

impl FunctionTable {
    /// Whether any entry is bound. A reset table reports `false`.
    pub fn is_bound(&self) -> bool {
        self.shutdown.is_some()
    }

    /// Names of the required entries that are missing
    ///
    /// DXVK interop and picking entries are optional; the bridge never calls
    /// them.
    pub fn missing_entries(&self) -> Vec<&'static str> {
        let required: [(&'static str, bool); 13] = [
            ("Shutdown", self.shutdown.is_some()),
            ("CreateMaterial", self.create_material.is_some()),
            ("DestroyMaterial", self.destroy_material.is_some()),
            ("CreateMesh", self.create_mesh.is_some()),
            ("DestroyMesh", self.destroy_mesh.is_some()),
            ("SetupCamera", self.setup_camera.is_some()),
            ("DrawInstance", self.draw_instance.is_some()),
            ("CreateLight", self.create_light.is_some()),
            ("DestroyLight", self.destroy_light.is_some()),
            ("DrawLightInstance", self.draw_light_instance.is_some()),
            ("SetConfigVariable", self.set_config_variable.is_some()),
            ("Startup", self.startup.is_some()),
            ("Present", self.present.is_some()),
        ];
        required
            .into_iter()
            .filter_map(|(name, bound)| (!bound).then_some(name))
            .collect()
    }
}

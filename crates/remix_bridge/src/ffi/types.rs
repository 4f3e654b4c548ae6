//! `#[repr(C)]` mirrors of the structs declared in `remix_c.h`
//!
//! Field order and widths follow the header exactly. Every struct that the
//! renderer reads through a `pNext` chain starts with `s_type` / `p_next`.
//! Nothing in here owns memory: pointer fields borrow from the descriptors in
//! [`crate::scene`] for the duration of a single call.

// Field names are the header's, in snake case.
#![allow(missing_docs)]

use std::ffi::c_void;
use std::ptr;

use bytemuck::{Pod, Zeroable};

/// `remixapi_Bool`
pub type Bool = u32;

/// Character unit of `remixapi_Path` (`const wchar_t*`)
#[cfg(windows)]
pub type WChar = u16;

/// Character unit of `remixapi_Path` (`const wchar_t*`)
#[cfg(not(windows))]
pub type WChar = u32;

/// Convert a Rust bool to `remixapi_Bool`
pub const fn to_bool(value: bool) -> Bool {
    value as Bool
}

/// `remixapi_StructType`, the tag stored in every `sType` field
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StructType(pub i32);

#[allow(missing_docs)]
impl StructType {
    pub const NONE: Self = Self(0);
    pub const INITIALIZE_LIBRARY_INFO: Self = Self(1);
    pub const MATERIAL_INFO: Self = Self(2);
    pub const MATERIAL_INFO_PORTAL_EXT: Self = Self(3);
    pub const MATERIAL_INFO_TRANSLUCENT_EXT: Self = Self(4);
    pub const MATERIAL_INFO_OPAQUE_EXT: Self = Self(5);
    pub const LIGHT_INFO: Self = Self(6);
    pub const LIGHT_INFO_DISTANT_EXT: Self = Self(7);
    pub const LIGHT_INFO_CYLINDER_EXT: Self = Self(8);
    pub const LIGHT_INFO_DISK_EXT: Self = Self(9);
    pub const LIGHT_INFO_RECT_EXT: Self = Self(10);
    pub const LIGHT_INFO_SPHERE_EXT: Self = Self(11);
    pub const MESH_INFO: Self = Self(12);
    pub const INSTANCE_INFO: Self = Self(13);
    pub const INSTANCE_INFO_BONE_TRANSFORMS_EXT: Self = Self(14);
    pub const INSTANCE_INFO_BLEND_EXT: Self = Self(15);
    pub const CAMERA_INFO: Self = Self(16);
    pub const CAMERA_INFO_PARAMETERIZED_EXT: Self = Self(17);
    pub const MATERIAL_INFO_OPAQUE_SUBSURFACE_EXT: Self = Self(18);
    pub const INSTANCE_INFO_OBJECT_PICKING_EXT: Self = Self(19);
    pub const LIGHT_INFO_DOME_EXT: Self = Self(20);
    pub const LIGHT_INFO_USD_EXT: Self = Self(21);
    pub const STARTUP_INFO: Self = Self(22);
    pub const PRESENT_INFO: Self = Self(23);
}

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub *mut c_void);

        impl $name {
            /// The null handle the renderer never hands out
            pub const NULL: Self = Self(ptr::null_mut());

            /// Whether this is the null handle
            pub fn is_null(self) -> bool {
                self.0.is_null()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::NULL
            }
        }

        // The pointer is an opaque token minted by the renderer; this side
        // never dereferences it.
        unsafe impl Send for $name {}
        unsafe impl Sync for $name {}
    };
}

opaque_handle!(
    /// `remixapi_MeshHandle`
    RawMeshHandle
);
opaque_handle!(
    /// `remixapi_MaterialHandle`
    RawMaterialHandle
);
opaque_handle!(
    /// `remixapi_LightHandle`
    RawLightHandle
);

/// `remixapi_Float3D`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Float3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Float3D {
    /// Construct from components
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// `remixapi_Transform`: a row-major 3x4 affine matrix
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Transform {
    pub matrix: [[f32; 4]; 3],
}

/// `remixapi_InitializeLibraryInfo`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct InitializeLibraryInfo {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub version: u64,
}

/// `remixapi_StartupInfo`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct StartupInfo {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub hwnd: *mut c_void,
    pub disable_srgb_conversion_for_output: Bool,
    pub force_no_vk_swapchain: Bool,
    pub editor_mode_enabled: Bool,
}

/// `remixapi_PresentInfo`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct PresentInfo {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub hwnd_override: *mut c_void,
}

/// `remixapi_CameraType`
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CameraType(pub i32);

#[allow(missing_docs)]
impl CameraType {
    pub const WORLD: Self = Self(0);
    pub const SKY: Self = Self(1);
    pub const VIEW_MODEL: Self = Self(2);
}

/// `remixapi_CameraInfo`
///
/// Either carries explicit `view` / `projection` matrices, or chains a
/// [`CameraInfoParameterizedExt`] through `p_next`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CameraInfo {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub camera_type: CameraType,
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

/// `remixapi_CameraInfoParameterizedEXT`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CameraInfoParameterizedExt {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub position: Float3D,
    pub forward: Float3D,
    pub up: Float3D,
    pub right: Float3D,
    pub fov_y_in_degrees: f32,
    pub aspect: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

/// `remixapi_HardcodedVertex`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct HardcodedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
    pub color: u32,
    pub _pad: [u32; 7],
}

impl HardcodedVertex {
    /// Opaque white, the renderer's default vertex color
    pub const WHITE: u32 = 0xFFFF_FFFF;

    /// Build a vertex with zeroed padding
    pub const fn new(position: [f32; 3], normal: [f32; 3], texcoord: [f32; 2], color: u32) -> Self {
        Self {
            position,
            normal,
            texcoord,
            color,
            _pad: [0; 7],
        }
    }
}

/// `remixapi_MeshInfoSkinning`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MeshInfoSkinning {
    pub bones_per_vertex: u32,
    pub blend_weights_values: *const f32,
    pub blend_weights_count: u32,
    pub blend_indices_values: *const u32,
    pub blend_indices_count: u32,
}

impl MeshInfoSkinning {
    /// The value placed in `skinning_value` when `skinning_hasvalue` is false
    pub const EMPTY: Self = Self {
        bones_per_vertex: 0,
        blend_weights_values: ptr::null(),
        blend_weights_count: 0,
        blend_indices_values: ptr::null(),
        blend_indices_count: 0,
    };
}

/// `remixapi_MeshInfoSurfaceTriangles`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MeshInfoSurfaceTriangles {
    pub vertices_values: *const HardcodedVertex,
    pub vertices_count: u64,
    pub indices_values: *const u32,
    pub indices_count: u64,
    pub skinning_hasvalue: Bool,
    pub skinning_value: MeshInfoSkinning,
    pub material: RawMaterialHandle,
}

/// `remixapi_MeshInfo`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MeshInfo {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub hash: u64,
    pub surfaces_values: *const MeshInfoSurfaceTriangles,
    pub surfaces_count: u32,
}

/// `remixapi_InstanceInfo`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct InstanceInfo {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub category_flags: u32,
    pub mesh: RawMeshHandle,
    pub transform: Transform,
    pub double_sided: Bool,
}

/// `remixapi_InstanceInfoBoneTransformsEXT`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct InstanceInfoBoneTransformsExt {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub bone_transforms_values: *const Transform,
    pub bone_transforms_count: u32,
}

/// `remixapi_LightInfo`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LightInfo {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub hash: u64,
    pub radiance: Float3D,
}

/// `remixapi_LightInfoLightShaping`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct LightInfoLightShaping {
    pub direction: Float3D,
    pub cone_angle_degrees: f32,
    pub cone_softness: f32,
    pub focus_exponent: f32,
}

/// `remixapi_LightInfoSphereEXT`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LightInfoSphereExt {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub position: Float3D,
    pub radius: f32,
    pub shaping_hasvalue: Bool,
    pub shaping_value: LightInfoLightShaping,
}

/// `remixapi_LightInfoRectEXT`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LightInfoRectExt {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub position: Float3D,
    pub x_axis: Float3D,
    pub x_size: f32,
    pub y_axis: Float3D,
    pub y_size: f32,
    pub direction: Float3D,
    pub shaping_hasvalue: Bool,
    pub shaping_value: LightInfoLightShaping,
}

/// `remixapi_LightInfoDiskEXT`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LightInfoDiskExt {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub position: Float3D,
    pub x_axis: Float3D,
    pub x_radius: f32,
    pub y_axis: Float3D,
    pub y_radius: f32,
    pub direction: Float3D,
    pub shaping_hasvalue: Bool,
    pub shaping_value: LightInfoLightShaping,
}

/// `remixapi_LightInfoCylinderEXT`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LightInfoCylinderExt {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub position: Float3D,
    pub radius: f32,
    pub axis: Float3D,
    pub axis_length: f32,
}

/// `remixapi_LightInfoDistantEXT`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LightInfoDistantExt {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub direction: Float3D,
    pub angular_diameter_degrees: f32,
}

/// `remixapi_LightInfoDomeEXT`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LightInfoDomeExt {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub transform: Transform,
    pub color_texture: *const WChar,
}

/// `remixapi_MaterialInfo`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MaterialInfo {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub hash: u64,
    pub albedo_texture: *const WChar,
    pub normal_texture: *const WChar,
    pub tangent_texture: *const WChar,
    pub emissive_texture: *const WChar,
    pub emissive_intensity: f32,
    pub emissive_color_constant: Float3D,
    pub sprite_sheet_row: u8,
    pub sprite_sheet_col: u8,
    pub sprite_sheet_fps: u8,
    pub filter_mode: u8,
    pub wrap_mode_u: u8,
    pub wrap_mode_v: u8,
}

/// `remixapi_MaterialInfoOpaqueEXT`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MaterialInfoOpaqueExt {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub roughness_texture: *const WChar,
    pub metallic_texture: *const WChar,
    pub anisotropy: f32,
    pub albedo_constant: Float3D,
    pub opacity_constant: f32,
    pub roughness_constant: f32,
    pub metallic_constant: f32,
    pub thin_film_thickness_hasvalue: Bool,
    pub thin_film_thickness_value: f32,
    pub alpha_is_thin_film_thickness: Bool,
    pub height_texture: *const WChar,
    pub displace_in: f32,
    pub use_draw_call_alpha_state: Bool,
    pub blend_type_hasvalue: Bool,
    pub blend_type_value: i32,
    pub inverted_blend: Bool,
    pub alpha_test_type: i32,
    pub alpha_reference_value: u8,
    pub displace_out: f32,
}

/// `remixapi_MaterialInfoOpaqueSubsurfaceEXT`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MaterialInfoOpaqueSubsurfaceExt {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub subsurface_transmittance_texture: *const WChar,
    pub subsurface_thickness_texture: *const WChar,
    pub subsurface_single_scattering_albedo_texture: *const WChar,
    pub subsurface_transmittance_color: Float3D,
    pub subsurface_measurement_distance: f32,
    pub subsurface_single_scattering_albedo: Float3D,
    pub subsurface_volumetric_anisotropy: f32,
}

/// `remixapi_MaterialInfoTranslucentEXT`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MaterialInfoTranslucentExt {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub transmittance_texture: *const WChar,
    pub refractive_index: f32,
    pub transmittance_color: Float3D,
    pub transmittance_measurement_distance: f32,
    pub thin_wall_thickness_hasvalue: Bool,
    pub thin_wall_thickness_value: f32,
    pub use_diffuse_layer: Bool,
}

/// `remixapi_MaterialInfoPortalEXT`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MaterialInfoPortalExt {
    pub s_type: StructType,
    pub p_next: *mut c_void,
    pub ray_portal_index: u8,
    pub rotation_speed: f32,
}

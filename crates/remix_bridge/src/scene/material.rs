//! Material descriptors

use std::marker::PhantomData;
use std::path::PathBuf;
use std::ptr;

use nalgebra::Vector3;

use super::{float3, LoweringStorage};
use crate::ffi::{
    to_bool, MaterialInfo, MaterialInfoOpaqueExt, MaterialInfoOpaqueSubsurfaceExt,
    MaterialInfoPortalExt, MaterialInfoTranslucentExt, StructType,
};

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum FilterMode {
    Nearest = 0,
    #[default]
    Linear = 1,
}

/// Texture addressing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum WrapMode {
    Clamp = 0,
    #[default]
    Repeat = 1,
    MirroredRepeat = 2,
    Clip = 3,
}

/// Blend equation for opaque surfaces with alpha blending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
#[allow(missing_docs)]
pub enum BlendType {
    Alpha = 0,
    AlphaEmissive = 1,
    ReverseAlphaEmissive = 2,
    Color = 3,
    ColorEmissive = 4,
    ReverseColorEmissive = 5,
    Emissive = 6,
    Multiplicative = 7,
    DoubleMultiplicative = 8,
    ReverseAlpha = 9,
    ReverseColor = 10,
}

/// Alpha test comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
#[allow(missing_docs)]
pub enum AlphaTestType {
    #[default]
    Never = 0,
    Less = 1,
    Equal = 2,
    LessOrEqual = 3,
    Greater = 4,
    NotEqual = 5,
    GreaterOrEqual = 6,
    Always = 7,
}

/// Animated sprite sheet layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpriteSheet {
    /// Frames per column
    pub rows: u8,
    /// Frames per row
    pub cols: u8,
    /// Playback rate; 0 disables animation
    pub fps: u8,
}

/// Subsurface scattering parameters for opaque materials
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct SubsurfaceParams {
    pub transmittance_texture: Option<PathBuf>,
    pub thickness_texture: Option<PathBuf>,
    pub single_scattering_albedo_texture: Option<PathBuf>,
    pub transmittance_color: Vector3<f32>,
    pub measurement_distance: f32,
    pub single_scattering_albedo: Vector3<f32>,
    pub volumetric_anisotropy: f32,
}

impl Default for SubsurfaceParams {
    fn default() -> Self {
        Self {
            transmittance_texture: None,
            thickness_texture: None,
            single_scattering_albedo_texture: None,
            transmittance_color: Vector3::new(0.5, 0.5, 0.5),
            measurement_distance: 0.0,
            single_scattering_albedo: Vector3::new(0.5, 0.5, 0.5),
            volumetric_anisotropy: 0.0,
        }
    }
}

/// Opaque PBR surface
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct OpaqueParams {
    pub roughness_texture: Option<PathBuf>,
    pub metallic_texture: Option<PathBuf>,
    pub height_texture: Option<PathBuf>,
    pub anisotropy: f32,
    pub albedo_constant: Vector3<f32>,
    pub opacity_constant: f32,
    pub roughness_constant: f32,
    pub metallic_constant: f32,
    pub thin_film_thickness: Option<f32>,
    pub alpha_is_thin_film_thickness: bool,
    pub displace_in: f32,
    pub displace_out: f32,
    pub use_draw_call_alpha_state: bool,
    /// Alpha blending; `None` leaves blending off
    pub blend_type: Option<BlendType>,
    pub inverted_blend: bool,
    pub alpha_test_type: AlphaTestType,
    pub alpha_reference_value: u8,
    pub subsurface: Option<SubsurfaceParams>,
}

impl Default for OpaqueParams {
    fn default() -> Self {
        Self {
            roughness_texture: None,
            metallic_texture: None,
            height_texture: None,
            anisotropy: 0.0,
            albedo_constant: Vector3::new(1.0, 1.0, 1.0),
            opacity_constant: 1.0,
            roughness_constant: 1.0,
            metallic_constant: 0.0,
            thin_film_thickness: None,
            alpha_is_thin_film_thickness: false,
            displace_in: 1.0,
            displace_out: 0.0,
            use_draw_call_alpha_state: true,
            blend_type: None,
            inverted_blend: false,
            alpha_test_type: AlphaTestType::Never,
            alpha_reference_value: 0,
            subsurface: None,
        }
    }
}

/// Translucent (glass-like) surface
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct TranslucentParams {
    pub transmittance_texture: Option<PathBuf>,
    pub refractive_index: f32,
    pub transmittance_color: Vector3<f32>,
    pub transmittance_measurement_distance: f32,
    pub thin_wall_thickness: Option<f32>,
    pub use_diffuse_layer: bool,
}

impl Default for TranslucentParams {
    fn default() -> Self {
        Self {
            transmittance_texture: None,
            refractive_index: 1.3,
            transmittance_color: Vector3::new(0.97, 0.97, 0.97),
            transmittance_measurement_distance: 0.1,
            thin_wall_thickness: None,
            use_diffuse_layer: false,
        }
    }
}

/// Ray portal surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PortalParams {
    /// Which of the portal pair this surface is
    pub ray_portal_index: u8,
    /// Texture rotation in radians per second
    pub rotation_speed: f32,
}

/// Surface model; selects the extension chained onto the material
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialSurface {
    /// PBR surface, optionally with subsurface scattering
    Opaque(OpaqueParams),
    /// Glass-like surface
    Translucent(TranslucentParams),
    /// Ray portal
    Portal(PortalParams),
}

/// Material asset
///
/// Texture paths are forwarded as-is; the renderer resolves them.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDesc {
    /// Caller-managed identifier
    pub hash: u64,
    /// Base color texture
    pub albedo_texture: Option<PathBuf>,
    /// Normal map
    pub normal_texture: Option<PathBuf>,
    /// Tangent map
    pub tangent_texture: Option<PathBuf>,
    /// Emission mask
    pub emissive_texture: Option<PathBuf>,
    /// Emission strength
    pub emissive_intensity: f32,
    /// Emission color when no texture is set
    pub emissive_color: Vector3<f32>,
    /// Sprite animation
    pub sprite_sheet: SpriteSheet,
    /// Sampling filter
    pub filter_mode: FilterMode,
    /// Horizontal addressing
    pub wrap_u: WrapMode,
    /// Vertical addressing
    pub wrap_v: WrapMode,
    /// Surface model
    pub surface: MaterialSurface,
}

impl MaterialDesc {
    fn with_surface_model(hash: u64, surface: MaterialSurface) -> Self {
        Self {
            hash,
            albedo_texture: None,
            normal_texture: None,
            tangent_texture: None,
            emissive_texture: None,
            emissive_intensity: 40.0,
            emissive_color: Vector3::zeros(),
            sprite_sheet: SpriteSheet::default(),
            filter_mode: FilterMode::default(),
            wrap_u: WrapMode::default(),
            wrap_v: WrapMode::default(),
            surface,
        }
    }

    /// Opaque material
    pub fn opaque(hash: u64, params: OpaqueParams) -> Self {
        Self::with_surface_model(hash, MaterialSurface::Opaque(params))
    }

    /// Translucent material
    pub fn translucent(hash: u64, params: TranslucentParams) -> Self {
        Self::with_surface_model(hash, MaterialSurface::Translucent(params))
    }

    /// Portal material
    pub fn portal(hash: u64, params: PortalParams) -> Self {
        Self::with_surface_model(hash, MaterialSurface::Portal(params))
    }

    /// Set the albedo texture
    pub fn with_albedo_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.albedo_texture = Some(path.into());
        self
    }

    /// Set the normal map
    pub fn with_normal_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.normal_texture = Some(path.into());
        self
    }

    /// Set the emissive texture, color and intensity
    pub fn with_emission(
        mut self,
        texture: Option<PathBuf>,
        color: Vector3<f32>,
        intensity: f32,
    ) -> Self {
        self.emissive_texture = texture;
        self.emissive_color = color;
        self.emissive_intensity = intensity;
        self
    }

    /// Set sampling filter and wrap modes
    pub fn with_sampler(mut self, filter: FilterMode, wrap_u: WrapMode, wrap_v: WrapMode) -> Self {
        self.filter_mode = filter;
        self.wrap_u = wrap_u;
        self.wrap_v = wrap_v;
        self
    }

    /// Animate the albedo texture as a sprite sheet
    pub fn with_sprite_sheet(mut self, sprite_sheet: SpriteSheet) -> Self {
        self.sprite_sheet = sprite_sheet;
        self
    }

    pub(crate) fn lower(&self) -> LoweredMaterial<'_> {
        let mut storage = LoweringStorage::default();

        let p_next = match &self.surface {
            MaterialSurface::Opaque(opaque) => {
                let subsurface = match &opaque.subsurface {
                    Some(sss) => {
                        let ext = MaterialInfoOpaqueSubsurfaceExt {
                            s_type: StructType::MATERIAL_INFO_OPAQUE_SUBSURFACE_EXT,
                            p_next: ptr::null_mut(),
                            subsurface_transmittance_texture: storage.path(sss.transmittance_texture.as_deref()),
                            subsurface_thickness_texture: storage.path(sss.thickness_texture.as_deref()),
                            subsurface_single_scattering_albedo_texture: storage
                                .path(sss.single_scattering_albedo_texture.as_deref()),
                            subsurface_transmittance_color: float3(&sss.transmittance_color),
                            subsurface_measurement_distance: sss.measurement_distance,
                            subsurface_single_scattering_albedo: float3(&sss.single_scattering_albedo),
                            subsurface_volumetric_anisotropy: sss.volumetric_anisotropy,
                        };
                        storage.chain(ext)
                    }
                    None => ptr::null_mut(),
                };

                let ext = MaterialInfoOpaqueExt {
                    s_type: StructType::MATERIAL_INFO_OPAQUE_EXT,
                    p_next: subsurface,
                    roughness_texture: storage.path(opaque.roughness_texture.as_deref()),
                    metallic_texture: storage.path(opaque.metallic_texture.as_deref()),
                    anisotropy: opaque.anisotropy,
                    albedo_constant: float3(&opaque.albedo_constant),
                    opacity_constant: opaque.opacity_constant,
                    roughness_constant: opaque.roughness_constant,
                    metallic_constant: opaque.metallic_constant,
                    thin_film_thickness_hasvalue: to_bool(opaque.thin_film_thickness.is_some()),
                    thin_film_thickness_value: opaque.thin_film_thickness.unwrap_or(0.0),
                    alpha_is_thin_film_thickness: to_bool(opaque.alpha_is_thin_film_thickness),
                    height_texture: storage.path(opaque.height_texture.as_deref()),
                    displace_in: opaque.displace_in,
                    use_draw_call_alpha_state: to_bool(opaque.use_draw_call_alpha_state),
                    blend_type_hasvalue: to_bool(opaque.blend_type.is_some()),
                    blend_type_value: opaque.blend_type.map_or(0, |blend| blend as i32),
                    inverted_blend: to_bool(opaque.inverted_blend),
                    alpha_test_type: opaque.alpha_test_type as i32,
                    alpha_reference_value: opaque.alpha_reference_value,
                    displace_out: opaque.displace_out,
                };
                storage.chain(ext)
            }
            MaterialSurface::Translucent(translucent) => {
                let ext = MaterialInfoTranslucentExt {
                    s_type: StructType::MATERIAL_INFO_TRANSLUCENT_EXT,
                    p_next: ptr::null_mut(),
                    transmittance_texture: storage.path(translucent.transmittance_texture.as_deref()),
                    refractive_index: translucent.refractive_index,
                    transmittance_color: float3(&translucent.transmittance_color),
                    transmittance_measurement_distance: translucent.transmittance_measurement_distance,
                    thin_wall_thickness_hasvalue: to_bool(translucent.thin_wall_thickness.is_some()),
                    thin_wall_thickness_value: translucent.thin_wall_thickness.unwrap_or(0.0),
                    use_diffuse_layer: to_bool(translucent.use_diffuse_layer),
                };
                storage.chain(ext)
            }
            MaterialSurface::Portal(portal) => storage.chain(MaterialInfoPortalExt {
                s_type: StructType::MATERIAL_INFO_PORTAL_EXT,
                p_next: ptr::null_mut(),
                ray_portal_index: portal.ray_portal_index,
                rotation_speed: portal.rotation_speed,
            }),
        };

        let info = MaterialInfo {
            s_type: StructType::MATERIAL_INFO,
            p_next,
            hash: self.hash,
            albedo_texture: storage.path(self.albedo_texture.as_deref()),
            normal_texture: storage.path(self.normal_texture.as_deref()),
            tangent_texture: storage.path(self.tangent_texture.as_deref()),
            emissive_texture: storage.path(self.emissive_texture.as_deref()),
            emissive_intensity: self.emissive_intensity,
            emissive_color_constant: float3(&self.emissive_color),
            sprite_sheet_row: self.sprite_sheet.rows,
            sprite_sheet_col: self.sprite_sheet.cols,
            sprite_sheet_fps: self.sprite_sheet.fps,
            filter_mode: self.filter_mode as u8,
            wrap_mode_u: self.wrap_u as u8,
            wrap_mode_v: self.wrap_v as u8,
        };

        LoweredMaterial {
            info,
            _storage: storage,
            _desc: PhantomData,
        }
    }
}

/// `MaterialInfo` with its extension chain and encoded texture paths
pub(crate) struct LoweredMaterial<'a> {
    info: MaterialInfo,
    _storage: LoweringStorage,
    _desc: PhantomData<&'a MaterialDesc>,
}

impl LoweredMaterial<'_> {
    pub(crate) fn info(&self) -> &MaterialInfo {
        &self.info
    }
}

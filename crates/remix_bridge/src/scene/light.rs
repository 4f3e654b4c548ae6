//! Light descriptors

use std::marker::PhantomData;
use std::path::PathBuf;
use std::ptr;

use nalgebra::Vector3;

use super::{float3, LoweringStorage, Transform};
use crate::error::{BridgeError, BridgeResult};
use crate::ffi::{
    to_bool, LightInfo, LightInfoCylinderExt, LightInfoDiskExt, LightInfoDistantExt,
    LightInfoDomeExt, LightInfoLightShaping, LightInfoRectExt, LightInfoSphereExt, StructType,
};

/// Spotlight-style cone applied to an area light
#[derive(Debug, Clone, PartialEq)]
pub struct LightShaping {
    /// Cone axis
    pub direction: Vector3<f32>,
    /// Half angle of the cone
    pub cone_angle_degrees: f32,
    /// Falloff at the cone edge
    pub cone_softness: f32,
    /// Concentration towards the axis
    pub focus_exponent: f32,
}

impl Default for LightShaping {
    fn default() -> Self {
        Self {
            direction: Vector3::new(0.0, -1.0, 0.0),
            cone_angle_degrees: 180.0,
            cone_softness: 0.0,
            focus_exponent: 0.0,
        }
    }
}

impl LightShaping {
    fn raw(&self) -> LightInfoLightShaping {
        LightInfoLightShaping {
            direction: float3(&self.direction),
            cone_angle_degrees: self.cone_angle_degrees,
            cone_softness: self.cone_softness,
            focus_exponent: self.focus_exponent,
        }
    }
}

fn shaping_fields(shaping: Option<&LightShaping>) -> (u32, LightInfoLightShaping) {
    (
        to_bool(shaping.is_some()),
        shaping.map(LightShaping::raw).unwrap_or_default(),
    )
}

/// Light geometry; selects the extension chained onto the light
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum LightShape {
    Sphere {
        position: Vector3<f32>,
        radius: f32,
        shaping: Option<LightShaping>,
    },
    Rect {
        position: Vector3<f32>,
        x_axis: Vector3<f32>,
        x_size: f32,
        y_axis: Vector3<f32>,
        y_size: f32,
        direction: Vector3<f32>,
        shaping: Option<LightShaping>,
    },
    Disk {
        position: Vector3<f32>,
        x_axis: Vector3<f32>,
        x_radius: f32,
        y_axis: Vector3<f32>,
        y_radius: f32,
        direction: Vector3<f32>,
        shaping: Option<LightShaping>,
    },
    Cylinder {
        position: Vector3<f32>,
        radius: f32,
        axis: Vector3<f32>,
        axis_length: f32,
    },
    Distant {
        direction: Vector3<f32>,
        angular_diameter_degrees: f32,
    },
    Dome {
        transform: Transform,
        color_texture: Option<PathBuf>,
    },
}

/// Light asset
#[derive(Debug, Clone, PartialEq)]
pub struct LightDesc {
    /// Caller-managed identifier; must be non-zero
    pub hash: u64,
    /// Emitted radiance per channel
    pub radiance: Vector3<f32>,
    /// Geometry
    pub shape: LightShape,
}

impl LightDesc {
    /// Light with an explicit shape
    pub fn new(hash: u64, radiance: Vector3<f32>, shape: LightShape) -> Self {
        Self {
            hash,
            radiance,
            shape,
        }
    }

    /// Unshaped sphere light with a 0.1 radius
    pub fn sphere(hash: u64, radiance: Vector3<f32>, position: Vector3<f32>) -> Self {
        Self::new(
            hash,
            radiance,
            LightShape::Sphere {
                position,
                radius: 0.1,
                shaping: None,
            },
        )
    }

    /// Sun-style light shining along `direction`
    pub fn distant(hash: u64, radiance: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self::new(
            hash,
            radiance,
            LightShape::Distant {
                direction,
                angular_diameter_degrees: 0.5,
            },
        )
    }

    /// Lower into `remixapi_LightInfo`; the renderer rejects a zero hash so it
    /// is refused here before any call
    pub(crate) fn lower(&self) -> BridgeResult<LoweredLight<'_>> {
        if self.hash == 0 {
            return Err(BridgeError::InvalidArgument("light hash must be non-zero".into()));
        }

        let mut storage = LoweringStorage::default();
        let p_next = match &self.shape {
            LightShape::Sphere {
                position,
                radius,
                shaping,
            } => {
                let (shaping_hasvalue, shaping_value) = shaping_fields(shaping.as_ref());
                storage.chain(LightInfoSphereExt {
                    s_type: StructType::LIGHT_INFO_SPHERE_EXT,
                    p_next: ptr::null_mut(),
                    position: float3(position),
                    radius: *radius,
                    shaping_hasvalue,
                    shaping_value,
                })
            }
            LightShape::Rect {
                position,
                x_axis,
                x_size,
                y_axis,
                y_size,
                direction,
                shaping,
            } => {
                let (shaping_hasvalue, shaping_value) = shaping_fields(shaping.as_ref());
                storage.chain(LightInfoRectExt {
                    s_type: StructType::LIGHT_INFO_RECT_EXT,
                    p_next: ptr::null_mut(),
                    position: float3(position),
                    x_axis: float3(x_axis),
                    x_size: *x_size,
                    y_axis: float3(y_axis),
                    y_size: *y_size,
                    direction: float3(direction),
                    shaping_hasvalue,
                    shaping_value,
                })
            }
            LightShape::Disk {
                position,
                x_axis,
                x_radius,
                y_axis,
                y_radius,
                direction,
                shaping,
            } => {
                let (shaping_hasvalue, shaping_value) = shaping_fields(shaping.as_ref());
                storage.chain(LightInfoDiskExt {
                    s_type: StructType::LIGHT_INFO_DISK_EXT,
                    p_next: ptr::null_mut(),
                    position: float3(position),
                    x_axis: float3(x_axis),
                    x_radius: *x_radius,
                    y_axis: float3(y_axis),
                    y_radius: *y_radius,
                    direction: float3(direction),
                    shaping_hasvalue,
                    shaping_value,
                })
            }
            LightShape::Cylinder {
                position,
                radius,
                axis,
                axis_length,
            } => storage.chain(LightInfoCylinderExt {
                s_type: StructType::LIGHT_INFO_CYLINDER_EXT,
                p_next: ptr::null_mut(),
                position: float3(position),
                radius: *radius,
                axis: float3(axis),
                axis_length: *axis_length,
            }),
            LightShape::Distant {
                direction,
                angular_diameter_degrees,
            } => storage.chain(LightInfoDistantExt {
                s_type: StructType::LIGHT_INFO_DISTANT_EXT,
                p_next: ptr::null_mut(),
                direction: float3(direction),
                angular_diameter_degrees: *angular_diameter_degrees,
            }),
            LightShape::Dome {
                transform,
                color_texture,
            } => {
                let color_texture = storage.path(color_texture.as_deref());
                storage.chain(LightInfoDomeExt {
                    s_type: StructType::LIGHT_INFO_DOME_EXT,
                    p_next: ptr::null_mut(),
                    transform: *transform,
                    color_texture,
                })
            }
        };

        Ok(LoweredLight {
            info: LightInfo {
                s_type: StructType::LIGHT_INFO,
                p_next,
                hash: self.hash,
                radiance: float3(&self.radiance),
            },
            _storage: storage,
            _desc: PhantomData,
        })
    }
}

/// `LightInfo` plus its shape extension
pub(crate) struct LoweredLight<'a> {
    info: LightInfo,
    _storage: LoweringStorage,
    _desc: PhantomData<&'a LightDesc>,
}

impl LoweredLight<'_> {
    pub(crate) fn info(&self) -> &LightInfo {
        &self.info
    }
}

//! Camera descriptors

use std::marker::PhantomData;
use std::ptr;

use nalgebra::{Matrix4, Vector3};

use super::{float3, LoweringStorage};
use crate::ffi::{CameraInfo, CameraInfoParameterizedExt, CameraType, StructType};

/// What the camera renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraKind {
    /// Main scene camera
    #[default]
    World,
    /// Skybox camera
    Sky,
    /// First-person view model camera
    ViewModel,
}

impl CameraKind {
    fn raw(self) -> CameraType {
        match self {
            Self::World => CameraType::WORLD,
            Self::Sky => CameraType::SKY,
            Self::ViewModel => CameraType::VIEW_MODEL,
        }
    }
}

/// Camera described by a basis, field of view and clip planes
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizedCamera {
    /// Eye position
    pub position: Vector3<f32>,
    /// View direction
    pub forward: Vector3<f32>,
    /// Up vector
    pub up: Vector3<f32>,
    /// Right vector
    pub right: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Width over height
    pub aspect: f32,
    /// Near clip plane distance
    pub near_plane: f32,
    /// Far clip plane distance
    pub far_plane: f32,
}

impl ParameterizedCamera {
    /// Camera at `position` looking along `forward`; `right` is derived from
    /// `up x forward` (the renderer's left-handed convention)
    pub fn looking_along(
        position: Vector3<f32>,
        forward: Vector3<f32>,
        up: Vector3<f32>,
        fov_y_degrees: f32,
        aspect: f32,
    ) -> Self {
        Self {
            position,
            forward,
            up,
            right: up.cross(&forward),
            fov_y_degrees,
            aspect,
            ..Self::default()
        }
    }

    /// Set clip plane distances
    pub fn with_clip_planes(mut self, near_plane: f32, far_plane: f32) -> Self {
        self.near_plane = near_plane;
        self.far_plane = far_plane;
        self
    }
}

impl Default for ParameterizedCamera {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            forward: Vector3::z(),
            up: Vector3::y(),
            right: Vector3::x(),
            fov_y_degrees: 70.0,
            aspect: 16.0 / 9.0,
            near_plane: 0.1,
            far_plane: 1000.0,
        }
    }
}

/// How the camera's projection is supplied
#[derive(Debug, Clone, PartialEq)]
pub enum CameraProjection {
    /// Let the renderer build matrices from parameters
    Parameterized(ParameterizedCamera),
    /// Caller-computed matrices, forwarded row by row
    Matrices {
        /// World to view
        view: Matrix4<f32>,
        /// View to clip
        projection: Matrix4<f32>,
    },
}

/// Per-frame camera setup
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera purpose
    pub kind: CameraKind,
    /// Projection source
    pub projection: CameraProjection,
}

impl Camera {
    /// World camera from parameters
    pub fn parameterized(params: ParameterizedCamera) -> Self {
        Self {
            kind: CameraKind::World,
            projection: CameraProjection::Parameterized(params),
        }
    }

    /// World camera from explicit matrices
    pub fn from_matrices(view: Matrix4<f32>, projection: Matrix4<f32>) -> Self {
        Self {
            kind: CameraKind::World,
            projection: CameraProjection::Matrices { view, projection },
        }
    }

    /// Change the camera purpose
    pub fn with_kind(mut self, kind: CameraKind) -> Self {
        self.kind = kind;
        self
    }

    pub(crate) fn lower(&self) -> LoweredCamera<'_> {
        let mut storage = LoweringStorage::default();
        let mut info = CameraInfo {
            s_type: StructType::CAMERA_INFO,
            p_next: ptr::null_mut(),
            camera_type: self.kind.raw(),
            view: [[0.0; 4]; 4],
            projection: [[0.0; 4]; 4],
        };

        match &self.projection {
            CameraProjection::Parameterized(params) => {
                info.p_next = storage.chain(CameraInfoParameterizedExt {
                    s_type: StructType::CAMERA_INFO_PARAMETERIZED_EXT,
                    p_next: ptr::null_mut(),
                    position: float3(&params.position),
                    forward: float3(&params.forward),
                    up: float3(&params.up),
                    right: float3(&params.right),
                    fov_y_in_degrees: params.fov_y_degrees,
                    aspect: params.aspect,
                    near_plane: params.near_plane,
                    far_plane: params.far_plane,
                });
            }
            CameraProjection::Matrices { view, projection } => {
                info.view = rows(view);
                info.projection = rows(projection);
            }
        }

        LoweredCamera {
            info,
            _storage: storage,
            _camera: PhantomData,
        }
    }
}

fn rows(matrix: &Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut out = [[0.0; 4]; 4];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, value) in row.iter_mut().enumerate() {
            *value = matrix[(r, c)];
        }
    }
    out
}

/// `CameraInfo` plus whatever its `pNext` chain points at
pub(crate) struct LoweredCamera<'a> {
    info: CameraInfo,
    _storage: LoweringStorage,
    _camera: PhantomData<&'a Camera>,
}

impl LoweredCamera<'_> {
    pub(crate) fn info(&self) -> &CameraInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_looking_along_derives_right_vector() {
        let params = ParameterizedCamera::looking_along(
            Vector3::zeros(),
            Vector3::z(),
            Vector3::y(),
            70.0,
            1.5,
        );
        assert_relative_eq!(params.right, Vector3::x());
    }

    #[test]
    fn test_parameterized_camera_chains_extension() {
        let camera = Camera::parameterized(ParameterizedCamera::default().with_clip_planes(0.5, 50.0))
            .with_kind(CameraKind::Sky);
        let lowered = camera.lower();
        let info = lowered.info();

        assert_eq!(info.s_type, StructType::CAMERA_INFO);
        assert_eq!(info.camera_type, CameraType::SKY);
        assert!(!info.p_next.is_null());

        let ext = unsafe { &*info.p_next.cast::<CameraInfoParameterizedExt>() };
        assert_eq!(ext.s_type, StructType::CAMERA_INFO_PARAMETERIZED_EXT);
        assert_relative_eq!(ext.near_plane, 0.5);
        assert_relative_eq!(ext.far_plane, 50.0);
        assert_relative_eq!(ext.fov_y_in_degrees, 70.0);
    }

    #[test]
    fn test_matrix_camera_copies_rows() {
        let view = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 5.0));
        let camera = Camera::from_matrices(view, Matrix4::identity());
        let lowered = camera.lower();
        let info = lowered.info();

        assert!(info.p_next.is_null());
        assert_relative_eq!(info.view[2][3], 5.0);
        assert_relative_eq!(info.projection[3][3], 1.0);
    }
}

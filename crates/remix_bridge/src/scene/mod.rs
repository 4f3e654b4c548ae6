//! Scene descriptors
//!
//! Plain Rust descriptions of the values the renderer consumes. The bridge
//! lowers each one into the matching `remix_c.h` struct right before the call;
//! nothing is validated beyond what is needed to build the struct.

mod camera;
mod instance;
mod light;
mod material;
mod mesh;
mod transform;

pub use camera::{Camera, CameraKind, CameraProjection, ParameterizedCamera};
pub use instance::{CategoryFlags, InstanceSubmission};
pub use light::{LightDesc, LightShape, LightShaping};
pub use material::{
    AlphaTestType, BlendType, FilterMode, MaterialDesc, MaterialSurface, OpaqueParams,
    PortalParams, SpriteSheet, SubsurfaceParams, TranslucentParams, WrapMode,
};
pub use mesh::{MeshDesc, Skinning, Surface};
pub use transform::Transform;

/// Vertex layout accepted by the renderer
pub use crate::ffi::HardcodedVertex as Vertex;

pub(crate) use camera::LoweredCamera;
pub(crate) use instance::LoweredInstance;
pub(crate) use light::LoweredLight;
pub(crate) use material::LoweredMaterial;
pub(crate) use mesh::LoweredMesh;

use std::any::Any;
use std::ffi::c_void;
use std::path::Path;

use nalgebra::Vector3;

use crate::error::{BridgeError, BridgeResult};
use crate::ffi::{Float3D, WChar, WideString};

pub(crate) fn float3(v: &Vector3<f32>) -> Float3D {
    Float3D::new(v.x, v.y, v.z)
}

/// Narrow a collection length to a `uint32_t` count field
pub(crate) fn count_u32(len: usize, what: &str) -> BridgeResult<u32> {
    u32::try_from(len).map_err(|_| BridgeError::InvalidArgument(format!("too many {what}: {len}")))
}

/// Heap storage that keeps `pNext` chains and path strings alive while a
/// lowered struct is in use
///
/// Boxed and `Vec`-backed values never move when the storage itself moves,
/// so the raw pointers handed out stay valid for the storage's lifetime.
#[derive(Default)]
pub(crate) struct LoweringStorage {
    chain: Vec<Box<dyn Any>>,
    paths: Vec<WideString>,
}

impl LoweringStorage {
    /// Box `value` and return it as a `pNext` pointer
    pub(crate) fn chain<T: 'static>(&mut self, value: T) -> *mut c_void {
        let boxed = Box::new(value);
        let ptr = std::ptr::addr_of!(*boxed).cast_mut().cast::<c_void>();
        self.chain.push(boxed);
        ptr
    }

    /// Encode an optional path; an absent path becomes an empty string
    pub(crate) fn path(&mut self, path: Option<&Path>) -> *const WChar {
        let wide = path.map_or_else(|| WideString::from_str_lossy(""), WideString::from_path);
        let ptr = wide.as_ptr();
        self.paths.push(wide);
        ptr
    }
}

//! # Remix Bridge
//!
//! Runtime binding to the RTX Remix renderer's C API.
//!
//! ## Features
//!
//! - **Runtime Discovery**: Probes `./d3d9.dll`, then `./bin/d3d9.dll`
//! - **Dynamic Binding**: Loads the runtime and binds `remixapi_Interface`
//! - **Lifecycle Ownership**: Startup and shutdown tied to an owned value
//! - **Checked Handles**: Generational handles turn use-after-destroy into an error
//! - **Typed Descriptors**: Meshes, materials, lights and cameras as plain Rust data
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use remix_bridge::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     remix_bridge::logging::init();
//!
//!     let mut bridge = RemixBridge::new(BridgeConfig::default());
//!     bridge.init(&StartupParams::new(NativeWindow::null()))?;
//!
//!     let light = bridge.create_light(&LightDesc::sphere(
//!         0x3,
//!         Vec3::new(100.0, 200.0, 100.0),
//!         Vec3::new(0.0, -1.0, 0.0),
//!     ))?;
//!
//!     bridge.setup_camera(&Camera::parameterized(ParameterizedCamera::default()))?;
//!     bridge.draw_light_instance(light)?;
//!     bridge.present(None)?;
//!
//!     bridge.destroy()?;
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod ffi;
pub mod loader;
pub mod logging;
pub mod scene;

pub use bridge::{
    LifecycleState, LightHandle, MaterialHandle, MeshHandle, NativeWindow, PresentParams,
    RemixBridge, SharedBridge, StartupParams,
};
pub use config::{BridgeConfig, Config, ConfigError, StartupConfig};
pub use error::{BridgeError, BridgeResult, ResourceKind};

/// Common imports for bridge users
pub mod prelude {
    pub use crate::{
        bridge::{
            LifecycleState, LightHandle, MaterialHandle, MeshHandle, NativeWindow, PresentParams,
            RemixBridge, SharedBridge, StartupParams,
        },
        config::{BridgeConfig, Config, StartupConfig},
        error::{BridgeError, BridgeResult, ResourceKind},
        scene::{
            Camera, CameraKind, CategoryFlags, InstanceSubmission, LightDesc, LightShape,
            MaterialDesc, MeshDesc, OpaqueParams, ParameterizedCamera, Surface, Transform, Vertex,
        },
    };
    pub use nalgebra::{Matrix4 as Mat4, Vector3 as Vec3};
}

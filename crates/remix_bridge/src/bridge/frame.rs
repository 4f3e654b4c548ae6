//! Per-frame submission

use std::ffi::CString;
use std::ptr;

use super::{LightHandle, PresentParams, RemixBridge};
use crate::error::{BridgeError, BridgeResult};
use crate::ffi::{ErrorCode, PresentInfo};
use crate::scene::{Camera, InstanceSubmission};

fn forwarded(op: &'static str, code: ErrorCode) -> BridgeResult<()> {
    if code.is_success() {
        Ok(())
    } else {
        Err(BridgeError::RendererNative { op, code })
    }
}

impl RemixBridge {
    /// Set the camera for the current frame
    pub fn setup_camera(&mut self, camera: &Camera) -> BridgeResult<()> {
        let setup = self.entry(|t| t.setup_camera, "SetupCamera")?;
        let lowered = camera.lower();
        // SAFETY: `lowered` keeps its parameter extension alive for the call.
        forwarded("SetupCamera", unsafe { setup(lowered.info()) })
    }

    /// Draw a mesh instance in the current frame
    pub fn draw_instance(&mut self, submission: &InstanceSubmission) -> BridgeResult<()> {
        let draw = self.entry(|t| t.draw_instance, "DrawInstance")?;
        let mesh = self.resources.mesh(submission.mesh)?;
        let lowered = submission.lower(mesh)?;
        // SAFETY: bone transforms are borrowed from `submission` for the call.
        forwarded("DrawInstance", unsafe { draw(lowered.info()) })
    }

    /// Draw a light in the current frame
    pub fn draw_light_instance(&mut self, light: LightHandle) -> BridgeResult<()> {
        let draw = self.entry(|t| t.draw_light_instance, "DrawLightInstance")?;
        let raw = self.resources.light(light)?;
        // SAFETY: `raw` is live in this cycle.
        forwarded("DrawLightInstance", unsafe { draw(raw) })
    }

    /// Finish the frame
    ///
    /// With `None` the renderer presents into the startup window.
    pub fn present(&mut self, params: Option<&PresentParams>) -> BridgeResult<()> {
        let present = self.entry(|t| t.present, "Present")?;
        let info = params.map(PresentParams::lower);
        let info_ptr = info.as_ref().map_or(ptr::null(), |info| info as *const PresentInfo);
        // SAFETY: `info` lives until the end of this function.
        forwarded("Present", unsafe { present(info_ptr) })
    }

    /// Set a renderer option, e.g. `rtx.fallbackLightMode`
    pub fn set_config_variable(&mut self, key: &str, value: &str) -> BridgeResult<()> {
        let set = self.entry(|t| t.set_config_variable, "SetConfigVariable")?;
        let key_c = CString::new(key)
            .map_err(|_| BridgeError::InvalidArgument(format!("config key {key:?} contains NUL")))?;
        let value_c = CString::new(value)
            .map_err(|_| BridgeError::InvalidArgument(format!("config value {value:?} contains NUL")))?;

        log::debug!("Setting renderer option {key}={value}");
        // SAFETY: both strings are NUL-terminated and outlive the call.
        forwarded("SetConfigVariable", unsafe { set(key_c.as_ptr(), value_c.as_ptr()) })
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::{self, MockBinder};
    use super::super::{LifecycleState, NativeWindow, StartupParams};
    use super::*;
    use crate::config::BridgeConfig;
    use crate::scene::{CameraKind, LightDesc, MeshDesc, ParameterizedCamera, Surface, Transform, Vertex};
    use nalgebra::Vector3;

    fn started(name: &str) -> RemixBridge {
        let config = BridgeConfig::new(name).with_search_dirs(["."]);
        let mut bridge = RemixBridge::with_binder(config, Box::new(MockBinder::new()));
        bridge.init(&StartupParams::new(NativeWindow::null())).unwrap();
        bridge
    }

    fn quad(hash: u64) -> MeshDesc {
        let v = |x: f32, y: f32| Vertex::new([x, y, 0.0], [0.0, 0.0, -1.0], [0.0, 0.0], Vertex::WHITE);
        MeshDesc::new(hash).with_surface(Surface::new(
            vec![v(-1.0, -1.0), v(-1.0, 1.0), v(1.0, 1.0), v(1.0, -1.0)],
            vec![0, 1, 2, 0, 2, 3],
        ))
    }

    #[test]
    fn test_frame_calls_are_forwarded_in_order() {
        let mut bridge = started("frame_order.dll");
        let mesh = bridge.create_mesh(&quad(0x1)).unwrap();
        let light = bridge
            .create_light(&LightDesc::sphere(0x2, Vector3::new(100.0, 100.0, 100.0), Vector3::zeros()))
            .unwrap();

        bridge
            .setup_camera(&Camera::parameterized(ParameterizedCamera::default()).with_kind(CameraKind::World))
            .unwrap();
        bridge
            .draw_instance(
                &InstanceSubmission::new(mesh).with_transform(Transform::from_translation(Vector3::new(0.0, 0.0, 5.0))),
            )
            .unwrap();
        bridge.draw_light_instance(light).unwrap();
        bridge.present(None).unwrap();

        let calls = mock::calls();
        assert_eq!(
            &calls[calls.len() - 4..],
            ["SetupCamera", "DrawInstance", "DrawLightInstance", "Present"]
        );
    }

    #[test]
    fn test_present_forwards_null_or_override() {
        let mut bridge = started("frame_present.dll");

        bridge.present(None).unwrap();
        assert_eq!(mock::last_present(), Some(None));

        let params = PresentParams::new(NativeWindow::from_raw(0x77 as *mut _));
        bridge.present(Some(&params)).unwrap();
        assert_eq!(mock::last_present(), Some(Some(0x77)));
    }

    #[test]
    fn test_native_failure_names_operation() {
        let mut bridge = started("frame_native_failure.dll");
        mock::fail_next("Present", ErrorCode::NOT_INITIALIZED);

        let err = bridge.present(None).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::RendererNative {
                op: "Present",
                code: ErrorCode::NOT_INITIALIZED
            }
        ));
    }

    #[test]
    fn test_draw_with_stale_handles() {
        let mut bridge = started("frame_stale.dll");
        let mesh = bridge.create_mesh(&quad(0x3)).unwrap();
        bridge.destroy_mesh(mesh).unwrap();

        assert!(matches!(
            bridge.draw_instance(&InstanceSubmission::new(mesh)),
            Err(BridgeError::StaleHandle { .. })
        ));
        assert_eq!(mock::calls_to("DrawInstance"), 0);
    }

    #[test]
    fn test_frame_calls_rejected_before_start() {
        let config = BridgeConfig::new("frame_not_started.dll").with_search_dirs(["."]);
        let mut bridge = RemixBridge::with_binder(config, Box::new(MockBinder::new()));
        bridge.load().unwrap();

        let err = bridge.present(None).unwrap_err();
        assert!(matches!(err, BridgeError::NotStarted { state: LifecycleState::Loaded }));
        assert!(mock::calls().is_empty());
    }

    #[test]
    fn test_config_variable_with_nul_is_rejected() {
        let mut bridge = started("frame_config_nul.dll");
        let err = bridge.set_config_variable("rtx.bad\0key", "1").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgument(_)));
        assert_eq!(mock::calls_to("SetConfigVariable"), 0);

        bridge.set_config_variable("rtx.enableRaytracing", "True").unwrap();
        assert_eq!(
            mock::config_variables(),
            vec![("rtx.enableRaytracing".to_string(), "True".to_string())]
        );
    }
}

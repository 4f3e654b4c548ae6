//! Mesh, material and light creation
//!
//! Raw renderer handles never leave the bridge. Each create stores the raw
//! handle in a per-kind arena and returns a generational key; destroying a key
//! retires it, so a second destroy is reported as stale instead of reaching
//! the renderer with a dangling handle.

use slotmap::{new_key_type, SlotMap};

use super::RemixBridge;
use crate::error::{BridgeError, BridgeResult, ResourceKind};
use crate::ffi::{ErrorCode, RawLightHandle, RawMaterialHandle, RawMeshHandle};
use crate::scene::{LightDesc, MaterialDesc, MeshDesc};

new_key_type! {
    /// Mesh created through [`RemixBridge::create_mesh`]
    pub struct MeshHandle;
    /// Material created through [`RemixBridge::create_material`]
    pub struct MaterialHandle;
    /// Light created through [`RemixBridge::create_light`]
    pub struct LightHandle;
}

#[derive(Debug, Default)]
pub(crate) struct ResourceArenas {
    pub(crate) meshes: SlotMap<MeshHandle, RawMeshHandle>,
    pub(crate) materials: SlotMap<MaterialHandle, RawMaterialHandle>,
    pub(crate) lights: SlotMap<LightHandle, RawLightHandle>,
}

impl ResourceArenas {
    pub(crate) fn clear(&mut self) {
        self.meshes.clear();
        self.materials.clear();
        self.lights.clear();
    }

    pub(crate) fn len(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Mesh => self.meshes.len(),
            ResourceKind::Material => self.materials.len(),
            ResourceKind::Light => self.lights.len(),
        }
    }

    pub(crate) fn mesh(&self, handle: MeshHandle) -> BridgeResult<RawMeshHandle> {
        stale_unless(self.meshes.get(handle).copied(), ResourceKind::Mesh)
    }

    pub(crate) fn material(&self, handle: MaterialHandle) -> BridgeResult<RawMaterialHandle> {
        stale_unless(self.materials.get(handle).copied(), ResourceKind::Material)
    }

    pub(crate) fn light(&self, handle: LightHandle) -> BridgeResult<RawLightHandle> {
        stale_unless(self.lights.get(handle).copied(), ResourceKind::Light)
    }
}

fn stale_unless<T>(raw: Option<T>, kind: ResourceKind) -> BridgeResult<T> {
    raw.ok_or(BridgeError::StaleHandle { kind })
}

impl RemixBridge {
    /// Create a mesh; surface materials must be live
    pub fn create_mesh(&mut self, desc: &MeshDesc) -> BridgeResult<MeshHandle> {
        let create = self.entry(|t| t.create_mesh, "CreateMesh")?;
        let arenas = &self.resources;
        let lowered = desc.lower(|material| arenas.material(material))?;

        let mut raw = RawMeshHandle::NULL;
        // SAFETY: `lowered` and everything it points at outlive the call.
        let code = unsafe { create(lowered.info(), &mut raw) };
        if !code.is_success() {
            return Err(BridgeError::CreateFailed {
                kind: ResourceKind::Mesh,
                code,
            });
        }

        let handle = self.resources.meshes.insert(raw);
        log::debug!("Created mesh {:#x} as {handle:?}", desc.hash);
        Ok(handle)
    }

    /// Destroy a mesh; the handle is retired even if the renderer fails
    pub fn destroy_mesh(&mut self, handle: MeshHandle) -> BridgeResult<()> {
        let destroy = self.entry(|t| t.destroy_mesh, "DestroyMesh")?;
        let raw = stale_unless(self.resources.meshes.remove(handle), ResourceKind::Mesh)?;

        // SAFETY: `raw` came from a successful CreateMesh in this cycle.
        let code = unsafe { destroy(raw) };
        destroyed(ResourceKind::Mesh, code)
    }

    /// Create a material
    pub fn create_material(&mut self, desc: &MaterialDesc) -> BridgeResult<MaterialHandle> {
        let create = self.entry(|t| t.create_material, "CreateMaterial")?;
        let lowered = desc.lower();

        let mut raw = RawMaterialHandle::NULL;
        // SAFETY: `lowered` keeps its extension chain and paths alive.
        let code = unsafe { create(lowered.info(), &mut raw) };
        if !code.is_success() {
            return Err(BridgeError::CreateFailed {
                kind: ResourceKind::Material,
                code,
            });
        }

        let handle = self.resources.materials.insert(raw);
        log::debug!("Created material {:#x} as {handle:?}", desc.hash);
        Ok(handle)
    }

    /// Destroy a material; meshes referencing it keep the renderer's copy
    pub fn destroy_material(&mut self, handle: MaterialHandle) -> BridgeResult<()> {
        let destroy = self.entry(|t| t.destroy_material, "DestroyMaterial")?;
        let raw = stale_unless(self.resources.materials.remove(handle), ResourceKind::Material)?;

        // SAFETY: `raw` came from a successful CreateMaterial in this cycle.
        let code = unsafe { destroy(raw) };
        destroyed(ResourceKind::Material, code)
    }

    /// Create a light; the hash must be non-zero
    pub fn create_light(&mut self, desc: &LightDesc) -> BridgeResult<LightHandle> {
        let create = self.entry(|t| t.create_light, "CreateLight")?;
        let lowered = desc.lower()?;

        let mut raw = RawLightHandle::NULL;
        // SAFETY: `lowered` keeps its shape extension alive.
        let code = unsafe { create(lowered.info(), &mut raw) };
        if !code.is_success() {
            return Err(BridgeError::CreateFailed {
                kind: ResourceKind::Light,
                code,
            });
        }

        let handle = self.resources.lights.insert(raw);
        log::debug!("Created light {:#x} as {handle:?}", desc.hash);
        Ok(handle)
    }

    /// Destroy a light
    pub fn destroy_light(&mut self, handle: LightHandle) -> BridgeResult<()> {
        let destroy = self.entry(|t| t.destroy_light, "DestroyLight")?;
        let raw = stale_unless(self.resources.lights.remove(handle), ResourceKind::Light)?;

        // SAFETY: `raw` came from a successful CreateLight in this cycle.
        let code = unsafe { destroy(raw) };
        destroyed(ResourceKind::Light, code)
    }

    /// Number of live handles of one kind
    pub fn live_count(&self, kind: ResourceKind) -> usize {
        self.resources.len(kind)
    }
}

fn destroyed(kind: ResourceKind, code: ErrorCode) -> BridgeResult<()> {
    if code.is_success() {
        Ok(())
    } else {
        log::warn!("Renderer failed to destroy {kind}: {code}");
        Err(BridgeError::DestroyFailed { kind, code })
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock::{self, MockBinder};
    use super::super::{LifecycleState, NativeWindow, StartupParams};
    use super::*;
    use crate::config::BridgeConfig;
    use crate::scene::{OpaqueParams, Surface, Vertex};
    use nalgebra::Vector3;

    fn started(name: &str) -> RemixBridge {
        started_with(name, MockBinder::new())
    }

    fn started_with(name: &str, binder: MockBinder) -> RemixBridge {
        let config = BridgeConfig::new(name).with_search_dirs(["."]);
        let mut bridge = RemixBridge::with_binder(config, Box::new(binder));
        bridge.init(&StartupParams::new(NativeWindow::null())).unwrap();
        bridge
    }

    fn triangle_mesh(hash: u64) -> MeshDesc {
        let v = |x: f32, y: f32| Vertex::new([x, y, 10.0], [0.0, 0.0, -1.0], [0.0, 0.0], Vertex::WHITE);
        MeshDesc::new(hash).with_surface(Surface::new(vec![v(5.0, -5.0), v(0.0, 5.0), v(-5.0, -5.0)], vec![0, 1, 2]))
    }

    #[test]
    fn test_create_then_destroy_mesh() {
        let mut bridge = started("resources_mesh.dll");
        let mesh = bridge.create_mesh(&triangle_mesh(0x1)).unwrap();
        assert_eq!(bridge.live_count(ResourceKind::Mesh), 1);

        bridge.destroy_mesh(mesh).unwrap();
        assert_eq!(bridge.live_count(ResourceKind::Mesh), 0);
        assert_eq!(mock::calls_to("DestroyMesh"), 1);
    }

    #[test]
    fn test_second_destroy_is_stale_and_not_forwarded() {
        let mut bridge = started("resources_double_destroy.dll");
        let mesh = bridge.create_mesh(&triangle_mesh(0x2)).unwrap();
        bridge.destroy_mesh(mesh).unwrap();

        let err = bridge.destroy_mesh(mesh).unwrap_err();
        assert!(matches!(err, BridgeError::StaleHandle { kind: ResourceKind::Mesh }));
        assert_eq!(mock::calls_to("DestroyMesh"), 1);
    }

    #[test]
    fn test_failed_create_issues_no_handle() {
        let mut bridge = started("resources_failed_create.dll");
        mock::fail_next("CreateLight", ErrorCode::INVALID_ARGUMENTS);

        let light = LightDesc::sphere(0x3, Vector3::new(10.0, 10.0, 10.0), Vector3::zeros());
        let err = bridge.create_light(&light).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::CreateFailed {
                kind: ResourceKind::Light,
                code: ErrorCode::INVALID_ARGUMENTS
            }
        ));
        assert_eq!(bridge.live_count(ResourceKind::Light), 0);
        assert_eq!(mock::calls_to("DestroyLight"), 0);
    }

    #[test]
    fn test_mesh_resolves_material_to_raw_handle() {
        let mut bridge = started("resources_mesh_material.dll");
        let material = bridge
            .create_material(&MaterialDesc::opaque(0x4, OpaqueParams::default()))
            .unwrap();
        let raw = bridge.resources.material(material).unwrap();

        let desc = MeshDesc::new(0x5).with_surface(triangle_mesh(0).surfaces[0].clone().with_material(material));
        bridge.create_mesh(&desc).unwrap();
        assert_eq!(mock::last_mesh_materials(), vec![raw.0 as usize]);
    }

    #[test]
    fn test_mesh_with_destroyed_material_is_rejected() {
        let mut bridge = started("resources_stale_material.dll");
        let material = bridge
            .create_material(&MaterialDesc::opaque(0x6, OpaqueParams::default()))
            .unwrap();
        bridge.destroy_material(material).unwrap();

        let desc = MeshDesc::new(0x7).with_surface(triangle_mesh(0).surfaces[0].clone().with_material(material));
        let err = bridge.create_mesh(&desc).unwrap_err();
        assert!(matches!(err, BridgeError::StaleHandle { kind: ResourceKind::Material }));
        assert_eq!(mock::calls_to("CreateMesh"), 0);
    }

    #[test]
    fn test_failed_destroy_still_retires_handle() {
        let mut bridge = started("resources_failed_destroy.dll");
        let material = bridge
            .create_material(&MaterialDesc::opaque(0x8, OpaqueParams::default()))
            .unwrap();
        mock::fail_next("DestroyMaterial", ErrorCode::GENERAL_FAILURE);

        let err = bridge.destroy_material(material).unwrap_err();
        assert!(matches!(err, BridgeError::DestroyFailed { kind: ResourceKind::Material, .. }));
        assert!(matches!(
            bridge.destroy_material(material),
            Err(BridgeError::StaleHandle { .. })
        ));
    }

    #[test]
    fn test_calls_after_destroy_never_reach_renderer() {
        let mut bridge = started("resources_after_destroy.dll");
        let mesh = bridge.create_mesh(&triangle_mesh(0x9)).unwrap();
        bridge.destroy().unwrap();
        let before = mock::calls().len();

        let not_started = |r: BridgeResult<()>| {
            matches!(r, Err(BridgeError::NotStarted { state: LifecycleState::Stopped }))
        };
        assert!(not_started(bridge.destroy_mesh(mesh)));
        assert!(not_started(bridge.create_mesh(&triangle_mesh(0xA)).map(|_| ())));
        assert!(not_started(bridge.create_material(&MaterialDesc::opaque(0xB, OpaqueParams::default())).map(|_| ())));
        assert_eq!(mock::calls().len(), before);
    }

    #[test]
    fn test_handles_from_previous_cycle_are_stale() {
        let mut bridge = started("resources_previous_cycle.dll");
        let light = bridge
            .create_light(&LightDesc::sphere(0xC, Vector3::new(1.0, 1.0, 1.0), Vector3::zeros()))
            .unwrap();
        bridge.destroy().unwrap();
        bridge.init(&StartupParams::new(NativeWindow::null())).unwrap();

        assert!(matches!(
            bridge.destroy_light(light),
            Err(BridgeError::StaleHandle { kind: ResourceKind::Light })
        ));
    }

    #[test]
    fn test_missing_entry_fails_loudly() {
        let mut table = mock::table();
        table.create_mesh = None;
        let mut bridge = started_with("resources_partial_table.dll", MockBinder::with_table(table));

        let err = bridge.create_mesh(&triangle_mesh(0xD)).unwrap_err();
        assert!(matches!(err, BridgeError::EntryUnbound { entry: "CreateMesh" }));
    }
}

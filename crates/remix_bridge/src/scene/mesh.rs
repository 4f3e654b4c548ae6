//! Mesh descriptors

use std::marker::PhantomData;
use std::ptr;

use super::{count_u32, Vertex};
use crate::bridge::MaterialHandle;
use crate::error::BridgeResult;
use crate::ffi::{
    slice_ptr, to_bool, MeshInfo, MeshInfoSkinning, MeshInfoSurfaceTriangles, RawMaterialHandle,
    StructType,
};

/// Per-vertex bone weights for a skinned surface
///
/// Both arrays hold `bones_per_vertex` entries per vertex.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Skinning {
    /// Bones influencing each vertex
    pub bones_per_vertex: u32,
    /// Blend weight per (vertex, bone)
    pub blend_weights: Vec<f32>,
    /// Bone index per (vertex, bone), into the instance's bone transforms
    pub blend_indices: Vec<u32>,
}

/// One triangle list with an optional material
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Surface {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle list indices
    pub indices: Vec<u32>,
    /// Skinning data
    pub skinning: Option<Skinning>,
    /// Material; the renderer's default material when unset
    pub material: Option<MaterialHandle>,
}

impl Surface {
    /// Surface from vertices and a triangle list
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            ..Self::default()
        }
    }

    /// Assign a material
    pub fn with_material(mut self, material: MaterialHandle) -> Self {
        self.material = Some(material);
        self
    }

    /// Attach skinning data
    pub fn with_skinning(mut self, skinning: Skinning) -> Self {
        self.skinning = Some(skinning);
        self
    }
}

/// Mesh asset made of one or more surfaces
#[derive(Debug, Clone, PartialEq)]
pub struct MeshDesc {
    /// Caller-managed identifier; the renderer keys replacements on it
    pub hash: u64,
    /// Surfaces
    pub surfaces: Vec<Surface>,
}

impl MeshDesc {
    /// Empty mesh with the given hash
    pub fn new(hash: u64) -> Self {
        Self {
            hash,
            surfaces: Vec::new(),
        }
    }

    /// Append a surface
    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.surfaces.push(surface);
        self
    }

    /// Lower into `remixapi_MeshInfo`, resolving each surface's material
    pub(crate) fn lower<F>(&self, mut resolve_material: F) -> BridgeResult<LoweredMesh<'_>>
    where
        F: FnMut(MaterialHandle) -> BridgeResult<RawMaterialHandle>,
    {
        let mut surfaces = Vec::with_capacity(self.surfaces.len());
        for surface in &self.surfaces {
            let material = match surface.material {
                Some(handle) => resolve_material(handle)?,
                None => RawMaterialHandle::NULL,
            };
            let skinning = match &surface.skinning {
                Some(skinning) => MeshInfoSkinning {
                    bones_per_vertex: skinning.bones_per_vertex,
                    blend_weights_values: slice_ptr(&skinning.blend_weights),
                    blend_weights_count: count_u32(skinning.blend_weights.len(), "blend weights")?,
                    blend_indices_values: slice_ptr(&skinning.blend_indices),
                    blend_indices_count: count_u32(skinning.blend_indices.len(), "blend indices")?,
                },
                None => MeshInfoSkinning::EMPTY,
            };
            surfaces.push(MeshInfoSurfaceTriangles {
                vertices_values: slice_ptr(&surface.vertices),
                vertices_count: surface.vertices.len() as u64,
                indices_values: slice_ptr(&surface.indices),
                indices_count: surface.indices.len() as u64,
                skinning_hasvalue: to_bool(surface.skinning.is_some()),
                skinning_value: skinning,
                material,
            });
        }

        let info = MeshInfo {
            s_type: StructType::MESH_INFO,
            p_next: ptr::null_mut(),
            hash: self.hash,
            surfaces_values: slice_ptr(&surfaces),
            surfaces_count: count_u32(surfaces.len(), "surfaces")?,
        };

        Ok(LoweredMesh {
            info,
            _surfaces: surfaces,
            _desc: PhantomData,
        })
    }
}

/// `MeshInfo` plus its surface array; borrows vertex data from the descriptor
pub(crate) struct LoweredMesh<'a> {
    info: MeshInfo,
    _surfaces: Vec<MeshInfoSurfaceTriangles>,
    _desc: PhantomData<&'a MeshDesc>,
}

impl LoweredMesh<'_> {
    pub(crate) fn info(&self) -> &MeshInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BridgeError, ResourceKind};
    use slotmap::SlotMap;

    fn triangle() -> Surface {
        Surface::new(
            vec![
                Vertex::new([5.0, -5.0, 10.0], [0.0, 0.0, -1.0], [0.0, 0.0], Vertex::WHITE),
                Vertex::new([0.0, 5.0, 10.0], [0.0, 0.0, -1.0], [0.0, 0.0], 0),
                Vertex::new([-5.0, -5.0, 10.0], [0.0, 0.0, -1.0], [0.0, 0.0], Vertex::WHITE),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_surface_arrays_are_wired() {
        let desc = MeshDesc::new(0x1).with_surface(triangle());
        let lowered = desc.lower(|_| unreachable!("no material referenced")).unwrap();
        let info = lowered.info();

        assert_eq!(info.s_type, StructType::MESH_INFO);
        assert_eq!(info.hash, 0x1);
        assert_eq!(info.surfaces_count, 1);

        let surface = unsafe { &*info.surfaces_values };
        assert_eq!(surface.vertices_count, 3);
        assert_eq!(surface.indices_count, 3);
        assert_eq!(surface.vertices_values, desc.surfaces[0].vertices.as_ptr());
        assert_eq!(surface.skinning_hasvalue, 0);
        assert!(surface.material.is_null());
    }

    #[test]
    fn test_skinning_is_forwarded() {
        let skinning = Skinning {
            bones_per_vertex: 2,
            blend_weights: vec![0.0, 0.5, 1.0, 1.0, 0.5, 0.0],
            blend_indices: vec![0, 1, 0, 1, 0, 1],
        };
        let desc = MeshDesc::new(0x2).with_surface(triangle().with_skinning(skinning));
        let lowered = desc.lower(|_| unreachable!("no material referenced")).unwrap();

        let surface = unsafe { &*lowered.info().surfaces_values };
        assert_eq!(surface.skinning_hasvalue, 1);
        assert_eq!(surface.skinning_value.bones_per_vertex, 2);
        assert_eq!(surface.skinning_value.blend_weights_count, 6);
        assert_eq!(surface.skinning_value.blend_indices_count, 6);
    }

    #[test]
    fn test_material_is_resolved() {
        let mut arena: SlotMap<MaterialHandle, RawMaterialHandle> = SlotMap::with_key();
        let raw = RawMaterialHandle(0x40 as *mut _);
        let handle = arena.insert(raw);

        let desc = MeshDesc::new(0x3).with_surface(triangle().with_material(handle));
        let lowered = desc
            .lower(|h| arena.get(h).copied().ok_or(BridgeError::StaleHandle { kind: ResourceKind::Material }))
            .unwrap();
        let surface = unsafe { &*lowered.info().surfaces_values };
        assert_eq!(surface.material, raw);
    }

    #[test]
    fn test_stale_material_aborts_lowering() {
        let mut arena: SlotMap<MaterialHandle, RawMaterialHandle> = SlotMap::with_key();
        let handle = arena.insert(RawMaterialHandle(0x40 as *mut _));
        arena.remove(handle);

        let desc = MeshDesc::new(0x4).with_surface(triangle().with_material(handle));
        let result = desc.lower(|h| {
            arena.get(h).copied().ok_or(BridgeError::StaleHandle { kind: ResourceKind::Material })
        });
        assert!(matches!(
            result,
            Err(BridgeError::StaleHandle { kind: ResourceKind::Material })
        ));
    }
}

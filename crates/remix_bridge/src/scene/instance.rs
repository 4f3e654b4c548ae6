//! Per-frame draw submissions

use std::marker::PhantomData;
use std::ptr;

use bitflags::bitflags;

use super::{count_u32, LoweringStorage, Transform};
use crate::bridge::MeshHandle;
use crate::error::BridgeResult;
use crate::ffi::{slice_ptr, to_bool, InstanceInfo, InstanceInfoBoneTransformsExt, RawMeshHandle, StructType};

bitflags! {
    /// `remixapi_InstanceCategoryBit`: how the renderer classifies an instance
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[allow(missing_docs)]
    pub struct CategoryFlags: u32 {
        const WORLD_UI = 1 << 0;
        const WORLD_MATTE = 1 << 1;
        const SKY = 1 << 2;
        const IGNORE = 1 << 3;
        const IGNORE_LIGHTS = 1 << 4;
        const IGNORE_ANTI_CULLING = 1 << 5;
        const IGNORE_MOTION_BLUR = 1 << 6;
        const IGNORE_OPACITY_MICROMAP = 1 << 7;
        const HIDDEN = 1 << 8;
        const PARTICLE = 1 << 9;
        const BEAM = 1 << 10;
        const DECAL_STATIC = 1 << 11;
        const DECAL_DYNAMIC = 1 << 12;
        const DECAL_SINGLE_OFFSET = 1 << 13;
        const DECAL_NO_OFFSET = 1 << 14;
        const ALPHA_BLEND_TO_CUTOUT = 1 << 15;
        const TERRAIN = 1 << 16;
        const ANIMATED_WATER = 1 << 17;
        const THIRD_PERSON_PLAYER_MODEL = 1 << 18;
        const THIRD_PERSON_PLAYER_BODY = 1 << 19;
        const IGNORE_BAKED_LIGHTING = 1 << 20;
        const IGNORE_ALPHA_CHANNEL = 1 << 21;
    }
}

/// One mesh placed in the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceSubmission {
    /// Mesh to draw
    pub mesh: MeshHandle,
    /// Renderer classification
    pub category_flags: CategoryFlags,
    /// Object to world
    pub transform: Transform,
    /// Disable backface culling
    pub double_sided: bool,
    /// Skeleton pose for skinned meshes; empty for rigid ones
    pub bone_transforms: Vec<Transform>,
}

impl InstanceSubmission {
    /// Double-sided, uncategorized instance at the identity transform
    pub fn new(mesh: MeshHandle) -> Self {
        Self {
            mesh,
            category_flags: CategoryFlags::empty(),
            transform: Transform::IDENTITY,
            double_sided: true,
            bone_transforms: Vec::new(),
        }
    }

    /// Place the instance
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set category flags
    pub fn with_category_flags(mut self, flags: CategoryFlags) -> Self {
        self.category_flags = flags;
        self
    }

    /// Toggle backface culling
    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    /// Pose a skinned mesh
    pub fn with_bone_transforms(mut self, bones: Vec<Transform>) -> Self {
        self.bone_transforms = bones;
        self
    }

    pub(crate) fn lower(&self, mesh: RawMeshHandle) -> BridgeResult<LoweredInstance<'_>> {
        let mut storage = LoweringStorage::default();
        let p_next = if self.bone_transforms.is_empty() {
            ptr::null_mut()
        } else {
            storage.chain(InstanceInfoBoneTransformsExt {
                s_type: StructType::INSTANCE_INFO_BONE_TRANSFORMS_EXT,
                p_next: ptr::null_mut(),
                bone_transforms_values: slice_ptr(&self.bone_transforms),
                bone_transforms_count: count_u32(self.bone_transforms.len(), "bone transforms")?,
            })
        };

        Ok(LoweredInstance {
            info: InstanceInfo {
                s_type: StructType::INSTANCE_INFO,
                p_next,
                category_flags: self.category_flags.bits(),
                mesh,
                transform: self.transform,
                double_sided: to_bool(self.double_sided),
            },
            _storage: storage,
            _submission: PhantomData,
        })
    }
}

/// `InstanceInfo` plus the optional bone transform extension
pub(crate) struct LoweredInstance<'a> {
    info: InstanceInfo,
    _storage: LoweringStorage,
    _submission: PhantomData<&'a InstanceSubmission>,
}

impl LoweredInstance<'_> {
    pub(crate) fn info(&self) -> &InstanceInfo {
        &self.info
    }
}

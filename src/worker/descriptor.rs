//! Thread-portable block descriptors.
//!
//! A descriptor is the plain-data snapshot of one finalized definition.
//! It carries no closures and no live instances; workers rebuild the
//! reference instance from the physical snapshot and rebind the codec
//! from the shape classifier, so the whole thing serializes as JSON.

use crate::block::basic::{self, BasicBlock, PhysicalAttributes};
use crate::block::builder::{BlockBuilder, MaterialKind, RegisteredBlock};
use crate::block::component::Component;
use crate::block::instance::{BlockInstance, InstanceFactory, ShapeClass};
use crate::block::permutation::Permutation;
use crate::block::property::BlockProperty;
use crate::block::recipes;
use crate::block::traits::BlockTrait;
use crate::error::{ForgeError, ForgeResult};
use crate::nbt::Tag;
use crate::registry::{BlockRegistries, CreativeInfo, IdAllocator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentData {
    pub name: String,
    pub payload: Tag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermutationData {
    pub condition: String,
    pub components: Vec<ComponentData>,
}

/// Everything a worker needs to replay one registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    pub string_id: String,
    pub numeric_id: u32,
    pub shape: ShapeClass,
    pub physical: PhysicalAttributes,
    pub material: MaterialKind,
    pub creative: bool,
    pub creative_info: Option<CreativeInfo>,
    pub tags: Vec<String>,
    pub properties: Vec<BlockProperty>,
    pub components: Vec<ComponentData>,
    pub permutations: Vec<PermutationData>,
    pub traits: Vec<BlockTrait>,
}

impl BlockDescriptor {
    /// Snapshots a fully loaded builder. The numeric id must already be
    /// assigned.
    pub(crate) fn from_builder(
        builder: &BlockBuilder,
        block: &dyn BlockInstance,
        creative: bool,
    ) -> ForgeResult<BlockDescriptor> {
        let numeric_id = builder.assigned_id().ok_or_else(|| ForgeError::Descriptor {
            message: format!(
                "definition '{}' snapshotted before id assignment",
                builder.string_id()
            ),
        })?;
        Ok(BlockDescriptor {
            string_id: builder.string_id().to_string(),
            numeric_id,
            shape: block.shape(),
            physical: basic::snapshot(block),
            material: builder.material_kind(),
            creative,
            creative_info: builder.creative().copied(),
            tags: builder.tags().to_vec(),
            properties: builder.properties().to_vec(),
            components: builder
                .components()
                .iter()
                .map(|c| ComponentData {
                    name: c.name().to_string(),
                    payload: c.to_nbt(),
                })
                .collect(),
            permutations: builder
                .permutations()
                .iter()
                .map(|p| PermutationData {
                    condition: p.condition().to_string(),
                    components: p
                        .components()
                        .iter()
                        .map(|c| ComponentData {
                            name: c.name().to_string(),
                            payload: c.to_nbt(),
                        })
                        .collect(),
                })
                .collect(),
            traits: builder.traits().to_vec(),
        })
    }

    pub fn to_json(&self) -> ForgeResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ForgeError::Descriptor {
            message: e.to_string(),
        })
    }

    pub fn from_json(bytes: &[u8]) -> ForgeResult<BlockDescriptor> {
        serde_json::from_slice(bytes).map_err(|e| ForgeError::Descriptor {
            message: e.to_string(),
        })
    }

    /// Replays this registration into a private set of registries. The
    /// local allocator is advanced past the replayed id so later local
    /// allocations cannot collide with it.
    pub fn replay(
        &self,
        registries: &mut BlockRegistries,
        ids: &IdAllocator,
    ) -> ForgeResult<RegisteredBlock> {
        ids.reserve_through(self.numeric_id);

        let shape = self.shape;
        let physical = self.physical;
        let factory: InstanceFactory =
            Arc::new(move |_| Box::new(BasicBlock::from_parts(shape, physical)));
        let reference = factory(self.numeric_id);
        let codec = recipes::codec_for(shape, &self.string_id, &*reference);

        let builder = BlockBuilder::from_parts(
            self.string_id.clone(),
            self.numeric_id,
            self.material,
            self.creative_info,
            self.tags.clone(),
            self.components
                .iter()
                .map(|c| Component::new(&c.name, c.payload.clone()))
                .collect(),
            self.properties.clone(),
            self.permutations
                .iter()
                .map(|p| {
                    let mut permutation = Permutation::new(&p.condition);
                    for c in &p.components {
                        permutation =
                            permutation.with(Component::new(&c.name, c.payload.clone()));
                    }
                    permutation
                })
                .collect(),
            self.traits.clone(),
        );
        builder.finalize_into(registries, &factory, codec, self.creative)
    }
}

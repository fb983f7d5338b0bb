//! Schema compiler for declarative block definitions.
//!
//! A host registers custom blocks through [`block::BlockBuilder`]:
//! typed state properties, named components, conditional permutations,
//! and a state codec. Finalizing a definition expands its property
//! domains into a dense state dictionary, renders the client-facing
//! document, and records everything in the process-wide registries.
//! Each successful registration also appends a plain-data descriptor to
//! a log that worker threads replay into private registry replicas.

pub mod block;
pub mod error;
pub mod hooks;
pub mod nbt;
pub mod registry;
pub mod worker;

pub use block::{
    BasicBlock, BlockBuilder, BlockInstance, BlockProperty, BlockTrait, Cardinal, Component,
    FaceSet, Facing, InstanceFactory, LeverFacing, MaterialKind, Permutation, PropertyValue,
    RegisterOptions, RegisteredBlock, ShapeClass, ShapeState, SlabHalf, StateCodec, StateReader,
    StateWriter, WallConnection,
};
pub use error::{ForgeError, ForgeResult};
pub use hooks::{register_load_hook, BlockLoadHook, HookOutcome};
pub use registry::{
    BlockRegistries, CreativeCategory, CreativeGroup, CreativeInfo, ItemTypeEntry, REGISTRIES,
};
pub use worker::BlockDescriptor;

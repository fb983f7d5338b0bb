//! Block definition compiler.
//!
//! A definition is assembled through [`builder::BlockBuilder`]: typed
//! state properties, named components, conditional permutations, and a
//! state codec. Finalizing expands the property domains into the state
//! dictionary, renders the client document, registers everything into
//! the process-wide tables, and queues a thread-portable descriptor for
//! worker replication.

pub mod basic;
pub mod builder;
pub mod cartesian;
pub mod component;
pub mod instance;
pub mod permutation;
pub mod property;
pub mod recipes;
pub mod state;
pub mod traits;

pub use basic::BasicBlock;
pub use builder::{BlockBuilder, MaterialKind, RegisterOptions, RegisteredBlock};
pub use cartesian::CartesianProduct;
pub use component::{
    BoxGeometry, Breathability, Component, Geometry, Material, MaterialTarget, RenderMethod,
    Transformation,
};
pub use instance::{
    BlockInstance, Cardinal, FaceSet, Facing, InstanceFactory, LeverFacing, ShapeClass,
    ShapeState, SlabHalf, WallConnection,
};
pub use permutation::Permutation;
pub use property::{BlockProperty, PropertyValue};
pub use state::{BlockStateDictionaryEntry, StateCodec, StateReader, StateWriter};
pub use traits::BlockTrait;

//! A plain data-backed block instance.
//!
//! `BasicBlock` implements the host interface with configurable
//! physical attributes and a shape class; workers also use it to
//! reconstruct reference instances from descriptor snapshots.

use super::instance::{BlockInstance, ShapeClass, ShapeState};
use crate::error::{ForgeError, ForgeResult};
use serde::{Deserialize, Serialize};

/// Physical attributes consulted by the auto-detected default
/// components. Serializable so descriptors can carry them across
/// isolation boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalAttributes {
    pub transparent: bool,
    pub collision: bool,
    pub blast_resistance: f32,
    pub hardness: f32,
    pub friction_factor: f32,
    pub light_level: u8,
    pub flowable: bool,
    pub container_tile: bool,
}

impl Default for PhysicalAttributes {
    fn default() -> PhysicalAttributes {
        PhysicalAttributes {
            transparent: false,
            collision: true,
            blast_resistance: 5.0,
            hardness: 1.0,
            friction_factor: 0.6,
            light_level: 0,
            flowable: false,
            container_tile: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BasicBlock {
    physical: PhysicalAttributes,
    shape: ShapeClass,
    state: ShapeState,
}

impl BasicBlock {
    pub fn new(shape: ShapeClass) -> BasicBlock {
        BasicBlock {
            physical: PhysicalAttributes::default(),
            shape,
            state: ShapeState::default_for(shape),
        }
    }

    pub fn from_parts(shape: ShapeClass, physical: PhysicalAttributes) -> BasicBlock {
        BasicBlock {
            physical,
            shape,
            state: ShapeState::default_for(shape),
        }
    }

    pub fn transparent(mut self) -> BasicBlock {
        self.physical.transparent = true;
        self
    }

    pub fn no_collision(mut self) -> BasicBlock {
        self.physical.collision = false;
        self
    }

    pub fn blast_resistance(mut self, value: f32) -> BasicBlock {
        self.physical.blast_resistance = value;
        self
    }

    pub fn hardness(mut self, value: f32) -> BasicBlock {
        self.physical.hardness = value;
        self
    }

    pub fn friction(mut self, value: f32) -> BasicBlock {
        self.physical.friction_factor = value;
        self
    }

    pub fn light(mut self, level: u8) -> BasicBlock {
        self.physical.light_level = level;
        self
    }

    pub fn flowable(mut self) -> BasicBlock {
        self.physical.flowable = true;
        self
    }

    pub fn container_tile(mut self) -> BasicBlock {
        self.physical.container_tile = true;
        self
    }

    /// Starting state override, validated against the shape class.
    pub fn state(mut self, state: ShapeState) -> ForgeResult<BasicBlock> {
        if !state.belongs_to(self.shape) {
            return Err(ForgeError::ShapeMismatch {
                recipe: self.shape.family_name(),
            });
        }
        self.state = state;
        Ok(self)
    }

    pub fn physical(&self) -> PhysicalAttributes {
        self.physical
    }
}

impl BlockInstance for BasicBlock {
    fn is_transparent(&self) -> bool {
        self.physical.transparent
    }

    fn has_collision(&self) -> bool {
        self.physical.collision
    }

    fn blast_resistance(&self) -> f32 {
        self.physical.blast_resistance
    }

    fn hardness(&self) -> f32 {
        self.physical.hardness
    }

    fn friction_factor(&self) -> f32 {
        self.physical.friction_factor
    }

    fn light_level(&self) -> u8 {
        self.physical.light_level
    }

    fn is_flowable(&self) -> bool {
        self.physical.flowable
    }

    fn has_container_tile(&self) -> bool {
        self.physical.container_tile
    }

    fn shape(&self) -> ShapeClass {
        self.shape
    }

    fn shape_state(&self) -> ShapeState {
        self.state.clone()
    }

    fn with_shape_state(&self, state: ShapeState) -> ForgeResult<Box<dyn BlockInstance>> {
        if !state.belongs_to(self.shape) {
            return Err(ForgeError::ShapeMismatch {
                recipe: self.shape.family_name(),
            });
        }
        Ok(Box::new(BasicBlock {
            physical: self.physical,
            shape: self.shape,
            state,
        }))
    }

    fn boxed_clone(&self) -> Box<dyn BlockInstance> {
        Box::new(self.clone())
    }
}

/// Snapshot of everything a worker needs to rebuild a reference
/// instance.
pub fn snapshot(block: &dyn BlockInstance) -> PhysicalAttributes {
    PhysicalAttributes {
        transparent: block.is_transparent(),
        collision: block.has_collision(),
        blast_resistance: block.blast_resistance(),
        hardness: block.hardness(),
        friction_factor: block.friction_factor(),
        light_level: block.light_level(),
        flowable: block.is_flowable(),
        container_tile: block.has_container_tile(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::instance::{Cardinal, SlabHalf};

    #[test]
    fn state_override_must_match_shape() {
        let block = BasicBlock::new(ShapeClass::Slab);
        assert!(block
            .clone()
            .state(ShapeState::Slab {
                half: SlabHalf::Top
            })
            .is_ok());
        assert!(block
            .state(ShapeState::Ladder {
                facing: Cardinal::North
            })
            .is_err());
    }

    #[test]
    fn with_shape_state_preserves_physicals() {
        let block = BasicBlock::new(ShapeClass::Door).light(7);
        let copy = block
            .with_shape_state(ShapeState::Door {
                facing: Cardinal::East,
                upper: true,
                hinge: false,
                open: true,
            })
            .unwrap();
        assert_eq!(copy.light_level(), 7);
        assert_eq!(
            copy.shape_state(),
            ShapeState::Door {
                facing: Cardinal::East,
                upper: true,
                hinge: false,
                open: true,
            }
        );
    }
}

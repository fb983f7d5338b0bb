//! Orientation trait overlays.
//!
//! A trait lets the client encode a rotation axis on its own; when a
//! trait declares cardinal or facing awareness, the matching declared
//! property is suppressed from the rendered document so the same axis
//! is never described twice.

use crate::block::property::state_names;
use crate::nbt::{Compound, Tag};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraitId {
    PlacementDirection,
    PlacementPosition,
}

impl TraitId {
    pub fn as_str(self) -> &'static str {
        match self {
            TraitId::PlacementDirection => "minecraft:placement_direction",
            TraitId::PlacementPosition => "minecraft:placement_position",
        }
    }
}

/// State axes a trait claims for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraitStates {
    pub cardinal: bool,
    pub facing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTrait {
    id: TraitId,
    rotation_offset: i32,
    states: TraitStates,
}

impl BlockTrait {
    pub fn new(id: TraitId) -> BlockTrait {
        BlockTrait {
            id,
            rotation_offset: 0,
            states: TraitStates::default(),
        }
    }

    /// Cardinal-direction placement trait (horizontal rotation).
    pub fn placement_direction() -> BlockTrait {
        BlockTrait::new(TraitId::PlacementDirection).cardinal()
    }

    /// Facing-direction placement trait (full six-way rotation).
    pub fn placement_position() -> BlockTrait {
        BlockTrait::new(TraitId::PlacementPosition).facing()
    }

    pub fn rotation_offset(mut self, offset: i32) -> BlockTrait {
        self.rotation_offset = offset;
        self
    }

    pub fn cardinal(mut self) -> BlockTrait {
        self.states.cardinal = true;
        self
    }

    pub fn facing(mut self) -> BlockTrait {
        self.states.facing = true;
        self
    }

    pub fn id(&self) -> TraitId {
        self.id
    }

    pub fn is_cardinal(&self) -> bool {
        self.states.cardinal
    }

    pub fn is_facing(&self) -> bool {
        self.states.facing
    }

    /// Property name this trait suppresses from the rendered document,
    /// if any.
    pub fn suppresses(&self, property_name: &str) -> bool {
        (self.states.cardinal && property_name == state_names::MC_CARDINAL_DIRECTION)
            || (self.states.facing && property_name == state_names::FACING_DIRECTION)
    }

    pub fn to_nbt(&self) -> Tag {
        let mut enabled = Vec::new();
        if self.states.cardinal {
            enabled.push(Tag::str(state_names::MC_CARDINAL_DIRECTION));
        }
        if self.states.facing {
            enabled.push(Tag::str(state_names::FACING_DIRECTION));
        }
        Tag::Compound(
            Compound::new()
                .set("identifier", Tag::str(self.id.as_str()))
                .set("rotation_offset", Tag::Int(self.rotation_offset))
                .set("enabled_states", Tag::List(enabled)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_direction_suppresses_cardinal_only() {
        let t = BlockTrait::placement_direction();
        assert!(t.suppresses(state_names::MC_CARDINAL_DIRECTION));
        assert!(!t.suppresses(state_names::FACING_DIRECTION));
        assert!(!t.suppresses("growth"));
    }

    #[test]
    fn trait_nbt_lists_enabled_states() {
        let t = BlockTrait::placement_position().rotation_offset(180);
        let Tag::Compound(c) = t.to_nbt() else {
            panic!("trait must render to a compound");
        };
        assert_eq!(c.get("rotation_offset"), Some(&Tag::Int(180)));
        assert_eq!(
            c.get("enabled_states"),
            Some(&Tag::List(vec![Tag::str(state_names::FACING_DIRECTION)]))
        );
    }
}

//! Block state properties.
//!
//! A property is one axis of block state: a name plus an ordered,
//! non-empty domain of discrete scalar values. Domain order is part of
//! the state-identity contract (it drives ordinal assignment), so the
//! domain is a plain vector, never a set.

use crate::error::{ForgeError, ForgeResult};
use crate::nbt::{Compound, Tag};
use serde::{Deserialize, Serialize};

/// A single legal value of a block property. Only these four scalar
/// kinds exist on the wire; constructing a domain with anything else is
/// impossible by type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
}

impl PropertyValue {
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::Str(_) => "string",
        }
    }

    pub fn to_tag(&self) -> Tag {
        match self {
            PropertyValue::Bool(v) => Tag::bool(*v),
            PropertyValue::Int(v) => Tag::Int(*v),
            PropertyValue::Float(v) => Tag::Float(*v),
            PropertyValue::Str(v) => Tag::Str(v.clone()),
        }
    }

    /// Literal form for Molang condition expressions: booleans as 0/1,
    /// strings quoted.
    pub fn condition_literal(&self) -> String {
        match self {
            PropertyValue::Bool(v) => (*v as i32).to_string(),
            PropertyValue::Int(v) => v.to_string(),
            PropertyValue::Float(v) => v.to_string(),
            PropertyValue::Str(v) => format!("'{}'", v),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Str(value)
    }
}

/// Named, ordered value domain for one block state axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockProperty {
    name: String,
    values: Vec<PropertyValue>,
}

impl BlockProperty {
    /// Validates that the domain is non-empty and does not mix scalar
    /// kinds; both are construction-time errors.
    pub fn new(
        name: impl Into<String>,
        values: Vec<PropertyValue>,
    ) -> ForgeResult<BlockProperty> {
        let name = name.into();
        let first = match values.first() {
            Some(v) => v.kind(),
            None => return Err(ForgeError::EmptyDomain { name }),
        };
        if let Some(other) = values.iter().find(|v| v.kind() != first) {
            return Err(ForgeError::MixedDomain {
                name,
                first,
                second: other.kind(),
            });
        }
        Ok(BlockProperty { name, values })
    }

    /// The standard `[false, true]` bit property.
    pub fn bit(name: impl Into<String>) -> BlockProperty {
        BlockProperty {
            name: name.into(),
            values: vec![PropertyValue::Bool(false), PropertyValue::Bool(true)],
        }
    }

    /// Inclusive integer range domain, e.g. growth stages `0..=7`.
    pub fn int_range(
        name: impl Into<String>,
        range: std::ops::RangeInclusive<i32>,
    ) -> ForgeResult<BlockProperty> {
        BlockProperty::new(name, range.map(PropertyValue::Int).collect())
    }

    pub fn strings(
        name: impl Into<String>,
        values: &[&str],
    ) -> ForgeResult<BlockProperty> {
        BlockProperty::new(
            name,
            values.iter().map(|v| PropertyValue::from(*v)).collect(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[PropertyValue] {
        &self.values
    }

    /// Document form: `{name, enum: [...]}`.
    pub fn to_nbt(&self) -> Tag {
        Tag::Compound(
            Compound::new()
                .set("name", Tag::str(&self.name))
                .set(
                    "enum",
                    Tag::List(self.values.iter().map(PropertyValue::to_tag).collect()),
                ),
        )
    }
}

/// Bedrock state names used by the shape-family recipes.
pub mod state_names {
    pub const GROWTH: &str = "growth";
    pub const AGE: &str = "age";
    pub const MC_CARDINAL_DIRECTION: &str = "minecraft:cardinal_direction";
    pub const FACING_DIRECTION: &str = "facing_direction";
    pub const DIRECTION: &str = "direction";
    pub const MC_VERTICAL_HALF: &str = "minecraft:vertical_half";
    pub const UPPER_BLOCK_BIT: &str = "upper_block_bit";
    pub const DOOR_HINGE_BIT: &str = "door_hinge_bit";
    pub const OPEN_BIT: &str = "open_bit";
    pub const IN_WALL_BIT: &str = "in_wall_bit";
    pub const UPSIDE_DOWN_BIT: &str = "upside_down_bit";
    pub const TOGGLE_BIT: &str = "toggle_bit";
    pub const ROTATION: &str = "rotation";
    pub const WALL_POST_BIT: &str = "wall_post_bit";
    pub const WALL_CONNECTION_TYPE_NORTH: &str = "wall_connection_type_north";
    pub const WALL_CONNECTION_TYPE_SOUTH: &str = "wall_connection_type_south";
    pub const WALL_CONNECTION_TYPE_WEST: &str = "wall_connection_type_west";
    pub const WALL_CONNECTION_TYPE_EAST: &str = "wall_connection_type_east";
    pub const LEVER_DIRECTION: &str = "lever_direction";
    pub const CONNECT_NORTH: &str = "mc:n";
    pub const CONNECT_SOUTH: &str = "mc:s";
    pub const CONNECT_WEST: &str = "mc:w";
    pub const CONNECT_EAST: &str = "mc:e";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_domain_is_rejected() {
        assert!(matches!(
            BlockProperty::new("growth", vec![]),
            Err(ForgeError::EmptyDomain { .. })
        ));
    }

    #[test]
    fn mixed_domain_is_rejected() {
        let err = BlockProperty::new(
            "half",
            vec![PropertyValue::Str("bottom".into()), PropertyValue::Int(1)],
        )
        .unwrap_err();
        match err {
            ForgeError::MixedDomain { first, second, .. } => {
                assert_eq!(first, "string");
                assert_eq!(second, "int");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn int_range_keeps_order() {
        let p = BlockProperty::int_range("growth", 0..=7).unwrap();
        assert_eq!(p.values().len(), 8);
        assert_eq!(p.values()[0], PropertyValue::Int(0));
        assert_eq!(p.values()[7], PropertyValue::Int(7));
    }

    #[test]
    fn condition_literals() {
        assert_eq!(PropertyValue::Bool(true).condition_literal(), "1");
        assert_eq!(PropertyValue::Int(3).condition_literal(), "3");
        assert_eq!(
            PropertyValue::Str("top".into()).condition_literal(),
            "'top'"
        );
    }
}

//! State dictionary entries and the state codec surface.
//!
//! Each enumerated property combination becomes one dictionary entry
//! with a dense ordinal (`meta`). Serializer/deserializer pairs move a
//! live instance to and from the wire-form state assignment through
//! `StateWriter`/`StateReader`.

use super::cartesian::CartesianProduct;
use super::instance::{BlockInstance, Cardinal, Facing};
use super::property::{BlockProperty, PropertyValue};
use crate::error::{ForgeError, ForgeResult};
use crate::nbt::{Compound, Tag};
use serde::{Deserialize, Serialize};

/// One `(canonical name, state assignment, ordinal)` row of the state
/// identity table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockStateDictionaryEntry {
    canonical_name: String,
    states: Vec<(String, PropertyValue)>,
    meta: u32,
}

impl BlockStateDictionaryEntry {
    pub fn new(
        canonical_name: impl Into<String>,
        states: Vec<(String, PropertyValue)>,
        meta: u32,
    ) -> BlockStateDictionaryEntry {
        BlockStateDictionaryEntry {
            canonical_name: canonical_name.into(),
            states,
            meta,
        }
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn states(&self) -> &[(String, PropertyValue)] {
        &self.states
    }

    pub fn meta(&self) -> u32 {
        self.meta
    }

    /// Full state compound as stored in the upgrade table:
    /// `{name, states: {...}}`.
    pub fn state_tag(&self) -> Tag {
        let mut states = Compound::new();
        for (name, value) in &self.states {
            states = states.set(name.clone(), value.to_tag());
        }
        Tag::Compound(
            Compound::new()
                .set("name", Tag::str(&self.canonical_name))
                .set("states", states),
        )
    }
}

/// Expands the property list into dictionary entries, metas dense and
/// in enumeration order. No properties means exactly one stateless
/// entry with meta 0.
pub fn dictionary_entries<'a>(
    canonical_name: &'a str,
    properties: &'a [BlockProperty],
) -> impl Iterator<Item = BlockStateDictionaryEntry> + 'a {
    CartesianProduct::new(properties)
        .enumerate()
        .map(move |(meta, combination)| {
            let states = properties
                .iter()
                .map(BlockProperty::name)
                .map(str::to_string)
                .zip(combination)
                .collect();
            BlockStateDictionaryEntry::new(canonical_name, states, meta as u32)
        })
}

/// Accumulates one state assignment during encoding.
#[derive(Debug, Clone)]
pub struct StateWriter {
    canonical_name: String,
    states: Vec<(String, PropertyValue)>,
}

impl StateWriter {
    pub fn new(canonical_name: impl Into<String>) -> StateWriter {
        StateWriter {
            canonical_name: canonical_name.into(),
            states: Vec::new(),
        }
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    pub fn states(&self) -> &[(String, PropertyValue)] {
        &self.states
    }

    pub fn write_bool(mut self, name: &str, value: bool) -> StateWriter {
        self.states.push((name.to_string(), PropertyValue::Bool(value)));
        self
    }

    pub fn write_int(mut self, name: &str, value: i32) -> StateWriter {
        self.states.push((name.to_string(), PropertyValue::Int(value)));
        self
    }

    pub fn write_float(mut self, name: &str, value: f32) -> StateWriter {
        self.states
            .push((name.to_string(), PropertyValue::Float(value)));
        self
    }

    pub fn write_str(mut self, name: &str, value: &str) -> StateWriter {
        self.states
            .push((name.to_string(), PropertyValue::Str(value.to_string())));
        self
    }

    /// `facing_direction` restricted to horizontal values 2..=5.
    pub fn write_horizontal_facing(self, name: &str, facing: Cardinal) -> StateWriter {
        self.write_int(name, facing.facing_index())
    }

    /// Six-direction facing that must not point up (hoppers).
    pub fn write_facing_without_up(self, name: &str, facing: Facing) -> ForgeResult<StateWriter> {
        if facing == Facing::Up {
            return Err(ForgeError::InvalidEnum {
                what: "facing without up",
                value: "up".to_string(),
            });
        }
        Ok(self.write_int(name, facing.index()))
    }

    /// Six-direction facing that must not point down (heads).
    pub fn write_facing_without_down(
        self,
        name: &str,
        facing: Facing,
    ) -> ForgeResult<StateWriter> {
        if facing == Facing::Down {
            return Err(ForgeError::InvalidEnum {
                what: "facing without down",
                value: "down".to_string(),
            });
        }
        Ok(self.write_int(name, facing.index()))
    }
}

/// Reads one state assignment during decoding.
pub struct StateReader<'a> {
    states: &'a [(String, PropertyValue)],
}

impl<'a> StateReader<'a> {
    pub fn new(states: &'a [(String, PropertyValue)]) -> StateReader<'a> {
        StateReader { states }
    }

    pub fn from_entry(entry: &'a BlockStateDictionaryEntry) -> StateReader<'a> {
        StateReader {
            states: entry.states(),
        }
    }

    fn get(&self, name: &str) -> ForgeResult<&PropertyValue> {
        self.states
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| ForgeError::MissingState {
                name: name.to_string(),
            })
    }

    fn type_error(name: &str, expected: &'static str, found: &PropertyValue) -> ForgeError {
        ForgeError::StateType {
            name: name.to_string(),
            expected,
            found: found.kind(),
        }
    }

    pub fn read_bool(&self, name: &str) -> ForgeResult<bool> {
        match self.get(name)? {
            PropertyValue::Bool(v) => Ok(*v),
            // Bit properties written as 0/1 ints decode too.
            PropertyValue::Int(v) if *v == 0 || *v == 1 => Ok(*v == 1),
            other => Err(Self::type_error(name, "bool", other)),
        }
    }

    pub fn read_int(&self, name: &str) -> ForgeResult<i32> {
        match self.get(name)? {
            PropertyValue::Int(v) => Ok(*v),
            other => Err(Self::type_error(name, "int", other)),
        }
    }

    pub fn read_str(&self, name: &str) -> ForgeResult<&str> {
        match self.get(name)? {
            PropertyValue::Str(v) => Ok(v.as_str()),
            other => Err(Self::type_error(name, "string", other)),
        }
    }

    pub fn read_bounded_int(&self, name: &str, min: i32, max: i32) -> ForgeResult<i32> {
        let value = self.read_int(name)?;
        if value < min || value > max {
            return Err(ForgeError::StateRange {
                name: name.to_string(),
                value,
                min,
                max,
            });
        }
        Ok(value)
    }

    pub fn read_horizontal_facing(&self, name: &str) -> ForgeResult<Cardinal> {
        Cardinal::from_facing_index(self.read_int(name)?)
    }

    pub fn read_facing_without_up(&self, name: &str) -> ForgeResult<Facing> {
        let facing = Facing::from_index(self.read_int(name)?)?;
        if facing == Facing::Up {
            return Err(ForgeError::InvalidEnum {
                what: "facing without up",
                value: "up".to_string(),
            });
        }
        Ok(facing)
    }

    pub fn read_facing_without_down(&self, name: &str) -> ForgeResult<Facing> {
        let facing = Facing::from_index(self.read_int(name)?)?;
        if facing == Facing::Down {
            return Err(ForgeError::InvalidEnum {
                what: "facing without down",
                value: "down".to_string(),
            });
        }
        Ok(facing)
    }
}

/// Encodes a live instance into a state assignment.
pub type Serializer = Box<dyn Fn(&dyn BlockInstance) -> ForgeResult<StateWriter> + Send + Sync>;

/// Rebuilds a live instance from a state assignment.
pub type Deserializer =
    Box<dyn Fn(&StateReader) -> ForgeResult<Box<dyn BlockInstance>> + Send + Sync>;

/// Paired codec bound at finalize time.
pub struct StateCodec {
    pub serializer: Serializer,
    pub deserializer: Deserializer,
}

impl std::fmt::Debug for StateCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCodec").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stateless_block_gets_exactly_one_entry() {
        let entries: Vec<_> = dictionary_entries("forge:pedestal", &[]).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].meta(), 0);
        assert!(entries[0].states().is_empty());
    }

    #[test]
    fn metas_are_dense_and_ordered() {
        let properties = vec![
            BlockProperty::strings("half", &["bottom", "top", "double"]).unwrap(),
        ];
        let entries: Vec<_> = dictionary_entries("forge:slab", &properties).collect();
        assert_eq!(entries.len(), 3);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.meta(), i as u32);
        }
        assert_eq!(
            entries[2].states(),
            &[("half".to_string(), PropertyValue::from("double"))]
        );
    }

    #[test]
    fn reader_reports_missing_and_mistyped_states() {
        let states = vec![("open_bit".to_string(), PropertyValue::Bool(true))];
        let reader = StateReader::new(&states);
        assert!(reader.read_bool("open_bit").unwrap());
        assert!(matches!(
            reader.read_int("open_bit"),
            Err(ForgeError::StateType { .. })
        ));
        assert!(matches!(
            reader.read_bool("absent"),
            Err(ForgeError::MissingState { .. })
        ));
    }

    #[test]
    fn bounded_int_rejects_out_of_range() {
        let states = vec![("growth".to_string(), PropertyValue::Int(9))];
        let reader = StateReader::new(&states);
        assert!(matches!(
            reader.read_bounded_int("growth", 0, 7),
            Err(ForgeError::StateRange { .. })
        ));
    }

    #[test]
    fn hopper_facing_rejects_up() {
        let writer = StateWriter::new("forge:hopper");
        assert!(writer
            .write_facing_without_up("facing_direction", Facing::Up)
            .is_err());
    }
}

//! Tagged-tree document values.
//!
//! The client-facing block document is a small NBT-like tree: typed
//! scalars, ordered lists, and insertion-ordered compounds. Compounds
//! keep insertion order and replace keys in place so rendering the same
//! definition twice produces byte-identical output.

use crate::error::{ForgeError, ForgeResult};
use serde::{Deserialize, Serialize};

/// A single tree value. Scalars are limited to the four kinds the wire
/// contract distinguishes: byte (boolean carrier), 32-bit int, 32-bit
/// float, and UTF-8 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Tag {
    Byte(i8),
    Int(i32),
    Float(f32),
    Str(String),
    List(Vec<Tag>),
    Compound(Compound),
}

impl Tag {
    /// Boolean values travel as byte tags.
    pub fn bool(value: bool) -> Tag {
        Tag::Byte(value as i8)
    }

    pub fn str(value: impl Into<String>) -> Tag {
        Tag::Str(value.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Tag::Byte(_) => "byte",
            Tag::Int(_) => "int",
            Tag::Float(_) => "float",
            Tag::Str(_) => "string",
            Tag::List(_) => "list",
            Tag::Compound(_) => "compound",
        }
    }

    /// Deterministic binary form, used for palette blobs and descriptor
    /// payloads.
    pub fn to_bytes(&self) -> ForgeResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| ForgeError::Encode {
            message: e.to_string(),
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> ForgeResult<Tag> {
        bincode::deserialize(bytes).map_err(|e| ForgeError::Descriptor {
            message: e.to_string(),
        })
    }
}

impl From<Compound> for Tag {
    fn from(value: Compound) -> Tag {
        Tag::Compound(value)
    }
}

/// Insertion-ordered string-keyed map of tags.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Compound {
    entries: Vec<(String, Tag)>,
}

impl Compound {
    pub fn new() -> Compound {
        Compound::default()
    }

    /// Sets a key, replacing in place if it already exists so repeated
    /// renders keep a stable entry order.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Tag>) -> Compound {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

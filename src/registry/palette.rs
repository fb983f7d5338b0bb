//! Network-facing block palette.
//!
//! Append-only table of every registered block state keyed by
//! `(canonical name, meta)`, plus the rendered document blob per block.
//! Replaying an identical insertion is a no-op so workers can rebuild
//! the palette from the same descriptor stream; replaying a different
//! state for an existing key is a hard error.

use crate::block::state::BlockStateDictionaryEntry;
use crate::error::{ForgeError, ForgeResult};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub canonical_name: String,
    pub meta: u32,
    /// Encoded state compound (`{name, states}`).
    pub state_blob: Vec<u8>,
}

#[derive(Default)]
pub struct BlockPalette {
    entries: Vec<PaletteEntry>,
    index: FxHashMap<(String, u32), usize>,
    documents: Vec<(String, Vec<u8>)>,
    document_index: FxHashMap<String, usize>,
}

impl BlockPalette {
    pub fn new() -> BlockPalette {
        BlockPalette::default()
    }

    /// Appends every state of one block, in meta order.
    pub fn insert_states(&mut self, states: &[BlockStateDictionaryEntry]) -> ForgeResult<()> {
        for entry in states {
            let blob = entry.state_tag().to_bytes()?;
            let key = (entry.canonical_name().to_string(), entry.meta());
            if let Some(&existing) = self.index.get(&key) {
                if self.entries[existing].state_blob == blob {
                    continue;
                }
                return Err(ForgeError::PaletteConflict {
                    name: key.0,
                    meta: key.1,
                });
            }
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push(PaletteEntry {
                canonical_name: key.0,
                meta: key.1,
                state_blob: blob,
            });
        }
        Ok(())
    }

    /// Registers the rendered client document for one block.
    pub fn insert_document(&mut self, canonical_name: &str, blob: Vec<u8>) -> ForgeResult<()> {
        if let Some(&existing) = self.document_index.get(canonical_name) {
            if self.documents[existing].1 == blob {
                return Ok(());
            }
            return Err(ForgeError::PaletteConflict {
                name: canonical_name.to_string(),
                meta: 0,
            });
        }
        self.document_index
            .insert(canonical_name.to_string(), self.documents.len());
        self.documents.push((canonical_name.to_string(), blob));
        Ok(())
    }

    pub fn get(&self, canonical_name: &str, meta: u32) -> Option<&PaletteEntry> {
        self.index
            .get(&(canonical_name.to_string(), meta))
            .map(|&i| &self.entries[i])
    }

    pub fn document(&self, canonical_name: &str) -> Option<&[u8]> {
        self.document_index
            .get(canonical_name)
            .map(|&i| self.documents[i].1.as_slice())
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn state_count(&self) -> usize {
        self.entries.len()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::property::PropertyValue;

    fn entry(name: &str, meta: u32, age: i32) -> BlockStateDictionaryEntry {
        BlockStateDictionaryEntry::new(
            name,
            vec![("age".to_string(), PropertyValue::Int(age))],
            meta,
        )
    }

    #[test]
    fn identical_replay_is_idempotent() {
        let mut palette = BlockPalette::new();
        let states = vec![entry("forge:bush", 0, 0), entry("forge:bush", 1, 1)];
        palette.insert_states(&states).unwrap();
        palette.insert_states(&states).unwrap();
        assert_eq!(palette.state_count(), 2);
    }

    #[test]
    fn conflicting_replay_is_rejected() {
        let mut palette = BlockPalette::new();
        palette.insert_states(&[entry("forge:bush", 0, 0)]).unwrap();
        let err = palette
            .insert_states(&[entry("forge:bush", 0, 5)])
            .unwrap_err();
        assert!(matches!(err, ForgeError::PaletteConflict { meta: 0, .. }));
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut palette = BlockPalette::new();
        palette
            .insert_states(&[entry("forge:a", 0, 0), entry("forge:b", 0, 0)])
            .unwrap();
        let names: Vec<&str> = palette
            .entries()
            .iter()
            .map(|e| e.canonical_name.as_str())
            .collect();
        assert_eq!(names, vec!["forge:a", "forge:b"]);
    }
}

//! Item-form registration.
//!
//! Every block registers an item-type entry for its item form. Binding
//! the item codec into the host's item-data subsystem can fail (e.g. a
//! mapping already exists); that failure is the one best-effort case in
//! the pipeline, logged by the caller and skipped.

use crate::error::{ForgeError, ForgeResult};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTypeEntry {
    pub string_id: String,
    pub numeric_id: u32,
    pub component_based: bool,
    pub version: i32,
}

#[derive(Default)]
pub struct ItemRegistry {
    entries: Vec<ItemTypeEntry>,
    index: FxHashMap<String, usize>,
    codec_bound: FxHashSet<String>,
}

impl ItemRegistry {
    pub fn new() -> ItemRegistry {
        ItemRegistry::default()
    }

    pub fn register_entry(&mut self, entry: ItemTypeEntry) -> ForgeResult<()> {
        if let Some(&existing) = self.index.get(&entry.string_id) {
            if self.entries[existing] == entry {
                return Ok(());
            }
            return Err(ForgeError::PaletteConflict {
                name: entry.string_id,
                meta: 0,
            });
        }
        self.index.insert(entry.string_id.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Binds the item serializer/deserializer pair. Fails on a
    /// duplicate binding; the block pipeline treats that as best-effort.
    pub fn bind_codec(&mut self, string_id: &str) -> ForgeResult<()> {
        if !self.codec_bound.insert(string_id.to_string()) {
            return Err(ForgeError::PaletteConflict {
                name: string_id.to_string(),
                meta: 0,
            });
        }
        Ok(())
    }

    pub fn get(&self, string_id: &str) -> Option<&ItemTypeEntry> {
        self.index.get(string_id).map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[ItemTypeEntry] {
        &self.entries
    }

    pub fn has_codec(&self, string_id: &str) -> bool {
        self.codec_bound.contains(string_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> ItemTypeEntry {
        ItemTypeEntry {
            string_id: id.to_string(),
            numeric_id: 42,
            component_based: false,
            version: 0,
        }
    }

    #[test]
    fn duplicate_identical_entry_is_a_noop() {
        let mut items = ItemRegistry::new();
        items.register_entry(entry("forge:lamp")).unwrap();
        items.register_entry(entry("forge:lamp")).unwrap();
        assert_eq!(items.entries().len(), 1);
    }

    #[test]
    fn second_codec_binding_fails() {
        let mut items = ItemRegistry::new();
        items.bind_codec("forge:lamp").unwrap();
        assert!(items.bind_codec("forge:lamp").is_err());
        assert!(items.has_codec("forge:lamp"));
    }
}

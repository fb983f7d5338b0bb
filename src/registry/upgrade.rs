//! Legacy id/meta upgrade table.
//!
//! Backward-compatible lookups map `(canonical name, meta)` pairs from
//! old saves to full state compounds. Append-only with the same
//! idempotent-replay rules as the palette.

use crate::block::state::BlockStateDictionaryEntry;
use crate::error::{ForgeError, ForgeResult};
use rustc_hash::FxHashMap;

#[derive(Default)]
pub struct UpgradeTable {
    states: FxHashMap<(String, u32), Vec<u8>>,
    order: Vec<(String, u32)>,
}

impl UpgradeTable {
    pub fn new() -> UpgradeTable {
        UpgradeTable::default()
    }

    pub fn add_id_meta_mapping(&mut self, entry: &BlockStateDictionaryEntry) -> ForgeResult<()> {
        let key = (entry.canonical_name().to_string(), entry.meta());
        let blob = entry.state_tag().to_bytes()?;
        if let Some(existing) = self.states.get(&key) {
            if *existing == blob {
                return Ok(());
            }
            return Err(ForgeError::PaletteConflict {
                name: key.0,
                meta: key.1,
            });
        }
        self.order.push(key.clone());
        self.states.insert(key, blob);
        Ok(())
    }

    pub fn lookup(&self, canonical_name: &str, meta: u32) -> Option<&[u8]> {
        self.states
            .get(&(canonical_name.to_string(), meta))
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in insertion order, for replay comparison.
    pub fn keys(&self) -> &[(String, u32)] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::property::PropertyValue;

    #[test]
    fn lookup_returns_the_stored_state() {
        let mut table = UpgradeTable::new();
        let entry = BlockStateDictionaryEntry::new(
            "forge:slab",
            vec![(
                "minecraft:vertical_half".to_string(),
                PropertyValue::from("top"),
            )],
            1,
        );
        table.add_id_meta_mapping(&entry).unwrap();
        assert!(table.lookup("forge:slab", 1).is_some());
        assert!(table.lookup("forge:slab", 2).is_none());
        // Identical replay keeps a single row.
        table.add_id_meta_mapping(&entry).unwrap();
        assert_eq!(table.len(), 1);
    }
}

//! Process-wide registries populated during the registration phase.
//!
//! All four tables are append-only with idempotent replay: a worker
//! rebuilding them from the same descriptor stream, in the same order,
//! ends up with identical contents. The main thread uses the global
//! instance; workers construct their own private `BlockRegistries`.

pub mod creative;
pub mod ids;
pub mod item;
pub mod palette;
pub mod upgrade;

pub use creative::{CreativeCategory, CreativeGroup, CreativeInfo, CreativeRegistry};
pub use ids::{IdAllocator, BLOCK_IDS, FIRST_BLOCK_ID};
pub use item::{ItemRegistry, ItemTypeEntry};
pub use palette::{BlockPalette, PaletteEntry};
pub use upgrade::UpgradeTable;

use lazy_static::lazy_static;
use parking_lot::RwLock;

/// One complete set of registration tables.
#[derive(Default)]
pub struct BlockRegistries {
    pub palette: BlockPalette,
    pub upgrades: UpgradeTable,
    pub items: ItemRegistry,
    pub creative: CreativeRegistry,
}

impl BlockRegistries {
    pub fn new() -> BlockRegistries {
        BlockRegistries::default()
    }
}

lazy_static! {
    /// Registries used by main-thread registration.
    pub static ref REGISTRIES: RwLock<BlockRegistries> = RwLock::new(BlockRegistries::new());
}

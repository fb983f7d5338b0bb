//! Creative menu placement.
//!
//! A definition either carries explicit creative info or the registry
//! derives one from the shape classifier at finalize time.

use crate::block::instance::ShapeClass;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreativeCategory {
    Construction,
    Nature,
    Equipment,
    Items,
    None,
}

impl CreativeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CreativeCategory::Construction => "construction",
            CreativeCategory::Nature => "nature",
            CreativeCategory::Equipment => "equipment",
            CreativeCategory::Items => "items",
            CreativeCategory::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreativeGroup {
    None,
    Crop,
    Seed,
    Flower,
    Slab,
    Door,
    Fence,
    FenceGate,
    Walls,
    Trapdoor,
    GlassPane,
}

impl CreativeGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            CreativeGroup::None => "none",
            CreativeGroup::Crop => "itemgroup.name.crop",
            CreativeGroup::Seed => "itemgroup.name.seed",
            CreativeGroup::Flower => "itemgroup.name.flower",
            CreativeGroup::Slab => "itemgroup.name.slab",
            CreativeGroup::Door => "itemgroup.name.door",
            CreativeGroup::Fence => "itemgroup.name.fence",
            CreativeGroup::FenceGate => "itemgroup.name.fencegate",
            CreativeGroup::Walls => "itemgroup.name.walls",
            CreativeGroup::Trapdoor => "itemgroup.name.trapdoor",
            CreativeGroup::GlassPane => "itemgroup.name.glass",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreativeInfo {
    pub category: CreativeCategory,
    pub group: CreativeGroup,
    pub hidden: bool,
}

impl CreativeInfo {
    pub fn new(category: CreativeCategory, group: CreativeGroup) -> CreativeInfo {
        CreativeInfo {
            category,
            group,
            hidden: false,
        }
    }

    pub fn hidden(mut self) -> CreativeInfo {
        self.hidden = true;
        self
    }

    /// Placement heuristic keyed on the capability classifier, used
    /// when no explicit info was supplied.
    pub fn detect_from(shape: ShapeClass) -> CreativeInfo {
        match shape {
            ShapeClass::Crop { .. } | ShapeClass::Mushroom { .. } | ShapeClass::NetherPlant { .. } => {
                CreativeInfo::new(CreativeCategory::Nature, CreativeGroup::Crop)
            }
            ShapeClass::Flower => CreativeInfo::new(CreativeCategory::Nature, CreativeGroup::Flower),
            ShapeClass::Farmland => CreativeInfo::new(CreativeCategory::Nature, CreativeGroup::None),
            ShapeClass::Slab => {
                CreativeInfo::new(CreativeCategory::Construction, CreativeGroup::Slab)
            }
            ShapeClass::Door => {
                CreativeInfo::new(CreativeCategory::Construction, CreativeGroup::Door)
            }
            ShapeClass::Fence => {
                CreativeInfo::new(CreativeCategory::Construction, CreativeGroup::Fence)
            }
            ShapeClass::FenceGate => {
                CreativeInfo::new(CreativeCategory::Construction, CreativeGroup::FenceGate)
            }
            ShapeClass::Wall => {
                CreativeInfo::new(CreativeCategory::Construction, CreativeGroup::Walls)
            }
            ShapeClass::Trapdoor => {
                CreativeInfo::new(CreativeCategory::Construction, CreativeGroup::Trapdoor)
            }
            ShapeClass::GlassPane => {
                CreativeInfo::new(CreativeCategory::Construction, CreativeGroup::GlassPane)
            }
            ShapeClass::Hopper | ShapeClass::Lever => {
                CreativeInfo::new(CreativeCategory::Items, CreativeGroup::None)
            }
            ShapeClass::Head { .. } | ShapeClass::Ladder | ShapeClass::Plain => {
                CreativeInfo::new(CreativeCategory::Construction, CreativeGroup::None)
            }
        }
    }
}

/// Append-only record of creative placements, in registration order.
#[derive(Default)]
pub struct CreativeRegistry {
    placements: Vec<(String, CreativeInfo)>,
}

impl CreativeRegistry {
    pub fn new() -> CreativeRegistry {
        CreativeRegistry::default()
    }

    pub fn add(&mut self, string_id: &str, info: CreativeInfo) {
        if self
            .placements
            .iter()
            .any(|(id, existing)| id == string_id && *existing == info)
        {
            return;
        }
        self.placements.push((string_id.to_string(), info));
    }

    pub fn get(&self, string_id: &str) -> Option<&CreativeInfo> {
        self.placements
            .iter()
            .find(|(id, _)| id == string_id)
            .map(|(_, info)| info)
    }

    pub fn placements(&self) -> &[(String, CreativeInfo)] {
        &self.placements
    }
}

//! Shape-family recipes.
//!
//! Each recipe is a pure function over a builder and a reference
//! instance: it declares the family's state properties, installs the
//! matching codec pair, and adds one permutation per physically
//! meaningful combination. Recipes are independent and never call one
//! another; dispatch is an exhaustive match over the closed shape
//! classifier.

mod connect;
mod door;
mod misc;
mod plants;
mod slab;

pub use connect::{make_fence, make_fence_gate, make_glass_pane, make_wall};
pub use door::make_door;
pub use misc::{make_farmland, make_head, make_hopper, make_ladder, make_lever, make_trapdoor};
pub use plants::{make_crop, make_flower, make_mushroom, make_nether_plant};
pub use slab::make_slab;

use super::builder::BlockBuilder;
use super::instance::{BlockInstance, ShapeClass};
use super::state::StateCodec;
use crate::error::ForgeResult;

/// Applies the recipe matching the instance's shape class, if any.
pub fn apply_shape_defaults(
    builder: &mut BlockBuilder,
    block: &dyn BlockInstance,
) -> ForgeResult<()> {
    match block.shape() {
        ShapeClass::Plain => Ok(()),
        ShapeClass::Crop { .. } => make_crop(builder, block),
        ShapeClass::Mushroom { .. } => make_mushroom(builder, block),
        ShapeClass::NetherPlant { .. } => make_nether_plant(builder, block),
        ShapeClass::Flower => make_flower(builder, block),
        ShapeClass::Slab => make_slab(builder, block),
        ShapeClass::Door => make_door(builder, block),
        ShapeClass::Fence => make_fence(builder, block),
        ShapeClass::FenceGate => make_fence_gate(builder, block),
        ShapeClass::Wall => make_wall(builder, block),
        ShapeClass::Trapdoor => make_trapdoor(builder, block),
        ShapeClass::Hopper => make_hopper(builder, block),
        ShapeClass::Head { .. } => make_head(builder, block),
        ShapeClass::Ladder => make_ladder(builder, block),
        ShapeClass::Farmland => make_farmland(builder, block),
        ShapeClass::GlassPane => make_glass_pane(builder, block),
        ShapeClass::Lever => make_lever(builder, block),
    }
}

/// Rebuilds the codec pair for a shape family from plain data. Workers
/// use this to rebind codecs after descriptor replay, since closures
/// never cross the isolation boundary.
pub fn codec_for(
    shape: ShapeClass,
    string_id: &str,
    reference: &dyn BlockInstance,
) -> Option<StateCodec> {
    match shape {
        ShapeClass::Plain | ShapeClass::Flower | ShapeClass::Farmland => None,
        ShapeClass::Crop { max_age } => Some(plants::crop_codec(string_id, reference, max_age)),
        ShapeClass::Mushroom { max_age } => {
            Some(plants::mushroom_codec(string_id, reference, max_age))
        }
        ShapeClass::NetherPlant { max_age } => {
            Some(plants::nether_plant_codec(string_id, reference, max_age))
        }
        ShapeClass::Slab => Some(slab::codec(string_id, reference)),
        ShapeClass::Door => Some(door::codec(string_id, reference)),
        ShapeClass::Fence => Some(connect::fence_codec(string_id, reference)),
        ShapeClass::FenceGate => Some(connect::fence_gate_codec(string_id, reference)),
        ShapeClass::Wall => Some(connect::wall_codec(string_id, reference)),
        ShapeClass::GlassPane => Some(connect::glass_pane_codec(string_id, reference)),
        ShapeClass::Trapdoor => Some(misc::trapdoor_codec(string_id, reference)),
        ShapeClass::Hopper => Some(misc::hopper_codec(string_id, reference)),
        ShapeClass::Head { max_rotation } => {
            Some(misc::head_codec(string_id, reference, max_rotation))
        }
        ShapeClass::Ladder => Some(misc::ladder_codec(string_id, reference)),
        ShapeClass::Lever => Some(misc::lever_codec(string_id, reference)),
    }
}

pub(crate) fn install_codec(builder: &mut BlockBuilder, codec: StateCodec) {
    builder.set_serializer(codec.serializer);
    builder.set_deserializer(codec.deserializer);
}

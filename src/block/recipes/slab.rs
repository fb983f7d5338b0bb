//! Slab recipe: bottom/top/double thirds of a block.

use super::install_codec;
use crate::block::builder::BlockBuilder;
use crate::block::component::{
    component_ids, geometry_ids, BoxGeometry, Component, Geometry, Material, RenderMethod,
    Transformation,
};
use crate::block::instance::{BlockInstance, ShapeClass, ShapeState, SlabHalf};
use crate::block::permutation::Permutation;
use crate::block::property::{state_names, BlockProperty};
use crate::block::state::{Deserializer, Serializer, StateCodec, StateWriter};
use crate::error::{ForgeError, ForgeResult};
use glam::Vec3;

pub fn make_slab(builder: &mut BlockBuilder, block: &dyn BlockInstance) -> ForgeResult<()> {
    if block.shape() != ShapeClass::Slab {
        return Err(ForgeError::ShapeMismatch { recipe: "slab" });
    }
    install_codec(builder, codec(builder.string_id(), block));
    builder.add_property(BlockProperty::strings(
        state_names::MC_VERTICAL_HALF,
        &["bottom", "top", "double"],
    )?)?;

    let geometry = Geometry::new(geometry_ids::SLAB).build();
    let material = match builder.get_component(component_ids::MATERIAL_INSTANCES) {
        Some(existing) => existing.clone(),
        None => Component::material_instances(&[Material::new(
            builder.name(),
            RenderMethod::Opaque,
        )]),
    };
    builder.add_component(geometry.clone());
    builder.add_component(Component::item_visual(&geometry, &material));

    builder.add_permutation(
        Permutation::when(state_names::MC_VERTICAL_HALF, "bottom")
            .with(Component::collision_box(true, &[BoxGeometry::slab()]))
            .with(Component::selection_box(true, &[BoxGeometry::slab()]))
            .with(Component::transformation(Transformation::translation(
                Vec3::new(0.0, -0.25, 0.0),
            ))),
    );
    builder.add_permutation(
        Permutation::when(state_names::MC_VERTICAL_HALF, "top")
            .with(Component::collision_box(true, &[BoxGeometry::slab()]))
            .with(Component::selection_box(true, &[BoxGeometry::slab()]))
            .with(Component::transformation(Transformation::translation(
                Vec3::new(0.0, 0.25, 0.0),
            ))),
    );
    // The double half is a full block again, no visual shift.
    builder.add_permutation(
        Permutation::when(state_names::MC_VERTICAL_HALF, "double")
            .with(Geometry::full_block().build())
            .with(Component::collision_box(true, &[BoxGeometry::full()]))
            .with(Component::selection_box(true, &[BoxGeometry::full()])),
    );
    Ok(())
}

pub(super) fn codec(string_id: &str, reference: &dyn BlockInstance) -> StateCodec {
    let id = string_id.to_string();
    let serializer: Serializer = Box::new(move |block| {
        let ShapeState::Slab { half } = block.shape_state() else {
            return Err(ForgeError::ShapeMismatch { recipe: "slab" });
        };
        Ok(StateWriter::new(&id).write_str(state_names::MC_VERTICAL_HALF, half.as_str()))
    });
    let template = reference.boxed_clone();
    let deserializer: Deserializer = Box::new(move |reader| {
        let half = SlabHalf::from_str(reader.read_str(state_names::MC_VERTICAL_HALF)?)?;
        template.with_shape_state(ShapeState::Slab { half })
    });
    StateCodec {
        serializer,
        deserializer,
    }
}

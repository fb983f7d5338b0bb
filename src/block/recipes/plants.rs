//! Plant recipes: crops, mushroom-like plants, nether-wart-style
//! plants, and flowering plants.

use super::install_codec;
use crate::block::builder::BlockBuilder;
use crate::block::component::{
    geometry_ids, BoxGeometry, Component, Geometry, Material, RenderMethod,
};
use crate::block::instance::{BlockInstance, ShapeClass, ShapeState};
use crate::block::permutation::Permutation;
use crate::block::property::{state_names, BlockProperty};
use crate::block::state::{Deserializer, Serializer, StateCodec, StateWriter};
use crate::error::{ForgeError, ForgeResult};
use glam::Vec3;

pub fn make_crop(builder: &mut BlockBuilder, block: &dyn BlockInstance) -> ForgeResult<()> {
    let ShapeClass::Crop { max_age } = block.shape() else {
        return Err(ForgeError::ShapeMismatch { recipe: "crop" });
    };
    install_codec(builder, crop_codec(builder.string_id(), block, max_age));
    builder.add_property(BlockProperty::int_range(state_names::GROWTH, 0..=max_age)?)?;
    builder.add_component(Geometry::new(geometry_ids::CROP).build());
    add_stage_permutations(builder, state_names::GROWTH, max_age);
    Ok(())
}

pub fn make_mushroom(builder: &mut BlockBuilder, block: &dyn BlockInstance) -> ForgeResult<()> {
    let ShapeClass::Mushroom { max_age } = block.shape() else {
        return Err(ForgeError::ShapeMismatch { recipe: "mushroom" });
    };
    install_codec(builder, mushroom_codec(builder.string_id(), block, max_age));
    builder.add_property(BlockProperty::int_range(state_names::GROWTH, 0..=max_age)?)?;
    builder.add_component(Geometry::new("geometry.custom_crops_2").build());
    add_stage_permutations(builder, state_names::GROWTH, max_age);
    Ok(())
}

pub fn make_nether_plant(
    builder: &mut BlockBuilder,
    block: &dyn BlockInstance,
) -> ForgeResult<()> {
    let ShapeClass::NetherPlant { max_age } = block.shape() else {
        return Err(ForgeError::ShapeMismatch {
            recipe: "nether plant",
        });
    };
    install_codec(
        builder,
        nether_plant_codec(builder.string_id(), block, max_age),
    );
    builder.add_property(BlockProperty::int_range(state_names::AGE, 0..=max_age)?)?;
    builder.add_component(Geometry::new(geometry_ids::NETHER_WART).build());
    add_stage_permutations(builder, state_names::AGE, max_age);
    Ok(())
}

/// Flowers are stateless; the recipe only shapes visuals and placement.
pub fn make_flower(builder: &mut BlockBuilder, block: &dyn BlockInstance) -> ForgeResult<()> {
    if block.shape() != ShapeClass::Flower {
        return Err(ForgeError::ShapeMismatch { recipe: "flower" });
    }
    let geometry = Geometry::new(geometry_ids::CROSS).build();
    let material = Component::material_instances(&[Material::new(
        builder.name(),
        RenderMethod::AlphaTestSingleSided,
    )
    .ambient_occlusion(false)
    .face_dimming(false)]);

    builder.add_component(geometry.clone());
    builder.add_component(material.clone());
    builder.add_component(Component::selection_box(true, &[BoxGeometry::flower()]));
    builder.add_component(Component::light_dampening(0));
    builder.add_component(Component::flower_pottable());
    builder.add_component(Component::embedded_visual(&geometry, &material));
    builder.add_component(Component::random_offset(
        Vec3::new(-4.0, 1.0, -4.0),
        Vec3::new(4.0, 0.0, 4.0),
    ));
    Ok(())
}

/// One permutation per growth stage: the selection box and texture
/// track the stage.
fn add_stage_permutations(builder: &mut BlockBuilder, property: &str, max_age: i32) {
    let texture_base = builder.name().to_string();
    for age in 0..=max_age {
        builder.add_permutation(
            Permutation::when(property, age)
                .with(Component::selection_box(
                    true,
                    &[BoxGeometry::crop_stage(age, max_age)],
                ))
                .with(Component::material_instances(&[Material::new(
                    format!("{}_{}", texture_base, age),
                    RenderMethod::AlphaTest,
                )])),
        );
    }
}

pub(super) fn crop_codec(
    string_id: &str,
    reference: &dyn BlockInstance,
    max_age: i32,
) -> StateCodec {
    let id = string_id.to_string();
    let serializer: Serializer = Box::new(move |block| {
        let ShapeState::Crop { age } = block.shape_state() else {
            return Err(ForgeError::ShapeMismatch { recipe: "crop" });
        };
        Ok(StateWriter::new(&id).write_int(state_names::GROWTH, age))
    });
    let template = reference.boxed_clone();
    let deserializer: Deserializer = Box::new(move |reader| {
        let age = reader.read_bounded_int(state_names::GROWTH, 0, max_age)?;
        template.with_shape_state(ShapeState::Crop { age })
    });
    StateCodec {
        serializer,
        deserializer,
    }
}

pub(super) fn mushroom_codec(
    string_id: &str,
    reference: &dyn BlockInstance,
    max_age: i32,
) -> StateCodec {
    let id = string_id.to_string();
    let serializer: Serializer = Box::new(move |block| {
        let ShapeState::Mushroom { age } = block.shape_state() else {
            return Err(ForgeError::ShapeMismatch { recipe: "mushroom" });
        };
        Ok(StateWriter::new(&id).write_int(state_names::GROWTH, age))
    });
    let template = reference.boxed_clone();
    let deserializer: Deserializer = Box::new(move |reader| {
        let age = reader.read_bounded_int(state_names::GROWTH, 0, max_age)?;
        template.with_shape_state(ShapeState::Mushroom { age })
    });
    StateCodec {
        serializer,
        deserializer,
    }
}

pub(super) fn nether_plant_codec(
    string_id: &str,
    reference: &dyn BlockInstance,
    max_age: i32,
) -> StateCodec {
    let id = string_id.to_string();
    let serializer: Serializer = Box::new(move |block| {
        let ShapeState::NetherPlant { age } = block.shape_state() else {
            return Err(ForgeError::ShapeMismatch {
                recipe: "nether plant",
            });
        };
        Ok(StateWriter::new(&id).write_int(state_names::AGE, age))
    });
    let template = reference.boxed_clone();
    let deserializer: Deserializer = Box::new(move |reader| {
        let age = reader.read_bounded_int(state_names::AGE, 0, max_age)?;
        template.with_shape_state(ShapeState::NetherPlant { age })
    });
    StateCodec {
        serializer,
        deserializer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::basic::BasicBlock;
    use crate::block::state::StateReader;

    #[test]
    fn crop_recipe_declares_one_permutation_per_stage() {
        let block = BasicBlock::new(ShapeClass::Crop { max_age: 7 });
        let mut builder = BlockBuilder::new("forge:wheat").unwrap();
        make_crop(&mut builder, &block).unwrap();
        assert_eq!(builder.properties().len(), 1);
        assert_eq!(builder.properties()[0].values().len(), 8);
        assert_eq!(builder.permutations().len(), 8);
        assert_eq!(
            builder.permutations()[3].condition(),
            "q.block_state('growth') == 3"
        );
    }

    #[test]
    fn crop_recipe_rejects_wrong_shape() {
        let block = BasicBlock::new(ShapeClass::Slab);
        let mut builder = BlockBuilder::new("forge:notacrop").unwrap();
        assert!(matches!(
            make_crop(&mut builder, &block),
            Err(ForgeError::ShapeMismatch { recipe: "crop" })
        ));
    }

    #[test]
    fn crop_codec_round_trips_every_stage() {
        let reference = BasicBlock::new(ShapeClass::Crop { max_age: 7 });
        let codec = crop_codec("forge:wheat", &reference, 7);
        for age in 0..=7 {
            let instance = reference
                .with_shape_state(ShapeState::Crop { age })
                .unwrap();
            let writer = (codec.serializer)(&*instance).unwrap();
            let reader = StateReader::new(writer.states());
            let decoded = (codec.deserializer)(&reader).unwrap();
            assert_eq!(decoded.shape_state(), ShapeState::Crop { age });
        }
    }

    #[test]
    fn crop_codec_rejects_overgrown_state() {
        let reference = BasicBlock::new(ShapeClass::Crop { max_age: 3 });
        let codec = crop_codec("forge:beets", &reference, 3);
        let states = vec![(
            state_names::GROWTH.to_string(),
            crate::block::property::PropertyValue::Int(9),
        )];
        let reader = StateReader::new(&states);
        assert!(matches!(
            (codec.deserializer)(&reader),
            Err(ForgeError::StateRange { .. })
        ));
    }

    #[test]
    fn flower_recipe_is_stateless() {
        let block = BasicBlock::new(ShapeClass::Flower);
        let mut builder = BlockBuilder::new("forge:rose").unwrap();
        make_flower(&mut builder, &block).unwrap();
        assert!(builder.properties().is_empty());
        assert!(builder.permutations().is_empty());
        assert!(builder.has_component(crate::block::component::component_ids::FLOWER_POTTABLE));
    }
}

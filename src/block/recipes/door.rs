//! Door recipe: two-block-tall hinged panels.

use super::install_codec;
use crate::block::builder::BlockBuilder;
use crate::block::component::{
    geometry_ids, BoxGeometry, Component, Geometry, Material, RenderMethod, Transformation,
};
use crate::block::instance::{BlockInstance, Cardinal, ShapeClass, ShapeState};
use crate::block::permutation::Permutation;
use crate::block::property::{state_names, BlockProperty, PropertyValue};
use crate::block::state::{Deserializer, Serializer, StateCodec, StateWriter};
use crate::error::{ForgeError, ForgeResult};
use glam::Vec3;

pub fn make_door(builder: &mut BlockBuilder, block: &dyn BlockInstance) -> ForgeResult<()> {
    if block.shape() != ShapeClass::Door {
        return Err(ForgeError::ShapeMismatch { recipe: "door" });
    }
    install_codec(builder, codec(builder.string_id(), block));

    builder.add_property(BlockProperty::strings(
        state_names::MC_CARDINAL_DIRECTION,
        &["north", "south", "west", "east"],
    )?)?;
    builder.add_property(BlockProperty::bit(state_names::UPPER_BLOCK_BIT))?;
    builder.add_property(BlockProperty::bit(state_names::DOOR_HINGE_BIT))?;
    builder.add_property(BlockProperty::bit(state_names::OPEN_BIT))?;

    builder.add_component(Component::custom_components());
    builder.add_component(
        Geometry::new(geometry_ids::DOOR)
            .bone("open", format!("q.block_state('{}')", state_names::OPEN_BIT))
            .bone(
                "close",
                format!("!q.block_state('{}')", state_names::OPEN_BIT),
            )
            .build(),
    );

    let texture_base = builder.name().to_string();
    for facing in Cardinal::ALL {
        for upper in [false, true] {
            for open in [false, true] {
                let half_texture = if upper {
                    format!("{}_upper", texture_base)
                } else {
                    format!("{}_lower", texture_base)
                };
                let panel = if open {
                    BoxGeometry::new(Vec3::new(-8.0, 0.0, 5.0), Vec3::new(16.0, 16.0, 3.0))
                } else {
                    BoxGeometry::new(Vec3::new(-8.0, 0.0, -8.0), Vec3::new(3.0, 16.0, 16.0))
                };
                builder.add_permutation(
                    Permutation::when_all([
                        (
                            state_names::MC_CARDINAL_DIRECTION,
                            PropertyValue::from(facing.as_str()),
                        ),
                        (state_names::UPPER_BLOCK_BIT, PropertyValue::from(upper)),
                        (state_names::OPEN_BIT, PropertyValue::from(open)),
                    ])
                    .with(Component::material_instances(&[Material::new(
                        half_texture,
                        RenderMethod::AlphaTestSingleSided,
                    )]))
                    .with(Component::collision_box(true, &[panel]))
                    .with(Component::selection_box(true, &[panel]))
                    .with(Component::transformation(Transformation::rotation(
                        door_rotation(facing),
                    ))),
                );
            }
        }
    }
    Ok(())
}

fn door_rotation(facing: Cardinal) -> Vec3 {
    match facing {
        Cardinal::North => Vec3::ZERO,
        Cardinal::South => Vec3::new(0.0, 180.0, 0.0),
        Cardinal::West => Vec3::new(0.0, 90.0, 0.0),
        Cardinal::East => Vec3::new(0.0, 270.0, 0.0),
    }
}

pub(super) fn codec(string_id: &str, reference: &dyn BlockInstance) -> StateCodec {
    let id = string_id.to_string();
    let serializer: Serializer = Box::new(move |block| {
        let ShapeState::Door {
            facing,
            upper,
            hinge,
            open,
        } = block.shape_state()
        else {
            return Err(ForgeError::ShapeMismatch { recipe: "door" });
        };
        Ok(StateWriter::new(&id)
            .write_str(state_names::MC_CARDINAL_DIRECTION, facing.as_str())
            .write_bool(state_names::UPPER_BLOCK_BIT, upper)
            .write_bool(state_names::DOOR_HINGE_BIT, hinge)
            .write_bool(state_names::OPEN_BIT, open))
    });
    let template = reference.boxed_clone();
    let deserializer: Deserializer = Box::new(move |reader| {
        let facing = Cardinal::from_str(reader.read_str(state_names::MC_CARDINAL_DIRECTION)?)?;
        let upper = reader.read_bool(state_names::UPPER_BLOCK_BIT)?;
        let hinge = reader.read_bool(state_names::DOOR_HINGE_BIT)?;
        let open = reader.read_bool(state_names::OPEN_BIT)?;
        template.with_shape_state(ShapeState::Door {
            facing,
            upper,
            hinge,
            open,
        })
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
    use crate::block::state::{dictionary_entries, StateReader};

    #[test]
    fn door_declares_four_properties_and_sixteen_permutations() {
        let block = BasicBlock::new(ShapeClass::Door);
        let mut builder = BlockBuilder::new("forge:oak_door").unwrap();
        make_door(&mut builder, &block).unwrap();
        assert_eq!(builder.properties().len(), 4);
        // Hinge only affects serialization, not visuals.
        assert_eq!(builder.permutations().len(), 16);
        assert_eq!(
            builder.permutations()[0].condition(),
            "q.block_state('minecraft:cardinal_direction') == 'north' \
             && q.block_state('upper_block_bit') == 0 \
             && q.block_state('open_bit') == 0"
        );
    }

    #[test]
    fn door_dictionary_has_thirty_two_entries() {
        let block = BasicBlock::new(ShapeClass::Door);
        let mut builder = BlockBuilder::new("forge:oak_door").unwrap();
        make_door(&mut builder, &block).unwrap();
        let entries: Vec<_> =
            dictionary_entries(builder.string_id(), builder.properties()).collect();
        assert_eq!(entries.len(), 32);
        // Last property varies fastest.
        assert_eq!(entries[0].states()[3].1, PropertyValue::Bool(false));
        assert_eq!(entries[1].states()[3].1, PropertyValue::Bool(true));
    }

    #[test]
    fn codec_round_trips_hinge_and_facing() {
        let reference = BasicBlock::new(ShapeClass::Door);
        let codec = codec("forge:oak_door", &reference);
        for facing in Cardinal::ALL {
            for hinge in [false, true] {
                let state = ShapeState::Door {
                    facing,
                    upper: true,
                    hinge,
                    open: false,
                };
                let instance = reference.with_shape_state(state.clone()).unwrap();
                let writer = (codec.serializer)(&*instance).unwrap();
                let reader = StateReader::new(writer.states());
                let decoded = (codec.deserializer)(&reader).unwrap();
                assert_eq!(decoded.shape_state(), state);
            }
        }
    }

    #[test]
    fn serializer_rejects_foreign_state() {
        let reference = BasicBlock::new(ShapeClass::Door);
        let codec = codec("forge:oak_door", &reference);
        let stranger = BasicBlock::new(ShapeClass::Plain);
        assert!(matches!(
            (codec.serializer)(&stranger),
            Err(ForgeError::ShapeMismatch { recipe: "door" })
        ));
    }
}

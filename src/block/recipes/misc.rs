//! Remaining shape recipes: trapdoors, hoppers, heads, ladders,
//! farmland, and levers.

use super::install_codec;
use crate::block::builder::BlockBuilder;
use crate::block::component::{
    geometry_ids, BoxGeometry, Component, Geometry, Material, MaterialTarget, RenderMethod,
    Transformation,
};
use crate::block::instance::{
    BlockInstance, Cardinal, Facing, LeverFacing, ShapeClass, ShapeState,
};
use crate::block::permutation::Permutation;
use crate::block::property::{state_names, BlockProperty, PropertyValue};
use crate::block::state::{Deserializer, Serializer, StateCodec, StateWriter};
use crate::error::{ForgeError, ForgeResult};
use glam::Vec3;

/// Trapdoor direction encoding: 0 east, 1 west, 2 south, 3 north,
/// which is `5 - facing_index`.
pub fn make_trapdoor(builder: &mut BlockBuilder, block: &dyn BlockInstance) -> ForgeResult<()> {
    if block.shape() != ShapeClass::Trapdoor {
        return Err(ForgeError::ShapeMismatch { recipe: "trapdoor" });
    }
    install_codec(builder, trapdoor_codec(builder.string_id(), block));

    builder.add_property(BlockProperty::int_range(state_names::DIRECTION, 0..=3)?)?;
    builder.add_property(BlockProperty::int_range(
        state_names::UPSIDE_DOWN_BIT,
        0..=1,
    )?)?;
    builder.add_property(BlockProperty::int_range(state_names::OPEN_BIT, 0..=1)?)?;

    builder.add_component(Component::custom_components());
    let material = Component::material_instances(&[Material::new(
        builder.name(),
        RenderMethod::AlphaTestSingleSided,
    )]);
    builder.add_component(material.clone());
    // The item form always shows the closed panel.
    builder.add_component(Component::item_visual(
        &Geometry::new(geometry_ids::TRAPDOOR)
            .bone("open", "false")
            .bone("close", "true")
            .build(),
        &material,
    ));
    builder.add_component(
        Geometry::new(geometry_ids::TRAPDOOR)
            .bone(
                "open",
                format!("q.block_state('{}') == 1", state_names::OPEN_BIT),
            )
            .bone(
                "close",
                format!("q.block_state('{}') == 0", state_names::OPEN_BIT),
            )
            .build(),
    );

    for direction in 0..=3 {
        for open in 0..=1 {
            for top in 0..=1 {
                let panel = if open == 0 {
                    BoxGeometry::new(Vec3::new(-8.0, 0.0, -8.0), Vec3::new(16.0, 3.0, 16.0))
                } else {
                    BoxGeometry::new(Vec3::new(-8.0, 0.0, -8.0), Vec3::new(3.0, 16.0, 16.0))
                };
                let translation = if top == 1 && open == 0 {
                    Vec3::new(0.0, 0.813, 0.0)
                } else {
                    Vec3::ZERO
                };
                builder.add_permutation(
                    Permutation::when_all([
                        (state_names::DIRECTION, direction),
                        (state_names::OPEN_BIT, open),
                        (state_names::UPSIDE_DOWN_BIT, top),
                    ])
                    .with(Component::collision_box(true, &[panel]))
                    .with(Component::selection_box(true, &[panel]))
                    .with(Component::transformation(Transformation::new(
                        trapdoor_rotation(direction),
                        translation,
                    ))),
                );
            }
        }
    }
    Ok(())
}

fn trapdoor_rotation(direction: i32) -> Vec3 {
    match direction {
        0 => Vec3::new(0.0, 180.0, 0.0),
        1 => Vec3::ZERO,
        2 => Vec3::new(0.0, 90.0, 0.0),
        _ => Vec3::new(0.0, 270.0, 0.0),
    }
}

/// Hoppers have no permutations; the geometry bones select the spout
/// per facing.
pub fn make_hopper(builder: &mut BlockBuilder, block: &dyn BlockInstance) -> ForgeResult<()> {
    if block.shape() != ShapeClass::Hopper {
        return Err(ForgeError::ShapeMismatch { recipe: "hopper" });
    }
    install_codec(builder, hopper_codec(builder.string_id(), block));

    builder.add_component(Component::on_interact(""));
    builder.add_property(BlockProperty::int_range(
        state_names::FACING_DIRECTION,
        0..=5,
    )?)?;
    builder.add_property(BlockProperty::int_range(state_names::TOGGLE_BIT, 0..=1)?)?;

    let facing_bone = |index: i32| {
        format!(
            "q.block_state('{}') == {}",
            state_names::FACING_DIRECTION,
            index
        )
    };
    builder.add_component(
        Geometry::new(geometry_ids::HOPPER)
            .bone("ground", facing_bone(0))
            .bone("north", facing_bone(2))
            .bone("south", facing_bone(3))
            .bone("west", facing_bone(4))
            .bone("east", facing_bone(5))
            .build(),
    );

    let name = builder.name().to_string();
    builder.add_component(Component::material_instances(&[
        Material::new(format!("{}_top", name), RenderMethod::AlphaTestSingleSided)
            .target(MaterialTarget::Up),
        Material::new(format!("{}_inside", name), RenderMethod::AlphaTest)
            .target(MaterialTarget::Down),
        Material::new(format!("{}_outside", name), RenderMethod::AlphaTest)
            .target(MaterialTarget::North),
        Material::new(format!("{}_outside", name), RenderMethod::AlphaTest)
            .target(MaterialTarget::South),
        Material::new(format!("{}_outside", name), RenderMethod::AlphaTest)
            .target(MaterialTarget::West),
        Material::new(format!("{}_outside", name), RenderMethod::AlphaTest)
            .target(MaterialTarget::East),
    ]));
    Ok(())
}

pub fn make_head(builder: &mut BlockBuilder, block: &dyn BlockInstance) -> ForgeResult<()> {
    let ShapeClass::Head { max_rotation } = block.shape() else {
        return Err(ForgeError::ShapeMismatch { recipe: "head" });
    };
    install_codec(
        builder,
        head_codec(builder.string_id(), block, max_rotation),
    );

    // Heads never face down.
    builder.add_property(BlockProperty::new(
        state_names::FACING_DIRECTION,
        (1..=5).map(PropertyValue::Int).collect(),
    )?)?;
    builder.add_property(BlockProperty::int_range(
        state_names::ROTATION,
        0..=max_rotation,
    )?)?;

    let geometry = Geometry::new(geometry_ids::MOBHEAD).build();
    let material =
        Component::material_instances(&[Material::new(builder.name(), RenderMethod::Blend)]);
    builder.add_component(geometry.clone());
    builder.add_component(material.clone());
    builder.add_component(Component::item_visual(&geometry, &material));

    for facing in 1..=5 {
        for rotation in 0..=max_rotation {
            builder.add_permutation(
                Permutation::when_all([
                    (state_names::FACING_DIRECTION, facing),
                    (state_names::ROTATION, rotation),
                ])
                .with(Component::collision_box(true, &[BoxGeometry::mobhead()]))
                .with(Component::selection_box(true, &[BoxGeometry::mobhead()]))
                .with(Component::transformation(Transformation::translation(
                    head_offset(facing),
                ))),
            );
        }
    }
    Ok(())
}

/// Wall-mounted heads shift toward the supporting face and up off the
/// floor anchor.
fn head_offset(facing: i32) -> Vec3 {
    if facing == 1 {
        return Vec3::ZERO;
    }
    let x = match facing {
        4 => 0.24,
        5 => -0.24,
        _ => 0.0,
    };
    let z = match facing {
        2 => 0.24,
        3 => -0.24,
        _ => 0.0,
    };
    Vec3::new(x, 0.25, z)
}

pub fn make_ladder(builder: &mut BlockBuilder, block: &dyn BlockInstance) -> ForgeResult<()> {
    if block.shape() != ShapeClass::Ladder {
        return Err(ForgeError::ShapeMismatch { recipe: "ladder" });
    }
    install_codec(builder, ladder_codec(builder.string_id(), block));

    builder.add_property(BlockProperty::int_range(
        state_names::FACING_DIRECTION,
        2..=5,
    )?)?;
    builder.add_component(Geometry::new(geometry_ids::LADDER).build());

    for facing in Cardinal::ALL {
        let rotation = match facing {
            Cardinal::North => Vec3::ZERO,
            Cardinal::South => Vec3::new(0.0, 180.0, 0.0),
            Cardinal::West => Vec3::new(0.0, 90.0, 0.0),
            Cardinal::East => Vec3::new(0.0, 270.0, 0.0),
        };
        builder.add_permutation(
            Permutation::when(state_names::FACING_DIRECTION, facing.facing_index())
                .with(Component::collision_box(true, &[BoxGeometry::ladder()]))
                .with(Component::selection_box(true, &[BoxGeometry::ladder()]))
                .with(Component::transformation(Transformation::rotation(rotation))),
        );
    }
    Ok(())
}

/// Farmland is stateless: a 15-high soil block with a tinted top.
pub fn make_farmland(builder: &mut BlockBuilder, block: &dyn BlockInstance) -> ForgeResult<()> {
    if block.shape() != ShapeClass::Farmland {
        return Err(ForgeError::ShapeMismatch { recipe: "farmland" });
    }
    builder.add_component(Geometry::new(geometry_ids::FARMLAND).build());
    builder.add_component(Component::material_instances(&[
        Material::new(
            format!("{}_up", builder.name()),
            RenderMethod::AlphaTestSingleSided,
        )
        .target(MaterialTarget::Up),
        Material::new("dirt", RenderMethod::AlphaTestSingleSided),
    ]));
    builder.add_component(Component::selection_box(true, &[BoxGeometry::farmland()]));
    builder.add_component(Component::collision_box(true, &[BoxGeometry::farmland()]));
    builder.add_component(Component::custom_components());
    Ok(())
}

pub fn make_lever(builder: &mut BlockBuilder, block: &dyn BlockInstance) -> ForgeResult<()> {
    if block.shape() != ShapeClass::Lever {
        return Err(ForgeError::ShapeMismatch { recipe: "lever" });
    }
    install_codec(builder, lever_codec(builder.string_id(), block));

    builder.add_property(BlockProperty::new(
        state_names::LEVER_DIRECTION,
        LeverFacing::ALL
            .iter()
            .map(|f| PropertyValue::from(f.as_str()))
            .collect(),
    )?)?;
    builder.add_property(BlockProperty::bit(state_names::OPEN_BIT))?;
    builder.add_component(Geometry::new(geometry_ids::LEVER).build());

    for facing in LeverFacing::ALL {
        for open in [false, true] {
            builder.add_permutation(
                Permutation::when_all([
                    (
                        state_names::LEVER_DIRECTION,
                        PropertyValue::from(facing.as_str()),
                    ),
                    (state_names::OPEN_BIT, PropertyValue::from(open)),
                ])
                .with(Component::collision_box(true, &[BoxGeometry::flower()]))
                .with(Component::selection_box(true, &[BoxGeometry::flower()]))
                .with(Component::transformation(Transformation::rotation(
                    lever_rotation(facing),
                ))),
            );
        }
    }
    Ok(())
}

fn lever_rotation(facing: LeverFacing) -> Vec3 {
    match facing {
        LeverFacing::DownAxisZ => Vec3::ZERO,
        LeverFacing::DownAxisX => Vec3::new(0.0, 0.0, 90.0),
        LeverFacing::UpAxisZ => Vec3::new(0.0, 0.0, 180.0),
        LeverFacing::UpAxisX => Vec3::new(0.0, 0.0, 270.0),
        LeverFacing::North => Vec3::new(0.0, 90.0, 0.0),
        LeverFacing::South => Vec3::new(0.0, 270.0, 0.0),
        LeverFacing::West => Vec3::new(0.0, 180.0, 0.0),
        LeverFacing::East => Vec3::ZERO,
    }
}

pub(super) fn trapdoor_codec(string_id: &str, reference: &dyn BlockInstance) -> StateCodec {
    let id = string_id.to_string();
    let serializer: Serializer = Box::new(move |block| {
        let ShapeState::Trapdoor {
            direction,
            top,
            open,
        } = block.shape_state()
        else {
            return Err(ForgeError::ShapeMismatch { recipe: "trapdoor" });
        };
        Ok(StateWriter::new(&id)
            .write_int(state_names::DIRECTION, direction)
            .write_int(state_names::UPSIDE_DOWN_BIT, top as i32)
            .write_int(state_names::OPEN_BIT, open as i32))
    });
    let template = reference.boxed_clone();
    let deserializer: Deserializer = Box::new(move |reader| {
        let direction = reader.read_bounded_int(state_names::DIRECTION, 0, 3)?;
        let top = reader.read_bool(state_names::UPSIDE_DOWN_BIT)?;
        let open = reader.read_bool(state_names::OPEN_BIT)?;
        template.with_shape_state(ShapeState::Trapdoor {
            direction,
            top,
            open,
        })
    });
    StateCodec {
        serializer,
        deserializer,
    }
}

pub(super) fn hopper_codec(string_id: &str, reference: &dyn BlockInstance) -> StateCodec {
    let id = string_id.to_string();
    let serializer: Serializer = Box::new(move |block| {
        let ShapeState::Hopper { facing, powered } = block.shape_state() else {
            return Err(ForgeError::ShapeMismatch { recipe: "hopper" });
        };
        StateWriter::new(&id)
            .write_int(state_names::TOGGLE_BIT, powered as i32)
            .write_facing_without_up(state_names::FACING_DIRECTION, facing)
    });
    let template = reference.boxed_clone();
    let deserializer: Deserializer = Box::new(move |reader| {
        let powered = reader.read_bool(state_names::TOGGLE_BIT)?;
        let facing = reader.read_facing_without_up(state_names::FACING_DIRECTION)?;
        template.with_shape_state(ShapeState::Hopper { facing, powered })
    });
    StateCodec {
        serializer,
        deserializer,
    }
}

pub(super) fn head_codec(
    string_id: &str,
    reference: &dyn BlockInstance,
    max_rotation: i32,
) -> StateCodec {
    let id = string_id.to_string();
    let serializer: Serializer = Box::new(move |block| {
        let ShapeState::Head { facing, rotation } = block.shape_state() else {
            return Err(ForgeError::ShapeMismatch { recipe: "head" });
        };
        Ok(StateWriter::new(&id)
            .write_facing_without_down(state_names::FACING_DIRECTION, facing)?
            .write_int(state_names::ROTATION, rotation))
    });
    let template = reference.boxed_clone();
    let deserializer: Deserializer = Box::new(move |reader| {
        let facing = reader.read_facing_without_down(state_names::FACING_DIRECTION)?;
        let rotation = reader.read_bounded_int(state_names::ROTATION, 0, max_rotation)?;
        template.with_shape_state(ShapeState::Head { facing, rotation })
    });
    StateCodec {
        serializer,
        deserializer,
    }
}

pub(super) fn ladder_codec(string_id: &str, reference: &dyn BlockInstance) -> StateCodec {
    let id = string_id.to_string();
    let serializer: Serializer = Box::new(move |block| {
        let ShapeState::Ladder { facing } = block.shape_state() else {
            return Err(ForgeError::ShapeMismatch { recipe: "ladder" });
        };
        Ok(StateWriter::new(&id).write_horizontal_facing(state_names::FACING_DIRECTION, facing))
    });
    let template = reference.boxed_clone();
    let deserializer: Deserializer = Box::new(move |reader| {
        let facing = reader.read_horizontal_facing(state_names::FACING_DIRECTION)?;
        template.with_shape_state(ShapeState::Ladder { facing })
    });
    StateCodec {
        serializer,
        deserializer,
    }
}

pub(super) fn lever_codec(string_id: &str, reference: &dyn BlockInstance) -> StateCodec {
    let id = string_id.to_string();
    let serializer: Serializer = Box::new(move |block| {
        let ShapeState::Lever { facing, activated } = block.shape_state() else {
            return Err(ForgeError::ShapeMismatch { recipe: "lever" });
        };
        Ok(StateWriter::new(&id)
            .write_bool(state_names::OPEN_BIT, activated)
            .write_str(state_names::LEVER_DIRECTION, facing.as_str()))
    });
    let template = reference.boxed_clone();
    let deserializer: Deserializer = Box::new(move |reader| {
        let activated = reader.read_bool(state_names::OPEN_BIT)?;
        let facing = LeverFacing::from_str(reader.read_str(state_names::LEVER_DIRECTION)?)?;
        template.with_shape_state(ShapeState::Lever { facing, activated })
    });
    StateCodec {
        serializer,
        deserializer,
    }
}

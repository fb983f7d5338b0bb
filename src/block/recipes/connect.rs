//! Recipes for side-connecting shapes: fences, fence gates, walls, and
//! glass panes.
//!
//! Fences and panes carry one connection flag per horizontal face and
//! enumerate all sixteen combinations; walls carry a three-valued
//! connection per face plus a post flag.

use super::install_codec;
use crate::block::builder::BlockBuilder;
use crate::block::component::{
    component_ids, geometry_ids, BoxGeometry, Component, Geometry, Material, RenderMethod,
    Transformation,
};
use crate::block::instance::{
    BlockInstance, Cardinal, FaceSet, ShapeClass, ShapeState, WallConnection,
};
use crate::block::permutation::Permutation;
use crate::block::property::{state_names, BlockProperty, PropertyValue};
use crate::block::state::{Deserializer, Serializer, StateCodec, StateWriter};
use crate::error::{ForgeError, ForgeResult};
use glam::Vec3;

const CONNECT_NAMES: [(&str, Cardinal); 4] = [
    (state_names::CONNECT_NORTH, Cardinal::North),
    (state_names::CONNECT_SOUTH, Cardinal::South),
    (state_names::CONNECT_WEST, Cardinal::West),
    (state_names::CONNECT_EAST, Cardinal::East),
];

pub fn make_fence(builder: &mut BlockBuilder, block: &dyn BlockInstance) -> ForgeResult<()> {
    if block.shape() != ShapeClass::Fence {
        return Err(ForgeError::ShapeMismatch { recipe: "fence" });
    }
    install_codec(builder, fence_codec(builder.string_id(), block));
    for (name, _) in CONNECT_NAMES {
        builder.add_property(BlockProperty::bit(name))?;
    }

    let material = base_material(builder, RenderMethod::Opaque);
    builder.add_component(Component::item_visual(
        &Geometry::new(format!("{}_render", geometry_ids::FENCE)).build(),
        &material,
    ));
    builder.add_component(connection_geometry(geometry_ids::FENCE));

    for faces in FaceSet::all_combinations() {
        let mut boxes = vec![BoxGeometry::fence_post()];
        boxes.extend(fence_arms(faces));
        builder.add_permutation(
            connection_condition(faces)
                .with(Component::collision_box(true, &boxes))
                .with(Component::selection_box(true, &boxes)),
        );
    }
    Ok(())
}

pub fn make_glass_pane(builder: &mut BlockBuilder, block: &dyn BlockInstance) -> ForgeResult<()> {
    if block.shape() != ShapeClass::GlassPane {
        return Err(ForgeError::ShapeMismatch { recipe: "glass pane" });
    }
    install_codec(builder, glass_pane_codec(builder.string_id(), block));
    // Pane connection flags are declared as 0/1 ints on the wire.
    for (name, _) in CONNECT_NAMES {
        builder.add_property(BlockProperty::int_range(name, 0..=1)?)?;
    }

    let geometry = connection_geometry(geometry_ids::GLASS_PANE);
    let material = Component::material_instances(&[Material::new(
        builder.name(),
        RenderMethod::AlphaTestSingleSided,
    )]);
    builder.add_component(geometry.clone());
    builder.add_component(material.clone());
    builder.add_component(Component::item_visual(
        &Geometry::new(format!("{}_render", geometry_ids::GLASS_PANE)).build(),
        &material,
    ));
    builder.add_component(Component::embedded_visual(&geometry, &material));
    builder.add_component(Component::flower_pottable());

    for faces in FaceSet::all_combinations() {
        let mut boxes = vec![BoxGeometry::new(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(2.0, 16.0, 2.0),
        )];
        boxes.extend(pane_arms(faces));
        builder.add_permutation(
            connection_condition(faces)
                .with(Component::collision_box(true, &boxes))
                .with(Component::selection_box(true, &boxes)),
        );
    }
    Ok(())
}

pub fn make_fence_gate(builder: &mut BlockBuilder, block: &dyn BlockInstance) -> ForgeResult<()> {
    if block.shape() != ShapeClass::FenceGate {
        return Err(ForgeError::ShapeMismatch { recipe: "fence gate" });
    }
    install_codec(builder, fence_gate_codec(builder.string_id(), block));

    builder.add_property(BlockProperty::strings(
        state_names::MC_CARDINAL_DIRECTION,
        &["north", "south", "west", "east"],
    )?)?;
    builder.add_property(BlockProperty::bit(state_names::IN_WALL_BIT))?;
    builder.add_property(BlockProperty::bit(state_names::OPEN_BIT))?;

    let material = base_material(builder, RenderMethod::Opaque);
    builder.add_component(Component::item_visual(
        &Geometry::new(format!("{}_render", geometry_ids::FENCE_GATE)).build(),
        &material,
    ));
    builder.add_component(Component::custom_components());

    for facing in Cardinal::ALL {
        for open in [false, true] {
            for in_wall in [false, true] {
                let translation = if in_wall {
                    Vec3::new(0.0, -0.187, 0.0)
                } else {
                    Vec3::ZERO
                };
                builder.add_permutation(
                    Permutation::when_all([
                        (state_names::OPEN_BIT, PropertyValue::from(open)),
                        (state_names::IN_WALL_BIT, PropertyValue::from(in_wall)),
                        (
                            state_names::MC_CARDINAL_DIRECTION,
                            PropertyValue::from(facing.as_str()),
                        ),
                    ])
                    .with(
                        Geometry::new(geometry_ids::FENCE_GATE)
                            .bone(
                                "open",
                                format!("q.block_state('{}') == 1", state_names::OPEN_BIT),
                            )
                            .bone(
                                "close",
                                format!("q.block_state('{}') == 0", state_names::OPEN_BIT),
                            )
                            .build(),
                    )
                    // An open gate lets entities walk through.
                    .with(Component::collision_box(!open, &[BoxGeometry::fence_gate()]))
                    .with(Component::selection_box(true, &[BoxGeometry::fence_gate()]))
                    .with(Component::transformation(Transformation::new(
                        gate_rotation(facing),
                        translation,
                    ))),
                );
            }
        }
    }
    Ok(())
}

pub fn make_wall(builder: &mut BlockBuilder, block: &dyn BlockInstance) -> ForgeResult<()> {
    if block.shape() != ShapeClass::Wall {
        return Err(ForgeError::ShapeMismatch { recipe: "wall" });
    }
    install_codec(builder, wall_codec(builder.string_id(), block));

    builder.add_property(BlockProperty::int_range(state_names::WALL_POST_BIT, 0..=1)?)?;
    for name in WALL_CONNECTION_NAMES {
        builder.add_property(BlockProperty::new(
            name,
            vec![
                PropertyValue::Int(0),
                PropertyValue::Int(1),
                PropertyValue::Int(2),
            ],
        )?)?;
    }

    let material = base_material(builder, RenderMethod::Opaque);
    builder.add_component(Component::item_visual(
        &Geometry::new(format!("{}_render", geometry_ids::WALL)).build(),
        &material,
    ));
    builder.add_component(wall_geometry());

    for north in WallConnection::ALL {
        for south in WallConnection::ALL {
            for west in WallConnection::ALL {
                for east in WallConnection::ALL {
                    let mut boxes = vec![BoxGeometry::new(
                        Vec3::new(-4.0, 0.0, -4.0),
                        Vec3::new(8.0, 16.0, 8.0),
                    )];
                    boxes.extend(wall_arms(north, south, west, east));
                    builder.add_permutation(
                        Permutation::when_all([
                            (
                                state_names::WALL_CONNECTION_TYPE_NORTH,
                                PropertyValue::Int(north.encode()),
                            ),
                            (
                                state_names::WALL_CONNECTION_TYPE_SOUTH,
                                PropertyValue::Int(south.encode()),
                            ),
                            (
                                state_names::WALL_CONNECTION_TYPE_WEST,
                                PropertyValue::Int(west.encode()),
                            ),
                            (
                                state_names::WALL_CONNECTION_TYPE_EAST,
                                PropertyValue::Int(east.encode()),
                            ),
                        ])
                        .with(Component::collision_box(true, &boxes))
                        .with(Component::selection_box(true, &boxes)),
                    );
                }
            }
        }
    }
    Ok(())
}

const WALL_CONNECTION_NAMES: [&str; 4] = [
    state_names::WALL_CONNECTION_TYPE_NORTH,
    state_names::WALL_CONNECTION_TYPE_SOUTH,
    state_names::WALL_CONNECTION_TYPE_WEST,
    state_names::WALL_CONNECTION_TYPE_EAST,
];

/// Base material instances, reusing what the autoloaded defaults put
/// there if present.
fn base_material(builder: &BlockBuilder, fallback: RenderMethod) -> Component {
    match builder.get_component(component_ids::MATERIAL_INSTANCES) {
        Some(existing) => existing.clone(),
        None => Component::material_instances(&[Material::new(builder.name(), fallback)]),
    }
}

fn connection_geometry(identifier: &str) -> Component {
    let mut geometry = Geometry::new(identifier);
    for (name, _) in CONNECT_NAMES {
        let bone = &name[name.len() - 1..];
        geometry = geometry.bone(bone, format!("q.block_state('{}') == 1", name));
    }
    geometry.build()
}

fn connection_condition(faces: FaceSet) -> Permutation {
    Permutation::when_all(
        CONNECT_NAMES
            .iter()
            .map(|(name, face)| (*name, PropertyValue::Int(faces.contains(*face) as i32))),
    )
}

fn fence_arms(faces: FaceSet) -> Vec<BoxGeometry> {
    let mut arms = Vec::new();
    if faces.contains(Cardinal::North) {
        arms.push(BoxGeometry::new(
            Vec3::new(-1.0, 6.0, -8.0),
            Vec3::new(2.0, 9.0, 6.0),
        ));
    }
    if faces.contains(Cardinal::South) {
        arms.push(BoxGeometry::new(
            Vec3::new(-1.0, 6.0, 2.0),
            Vec3::new(2.0, 9.0, 6.0),
        ));
    }
    if faces.contains(Cardinal::West) {
        arms.push(BoxGeometry::new(
            Vec3::new(-8.0, 6.0, -1.0),
            Vec3::new(6.0, 9.0, 2.0),
        ));
    }
    if faces.contains(Cardinal::East) {
        arms.push(BoxGeometry::new(
            Vec3::new(2.0, 6.0, -1.0),
            Vec3::new(6.0, 9.0, 2.0),
        ));
    }
    arms
}

fn pane_arms(faces: FaceSet) -> Vec<BoxGeometry> {
    let mut arms = Vec::new();
    if faces.contains(Cardinal::North) {
        arms.push(BoxGeometry::new(
            Vec3::new(-1.0, 0.0, -8.0),
            Vec3::new(2.0, 16.0, 7.0),
        ));
    }
    if faces.contains(Cardinal::South) {
        arms.push(BoxGeometry::new(
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(2.0, 16.0, 7.0),
        ));
    }
    if faces.contains(Cardinal::West) {
        arms.push(BoxGeometry::new(
            Vec3::new(-8.0, 0.0, -1.0),
            Vec3::new(7.0, 16.0, 2.0),
        ));
    }
    if faces.contains(Cardinal::East) {
        arms.push(BoxGeometry::new(
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(7.0, 16.0, 2.0),
        ));
    }
    arms
}

fn wall_arms(
    north: WallConnection,
    south: WallConnection,
    west: WallConnection,
    east: WallConnection,
) -> Vec<BoxGeometry> {
    let height = |connection: WallConnection| match connection {
        WallConnection::None => None,
        WallConnection::Short => Some(13.0),
        WallConnection::Tall => Some(16.0),
    };
    let mut arms = Vec::new();
    if let Some(h) = height(north) {
        arms.push(BoxGeometry::new(
            Vec3::new(-3.0, 0.0, -8.0),
            Vec3::new(6.0, h, 5.0),
        ));
    }
    if let Some(h) = height(south) {
        arms.push(BoxGeometry::new(
            Vec3::new(-3.0, 0.0, 3.0),
            Vec3::new(6.0, h, 5.0),
        ));
    }
    if let Some(h) = height(west) {
        arms.push(BoxGeometry::new(
            Vec3::new(-8.0, 0.0, -3.0),
            Vec3::new(5.0, h, 6.0),
        ));
    }
    if let Some(h) = height(east) {
        arms.push(BoxGeometry::new(
            Vec3::new(3.0, 0.0, -3.0),
            Vec3::new(5.0, h, 6.0),
        ));
    }
    arms
}

fn gate_rotation(facing: Cardinal) -> Vec3 {
    match facing {
        Cardinal::North => Vec3::ZERO,
        Cardinal::South => Vec3::new(0.0, 180.0, 0.0),
        Cardinal::East => Vec3::new(0.0, 90.0, 0.0),
        Cardinal::West => Vec3::new(0.0, 270.0, 0.0),
    }
}

/// The wall geometry shows straight runs (`ns`/`we`) without the center
/// post when exactly one axis is connected and the post bit is off.
fn wall_geometry() -> Component {
    let state = |name: &str, op: &str| format!("q.block_state('{}') {}", name, op);
    let n = state_names::WALL_CONNECTION_TYPE_NORTH;
    let s = state_names::WALL_CONNECTION_TYPE_SOUTH;
    let w = state_names::WALL_CONNECTION_TYPE_WEST;
    let e = state_names::WALL_CONNECTION_TYPE_EAST;

    let ns_run = format!(
        "{} && {} && {} && {}",
        state(n, "!= 0"),
        state(s, "!= 0"),
        state(e, "== 0"),
        state(w, "== 0")
    );
    let we_run = format!(
        "{} && {} && {} && {}",
        state(e, "!= 0"),
        state(w, "!= 0"),
        state(n, "== 0"),
        state(s, "== 0")
    );
    let mid = format!(
        "{} || !(({}) || ({}))",
        state(state_names::WALL_POST_BIT, "== 1"),
        ns_run,
        we_run
    );

    Geometry::new(geometry_ids::WALL)
        .bone("n", state(n, "!= 0"))
        .bone("s", state(s, "!= 0"))
        .bone("w", state(w, "!= 0"))
        .bone("e", state(e, "!= 0"))
        .bone("ns", ns_run)
        .bone("we", we_run)
        .bone("mid", mid)
        .build()
}

pub(super) fn fence_codec(string_id: &str, reference: &dyn BlockInstance) -> StateCodec {
    let id = string_id.to_string();
    let serializer: Serializer = Box::new(move |block| {
        let ShapeState::Fence { connections } = block.shape_state() else {
            return Err(ForgeError::ShapeMismatch { recipe: "fence" });
        };
        let mut writer = StateWriter::new(&id);
        for (name, face) in CONNECT_NAMES {
            writer = writer.write_bool(name, connections.contains(face));
        }
        Ok(writer)
    });
    let template = reference.boxed_clone();
    let deserializer: Deserializer = Box::new(move |reader| {
        let connections = read_face_set(reader)?;
        template.with_shape_state(ShapeState::Fence { connections })
    });
    StateCodec {
        serializer,
        deserializer,
    }
}

pub(super) fn glass_pane_codec(string_id: &str, reference: &dyn BlockInstance) -> StateCodec {
    let id = string_id.to_string();
    let serializer: Serializer = Box::new(move |block| {
        let ShapeState::GlassPane { connections } = block.shape_state() else {
            return Err(ForgeError::ShapeMismatch { recipe: "glass pane" });
        };
        let mut writer = StateWriter::new(&id);
        for (name, face) in CONNECT_NAMES {
            writer = writer.write_int(name, connections.contains(face) as i32);
        }
        Ok(writer)
    });
    let template = reference.boxed_clone();
    let deserializer: Deserializer = Box::new(move |reader| {
        let connections = read_face_set(reader)?;
        template.with_shape_state(ShapeState::GlassPane { connections })
    });
    StateCodec {
        serializer,
        deserializer,
    }
}

fn read_face_set(reader: &crate::block::state::StateReader) -> ForgeResult<FaceSet> {
    let mut connections = FaceSet::new();
    for (name, face) in CONNECT_NAMES {
        connections = connections.with(face, reader.read_bool(name)?);
    }
    Ok(connections)
}

pub(super) fn fence_gate_codec(string_id: &str, reference: &dyn BlockInstance) -> StateCodec {
    let id = string_id.to_string();
    let serializer: Serializer = Box::new(move |block| {
        let ShapeState::FenceGate {
            facing,
            in_wall,
            open,
        } = block.shape_state()
        else {
            return Err(ForgeError::ShapeMismatch { recipe: "fence gate" });
        };
        Ok(StateWriter::new(&id)
            .write_str(state_names::MC_CARDINAL_DIRECTION, facing.as_str())
            .write_bool(state_names::IN_WALL_BIT, in_wall)
            .write_bool(state_names::OPEN_BIT, open))
    });
    let template = reference.boxed_clone();
    let deserializer: Deserializer = Box::new(move |reader| {
        let facing = Cardinal::from_str(reader.read_str(state_names::MC_CARDINAL_DIRECTION)?)?;
        let in_wall = reader.read_bool(state_names::IN_WALL_BIT)?;
        let open = reader.read_bool(state_names::OPEN_BIT)?;
        template.with_shape_state(ShapeState::FenceGate {
            facing,
            in_wall,
            open,
        })
    });
    StateCodec {
        serializer,
        deserializer,
    }
}

pub(super) fn wall_codec(string_id: &str, reference: &dyn BlockInstance) -> StateCodec {
    let id = string_id.to_string();
    let serializer: Serializer = Box::new(move |block| {
        let ShapeState::Wall {
            post,
            north,
            south,
            west,
            east,
        } = block.shape_state()
        else {
            return Err(ForgeError::ShapeMismatch { recipe: "wall" });
        };
        Ok(StateWriter::new(&id)
            .write_int(state_names::WALL_POST_BIT, post as i32)
            .write_int(state_names::WALL_CONNECTION_TYPE_NORTH, north.encode())
            .write_int(state_names::WALL_CONNECTION_TYPE_SOUTH, south.encode())
            .write_int(state_names::WALL_CONNECTION_TYPE_WEST, west.encode())
            .write_int(state_names::WALL_CONNECTION_TYPE_EAST, east.encode()))
    });
    let template = reference.boxed_clone();
    let deserializer: Deserializer = Box::new(move |reader| {
        let post = reader.read_bool(state_names::WALL_POST_BIT)?;
        let north = WallConnection::decode(reader.read_int(state_names::WALL_CONNECTION_TYPE_NORTH)?)?;
        let south = WallConnection::decode(reader.read_int(state_names::WALL_CONNECTION_TYPE_SOUTH)?)?;
        let west = WallConnection::decode(reader.read_int(state_names::WALL_CONNECTION_TYPE_WEST)?)?;
        let east = WallConnection::decode(reader.read_int(state_names::WALL_CONNECTION_TYPE_EAST)?)?;
        template.with_shape_state(ShapeState::Wall {
            post,
            north,
            south,
            west,
            east,
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
    use crate::block::state::StateReader;

    #[test]
    fn fence_enumerates_sixteen_connection_permutations() {
        let block = BasicBlock::new(ShapeClass::Fence);
        let mut builder = BlockBuilder::new("forge:oak_fence").unwrap();
        make_fence(&mut builder, &block).unwrap();
        assert_eq!(builder.properties().len(), 4);
        assert_eq!(builder.permutations().len(), 16);
        // Unconnected post is just the post box.
        assert_eq!(
            builder.permutations()[0].condition(),
            "q.block_state('mc:n') == 0 && q.block_state('mc:s') == 0 \
             && q.block_state('mc:w') == 0 && q.block_state('mc:e') == 0"
        );
    }

    #[test]
    fn fence_codec_round_trips_connections() {
        let reference = BasicBlock::new(ShapeClass::Fence);
        let codec = fence_codec("forge:oak_fence", &reference);
        for connections in FaceSet::all_combinations() {
            let instance = reference
                .with_shape_state(ShapeState::Fence { connections })
                .unwrap();
            let writer = (codec.serializer)(&*instance).unwrap();
            let reader = StateReader::new(writer.states());
            let decoded = (codec.deserializer)(&reader).unwrap();
            assert_eq!(decoded.shape_state(), ShapeState::Fence { connections });
        }
    }

    #[test]
    fn fence_gate_opens_its_collision() {
        let block = BasicBlock::new(ShapeClass::FenceGate);
        let mut builder = BlockBuilder::new("forge:oak_fence_gate").unwrap();
        make_fence_gate(&mut builder, &block).unwrap();
        assert_eq!(builder.permutations().len(), 16);
        // dir north, closed, not in wall comes first.
        let closed = &builder.permutations()[0];
        assert!(closed.condition().starts_with("q.block_state('open_bit') == 0"));
        let collision = closed
            .components()
            .iter()
            .find(|c| c.name() == component_ids::COLLISION_BOX)
            .unwrap();
        let crate::nbt::Tag::Compound(payload) = collision.payload() else {
            panic!("collision payload must be a compound");
        };
        assert_eq!(payload.get("enabled"), Some(&crate::nbt::Tag::bool(true)));
    }

    #[test]
    fn wall_enumerates_eighty_one_permutations() {
        let block = BasicBlock::new(ShapeClass::Wall);
        let mut builder = BlockBuilder::new("forge:stone_wall").unwrap();
        make_wall(&mut builder, &block).unwrap();
        assert_eq!(builder.properties().len(), 5);
        assert_eq!(builder.permutations().len(), 81);
    }

    #[test]
    fn wall_codec_round_trips_mixed_connections() {
        let reference = BasicBlock::new(ShapeClass::Wall);
        let codec = wall_codec("forge:stone_wall", &reference);
        let state = ShapeState::Wall {
            post: false,
            north: WallConnection::Tall,
            south: WallConnection::None,
            west: WallConnection::Short,
            east: WallConnection::Tall,
        };
        let instance = reference.with_shape_state(state.clone()).unwrap();
        let writer = (codec.serializer)(&*instance).unwrap();
        let reader = StateReader::new(writer.states());
        let decoded = (codec.deserializer)(&reader).unwrap();
        assert_eq!(decoded.shape_state(), state);
    }

    #[test]
    fn wall_codec_rejects_unknown_connection_value() {
        let reference = BasicBlock::new(ShapeClass::Wall);
        let codec = wall_codec("forge:stone_wall", &reference);
        let states = vec![
            (
                state_names::WALL_POST_BIT.to_string(),
                PropertyValue::Int(1),
            ),
            (
                state_names::WALL_CONNECTION_TYPE_NORTH.to_string(),
                PropertyValue::Int(3),
            ),
        ];
        let reader = StateReader::new(&states);
        assert!(matches!(
            (codec.deserializer)(&reader),
            Err(ForgeError::InvalidEnum { .. })
        ));
    }

    #[test]
    fn glass_pane_keeps_pot_and_embedded_visuals() {
        let block = BasicBlock::new(ShapeClass::GlassPane);
        let mut builder = BlockBuilder::new("forge:amber_pane").unwrap();
        make_glass_pane(&mut builder, &block).unwrap();
        assert!(builder.has_component(component_ids::FLOWER_POTTABLE));
        assert!(builder.has_component(component_ids::EMBEDDED_VISUAL));
        assert_eq!(builder.permutations().len(), 16);
    }
}

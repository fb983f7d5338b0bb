//! End-to-end registration through the process-wide registries.
//!
//! These tests share the global tables, so every definition uses a
//! unique canonical name.

use block_forge::block::component::component_ids;
use block_forge::block::state::dictionary_entries;
use block_forge::nbt::Tag;
use block_forge::{
    BasicBlock, BlockBuilder, BlockProperty, InstanceFactory, PropertyValue, RegisterOptions,
    ShapeClass, ShapeState, SlabHalf, StateReader, REGISTRIES,
};
use std::sync::Arc;

fn factory(block: BasicBlock) -> InstanceFactory {
    Arc::new(move |_| Box::new(block.clone()))
}

#[test]
fn slab_registers_three_dense_states() {
    let mut builder = BlockBuilder::new("itest:basalt_slab").unwrap();
    builder.instance(factory(BasicBlock::new(ShapeClass::Slab)));
    let registered = builder.register().unwrap();

    assert_eq!(registered.state_count, 3);

    let registries = REGISTRIES.read();
    for meta in 0..3 {
        let entry = registries.palette.get("itest:basalt_slab", meta).unwrap();
        assert_eq!(entry.meta, meta);
        assert!(registries.upgrades.lookup("itest:basalt_slab", meta).is_some());
    }
    assert!(registries.palette.get("itest:basalt_slab", 3).is_none());
    assert!(registries.palette.document("itest:basalt_slab").is_some());
    assert!(registries.items.get("itest:basalt_slab").is_some());
}

#[test]
fn slab_codec_round_trips_through_registration() {
    let mut builder = BlockBuilder::new("itest:tuff_slab").unwrap();
    builder.instance(factory(BasicBlock::new(ShapeClass::Slab)));
    let registered = builder.register().unwrap();

    let top = BasicBlock::new(ShapeClass::Slab)
        .state(ShapeState::Slab {
            half: SlabHalf::Top,
        })
        .unwrap();
    let writer = (registered.codec.serializer)(&top).unwrap();
    assert_eq!(writer.canonical_name(), "itest:tuff_slab");
    let reader = StateReader::new(writer.states());
    let decoded = (registered.codec.deserializer)(&reader).unwrap();
    assert_eq!(
        decoded.shape_state(),
        ShapeState::Slab {
            half: SlabHalf::Top
        }
    );
}

#[test]
fn stateless_block_gets_one_state_and_no_permutations() {
    let mut builder = BlockBuilder::new("itest:marble").unwrap();
    builder.instance(factory(BasicBlock::new(ShapeClass::Plain)));
    let registered = builder.register().unwrap();

    assert_eq!(registered.state_count, 1);

    let registries = REGISTRIES.read();
    let entry = registries.palette.get("itest:marble", 0).unwrap();
    let state = Tag::from_bytes(&entry.state_blob).unwrap();
    let Tag::Compound(state) = state else {
        panic!("state blob must decode to a compound");
    };
    assert_eq!(state.get("name"), Some(&Tag::str("itest:marble")));
    let Some(Tag::Compound(states)) = state.get("states") else {
        panic!("missing states compound");
    };
    assert!(states.is_empty());

    let document = Tag::from_bytes(registries.palette.document("itest:marble").unwrap()).unwrap();
    let Tag::Compound(document) = document else {
        panic!("document must be a compound");
    };
    assert_eq!(document.get("permutations"), Some(&Tag::List(vec![])));
    assert_eq!(document.get("molangVersion"), Some(&Tag::Int(12)));
}

#[test]
fn autoloaded_defaults_land_in_the_document() {
    let mut builder = BlockBuilder::new("itest:ember_lamp").unwrap();
    builder.instance(factory(
        BasicBlock::new(ShapeClass::Plain).light(14).hardness(0.3),
    ));
    builder.register().unwrap();

    let registries = REGISTRIES.read();
    let document =
        Tag::from_bytes(registries.palette.document("itest:ember_lamp").unwrap()).unwrap();
    let Tag::Compound(document) = document else {
        panic!("document must be a compound");
    };
    let Some(Tag::Compound(components)) = document.get("components") else {
        panic!("missing components section");
    };
    assert_eq!(
        components.get(component_ids::DISPLAY_NAME),
        Some(&Tag::Compound(
            block_forge::nbt::Compound::new()
                .set("value", Tag::str("tile.itest:ember_lamp.name"))
        ))
    );
    let Some(Tag::Compound(emission)) = components.get(component_ids::LIGHT_EMISSION) else {
        panic!("missing light emission component");
    };
    assert_eq!(emission.get("emission"), Some(&Tag::Int(14)));
    // Seconds-to-mine derives from hardness.
    let Some(Tag::Compound(mining)) = components.get(component_ids::DESTRUCTIBLE_BY_MINING)
    else {
        panic!("missing destructible_by_mining component");
    };
    assert_eq!(mining.get("value"), Some(&Tag::Float(0.3 * 3.33334)));
}

#[test]
fn hand_built_door_enumerates_in_odometer_order() {
    // direction declared first varies slowest; open declared last
    // varies fastest.
    let properties = vec![
        BlockProperty::strings(
            "minecraft:cardinal_direction",
            &["north", "south", "west", "east"],
        )
        .unwrap(),
        BlockProperty::bit("upper_block_bit"),
        BlockProperty::bit("open_bit"),
    ];
    let entries: Vec<_> = dictionary_entries("itest:elm_door", &properties).collect();
    assert_eq!(entries.len(), 16);

    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.meta(), i as u32);
    }
    // meta 0: north / lower / closed.
    assert_eq!(
        entries[0].states(),
        &[
            (
                "minecraft:cardinal_direction".to_string(),
                PropertyValue::from("north")
            ),
            ("upper_block_bit".to_string(), PropertyValue::Bool(false)),
            ("open_bit".to_string(), PropertyValue::Bool(false)),
        ]
    );
    // meta 1 flips only the fastest axis.
    assert_eq!(entries[1].states()[2].1, PropertyValue::Bool(true));
    assert_eq!(entries[1].states()[1].1, PropertyValue::Bool(false));
    // meta 4 advances the direction axis.
    assert_eq!(entries[4].states()[0].1, PropertyValue::from("south"));
}

#[test]
fn enumeration_is_deterministic_across_runs() {
    let properties = vec![
        BlockProperty::int_range("growth", 0..=7).unwrap(),
        BlockProperty::bit("open_bit"),
    ];
    let a: Vec<_> = dictionary_entries("itest:vine", &properties).collect();
    let b: Vec<_> = dictionary_entries("itest:vine", &properties).collect();
    assert_eq!(a, b);
    assert_eq!(a.len(), 16);
}

#[test]
fn numeric_ids_are_unique_and_stable() {
    let mut first = BlockBuilder::new("itest:gneiss").unwrap();
    first.instance(factory(BasicBlock::new(ShapeClass::Plain)));
    let mut second = BlockBuilder::new("itest:schist").unwrap();
    second.instance(factory(BasicBlock::new(ShapeClass::Plain)));

    let first = first.register().unwrap();
    let second = second.register().unwrap();
    assert_ne!(first.numeric_id, second.numeric_id);
    assert!(first.numeric_id >= 10000);

    let registries = REGISTRIES.read();
    assert_eq!(
        registries.items.get("itest:gneiss").unwrap().numeric_id,
        first.numeric_id
    );
}

#[test]
fn rendering_is_stable_for_identical_definitions() {
    let build = || {
        let mut builder = BlockBuilder::new("itest:render_probe").unwrap();
        builder.set_numeric_id(29000);
        builder
            .add_property(BlockProperty::int_range("growth", 0..=3).unwrap())
            .unwrap();
        builder.add_tag("itest");
        builder.to_nbt().to_bytes().unwrap()
    };
    assert_eq!(build(), build());
}

#[test]
fn crop_without_collision_autoloads_crop_tag() {
    let mut builder = BlockBuilder::new("itest:flax").unwrap();
    builder.instance(factory(
        BasicBlock::new(ShapeClass::Crop { max_age: 7 })
            .no_collision()
            .flowable(),
    ));
    let registered = builder.register().unwrap();
    assert_eq!(registered.state_count, 8);

    let registries = REGISTRIES.read();
    let document = Tag::from_bytes(registries.palette.document("itest:flax").unwrap()).unwrap();
    let Tag::Compound(document) = document else {
        panic!("document must be a compound");
    };
    let Some(Tag::Compound(components)) = document.get("components") else {
        panic!("missing components section");
    };
    assert!(components.get(component_ids::CROP_TAG).is_some());
    // Flowable plants accept no connections.
    assert!(components.get(component_ids::CONNECTION_RULE).is_some());
    let Some(Tag::List(permutations)) = document.get("permutations") else {
        panic!("missing permutations section");
    };
    assert_eq!(permutations.len(), 8);
}

#[test]
fn opting_out_of_autoload_keeps_the_definition_bare() {
    let mut builder = BlockBuilder::new("itest:bare_node").unwrap();
    builder.instance(factory(BasicBlock::new(ShapeClass::Plain)));
    let registered = builder
        .register_with(RegisterOptions {
            creative: false,
            autoload: false,
        })
        .unwrap();
    assert_eq!(registered.state_count, 1);

    let registries = REGISTRIES.read();
    let document =
        Tag::from_bytes(registries.palette.document("itest:bare_node").unwrap()).unwrap();
    let Tag::Compound(document) = document else {
        panic!("document must be a compound");
    };
    let Some(Tag::Compound(components)) = document.get("components") else {
        panic!("missing components section");
    };
    assert!(components.is_empty());
    assert!(registries.creative.get("itest:bare_node").is_none());
}

//! Worker-side replication equivalence.
//!
//! A replica that replays the descriptor log must end up with the same
//! palette rows and documents the main-thread registries hold.

use block_forge::registry::{BlockRegistries, IdAllocator, FIRST_BLOCK_ID};
use block_forge::{worker, BasicBlock, BlockBuilder, InstanceFactory, ShapeClass, REGISTRIES};
use std::sync::Arc;

fn factory(block: BasicBlock) -> InstanceFactory {
    Arc::new(move |_| Box::new(block.clone()))
}

fn register(name: &str, shape: ShapeClass) -> u32 {
    let mut builder = BlockBuilder::new(name).unwrap();
    builder.instance(factory(BasicBlock::new(shape)));
    builder.register().unwrap().numeric_id
}

#[test]
fn replayed_registries_match_the_main_thread() {
    let names = [
        ("rtest:mahogany_fence", ShapeClass::Fence),
        ("rtest:mahogany_gate", ShapeClass::FenceGate),
        ("rtest:obsidian_wall", ShapeClass::Wall),
        ("rtest:amber_pane", ShapeClass::GlassPane),
        ("rtest:brass_lever", ShapeClass::Lever),
    ];
    for (name, shape) in names {
        register(name, shape);
    }

    let mut replica = BlockRegistries::new();
    let ids = IdAllocator::new(FIRST_BLOCK_ID);
    let applied = worker::replay_log(&mut replica, &ids).unwrap();
    assert!(applied >= names.len());

    let main = REGISTRIES.read();
    for (name, _) in names {
        assert_eq!(
            replica.palette.document(name).unwrap(),
            main.palette.document(name).unwrap(),
            "document for '{name}' diverged"
        );
        let meta = 0;
        assert_eq!(
            replica.palette.get(name, meta).unwrap().state_blob,
            main.palette.get(name, meta).unwrap().state_blob,
        );
        assert_eq!(
            replica.items.get(name).unwrap(),
            main.items.get(name).unwrap()
        );
        assert_eq!(replica.creative.get(name), main.creative.get(name));
    }
}

#[test]
fn replayed_codecs_still_round_trip() {
    let numeric_id = register("rtest:willow_trapdoor", ShapeClass::Trapdoor);

    let descriptor = worker::descriptor_log()
        .into_iter()
        .find(|d| d.string_id == "rtest:willow_trapdoor")
        .unwrap();
    assert_eq!(descriptor.numeric_id, numeric_id);

    let mut replica = BlockRegistries::new();
    let ids = IdAllocator::new(FIRST_BLOCK_ID);
    let registered = descriptor.replay(&mut replica, &ids).unwrap();
    // direction x upside_down x open.
    assert_eq!(registered.state_count, 16);

    use block_forge::{ShapeState, StateReader};
    let state = ShapeState::Trapdoor {
        direction: 2,
        top: true,
        open: false,
    };
    let instance = BasicBlock::new(ShapeClass::Trapdoor)
        .state(state.clone())
        .unwrap();
    let writer = (registered.codec.serializer)(&instance).unwrap();
    let reader = StateReader::new(writer.states());
    let decoded = (registered.codec.deserializer)(&reader).unwrap();
    assert_eq!(decoded.shape_state(), state);
}

#[test]
fn local_allocations_skip_replayed_ids() {
    let numeric_id = register("rtest:basalt_pillar", ShapeClass::Plain);

    let mut replica = BlockRegistries::new();
    let ids = IdAllocator::new(FIRST_BLOCK_ID);
    worker::replay_log(&mut replica, &ids).unwrap();
    assert!(ids.peek() > numeric_id);
}

#[test]
fn worker_pool_starts_and_drains_cleanly() {
    register("rtest:chalk", ShapeClass::Plain);
    worker::start_with(2);
    register("rtest:chert", ShapeClass::Plain);
    worker::shutdown();

    let registries = REGISTRIES.read();
    assert!(registries.palette.document("rtest:chalk").is_some());
    assert!(registries.palette.document("rtest:chert").is_some());
}

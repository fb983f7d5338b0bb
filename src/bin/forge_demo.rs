//! Registers a handful of example blocks and prints what landed in the
//! registries.

use anyhow::Result;
use block_forge::{
    worker, BasicBlock, BlockBuilder, InstanceFactory, MaterialKind, ShapeClass, REGISTRIES,
};
use std::sync::Arc;

fn factory(block: BasicBlock) -> InstanceFactory {
    Arc::new(move |_| Box::new(block.clone()))
}

fn main() -> Result<()> {
    env_logger::init();

    let mut lamp = BlockBuilder::new("demo:glow_lamp")?;
    lamp.instance(factory(BasicBlock::new(ShapeClass::Plain).light(15).hardness(0.3)));
    lamp.material(MaterialKind::Glass);
    let lamp = lamp.register()?;
    println!(
        "{} -> id {} ({} state)",
        lamp.string_id, lamp.numeric_id, lamp.state_count
    );

    let mut wheat = BlockBuilder::new("demo:golden_wheat")?;
    wheat.instance(factory(
        BasicBlock::new(ShapeClass::Crop { max_age: 7 })
            .no_collision()
            .flowable()
            .hardness(0.0),
    ));
    wheat.material(MaterialKind::Plant);
    let wheat = wheat.register()?;
    println!(
        "{} -> id {} ({} states)",
        wheat.string_id, wheat.numeric_id, wheat.state_count
    );

    let mut door = BlockBuilder::new("demo:birch_door")?;
    door.instance(factory(BasicBlock::new(ShapeClass::Door).transparent()));
    door.material(MaterialKind::Wood);
    let door = door.register()?;
    println!(
        "{} -> id {} ({} states)",
        door.string_id, door.numeric_id, door.state_count
    );

    worker::start();

    {
        let registries = REGISTRIES.read();
        println!(
            "palette: {} states across {} documents, {} creative placements",
            registries.palette.state_count(),
            registries.palette.document_count(),
            registries.creative.placements().len()
        );
    }

    worker::shutdown();
    Ok(())
}

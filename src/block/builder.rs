//! The document assembler.
//!
//! `BlockBuilder` collects properties, components, permutations,
//! traits, and a state codec, then finalizes them in one shot:
//! dictionary expansion, document rendering, registry insertion, item
//! and creative registration, and descriptor hand-off to the worker
//! replication queue. `register` consumes the builder, so a definition
//! cannot be finalized twice.

use super::component::{Breathability, Component, Material, RenderMethod};
use super::instance::{BlockInstance, InstanceFactory, ShapeClass};
use super::permutation::Permutation;
use super::property::BlockProperty;
use super::recipes;
use super::state::{
    dictionary_entries, Deserializer, Serializer, StateCodec, StateWriter,
};
use super::traits::BlockTrait;
use crate::error::{ForgeError, ForgeResult};
use crate::hooks::{HookOutcome, LOAD_HOOKS};
use crate::nbt::{Compound, Tag};
use crate::registry::{BlockRegistries, CreativeInfo, ItemTypeEntry, BLOCK_IDS, REGISTRIES};
use crate::worker;

/// Base material reported in `vanilla_block_data`, used by the client
/// for step sounds and map colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MaterialKind {
    Dirt,
    Stone,
    Wood,
    Metal,
    Plant,
    Glass,
}

impl MaterialKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MaterialKind::Dirt => "dirt",
            MaterialKind::Stone => "stone",
            MaterialKind::Wood => "wood",
            MaterialKind::Metal => "metal",
            MaterialKind::Plant => "plant",
            MaterialKind::Glass => "glass",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RegisterOptions {
    /// Add the block to the creative menu.
    pub creative: bool,
    /// Apply auto-detected default components and shape-family
    /// recipes.
    pub autoload: bool,
}

impl Default for RegisterOptions {
    fn default() -> RegisterOptions {
        RegisterOptions {
            creative: true,
            autoload: true,
        }
    }
}

/// Outcome of a successful registration, handed back to the host.
#[derive(Debug)]
pub struct RegisteredBlock {
    pub string_id: String,
    pub numeric_id: u32,
    pub state_count: usize,
    pub codec: StateCodec,
}

pub struct BlockBuilder {
    string_id: String,
    numeric_id: Option<u32>,
    factory: Option<InstanceFactory>,
    serializer: Option<Serializer>,
    deserializer: Option<Deserializer>,
    creative: Option<CreativeInfo>,
    material: MaterialKind,
    tags: Vec<String>,
    components: Vec<Component>,
    properties: Vec<BlockProperty>,
    permutations: Vec<Permutation>,
    traits: Vec<BlockTrait>,
}

impl BlockBuilder {
    /// Starts a definition for the given canonical name. The name must
    /// be namespaced (`scope:name`) and must not claim the reserved
    /// `minecraft:` namespace.
    pub fn new(string_id: impl Into<String>) -> ForgeResult<BlockBuilder> {
        let string_id = string_id.into();
        let Some((namespace, name)) = string_id.split_once(':') else {
            return Err(ForgeError::InvalidName {
                name: string_id,
                reason: "canonical names must be namespaced as 'scope:name'",
            });
        };
        if namespace.is_empty() || name.is_empty() {
            return Err(ForgeError::InvalidName {
                name: string_id,
                reason: "namespace and name must be non-empty",
            });
        }
        if namespace == "minecraft" {
            return Err(ForgeError::InvalidName {
                name: string_id,
                reason: "the 'minecraft:' namespace is reserved",
            });
        }
        Ok(BlockBuilder {
            string_id,
            numeric_id: None,
            factory: None,
            serializer: None,
            deserializer: None,
            creative: None,
            material: MaterialKind::Dirt,
            tags: Vec::new(),
            components: Vec::new(),
            properties: Vec::new(),
            permutations: Vec::new(),
            traits: Vec::new(),
        })
    }

    pub(crate) fn from_parts(
        string_id: String,
        numeric_id: u32,
        material: MaterialKind,
        creative: Option<CreativeInfo>,
        tags: Vec<String>,
        components: Vec<Component>,
        properties: Vec<BlockProperty>,
        permutations: Vec<Permutation>,
        traits: Vec<BlockTrait>,
    ) -> BlockBuilder {
        BlockBuilder {
            string_id,
            numeric_id: Some(numeric_id),
            factory: None,
            serializer: None,
            deserializer: None,
            creative,
            material,
            tags,
            components,
            properties,
            permutations,
            traits,
        }
    }

    pub fn string_id(&self) -> &str {
        &self.string_id
    }

    /// Name without the namespace, used for texture and translation
    /// keys.
    pub fn name(&self) -> &str {
        match self.string_id.split_once(':') {
            Some((_, name)) => name,
            None => &self.string_id,
        }
    }

    /// The numeric id, drawn lazily from the process-wide counter on
    /// first read and fixed afterwards.
    pub fn numeric_id(&mut self) -> u32 {
        *self.numeric_id.get_or_insert_with(|| BLOCK_IDS.next_id())
    }

    /// The id as currently assigned, without drawing a new one.
    pub(crate) fn assigned_id(&self) -> Option<u32> {
        self.numeric_id
    }

    pub fn set_numeric_id(&mut self, id: u32) -> &mut Self {
        self.numeric_id = Some(id);
        self
    }

    /// Sets the live-instance factory. Required before `register`.
    pub fn instance(&mut self, factory: InstanceFactory) -> &mut Self {
        self.factory = Some(factory);
        self
    }

    pub fn set_serializer(&mut self, serializer: Serializer) -> &mut Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn set_deserializer(&mut self, deserializer: Deserializer) -> &mut Self {
        self.deserializer = Some(deserializer);
        self
    }

    pub fn creative_info(&mut self, info: CreativeInfo) -> &mut Self {
        self.creative = Some(info);
        self
    }

    pub fn material(&mut self, material: MaterialKind) -> &mut Self {
        self.material = material;
        self
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Inserts or replaces by component name; last write wins.
    pub fn add_component(&mut self, component: Component) -> &mut Self {
        match self
            .components
            .iter_mut()
            .find(|c| c.name() == component.name())
        {
            Some(existing) => *existing = component,
            None => self.components.push(component),
        }
        self
    }

    pub fn get_component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name() == name)
    }

    pub fn has_component(&self, name: &str) -> bool {
        self.get_component(name).is_some()
    }

    pub fn remove_component(&mut self, name: &str) {
        self.components.retain(|c| c.name() != name);
    }

    /// Appends a property. Duplicate names would corrupt the
    /// enumeration contract, so they are rejected here.
    pub fn add_property(&mut self, property: BlockProperty) -> ForgeResult<&mut Self> {
        if self.properties.iter().any(|p| p.name() == property.name()) {
            return Err(ForgeError::DuplicateProperty {
                name: property.name().to_string(),
            });
        }
        self.properties.push(property);
        Ok(self)
    }

    pub fn add_permutation(&mut self, permutation: Permutation) -> &mut Self {
        self.permutations.push(permutation);
        self
    }

    pub fn add_trait(&mut self, block_trait: BlockTrait) -> &mut Self {
        self.traits.push(block_trait);
        self
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn properties(&self) -> &[BlockProperty] {
        &self.properties
    }

    pub fn permutations(&self) -> &[Permutation] {
        &self.permutations
    }

    pub fn traits(&self) -> &[BlockTrait] {
        &self.traits
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn creative(&self) -> Option<&CreativeInfo> {
        self.creative.as_ref()
    }

    pub fn material_kind(&self) -> MaterialKind {
        self.material
    }

    pub(crate) fn has_codec(&self) -> bool {
        self.serializer.is_some() && self.deserializer.is_some()
    }

    /// Renders the client document. Rendering is pure; calling it twice
    /// without mutating the definition yields byte-identical trees.
    pub fn to_nbt(&self) -> Tag {
        let mut components = Compound::new();
        for component in &self.components {
            components = components.set(component.name(), component.to_nbt());
        }

        // A trait that owns a rotation axis suppresses the matching
        // declared property so the axis is not described twice.
        let properties: Vec<Tag> = self
            .properties
            .iter()
            .filter(|p| !self.traits.iter().any(|t| t.suppresses(p.name())))
            .map(BlockProperty::to_nbt)
            .collect();

        let menu = match &self.creative {
            Some(info) => Compound::new()
                .set("category", Tag::str(info.category.as_str()))
                .set("group", Tag::str(info.group.as_str()))
                .set("is_hidden_in_commands", Tag::bool(info.hidden)),
            None => Compound::new()
                .set("category", Tag::str("none"))
                .set("group", Tag::str("none"))
                .set("is_hidden_in_commands", Tag::bool(false)),
        };

        Tag::Compound(
            Compound::new()
                .set("components", components)
                .set(
                    "permutations",
                    Tag::List(self.permutations.iter().map(Permutation::to_nbt).collect()),
                )
                .set("properties", Tag::List(properties))
                .set("menu_category", menu)
                .set(
                    "blockTags",
                    Tag::List(self.tags.iter().map(Tag::str).collect()),
                )
                .set(
                    "traits",
                    Tag::List(self.traits.iter().map(BlockTrait::to_nbt).collect()),
                )
                .set(
                    "vanilla_block_data",
                    Compound::new()
                        .set("block_id", Tag::Int(self.numeric_id.unwrap_or(0) as i32))
                        .set("material", Tag::str(self.material.as_str())),
                )
                .set("molangVersion", Tag::Int(12)),
        )
    }

    /// Finalizes the definition against the process-wide registries.
    pub fn register(self) -> ForgeResult<RegisteredBlock> {
        self.register_with(RegisterOptions::default())
    }

    pub fn register_with(mut self, options: RegisterOptions) -> ForgeResult<RegisteredBlock> {
        let factory = self.factory.clone().ok_or(ForgeError::MissingFactory)?;
        let numeric_id = self.numeric_id();
        let block = factory(numeric_id);

        self.load_components(&*block, options.autoload)?;

        let descriptor = worker::BlockDescriptor::from_builder(&self, &*block, options.creative)?;
        let codec = self.take_codec();

        let registered = {
            let mut registries = REGISTRIES.write();
            self.finalize_into(&mut registries, &factory, codec, options.creative)?
        };

        // Queued only after the registries accepted the block, so the
        // descriptor stream contains successful registrations only.
        worker::enqueue(descriptor);
        Ok(registered)
    }

    /// Default-component auto-detection, hook chain, and shape-family
    /// detection.
    fn load_components(
        &mut self,
        block: &dyn BlockInstance,
        autoload: bool,
    ) -> ForgeResult<()> {
        if autoload {
            self.add_component(Component::breathability(if block.is_transparent() {
                Breathability::Air
            } else {
                Breathability::Solid
            }));
            self.add_component(Component::collision_box(block.has_collision(), &[]));
            self.add_component(Component::destructible_by_explosion(
                block.blast_resistance(),
            ));
            self.add_component(Component::destructible_by_mining(
                block.hardness() * 3.33334,
            ));
            self.add_component(Component::display_name(format!(
                "tile.{}.name",
                self.string_id
            )));
            self.add_component(Component::friction(
                (1.0 - block.friction_factor()).max(0.0),
            ));
            self.add_component(Component::light_emission(block.light_level()));
            let render_method = if block.is_transparent() {
                RenderMethod::AlphaTestSingleSided
            } else {
                RenderMethod::Opaque
            };
            let texture = self.name().to_string();
            self.add_component(Component::material_instances(&[Material::new(
                texture,
                render_method,
            )]));
            self.add_component(Component::on_player_placing());

            if block.is_flowable() {
                self.add_component(Component::connection_rule("none"));
            }
            if matches!(block.shape(), ShapeClass::Crop { .. }) {
                self.add_component(Component::crop_tag());
            }
            if block.has_container_tile() {
                self.add_component(Component::custom_components());
            }

            self.add_component(Component::selection_box(true, &[]));
        }

        let outcome = LOAD_HOOKS.read().run(self, block)?;
        if outcome != HookOutcome::HandledStop && autoload {
            recipes::apply_shape_defaults(self, block)?;
        }
        Ok(())
    }

    pub(crate) fn take_codec(&mut self) -> Option<StateCodec> {
        match (self.serializer.take(), self.deserializer.take()) {
            (Some(serializer), Some(deserializer)) => Some(StateCodec {
                serializer,
                deserializer,
            }),
            _ => None,
        }
    }

    /// Dictionary expansion and registry insertion. Shared between the
    /// main-thread path and worker replay; never queues descriptors.
    pub(crate) fn finalize_into(
        mut self,
        registries: &mut BlockRegistries,
        factory: &InstanceFactory,
        codec: Option<StateCodec>,
        creative: bool,
    ) -> ForgeResult<RegisteredBlock> {
        let numeric_id = self.numeric_id();
        let string_id = self.string_id.clone();
        let reference = factory(numeric_id);

        let codec = match codec {
            Some(codec) => codec,
            // The synthesized default drops all state; legal only for
            // stateless definitions.
            None if !self.properties.is_empty() => {
                return Err(ForgeError::MissingCodec {
                    name: string_id,
                    count: self.properties.len(),
                })
            }
            None => {
                let id = string_id.clone();
                let template = reference.boxed_clone();
                StateCodec {
                    serializer: Box::new(move |_| Ok(StateWriter::new(&id))),
                    deserializer: Box::new(move |_| Ok(template.boxed_clone())),
                }
            }
        };

        let entries: Vec<_> = dictionary_entries(&string_id, &self.properties).collect();
        for entry in &entries {
            registries.upgrades.add_id_meta_mapping(entry)?;
        }
        registries.palette.insert_states(&entries)?;
        registries
            .palette
            .insert_document(&string_id, self.to_nbt().to_bytes()?)?;

        registries.items.register_entry(ItemTypeEntry {
            string_id: string_id.clone(),
            numeric_id,
            component_based: false,
            version: 0,
        })?;
        if let Err(e) = registries.items.bind_codec(&string_id) {
            // Best-effort: the menu/geometry contract does not depend
            // on item-level serialization.
            log::warn!("failed to bind item codec for '{}': {}", string_id, e);
        }

        if creative {
            let info = self
                .creative
                .unwrap_or_else(|| CreativeInfo::detect_from(reference.shape()));
            registries.creative.add(&string_id, info);
        }

        log::info!(
            "registered block '{}' (id {}, {} states, {} permutations)",
            string_id,
            numeric_id,
            entries.len(),
            self.permutations.len()
        );

        Ok(RegisteredBlock {
            string_id,
            numeric_id,
            state_count: entries.len(),
            codec,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::basic::BasicBlock;
    use crate::block::property::state_names;
    use std::sync::Arc;

    fn factory(shape: ShapeClass) -> InstanceFactory {
        Arc::new(move |_| Box::new(BasicBlock::new(shape)))
    }

    #[test]
    fn rejects_unnamespaced_and_reserved_names() {
        assert!(matches!(
            BlockBuilder::new("lamp"),
            Err(ForgeError::InvalidName { .. })
        ));
        assert!(matches!(
            BlockBuilder::new("minecraft:lamp"),
            Err(ForgeError::InvalidName { .. })
        ));
        assert!(BlockBuilder::new("forge:lamp").is_ok());
    }

    #[test]
    fn numeric_id_is_stable_once_read() {
        let mut builder = BlockBuilder::new("forge:idtest").unwrap();
        let first = builder.numeric_id();
        // Other definitions drawing ids must not move this one.
        let mut other = BlockBuilder::new("forge:idtest2").unwrap();
        let _ = other.numeric_id();
        assert_eq!(builder.numeric_id(), first);
    }

    #[test]
    fn duplicate_property_names_are_rejected() {
        let mut builder = BlockBuilder::new("forge:duptest").unwrap();
        builder
            .add_property(BlockProperty::bit(state_names::OPEN_BIT))
            .unwrap();
        assert!(matches!(
            builder.add_property(BlockProperty::bit(state_names::OPEN_BIT)),
            Err(ForgeError::DuplicateProperty { .. })
        ));
    }

    #[test]
    fn component_replacement_is_last_write_wins() {
        let mut builder = BlockBuilder::new("forge:cmptest").unwrap();
        builder.add_component(Component::friction(0.1));
        builder.add_component(Component::friction(0.9));
        assert_eq!(builder.components().len(), 1);
        let Tag::Compound(payload) = builder.components()[0].payload() else {
            panic!("friction payload must be a compound");
        };
        assert_eq!(payload.get("value"), Some(&Tag::Float(0.9)));
    }

    #[test]
    fn register_without_factory_fails() {
        let builder = BlockBuilder::new("forge:nofactory").unwrap();
        assert!(matches!(
            builder.register(),
            Err(ForgeError::MissingFactory)
        ));
    }

    #[test]
    fn register_with_properties_but_no_codec_fails() {
        let mut builder = BlockBuilder::new("forge:nocodec").unwrap();
        builder.instance(factory(ShapeClass::Plain));
        builder
            .add_property(BlockProperty::bit(state_names::OPEN_BIT))
            .unwrap();
        let err = builder
            .register_with(RegisterOptions {
                creative: false,
                autoload: false,
            })
            .unwrap_err();
        assert!(matches!(err, ForgeError::MissingCodec { count: 1, .. }));
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut builder = BlockBuilder::new("forge:render").unwrap();
        builder.add_component(Component::custom_components());
        builder
            .add_property(BlockProperty::bit(state_names::OPEN_BIT))
            .unwrap();
        builder.add_permutation(Permutation::when(state_names::OPEN_BIT, true));
        builder.add_tag("forge");
        let a = builder.to_nbt().to_bytes().unwrap();
        let b = builder.to_nbt().to_bytes().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn trait_suppresses_cardinal_property_in_document() {
        let mut builder = BlockBuilder::new("forge:traittest").unwrap();
        builder
            .add_property(
                BlockProperty::strings(
                    state_names::MC_CARDINAL_DIRECTION,
                    &["north", "south", "west", "east"],
                )
                .unwrap(),
            )
            .unwrap();
        builder
            .add_property(BlockProperty::bit(state_names::OPEN_BIT))
            .unwrap();
        builder.add_trait(BlockTrait::placement_direction());

        let Tag::Compound(doc) = builder.to_nbt() else {
            panic!("document must be a compound");
        };
        let Some(Tag::List(properties)) = doc.get("properties") else {
            panic!("missing properties section");
        };
        assert_eq!(properties.len(), 1);
        let Tag::Compound(only) = &properties[0] else {
            panic!("property entries are compounds");
        };
        assert_eq!(only.get("name"), Some(&Tag::str(state_names::OPEN_BIT)));
    }
}

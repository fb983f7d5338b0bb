//! Block components: named fragments of descriptive data.
//!
//! Each component serializes to one subtree of the client document. A
//! definition keys components by name; adding one with an existing name
//! replaces it, last write wins.

use crate::nbt::{Compound, Tag};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Well-known component names.
pub mod component_ids {
    pub const GEOMETRY: &str = "minecraft:geometry";
    pub const MATERIAL_INSTANCES: &str = "minecraft:material_instances";
    pub const COLLISION_BOX: &str = "minecraft:collision_box";
    pub const SELECTION_BOX: &str = "minecraft:selection_box";
    pub const TRANSFORMATION: &str = "minecraft:transformation";
    pub const DISPLAY_NAME: &str = "minecraft:display_name";
    pub const FRICTION: &str = "minecraft:friction";
    pub const LIGHT_EMISSION: &str = "minecraft:light_emission";
    pub const LIGHT_DAMPENING: &str = "minecraft:light_dampening";
    pub const BREATHABILITY: &str = "minecraft:breathability";
    pub const DESTRUCTIBLE_BY_MINING: &str = "minecraft:destructible_by_mining";
    pub const DESTRUCTIBLE_BY_EXPLOSION: &str = "minecraft:destructible_by_explosion";
    pub const CONNECTION_RULE: &str = "minecraft:connection_rule";
    pub const CROP_TAG: &str = "tag:minecraft:crop";
    pub const CUSTOM_COMPONENTS: &str = "minecraft:custom_components";
    pub const ON_INTERACT: &str = "minecraft:on_interact";
    pub const ON_PLAYER_PLACING: &str = "minecraft:on_player_placing";
    pub const ITEM_VISUAL: &str = "minecraft:item_visual";
    pub const EMBEDDED_VISUAL: &str = "minecraft:embedded_visual";
    pub const FLOWER_POTTABLE: &str = "tag:minecraft:flower_pottable";
    pub const RANDOM_OFFSET: &str = "minecraft:random_offset";
}

/// Geometry identifiers shipped with the companion resource pack.
pub mod geometry_ids {
    pub const FULL_BLOCK: &str = "minecraft:geometry.full_block";
    pub const CROSS: &str = "minecraft:geometry.cross";
    pub const CROP: &str = "geometry.custom_crop";
    pub const NETHER_WART: &str = "geometry.custom_nether_wart";
    pub const SLAB: &str = "geometry.custom_slab";
    pub const DOOR: &str = "geometry.custom_door";
    pub const FENCE: &str = "geometry.custom_fence";
    pub const FENCE_GATE: &str = "geometry.custom_fence_gate";
    pub const WALL: &str = "geometry.custom_wall";
    pub const TRAPDOOR: &str = "geometry.custom_trapdoor";
    pub const HOPPER: &str = "geometry.custom_hopper";
    pub const MOBHEAD: &str = "geometry.custom_mobhead";
    pub const LADDER: &str = "geometry.custom_ladder";
    pub const FARMLAND: &str = "geometry.custom_farmland";
    pub const GLASS_PANE: &str = "geometry.custom_glass_pane";
    pub const LEVER: &str = "geometry.custom_lever";
}

/// One named component and its document payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    name: String,
    payload: Tag,
}

impl Component {
    pub fn new(name: impl Into<String>, payload: Tag) -> Component {
        Component {
            name: name.into(),
            payload,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &Tag {
        &self.payload
    }

    pub fn to_nbt(&self) -> Tag {
        self.payload.clone()
    }

    pub fn display_name(translation_key: impl Into<String>) -> Component {
        Component::new(
            component_ids::DISPLAY_NAME,
            Compound::new().set("value", Tag::str(translation_key)).into(),
        )
    }

    pub fn friction(friction: f32) -> Component {
        Component::new(
            component_ids::FRICTION,
            Compound::new().set("value", Tag::Float(friction)).into(),
        )
    }

    pub fn light_emission(level: u8) -> Component {
        Component::new(
            component_ids::LIGHT_EMISSION,
            Compound::new()
                .set("emission", Tag::Int(level as i32))
                .into(),
        )
    }

    pub fn light_dampening(level: u8) -> Component {
        Component::new(
            component_ids::LIGHT_DAMPENING,
            Compound::new()
                .set("lightLevel", Tag::Int(level as i32))
                .into(),
        )
    }

    pub fn breathability(breathability: Breathability) -> Component {
        Component::new(
            component_ids::BREATHABILITY,
            Compound::new()
                .set("breathability", Tag::str(breathability.as_str()))
                .into(),
        )
    }

    /// Seconds-to-mine value the client displays while breaking.
    pub fn destructible_by_mining(seconds: f32) -> Component {
        Component::new(
            component_ids::DESTRUCTIBLE_BY_MINING,
            Compound::new().set("value", Tag::Float(seconds)).into(),
        )
    }

    pub fn destructible_by_explosion(resistance: f32) -> Component {
        Component::new(
            component_ids::DESTRUCTIBLE_BY_EXPLOSION,
            Compound::new()
                .set("explosionResistance", Tag::Float(resistance))
                .into(),
        )
    }

    pub fn connection_rule(accepts_from: impl Into<String>) -> Component {
        Component::new(
            component_ids::CONNECTION_RULE,
            Compound::new()
                .set("accepts_connections_from", Tag::str(accepts_from))
                .into(),
        )
    }

    pub fn crop_tag() -> Component {
        Component::new(component_ids::CROP_TAG, Compound::new().into())
    }

    pub fn custom_components() -> Component {
        Component::new(component_ids::CUSTOM_COMPONENTS, Compound::new().into())
    }

    pub fn on_interact(condition: impl Into<String>) -> Component {
        Component::new(
            component_ids::ON_INTERACT,
            Compound::new().set("condition", Tag::str(condition)).into(),
        )
    }

    pub fn on_player_placing() -> Component {
        Component::new(component_ids::ON_PLAYER_PLACING, Compound::new().into())
    }

    pub fn flower_pottable() -> Component {
        Component::new(component_ids::FLOWER_POTTABLE, Compound::new().into())
    }

    pub fn collision_box(enabled: bool, boxes: &[BoxGeometry]) -> Component {
        Component::new(component_ids::COLLISION_BOX, box_payload(enabled, boxes))
    }

    pub fn selection_box(enabled: bool, boxes: &[BoxGeometry]) -> Component {
        Component::new(component_ids::SELECTION_BOX, box_payload(enabled, boxes))
    }

    pub fn transformation(transform: Transformation) -> Component {
        Component::new(
            component_ids::TRANSFORMATION,
            Compound::new()
                .set("rotation", vec3_tag(transform.rotation))
                .set("translation", vec3_tag(transform.translation))
                .set("scale", vec3_tag(transform.scale))
                .into(),
        )
    }

    /// Random per-position visual offset, e.g. for flowers.
    pub fn random_offset(min: Vec3, max: Vec3) -> Component {
        Component::new(
            component_ids::RANDOM_OFFSET,
            Compound::new()
                .set("min", vec3_tag(min))
                .set("max", vec3_tag(max))
                .into(),
        )
    }

    /// Renders the block's item form with a dedicated geometry/material
    /// pair instead of the in-world shape.
    pub fn item_visual(geometry: &Component, material: &Component) -> Component {
        Component::new(
            component_ids::ITEM_VISUAL,
            Compound::new()
                .set("geometry", geometry.to_nbt())
                .set("material_instances", material.to_nbt())
                .into(),
        )
    }

    /// Visual used when the block is embedded in another (flower pots,
    /// liquid clipping).
    pub fn embedded_visual(geometry: &Component, material: &Component) -> Component {
        Component::new(
            component_ids::EMBEDDED_VISUAL,
            Compound::new()
                .set("geometry", geometry.to_nbt())
                .set("material_instances", material.to_nbt())
                .into(),
        )
    }
}

fn vec3_tag(v: Vec3) -> Tag {
    Tag::List(vec![Tag::Float(v.x), Tag::Float(v.y), Tag::Float(v.z)])
}

fn box_payload(enabled: bool, boxes: &[BoxGeometry]) -> Tag {
    let mut payload = Compound::new().set("enabled", Tag::bool(enabled));
    if !boxes.is_empty() {
        payload = payload.set(
            "boxes",
            Tag::List(
                boxes
                    .iter()
                    .map(|b| {
                        Tag::Compound(
                            Compound::new()
                                .set("origin", vec3_tag(b.origin))
                                .set("size", vec3_tag(b.size)),
                        )
                    })
                    .collect(),
            ),
        );
    }
    payload.into()
}

/// Whether the client treats the block volume as air or solid for
/// breathing purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breathability {
    Solid,
    Air,
}

impl Breathability {
    pub fn as_str(self) -> &'static str {
        match self {
            Breathability::Solid => "solid",
            Breathability::Air => "air",
        }
    }
}

/// Axis-aligned box in client units (origin from block corner, 16 units
/// per block).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxGeometry {
    pub origin: Vec3,
    pub size: Vec3,
}

impl BoxGeometry {
    pub fn new(origin: Vec3, size: Vec3) -> BoxGeometry {
        BoxGeometry { origin, size }
    }

    pub fn full() -> BoxGeometry {
        BoxGeometry::new(Vec3::new(-8.0, 0.0, -8.0), Vec3::new(16.0, 16.0, 16.0))
    }

    pub fn slab() -> BoxGeometry {
        BoxGeometry::new(Vec3::new(-8.0, 0.0, -8.0), Vec3::new(16.0, 8.0, 16.0))
    }

    pub fn fence_post() -> BoxGeometry {
        BoxGeometry::new(Vec3::new(-2.0, 0.0, -2.0), Vec3::new(4.0, 16.0, 4.0))
    }

    pub fn fence_gate() -> BoxGeometry {
        BoxGeometry::new(Vec3::new(-8.0, 0.0, -2.0), Vec3::new(16.0, 16.0, 4.0))
    }

    pub fn mobhead() -> BoxGeometry {
        BoxGeometry::new(Vec3::new(-4.0, 0.0, -4.0), Vec3::new(8.0, 8.0, 8.0))
    }

    pub fn ladder() -> BoxGeometry {
        BoxGeometry::new(Vec3::new(-8.0, 0.0, 5.0), Vec3::new(16.0, 16.0, 3.0))
    }

    pub fn farmland() -> BoxGeometry {
        BoxGeometry::new(Vec3::new(-8.0, 0.0, -8.0), Vec3::new(16.0, 15.0, 16.0))
    }

    pub fn flower() -> BoxGeometry {
        BoxGeometry::new(Vec3::new(-5.0, 0.0, -5.0), Vec3::new(10.0, 13.0, 10.0))
    }

    /// Selection box for one crop growth stage: grows with age.
    pub fn crop_stage(age: i32, max_age: i32) -> BoxGeometry {
        let height = 2.0 + (age as f32 / max_age.max(1) as f32) * 14.0;
        BoxGeometry::new(Vec3::new(-8.0, 0.0, -8.0), Vec3::new(16.0, height, 16.0))
    }
}

/// Rotation/translation/scale applied to the rendered shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transformation {
    pub rotation: Vec3,
    pub translation: Vec3,
    pub scale: Vec3,
}

impl Default for Transformation {
    fn default() -> Transformation {
        Transformation {
            rotation: Vec3::ZERO,
            translation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transformation {
    pub fn rotation(rotation: Vec3) -> Transformation {
        Transformation {
            rotation,
            ..Transformation::default()
        }
    }

    pub fn translation(translation: Vec3) -> Transformation {
        Transformation {
            translation,
            ..Transformation::default()
        }
    }

    pub fn new(rotation: Vec3, translation: Vec3) -> Transformation {
        Transformation {
            rotation,
            translation,
            scale: Vec3::ONE,
        }
    }
}

/// Geometry component builder; bones can be toggled by Molang
/// conditions (`bone_visibility`).
#[derive(Debug, Clone)]
pub struct Geometry {
    identifier: String,
    bones: Vec<(String, String)>,
}

impl Geometry {
    pub fn new(identifier: impl Into<String>) -> Geometry {
        Geometry {
            identifier: identifier.into(),
            bones: Vec::new(),
        }
    }

    pub fn full_block() -> Geometry {
        Geometry::new(geometry_ids::FULL_BLOCK)
    }

    pub fn bone(mut self, bone: impl Into<String>, condition: impl Into<String>) -> Geometry {
        self.bones.push((bone.into(), condition.into()));
        self
    }

    pub fn build(self) -> Component {
        let mut payload = Compound::new().set("identifier", Tag::str(&self.identifier));
        if !self.bones.is_empty() {
            let mut visibility = Compound::new();
            for (bone, condition) in &self.bones {
                visibility = visibility.set(bone.clone(), Tag::str(condition));
            }
            payload = payload.set("bone_visibility", visibility);
        }
        Component::new(component_ids::GEOMETRY, payload.into())
    }
}

/// Texture target faces for material instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialTarget {
    All,
    Up,
    Down,
    North,
    South,
    East,
    West,
    Side,
}

impl MaterialTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            MaterialTarget::All => "*",
            MaterialTarget::Up => "up",
            MaterialTarget::Down => "down",
            MaterialTarget::North => "north",
            MaterialTarget::South => "south",
            MaterialTarget::East => "east",
            MaterialTarget::West => "west",
            MaterialTarget::Side => "side",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMethod {
    Opaque,
    AlphaTest,
    AlphaTestSingleSided,
    Blend,
    DoubleSided,
}

impl RenderMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMethod::Opaque => "opaque",
            RenderMethod::AlphaTest => "alpha_test",
            RenderMethod::AlphaTestSingleSided => "alpha_test_single_sided",
            RenderMethod::Blend => "blend",
            RenderMethod::DoubleSided => "double_sided",
        }
    }
}

/// One material instance: texture plus render settings for a face set.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub texture: String,
    pub target: MaterialTarget,
    pub render_method: RenderMethod,
    pub ambient_occlusion: bool,
    pub face_dimming: bool,
}

impl Material {
    pub fn new(texture: impl Into<String>, render_method: RenderMethod) -> Material {
        Material {
            texture: texture.into(),
            target: MaterialTarget::All,
            render_method,
            ambient_occlusion: true,
            face_dimming: true,
        }
    }

    pub fn target(mut self, target: MaterialTarget) -> Material {
        self.target = target;
        self
    }

    pub fn ambient_occlusion(mut self, on: bool) -> Material {
        self.ambient_occlusion = on;
        self
    }

    pub fn face_dimming(mut self, on: bool) -> Material {
        self.face_dimming = on;
        self
    }
}

impl Component {
    pub fn material_instances(materials: &[Material]) -> Component {
        let mut mapping = Compound::new();
        for material in materials {
            mapping = mapping.set(
                material.target.as_str(),
                Compound::new()
                    .set("texture", Tag::str(&material.texture))
                    .set("render_method", Tag::str(material.render_method.as_str()))
                    .set("ambient_occlusion", Tag::bool(material.ambient_occlusion))
                    .set("face_dimming", Tag::bool(material.face_dimming)),
            );
        }
        Component::new(
            component_ids::MATERIAL_INSTANCES,
            Compound::new().set("materials", mapping).into(),
        )
    }
}

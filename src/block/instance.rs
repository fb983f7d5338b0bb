//! Host-side block interface.
//!
//! The compiler never owns game objects; it consults a live block
//! instance through this narrow trait: physical accessors for the
//! auto-detected default components, and a closed shape classifier plus
//! a typed state snapshot for the shape-family recipes. The closed
//! `ShapeClass`/`ShapeState` enums replace open-ended instance-of
//! chains so the recipe set stays exhaustively checkable.

use crate::error::{ForgeError, ForgeResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Factory producing a live instance from a numeric block id.
pub type InstanceFactory = Arc<dyn Fn(u32) -> Box<dyn BlockInstance> + Send + Sync>;

/// Narrow view of a live block instance.
pub trait BlockInstance: Send + Sync {
    fn is_transparent(&self) -> bool {
        false
    }

    fn has_collision(&self) -> bool {
        true
    }

    fn blast_resistance(&self) -> f32 {
        5.0
    }

    fn hardness(&self) -> f32 {
        1.0
    }

    fn friction_factor(&self) -> f32 {
        0.6
    }

    fn light_level(&self) -> u8 {
        0
    }

    /// Thin plant-like blocks accept connection rules.
    fn is_flowable(&self) -> bool {
        false
    }

    /// Blocks backed by a container tile get the custom-components
    /// marker.
    fn has_container_tile(&self) -> bool {
        false
    }

    /// Capability classifier deciding which shape-family recipe (if
    /// any) applies.
    fn shape(&self) -> ShapeClass {
        ShapeClass::Plain
    }

    /// Current values of the shape-relevant state axes.
    fn shape_state(&self) -> ShapeState {
        ShapeState::Stateless
    }

    /// Structural copy carrying the given state. Fails when the state
    /// variant does not belong to this instance's shape.
    fn with_shape_state(&self, state: ShapeState) -> ForgeResult<Box<dyn BlockInstance>>;

    fn boxed_clone(&self) -> Box<dyn BlockInstance>;
}

impl Clone for Box<dyn BlockInstance> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// Horizontal directions, in the canonical north/south/west/east order
/// the recipes enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinal {
    North,
    South,
    West,
    East,
}

impl Cardinal {
    pub const ALL: [Cardinal; 4] = [
        Cardinal::North,
        Cardinal::South,
        Cardinal::West,
        Cardinal::East,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Cardinal::North => "north",
            Cardinal::South => "south",
            Cardinal::West => "west",
            Cardinal::East => "east",
        }
    }

    pub fn from_str(value: &str) -> ForgeResult<Cardinal> {
        match value {
            "north" => Ok(Cardinal::North),
            "south" => Ok(Cardinal::South),
            "west" => Ok(Cardinal::West),
            "east" => Ok(Cardinal::East),
            other => Err(ForgeError::InvalidEnum {
                what: "cardinal direction",
                value: other.to_string(),
            }),
        }
    }

    /// Numeric facing index used by `facing_direction` style
    /// properties (2..=5).
    pub fn facing_index(self) -> i32 {
        match self {
            Cardinal::North => 2,
            Cardinal::South => 3,
            Cardinal::West => 4,
            Cardinal::East => 5,
        }
    }

    pub fn from_facing_index(value: i32) -> ForgeResult<Cardinal> {
        match value {
            2 => Ok(Cardinal::North),
            3 => Ok(Cardinal::South),
            4 => Ok(Cardinal::West),
            5 => Ok(Cardinal::East),
            other => Err(ForgeError::InvalidEnum {
                what: "horizontal facing index",
                value: other.to_string(),
            }),
        }
    }
}

/// Full six-direction facing with the standard 0..=5 indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Facing {
    pub fn index(self) -> i32 {
        match self {
            Facing::Down => 0,
            Facing::Up => 1,
            Facing::North => 2,
            Facing::South => 3,
            Facing::West => 4,
            Facing::East => 5,
        }
    }

    pub fn from_index(value: i32) -> ForgeResult<Facing> {
        match value {
            0 => Ok(Facing::Down),
            1 => Ok(Facing::Up),
            2 => Ok(Facing::North),
            3 => Ok(Facing::South),
            4 => Ok(Facing::West),
            5 => Ok(Facing::East),
            other => Err(ForgeError::InvalidEnum {
                what: "facing index",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlabHalf {
    Bottom,
    Top,
    Double,
}

impl SlabHalf {
    pub const ALL: [SlabHalf; 3] = [SlabHalf::Bottom, SlabHalf::Top, SlabHalf::Double];

    pub fn as_str(self) -> &'static str {
        match self {
            SlabHalf::Bottom => "bottom",
            SlabHalf::Top => "top",
            SlabHalf::Double => "double",
        }
    }

    pub fn from_str(value: &str) -> ForgeResult<SlabHalf> {
        match value {
            "bottom" => Ok(SlabHalf::Bottom),
            "top" => Ok(SlabHalf::Top),
            "double" => Ok(SlabHalf::Double),
            other => Err(ForgeError::InvalidEnum {
                what: "slab half",
                value: other.to_string(),
            }),
        }
    }
}

/// Wall arm state per side, encoded 0/1/2 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallConnection {
    None,
    Short,
    Tall,
}

impl WallConnection {
    pub const ALL: [WallConnection; 3] = [
        WallConnection::None,
        WallConnection::Short,
        WallConnection::Tall,
    ];

    pub fn encode(self) -> i32 {
        match self {
            WallConnection::None => 0,
            WallConnection::Short => 1,
            WallConnection::Tall => 2,
        }
    }

    pub fn decode(value: i32) -> ForgeResult<WallConnection> {
        match value {
            0 => Ok(WallConnection::None),
            1 => Ok(WallConnection::Short),
            2 => Ok(WallConnection::Tall),
            other => Err(ForgeError::InvalidEnum {
                what: "wall connection type",
                value: other.to_string(),
            }),
        }
    }
}

/// The eight lever orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeverFacing {
    DownAxisZ,
    DownAxisX,
    UpAxisZ,
    UpAxisX,
    North,
    South,
    West,
    East,
}

impl LeverFacing {
    pub const ALL: [LeverFacing; 8] = [
        LeverFacing::DownAxisZ,
        LeverFacing::DownAxisX,
        LeverFacing::UpAxisZ,
        LeverFacing::UpAxisX,
        LeverFacing::North,
        LeverFacing::South,
        LeverFacing::West,
        LeverFacing::East,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LeverFacing::DownAxisZ => "down_north_south",
            LeverFacing::DownAxisX => "down_east_west",
            LeverFacing::UpAxisZ => "up_north_south",
            LeverFacing::UpAxisX => "up_east_west",
            LeverFacing::North => "north",
            LeverFacing::South => "south",
            LeverFacing::West => "west",
            LeverFacing::East => "east",
        }
    }

    pub fn from_str(value: &str) -> ForgeResult<LeverFacing> {
        LeverFacing::ALL
            .into_iter()
            .find(|f| f.as_str() == value)
            .ok_or_else(|| ForgeError::InvalidEnum {
                what: "lever direction",
                value: value.to_string(),
            })
    }
}

/// Set of connected horizontal faces (fences, glass panes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FaceSet {
    north: bool,
    south: bool,
    west: bool,
    east: bool,
}

impl FaceSet {
    pub fn new() -> FaceSet {
        FaceSet::default()
    }

    pub fn contains(&self, face: Cardinal) -> bool {
        match face {
            Cardinal::North => self.north,
            Cardinal::South => self.south,
            Cardinal::West => self.west,
            Cardinal::East => self.east,
        }
    }

    pub fn with(mut self, face: Cardinal, connected: bool) -> FaceSet {
        match face {
            Cardinal::North => self.north = connected,
            Cardinal::South => self.south = connected,
            Cardinal::West => self.west = connected,
            Cardinal::East => self.east = connected,
        }
        self
    }

    /// All sixteen combinations, north varying slowest and east
    /// fastest, matching the property declaration order.
    pub fn all_combinations() -> impl Iterator<Item = FaceSet> {
        (0..16u8).map(|bits| FaceSet {
            north: bits & 8 != 0,
            south: bits & 4 != 0,
            west: bits & 2 != 0,
            east: bits & 1 != 0,
        })
    }
}

/// Closed classifier over the supported shape families. Parameters
/// carry the per-family capabilities the recipes need (growth bounds,
/// head rotation range).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeClass {
    Plain,
    Crop { max_age: i32 },
    Mushroom { max_age: i32 },
    NetherPlant { max_age: i32 },
    Flower,
    Slab,
    Door,
    Fence,
    FenceGate,
    Wall,
    Trapdoor,
    Hopper,
    Head { max_rotation: i32 },
    Ladder,
    Farmland,
    GlassPane,
    Lever,
}

impl ShapeClass {
    pub fn family_name(&self) -> &'static str {
        match self {
            ShapeClass::Plain => "plain",
            ShapeClass::Crop { .. } => "crop",
            ShapeClass::Mushroom { .. } => "mushroom",
            ShapeClass::NetherPlant { .. } => "nether plant",
            ShapeClass::Flower => "flower",
            ShapeClass::Slab => "slab",
            ShapeClass::Door => "door",
            ShapeClass::Fence => "fence",
            ShapeClass::FenceGate => "fence gate",
            ShapeClass::Wall => "wall",
            ShapeClass::Trapdoor => "trapdoor",
            ShapeClass::Hopper => "hopper",
            ShapeClass::Head { .. } => "head",
            ShapeClass::Ladder => "ladder",
            ShapeClass::Farmland => "farmland",
            ShapeClass::GlassPane => "glass pane",
            ShapeClass::Lever => "lever",
        }
    }
}

/// Typed snapshot of the shape-relevant state of one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeState {
    Stateless,
    Crop { age: i32 },
    Mushroom { age: i32 },
    NetherPlant { age: i32 },
    Slab { half: SlabHalf },
    Door {
        facing: Cardinal,
        upper: bool,
        hinge: bool,
        open: bool,
    },
    Fence { connections: FaceSet },
    FenceGate {
        facing: Cardinal,
        in_wall: bool,
        open: bool,
    },
    Wall {
        post: bool,
        north: WallConnection,
        south: WallConnection,
        west: WallConnection,
        east: WallConnection,
    },
    /// `direction` uses the trapdoor encoding: 0 east, 1 west,
    /// 2 south, 3 north.
    Trapdoor {
        direction: i32,
        top: bool,
        open: bool,
    },
    Hopper { facing: Facing, powered: bool },
    Head { facing: Facing, rotation: i32 },
    Ladder { facing: Cardinal },
    GlassPane { connections: FaceSet },
    Lever {
        facing: LeverFacing,
        activated: bool,
    },
}

impl ShapeState {
    /// Neutral state for a freshly classified shape.
    pub fn default_for(shape: ShapeClass) -> ShapeState {
        match shape {
            ShapeClass::Plain | ShapeClass::Flower | ShapeClass::Farmland => {
                ShapeState::Stateless
            }
            ShapeClass::Crop { .. } => ShapeState::Crop { age: 0 },
            ShapeClass::Mushroom { .. } => ShapeState::Mushroom { age: 0 },
            ShapeClass::NetherPlant { .. } => ShapeState::NetherPlant { age: 0 },
            ShapeClass::Slab => ShapeState::Slab {
                half: SlabHalf::Bottom,
            },
            ShapeClass::Door => ShapeState::Door {
                facing: Cardinal::North,
                upper: false,
                hinge: false,
                open: false,
            },
            ShapeClass::Fence => ShapeState::Fence {
                connections: FaceSet::new(),
            },
            ShapeClass::FenceGate => ShapeState::FenceGate {
                facing: Cardinal::North,
                in_wall: false,
                open: false,
            },
            ShapeClass::Wall => ShapeState::Wall {
                post: true,
                north: WallConnection::None,
                south: WallConnection::None,
                west: WallConnection::None,
                east: WallConnection::None,
            },
            ShapeClass::Trapdoor => ShapeState::Trapdoor {
                direction: 0,
                top: false,
                open: false,
            },
            ShapeClass::Hopper => ShapeState::Hopper {
                facing: Facing::Down,
                powered: false,
            },
            ShapeClass::Head { .. } => ShapeState::Head {
                facing: Facing::Up,
                rotation: 0,
            },
            ShapeClass::Ladder => ShapeState::Ladder {
                facing: Cardinal::North,
            },
            ShapeClass::GlassPane => ShapeState::GlassPane {
                connections: FaceSet::new(),
            },
            ShapeClass::Lever => ShapeState::Lever {
                facing: LeverFacing::North,
                activated: false,
            },
        }
    }

    /// Whether this state variant belongs to the given shape family.
    pub fn belongs_to(&self, shape: ShapeClass) -> bool {
        matches!(
            (self, shape),
            (ShapeState::Stateless, ShapeClass::Plain)
                | (ShapeState::Stateless, ShapeClass::Flower)
                | (ShapeState::Stateless, ShapeClass::Farmland)
                | (ShapeState::Crop { .. }, ShapeClass::Crop { .. })
                | (ShapeState::Mushroom { .. }, ShapeClass::Mushroom { .. })
                | (ShapeState::NetherPlant { .. }, ShapeClass::NetherPlant { .. })
                | (ShapeState::Slab { .. }, ShapeClass::Slab)
                | (ShapeState::Door { .. }, ShapeClass::Door)
                | (ShapeState::Fence { .. }, ShapeClass::Fence)
                | (ShapeState::FenceGate { .. }, ShapeClass::FenceGate)
                | (ShapeState::Wall { .. }, ShapeClass::Wall)
                | (ShapeState::Trapdoor { .. }, ShapeClass::Trapdoor)
                | (ShapeState::Hopper { .. }, ShapeClass::Hopper)
                | (ShapeState::Head { .. }, ShapeClass::Head { .. })
                | (ShapeState::Ladder { .. }, ShapeClass::Ladder)
                | (ShapeState::GlassPane { .. }, ShapeClass::GlassPane)
                | (ShapeState::Lever { .. }, ShapeClass::Lever)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_set_combinations_are_distinct_and_ordered() {
        let combos: Vec<FaceSet> = FaceSet::all_combinations().collect();
        assert_eq!(combos.len(), 16);
        assert_eq!(combos[0], FaceSet::new());
        assert_eq!(combos[1], FaceSet::new().with(Cardinal::East, true));
        assert_eq!(combos[8], FaceSet::new().with(Cardinal::North, true));
        for (i, a) in combos.iter().enumerate() {
            for b in &combos[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn default_state_belongs_to_its_class() {
        for shape in [
            ShapeClass::Plain,
            ShapeClass::Crop { max_age: 7 },
            ShapeClass::Slab,
            ShapeClass::Door,
            ShapeClass::Wall,
            ShapeClass::Lever,
        ] {
            assert!(ShapeState::default_for(shape).belongs_to(shape));
        }
    }

    #[test]
    fn facing_index_round_trips() {
        for dir in Cardinal::ALL {
            assert_eq!(
                Cardinal::from_facing_index(dir.facing_index()).unwrap(),
                dir
            );
        }
        assert!(Cardinal::from_facing_index(6).is_err());
    }
}

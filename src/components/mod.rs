//! Map entity components and the data types the hero shares with them.
//!
//! Map entities live in the map's `hecs::World`; every cross reference
//! (hero, carried object, tracked entity) is a plain `Entity` index.

pub mod character;
pub mod ground;
pub mod physics;

use glam::Vec2;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

pub use character::{Ability, Equipment, Item, ItemKind};
pub use ground::{Ground, GroundMap};
pub use physics::{Movement, MovementKind, Rect};

/// Top-left corner in map pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Bounding box size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size(pub Vec2);

/// Optional script-facing name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

/// Coarse type tag present on every map entity; the collision resolver
/// dispatches on it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Hero,
    Camera,
    Npc,
    Door,
    Enemy,
    Block,
    Crystal,
    CrystalBlock,
    Destructible,
    CarriedObject,
    Teletransporter,
    Sensor,
    Switch,
    Stairs,
    Jumper,
    Separator,
    Pickable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Door {
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub life: i32,
    /// Life points removed from the hero on contact.
    pub damage: i32,
    /// Whether striking it with the sword knocks the hero back.
    pub push_hero_on_sword: bool,
    /// Sword hits are ignored until this date.
    pub recovering_until: u32,
}

impl Enemy {
    pub fn new(life: i32, damage: i32) -> Self {
        Self {
            life,
            damage,
            push_hero_on_sword: false,
            recovering_until: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}

/// Block whose raised/lowered position follows the map's crystal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrystalBlock {
    pub raised_when_crystal_on: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crystal {
    pub next_hit_date: u32,
}

/// Pot, bush or stone the hero can lift when its LIFT level is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destructible {
    pub weight: u8,
    pub damage_on_enemies: i32,
}

/// A destructible turned into an object held or thrown by the hero.
#[derive(Debug, Clone, PartialEq)]
pub struct CarriedObject {
    pub phase: CarryPhase,
    pub damage_on_enemies: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CarryPhase {
    /// Rising above the hero's head until `until`.
    Lifting { until: u32 },
    Carried,
    Thrown {
        direction: Vec2,
        travelled: f32,
        distance: f32,
        speed: f32,
    },
}

impl CarriedObject {
    pub fn is_being_lifted(&self, now: u32) -> bool {
        matches!(self.phase, CarryPhase::Lifting { until } if now < until)
    }

    pub fn is_thrown(&self) -> bool {
        matches!(self.phase, CarryPhase::Thrown { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teletransporter {
    pub destination_map: String,
    pub hero_inside: bool,
}

impl Teletransporter {
    pub fn new(destination_map: impl Into<String>) -> Self {
        Self {
            destination_map: destination_map.into(),
            hero_inside: false,
        }
    }
}

/// Fires once each time the hero enters it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sensor {
    pub hero_inside: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Switch {
    pub activated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pickable {
    pub treasure: String,
    pub amount: u32,
}

//! Scenarios: maps, the hero's starting equipment and a timed command
//! script, loaded from RON.
//!
//! ```ron
//! (
//!     starting_map: Some("field"),
//!     maps: [(id: "field", rows: ["#####", "#...#", "#####"])],
//!     hero: (position: (16.0, 16.0), abilities: [("sword", 1)]),
//!     script: [(at_ms: 100, action: Press("attack"))],
//! )
//! ```

pub mod prefabs;
pub mod test_scene;

use std::path::Path;
use std::str::FromStr;

use glam::Vec2;
use serde::Deserialize;

use crate::camera::{Camera, DEFAULT_VIEWPORT};
use crate::components::{Ability, Equipment, Ground, GroundMap, Item, ItemKind};
use crate::config::HeroConfig;
use crate::engine::{Command, CommandEvent};
use crate::error::{Error, Result};
use crate::hero::{Hero, HeroEvent};
use crate::map::Map;

pub const DEFAULT_TILE_SIZE: f32 = 16.0;

// ---------------------------------------------------------------------------
// Description
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Falls back to the first map when missing or unknown.
    pub starting_map: Option<String>,
    pub maps: Vec<MapDesc>,
    pub hero: HeroDesc,
    pub script: Vec<ScriptStep>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapDesc {
    pub id: String,
    pub tile_size: f32,
    /// One character per tile, see `Ground::from_symbol`.
    pub rows: Vec<String>,
    pub entities: Vec<Placement>,
}

impl Default for MapDesc {
    fn default() -> Self {
        Self {
            id: String::new(),
            tile_size: DEFAULT_TILE_SIZE,
            rows: Vec::new(),
            entities: Vec::new(),
        }
    }
}

/// A map entity. Positions are the top-left corner in pixels.
#[derive(Debug, Clone, Deserialize)]
pub enum Placement {
    Enemy {
        at: (f32, f32),
        life: i32,
        damage: i32,
        #[serde(default)]
        push_hero_on_sword: bool,
    },
    Destructible {
        at: (f32, f32),
        #[serde(default = "default_weight")]
        weight: u8,
        #[serde(default)]
        damage_on_enemies: i32,
    },
    Block {
        at: (f32, f32),
    },
    Npc {
        at: (f32, f32),
    },
    Door {
        at: (f32, f32),
        #[serde(default)]
        open: bool,
    },
    Crystal {
        at: (f32, f32),
    },
    CrystalBlock {
        at: (f32, f32),
        #[serde(default)]
        raised_when_crystal_on: bool,
    },
    Teletransporter {
        at: (f32, f32),
        destination_map: String,
    },
    Sensor {
        at: (f32, f32),
        size: (f32, f32),
    },
    Switch {
        at: (f32, f32),
    },
    Pickable {
        at: (f32, f32),
        treasure: String,
        #[serde(default = "default_amount")]
        amount: u32,
    },
    Stairs {
        at: (f32, f32),
    },
    Jumper {
        at: (f32, f32),
    },
    Separator {
        at: (f32, f32),
        size: (f32, f32),
    },
}

fn default_weight() -> u8 {
    1
}

fn default_amount() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeroDesc {
    pub position: (f32, f32),
    pub max_life: i32,
    /// Ability name and level.
    pub abilities: Vec<(String, u8)>,
    pub items: Vec<ItemDesc>,
    /// Item slot (1 or 2) and item name.
    pub slots: Vec<(u8, String)>,
}

impl Default for HeroDesc {
    fn default() -> Self {
        Self {
            position: (DEFAULT_TILE_SIZE, DEFAULT_TILE_SIZE),
            max_life: 12,
            abilities: Vec::new(),
            items: Vec::new(),
            slots: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub enum ItemDesc {
    RunningBoots { name: String },
    Tool { name: String, use_ms: u32 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptStep {
    pub at_ms: u32,
    pub action: ScriptAction,
}

/// Command names as in `Command`'s snake_case form.
#[derive(Debug, Clone, Deserialize)]
pub enum ScriptAction {
    Press(String),
    Release(String),
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Scenario {
    pub fn from_ron(text: &str, path: &Path) -> Result<Self> {
        ron::from_str(text).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_ron(&text, path)?;
        tracing::info!(path = %path.display(), maps = scenario.maps.len(), "loaded scenario");
        Ok(scenario)
    }

    /// The declared starting map, or the first map if it is missing.
    pub fn starting_map(&self) -> Result<&MapDesc> {
        let first = self.maps.first().ok_or(Error::NoMaps)?;
        let Some(wanted) = self.starting_map.as_deref() else {
            return Ok(first);
        };
        match self.maps.iter().find(|map| map.id == wanted) {
            Some(map) => Ok(map),
            None => {
                tracing::warn!(
                    starting_map = wanted,
                    fallback = %first.id,
                    "unknown starting map, using the first one"
                );
                Ok(first)
            }
        }
    }

    pub fn equipment(&self) -> Result<Equipment> {
        let desc = &self.hero;
        let mut equipment = Equipment::new(desc.max_life);
        for (name, level) in &desc.abilities {
            let ability = parse_name::<Ability>("ability", name)?;
            equipment.set_ability(ability, *level);
        }
        for item in &desc.items {
            equipment.add_item(match item {
                ItemDesc::RunningBoots { name } => Item::new(name.as_str(), ItemKind::RunningBoots),
                ItemDesc::Tool { name, use_ms } => {
                    Item::new(name.as_str(), ItemKind::Tool { use_ms: *use_ms })
                }
            });
        }
        for (slot, name) in &desc.slots {
            equipment.assign_item(*slot, name);
        }
        Ok(equipment)
    }

    /// Script as command events sorted by date.
    pub fn command_script(&self) -> Result<Vec<(u32, CommandEvent)>> {
        let mut script = self
            .script
            .iter()
            .map(|step| {
                let event = match &step.action {
                    ScriptAction::Press(name) => {
                        CommandEvent::Pressed(parse_name::<Command>("command", name)?)
                    }
                    ScriptAction::Release(name) => {
                        CommandEvent::Released(parse_name::<Command>("command", name)?)
                    }
                };
                Ok((step.at_ms, event))
            })
            .collect::<Result<Vec<_>>>()?;
        script.sort_by_key(|(at_ms, _)| *at_ms);
        Ok(script)
    }
}

fn parse_name<T: FromStr>(kind: &'static str, name: &str) -> Result<T> {
    T::from_str(name).map_err(|_| Error::UnknownName {
        kind,
        name: name.to_string(),
    })
}

impl MapDesc {
    /// Build the ground grid and spawn the placements. Short rows are
    /// padded with empty ground.
    pub fn build(&self) -> Result<Map> {
        let width = self.rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut grounds = GroundMap::new(width, self.rows.len(), self.tile_size);
        for (y, row) in self.rows.iter().enumerate() {
            for (x, symbol) in row.chars().enumerate() {
                let ground = Ground::from_symbol(symbol).ok_or_else(|| {
                    Error::UnknownGroundSymbol {
                        map: self.id.clone(),
                        symbol,
                    }
                })?;
                grounds.set_tile(x, y, ground);
            }
            for x in row.chars().count()..width {
                grounds.set_tile(x, y, Ground::Empty);
            }
        }

        let mut map = Map::new(self.id.as_str(), grounds);
        for placement in &self.entities {
            prefabs::spawn_placement(&mut map, placement);
        }
        tracing::debug!(map = %self.id, width, height = self.rows.len(), "map built");
        Ok(map)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A running scenario: one map, the hero on it, a camera following the
/// hero and the remaining script.
pub struct Session {
    pub map: Map,
    pub hero: Hero,
    pub camera: Camera,
    script: Vec<(u32, CommandEvent)>,
    next_step: usize,
    now: u32,
    events: Vec<HeroEvent>,
}

impl Session {
    pub fn new(scenario: &Scenario, config: HeroConfig) -> Result<Self> {
        let desc = scenario.starting_map()?;
        let mut map = desc.build()?;
        let (x, y) = scenario.hero.position;
        let hero = Hero::new(&mut map, Vec2::new(x, y), scenario.equipment()?, config);
        let mut camera = Camera::new(&mut map, DEFAULT_VIEWPORT);
        camera.start_tracking(&mut map, hero.entity());
        tracing::info!(map = %desc.id, "session started");

        Ok(Self {
            map,
            hero,
            camera,
            script: scenario.command_script()?,
            next_step: 0,
            now: 0,
            events: Vec::new(),
        })
    }

    pub fn now(&self) -> u32 {
        self.now
    }

    /// Every hero event since the session started.
    pub fn events(&self) -> &[HeroEvent] {
        &self.events
    }

    /// Advance to `now`: feed due script steps, then run one hero frame.
    pub fn step(&mut self, now: u32) {
        let dt = now.saturating_sub(self.now);
        self.now = now;

        while let Some((at_ms, event)) = self.script.get(self.next_step).copied() {
            if at_ms > now {
                break;
            }
            let commands = self.hero.commands_mut();
            match event {
                CommandEvent::Pressed(command) => commands.press(command),
                CommandEvent::Released(command) => commands.release(command),
            }
            self.next_step += 1;
        }

        self.hero.update(&mut self.map, now);
        self.camera.update(&mut self.map, dt);

        for event in self.hero.drain_events() {
            match &event {
                HeroEvent::Teletransporter { destination_map } => {
                    tracing::info!(%destination_map, "map change requested");
                }
                HeroEvent::GameOver => tracing::info!(at = now, "game over"),
                _ => {}
            }
            self.events.push(event);
        }
    }

    /// Step with a fixed frame duration until `until`.
    pub fn run(&mut self, until: u32, frame_ms: u32) {
        let frame_ms = frame_ms.max(1);
        while self.now < until {
            self.step((self.now + frame_ms).min(until));
        }
    }
}

use glam::Vec2;
use hecs::Entity;

use crate::components::{
    Crystal, CrystalBlock, Destructible, Door, Enemy, EntityKind, Pickable, Sensor, Switch,
    Teletransporter,
};
use crate::map::Map;

use super::{Placement, DEFAULT_TILE_SIZE};

const TILE: Vec2 = Vec2::splat(DEFAULT_TILE_SIZE);

fn vec((x, y): (f32, f32)) -> Vec2 {
    Vec2::new(x, y)
}

/// Spawn whatever a scenario placement describes.
pub fn spawn_placement(map: &mut Map, placement: &Placement) -> Entity {
    match placement {
        Placement::Enemy {
            at,
            life,
            damage,
            push_hero_on_sword,
        } => {
            let enemy = spawn_enemy(map, vec(*at), *life, *damage);
            if let Ok(mut component) = map.world.get::<&mut Enemy>(enemy) {
                component.push_hero_on_sword = *push_hero_on_sword;
            }
            enemy
        }
        Placement::Destructible {
            at,
            weight,
            damage_on_enemies,
        } => spawn_destructible(map, vec(*at), *weight, *damage_on_enemies),
        Placement::Block { at } => map.spawn(EntityKind::Block, vec(*at), TILE),
        Placement::Npc { at } => map.spawn(EntityKind::Npc, vec(*at), TILE),
        Placement::Door { at, open } => spawn_door(map, vec(*at), *open),
        Placement::Crystal { at } => spawn_crystal(map, vec(*at)),
        Placement::CrystalBlock {
            at,
            raised_when_crystal_on,
        } => spawn_crystal_block(map, vec(*at), *raised_when_crystal_on),
        Placement::Teletransporter {
            at,
            destination_map,
        } => spawn_teletransporter(map, vec(*at), destination_map),
        Placement::Sensor { at, size } => spawn_sensor(map, vec(*at), vec(*size)),
        Placement::Switch { at } => spawn_switch(map, vec(*at)),
        Placement::Pickable {
            at,
            treasure,
            amount,
        } => spawn_pickable(map, vec(*at), treasure, *amount),
        Placement::Stairs { at } => map.spawn(EntityKind::Stairs, vec(*at), TILE),
        Placement::Jumper { at } => map.spawn(EntityKind::Jumper, vec(*at), TILE),
        Placement::Separator { at, size } => map.spawn(EntityKind::Separator, vec(*at), vec(*size)),
    }
}

// ---------------------------------------------------------------------------
// Enemies and destructibles
// ---------------------------------------------------------------------------

pub fn spawn_enemy(map: &mut Map, position: Vec2, life: i32, damage: i32) -> Entity {
    let entity = map.spawn(EntityKind::Enemy, position, TILE);
    attach(map, entity, Enemy::new(life, damage));
    entity
}

/// Pot, bush or stone. `weight` is the LIFT level needed to pick it up.
pub fn spawn_destructible(map: &mut Map, position: Vec2, weight: u8, damage_on_enemies: i32) -> Entity {
    let entity = map.spawn(EntityKind::Destructible, position, TILE);
    attach(
        map,
        entity,
        Destructible {
            weight,
            damage_on_enemies,
        },
    );
    entity
}

// ---------------------------------------------------------------------------
// Mechanisms
// ---------------------------------------------------------------------------

pub fn spawn_door(map: &mut Map, position: Vec2, open: bool) -> Entity {
    let entity = map.spawn(EntityKind::Door, position, TILE);
    attach(map, entity, Door { open });
    entity
}

pub fn spawn_crystal(map: &mut Map, position: Vec2) -> Entity {
    let entity = map.spawn(EntityKind::Crystal, position, TILE);
    attach(map, entity, Crystal { next_hit_date: 0 });
    entity
}

pub fn spawn_crystal_block(map: &mut Map, position: Vec2, raised_when_crystal_on: bool) -> Entity {
    let entity = map.spawn(EntityKind::CrystalBlock, position, TILE);
    attach(
        map,
        entity,
        CrystalBlock {
            raised_when_crystal_on,
        },
    );
    entity
}

pub fn spawn_switch(map: &mut Map, position: Vec2) -> Entity {
    let entity = map.spawn(EntityKind::Switch, position, TILE);
    attach(map, entity, Switch::default());
    entity
}

pub fn spawn_sensor(map: &mut Map, position: Vec2, size: Vec2) -> Entity {
    let entity = map.spawn(EntityKind::Sensor, position, size);
    attach(map, entity, Sensor::default());
    entity
}

pub fn spawn_teletransporter(map: &mut Map, position: Vec2, destination_map: &str) -> Entity {
    let entity = map.spawn(EntityKind::Teletransporter, position, TILE);
    attach(map, entity, Teletransporter::new(destination_map));
    entity
}

pub fn spawn_pickable(map: &mut Map, position: Vec2, treasure: &str, amount: u32) -> Entity {
    let entity = map.spawn(EntityKind::Pickable, position, TILE);
    attach(
        map,
        entity,
        Pickable {
            treasure: treasure.to_string(),
            amount,
        },
    );
    entity
}

/// Attach a component to an entity spawned just before.
fn attach(map: &mut Map, entity: Entity, component: impl hecs::Component) {
    if map.world.insert_one(entity, component).is_err() {
        tracing::warn!(?entity, "entity vanished before its component was attached");
    }
}

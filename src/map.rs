//! The map the hero walks on: a ground grid plus a `hecs::World` of map
//! entities.
//!
//! Collision questions are answered here, but the answer always comes from
//! the capability queries of the state passed in. The map never knows which
//! concrete state is asking.

use glam::Vec2;
use hecs::{Entity, World};

use crate::components::physics::direction4_to_vec;
use crate::components::{
    CarriedObject, CarryPhase, CrystalBlock, Destructible, Door, Enemy, EntityKind, Ground,
    GroundMap, Position, Rect, Sensor, Size, Switch, Teletransporter,
};
use crate::config::HeroConfig;
use crate::state::{is_ground_obstacle, State};

pub struct Map {
    id: String,
    pub world: World,
    pub grounds: GroundMap,
    crystal_on: bool,
}

impl Map {
    pub fn new(id: impl Into<String>, grounds: GroundMap) -> Self {
        Self {
            id: id.into(),
            world: World::new(),
            grounds,
            crystal_on: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pixel_size(&self) -> Vec2 {
        self.grounds.pixel_size()
    }

    // -----------------------------------------------------------------------
    // Entities
    // -----------------------------------------------------------------------

    /// Spawn a bare map entity; callers attach the kind-specific component.
    pub fn spawn(&mut self, kind: EntityKind, position: Vec2, size: Vec2) -> Entity {
        self.world.spawn((kind, Position(position), Size(size)))
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    pub fn kind_of(&self, entity: Entity) -> Option<EntityKind> {
        self.world.get::<&EntityKind>(entity).ok().map(|kind| *kind)
    }

    pub fn entity_rect(&self, entity: Entity) -> Option<Rect> {
        let position = self.world.get::<&Position>(entity).ok()?;
        let size = self.world.get::<&Size>(entity).ok()?;
        Some(Rect::new(position.0, size.0))
    }

    pub fn set_position(&mut self, entity: Entity, position: Vec2) {
        if let Ok(mut current) = self.world.get::<&mut Position>(entity) {
            current.0 = position;
        }
    }

    /// Entities whose box overlaps `rect`, in spawn order.
    pub fn overlapping(&self, rect: &Rect) -> Vec<(Entity, EntityKind)> {
        let mut found: Vec<(Entity, EntityKind)> = self
            .world
            .query::<(&EntityKind, &Position, &Size)>()
            .iter()
            .filter(|(_, (_, position, size))| Rect::new(position.0, size.0).overlaps(rect))
            .map(|(entity, (kind, _, _))| (entity, *kind))
            .collect();
        found.sort_by_key(|(entity, _)| entity.id());
        found
    }

    // -----------------------------------------------------------------------
    // Collisions
    // -----------------------------------------------------------------------

    pub fn ground_at(&self, point: Vec2) -> Ground {
        self.grounds.ground_at(point)
    }

    /// Whether `rect` would collide for an actor in `state`. `ignore` is the
    /// actor itself.
    pub fn test_collision(&self, state: &dyn State, rect: Rect, ignore: Entity) -> bool {
        if self
            .grounds
            .grounds_under(rect)
            .any(|ground| is_ground_obstacle(state, ground))
        {
            return true;
        }
        self.overlapping(&rect)
            .into_iter()
            .any(|(entity, _)| entity != ignore && self.is_obstacle_for(state, entity))
    }

    /// Fixed entity kind → obstacle query mapping.
    pub fn is_obstacle_for(&self, state: &dyn State, entity: Entity) -> bool {
        let Some(kind) = self.kind_of(entity) else {
            return false;
        };
        match kind {
            EntityKind::Hero
            | EntityKind::Camera
            | EntityKind::CarriedObject
            | EntityKind::Pickable => false,
            EntityKind::Npc => state.is_npc_obstacle(entity),
            EntityKind::Block => state.is_block_obstacle(entity),
            EntityKind::Crystal => state.is_crystal_obstacle(entity),
            EntityKind::Separator => state.is_separator_obstacle(entity),
            EntityKind::Jumper => state.is_jumper_obstacle(entity),
            EntityKind::Stairs => state.is_stairs_obstacle(entity),
            EntityKind::CrystalBlock => {
                self.is_raised(entity) && state.is_raised_block_obstacle(entity)
            }
            EntityKind::Door => self
                .world
                .get::<&Door>(entity)
                .map(|door| state.is_door_obstacle(&door))
                .unwrap_or(false),
            EntityKind::Enemy => self
                .world
                .get::<&Enemy>(entity)
                .map(|enemy| enemy.is_alive() && state.is_enemy_obstacle(&enemy))
                .unwrap_or(false),
            EntityKind::Destructible => self
                .world
                .get::<&Destructible>(entity)
                .map(|destructible| state.is_destructible_obstacle(&destructible))
                .unwrap_or(false),
            EntityKind::Teletransporter => self
                .world
                .get::<&Teletransporter>(entity)
                .map(|teletransporter| state.is_teletransporter_obstacle(&teletransporter))
                .unwrap_or(false),
            EntityKind::Sensor => self
                .world
                .get::<&Sensor>(entity)
                .map(|sensor| state.is_sensor_obstacle(&sensor))
                .unwrap_or(false),
            EntityKind::Switch => self
                .world
                .get::<&Switch>(entity)
                .map(|switch| state.is_switch_obstacle(&switch))
                .unwrap_or(false),
        }
    }

    // -----------------------------------------------------------------------
    // Crystal blocks
    // -----------------------------------------------------------------------

    pub fn is_crystal_on(&self) -> bool {
        self.crystal_on
    }

    /// Flip every crystal block. Returns the new crystal state.
    pub fn toggle_crystal(&mut self) -> bool {
        self.crystal_on = !self.crystal_on;
        self.crystal_on
    }

    pub fn is_raised(&self, block: Entity) -> bool {
        self.world
            .get::<&CrystalBlock>(block)
            .map(|block| block.raised_when_crystal_on == self.crystal_on)
            .unwrap_or(false)
    }

    // -----------------------------------------------------------------------
    // Carried objects
    // -----------------------------------------------------------------------

    /// First destructible in the `reach`-deep strip in front of `rect`.
    pub fn liftable_in_front(
        &self,
        rect: &Rect,
        direction4: u8,
        reach: f32,
    ) -> Option<(Entity, Destructible)> {
        let front = rect.in_front(direction4, reach);
        self.overlapping(&front)
            .into_iter()
            .filter(|(_, kind)| *kind == EntityKind::Destructible)
            .find_map(|(entity, _)| {
                self.world
                    .get::<&Destructible>(entity)
                    .ok()
                    .map(|destructible| (entity, *destructible))
            })
    }

    /// Turn a destructible into an object being lifted until `until`.
    /// Returns `false` if the entity is gone.
    pub fn bind_carried_object(&mut self, entity: Entity, until: u32) -> bool {
        let damage_on_enemies = self
            .world
            .remove_one::<Destructible>(entity)
            .map(|destructible| destructible.damage_on_enemies)
            .unwrap_or(1);
        let inserted = self.world.insert(
            entity,
            (
                EntityKind::CarriedObject,
                CarriedObject {
                    phase: CarryPhase::Lifting { until },
                    damage_on_enemies,
                },
            ),
        );
        if inserted.is_err() {
            tracing::warn!(?entity, "cannot lift an entity that is no longer on the map");
            return false;
        }
        true
    }

    /// `false` once lifted, or when the object no longer exists.
    pub fn is_being_lifted(&self, entity: Entity, now: u32) -> bool {
        self.world
            .get::<&CarriedObject>(entity)
            .map(|object| object.is_being_lifted(now))
            .unwrap_or(false)
    }

    /// Shift the end of the lift, used when resuming from a suspension.
    pub fn delay_lift(&mut self, entity: Entity, delta: u32) {
        if let Ok(mut object) = self.world.get::<&mut CarriedObject>(entity) {
            if let CarryPhase::Lifting { until } = &mut object.phase {
                *until += delta;
            }
        }
    }

    pub fn mark_carried(&mut self, entity: Entity) {
        if let Ok(mut object) = self.world.get::<&mut CarriedObject>(entity) {
            object.phase = CarryPhase::Carried;
        }
    }

    /// Keep a held object above the hero's head.
    pub fn place_above(&mut self, entity: Entity, hero: &Rect) {
        let Some(rect) = self.entity_rect(entity) else {
            return;
        };
        let size = rect.size();
        let position = Vec2::new(hero.center().x - size.x * 0.5, hero.min.y - size.y + 4.0);
        self.set_position(entity, position);
    }

    /// Send a held object flying away from the hero.
    pub fn throw_object(
        &mut self,
        entity: Entity,
        hero: &Rect,
        direction4: u8,
        config: &HeroConfig,
    ) {
        self.place_above(entity, hero);
        if let Ok(mut object) = self.world.get::<&mut CarriedObject>(entity) {
            object.phase = CarryPhase::Thrown {
                direction: direction4_to_vec(direction4),
                travelled: 0.0,
                distance: config.throw_distance,
                speed: config.throw_speed,
            };
        }
    }

    pub fn is_thrown(&self, entity: Entity) -> bool {
        self.world
            .get::<&CarriedObject>(entity)
            .map(|object| object.is_thrown())
            .unwrap_or(false)
    }

    /// Delete an entity. Returns `false` if it was already gone.
    pub fn remove_object(&mut self, entity: Entity) -> bool {
        self.world.despawn(entity).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FreeState;

    fn small_map() -> Map {
        let mut grounds = GroundMap::new(8, 8, 8.0);
        grounds.set_tile(4, 0, Ground::Wall);
        grounds.set_tile(0, 4, Ground::Hole);
        Map::new("small", grounds)
    }

    #[test]
    fn walls_block_and_holes_do_not_for_default_states() {
        let mut map = small_map();
        let hero = map.spawn(EntityKind::Hero, Vec2::ZERO, Vec2::splat(8.0));
        let state = FreeState::new();

        let on_wall = Rect::new(Vec2::new(32.0, 0.0), Vec2::splat(8.0));
        assert!(map.test_collision(&state, on_wall, hero));
        let on_hole = Rect::new(Vec2::new(0.0, 32.0), Vec2::splat(8.0));
        assert!(!map.test_collision(&state, on_hole, hero));
        let outside = Rect::new(Vec2::new(-4.0, 0.0), Vec2::splat(8.0));
        assert!(map.test_collision(&state, outside, hero));
    }

    #[test]
    fn doors_obstruct_only_when_closed() {
        let mut map = small_map();
        let hero = map.spawn(EntityKind::Hero, Vec2::ZERO, Vec2::splat(8.0));
        let door = map.spawn(EntityKind::Door, Vec2::new(16.0, 16.0), Vec2::splat(8.0));
        map.world.insert_one(door, Door { open: false }).unwrap();
        let state = FreeState::new();
        let rect = Rect::new(Vec2::new(12.0, 12.0), Vec2::splat(8.0));

        assert!(map.test_collision(&state, rect, hero));
        map.world.get::<&mut Door>(door).unwrap().open = true;
        assert!(!map.test_collision(&state, rect, hero));
    }

    #[test]
    fn crystal_blocks_follow_the_crystal_state() {
        let mut map = small_map();
        let hero = map.spawn(EntityKind::Hero, Vec2::ZERO, Vec2::splat(8.0));
        let block = map.spawn(EntityKind::CrystalBlock, Vec2::new(16.0, 16.0), Vec2::splat(8.0));
        map.world
            .insert_one(
                block,
                CrystalBlock {
                    raised_when_crystal_on: true,
                },
            )
            .unwrap();
        let state = FreeState::new();
        let rect = Rect::new(Vec2::new(16.0, 16.0), Vec2::splat(8.0));

        assert!(!map.test_collision(&state, rect, hero));
        assert!(map.toggle_crystal());
        assert!(map.test_collision(&state, rect, hero));
    }

    #[test]
    fn lifting_turns_a_destructible_into_a_carried_object() {
        let mut map = small_map();
        let pot = map.spawn(EntityKind::Destructible, Vec2::new(16.0, 0.0), Vec2::splat(8.0));
        map.world
            .insert_one(
                pot,
                Destructible {
                    weight: 1,
                    damage_on_enemies: 2,
                },
            )
            .unwrap();
        let hero_rect = Rect::new(Vec2::new(8.0, 0.0), Vec2::splat(8.0));

        let (found, destructible) = map.liftable_in_front(&hero_rect, 0, 4.0).unwrap();
        assert_eq!(found, pot);
        assert_eq!(destructible.weight, 1);
        assert!(map.liftable_in_front(&hero_rect, 2, 4.0).is_none());

        assert!(map.bind_carried_object(pot, 200));
        assert_eq!(map.kind_of(pot), Some(EntityKind::CarriedObject));
        assert!(map.is_being_lifted(pot, 100));
        map.delay_lift(pot, 100);
        assert!(map.is_being_lifted(pot, 250));
        assert!(!map.is_being_lifted(pot, 300));

        map.throw_object(pot, &hero_rect, 0, &HeroConfig::default());
        assert!(map.is_thrown(pot));
        assert!(map.remove_object(pot));
        assert!(!map.remove_object(pot));
        assert!(!map.is_being_lifted(pot, 0));
    }

    #[test]
    fn lifting_a_removed_entity_is_refused() {
        let mut map = small_map();
        let pot = map.spawn(EntityKind::Destructible, Vec2::ZERO, Vec2::splat(8.0));
        assert!(map.remove_object(pot));

        assert!(!map.bind_carried_object(pot, 200));
        assert!(!map.contains(pot));
        assert!(!map.is_being_lifted(pot, 100));
    }
}

use glam::Vec2;
use hecs::Entity;

use crate::components::{CarriedObject, CarryPhase, Enemy, EntityKind, Ground, Position, Rect, Size};
use crate::hero::HeroEvent;
use crate::state::{Attack, AttackResult, State, StateContext};

/// Fly thrown objects. They break on walls, at the end of their distance,
/// or on the first enemy they hit.
pub fn carried_object_system(state: &mut dyn State, ctx: &mut StateContext<'_>, dt: u32) {
    let thrown: Vec<(Entity, Rect, Vec2, f32, f32, f32, i32)> = ctx
        .map
        .world
        .query::<(&CarriedObject, &Position, &Size)>()
        .iter()
        .filter_map(|(entity, (object, position, size))| match object.phase {
            CarryPhase::Thrown {
                direction,
                travelled,
                distance,
                speed,
            } => Some((
                entity,
                Rect::new(position.0, size.0),
                direction,
                travelled,
                distance,
                speed,
                object.damage_on_enemies,
            )),
            _ => None,
        })
        .collect();

    for (entity, rect, direction, travelled, distance, speed, damage) in thrown {
        let step = (speed * dt as f32 / 1000.0).min(distance - travelled).max(0.0);
        let moved = rect.translated(direction * step);
        let travelled = travelled + step;

        let hits_wall = ctx
            .map
            .grounds
            .grounds_under(moved)
            .any(|ground| matches!(ground, Ground::Wall | Ground::LowWall));
        let enemy = ctx
            .map
            .overlapping(&moved)
            .into_iter()
            .find(|(_, kind)| *kind == EntityKind::Enemy)
            .map(|(enemy, _)| enemy);

        if let Some(enemy) = enemy {
            hit_enemy(state, ctx, enemy, damage);
        }
        if hits_wall || enemy.is_some() || travelled >= distance {
            tracing::trace!(?entity, travelled, "thrown object breaks");
            ctx.map.remove_object(entity);
            ctx.body.push_event(HeroEvent::ObjectRemoved(entity));
            continue;
        }

        ctx.map.set_position(entity, moved.min);
        if let Ok(mut object) = ctx.map.world.get::<&mut CarriedObject>(entity) {
            if let CarryPhase::Thrown { travelled: t, .. } = &mut object.phase {
                *t = travelled;
            }
        }
    }
}

fn hit_enemy(state: &mut dyn State, ctx: &mut StateContext<'_>, entity: Entity, damage: i32) {
    let result = {
        let Ok(mut enemy) = ctx.map.world.get::<&mut Enemy>(entity) else {
            return;
        };
        if !enemy.is_alive() {
            return;
        }
        enemy.life -= damage;
        if enemy.is_alive() {
            AttackResult::Hurt { damage }
        } else {
            AttackResult::Killed
        }
    };
    let killed = result == AttackResult::Killed;
    ctx.body.push_event(HeroEvent::EnemyHit {
        enemy: entity,
        damage,
        killed,
    });
    state.notify_attacked_enemy(ctx, Attack::ThrownObject, entity, result, false);
    if killed {
        ctx.map.remove_object(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crate::components::{Destructible, Equipment, GroundMap};
    use crate::config::HeroConfig;
    use crate::engine::Commands;
    use crate::hero::HeroBody;
    use crate::map::Map;
    use crate::state::FreeState;

    fn thrown_pot(map: &mut Map, hero: &Rect) -> Entity {
        let pot = map.spawn(EntityKind::Destructible, hero.min, Vec2::splat(8.0));
        map.world
            .insert_one(
                pot,
                Destructible {
                    weight: 1,
                    damage_on_enemies: 2,
                },
            )
            .unwrap();
        map.bind_carried_object(pot, 0);
        map.throw_object(pot, hero, 0, &HeroConfig::default());
        pot
    }

    #[test]
    fn thrown_objects_break_after_their_distance() {
        let mut map = Map::new("field", GroundMap::new(40, 10, 8.0));
        let hero = map.spawn(EntityKind::Hero, Vec2::new(16.0, 32.0), Vec2::splat(16.0));
        let mut body = HeroBody::new(hero, Vec2::new(16.0, 32.0), Equipment::default(), HeroConfig::default());
        let pot = thrown_pot(&mut map, &body.rect());
        let commands = Commands::new();
        let mut requests = VecDeque::new();
        let mut state = FreeState::new();
        let mut ctx = StateContext::new(&mut body, &mut map, &commands, 0, None, &mut requests);

        carried_object_system(&mut state, &mut ctx, 100);
        assert!(ctx.map.contains(pot));
        // 200 px/s over 64 px.
        for _ in 0..3 {
            carried_object_system(&mut state, &mut ctx, 100);
        }
        assert!(!ctx.map.contains(pot));
        assert!(ctx.body.events.contains(&HeroEvent::ObjectRemoved(pot)));
    }

    #[test]
    fn thrown_objects_damage_enemies() {
        let mut map = Map::new("field", GroundMap::new(40, 10, 8.0));
        let hero = map.spawn(EntityKind::Hero, Vec2::new(16.0, 32.0), Vec2::splat(16.0));
        let mut body = HeroBody::new(hero, Vec2::new(16.0, 32.0), Equipment::default(), HeroConfig::default());
        let pot = thrown_pot(&mut map, &body.rect());
        let enemy = map.spawn(EntityKind::Enemy, Vec2::new(40.0, 24.0), Vec2::splat(16.0));
        map.world.insert_one(enemy, Enemy::new(5, 1)).unwrap();
        let commands = Commands::new();
        let mut requests = VecDeque::new();
        let mut state = FreeState::new();
        let mut ctx = StateContext::new(&mut body, &mut map, &commands, 0, None, &mut requests);

        for _ in 0..4 {
            carried_object_system(&mut state, &mut ctx, 50);
        }

        assert!(!ctx.map.contains(pot));
        assert_eq!(ctx.map.world.get::<&Enemy>(enemy).unwrap().life, 3);
    }
}

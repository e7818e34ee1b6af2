use hecs::Entity;

use crate::components::{
    Crystal, Enemy, EntityKind, Pickable, Position, Rect, Sensor, Size, Switch, Teletransporter,
};
use crate::hero::HeroEvent;
use crate::state::{Attack, AttackResult, Attacker, State, StateContext};

/// Resolve what the hero touches or cuts this frame: enemies, crystals,
/// pickables, teletransporters, sensors and switches.
pub fn detector_system(state: &mut dyn State, ctx: &mut StateContext<'_>) {
    let candidates: Vec<(Entity, EntityKind, Rect)> = ctx
        .map
        .world
        .query::<(&EntityKind, &Position, &Size)>()
        .iter()
        .map(|(entity, (kind, position, size))| (entity, *kind, Rect::new(position.0, size.0)))
        .collect();
    let hero_rect = ctx.body.rect();

    for (entity, kind, rect) in candidates {
        if !ctx.map.contains(entity) {
            continue;
        }
        let touching = hero_rect.overlaps(&rect);
        match kind {
            EntityKind::Enemy => {
                if state.is_cutting_with_sword(ctx.body, &rect) {
                    sword_hit_enemy(state, ctx, entity);
                } else if touching {
                    enemy_touches_hero(state, ctx, entity, rect);
                }
            }
            EntityKind::Crystal => {
                if state.can_sword_hit_crystal() && state.is_cutting_with_sword(ctx.body, &rect) {
                    sword_hit_crystal(ctx, entity);
                }
            }
            EntityKind::Pickable if touching => pick_treasure(state, ctx, entity),
            EntityKind::Teletransporter => {
                let active = touching && !state.can_avoid_teletransporter();
                let destination = match ctx.map.world.get::<&mut Teletransporter>(entity) {
                    Ok(mut teletransporter) => {
                        let entered = active && !teletransporter.hero_inside;
                        teletransporter.hero_inside = touching;
                        entered.then(|| teletransporter.destination_map.clone())
                    }
                    Err(_) => None,
                };
                if let Some(destination_map) = destination {
                    tracing::info!(%destination_map, "teletransporter taken");
                    ctx.body
                        .push_event(HeroEvent::Teletransporter { destination_map });
                }
            }
            EntityKind::Sensor => {
                let active = touching && !state.can_avoid_sensor();
                let entered = match ctx.map.world.get::<&mut Sensor>(entity) {
                    Ok(mut sensor) => {
                        let entered = active && !sensor.hero_inside;
                        sensor.hero_inside = touching;
                        entered
                    }
                    Err(_) => false,
                };
                if entered {
                    ctx.body.push_event(HeroEvent::SensorActivated(entity));
                }
            }
            EntityKind::Switch if touching && !state.can_avoid_switch() => {
                let activated = match ctx.map.world.get::<&mut Switch>(entity) {
                    Ok(mut switch) if !switch.activated => {
                        switch.activated = true;
                        true
                    }
                    _ => false,
                };
                if activated {
                    ctx.body.push_event(HeroEvent::SwitchActivated(entity));
                }
            }
            _ => {}
        }
    }
}

fn sword_hit_enemy(state: &mut dyn State, ctx: &mut StateContext<'_>, entity: Entity) {
    let factor = state.get_sword_damage_factor(ctx.body);
    let recovery = ctx.config().enemy_recovery_ms;
    let now = ctx.now;
    let (result, push_hero) = {
        let Ok(mut enemy) = ctx.map.world.get::<&mut Enemy>(entity) else {
            return;
        };
        if !enemy.is_alive() || now < enemy.recovering_until || factor <= 0 {
            return;
        }
        enemy.life -= factor;
        enemy.recovering_until = now + recovery;
        let result = if enemy.is_alive() {
            AttackResult::Hurt { damage: factor }
        } else {
            AttackResult::Killed
        };
        (result, enemy.push_hero_on_sword)
    };

    let killed = result == AttackResult::Killed;
    tracing::debug!(?entity, damage = factor, killed, "enemy hit with the sword");
    ctx.body.push_event(HeroEvent::EnemyHit {
        enemy: entity,
        damage: factor,
        killed,
    });
    state.notify_attacked_enemy(ctx, Attack::Sword, entity, result, push_hero);
    if killed {
        ctx.map.remove_object(entity);
    }
}

fn enemy_touches_hero(state: &mut dyn State, ctx: &mut StateContext<'_>, entity: Entity, rect: Rect) {
    let damage = match ctx.map.world.get::<&Enemy>(entity) {
        Ok(enemy) if enemy.is_alive() => enemy.damage,
        _ => return,
    };
    ctx.try_hurt(&*state, Attacker::Enemy(entity), rect.center(), damage);
}

fn sword_hit_crystal(ctx: &mut StateContext<'_>, entity: Entity) {
    let delay = ctx.config().crystal_hit_delay_ms;
    let now = ctx.now;
    let hit = match ctx.map.world.get::<&mut Crystal>(entity) {
        Ok(mut crystal) if now >= crystal.next_hit_date => {
            crystal.next_hit_date = now + delay;
            true
        }
        _ => false,
    };
    if hit {
        let on = ctx.map.toggle_crystal();
        ctx.body.push_event(HeroEvent::CrystalToggled { on });
    }
}

fn pick_treasure(state: &mut dyn State, ctx: &mut StateContext<'_>, entity: Entity) {
    let Some(pickable) = ctx.map.world.get::<&Pickable>(entity).ok().map(|p| (*p).clone()) else {
        return;
    };
    if !state.get_can_pick_treasure(&pickable.treasure) {
        return;
    }
    ctx.body
        .equipment
        .obtain_treasure(&pickable.treasure, pickable.amount);
    ctx.map.remove_object(entity);
    ctx.body.push_event(HeroEvent::TreasurePicked {
        treasure: pickable.treasure,
        amount: pickable.amount,
    });
}

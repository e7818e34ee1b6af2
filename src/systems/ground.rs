use crate::components::{Ability, Ground};
use crate::state::{Attacker, FallCause, FallingState, State, StateContext, SwimmingState};

/// Apply the effects of the ground under the hero's center.
pub fn ground_system(state: &mut dyn State, ctx: &mut StateContext<'_>) {
    let ground = ctx.map.ground_at(ctx.body.center());
    if ground != ctx.body.ground_below {
        tracing::trace!(from = %ctx.body.ground_below, to = %ground, "ground below changed");
        ctx.body.ground_below = ground;
        state.notify_ground_below_changed(ctx);
    }

    let slowed = match ground {
        Ground::Grass => state.is_affected_by_grass(),
        Ground::ShallowWater => state.is_affected_by_shallow_water(),
        Ground::Ladder => state.is_affected_by_ladder(),
        _ => false,
    };
    let speed = if slowed {
        ctx.config().slowed_walking_speed()
    } else {
        ctx.config().walking_speed
    };
    if ctx.body.set_walking_speed(speed) {
        state.notify_walking_speed_changed(ctx);
    }

    if ctx.has_pending_transition() {
        return;
    }

    match ground {
        Ground::Hole if !state.can_avoid_hole() => {
            ctx.set_state(FallingState::new(FallCause::Hole));
        }
        Ground::Lava if !state.can_avoid_lava() => {
            ctx.set_state(FallingState::new(FallCause::Lava));
        }
        Ground::DeepWater if !state.can_avoid_deep_water() => {
            if ctx.body.equipment.has_ability(Ability::Swim) {
                ctx.set_state(SwimmingState::new());
            } else {
                ctx.set_state(FallingState::new(FallCause::Drown));
            }
        }
        Ground::Prickle if !state.can_avoid_prickle() => {
            // Pushed back the way the hero came from.
            let source = ctx.body.center() + ctx.body.facing_vec() * 8.0;
            let damage = ctx.config().prickle_damage;
            ctx.try_hurt(&*state, Attacker::Ground, source, damage);
        }
        _ => {}
    }

    if ground.is_solid() && state.is_touching_ground() && state.can_come_from_bad_ground() {
        ctx.body.last_solid_ground = ctx.body.position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use glam::Vec2;

    use crate::components::{EntityKind, Equipment, GroundMap};
    use crate::config::HeroConfig;
    use crate::engine::{Command, Commands};
    use crate::hero::HeroBody;
    use crate::map::Map;
    use crate::state::{FreeState, RunningState};

    fn map_with(ground: Ground) -> Map {
        let mut grounds = GroundMap::new(4, 4, 8.0);
        grounds.set_tile(1, 1, ground);
        Map::new("test", grounds)
    }

    fn body_on(map: &mut Map, equipment: Equipment) -> HeroBody {
        // Center at (12, 12), inside tile (1, 1).
        let position = Vec2::new(4.0, 4.0);
        let entity = map.spawn(EntityKind::Hero, position, Vec2::splat(16.0));
        HeroBody::new(entity, position, equipment, HeroConfig::default())
    }

    #[test]
    fn grass_slows_the_hero_down() {
        let mut map = map_with(Ground::Grass);
        let mut body = body_on(&mut map, Equipment::default());
        let commands = Commands::new();
        let mut requests = VecDeque::new();
        let mut state = FreeState::new();
        let mut ctx = StateContext::new(&mut body, &mut map, &commands, 0, None, &mut requests);

        ground_system(&mut state, &mut ctx);

        assert_eq!(ctx.body.ground_below, Ground::Grass);
        assert!((ctx.body.walking_speed() - 88.0 * 0.8).abs() < 1e-4);
        assert!(!ctx.has_pending_transition());
    }

    #[test]
    fn holes_make_the_hero_fall_unless_avoided() {
        let mut map = map_with(Ground::Hole);
        let mut body = body_on(&mut map, Equipment::default());
        let commands = Commands::new();
        let mut requests = VecDeque::new();
        {
            let mut state = FreeState::new();
            let mut ctx =
                StateContext::new(&mut body, &mut map, &commands, 0, None, &mut requests);
            ground_system(&mut state, &mut ctx);
        }
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name(), "falling");

        requests.clear();
        body.ground_below = Ground::Traversable;
        // A running state that has not bounced does not avoid holes either.
        let mut running = RunningState::new(Command::Action);
        assert!(!running.can_avoid_hole());
        let mut ctx = StateContext::new(&mut body, &mut map, &commands, 0, None, &mut requests);
        ground_system(&mut running, &mut ctx);
        assert!(ctx.has_pending_transition());
    }

    #[test]
    fn deep_water_depends_on_the_swim_ability() {
        let mut map = map_with(Ground::DeepWater);
        let mut body = body_on(&mut map, Equipment::default().with_ability(Ability::Swim, 1));
        let commands = Commands::new();
        let mut requests = VecDeque::new();
        let mut state = FreeState::new();
        let mut ctx = StateContext::new(&mut body, &mut map, &commands, 0, None, &mut requests);

        ground_system(&mut state, &mut ctx);
        drop(ctx);

        assert_eq!(requests[0].name(), "swimming");
    }

    #[test]
    fn prickles_hurt_through_the_state() {
        let mut map = map_with(Ground::Prickle);
        let mut body = body_on(&mut map, Equipment::default());
        let commands = Commands::new();
        let mut requests = VecDeque::new();
        let mut state = FreeState::new();
        let mut ctx = StateContext::new(&mut body, &mut map, &commands, 0, None, &mut requests);

        ground_system(&mut state, &mut ctx);
        assert!(ctx.body.is_invincible(1));
        drop(ctx);

        assert_eq!(requests[0].name(), "hurt");
    }
}

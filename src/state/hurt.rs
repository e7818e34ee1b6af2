use glam::Vec2;

use crate::components::physics::angle_between;
use crate::components::Movement;
use crate::fsm::StateCore;
use crate::hero::HeroEvent;

use super::{State, StateContext};

/// Knocked back after taking damage.
pub struct HurtState {
    core: StateCore,
    source: Vec2,
    damage: i32,
    finished: bool,
}

impl HurtState {
    /// `source` is the point the hero is pushed away from.
    pub fn new(source: Vec2, damage: i32) -> Self {
        Self {
            core: StateCore::new("hurt"),
            source,
            damage,
            finished: false,
        }
    }

    fn finish(&mut self, ctx: &mut StateContext<'_>) {
        if self.finished {
            return;
        }
        self.finished = true;
        ctx.body.stop_movement();
        ctx.start_state_from_ground();
    }
}

impl State for HurtState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn start(&mut self, ctx: &mut StateContext<'_>, _previous: Option<&dyn State>) {
        let taken = ctx.body.equipment.absorbed_damage(self.damage);
        ctx.body.equipment.remove_life(taken);
        ctx.body.push_event(HeroEvent::Hurt { damage: taken });
        tracing::debug!(taken, life = ctx.body.equipment.life(), "hero hurt");

        let angle = angle_between(self.source, ctx.body.center());
        let (speed, distance) = (ctx.config().hurt_speed, ctx.config().hurt_distance);
        ctx.body.movement = Some(Movement::straight(angle, speed, distance));
        ctx.body.set_animation("hurt", ctx.now, None);
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) {
        if !self.is_suspended() && ctx.body.movement.is_none() {
            self.finish(ctx);
        }
    }

    fn stop(&mut self, ctx: &mut StateContext<'_>, _next: &mut dyn State) {
        ctx.body.stop_movement();
    }

    fn notify_movement_finished(&mut self, ctx: &mut StateContext<'_>) {
        self.finish(ctx);
    }

    fn notify_obstacle_reached(&mut self, ctx: &mut StateContext<'_>) {
        self.finish(ctx);
    }

    fn is_direction_locked(&self) -> bool {
        true
    }
}

use hecs::Entity;

use crate::components::physics::angle_between;
use crate::components::{Movement, Rect, Teletransporter};
use crate::engine::Command;
use crate::fsm::StateCore;
use crate::hero::HeroBody;

use super::{
    Attack, AttackResult, Attacker, FreeState, State, StateContext, SwordLoadingState,
};

/// One sword swing.
///
/// Two things must be over before the hero leaves: the swing animation and
/// the knockback movement attached when a struck enemy pushes back. The
/// animation ending is recorded in `sword_finished`; the knockback is the
/// hero's current movement.
pub struct SwordSwingingState {
    core: StateCore,
    attacked: bool,
    sword_finished: bool,
}

impl SwordSwingingState {
    pub fn new() -> Self {
        Self {
            core: StateCore::new("sword_swinging"),
            attacked: false,
            sword_finished: false,
        }
    }

    pub fn has_attacked(&self) -> bool {
        self.attacked
    }

    pub fn is_sword_finished(&self) -> bool {
        self.sword_finished
    }

    fn finish_knockback(&mut self, ctx: &mut StateContext<'_>) {
        ctx.body.stop_movement();
        if self.sword_finished {
            ctx.set_state(FreeState::new());
        }
    }
}

impl Default for SwordSwingingState {
    fn default() -> Self {
        Self::new()
    }
}

impl State for SwordSwingingState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn start(&mut self, ctx: &mut StateContext<'_>, _previous: Option<&dyn State>) {
        ctx.body.stop_movement();
        let duration = ctx.config().sword_animation_ms;
        ctx.body.set_animation("sword", ctx.now, Some(duration));
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) {
        if self.is_suspended() || self.sword_finished {
            return;
        }
        if !ctx.body.is_animation_finished(ctx.now) {
            return;
        }
        self.sword_finished = true;
        if ctx.body.movement.is_some() {
            // Knockback still running: wait for it.
            ctx.body.set_animation("stopped", ctx.now, None);
            return;
        }
        if !self.attacked && ctx.is_command_pressed(Command::Attack) {
            ctx.set_state(SwordLoadingState::new());
        } else {
            ctx.set_state(FreeState::new());
        }
    }

    fn stop(&mut self, ctx: &mut StateContext<'_>, _next: &mut dyn State) {
        ctx.body.stop_movement();
    }

    fn set_suspended(&mut self, ctx: &mut StateContext<'_>, suspended: bool) {
        if self.core.set_suspended(suspended, ctx.now) && !suspended && !self.sword_finished {
            ctx.body.delay_animation(self.core.suspended_duration(ctx.now));
        }
    }

    fn notify_attack_command_pressed(&mut self, ctx: &mut StateContext<'_>) {
        if self.sword_finished && self.get_can_start_sword(ctx.body) {
            ctx.set_state(SwordSwingingState::new());
        }
    }

    fn notify_movement_finished(&mut self, ctx: &mut StateContext<'_>) {
        self.finish_knockback(ctx);
    }

    fn notify_obstacle_reached(&mut self, ctx: &mut StateContext<'_>) {
        self.finish_knockback(ctx);
    }

    fn notify_attacked_enemy(
        &mut self,
        ctx: &mut StateContext<'_>,
        attack: Attack,
        enemy: Entity,
        result: AttackResult,
        push_hero: bool,
    ) {
        if attack != Attack::Sword || result == AttackResult::Ignored {
            return;
        }
        self.attacked = true;
        if !push_hero {
            return;
        }
        let Some(enemy_rect) = ctx.map.entity_rect(enemy) else {
            return;
        };
        let angle = angle_between(enemy_rect.center(), ctx.body.center());
        let (speed, distance) = (
            ctx.config().sword_push_speed,
            ctx.config().sword_push_distance,
        );
        ctx.body.movement = Some(Movement::straight(angle, speed, distance));
    }

    fn get_can_start_sword(&self, body: &HeroBody) -> bool {
        body.movement.is_none()
    }

    fn can_sword_hit_crystal(&self) -> bool {
        true
    }

    fn get_can_be_hurt(&self, _attacker: Attacker) -> bool {
        true
    }

    fn get_can_pick_treasure(&self, _treasure: &str) -> bool {
        true
    }

    fn is_cutting_with_sword(&self, body: &HeroBody, target: &Rect) -> bool {
        !self.sword_finished && body.rect_in_front(body.config.sword_reach).overlaps(target)
    }

    fn is_teletransporter_obstacle(&self, _teletransporter: &Teletransporter) -> bool {
        true
    }
}

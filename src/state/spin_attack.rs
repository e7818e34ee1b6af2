use crate::components::{Rect, Teletransporter};
use crate::fsm::StateCore;
use crate::hero::HeroBody;

use super::{FreeState, State, StateContext};

/// Released loaded sword: the blade sweeps all around the hero.
pub struct SpinAttackState {
    core: StateCore,
    end_date: u32,
}

impl SpinAttackState {
    pub fn new() -> Self {
        Self {
            core: StateCore::new("spin_attack"),
            end_date: 0,
        }
    }
}

impl Default for SpinAttackState {
    fn default() -> Self {
        Self::new()
    }
}

impl State for SpinAttackState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn start(&mut self, ctx: &mut StateContext<'_>, _previous: Option<&dyn State>) {
        ctx.body.stop_movement();
        let duration = ctx.config().spin_attack_ms;
        self.end_date = ctx.now + duration;
        ctx.body.set_animation("spin_attack", ctx.now, Some(duration));
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) {
        if !self.is_suspended() && ctx.now >= self.end_date {
            ctx.set_state(FreeState::new());
        }
    }

    fn set_suspended(&mut self, ctx: &mut StateContext<'_>, suspended: bool) {
        if self.core.set_suspended(suspended, ctx.now) && !suspended {
            let delta = self.core.suspended_duration(ctx.now);
            self.end_date += delta;
            ctx.body.delay_animation(delta);
        }
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn can_sword_hit_crystal(&self) -> bool {
        true
    }

    fn get_sword_damage_factor(&self, body: &HeroBody) -> i32 {
        body.equipment.sword_damage_factor() * 2
    }

    fn is_cutting_with_sword(&self, body: &HeroBody, target: &Rect) -> bool {
        body.rect().inflated(body.config.sword_reach).overlaps(target)
    }

    fn is_teletransporter_obstacle(&self, _teletransporter: &Teletransporter) -> bool {
        true
    }
}

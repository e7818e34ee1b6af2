use crate::fsm::StateCore;
use crate::hero::HeroEvent;

use super::{Attacker, FreeState, PlayerMovement, SpinAttackState, State, StateContext};

/// Attack held after a swing: the hero walks with the sword out, facing a
/// fixed direction, until the sword is loaded for a spin attack.
pub struct SwordLoadingState {
    core: StateCore,
    movement: PlayerMovement,
    sword_loaded_date: u32,
    sword_loaded: bool,
}

impl SwordLoadingState {
    pub fn new() -> Self {
        Self {
            core: StateCore::new("sword_loading"),
            movement: PlayerMovement::new(),
            sword_loaded_date: 0,
            sword_loaded: false,
        }
    }

    pub fn is_sword_loaded(&self) -> bool {
        self.sword_loaded
    }
}

impl Default for SwordLoadingState {
    fn default() -> Self {
        Self::new()
    }
}

impl State for SwordLoadingState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn start(&mut self, ctx: &mut StateContext<'_>, _previous: Option<&dyn State>) {
        let speed = ctx.body.walking_speed();
        self.movement.start(ctx, speed);
        self.sword_loaded_date = ctx.now + ctx.config().spin_attack_delay_ms;
        self.sword_loaded = false;
        ctx.body.set_animation("sword_loading", ctx.now, None);
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) {
        if self.is_suspended() {
            return;
        }
        let slides = !self.can_avoid_ice();
        self.movement.update(ctx, slides);
        if !self.sword_loaded && ctx.now >= self.sword_loaded_date {
            self.sword_loaded = true;
            ctx.body.push_event(HeroEvent::SwordLoaded);
        }
    }

    fn stop(&mut self, ctx: &mut StateContext<'_>, _next: &mut dyn State) {
        self.movement.stop(ctx);
    }

    fn set_suspended(&mut self, ctx: &mut StateContext<'_>, suspended: bool) {
        if self.core.set_suspended(suspended, ctx.now) && !suspended {
            let delta = self.core.suspended_duration(ctx.now);
            self.sword_loaded_date += delta;
            self.movement.delay(delta);
        }
    }

    fn notify_attack_command_released(&mut self, ctx: &mut StateContext<'_>) {
        if self.sword_loaded {
            ctx.set_state(SpinAttackState::new());
        } else {
            ctx.set_state(FreeState::new());
        }
    }

    fn notify_walking_speed_changed(&mut self, ctx: &mut StateContext<'_>) {
        let speed = ctx.body.walking_speed();
        self.movement.set_speed(ctx, speed);
    }

    fn get_can_control_movement(&self) -> bool {
        true
    }

    fn get_wanted_movement_direction8(&self) -> Option<u8> {
        self.movement.wanted_direction8()
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn get_can_be_hurt(&self, _attacker: Attacker) -> bool {
        true
    }

    fn get_can_pick_treasure(&self, _treasure: &str) -> bool {
        true
    }
}

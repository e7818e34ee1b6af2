use crate::components::Ground;
use crate::fsm::StateCore;
use crate::hero::ActionEffect;

use super::{Attacker, CarriedObjectBehavior, PlayerMovement, State, StateContext};

/// Swimming in deep water. Slower than walking; the action command gives a
/// short burst at walking speed.
pub struct SwimmingState {
    core: StateCore,
    movement: PlayerMovement,
    fast_swim_until: Option<u32>,
}

impl SwimmingState {
    pub fn new() -> Self {
        Self {
            core: StateCore::new("swimming"),
            movement: PlayerMovement::new(),
            fast_swim_until: None,
        }
    }

    pub fn is_fast_swimming(&self) -> bool {
        self.fast_swim_until.is_some()
    }

    fn swimming_speed(&self, ctx: &StateContext<'_>) -> f32 {
        let walking = ctx.body.walking_speed();
        if self.is_fast_swimming() {
            walking
        } else {
            walking * ctx.config().swimming_speed_factor
        }
    }
}

impl Default for SwimmingState {
    fn default() -> Self {
        Self::new()
    }
}

impl State for SwimmingState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn start(&mut self, ctx: &mut StateContext<'_>, _previous: Option<&dyn State>) {
        let speed = self.swimming_speed(ctx);
        self.movement.start(ctx, speed);
        ctx.body.set_animation("swimming_slow", ctx.now, None);
        ctx.body.action_effect = ActionEffect::Swim;
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) {
        if self.is_suspended() {
            return;
        }
        self.movement.update(ctx, false);
        if self.fast_swim_until.is_some_and(|until| ctx.now >= until) {
            self.fast_swim_until = None;
            let speed = self.swimming_speed(ctx);
            self.movement.set_speed(ctx, speed);
            ctx.body.set_animation("swimming_slow", ctx.now, None);
        }
    }

    fn stop(&mut self, ctx: &mut StateContext<'_>, _next: &mut dyn State) {
        self.movement.stop(ctx);
        ctx.body.action_effect = ActionEffect::None;
    }

    fn set_suspended(&mut self, ctx: &mut StateContext<'_>, suspended: bool) {
        if self.core.set_suspended(suspended, ctx.now) && !suspended {
            let delta = self.core.suspended_duration(ctx.now);
            if let Some(until) = self.fast_swim_until.as_mut() {
                *until += delta;
            }
            self.movement.delay(delta);
        }
    }

    fn notify_action_command_pressed(&mut self, ctx: &mut StateContext<'_>) {
        if self.is_fast_swimming() {
            return;
        }
        self.fast_swim_until = Some(ctx.now + ctx.config().fast_swim_ms);
        let speed = self.swimming_speed(ctx);
        self.movement.set_speed(ctx, speed);
        ctx.body.set_animation("swimming_fast", ctx.now, None);
    }

    fn notify_ground_below_changed(&mut self, ctx: &mut StateContext<'_>) {
        if ctx.body.ground_below != Ground::DeepWater {
            ctx.start_state_from_ground();
        }
    }

    fn notify_walking_speed_changed(&mut self, ctx: &mut StateContext<'_>) {
        let speed = self.swimming_speed(ctx);
        self.movement.set_speed(ctx, speed);
    }

    fn get_can_control_movement(&self) -> bool {
        true
    }

    fn get_wanted_movement_direction8(&self) -> Option<u8> {
        self.movement.wanted_direction8()
    }

    fn can_avoid_deep_water(&self) -> bool {
        true
    }

    fn get_can_be_hurt(&self, _attacker: Attacker) -> bool {
        true
    }

    fn get_can_pick_treasure(&self, _treasure: &str) -> bool {
        true
    }

    fn get_previous_carried_object_behavior(&self) -> CarriedObjectBehavior {
        CarriedObjectBehavior::Remove
    }
}

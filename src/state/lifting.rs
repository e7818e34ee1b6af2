use hecs::Entity;

use crate::fsm::StateCore;
use crate::hero::{ActionEffect, HeroEvent};

use super::{hand_off_carried_object, Attacker, CarryingState, FreeState, State, StateContext};

/// The hero raises a destructible above its head. Lasts one animation,
/// then carries the object.
pub struct LiftingState {
    core: StateCore,
    object: Option<Entity>,
}

impl LiftingState {
    pub fn new(object: Entity) -> Self {
        Self {
            core: StateCore::new("lifting"),
            object: Some(object),
        }
    }
}

impl State for LiftingState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn start(&mut self, ctx: &mut StateContext<'_>, _previous: Option<&dyn State>) {
        ctx.body.stop_movement();
        let Some(object) = self.object else {
            return;
        };
        let lift_until = ctx.now + ctx.config().object_lift_ms;
        if !ctx.map.bind_carried_object(object, lift_until) {
            self.object = None;
            ctx.set_state(FreeState::new());
            return;
        }
        let rect = ctx.body.rect();
        ctx.map.place_above(object, &rect);

        let duration = ctx.config().lifting_animation_ms;
        ctx.body.set_animation("lifting", ctx.now, Some(duration));
        ctx.body.action_effect = ActionEffect::Throw;
        ctx.body.push_event(HeroEvent::ObjectLifted(object));
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) {
        if self.is_suspended() {
            return;
        }
        let Some(object) = self.object else {
            return;
        };
        if !ctx.map.contains(object) {
            self.object = None;
            ctx.set_state(FreeState::new());
            return;
        }
        if ctx.body.is_animation_finished(ctx.now) && !ctx.map.is_being_lifted(object, ctx.now) {
            self.object = None;
            ctx.map.mark_carried(object);
            ctx.set_state(CarryingState::new(object));
        }
    }

    fn stop(&mut self, ctx: &mut StateContext<'_>, next: &mut dyn State) {
        ctx.body.action_effect = ActionEffect::None;
        if let Some(object) = self.object.take() {
            hand_off_carried_object(ctx, object, next);
        }
    }

    fn set_suspended(&mut self, ctx: &mut StateContext<'_>, suspended: bool) {
        if !self.core.set_suspended(suspended, ctx.now) || suspended {
            return;
        }
        let delta = self.core.suspended_duration(ctx.now);
        ctx.body.delay_animation(delta);
        if let Some(object) = self.object {
            ctx.map.delay_lift(object, delta);
        }
    }

    fn get_can_be_hurt(&self, _attacker: Attacker) -> bool {
        true
    }

    fn get_carried_object(&self) -> Option<Entity> {
        self.object
    }
}

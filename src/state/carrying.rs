use hecs::Entity;

use crate::fsm::StateCore;
use crate::hero::ActionEffect;

use super::{
    hand_off_carried_object, Attacker, CarriedObjectBehavior, FreeState, PlayerMovement, State,
    StateContext,
};

/// The hero walks with an object above its head until it throws it.
pub struct CarryingState {
    core: StateCore,
    object: Option<Entity>,
    movement: PlayerMovement,
}

impl CarryingState {
    pub fn new(object: Entity) -> Self {
        Self {
            core: StateCore::new("carrying"),
            object: Some(object),
            movement: PlayerMovement::new(),
        }
    }

    fn throw(&mut self, ctx: &mut StateContext<'_>) {
        if let Some(object) = self.object.take() {
            ctx.throw_carried_object(object);
            ctx.set_state(FreeState::new());
        }
    }
}

impl State for CarryingState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn start(&mut self, ctx: &mut StateContext<'_>, _previous: Option<&dyn State>) {
        let speed = ctx.body.walking_speed();
        self.movement.start(ctx, speed);
        ctx.body.set_animation("carrying_stopped", ctx.now, None);
        ctx.body.action_effect = ActionEffect::Throw;
        if let Some(object) = self.object {
            ctx.map.mark_carried(object);
        }
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) {
        if self.is_suspended() {
            return;
        }
        let Some(object) = self.object else {
            return;
        };
        if !ctx.map.contains(object) {
            tracing::debug!(?object, "carried object vanished");
            self.object = None;
            ctx.set_state(FreeState::new());
            return;
        }
        let slides = !self.can_avoid_ice();
        self.movement.update(ctx, slides);
        let rect = ctx.body.rect();
        ctx.map.place_above(object, &rect);
    }

    fn stop(&mut self, ctx: &mut StateContext<'_>, next: &mut dyn State) {
        self.movement.stop(ctx);
        ctx.body.action_effect = ActionEffect::None;
        if let Some(object) = self.object.take() {
            hand_off_carried_object(ctx, object, next);
        }
    }

    fn set_suspended(&mut self, ctx: &mut StateContext<'_>, suspended: bool) {
        if self.core.set_suspended(suspended, ctx.now) && !suspended {
            self.movement.delay(self.core.suspended_duration(ctx.now));
        }
    }

    fn notify_action_command_pressed(&mut self, ctx: &mut StateContext<'_>) {
        self.throw(ctx);
    }

    fn notify_attack_command_pressed(&mut self, ctx: &mut StateContext<'_>) {
        self.throw(ctx);
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

    fn can_take_stairs(&self) -> bool {
        true
    }

    fn get_can_be_hurt(&self, _attacker: Attacker) -> bool {
        true
    }

    fn get_can_pick_treasure(&self, _treasure: &str) -> bool {
        true
    }

    fn get_carried_object(&self) -> Option<Entity> {
        self.object
    }

    fn get_previous_carried_object_behavior(&self) -> CarriedObjectBehavior {
        CarriedObjectBehavior::Keep
    }

    fn adopt_carried_object(&mut self, object: Entity) {
        if let Some(previous) = self.object.replace(object) {
            tracing::warn!(?previous, ?object, "carrying state already held an object");
        }
    }
}

use crate::components::{Ability, Item, ItemKind};
use crate::engine::Command;
use crate::fsm::StateCore;
use crate::hero::{ActionEffect, HeroBody};

use super::{
    Attacker, LiftingState, PlayerMovement, RunningState, State, StateContext, SwordSwingingState,
    UsingItemState,
};

/// The normal state: the player walks around and may start any action.
pub struct FreeState {
    core: StateCore,
    movement: PlayerMovement,
    /// Date the hero started walking into an obstacle.
    pushing_since: Option<u32>,
    pushing: bool,
}

impl FreeState {
    pub fn new() -> Self {
        Self {
            core: StateCore::new("free"),
            movement: PlayerMovement::new(),
            pushing_since: None,
            pushing: false,
        }
    }

    pub fn is_pushing(&self) -> bool {
        self.pushing
    }

    fn refresh_action_effect(&self, ctx: &mut StateContext<'_>) {
        let rect = ctx.body.rect();
        let reach = ctx.config().lift_reach;
        let lift_level = ctx.body.equipment.ability(Ability::Lift);
        let liftable = ctx
            .map
            .liftable_in_front(&rect, ctx.body.direction4, reach)
            .is_some_and(|(_, destructible)| lift_level >= destructible.weight);
        ctx.body.action_effect = if liftable {
            ActionEffect::Lift
        } else if ctx.body.equipment.has_ability(Ability::Run) {
            ActionEffect::Run
        } else {
            ActionEffect::None
        };
    }

    fn stop_pushing(&mut self, ctx: &mut StateContext<'_>) {
        self.pushing_since = None;
        if self.pushing {
            self.pushing = false;
            ctx.body.set_animation("walking", ctx.now, None);
        }
    }
}

impl Default for FreeState {
    fn default() -> Self {
        Self::new()
    }
}

impl State for FreeState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn start(&mut self, ctx: &mut StateContext<'_>, _previous: Option<&dyn State>) {
        let speed = ctx.body.walking_speed();
        self.movement.start(ctx, speed);
        ctx.body.set_animation("stopped", ctx.now, None);
        self.refresh_action_effect(ctx);
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) {
        if self.is_suspended() {
            return;
        }
        let slides = !self.can_avoid_ice();
        let previous = self.movement.wanted_direction8();
        self.movement.update(ctx, slides);

        if self.movement.wanted_direction8() != previous {
            self.stop_pushing(ctx);
            let animation = if self.movement.wanted_direction8().is_some() {
                "walking"
            } else {
                "stopped"
            };
            ctx.body.set_animation(animation, ctx.now, None);
        }

        if let Some(since) = self.pushing_since {
            if !self.pushing && ctx.now >= since + ctx.config().push_delay_ms {
                self.pushing = true;
                ctx.body.set_animation("pushing", ctx.now, None);
            }
        }
        self.refresh_action_effect(ctx);
    }

    fn stop(&mut self, ctx: &mut StateContext<'_>, _next: &mut dyn State) {
        self.movement.stop(ctx);
        ctx.body.action_effect = ActionEffect::None;
    }

    fn set_suspended(&mut self, ctx: &mut StateContext<'_>, suspended: bool) {
        if self.core.set_suspended(suspended, ctx.now) && !suspended {
            let delta = self.core.suspended_duration(ctx.now);
            if let Some(since) = self.pushing_since.as_mut() {
                *since += delta;
            }
            self.movement.delay(delta);
        }
    }

    fn notify_action_command_pressed(&mut self, ctx: &mut StateContext<'_>) {
        let rect = ctx.body.rect();
        let reach = ctx.config().lift_reach;
        let lift_level = ctx.body.equipment.ability(Ability::Lift);
        let liftable = ctx.map.liftable_in_front(&rect, ctx.body.direction4, reach);
        if let Some((object, destructible)) = liftable {
            if lift_level >= destructible.weight {
                ctx.set_state(LiftingState::new(object));
                return;
            }
            tracing::debug!(weight = destructible.weight, lift_level, "too heavy to lift");
        }
        if ctx.body.equipment.has_ability(Ability::Run) {
            ctx.set_state(RunningState::new(Command::Action));
        }
    }

    fn notify_attack_command_pressed(&mut self, ctx: &mut StateContext<'_>) {
        if self.get_can_start_sword(ctx.body) {
            ctx.set_state(SwordSwingingState::new());
        }
    }

    fn notify_item_command_pressed(&mut self, ctx: &mut StateContext<'_>, slot: u8) {
        let Some(item) = ctx.body.equipment.item_assigned(slot).cloned() else {
            return;
        };
        if !self.get_can_start_item(&item) {
            return;
        }
        match item.kind {
            ItemKind::RunningBoots => {
                if let Some(command) = Command::from_item_slot(slot) {
                    ctx.set_state(RunningState::new(command));
                }
            }
            ItemKind::Tool { .. } => ctx.set_state(UsingItemState::new(item)),
        }
    }

    fn notify_obstacle_reached(&mut self, ctx: &mut StateContext<'_>) {
        if self.pushing_since.is_none() && self.movement.wanted_direction8().is_some() {
            self.pushing_since = Some(ctx.now);
        }
    }

    fn notify_position_changed(&mut self, ctx: &mut StateContext<'_>) {
        self.stop_pushing(ctx);
    }

    fn notify_walking_speed_changed(&mut self, ctx: &mut StateContext<'_>) {
        let speed = ctx.body.walking_speed();
        self.movement.set_speed(ctx, speed);
    }

    fn is_free(&self) -> bool {
        true
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

    fn can_take_jumper(&self) -> bool {
        true
    }

    fn get_can_start_sword(&self, body: &HeroBody) -> bool {
        body.equipment.has_ability(Ability::Sword)
    }

    fn get_can_be_hurt(&self, _attacker: Attacker) -> bool {
        true
    }

    fn get_can_use_shield(&self) -> bool {
        true
    }

    fn get_can_start_item(&self, _item: &Item) -> bool {
        true
    }

    fn get_can_pick_treasure(&self, _treasure: &str) -> bool {
        true
    }
}

use strum::{Display, IntoStaticStr};

use crate::fsm::StateCore;
use crate::hero::HeroEvent;

use super::{CarriedObjectBehavior, FreeState, State, StateContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FallCause {
    Hole,
    /// Deep water without the swim ability.
    Drown,
    Lava,
}

impl FallCause {
    fn animation(self) -> &'static str {
        match self {
            Self::Hole => "falling",
            Self::Drown => "plunging_water",
            Self::Lava => "plunging_lava",
        }
    }
}

/// The hero falls into a hole, drowns or sinks into lava, then comes back
/// on the last solid ground with some life lost.
pub struct FallingState {
    core: StateCore,
    cause: FallCause,
    end_date: u32,
    done: bool,
}

impl FallingState {
    pub fn new(cause: FallCause) -> Self {
        Self {
            core: StateCore::new("falling"),
            cause,
            end_date: 0,
            done: false,
        }
    }

    pub fn cause(&self) -> FallCause {
        self.cause
    }
}

impl State for FallingState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn start(&mut self, ctx: &mut StateContext<'_>, _previous: Option<&dyn State>) {
        ctx.body.stop_movement();
        let duration = ctx.config().fall_ms;
        self.end_date = ctx.now + duration;
        ctx.body
            .set_animation(self.cause.animation(), ctx.now, Some(duration));
        tracing::debug!(cause = %self.cause, "hero falling");
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) {
        if self.is_suspended() || self.done || ctx.now < self.end_date {
            return;
        }
        self.done = true;
        let damage = ctx.config().bad_ground_damage;
        ctx.body.equipment.remove_life(damage);
        ctx.body.position = ctx.body.last_solid_ground;
        ctx.body.push_event(HeroEvent::BackToSolidGround);
        ctx.set_state(FreeState::new());
    }

    fn set_suspended(&mut self, ctx: &mut StateContext<'_>, suspended: bool) {
        if self.core.set_suspended(suspended, ctx.now) && !suspended {
            let delta = self.core.suspended_duration(ctx.now);
            self.end_date += delta;
            ctx.body.delay_animation(delta);
        }
    }

    fn is_touching_ground(&self) -> bool {
        false
    }

    fn can_come_from_bad_ground(&self) -> bool {
        false
    }

    fn can_avoid_deep_water(&self) -> bool {
        true
    }

    fn can_avoid_hole(&self) -> bool {
        true
    }

    fn can_avoid_lava(&self) -> bool {
        true
    }

    fn can_avoid_prickle(&self) -> bool {
        true
    }

    fn can_avoid_teletransporter(&self) -> bool {
        true
    }

    fn can_avoid_sensor(&self) -> bool {
        true
    }

    fn can_avoid_switch(&self) -> bool {
        true
    }

    fn get_previous_carried_object_behavior(&self) -> CarriedObjectBehavior {
        CarriedObjectBehavior::Remove
    }
}

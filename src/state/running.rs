use std::f32::consts::FRAC_PI_2;

use crate::components::{Ability, Movement, Rect};
use crate::engine::Command;
use crate::fsm::StateCore;
use crate::hero::{HeroBody, HeroEvent};

use super::{Attacker, FreeState, State, StateContext};

const WIND_UP: u8 = 0;
const RUNNING: u8 = 1;
const BOUNCING: u8 = 2;

/// Dash started by the action command or the running boots.
///
/// Phase 0 winds up while the triggering command stays held, phase 1 runs
/// straight ahead, phase 2 is the recoil jump after hitting an obstacle.
pub struct RunningState {
    core: StateCore,
    phase: u8,
    next_phase_date: u32,
    command: Command,
}

impl RunningState {
    /// `command` must stay held during the wind-up.
    pub fn new(command: Command) -> Self {
        Self {
            core: StateCore::new("running"),
            phase: WIND_UP,
            next_phase_date: 0,
            command,
        }
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn next_phase_date(&self) -> u32 {
        self.next_phase_date
    }

    pub fn is_bouncing(&self) -> bool {
        self.phase == BOUNCING
    }

    fn is_pressing_running_key(&self, ctx: &StateContext<'_>) -> bool {
        ctx.is_command_pressed(self.command)
    }

    fn start_run(&mut self, ctx: &mut StateContext<'_>) {
        self.phase = RUNNING;
        let angle = f32::from(ctx.body.direction4) * FRAC_PI_2;
        let (speed, distance) = (ctx.config().running_speed, ctx.config().run_max_distance);
        ctx.body.movement = Some(Movement::straight(angle, speed, distance));
        ctx.body.set_animation("running", ctx.now, None);
        tracing::debug!(direction4 = ctx.body.direction4, "run started");
    }
}

impl State for RunningState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn start(&mut self, ctx: &mut StateContext<'_>, _previous: Option<&dyn State>) {
        ctx.body.stop_movement();
        self.phase = WIND_UP;
        self.next_phase_date = ctx.now + ctx.config().run_wind_up_ms;
        ctx.body.set_animation("running_wind_up", ctx.now, None);
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) {
        if self.is_suspended() {
            return;
        }
        match self.phase {
            WIND_UP => {
                if !self.is_pressing_running_key(ctx) {
                    ctx.set_state(FreeState::new());
                } else if ctx.now >= self.next_phase_date {
                    self.start_run(ctx);
                }
            }
            _ => {
                if ctx.body.movement.is_none() {
                    ctx.start_state_from_ground();
                }
            }
        }
    }

    fn stop(&mut self, ctx: &mut StateContext<'_>, _next: &mut dyn State) {
        if self.phase != WIND_UP {
            ctx.body.stop_movement();
        }
    }

    fn set_suspended(&mut self, ctx: &mut StateContext<'_>, suspended: bool) {
        if self.core.set_suspended(suspended, ctx.now) && !suspended {
            self.next_phase_date += self.core.suspended_duration(ctx.now);
        }
    }

    fn notify_direction_command_pressed(&mut self, ctx: &mut StateContext<'_>, direction4: u8) {
        if self.phase == WIND_UP && direction4 != ctx.body.direction4 {
            ctx.set_state(FreeState::new());
        }
    }

    fn notify_obstacle_reached(&mut self, ctx: &mut StateContext<'_>) {
        if self.phase != RUNNING {
            return;
        }
        self.phase = BOUNCING;
        let opposite8 = (ctx.body.direction4 * 2 + 4) % 8;
        let (distance, speed) = (
            ctx.config().run_bounce_distance,
            ctx.config().run_bounce_speed,
        );
        ctx.body.movement = Some(Movement::jump(opposite8, distance, speed));
        ctx.body.set_animation("running_bounce", ctx.now, None);
        ctx.body.push_event(HeroEvent::RunBounce);
    }

    fn notify_movement_finished(&mut self, ctx: &mut StateContext<'_>) {
        if self.phase != WIND_UP {
            ctx.body.stop_movement();
            ctx.start_state_from_ground();
        }
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn is_touching_ground(&self) -> bool {
        !self.is_bouncing()
    }

    fn can_come_from_bad_ground(&self) -> bool {
        !self.is_bouncing()
    }

    fn can_avoid_deep_water(&self) -> bool {
        self.is_bouncing()
    }

    fn can_avoid_hole(&self) -> bool {
        self.is_bouncing()
    }

    fn can_avoid_lava(&self) -> bool {
        self.is_bouncing()
    }

    fn can_avoid_prickle(&self) -> bool {
        self.is_bouncing()
    }

    fn can_avoid_teletransporter(&self) -> bool {
        self.is_bouncing()
    }

    fn can_avoid_sensor(&self) -> bool {
        self.is_bouncing()
    }

    fn can_avoid_switch(&self) -> bool {
        self.is_bouncing()
    }

    fn can_take_jumper(&self) -> bool {
        self.phase == RUNNING
    }

    fn get_can_be_hurt(&self, _attacker: Attacker) -> bool {
        !self.is_bouncing()
    }

    fn get_can_pick_treasure(&self, _treasure: &str) -> bool {
        true
    }

    fn get_sword_damage_factor(&self, body: &HeroBody) -> i32 {
        body.equipment.sword_damage_factor() * 2
    }

    fn is_cutting_with_sword(&self, body: &HeroBody, target: &Rect) -> bool {
        self.phase == RUNNING
            && body.equipment.has_ability(Ability::Sword)
            && body.rect_in_front(body.config.sword_reach).overlaps(target)
    }
}

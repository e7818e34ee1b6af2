//! Hero states and the capability-query interface they implement.
//!
//! Every other subsystem (collision, ground effects, detectors, command
//! dispatch) asks the *current* state what it permits through the queries
//! of [`State`]; none of them looks at the concrete type. Each query has a
//! documented default so a concrete state only overrides the handful that
//! matter to it.
//!
//! Queries take `&self` and have no side effects. Only `start`, `update`,
//! `stop`, `set_suspended` and the `notify_*` hooks may mutate.

mod carrying;
mod context;
mod custom;
mod falling;
mod free;
mod hurt;
mod lifting;
mod player_movement;
mod running;
mod spin_attack;
mod sword_loading;
mod sword_swinging;
mod swimming;
mod using_item;

use hecs::Entity;
use strum::{Display, EnumString, IntoStaticStr};

use crate::components::{
    Destructible, Door, Enemy, Ground, Item, Rect, Sensor, Switch, Teletransporter,
};
use crate::engine::Command;
use crate::fsm::StateCore;
use crate::hero::HeroBody;

pub use carrying::CarryingState;
pub use context::StateContext;
pub use custom::{Capability, CapabilityTable, CustomState, CustomStateHooks};
pub use falling::{FallCause, FallingState};
pub use free::FreeState;
pub use hurt::HurtState;
pub use lifting::LiftingState;
pub use player_movement::PlayerMovement;
pub use running::RunningState;
pub use spin_attack::SpinAttackState;
pub use sword_loading::SwordLoadingState;
pub use sword_swinging::SwordSwingingState;
pub use swimming::SwimmingState;
pub use using_item::UsingItemState;

/// What happens to an object carried by the previous state when a state
/// starts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum CarriedObjectBehavior {
    /// Throw it in front of the hero.
    #[default]
    Throw,
    /// Delete it from the map.
    Remove,
    /// The next state takes ownership of it.
    Keep,
}

/// Who is trying to hurt the hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attacker {
    Enemy(Entity),
    /// Prickles and other harmful grounds.
    Ground,
    /// Damage applied by game logic.
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Attack {
    Sword,
    ThrownObject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackResult {
    /// The enemy was protected or recovering.
    Ignored,
    Hurt { damage: i32 },
    Killed,
}

/// A hero behavior mode. See the module documentation.
pub trait State {
    fn core(&self) -> &StateCore;
    fn core_mut(&mut self) -> &mut StateCore;

    fn name(&self) -> &'static str {
        self.core().name()
    }

    /// Script-facing view, only for custom states.
    fn as_custom(&self) -> Option<&CustomState> {
        None
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Called once, right after the previous state (if any) was stopped.
    fn start(&mut self, _ctx: &mut StateContext<'_>, _previous: Option<&dyn State>) {}

    /// Called every frame while current, suspended or not.
    fn update(&mut self, _ctx: &mut StateContext<'_>) {}

    /// Called once when `next` replaces this state, before `next` starts.
    fn stop(&mut self, _ctx: &mut StateContext<'_>, _next: &mut dyn State) {}

    /// States holding deadlines override this to shift them on resume by
    /// `core().suspended_duration(now)`.
    fn set_suspended(&mut self, ctx: &mut StateContext<'_>, suspended: bool) {
        self.core_mut().set_suspended(suspended, ctx.now);
    }

    fn is_suspended(&self) -> bool {
        self.core().is_suspended()
    }

    fn is_current_state(&self, ctx: &StateContext<'_>) -> bool {
        self.core().is_current(ctx.current_state())
    }

    // -----------------------------------------------------------------------
    // Command hooks, reached through `dispatch_command_pressed/released`
    // -----------------------------------------------------------------------

    fn notify_action_command_pressed(&mut self, _ctx: &mut StateContext<'_>) {}
    fn notify_action_command_released(&mut self, _ctx: &mut StateContext<'_>) {}
    fn notify_attack_command_pressed(&mut self, _ctx: &mut StateContext<'_>) {}
    fn notify_attack_command_released(&mut self, _ctx: &mut StateContext<'_>) {}
    fn notify_direction_command_pressed(&mut self, _ctx: &mut StateContext<'_>, _direction4: u8) {}
    fn notify_direction_command_released(&mut self, _ctx: &mut StateContext<'_>, _direction4: u8) {}
    fn notify_item_command_pressed(&mut self, _ctx: &mut StateContext<'_>, _slot: u8) {}
    fn notify_item_command_released(&mut self, _ctx: &mut StateContext<'_>, _slot: u8) {}

    // -----------------------------------------------------------------------
    // World notifications
    // -----------------------------------------------------------------------

    fn notify_obstacle_reached(&mut self, _ctx: &mut StateContext<'_>) {}
    fn notify_position_changed(&mut self, _ctx: &mut StateContext<'_>) {}
    fn notify_movement_finished(&mut self, _ctx: &mut StateContext<'_>) {}
    fn notify_ground_below_changed(&mut self, _ctx: &mut StateContext<'_>) {}
    fn notify_walking_speed_changed(&mut self, _ctx: &mut StateContext<'_>) {}

    fn notify_attacked_enemy(
        &mut self,
        _ctx: &mut StateContext<'_>,
        _attack: Attack,
        _enemy: Entity,
        _result: AttackResult,
        _push_hero: bool,
    ) {
    }

    // -----------------------------------------------------------------------
    // Identity and movement authority
    // -----------------------------------------------------------------------

    fn is_free(&self) -> bool {
        false
    }

    fn is_visible(&self) -> bool {
        true
    }

    fn get_can_control_movement(&self) -> bool {
        false
    }

    /// Direction8 the player asks for, `None` when none.
    fn get_wanted_movement_direction8(&self) -> Option<u8> {
        None
    }

    fn is_direction_locked(&self) -> bool {
        false
    }

    fn is_touching_ground(&self) -> bool {
        true
    }

    /// Whether the position can be recorded as the last solid ground.
    fn can_come_from_bad_ground(&self) -> bool {
        true
    }

    // -----------------------------------------------------------------------
    // Ground obstacles
    // -----------------------------------------------------------------------

    fn is_wall_obstacle(&self) -> bool {
        default_ground_obstacle(Ground::Wall)
    }

    fn is_low_wall_obstacle(&self) -> bool {
        default_ground_obstacle(Ground::LowWall)
    }

    fn is_deep_water_obstacle(&self) -> bool {
        default_ground_obstacle(Ground::DeepWater)
    }

    fn is_shallow_water_obstacle(&self) -> bool {
        default_ground_obstacle(Ground::ShallowWater)
    }

    fn is_hole_obstacle(&self) -> bool {
        default_ground_obstacle(Ground::Hole)
    }

    fn is_ice_obstacle(&self) -> bool {
        default_ground_obstacle(Ground::Ice)
    }

    fn is_lava_obstacle(&self) -> bool {
        default_ground_obstacle(Ground::Lava)
    }

    fn is_prickle_obstacle(&self) -> bool {
        default_ground_obstacle(Ground::Prickle)
    }

    fn is_ladder_obstacle(&self) -> bool {
        default_ground_obstacle(Ground::Ladder)
    }

    // -----------------------------------------------------------------------
    // Entity obstacles
    // -----------------------------------------------------------------------

    fn is_npc_obstacle(&self, _npc: Entity) -> bool {
        true
    }

    fn is_door_obstacle(&self, door: &Door) -> bool {
        !door.open
    }

    fn is_block_obstacle(&self, _block: Entity) -> bool {
        true
    }

    fn is_crystal_obstacle(&self, _crystal: Entity) -> bool {
        true
    }

    /// Only asked for crystal blocks currently raised.
    fn is_raised_block_obstacle(&self, _block: Entity) -> bool {
        true
    }

    fn is_destructible_obstacle(&self, _destructible: &Destructible) -> bool {
        true
    }

    fn is_enemy_obstacle(&self, _enemy: &Enemy) -> bool {
        false
    }

    fn is_teletransporter_obstacle(&self, _teletransporter: &Teletransporter) -> bool {
        false
    }

    fn is_sensor_obstacle(&self, _sensor: &Sensor) -> bool {
        false
    }

    fn is_switch_obstacle(&self, _switch: &Switch) -> bool {
        false
    }

    fn is_separator_obstacle(&self, _separator: Entity) -> bool {
        false
    }

    fn is_jumper_obstacle(&self, _jumper: Entity) -> bool {
        !self.can_take_jumper()
    }

    fn is_stairs_obstacle(&self, _stairs: Entity) -> bool {
        !self.can_take_stairs()
    }

    // -----------------------------------------------------------------------
    // Ground susceptibility
    // -----------------------------------------------------------------------

    fn can_avoid_deep_water(&self) -> bool {
        false
    }

    fn can_avoid_hole(&self) -> bool {
        false
    }

    fn can_avoid_ice(&self) -> bool {
        false
    }

    fn can_avoid_lava(&self) -> bool {
        false
    }

    fn can_avoid_prickle(&self) -> bool {
        false
    }

    fn can_avoid_teletransporter(&self) -> bool {
        false
    }

    fn can_avoid_sensor(&self) -> bool {
        false
    }

    fn can_avoid_switch(&self) -> bool {
        false
    }

    fn is_affected_by_grass(&self) -> bool {
        true
    }

    fn is_affected_by_shallow_water(&self) -> bool {
        true
    }

    fn is_affected_by_ladder(&self) -> bool {
        true
    }

    fn can_take_stairs(&self) -> bool {
        false
    }

    fn can_take_jumper(&self) -> bool {
        false
    }

    // -----------------------------------------------------------------------
    // Combat
    // -----------------------------------------------------------------------

    fn get_can_start_sword(&self, _body: &HeroBody) -> bool {
        false
    }

    fn can_sword_hit_crystal(&self) -> bool {
        false
    }

    fn get_sword_damage_factor(&self, body: &HeroBody) -> i32 {
        body.equipment.sword_damage_factor()
    }

    fn get_can_be_hurt(&self, _attacker: Attacker) -> bool {
        false
    }

    fn get_can_use_shield(&self) -> bool {
        false
    }

    /// Whether the sword currently cuts something occupying `target`.
    fn is_cutting_with_sword(&self, _body: &HeroBody, _target: &Rect) -> bool {
        false
    }

    fn can_start_gameover_sequence(&self) -> bool {
        true
    }

    // -----------------------------------------------------------------------
    // Items and treasures
    // -----------------------------------------------------------------------

    fn get_can_start_item(&self, _item: &Item) -> bool {
        false
    }

    fn get_can_pick_treasure(&self, _treasure: &str) -> bool {
        false
    }

    fn is_using_item(&self) -> bool {
        false
    }

    /// The item being used. Fatal when `is_using_item()` is false.
    fn get_current_item(&self) -> &Item {
        panic!("state '{}' is not using an item", self.name())
    }

    // -----------------------------------------------------------------------
    // Carried object
    // -----------------------------------------------------------------------

    fn get_carried_object(&self) -> Option<Entity> {
        None
    }

    fn is_carrying_item(&self) -> bool {
        self.get_carried_object().is_some()
    }

    /// How this state wants the previous state's carried object handled.
    fn get_previous_carried_object_behavior(&self) -> CarriedObjectBehavior {
        CarriedObjectBehavior::Throw
    }

    /// Receive the previous state's object. Only called when this state
    /// declared [`CarriedObjectBehavior::Keep`].
    fn adopt_carried_object(&mut self, _object: Entity) {}
}

/// Obstacle semantics of each ground for a state overriding nothing.
pub fn default_ground_obstacle(ground: Ground) -> bool {
    matches!(ground, Ground::Wall | Ground::LowWall)
}

/// Fixed ground → query mapping used by the collision resolver.
pub fn is_ground_obstacle(state: &dyn State, ground: Ground) -> bool {
    match ground {
        Ground::Empty | Ground::Traversable | Ground::Grass => false,
        Ground::Wall => state.is_wall_obstacle(),
        Ground::LowWall => state.is_low_wall_obstacle(),
        Ground::DeepWater => state.is_deep_water_obstacle(),
        Ground::ShallowWater => state.is_shallow_water_obstacle(),
        Ground::Hole => state.is_hole_obstacle(),
        Ground::Ice => state.is_ice_obstacle(),
        Ground::Lava => state.is_lava_obstacle(),
        Ground::Prickle => state.is_prickle_obstacle(),
        Ground::Ladder => state.is_ladder_obstacle(),
    }
}

/// Fixed command → hook mapping. `Pause` is handled by the game, not here.
pub fn dispatch_command_pressed(state: &mut dyn State, ctx: &mut StateContext<'_>, command: Command) {
    match command {
        Command::Action => state.notify_action_command_pressed(ctx),
        Command::Attack => state.notify_attack_command_pressed(ctx),
        Command::Right | Command::Up | Command::Left | Command::Down => {
            if let Some(direction4) = command.direction4() {
                state.notify_direction_command_pressed(ctx, direction4);
            }
        }
        Command::Item1 | Command::Item2 => {
            if let Some(slot) = command.item_slot() {
                state.notify_item_command_pressed(ctx, slot);
            }
        }
        Command::Pause => {}
    }
}

pub fn dispatch_command_released(state: &mut dyn State, ctx: &mut StateContext<'_>, command: Command) {
    match command {
        Command::Action => state.notify_action_command_released(ctx),
        Command::Attack => state.notify_attack_command_released(ctx),
        Command::Right | Command::Up | Command::Left | Command::Down => {
            if let Some(direction4) = command.direction4() {
                state.notify_direction_command_released(ctx, direction4);
            }
        }
        Command::Item1 | Command::Item2 => {
            if let Some(slot) = command.item_slot() {
                state.notify_item_command_released(ctx, slot);
            }
        }
        Command::Pause => {}
    }
}

/// Apply `next`'s declared policy to an object the stopping state still
/// holds.
pub fn hand_off_carried_object(ctx: &mut StateContext<'_>, object: Entity, next: &mut dyn State) {
    let behavior = next.get_previous_carried_object_behavior();
    tracing::debug!(?object, %behavior, next = next.name(), "carried object handoff");
    match behavior {
        CarriedObjectBehavior::Throw => ctx.throw_carried_object(object),
        CarriedObjectBehavior::Remove => ctx.remove_carried_object(object),
        CarriedObjectBehavior::Keep => next.adopt_carried_object(object),
    }
}

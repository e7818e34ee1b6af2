//! A state whose behavior is described by data instead of code.
//!
//! Every capability query reads a [`CapabilityTable`] filled by the host
//! (typically a script binding). Entries never set fall back to the same
//! defaults a plain state would answer, so an empty table behaves like a
//! controllable walking state. Optional [`CustomStateHooks`] receive the
//! lifecycle and world notifications.

use std::collections::HashMap;
use std::str::FromStr;

use hecs::Entity;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::components::{
    Ability, Destructible, Door, Enemy, EntityKind, Ground, Item, ItemKind, MovementKind, Rect,
    Sensor, Switch, Teletransporter,
};
use crate::engine::Command;
use crate::error::{Error, Result};
use crate::fsm::StateCore;
use crate::hero::HeroBody;

use super::{
    default_ground_obstacle, hand_off_carried_object, Attacker, CarriedObjectBehavior,
    PlayerMovement, RunningState, State, StateContext, SwordSwingingState, UsingItemState,
};

/// Boolean properties of a custom state. All default to `true`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    Visible,
    CanControlDirection,
    CanControlMovement,
    TouchingGround,
    CanComeFromBadGround,
    CanBeHurt,
    CanUseSword,
    CanUseShield,
    CanUseItem,
    CanInteract,
    CanGrab,
    CanPush,
    CanPickTreasure,
    CanUseTeletransporter,
    CanUseSwitch,
    CanUseSensor,
    CanUseStairs,
    CanUseJumper,
}

/// The registry a custom state answers its queries from.
#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
    flags: HashMap<Capability, bool>,
    ground_traversal: HashMap<Ground, bool>,
    ground_affected: HashMap<Ground, bool>,
    entity_traversal: HashMap<EntityKind, bool>,
    item_usable: HashMap<String, bool>,
    carried_object_action: CarriedObjectBehavior,
}

impl CapabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, capability: Capability) -> bool {
        self.flags.get(&capability).copied().unwrap_or(true)
    }

    pub fn set(&mut self, capability: Capability, value: bool) {
        self.flags.insert(capability, value);
    }

    /// Set a capability by its snake_case name.
    pub fn set_property(&mut self, name: &str, value: bool) -> Result<()> {
        let capability =
            Capability::from_str(name).map_err(|_| Error::UnknownCapability(name.to_owned()))?;
        self.set(capability, value);
        Ok(())
    }

    /// `None` when the host never said.
    pub fn can_traverse_ground(&self, ground: Ground) -> Option<bool> {
        self.ground_traversal.get(&ground).copied()
    }

    pub fn set_can_traverse_ground(&mut self, ground: Ground, traversable: bool) {
        self.ground_traversal.insert(ground, traversable);
    }

    pub fn is_affected_by_ground(&self, ground: Ground) -> bool {
        self.ground_affected.get(&ground).copied().unwrap_or(true)
    }

    pub fn set_affected_by_ground(&mut self, ground: Ground, affected: bool) {
        self.ground_affected.insert(ground, affected);
    }

    pub fn can_traverse_entity(&self, kind: EntityKind) -> Option<bool> {
        self.entity_traversal.get(&kind).copied()
    }

    pub fn set_can_traverse_entity(&mut self, kind: EntityKind, traversable: bool) {
        self.entity_traversal.insert(kind, traversable);
    }

    /// Per-item override, else the `can_use_item` capability.
    pub fn can_use_item(&self, name: &str) -> bool {
        self.item_usable
            .get(name)
            .copied()
            .unwrap_or_else(|| self.get(Capability::CanUseItem))
    }

    pub fn set_can_use_item(&mut self, name: &str, usable: bool) {
        self.item_usable.insert(name.to_owned(), usable);
    }

    pub fn carried_object_action(&self) -> CarriedObjectBehavior {
        self.carried_object_action
    }

    pub fn set_carried_object_action(&mut self, action: CarriedObjectBehavior) {
        self.carried_object_action = action;
    }

    pub fn set_carried_object_action_by_name(&mut self, name: &str) -> Result<()> {
        let action = CarriedObjectBehavior::from_str(name)
            .map_err(|_| Error::UnknownCarriedObjectAction(name.to_owned()))?;
        self.carried_object_action = action;
        Ok(())
    }

    fn entity_obstacle(&self, kind: EntityKind, default: bool) -> bool {
        self.can_traverse_entity(kind)
            .map_or(default, |traversable| !traversable)
    }

    fn ground_obstacle(&self, ground: Ground) -> bool {
        self.can_traverse_ground(ground)
            .map_or_else(|| default_ground_obstacle(ground), |traversable| !traversable)
    }
}

/// Host callbacks of a custom state. The command hooks return `true` when
/// they handled the command, which skips the built-in reaction.
pub trait CustomStateHooks {
    fn on_started(
        &mut self,
        _table: &mut CapabilityTable,
        _ctx: &mut StateContext<'_>,
        _previous: Option<&str>,
    ) {
    }

    fn on_update(&mut self, _table: &mut CapabilityTable, _ctx: &mut StateContext<'_>) {}

    fn on_finished(&mut self, _table: &mut CapabilityTable, _ctx: &mut StateContext<'_>, _next: &str) {}

    fn on_command_pressed(
        &mut self,
        _table: &mut CapabilityTable,
        _ctx: &mut StateContext<'_>,
        _command: Command,
    ) -> bool {
        false
    }

    fn on_command_released(
        &mut self,
        _table: &mut CapabilityTable,
        _ctx: &mut StateContext<'_>,
        _command: Command,
    ) -> bool {
        false
    }

    fn on_obstacle_reached(&mut self, _table: &mut CapabilityTable, _ctx: &mut StateContext<'_>) {}

    fn on_movement_finished(&mut self, _table: &mut CapabilityTable, _ctx: &mut StateContext<'_>) {}

    fn on_ground_below_changed(
        &mut self,
        _table: &mut CapabilityTable,
        _ctx: &mut StateContext<'_>,
    ) {
    }
}

pub struct CustomState {
    core: StateCore,
    description: String,
    table: CapabilityTable,
    hooks: Option<Box<dyn CustomStateHooks>>,
    movement: PlayerMovement,
    carried_object: Option<Entity>,
}

impl CustomState {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            core: StateCore::new("custom"),
            description: description.into(),
            table: CapabilityTable::new(),
            hooks: None,
            movement: PlayerMovement::new(),
            carried_object: None,
        }
    }

    pub fn with_hooks(mut self, hooks: impl CustomStateHooks + 'static) -> Self {
        self.hooks = Some(Box::new(hooks));
        self
    }

    pub fn with_table(mut self, table: CapabilityTable) -> Self {
        self.table = table;
        self
    }

    /// Free-form label chosen by the host.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn table(&self) -> &CapabilityTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut CapabilityTable {
        &mut self.table
    }

    pub fn set_property(&mut self, name: &str, value: bool) -> Result<()> {
        self.table.set_property(name, value)
    }

    /// Installs or drops the player movement when a hook flipped
    /// `can_control_movement`. Other movements on the body are left alone.
    fn sync_player_movement(&mut self, ctx: &mut StateContext<'_>) {
        let wanted = self.table.get(Capability::CanControlMovement);
        let installed = ctx
            .body
            .movement
            .as_ref()
            .map(|movement| movement.kind() == MovementKind::Player);
        match (wanted, installed) {
            (true, None) => {
                let speed = ctx.body.walking_speed();
                self.movement.start(ctx, speed);
            }
            (false, Some(true)) => self.movement.stop(ctx),
            _ => {}
        }
    }

    fn hook_pressed(&mut self, ctx: &mut StateContext<'_>, command: Command) -> bool {
        match self.hooks.as_mut() {
            Some(hooks) => hooks.on_command_pressed(&mut self.table, ctx, command),
            None => false,
        }
    }

    fn hook_released(&mut self, ctx: &mut StateContext<'_>, command: Command) -> bool {
        match self.hooks.as_mut() {
            Some(hooks) => hooks.on_command_released(&mut self.table, ctx, command),
            None => false,
        }
    }
}

impl State for CustomState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn as_custom(&self) -> Option<&CustomState> {
        Some(self)
    }

    fn start(&mut self, ctx: &mut StateContext<'_>, previous: Option<&dyn State>) {
        if self.table.get(Capability::CanControlMovement) {
            let speed = ctx.body.walking_speed();
            self.movement.start(ctx, speed);
        }
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.on_started(&mut self.table, ctx, previous.map(|state| state.name()));
        }
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) {
        if self.is_suspended() {
            return;
        }
        self.sync_player_movement(ctx);
        if self.table.get(Capability::CanControlMovement) {
            let slides = !self.can_avoid_ice();
            self.movement.update(ctx, slides);
        }
        if let Some(object) = self.carried_object {
            let rect = ctx.body.rect();
            ctx.map.place_above(object, &rect);
        }
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.on_update(&mut self.table, ctx);
            self.sync_player_movement(ctx);
        }
    }

    fn stop(&mut self, ctx: &mut StateContext<'_>, next: &mut dyn State) {
        self.movement.stop(ctx);
        if let Some(object) = self.carried_object.take() {
            hand_off_carried_object(ctx, object, next);
        }
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.on_finished(&mut self.table, ctx, next.name());
        }
    }

    fn set_suspended(&mut self, ctx: &mut StateContext<'_>, suspended: bool) {
        if self.core.set_suspended(suspended, ctx.now) && !suspended {
            self.movement.delay(self.core.suspended_duration(ctx.now));
        }
    }

    fn notify_action_command_pressed(&mut self, ctx: &mut StateContext<'_>) {
        self.hook_pressed(ctx, Command::Action);
    }

    fn notify_action_command_released(&mut self, ctx: &mut StateContext<'_>) {
        self.hook_released(ctx, Command::Action);
    }

    fn notify_attack_command_pressed(&mut self, ctx: &mut StateContext<'_>) {
        if !self.hook_pressed(ctx, Command::Attack) && self.get_can_start_sword(ctx.body) {
            ctx.set_state(SwordSwingingState::new());
        }
    }

    fn notify_attack_command_released(&mut self, ctx: &mut StateContext<'_>) {
        self.hook_released(ctx, Command::Attack);
    }

    fn notify_direction_command_pressed(&mut self, ctx: &mut StateContext<'_>, direction4: u8) {
        self.hook_pressed(ctx, Command::from_direction4(direction4));
    }

    fn notify_direction_command_released(&mut self, ctx: &mut StateContext<'_>, direction4: u8) {
        self.hook_released(ctx, Command::from_direction4(direction4));
    }

    fn notify_item_command_pressed(&mut self, ctx: &mut StateContext<'_>, slot: u8) {
        let Some(command) = Command::from_item_slot(slot) else {
            return;
        };
        if self.hook_pressed(ctx, command) {
            return;
        }
        let Some(item) = ctx.body.equipment.item_assigned(slot).cloned() else {
            return;
        };
        if !self.get_can_start_item(&item) {
            return;
        }
        match item.kind {
            ItemKind::RunningBoots => ctx.set_state(RunningState::new(command)),
            ItemKind::Tool { .. } => ctx.set_state(UsingItemState::new(item)),
        }
    }

    fn notify_item_command_released(&mut self, ctx: &mut StateContext<'_>, slot: u8) {
        if let Some(command) = Command::from_item_slot(slot) {
            self.hook_released(ctx, command);
        }
    }

    fn notify_obstacle_reached(&mut self, ctx: &mut StateContext<'_>) {
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.on_obstacle_reached(&mut self.table, ctx);
        }
    }

    fn notify_movement_finished(&mut self, ctx: &mut StateContext<'_>) {
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.on_movement_finished(&mut self.table, ctx);
        }
    }

    fn notify_ground_below_changed(&mut self, ctx: &mut StateContext<'_>) {
        if let Some(hooks) = self.hooks.as_mut() {
            hooks.on_ground_below_changed(&mut self.table, ctx);
        }
    }

    fn notify_walking_speed_changed(&mut self, ctx: &mut StateContext<'_>) {
        let speed = ctx.body.walking_speed();
        self.movement.set_speed(ctx, speed);
    }

    // Identity and movement

    fn is_visible(&self) -> bool {
        self.table.get(Capability::Visible)
    }

    fn get_can_control_movement(&self) -> bool {
        self.table.get(Capability::CanControlMovement)
    }

    fn get_wanted_movement_direction8(&self) -> Option<u8> {
        if self.get_can_control_movement() {
            self.movement.wanted_direction8()
        } else {
            None
        }
    }

    fn is_direction_locked(&self) -> bool {
        !self.table.get(Capability::CanControlDirection)
    }

    fn is_touching_ground(&self) -> bool {
        self.table.get(Capability::TouchingGround)
    }

    fn can_come_from_bad_ground(&self) -> bool {
        self.table.get(Capability::CanComeFromBadGround)
    }

    // Grounds

    fn is_wall_obstacle(&self) -> bool {
        self.table.ground_obstacle(Ground::Wall)
    }

    fn is_low_wall_obstacle(&self) -> bool {
        self.table.ground_obstacle(Ground::LowWall)
    }

    fn is_deep_water_obstacle(&self) -> bool {
        self.table.ground_obstacle(Ground::DeepWater)
    }

    fn is_shallow_water_obstacle(&self) -> bool {
        self.table.ground_obstacle(Ground::ShallowWater)
    }

    fn is_hole_obstacle(&self) -> bool {
        self.table.ground_obstacle(Ground::Hole)
    }

    fn is_ice_obstacle(&self) -> bool {
        self.table.ground_obstacle(Ground::Ice)
    }

    fn is_lava_obstacle(&self) -> bool {
        self.table.ground_obstacle(Ground::Lava)
    }

    fn is_prickle_obstacle(&self) -> bool {
        self.table.ground_obstacle(Ground::Prickle)
    }

    fn is_ladder_obstacle(&self) -> bool {
        self.table.ground_obstacle(Ground::Ladder)
    }

    fn can_avoid_deep_water(&self) -> bool {
        !self.table.is_affected_by_ground(Ground::DeepWater)
    }

    fn can_avoid_hole(&self) -> bool {
        !self.table.is_affected_by_ground(Ground::Hole)
    }

    fn can_avoid_ice(&self) -> bool {
        !self.table.is_affected_by_ground(Ground::Ice)
    }

    fn can_avoid_lava(&self) -> bool {
        !self.table.is_affected_by_ground(Ground::Lava)
    }

    fn can_avoid_prickle(&self) -> bool {
        !self.table.is_affected_by_ground(Ground::Prickle)
    }

    fn is_affected_by_grass(&self) -> bool {
        self.table.is_affected_by_ground(Ground::Grass)
    }

    fn is_affected_by_shallow_water(&self) -> bool {
        self.table.is_affected_by_ground(Ground::ShallowWater)
    }

    fn is_affected_by_ladder(&self) -> bool {
        self.table.is_affected_by_ground(Ground::Ladder)
    }

    fn can_avoid_teletransporter(&self) -> bool {
        !self.table.get(Capability::CanUseTeletransporter)
    }

    fn can_avoid_sensor(&self) -> bool {
        !self.table.get(Capability::CanUseSensor)
    }

    fn can_avoid_switch(&self) -> bool {
        !self.table.get(Capability::CanUseSwitch)
    }

    fn can_take_stairs(&self) -> bool {
        self.table.get(Capability::CanUseStairs)
    }

    fn can_take_jumper(&self) -> bool {
        self.table.get(Capability::CanUseJumper)
    }

    // Entities

    fn is_npc_obstacle(&self, _npc: Entity) -> bool {
        self.table.entity_obstacle(EntityKind::Npc, true)
    }

    fn is_door_obstacle(&self, door: &Door) -> bool {
        self.table.entity_obstacle(EntityKind::Door, !door.open)
    }

    fn is_block_obstacle(&self, _block: Entity) -> bool {
        self.table.entity_obstacle(EntityKind::Block, true)
    }

    fn is_crystal_obstacle(&self, _crystal: Entity) -> bool {
        self.table.entity_obstacle(EntityKind::Crystal, true)
    }

    fn is_raised_block_obstacle(&self, _block: Entity) -> bool {
        self.table.entity_obstacle(EntityKind::CrystalBlock, true)
    }

    fn is_destructible_obstacle(&self, _destructible: &Destructible) -> bool {
        self.table.entity_obstacle(EntityKind::Destructible, true)
    }

    fn is_enemy_obstacle(&self, _enemy: &Enemy) -> bool {
        self.table.entity_obstacle(EntityKind::Enemy, false)
    }

    fn is_teletransporter_obstacle(&self, _teletransporter: &Teletransporter) -> bool {
        self.table.entity_obstacle(EntityKind::Teletransporter, false)
    }

    fn is_sensor_obstacle(&self, _sensor: &Sensor) -> bool {
        self.table.entity_obstacle(EntityKind::Sensor, false)
    }

    fn is_switch_obstacle(&self, _switch: &Switch) -> bool {
        self.table.entity_obstacle(EntityKind::Switch, false)
    }

    fn is_separator_obstacle(&self, _separator: Entity) -> bool {
        self.table.entity_obstacle(EntityKind::Separator, false)
    }

    fn is_jumper_obstacle(&self, _jumper: Entity) -> bool {
        self.table
            .entity_obstacle(EntityKind::Jumper, !self.can_take_jumper())
    }

    fn is_stairs_obstacle(&self, _stairs: Entity) -> bool {
        self.table
            .entity_obstacle(EntityKind::Stairs, !self.can_take_stairs())
    }

    // Combat and items

    fn get_can_start_sword(&self, body: &HeroBody) -> bool {
        self.table.get(Capability::CanUseSword) && body.equipment.has_ability(Ability::Sword)
    }

    fn get_can_be_hurt(&self, _attacker: Attacker) -> bool {
        self.table.get(Capability::CanBeHurt)
    }

    fn get_can_use_shield(&self) -> bool {
        self.table.get(Capability::CanUseShield)
    }

    fn is_cutting_with_sword(&self, _body: &HeroBody, _target: &Rect) -> bool {
        false
    }

    fn get_can_start_item(&self, item: &Item) -> bool {
        self.table.can_use_item(&item.name)
    }

    fn get_can_pick_treasure(&self, _treasure: &str) -> bool {
        self.table.get(Capability::CanPickTreasure)
    }

    // Carried object

    fn get_carried_object(&self) -> Option<Entity> {
        self.carried_object
    }

    fn get_previous_carried_object_behavior(&self) -> CarriedObjectBehavior {
        self.table.carried_object_action()
    }

    fn adopt_carried_object(&mut self, object: Entity) {
        self.carried_object = Some(object);
    }
}

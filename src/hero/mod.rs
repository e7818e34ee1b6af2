//! The hero: its body, its single current state and the per-frame
//! pipeline driving both.

mod body;

use std::collections::VecDeque;

use glam::Vec2;
use hecs::Entity;

use crate::components::physics::animation_direction4;
use crate::components::{Equipment, EntityKind};
use crate::config::HeroConfig;
use crate::engine::{CommandEvent, Commands};
use crate::fsm::{StateId, StateIds};
use crate::map::Map;
use crate::state::{
    dispatch_command_pressed, dispatch_command_released, CustomState, FreeState, RunningState,
    State, StateContext, SwordSwingingState,
};
use crate::systems::{carried_object_system, detector_system, ground_system, movement_system};

pub use body::{ActionEffect, Animation, HeroBody, HeroEvent, HERO_SIZE};

/// Scripting-side observer of the hero.
pub trait StateObserver {
    /// Called after every transition with the new state's name. Custom
    /// states are also exposed for further querying.
    fn on_state_changed(&mut self, name: &str, custom: Option<&CustomState>);

    /// Return `true` to take over a game over. The observer is then
    /// responsible for giving the hero some life back.
    fn on_game_over(&mut self, _body: &mut HeroBody) -> bool {
        false
    }
}

pub struct Hero {
    pub body: HeroBody,
    state: Box<dyn State>,
    current: Option<StateId>,
    ids: StateIds,
    pending: VecDeque<Box<dyn State>>,
    suspended: bool,
    when_suspended: u32,
    commands: Commands,
    now: u32,
    observers: Vec<Box<dyn StateObserver>>,
}

impl Hero {
    /// Put a new hero on `map`, starting in the free state.
    pub fn new(map: &mut Map, position: Vec2, equipment: Equipment, config: HeroConfig) -> Self {
        let entity = map.spawn(EntityKind::Hero, position, HERO_SIZE);
        let body = HeroBody::new(entity, position, equipment, config);

        let mut ids = StateIds::new();
        let id = ids.allocate();
        let mut state: Box<dyn State> = Box::new(FreeState::new());
        state.core_mut().set_entity(entity, id);
        state.core_mut().set_map(map.id());
        state.core_mut().mark_started();

        let mut hero = Self {
            body,
            state,
            current: Some(id),
            ids,
            pending: VecDeque::new(),
            suspended: false,
            when_suspended: 0,
            commands: Commands::new(),
            now: 0,
            observers: Vec::new(),
        };
        {
            let mut ctx = StateContext::new(
                &mut hero.body,
                map,
                &hero.commands,
                hero.now,
                hero.current,
                &mut hero.pending,
            );
            hero.state.start(&mut ctx, None);
        }
        hero.apply_pending_transitions(map);
        tracing::debug!(?entity, "hero created");
        hero
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn entity(&self) -> Entity {
        self.body.entity
    }

    pub fn state(&self) -> &dyn State {
        self.state.as_ref()
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    pub fn current_state_id(&self) -> Option<StateId> {
        self.current
    }

    /// Whether `state` is this hero's current, non-stopping state.
    pub fn is_current_state(&self, state: &dyn State) -> bool {
        state.core().is_current(self.current)
    }

    pub fn commands(&self) -> &Commands {
        &self.commands
    }

    /// Press and release commands here; they are handled on the next update.
    pub fn commands_mut(&mut self) -> &mut Commands {
        &mut self.commands
    }

    pub fn now(&self) -> u32 {
        self.now
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn add_observer(&mut self, observer: impl StateObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn drain_events(&mut self) -> Vec<HeroEvent> {
        std::mem::take(&mut self.body.events)
    }

    // Pass-through queries used by the game and the HUD.

    pub fn is_free(&self) -> bool {
        self.state.is_free()
    }

    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    pub fn is_carrying_item(&self) -> bool {
        self.state.is_carrying_item()
    }

    pub fn get_carried_object(&self) -> Option<Entity> {
        self.state.get_carried_object()
    }

    pub fn is_using_item(&self) -> bool {
        self.state.is_using_item()
    }

    pub fn get_can_be_hurt(&self, attacker: crate::state::Attacker) -> bool {
        !self.body.is_invincible(self.now) && self.state.get_can_be_hurt(attacker)
    }

    pub fn life(&self) -> i32 {
        self.body.equipment.life()
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Replace the current state. Transitions requested while this one
    /// runs are applied afterwards, in order.
    pub fn set_state(&mut self, map: &mut Map, state: impl State + 'static) {
        self.set_boxed_state(map, Box::new(state));
    }

    pub fn set_boxed_state(&mut self, map: &mut Map, state: Box<dyn State>) {
        self.pending.push_back(state);
        self.apply_pending_transitions(map);
    }

    pub fn start_free(&mut self, map: &mut Map) {
        self.set_state(map, FreeState::new());
    }

    pub fn start_running(&mut self, map: &mut Map, command: crate::engine::Command) {
        self.set_state(map, RunningState::new(command));
    }

    pub fn start_sword(&mut self, map: &mut Map) {
        self.set_state(map, SwordSwingingState::new());
    }

    pub fn start_custom(&mut self, map: &mut Map, state: CustomState) {
        self.set_state(map, state);
    }

    /// Re-derive the state from the ground below (free, swimming or
    /// falling).
    pub fn start_state_from_ground(&mut self, map: &mut Map) {
        {
            let mut ctx = self.context(map);
            ctx.start_state_from_ground();
        }
        self.apply_pending_transitions(map);
    }

    /// Hurt the hero from `source` if the current state allows it.
    pub fn hurt(&mut self, map: &mut Map, source: Vec2, damage: i32) -> bool {
        let hurt = {
            let mut ctx = StateContext::new(
                &mut self.body,
                map,
                &self.commands,
                self.now,
                self.current,
                &mut self.pending,
            );
            ctx.try_hurt(self.state.as_ref(), crate::state::Attacker::Script, source, damage)
        };
        self.apply_pending_transitions(map);
        hurt
    }

    fn apply_pending_transitions(&mut self, map: &mut Map) {
        while let Some(next) = self.pending.pop_front() {
            self.transition(map, next);
        }
    }

    fn transition(&mut self, map: &mut Map, mut next: Box<dyn State>) {
        assert!(
            !next.core().is_started(),
            "state '{}' was already started",
            next.name()
        );
        assert!(
            !self.state.core().is_stopping(),
            "state '{}' is already stopping",
            self.state.name()
        );

        let id = self.ids.allocate();
        next.core_mut().set_entity(self.body.entity, id);
        next.core_mut().set_map(map.id());

        let from = self.state.name();
        self.state.core_mut().mark_stopping();
        {
            let mut ctx = StateContext::new(
                &mut self.body,
                map,
                &self.commands,
                self.now,
                self.current,
                &mut self.pending,
            );
            self.state.stop(&mut ctx, next.as_mut());
        }

        let previous = std::mem::replace(&mut self.state, next);
        self.current = Some(id);
        self.state.core_mut().mark_started();
        {
            let mut ctx = StateContext::new(
                &mut self.body,
                map,
                &self.commands,
                self.now,
                self.current,
                &mut self.pending,
            );
            if self.suspended {
                self.state.set_suspended(&mut ctx, true);
            }
            self.state.start(&mut ctx, Some(previous.as_ref()));
        }

        let to = self.state.name();
        tracing::debug!(from, to, id = %id, "hero state changed");
        self.body.push_event(HeroEvent::StateChanged { from, to });
        for observer in &mut self.observers {
            observer.on_state_changed(to, self.state.as_custom());
        }
    }

    fn context<'a>(&'a mut self, map: &'a mut Map) -> StateContext<'a> {
        StateContext::new(
            &mut self.body,
            map,
            &self.commands,
            self.now,
            self.current,
            &mut self.pending,
        )
    }

    // -----------------------------------------------------------------------
    // Suspension
    // -----------------------------------------------------------------------

    /// Pause or resume the hero. Commands received while suspended are
    /// dropped.
    pub fn set_suspended(&mut self, map: &mut Map, suspended: bool, now: u32) {
        if suspended == self.suspended {
            return;
        }
        self.now = now;
        self.suspended = suspended;
        if suspended {
            self.when_suspended = now;
        }
        {
            let mut ctx = StateContext::new(
                &mut self.body,
                map,
                &self.commands,
                self.now,
                self.current,
                &mut self.pending,
            );
            self.state.set_suspended(&mut ctx, suspended);
        }
        if !suspended {
            if let Some(until) = self.body.invincible_until.as_mut() {
                *until += now.saturating_sub(self.when_suspended);
            }
        }
        self.apply_pending_transitions(map);
    }

    // -----------------------------------------------------------------------
    // Frame
    // -----------------------------------------------------------------------

    /// Run one frame at date `now` (ms).
    pub fn update(&mut self, map: &mut Map, now: u32) {
        let dt = now.saturating_sub(self.now);
        self.now = now;

        self.process_commands(map);

        // 1. Invincibility.
        if self
            .body
            .invincible_until
            .is_some_and(|until| !self.suspended && now >= until)
        {
            self.body.invincible_until = None;
        }

        // 2. Movement.
        if !self.suspended {
            {
                let mut ctx = StateContext::new(
                    &mut self.body,
                    map,
                    &self.commands,
                    self.now,
                    self.current,
                    &mut self.pending,
                );
                movement_system(self.state.as_mut(), &mut ctx, dt);
            }
            self.apply_pending_transitions(map);
        }

        // 3. Sprite direction.
        if !self.state.is_direction_locked() {
            if let Some(direction8) = self.state.get_wanted_movement_direction8() {
                self.body.direction4 = animation_direction4(direction8, self.body.direction4);
            }
        }

        // 4. State.
        {
            let mut ctx = StateContext::new(
                &mut self.body,
                map,
                &self.commands,
                self.now,
                self.current,
                &mut self.pending,
            );
            self.state.update(&mut ctx);
        }
        self.apply_pending_transitions(map);

        // 5. World reactions.
        if !self.suspended {
            {
                let mut ctx = StateContext::new(
                    &mut self.body,
                    map,
                    &self.commands,
                    self.now,
                    self.current,
                    &mut self.pending,
                );
                ground_system(self.state.as_mut(), &mut ctx);
            }
            self.apply_pending_transitions(map);
            {
                let mut ctx = StateContext::new(
                    &mut self.body,
                    map,
                    &self.commands,
                    self.now,
                    self.current,
                    &mut self.pending,
                );
                detector_system(self.state.as_mut(), &mut ctx);
                carried_object_system(self.state.as_mut(), &mut ctx, dt);
            }
            self.apply_pending_transitions(map);
            self.check_game_over(map);
        }

        map.set_position(self.body.entity, self.body.position);
    }

    fn process_commands(&mut self, map: &mut Map) {
        let events = self.commands.take_events();
        if self.suspended {
            return;
        }
        for event in events {
            {
                let mut ctx = StateContext::new(
                    &mut self.body,
                    map,
                    &self.commands,
                    self.now,
                    self.current,
                    &mut self.pending,
                );
                match event {
                    CommandEvent::Pressed(command) => {
                        dispatch_command_pressed(self.state.as_mut(), &mut ctx, command)
                    }
                    CommandEvent::Released(command) => {
                        dispatch_command_released(self.state.as_mut(), &mut ctx, command)
                    }
                }
            }
            self.apply_pending_transitions(map);
        }
    }

    fn check_game_over(&mut self, map: &mut Map) {
        if self.body.equipment.life() > 0 || !self.state.can_start_gameover_sequence() {
            return;
        }
        tracing::info!("game over");
        self.body.push_event(HeroEvent::GameOver);

        let body = &mut self.body;
        let handled = self
            .observers
            .iter_mut()
            .any(|observer| observer.on_game_over(body));
        if handled {
            return;
        }

        tracing::warn!("no game-over handler, restarting at the start position");
        self.body.equipment.restore_all_life();
        self.body.position = self.body.start_position;
        self.body.last_solid_ground = self.body.start_position;
        self.body.invincible_until = None;
        self.body.stop_movement();
        self.body.push_event(HeroEvent::GameRestarted);
        self.set_state(map, FreeState::new());
    }
}

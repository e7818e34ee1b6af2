use std::collections::VecDeque;

use hecs::Entity;

use crate::components::{Ability, Ground};
use crate::config::HeroConfig;
use crate::engine::{Command, Commands};
use crate::fsm::StateId;
use crate::hero::{HeroBody, HeroEvent};
use crate::map::Map;

use super::{Attacker, FallCause, FallingState, FreeState, HurtState, State, SwimmingState};

/// What a state may touch while one of its callbacks runs.
///
/// Transitions requested through [`StateContext::set_state`] are queued and
/// applied by the hero once the callback (and any transition in progress)
/// returns.
pub struct StateContext<'a> {
    pub body: &'a mut HeroBody,
    pub map: &'a mut Map,
    pub commands: &'a Commands,
    pub now: u32,
    current: Option<StateId>,
    requests: &'a mut VecDeque<Box<dyn State>>,
}

impl<'a> StateContext<'a> {
    pub fn new(
        body: &'a mut HeroBody,
        map: &'a mut Map,
        commands: &'a Commands,
        now: u32,
        current: Option<StateId>,
        requests: &'a mut VecDeque<Box<dyn State>>,
    ) -> Self {
        Self {
            body,
            map,
            commands,
            now,
            current,
            requests,
        }
    }

    pub fn config(&self) -> &HeroConfig {
        &self.body.config
    }

    /// Id of the hero's current state, `None` before the first one starts.
    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    pub fn is_command_pressed(&self, command: Command) -> bool {
        self.commands.is_command_pressed(command)
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    pub fn set_state(&mut self, state: impl State + 'static) {
        self.set_boxed_state(Box::new(state));
    }

    pub fn set_boxed_state(&mut self, state: Box<dyn State>) {
        tracing::trace!(requested = state.name(), "transition queued");
        self.requests.push_back(state);
    }

    pub fn has_pending_transition(&self) -> bool {
        !self.requests.is_empty()
    }

    /// Pick the state the ground below calls for: swimming or drowning in
    /// deep water, falling in holes and lava, free otherwise.
    pub fn start_state_from_ground(&mut self) {
        match self.body.ground_below {
            Ground::DeepWater if self.body.equipment.has_ability(Ability::Swim) => {
                self.set_state(SwimmingState::new())
            }
            Ground::DeepWater => self.set_state(FallingState::new(FallCause::Drown)),
            Ground::Hole => self.set_state(FallingState::new(FallCause::Hole)),
            Ground::Lava => self.set_state(FallingState::new(FallCause::Lava)),
            _ => self.set_state(FreeState::new()),
        }
    }

    /// Hurt the hero if it is not invincible and `state` lets it. `source`
    /// is the point the hero is knocked away from.
    pub fn try_hurt(
        &mut self,
        state: &dyn State,
        attacker: Attacker,
        source: glam::Vec2,
        damage: i32,
    ) -> bool {
        if self.body.is_invincible(self.now) || !state.get_can_be_hurt(attacker) {
            return false;
        }
        self.body.invincible_until = Some(self.now + self.body.config.invincibility_ms);
        self.set_state(HurtState::new(source, damage));
        true
    }

    // -----------------------------------------------------------------------
    // Carried objects
    // -----------------------------------------------------------------------

    pub fn throw_carried_object(&mut self, object: Entity) {
        let rect = self.body.rect();
        self.map
            .throw_object(object, &rect, self.body.direction4, &self.body.config);
        self.body.push_event(HeroEvent::ObjectThrown(object));
    }

    pub fn remove_carried_object(&mut self, object: Entity) {
        if self.map.remove_object(object) {
            self.body.push_event(HeroEvent::ObjectRemoved(object));
        }
    }
}

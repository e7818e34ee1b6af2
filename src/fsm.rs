//! Lifecycle bookkeeping shared by every state machine in the crate (hero
//! states and camera states).
//!
//! A state object is *created* unbound, *bound* to the actor that will own
//! it, *started* once, and *stopped* once. Stopping is terminal: a stopped
//! state is never current again. Violations of this order are engine bugs
//! and abort.

use std::fmt;

use hecs::Entity;

/// Identity of a bound state, unique per allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out increasing [`StateId`]s. One per actor.
#[derive(Debug, Default)]
pub struct StateIds {
    next: u32,
}

impl StateIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> StateId {
        self.next += 1;
        StateId(self.next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Running,
    /// Entered at the beginning of `stop()` and never left.
    Stopping,
}

/// The part of a state every concrete state embeds.
#[derive(Debug, Clone)]
pub struct StateCore {
    name: &'static str,
    id: Option<StateId>,
    entity: Option<Entity>,
    map: Option<String>,
    lifecycle: Lifecycle,
    suspended: bool,
    when_suspended: u32,
}

impl StateCore {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            id: None,
            entity: None,
            map: None,
            lifecycle: Lifecycle::Created,
            suspended: false,
            when_suspended: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Bind the state to the actor that owns it. A state is bound once.
    pub fn set_entity(&mut self, entity: Entity, id: StateId) {
        assert!(
            self.id.is_none(),
            "state '{}' is already bound to {:?}",
            self.name,
            self.entity
        );
        self.entity = Some(entity);
        self.id = Some(id);
    }

    pub fn is_bound(&self) -> bool {
        self.entity.is_some()
    }

    /// The controlled actor. Fatal on an unbound state.
    pub fn entity(&self) -> Entity {
        match self.entity {
            Some(entity) => entity,
            None => panic!("state '{}' is not bound to an entity", self.name),
        }
    }

    /// `None` until bound.
    pub fn id(&self) -> Option<StateId> {
        self.id
    }

    pub fn set_map(&mut self, map: &str) {
        self.map = Some(map.to_owned());
    }

    pub fn map(&self) -> Option<&str> {
        self.map.as_deref()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_started(&self) -> bool {
        self.lifecycle != Lifecycle::Created
    }

    pub fn is_stopping(&self) -> bool {
        self.lifecycle == Lifecycle::Stopping
    }

    pub fn mark_started(&mut self) {
        assert!(
            self.lifecycle == Lifecycle::Created,
            "state '{}' started twice",
            self.name
        );
        assert!(self.is_bound(), "state '{}' started before being bound", self.name);
        self.lifecycle = Lifecycle::Running;
    }

    pub fn mark_stopping(&mut self) {
        assert!(
            self.lifecycle == Lifecycle::Running,
            "state '{}' stopped while {:?}",
            self.name,
            self.lifecycle
        );
        self.lifecycle = Lifecycle::Stopping;
    }

    /// Whether this is the state `current` designates and it is not being
    /// torn down.
    pub fn is_current(&self, current: Option<StateId>) -> bool {
        self.id.is_some() && self.id == current && !self.is_stopping()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Date of the last suspension. Kept after resuming so that states can
    /// compute how long they were paused.
    pub fn when_suspended(&self) -> u32 {
        self.when_suspended
    }

    /// Returns `false` when nothing changed (already in that suspension
    /// state). Resuming leaves `when_suspended` untouched.
    pub fn set_suspended(&mut self, suspended: bool, now: u32) -> bool {
        if suspended == self.suspended {
            return false;
        }
        self.suspended = suspended;
        if suspended {
            self.when_suspended = now;
        }
        true
    }

    /// Time spent suspended when resuming at `now`.
    pub fn suspended_duration(&self, now: u32) -> u32 {
        now.saturating_sub(self.when_suspended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::World;

    fn bound(name: &'static str) -> (StateCore, StateId) {
        let mut world = World::new();
        let entity = world.spawn(());
        let mut ids = StateIds::new();
        let id = ids.allocate();
        let mut core = StateCore::new(name);
        core.set_entity(entity, id);
        (core, id)
    }

    #[test]
    fn suspension_is_idempotent() {
        let (mut core, _) = bound("probe");
        assert!(core.set_suspended(true, 100));
        assert!(!core.set_suspended(true, 250));
        assert_eq!(core.when_suspended(), 100);
        assert!(core.set_suspended(false, 400));
        assert_eq!(core.suspended_duration(400), 300);
        assert!(!core.set_suspended(false, 500));
    }

    #[test]
    fn current_until_stopping() {
        let (mut core, id) = bound("probe");
        core.mark_started();
        assert!(core.is_current(Some(id)));
        core.mark_stopping();
        assert!(!core.is_current(Some(id)));
    }

    #[test]
    fn unbound_is_never_current() {
        let core = StateCore::new("probe");
        assert!(!core.is_current(None));
    }

    #[test]
    #[should_panic(expected = "started twice")]
    fn double_start_is_fatal() {
        let (mut core, _) = bound("probe");
        core.mark_started();
        core.mark_started();
    }

    #[test]
    #[should_panic(expected = "stopped while Stopping")]
    fn double_stop_is_fatal() {
        let (mut core, _) = bound("probe");
        core.mark_started();
        core.mark_stopping();
        core.mark_stopping();
    }

    #[test]
    #[should_panic(expected = "not bound")]
    fn unbound_entity_access_is_fatal() {
        StateCore::new("probe").entity();
    }

    #[test]
    fn ids_increase() {
        let mut ids = StateIds::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert!(b > a);
    }
}

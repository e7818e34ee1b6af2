//! Map camera. Shares the hero's state lifecycle (`StateCore`) but only
//! needs two behaviors: follow an entity, or be moved by a script.

use glam::Vec2;
use hecs::Entity;

use crate::components::EntityKind;
use crate::fsm::{StateCore, StateId, StateIds};
use crate::map::Map;

/// Default viewport, in map pixels.
pub const DEFAULT_VIEWPORT: Vec2 = Vec2::new(320.0, 240.0);

#[derive(Debug, Clone)]
pub struct CameraBody {
    pub entity: Entity,
    /// Top-left corner of the visible area.
    pub position: Vec2,
    pub size: Vec2,
}

impl CameraBody {
    pub fn center(&self) -> Vec2 {
        self.position + self.size / 2.0
    }

    /// Closest center to `center` the view can take without leaving the
    /// map, when the map is large enough.
    fn reachable_center(&self, center: Vec2, map_size: Vec2) -> Vec2 {
        let wanted = center - self.size / 2.0;
        let max = (map_size - self.size).max(Vec2::ZERO);
        wanted.clamp(Vec2::ZERO, max) + self.size / 2.0
    }

    fn center_on(&mut self, center: Vec2, map_size: Vec2) {
        self.position = self.reachable_center(center, map_size) - self.size / 2.0;
    }
}

pub trait CameraState {
    fn core(&self) -> &StateCore;
    fn core_mut(&mut self) -> &mut StateCore;

    fn name(&self) -> &'static str {
        self.core().name()
    }

    fn start(&mut self, _body: &mut CameraBody, _map: &Map) {}

    fn update(&mut self, _body: &mut CameraBody, _map: &Map, _dt: u32) {}

    fn stop(&mut self, _body: &mut CameraBody, _next: &dyn CameraState) {}

    fn is_current_state(&self, current: Option<StateId>) -> bool {
        self.core().is_current(current)
    }

    fn tracked_entity(&self) -> Option<Entity> {
        None
    }
}

// ---------------------------------------------------------------------------
// Tracking
// ---------------------------------------------------------------------------

/// Keeps an entity in the middle of the screen.
pub struct TrackingState {
    core: StateCore,
    tracked: Entity,
}

impl TrackingState {
    pub fn new(tracked: Entity) -> Self {
        Self {
            core: StateCore::new("tracking"),
            tracked,
        }
    }

    fn follow(&self, body: &mut CameraBody, map: &Map) {
        if let Some(rect) = map.entity_rect(self.tracked) {
            body.center_on(rect.center(), map.pixel_size());
        }
    }
}

impl CameraState for TrackingState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn start(&mut self, body: &mut CameraBody, map: &Map) {
        debug_assert!(
            map.contains(self.tracked),
            "tracked entity is not on map '{}'",
            map.id()
        );
        self.follow(body, map);
    }

    fn update(&mut self, body: &mut CameraBody, map: &Map, _dt: u32) {
        self.follow(body, map);
    }

    fn tracked_entity(&self) -> Option<Entity> {
        Some(self.tracked)
    }
}

// ---------------------------------------------------------------------------
// Manual
// ---------------------------------------------------------------------------

/// Stays where it is until told to move somewhere.
pub struct ManualState {
    core: StateCore,
    target: Option<(Vec2, f32)>,
}

impl ManualState {
    pub fn new() -> Self {
        Self {
            core: StateCore::new("manual"),
            target: None,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.target.is_some()
    }
}

impl Default for ManualState {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraState for ManualState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn update(&mut self, body: &mut CameraBody, map: &Map, dt: u32) {
        let Some((target, speed)) = self.target else {
            return;
        };
        let target = body.reachable_center(target, map.pixel_size());
        let center = body.center();
        let remaining = target - center;
        let step = speed * dt as f32 / 1000.0;
        if remaining.length() <= step {
            body.center_on(target, map.pixel_size());
            self.target = None;
        } else {
            body.center_on(center + remaining.normalize() * step, map.pixel_size());
        }
    }
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

pub struct Camera {
    body: CameraBody,
    state: Box<dyn CameraState>,
    current: Option<StateId>,
    ids: StateIds,
}

impl Camera {
    /// Spawn a camera on `map`, in manual mode at the top-left corner.
    pub fn new(map: &mut Map, size: Vec2) -> Self {
        let entity = map.spawn(EntityKind::Camera, Vec2::ZERO, size);
        let mut camera = Self {
            body: CameraBody {
                entity,
                position: Vec2::ZERO,
                size,
            },
            state: Box::new(ManualState::new()),
            current: None,
            ids: StateIds::new(),
        };
        let id = camera.ids.allocate();
        camera.state.core_mut().set_entity(entity, id);
        camera.state.core_mut().set_map(map.id());
        camera.state.core_mut().mark_started();
        camera.current = Some(id);
        camera.state.start(&mut camera.body, map);
        camera
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    pub fn size(&self) -> Vec2 {
        self.body.size
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    pub fn tracked_entity(&self) -> Option<Entity> {
        self.state.tracked_entity()
    }

    pub fn is_current_state(&self, state: &dyn CameraState) -> bool {
        state.is_current_state(self.current)
    }

    pub fn start_tracking(&mut self, map: &mut Map, entity: Entity) {
        self.set_state(map, Box::new(TrackingState::new(entity)));
    }

    pub fn start_manual(&mut self, map: &mut Map) {
        self.set_state(map, Box::new(ManualState::new()));
    }

    /// Scroll the view's center to `target`. Switches to manual mode first
    /// if needed.
    pub fn move_to(&mut self, map: &mut Map, target: Vec2, speed: f32) {
        let mut manual = ManualState::new();
        manual.target = Some((target, speed));
        self.set_state(map, Box::new(manual));
    }

    pub fn update(&mut self, map: &mut Map, dt: u32) {
        self.state.update(&mut self.body, map, dt);
        map.set_position(self.body.entity, self.body.position);
    }

    fn set_state(&mut self, map: &mut Map, mut next: Box<dyn CameraState>) {
        assert!(
            !next.core().is_started(),
            "camera state '{}' was already started",
            next.name()
        );
        let id = self.ids.allocate();
        next.core_mut().set_entity(self.body.entity, id);
        next.core_mut().set_map(map.id());

        self.state.core_mut().mark_stopping();
        self.state.stop(&mut self.body, next.as_ref());

        let from = self.state.name();
        self.state = next;
        self.current = Some(id);
        self.state.core_mut().mark_started();
        self.state.start(&mut self.body, map);
        tracing::debug!(from, to = self.state.name(), "camera state changed");
        map.set_position(self.body.entity, self.body.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::GroundMap;

    #[test]
    fn tracking_centers_and_clamps() {
        // 640 x 480 map.
        let mut map = Map::new("field", GroundMap::new(40, 30, 16.0));
        let target = map.spawn(EntityKind::Npc, Vec2::new(312.0, 232.0), Vec2::splat(16.0));
        let mut camera = Camera::new(&mut map, DEFAULT_VIEWPORT);

        camera.start_tracking(&mut map, target);
        assert_eq!(camera.state_name(), "tracking");
        assert_eq!(camera.center(), Vec2::new(320.0, 240.0));

        map.set_position(target, Vec2::new(0.0, 0.0));
        camera.update(&mut map, 10);
        assert_eq!(camera.position(), Vec2::ZERO);

        map.set_position(target, Vec2::new(630.0, 470.0));
        camera.update(&mut map, 10);
        assert_eq!(camera.position(), Vec2::new(320.0, 240.0));
    }

    #[test]
    fn manual_moves_toward_its_target() {
        let mut map = Map::new("field", GroundMap::new(40, 30, 16.0));
        let mut camera = Camera::new(&mut map, DEFAULT_VIEWPORT);
        assert_eq!(camera.center(), Vec2::new(160.0, 120.0));

        camera.move_to(&mut map, Vec2::new(260.0, 120.0), 100.0);
        camera.update(&mut map, 500);
        assert_eq!(camera.center(), Vec2::new(210.0, 120.0));
        camera.update(&mut map, 1000);
        assert_eq!(camera.center(), Vec2::new(260.0, 120.0));
    }

    #[test]
    fn manual_stops_at_the_map_edge() {
        let mut map = Map::new("field", GroundMap::new(40, 30, 16.0));
        let mut camera = Camera::new(&mut map, DEFAULT_VIEWPORT);
        let mut manual = ManualState::new();
        manual.target = Some((Vec2::new(-50.0, 120.0), 100.0));
        camera.body.center_on(Vec2::new(260.0, 120.0), map.pixel_size());

        manual.update(&mut camera.body, &map, 500);
        assert!(manual.is_moving());
        assert_eq!(camera.body.center(), Vec2::new(210.0, 120.0));

        manual.update(&mut camera.body, &map, 1000);
        assert!(!manual.is_moving());
        assert_eq!(camera.body.position, Vec2::ZERO);
    }

    #[test]
    fn only_the_latest_state_is_current() {
        let mut map = Map::new("field", GroundMap::new(40, 30, 16.0));
        let target = map.spawn(EntityKind::Npc, Vec2::new(100.0, 100.0), Vec2::splat(16.0));
        let mut camera = Camera::new(&mut map, DEFAULT_VIEWPORT);

        camera.start_tracking(&mut map, target);
        assert!(camera.is_current_state(camera.state.as_ref()));
        assert_eq!(camera.tracked_entity(), Some(target));

        let stale = TrackingState::new(target);
        assert!(!camera.is_current_state(&stale));
        camera.start_manual(&mut map);
        assert_eq!(camera.tracked_entity(), None);
    }
}

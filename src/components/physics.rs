use std::f32::consts::FRAC_PI_4;

use glam::Vec2;

// ---------------------------------------------------------------------------
// Directions
// ---------------------------------------------------------------------------
//
// Screen coordinates: x grows to the right, y grows downwards.
// Direction4: 0 right, 1 up, 2 left, 3 down.
// Direction8: 0 right, 1 up-right, 2 up, ... 7 down-right.

/// Angle in radians of a direction8, counter-clockwise from the right.
pub fn direction8_angle(direction8: u8) -> f32 {
    f32::from(direction8 % 8) * FRAC_PI_4
}

/// Unit vector (screen space) of an angle measured counter-clockwise.
pub fn angle_to_vec(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), -angle.sin())
}

pub fn direction8_to_vec(direction8: u8) -> Vec2 {
    angle_to_vec(direction8_angle(direction8))
}

pub fn direction4_to_vec(direction4: u8) -> Vec2 {
    direction8_to_vec((direction4 % 4) * 2)
}

/// Counter-clockwise angle from `from` to `to`.
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    (-d.y).atan2(d.x)
}

/// Sprite direction4 for a wanted direction8, keeping the current one on
/// diagonals when it is one of the two components.
pub fn animation_direction4(wanted_direction8: u8, current_direction4: u8) -> u8 {
    let wanted = wanted_direction8 % 8;
    if wanted % 2 == 0 {
        return wanted / 2;
    }
    let a = wanted / 2;
    let b = ((wanted + 1) / 2) % 4;
    if current_direction4 == a || current_direction4 == b {
        current_direction4
    } else {
        b
    }
}

// ---------------------------------------------------------------------------
// Bounding boxes
// ---------------------------------------------------------------------------

/// Axis-aligned box, `min` inclusive, `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x < self.max.x && point.y >= self.min.y && point.y < self.max.y
    }

    /// Strip of `depth` pixels touching this box on the given side.
    pub fn in_front(&self, direction4: u8, depth: f32) -> Rect {
        let size = self.size();
        match direction4 % 4 {
            0 => Rect::new(Vec2::new(self.max.x, self.min.y), Vec2::new(depth, size.y)),
            1 => Rect::new(Vec2::new(self.min.x, self.min.y - depth), Vec2::new(size.x, depth)),
            2 => Rect::new(Vec2::new(self.min.x - depth, self.min.y), Vec2::new(depth, size.y)),
            _ => Rect::new(Vec2::new(self.min.x, self.max.y), Vec2::new(size.x, depth)),
        }
    }

    /// This box grown by `margin` on every side.
    pub fn inflated(&self, margin: f32) -> Rect {
        Rect {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    /// Fixed angle, stops after `max_distance` or on an obstacle.
    Straight,
    /// Airborne hop in a direction8, stops after its length or on an obstacle.
    Jump,
    /// Driven by the player's direction commands; never finishes by itself.
    Player,
}

/// The movement currently applied to an actor.
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    kind: MovementKind,
    direction: Vec2,
    pub speed: f32,
    max_distance: Option<f32>,
    travelled: f32,
    finished: bool,
}

impl Movement {
    pub fn straight(angle: f32, speed: f32, max_distance: f32) -> Self {
        Self {
            kind: MovementKind::Straight,
            direction: angle_to_vec(angle),
            speed,
            max_distance: Some(max_distance),
            travelled: 0.0,
            finished: false,
        }
    }

    pub fn jump(direction8: u8, length: f32, speed: f32) -> Self {
        Self {
            kind: MovementKind::Jump,
            direction: direction8_to_vec(direction8),
            speed,
            max_distance: Some(length),
            travelled: 0.0,
            finished: false,
        }
    }

    /// Player movement, initially stopped.
    pub fn player(speed: f32) -> Self {
        Self {
            kind: MovementKind::Player,
            direction: Vec2::ZERO,
            speed,
            max_distance: None,
            travelled: 0.0,
            finished: false,
        }
    }

    pub fn kind(&self) -> MovementKind {
        self.kind
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Only meaningful for player movements.
    pub fn set_direction8(&mut self, direction8: Option<u8>) {
        self.direction = direction8.map_or(Vec2::ZERO, direction8_to_vec);
    }

    pub fn is_stopped(&self) -> bool {
        self.direction == Vec2::ZERO || self.speed <= 0.0
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn travelled(&self) -> f32 {
        self.travelled
    }

    /// Displacement wanted for `dt_ms`, clamped to the remaining distance.
    pub fn displacement(&self, dt_ms: u32) -> Vec2 {
        if self.finished || self.is_stopped() {
            return Vec2::ZERO;
        }
        let mut distance = self.speed * dt_ms as f32 / 1000.0;
        if let Some(max) = self.max_distance {
            distance = distance.min(max - self.travelled).max(0.0);
        }
        self.direction * distance
    }

    /// Record the distance actually covered.
    pub fn notify_moved(&mut self, distance: f32) {
        self.travelled += distance;
        if let Some(max) = self.max_distance {
            if self.travelled >= max - f32::EPSILON {
                self.finished = true;
            }
        }
    }

    /// An obstacle stops straight movements and jumps for good.
    pub fn notify_obstacle_reached(&mut self) {
        if self.kind != MovementKind::Player {
            self.finished = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_movement_finishes_at_max_distance() {
        let mut movement = Movement::straight(0.0, 100.0, 15.0);
        let step = movement.displacement(100);
        assert!((step.x - 10.0).abs() < 1e-4);
        movement.notify_moved(step.length());
        assert!(!movement.is_finished());

        let step = movement.displacement(100);
        assert!((step.x - 5.0).abs() < 1e-4);
        movement.notify_moved(step.length());
        assert!(movement.is_finished());
        assert_eq!(movement.displacement(100), Vec2::ZERO);
    }

    #[test]
    fn player_movement_survives_obstacles() {
        let mut movement = Movement::player(88.0);
        movement.set_direction8(Some(2));
        movement.notify_obstacle_reached();
        assert!(!movement.is_finished());
        assert!(movement.displacement(1000).y < 0.0);
    }

    #[test]
    fn diagonal_keeps_current_component() {
        assert_eq!(animation_direction4(1, 0), 0);
        assert_eq!(animation_direction4(1, 1), 1);
        assert_eq!(animation_direction4(1, 3), 1);
        assert_eq!(animation_direction4(6, 0), 3);
    }

    #[test]
    fn rect_in_front() {
        let rect = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(16.0, 16.0));
        let front = rect.in_front(3, 8.0);
        assert_eq!(front.min, Vec2::new(0.0, 16.0));
        assert_eq!(front.max, Vec2::new(16.0, 24.0));
        assert!(!rect.overlaps(&front));
    }

    #[test]
    fn angle_between_points_up() {
        let angle = angle_between(Vec2::new(0.0, 10.0), Vec2::new(0.0, 0.0));
        let v = angle_to_vec(angle);
        assert!(v.y < -0.99);
    }
}

use glam::Vec2;
use hecs::Entity;
use strum::{Display, IntoStaticStr};

use crate::components::physics::direction4_to_vec;
use crate::components::{Equipment, Ground, Movement, Rect};
use crate::config::HeroConfig;

pub const HERO_SIZE: Vec2 = Vec2::new(16.0, 16.0);

/// What pressing the action command would do right now, for the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ActionEffect {
    #[default]
    None,
    Lift,
    Throw,
    Swim,
    Run,
}

/// A timed animation name. Only the timing matters to the states.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub name: &'static str,
    pub started: u32,
    /// `None` loops forever.
    pub duration: Option<u32>,
}

impl Animation {
    pub fn is_finished(&self, now: u32) -> bool {
        self.duration
            .is_some_and(|duration| now >= self.started + duration)
    }
}

/// Things that happened to the hero, drained by the game every frame.
#[derive(Debug, Clone, PartialEq)]
pub enum HeroEvent {
    StateChanged {
        from: &'static str,
        to: &'static str,
    },
    ObjectLifted(Entity),
    ObjectThrown(Entity),
    ObjectRemoved(Entity),
    EnemyHit {
        enemy: Entity,
        damage: i32,
        killed: bool,
    },
    Hurt {
        damage: i32,
    },
    TreasurePicked {
        treasure: String,
        amount: u32,
    },
    CrystalToggled {
        on: bool,
    },
    SensorActivated(Entity),
    SwitchActivated(Entity),
    Teletransporter {
        destination_map: String,
    },
    RunBounce,
    SwordLoaded,
    BackToSolidGround,
    GameOver,
    GameRestarted,
}

/// Everything about the hero except its current state.
///
/// States receive it mutably through the state context, which is how they
/// move the hero, change its animation or consume life.
#[derive(Debug, Clone)]
pub struct HeroBody {
    /// The hero's own entity in the map world.
    pub entity: Entity,
    /// Top-left corner.
    pub position: Vec2,
    pub size: Vec2,
    pub direction4: u8,
    pub movement: Option<Movement>,
    pub equipment: Equipment,
    pub config: HeroConfig,
    walking_speed: f32,
    pub invincible_until: Option<u32>,
    pub ground_below: Ground,
    pub last_solid_ground: Vec2,
    pub start_position: Vec2,
    animation: Animation,
    pub action_effect: ActionEffect,
    pub events: Vec<HeroEvent>,
}

impl HeroBody {
    pub fn new(entity: Entity, position: Vec2, equipment: Equipment, config: HeroConfig) -> Self {
        let walking_speed = config.walking_speed;
        Self {
            entity,
            position,
            size: HERO_SIZE,
            direction4: 3,
            movement: None,
            equipment,
            config,
            walking_speed,
            invincible_until: None,
            ground_below: Ground::Traversable,
            last_solid_ground: position,
            start_position: position,
            animation: Animation {
                name: "stopped",
                started: 0,
                duration: None,
            },
            action_effect: ActionEffect::None,
            events: Vec::new(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Strip of `depth` pixels the hero faces.
    pub fn rect_in_front(&self, depth: f32) -> Rect {
        self.rect().in_front(self.direction4, depth)
    }

    pub fn facing_vec(&self) -> Vec2 {
        direction4_to_vec(self.direction4)
    }

    // -----------------------------------------------------------------------
    // Animation
    // -----------------------------------------------------------------------

    pub fn set_animation(&mut self, name: &'static str, now: u32, duration: Option<u32>) {
        self.animation = Animation {
            name,
            started: now,
            duration,
        };
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    pub fn is_animation_finished(&self, now: u32) -> bool {
        self.animation.is_finished(now)
    }

    /// Push the animation's start forward, used on resume.
    pub fn delay_animation(&mut self, delta: u32) {
        self.animation.started += delta;
    }

    // -----------------------------------------------------------------------
    // Speed and damage
    // -----------------------------------------------------------------------

    pub fn walking_speed(&self) -> f32 {
        self.walking_speed
    }

    /// Returns whether the speed actually changed.
    pub fn set_walking_speed(&mut self, speed: f32) -> bool {
        if (self.walking_speed - speed).abs() < f32::EPSILON {
            return false;
        }
        self.walking_speed = speed;
        true
    }

    pub fn is_invincible(&self, now: u32) -> bool {
        self.invincible_until.is_some_and(|until| now < until)
    }

    pub fn push_event(&mut self, event: HeroEvent) {
        self.events.push(event);
    }

    /// Clear the movement, returning what was there.
    pub fn stop_movement(&mut self) -> Option<Movement> {
        self.movement.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecs::World;

    #[test]
    fn animation_with_duration_finishes() {
        let mut world = World::new();
        let mut body = HeroBody::new(
            world.spawn(()),
            Vec2::ZERO,
            Equipment::default(),
            HeroConfig::default(),
        );
        assert!(!body.is_animation_finished(10_000));
        body.set_animation("sword", 100, Some(300));
        assert!(!body.is_animation_finished(399));
        body.delay_animation(50);
        assert!(!body.is_animation_finished(420));
        assert!(body.is_animation_finished(450));
    }

    #[test]
    fn walking_speed_reports_changes() {
        let mut world = World::new();
        let mut body = HeroBody::new(
            world.spawn(()),
            Vec2::ZERO,
            Equipment::default(),
            HeroConfig::default(),
        );
        assert!(!body.set_walking_speed(88.0));
        assert!(body.set_walking_speed(70.4));
        assert_eq!(body.walking_speed(), 70.4);
    }
}

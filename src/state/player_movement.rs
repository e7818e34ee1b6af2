use crate::components::{Ground, Movement, MovementKind};

use super::StateContext;

/// Arrow-driven movement shared by the states that let the player walk
/// (free, carrying, swimming, sword loading, custom).
#[derive(Debug, Clone, Default)]
pub struct PlayerMovement {
    wanted_direction8: Option<u8>,
    /// Direction kept while sliding on ice, and until when.
    sliding: Option<(u8, u32)>,
}

impl PlayerMovement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wanted_direction8(&self) -> Option<u8> {
        self.wanted_direction8
    }

    pub fn start(&mut self, ctx: &mut StateContext<'_>, speed: f32) {
        ctx.body.movement = Some(Movement::player(speed));
        self.sliding = None;
        self.update(ctx, false);
    }

    /// Only clears the movement if it is still ours.
    pub fn stop(&mut self, ctx: &mut StateContext<'_>) {
        if ctx
            .body
            .movement
            .as_ref()
            .is_some_and(|movement| movement.kind() == MovementKind::Player)
        {
            ctx.body.movement = None;
        }
        self.wanted_direction8 = None;
    }

    /// Pushes the ice slide deadline back after a suspension.
    pub fn delay(&mut self, delta: u32) {
        if let Some((_, until)) = self.sliding.as_mut() {
            *until += delta;
        }
    }

    /// Leaves knockbacks and other non-player movements untouched.
    pub fn set_speed(&mut self, ctx: &mut StateContext<'_>, speed: f32) {
        match ctx.body.movement.as_mut() {
            Some(movement) if movement.kind() == MovementKind::Player => movement.speed = speed,
            _ => {}
        }
    }

    /// Follow the arrows. On ice the last direction is kept for a moment
    /// after they are released.
    pub fn update(&mut self, ctx: &mut StateContext<'_>, slides_on_ice: bool) {
        let wanted = ctx.commands.wanted_direction8();
        let on_ice = slides_on_ice && ctx.body.ground_below == Ground::Ice;

        let direction8 = match (wanted, self.wanted_direction8) {
            (Some(direction8), _) => {
                self.sliding = None;
                Some(direction8)
            }
            (None, Some(previous)) if on_ice => {
                let until = ctx.now + ctx.config().ice_slide_ms;
                self.sliding = Some((previous, until));
                Some(previous)
            }
            (None, _) => match self.sliding {
                Some((direction8, until)) if on_ice && ctx.now < until => Some(direction8),
                _ => {
                    self.sliding = None;
                    None
                }
            },
        };
        self.wanted_direction8 = wanted;

        match ctx.body.movement.as_mut() {
            Some(movement) if movement.kind() == MovementKind::Player => {
                movement.set_direction8(direction8)
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use glam::Vec2;

    use super::*;
    use crate::components::{EntityKind, Equipment, GroundMap};
    use crate::config::HeroConfig;
    use crate::engine::Commands;
    use crate::hero::HeroBody;
    use crate::map::Map;

    fn setup() -> (Map, HeroBody) {
        let mut map = Map::new("field", GroundMap::new(8, 8, 16.0));
        let hero = map.spawn(EntityKind::Hero, Vec2::ZERO, Vec2::splat(16.0));
        let body = HeroBody::new(hero, Vec2::ZERO, Equipment::default(), HeroConfig::default());
        (map, body)
    }

    #[test]
    fn speed_changes_skip_knockbacks() {
        let (mut map, mut body) = setup();
        body.movement = Some(Movement::straight(0.0, 120.0, 24.0));
        let commands = Commands::new();
        let mut requests = VecDeque::new();
        let mut ctx = StateContext::new(&mut body, &mut map, &commands, 0, None, &mut requests);
        let mut movement = PlayerMovement::new();

        movement.set_speed(&mut ctx, 40.0);
        assert_eq!(ctx.body.movement.as_ref().map(|m| m.speed), Some(120.0));

        movement.start(&mut ctx, 88.0);
        movement.set_speed(&mut ctx, 40.0);
        assert_eq!(ctx.body.movement.as_ref().map(|m| m.speed), Some(40.0));
    }

    #[test]
    fn delay_pushes_the_slide_deadline() {
        let mut movement = PlayerMovement::new();
        movement.delay(100);
        assert_eq!(movement.sliding, None);

        movement.sliding = Some((0, 500));
        movement.delay(250);
        assert_eq!(movement.sliding, Some((0, 750)));
    }
}

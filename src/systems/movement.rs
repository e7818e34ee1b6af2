use glam::Vec2;

use crate::components::{MovementKind, Rect};
use crate::state::{State, StateContext};

/// Advance the hero's movement by `dt` ms, one pixel at a time.
///
/// Every step is checked against `Map::test_collision` with the current
/// state. Player movements slide along the free axis; the others stop on
/// the first obstacle.
pub fn movement_system(state: &mut dyn State, ctx: &mut StateContext<'_>, dt: u32) {
    let Some(movement) = ctx.body.movement.as_ref() else {
        return;
    };
    let kind = movement.kind();
    let delta = movement.displacement(dt);

    if delta != Vec2::ZERO {
        let steps = delta.abs().max_element().ceil().max(1.0) as usize;
        let step = delta / steps as f32;
        let size = ctx.body.size;
        let collides = |position: Vec2, ctx: &StateContext<'_>| {
            ctx.map
                .test_collision(&*state, Rect::new(position, size), ctx.body.entity)
        };

        let start = ctx.body.position;
        let mut position = start;
        let mut travelled = 0.0;
        let mut blocked = false;

        for _ in 0..steps {
            let candidate = position + step;
            if !collides(candidate, &*ctx) {
                position = candidate;
                travelled += step.length();
                continue;
            }
            if kind == MovementKind::Player {
                let along_x = position + Vec2::new(step.x, 0.0);
                let along_y = position + Vec2::new(0.0, step.y);
                if step.x != 0.0 && !collides(along_x, &*ctx) {
                    position = along_x;
                    travelled += step.x.abs();
                    continue;
                }
                if step.y != 0.0 && !collides(along_y, &*ctx) {
                    position = along_y;
                    travelled += step.y.abs();
                    continue;
                }
            }
            blocked = true;
            break;
        }

        if let Some(movement) = ctx.body.movement.as_mut() {
            movement.notify_moved(travelled);
        }
        if position != start {
            ctx.body.position = position;
            ctx.map.set_position(ctx.body.entity, position);
            state.notify_position_changed(ctx);
        }
        if blocked {
            if let Some(movement) = ctx.body.movement.as_mut() {
                movement.notify_obstacle_reached();
            }
            state.notify_obstacle_reached(ctx);
        }
    }

    // The hooks above may have replaced or cleared the movement.
    if ctx
        .body
        .movement
        .as_ref()
        .is_some_and(|movement| movement.is_finished())
    {
        state.notify_movement_finished(ctx);
    }
}

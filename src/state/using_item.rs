use crate::components::{Item, ItemKind};
use crate::fsm::StateCore;

use super::{Attacker, FreeState, State, StateContext};

/// The hero uses an equipment item for the item's use duration.
pub struct UsingItemState {
    core: StateCore,
    item: Item,
    end_date: u32,
}

impl UsingItemState {
    pub fn new(item: Item) -> Self {
        Self {
            core: StateCore::new("using_item"),
            item,
            end_date: 0,
        }
    }
}

impl State for UsingItemState {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn start(&mut self, ctx: &mut StateContext<'_>, _previous: Option<&dyn State>) {
        ctx.body.stop_movement();
        let duration = match self.item.kind {
            ItemKind::Tool { use_ms } => use_ms,
            ItemKind::RunningBoots => 0,
        };
        self.end_date = ctx.now + duration;
        ctx.body.set_animation("using_item", ctx.now, Some(duration));
        tracing::debug!(item = %self.item.name, duration, "using item");
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) {
        if !self.is_suspended() && ctx.now >= self.end_date {
            ctx.set_state(FreeState::new());
        }
    }

    fn set_suspended(&mut self, ctx: &mut StateContext<'_>, suspended: bool) {
        if self.core.set_suspended(suspended, ctx.now) && !suspended {
            let delta = self.core.suspended_duration(ctx.now);
            self.end_date += delta;
            ctx.body.delay_animation(delta);
        }
    }

    fn is_direction_locked(&self) -> bool {
        true
    }

    fn get_can_be_hurt(&self, _attacker: Attacker) -> bool {
        true
    }

    fn is_using_item(&self) -> bool {
        true
    }

    fn get_current_item(&self) -> &Item {
        &self.item
    }
}

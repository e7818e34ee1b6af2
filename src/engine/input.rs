use std::collections::HashSet;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Game commands delivered to the hero, independent of the physical input
/// mapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    Action,
    Attack,
    #[strum(serialize = "item_1")]
    Item1,
    #[strum(serialize = "item_2")]
    Item2,
    Pause,
    Right,
    Up,
    Left,
    Down,
}

impl Command {
    /// Direction4 of an arrow command (0 right, 1 up, 2 left, 3 down).
    pub fn direction4(self) -> Option<u8> {
        match self {
            Self::Right => Some(0),
            Self::Up => Some(1),
            Self::Left => Some(2),
            Self::Down => Some(3),
            _ => None,
        }
    }

    pub fn from_direction4(direction4: u8) -> Self {
        match direction4 % 4 {
            0 => Self::Right,
            1 => Self::Up,
            2 => Self::Left,
            _ => Self::Down,
        }
    }

    /// Item slot (1 or 2) of an item command.
    pub fn item_slot(self) -> Option<u8> {
        match self {
            Self::Item1 => Some(1),
            Self::Item2 => Some(2),
            _ => None,
        }
    }

    pub fn from_item_slot(slot: u8) -> Option<Self> {
        match slot {
            1 => Some(Self::Item1),
            2 => Some(Self::Item2),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandEvent {
    Pressed(Command),
    Released(Command),
}

/// Held commands plus the press/release events of the current frame.
#[derive(Debug, Default)]
pub struct Commands {
    held: HashSet<Command>,
    pub events: Vec<CommandEvent>,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, command: Command) {
        if self.held.insert(command) {
            self.events.push(CommandEvent::Pressed(command));
        }
    }

    pub fn release(&mut self, command: Command) {
        if self.held.remove(&command) {
            self.events.push(CommandEvent::Released(command));
        }
    }

    pub fn is_command_pressed(&self, command: Command) -> bool {
        self.held.contains(&command)
    }

    pub fn take_events(&mut self) -> Vec<CommandEvent> {
        std::mem::take(&mut self.events)
    }

    /// Direction8 wanted by the held arrows, or `None` when they cancel out
    /// or none is held.
    pub fn wanted_direction8(&self) -> Option<u8> {
        let right = self.is_command_pressed(Command::Right);
        let left = self.is_command_pressed(Command::Left);
        let up = self.is_command_pressed(Command::Up);
        let down = self.is_command_pressed(Command::Down);

        let horizontal = match (right, left) {
            (true, false) => 1,
            (false, true) => -1,
            _ => 0,
        };
        let vertical = match (up, down) {
            (true, false) => 1,
            (false, true) => -1,
            _ => 0,
        };

        match (horizontal, vertical) {
            (1, 0) => Some(0),
            (1, 1) => Some(1),
            (0, 1) => Some(2),
            (-1, 1) => Some(3),
            (-1, 0) => Some(4),
            (-1, -1) => Some(5),
            (0, -1) => Some(6),
            (1, -1) => Some(7),
            _ => None,
        }
    }
}

pub mod input;
pub mod time;

pub use input::{Command, CommandEvent, Commands};
pub use time::FrameTimer;

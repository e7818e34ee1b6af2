//! Hero state machine for a 2D action-RPG: the capability-query state
//! interface, the concrete hero states, the map they collide with and the
//! per-frame pipeline driving them.

pub mod camera;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod hero;
pub mod map;
pub mod scene;
pub mod state;
pub mod systems;

pub use error::{Error, Result};

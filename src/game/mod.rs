//! Core game logic module for Snake
//!
//! This module contains all the game rules and timing without any I/O or
//! rendering dependencies. Presentation is reached only through [`Platform`].

pub mod action;
pub mod config;
pub mod engine;
pub mod game_loop;
pub mod state;
pub mod timing;

// Re-export commonly used types
pub use action::{Axis, Command, Direction, SoundEvent};
pub use config::{ConfigError, GameConfig, MAX_BOARD_CELLS};
pub use engine::{GameEngine, StepInfo};
pub use game_loop::{GameLoop, LoopControl, Platform};
pub use state::{Collision, GameState, Phase, Position, Snake};
pub use timing::TickScheduler;

//! Arcade Snake - the classic grid Snake game in the terminal
//!
//! This library provides:
//! - Core game rules and fixed-rate timing (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;

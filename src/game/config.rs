use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::action::Direction;
use super::state::Position;

/// Largest board accepted, in cells
pub const MAX_BOARD_CELLS: usize = 1 << 20;

/// Reasons a configuration cannot be played
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must be at least 1x1 cells, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },

    #[error("board of {width}x{height} cells exceeds the {max} cell limit")]
    BoardTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error("cell_size must be at least 1")]
    ZeroCellSize,

    #[error("tick_interval_ms must be at least 1")]
    ZeroTickInterval,

    #[error("target_fps must be at least 1")]
    ZeroFrameRate,

    #[error("start cell ({x}, {y}) lies outside the {width}x{height} board")]
    StartOutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the board in cells
    pub board_width: usize,
    /// Height of the board in cells
    pub board_height: usize,
    /// Terminal columns used to draw one cell
    pub cell_size: u16,
    /// Time between two simulation steps
    pub tick_interval_ms: u64,
    /// Frames drawn per second
    pub target_fps: u32,
    /// Cell the snake's head starts on
    pub start: Position,
    /// Direction at start; `None` keeps the snake idle until the first move
    pub initial_direction: Option<Direction>,
    /// Seed for apple placement; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Ring the terminal bell on eat/die
    pub sound: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 30,
            board_height: 21,
            cell_size: 2,
            tick_interval_ms: 100,
            target_fps: 60,
            start: Position::new(1, 1),
            initial_direction: None,
            seed: None,
            sound: true,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom board size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            board_width: width,
            board_height: height,
            ..Default::default()
        }
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Maximum length the snake can reach: one segment per cell
    pub fn total_cells(&self) -> usize {
        self.board_width.saturating_mul(self.board_height)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }

    /// Check that the board, timings and start cell describe a playable game
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width == 0 || self.board_height == 0 {
            return Err(ConfigError::EmptyBoard {
                width: self.board_width,
                height: self.board_height,
            });
        }

        // Also keeps each side well inside i32 grid coordinates
        let too_large = match self.board_width.checked_mul(self.board_height) {
            Some(cells) => cells > MAX_BOARD_CELLS,
            None => true,
        };
        if too_large {
            return Err(ConfigError::BoardTooLarge {
                width: self.board_width,
                height: self.board_height,
                max: MAX_BOARD_CELLS,
            });
        }

        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        if self.target_fps == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }

        let Position { x, y } = self.start;
        if x < 0 || y < 0 || x >= self.board_width as i32 || y >= self.board_height as i32 {
            return Err(ConfigError::StartOutOfBounds {
                x,
                y,
                width: self.board_width,
                height: self.board_height,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.board_width, 30);
        assert_eq!(config.board_height, 21);
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.start, Position::new(1, 1));
        assert_eq!(config.initial_direction, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.board_width, 15);
        assert_eq!(config.board_height, 12);
        assert_eq!(config.total_cells(), 180);
    }

    #[test]
    fn test_validation_empty_board() {
        let config = GameConfig::new(0, 10);
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyBoard {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn test_validation_board_too_large() {
        let config = GameConfig::new(1_000_000, 1_000_000);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardTooLarge {
                width: 1_000_000,
                height: 1_000_000,
                ..
            })
        ));

        // Overflowing product
        let config = GameConfig::new(usize::MAX, 2);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardTooLarge { .. })
        ));
        assert_eq!(config.total_cells(), usize::MAX);

        // A single side past i32 even when the other is tiny
        let mut config = GameConfig::new(i32::MAX as usize + 1, 1);
        config.start = Position::new(0, 0);
        assert!(config.validate().is_err());

        let config = GameConfig::new(1024, 1024);
        assert_eq!(config.total_cells(), MAX_BOARD_CELLS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_timings() {
        let mut config = GameConfig::default();
        config.tick_interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickInterval));

        let mut config = GameConfig::default();
        config.target_fps = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroFrameRate));

        let mut config = GameConfig::default();
        config.cell_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroCellSize));
    }

    #[test]
    fn test_validation_start_outside_board() {
        let mut config = GameConfig::small();
        config.start = Position::new(10, 3);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartOutOfBounds { x: 10, y: 3, .. })
        ));

        config.start = Position::new(9, 9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "board_width": 12, "initial_direction": "right", "seed": 7 }}"#
        )
        .unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.board_width, 12);
        assert_eq!(config.board_height, 21);
        assert_eq!(config.initial_direction, Some(Direction::Right));
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tick_interval_ms": 0 }}"#).unwrap();

        let err = GameConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("tick_interval_ms"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = GameConfig::load(&dir.path().join("missing.json"));
        assert!(result.is_err());
    }
}

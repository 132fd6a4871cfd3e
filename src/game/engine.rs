use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{
    action::Direction,
    config::{ConfigError, GameConfig},
    state::{Collision, GameState, Phase, Position, Snake},
};

/// Information about a simulation step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate the apple this step
    pub ate_apple: bool,
    /// Collision classification after the move
    pub collision: Collision,
}

/// The game engine that applies the movement, growth and collision rules
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine, rejecting configurations that cannot be played
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self { config, rng })
    }

    /// Build the opening position: a one-cell snake on the start cell
    pub fn reset(&mut self) -> GameState {
        let snake = Snake::new(
            self.config.start,
            self.config.initial_direction,
            self.config.total_cells(),
        );
        let apple = self.place_apple(snake.head());

        info!(
            width = self.config.board_width,
            height = self.config.board_height,
            "new round"
        );

        GameState::new(snake, apple, self.config.board_width, self.config.board_height)
    }

    /// Execute one tick: resolve the latched direction, move, eat, then check
    /// for collisions. A finished game is left untouched.
    pub fn step(&mut self, state: &mut GameState, latched: Option<Direction>) -> StepInfo {
        if state.is_game_over() {
            return StepInfo {
                ate_apple: false,
                collision: state.check_collision(),
            };
        }

        if let Some(direction) = latched {
            if state.snake.set_direction(direction) {
                debug!(?direction, "direction changed");
            }
        }

        state.snake.advance();

        let ate_apple = state.snake.head() == state.apple;
        if ate_apple {
            state.grow_and_score();
            state.apple = self.place_apple(state.snake.head());
            debug!(score = state.score, length = state.snake.len(), "apple eaten");
        }

        let collision = state.check_collision();
        if collision.is_fatal() {
            state.phase = Phase::GameOver;
            info!(
                ?collision,
                score = state.score,
                elapsed = state.elapsed,
                "game over"
            );
        }

        StepInfo {
            ate_apple,
            collision,
        }
    }

    /// Pick a random cell for the apple, re-rolling while it would land on the
    /// head. The rest of the body is not avoided.
    fn place_apple(&mut self, head: Position) -> Position {
        let width = self.config.board_width;
        let height = self.config.board_height;

        loop {
            let x = self.rng.gen_range(0..width) as i32;
            let y = self.rng.gen_range(0..height) as i32;
            let pos = Position::new(x, y);

            if pos != head || width * height <= 1 {
                return pos;
            }
        }
    }
}

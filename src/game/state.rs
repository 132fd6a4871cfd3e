use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A cell on the game board, in grid units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The player's snake
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement, `None` while idle
    pub velocity: Option<Direction>,
    max_len: usize,
}

impl Snake {
    /// Create a one-cell snake. `max_len` bounds growth (the board's cell count).
    pub fn new(head: Position, velocity: Option<Direction>, max_len: usize) -> Self {
        Self {
            body: vec![head],
            velocity,
            max_len: max_len.max(1),
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Request a new direction. Turns onto the current axis of motion are
    /// rejected, so the snake can never reverse into its own neck.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        match self.velocity {
            Some(current) if current.axis() == requested.axis() => false,
            _ => {
                self.velocity = Some(requested);
                true
            }
        }
    }

    /// Shift every segment onto its predecessor, then step the head one cell.
    /// A snake without velocity stays where it is.
    pub fn advance(&mut self) {
        let Some(direction) = self.velocity else {
            return;
        };

        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }
        self.body[0] = self.body[0].moved_in_direction(direction);
    }

    /// Append a copy of the tail so the snake grows without a gap.
    /// Returns false once the snake already covers the whole board.
    pub fn grow(&mut self) -> bool {
        if self.body.len() >= self.max_len {
            return false;
        }
        let tail = self.tail();
        self.body.push(tail);
        true
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Outcome of a collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Alive,
    HitWall,
    HitSelf,
}

impl Collision {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Collision::Alive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub apple: Position,
    pub board_width: usize,
    pub board_height: usize,
    pub score: u32,
    /// Seconds played in this round, frozen once the game is over
    pub elapsed: f32,
    pub phase: Phase,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, apple: Position, board_width: usize, board_height: usize) -> Self {
        Self {
            snake,
            apple,
            board_width,
            board_height,
            score: 0,
            elapsed: 0.0,
            phase: Phase::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Check if a position is within the board bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let width = i32::try_from(self.board_width).unwrap_or(i32::MAX);
        let height = i32::try_from(self.board_height).unwrap_or(i32::MAX);
        pos.x >= 0 && pos.x < width && pos.y >= 0 && pos.y < height
    }

    /// Classify the head's current cell. Pure: repeated calls agree until the
    /// snake moves again.
    pub fn check_collision(&self) -> Collision {
        let head = self.snake.head();

        if !self.is_in_bounds(head) {
            return Collision::HitWall;
        }

        // A snake of two cells cannot fold onto itself
        if self.snake.len() > 2 && self.snake.body_segments().contains(&head) {
            return Collision::HitSelf;
        }

        Collision::Alive
    }

    /// The head is on the apple: lengthen the snake and count the point
    pub fn grow_and_score(&mut self) {
        self.snake.grow();
        self.score += 1;
    }

    /// Add one frame's worth of playtime while the round is still running
    pub fn add_playtime(&mut self, dt: f32) {
        if self.is_running() {
            self.elapsed += dt;
        }
    }
}

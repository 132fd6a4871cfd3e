//! Frame-driven loop that ties the core rules to a presentation layer.
//!
//! Every frame runs the same strictly ordered phases: sample input, advance
//! the simulation if a tick is due, then draw. Input is read every frame but a
//! direction change is only latched here and applied on the next tick; later
//! presses in the same tick window overwrite earlier ones.

use anyhow::Result;
use tracing::info;

use super::{
    action::{Command, Direction, SoundEvent},
    config::{ConfigError, GameConfig},
    engine::{GameEngine, StepInfo},
    state::GameState,
    timing::TickScheduler,
};
use crate::metrics::GameMetrics;

/// Capabilities the loop needs from the window/terminal it runs in
pub trait Platform {
    /// Commands received since the previous frame
    fn poll_input(&mut self) -> Vec<Command>;

    /// Seconds elapsed since the previous frame
    fn elapsed_frame_time(&mut self) -> f32;

    fn draw_frame(&mut self, state: &GameState, metrics: &GameMetrics) -> Result<()>;

    fn play_sound(&mut self, event: SoundEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

pub struct GameLoop<P: Platform> {
    engine: GameEngine,
    state: GameState,
    scheduler: TickScheduler,
    pending_direction: Option<Direction>,
    metrics: GameMetrics,
    platform: P,
}

impl<P: Platform> GameLoop<P> {
    pub fn new(config: GameConfig, platform: P) -> Result<Self, ConfigError> {
        let scheduler = TickScheduler::new(config.tick_interval());
        let mut engine = GameEngine::new(config)?;
        let state = engine.reset();

        Ok(Self {
            engine,
            state,
            scheduler,
            pending_direction: None,
            metrics: GameMetrics::new(),
            platform,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Run frames until the platform asks to quit
    pub fn run(&mut self) -> Result<()> {
        while self.run_frame()? == LoopControl::Continue {}
        Ok(())
    }

    /// One rendering frame: input, conditional tick, draw
    pub fn run_frame(&mut self) -> Result<LoopControl> {
        let was_over = self.state.is_game_over();
        for command in self.platform.poll_input() {
            if self.handle_command(command) == LoopControl::Quit {
                info!(score = self.state.score, "quit requested");
                return Ok(LoopControl::Quit);
            }
        }

        // A fresh round starts at zero on the frame that restarted it
        let dt = self.platform.elapsed_frame_time();
        let restarted = was_over && self.state.is_running();
        if self.state.is_running() && !restarted {
            self.state.add_playtime(dt);
            if self.scheduler.accumulate(dt) {
                self.tick();
            }
        }

        self.platform.draw_frame(&self.state, &self.metrics)?;
        Ok(LoopControl::Continue)
    }

    fn handle_command(&mut self, command: Command) -> LoopControl {
        match command {
            Command::Move(direction) => {
                if self.state.is_running() {
                    self.pending_direction = Some(direction);
                }
            }
            Command::Restart => {
                if self.state.is_game_over() {
                    self.restart();
                }
            }
            Command::Quit => return LoopControl::Quit,
        }

        LoopControl::Continue
    }

    fn tick(&mut self) {
        let latched = self.pending_direction.take();
        let StepInfo {
            ate_apple,
            collision,
        } = self.engine.step(&mut self.state, latched);

        if ate_apple {
            self.platform.play_sound(SoundEvent::Eat);
        }

        if collision.is_fatal() {
            self.platform.play_sound(SoundEvent::Die);
            self.metrics.on_game_over(self.state.score, self.state.elapsed);
        }
    }

    fn restart(&mut self) {
        self.state = self.engine.reset();
        self.scheduler.reset();
        self.pending_direction = None;
        info!(games_played = self.metrics.games_played, "restart");
    }
}

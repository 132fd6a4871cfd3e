use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io::{Stderr, Write, stderr};
use std::time::Instant;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::game::{Command, GameConfig, GameLoop, GameState, LoopControl, Platform, SoundEvent};
use crate::input::InputHandler;
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Terminal implementation of the loop's platform: queued key presses in,
/// ratatui frames and the terminal bell out
pub struct TerminalPlatform<B: Backend> {
    terminal: Terminal<B>,
    renderer: Renderer,
    input_handler: InputHandler,
    queued: Vec<Command>,
    last_frame: Instant,
    sound: bool,
}

impl<B: Backend> TerminalPlatform<B> {
    pub fn new(terminal: Terminal<B>, config: &GameConfig) -> Self {
        Self {
            terminal,
            renderer: Renderer::new(config.cell_size),
            input_handler: InputHandler::new(),
            queued: Vec::new(),
            last_frame: Instant::now(),
            sound: config.sound,
        }
    }

    /// Queue the command for a key press; everything else is ignored
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            if let Some(command) = self.input_handler.handle_key_event(key) {
                self.queued.push(command);
            }
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B: Backend> Platform for TerminalPlatform<B> {
    fn poll_input(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.queued)
    }

    fn elapsed_frame_time(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame);
        self.last_frame = now;
        dt.as_secs_f32()
    }

    fn draw_frame(&mut self, state: &GameState, metrics: &GameMetrics) -> Result<()> {
        let renderer = &self.renderer;
        self.terminal
            .draw(|frame| renderer.render(frame, state, metrics))
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn play_sound(&mut self, event: SoundEvent) {
        debug!(?event, "sound");
        if !self.sound {
            return;
        }

        let mut out = stderr();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            warn!(?event, error = %e, "terminal bell failed");
        }
    }
}

pub struct HumanMode {
    config: GameConfig,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;

        // Everything after raw mode is entered must be undone, even on failure
        let result = self.run_in_raw_mode().await;
        let cleanup = Self::cleanup_terminal();

        first_error(result, cleanup)
    }

    async fn run_in_raw_mode(&self) -> Result<()> {
        // Setup terminal
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let platform = TerminalPlatform::new(terminal, &self.config);
        let mut game = GameLoop::new(self.config.clone(), platform)
            .context("Invalid game configuration")?;
        info!(
            tick_ms = self.config.tick_interval_ms,
            fps = self.config.target_fps,
            "starting game"
        );

        self.run_game_loop(&mut game).await
    }

    async fn run_game_loop(
        &self,
        game: &mut GameLoop<TerminalPlatform<CrosstermBackend<Stderr>>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut frame_timer = interval(self.config.frame_interval());
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Queue terminal events for the next frame
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => game.platform_mut().handle_event(event),
                        Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                        None => break,
                    }
                }

                // Input, tick and draw
                _ = frame_timer.tick() => {
                    if game.run_frame()? == LoopControl::Quit {
                        break;
                    }
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Leave raw mode and the alternate screen, attempting both steps
    fn cleanup_terminal() -> Result<()> {
        let raw = disable_raw_mode().context("Failed to disable raw mode");
        let screen =
            execute!(stderr(), LeaveAlternateScreen, Show).context("Failed to leave alternate screen");
        first_error(raw, screen)
    }
}

/// Combine two outcomes, keeping the earlier error if both failed
fn first_error(first: Result<()>, second: Result<()>) -> Result<()> {
    match (first, second) {
        (Err(e), Err(later)) => {
            warn!(error = %later, "suppressed error after earlier failure");
            Err(e)
        }
        (first, second) => first.and(second),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn test_platform() -> TerminalPlatform<TestBackend> {
        let mut config = GameConfig::default();
        config.sound = false;
        let terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        TerminalPlatform::new(terminal, &config)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_first_error_keeps_loop_error() {
        let both = first_error(
            Err(anyhow::anyhow!("draw failed")),
            Err(anyhow::anyhow!("cleanup failed")),
        );
        assert_eq!(both.unwrap_err().to_string(), "draw failed");

        let cleanup_only = first_error(Ok(()), Err(anyhow::anyhow!("cleanup failed")));
        assert_eq!(cleanup_only.unwrap_err().to_string(), "cleanup failed");

        let run_only = first_error(Err(anyhow::anyhow!("draw failed")), Ok(()));
        assert_eq!(run_only.unwrap_err().to_string(), "draw failed");

        assert!(first_error(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn test_key_presses_are_queued_in_order() {
        let mut platform = test_platform();
        platform.handle_event(key(KeyCode::Up));
        platform.handle_event(key(KeyCode::Char('x')));
        platform.handle_event(key(KeyCode::Char('r')));

        assert_eq!(
            platform.poll_input(),
            vec![Command::Move(Direction::Up), Command::Restart]
        );
        assert!(platform.poll_input().is_empty());
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut platform = test_platform();
        let release = KeyEvent::new_with_kind(
            KeyCode::Left,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        platform.handle_event(Event::Key(release));
        platform.handle_event(Event::FocusLost);

        assert!(platform.poll_input().is_empty());
    }

    #[test]
    fn test_frame_time_is_measured_between_calls() {
        let mut platform = test_platform();
        platform.elapsed_frame_time();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let dt = platform.elapsed_frame_time();
        assert!(dt >= 0.02);
    }

    #[test]
    fn test_game_loop_draws_to_terminal() {
        let mut config = GameConfig::default();
        config.sound = false;
        config.seed = Some(3);
        let mut game = GameLoop::new(config, test_platform()).unwrap();

        game.platform_mut().handle_event(key(KeyCode::Char('d')));
        assert_eq!(game.run_frame().unwrap(), LoopControl::Continue);
        assert!(
            game.pending_direction() == Some(Direction::Right)
                || game.state().snake.velocity == Some(Direction::Right)
        );

        let screen: String = game
            .platform()
            .terminal()
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Score: "));
        assert!(screen.contains(" Snake "));

        game.platform_mut().handle_event(key(KeyCode::Esc));
        assert_eq!(game.run_frame().unwrap(), LoopControl::Quit);
    }
}

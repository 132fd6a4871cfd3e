use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{GameState, Position};
use crate::metrics::{GameMetrics, format_time};

pub struct Renderer {
    cell_size: usize,
}

impl Renderer {
    /// `cell_size` is the number of terminal columns one board cell occupies
    pub fn new(cell_size: u16) -> Self {
        Self {
            cell_size: cell_size.max(1) as usize,
        }
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, metrics), chunks[0]);

        let board_area = self.board_area(chunks[1], state);
        frame.render_widget(self.render_board(state), board_area);

        if state.is_game_over() {
            let popup = centered(chunks[1], 34, 10);
            frame.render_widget(Clear, popup);
            frame.render_widget(self.render_game_over(state, metrics), popup);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    /// Board rectangle including its border, centered and clipped to `area`
    fn board_area(&self, area: Rect, state: &GameState) -> Rect {
        let width = state
            .board_width
            .saturating_mul(self.cell_size)
            .saturating_add(2)
            .min(u16::MAX as usize) as u16;
        let height = state.board_height.saturating_add(2).min(u16::MAX as usize) as u16;
        centered(area, width, height)
    }

    fn cell(&self, glyph: &str, style: Style) -> Span<'static> {
        let mut text = String::with_capacity(glyph.len() + self.cell_size);
        text.push_str(glyph);
        text.push_str(&" ".repeat(self.cell_size - 1));
        Span::styled(text, style)
    }

    fn render_board(&self, state: &GameState) -> Paragraph<'static> {
        let head = state.snake.head();
        let mut lines = Vec::with_capacity(state.board_height);

        for y in 0..state.board_height {
            let mut spans = Vec::with_capacity(state.board_width);

            for x in 0..state.board_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == head {
                    self.cell(
                        "■",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.body.contains(&pos) {
                    self.cell("□", Style::default().fg(Color::Green))
                } else if pos == state.apple {
                    self.cell(
                        "●",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    self.cell(".", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(format_time(state.elapsed), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Games: ", label),
            Span::styled(metrics.games_played.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'static> {
        let bold_white = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(state.score.to_string(), bold_white),
            ]),
            Line::from(vec![
                Span::styled("Time: ", Style::default().fg(Color::Yellow)),
                Span::styled(format_time(state.elapsed), bold_white),
            ]),
            Line::from(vec![
                Span::styled("Longest: ", Style::default().fg(Color::Yellow)),
                Span::styled(format_time(metrics.longest_round), bold_white),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(2)
    }
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

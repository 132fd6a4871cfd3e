/// Statistics kept across rounds of one session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameMetrics {
    pub high_score: u32,
    pub games_played: u32,
    /// Longest single round, in seconds
    pub longest_round: f32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_game_over(&mut self, final_score: u32, elapsed: f32) {
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
        if elapsed > self.longest_round {
            self.longest_round = elapsed;
        }
    }
}

/// Format seconds of playtime as `MM:SS`
pub fn format_time(elapsed: f32) -> String {
    let total_secs = elapsed.max(0.0) as u64;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        assert_eq!(format_time(125.0), "02:05");
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.9), "00:59");
        assert_eq!(format_time(3661.0), "61:01");
    }

    #[test]
    fn test_high_score_tracking() {
        let mut metrics = GameMetrics::new();

        metrics.on_game_over(10, 30.0);
        assert_eq!(metrics.high_score, 10);
        assert_eq!(metrics.games_played, 1);

        metrics.on_game_over(5, 45.0);
        assert_eq!(metrics.high_score, 10); // Should not decrease
        assert_eq!(metrics.games_played, 2);
        assert_eq!(metrics.longest_round, 45.0);

        metrics.on_game_over(15, 12.0);
        assert_eq!(metrics.high_score, 15); // Should update
        assert_eq!(metrics.games_played, 3);
        assert_eq!(metrics.longest_round, 45.0);
    }
}

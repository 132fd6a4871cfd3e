use std::time::Duration;

/// Fixed-interval tick trigger fed with per-frame elapsed time.
///
/// When the accumulated time reaches the interval one tick fires and the
/// accumulator drops back to zero. Any excess is discarded, so a slow frame
/// never produces more than one tick and lag is never caught up.
#[derive(Debug, Clone, PartialEq)]
pub struct TickScheduler {
    interval: f32,
    accumulator: f32,
}

impl TickScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.as_secs_f32(),
            accumulator: 0.0,
        }
    }

    /// Add one frame's elapsed seconds; returns true when a tick is due
    pub fn accumulate(&mut self, dt: f32) -> bool {
        self.accumulator += dt;
        if self.accumulator >= self.interval {
            self.accumulator = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

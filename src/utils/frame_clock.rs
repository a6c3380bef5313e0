use std::time::{Duration, Instant};

/// Shortest window the frame-rate estimate is computed over.
///
/// Right after a reset the window holds one or two frames and the ratio
/// frames / elapsed is meaningless.
pub const MIN_SAMPLE: Duration = Duration::from_millis(100);

/// Result of one [`FrameClock::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Current frames-per-second estimate, if one exists yet.
    pub fps: Option<f32>,
    /// Set once per whole elapsed second with the rate of that second.
    pub report: Option<f32>,
}

/// Monotonic frame counter with a running frames-per-second estimate.
pub struct FrameClock {
    window_start: Instant,
    frame_count: u32,
    fps: Option<f32>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    #[must_use]
    pub fn starting_at(now: Instant) -> Self {
        Self {
            window_start: now,
            frame_count: 0,
            fps: None,
        }
    }

    pub fn tick(&mut self) -> FrameTick {
        self.tick_at(Instant::now())
    }

    /// Counts one frame finished at `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTick {
        self.frame_count += 1;
        let elapsed = now.saturating_duration_since(self.window_start);

        if elapsed >= MIN_SAMPLE {
            self.fps = Some(self.frame_count as f32 / elapsed.as_secs_f32());
        }

        let mut report = None;
        if elapsed.as_secs_f32() >= 1.0 {
            report = self.fps;
            self.frame_count = 0;
            self.window_start = now;
        }

        FrameTick {
            fps: self.fps,
            report,
        }
    }

    /// Latest frames-per-second estimate.
    #[must_use]
    pub fn fps(&self) -> Option<f32> {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_estimate_before_min_sample() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let tick = clock.tick_at(start + Duration::from_millis(10));
        assert_eq!(tick.fps, None);
        assert_eq!(tick.report, None);
    }

    #[test]
    fn estimate_after_min_sample() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        for i in 1..=20 {
            clock.tick_at(start + Duration::from_millis(10 * i));
        }
        // 20 frames in 200 ms
        let fps = clock.fps().unwrap();
        assert!((fps - 100.0).abs() < 0.01);
    }

    #[test]
    fn reports_once_per_second_and_resets() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let mut reports = Vec::new();
        for i in 1..=100 {
            let tick = clock.tick_at(start + Duration::from_millis(20 * i));
            if let Some(fps) = tick.report {
                reports.push(fps);
            }
        }
        // 2 seconds at 50 fps
        assert_eq!(reports.len(), 2);
        for fps in reports {
            assert!((fps - 50.0).abs() < 0.01);
        }
    }

    #[test]
    fn estimate_survives_reset() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let tick = clock.tick_at(start + Duration::from_secs(1));
        assert!(tick.report.is_some());
        let next = clock.tick_at(start + Duration::from_millis(1001));
        assert_eq!(next.fps, tick.fps);
        assert_eq!(next.report, None);
    }
}

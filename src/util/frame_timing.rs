use web_time::{Duration, Instant};

/// Smoothed frame rate with a periodic report.
pub struct FrameTiming {
    /// Last frame timestamp
    last_frame: Instant,
    /// Last time [`Self::report`] returned a value
    last_report: Instant,
    /// How often a report is due
    report_interval: Duration,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameTiming {
    /// Create a timer that reports at most once per `report_interval`.
    pub fn new(report_interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            last_report: now,
            report_interval,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Call after each presented frame.
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(frame_time);
    }

    fn record(&mut self, frame_time: f32) {
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }

    /// The smoothed FPS if a report is due, restarting the interval.
    pub fn report(&mut self) -> Option<f32> {
        let now = Instant::now();
        if now.duration_since(self.last_report) < self.report_interval {
            return None;
        }
        self.last_report = now;
        Some(self.smoothed_fps)
    }

    /// Current smoothed FPS.
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_average_converges() {
        let mut timing = FrameTiming::new(Duration::from_secs(1));
        for _ in 0..500 {
            timing.record(1.0 / 30.0);
        }
        assert!((timing.fps() - 30.0).abs() < 0.1);
    }

    #[test]
    fn zero_length_frames_are_ignored() {
        let mut timing = FrameTiming::new(Duration::from_secs(1));
        timing.record(0.0);
        assert_eq!(timing.fps(), 60.0);
    }

    #[test]
    fn zero_interval_always_reports() {
        let mut timing = FrameTiming::new(Duration::ZERO);
        assert!(timing.report().is_some());
        assert!(timing.report().is_some());
    }

    #[test]
    fn long_interval_waits() {
        let mut timing = FrameTiming::new(Duration::from_secs(3600));
        assert!(timing.report().is_none());
    }
}

use web_time::{Duration, Instant};

/// Interval between FPS reports.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Frame timing with smoothed FPS and a periodic report for the title bar.
pub struct FrameTiming {
    /// Last frame timestamp
    last_frame: Instant,
    /// Last time a report was emitted
    last_report: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    /// Frames since the last report
    frames: u32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Create a timer starting now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a timer whose first frame starts at `now`.
    pub fn starting_at(now: Instant) -> Self {
        Self {
            last_frame: now,
            last_report: now,
            smoothed_fps: 60.0, // Start with reasonable default
            smoothing: 0.05,    // 5% new value, 95% old value
            frames: 0,
        }
    }

    /// Call after rendering. Returns the smoothed FPS once per
    /// [`REPORT_INTERVAL`].
    pub fn end_frame(&mut self) -> Option<f32> {
        self.end_frame_at(Instant::now())
    }

    /// [`end_frame`](Self::end_frame) with an explicit timestamp.
    pub fn end_frame_at(&mut self, now: Instant) -> Option<f32> {
        let frame_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frames += 1;

        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }

        if now.duration_since(self.last_report) >= REPORT_INTERVAL {
            log::trace!(
                "{} frames in {:?}, {:.1} fps smoothed",
                self.frames,
                now.duration_since(self.last_report),
                self.smoothed_fps
            );
            self.last_report = now;
            self.frames = 0;
            Some(self.smoothed_fps)
        } else {
            None
        }
    }

    /// Get the current FPS (smoothed)
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_interval() {
        let start = Instant::now();
        let mut timing = FrameTiming::starting_at(start);
        let step = Duration::from_millis(10);

        let reports: Vec<_> = (1..=250)
            .filter_map(|i| timing.end_frame_at(start + step * i))
            .collect();
        assert_eq!(reports.len(), 2);
    }

    #[test]
    fn smoothed_fps_converges_to_frame_rate() {
        let start = Instant::now();
        let mut timing = FrameTiming::starting_at(start);
        for i in 1..=500 {
            let _ = timing.end_frame_at(start + Duration::from_millis(5) * i);
        }
        assert!((timing.fps() - 200.0).abs() < 1.0, "fps {}", timing.fps());
    }

    #[test]
    fn zero_length_frame_keeps_estimate() {
        let start = Instant::now();
        let mut timing = FrameTiming::starting_at(start);
        assert_eq!(timing.end_frame_at(start), None);
        assert!((timing.fps() - 60.0).abs() < f32::EPSILON);
    }
}

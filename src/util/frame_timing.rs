//! Frame pacing and smoothed FPS reporting for the viewer loop.

use web_time::{Duration, Instant};

/// Frame timing with FPS calculation and optional frame limiting.
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    /// Frames counted since the last report
    frames_since_report: u32,
    /// When FPS was last reported
    last_report: Instant,
}

impl FrameTiming {
    /// Interval between FPS log lines.
    const REPORT_INTERVAL: Duration = Duration::from_secs(5);

    /// Create a new frame timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };
        let now = Instant::now();

        Self {
            target_fps,
            min_frame_duration,
            last_frame: now,
            smoothed_fps: 60.0,
            smoothing: 0.05,
            frames_since_report: 0,
            last_report: now,
        }
    }

    /// Whether enough time has passed since the last frame to render again.
    #[must_use]
    pub fn should_render(&self, now: Instant) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        now.saturating_duration_since(self.last_frame)
            >= self.min_frame_duration
    }

    /// Record a rendered frame at `now`.
    pub fn end_frame(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frames_since_report += 1;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }

        if now.saturating_duration_since(self.last_report)
            >= Self::REPORT_INTERVAL
        {
            log::debug!(
                "{:.1} fps ({} frames)",
                self.smoothed_fps,
                self.frames_since_report
            );
            self.frames_since_report = 0;
            self.last_report = now;
        }
    }

    /// Current FPS (smoothed).
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

//! Frame counting for the window title and periodic stats.
//!
//! The animation is frame-locked: one tick per display refresh, no delta
//! time. [`FrameClock`] only measures how fast those ticks arrive.

use std::time::{Duration, Instant};

/// Counts frames and reports a frame rate once per interval.
#[derive(Debug)]
pub struct FrameClock {
    frame_count: u64,
    fps: f32,
    window_frames: u64,
    window_start: Instant,
    interval: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// A clock reporting once per second.
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(1))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            frame_count: 0,
            fps: 0.0,
            window_frames: 0,
            window_start: Instant::now(),
            interval,
        }
    }

    /// Record a frame. Returns `true` when a new FPS figure is available.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> bool {
        self.frame_count += 1;
        self.window_frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return false;
        }
        self.fps = self.window_frames as f32 / elapsed.as_secs_f32();
        self.window_frames = 0;
        self.window_start = now;
        true
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frame rate over the last completed interval.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_frames() {
        let mut clock = FrameClock::new();
        for _ in 0..5 {
            clock.tick();
        }
        assert_eq!(clock.frame(), 5);
    }

    #[test]
    fn test_reports_once_per_interval() {
        let mut clock = FrameClock::with_interval(Duration::from_secs(1));
        let start = clock.window_start;

        for i in 1..60 {
            assert!(!clock.tick_at(start + Duration::from_millis(i * 16)));
        }
        assert!(clock.tick_at(start + Duration::from_secs(1)));
        assert!((clock.fps() - 60.0).abs() < 0.01);

        // next window starts fresh
        assert!(!clock.tick_at(start + Duration::from_millis(1016)));
    }
}

//! Frame rate tracking reported through tracing

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

const WINDOW: Duration = Duration::from_secs(1);

/// Counts frames over a sliding one-second window
#[derive(Debug)]
pub struct FrameStats {
    frame_times: VecDeque<Instant>,
    last_frame: Instant,
    last_report: Instant,
    fps: f32,
    frame_time_ms: f32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameStats {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(120),
            last_frame: now,
            last_report: now,
            fps: 0.0,
            frame_time_ms: 0.0,
        }
    }

    /// Record a new frame, logging the rate about once per second
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        self.frame_time_ms = now.duration_since(self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;
        self.frame_times.push_back(now);

        while let Some(front) = self.frame_times.front() {
            if now.duration_since(*front) > WINDOW {
                self.frame_times.pop_front();
            } else {
                break;
            }
        }

        self.fps = self.frame_times.len() as f32;

        if now.duration_since(self.last_report) >= WINDOW {
            self.last_report = now;
            debug!(fps = self.fps, frame_time_ms = self.frame_time_ms, "Frame stats");
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Duration of the last frame in milliseconds
    pub fn frame_time_ms(&self) -> f32 {
        self.frame_time_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_counts_frames_in_last_second() {
        let start = Instant::now();
        let mut stats = FrameStats::starting_at(start);
        for i in 1..=90u64 {
            stats.tick_at(start + Duration::from_millis(i * 20));
        }
        // 1.8s of frames at 50 Hz, only the last second survives
        assert_relative_eq!(stats.fps(), 51.0);
        assert_relative_eq!(stats.frame_time_ms(), 20.0, epsilon = 1e-3);
    }

    #[test]
    fn test_starts_empty() {
        let stats = FrameStats::new();
        assert_relative_eq!(stats.fps(), 0.0);
    }
}

//! # Performance Metrics
//!
//! Frame timing for the visualizer loop and the formatted counters shown in
//! the stats panel.
//!
//! ## Usage
//!
//! ```rust
//! use particle_viz::performance::FrameTimer;
//!
//! let mut timer = FrameTimer::new();
//!
//! // In your main loop
//! timer.begin_frame();
//! // ... simulate and render ...
//! timer.end_frame();
//!
//! let fps = timer.fps();
//! # let _ = fps;
//! ```

pub mod stats;

pub use stats::{format_count, StatsSnapshot};

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling window of recent frame durations
#[derive(Debug, Clone)]
pub struct FrameTimer {
    /// Ring buffer of recent frame times for averaging
    frame_times: VecDeque<Duration>,
    /// Maximum number of frame times to keep for averaging
    max_samples: usize,
    /// Start time of the current frame
    frame_start: Option<Instant>,
}

impl FrameTimer {
    /// Timer keeping ~2 seconds of history at 60fps
    pub fn new() -> Self {
        Self::with_capacity(120)
    }

    pub fn with_capacity(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            frame_start: None,
        }
    }

    /// Mark the beginning of a frame
    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    /// Mark the end of a frame; ignored without a matching `begin_frame`
    pub fn end_frame(&mut self) {
        if let Some(start) = self.frame_start.take() {
            self.record(start.elapsed());
        }
    }

    /// Add a frame time sample
    pub fn record(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);
    }

    pub fn sample_count(&self) -> usize {
        self.frame_times.len()
    }

    pub fn average_frame_time(&self) -> Option<Duration> {
        if self.frame_times.is_empty() {
            return None;
        }
        let total: Duration = self.frame_times.iter().sum();
        Some(total / self.frame_times.len() as u32)
    }

    /// Frames per second from the average frame time, 0 with no samples
    pub fn fps(&self) -> f64 {
        match self.average_frame_time() {
            Some(avg) if avg > Duration::ZERO => 1.0 / avg.as_secs_f64(),
            _ => 0.0,
        }
    }

    pub fn min_frame_time(&self) -> Option<Duration> {
        self.frame_times.iter().min().copied()
    }

    pub fn max_frame_time(&self) -> Option<Duration> {
        self.frame_times.iter().max().copied()
    }

    /// Frame time history in milliseconds, oldest first
    pub fn frame_time_history(&self) -> Vec<f32> {
        self.frame_times
            .iter()
            .map(|duration| duration.as_secs_f32() * 1000.0)
            .collect()
    }

    /// Reset all history
    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.frame_start = None;
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_from_recorded_samples() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.fps(), 0.0);
        assert_eq!(timer.average_frame_time(), None);

        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(30));
        assert_eq!(timer.average_frame_time(), Some(Duration::from_millis(20)));
        assert!((timer.fps() - 50.0).abs() < 1e-9);
        assert_eq!(timer.min_frame_time(), Some(Duration::from_millis(10)));
        assert_eq!(timer.max_frame_time(), Some(Duration::from_millis(30)));
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let mut timer = FrameTimer::with_capacity(3);
        for ms in [100, 1, 2, 3] {
            timer.record(Duration::from_millis(ms));
        }
        assert_eq!(timer.sample_count(), 3);
        assert_eq!(timer.max_frame_time(), Some(Duration::from_millis(3)));
        let history = timer.frame_time_history();
        assert_eq!(history.len(), 3);
        assert!((history[0] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_end_without_begin_is_ignored() {
        let mut timer = FrameTimer::new();
        timer.end_frame();
        assert_eq!(timer.sample_count(), 0);

        timer.begin_frame();
        timer.end_frame();
        assert_eq!(timer.sample_count(), 1);

        timer.reset();
        assert_eq!(timer.sample_count(), 0);
    }
}

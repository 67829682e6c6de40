//! Frame timing.
//!
//! The simulation measures time in ticks, where one tick is 1/60 s. The
//! host converts real elapsed frame time into ticks so motion and aging do
//! not depend on the actual frame rate.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Simulation ticks per second.
pub const TICKS_PER_SECOND: f32 = 60.0;

/// Converts elapsed milliseconds to simulation ticks.
#[must_use]
pub fn ticks_from_millis(ms: f32) -> f32 {
    ms / 1000.0 * TICKS_PER_SECOND
}

/// Milliseconds one frame lasts at `fps`.
#[must_use]
pub fn frame_millis(fps: u32) -> f32 {
    1000.0 / fps.max(1) as f32
}

/// Measures wall-clock time between frames.
#[derive(Debug)]
pub struct FrameClock {
    /// Time of last frame start
    last_frame: Instant,
    /// Time budget per frame
    frame_budget: Duration,
    /// Largest delta reported, in milliseconds
    max_delta_ms: f32,
}

impl FrameClock {
    /// Creates a clock pacing frames at `target_fps`.
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        Self {
            last_frame: Instant::now(),
            frame_budget: Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1))),
            max_delta_ms: 250.0, // A stalled frame must not teleport particles
        }
    }

    /// Ticks elapsed since the previous call (or since creation).
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let ms = (now - self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;
        ticks_from_millis(ms.min(self.max_delta_ms))
    }

    /// Sleeps out whatever is left of the current frame's budget.
    pub fn sleep_remainder(&self) {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_budget {
            std::thread::sleep(self.frame_budget - elapsed);
        }
    }

    /// Restarts measurement from now.
    pub fn reset(&mut self) {
        self.last_frame = Instant::now();
    }
}

/// Rolling FPS counter.
#[derive(Debug)]
pub struct FpsCounter {
    /// Recent frame durations in seconds
    frame_times: VecDeque<f32>,
    /// Maximum samples for averaging
    max_samples: usize,
    /// Start of the frame being timed
    last_tick: Instant,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(120)
    }
}

impl FpsCounter {
    /// Create a counter averaging over `max_samples` frames.
    #[must_use]
    pub fn new(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples,
            last_tick: Instant::now(),
        }
    }

    /// Marks the end of a frame.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.record((now - self.last_tick).as_secs_f32());
        self.last_tick = now;
    }

    /// Records one frame duration in seconds.
    pub fn record(&mut self, seconds: f32) {
        self.frame_times.push_back(seconds);
        if self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }
    }

    /// Average FPS over the recorded window.
    #[must_use]
    pub fn fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let avg = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        if avg > 0.0 {
            1.0 / avg
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_from_millis() {
        assert!((ticks_from_millis(1000.0 / 60.0) - 1.0).abs() < 1e-5);
        assert!((ticks_from_millis(1000.0 / 30.0) - 2.0).abs() < 1e-5);
        assert!((ticks_from_millis(50.0) - 3.0).abs() < 1e-5);
        assert_eq!(ticks_from_millis(0.0), 0.0);
    }

    #[test]
    fn test_frame_millis() {
        assert!((frame_millis(60) - 16.666_666).abs() < 1e-3);
        assert!((frame_millis(0) - 1000.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_clock_clamps_long_frames() {
        let mut clock = FrameClock::new(60);
        std::thread::sleep(Duration::from_millis(300));
        let ticks = clock.tick();
        assert!(ticks <= ticks_from_millis(250.0) + 1e-3);
        assert!(ticks > 0.0);
    }

    #[test]
    fn test_clock_measures_elapsed() {
        let mut clock = FrameClock::new(60);
        std::thread::sleep(Duration::from_millis(20));
        let ticks = clock.tick();
        // At least 20ms = 1.2 ticks
        assert!(ticks >= 1.19, "ticks {ticks}");
    }

    #[test]
    fn test_fps_counter_average() {
        let mut counter = FpsCounter::new(4);
        assert_eq!(counter.fps(), 0.0);
        for _ in 0..10 {
            counter.record(0.02);
        }
        assert!((counter.fps() - 50.0).abs() < 0.01);
    }
}

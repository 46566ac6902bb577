//! Time management utilities

use std::time::Instant;

/// Duration of a single frame, in seconds
///
/// Passed to script update hooks and to the physics step.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Timestep(f32);

impl Timestep {
    /// Create a timestep from seconds
    pub const fn from_seconds(seconds: f32) -> Self {
        Self(seconds)
    }

    /// Create a timestep from milliseconds
    pub fn from_millis(millis: f32) -> Self {
        Self(millis / 1000.0)
    }

    /// Length of the step in seconds
    pub const fn as_seconds(self) -> f32 {
        self.0
    }

    /// Length of the step in milliseconds
    pub fn as_millis(self) -> f32 {
        self.0 * 1000.0
    }
}

impl From<f32> for Timestep {
    fn from(seconds: f32) -> Self {
        Self(seconds)
    }
}

/// Wall-clock frame timer for hosts driving the runtime
pub struct Timer {
    last_frame: Instant,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Measure the time since the previous tick
    pub fn tick(&mut self) -> Timestep {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.total_time += elapsed;
        self.frame_count += 1;
        Timestep(elapsed)
    }

    /// Seconds measured across every tick
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of ticks
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Ticks per second over the timer's lifetime
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestep_units() {
        let step = Timestep::from_millis(16.0);
        assert!((step.as_seconds() - 0.016).abs() < 1e-6);
        assert!((step.as_millis() - 16.0).abs() < 1e-4);
    }

    #[test]
    fn test_timer_counts_frames() {
        let mut timer = Timer::new();
        timer.tick();
        timer.tick();
        assert_eq!(timer.frame_count(), 2);
        assert!(timer.total_time() >= 0.0);
    }
}

//! Frame timing for the simulation loop.

use std::time::Duration;

/// Default simulation rate (steps per second).
pub const DEFAULT_FIXED_RATE_HZ: f64 = 60.0;

/// Tracks frame deltas and hands out fixed simulation steps.
///
/// The host reports each frame's length with [`FrameClock::advance`], then
/// drains steps with [`FrameClock::should_fixed_update`].
#[derive(Debug)]
pub struct FrameClock {
    /// Frame count since start.
    frame_count: u64,
    /// Fixed timestep for physics (default 60 Hz).
    fixed_timestep: Duration,
    /// Accumulated time for fixed updates.
    accumulator: Duration,
    /// Most fixed steps handed out for a single frame.
    max_steps_per_frame: u32,
    /// Fixed steps already handed out this frame.
    steps_this_frame: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new clock running at 60 Hz.
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / DEFAULT_FIXED_RATE_HZ),
            accumulator: Duration::ZERO,
            max_steps_per_frame: 5,
            steps_this_frame: 0,
        }
    }

    /// Create a clock with an explicit fixed timestep (seconds) and substep cap.
    pub fn with_timestep(fixed_dt: f32, max_steps_per_frame: u32) -> Self {
        let mut clock = Self::new();
        clock.fixed_timestep = Duration::from_secs_f32(fixed_dt.max(f32::EPSILON));
        clock.max_steps_per_frame = max_steps_per_frame.max(1);
        clock
    }

    /// Start a new frame that lasted `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.frame_count += 1;
        self.accumulator += delta;
        self.steps_this_frame = 0;
    }

    /// Check if a fixed update should run and consume the time.
    ///
    /// Once the per-frame cap is hit the remaining backlog is dropped so a
    /// long stall cannot snowball into ever longer frames.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator < self.fixed_timestep {
            return false;
        }
        if self.steps_this_frame >= self.max_steps_per_frame {
            log::debug!(
                "Dropping {:.3}s of simulation backlog after {} steps",
                self.accumulator.as_secs_f32(),
                self.steps_this_frame
            );
            self.accumulator = Duration::ZERO;
            return false;
        }
        self.accumulator -= self.fixed_timestep;
        self.steps_this_frame += 1;
        true
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Leftover time not yet consumed by fixed steps.
    pub fn accumulated(&self) -> Duration {
        self.accumulator
    }
}

//! Simulation clock
//!
//! Turns irregular frame callbacks into a capped delta-time and a count of
//! fixed-size simulation steps to run. The cap keeps one long gap (a
//! backgrounded tab, a debugger pause) from turning into a burst of catch-up
//! steps.

use crate::consts::{MAX_FRAME_MS, TICKS_PER_SEC};

/// Most simulation steps run for a single callback
pub const MAX_STEPS_PER_FRAME: u32 = 2;
/// Samples kept for the render-time average
pub const RENDER_SAMPLES: usize = 60;
/// Average render time below which the frame budget is considered met (ms)
pub const FRAME_BUDGET_MS: f64 = 16.67;

/// Result of one clock advance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// Capped elapsed time since the previous callback, in seconds
    pub delta_time: f32,
    /// Fixed-size simulation steps to run this callback
    pub steps: u32,
    /// Callbacks counted over the last completed one-second window
    pub fps: u32,
}

impl FrameTiming {
    pub fn should_step(&self) -> bool {
        self.steps > 0
    }
}

#[derive(Debug, Clone)]
pub struct SimClock {
    last_timestamp: f64,
    /// Unconsumed simulation time in seconds, in `[0, fixed_step)` between callbacks
    accumulator: f64,
    fixed_step: f64,
    fps: u32,
    frame_count: u32,
    fps_window_start: f64,
    render_times: Vec<f64>,
    render_index: usize,
}

impl SimClock {
    /// Create a clock whose first delta is measured from `start_ms`
    pub fn new(start_ms: f64) -> Self {
        Self {
            last_timestamp: start_ms,
            accumulator: 0.0,
            fixed_step: 1.0 / TICKS_PER_SEC as f64,
            fps: 0,
            frame_count: 0,
            fps_window_start: start_ms,
            render_times: Vec::with_capacity(RENDER_SAMPLES),
            render_index: 0,
        }
    }

    /// Advance to `timestamp_ms` (a monotonic millisecond timestamp)
    pub fn advance(&mut self, timestamp_ms: f64) -> FrameTiming {
        let raw = timestamp_ms - self.last_timestamp;
        if raw > MAX_FRAME_MS * 10.0 {
            log::warn!(
                "Frame gap of {:.1}ms capped to {}ms",
                raw,
                MAX_FRAME_MS
            );
        }
        let delta_ms = raw.clamp(0.0, MAX_FRAME_MS);
        self.last_timestamp = timestamp_ms;
        self.accumulator += delta_ms / 1000.0;

        self.frame_count += 1;
        if timestamp_ms - self.fps_window_start >= 1000.0 {
            self.fps = self.frame_count;
            self.frame_count = 0;
            self.fps_window_start = timestamp_ms;
        }

        let mut steps = 0;
        while self.accumulator >= self.fixed_step && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.fixed_step;
            steps += 1;
        }
        if self.accumulator >= self.fixed_step {
            log::debug!(
                "Dropping {:.2}ms of simulation backlog",
                self.accumulator * 1000.0
            );
            self.accumulator = 0.0;
        }

        FrameTiming {
            delta_time: (delta_ms / 1000.0) as f32,
            steps,
            fps: self.fps,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn fixed_step(&self) -> f64 {
        self.fixed_step
    }

    /// Record how long the last frame took to produce (ms)
    pub fn track_render_time(&mut self, render_ms: f64) {
        if self.render_times.len() < RENDER_SAMPLES {
            self.render_times.push(render_ms);
        } else {
            self.render_times[self.render_index] = render_ms;
        }
        self.render_index = (self.render_index + 1) % RENDER_SAMPLES;
    }

    /// Mean of the retained render-time samples (0 when empty)
    pub fn average_render_time(&self) -> f64 {
        if self.render_times.is_empty() {
            return 0.0;
        }
        self.render_times.iter().sum::<f64>() / self.render_times.len() as f64
    }

    pub fn is_performance_good(&self) -> bool {
        self.average_render_time() < FRAME_BUDGET_MS
    }
}

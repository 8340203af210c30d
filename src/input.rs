//! Flap input debouncing

/// Drops flaps that arrive too soon after the last accepted one.
///
/// Works on wall-clock milliseconds, independent of the simulation step.
#[derive(Debug, Clone)]
pub struct FlapGate {
    interval_ms: f64,
    last_accepted: Option<f64>,
}

impl Default for FlapGate {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl FlapGate {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_accepted: None,
        }
    }

    /// Returns true if a flap at `timestamp_ms` should go through
    pub fn accept(&mut self, timestamp_ms: f64) -> bool {
        if let Some(last) = self.last_accepted
            && timestamp_ms - last < self.interval_ms
        {
            return false;
        }
        self.last_accepted = Some(timestamp_ms);
        true
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

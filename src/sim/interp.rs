//! Render-side smoothing
//!
//! Nothing here feeds back into the simulation; these values only decide
//! where things are drawn.

/// Linear interpolation
#[inline]
pub fn lerp(start: f32, end: f32, factor: f32) -> f32 {
    start + (end - start) * factor
}

/// A value that follows a target with critically damped smoothing
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Damped {
    pub value: f32,
    pub velocity: f32,
}

impl Damped {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
        }
    }

    /// Move toward `target`, reaching it in roughly `smooth_time` seconds
    pub fn follow(&mut self, target: f32, smooth_time: f32, dt: f32) -> f32 {
        let (value, velocity) =
            smooth_damp(self.value, target, self.velocity, smooth_time, dt, f32::INFINITY);
        self.value = value;
        self.velocity = velocity;
        value
    }

    /// Jump straight to `value` (teleports such as a respawn)
    pub fn snap(&mut self, value: f32) {
        self.value = value;
        self.velocity = 0.0;
    }
}

/// Critically damped spring step. Returns the new `(value, velocity)`.
///
/// Never overshoots `target`; `max_speed` bounds how fast the value may move.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: f32,
    smooth_time: f32,
    dt: f32,
    max_speed: f32,
) -> (f32, f32) {
    if dt <= 0.0 {
        return (current, velocity);
    }
    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let max_change = max_speed * smooth_time;
    let change = (current - target).clamp(-max_change, max_change);
    let clamped_target = current - change;

    let temp = (velocity + omega * change) * dt;
    let mut new_velocity = (velocity - omega * temp) * exp;
    let mut output = clamped_target + (change + temp) * exp;

    // Overshoot guard
    if (target - current > 0.0) == (output > target) {
        output = target;
        new_velocity = (output - target) / dt;
    }

    (output, new_velocity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(4.0, 4.0, 0.9), 4.0);
    }

    #[test]
    fn test_smooth_damp_converges_without_overshoot() {
        let mut d = Damped::new(0.0);
        for _ in 0..240 {
            let v = d.follow(100.0, 0.1, 1.0 / 60.0);
            assert!(v <= 100.0);
        }
        assert!((d.value - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_smooth_damp_zero_dt_is_identity() {
        assert_eq!(smooth_damp(3.0, 9.0, 1.5, 0.1, 0.0, f32::INFINITY), (3.0, 1.5));
    }

    #[test]
    fn test_snap_clears_velocity() {
        let mut d = Damped::new(0.0);
        d.follow(50.0, 0.2, 1.0 / 60.0);
        d.snap(300.0);
        assert_eq!(d, Damped::new(300.0));
    }
}

//! Per-frame smoothing and range helpers shared by every controller.
//!
//! ## Conventions
//!
//! [`Rotator`] stores Euler angles in **degrees**:
//!
//! | Field   | Positive direction                          |
//! |---------|---------------------------------------------|
//! | `yaw`   | turning right (clockwise seen from above)   |
//! | `pitch` | looking up                                  |
//! | `roll`  | right side dipping down                     |
//!
//! At zero rotation the body faces Bevy's forward (−Z) with +X to its right
//! and +Y up.  [`Rotator::to_quat`] is the only place that converts to Bevy's
//! right-handed quaternion space.

use crate::constants::INTERP_SNAP_EPSILON_SQ;
use bevy::prelude::*;

// ── Scalars ───────────────────────────────────────────────────────────────────

/// Exponential smoothing of `current` toward `target`.
///
/// `current + (target - current) * clamp(dt * speed, 0, 1)`.
///
/// - `speed <= 0` snaps straight to `target`.
/// - The step never overshoots; when `dt * speed >= 1` the result is `target`.
/// - A remaining distance below [`INTERP_SNAP_EPSILON_SQ`] snaps to `target`.
pub fn finterp_to(current: f32, target: f32, dt: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }
    let dist = target - current;
    if dist * dist < INTERP_SNAP_EPSILON_SQ {
        return target;
    }
    let alpha = (dt * speed).clamp(0.0, 1.0);
    if alpha >= 1.0 {
        return target;
    }
    current + dist * alpha
}

/// Linearly map `value` from `input` to `output`, extrapolating outside `input`.
pub fn map_range_unclamped(value: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let span = input.1 - input.0;
    if span.abs() <= f32::EPSILON {
        return output.0;
    }
    let alpha = (value - input.0) / span;
    output.0 + alpha * (output.1 - output.0)
}

/// Linearly map `value` from `input` to `output`, saturating at both ends.
pub fn map_range_clamped(value: f32, input: (f32, f32), output: (f32, f32)) -> f32 {
    let span = input.1 - input.0;
    if span.abs() <= f32::EPSILON {
        return output.0;
    }
    let alpha = ((value - input.0) / span).clamp(0.0, 1.0);
    output.0 + alpha * (output.1 - output.0)
}

// ── Angles ────────────────────────────────────────────────────────────────────

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn normalize_axis(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Clamp an angle in degrees to the arc `[min, max]`, handling wrap-around.
///
/// Angles outside the arc snap to whichever end is closer on the circle, so
/// an input of 350° with an arc of `[-45, 85]` returns −10°, and any input
/// magnitude saturates instead of extrapolating.
pub fn clamp_angle(angle: f32, min: f32, max: f32) -> f32 {
    let max_delta = (max - min).clamp(0.0, 360.0) * 0.5;
    let center = normalize_axis(min + max_delta);
    let from_center = normalize_axis(angle - center);
    if from_center > max_delta {
        normalize_axis(center + max_delta)
    } else if from_center < -max_delta {
        normalize_axis(center - max_delta)
    } else {
        normalize_axis(angle)
    }
}

// ── Rotator ───────────────────────────────────────────────────────────────────

/// Euler orientation in degrees; see the module docs for axis conventions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotator {
    pub const ZERO: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Orientation that looks along `direction` with zero roll.
    ///
    /// A zero-length direction yields [`Rotator::ZERO`].
    pub fn from_direction(direction: Vec3) -> Self {
        if direction.length_squared() <= f32::EPSILON {
            return Self::ZERO;
        }
        let horizontal = Vec2::new(direction.x, direction.z).length();
        Self {
            pitch: direction.y.atan2(horizontal).to_degrees(),
            yaw: direction.x.atan2(-direction.z).to_degrees(),
            roll: 0.0,
        }
    }

    /// Copy with every axis wrapped into `(-180, 180]`.
    pub fn normalized(self) -> Self {
        Self {
            pitch: normalize_axis(self.pitch),
            yaw: normalize_axis(self.yaw),
            roll: normalize_axis(self.roll),
        }
    }

    /// Copy keeping only the yaw; used for planar movement frames.
    pub fn yaw_only(self) -> Self {
        Self {
            pitch: 0.0,
            yaw: self.yaw,
            roll: 0.0,
        }
    }

    /// Bevy quaternion for this orientation.
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            -self.yaw.to_radians(),
            self.pitch.to_radians(),
            -self.roll.to_radians(),
        )
    }

    /// Unit vector the orientation faces.
    pub fn forward(self) -> Vec3 {
        self.to_quat() * Vec3::NEG_Z
    }

    /// Unit vector to the right of the orientation.
    pub fn right(self) -> Vec3 {
        self.to_quat() * Vec3::X
    }

    /// Rotate a vector expressed in (right, up, forward) local components.
    pub fn rotate_local(self, right: f32, up: f32, forward: f32) -> Vec3 {
        self.to_quat() * Vec3::new(right, up, -forward)
    }

    fn scaled(self, s: f32) -> Self {
        Self::new(self.pitch * s, self.yaw * s, self.roll * s)
    }

    fn is_nearly_zero(self) -> bool {
        self.pitch.abs() < 1.0e-4 && self.yaw.abs() < 1.0e-4 && self.roll.abs() < 1.0e-4
    }
}

impl std::ops::Add for Rotator {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.pitch + rhs.pitch, self.yaw + rhs.yaw, self.roll + rhs.roll)
    }
}

impl std::ops::Sub for Rotator {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.pitch - rhs.pitch, self.yaw - rhs.yaw, self.roll - rhs.roll)
    }
}

/// Per-axis exponential smoothing of a [`Rotator`] along the shortest arc.
///
/// Same law as [`finterp_to`], applied to the normalized angular delta so
/// a turn from 170° to −170° travels 20°, not 340°.
pub fn rinterp_to(current: Rotator, target: Rotator, dt: f32, speed: f32) -> Rotator {
    if dt <= 0.0 || current == target {
        return current;
    }
    if speed <= 0.0 {
        return target;
    }
    let delta = (target - current).normalized();
    if delta.is_nearly_zero() {
        return target;
    }
    let alpha = (dt * speed).clamp(0.0, 1.0);
    (current + delta.scaled(alpha)).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn finterp_result_stays_between_current_and_target() {
        for &(c, t) in &[(0.0_f32, 10.0_f32), (10.0, -4.0), (-3.0, -3.5)] {
            for &dt in &[0.0_f32, 0.001, 0.016, 0.05, 0.5] {
                for &rate in &[0.0_f32, 1.0, 8.0, 20.0, 60.0] {
                    let r = finterp_to(c, t, dt, rate);
                    let (lo, hi) = if c < t { (c, t) } else { (t, c) };
                    assert!(r >= lo - 1e-6 && r <= hi + 1e-6, "c={c} t={t} dt={dt} rate={rate} r={r}");
                    if rate * dt >= 1.0 {
                        assert_eq!(r, t);
                    }
                }
            }
        }
    }

    #[test]
    fn finterp_moves_proportionally() {
        assert!(approx(finterp_to(0.0, 100.0, 0.1, 2.0), 20.0));
    }

    #[test]
    fn clamped_map_saturates_at_both_ends() {
        let f = |s| map_range_clamped(s, (300.0, 1000.0), (75.0, 110.0));
        assert_eq!(f(0.0), 75.0);
        assert_eq!(f(300.0), 75.0);
        assert_eq!(f(1000.0), 110.0);
        assert_eq!(f(5000.0), 110.0);
        assert!(approx(f(650.0), 92.5));
    }

    #[test]
    fn unclamped_map_extrapolates() {
        assert!(approx(
            map_range_unclamped(1350.0, (300.0, 1000.0), (75.0, 110.0)),
            127.5
        ));
    }

    #[test]
    fn clamp_angle_saturates_any_magnitude() {
        for &a in &[-1000.0_f32, -90.0, -45.0, 0.0, 60.0, 85.0, 120.0, 179.0, 5000.0] {
            let c = clamp_angle(a, -45.0, 85.0);
            assert!((-45.0..=85.0).contains(&c), "{a} -> {c}");
        }
        assert_eq!(clamp_angle(100.0, -45.0, 85.0), 85.0);
        assert_eq!(clamp_angle(-60.0, -45.0, 85.0), -45.0);
        assert!(approx(clamp_angle(350.0, -45.0, 85.0), -10.0));
    }

    #[test]
    fn rinterp_takes_shortest_arc() {
        let r = rinterp_to(
            Rotator::new(0.0, 170.0, 0.0),
            Rotator::new(0.0, -170.0, 0.0),
            0.5,
            1.0,
        );
        assert!(approx(r.yaw, 180.0) || approx(r.yaw, -180.0));
    }

    #[test]
    fn rotator_forward_matches_direction() {
        let dir = Vec3::new(1.0, 1.0, -1.0).normalize();
        let f = Rotator::from_direction(dir).forward();
        assert!((f - dir).length() < 1e-4);
        assert!((Rotator::ZERO.forward() - Vec3::NEG_Z).length() < 1e-6);
        assert!((Rotator::new(0.0, 90.0, 0.0).forward() - Vec3::X).length() < 1e-5);
    }
}

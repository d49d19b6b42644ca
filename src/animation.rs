//! Animation parameter bridge.
//!
//! Reads the character's locomotion and aim state once per frame and
//! republishes it as the named parameters an animation graph consumes.  No
//! decisions are made here; it is a relay.

use crate::character::CharacterLook;
use crate::interp::{normalize_axis, Rotator};
use crate::movement::CharacterMovement;
use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;

/// Seconds a recoil section stays active after it was requested.
pub const MONTAGE_SECTION_LENGTH: f32 = 0.2;

/// Request to play a named section of the owner's one-shot animation.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MontageRequest {
    pub entity: Entity,
    pub section: &'static str,
}

/// Parameters published to the animation graph.
#[derive(Component, Debug, Default, Clone, PartialEq)]
pub struct AnimationParams {
    /// Horizontal speed (u/s).
    pub speed: f32,
    pub is_in_air: bool,
    /// Movement input is being applied.
    pub is_accelerating: bool,
    /// Velocity heading relative to the aim heading, degrees in (−180, 180].
    pub movement_offset_yaw: f32,
    /// `movement_offset_yaw` from the last frame the character was moving.
    pub last_movement_offset_yaw: f32,
    pub aiming: bool,
    /// Active one-shot section and its elapsed time.
    pub montage: Option<(&'static str, f32)>,
}

/// Locomotion snapshot the bridge relays.
#[derive(Debug, Clone, Copy)]
pub struct LocomotionSample {
    pub velocity: Vec3,
    pub falling: bool,
    pub accelerating: bool,
    pub aim_yaw: f32,
    pub aiming: bool,
}

/// Refresh `params` from one locomotion sample.
pub fn update_animation_params(params: &mut AnimationParams, sample: LocomotionSample) {
    let horizontal = Vec3::new(sample.velocity.x, 0.0, sample.velocity.z);
    params.speed = horizontal.length();
    params.is_in_air = sample.falling;
    params.is_accelerating = sample.accelerating;
    params.aiming = sample.aiming;

    let heading = Rotator::from_direction(horizontal).yaw;
    params.movement_offset_yaw = normalize_axis(heading - sample.aim_yaw);
    if params.speed > 0.0 {
        params.last_movement_offset_yaw = params.movement_offset_yaw;
    }
}

pub fn animation_params_system(
    time: Res<Time>,
    mut q: Query<(&Velocity, &CharacterMovement, &CharacterLook, &mut AnimationParams)>,
) {
    let dt = time.delta_secs();
    for (velocity, movement, look, mut params) in q.iter_mut() {
        update_animation_params(
            &mut params,
            LocomotionSample {
                velocity: velocity.linvel,
                falling: movement.is_falling(),
                accelerating: movement.accelerating,
                aim_yaw: look.control.yaw,
                aiming: look.aiming,
            },
        );
        if let Some((_, elapsed)) = params.montage.as_mut() {
            *elapsed += dt;
            if *elapsed >= MONTAGE_SECTION_LENGTH {
                params.montage = None;
            }
        }
    }
}

/// Start requested montage sections; a new request restarts the section.
pub fn play_montage_system(
    mut reader: MessageReader<MontageRequest>,
    mut q: Query<&mut AnimationParams>,
) {
    for request in reader.read() {
        if let Ok(mut params) = q.get_mut(request.entity) {
            params.montage = Some((request.section, 0.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(velocity: Vec3, aim_yaw: f32) -> LocomotionSample {
        LocomotionSample {
            velocity,
            falling: false,
            accelerating: velocity != Vec3::ZERO,
            aim_yaw,
            aiming: false,
        }
    }

    #[test]
    fn strafing_right_is_positive_offset() {
        let mut p = AnimationParams::default();
        // Aiming down −Z, moving toward +X (the character's right).
        update_animation_params(&mut p, sample(Vec3::new(300.0, 0.0, 0.0), 0.0));
        assert!((p.movement_offset_yaw - 90.0).abs() < 1e-3);
        assert!((p.speed - 300.0).abs() < 1e-3);
    }

    #[test]
    fn last_offset_is_held_while_stopped() {
        let mut p = AnimationParams::default();
        update_animation_params(&mut p, sample(Vec3::new(0.0, 0.0, 300.0), 0.0));
        let moving = p.last_movement_offset_yaw;
        assert!((moving.abs() - 180.0).abs() < 1e-3);
        update_animation_params(&mut p, sample(Vec3::ZERO, 45.0));
        assert_eq!(p.last_movement_offset_yaw, moving);
        assert!(!p.is_accelerating);
    }

    #[test]
    fn vertical_velocity_is_not_speed() {
        let mut p = AnimationParams::default();
        let mut s = sample(Vec3::new(0.0, -500.0, 0.0), 0.0);
        s.falling = true;
        update_animation_params(&mut p, s);
        assert_eq!(p.speed, 0.0);
        assert!(p.is_in_air);
    }
}

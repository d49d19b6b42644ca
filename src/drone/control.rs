//! Drone flight and camera systems.
//!
//! ## Pipeline (runs in order every `Update` frame)
//!
//! 1. [`drone_move_system`]: add `(forward, right, up)` in the camera's
//!    yaw-only frame, scaled by speed and dt, to the current velocity.
//! 2. [`drone_arm_system`]: turn / look input moves the spring-arm target;
//!    the arm interpolates toward it (pitch clamped).
//! 3. [`drone_camera_focus_system`]: camera turns toward the drone; the body
//!    leans into the movement input and follows the look-at yaw.
//! 4. [`drone_fov_system`]: FOV widens with speed.

use super::{Drone, DroneFlight};
use crate::camera::CameraRig;
use crate::config::GameplayConfig;
use crate::input::{ControlInput, Possessed};
use crate::interp::{clamp_angle, finterp_to, map_range_clamped, rinterp_to, Rotator};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

// ── Pure helpers ──────────────────────────────────────────────────────────────

/// Velocity added by one frame of movement input.
pub fn drone_velocity_delta(axes: Vec3, camera_yaw: f32, speed: f32, dt: f32) -> Vec3 {
    let frame = Rotator::new(0.0, camera_yaw, 0.0);
    frame.rotate_local(axes.x, axes.y, axes.z) * speed * dt
}

/// Spring-arm orientation the arm interpolates toward.
pub fn arm_target(arm: Rotator, turn: f32, look_up: f32, config: &GameplayConfig) -> Rotator {
    let speed = config.drone_camera_speed;
    Rotator::new(
        clamp_angle(arm.pitch + speed * look_up, config.pitch_min, config.pitch_max),
        arm.yaw + speed * turn,
        0.0,
    )
}

/// Body orientation for the current lean input and camera yaw.
pub fn lean_target(lean_input: Vec2, look_at_yaw: f32, config: &GameplayConfig) -> Rotator {
    Rotator::new(
        lean_input.x * config.drone_lean_pitch,
        look_at_yaw,
        lean_input.y * config.drone_lean_roll,
    )
}

/// Speed-mapped FOV, clamped to the configured range.
pub fn drone_fov_target(speed: f32, config: &GameplayConfig) -> f32 {
    map_range_clamped(
        speed,
        (config.drone_fov_speed_min, config.drone_fov_speed_max),
        (config.drone_fov_min, config.drone_fov_max),
    )
}

// ── Step 1: Movement ──────────────────────────────────────────────────────────

pub fn drone_move_system(
    time: Res<Time>,
    input: Res<ControlInput>,
    config: Res<GameplayConfig>,
    mut q: Query<(&CameraRig, &mut DroneFlight, &mut Velocity), (With<Drone>, With<Possessed>)>,
) {
    let Ok((rig, mut flight, mut velocity)) = q.single_mut() else {
        return;
    };
    let camera_yaw = rig.camera_rotation.unwrap_or(rig.arm_rotation).yaw;
    // Axes in (right, up, forward) order.
    let axes = Vec3::new(input.move_right, input.move_up, input.move_forward);
    velocity.linvel += drone_velocity_delta(
        axes,
        camera_yaw,
        config.drone_movement_speed,
        time.delta_secs(),
    );
    flight.lean_input = Vec2::new(input.move_forward, input.move_right);
}

// ── Step 2: Spring arm ────────────────────────────────────────────────────────

/// Rate axes feed the same per-frame offset as mouse axes.
pub fn drone_arm_system(
    time: Res<Time>,
    input: Res<ControlInput>,
    config: Res<GameplayConfig>,
    mut q: Query<(&mut CameraRig, Has<Possessed>), With<Drone>>,
) {
    let dt = time.delta_secs();
    for (mut rig, possessed) in q.iter_mut() {
        let (turn, look_up) = if possessed {
            (input.turn + input.turn_rate, input.look_up + input.look_up_rate)
        } else {
            (0.0, 0.0)
        };
        let target = arm_target(rig.arm_rotation, turn, look_up, &config);
        rig.arm_rotation = rinterp_to(rig.arm_rotation, target, dt, config.drone_arm_interp_speed);
    }
}

// ── Step 3: Camera focus + lean ───────────────────────────────────────────────

pub fn drone_camera_focus_system(
    time: Res<Time>,
    config: Res<GameplayConfig>,
    mut q: Query<(&mut Transform, &mut CameraRig, &mut DroneFlight), With<Drone>>,
) {
    let dt = time.delta_secs();
    for (mut transform, mut rig, mut flight) in q.iter_mut() {
        let camera_pos = rig.camera_position(transform.translation);
        let look_at = Rotator::from_direction(transform.translation - camera_pos);
        let current = rig.camera_rotation.unwrap_or(rig.arm_rotation);
        rig.camera_rotation = Some(rinterp_to(
            current,
            look_at,
            dt,
            config.drone_look_at_interp_speed,
        ));

        let target = lean_target(flight.lean_input, look_at.yaw, &config);
        flight.body = rinterp_to(flight.body, target, dt, config.drone_lean_interp_speed);
        transform.rotation = flight.body.to_quat();
    }
}

// ── Step 4: FOV ───────────────────────────────────────────────────────────────

pub fn drone_fov_system(
    time: Res<Time>,
    config: Res<GameplayConfig>,
    mut q: Query<(&Velocity, &mut CameraRig), With<Drone>>,
) {
    let dt = time.delta_secs();
    for (velocity, mut rig) in q.iter_mut() {
        let target = drone_fov_target(velocity.linvel.length(), &config);
        rig.fov = finterp_to(rig.fov, target, dt, config.drone_fov_interp_speed);
    }
}

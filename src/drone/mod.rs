//! Drone module: the temporary flying pawn spawned by the character.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`control`] | Flight input, spring-arm follow, camera look-at, body lean, speed FOV |
//! | [`combat`] | Fire and boost |
//!
//! The drone is a gravity-free dynamic body.  Its lifetime is owned by the
//! character's possession link: it is spawned by the drone ability and
//! despawned by the character's `DroneReturn` timer.

pub mod combat;
pub mod control;

pub use combat::{drone_boost_system, drone_fire_system, try_boost};
pub use control::{
    arm_target, drone_arm_system, drone_camera_focus_system, drone_fov_system, drone_fov_target,
    drone_move_system, drone_velocity_delta, lean_target,
};

use crate::ability::Cooldown;
use crate::camera::CameraRig;
use crate::combat::Weapon;
use crate::config::GameplayConfig;
use crate::effects::SoundCue;
use crate::input::Possessed;
use crate::interp::Rotator;
use crate::scheduler::{AbilityTimers, TimerToken};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// Drone pawn; `owner` is the character it returns control to.
#[derive(Component, Debug, Clone, Copy)]
pub struct Drone {
    pub owner: Entity,
}

/// Flight state of a drone.
#[derive(Component, Debug, Clone)]
pub struct DroneFlight {
    pub boost: Cooldown,
    /// Body orientation; written to the transform every frame.
    pub body: Rotator,
    /// Last forward / right input, used for the body lean.
    pub lean_input: Vec2,
}

impl DroneFlight {
    pub fn new(body: Rotator, config: &GameplayConfig) -> Self {
        Self {
            boost: Cooldown::new(TimerToken::BoostCooldown, config.drone_boost_cooldown),
            body,
            lean_input: Vec2::ZERO,
        }
    }
}

// ── Spawn ─────────────────────────────────────────────────────────────────────

/// Spawn a possessed drone owned by `owner` and return its entity.
///
/// `arm` is the initial spring-arm orientation.
pub fn spawn_drone(
    commands: &mut Commands,
    transform: Transform,
    arm: Rotator,
    owner: Entity,
    config: &GameplayConfig,
) -> Entity {
    let mut rig = CameraRig::new(
        config.drone_arm_length,
        Vec3::new(0.0, config.drone_camera_height_offset, 0.0),
        config.drone_fov_min,
    );
    rig.arm_rotation = arm;
    let [mx, my, mz] = config.drone_muzzle_offset;

    commands
        .spawn((
            Drone { owner },
            DroneFlight::new(arm.yaw_only(), config),
            AbilityTimers::default(),
            Weapon {
                muzzle_offset: Some(Vec3::new(mx, my, mz)),
                fire_sound: SoundCue::DroneFire,
                muzzle_flash: false,
                beam: false,
                recoil_section: None,
                damage: config.nominal_damage,
                trace_distance: config.trace_distance,
            },
            rig,
            Possessed,
            // Physics
            (
                RigidBody::Dynamic,
                Collider::ball(config.drone_collider_radius),
                GravityScale(0.0),
                LockedAxes::ROTATION_LOCKED,
                Velocity::zero(),
                Damping {
                    linear_damping: config.drone_linear_damping,
                    angular_damping: config.drone_angular_damping,
                },
            ),
            transform,
            Visibility::default(),
        ))
        .id()
}

// ── Timers ────────────────────────────────────────────────────────────────────

/// Tick drone timers with virtual time; boost becomes ready on expiry.
pub fn drone_timer_system(time: Res<Time>, mut q: Query<(&mut AbilityTimers, &mut DroneFlight)>) {
    let dt = time.delta_secs();
    for (mut timers, mut flight) in q.iter_mut() {
        for (token, _) in timers.tick(dt) {
            flight.boost.on_timer(token);
        }
    }
}

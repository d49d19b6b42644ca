//! Character module: the walking, shooting player pawn.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | Components: `ShooterCharacter`, `CharacterLook`, `FireControl`, `CrosshairSpread`, `CharacterAbilities` |
//! | [`control`] | Look input, movement intent, aim toggle, camera side switch, FOV zoom |
//! | [`combat`] | Fire-mode state machine, shots, crosshair spread |
//! | [`abilities`] | Dash, slow motion, drone possession, timer dispatch |
//!
//! All public items are re-exported at this level so that the rest of the
//! crate can use flat `crate::character::*` imports.

pub mod abilities;
pub mod combat;
pub mod control;
pub mod state;

pub use abilities::{
    character_ability_input_system, character_timer_system, drone_spawn_point, try_dash,
};
pub use combat::{
    character_fire_input_system, character_fire_system, crosshair_spread_system,
    start_crosshair_shot,
};
pub use control::{
    apply_look_input, camera_zoom_system, character_look_system, character_move_intent_system,
};
pub use state::{
    CharacterAbilities, CharacterLook, CrosshairSpread, FireControl, ShooterCharacter, ShotKind,
};

// ── Character spawn ───────────────────────────────────────────────────────────

use crate::animation::AnimationParams;
use crate::camera::CameraRig;
use crate::combat::Weapon;
use crate::config::GameplayConfig;
use crate::effects::SoundCue;
use crate::input::Possessed;
use crate::movement::CharacterMovement;
use crate::scheduler::AbilityTimers;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Spawn a character at `transform` and return its entity.
///
/// The capsule is a dynamic body with rotation locked; yaw is written by the
/// look system and velocity by the movement system.  Friction is zero so the
/// movement system alone decides how fast the character slows down.
pub fn spawn_character(
    commands: &mut Commands,
    transform: Transform,
    config: &GameplayConfig,
) -> Entity {
    let [mx, my, mz] = config.character_muzzle_offset;
    commands
        .spawn((
            ShooterCharacter,
            CharacterLook::default(),
            CharacterMovement::default(),
            FireControl::default(),
            CrosshairSpread::default(),
            CharacterAbilities::new(config),
            AbilityTimers::default(),
            AnimationParams::default(),
            Weapon {
                muzzle_offset: Some(Vec3::new(mx, my, mz)),
                fire_sound: SoundCue::Fire,
                muzzle_flash: true,
                beam: true,
                recoil_section: Some("StartFire"),
                damage: config.nominal_damage,
                trace_distance: config.trace_distance,
            },
            CameraRig::new(
                config.character_arm_length,
                Vec3::new(config.camera_side_offset, config.camera_height_offset, 0.0),
                config.default_fov,
            ),
            // Physics
            (
                RigidBody::Dynamic,
                Collider::capsule_y(config.capsule_half_height, config.capsule_radius),
                LockedAxes::ROTATION_LOCKED,
                Velocity::zero(),
                Friction {
                    coefficient: 0.0,
                    combine_rule: CoefficientCombineRule::Min,
                },
            ),
            transform,
            Visibility::default(),
        ))
        .id()
}

/// Startup system: spawn the player character and give it control.
pub fn spawn_player_character(mut commands: Commands, config: Res<GameplayConfig>) {
    let spawn_height = config.capsule_half_height + config.capsule_radius + 2.0;
    let character = spawn_character(
        &mut commands,
        Transform::from_xyz(0.0, spawn_height, 0.0),
        &config,
    );
    commands.entity(character).insert(Possessed);
    info!("✓ Character spawned at origin");
}

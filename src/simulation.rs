//! Gameplay plugins and frame ordering.
//!
//! ## Frame layout (`Update`)
//!
//! | Set | Systems |
//! |-----|---------|
//! | [`GameplaySet::Input`] | device input → `ControlInput` |
//! | [`GameplaySet::Timers`] | cooldowns, auto-fire reset, drone return |
//! | [`GameplaySet::Control`] | look, intent, fire, abilities for the possessed pawn |
//! | [`GameplaySet::Movement`] | ground check, character velocity, drone flight |
//! | [`GameplaySet::Feedback`] | FOV, crosshair spread, drone camera, animation params |
//! | [`GameplaySet::Effects`] | damage, particles, montages |
//!
//! [`GameplayPlugin`] is headless: it needs only `MinimalPlugins`, so the
//! whole pipeline can be driven from tests by writing `ControlInput`, which
//! is reset in `Last`.
//! [`DeviceInputPlugin`] adds keyboard, mouse and gamepad sources on top.

use crate::animation::{animation_params_system, play_montage_system, MontageRequest};
use crate::character::{
    camera_zoom_system, character_ability_input_system, character_fire_input_system,
    character_fire_system, character_look_system, character_move_intent_system,
    character_timer_system, crosshair_spread_system, spawn_player_character,
};
use crate::combat::{apply_damage_system, ApplyDamage};
use crate::config::{load_gameplay_config, GameplayConfig};
use crate::drone::{
    drone_arm_system, drone_boost_system, drone_camera_focus_system, drone_fire_system,
    drone_fov_system, drone_move_system, drone_timer_system,
};
use crate::effects::{
    beam_update_system, particle_update_system, spawn_particles_system, EffectAssets, PlaySound,
    SpawnParticles,
};
use crate::input::{
    control_input_clear_system, gamepad_connection_system, gamepad_to_input_system,
    keyboard_mouse_to_input_system, ControlInput, PreferredGamepad,
};
use crate::movement::{character_movement_system, ground_check_system};
use bevy::prelude::*;

/// Ordered stages of one gameplay frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    Input,
    Timers,
    Control,
    Movement,
    Feedback,
    Effects,
}

pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PlaySound>()
            .add_message::<SpawnParticles>()
            .add_message::<ApplyDamage>()
            .add_message::<MontageRequest>()
            .init_resource::<GameplayConfig>()
            .init_resource::<ControlInput>()
            .init_resource::<EffectAssets>()
            .configure_sets(
                Update,
                (
                    GameplaySet::Input,
                    GameplaySet::Timers,
                    GameplaySet::Control,
                    GameplaySet::Movement,
                    GameplaySet::Feedback,
                    GameplaySet::Effects,
                )
                    .chain(),
            )
            // Config first so every other startup system sees the final values.
            .add_systems(
                Startup,
                (load_gameplay_config, spawn_player_character).chain(),
            )
            // Edges live for exactly one frame.
            .add_systems(Last, control_input_clear_system)
            .add_systems(
                Update,
                (character_timer_system, drone_timer_system).in_set(GameplaySet::Timers),
            )
            .add_systems(
                Update,
                (
                    character_look_system,
                    character_move_intent_system,
                    character_fire_input_system,
                    character_ability_input_system,
                    character_fire_system,
                    drone_boost_system,
                    drone_fire_system,
                )
                    .chain()
                    .in_set(GameplaySet::Control),
            )
            .add_systems(
                Update,
                (
                    ground_check_system,
                    character_movement_system,
                    drone_move_system,
                    drone_arm_system,
                )
                    .chain()
                    .in_set(GameplaySet::Movement),
            )
            .add_systems(
                Update,
                (
                    camera_zoom_system,
                    crosshair_spread_system,
                    drone_camera_focus_system,
                    drone_fov_system,
                    animation_params_system,
                )
                    .chain()
                    .in_set(GameplaySet::Feedback),
            )
            .add_systems(
                Update,
                (
                    play_montage_system,
                    apply_damage_system,
                    spawn_particles_system,
                    particle_update_system,
                    beam_update_system,
                )
                    .chain()
                    .in_set(GameplaySet::Effects),
            );
    }
}

/// Keyboard, mouse and gamepad sources for `ControlInput`.
///
/// Requires bevy's `InputPlugin` (part of `DefaultPlugins`).
pub struct DeviceInputPlugin;

impl Plugin for DeviceInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PreferredGamepad>().add_systems(
            Update,
            (
                keyboard_mouse_to_input_system,
                gamepad_connection_system,
                gamepad_to_input_system,
            )
                .chain()
                .in_set(GameplaySet::Input),
        );
    }
}

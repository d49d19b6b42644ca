//! Runtime gameplay configuration loaded from `assets/gameplay.toml`.
//!
//! [`GameplayConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_gameplay_config`] reads
//! `assets/gameplay.toml` and overwrites the defaults with any values present
//! in the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the constants you care about.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameplayConfig::default()`.

use crate::constants::*;
use crate::error::{
    validate_finite, validate_interp_rate, validate_non_negative, validate_positive,
    validate_range, GameplayError, GameplayResult,
};
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable gameplay configuration.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    // ── World ─────────────────────────────────────────────────────────────────
    pub gravity: f32,

    // ── Character: Movement ───────────────────────────────────────────────────
    pub max_walk_speed: f32,
    pub max_acceleration: f32,
    pub braking_deceleration: f32,
    pub air_control: f32,
    pub jump_velocity: f32,
    pub capsule_radius: f32,
    pub capsule_half_height: f32,
    pub ground_check_slack: f32,
    pub ground_max_rise_speed: f32,

    // ── Character: Look ───────────────────────────────────────────────────────
    pub hip_turn_rate: f32,
    pub hip_look_up_rate: f32,
    pub aiming_turn_rate: f32,
    pub aiming_look_up_rate: f32,
    pub mouse_hip_turn_scale: f32,
    pub mouse_hip_look_up_scale: f32,
    pub mouse_aiming_turn_scale: f32,
    pub mouse_aiming_look_up_scale: f32,
    pub mouse_axis_per_pixel: f32,
    pub controller_input_scale: f32,
    pub gamepad_deadzone: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,

    // ── Character: Camera ─────────────────────────────────────────────────────
    pub character_arm_length: f32,
    pub camera_side_offset: f32,
    pub camera_height_offset: f32,
    pub default_fov: f32,
    pub zoomed_fov: f32,
    pub zoom_interp_speed: f32,

    // ── Character: Combat ─────────────────────────────────────────────────────
    pub trace_distance: f32,
    pub nominal_damage: f32,
    pub automatic_fire_interval: f32,
    pub shoot_spread_duration: f32,
    pub character_muzzle_offset: [f32; 3],
    pub target_health: f32,

    // ── Character: Crosshair ──────────────────────────────────────────────────
    pub crosshair_walk_speed_max: f32,
    pub crosshair_air_target: f32,
    pub crosshair_air_grow_rate: f32,
    pub crosshair_air_shrink_rate: f32,
    pub crosshair_aim_target: f32,
    pub crosshair_aim_rate: f32,
    pub crosshair_shoot_target: f32,
    pub crosshair_shoot_rate: f32,
    pub crosshair_base_spread: f32,

    // ── Character: Abilities ──────────────────────────────────────────────────
    pub dash_force_multiplier: f32,
    pub dash_cooldown: f32,
    pub slow_motion_dilation: f32,
    pub drone_possession_time: f32,
    pub drone_ability_cooldown: f32,
    pub drone_spawn_offset: [f32; 2],

    // ── Drone ─────────────────────────────────────────────────────────────────
    pub drone_movement_speed: f32,
    pub drone_camera_speed: f32,
    pub drone_arm_interp_speed: f32,
    pub drone_look_at_interp_speed: f32,
    pub drone_lean_interp_speed: f32,
    pub drone_lean_roll: f32,
    pub drone_lean_pitch: f32,
    pub drone_arm_length: f32,
    pub drone_camera_height_offset: f32,
    pub drone_fov_speed_min: f32,
    pub drone_fov_speed_max: f32,
    pub drone_fov_min: f32,
    pub drone_fov_max: f32,
    pub drone_fov_interp_speed: f32,
    pub drone_boost_multiplier: f32,
    pub drone_boost_cooldown: f32,
    pub drone_linear_damping: f32,
    pub drone_angular_damping: f32,
    pub drone_collider_radius: f32,
    pub drone_muzzle_offset: [f32; 3],
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            // World
            gravity: GRAVITY,
            // Character: Movement
            max_walk_speed: CHARACTER_MAX_WALK_SPEED,
            max_acceleration: CHARACTER_MAX_ACCELERATION,
            braking_deceleration: CHARACTER_BRAKING_DECELERATION,
            air_control: CHARACTER_AIR_CONTROL,
            jump_velocity: CHARACTER_JUMP_VELOCITY,
            capsule_radius: CHARACTER_CAPSULE_RADIUS,
            capsule_half_height: CHARACTER_CAPSULE_HALF_HEIGHT,
            ground_check_slack: GROUND_CHECK_SLACK,
            ground_max_rise_speed: GROUND_MAX_RISE_SPEED,
            // Character: Look
            hip_turn_rate: HIP_TURN_RATE,
            hip_look_up_rate: HIP_LOOK_UP_RATE,
            aiming_turn_rate: AIMING_TURN_RATE,
            aiming_look_up_rate: AIMING_LOOK_UP_RATE,
            mouse_hip_turn_scale: MOUSE_HIP_TURN_SCALE,
            mouse_hip_look_up_scale: MOUSE_HIP_LOOK_UP_SCALE,
            mouse_aiming_turn_scale: MOUSE_AIMING_TURN_SCALE,
            mouse_aiming_look_up_scale: MOUSE_AIMING_LOOK_UP_SCALE,
            mouse_axis_per_pixel: MOUSE_AXIS_PER_PIXEL,
            controller_input_scale: CONTROLLER_INPUT_SCALE,
            gamepad_deadzone: GAMEPAD_DEADZONE,
            pitch_min: PITCH_MIN,
            pitch_max: PITCH_MAX,
            // Character: Camera
            character_arm_length: CHARACTER_ARM_LENGTH,
            camera_side_offset: CHARACTER_CAMERA_SIDE_OFFSET,
            camera_height_offset: CHARACTER_CAMERA_HEIGHT_OFFSET,
            default_fov: CAMERA_DEFAULT_FOV,
            zoomed_fov: CAMERA_ZOOMED_FOV,
            zoom_interp_speed: ZOOM_INTERP_SPEED,
            // Character: Combat
            trace_distance: TRACE_DISTANCE,
            nominal_damage: NOMINAL_DAMAGE,
            automatic_fire_interval: AUTOMATIC_FIRE_INTERVAL,
            shoot_spread_duration: SHOOT_SPREAD_DURATION,
            character_muzzle_offset: CHARACTER_MUZZLE_OFFSET,
            target_health: TARGET_HEALTH,
            // Character: Crosshair
            crosshair_walk_speed_max: CROSSHAIR_WALK_SPEED_MAX,
            crosshair_air_target: CROSSHAIR_AIR_TARGET,
            crosshair_air_grow_rate: CROSSHAIR_AIR_GROW_RATE,
            crosshair_air_shrink_rate: CROSSHAIR_AIR_SHRINK_RATE,
            crosshair_aim_target: CROSSHAIR_AIM_TARGET,
            crosshair_aim_rate: CROSSHAIR_AIM_RATE,
            crosshair_shoot_target: CROSSHAIR_SHOOT_TARGET,
            crosshair_shoot_rate: CROSSHAIR_SHOOT_RATE,
            crosshair_base_spread: CROSSHAIR_BASE_SPREAD,
            // Character: Abilities
            dash_force_multiplier: DASH_FORCE_MULTIPLIER,
            dash_cooldown: DASH_COOLDOWN,
            slow_motion_dilation: SLOW_MOTION_DILATION,
            drone_possession_time: DRONE_POSSESSION_TIME,
            drone_ability_cooldown: DRONE_ABILITY_COOLDOWN,
            drone_spawn_offset: DRONE_SPAWN_OFFSET,
            // Drone
            drone_movement_speed: DRONE_MOVEMENT_SPEED,
            drone_camera_speed: DRONE_CAMERA_SPEED,
            drone_arm_interp_speed: DRONE_ARM_INTERP_SPEED,
            drone_look_at_interp_speed: DRONE_LOOK_AT_INTERP_SPEED,
            drone_lean_interp_speed: DRONE_LEAN_INTERP_SPEED,
            drone_lean_roll: DRONE_LEAN_ROLL,
            drone_lean_pitch: DRONE_LEAN_PITCH,
            drone_arm_length: DRONE_ARM_LENGTH,
            drone_camera_height_offset: DRONE_CAMERA_HEIGHT_OFFSET,
            drone_fov_speed_min: DRONE_FOV_SPEED_MIN,
            drone_fov_speed_max: DRONE_FOV_SPEED_MAX,
            drone_fov_min: DRONE_FOV_MIN,
            drone_fov_max: DRONE_FOV_MAX,
            drone_fov_interp_speed: DRONE_FOV_INTERP_SPEED,
            drone_boost_multiplier: DRONE_BOOST_MULTIPLIER,
            drone_boost_cooldown: DRONE_BOOST_COOLDOWN,
            drone_linear_damping: DRONE_LINEAR_DAMPING,
            drone_angular_damping: DRONE_ANGULAR_DAMPING,
            drone_collider_radius: DRONE_COLLIDER_RADIUS,
            drone_muzzle_offset: DRONE_MUZZLE_OFFSET,
        }
    }
}

impl GameplayConfig {
    /// Check the values whose misconfiguration would break an invariant:
    /// NaN or infinite tunables, inverted clamp ranges, negative rates or
    /// cooldowns.
    pub fn validate(&self) -> GameplayResult<()> {
        for (name, value) in self.scalar_fields() {
            validate_finite(name, value)?;
        }
        validate_range("pitch", self.pitch_min, self.pitch_max)?;
        validate_range("drone_fov", self.drone_fov_min, self.drone_fov_max)?;
        validate_range(
            "drone_fov_speed",
            self.drone_fov_speed_min,
            self.drone_fov_speed_max,
        )?;
        validate_interp_rate("zoom_interp_speed", self.zoom_interp_speed)?;
        validate_interp_rate("drone_arm_interp_speed", self.drone_arm_interp_speed)?;
        validate_interp_rate(
            "drone_look_at_interp_speed",
            self.drone_look_at_interp_speed,
        )?;
        validate_interp_rate("drone_lean_interp_speed", self.drone_lean_interp_speed)?;
        validate_interp_rate("drone_fov_interp_speed", self.drone_fov_interp_speed)?;
        validate_non_negative("dash_cooldown", self.dash_cooldown)?;
        validate_non_negative("ground_max_rise_speed", self.ground_max_rise_speed)?;
        validate_non_negative("drone_boost_cooldown", self.drone_boost_cooldown)?;
        validate_non_negative("drone_ability_cooldown", self.drone_ability_cooldown)?;
        validate_non_negative("shoot_spread_duration", self.shoot_spread_duration)?;
        validate_positive("automatic_fire_interval", self.automatic_fire_interval)?;
        validate_positive("drone_possession_time", self.drone_possession_time)?;
        validate_positive("slow_motion_dilation", self.slow_motion_dilation)?;
        Ok(())
    }

    /// Every tunable as `(name, value)`, for the finiteness check.
    fn scalar_fields(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        [
            ("gravity", self.gravity),
            ("max_walk_speed", self.max_walk_speed),
            ("max_acceleration", self.max_acceleration),
            ("braking_deceleration", self.braking_deceleration),
            ("air_control", self.air_control),
            ("jump_velocity", self.jump_velocity),
            ("capsule_radius", self.capsule_radius),
            ("capsule_half_height", self.capsule_half_height),
            ("ground_check_slack", self.ground_check_slack),
            ("ground_max_rise_speed", self.ground_max_rise_speed),
            ("hip_turn_rate", self.hip_turn_rate),
            ("hip_look_up_rate", self.hip_look_up_rate),
            ("aiming_turn_rate", self.aiming_turn_rate),
            ("aiming_look_up_rate", self.aiming_look_up_rate),
            ("mouse_hip_turn_scale", self.mouse_hip_turn_scale),
            ("mouse_hip_look_up_scale", self.mouse_hip_look_up_scale),
            ("mouse_aiming_turn_scale", self.mouse_aiming_turn_scale),
            ("mouse_aiming_look_up_scale", self.mouse_aiming_look_up_scale),
            ("mouse_axis_per_pixel", self.mouse_axis_per_pixel),
            ("controller_input_scale", self.controller_input_scale),
            ("gamepad_deadzone", self.gamepad_deadzone),
            ("pitch_min", self.pitch_min),
            ("pitch_max", self.pitch_max),
            ("character_arm_length", self.character_arm_length),
            ("camera_side_offset", self.camera_side_offset),
            ("camera_height_offset", self.camera_height_offset),
            ("default_fov", self.default_fov),
            ("zoomed_fov", self.zoomed_fov),
            ("zoom_interp_speed", self.zoom_interp_speed),
            ("trace_distance", self.trace_distance),
            ("nominal_damage", self.nominal_damage),
            ("automatic_fire_interval", self.automatic_fire_interval),
            ("shoot_spread_duration", self.shoot_spread_duration),
            ("target_health", self.target_health),
            ("crosshair_walk_speed_max", self.crosshair_walk_speed_max),
            ("crosshair_air_target", self.crosshair_air_target),
            ("crosshair_air_grow_rate", self.crosshair_air_grow_rate),
            ("crosshair_air_shrink_rate", self.crosshair_air_shrink_rate),
            ("crosshair_aim_target", self.crosshair_aim_target),
            ("crosshair_aim_rate", self.crosshair_aim_rate),
            ("crosshair_shoot_target", self.crosshair_shoot_target),
            ("crosshair_shoot_rate", self.crosshair_shoot_rate),
            ("crosshair_base_spread", self.crosshair_base_spread),
            ("dash_force_multiplier", self.dash_force_multiplier),
            ("dash_cooldown", self.dash_cooldown),
            ("slow_motion_dilation", self.slow_motion_dilation),
            ("drone_possession_time", self.drone_possession_time),
            ("drone_ability_cooldown", self.drone_ability_cooldown),
            ("drone_movement_speed", self.drone_movement_speed),
            ("drone_camera_speed", self.drone_camera_speed),
            ("drone_arm_interp_speed", self.drone_arm_interp_speed),
            ("drone_look_at_interp_speed", self.drone_look_at_interp_speed),
            ("drone_lean_interp_speed", self.drone_lean_interp_speed),
            ("drone_lean_roll", self.drone_lean_roll),
            ("drone_lean_pitch", self.drone_lean_pitch),
            ("drone_arm_length", self.drone_arm_length),
            ("drone_camera_height_offset", self.drone_camera_height_offset),
            ("drone_fov_speed_min", self.drone_fov_speed_min),
            ("drone_fov_speed_max", self.drone_fov_speed_max),
            ("drone_fov_min", self.drone_fov_min),
            ("drone_fov_max", self.drone_fov_max),
            ("drone_fov_interp_speed", self.drone_fov_interp_speed),
            ("drone_boost_multiplier", self.drone_boost_multiplier),
            ("drone_boost_cooldown", self.drone_boost_cooldown),
            ("drone_linear_damping", self.drone_linear_damping),
            ("drone_angular_damping", self.drone_angular_damping),
            ("drone_collider_radius", self.drone_collider_radius),
        ]
        .into_iter()
        .chain(self.character_muzzle_offset.iter().map(|&v| ("character_muzzle_offset", v)))
        .chain(self.drone_spawn_offset.iter().map(|&v| ("drone_spawn_offset", v)))
        .chain(self.drone_muzzle_offset.iter().map(|&v| ("drone_muzzle_offset", v)))
    }
}

/// Startup system: attempt to load `assets/gameplay.toml` and overwrite the
/// `GameplayConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors and values
/// that fail [`GameplayConfig::validate`] are logged and the defaults are
/// kept.  A missing file is silently ignored.
pub fn load_gameplay_config(mut config: ResMut<GameplayConfig>) {
    let path = "assets/gameplay.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match parse_gameplay_config(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("✓ Loaded gameplay config from {path}");
            }
            Err(e) => {
                warn!("⚠ Rejected {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present — defaults are already in place; not an error.
            info!("ℹ No {path} found; using compiled defaults");
        }
    }
}

/// Parse and validate a TOML document into a [`GameplayConfig`].
pub fn parse_gameplay_config(contents: &str) -> GameplayResult<GameplayConfig> {
    let loaded: GameplayConfig = toml::from_str(contents)
        .map_err(|e| GameplayError::ConfigParse(e.to_string()))?;
    loaded.validate()?;
    Ok(loaded)
}

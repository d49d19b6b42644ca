//! Character components.
//!
//! All ECS components that describe the character live here.  Systems that
//! mutate them are in the sibling modules:
//! - [`super::control`]: look, movement intent, aim, camera
//! - [`super::combat`]: fire modes, shots, crosshair spread
//! - [`super::abilities`]: dash, slow motion, drone possession, timers

use crate::ability::{Cooldown, PossessionLink, SlowMotion};
use crate::config::GameplayConfig;
use crate::interp::{finterp_to, map_range_clamped, normalize_axis, Rotator};
use crate::scheduler::TimerToken;
use bevy::prelude::*;

/// Marker component for the player character.
#[derive(Component, Debug, Default)]
pub struct ShooterCharacter;

// ── Look ──────────────────────────────────────────────────────────────────────

/// Control rotation and aim state.
#[derive(Component, Debug, Default, Clone)]
pub struct CharacterLook {
    /// Where the player is looking; the camera arm follows it exactly.
    pub control: Rotator,
    pub aiming: bool,
}

impl CharacterLook {
    /// `(turn, look_up)` base rates in deg/s for rate inputs.
    pub fn look_rates(&self, config: &GameplayConfig) -> (f32, f32) {
        if self.aiming {
            (config.aiming_turn_rate, config.aiming_look_up_rate)
        } else {
            (config.hip_turn_rate, config.hip_look_up_rate)
        }
    }

    /// `(turn, look_up)` mouse sensitivity scales.
    pub fn mouse_scales(&self, config: &GameplayConfig) -> (f32, f32) {
        if self.aiming {
            (config.mouse_aiming_turn_scale, config.mouse_aiming_look_up_scale)
        } else {
            (config.mouse_hip_turn_scale, config.mouse_hip_look_up_scale)
        }
    }

    /// Rotate the control rotation by `yaw` / `pitch` degrees, keeping pitch
    /// inside `[pitch_min, pitch_max]`.
    pub fn add_look(&mut self, yaw: f32, pitch: f32, config: &GameplayConfig) {
        self.control.yaw = normalize_axis(self.control.yaw + yaw);
        self.control.pitch = (self.control.pitch + pitch).clamp(config.pitch_min, config.pitch_max);
    }

    /// FOV the camera is interpolating toward.
    pub fn target_fov(&self, config: &GameplayConfig) -> f32 {
        if self.aiming {
            config.zoomed_fov
        } else {
            config.default_fov
        }
    }
}

// ── Fire control ──────────────────────────────────────────────────────────────

/// Which mode a queued shot was fired in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotKind {
    Single,
    /// Must arm [`TimerToken::AutoFireReset`] after firing.
    Automatic,
}

/// Single / automatic fire state machine.
///
/// In automatic mode, a shot clears `ready_to_fire` and arms
/// [`TimerToken::AutoFireReset`]; expiry sets it again and queues another
/// shot if the button is still held.  Releasing the button only stops future
/// re-arms; an armed reset still completes.
///
/// A reset that expired late carries its overshoot into the next re-arm so
/// the shot period stays exact at any frame rate.
#[derive(Component, Debug, Clone)]
pub struct FireControl {
    pub auto_enabled: bool,
    pub button_held: bool,
    pub ready_to_fire: bool,
    /// Shots queued by input or timer expiry, fired by the combat system.
    pub pending_shots: u32,
    /// Seconds the last reset fired past its deadline.
    pub reset_overshoot: f32,
}

impl Default for FireControl {
    fn default() -> Self {
        Self {
            auto_enabled: true,
            button_held: false,
            ready_to_fire: true,
            pending_shots: 0,
            reset_overshoot: 0.0,
        }
    }
}

impl FireControl {
    pub fn press(&mut self) {
        if self.auto_enabled {
            self.button_held = true;
            if self.try_queue_auto() {
                self.reset_overshoot = 0.0;
            }
        } else {
            self.pending_shots += 1;
        }
    }

    pub fn release(&mut self) {
        self.button_held = false;
    }

    /// Automatic-fire timer expired `overshoot` seconds ago.
    pub fn on_reset(&mut self, overshoot: f32) {
        self.ready_to_fire = true;
        if self.button_held && self.try_queue_auto() {
            self.reset_overshoot = overshoot;
        }
    }

    /// Delay to arm after an automatic shot, shortened by the late expiry
    /// that queued it.
    pub fn next_auto_delay(&mut self, interval: f32) -> f32 {
        let delay = (interval - self.reset_overshoot).max(0.0);
        self.reset_overshoot = 0.0;
        delay
    }

    /// Flip between single and automatic fire.
    pub fn toggle_mode(&mut self) {
        self.auto_enabled = !self.auto_enabled;
    }

    /// Take one queued shot.
    pub fn take_shot(&mut self) -> Option<ShotKind> {
        if self.pending_shots == 0 {
            return None;
        }
        self.pending_shots -= 1;
        Some(if self.auto_enabled {
            ShotKind::Automatic
        } else {
            ShotKind::Single
        })
    }

    fn try_queue_auto(&mut self) -> bool {
        if !self.ready_to_fire {
            return false;
        }
        self.ready_to_fire = false;
        self.pending_shots += 1;
        true
    }
}

// ── Crosshair ─────────────────────────────────────────────────────────────────

/// Crosshair spread accumulator.
#[derive(Component, Debug, Default, Clone)]
pub struct CrosshairSpread {
    pub velocity_factor: f32,
    pub air_factor: f32,
    pub aim_factor: f32,
    pub shooting_factor: f32,
    /// Raised for `shoot_spread_duration` seconds after each shot.
    pub firing: bool,
}

impl CrosshairSpread {
    /// Advance every factor by `dt`.
    pub fn update(
        &mut self,
        horizontal_speed: f32,
        falling: bool,
        aiming: bool,
        dt: f32,
        config: &GameplayConfig,
    ) {
        self.velocity_factor = map_range_clamped(
            horizontal_speed,
            (0.0, config.crosshair_walk_speed_max),
            (0.0, 1.0),
        );
        self.air_factor = if falling {
            finterp_to(self.air_factor, config.crosshair_air_target, dt, config.crosshair_air_grow_rate)
        } else {
            finterp_to(self.air_factor, 0.0, dt, config.crosshair_air_shrink_rate)
        };
        let aim_target = if aiming { config.crosshair_aim_target } else { 0.0 };
        self.aim_factor = finterp_to(self.aim_factor, aim_target, dt, config.crosshair_aim_rate);
        let shoot_target = if self.firing {
            config.crosshair_shoot_target
        } else {
            0.0
        };
        self.shooting_factor =
            finterp_to(self.shooting_factor, shoot_target, dt, config.crosshair_shoot_rate);
    }

    /// Combined spread; deliberately unclamped.
    pub fn crosshair_spread_multiplier(&self, config: &GameplayConfig) -> f32 {
        config.crosshair_base_spread + self.velocity_factor + self.air_factor - self.aim_factor
            + self.shooting_factor
    }
}

// ── Abilities ─────────────────────────────────────────────────────────────────

/// Dash, slow motion, and the drone link of one character.
#[derive(Component, Debug, Clone)]
pub struct CharacterAbilities {
    pub dash: Cooldown,
    pub slow_motion: SlowMotion,
    pub possession: PossessionLink,
}

impl CharacterAbilities {
    pub fn new(config: &GameplayConfig) -> Self {
        Self {
            dash: Cooldown::new(TimerToken::DashCooldown, config.dash_cooldown),
            slow_motion: SlowMotion::default(),
            possession: PossessionLink::default(),
        }
    }
}

//! Character look, movement intent, aim, and camera systems.
//!
//! ## Pipeline (runs in order every `Update` frame)
//!
//! 1. [`character_look_system`]: aim edges, camera-side switch, mouse and
//!    rate look input → control rotation → body yaw + camera arm.
//! 2. [`character_move_intent_system`]: movement axes in the yaw-only frame
//!    and jump → [`CharacterMovement`].
//! 3. [`camera_zoom_system`]: FOV toward zoomed / default.
//!
//! Steps 1–2 only touch the [`Possessed`] character, so while a drone is
//! flying the character stands still and keeps its aim.

use super::state::{CharacterLook, ShooterCharacter};
use crate::camera::CameraRig;
use crate::config::GameplayConfig;
use crate::input::{ControlInput, Possessed};
use crate::interp::finterp_to;
use crate::movement::CharacterMovement;
use bevy::prelude::*;

// ── Step 1: Look ──────────────────────────────────────────────────────────────

/// Apply one frame of look input to `look`.
///
/// Mouse input is positional (`value * scale * controller_input_scale`);
/// rate input is `rate * base_rate * dt`.
pub fn apply_look_input(
    look: &mut CharacterLook,
    input: &ControlInput,
    config: &GameplayConfig,
    dt: f32,
) {
    if input.aim_pressed {
        look.aiming = true;
    }
    if input.aim_released {
        look.aiming = false;
    }

    let (mouse_turn, mouse_look_up) = look.mouse_scales(config);
    let (base_turn, base_look_up) = look.look_rates(config);
    let yaw = input.turn * mouse_turn * config.controller_input_scale
        + input.turn_rate * base_turn * dt;
    let pitch = input.look_up * mouse_look_up * config.controller_input_scale
        + input.look_up_rate * base_look_up * dt;
    if yaw != 0.0 || pitch != 0.0 {
        look.add_look(yaw, pitch, config);
    }
}

pub fn character_look_system(
    time: Res<Time>,
    input: Res<ControlInput>,
    config: Res<GameplayConfig>,
    mut q: Query<
        (&mut CharacterLook, &mut CameraRig, &mut Transform),
        (With<ShooterCharacter>, With<Possessed>),
    >,
) {
    let Ok((mut look, mut rig, mut transform)) = q.single_mut() else {
        return;
    };
    apply_look_input(&mut look, &input, &config, time.delta_secs());

    if input.switch_camera_side {
        rig.socket_offset.x = -rig.socket_offset.x;
        debug!("[character] camera side switched (offset {})", rig.socket_offset.x);
    }

    rig.arm_rotation = look.control;
    transform.rotation = look.control.yaw_only().to_quat();
}

// ── Step 2: Movement intent ───────────────────────────────────────────────────

pub fn character_move_intent_system(
    input: Res<ControlInput>,
    mut q: Query<(&CharacterLook, &mut CharacterMovement), (With<ShooterCharacter>, With<Possessed>)>,
) {
    let Ok((look, mut movement)) = q.single_mut() else {
        return;
    };
    let frame = look.control.yaw_only();
    movement.input = frame.forward() * input.move_forward + frame.right() * input.move_right;
    if input.jump_pressed {
        movement.jump = true;
    }
}

// ── Step 3: Zoom ──────────────────────────────────────────────────────────────

/// Interpolate every character camera toward its aim-dependent FOV.
pub fn camera_zoom_system(
    time: Res<Time>,
    config: Res<GameplayConfig>,
    mut q: Query<(&CharacterLook, &mut CameraRig), With<ShooterCharacter>>,
) {
    let dt = time.delta_secs();
    for (look, mut rig) in q.iter_mut() {
        rig.fov = finterp_to(rig.fov, look.target_fov(&config), dt, config.zoom_interp_speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_input_never_reorients() {
        let cfg = GameplayConfig::default();
        let mut look = CharacterLook::default();
        look.control.pitch = 12.0;
        look.control.yaw = -33.0;
        let before = look.control;
        apply_look_input(&mut look, &ControlInput::default(), &cfg, 0.016);
        assert_eq!(look.control, before);
    }

    #[test]
    fn aiming_damps_mouse_look() {
        let cfg = GameplayConfig::default();
        let input = ControlInput {
            turn: 1.0,
            ..default()
        };
        let mut hip = CharacterLook::default();
        apply_look_input(&mut hip, &input, &cfg, 0.016);
        let mut aimed = CharacterLook {
            aiming: true,
            ..default()
        };
        apply_look_input(&mut aimed, &input, &cfg, 0.016);
        assert!((aimed.control.yaw - hip.control.yaw * 0.2).abs() < 1e-4);
    }

    #[test]
    fn rate_input_scales_with_dt() {
        let cfg = GameplayConfig::default();
        let input = ControlInput {
            turn_rate: 1.0,
            ..default()
        };
        let mut look = CharacterLook::default();
        apply_look_input(&mut look, &input, &cfg, 0.5);
        assert!((look.control.yaw - 45.0).abs() < 1e-4);
    }

    #[test]
    fn aim_edges_toggle_state() {
        let cfg = GameplayConfig::default();
        let mut look = CharacterLook::default();
        let press = ControlInput {
            aim_pressed: true,
            ..default()
        };
        apply_look_input(&mut look, &press, &cfg, 0.016);
        assert!(look.aiming);
        let release = ControlInput {
            aim_released: true,
            ..default()
        };
        apply_look_input(&mut look, &release, &cfg, 0.016);
        assert!(!look.aiming);
    }

    #[test]
    fn zoom_converges_to_aimed_fov() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<GameplayConfig>();
        app.insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
            std::time::Duration::from_millis(50),
        ));
        app.add_systems(Update, camera_zoom_system);
        let e = app
            .world_mut()
            .spawn((
                ShooterCharacter,
                CharacterLook {
                    aiming: true,
                    ..default()
                },
                CameraRig::new(250.0, Vec3::ZERO, 90.0),
            ))
            .id();
        for _ in 0..10 {
            app.update();
        }
        let fov = app.world().get::<CameraRig>(e).unwrap().fov;
        assert_eq!(fov, 50.0, "dt * rate >= 1 snaps to target");
    }
}

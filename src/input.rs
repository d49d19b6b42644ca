//! Device input → [`ControlInput`].
//!
//! ## Pipeline
//!
//! 1. [`keyboard_mouse_to_input_system`]: WASD / mouse look / action keys.
//! 2. [`gamepad_to_input_system`]: sticks and buttons of the preferred pad.
//! 3. [`control_input_clear_system`]: resets `ControlInput` to neutral in
//!    `Last`, after every consumer has run.
//!
//! Gameplay systems only ever read `ControlInput`, so tests drive the
//! character and drone by filling the resource directly.  Whichever entity
//! carries [`Possessed`] consumes it.
//!
//! | Action            | Keyboard / mouse | Gamepad            |
//! |-------------------|------------------|--------------------|
//! | Move              | W A S D          | Left stick         |
//! | Up / down (drone) | Space / Ctrl     | South / East       |
//! | Jump              | Space            | South              |
//! | Look              | Mouse            | Right stick (rate) |
//! | Fire              | Left button      | Right trigger      |
//! | Aim               | Right button     | Left trigger       |
//! | Dash / boost      | Left Shift       | West               |
//! | Fire mode         | Q                | North              |
//! | Camera side       | Tab              | Right thumb        |
//! | Slow motion       | T                | Left bumper        |
//! | Drone             | F                | Right bumper       |

use crate::config::GameplayConfig;
use bevy::input::gamepad::{GamepadConnection, GamepadConnectionEvent};
use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;

/// Marker for the entity that currently receives [`ControlInput`].
///
/// Exactly one entity carries it at a time; possession moves it.
#[derive(Component, Debug, Default)]
pub struct Possessed;

/// Per-frame control intent, rebuilt from scratch every frame.
///
/// Axis fields are continuous; the `*_pressed` / `*_released` flags are edges
/// that are `true` for exactly one frame.
#[derive(Resource, Debug, Default, Clone)]
pub struct ControlInput {
    /// Forward axis in `[-1, 1]`.
    pub move_forward: f32,
    /// Right axis in `[-1, 1]`.
    pub move_right: f32,
    /// Up axis in `[-1, 1]`; only the drone flies.
    pub move_up: f32,
    /// Positional turn input (mouse), in look-axis units.
    pub turn: f32,
    /// Positional look-up input (mouse), in look-axis units.
    pub look_up: f32,
    /// Rate turn input (stick / keys) in `[-1, 1]`; scaled by dt downstream.
    pub turn_rate: f32,
    /// Rate look-up input in `[-1, 1]`.
    pub look_up_rate: f32,

    pub fire_pressed: bool,
    pub fire_released: bool,
    pub aim_pressed: bool,
    pub aim_released: bool,
    pub jump_pressed: bool,
    pub dash: bool,
    pub switch_fire_mode: bool,
    pub switch_camera_side: bool,
    pub slow_motion: bool,
    pub drone_ability: bool,
}

/// Tracks the most recently connected gamepad.
#[derive(Resource, Default)]
pub struct PreferredGamepad(pub Option<Entity>);

// ── Step 1: Keyboard + mouse ──────────────────────────────────────────────────

/// Translate keyboard keys, mouse buttons, and mouse motion into [`ControlInput`].
pub fn keyboard_mouse_to_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    buttons: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    config: Res<GameplayConfig>,
    mut input: ResMut<ControlInput>,
) {
    let axis = |pos: KeyCode, neg: KeyCode| -> f32 {
        (keys.pressed(pos) as i8 - keys.pressed(neg) as i8) as f32
    };
    input.move_forward = axis(KeyCode::KeyW, KeyCode::KeyS);
    input.move_right = axis(KeyCode::KeyD, KeyCode::KeyA);
    input.move_up = axis(KeyCode::Space, KeyCode::ControlLeft);
    input.turn_rate = axis(KeyCode::ArrowRight, KeyCode::ArrowLeft);
    input.look_up_rate = axis(KeyCode::ArrowUp, KeyCode::ArrowDown);

    // Screen Y grows downward; moving the mouse up looks up.
    input.turn = motion.delta.x * config.mouse_axis_per_pixel;
    input.look_up = -motion.delta.y * config.mouse_axis_per_pixel;

    input.fire_pressed = buttons.just_pressed(MouseButton::Left);
    input.fire_released = buttons.just_released(MouseButton::Left);
    input.aim_pressed = buttons.just_pressed(MouseButton::Right);
    input.aim_released = buttons.just_released(MouseButton::Right);
    input.jump_pressed = keys.just_pressed(KeyCode::Space);
    input.dash = keys.just_pressed(KeyCode::ShiftLeft);
    input.switch_fire_mode = keys.just_pressed(KeyCode::KeyQ);
    input.switch_camera_side = keys.just_pressed(KeyCode::Tab);
    input.slow_motion = keys.just_pressed(KeyCode::KeyT);
    input.drone_ability = keys.just_pressed(KeyCode::KeyF);
}

// ── Step 2: Gamepad ───────────────────────────────────────────────────────────

/// Track gamepad connect / disconnect events and update [`PreferredGamepad`].
pub fn gamepad_connection_system(
    mut events: MessageReader<GamepadConnectionEvent>,
    mut preferred: ResMut<PreferredGamepad>,
) {
    for event in events.read() {
        match &event.connection {
            GamepadConnection::Connected { .. } => {
                preferred.0 = Some(event.gamepad);
                info!("[gamepad] Gamepad {:?} connected (now preferred)", event.gamepad);
            }
            GamepadConnection::Disconnected => {
                info!("[gamepad] Gamepad {:?} disconnected", event.gamepad);
                if preferred.0 == Some(event.gamepad) {
                    preferred.0 = None;
                }
            }
        }
    }
}

/// Merge the preferred gamepad into [`ControlInput`].
///
/// Stick axes only override the keyboard when outside the dead zone; button
/// edges are OR-ed in.
pub fn gamepad_to_input_system(
    preferred: Res<PreferredGamepad>,
    gamepads: Query<&Gamepad>,
    config: Res<GameplayConfig>,
    mut input: ResMut<ControlInput>,
) {
    let Some(gamepad_entity) = preferred.0 else {
        return;
    };
    let Ok(gamepad) = gamepads.get(gamepad_entity) else {
        return;
    };

    let dz = config.gamepad_deadzone;
    let stick = |axis: GamepadAxis| -> Option<f32> {
        gamepad.get(axis).filter(|v| v.abs() >= dz)
    };
    if let Some(v) = stick(GamepadAxis::LeftStickY) {
        input.move_forward = v;
    }
    if let Some(v) = stick(GamepadAxis::LeftStickX) {
        input.move_right = v;
    }
    if let Some(v) = stick(GamepadAxis::RightStickX) {
        input.turn_rate = v;
    }
    if let Some(v) = stick(GamepadAxis::RightStickY) {
        input.look_up_rate = v;
    }
    if gamepad.pressed(GamepadButton::South) {
        input.move_up = 1.0;
    } else if gamepad.pressed(GamepadButton::East) {
        input.move_up = -1.0;
    }

    input.fire_pressed |= gamepad.just_pressed(GamepadButton::RightTrigger2);
    input.fire_released |= gamepad.just_released(GamepadButton::RightTrigger2);
    input.aim_pressed |= gamepad.just_pressed(GamepadButton::LeftTrigger2);
    input.aim_released |= gamepad.just_released(GamepadButton::LeftTrigger2);
    input.jump_pressed |= gamepad.just_pressed(GamepadButton::South);
    input.dash |= gamepad.just_pressed(GamepadButton::West);
    input.switch_fire_mode |= gamepad.just_pressed(GamepadButton::North);
    input.switch_camera_side |= gamepad.just_pressed(GamepadButton::RightThumb);
    input.slow_motion |= gamepad.just_pressed(GamepadButton::LeftTrigger);
    input.drone_ability |= gamepad.just_pressed(GamepadButton::RightTrigger);
}

// ── Step 3: Clear ─────────────────────────────────────────────────────────────

pub fn control_input_clear_system(mut input: ResMut<ControlInput>) {
    *input = ControlInput::default();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<ControlInput>();
        app.init_resource::<GameplayConfig>();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.init_resource::<ButtonInput<MouseButton>>();
        app.init_resource::<AccumulatedMouseMotion>();
        app.add_systems(
            Update,
            (control_input_clear_system, keyboard_mouse_to_input_system).chain(),
        );
        app
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut app = input_app();
        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.press(KeyCode::KeyW);
            keys.press(KeyCode::KeyS);
            keys.press(KeyCode::KeyD);
        }
        app.update();
        let input = app.world().resource::<ControlInput>();
        assert_eq!(input.move_forward, 0.0);
        assert_eq!(input.move_right, 1.0);
    }

    #[test]
    fn mouse_up_looks_up() {
        let mut app = input_app();
        app.world_mut().resource_mut::<AccumulatedMouseMotion>().delta = Vec2::new(10.0, -20.0);
        app.update();
        let input = app.world().resource::<ControlInput>();
        let per_px = GameplayConfig::default().mouse_axis_per_pixel;
        assert!((input.turn - 10.0 * per_px).abs() < 1e-6);
        assert!((input.look_up - 20.0 * per_px).abs() < 1e-6);
    }

    #[test]
    fn fire_edges_last_one_frame() {
        let mut app = input_app();
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();
        assert!(app.world().resource::<ControlInput>().fire_pressed);
        // Nothing clears `just_pressed` without the input plugin, so do it here.
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .clear();
        app.update();
        assert!(!app.world().resource::<ControlInput>().fire_pressed);
    }
}

//! Character firing and crosshair spread.
//!
//! - [`character_fire_input_system`]: press / release / mode switch edges.
//! - [`character_fire_system`]: fire every queued shot through the shared
//!   [`plan_shot`] procedure, arm the auto-fire and spread timers.
//! - [`crosshair_spread_system`]: per-frame spread factors.

use super::state::{CharacterLook, CrosshairSpread, FireControl, ShooterCharacter, ShotKind};
use crate::camera::{rig_crosshair_ray, CameraRig, GameCamera};
use crate::combat::{plan_shot, ShotOrigin, ShotWriters, Weapon};
use crate::config::GameplayConfig;
use crate::effects::{PlaySound, SoundCue};
use crate::input::{ControlInput, Possessed};
use crate::movement::CharacterMovement;
use crate::scheduler::{AbilityTimers, TimerToken};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Translate fire-button edges and the mode switch into [`FireControl`].
pub fn character_fire_input_system(
    input: Res<ControlInput>,
    mut q: Query<&mut FireControl, (With<ShooterCharacter>, With<Possessed>)>,
    mut sounds: MessageWriter<PlaySound>,
) {
    let Ok(mut fire) = q.single_mut() else {
        return;
    };
    if input.switch_fire_mode {
        fire.toggle_mode();
        sounds.write(PlaySound {
            cue: SoundCue::SwitchMode,
        });
        debug!("[character] automatic fire: {}", fire.auto_enabled);
    }
    if input.fire_pressed {
        fire.press();
    }
    if input.fire_released {
        fire.release();
    }
}

/// Mark the crosshair as firing and arm the timer that clears it.
pub fn start_crosshair_shot(
    spread: &mut CrosshairSpread,
    timers: &mut AbilityTimers,
    config: &GameplayConfig,
) {
    spread.firing = true;
    timers.schedule(TimerToken::ShotSpread, config.shoot_spread_duration);
}

/// Fire every queued character shot.
#[allow(clippy::type_complexity)]
pub fn character_fire_system(
    rapier_context: ReadRapierContext,
    config: Res<GameplayConfig>,
    cameras: Query<&Camera, With<GameCamera>>,
    mut q: Query<
        (
            Entity,
            &Transform,
            &CharacterLook,
            &CameraRig,
            &Weapon,
            &mut FireControl,
            &mut CrosshairSpread,
            &mut AbilityTimers,
        ),
        With<ShooterCharacter>,
    >,
    mut writers: ShotWriters,
) {
    let Ok(rapier) = rapier_context.single() else {
        return;
    };
    let camera = cameras.single().ok();
    for (entity, transform, look, rig, weapon, mut fire, mut spread, mut timers) in q.iter_mut() {
        while let Some(kind) = fire.take_shot() {
            let origin = ShotOrigin {
                shooter: entity,
                pivot: transform.translation,
                aim: look.control,
                crosshair: camera.and_then(|c| rig_crosshair_ray(c, rig, transform.translation)),
            };
            writers.emit(plan_shot(&rapier, weapon, &origin));
            start_crosshair_shot(&mut spread, &mut timers, &config);
            if kind == ShotKind::Automatic {
                let delay = fire.next_auto_delay(config.automatic_fire_interval);
                timers.schedule(TimerToken::AutoFireReset, delay);
            }
        }
    }
}

/// Refresh every character's crosshair spread factors.
pub fn crosshair_spread_system(
    time: Res<Time>,
    config: Res<GameplayConfig>,
    mut q: Query<(&Velocity, &CharacterMovement, &CharacterLook, &mut CrosshairSpread)>,
) {
    let dt = time.delta_secs();
    for (velocity, movement, look, mut spread) in q.iter_mut() {
        let horizontal = Vec2::new(velocity.linvel.x, velocity.linvel.z).length();
        spread.update(horizontal, movement.is_falling(), look.aiming, dt, &config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_switch_plays_sound_and_toggles() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<PlaySound>();
        app.insert_resource(ControlInput {
            switch_fire_mode: true,
            fire_pressed: true,
            ..default()
        });
        app.add_systems(Update, character_fire_input_system);
        let e = app
            .world_mut()
            .spawn((ShooterCharacter, Possessed, FireControl::default()))
            .id();
        app.update();
        let fire = app.world().get::<FireControl>(e).unwrap();
        assert!(!fire.auto_enabled);
        assert_eq!(fire.pending_shots, 1);
        let sounds = app.world().resource::<Messages<PlaySound>>();
        let cues: Vec<_> = sounds.iter_current_update_messages().map(|m| m.cue).collect();
        assert_eq!(cues, vec![SoundCue::SwitchMode]);
    }

    #[test]
    fn unpossessed_character_ignores_fire_input() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<PlaySound>();
        app.insert_resource(ControlInput {
            fire_pressed: true,
            ..default()
        });
        app.add_systems(Update, character_fire_input_system);
        let e = app
            .world_mut()
            .spawn((ShooterCharacter, FireControl::default()))
            .id();
        app.update();
        assert_eq!(app.world().get::<FireControl>(e).unwrap().pending_shots, 0);
    }

    #[test]
    fn shot_raises_spread_for_its_duration() {
        let cfg = GameplayConfig::default();
        let mut spread = CrosshairSpread::default();
        let mut timers = AbilityTimers::default();
        start_crosshair_shot(&mut spread, &mut timers, &cfg);
        assert!(spread.firing);
        assert_eq!(timers.remaining(TimerToken::ShotSpread), Some(cfg.shoot_spread_duration));
    }
}

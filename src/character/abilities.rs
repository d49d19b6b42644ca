//! Character abilities and timer dispatch.
//!
//! | Ability      | Trigger        | Gate                               | Timer                  |
//! |--------------|----------------|------------------------------------|------------------------|
//! | Dash         | `dash`         | ready, moving, grounded            | `DashCooldown`         |
//! | Slow motion  | `slow_motion`  | none (toggle)                      | none                   |
//! | Drone        | `drone_ability`| grounded, no live drone, not cooling | `DroneReturn`        |
//!
//! [`character_timer_system`] is the single place where expired character
//! timers are handled.

use super::state::{CharacterAbilities, CharacterLook, CrosshairSpread, FireControl, ShooterCharacter};
use crate::ability::TimeDilation;
use crate::config::GameplayConfig;
use crate::drone::spawn_drone;
use crate::effects::{PlaySound, SoundCue};
use crate::input::{ControlInput, Possessed};
use crate::movement::{stop_movement, CharacterMovement};
use crate::scheduler::{AbilityTimers, TimerToken};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

// ── Dash ──────────────────────────────────────────────────────────────────────

/// Launch the character along its current velocity.
///
/// Rejected while cooling down, standing still, or airborne.  On success the
/// launch is `velocity * dash_force_multiplier` and this frame's movement
/// input is dropped.
pub fn try_dash(
    abilities: &mut CharacterAbilities,
    movement: &mut CharacterMovement,
    velocity: &Velocity,
    timers: &mut AbilityTimers,
    config: &GameplayConfig,
) -> bool {
    if !abilities.dash.is_ready()
        || velocity.linvel.length_squared() <= f32::EPSILON
        || movement.is_falling()
    {
        return false;
    }
    abilities.dash.duration = config.dash_cooldown;
    if !abilities.dash.try_activate(timers) {
        return false;
    }
    movement.launch(velocity.linvel * config.dash_force_multiplier);
    movement.input = Vec3::ZERO;
    true
}

// ── Drone possession ──────────────────────────────────────────────────────────

/// Drone spawn position: above the character, shifted along world +X.
///
/// The offset is in world axes and does not turn with the character.
pub fn drone_spawn_point(pivot: Vec3, config: &GameplayConfig) -> Vec3 {
    let [side, up] = config.drone_spawn_offset;
    pivot + Vec3::new(side, up, 0.0)
}

// ── Input → abilities ─────────────────────────────────────────────────────────

#[allow(clippy::type_complexity, clippy::too_many_arguments)]
pub fn character_ability_input_system(
    mut commands: Commands,
    input: Res<ControlInput>,
    config: Res<GameplayConfig>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut q: Query<
        (
            Entity,
            &Transform,
            &CharacterLook,
            &mut CharacterAbilities,
            &mut CharacterMovement,
            &mut Velocity,
            &mut FireControl,
            &mut AbilityTimers,
        ),
        (With<ShooterCharacter>, With<Possessed>),
    >,
    mut sounds: MessageWriter<PlaySound>,
) {
    let Ok((entity, transform, look, mut abilities, mut movement, mut velocity, mut fire, mut timers)) =
        q.single_mut()
    else {
        return;
    };

    if input.dash {
        if try_dash(&mut abilities, &mut movement, &velocity, &mut timers, &config) {
            sounds.write(PlaySound { cue: SoundCue::Dash });
            debug!("[character] dash");
        } else {
            debug!("[character] dash rejected");
        }
    }

    if input.slow_motion {
        let cue = abilities
            .slow_motion
            .toggle(&mut *virtual_time, config.slow_motion_dilation);
        sounds.write(PlaySound { cue });
        info!("[character] time dilation {}", virtual_time.dilation());
    }

    if input.drone_ability {
        if let Err(reason) = abilities.possession.can_begin(movement.is_falling()) {
            debug!("[character] drone rejected: {reason:?}");
            return;
        }
        let spawn_at = drone_spawn_point(transform.translation, &config);
        let drone = spawn_drone(
            &mut commands,
            Transform::from_translation(spawn_at).with_rotation(transform.rotation),
            look.control.yaw_only(),
            entity,
            &config,
        );
        abilities
            .possession
            .begin(drone, &mut timers, config.drone_possession_time);
        stop_movement(&mut movement, &mut velocity);
        fire.release();
        commands.entity(entity).remove::<Possessed>();
        info!("✓ Possessed drone {drone:?} for {}s", config.drone_possession_time);
    }
}

// ── Timers ────────────────────────────────────────────────────────────────────

/// Tick character timers with virtual time and handle every expiry.
#[allow(clippy::type_complexity)]
pub fn character_timer_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameplayConfig>,
    mut q: Query<
        (
            Entity,
            &mut AbilityTimers,
            &mut CharacterAbilities,
            &mut FireControl,
            &mut CrosshairSpread,
        ),
        With<ShooterCharacter>,
    >,
) {
    let dt = time.delta_secs();
    for (entity, mut timers, mut abilities, mut fire, mut spread) in q.iter_mut() {
        for (token, overshoot) in timers.tick(dt) {
            match token {
                TimerToken::DashCooldown => {
                    abilities.dash.on_timer(token);
                }
                TimerToken::AutoFireReset => fire.on_reset(overshoot),
                TimerToken::ShotSpread => spread.firing = false,
                TimerToken::DroneReturn => {
                    let Some(drone) = abilities
                        .possession
                        .end(&mut timers, config.drone_ability_cooldown)
                    else {
                        continue;
                    };
                    if let Ok(mut drone_commands) = commands.get_entity(drone) {
                        drone_commands.despawn();
                    }
                    commands.entity(entity).insert(Possessed);
                    info!("✓ Drone {drone:?} returned; control back to character");
                }
                TimerToken::DroneAbilityCooldown => abilities.possession.cooling = false,
                TimerToken::BoostCooldown => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded() -> CharacterMovement {
        CharacterMovement {
            grounded: true,
            ..default()
        }
    }

    #[test]
    fn dash_launches_along_velocity() {
        let cfg = GameplayConfig::default();
        let mut abilities = CharacterAbilities::new(&cfg);
        let mut movement = grounded();
        let mut timers = AbilityTimers::default();
        let vel = Velocity::linear(Vec3::new(0.0, 0.0, -600.0));
        assert!(try_dash(&mut abilities, &mut movement, &vel, &mut timers, &cfg));
        assert_eq!(movement.launch, Some(Vec3::new(0.0, 0.0, -3900.0)));
        assert!(timers.is_pending(TimerToken::DashCooldown));
    }

    #[test]
    fn dash_rejected_when_airborne_still_or_cooling() {
        let cfg = GameplayConfig::default();
        let mut timers = AbilityTimers::default();
        let moving = Velocity::linear(Vec3::X * 300.0);

        let mut abilities = CharacterAbilities::new(&cfg);
        let mut airborne = CharacterMovement::default();
        assert!(!try_dash(&mut abilities, &mut airborne, &moving, &mut timers, &cfg));

        let mut movement = grounded();
        assert!(!try_dash(&mut abilities, &mut movement, &Velocity::zero(), &mut timers, &cfg));

        assert!(try_dash(&mut abilities, &mut movement, &moving, &mut timers, &cfg));
        movement.launch = None;
        assert!(!try_dash(&mut abilities, &mut movement, &moving, &mut timers, &cfg));
        assert!(movement.launch.is_none());

        for (token, _) in timers.tick(cfg.dash_cooldown) {
            abilities.dash.on_timer(token);
        }
        assert!(try_dash(&mut abilities, &mut movement, &moving, &mut timers, &cfg));
    }

    #[test]
    fn drone_spawns_above_and_beside() {
        let cfg = GameplayConfig::default();
        let p = drone_spawn_point(Vec3::new(10.0, 90.0, -30.0), &cfg);
        assert!((p - Vec3::new(60.0, 290.0, -30.0)).length() < 1e-4);
    }
}

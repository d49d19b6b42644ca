//! Drone fire and boost.

use super::{Drone, DroneFlight};
use crate::camera::{rig_crosshair_ray, CameraRig, GameCamera};
use crate::combat::{plan_shot, ShotOrigin, ShotWriters, Weapon};
use crate::config::GameplayConfig;
use crate::input::{ControlInput, Possessed};
use crate::scheduler::AbilityTimers;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Multiply the drone's velocity if the boost is ready.
pub fn try_boost(
    flight: &mut DroneFlight,
    velocity: &mut Velocity,
    timers: &mut AbilityTimers,
    config: &GameplayConfig,
) -> bool {
    flight.boost.duration = config.drone_boost_cooldown;
    if !flight.boost.try_activate(timers) {
        return false;
    }
    velocity.linvel *= config.drone_boost_multiplier;
    true
}

pub fn drone_boost_system(
    input: Res<ControlInput>,
    config: Res<GameplayConfig>,
    mut q: Query<(&mut DroneFlight, &mut Velocity, &mut AbilityTimers), (With<Drone>, With<Possessed>)>,
) {
    if !input.dash {
        return;
    }
    let Ok((mut flight, mut velocity, mut timers)) = q.single_mut() else {
        return;
    };
    if try_boost(&mut flight, &mut velocity, &mut timers, &config) {
        debug!("[drone] boost to {:.0} u/s", velocity.linvel.length());
    } else {
        debug!("[drone] boost rejected: cooling down");
    }
}

/// One shot per fire press; the drone has no automatic mode.
pub fn drone_fire_system(
    input: Res<ControlInput>,
    rapier_context: ReadRapierContext,
    cameras: Query<&Camera, With<GameCamera>>,
    q: Query<(Entity, &Transform, &DroneFlight, &CameraRig, &Weapon), (With<Drone>, With<Possessed>)>,
    mut writers: ShotWriters,
) {
    if !input.fire_pressed {
        return;
    }
    let Ok((entity, transform, flight, rig, weapon)) = q.single() else {
        return;
    };
    let Ok(rapier) = rapier_context.single() else {
        return;
    };
    let origin = ShotOrigin {
        shooter: entity,
        pivot: transform.translation,
        aim: flight.body,
        crosshair: cameras
            .single()
            .ok()
            .and_then(|c| rig_crosshair_ray(c, rig, transform.translation)),
    };
    writers.emit(plan_shot(&rapier, weapon, &origin));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::Rotator;
    use crate::scheduler::TimerToken;

    #[test]
    fn boost_doubles_velocity_then_cools_down() {
        let cfg = GameplayConfig::default();
        let mut flight = DroneFlight::new(Rotator::ZERO, &cfg);
        let mut timers = AbilityTimers::default();
        let mut vel = Velocity::linear(Vec3::new(100.0, 0.0, -300.0));
        assert!(try_boost(&mut flight, &mut vel, &mut timers, &cfg));
        assert_eq!(vel.linvel, Vec3::new(200.0, 0.0, -600.0));
        assert!(!try_boost(&mut flight, &mut vel, &mut timers, &cfg));
        assert_eq!(vel.linvel, Vec3::new(200.0, 0.0, -600.0));
        assert_eq!(timers.remaining(TimerToken::BoostCooldown), Some(cfg.drone_boost_cooldown));
    }

    #[test]
    fn boost_ready_after_timer_system_runs() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
            std::time::Duration::from_millis(250),
        ));
        app.add_systems(Update, super::super::drone_timer_system);
        let cfg = GameplayConfig::default();
        let mut flight = DroneFlight::new(Rotator::ZERO, &cfg);
        let mut timers = AbilityTimers::default();
        let mut vel = Velocity::zero();
        try_boost(&mut flight, &mut vel, &mut timers, &cfg);
        let e = app.world_mut().spawn((flight, timers)).id();
        // First update has dt = 0; then 20 × 0.25 s = 5 s.
        for _ in 0..21 {
            app.update();
        }
        assert!(app.world().get::<DroneFlight>(e).unwrap().boost.is_ready());
    }
}

//! Character walking, jumping, and launches on top of a Rapier dynamic body.
//!
//! Rapier owns position and integrates gravity; this module only rewrites the
//! body's linear velocity once per frame from the pending movement intent:
//!
//! 1. [`ground_check_system`]: short downward ray from the capsule centre.
//! 2. [`character_movement_system`]: launch, jump, then accelerate / brake
//!    the horizontal velocity toward `input * max_walk_speed`.

use crate::config::GameplayConfig;
use crate::trace::RayCaster;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Movement intent and ground state of a walking character.
#[derive(Component, Debug, Default, Clone)]
pub struct CharacterMovement {
    /// Horizontal movement direction; length is clamped to 1 when consumed.
    pub input: Vec3,
    /// Pending launch velocity, applied and cleared on the next step.
    pub launch: Option<Vec3>,
    /// Jump requested this frame.
    pub jump: bool,
    pub grounded: bool,
    /// Whether the last step accelerated under movement input.
    pub accelerating: bool,
}

impl CharacterMovement {
    #[inline]
    pub fn is_falling(&self) -> bool {
        !self.grounded
    }

    /// Queue a launch.  The horizontal part replaces the current horizontal
    /// velocity; the vertical part is added.
    pub fn launch(&mut self, velocity: Vec3) {
        self.launch = Some(velocity);
    }

    /// Drop all pending intent.
    pub fn clear_intent(&mut self) {
        self.input = Vec3::ZERO;
        self.launch = None;
        self.jump = false;
        self.accelerating = false;
    }
}

/// Halt the character: drop pending intent and zero the body velocity.
pub fn stop_movement(movement: &mut CharacterMovement, velocity: &mut Velocity) {
    movement.clear_intent();
    velocity.linvel = Vec3::ZERO;
}

/// Advance `current` velocity by one movement step of `dt` seconds.
///
/// Consumes `movement.input`, `movement.jump`, and `movement.launch`.
pub fn step_velocity(
    current: Vec3,
    movement: &mut CharacterMovement,
    config: &GameplayConfig,
    dt: f32,
) -> Vec3 {
    let input = Vec3::new(movement.input.x, 0.0, movement.input.z).clamp_length_max(1.0);
    let jump = movement.jump;
    movement.input = Vec3::ZERO;
    movement.jump = false;

    if let Some(launch) = movement.launch.take() {
        movement.accelerating = false;
        return Vec3::new(launch.x, current.y + launch.y, launch.z);
    }

    let mut vertical = current.y;
    if jump && movement.grounded {
        vertical = config.jump_velocity;
        movement.grounded = false;
    }

    let horizontal = Vec2::new(current.x, current.z);
    let control = if movement.grounded {
        1.0
    } else {
        config.air_control
    };
    movement.accelerating = input.length_squared() > 0.0;

    let horizontal = if movement.accelerating {
        let target = Vec2::new(input.x, input.z) * config.max_walk_speed;
        horizontal.move_towards(target, config.max_acceleration * control * dt)
    } else if movement.grounded {
        horizontal.move_towards(Vec2::ZERO, config.braking_deceleration * dt)
    } else {
        horizontal
    };

    Vec3::new(horizontal.x, vertical, horizontal.y)
}

/// Cast for ground under every character capsule.
pub fn ground_check_system(
    rapier_context: ReadRapierContext,
    mut q: Query<(Entity, &Transform, &Velocity, &mut CharacterMovement)>,
    config: Res<GameplayConfig>,
) {
    let Ok(rapier) = rapier_context.single() else {
        return;
    };
    for (entity, transform, velocity, mut movement) in q.iter_mut() {
        movement.grounded = check_ground(
            &rapier,
            entity,
            transform.translation,
            velocity.linvel.y,
            &config,
        );
    }
}

/// `true` when blocking geometry lies just under the capsule at `centre`
/// and the body is not rising off it.
pub fn check_ground(
    caster: &impl RayCaster,
    owner: Entity,
    centre: Vec3,
    vertical_speed: f32,
    config: &GameplayConfig,
) -> bool {
    if vertical_speed > config.ground_max_rise_speed {
        return false;
    }
    let reach = config.capsule_half_height + config.capsule_radius + config.ground_check_slack;
    caster
        .cast_segment(centre, centre - Vec3::Y * reach, &[owner])
        .is_some()
}

/// Write the next velocity of every character body.
pub fn character_movement_system(
    time: Res<Time>,
    config: Res<GameplayConfig>,
    mut q: Query<(&mut CharacterMovement, &mut Velocity)>,
) {
    let dt = time.delta_secs();
    for (mut movement, mut velocity) in q.iter_mut() {
        velocity.linvel = step_velocity(velocity.linvel, &mut movement, &config, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::tests::BoxWorld;

    fn grounded() -> CharacterMovement {
        CharacterMovement {
            grounded: true,
            ..default()
        }
    }

    #[test]
    fn walking_accelerates_up_to_max_speed() {
        let cfg = GameplayConfig::default();
        let mut m = grounded();
        let mut v = Vec3::ZERO;
        for _ in 0..120 {
            m.input = Vec3::NEG_Z;
            v = step_velocity(v, &mut m, &cfg, 1.0 / 60.0);
        }
        assert!((v.z + cfg.max_walk_speed).abs() < 1e-2, "v = {v}");
        assert!(m.accelerating);
    }

    #[test]
    fn releasing_input_brakes_to_rest() {
        let cfg = GameplayConfig::default();
        let mut m = grounded();
        let mut v = Vec3::new(600.0, 0.0, 0.0);
        for _ in 0..60 {
            v = step_velocity(v, &mut m, &cfg, 1.0 / 60.0);
        }
        assert_eq!(v, Vec3::ZERO);
        assert!(!m.accelerating);
    }

    #[test]
    fn air_control_scales_acceleration() {
        let cfg = GameplayConfig::default();
        let mut m = CharacterMovement::default();
        m.input = Vec3::X;
        let v = step_velocity(Vec3::ZERO, &mut m, &cfg, 0.1);
        assert!((v.x - cfg.max_acceleration * cfg.air_control * 0.1).abs() < 1e-3);
    }

    #[test]
    fn launch_overrides_horizontal_and_adds_vertical() {
        let cfg = GameplayConfig::default();
        let mut m = grounded();
        m.input = Vec3::X;
        m.launch(Vec3::new(0.0, 100.0, -3900.0));
        let v = step_velocity(Vec3::new(600.0, -10.0, 0.0), &mut m, &cfg, 0.016);
        assert_eq!(v, Vec3::new(0.0, 90.0, -3900.0));
        assert!(m.launch.is_none());
        assert_eq!(m.input, Vec3::ZERO, "movement input is dropped on launch frames");
    }

    #[test]
    fn jump_requires_ground() {
        let cfg = GameplayConfig::default();
        let mut m = CharacterMovement::default();
        m.jump = true;
        let v = step_velocity(Vec3::ZERO, &mut m, &cfg, 0.016);
        assert_eq!(v.y, 0.0);

        let mut m = grounded();
        m.jump = true;
        let v = step_velocity(Vec3::ZERO, &mut m, &cfg, 0.016);
        assert_eq!(v.y, cfg.jump_velocity);
    }

    #[test]
    fn stop_movement_zeroes_velocity() {
        let mut m = grounded();
        m.input = Vec3::X;
        m.launch(Vec3::ONE);
        let mut vel = Velocity::linear(Vec3::new(300.0, 0.0, 0.0));
        stop_movement(&mut m, &mut vel);
        assert_eq!(vel.linvel, Vec3::ZERO);
        assert!(m.launch.is_none());
    }

    #[test]
    fn ground_check_ignores_own_collider() {
        let cfg = GameplayConfig::default();
        let mut world = World::new();
        let (me, floor) = (world.spawn_empty().id(), world.spawn_empty().id());
        let boxes = BoxWorld {
            boxes: vec![
                (me, Vec3::splat(-30.0), Vec3::splat(30.0)),
                (floor, Vec3::new(-500.0, -100.0, -500.0), Vec3::new(500.0, -90.0, 500.0)),
            ],
        };
        assert!(check_ground(&boxes, me, Vec3::ZERO, 0.0, &cfg));
        assert!(!check_ground(&boxes, me, Vec3::Y * 200.0, 0.0, &cfg));
    }

    #[test]
    fn rising_body_is_airborne_within_ground_reach() {
        let cfg = GameplayConfig::default();
        let mut world = World::new();
        let (me, floor) = (world.spawn_empty().id(), world.spawn_empty().id());
        let boxes = BoxWorld {
            boxes: vec![(
                floor,
                Vec3::new(-500.0, -100.0, -500.0),
                Vec3::new(500.0, -90.0, 500.0),
            )],
        };
        // One 240 Hz frame after a jump the body has risen ~2.5 units, still
        // inside the check slack.
        let centre = Vec3::Y * (cfg.jump_velocity / 240.0);
        assert!(check_ground(&boxes, me, centre, 0.0, &cfg));
        assert!(!check_ground(&boxes, me, centre, cfg.jump_velocity, &cfg));

        let mut m = grounded();
        m.grounded = check_ground(&boxes, me, centre, cfg.jump_velocity, &cfg);
        assert!(m.is_falling());
        // Landing: falling or resting bodies are grounded again.
        assert!(check_ground(&boxes, me, Vec3::ZERO, -50.0, &cfg));
    }
}

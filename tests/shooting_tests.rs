//! Headless shooting tests against a real Rapier world.
//!
//! These tests add [`RapierPhysicsPlugin`] on top of [`MinimalPlugins`] so the
//! fire systems find a physics context and traces hit real colliders.  There
//! is no window, so the crosshair cannot be deprojected from a camera; tests
//! that need a hit build the crosshair ray by hand.
//!
//! Covered scenarios:
//! 1. Holding fire through the frame loop keeps the automatic period at 60 Hz.
//! 2. Every character shot raises the crosshair and arms its spread timer.
//! 3. `cast_segment` reports the collider and the point where the ray enters it.
//! 4. A shot through the Rapier world damages the target under the crosshair.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier3d::prelude::*;
use shooter::character::{CrosshairSpread, ShooterCharacter};
use shooter::combat::{plan_shot, Health, ShotOrigin, ShotWriters, Weapon};
use shooter::effects::{PlaySound, SoundCue};
use shooter::input::ControlInput;
use shooter::interp::Rotator;
use shooter::scheduler::{AbilityTimers, TimerToken};
use shooter::simulation::{GameplayPlugin, GameplaySet};
use shooter::trace::{RayCaster, RayHit};
use std::time::Duration;

/// Frame step: 60 Hz.
const STEP: f32 = 1.0 / 60.0;

/// Centre of the target cube, straight ahead of the origin.
const TARGET_CENTRE: Vec3 = Vec3::new(0.0, 50.0, -500.0);
const TARGET_HALF_EXTENT: f32 = 50.0;

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Component)]
struct Target;

/// Fire sounds heard so far.
#[derive(Resource, Default)]
struct FireSounds(u32);

fn count_fire_sounds(mut reader: MessageReader<PlaySound>, mut heard: ResMut<FireSounds>) {
    heard.0 += reader
        .read()
        .filter(|s| s.cue == SoundCue::Fire)
        .count() as u32;
}

/// Build a headless app with physics, a target cube, and the player.
///
/// Runs two frames so the colliders are registered with Rapier.
fn physics_app() -> (App, Entity, Entity) {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        TransformPlugin,
        AssetPlugin::default(),
        bevy::scene::ScenePlugin,
    ))
    .init_asset::<Mesh>()
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
    .add_plugins(GameplayPlugin)
    .init_resource::<FireSounds>()
    .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
        STEP,
    )))
    .add_systems(Update, count_fire_sounds.after(GameplaySet::Effects));

    let target = app
        .world_mut()
        .spawn((
            Target,
            Health::new(10.0),
            Collider::cuboid(TARGET_HALF_EXTENT, TARGET_HALF_EXTENT, TARGET_HALF_EXTENT),
            Transform::from_translation(TARGET_CENTRE),
        ))
        .id();

    app.update();
    app.update();
    let character = app
        .world_mut()
        .query_filtered::<Entity, With<ShooterCharacter>>()
        .single(app.world())
        .expect("one character");
    (app, character, target)
}

fn step_with(app: &mut App, input: ControlInput) {
    *app.world_mut().resource_mut::<ControlInput>() = input;
    app.update();
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn held_fire_keeps_automatic_period_at_60hz() {
    let (mut app, _, _) = physics_app();
    step_with(
        &mut app,
        ControlInput {
            fire_pressed: true,
            ..default()
        },
    );
    assert_eq!(app.world().resource::<FireSounds>().0, 1);

    // 1.05 s held at 0.1 s per shot: floor(10.5) + 1 shots in total.
    for _ in 0..63 {
        app.update();
    }
    assert_eq!(app.world().resource::<FireSounds>().0, 11);

    step_with(
        &mut app,
        ControlInput {
            fire_released: true,
            ..default()
        },
    );
    for _ in 0..30 {
        app.update();
    }
    // The armed reset still completes but queues nothing once released.
    assert_eq!(app.world().resource::<FireSounds>().0, 11);
}

#[test]
fn each_shot_arms_the_spread_timer() {
    let (mut app, character, _) = physics_app();
    step_with(
        &mut app,
        ControlInput {
            fire_pressed: true,
            ..default()
        },
    );
    let timers = app.world().get::<AbilityTimers>(character).expect("timers");
    assert!(timers.is_pending(TimerToken::ShotSpread));
    assert!(timers.is_pending(TimerToken::AutoFireReset));
    let spread = app.world().get::<CrosshairSpread>(character).expect("spread");
    assert!(spread.firing);

    // The spread window (0.05 s) closes after a few frames while the next
    // automatic shot (0.1 s) has not fired yet.
    for _ in 0..4 {
        app.update();
    }
    let spread = app.world().get::<CrosshairSpread>(character).expect("spread");
    assert!(!spread.firing);
}

#[test]
fn rapier_segment_cast_hits_target_face() {
    #[derive(Resource, Default)]
    struct Casts {
        hit: Option<RayHit>,
        ignored: Option<RayHit>,
    }

    let (mut app, _, target) = physics_app();
    app.init_resource::<Casts>().add_systems(
        Update,
        move |rapier_context: ReadRapierContext, mut casts: ResMut<Casts>| {
            let Ok(rapier) = rapier_context.single() else {
                return;
            };
            let start = Vec3::new(0.0, 50.0, -200.0);
            let end = Vec3::new(0.0, 50.0, -1000.0);
            casts.hit = rapier.cast_segment(start, end, &[]);
            casts.ignored = rapier.cast_segment(start, end, &[target]);
        },
    );
    app.update();

    let casts = app.world().resource::<Casts>();
    let hit = casts.hit.expect("target on the segment");
    assert_eq!(hit.entity, target);
    let face = TARGET_CENTRE + Vec3::Z * TARGET_HALF_EXTENT;
    assert!((hit.point - face).length() < 0.5, "hit at {}", hit.point);
    assert!(casts.ignored.is_none());
}

#[test]
fn shot_through_rapier_damages_crosshair_target() {
    let (mut app, character, target) = physics_app();
    app.add_systems(
        Update,
        (move |rapier_context: ReadRapierContext,
               weapons: Query<&Weapon>,
               mut writers: ShotWriters,
               mut fired: Local<bool>| {
            if *fired {
                return;
            }
            let (Ok(rapier), Ok(weapon)) = (rapier_context.single(), weapons.get(character))
            else {
                return;
            };
            let origin = ShotOrigin {
                shooter: character,
                pivot: Vec3::new(0.0, 50.0, -150.0),
                aim: Rotator::ZERO,
                crosshair: Some(Ray3d::new(Vec3::new(0.0, 50.0, -200.0), Dir3::NEG_Z)),
            };
            let plan = plan_shot(&rapier, weapon, &origin);
            assert!(plan.hit());
            writers.emit(plan);
            *fired = true;
        })
        .in_set(GameplaySet::Control),
    );
    app.update();

    let health = app.world().get::<Health>(target).expect("target alive");
    assert_eq!(health.hp, 9.0);
}

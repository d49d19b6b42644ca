//! Presentation: arena, meshes, lights, game camera, audio and particle
//! drawing.
//!
//! ## Layer model
//!
//! | Layer              | Technology              | Source                          |
//! |--------------------|-------------------------|---------------------------------|
//! | Arena floor        | `Mesh3d` + fixed body   | [`setup_arena`]                 |
//! | Targets            | `Mesh3d` + `Health`     | [`setup_arena`]                 |
//! | Character capsule  | `Mesh3d`                | [`attach_character_mesh_system`]|
//! | Drone sphere       | `Mesh3d`                | [`attach_drone_mesh_system`]    |
//! | Sparks, beams      | Gizmos                  | `particle_gizmo_system`         |
//! | Sounds             | `AudioPlayer`           | `play_sound_system`             |
//!
//! Nothing here changes gameplay state; the plugin only needs bevy's default
//! render and audio plugins on top of [`GameplayPlugin`].
//!
//! [`GameplayPlugin`]: crate::simulation::GameplayPlugin

use crate::camera::{follow_camera_system, GameCamera};
use crate::character::ShooterCharacter;
use crate::combat::Health;
use crate::config::{load_gameplay_config, GameplayConfig};
use crate::drone::Drone;
use crate::effects::{load_effect_assets, particle_gizmo_system, play_sound_system};
use crate::simulation::GameplaySet;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Number of targets placed on the ring around the spawn point.
const TARGET_COUNT: usize = 8;
/// Ring radius for targets, in centimetres.
const TARGET_RING_RADIUS: f32 = 1500.0;
/// Half extent of a target cube.
const TARGET_HALF_EXTENT: f32 = 50.0;
/// Half extent of the square floor.
const FLOOR_HALF_EXTENT: f32 = 5000.0;
/// Half thickness of the floor slab; its top face sits at y = 0.
const FLOOR_HALF_THICKNESS: f32 = 10.0;

pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.52, 0.62, 0.75)))
            .add_systems(
                Startup,
                (
                    setup_physics_config.after(load_gameplay_config),
                    setup_arena.after(load_gameplay_config),
                    load_effect_assets,
                ),
            )
            .add_systems(
                Update,
                (attach_character_mesh_system, attach_drone_mesh_system)
                    .in_set(GameplaySet::Effects),
            )
            .add_systems(
                Update,
                (play_sound_system, particle_gizmo_system, follow_camera_system)
                    .after(GameplaySet::Effects),
            );
    }
}

/// Point Rapier gravity down the world Y axis with the configured magnitude.
pub fn setup_physics_config(
    mut rapier: Query<&mut RapierConfiguration>,
    config: Res<GameplayConfig>,
) {
    for mut cfg in rapier.iter_mut() {
        cfg.gravity = Vec3::NEG_Y * config.gravity;
    }
}

/// Spawn the floor, the ring of targets, the lights and the game camera.
pub fn setup_arena(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<GameplayConfig>,
) {
    // Floor
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(
            FLOOR_HALF_EXTENT * 2.0,
            FLOOR_HALF_THICKNESS * 2.0,
            FLOOR_HALF_EXTENT * 2.0,
        ))),
        MeshMaterial3d(materials.add(Color::srgb(0.30, 0.32, 0.30))),
        RigidBody::Fixed,
        Collider::cuboid(FLOOR_HALF_EXTENT, FLOOR_HALF_THICKNESS, FLOOR_HALF_EXTENT),
        Transform::from_xyz(0.0, -FLOOR_HALF_THICKNESS, 0.0),
    ));

    // Targets
    let target_mesh = meshes.add(Cuboid::from_length(TARGET_HALF_EXTENT * 2.0));
    let target_material = materials.add(Color::srgb(0.78, 0.24, 0.18));
    for i in 0..TARGET_COUNT {
        let angle = i as f32 * std::f32::consts::TAU / TARGET_COUNT as f32;
        commands.spawn((
            Health::new(config.target_health),
            Mesh3d(target_mesh.clone()),
            MeshMaterial3d(target_material.clone()),
            RigidBody::Fixed,
            Collider::cuboid(TARGET_HALF_EXTENT, TARGET_HALF_EXTENT, TARGET_HALF_EXTENT),
            Transform::from_xyz(
                angle.sin() * TARGET_RING_RADIUS,
                TARGET_HALF_EXTENT,
                -angle.cos() * TARGET_RING_RADIUS,
            ),
        ));
    }

    // Lights
    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::YXZ, 0.6, -0.9, 0.0)),
    ));

    // Camera; `follow_camera_system` places it on the possessed rig.
    commands.spawn((
        Camera3d::default(),
        GameCamera,
        Projection::Perspective(PerspectiveProjection {
            fov: config.default_fov.to_radians(),
            far: config.trace_distance * 2.0,
            ..default()
        }),
        Transform::default(),
    ));

    info!(
        "✓ Arena ready: {} targets at {} HP",
        TARGET_COUNT, config.target_health
    );
}

/// Attach a capsule mesh to every new character.
pub fn attach_character_mesh_system(
    mut commands: Commands,
    query: Query<Entity, Added<ShooterCharacter>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<GameplayConfig>,
) {
    for entity in query.iter() {
        let mesh = meshes.add(Capsule3d::new(
            config.capsule_radius,
            config.capsule_half_height * 2.0,
        ));
        commands.entity(entity).insert((
            Mesh3d(mesh),
            MeshMaterial3d(materials.add(Color::srgb(0.15, 0.45, 0.55))),
        ));
    }
}

/// Attach a sphere mesh to every new drone.
pub fn attach_drone_mesh_system(
    mut commands: Commands,
    query: Query<Entity, Added<Drone>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<GameplayConfig>,
) {
    for entity in query.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Sphere::new(config.drone_collider_radius))),
            MeshMaterial3d(materials.add(Color::srgb(0.85, 0.75, 0.20))),
        ));
    }
}

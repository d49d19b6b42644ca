//! Fire-and-forget sound and particle effects.
//!
//! ## Design
//!
//! Gameplay systems never touch audio or meshes directly.  They write a
//! [`PlaySound`] or [`SpawnParticles`] message and move on; the systems in
//! this module turn those messages into entities:
//!
//! | System                   | Purpose                                          |
//! |--------------------------|--------------------------------------------------|
//! | `play_sound_system`      | Spawn a one-shot `AudioPlayer` for known cues    |
//! | `spawn_particles_system` | Spawn sparks / beam entities for particle cues   |
//! | `particle_update_system` | Move, age, and despawn expired particles         |
//! | `beam_update_system`     | Age and despawn beam trails                      |
//! | `particle_gizmo_system`  | Draw particles and beams (render builds only)    |
//!
//! A cue whose sound file is absent from `assets/sounds/` is simply skipped:
//! [`load_effect_assets`] only registers handles for files that exist.

use bevy::prelude::*;
use rand::Rng;
use std::collections::HashMap;
use std::path::Path;

// ── Messages ──────────────────────────────────────────────────────────────────

/// Named sound effects.  All play non-spatially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Character rifle shot (pitch-randomised).
    Fire,
    /// Drone cannon shot.
    DroneFire,
    Dash,
    SlowMotionBegin,
    SlowMotionEnd,
    /// Single / automatic fire mode toggled.
    SwitchMode,
}

impl SoundCue {
    pub const ALL: [SoundCue; 6] = [
        SoundCue::Fire,
        SoundCue::DroneFire,
        SoundCue::Dash,
        SoundCue::SlowMotionBegin,
        SoundCue::SlowMotionEnd,
        SoundCue::SwitchMode,
    ];

    /// Asset path relative to `assets/`.
    pub fn asset_path(self) -> &'static str {
        match self {
            SoundCue::Fire => "sounds/fire.ogg",
            SoundCue::DroneFire => "sounds/drone_fire.ogg",
            SoundCue::Dash => "sounds/dash.ogg",
            SoundCue::SlowMotionBegin => "sounds/slowmo_begin.ogg",
            SoundCue::SlowMotionEnd => "sounds/slowmo_end.ogg",
            SoundCue::SwitchMode => "sounds/switch_mode.ogg",
        }
    }
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaySound {
    pub cue: SoundCue,
}

/// Named particle effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleEffect {
    /// Short flash at the weapon muzzle.
    MuzzleFlash,
    /// Sparks where a shot landed.
    Impact,
    /// Smoke trail from the muzzle; needs `beam_target`.
    Beam,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct SpawnParticles {
    pub effect: ParticleEffect,
    pub transform: Transform,
    /// Beam end point; ignored by non-beam effects.
    pub beam_target: Option<Vec3>,
}

impl SpawnParticles {
    pub fn at(effect: ParticleEffect, location: Vec3) -> Self {
        Self {
            effect,
            transform: Transform::from_translation(location),
            beam_target: None,
        }
    }
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// Sound handles for the cues whose files were found at startup.
#[derive(Resource, Default)]
pub struct EffectAssets {
    sounds: HashMap<SoundCue, Handle<AudioSource>>,
}

impl EffectAssets {
    pub fn sound(&self, cue: SoundCue) -> Option<&Handle<AudioSource>> {
        self.sounds.get(&cue)
    }
}

// ── Components ────────────────────────────────────────────────────────────────

/// Short-lived spark.
#[derive(Component, Debug, Clone)]
pub struct Particle {
    /// World-space velocity (units/s).
    pub velocity: Vec3,
    /// Time alive so far (s).
    pub age: f32,
    /// Total lifetime (s); entity is despawned when `age >= lifetime`.
    pub lifetime: f32,
    pub radius: f32,
    pub color: Color,
}

/// Straight smoke trail between two points.
#[derive(Component, Debug, Clone)]
pub struct BeamTrail {
    pub start: Vec3,
    pub end: Vec3,
    pub age: f32,
    pub lifetime: f32,
}

// ── Startup system ────────────────────────────────────────────────────────────

/// Register a handle for every sound cue whose file exists under `assets/`.
pub fn load_effect_assets(mut assets: ResMut<EffectAssets>, asset_server: Res<AssetServer>) {
    for cue in SoundCue::ALL {
        let path = cue.asset_path();
        if Path::new("assets").join(path).exists() {
            assets.sounds.insert(cue, asset_server.load(path));
        } else {
            debug!("[effects] {path} missing; {cue:?} will be silent");
        }
    }
    info!("✓ Registered {} sound cues", assets.sounds.len());
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Spawn a despawn-on-finish `AudioPlayer` for each requested cue.
pub fn play_sound_system(
    mut commands: Commands,
    mut reader: MessageReader<PlaySound>,
    assets: Res<EffectAssets>,
) {
    let mut rng = rand::thread_rng();
    for request in reader.read() {
        let Some(handle) = assets.sound(request.cue) else {
            continue;
        };
        let speed = match request.cue {
            SoundCue::Fire => rng.gen_range(0.94_f32..1.06_f32),
            _ => 1.0,
        };
        commands.spawn((
            AudioPlayer::new(handle.clone()),
            PlaybackSettings::DESPAWN.with_speed(speed),
        ));
    }
}

/// Turn particle requests into spark / beam entities.
pub fn spawn_particles_system(mut commands: Commands, mut reader: MessageReader<SpawnParticles>) {
    for request in reader.read() {
        match request.effect {
            ParticleEffect::MuzzleFlash => {
                spawn_muzzle_flash(&mut commands, &request.transform);
            }
            ParticleEffect::Impact => {
                spawn_impact_particles(&mut commands, request.transform.translation);
            }
            ParticleEffect::Beam => {
                let Some(end) = request.beam_target else {
                    continue;
                };
                commands.spawn(BeamTrail {
                    start: request.transform.translation,
                    end,
                    age: 0.0,
                    lifetime: 0.25,
                });
            }
        }
    }
}

/// Advance all particles: translate by velocity and despawn any whose age has
/// exceeded their lifetime.
pub fn particle_update_system(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut Particle)>,
) {
    let dt = time.delta_secs();
    for (entity, mut transform, mut particle) in query.iter_mut() {
        particle.age += dt;
        if particle.age >= particle.lifetime {
            commands.entity(entity).despawn();
            continue;
        }
        transform.translation += particle.velocity * dt;
    }
}

/// Age beam trails and despawn the expired ones.
pub fn beam_update_system(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut BeamTrail)>,
) {
    let dt = time.delta_secs();
    for (entity, mut beam) in query.iter_mut() {
        beam.age += dt;
        if beam.age >= beam.lifetime {
            commands.entity(entity).despawn();
        }
    }
}

/// Draw sparks as small spheres and beams as lines, fading quadratically.
pub fn particle_gizmo_system(
    mut gizmos: Gizmos,
    particles: Query<(&Transform, &Particle)>,
    beams: Query<&BeamTrail>,
) {
    for (transform, particle) in particles.iter() {
        let alpha = fade(particle.age, particle.lifetime);
        gizmos.sphere(
            Isometry3d::from_translation(transform.translation),
            particle.radius,
            particle.color.with_alpha(alpha),
        );
    }
    for beam in beams.iter() {
        let alpha = fade(beam.age, beam.lifetime) * 0.6;
        gizmos.line(beam.start, beam.end, Color::srgba(0.85, 0.85, 0.9, alpha));
    }
}

/// Quadratic ease-out alpha: bright at birth, rapid fade at end.
fn fade(age: f32, lifetime: f32) -> f32 {
    let t = (age / lifetime).clamp(0.0, 1.0);
    (1.0 - t).powi(2)
}

// ── Public spawn helpers ──────────────────────────────────────────────────────

/// Spawn a burst of sparks at `pos` where a shot landed.
pub fn spawn_impact_particles(commands: &mut Commands, pos: Vec3) {
    let mut rng = rand::thread_rng();
    for _ in 0..8 {
        let dir = Vec3::new(
            rng.gen_range(-1.0_f32..1.0),
            rng.gen_range(-0.2_f32..1.0),
            rng.gen_range(-1.0_f32..1.0),
        )
        .normalize_or_zero();
        let speed = rng.gen_range(120.0_f32..320.0_f32);
        // Orange-yellow sparks with slight variation.
        let color = Color::srgb(
            rng.gen_range(0.90_f32..1.0_f32),
            rng.gen_range(0.50_f32..0.75_f32),
            rng.gen_range(0.0_f32..0.20_f32),
        );
        commands.spawn((
            Particle {
                velocity: dir * speed,
                age: 0.0,
                lifetime: rng.gen_range(0.20_f32..0.40_f32),
                radius: 2.0,
                color,
            },
            Transform::from_translation(pos),
        ));
    }
}

/// Spawn a short flash along the muzzle's facing direction.
pub fn spawn_muzzle_flash(commands: &mut Commands, muzzle: &Transform) {
    let forward = muzzle.rotation * Vec3::NEG_Z;
    for i in 0..3 {
        commands.spawn((
            Particle {
                velocity: forward * (80.0 + 40.0 * i as f32),
                age: 0.0,
                lifetime: 0.06,
                radius: 4.0 - i as f32,
                color: Color::srgb(1.0, 0.85, 0.4),
            },
            Transform::from_translation(muzzle.translation),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<SpawnParticles>();
        app.add_systems(Update, spawn_particles_system);
        app
    }

    #[test]
    fn impact_request_spawns_sparks() {
        let mut app = particle_app();
        app.world_mut()
            .write_message(SpawnParticles::at(ParticleEffect::Impact, Vec3::ZERO));
        app.update();
        let count = app
            .world_mut()
            .query::<&Particle>()
            .iter(app.world())
            .count();
        assert_eq!(count, 8);
    }

    #[test]
    fn beam_without_target_is_skipped() {
        let mut app = particle_app();
        app.world_mut()
            .write_message(SpawnParticles::at(ParticleEffect::Beam, Vec3::ZERO));
        app.update();
        let count = app
            .world_mut()
            .query::<&BeamTrail>()
            .iter(app.world())
            .count();
        assert_eq!(count, 0);
    }

    #[test]
    fn missing_sound_asset_is_skipped() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<PlaySound>();
        app.init_resource::<EffectAssets>();
        app.add_systems(Update, play_sound_system);
        app.world_mut().write_message(PlaySound {
            cue: SoundCue::Dash,
        });
        app.update();
        let players = app
            .world_mut()
            .query::<&AudioPlayer>()
            .iter(app.world())
            .count();
        assert_eq!(players, 0);
    }
}

//! Hit-scan weapons and damage shared by the character and the drone.
//!
//! A shot is planned by [`plan_shot`] as plain data ([`ShotPlan`]) and then
//! emitted through [`ShotWriters`].  Planning needs only a [`RayCaster`], so
//! the whole fire procedure is testable without Rapier.
//!
//! Order of a shot:
//! 1. fire sound, muzzle flash, recoil cue (always)
//! 2. two-stage trace (see [`crate::trace`])
//! 3. beam to the resolved end point (when the weapon has one)
//! 4. damage to the crosshair target and impact sparks (on a hit)

use crate::animation::MontageRequest;
use crate::effects::{ParticleEffect, PlaySound, SoundCue, SpawnParticles};
use crate::interp::Rotator;
use crate::trace::{resolve_beam_end, BeamTrace, RayCaster};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// Hit-scan weapon mounted on a controllable entity.
#[derive(Component, Debug, Clone)]
pub struct Weapon {
    /// Muzzle position in the owner's aim frame (right, up, forward).
    /// `None` skips the muzzle flash and traces the beam from the camera.
    pub muzzle_offset: Option<Vec3>,
    pub fire_sound: SoundCue,
    pub muzzle_flash: bool,
    /// Smoke trail from the muzzle to the resolved end point.
    pub beam: bool,
    /// Animation section requested on every shot.
    pub recoil_section: Option<&'static str>,
    pub damage: f32,
    pub trace_distance: f32,
}

/// Hit points of a damageable target.
#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    pub hp: f32,
    pub max_hp: f32,
}

impl Health {
    pub fn new(max_hp: f32) -> Self {
        Self { hp: max_hp, max_hp }
    }
}

/// Damage request from a shot.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ApplyDamage {
    pub target: Entity,
    pub amount: f32,
    pub instigator: Entity,
}

// ── Shot planning ─────────────────────────────────────────────────────────────

/// Where a shot comes from.
#[derive(Debug, Clone, Copy)]
pub struct ShotOrigin {
    pub shooter: Entity,
    /// Owner position the muzzle offset is applied to.
    pub pivot: Vec3,
    /// Aim orientation the muzzle offset is expressed in.
    pub aim: Rotator,
    /// World ray through the crosshair; `None` when deprojection failed.
    pub crosshair: Option<Ray3d>,
}

/// Everything a shot produces, before it is written out.
#[derive(Debug, Clone)]
pub struct ShotPlan {
    pub trace: BeamTrace,
    pub sound: SoundCue,
    pub particles: Vec<SpawnParticles>,
    pub damage: Option<ApplyDamage>,
    pub montage: Option<MontageRequest>,
}

impl ShotPlan {
    #[inline]
    pub fn hit(&self) -> bool {
        matches!(self.trace, BeamTrace::Hit { .. })
    }
}

/// Resolve one shot of `weapon` fired from `origin`.
pub fn plan_shot(caster: &impl RayCaster, weapon: &Weapon, origin: &ShotOrigin) -> ShotPlan {
    let muzzle = weapon
        .muzzle_offset
        .map(|o| origin.pivot + origin.aim.rotate_local(o.x, o.y, o.z));
    let mut particles = Vec::new();
    if let Some(at) = muzzle.filter(|_| weapon.muzzle_flash) {
        particles.push(SpawnParticles {
            effect: ParticleEffect::MuzzleFlash,
            transform: Transform::from_translation(at).with_rotation(origin.aim.to_quat()),
            beam_target: None,
        });
    }

    let trace_start = muzzle
        .or(origin.crosshair.map(|r| r.origin))
        .unwrap_or(origin.pivot);
    let trace = resolve_beam_end(
        caster,
        origin.crosshair,
        trace_start,
        weapon.trace_distance,
        &[origin.shooter],
    );

    if let Some(end) = trace.end_point().filter(|_| weapon.beam) {
        particles.push(SpawnParticles {
            effect: ParticleEffect::Beam,
            transform: Transform::from_translation(trace_start),
            beam_target: Some(end),
        });
    }

    let damage = match trace {
        BeamTrace::Hit { target, impact } => {
            particles.push(SpawnParticles::at(ParticleEffect::Impact, impact));
            Some(ApplyDamage {
                target,
                amount: weapon.damage,
                instigator: origin.shooter,
            })
        }
        _ => None,
    };

    ShotPlan {
        trace,
        sound: weapon.fire_sound,
        particles,
        damage,
        montage: weapon.recoil_section.map(|section| MontageRequest {
            entity: origin.shooter,
            section,
        }),
    }
}

/// Message writers a shot is emitted through.
#[derive(SystemParam)]
pub struct ShotWriters<'w> {
    pub sounds: MessageWriter<'w, PlaySound>,
    pub particles: MessageWriter<'w, SpawnParticles>,
    pub damage: MessageWriter<'w, ApplyDamage>,
    pub montages: MessageWriter<'w, MontageRequest>,
}

impl ShotWriters<'_> {
    pub fn emit(&mut self, plan: ShotPlan) {
        self.sounds.write(PlaySound { cue: plan.sound });
        if let Some(montage) = plan.montage {
            self.montages.write(montage);
        }
        self.particles.write_batch(plan.particles);
        if let Some(damage) = plan.damage {
            self.damage.write(damage);
        }
    }
}

// ── Damage ────────────────────────────────────────────────────────────────────

/// Apply queued damage; targets at zero HP are despawned.
pub fn apply_damage_system(
    mut commands: Commands,
    mut reader: MessageReader<ApplyDamage>,
    mut q: Query<&mut Health>,
) {
    for hit in reader.read() {
        let Ok(mut health) = q.get_mut(hit.target) else {
            continue;
        };
        if health.hp <= 0.0 {
            continue;
        }
        health.hp = (health.hp - hit.amount).max(0.0);
        if health.hp <= 0.0 {
            info!("[combat] {:?} destroyed by {:?}", hit.target, hit.instigator);
            commands.entity(hit.target).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::tests::BoxWorld;

    fn rifle() -> Weapon {
        Weapon {
            muzzle_offset: Some(Vec3::new(20.0, 40.0, 60.0)),
            fire_sound: SoundCue::Fire,
            muzzle_flash: true,
            beam: true,
            recoil_section: Some("StartFire"),
            damage: 1.0,
            trace_distance: 50_000.0,
        }
    }

    fn origin(shooter: Entity, crosshair: Option<Ray3d>) -> ShotOrigin {
        ShotOrigin {
            shooter,
            pivot: Vec3::ZERO,
            aim: Rotator::ZERO,
            crosshair,
        }
    }

    #[test]
    fn failed_deprojection_still_plays_fire_feedback() {
        let mut world = World::new();
        let me = world.spawn_empty().id();
        let plan = plan_shot(&BoxWorld::default(), &rifle(), &origin(me, None));
        assert_eq!(plan.trace, BeamTrace::NoView);
        assert_eq!(plan.sound, SoundCue::Fire);
        assert!(plan.montage.is_some());
        assert!(plan.damage.is_none());
        let effects: Vec<_> = plan.particles.iter().map(|p| p.effect).collect();
        assert_eq!(effects, vec![ParticleEffect::MuzzleFlash]);
    }

    #[test]
    fn hit_damages_crosshair_target() {
        let mut world = World::new();
        let (me, target) = (world.spawn_empty().id(), world.spawn_empty().id());
        let boxes = BoxWorld {
            boxes: vec![(target, Vec3::new(-100.0, -100.0, -600.0), Vec3::new(100.0, 100.0, -500.0))],
        };
        let ray = Ray3d::new(Vec3::new(0.0, 50.0, 250.0), Dir3::NEG_Z);
        let plan = plan_shot(&boxes, &rifle(), &origin(me, Some(ray)));
        assert!(plan.hit());
        assert_eq!(
            plan.damage,
            Some(ApplyDamage {
                target,
                amount: 1.0,
                instigator: me
            })
        );
        let effects: Vec<_> = plan.particles.iter().map(|p| p.effect).collect();
        assert_eq!(
            effects,
            vec![ParticleEffect::MuzzleFlash, ParticleEffect::Beam, ParticleEffect::Impact]
        );
    }

    #[test]
    fn shooter_is_never_its_own_target() {
        let mut world = World::new();
        let me = world.spawn_empty().id();
        let boxes = BoxWorld {
            boxes: vec![(me, Vec3::splat(-50.0), Vec3::splat(50.0))],
        };
        let ray = Ray3d::new(Vec3::new(0.0, 0.0, 250.0), Dir3::NEG_Z);
        let plan = plan_shot(&boxes, &rifle(), &origin(me, Some(ray)));
        assert!(matches!(plan.trace, BeamTrace::Miss { .. }));
    }

    #[test]
    fn damage_despawns_at_zero_hp() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<ApplyDamage>();
        app.add_systems(Update, apply_damage_system);
        let shooter = app.world_mut().spawn_empty().id();
        let target = app.world_mut().spawn(Health::new(2.0)).id();
        for _ in 0..2 {
            app.world_mut().write_message(ApplyDamage {
                target,
                amount: 1.0,
                instigator: shooter,
            });
            app.update();
        }
        assert!(app.world().get_entity(target).is_err());
    }
}

//! Hit-scan target resolution.
//!
//! A shot is resolved in two stages:
//!
//! 1. **Screen trace**: deproject the viewport centre into a world ray and
//!    cast it out to `trace_distance`.  The first blocking hit (or the far
//!    endpoint on a miss) is the aim point.
//! 2. **Muzzle trace**: cast from the muzzle to the aim point.  Anything
//!    blocking the segment earlier replaces the impact point.
//!
//! Ray casting goes through the [`RayCaster`] trait so the resolution logic
//! runs against a scripted fake in tests and Rapier in the game.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// A blocking hit reported by a [`RayCaster`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec3,
}

/// Segment ray cast against the world's blocking geometry.
pub trait RayCaster {
    /// First blocking hit on `start → end`, skipping every entity in `ignore`.
    fn cast_segment(&self, start: Vec3, end: Vec3, ignore: &[Entity]) -> Option<RayHit>;
}

impl RayCaster for RapierContext<'_> {
    fn cast_segment(&self, start: Vec3, end: Vec3, ignore: &[Entity]) -> Option<RayHit> {
        let dir = end - start;
        if dir.length_squared() <= f32::EPSILON {
            return None;
        }
        let predicate = |e: Entity| !ignore.contains(&e);
        let filter = QueryFilter::new().exclude_sensors().predicate(&predicate);
        // With an unnormalised direction a time of impact of 1.0 is `end`.
        let (entity, toi) = self.cast_ray(start, dir, 1.0, true, filter)?;
        Some(RayHit {
            entity,
            point: start + dir * toi,
        })
    }
}

/// Outcome of the two-stage resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BeamTrace {
    /// The screen centre could not be deprojected; nothing was traced.
    NoView,
    /// Neither trace hit anything; `end` is the far endpoint of the screen ray.
    Miss { end: Vec3 },
    /// `target` was hit by the screen trace; `impact` is where the shot landed
    /// after the muzzle trace.
    Hit { target: Entity, impact: Vec3 },
}

impl BeamTrace {
    /// Point the beam effect should travel to, if any.
    pub fn end_point(&self) -> Option<Vec3> {
        match *self {
            BeamTrace::NoView => None,
            BeamTrace::Miss { end } => Some(end),
            BeamTrace::Hit { impact, .. } => Some(impact),
        }
    }
}

/// Resolve where a shot from `muzzle` lands given the crosshair ray.
///
/// A muzzle-trace hit only moves the impact point; the damaged entity is the
/// one under the crosshair.
pub fn resolve_beam_end(
    caster: &impl RayCaster,
    crosshair: Option<Ray3d>,
    muzzle: Vec3,
    trace_distance: f32,
    ignore: &[Entity],
) -> BeamTrace {
    let Some(ray) = crosshair else {
        return BeamTrace::NoView;
    };
    let far = ray.origin + *ray.direction * trace_distance;
    let Some(screen_hit) = caster.cast_segment(ray.origin, far, ignore) else {
        return BeamTrace::Miss { end: far };
    };
    let impact = caster
        .cast_segment(muzzle, screen_hit.point, ignore)
        .map_or(screen_hit.point, |h| h.point);
    BeamTrace::Hit {
        target: screen_hit.entity,
        impact,
    }
}

/// World ray through the centre of `camera`'s viewport.
///
/// `None` when the viewport has no size yet or deprojection fails.
pub fn crosshair_ray(camera: &Camera, transform: &GlobalTransform) -> Option<Ray3d> {
    let centre = camera.logical_viewport_size()? / 2.0;
    camera.viewport_to_world(transform, centre).ok()
}

//! Spring-arm camera rig shared by the character and the drone.
//!
//! Each controllable entity owns a [`CameraRig`] describing where its camera
//! would sit.  Only the rig of the [`Possessed`] entity drives the single
//! [`GameCamera`]; switching control therefore switches views without
//! touching the camera entity itself.

use crate::input::Possessed;
use crate::interp::Rotator;
use crate::trace::crosshair_ray;
use bevy::prelude::*;

/// Marker for the one 3D camera that follows the possessed entity.
#[derive(Component, Debug, Default)]
pub struct GameCamera;

/// Spring arm + camera state of one controllable entity.
#[derive(Component, Debug, Clone)]
pub struct CameraRig {
    /// Orientation of the arm around the owner's pivot.
    pub arm_rotation: Rotator,
    /// Distance from the socket back to the camera.
    pub arm_length: f32,
    /// Socket offset in the arm frame (right, up, forward).
    pub socket_offset: Vec3,
    /// Camera orientation override; `None` looks straight down the arm.
    pub camera_rotation: Option<Rotator>,
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl CameraRig {
    pub fn new(arm_length: f32, socket_offset: Vec3, fov: f32) -> Self {
        Self {
            arm_rotation: Rotator::ZERO,
            arm_length,
            socket_offset,
            camera_rotation: None,
            fov,
        }
    }

    /// World position of the camera for an owner at `pivot`.
    pub fn camera_position(&self, pivot: Vec3) -> Vec3 {
        let o = self.socket_offset;
        pivot + self.arm_rotation.rotate_local(o.x, o.y, o.z - self.arm_length)
    }

    /// Full camera transform for an owner at `pivot`.
    pub fn camera_transform(&self, pivot: Vec3) -> Transform {
        let rotation = self.camera_rotation.unwrap_or(self.arm_rotation);
        Transform {
            translation: self.camera_position(pivot),
            rotation: rotation.to_quat(),
            ..default()
        }
    }
}

/// Crosshair ray of `camera` as if it already sat on `rig` at `pivot`.
///
/// Shots resolve against this frame's rig pose rather than the camera's last
/// propagated `GlobalTransform`.
pub fn rig_crosshair_ray(camera: &Camera, rig: &CameraRig, pivot: Vec3) -> Option<Ray3d> {
    crosshair_ray(camera, &GlobalTransform::from(rig.camera_transform(pivot)))
}

/// Place the game camera on the possessed entity's rig and apply its FOV.
pub fn follow_camera_system(
    q_owner: Query<(&Transform, &CameraRig), With<Possessed>>,
    mut q_camera: Query<(&mut Transform, &mut Projection), (With<GameCamera>, Without<Possessed>)>,
) {
    let Ok((owner, rig)) = q_owner.single() else {
        return;
    };
    let Ok((mut cam, mut projection)) = q_camera.single_mut() else {
        return;
    };
    *cam = rig.camera_transform(owner.translation);
    if let Projection::Perspective(ref mut p) = *projection {
        p.fov = rig.fov.to_radians();
    }
}

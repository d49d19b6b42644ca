use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;
use shooter::rendering::PresentationPlugin;
use shooter::simulation::{DeviceInputPlugin, GameplayPlugin};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Shooter".into(),
                resolution: WindowResolution::new(1280, 720),
                ..Default::default()
            }),
            ..Default::default()
        }))
        // Centimetre world: one metre is 100 units for Rapier tolerances.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().with_length_unit(100.0))
        .add_plugins((GameplayPlugin, DeviceInputPlugin, PresentationPlugin))
        .run();
}

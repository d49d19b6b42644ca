//! Third-person shooter gameplay library
//!
//! A walking, aiming, shooting character with dash, slow motion and a
//! time-boxed drone it can possess, built on Bevy ECS and Rapier3D.
//! World units are centimetres and angles are degrees.

pub mod ability;
pub mod animation;
pub mod camera;
pub mod character;
pub mod combat;
pub mod config;
pub mod constants;
pub mod drone;
pub mod effects;
pub mod error;
pub mod input;
pub mod interp;
pub mod movement;
pub mod rendering;
pub mod scheduler;
pub mod simulation;
pub mod trace;

//! Physics module
//!
//! Kinematic mover (headless) + синхронизация velocity в Rapier.

pub mod movement;

// Re-export основных типов
pub use movement::{
    integrate_kinematic_bodies, rapier_body_bundle, sync_velocity_to_rapier, KinematicBody,
    PhysicsMover, RapierVelocitySyncPlugin,
};

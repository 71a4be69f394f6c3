//! Physics for the moon scene using Rapier3D.

pub mod collision;
pub mod gravity;
pub mod physics_world;
pub mod raycast;

pub use collision::*;
pub use gravity::*;
pub use physics_world::*;
pub use raycast::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

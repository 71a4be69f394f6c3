//! Core engine types and utilities for the moon scene.
//!
//! This crate provides the foundational types used across all scene systems:
//! - Transform and spatial helpers
//! - Fixed-step frame timing

pub mod time;
pub mod transform;

pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec3};

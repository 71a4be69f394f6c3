//! Moon scene: a cratered moon and a rover held down by central gravity.
//!
//! Rendering, windowing and real asset decoding live outside this crate. The
//! host builds a [`Simulation`], calls [`Simulation::tick`] once per frame and
//! draws the returned rover transform and camera pose.

pub mod camera;
pub mod config;
pub mod loader;
pub mod rover;
pub mod scene;

pub use camera::*;
pub use config::*;
pub use loader::*;
pub use rover::*;
pub use scene::*;

//! Procedural generation for the moon surface.

pub mod crater;
pub mod error;
pub mod mesh;
pub mod moon;
pub mod random;

pub use crater::*;
pub use error::*;
pub use mesh::*;
pub use moon::*;
pub use random::*;

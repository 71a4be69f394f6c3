//! Errors raised while validating mesh input.

use thiserror::Error;

/// Structural problems with a mesh buffer. Detected before any vertex is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("position buffer length {len} is not a multiple of 3")]
    MalformedPositions { len: usize },
    #[error("index buffer length {len} is not a multiple of 3")]
    MalformedIndices { len: usize },
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("uv buffer holds {len} floats, expected {expected}")]
    MismatchedUvs { len: usize, expected: usize },
    #[error("sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
}

//! Asset loading seam.
//!
//! Model loading happens outside the simulation and finishes some unknown
//! number of frames after the scene is built. The scene polls an
//! [`AssetLoader`] once per tick and only touches the rover once it arrives.

use glam::Vec3;
use thiserror::Error;

/// Why the rover asset could not be delivered.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// What the scene needs from a loaded rover model.
#[derive(Debug, Clone, PartialEq)]
pub struct RoverAsset {
    pub name: String,
    /// Half extents of the collision box around the scaled model.
    pub half_extents: Vec3,
}

impl Default for RoverAsset {
    fn default() -> Self {
        Self {
            name: "rover.glb".to_string(),
            half_extents: Vec3::splat(0.1),
        }
    }
}

/// Source of the rover asset, polled once per tick until it yields.
pub trait AssetLoader {
    /// `None` while still loading. Yields the outcome exactly once.
    fn poll(&mut self) -> Option<Result<RoverAsset, LoadError>>;
}

/// Loader that completes after a fixed number of polls. Drives the headless
/// binary and the tests.
#[derive(Debug, Clone)]
pub struct DelayedLoader {
    remaining: u32,
    outcome: Option<Result<RoverAsset, LoadError>>,
}

impl DelayedLoader {
    /// Deliver `asset` on the poll after `frames` pending polls.
    pub fn ready(frames: u32, asset: RoverAsset) -> Self {
        Self {
            remaining: frames,
            outcome: Some(Ok(asset)),
        }
    }

    /// Fail with `error` on the poll after `frames` pending polls.
    pub fn failing(frames: u32, error: LoadError) -> Self {
        Self {
            remaining: frames,
            outcome: Some(Err(error)),
        }
    }
}

impl AssetLoader for DelayedLoader {
    fn poll(&mut self) -> Option<Result<RoverAsset, LoadError>> {
        if self.remaining > 0 {
            self.remaining -= 1;
            return None;
        }
        self.outcome.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_once_after_delay() {
        let mut loader = DelayedLoader::ready(2, RoverAsset::default());
        assert!(loader.poll().is_none());
        assert!(loader.poll().is_none());
        assert_eq!(loader.poll(), Some(Ok(RoverAsset::default())));
        assert!(loader.poll().is_none());
    }

    #[test]
    fn failure_message_names_asset() {
        let mut loader = DelayedLoader::failing(0, LoadError::NotFound("rover.glb".into()));
        let err = loader.poll().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "asset not found: rover.glb");
    }
}

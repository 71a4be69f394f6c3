//! Scene configuration. Loaded from `moonscene.ron` at startup.

use anyhow::Context;
use glam::Vec3;
use procgen::MoonConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::camera::FollowCamera;

/// File looked up in the current directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "moonscene.ron";

/// How frame time maps onto physics steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StepMode {
    /// Exactly one fixed step per tick; simulation speed follows frame rate.
    #[default]
    PerFrame,
    /// Fixed steps drained from accumulated frame time.
    Accumulated,
}

/// Physics stepping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed step length in seconds.
    pub dt: f32,
    pub step_mode: StepMode,
    /// Cap on steps per tick in `Accumulated` mode.
    pub max_steps_per_frame: u32,
    /// Central attraction constant.
    pub gravity_strength: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            step_mode: StepMode::PerFrame,
            max_steps_per_frame: 5,
            gravity_strength: physics::DEFAULT_GRAVITY_STRENGTH,
        }
    }
}

/// Rover spawn parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoverConfig {
    pub start_position: Vec3,
    /// Rotation about Y at spawn, radians.
    pub yaw: f32,
    pub mass: f32,
}

impl Default for RoverConfig {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 1.5, 0.0),
            yaw: std::f32::consts::FRAC_PI_2,
            mass: 1.0,
        }
    }
}

/// Everything needed to build and run the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Visual moon mesh.
    pub terrain: MoonConfig,
    /// Radius of the moon's collision sphere (independent of the visual mesh).
    pub moon_collider_radius: f32,
    pub physics: PhysicsConfig,
    pub rover: RoverConfig,
    pub camera: FollowCamera,
    /// Frames before the headless loader delivers the rover.
    pub loader_delay_frames: u32,
    /// Frames the headless driver runs before tearing down. None = 600.
    pub frame_limit: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            terrain: MoonConfig::default(),
            moon_collider_radius: 1.0,
            physics: PhysicsConfig::default(),
            rover: RoverConfig::default(),
            camera: FollowCamera::default(),
            loader_delay_frames: 2,
            frame_limit: None,
        }
    }
}

impl SceneConfig {
    /// Load config from `moonscene.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Invalid config at {:?}: {:#}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_ron(&data).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse config from RON text. Missing fields take their defaults.
    pub fn from_ron(data: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(data)?)
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use procgen::{CraterBlend, RoughnessMode};

    #[test]
    fn defaults_match_reference_scene() {
        let config = SceneConfig::default();
        assert_eq!(config.terrain.radius, 5.0);
        assert_eq!(config.terrain.crater_count, 15);
        assert_eq!(config.physics.gravity_strength, 10.0);
        assert_eq!(config.physics.dt, 1.0 / 60.0);
        assert_eq!(config.rover.start_position, Vec3::new(0.0, 1.5, 0.0));
    }

    #[test]
    fn partial_ron_fills_defaults() {
        let config = SceneConfig::from_ron(
            "(physics: (step_mode: Accumulated, gravity_strength: 4.0), \
              terrain: (seed: Some(42), blend: Legacy, roughness_mode: Coherent(frequency: 2.0)))",
        )
        .unwrap();
        assert_eq!(config.physics.step_mode, StepMode::Accumulated);
        assert_eq!(config.physics.gravity_strength, 4.0);
        assert_eq!(config.physics.dt, 1.0 / 60.0);
        assert_eq!(config.terrain.seed, Some(42));
        assert_eq!(config.terrain.blend, CraterBlend::Legacy);
        assert_eq!(config.terrain.roughness_mode, RoughnessMode::Coherent { frequency: 2.0 });
        assert_eq!(config.terrain.crater_count, 15);
        assert_eq!(config.camera, FollowCamera::default());
    }

    #[test]
    fn invalid_ron_is_an_error() {
        assert!(SceneConfig::from_ron("(physics: 3)").is_err());
    }

    #[test]
    fn missing_file_is_an_error_with_path() {
        let err = SceneConfig::load_from(Path::new("/nonexistent/moonscene.ron")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/moonscene.ron"));
    }
}

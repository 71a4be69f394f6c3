//! Chase camera that follows the rover around the moon.

use engine_core::Transform;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Follow-camera rig. The pose depends only on the tracked body's position:
/// no smoothing, no memory of the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowCamera {
    /// Fixed point the camera is offset from.
    pub anchor: Vec3,
    /// Point the camera always looks at.
    pub look_target: Vec3,
    /// Fraction of the `distance` push taken back toward the moon.
    pub height: f32,
    /// Radial push away from the moon.
    pub distance: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            anchor: Vec3::new(1.0, 1.2, 1.0),
            look_target: Vec3::new(-1.0, 0.0, -1.0),
            height: 0.5,
            distance: 0.5,
        }
    }
}

/// Camera placement for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
    /// Position plus look-at rotation (Y up).
    pub transform: Transform,
}

impl CameraPose {
    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        let up = if (self.target - self.position).normalize_or_zero().cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        Mat4::look_at_rh(self.position, self.target, up)
    }
}

impl FollowCamera {
    /// Pose for a body at `body_position`.
    ///
    /// The camera sits at `anchor`, pushed outward along the body's radial
    /// direction by `distance * (1 - height)`: the outward push, then the
    /// height term pulling back along the already scaled push. A body at the
    /// origin has no radial direction and leaves the camera at the anchor.
    pub fn pose_for(&self, body_position: Vec3) -> CameraPose {
        let to_center = (-body_position).normalize_or_zero();
        let push = to_center * -self.distance;
        let position = self.anchor + push + push * -self.height;
        CameraPose {
            position,
            target: self.look_target,
            transform: Transform::looking_at(position, self.look_target, Vec3::Y),
        }
    }
}

//! Collision groups and surface materials.

use rapier3d::prelude::*;

/// Collision groups for the bodies in the moon scene.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static moon surface
    Terrain = 1 << 0,
    /// Rover chassis
    Rover = 1 << 1,
}

impl CollisionGroup {
    /// Membership and filter for the moon: collides with everything.
    pub fn terrain() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Terrain as u32);
        (membership, Group::ALL)
    }

    /// Membership and filter for rovers: the surface and other rovers.
    pub fn rover() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Rover as u32);
        let filter = Group::from_bits_retain(Self::Terrain as u32 | Self::Rover as u32);
        (membership, filter)
    }

    /// Rapier interaction groups for this group.
    pub fn interaction_groups(self) -> InteractionGroups {
        let (membership, filter) = match self {
            CollisionGroup::Terrain => Self::terrain(),
            CollisionGroup::Rover => Self::rover(),
        };
        InteractionGroups::new(membership, filter)
    }
}

/// Contact response of a collider.
///
/// Rapier averages friction and restitution of the two touching colliders,
/// so giving both sides the same values pins the contact response exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMaterial {
    pub friction: f32,
    pub restitution: f32,
}

impl SurfaceMaterial {
    /// Ground ↔ rover contact.
    pub const REGOLITH: Self = Self {
        friction: 0.5,
        restitution: 0.3,
    };
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self::REGOLITH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rover_and_terrain_interact() {
        let terrain = CollisionGroup::Terrain.interaction_groups();
        let rover = CollisionGroup::Rover.interaction_groups();
        assert!(terrain.test(rover));
        assert!(rover.test(rover));
    }
}

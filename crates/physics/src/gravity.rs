//! Central gravity toward the world origin.
//!
//! The moon is a fixed body at the origin; every tick the tracked body gets a
//! force of `strength / distance²` pointing at the origin. The body's own mass
//! is not factored into the force, so lighter bodies accelerate faster.

use crate::PhysicsWorld;
use engine_core::{Transform, Vec3};
use rapier3d::prelude::RigidBodyHandle;

/// Attraction constant used by the scene.
pub const DEFAULT_GRAVITY_STRENGTH: f32 = 10.0;

/// Below this distance from the origin the field is undefined and skipped.
pub const MIN_GRAVITY_DISTANCE: f32 = 1e-4;

/// Inverse-square attractor at the world origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentralGravity {
    pub strength: f32,
    pub min_distance: f32,
}

impl Default for CentralGravity {
    fn default() -> Self {
        Self {
            strength: DEFAULT_GRAVITY_STRENGTH,
            min_distance: MIN_GRAVITY_DISTANCE,
        }
    }
}

impl CentralGravity {
    pub fn new(strength: f32) -> Self {
        Self {
            strength,
            ..Default::default()
        }
    }

    /// Force on a body at `position`, or `None` when it sits on the attractor.
    pub fn force_at(&self, position: Vec3) -> Option<Vec3> {
        let direction = -position;
        let distance = direction.length();
        if distance.is_nan() || distance < self.min_distance {
            return None;
        }
        Some(direction / distance * (self.strength / (distance * distance)))
    }
}

/// State of the tracked body after one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub transform: Transform,
    pub linear_velocity: Vec3,
    /// Force applied before the step; `None` when gravity was skipped.
    pub applied_force: Option<Vec3>,
    /// Distance from the origin before the step.
    pub distance_from_center: f32,
}

/// Applies central gravity to one body and advances the world.
#[derive(Debug, Clone, Copy, Default)]
pub struct GravityIntegrator {
    pub field: CentralGravity,
}

impl GravityIntegrator {
    pub fn new(field: CentralGravity) -> Self {
        Self { field }
    }

    /// Apply gravity to `body`, step `world` by `dt`, and report the new state.
    ///
    /// Returns `None` if `body` is not in the world; nothing is stepped then.
    pub fn step(&self, world: &mut PhysicsWorld, body: RigidBodyHandle, dt: f32) -> Option<BodyState> {
        let before = world.body_transform(body)?;
        let distance_from_center = before.distance_from_origin();

        let applied_force = self.field.force_at(before.position);
        match applied_force {
            Some(force) => world.apply_force(body, force),
            None => {
                log::debug!("Body at the attractor; skipping gravity this tick");
                world.clear_forces(body);
            }
        }

        world.step(dt);

        Some(BodyState {
            transform: world.body_transform(body)?,
            linear_velocity: world.linear_velocity(body)?,
            applied_force,
            distance_from_center,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionGroup, SurfaceMaterial};
    use engine_core::Quat;
    use rapier3d::prelude::{nalgebra, vector};

    const DT: f32 = 1.0 / 60.0;

    fn rover_world(position: Vec3) -> (PhysicsWorld, RigidBodyHandle) {
        let mut world = PhysicsWorld::new();
        let handle = world.add_dynamic_body(position, Quat::IDENTITY);
        world.add_box_collider(handle, Vec3::splat(0.1), 1.0, SurfaceMaterial::REGOLITH, CollisionGroup::Rover);
        (world, handle)
    }

    #[test]
    fn force_follows_inverse_square() {
        let field = CentralGravity::new(10.0);
        let force = field.force_at(Vec3::new(0.0, 2.0, 0.0)).unwrap();
        assert!((force - Vec3::new(0.0, -2.5, 0.0)).length() < 1e-6);

        let force = field.force_at(Vec3::new(3.0, 0.0, 4.0)).unwrap();
        assert!((force.length() - 0.4).abs() < 1e-6);
        assert!(force.normalize().dot(-Vec3::new(3.0, 0.0, 4.0).normalize()) > 0.99999);
    }

    #[test]
    fn force_is_undefined_at_origin() {
        let field = CentralGravity::default();
        assert_eq!(field.force_at(Vec3::ZERO), None);
        assert_eq!(field.force_at(Vec3::splat(1e-6)), None);
        assert_eq!(field.force_at(Vec3::splat(f32::NAN)), None);
    }

    /// d = 2, G = 10: force 2.5 toward the origin, one step of velocity change.
    #[test]
    fn one_step_applies_expected_force() {
        let (mut world, rover) = rover_world(Vec3::new(0.0, 2.0, 0.0));
        let integrator = GravityIntegrator::new(CentralGravity::new(10.0));
        let state = integrator.step(&mut world, rover, DT).unwrap();

        let force = state.applied_force.unwrap();
        assert!((force.length() - 2.5).abs() < 1e-5);
        assert!(force.normalize().dot(-Vec3::Y) > 0.99999);
        assert_eq!(state.distance_from_center, 2.0);

        // mass 1: Δv = F·dt
        let expected = -2.5 * DT;
        assert!((state.linear_velocity.y - expected).abs() < 1e-4);
        assert!(state.linear_velocity.x.abs() < 1e-6);
        assert!(state.linear_velocity.z.abs() < 1e-6);
    }

    /// A body passing through the attractor keeps its velocity for that tick.
    #[test]
    fn body_at_origin_is_left_alone() {
        let (mut world, rover) = rover_world(Vec3::ZERO);
        world.rigid_body_set[rover].set_linvel(vector![1.5, -0.5, 0.25], true);
        let integrator = GravityIntegrator::default();
        let state = integrator.step(&mut world, rover, DT).unwrap();
        assert_eq!(state.applied_force, None);
        assert!((state.linear_velocity - Vec3::new(1.5, -0.5, 0.25)).length() < 1e-6);
    }

    /// A force left over from an earlier tick is dropped once the body reaches the origin.
    #[test]
    fn stale_force_is_cleared_at_origin() {
        let (mut world, rover) = rover_world(Vec3::ZERO);
        world.apply_force(rover, Vec3::new(0.0, -2.5, 0.0));
        world.rigid_body_set[rover].set_linvel(vector![0.0, 1.0, 0.0], true);
        let state = GravityIntegrator::default().step(&mut world, rover, DT).unwrap();
        assert_eq!(state.applied_force, None);
        assert!((state.linear_velocity - Vec3::Y).length() < 1e-6);
    }

    /// Forces are replaced each tick, not summed across ticks.
    #[test]
    fn force_does_not_accumulate_between_ticks() {
        let (mut world, rover) = rover_world(Vec3::new(0.0, 2.0, 0.0));
        let integrator = GravityIntegrator::default();
        integrator.step(&mut world, rover, DT).unwrap();
        let state = integrator.step(&mut world, rover, DT).unwrap();
        assert!((state.linear_velocity.y - (-5.0 * DT)).abs() < 1e-3);
    }

    #[test]
    fn gravity_ignores_orientation() {
        let mut world = PhysicsWorld::new();
        let rover = world.add_dynamic_body(Vec3::new(0.0, 2.0, 0.0), Quat::from_rotation_z(1.0));
        world.add_box_collider(rover, Vec3::splat(0.1), 1.0, SurfaceMaterial::REGOLITH, CollisionGroup::Rover);
        let state = GravityIntegrator::default().step(&mut world, rover, DT).unwrap();
        assert!((state.applied_force.unwrap() - Vec3::new(0.0, -2.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn missing_body_steps_nothing() {
        let (mut world, rover) = rover_world(Vec3::new(0.0, 2.0, 0.0));
        world.remove_body(rover);
        assert!(GravityIntegrator::default().step(&mut world, rover, DT).is_none());
    }
}

//! Ray queries against the physics world.

use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point.
    pub distance: f32,
}

impl PhysicsWorld {
    /// Cast a ray and return the first hit, skipping colliders attached to `exclude`.
    ///
    /// Reads the query pipeline as of the last [`PhysicsWorld::step`] or
    /// [`PhysicsWorld::update_query_pipeline`].
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        let filter = match exclude {
            Some(body) => QueryFilter::default().exclude_rigid_body(body),
            None => QueryFilter::default(),
        };

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(collider, distance)| RaycastHit { collider, distance })
    }

    /// Height of `body`'s center above whatever surface lies toward the origin.
    ///
    /// `None` when the body is missing, sits on the origin, or nothing is hit.
    pub fn surface_altitude(&self, body: RigidBodyHandle) -> Option<f32> {
        let position = self.body_transform(body)?.position;
        let distance = position.length();
        let down = (-position).try_normalize()?;
        self.raycast(position, down, distance, Some(body))
            .map(|hit| hit.distance)
    }
}

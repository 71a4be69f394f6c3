//! Impact craters: sampling and per-vertex displacement.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::random::RandomSource;

/// Shape parameters for randomly placed craters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraterParams {
    /// Smallest radius of effect (inclusive).
    pub min_size: f32,
    /// Largest radius of effect (exclusive).
    pub max_size: f32,
    /// Inward displacement at the crater center.
    pub depth: f32,
}

impl Default for CraterParams {
    fn default() -> Self {
        Self {
            min_size: 1.0,
            max_size: 3.0,
            depth: 0.2,
        }
    }
}

/// A single crater on the sphere surface. Only lives for one generation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crater {
    /// Center on the sphere surface (unit direction scaled by the sphere radius).
    pub center: Vec3,
    /// Radius of effect, measured as straight-line distance from `center`.
    pub size: f32,
    /// Displacement at distance zero.
    pub depth: f32,
}

impl Crater {
    /// Sample a crater with a uniformly distributed center direction.
    ///
    /// Draws exactly three values: height along Y, azimuth, size.
    pub fn sample<R: RandomSource + ?Sized>(radius: f32, params: &CraterParams, rng: &mut R) -> Self {
        let y = rng.range(-1.0, 1.0);
        let phi = rng.next_f32() * TAU;
        let ring = (1.0 - y * y).max(0.0).sqrt();
        let direction = Vec3::new(ring * phi.cos(), y, ring * phi.sin());

        Self {
            center: direction * radius,
            size: rng.range(params.min_size, params.max_size),
            depth: params.depth,
        }
    }

    /// Inward displacement this crater applies at `point`. Zero at or beyond `size`.
    pub fn impact(&self, point: Vec3) -> f32 {
        let distance = point.distance(self.center);
        if distance < self.size {
            (1.0 - distance / self.size) * self.depth
        } else {
            0.0
        }
    }
}

/// Sample `count` craters for a sphere of `radius`.
pub fn generate_craters<R: RandomSource + ?Sized>(
    count: usize,
    radius: f32,
    params: &CraterParams,
    rng: &mut R,
) -> Vec<Crater> {
    (0..count)
        .map(|i| {
            let crater = Crater::sample(radius, params, rng);
            log::debug!(
                "Crater {}: center ({:.2}, {:.2}, {:.2}) size {:.2}",
                i,
                crater.center.x,
                crater.center.y,
                crater.center.z,
                crater.size
            );
            crater
        })
        .collect()
}

/// Push `original` inward by the summed impact of every crater.
///
/// Each impact is measured against the undisplaced position, so overlapping
/// craters add up instead of compounding. The push is along `original / radius`
/// and never exceeds `radius`, so a vertex can sink to the origin but never
/// cross it.
pub fn apply_craters(original: Vec3, radius: f32, craters: &[Crater]) -> Vec3 {
    let total: f32 = craters.iter().map(|c| c.impact(original)).sum();
    if total == 0.0 {
        return original;
    }
    original - (original / radius) * total.min(radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RngSource, SequenceSource};

    #[test]
    fn sampled_centers_lie_on_sphere() {
        let mut rng = RngSource::seeded(3);
        let params = CraterParams::default();
        for crater in generate_craters(200, 5.0, &params, &mut rng) {
            assert!((crater.center.length() - 5.0).abs() < 1e-4);
            assert!(crater.size >= 1.0 && crater.size < 3.0);
            assert_eq!(crater.depth, 0.2);
        }
    }

    #[test]
    fn scripted_sample_maps_draws() {
        // y = 0, phi = 0, size = min + 0.5 * span
        let mut rng = SequenceSource::new(vec![0.5, 0.0, 0.5]);
        let crater = Crater::sample(5.0, &CraterParams::default(), &mut rng);
        assert!((crater.center - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(crater.size, 2.0);
    }

    /// A vertex sitting exactly on the crater center sinks by the full depth.
    #[test]
    fn full_depth_at_center() {
        let vertex = Vec3::new(0.0, 3.0, 4.0);
        let crater = Crater {
            center: vertex,
            size: 2.0,
            depth: 0.2,
        };
        let displaced = apply_craters(vertex, 5.0, &[crater]);
        assert!((vertex.length() - displaced.length() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn no_effect_outside_radius() {
        let crater = Crater {
            center: Vec3::new(5.0, 0.0, 0.0),
            size: 1.5,
            depth: 0.2,
        };
        let far = Vec3::new(0.0, 5.0, 0.0);
        assert_eq!(crater.impact(far), 0.0);
        assert_eq!(apply_craters(far, 5.0, &[crater]), far);

        // Exactly on the rim is outside as well
        let rim = Vec3::new(5.0, 1.5, 0.0);
        assert_eq!(crater.impact(rim), 0.0);
    }

    #[test]
    fn impact_falls_off_linearly() {
        let crater = Crater {
            center: Vec3::ZERO,
            size: 2.0,
            depth: 0.4,
        };
        assert!((crater.impact(Vec3::X) - 0.2).abs() < 1e-6);
    }

    /// Stacked craters deeper than the sphere stop at the origin.
    #[test]
    fn push_is_capped_at_radius() {
        let vertex = Vec3::new(1.0, 0.0, 0.0);
        let crater = Crater {
            center: vertex,
            size: 2.0,
            depth: 0.8,
        };
        let displaced = apply_craters(vertex, 1.0, &[crater, crater]);
        assert_eq!(displaced, Vec3::ZERO);
    }

    #[test]
    fn overlapping_craters_add() {
        let vertex = Vec3::new(5.0, 0.0, 0.0);
        let crater = Crater {
            center: vertex,
            size: 2.0,
            depth: 0.2,
        };
        let displaced = apply_craters(vertex, 5.0, &[crater, crater]);
        assert!((displaced.x - 4.6).abs() < 1e-5);
    }
}

//! Cratered moon generation.
//!
//! A base sphere is deformed in one pass: craters are sampled once and shared
//! by every vertex, then each vertex gets a radial roughness offset and the
//! normals are rebuilt from the final positions.
//!
//! **Seed-based determinism:** with `MoonConfig::seed` set (or an injected
//! seeded [`RandomSource`]) the output is bit-identical between runs.

use glam::Vec3;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::crater::{apply_craters, generate_craters, Crater, CraterParams};
use crate::error::MeshError;
use crate::mesh::MeshBuffer;
use crate::random::{RandomSource, RngSource};

/// How crater displacement and roughness combine into the final radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CraterBlend {
    /// Roughness is added on top of the crater-displaced radius, so craters stay visible.
    #[default]
    Preserve,
    /// Every vertex is re-placed at `radius + roughness` along its original
    /// direction. Crater displacement is discarded; kept for parity with the
    /// first version of the scene.
    Legacy,
}

/// Source of the per-vertex roughness offset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum RoughnessMode {
    /// One independent uniform draw per vertex.
    #[default]
    Uniform,
    /// Perlin noise sampled on the unit direction. Coincident vertices (seam
    /// column, poles) get the same offset, so the surface stays closed.
    Coherent { frequency: f64 },
}

/// Configuration for moon generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoonConfig {
    /// Base sphere radius.
    pub radius: f32,
    /// Segments around the equator.
    pub width_segments: u32,
    /// Segments from pole to pole.
    pub height_segments: u32,
    /// Craters sampled per generation pass.
    pub crater_count: usize,
    pub craters: CraterParams,
    /// Roughness offsets fall in `[-roughness, roughness)` for `Uniform`
    /// and `[-roughness, roughness]` for `Coherent`.
    pub roughness: f32,
    pub roughness_mode: RoughnessMode,
    pub blend: CraterBlend,
    /// Fixed seed for reproducible moons. None = fresh entropy each run.
    pub seed: Option<u64>,
}

impl Default for MoonConfig {
    fn default() -> Self {
        Self {
            radius: 5.0,
            width_segments: 128,
            height_segments: 128,
            crater_count: 15,
            craters: CraterParams::default(),
            roughness: 0.1,
            roughness_mode: RoughnessMode::Uniform,
            blend: CraterBlend::Preserve,
            seed: None,
        }
    }
}

/// A generated moon: the deformed mesh plus the craters that shaped it.
#[derive(Debug, Clone)]
pub struct Moon {
    pub mesh: MeshBuffer,
    pub craters: Vec<Crater>,
}

enum Roughness {
    Uniform { amplitude: f32 },
    Coherent { perlin: Perlin, frequency: f64, amplitude: f32 },
}

impl Roughness {
    fn new<R: RandomSource + ?Sized>(mode: RoughnessMode, amplitude: f32, rng: &mut R) -> Self {
        match mode {
            RoughnessMode::Uniform => Roughness::Uniform { amplitude },
            RoughnessMode::Coherent { frequency } => {
                let seed = (rng.next_f32() * u32::MAX as f32) as u32;
                Roughness::Coherent {
                    perlin: Perlin::new(seed),
                    frequency,
                    amplitude,
                }
            }
        }
    }

    fn sample<R: RandomSource + ?Sized>(&self, direction: Vec3, rng: &mut R) -> f32 {
        match self {
            Roughness::Uniform { amplitude } => rng.range(-amplitude, *amplitude),
            Roughness::Coherent {
                perlin,
                frequency,
                amplitude,
            } => {
                let p = direction.as_dvec3() * *frequency;
                let n = perlin.get([p.x, p.y, p.z]) as f32;
                (n * amplitude).clamp(-amplitude, *amplitude)
            }
        }
    }
}

/// Deforms sphere meshes into cratered moons.
#[derive(Debug, Clone, Default)]
pub struct MoonGenerator {
    config: MoonConfig,
}

impl MoonGenerator {
    pub fn new(config: MoonConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MoonConfig {
        &self.config
    }

    /// Build the base sphere and deform it, seeding from `config.seed` when set.
    pub fn generate(&self) -> Result<Moon, MeshError> {
        match self.config.seed {
            Some(seed) => self.generate_with(&mut RngSource::seeded(seed)),
            None => self.generate_with(&mut RngSource::from_entropy()),
        }
    }

    /// Build the base sphere and deform it with an injected random source.
    pub fn generate_with<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<Moon, MeshError> {
        let mut mesh = MeshBuffer::uv_sphere(
            self.config.radius,
            self.config.width_segments,
            self.config.height_segments,
        );
        let craters = self.deform(&mut mesh, rng)?;
        Ok(Moon { mesh, craters })
    }

    /// Sample craters and deform `mesh` in place. Returns the craters used.
    pub fn deform<R: RandomSource + ?Sized>(
        &self,
        mesh: &mut MeshBuffer,
        rng: &mut R,
    ) -> Result<Vec<Crater>, MeshError> {
        mesh.validate()?;
        check_radius(self.config.radius)?;
        let craters = generate_craters(
            self.config.crater_count,
            self.config.radius,
            &self.config.craters,
            rng,
        );
        self.shape(mesh, &craters, rng)?;
        Ok(craters)
    }

    /// Apply a known crater set plus roughness to `mesh`, then rebuild normals.
    pub fn shape<R: RandomSource + ?Sized>(
        &self,
        mesh: &mut MeshBuffer,
        craters: &[Crater],
        rng: &mut R,
    ) -> Result<(), MeshError> {
        mesh.validate()?;
        let radius = self.config.radius;
        check_radius(radius)?;

        let roughness = Roughness::new(self.config.roughness_mode, self.config.roughness, rng);
        let mut cratered_vertices = 0usize;

        for i in 0..mesh.vertex_count() {
            let original = mesh.vertex(i);
            let direction = original.normalize_or_zero();
            let noise = roughness.sample(direction, rng);
            let cratered = apply_craters(original, radius, craters);
            if cratered != original {
                cratered_vertices += 1;
            }

            let placed = match self.config.blend {
                CraterBlend::Preserve => direction * (cratered.length() + noise).max(0.0),
                CraterBlend::Legacy => direction * (radius + noise),
            };
            mesh.set_vertex(i, placed);
        }

        mesh.compute_vertex_normals();

        log::info!(
            "Moon deformed: {} vertices, {} craters touching {} vertices ({:?} blend)",
            mesh.vertex_count(),
            craters.len(),
            cratered_vertices,
            self.config.blend
        );
        Ok(())
    }
}

/// Deform `mesh` with `crater_count` craters using the default crater shape,
/// roughness and blend. Returns the craters that were applied.
pub fn deform<R: RandomSource + ?Sized>(
    mesh: &mut MeshBuffer,
    radius: f32,
    crater_count: usize,
    rng: &mut R,
) -> Result<Vec<Crater>, MeshError> {
    MoonGenerator::new(MoonConfig {
        radius,
        crater_count,
        ..Default::default()
    })
    .deform(mesh, rng)
}

fn check_radius(radius: f32) -> Result<(), MeshError> {
    if radius > 0.0 && radius.is_finite() {
        Ok(())
    } else {
        Err(MeshError::InvalidRadius(radius))
    }
}

//! CPU-side mesh buffer consumed and produced by the moon generator.
//!
//! Positions are stored as a flat `f32` buffer (x, y, z triples), the same
//! shape a renderer uploads. Triangles come from the index buffer when one is
//! present; otherwise every consecutive vertex triple is one triangle.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::PI;

use crate::error::MeshError;

/// Squared length below which an accumulated normal is treated as degenerate.
const DEGENERATE_NORMAL_EPS: f32 = 1e-12;

/// Vertex for the moon mesh, laid out for direct GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MoonVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Vertex positions, normals, uvs and optional triangle indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffer {
    positions: Vec<f32>,
    normals: Vec<f32>,
    uvs: Vec<f32>,
    indices: Vec<u32>,
}

impl MeshBuffer {
    /// Wrap a raw position buffer (non-indexed triangles).
    pub fn from_positions(positions: Vec<f32>) -> Result<Self, MeshError> {
        Self::from_parts(positions, Vec::new(), Vec::new())
    }

    /// Build a buffer from positions, uvs (may be empty) and indices (may be empty).
    pub fn from_parts(positions: Vec<f32>, uvs: Vec<f32>, indices: Vec<u32>) -> Result<Self, MeshError> {
        let mut mesh = Self {
            normals: vec![0.0; positions.len()],
            positions,
            uvs,
            indices,
        };
        mesh.validate()?;
        mesh.compute_vertex_normals();
        Ok(mesh)
    }

    /// UV sphere centered at the origin.
    ///
    /// Vertex order, uv layout and the skipped degenerate pole triangles match
    /// the usual `SphereGeometry(radius, width_segments, height_segments)`
    /// layout: `(width + 1) * (height + 1)` vertices with a duplicated seam column.
    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width = width_segments.max(3);
        let height = height_segments.max(2);
        let vertex_count = ((width + 1) * (height + 1)) as usize;

        let mut positions = Vec::with_capacity(vertex_count * 3);
        let mut normals = Vec::with_capacity(vertex_count * 3);
        let mut uvs = Vec::with_capacity(vertex_count * 2);

        for iy in 0..=height {
            let v = iy as f32 / height as f32;
            // Pole rows nudge u so each fan triangle samples the middle of its texel column
            let u_offset = if iy == 0 {
                0.5 / width as f32
            } else if iy == height {
                -0.5 / width as f32
            } else {
                0.0
            };

            for ix in 0..=width {
                let u = ix as f32 / width as f32;
                let (sin_theta, cos_theta) = (v * PI).sin_cos();
                let (sin_phi, cos_phi) = (u * 2.0 * PI).sin_cos();

                let p = Vec3::new(
                    -radius * cos_phi * sin_theta,
                    radius * cos_theta,
                    radius * sin_phi * sin_theta,
                );
                let n = p.normalize_or_zero();

                positions.extend_from_slice(&[p.x, p.y, p.z]);
                normals.extend_from_slice(&[n.x, n.y, n.z]);
                uvs.extend_from_slice(&[u + u_offset, 1.0 - v]);
            }
        }

        let row = width + 1;
        let mut indices = Vec::with_capacity((width * height * 6) as usize);
        for iy in 0..height {
            for ix in 0..width {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self {
            positions,
            normals,
            uvs,
            indices,
        }
    }

    /// Check structural invariants: whole position triples, whole index
    /// triangles, in-range indices and a uv pair per vertex.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.positions.len() % 3 != 0 {
            return Err(MeshError::MalformedPositions {
                len: self.positions.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::MalformedIndices {
                len: self.indices.len(),
            });
        }
        let vertex_count = self.vertex_count();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfRange { index, vertex_count });
        }
        if !self.uvs.is_empty() && self.uvs.len() != vertex_count * 2 {
            return Err(MeshError::MismatchedUvs {
                len: self.uvs.len(),
                expected: vertex_count * 2,
            });
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Position of vertex `i`.
    pub fn vertex(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    /// Normal of vertex `i`.
    pub fn normal(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.normals[i * 3..i * 3 + 3])
    }

    /// Overwrite vertex `i`. The vertex count never changes.
    pub fn set_vertex(&mut self, i: usize, position: Vec3) {
        self.positions[i * 3..i * 3 + 3].copy_from_slice(&position.to_array());
    }

    /// Iterate over vertex positions.
    pub fn vertices(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions.chunks_exact(3).map(Vec3::from_slice)
    }

    /// Recompute smooth per-vertex normals from the current positions.
    ///
    /// Face normals are accumulated unnormalized (area weighted) into every
    /// vertex they touch. A vertex whose faces are all degenerate falls back
    /// to its radial direction, or +Y at the origin, so every normal is unit
    /// length.
    pub fn compute_vertex_normals(&mut self) {
        let vertex_count = self.vertex_count();
        let mut accumulated = vec![Vec3::ZERO; vertex_count];

        let mut add_face = |a: usize, b: usize, c: usize, positions: &[f32]| {
            let pa = Vec3::from_slice(&positions[a * 3..a * 3 + 3]);
            let pb = Vec3::from_slice(&positions[b * 3..b * 3 + 3]);
            let pc = Vec3::from_slice(&positions[c * 3..c * 3 + 3]);
            let face = (pc - pb).cross(pa - pb);
            accumulated[a] += face;
            accumulated[b] += face;
            accumulated[c] += face;
        };

        if self.indices.is_empty() {
            for tri in 0..vertex_count / 3 {
                add_face(tri * 3, tri * 3 + 1, tri * 3 + 2, &self.positions);
            }
        } else {
            for tri in self.indices.chunks_exact(3) {
                add_face(tri[0] as usize, tri[1] as usize, tri[2] as usize, &self.positions);
            }
        }

        self.normals.resize(self.positions.len(), 0.0);
        for (i, sum) in accumulated.into_iter().enumerate() {
            let n = if sum.length_squared() > DEGENERATE_NORMAL_EPS {
                sum.normalize()
            } else {
                let radial = Vec3::from_slice(&self.positions[i * 3..i * 3 + 3]);
                radial.try_normalize().unwrap_or(Vec3::Y)
            };
            self.normals[i * 3..i * 3 + 3].copy_from_slice(&n.to_array());
        }
    }

    /// Interleave into GPU vertices. Missing uvs are exported as zero.
    pub fn to_vertices(&self) -> Vec<MoonVertex> {
        (0..self.vertex_count())
            .map(|i| MoonVertex {
                position: self.vertex(i).to_array(),
                normal: self.normal(i).to_array(),
                uv: if self.uvs.is_empty() {
                    [0.0, 0.0]
                } else {
                    [self.uvs[i * 2], self.uvs[i * 2 + 1]]
                },
            })
            .collect()
    }
}

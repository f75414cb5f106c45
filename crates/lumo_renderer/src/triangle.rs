//! Per-face triangle primitive for shading and surface sampling.
//!
//! A `Triangle` is a lightweight view over one face of a shared `Mesh`: it
//! carries the face id plus a cached geometric normal and surface area, and
//! interpolates vertex attributes with barycentric weights. Uniform surface
//! sampling backs area-light emission in the integrator.

use std::sync::Arc;

use crate::{gen_f32, Vec2, Vec3};
use lumo_core::Mesh;
use rand::RngCore;
use thiserror::Error;

/// Errors raised while building render geometry from a mesh.
#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("Face {face_id} is out of range or has invalid indices")]
    InvalidFace { face_id: u32 },

    #[error("Face {face_id} is degenerate (area {area})")]
    DegenerateFace { face_id: u32, area: f32 },
}

/// A point sampled on a triangle's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub position: Vec3,
    pub normal: Vec3,
    pub texcoords: Vec2,
}

/// Cross-product length below this is treated as zero area.
const DEGENERATE_EPS: f32 = 1e-8;

/// One mesh face, ready for shading queries and surface sampling.
///
/// The geometric normal and area are computed once at construction and never
/// refreshed; the mesh is assumed static for the triangle's lifetime.
#[derive(Clone, Debug)]
pub struct Triangle {
    mesh: Arc<Mesh>,
    face_id: u32,
    /// Pre-computed face normal (unit length)
    geometric_normal: Vec3,
    /// Pre-computed surface area
    area: f32,
}

impl Triangle {
    /// Create a triangle for `face_id` of `mesh`.
    ///
    /// Fails on out-of-range faces and on degenerate (zero-area) faces, so
    /// the sampling routines never have to guard against area = 0.
    pub fn new(mesh: Arc<Mesh>, face_id: u32) -> Result<Self, GeometryError> {
        let [i0, i1, i2] = mesh
            .face_indices(face_id)
            .ok_or(GeometryError::InvalidFace { face_id })?;

        // face_indices already bounds-checked these
        let p0 = mesh.positions[i0 as usize];
        let p1 = mesh.positions[i1 as usize];
        let p2 = mesh.positions[i2 as usize];

        let cross = (p1 - p0).cross(p2 - p0);
        let cross_len = cross.length();
        if cross_len < DEGENERATE_EPS {
            return Err(GeometryError::DegenerateFace {
                face_id,
                area: 0.5 * cross_len,
            });
        }

        Ok(Self {
            mesh,
            face_id,
            geometric_normal: cross / cross_len,
            area: 0.5 * cross_len,
        })
    }

    /// Build triangles for every face of a mesh, skipping bad faces.
    ///
    /// Degenerate and invalid faces are logged and dropped; scene build is
    /// the agreed place to reject them.
    pub fn from_mesh(mesh: Arc<Mesh>) -> Vec<Triangle> {
        let face_count = mesh.face_count() as u32;
        let mut triangles = Vec::with_capacity(face_count as usize);

        for face_id in 0..face_count {
            match Triangle::new(mesh.clone(), face_id) {
                Ok(triangle) => triangles.push(triangle),
                Err(err) => log::warn!("Skipping face: {}", err),
            }
        }

        triangles
    }

    /// Get this face's id in the owning mesh.
    pub fn face_id(&self) -> u32 {
        self.face_id
    }

    /// Get the vertex-buffer indices of this face.
    pub fn indices(&self) -> [u32; 3] {
        // Validated at construction
        let base = 3 * self.face_id as usize;
        [
            self.mesh.indices[base],
            self.mesh.indices[base + 1],
            self.mesh.indices[base + 2],
        ]
    }

    /// Get a corner position. `vertex_id` must be 0, 1 or 2.
    pub fn vertex_position(&self, vertex_id: u32) -> Vec3 {
        assert!(vertex_id < 3, "vertex_id {} out of range", vertex_id);
        let index = self.indices()[vertex_id as usize];
        self.mesh.positions[index as usize]
    }

    /// Get a corner normal. Falls back to the geometric normal when the mesh
    /// carries no normal channel.
    pub fn vertex_normal(&self, vertex_id: u32) -> Vec3 {
        assert!(vertex_id < 3, "vertex_id {} out of range", vertex_id);
        let index = self.indices()[vertex_id as usize];
        self.mesh.normal(index).unwrap_or(self.geometric_normal)
    }

    /// Get corner texture coordinates, or `Vec2::ZERO` when the mesh carries
    /// no texcoord channel.
    pub fn vertex_texcoords(&self, vertex_id: u32) -> Vec2 {
        assert!(vertex_id < 3, "vertex_id {} out of range", vertex_id);
        let index = self.indices()[vertex_id as usize];
        self.mesh.texcoord(index).unwrap_or(Vec2::ZERO)
    }

    /// Get the pre-computed face normal.
    pub fn geometric_normal(&self) -> Vec3 {
        self.geometric_normal
    }

    /// Get the pre-computed surface area.
    pub fn area(&self) -> f32 {
        self.area
    }

    /// Interpolate the shading normal at a barycentric point.
    ///
    /// Weights are `(1 - b.x - b.y, b.x, b.y)` over the three vertex
    /// normals. A zero-length interpolation result (opposed vertex normals,
    /// missing data) falls back to the geometric normal.
    pub fn shading_normal(&self, barycentric: Vec2) -> Vec3 {
        let w0 = 1.0 - barycentric.x - barycentric.y;
        let n = w0 * self.vertex_normal(0)
            + barycentric.x * self.vertex_normal(1)
            + barycentric.y * self.vertex_normal(2);

        let len = n.length();
        if len > 0.0 {
            n / len
        } else {
            self.geometric_normal
        }
    }

    /// Interpolate texture coordinates at a barycentric point.
    pub fn texcoords(&self, barycentric: Vec2) -> Vec2 {
        let w0 = 1.0 - barycentric.x - barycentric.y;
        w0 * self.vertex_texcoords(0)
            + barycentric.x * self.vertex_texcoords(1)
            + barycentric.y * self.vertex_texcoords(2)
    }

    /// Sample a uniformly distributed point on the surface.
    ///
    /// Two uniform draws are mapped to barycentric coordinates with the
    /// square-to-triangle transform `b0 = 1 - sqrt(r1)`, `b1 = r2 * sqrt(r1)`.
    /// Returns the interpolated surface point and the sampling pdf, which is
    /// `1 / area` for every call.
    pub fn sample_point(&self, rng: &mut dyn RngCore) -> (SurfacePoint, f32) {
        let r1 = gen_f32(rng);
        let r2 = gen_f32(rng);

        let sqrt_r1 = r1.sqrt();
        let barycentric = Vec2::new(1.0 - sqrt_r1, r2 * sqrt_r1);

        let w0 = 1.0 - barycentric.x - barycentric.y;
        let position = w0 * self.vertex_position(0)
            + barycentric.x * self.vertex_position(1)
            + barycentric.y * self.vertex_position(2);

        let point = SurfacePoint {
            position,
            normal: self.shading_normal(barycentric),
            texcoords: self.texcoords(barycentric),
        };

        (point, 1.0 / self.area)
    }
}

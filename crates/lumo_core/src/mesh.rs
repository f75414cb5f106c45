//! Mesh geometry representation.
//!
//! Flat vertex/index buffers populated by an external model loader. The
//! renderer's `Triangle` primitive references a shared `Mesh` by face id and
//! reads vertex attributes through the bounds-checked accessors here, never
//! by raw offset.

use lumo_math::{Vec2, Vec3};

/// A triangle mesh: vertex positions, optional normals and texcoords, and
/// triangle indices.
///
/// The buffers are laid out the way model loaders produce them: `indices`
/// holds face index triples back to back, so face `f` occupies
/// `indices[3*f .. 3*f+3]`.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional - will be computed if not provided)
    pub normals: Option<Vec<Vec3>>,

    /// Texture coordinates (optional - one Vec2 per vertex)
    pub texcoords: Option<Vec<Vec2>>,

    /// Triangle indices (every 3 indices form a face)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    ///
    /// If normals are not provided they will NOT be automatically computed.
    /// Call `compute_normals()` explicitly if you need them.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        Self {
            positions,
            normals,
            texcoords: None,
            indices,
        }
    }

    /// Create a new mesh with texture coordinates.
    pub fn new_with_texcoords(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        normals: Option<Vec<Vec3>>,
        texcoords: Option<Vec<Vec2>>,
    ) -> Self {
        Self {
            positions,
            normals,
            texcoords,
            indices,
        }
    }

    /// Get the number of faces in the mesh.
    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the index triple for a face.
    ///
    /// Returns `None` if `face_id` is out of range or any of the three
    /// vertex indices points past the position buffer.
    pub fn face_indices(&self, face_id: u32) -> Option<[u32; 3]> {
        let base = 3 * face_id as usize;
        let triple = self.indices.get(base..base + 3)?;

        let [i0, i1, i2] = [triple[0], triple[1], triple[2]];
        let vertex_count = self.positions.len();
        if i0 as usize >= vertex_count || i1 as usize >= vertex_count || i2 as usize >= vertex_count
        {
            log::warn!(
                "Invalid face {}: indices [{}, {}, {}], vertex count {}",
                face_id,
                i0,
                i1,
                i2,
                vertex_count
            );
            return None;
        }

        Some([i0, i1, i2])
    }

    /// Get a vertex position by vertex-buffer index.
    pub fn position(&self, index: u32) -> Option<Vec3> {
        self.positions.get(index as usize).copied()
    }

    /// Get a vertex normal by vertex-buffer index.
    ///
    /// Returns `None` if the mesh carries no normal channel or the index is
    /// out of range.
    pub fn normal(&self, index: u32) -> Option<Vec3> {
        self.normals.as_ref()?.get(index as usize).copied()
    }

    /// Get vertex texture coordinates by vertex-buffer index.
    pub fn texcoord(&self, index: u32) -> Option<Vec2> {
        self.texcoords.as_ref()?.get(index as usize).copied()
    }

    /// Check if the mesh has normals.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Check if the mesh has texture coordinates.
    pub fn has_texcoords(&self) -> bool {
        self.texcoords.is_some()
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// This generates normals if the mesh doesn't have them, or replaces
    /// existing normals. Each vertex normal is the normalized sum of the
    /// unnormalized face normals of every face sharing that vertex, which
    /// weights large faces more heavily.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        // Accumulate face normals at each vertex
        for face in self.indices.chunks(3) {
            if face.len() < 3 {
                continue;
            }

            let i0 = face[0] as usize;
            let i1 = face[1] as usize;
            let i2 = face[2] as usize;

            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let p0 = self.positions[i0];
            let p1 = self.positions[i1];
            let p2 = self.positions[i2];

            let face_normal = (p1 - p0).cross(p2 - p0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        // Normalize accumulated normals
        for normal in &mut normals {
            let len = normal.length();
            if len > 0.0 {
                *normal /= len;
            } else {
                *normal = Vec3::Y; // Default up normal for degenerate cases
            }
        }

        self.normals = Some(normals);
    }

    /// Ensure the mesh has normals, computing them if necessary.
    /// Also recomputes if existing normals don't match vertex count (e.g.,
    /// face-varying normals from the loader).
    pub fn ensure_normals(&mut self) {
        let should_compute = match &self.normals {
            None => true,
            Some(normals) => normals.len() != self.positions.len(),
        };

        if should_compute {
            if let Some(normals) = &self.normals {
                log::debug!(
                    "Normals array length ({}) doesn't match vertex count ({}), computing smooth normals",
                    normals.len(),
                    self.positions.len()
                );
            }
            self.compute_normals();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Mesh {
        let positions = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        Mesh::new(positions, vec![0, 1, 2], None)
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = unit_triangle();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert!(!mesh.has_normals());
        assert!(!mesh.has_texcoords());
    }

    #[test]
    fn test_face_indices() {
        let mesh = unit_triangle();

        assert_eq!(mesh.face_indices(0), Some([0, 1, 2]));
        assert_eq!(mesh.face_indices(1), None);
    }

    #[test]
    fn test_face_indices_out_of_range_vertex() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let mesh = Mesh::new(positions, vec![0, 1, 7], None);

        assert_eq!(mesh.face_indices(0), None);
    }

    #[test]
    fn test_compute_normals() {
        let mut mesh = unit_triangle();
        mesh.compute_normals();

        assert!(mesh.has_normals());
        let normals = mesh.normals.as_ref().unwrap();

        // CCW triangle in the XY plane, normal points in +Z
        for normal in normals {
            assert!((normal.z - 1.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_ensure_normals_recomputes_mismatched() {
        let mut mesh = unit_triangle();
        mesh.normals = Some(vec![Vec3::Y; 9]); // face-varying length

        mesh.ensure_normals();

        assert_eq!(mesh.normals.as_ref().unwrap().len(), mesh.vertex_count());
    }

    #[test]
    fn test_attribute_accessors() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let texcoords = vec![Vec2::ZERO, Vec2::X, Vec2::Y];
        let mesh = Mesh::new_with_texcoords(positions, vec![0, 1, 2], None, Some(texcoords));

        assert_eq!(mesh.position(1), Some(Vec3::X));
        assert_eq!(mesh.position(3), None);
        assert_eq!(mesh.normal(0), None);
        assert_eq!(mesh.texcoord(2), Some(Vec2::Y));
    }
}

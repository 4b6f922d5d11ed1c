use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Number of unique corners in the cube vertex buffer.
pub const CUBE_VERTEX_COUNT: usize = 8;

/// Number of entries in the cube index buffer (6 faces x 2 triangles x 3).
pub const CUBE_INDEX_COUNT: usize = 36;

/// Interleaved position + normal vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    /// Corner vertex whose normal points away from the cube center.
    pub fn corner(x: f32, y: f32, z: f32) -> Self {
        let normal = Vec3::new(x, y, z).normalize_or_zero();
        Self {
            position: [x, y, z],
            normal: normal.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Corners of the cube spanning [-1, 1] on every axis.
pub fn cube_vertices() -> [Vertex; CUBE_VERTEX_COUNT] {
    [
        Vertex::corner(-1.0, -1.0, -1.0),
        Vertex::corner(-1.0, 1.0, -1.0),
        Vertex::corner(1.0, 1.0, -1.0),
        Vertex::corner(1.0, -1.0, -1.0),
        Vertex::corner(-1.0, -1.0, 1.0),
        Vertex::corner(-1.0, 1.0, 1.0),
        Vertex::corner(1.0, 1.0, 1.0),
        Vertex::corner(1.0, -1.0, 1.0),
    ]
}

/// Triangle list for [`cube_vertices`], clockwise front faces (left-handed).
#[rustfmt::skip]
pub const CUBE_INDICES: [u16; CUBE_INDEX_COUNT] = [
    0, 1, 2,  0, 2, 3, // front
    4, 6, 5,  4, 7, 6, // back
    4, 5, 1,  4, 1, 0, // left
    3, 2, 6,  3, 6, 7, // right
    1, 5, 6,  1, 6, 2, // top
    4, 0, 3,  4, 3, 7, // bottom
];

/// The static cube mesh: eight shared corners and thirty-six indices.
#[derive(Debug, Clone)]
pub struct CubeGeometry {
    vertices: [Vertex; CUBE_VERTEX_COUNT],
    indices: [u16; CUBE_INDEX_COUNT],
}

impl Default for CubeGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl CubeGeometry {
    pub fn new() -> Self {
        Self {
            vertices: cube_vertices(),
            indices: CUBE_INDICES,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Byte size of the vertex buffer this geometry fills.
    pub fn vertex_bytes(&self) -> u64 {
        std::mem::size_of_val(&self.vertices) as u64
    }

    /// Byte size of the index buffer this geometry fills.
    pub fn index_bytes(&self) -> u64 {
        std::mem::size_of_val(&self.indices) as u64
    }

    /// Iterate triangles as corner positions.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.vertices[tri[0] as usize].position(),
                self.vertices[tri[1] as usize].position(),
                self.vertices[tri[2] as usize].position(),
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn corners_are_unit_cube() {
        let geo = CubeGeometry::new();
        assert_eq!(geo.vertices().len(), 8);
        for v in geo.vertices() {
            for c in v.position {
                assert!(c == 1.0 || c == -1.0, "coordinate {c} not +-1");
            }
        }
        let unique: BTreeSet<[i32; 3]> = geo
            .vertices()
            .iter()
            .map(|v| v.position.map(|c| c as i32))
            .collect();
        assert_eq!(unique.len(), 8);
    }

    #[test]
    fn indices_in_range() {
        let geo = CubeGeometry::new();
        assert_eq!(geo.indices().len(), 36);
        assert!(geo.indices().iter().all(|&i| i <= 7));
    }

    #[test]
    fn two_triangles_per_face() {
        let geo = CubeGeometry::new();
        let mut faces = BTreeSet::new();
        for pair in geo.indices().chunks_exact(6) {
            let corners: BTreeSet<u16> = pair.iter().copied().collect();
            assert_eq!(corners.len(), 4, "face pair {pair:?} must span a quad");

            // Exactly one axis is constant across the four corners.
            let positions: Vec<[f32; 3]> = corners
                .iter()
                .map(|&i| geo.vertices()[i as usize].position)
                .collect();
            let fixed: Vec<(usize, i32)> = (0..3)
                .filter(|&axis| positions.iter().all(|p| p[axis] == positions[0][axis]))
                .map(|axis| (axis, positions[0][axis] as i32))
                .collect();
            assert_eq!(fixed.len(), 1);
            faces.insert(fixed[0]);
        }
        assert_eq!(faces.len(), 6);
    }

    #[test]
    fn winding_faces_outward() {
        let geo = CubeGeometry::new();
        assert_eq!(geo.triangles().count(), 12);
        for [a, b, c] in geo.triangles() {
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "inward triangle {a} {b} {c}");
        }
    }

    #[test]
    fn corner_normals_are_unit_length() {
        for v in cube_vertices() {
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-6);
            assert!(n.dot(v.position()) > 0.0);
        }
    }

    #[test]
    fn buffer_sizes_match_counts() {
        let geo = CubeGeometry::new();
        assert_eq!(geo.vertex_bytes(), 8 * std::mem::size_of::<Vertex>() as u64);
        assert_eq!(geo.index_bytes(), 36 * 2);
    }
}

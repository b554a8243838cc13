use foundation::bounds::Aabb3;
use foundation::math::{Vec2, Vec3};

/// Indexed triangle mesh in scene coordinates (y up).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    /// Three indices per triangle.
    pub indices: Vec<u32>,
    /// Empty unless the mesh is textured; otherwise one per position.
    pub tex_coords: Vec<Vec2>,
}

const CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 2, 3, 0, // top
    0, 4, 5, 0, 5, 1, // front
    1, 5, 6, 1, 6, 2, // right
    2, 6, 7, 2, 7, 3, // back
    3, 7, 4, 3, 4, 0, // left
    4, 7, 6, 4, 6, 5, // bottom
];

impl Mesh {
    /// Axis-aligned box of edge lengths `size` centered at `center`.
    pub fn cube(center: Vec3, size: Vec3) -> Self {
        let (hx, hy, hz) = (size.x / 2.0, size.y / 2.0, size.z / 2.0);
        let (cx, cy, cz) = (center.x, center.y, center.z);
        let positions = vec![
            Vec3::new(cx - hx, cy + hy, cz + hz),
            Vec3::new(cx + hx, cy + hy, cz + hz),
            Vec3::new(cx + hx, cy + hy, cz - hz),
            Vec3::new(cx - hx, cy + hy, cz - hz),
            Vec3::new(cx - hx, cy - hy, cz + hz),
            Vec3::new(cx + hx, cy - hy, cz + hz),
            Vec3::new(cx + hx, cy - hy, cz - hz),
            Vec3::new(cx - hx, cy - hy, cz - hz),
        ];
        Self {
            positions,
            indices: CUBE_INDICES.to_vec(),
            tex_coords: Vec::new(),
        }
    }

    /// Textured rectangle lying in the ground plane (y = 0).
    ///
    /// `center` and `size` are (x, z) pairs.
    pub fn ground_quad(center: Vec2, size: Vec2) -> Self {
        let (hx, hz) = (size.x / 2.0, size.y / 2.0);
        let positions = vec![
            Vec3::new(center.x - hx, 0.0, center.y - hz),
            Vec3::new(center.x + hx, 0.0, center.y - hz),
            Vec3::new(center.x + hx, 0.0, center.y + hz),
            Vec3::new(center.x - hx, 0.0, center.y + hz),
        ];
        Self {
            positions,
            indices: vec![0, 2, 1, 0, 3, 2],
            tex_coords: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
        }
    }

    /// Two-triangle quad over four corners with explicit winding.
    pub fn quad(corners: [Vec3; 4], indices: [u32; 6]) -> Self {
        Self {
            positions: corners.to_vec(),
            indices: indices.to_vec(),
            tex_coords: Vec::new(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangles as position triples; indices out of range are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            Some([
                *self.positions.get(tri[0] as usize)?,
                *self.positions.get(tri[1] as usize)?,
                *self.positions.get(tri[2] as usize)?,
            ])
        })
    }

    pub fn bounds(&self) -> Option<Aabb3> {
        Aabb3::from_points(&self.positions)
    }
}

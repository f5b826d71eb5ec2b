use std::ops::Range;

use tessel_geom::{Aabb, Vec3};

use crate::config::IndexFormat;
use crate::constants::{INDICES_PER_QUAD, VERTS_PER_QUAD};
use crate::face::Face;

/// Triangle-list indices in the width chosen for the build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Indices {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Default for Indices {
    fn default() -> Self {
        Indices::U32(Vec::new())
    }
}

impl Indices {
    pub(crate) fn zeroed(format: IndexFormat, len: usize) -> Self {
        match format {
            IndexFormat::U16 => Indices::U16(vec![0; len]),
            IndexFormat::U32 => Indices::U32(vec![0; len]),
        }
    }

    #[inline]
    pub fn format(&self) -> IndexFormat {
        match self {
            Indices::U16(_) => IndexFormat::U16,
            Indices::U32(_) => IndexFormat::U32,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Indices::U16(v) => v.len(),
            Indices::U32(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index `i` widened to `u32`. Panics when out of range, like slice indexing.
    #[inline]
    pub fn get(&self, i: usize) -> u32 {
        match self {
            Indices::U16(v) => u32::from(v[i]),
            Indices::U32(v) => v[i],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    pub fn to_u32_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

/// Mutable window of an index buffer owned by one face direction.
pub(crate) enum IndexSliceMut<'a> {
    U16(&'a mut [u16]),
    U32(&'a mut [u32]),
}

impl IndexSliceMut<'_> {
    /// Writes the six indices of quad slot `quad` whose first vertex is `base`.
    #[inline]
    pub(crate) fn write_quad(&mut self, quad: usize, pattern: &[u32; INDICES_PER_QUAD], base: u32) {
        let i0 = quad * INDICES_PER_QUAD;
        match self {
            IndexSliceMut::U16(s) => {
                for (dst, p) in s[i0..i0 + INDICES_PER_QUAD].iter_mut().zip(pattern) {
                    // Capacity was checked against u16 before allocation.
                    *dst = (base + p) as u16;
                }
            }
            IndexSliceMut::U32(s) => {
                for (dst, p) in s[i0..i0 + INDICES_PER_QUAD].iter_mut().zip(pattern) {
                    *dst = base + p;
                }
            }
        }
    }
}

/// Output of one chunk build. Parallel vertex arrays plus a triangle-list index buffer.
///
/// Quads are grouped by direction in [`Face::ALL`] order; `face_vertex_range` exposes
/// each group so renderers can address per-direction sub-meshes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tangents: Vec<[f32; 4]>,
    pub uv0: Vec<[f32; 2]>,
    pub indices: Indices,
    /// Prefix sums of quad counts per direction.
    pub(crate) quad_offsets: [usize; 7],
}

impl MeshBuffers {
    pub fn empty(format: IndexFormat) -> Self {
        Self {
            indices: Indices::zeroed(format, 0),
            ..Self::default()
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.positions.len() / VERTS_PER_QUAD
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertex indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        [
            self.indices.get(t * 3),
            self.indices.get(t * 3 + 1),
            self.indices.get(t * 3 + 2),
        ]
    }

    /// Number of quads emitted for one direction.
    #[inline]
    pub fn face_quad_count(&self, face: Face) -> usize {
        let i = face.index();
        self.quad_offsets[i + 1] - self.quad_offsets[i]
    }

    /// Vertex range holding one direction's quads.
    #[inline]
    pub fn face_vertex_range(&self, face: Face) -> Range<usize> {
        let i = face.index();
        self.quad_offsets[i] * VERTS_PER_QUAD..self.quad_offsets[i + 1] * VERTS_PER_QUAD
    }

    /// Index range holding one direction's triangles.
    #[inline]
    pub fn face_index_range(&self, face: Face) -> Range<usize> {
        let i = face.index();
        self.quad_offsets[i] * INDICES_PER_QUAD..self.quad_offsets[i + 1] * INDICES_PER_QUAD
    }

    /// Bounds of all positions, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.iter().map(|&p| Vec3::from(p)))
    }

    /// Sum of triangle areas; handy for comparing against voxel surface area.
    pub fn surface_area(&self) -> f32 {
        (0..self.triangle_count())
            .map(|t| {
                let [a, b, c] = self.triangle(t).map(|i| Vec3::from(self.positions[i as usize]));
                (b - a).cross(c - a).length() * 0.5
            })
            .sum()
    }
}

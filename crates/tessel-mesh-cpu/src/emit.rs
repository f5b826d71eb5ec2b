use tessel_atlas::{AtlasLookup, UvRect};
use tessel_geom::Vec3;

use crate::constants::{QUAD_INDEX_PATTERN, VERTS_PER_QUAD};
use crate::error::MeshError;
use crate::face::Face;
use crate::mesh_build::IndexSliceMut;
use crate::noise::NoiseProvider;

/// One assembled face: four vertices in winding order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub positions: [[f32; 3]; 4],
    pub uvs: [[f32; 2]; 4],
    pub normal: [f32; 3],
    pub tangent: [f32; 4],
}

/// Inputs shared by every quad of a build.
pub struct EmitCtx<'a, A: ?Sized> {
    pub atlas: &'a A,
    pub voxel_size: Vec3,
    /// Noise source and amplitude (in voxels) for vertex-height perturbation.
    pub jitter: Option<(&'a dyn NoiseProvider, f32)>,
    /// Lattice origin of the chunk, added to corners before sampling noise.
    pub origin: [i32; 3],
}

/// Atlas tile corners `[A, B, C, D]` in bottom-left UV space.
///
/// The atlas origin is the tile's top-left in image space, so V is flipped: A is
/// `(u0, 1 - v0 - sv)`, B `(u0, 1 - v0)`, C `(u0 + su, 1 - v0)`, D `(u0 + su, 1 - v0 - sv)`.
#[inline]
pub fn tile_corners(rect: UvRect) -> [[f32; 2]; 4] {
    let (u0, v0) = (rect.origin.x, rect.origin.y);
    let (su, sv) = (rect.size.x, rect.size.y);
    [
        [u0, 1.0 - v0 - sv],
        [u0, 1.0 - v0],
        [u0 + su, 1.0 - v0],
        [u0 + su, 1.0 - v0 - sv],
    ]
}

/// Per-vertex UVs of `face` for an atlas rectangle, in the face's winding order.
#[inline]
pub fn face_uvs(face: Face, rect: UvRect) -> [[f32; 2]; 4] {
    let corners = tile_corners(rect);
    face.uv_order().map(|k| corners[k])
}

/// Builds the quad for the `face` side of cell `(x,y,z)` holding voxel type `ty`.
pub fn assemble_quad<A: AtlasLookup + ?Sized>(
    ctx: &EmitCtx<'_, A>,
    face: Face,
    x: usize,
    y: usize,
    z: usize,
    ty: u8,
) -> Result<Quad, MeshError> {
    let variant = ctx.atlas.variant_at(ty, x, y, z);
    let rect = ctx
        .atlas
        .face_uv(ty, variant, face.role())
        .ok_or(MeshError::MissingAtlasEntry { voxel: ty })?;

    let corners = face.corners(x, y, z);
    let mut positions = [[0.0f32; 3]; 4];
    for (out, c) in positions.iter_mut().zip(corners) {
        let lattice = Vec3::new(c[0] as f32, c[1] as f32, c[2] as f32);
        let mut p = lattice.mul_elem(ctx.voxel_size);
        if let Some((noise, amplitude)) = ctx.jitter {
            let o = ctx.origin;
            let n = noise.sample(
                lattice.x + o[0] as f32,
                lattice.y + o[1] as f32,
                lattice.z + o[2] as f32,
            );
            p.y += amplitude * ctx.voxel_size.y * n;
        }
        *out = p.to_array();
    }

    Ok(Quad {
        positions,
        uvs: face_uvs(face, rect),
        normal: face.normal().to_array(),
        tangent: face.tangent(),
    })
}

/// Writes one direction's quads into its preallocated window of the output buffers.
pub(crate) struct QuadWriter<'a> {
    pub(crate) face: Face,
    pos: &'a mut [[f32; 3]],
    norm: &'a mut [[f32; 3]],
    tan: &'a mut [[f32; 4]],
    uv: &'a mut [[f32; 2]],
    idx: IndexSliceMut<'a>,
    /// Global index of this window's first vertex.
    base_vertex: u32,
    cursor: usize,
}

impl<'a> QuadWriter<'a> {
    pub(crate) fn new(
        face: Face,
        pos: &'a mut [[f32; 3]],
        norm: &'a mut [[f32; 3]],
        tan: &'a mut [[f32; 4]],
        uv: &'a mut [[f32; 2]],
        idx: IndexSliceMut<'a>,
        base_vertex: u32,
    ) -> Self {
        Self {
            face,
            pos,
            norm,
            tan,
            uv,
            idx,
            base_vertex,
            cursor: 0,
        }
    }

    /// Quads this window was sized for.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.pos.len() / VERTS_PER_QUAD
    }

    pub(crate) fn push<A: AtlasLookup + ?Sized>(
        &mut self,
        ctx: &EmitCtx<'_, A>,
        x: usize,
        y: usize,
        z: usize,
        cell: u8,
    ) -> Result<(), MeshError> {
        if self.cursor >= self.capacity() {
            return Err(MeshError::OffsetDrift {
                face: self.face,
                expected: self.capacity(),
                written: self.cursor + 1,
            });
        }
        let quad = assemble_quad(ctx, self.face, x, y, z, cell - 1)?;
        let v0 = self.cursor * VERTS_PER_QUAD;
        for k in 0..VERTS_PER_QUAD {
            self.pos[v0 + k] = quad.positions[k];
            self.norm[v0 + k] = quad.normal;
            self.tan[v0 + k] = quad.tangent;
            self.uv[v0 + k] = quad.uvs[k];
        }
        self.idx
            .write_quad(self.cursor, &QUAD_INDEX_PATTERN, self.base_vertex + v0 as u32);
        self.cursor += 1;
        Ok(())
    }

    /// Verifies the window was filled exactly and returns the quad count.
    pub(crate) fn finish(self) -> Result<usize, MeshError> {
        if self.cursor != self.capacity() {
            return Err(MeshError::OffsetDrift {
                face: self.face,
                expected: self.capacity(),
                written: self.cursor,
            });
        }
        Ok(self.cursor)
    }
}

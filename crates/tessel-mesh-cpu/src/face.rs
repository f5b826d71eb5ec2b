use tessel_atlas::FaceRole;
use tessel_geom::Vec3;
use tessel_grid::Dims;

use crate::constants::{CAP_TANGENT, SIDE_TANGENT};

/// Outward direction of a voxel face. `PosY` is top, `NegX` left, `PosZ` front.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosY = 0,
    NegY = 1,
    NegX = 2,
    PosX = 3,
    PosZ = 4,
    NegZ = 5,
}

/// Lattice-corner offsets per face, counter-clockwise seen from outside.
const CORNERS: [[[u8; 3]; 4]; 6] = [
    [[0, 1, 0], [0, 1, 1], [1, 1, 1], [1, 1, 0]], // PosY
    [[0, 0, 1], [0, 0, 0], [1, 0, 0], [1, 0, 1]], // NegY
    [[0, 0, 0], [0, 0, 1], [0, 1, 1], [0, 1, 0]], // NegX
    [[1, 0, 1], [1, 0, 0], [1, 1, 0], [1, 1, 1]], // PosX
    [[0, 0, 1], [1, 0, 1], [1, 1, 1], [0, 1, 1]], // PosZ
    [[1, 0, 0], [0, 0, 0], [0, 1, 0], [1, 1, 0]], // NegZ
];

impl Face {
    /// Emission order used by every pass.
    pub const ALL: [Face; 6] = [
        Face::PosY,
        Face::NegY,
        Face::NegX,
        Face::PosX,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the unit-normal vector for this face.
    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosX => (1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// Classifies the face into top/bottom/side role for atlas lookup.
    #[inline]
    pub fn role(self) -> FaceRole {
        match self {
            Face::PosY => FaceRole::Top,
            Face::NegY => FaceRole::Bottom,
            _ => FaceRole::Side,
        }
    }

    #[inline]
    pub fn tangent(self) -> [f32; 4] {
        match self {
            Face::PosY | Face::NegY => CAP_TANGENT,
            _ => SIDE_TANGENT,
        }
    }

    /// Lattice corners of the face of cell `(x,y,z)` in winding order.
    #[inline]
    pub fn corners(self, x: usize, y: usize, z: usize) -> [[usize; 3]; 4] {
        let t = &CORNERS[self.index()];
        let mut out = [[0usize; 3]; 4];
        for (o, c) in out.iter_mut().zip(t) {
            *o = [x + c[0] as usize, y + c[1] as usize, z + c[2] as usize];
        }
        out
    }

    /// Which of the atlas corners `[A,B,C,D]` each vertex takes.
    ///
    /// A is bottom-left, B top-left, C top-right, D bottom-right of the tile. Side faces
    /// walk bottom edge first, so they visit A, D, C, B to keep texture-up along +Y.
    #[inline]
    pub(crate) fn uv_order(self) -> [usize; 4] {
        match self {
            Face::PosY | Face::NegY => [0, 1, 2, 3],
            _ => [0, 3, 2, 1],
        }
    }

    /// Extents of the chunk face this direction crosses, as seen by the neighbour.
    #[inline]
    pub fn cross_section(self, d: Dims) -> [usize; 2] {
        match self {
            Face::PosY | Face::NegY => [d.sx, d.sz],
            Face::NegX | Face::PosX => [d.sy, d.sz],
            Face::PosZ | Face::NegZ => [d.sx, d.sy],
        }
    }

    /// Extent along this face's axis.
    #[inline]
    pub fn depth(self, d: Dims) -> usize {
        match self {
            Face::PosY | Face::NegY => d.sy,
            Face::NegX | Face::PosX => d.sx,
            Face::PosZ | Face::NegZ => d.sz,
        }
    }
}

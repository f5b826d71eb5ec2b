//! Shared constants for tessel-mesh-cpu.

pub(crate) const VERTS_PER_QUAD: usize = 4;
pub(crate) const INDICES_PER_QUAD: usize = 6;
// Two CCW triangles: (0,1,2) and (2,3,0)
pub(crate) const QUAD_INDEX_PATTERN: [u32; INDICES_PER_QUAD] = [0, 1, 2, 2, 3, 0];

// Voxel-type bitset (u64-based, one bit per u8 type index)
pub(crate) const VOXEL_TYPE_COUNT: usize = 256;
pub(crate) const BITS_PER_WORD: usize = 64;
pub(crate) const WORD_INDEX_SHIFT: usize = 6; // log2(64)
pub(crate) const WORD_INDEX_MASK: usize = 63; // (1<<6) - 1
pub(crate) const TYPE_WORDS: usize = VOXEL_TYPE_COUNT / BITS_PER_WORD;

/// Fixed per-family tangents (xyz + handedness).
pub(crate) const CAP_TANGENT: [f32; 4] = [1.0, 0.0, 0.0, -1.0];
pub(crate) const SIDE_TANGENT: [f32; 4] = [0.0, 0.0, -1.0, 1.0];

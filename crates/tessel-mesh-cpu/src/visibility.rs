//! Per-direction face culling against the chunk and its neighbours.
//!
//! Both mesher passes go through [`try_for_each_visible`], so the count pass and the fill
//! pass cannot disagree on iteration order or on the visibility predicate.

use std::convert::Infallible;

use tessel_grid::{EMPTY, NeighborSet, VoxelAccess};

use crate::config::EdgePolicy;
use crate::constants::{TYPE_WORDS, WORD_INDEX_MASK, WORD_INDEX_SHIFT};
use crate::error::MeshError;
use crate::face::Face;
use crate::neighbors::neighbor_for;

/// Set of voxel type indices, one bit per `u8`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VoxelTypeSet([u64; TYPE_WORDS]);

impl VoxelTypeSet {
    #[inline]
    pub fn insert(&mut self, ty: u8) {
        let i = ty as usize;
        self.0[i >> WORD_INDEX_SHIFT] |= 1u64 << (i & WORD_INDEX_MASK);
    }

    #[inline]
    pub fn contains(&self, ty: u8) -> bool {
        let i = ty as usize;
        (self.0[i >> WORD_INDEX_SHIFT] >> (i & WORD_INDEX_MASK)) & 1 == 1
    }

    #[inline]
    pub fn union(mut self, other: VoxelTypeSet) -> VoxelTypeSet {
        for (a, b) in self.0.iter_mut().zip(other.0) {
            *a |= b;
        }
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(move |&t| self.contains(t))
    }
}

/// Result of the count pass for one direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceTally {
    pub faces: usize,
    /// Voxel types that own at least one visible face in this direction.
    pub types: VoxelTypeSet,
}

/// Checks that every present neighbour lines up with the chunk face it touches.
pub fn validate_neighbors<G: VoxelAccess>(
    grid: &G,
    neighbors: &NeighborSet<'_, G>,
) -> Result<(), MeshError> {
    let dims = grid.dims();
    for face in Face::ALL {
        let Some(nb) = neighbor_for(neighbors, face) else {
            continue;
        };
        let found = nb.dims();
        let expected = face.cross_section(dims);
        if face.cross_section(found) != expected || face.depth(found) == 0 {
            return Err(MeshError::DimensionMismatch {
                face,
                expected,
                found,
            });
        }
    }
    Ok(())
}

#[inline]
fn across<G: VoxelAccess>(
    nb: Option<&G>,
    policy: EdgePolicy,
    probe: impl FnOnce(&G) -> bool,
) -> bool {
    match nb {
        Some(g) => probe(g),
        None => policy.absent_is_occupied(),
    }
}

/// Whether the cell adjacent to `(x,y,z)` in direction `face` is occupied.
///
/// Neighbours must have passed [`validate_neighbors`] against `grid`.
#[inline]
pub fn neighbor_occupied<G: VoxelAccess>(
    grid: &G,
    neighbors: &NeighborSet<'_, G>,
    x: usize,
    y: usize,
    z: usize,
    face: Face,
    policy: EdgePolicy,
) -> bool {
    let d = grid.dims();
    let nb = neighbor_for(neighbors, face);
    match face {
        Face::PosY => {
            if y + 1 < d.sy {
                grid.is_occupied(x, y + 1, z)
            } else {
                across(nb, policy, |n| n.is_occupied(x, 0, z))
            }
        }
        Face::NegY => {
            if y > 0 {
                grid.is_occupied(x, y - 1, z)
            } else {
                across(nb, policy, |n| n.is_occupied(x, n.dims().sy - 1, z))
            }
        }
        Face::PosX => {
            if x + 1 < d.sx {
                grid.is_occupied(x + 1, y, z)
            } else {
                across(nb, policy, |n| n.is_occupied(0, y, z))
            }
        }
        Face::NegX => {
            if x > 0 {
                grid.is_occupied(x - 1, y, z)
            } else {
                across(nb, policy, |n| n.is_occupied(n.dims().sx - 1, y, z))
            }
        }
        Face::PosZ => {
            if z + 1 < d.sz {
                grid.is_occupied(x, y, z + 1)
            } else {
                across(nb, policy, |n| n.is_occupied(x, y, 0))
            }
        }
        Face::NegZ => {
            if z > 0 {
                grid.is_occupied(x, y, z - 1)
            } else {
                across(nb, policy, |n| n.is_occupied(x, y, n.dims().sz - 1))
            }
        }
    }
}

/// A face is visible iff its cell is occupied and the cell it faces is not.
#[inline]
pub fn is_face_visible<G: VoxelAccess>(
    grid: &G,
    neighbors: &NeighborSet<'_, G>,
    x: usize,
    y: usize,
    z: usize,
    face: Face,
    policy: EdgePolicy,
) -> bool {
    grid.get(x, y, z) != EMPTY && !neighbor_occupied(grid, neighbors, x, y, z, face, policy)
}

/// Calls `f(x, y, z, cell)` for every visible face in direction `face`, in `y, z, x` order.
pub fn try_for_each_visible<G, E>(
    grid: &G,
    neighbors: &NeighborSet<'_, G>,
    face: Face,
    policy: EdgePolicy,
    mut f: impl FnMut(usize, usize, usize, u8) -> Result<(), E>,
) -> Result<(), E>
where
    G: VoxelAccess,
{
    let d = grid.dims();
    for y in 0..d.sy {
        for z in 0..d.sz {
            for x in 0..d.sx {
                let cell = grid.get(x, y, z);
                if cell == EMPTY {
                    continue;
                }
                if neighbor_occupied(grid, neighbors, x, y, z, face, policy) {
                    continue;
                }
                f(x, y, z, cell)?;
            }
        }
    }
    Ok(())
}

/// Count pass for one direction.
pub fn count_visible<G: VoxelAccess>(
    grid: &G,
    neighbors: &NeighborSet<'_, G>,
    face: Face,
    policy: EdgePolicy,
) -> FaceTally {
    let mut tally = FaceTally::default();
    let Ok(()) = try_for_each_visible::<_, Infallible>(grid, neighbors, face, policy, |_, _, _, cell| {
        tally.faces += 1;
        tally.types.insert(cell - 1);
        Ok(())
    });
    tally
}

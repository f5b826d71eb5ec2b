use tessel_grid::{NeighborSet, VoxelAccess};

use crate::face::Face;

/// Presence mask of the six neighbours, for build logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NeighborsLoaded {
    pub neg_x: bool,
    pub pos_x: bool,
    pub neg_y: bool,
    pub pos_y: bool,
    pub neg_z: bool,
    pub pos_z: bool,
}

impl NeighborsLoaded {
    #[inline]
    pub fn of<G: VoxelAccess>(set: &NeighborSet<'_, G>) -> Self {
        Self {
            neg_x: set.left.is_some(),
            pos_x: set.right.is_some(),
            neg_y: set.bottom.is_some(),
            pos_y: set.top.is_some(),
            neg_z: set.back.is_some(),
            pos_z: set.front.is_some(),
        }
    }
}

/// The neighbour a face looks into when it leaves the chunk.
#[inline]
pub fn neighbor_for<'a, G: VoxelAccess>(set: &NeighborSet<'a, G>, face: Face) -> Option<&'a G> {
    match face {
        Face::PosY => set.top,
        Face::NegY => set.bottom,
        Face::NegX => set.left,
        Face::PosX => set.right,
        Face::PosZ => set.front,
        Face::NegZ => set.back,
    }
}

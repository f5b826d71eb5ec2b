use crate::grid::{VoxelAccess, VoxelGrid};

/// The six chunks adjacent to the one being meshed. `None` marks the edge of the world.
///
/// Sides follow the mesher's axes: `top` is +Y, `bottom` -Y, `left` -X, `right` +X,
/// `front` +Z and `back` -Z.
pub struct NeighborSet<'a, G: VoxelAccess = VoxelGrid> {
    pub top: Option<&'a G>,
    pub bottom: Option<&'a G>,
    pub left: Option<&'a G>,
    pub right: Option<&'a G>,
    pub front: Option<&'a G>,
    pub back: Option<&'a G>,
}

// Manual impls: a derive would require `G: Clone`.
impl<G: VoxelAccess> Clone for NeighborSet<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: VoxelAccess> Copy for NeighborSet<'_, G> {}

impl<G: VoxelAccess> Default for NeighborSet<'_, G> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, G: VoxelAccess> NeighborSet<'a, G> {
    /// No neighbours at all: an isolated chunk.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            top: None,
            bottom: None,
            left: None,
            right: None,
            front: None,
            back: None,
        }
    }

    #[inline]
    pub const fn with_top(mut self, g: &'a G) -> Self {
        self.top = Some(g);
        self
    }

    #[inline]
    pub const fn with_bottom(mut self, g: &'a G) -> Self {
        self.bottom = Some(g);
        self
    }

    #[inline]
    pub const fn with_left(mut self, g: &'a G) -> Self {
        self.left = Some(g);
        self
    }

    #[inline]
    pub const fn with_right(mut self, g: &'a G) -> Self {
        self.right = Some(g);
        self
    }

    #[inline]
    pub const fn with_front(mut self, g: &'a G) -> Self {
        self.front = Some(g);
        self
    }

    #[inline]
    pub const fn with_back(mut self, g: &'a G) -> Self {
        self.back = Some(g);
        self
    }

    /// Number of present neighbours.
    pub fn present_count(&self) -> usize {
        [
            self.top.is_some(),
            self.bottom.is_some(),
            self.left.is_some(),
            self.right.is_some(),
            self.front.is_some(),
            self.back.is_some(),
        ]
        .into_iter()
        .filter(|&p| p)
        .count()
    }
}

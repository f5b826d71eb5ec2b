use tessel_geom::Vec2;

/// Which texture slot of a voxel a face samples from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FaceRole {
    Top,
    Bottom,
    Side,
}

/// Atlas rectangle. `origin` is the top-left corner in image space (v grows downward).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UvRect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl UvRect {
    #[inline]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }
}

/// Read-only atlas used by the mesher. Shared by every chunk build, so it must be `Sync`
/// wherever builds run in parallel.
pub trait AtlasLookup {
    /// Number of texture variants registered for a voxel type; `0` when unknown.
    fn variant_count(&self, voxel: u8) -> usize;

    /// UV rectangle for a face of `voxel` using `variant`, or `None` if either is unknown.
    fn face_uv(&self, voxel: u8, variant: usize, role: FaceRole) -> Option<UvRect>;

    /// Shared tile extent of the atlas.
    fn uv_size(&self) -> Vec2;

    /// Deterministic variant choice for a cell: `(x + y + z) mod variant_count`.
    #[inline]
    fn variant_at(&self, voxel: u8, x: usize, y: usize, z: usize) -> usize {
        select_variant(x, y, z, self.variant_count(voxel))
    }
}

/// Position-based variant selector. Returns `0` when there are no variants.
#[inline]
pub fn select_variant(x: usize, y: usize, z: usize, count: usize) -> usize {
    if count == 0 { 0 } else { (x + y + z) % count }
}

impl<T: AtlasLookup + ?Sized> AtlasLookup for &T {
    #[inline]
    fn variant_count(&self, voxel: u8) -> usize {
        (**self).variant_count(voxel)
    }

    #[inline]
    fn face_uv(&self, voxel: u8, variant: usize, role: FaceRole) -> Option<UvRect> {
        (**self).face_uv(voxel, variant, role)
    }

    #[inline]
    fn uv_size(&self) -> Vec2 {
        (**self).uv_size()
    }
}

/// Cell value for "no voxel".
pub const EMPTY: u8 = 0;

/// Chunk extents in cells along each axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Dims {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
}

impl Dims {
    #[inline]
    pub const fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self { sx, sy, sz }
    }

    #[inline]
    pub const fn volume(self) -> usize {
        self.sx * self.sy * self.sz
    }

    /// True when any axis has zero extent.
    #[inline]
    pub const fn is_degenerate(self) -> bool {
        self.sx == 0 || self.sy == 0 || self.sz == 0
    }
}

/// Read-only cell access. Anything that can answer `get` over a fixed box can be meshed.
pub trait VoxelAccess {
    fn dims(&self) -> Dims;

    /// Raw cell value at local coordinates. Callers stay within `dims()`.
    fn get(&self, x: usize, y: usize, z: usize) -> u8;

    #[inline]
    fn is_occupied(&self, x: usize, y: usize, z: usize) -> bool {
        self.get(x, y, z) != EMPTY
    }
}

/// Dense voxel storage for one chunk. `0` is empty, `v > 0` is voxel type `v - 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelGrid {
    sx: usize,
    sy: usize,
    sz: usize,
    cells: Vec<u8>,
}

impl VoxelGrid {
    /// All-empty grid.
    pub fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self {
            sx,
            sy,
            sz,
            cells: vec![EMPTY; sx * sy * sz],
        }
    }

    /// Wraps existing cells in `(y * sz + z) * sx + x` order, padding or truncating to fit.
    pub fn from_cells(sx: usize, sy: usize, sz: usize, cells: Vec<u8>) -> Self {
        let mut c = cells;
        let expect = sx * sy * sz;
        if c.len() != expect {
            c.resize(expect, EMPTY);
        }
        Self {
            sx,
            sy,
            sz,
            cells: c,
        }
    }

    /// Grid with every cell set to the encoded value for voxel type `ty`.
    pub fn filled(sx: usize, sy: usize, sz: usize, ty: u8) -> Self {
        Self {
            sx,
            sy,
            sz,
            cells: vec![ty.saturating_add(1); sx * sy * sz],
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.sx
            && (y as usize) < self.sy
            && (z as usize) < self.sz
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        self.cells[self.idx(x, y, z)]
    }

    /// Like `get` but returns `None` outside the grid.
    #[inline]
    pub fn get_checked(&self, x: i32, y: i32, z: i32) -> Option<u8> {
        if !self.contains(x, y, z) {
            return None;
        }
        Some(self.get(x as usize, y as usize, z as usize))
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: u8) {
        let i = self.idx(x, y, z);
        self.cells[i] = value;
    }

    /// Stores voxel type `ty` (encoded as `ty + 1`).
    #[inline]
    pub fn set_type(&mut self, x: usize, y: usize, z: usize, ty: u8) {
        self.set(x, y, z, ty.saturating_add(1));
    }

    #[inline]
    pub fn clear(&mut self, x: usize, y: usize, z: usize) {
        self.set(x, y, z, EMPTY);
    }

    #[inline]
    pub fn is_occupied(&self, x: usize, y: usize, z: usize) -> bool {
        self.get(x, y, z) != EMPTY
    }

    /// Decoded voxel type, or `None` for empty cells.
    #[inline]
    pub fn voxel_type(&self, x: usize, y: usize, z: usize) -> Option<u8> {
        self.get(x, y, z).checked_sub(1)
    }

    /// Fills the half-open box `[min, max)` with `value`, clamped to the grid.
    pub fn fill_box(&mut self, min: [usize; 3], max: [usize; 3], value: u8) {
        let x1 = max[0].min(self.sx);
        let y1 = max[1].min(self.sy);
        let z1 = max[2].min(self.sz);
        for y in min[1]..y1 {
            for z in min[2]..z1 {
                for x in min[0]..x1 {
                    self.set(x, y, z, value);
                }
            }
        }
    }

    #[inline]
    pub fn dims(&self) -> Dims {
        Dims::new(self.sx, self.sy, self.sz)
    }

    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY).count()
    }

    #[inline]
    pub fn has_occupied(&self) -> bool {
        self.cells.iter().any(|&c| c != EMPTY)
    }

    #[inline]
    pub fn is_all_empty(&self) -> bool {
        !self.has_occupied()
    }
}

impl VoxelAccess for VoxelGrid {
    #[inline]
    fn dims(&self) -> Dims {
        VoxelGrid::dims(self)
    }

    #[inline]
    fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        VoxelGrid::get(self, x, y, z)
    }
}

impl<T: VoxelAccess + ?Sized> VoxelAccess for &T {
    #[inline]
    fn dims(&self) -> Dims {
        (**self).dims()
    }

    #[inline]
    fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        (**self).get(x, y, z)
    }
}

use std::fs;
use std::path::Path;

use hashbrown::HashMap;
use tessel_geom::Vec2;

use crate::config::{AtlasConfig, VariantEntry};
use crate::error::AtlasError;
use crate::types::{AtlasLookup, FaceRole, UvRect};

const EDGE_EPS: f32 = 1e-4;

/// Atlas origins of one texture variant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FaceOrigins {
    pub top: Vec2,
    pub bottom: Vec2,
    pub side: Vec2,
}

impl FaceOrigins {
    /// Same tile on every face.
    #[inline]
    pub const fn uniform(origin: Vec2) -> Self {
        Self {
            top: origin,
            bottom: origin,
            side: origin,
        }
    }

    #[inline]
    pub fn for_role(&self, role: FaceRole) -> Vec2 {
        match role {
            FaceRole::Top => self.top,
            FaceRole::Bottom => self.bottom,
            FaceRole::Side => self.side,
        }
    }
}

impl From<VariantEntry> for FaceOrigins {
    fn from(entry: VariantEntry) -> Self {
        match entry {
            VariantEntry::All(o) => FaceOrigins::uniform(o.into()),
            VariantEntry::PerFace { top, side, bottom } => FaceOrigins {
                top: top.into(),
                bottom: bottom.unwrap_or(side).into(),
                side: side.into(),
            },
        }
    }
}

/// In-memory atlas table. Built once, then shared read-only by every chunk build.
#[derive(Clone, Debug)]
pub struct AtlasTable {
    tile_size: Vec2,
    entries: HashMap<u8, Vec<FaceOrigins>>,
    by_name: HashMap<String, u8>,
}

impl AtlasTable {
    pub fn new(tile_size: Vec2) -> Result<Self, AtlasError> {
        let valid = |s: f32| s > 0.0 && s <= 1.0;
        if !valid(tile_size.x) || !valid(tile_size.y) {
            return Err(AtlasError::InvalidTileSize(tile_size.x, tile_size.y));
        }
        Ok(Self {
            tile_size,
            entries: HashMap::new(),
            by_name: HashMap::new(),
        })
    }

    /// Table for a regular `cols x rows` sheet with tile size `1/cols, 1/rows`.
    pub fn for_grid(cols: u32, rows: u32) -> Result<Self, AtlasError> {
        if cols == 0 || rows == 0 {
            return Err(AtlasError::InvalidTileSize(0.0, 0.0));
        }
        Self::new(Vec2::new(1.0 / cols as f32, 1.0 / rows as f32))
    }

    /// Image-space origin of tile `(col, row)` in this table's grid, counted from the top-left.
    pub fn tile_origin(&self, col: u32, row: u32) -> Result<Vec2, AtlasError> {
        // whole tiles only; the slack absorbs `1/3`-style sizes
        let cols = (1.0 / self.tile_size.x + EDGE_EPS).floor() as u32;
        let rows = (1.0 / self.tile_size.y + EDGE_EPS).floor() as u32;
        if col >= cols || row >= rows {
            return Err(AtlasError::TileOutOfGrid {
                col,
                row,
                cols,
                rows,
            });
        }
        Ok(Vec2::new(
            col as f32 * self.tile_size.x,
            row as f32 * self.tile_size.y,
        ))
    }

    /// Registers all variants of a voxel type. Each type may be inserted once.
    pub fn insert(&mut self, voxel: u8, variants: Vec<FaceOrigins>) -> Result<(), AtlasError> {
        if self.entries.contains_key(&voxel) {
            return Err(AtlasError::DuplicateVoxel(voxel));
        }
        if variants.is_empty() {
            return Err(AtlasError::NoVariants(voxel));
        }
        for (variant, fo) in variants.iter().enumerate() {
            for o in [fo.top, fo.bottom, fo.side] {
                let ok = |c: f32| (0.0..1.0).contains(&c);
                if !ok(o.x) || !ok(o.y) {
                    return Err(AtlasError::OriginOutOfRange {
                        voxel,
                        variant,
                        u: o.x,
                        v: o.y,
                    });
                }
                if o.x + self.tile_size.x > 1.0 + EDGE_EPS || o.y + self.tile_size.y > 1.0 + EDGE_EPS {
                    return Err(AtlasError::TileOverflow {
                        voxel,
                        variant,
                        u: o.x,
                        v: o.y,
                    });
                }
            }
        }
        self.entries.insert(voxel, variants);
        Ok(())
    }

    pub fn insert_named(
        &mut self,
        name: &str,
        voxel: u8,
        variants: Vec<FaceOrigins>,
    ) -> Result<(), AtlasError> {
        self.insert(voxel, variants)?;
        self.by_name.insert(name.to_string(), voxel);
        Ok(())
    }

    pub fn id_by_name(&self, name: &str) -> Option<u8> {
        self.by_name.get(name).copied()
    }

    /// Registered voxel types in ascending order.
    pub fn voxels(&self) -> Vec<u8> {
        let mut ids: Vec<u8> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_config(cfg: AtlasConfig) -> Result<Self, AtlasError> {
        let mut table = AtlasTable::new(cfg.tile_size.into())?;
        for entry in cfg.voxels {
            let variants = entry.variants.into_iter().map(FaceOrigins::from).collect();
            match entry.name {
                Some(name) => table.insert_named(&name, entry.index, variants)?,
                None => table.insert(entry.index, variants)?,
            }
        }
        log::debug!(
            target: "atlas",
            "atlas loaded: {} voxel type(s), tile {}x{}",
            table.len(),
            table.tile_size.x,
            table.tile_size.y
        );
        Ok(table)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, AtlasError> {
        let cfg: AtlasConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

impl AtlasLookup for AtlasTable {
    #[inline]
    fn variant_count(&self, voxel: u8) -> usize {
        self.entries.get(&voxel).map_or(0, Vec::len)
    }

    #[inline]
    fn face_uv(&self, voxel: u8, variant: usize, role: FaceRole) -> Option<UvRect> {
        let fo = self.entries.get(&voxel)?.get(variant)?;
        Some(UvRect::new(fo.for_role(role), self.tile_size))
    }

    #[inline]
    fn uv_size(&self) -> Vec2 {
        self.tile_size
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("atlas io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("atlas parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("tile size must be positive and at most 1, got ({0}, {1})")]
    InvalidTileSize(f32, f32),

    #[error("voxel {voxel} variant {variant}: origin ({u}, {v}) outside [0,1)")]
    OriginOutOfRange {
        voxel: u8,
        variant: usize,
        u: f32,
        v: f32,
    },

    #[error("voxel {voxel} variant {variant}: tile at ({u}, {v}) runs past the atlas edge")]
    TileOverflow {
        voxel: u8,
        variant: usize,
        u: f32,
        v: f32,
    },

    #[error("voxel {0} declared more than once")]
    DuplicateVoxel(u8),

    #[error("voxel {0} has no variants")]
    NoVariants(u8),

    #[error("tile ({col}, {row}) outside a {cols}x{rows} grid")]
    TileOutOfGrid {
        col: u32,
        row: u32,
        cols: u32,
        rows: u32,
    },
}

use serde::Deserialize;

// Top-level atlas file
#[derive(Deserialize, Debug, Clone)]
pub struct AtlasConfig {
    /// Shared tile extent in UV units.
    pub tile_size: [f32; 2],
    #[serde(default, rename = "voxel")]
    pub voxels: Vec<VoxelEntry>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct VoxelEntry {
    /// Voxel type index (cell value minus one).
    pub index: u8,
    #[serde(default)]
    pub name: Option<String>,
    pub variants: Vec<VariantEntry>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum VariantEntry {
    // Simple: every face uses the same tile, e.g. [0.25, 0.5]
    All([f32; 2]),
    // Detailed: { top = [..], side = [..], bottom = [..] }; bottom defaults to side
    PerFace {
        top: [f32; 2],
        side: [f32; 2],
        #[serde(default)]
        bottom: Option<[f32; 2]>,
    },
}

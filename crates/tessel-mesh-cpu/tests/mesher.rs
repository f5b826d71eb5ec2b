use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tessel_atlas::{AtlasLookup, AtlasTable, FaceOrigins};
use tessel_geom::{Vec2, Vec3};
use tessel_grid::{NeighborSet, VoxelGrid};
use tessel_mesh_cpu::{
    ChunkMesher, ConfigError, EdgePolicy, Face, IndexFormat, Indices, Jitter, MeshConfig,
    MeshError, build_mesh,
};

/// Four voxel types on a 4x4 sheet. Type 0 sits at tile (1,2) so its origin is (0.25, 0.5).
fn test_atlas() -> AtlasTable {
    let mut t = AtlasTable::for_grid(4, 4).unwrap();
    t.insert(0, vec![FaceOrigins::uniform(Vec2::new(0.25, 0.5))]).unwrap();
    t.insert(
        1,
        vec![FaceOrigins {
            top: Vec2::new(0.0, 0.0),
            bottom: Vec2::new(0.5, 0.0),
            side: Vec2::new(0.25, 0.0),
        }],
    )
    .unwrap();
    t.insert(
        2,
        (0..3)
            .map(|i| FaceOrigins::uniform(Vec2::new(0.25 * i as f32, 0.75)))
            .collect(),
    )
    .unwrap();
    t.insert(3, vec![FaceOrigins::uniform(Vec2::new(0.75, 0.25))]).unwrap();
    t
}

fn mesher(policy: EdgePolicy) -> ChunkMesher {
    ChunkMesher::new(MeshConfig {
        open_world_edges: policy,
        ..MeshConfig::default()
    })
}

fn isolated() -> NeighborSet<'static, VoxelGrid> {
    NeighborSet::empty()
}

#[test]
fn single_voxel_emits_six_faces() {
    let mut grid = VoxelGrid::new(3, 3, 3);
    grid.set_type(1, 1, 1, 0);
    let atlas = test_atlas();
    let mesh = build_mesh(&grid, &isolated(), &atlas, Vec3::ONE).unwrap();
    assert_eq!(mesh.quad_count(), 6);
    assert_eq!(mesh.vertex_count(), 24);
    assert_eq!(mesh.index_count(), 36);
    assert_eq!(mesh.normals.len(), 24);
    assert_eq!(mesh.tangents.len(), 24);
    assert_eq!(mesh.uv0.len(), 24);
    for face in Face::ALL {
        assert_eq!(mesh.face_quad_count(face), 1, "{face:?}");
    }
}

#[test]
fn closed_unit_chunk_without_neighbors_is_empty() {
    let grid = VoxelGrid::filled(1, 1, 1, 0);
    let atlas = test_atlas();
    let mesh = mesher(EdgePolicy::Cull)
        .build(&grid, &isolated(), &atlas)
        .unwrap();
    assert!(mesh.is_empty());
    assert!(mesh.indices.is_empty());
    assert!(mesh.bounds().is_none());

    let drawn = mesher(EdgePolicy::Draw)
        .build(&grid, &isolated(), &atlas)
        .unwrap();
    assert_eq!(drawn.quad_count(), 6);
}

#[test]
fn adjacent_pair_culls_shared_face() {
    let mut grid = VoxelGrid::new(4, 3, 3);
    grid.set_type(1, 1, 1, 0);
    grid.set_type(2, 1, 1, 3);
    let atlas = test_atlas();
    let (mesh, stats) = mesher(EdgePolicy::Cull)
        .build_with_stats(&grid, &isolated(), &atlas)
        .unwrap();
    assert_eq!(mesh.quad_count(), 10);
    assert_eq!(stats.total_faces(), 10);
    assert_eq!(stats.faces_for(Face::PosX), 1);
    assert_eq!(stats.faces_for(Face::NegX), 1);
    assert_eq!(stats.faces_for(Face::PosY), 2);
    assert!((mesh.surface_area() - 10.0).abs() < 1e-4);
}

#[test]
fn top_face_uvs_follow_atlas_origin() {
    let mut grid = VoxelGrid::new(3, 3, 3);
    grid.set_type(1, 1, 1, 0);
    let atlas = test_atlas();
    let mesh = build_mesh(&grid, &isolated(), &atlas, Vec3::ONE).unwrap();
    let top = mesh.face_vertex_range(Face::PosY);
    assert_eq!(
        &mesh.uv0[top],
        &[[0.25, 0.25], [0.25, 0.5], [0.5, 0.5], [0.5, 0.25]]
    );
}

#[test]
fn side_faces_keep_texture_upright() {
    let mut grid = VoxelGrid::new(1, 1, 1);
    grid.set_type(0, 0, 0, 0);
    let atlas = test_atlas();
    let mesh = mesher(EdgePolicy::Draw)
        .build(&grid, &isolated(), &atlas)
        .unwrap();
    for face in [Face::NegX, Face::PosX, Face::PosZ, Face::NegZ] {
        let r = mesh.face_vertex_range(face);
        let pos = &mesh.positions[r.clone()];
        let uv = &mesh.uv0[r];
        for k in 0..4 {
            // Higher vertices sample higher in the tile
            let expect_v = if pos[k][1] > 0.5 { 0.5 } else { 0.25 };
            assert_eq!(uv[k][1], expect_v, "{face:?} vertex {k}");
        }
    }
}

#[test]
fn variant_is_chosen_by_position_sum() {
    let atlas = test_atlas();
    assert_eq!(atlas.variant_count(2), 3);
    assert_eq!(atlas.variant_at(2, 2, 3, 4), 0);

    let mut grid = VoxelGrid::new(5, 5, 5);
    grid.set_type(2, 3, 4, 2);
    grid.set_type(0, 0, 1, 2);
    let mesh = mesher(EdgePolicy::Cull)
        .build(&grid, &isolated(), &atlas)
        .unwrap();
    let top = mesh.face_vertex_range(Face::PosY);
    assert_eq!(mesh.face_quad_count(Face::PosY), 2);
    // Cells are visited y-major, so (0,0,1) comes first: variant 1, then (2,3,4): variant 0.
    let first = &mesh.uv0[top.start..top.start + 4];
    let second = &mesh.uv0[top.start + 4..top.end];
    assert_eq!(first[0], [0.25, 0.0]);
    assert_eq!(second[0], [0.0, 0.0]);
}

#[test]
fn corner_templates_and_indices() {
    let mut grid = VoxelGrid::new(1, 1, 1);
    grid.set_type(0, 0, 0, 1);
    let atlas = test_atlas();
    let mesh = mesher(EdgePolicy::Draw)
        .build(&grid, &isolated(), &atlas)
        .unwrap();

    let expect: [(Face, [[f32; 3]; 4]); 6] = [
        (Face::PosY, [[0., 1., 0.], [0., 1., 1.], [1., 1., 1.], [1., 1., 0.]]),
        (Face::NegY, [[0., 0., 1.], [0., 0., 0.], [1., 0., 0.], [1., 0., 1.]]),
        (Face::NegX, [[0., 0., 0.], [0., 0., 1.], [0., 1., 1.], [0., 1., 0.]]),
        (Face::PosX, [[1., 0., 1.], [1., 0., 0.], [1., 1., 0.], [1., 1., 1.]]),
        (Face::PosZ, [[0., 0., 1.], [1., 0., 1.], [1., 1., 1.], [0., 1., 1.]]),
        (Face::NegZ, [[1., 0., 0.], [0., 0., 0.], [0., 1., 0.], [1., 1., 0.]]),
    ];
    for (face, corners) in expect {
        let r = mesh.face_vertex_range(face);
        assert_eq!(&mesh.positions[r.clone()], &corners, "{face:?}");
        for k in r.clone() {
            assert_eq!(mesh.normals[k], face.normal().to_array());
        }
        let tangent = match face {
            Face::PosY | Face::NegY => [1.0, 0.0, 0.0, -1.0],
            _ => [0.0, 0.0, -1.0, 1.0],
        };
        assert!(mesh.tangents[r.clone()].iter().all(|t| *t == tangent));

        let base = r.start as u32;
        let ir = mesh.face_index_range(face);
        let idx: Vec<u32> = ir.map(|i| mesh.indices.get(i)).collect();
        assert_eq!(idx, vec![base, base + 1, base + 2, base + 2, base + 3, base]);
    }
}

#[test]
fn triangles_wind_counter_clockwise_outward() {
    let mut grid = VoxelGrid::new(3, 2, 2);
    grid.fill_box([0, 0, 0], [2, 2, 1], 1);
    grid.set_type(2, 1, 1, 3);
    let atlas = test_atlas();
    let mesh = mesher(EdgePolicy::Draw)
        .build(&grid, &isolated(), &atlas)
        .unwrap();
    assert!(!mesh.is_empty());
    for t in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(t).map(|i| Vec3::from(mesh.positions[i as usize]));
        let n = Vec3::from(mesh.normals[mesh.triangle(t)[0] as usize]);
        let geo = (b - a).cross(c - a);
        assert!(geo.dot(n) > 0.0, "triangle {t} faces inward");
    }
}

#[test]
fn voxel_size_scales_positions() {
    let grid = VoxelGrid::filled(2, 1, 1, 0);
    let atlas = test_atlas();
    let mesher = ChunkMesher::new(MeshConfig {
        voxel_size: [2.0, 0.5, 1.0],
        open_world_edges: EdgePolicy::Draw,
        ..MeshConfig::default()
    });
    let mesh = mesher.build(&grid, &isolated(), &atlas).unwrap();
    let bb = mesh.bounds().unwrap();
    assert_eq!(bb.min, Vec3::ZERO);
    assert_eq!(bb.max, Vec3::new(4.0, 0.5, 1.0));
}

fn pos_x_faces(
    grid: &VoxelGrid,
    nb: NeighborSet<'_, VoxelGrid>,
    atlas: &AtlasTable,
    policy: EdgePolicy,
) -> usize {
    mesher(policy)
        .build(grid, &nb, atlas)
        .unwrap()
        .face_quad_count(Face::PosX)
}

#[test]
fn neighbors_cull_boundary_faces() {
    let grid = VoxelGrid::filled(2, 2, 2, 0);
    let solid = VoxelGrid::filled(2, 2, 2, 1);
    let air = VoxelGrid::new(2, 2, 2);
    let atlas = test_atlas();

    let count_pos_x = |nb: NeighborSet<VoxelGrid>, policy: EdgePolicy| -> usize {
        pos_x_faces(&grid, nb, &atlas, policy)
    };
    assert_eq!(count_pos_x(NeighborSet::empty().with_right(&solid), EdgePolicy::Draw), 0);
    assert_eq!(count_pos_x(NeighborSet::empty().with_right(&air), EdgePolicy::Cull), 4);
    assert_eq!(count_pos_x(NeighborSet::empty(), EdgePolicy::Cull), 0);
    assert_eq!(count_pos_x(NeighborSet::empty(), EdgePolicy::Draw), 4);

    // Only the neighbour cell directly across the border matters
    let mut partial = VoxelGrid::new(2, 2, 2);
    partial.set_type(0, 1, 1, 0);
    partial.set_type(1, 0, 0, 0);
    assert_eq!(count_pos_x(NeighborSet::empty().with_right(&partial), EdgePolicy::Cull), 3);
}

#[test]
fn negative_side_reads_neighbor_far_layer() {
    // Bottom neighbour is deeper than the chunk; its top layer is y = 4.
    let grid = VoxelGrid::filled(2, 2, 2, 0);
    let mut below = VoxelGrid::new(2, 5, 2);
    below.set_type(0, 4, 0, 0);
    below.set_type(1, 0, 1, 0);
    let atlas = test_atlas();
    let nb = NeighborSet::empty().with_bottom(&below);
    let mesh = mesher(EdgePolicy::Cull).build(&grid, &nb, &atlas).unwrap();
    assert_eq!(mesh.face_quad_count(Face::NegY), 3);
    for k in mesh.face_vertex_range(Face::NegY) {
        assert_eq!(mesh.positions[k][1], 0.0);
    }
}

#[test]
fn mismatched_neighbor_is_rejected() {
    let grid = VoxelGrid::filled(2, 2, 2, 0);
    let wide = VoxelGrid::new(3, 2, 2);
    let atlas = test_atlas();
    let err = mesher(EdgePolicy::Cull)
        .build(&grid, &NeighborSet::empty().with_top(&wide), &atlas)
        .unwrap_err();
    match err {
        MeshError::DimensionMismatch {
            face,
            expected,
            found,
        } => {
            assert_eq!(face, Face::PosY);
            assert_eq!(expected, [2, 2]);
            assert_eq!(found.sx, 3);
        }
        other => panic!("unexpected error {other:?}"),
    }

    // Depth along the crossing axis may differ
    let deep = VoxelGrid::new(7, 2, 2);
    assert!(
        mesher(EdgePolicy::Cull)
            .build(&grid, &NeighborSet::empty().with_left(&deep), &atlas)
            .is_ok()
    );
    let flat = VoxelGrid::new(2, 2, 0);
    assert!(matches!(
        mesher(EdgePolicy::Cull).build(&grid, &NeighborSet::empty().with_front(&flat), &atlas),
        Err(MeshError::DimensionMismatch { face: Face::PosZ, .. })
    ));
}

#[test]
fn u16_overflow_is_a_capacity_error() {
    // 128x1x64 plate with drawn edges: 2*8192 + 2*128 + 2*64 = 16768 quads
    let grid = VoxelGrid::filled(128, 1, 64, 0);
    let atlas = test_atlas();
    let narrow = ChunkMesher::new(MeshConfig {
        index_format: IndexFormat::U16,
        open_world_edges: EdgePolicy::Draw,
        ..MeshConfig::default()
    });
    match narrow.build(&grid, &isolated(), &atlas) {
        Err(MeshError::Capacity {
            vertices,
            limit,
            format,
        }) => {
            assert_eq!(vertices, 16768 * 4);
            assert_eq!(limit, 65535);
            assert_eq!(format, IndexFormat::U16);
        }
        other => panic!("expected capacity error, got {other:?}"),
    }

    let wide = mesher(EdgePolicy::Draw).build(&grid, &isolated(), &atlas).unwrap();
    assert_eq!(wide.quad_count(), 16768);
    assert!(matches!(wide.indices, Indices::U32(_)));
    let max = wide.indices.iter().max().unwrap();
    assert_eq!(max as usize, wide.vertex_count() - 1);
}

#[test]
fn u16_indices_within_limit() {
    let grid = VoxelGrid::filled(16, 16, 16, 3);
    let atlas = test_atlas();
    let m = ChunkMesher::new(MeshConfig {
        index_format: IndexFormat::U16,
        open_world_edges: EdgePolicy::Draw,
        ..MeshConfig::default()
    });
    let mesh = m.build(&grid, &isolated(), &atlas).unwrap();
    assert_eq!(mesh.quad_count(), 6 * 16 * 16);
    assert!(matches!(mesh.indices, Indices::U16(_)));
    assert_eq!(mesh.indices.to_u32_vec().len(), mesh.index_count());
}

#[test]
fn missing_atlas_entry_only_matters_when_visible() {
    let atlas = test_atlas();
    let mut grid = VoxelGrid::new(3, 3, 3);
    grid.set_type(1, 1, 1, 9);
    assert!(matches!(
        mesher(EdgePolicy::Cull).build(&grid, &isolated(), &atlas),
        Err(MeshError::MissingAtlasEntry { voxel: 9 })
    ));

    // Fully enclosed unknown type emits nothing and is fine
    let mut enclosed = VoxelGrid::filled(3, 3, 3, 0);
    enclosed.set_type(1, 1, 1, 9);
    let mesh = mesher(EdgePolicy::Cull)
        .build(&enclosed, &isolated(), &atlas)
        .unwrap();
    assert!(mesh.is_empty());
}

#[test]
fn empty_inputs_are_not_errors() {
    let atlas = test_atlas();
    let void = VoxelGrid::new(4, 4, 4);
    assert!(build_mesh(&void, &isolated(), &atlas, Vec3::ONE).unwrap().is_empty());

    let degenerate = VoxelGrid::new(0, 4, 4);
    let (mesh, stats) = mesher(EdgePolicy::Draw)
        .build_with_stats(&degenerate, &isolated(), &atlas)
        .unwrap();
    assert!(mesh.is_empty());
    assert_eq!(stats.total_faces(), 0);
}

#[test]
fn parallel_sequential_and_pooled_builds_match() {
    let mut grid = VoxelGrid::new(8, 8, 8);
    for y in 0..8 {
        for z in 0..8 {
            for x in 0..8 {
                if (x * 7 + y * 3 + z * 5) % 4 != 0 {
                    grid.set_type(x, y, z, ((x + z) % 4) as u8);
                }
            }
        }
    }
    let atlas = test_atlas();
    let par = mesher(EdgePolicy::Draw).build(&grid, &isolated(), &atlas).unwrap();
    let again = mesher(EdgePolicy::Draw).build(&grid, &isolated(), &atlas).unwrap();
    let seq = ChunkMesher::new(MeshConfig {
        open_world_edges: EdgePolicy::Draw,
        parallel: false,
        ..MeshConfig::default()
    })
    .build(&grid, &isolated(), &atlas)
    .unwrap();
    let pooled = mesher(EdgePolicy::Draw)
        .with_threads(2)
        .unwrap()
        .build(&grid, &isolated(), &atlas)
        .unwrap();
    assert!(!par.is_empty());
    assert_eq!(par, again);
    assert_eq!(par, seq);
    assert_eq!(par, pooled);
}

#[test]
fn cancellation_is_checked_between_passes() {
    let grid = VoxelGrid::filled(4, 4, 4, 0);
    let atlas = test_atlas();
    let m = mesher(EdgePolicy::Draw);
    let cancel = AtomicBool::new(true);
    assert!(matches!(
        m.build_cancellable(&grid, &isolated(), &atlas, &cancel),
        Err(MeshError::Cancelled)
    ));
    let go = AtomicBool::new(false);
    let (mesh, _) = m.build_cancellable(&grid, &isolated(), &atlas, &go).unwrap();
    assert_eq!(mesh.quad_count(), 6 * 16);
}

#[test]
fn jitter_offsets_heights_by_noise() {
    let mut grid = VoxelGrid::new(1, 1, 1);
    grid.set_type(0, 0, 0, 0);
    let atlas = test_atlas();
    let config = MeshConfig {
        voxel_size: [1.0, 2.0, 1.0],
        open_world_edges: EdgePolicy::Draw,
        jitter: Jitter { amplitude: 0.5 },
        ..MeshConfig::default()
    };
    let flat = ChunkMesher::new(config.clone())
        .build(&grid, &isolated(), &atlas)
        .unwrap();
    let bumped = ChunkMesher::new(config)
        .with_noise(Arc::new(|_x: f32, _y: f32, _z: f32| -> f32 { 1.0 }))
        .build(&grid, &isolated(), &atlas)
        .unwrap();
    for (a, b) in flat.positions.iter().zip(&bumped.positions) {
        assert_eq!(a[0], b[0]);
        assert_eq!(b[1], a[1] + 1.0);
        assert_eq!(a[2], b[2]);
    }

    // Noise without amplitude changes nothing
    let silent = ChunkMesher::new(MeshConfig {
        open_world_edges: EdgePolicy::Draw,
        ..MeshConfig::default()
    })
    .with_noise(Arc::new(|_x: f32, _y: f32, _z: f32| -> f32 { 1.0 }))
    .build(&grid, &isolated(), &atlas)
    .unwrap();
    assert_eq!(silent.positions, ChunkMesher::new(MeshConfig {
        open_world_edges: EdgePolicy::Draw,
        ..MeshConfig::default()
    })
    .build(&grid, &isolated(), &atlas)
    .unwrap()
    .positions);
}

#[test]
fn jitter_is_seamless_across_chunks() {
    let a = VoxelGrid::filled(2, 2, 2, 0);
    let b = VoxelGrid::filled(2, 2, 2, 0);
    let atlas = test_atlas();
    let base = ChunkMesher::new(MeshConfig {
        open_world_edges: EdgePolicy::Draw,
        jitter: Jitter { amplitude: 0.25 },
        ..MeshConfig::default()
    })
    .with_noise(Arc::new(|x: f32, y: f32, z: f32| -> f32 { (x * 0.37 + y * 0.11 - z * 0.53).sin() }));

    // Chunk a at lattice origin 0, chunk b directly to its +X side.
    let ma = base.at_origin([0, 0, 0]).build(&a, &isolated(), &atlas).unwrap();
    let mb = base.at_origin([2, 0, 0]).build(&b, &isolated(), &atlas).unwrap();

    let mut seam_a: Vec<[f32; 3]> = ma.positions[ma.face_vertex_range(Face::PosX)].to_vec();
    let mut seam_b: Vec<[f32; 3]> = mb.positions[mb.face_vertex_range(Face::NegX)]
        .iter()
        .map(|p| [p[0] + 2.0, p[1], p[2]])
        .collect();
    let key = |p: &[f32; 3]| (p[2].to_bits(), p[1].to_bits());
    seam_a.sort_by_key(key);
    seam_b.sort_by_key(key);
    assert_eq!(seam_a, seam_b);
}

#[test]
fn config_parses_from_toml() {
    let cfg = MeshConfig::from_toml_str(
        r#"
        voxel_size = [0.5, 0.5, 0.5]
        open-world-edges = "draw"
        index_format = "u16"
        parallel = false

        [jitter]
        amplitude = 0.1
        "#,
    )
    .unwrap();
    assert_eq!(cfg.open_world_edges, EdgePolicy::Draw);
    assert_eq!(cfg.index_format, IndexFormat::U16);
    assert!(!cfg.parallel);
    assert_eq!(cfg.jitter.amplitude, 0.1);
    assert_eq!(cfg.noise_origin, [0, 0, 0]);

    let defaults = MeshConfig::from_toml_str("").unwrap();
    assert_eq!(defaults, MeshConfig::default());

    assert!(matches!(
        MeshConfig::from_toml_str("voxel_size = [1.0, 0.0, 1.0]"),
        Err(ConfigError::InvalidVoxelSize(_))
    ));
    assert!(matches!(
        MeshConfig::from_toml_str("open_world_edges = \"sometimes\""),
        Err(ConfigError::Parse(_))
    ));

    let grid = VoxelGrid::filled(1, 1, 1, 0);
    let bad = ChunkMesher::new(MeshConfig {
        voxel_size: [f32::NAN, 1.0, 1.0],
        ..MeshConfig::default()
    });
    assert!(matches!(
        bad.build(&grid, &isolated(), &test_atlas()),
        Err(MeshError::Config(ConfigError::InvalidVoxelSize(_)))
    ));
}

use std::io::{self, Write};

use tessel_geom::Vec3;
use tessel_grid::ChunkCoord;
use tessel_mesh_cpu::MeshBuffers;

/// Streams chunk meshes into one Wavefront OBJ, one `o` group per chunk.
pub struct ObjWriter<W: Write> {
    out: W,
    /// Vertices already written; OBJ indices are global and 1-based.
    written: usize,
}

impl<W: Write> ObjWriter<W> {
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "# tessel chunk export")?;
        Ok(Self { out, written: 0 })
    }

    /// Appends `mesh`, translated to the chunk's world position.
    pub fn write_chunk(&mut self, coord: ChunkCoord, offset: Vec3, mesh: &MeshBuffers) -> io::Result<()> {
        if mesh.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "o chunk_{}_{}_{}", coord.cx, coord.cy, coord.cz)?;
        for p in &mesh.positions {
            let w = Vec3::from(*p) + offset;
            writeln!(self.out, "v {} {} {}", w.x, w.y, w.z)?;
        }
        for uv in &mesh.uv0 {
            writeln!(self.out, "vt {} {}", uv[0], uv[1])?;
        }
        for n in &mesh.normals {
            writeln!(self.out, "vn {} {} {}", n[0], n[1], n[2])?;
        }
        for t in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle(t).map(|i| i as usize + self.written + 1);
            writeln!(self.out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
        }
        self.written += mesh.vertex_count();
        Ok(())
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

use std::collections::HashMap;

use cgmath::{Matrix4, Point3, Transform as _};

use crate::mesh::MeshData;
use crate::{Error, Result};

/// World-space snapshot of a mesh: transformed, de-duplicated positions plus
/// triangle indices remapped onto the de-duplicated list.
#[derive(Clone, Debug)]
pub struct WorldGeometry {
    positions: Vec<Point3<f64>>,
    triangles: Vec<[u32; 3]>,
}

impl WorldGeometry {
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn triangle(&self, face_index: usize) -> Option<[Point3<f64>; 3]> {
        let tri = self.triangles.get(face_index)?;
        Some([
            self.positions[tri[0] as usize],
            self.positions[tri[1] as usize],
            self.positions[tri[2] as usize],
        ])
    }
}

/// Reads a mesh's buffers into world space. De-duplication compares
/// positions by exact equality, no epsilon, so a box keeps exactly eight
/// unique corners. Pure read; fails with `NoGeometry` on an empty mesh.
pub fn extract_world_geometry(mesh: &MeshData, world: &Matrix4<f64>) -> Result<WorldGeometry> {
    if mesh.is_empty() {
        return Err(Error::NoGeometry);
    }

    let mut positions = Vec::new();
    let mut remap = Vec::with_capacity(mesh.positions().len());
    let mut seen: HashMap<[u64; 3], u32> = HashMap::new();

    for local in mesh.positions() {
        let point = world.transform_point(*local);
        let index = *seen.entry(position_key(point)).or_insert_with(|| {
            positions.push(point);
            (positions.len() - 1) as u32
        });
        remap.push(index);
    }

    let triangles = mesh
        .triangles()
        .iter()
        .map(|tri| {
            [
                remap[tri[0] as usize],
                remap[tri[1] as usize],
                remap[tri[2] as usize],
            ]
        })
        .collect();

    Ok(WorldGeometry {
        positions,
        triangles,
    })
}

fn position_key(point: Point3<f64>) -> [u64; 3] {
    [canonical_bits(point.x), canonical_bits(point.y), canonical_bits(point.z)]
}

// -0.0 compares equal to 0.0 but has different bits; fold it so the key
// matches exact float equality.
fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 { 0.0f64 } else { value }.to_bits()
}

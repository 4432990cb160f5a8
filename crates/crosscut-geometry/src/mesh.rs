use cgmath::Point3;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Triangle mesh payload: ordered positions, triangle indices into them, and
/// an optional per-vertex alpha channel used by picking.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MeshData {
    positions: Vec<Point3<f64>>,
    triangles: Vec<[u32; 3]>,
    vertex_alpha: Option<Vec<f64>>,
}

impl MeshData {
    pub fn new(positions: Vec<Point3<f64>>, triangles: Vec<[u32; 3]>) -> Result<Self> {
        let vertex_count = positions.len();
        for tri in &triangles {
            for &index in tri {
                if index as usize >= vertex_count {
                    return Err(Error::IndexOutOfBounds {
                        index,
                        vertex_count,
                    });
                }
            }
        }
        Ok(Self {
            positions,
            triangles,
            vertex_alpha: None,
        })
    }

    pub fn with_vertex_alpha(mut self, alpha: Vec<f64>) -> Result<Self> {
        if alpha.len() != self.positions.len() {
            return Err(Error::AlphaCountMismatch {
                alpha_count: alpha.len(),
                vertex_count: self.positions.len(),
            });
        }
        self.vertex_alpha = Some(alpha);
        Ok(self)
    }

    /// Box centered at the origin with duplicated per-face corners
    /// (24 positions, 8 unique), the layout GPU meshes carry.
    pub fn box_mesh(width: f64, height: f64, depth: f64) -> Self {
        let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);
        let faces: [[Point3<f64>; 4]; 6] = [
            // +X
            [
                Point3::new(hw, -hh, -hd),
                Point3::new(hw, hh, -hd),
                Point3::new(hw, hh, hd),
                Point3::new(hw, -hh, hd),
            ],
            // -X
            [
                Point3::new(-hw, -hh, hd),
                Point3::new(-hw, hh, hd),
                Point3::new(-hw, hh, -hd),
                Point3::new(-hw, -hh, -hd),
            ],
            // +Y
            [
                Point3::new(-hw, hh, -hd),
                Point3::new(-hw, hh, hd),
                Point3::new(hw, hh, hd),
                Point3::new(hw, hh, -hd),
            ],
            // -Y
            [
                Point3::new(-hw, -hh, hd),
                Point3::new(-hw, -hh, -hd),
                Point3::new(hw, -hh, -hd),
                Point3::new(hw, -hh, hd),
            ],
            // +Z
            [
                Point3::new(-hw, -hh, hd),
                Point3::new(hw, -hh, hd),
                Point3::new(hw, hh, hd),
                Point3::new(-hw, hh, hd),
            ],
            // -Z
            [
                Point3::new(hw, -hh, -hd),
                Point3::new(-hw, -hh, -hd),
                Point3::new(-hw, hh, -hd),
                Point3::new(hw, hh, -hd),
            ],
        ];

        let mut positions = Vec::with_capacity(24);
        let mut triangles = Vec::with_capacity(12);
        for corners in faces {
            let base = positions.len() as u32;
            positions.extend_from_slice(&corners);
            triangles.push([base, base + 1, base + 2]);
            triangles.push([base, base + 2, base + 3]);
        }

        Self {
            positions,
            triangles,
            vertex_alpha: None,
        }
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn vertex_alpha(&self) -> Option<&[f64]> {
        self.vertex_alpha.as_deref()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.triangles.is_empty()
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

use cgmath::{ElementWise, EuclideanSpace, Matrix4, Point3, SquareMatrix, Vector3};
use crosscut_geometry::{ClipSet, MeshData, Plane, Transform, extract_world_geometry};
use crosscut_scene::Extent;

use crate::{Error, Result};

/// Capability of producing world-space clip planes from a volume's current
/// transform. Picking only ever sees the resulting `ClipSet`, so additional
/// volume shapes can be added without touching it.
pub trait ClipVolume {
    fn derive_planes(&self) -> Result<ClipSet>;
}

/// Interactive box volume: its own box mesh plus the transform the gizmo
/// manipulates. Corners are re-read from the mesh on every derivation since
/// the widget may deform the geometry.
#[derive(Clone, Debug)]
pub struct BoxVolume {
    data: MeshData,
    pub transform: Transform,
}

const MIN_FITTED_SIDE: f64 = 1.0e-3;

impl BoxVolume {
    pub fn new(data: MeshData, transform: Transform) -> Self {
        Self { data, transform }
    }

    pub fn with_size(width: f64, height: f64, depth: f64) -> Self {
        Self {
            data: MeshData::box_mesh(width, height, depth),
            transform: Transform::default(),
        }
    }

    /// Box sized and positioned to enclose the given world extent. Flat
    /// extents get a minimum thickness so the corners stay distinct.
    pub fn fit_to_extent(extent: &Extent) -> Self {
        let size = extent.size().map(|side| side.max(MIN_FITTED_SIDE));
        Self {
            data: MeshData::box_mesh(size.x, size.y, size.z),
            transform: Transform::from_position(extent.center().to_vec()),
        }
    }

    pub fn data(&self) -> &MeshData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut MeshData {
        &mut self.data
    }
}

impl ClipVolume for BoxVolume {
    /// Derives six outward-facing planes from the eight de-duplicated box
    /// corners. Per local axis the four largest-coordinate corners average
    /// into the max-face centroid and the four smallest into the min-face
    /// centroid; no face topology is needed, which tolerates arbitrary
    /// vertex ordering but requires a true box. Centroids are scaled by the
    /// box scale and translated by its position; normals are the box's
    /// world-oriented local axes.
    fn derive_planes(&self) -> Result<ClipSet> {
        let local = extract_world_geometry(&self.data, &Matrix4::identity())?;
        let corners = local.positions();
        if corners.len() != 8 {
            return Err(Error::DegenerateVolume {
                corners: corners.len(),
            });
        }

        let mut by_x = corners.to_vec();
        let mut by_y = corners.to_vec();
        let mut by_z = corners.to_vec();
        by_x.sort_by(|a, b| a.x.total_cmp(&b.x));
        by_y.sort_by(|a, b| a.y.total_cmp(&b.y));
        by_z.sort_by(|a, b| a.z.total_cmp(&b.z));

        let t = &self.transform;
        let faces = [
            (face_centroid(&by_z[4..]), t.forward()),
            (face_centroid(&by_z[..4]), -t.forward()),
            (face_centroid(&by_y[4..]), t.up()),
            (face_centroid(&by_y[..4]), -t.up()),
            (face_centroid(&by_x[4..]), t.right()),
            (face_centroid(&by_x[..4]), -t.right()),
        ];

        let mut planes = Vec::with_capacity(6);
        for (centroid, normal) in faces {
            let world =
                Point3::from_vec(centroid.to_vec().mul_element_wise(t.scale) + t.position);
            planes.push(Plane::from_point_normal(world, normal)?);
        }
        Ok(ClipSet::new(planes))
    }
}

fn face_centroid(corners: &[Point3<f64>]) -> Point3<f64> {
    let sum = corners
        .iter()
        .fold(Vector3::new(0.0, 0.0, 0.0), |acc, p| acc + p.to_vec());
    Point3::from_vec(sum / corners.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Deg, InnerSpace, Quaternion, Rotation3};

    #[test]
    fn unit_box_planes_lie_on_faces() {
        let volume = BoxVolume::with_size(2.0, 2.0, 2.0);
        let set = volume.derive_planes().unwrap();
        assert_eq!(set.len(), 6);

        // Face order is z-max, z-min, y-max, y-min, x-max, x-min.
        let expected: [Point3<f64>; 6] = [
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, -1.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
        ];
        for (plane, face_point) in set.planes().iter().zip(expected) {
            assert_relative_eq!(plane.signed_distance(face_point), 0.0, epsilon = 1.0e-5);
            // Outward normal points away from the center.
            assert!(plane.signed_distance(Point3::new(0.0, 0.0, 0.0)) < 0.0);
        }
    }

    #[test]
    fn flat_extent_still_yields_six_planes() {
        let extent = Extent {
            min: Point3::new(0.0, 0.0, 0.0),
            max: Point3::new(4.0, 4.0, 0.0),
        };
        let volume = BoxVolume::fit_to_extent(&extent);
        assert_eq!(volume.derive_planes().unwrap().len(), 6);
    }

    #[test]
    fn scaled_translated_box_follows_transform() {
        let mut volume = BoxVolume::with_size(2.0, 2.0, 2.0);
        volume.transform.scale = Vector3::new(2.0, 1.0, 1.0);
        volume.transform.position = Vector3::new(10.0, 0.0, 0.0);

        let set = volume.derive_planes().unwrap();
        // x-max face sits at 10 + 1 * 2.
        let x_max = &set.planes()[4];
        assert_relative_eq!(
            x_max.signed_distance(Point3::new(12.0, 0.0, 0.0)),
            0.0,
            epsilon = 1.0e-5
        );
    }

    #[test]
    fn rotated_box_rotates_normals_with_local_axes() {
        let mut volume = BoxVolume::with_size(2.0, 2.0, 2.0);
        volume.transform.rotation = Quaternion::from_axis_angle(Vector3::unit_x(), Deg(90.0));

        let set = volume.derive_planes().unwrap();
        // The local z-max face normal follows the rotation: +z about +x by
        // 90 degrees lands on -y. Face assignment stays with local axes.
        let z_max = &set.planes()[0];
        assert_relative_eq!(z_max.normal().y, -1.0, epsilon = 1.0e-9);
        assert_relative_eq!(z_max.normal().z, 0.0, epsilon = 1.0e-9);

        let y_max = &set.planes()[2];
        assert_relative_eq!(y_max.normal().z, 1.0, epsilon = 1.0e-9);
    }

    #[test]
    fn flat_box_is_degenerate() {
        let volume = BoxVolume::with_size(2.0, 2.0, 0.0);
        let err = volume.derive_planes().unwrap_err();
        assert!(matches!(err, Error::DegenerateVolume { corners: 4 }));
    }

    #[test]
    fn empty_volume_reports_no_geometry() {
        let volume = BoxVolume::new(MeshData::default(), Transform::default());
        let err = volume.derive_planes().unwrap_err();
        assert!(matches!(
            err,
            Error::Geometry(crosscut_geometry::Error::NoGeometry)
        ));
    }

    #[test]
    fn normals_stay_unit_under_nonuniform_scale() {
        let mut volume = BoxVolume::with_size(2.0, 2.0, 2.0);
        volume.transform.scale = Vector3::new(3.0, 0.5, 7.0);
        let set = volume.derive_planes().unwrap();
        for plane in set.planes() {
            assert_relative_eq!(plane.normal().magnitude(), 1.0, epsilon = 1.0e-9);
        }
    }
}

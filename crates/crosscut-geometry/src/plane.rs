use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Plane in Hessian normal form: `normal . p + offset == 0` with a unit
/// normal. Positive signed distance lies on the side the normal points to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Plane {
    normal: Vector3<f64>,
    offset: f64,
}

impl Plane {
    pub fn from_point_normal(point: Point3<f64>, normal: Vector3<f64>) -> Result<Self> {
        let length = normal.magnitude();
        if length <= f64::EPSILON {
            return Err(Error::DegenerateNormal);
        }
        let normal = normal / length;
        Ok(Self {
            normal,
            offset: -normal.dot(point.to_vec()),
        })
    }

    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn signed_distance(&self, point: Point3<f64>) -> f64 {
        self.normal.dot(point.to_vec()) + self.offset
    }
}

/// Set of active clip planes, rebuilt wholesale each frame. The derived set
/// carries at most six planes; a merged set may carry caller extras on top.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClipSet {
    planes: Vec<Plane>,
}

impl ClipSet {
    pub fn new(planes: Vec<Plane>) -> Self {
        Self { planes }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// True when the point lies strictly outside any plane, i.e. the point
    /// is discarded by this clip set.
    pub fn clips(&self, point: Point3<f64>) -> bool {
        self.planes
            .iter()
            .any(|plane| plane.signed_distance(point) > 0.0)
    }

    pub fn merged(&self, extra: &[Plane]) -> ClipSet {
        let mut planes = self.planes.clone();
        planes.extend_from_slice(extra);
        ClipSet { planes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn signed_distance_sign_follows_normal() {
        let plane =
            Plane::from_point_normal(Point3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 2.0))
                .unwrap();
        assert_relative_eq!(plane.normal().magnitude(), 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(
            plane.signed_distance(Point3::new(0.0, 0.0, 3.0)),
            2.0,
            epsilon = 1.0e-12
        );
        assert!(plane.signed_distance(Point3::new(5.0, -5.0, 0.0)) < 0.0);
    }

    #[test]
    fn zero_normal_rejected() {
        let err = Plane::from_point_normal(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, crate::Error::DegenerateNormal));
    }

    #[test]
    fn empty_set_clips_nothing() {
        let set = ClipSet::empty();
        assert!(set.is_empty());
        assert!(!set.clips(Point3::new(1.0e9, 1.0e9, 1.0e9)));
    }

    #[test]
    fn clips_outside_any_plane() {
        let plane =
            Plane::from_point_normal(Point3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 1.0))
                .unwrap();
        let set = ClipSet::new(vec![plane]);
        assert!(set.clips(Point3::new(0.0, 0.0, 2.0)));
        assert!(!set.clips(Point3::new(0.0, 0.0, 0.5)));
    }

    #[test]
    fn merged_appends_extras() {
        let plane =
            Plane::from_point_normal(Point3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 1.0))
                .unwrap();
        let extra =
            Plane::from_point_normal(Point3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0))
                .unwrap();
        let set = ClipSet::new(vec![plane]).merged(&[extra]);
        assert_eq!(set.len(), 2);
        assert!(set.clips(Point3::new(2.0, 0.0, 0.0)));
    }
}

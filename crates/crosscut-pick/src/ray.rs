use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3, Vector4};
use crosscut_scene::{Camera, CanvasSize};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from the camera eye through a canvas pixel. `None` when the
    /// camera matrices are not invertible.
    pub fn from_screen(camera: &Camera, canvas: CanvasSize, x: f64, y: f64) -> Option<Self> {
        let inverse = camera.view_projection().invert()?;
        let ndc_x = x / canvas.width * 2.0 - 1.0;
        let ndc_y = 1.0 - y / canvas.height * 2.0;
        let near = unproject(&inverse, ndc_x, ndc_y, -1.0)?;
        let far = unproject(&inverse, ndc_x, ndc_y, 1.0)?;
        Some(Self::new(camera.position, far - near))
    }

    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

fn unproject(inverse: &Matrix4<f64>, x: f64, y: f64, z: f64) -> Option<Point3<f64>> {
    let clip = inverse * Vector4::new(x, y, z, 1.0);
    if clip.w.abs() <= 1.0e-12 {
        return None;
    }
    Some(Point3::from_vec(clip.truncate() / clip.w))
}

#[derive(Clone, Copy, Debug)]
pub struct TriangleHit {
    pub t: f64,
    /// Barycentric weight of the second vertex.
    pub u: f64,
    /// Barycentric weight of the third vertex.
    pub v: f64,
}

pub fn ray_intersect_triangle(
    origin: Point3<f64>,
    dir: Vector3<f64>,
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
) -> Option<TriangleHit> {
    let eps = 1.0e-9;
    let edge1 = b - a;
    let edge2 = c - a;
    let pvec = dir.cross(edge2);
    let det = edge1.dot(pvec);
    if det.abs() < eps {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = origin - a;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(edge1);
    let v = dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(qvec) * inv_det;
    if t > eps { Some(TriangleHit { t, u, v }) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ray_hits_facing_triangle() {
        let hit = ray_intersect_triangle(
            Point3::new(0.25, 0.25, 5.0),
            Vector3::new(0.0, 0.0, -1.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(hit.t, 5.0, epsilon = 1.0e-9);
        assert_relative_eq!(hit.u, 0.25, epsilon = 1.0e-9);
        assert_relative_eq!(hit.v, 0.25, epsilon = 1.0e-9);
    }

    #[test]
    fn ray_misses_outside_triangle() {
        let hit = ray_intersect_triangle(
            Point3::new(2.0, 2.0, 5.0),
            Vector3::new(0.0, 0.0, -1.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn triangle_behind_origin_rejected() {
        let hit = ray_intersect_triangle(
            Point3::new(0.25, 0.25, -1.0),
            Vector3::new(0.0, 0.0, -1.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn screen_center_ray_points_at_target() {
        let camera = Camera::new(800.0 / 600.0);
        let canvas = CanvasSize::new(800.0, 600.0);
        let ray = Ray::from_screen(&camera, canvas, 400.0, 300.0).unwrap();
        let to_target = (camera.target - camera.position).normalize();
        assert_relative_eq!(ray.direction.dot(to_target), 1.0, epsilon = 1.0e-6);
    }

    #[test]
    fn corner_rays_diverge() {
        let camera = Camera::new(1.0);
        let canvas = CanvasSize::new(600.0, 600.0);
        let left = Ray::from_screen(&camera, canvas, 0.0, 300.0).unwrap();
        let right = Ray::from_screen(&camera, canvas, 600.0, 300.0).unwrap();
        assert!(left.direction.dot(right.direction) < 1.0 - 1.0e-6);
    }
}

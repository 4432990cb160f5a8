use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3};

use crate::scene::Extent;

/// Perspective camera. `fov_y` is in radians.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    pub fov_y: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn new(aspect: f64) -> Self {
        Self {
            position: Point3::new(0.0, 2.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
            fov_y: 45.0_f64.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn forward(&self) -> Vector3<f64> {
        (self.target - self.position).normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f64> {
        cgmath::perspective(Rad(self.fov_y), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f64> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Projects a world point into normalized screen coordinates, x right
    /// and y down with (0, 0) at the top-left corner. Returns `None` for
    /// points at or behind the eye plane.
    pub fn project(&self, point: Point3<f64>) -> Option<(f64, f64)> {
        let clip = self.view_projection() * point.to_homogeneous();
        if clip.w <= 1.0e-9 {
            return None;
        }
        let x = clip.x / clip.w;
        let y = clip.y / clip.w;
        Some((x * 0.5 + 0.5, 0.5 - y * 0.5))
    }

    /// Retargets the camera so the extent fills the view, adjusting the
    /// near/far range to the scene radius.
    pub fn fit_extent(&mut self, extent: &Extent) {
        let radius = (extent.size().magnitude() * 1.5).max(1.0e-3);
        let forward = self.forward();
        self.target = extent.center();
        self.position = self.target - forward * radius;
        self.near = radius * 0.01;
        self.far = radius * 1000.0;
    }
}

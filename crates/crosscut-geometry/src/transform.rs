use cgmath::{Matrix4, One, Quaternion, Rotation, Vector3};
use serde::{Deserialize, Serialize};

/// Position + rotation + non-uniform scale, the transform the manipulation
/// gizmo writes into.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vector3<f64>,
    pub rotation: Quaternion<f64>,
    pub scale: Vector3<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_position(position: Vector3<f64>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Matrix4<f64> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Local +x axis in world orientation.
    pub fn right(&self) -> Vector3<f64> {
        self.rotation.rotate_vector(Vector3::unit_x())
    }

    /// Local +y axis in world orientation.
    pub fn up(&self) -> Vector3<f64> {
        self.rotation.rotate_vector(Vector3::unit_y())
    }

    /// Local +z axis in world orientation.
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation.rotate_vector(Vector3::unit_z())
    }
}

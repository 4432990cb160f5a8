use cgmath::{InnerSpace, Point3, SquareMatrix, Transform as _};
use crosscut_base::Guid;
use crosscut_geometry::ClipSet;
use crosscut_scene::{MeshFilter, Scene, SceneMesh};
use serde::Serialize;

use crate::ray::{Ray, ray_intersect_triangle};

/// Opacity below this is treated as see-through for picking purposes,
/// independent of clipping.
pub const ALPHA_EPSILON: f64 = 1.0e-5;

#[derive(Clone, Copy, Debug, Serialize)]
pub struct PickHit {
    pub mesh: Guid,
    pub point: Point3<f64>,
    pub face_index: usize,
    /// Barycentric weights of the triangle's second and third vertices.
    pub barycentric: [f64; 2],
    pub distance: f64,
}

/// Outcome of one pick: the ray that was cast and the nearest qualifying
/// hit, if any. An empty result is a valid, common outcome.
#[derive(Clone, Debug, Serialize)]
pub struct PickResult {
    pub ray: Ray,
    pub hit: Option<PickHit>,
}

impl PickResult {
    pub fn miss(ray: Ray) -> Self {
        Self { ray, hit: None }
    }

    pub fn is_hit(&self) -> bool {
        self.hit.is_some()
    }
}

/// Casts a ray from the pointer through the active camera and returns the
/// nearest intersection that is neither transparent nor clipped away by the
/// given clip set. With an empty clip set this is plain nearest-hit picking.
pub fn pick_scene(
    scene: &Scene,
    pointer: (f64, f64),
    clip: &ClipSet,
    filter: Option<&MeshFilter>,
) -> PickResult {
    let Some(ray) = Ray::from_screen(&scene.camera, scene.canvas(), pointer.0, pointer.1) else {
        return PickResult::miss(Ray::new(scene.camera.position, scene.camera.forward()));
    };
    pick_with_ray(scene, ray, clip, filter)
}

pub fn pick_with_ray(
    scene: &Scene,
    ray: Ray,
    clip: &ClipSet,
    filter: Option<&MeshFilter>,
) -> PickResult {
    let mut best: Option<PickHit> = None;

    for mesh in scene.meshes() {
        if !mesh.pickable || !mesh.visible || mesh.data.is_empty() {
            continue;
        }
        if let Some(filter) = filter {
            if !filter(mesh) {
                continue;
            }
        }

        let world = mesh.world_matrix();
        let Some(inverse) = world.invert() else {
            continue;
        };
        let local_origin = inverse.transform_point(ray.origin);
        let local_dir = inverse.transform_vector(ray.direction);

        for (face_index, tri) in mesh.data.triangles().iter().enumerate() {
            if triangle_alpha_bound(mesh, tri) < ALPHA_EPSILON {
                continue;
            }

            let a = mesh.data.positions()[tri[0] as usize];
            let b = mesh.data.positions()[tri[1] as usize];
            let c = mesh.data.positions()[tri[2] as usize];
            let Some(tri_hit) = ray_intersect_triangle(local_origin, local_dir, a, b, c) else {
                continue;
            };

            let point = world.transform_point(local_origin + local_dir * tri_hit.t);

            if triangle_alpha_at(mesh, tri, tri_hit.u, tri_hit.v) < ALPHA_EPSILON {
                continue;
            }
            // Clip planes take precedence over distance: a point strictly
            // outside any plane is never returned.
            if clip.clips(point) {
                continue;
            }

            let distance = (point - ray.origin).magnitude();
            if best.is_none_or(|current| distance < current.distance) {
                best = Some(PickHit {
                    mesh: mesh.id(),
                    point,
                    face_index,
                    barycentric: [tri_hit.u, tri_hit.v],
                    distance,
                });
            }
        }
    }

    PickResult { ray, hit: best }
}

/// Upper bound of the triangle's opacity, used to skip fully transparent
/// triangles before intersecting.
fn triangle_alpha_bound(mesh: &SceneMesh, tri: &[u32; 3]) -> f64 {
    match mesh.data.vertex_alpha() {
        Some(alpha) => {
            let max = alpha[tri[0] as usize]
                .max(alpha[tri[1] as usize])
                .max(alpha[tri[2] as usize]);
            mesh.alpha * max
        }
        None => mesh.alpha,
    }
}

/// Opacity interpolated at the hit's barycentric coordinates.
fn triangle_alpha_at(mesh: &SceneMesh, tri: &[u32; 3], u: f64, v: f64) -> f64 {
    match mesh.data.vertex_alpha() {
        Some(alpha) => {
            let w = 1.0 - u - v;
            let interpolated = w * alpha[tri[0] as usize]
                + u * alpha[tri[1] as usize]
                + v * alpha[tri[2] as usize];
            mesh.alpha * interpolated
        }
        None => mesh.alpha,
    }
}

pub mod picker;
pub mod ray;

pub use picker::{ALPHA_EPSILON, PickHit, PickResult, pick_scene, pick_with_ray};
pub use ray::{Ray, TriangleHit, ray_intersect_triangle};

use foundation::math::Vec3;
use foundation::math::precision::stable_total_cmp_f64;

use crate::World;
use crate::entity::PrimitiveId;
use crate::spatial::Bvh;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub primitive: PrimitiveId,
    pub distance: f64,
    pub point: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub max_distance: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            max_distance: 1.0e30,
        }
    }
}

/// Ray picking against primitive triangles.
///
/// Ordering contract:
/// - The closest triangle hit along the (normalized) ray wins.
/// - Hits at the same distance go to the lower `PrimitiveId::index()`.
///
/// The BVH is built once from the world's bounds. Geometry is immutable
/// after spawn, so a picker stays valid while only materials change.
#[derive(Debug, Clone)]
pub struct Picker {
    bvh: Bvh,
}

impl Picker {
    pub fn new(world: &World) -> Self {
        Self {
            bvh: Bvh::from_world(world),
        }
    }

    pub fn pick_ray(&self, world: &World, ray: Ray, opts: PickOptions) -> Option<PickHit> {
        let dir = ray.dir.normalized()?;

        let mut best: Option<(f64, PrimitiveId)> = None;
        for primitive in self.bvh.query_ray(ray.origin, dir, 0.0, opts.max_distance) {
            let Some(p) = world.primitive(primitive) else {
                continue;
            };
            let nearest = p
                .mesh
                .triangles()
                .filter_map(|tri| ray_triangle_t(ray.origin, dir, tri))
                .filter(|t| *t <= opts.max_distance)
                .min_by(|a, b| stable_total_cmp_f64(*a, *b));
            let Some(t) = nearest else {
                continue;
            };

            best = match best {
                Some((bt, bp))
                    if stable_total_cmp_f64(t, bt)
                        .then_with(|| primitive.index().cmp(&bp.index()))
                        .is_ge() =>
                {
                    Some((bt, bp))
                }
                _ => Some((t, primitive)),
            };
        }

        let (t, primitive) = best?;
        Some(PickHit {
            primitive,
            distance: t,
            point: ray.origin + dir * t,
        })
    }
}

/// Two-sided Möller–Trumbore. Returns the hit distance for `t >= 0`.
fn ray_triangle_t(origin: Vec3, dir: Vec3, [a, b, c]: [Vec3; 3]) -> Option<f64> {
    const EPS: f64 = 1e-12;

    let e1 = b - a;
    let e2 = c - a;
    let p = dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPS {
        return None;
    }
    let inv = 1.0 / det;

    let s = origin - a;
    let u = s.dot(p) * inv;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = dir.dot(q) * inv;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(q) * inv;
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::{PickOptions, Picker, Ray, ray_triangle_t};
    use crate::World;
    use crate::components::{Material, Mesh};
    use foundation::math::{Vec2, Vec3};

    fn down_from(x: f64, z: f64) -> Ray {
        Ray::new(Vec3::new(x, 100.0, z), Vec3::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn ray_picks_nearest_hit() {
        let mut world = World::new();
        let low = world.spawn(
            Mesh::cube(Vec3::new(0.0, 5.0, 0.0), Vec3::splat(10.0)),
            Material::diffuse(1, 1, 1),
        );
        let high = world.spawn(
            Mesh::cube(Vec3::new(0.0, 15.0, 0.0), Vec3::splat(10.0)),
            Material::diffuse(2, 2, 2),
        );
        let picker = Picker::new(&world);

        let hit = picker
            .pick_ray(&world, down_from(1.0, 1.0), PickOptions::default())
            .expect("hit");
        assert_eq!(hit.primitive, high);
        assert!((hit.distance - 80.0).abs() < 1e-9);
        assert!((hit.point.y - 20.0).abs() < 1e-9);
        assert_ne!(hit.primitive, low);
    }

    #[test]
    fn tie_breaks_by_primitive_index() {
        let mut world = World::new();
        let first = world.spawn(
            Mesh::cube(Vec3::new(0.0, 5.0, 0.0), Vec3::splat(10.0)),
            Material::diffuse(1, 1, 1),
        );
        world.spawn(
            Mesh::cube(Vec3::new(0.0, 5.0, 0.0), Vec3::splat(10.0)),
            Material::diffuse(2, 2, 2),
        );
        let picker = Picker::new(&world);

        let hit = picker
            .pick_ray(&world, down_from(0.5, 0.5), PickOptions::default())
            .expect("hit");
        assert_eq!(hit.primitive, first);
    }

    #[test]
    fn triangle_test_rejects_bounds_only_hits() {
        let mut world = World::new();
        // A diagonal ribbon: its AABB covers the corner but the triangles do not.
        world.spawn(
            Mesh::quad(
                [
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::new(1.0, 1.0, 0.0),
                    Vec3::new(10.0, 1.0, 9.0),
                    Vec3::new(10.0, 1.0, 10.0),
                ],
                [3, 1, 0, 0, 2, 3],
            ),
            Material::diffuse(0, 0, 0),
        );
        let picker = Picker::new(&world);

        assert!(
            picker
                .pick_ray(&world, down_from(9.0, 1.0), PickOptions::default())
                .is_none()
        );
        assert!(
            picker
                .pick_ray(&world, down_from(5.0, 4.6), PickOptions::default())
                .is_some()
        );
    }

    #[test]
    fn ground_quad_is_pickable_and_max_distance_limits() {
        let mut world = World::new();
        let ground = world.spawn(
            Mesh::ground_quad(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0)),
            Material::texture("map.jpg"),
        );
        let picker = Picker::new(&world);

        let hit = picker
            .pick_ray(&world, down_from(10.0, -20.0), PickOptions::default())
            .expect("hit");
        assert_eq!(hit.primitive, ground);

        let short = PickOptions { max_distance: 50.0 };
        assert!(picker.pick_ray(&world, down_from(10.0, -20.0), short).is_none());
    }

    #[test]
    fn triangle_hit_is_two_sided() {
        let tri = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let down = ray_triangle_t(Vec3::new(0.2, 5.0, 0.2), Vec3::new(0.0, -1.0, 0.0), tri);
        let up = ray_triangle_t(Vec3::new(0.2, -5.0, 0.2), Vec3::new(0.0, 1.0, 0.0), tri);
        assert_eq!(down, Some(5.0));
        assert_eq!(up, Some(5.0));
    }
}

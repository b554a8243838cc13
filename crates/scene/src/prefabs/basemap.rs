use foundation::math::{Vec2, Vec3};

use crate::World;
use crate::components::{Light, Material, Mesh, Rgb};
use crate::entity::PrimitiveId;

pub const AMBIENT_LIGHT: Rgb = Rgb::new(62, 73, 89);

/// Spawns scene lighting and the textured ground quad of `size` (x, z)
/// centered at the origin.
pub fn spawn_basemap(world: &mut World, size: Vec2, source: &str) -> PrimitiveId {
    world.add_light(Light::ambient(AMBIENT_LIGHT));
    world.add_light(Light::directional(Rgb::WHITE, Vec3::new(0.0, -1.0, 0.0)));
    world.spawn(
        Mesh::ground_quad(Vec2::new(0.0, 0.0), size),
        Material::texture(source),
    )
}

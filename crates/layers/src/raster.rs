use foundation::math::Vec2;
use scene::World;
use scene::entity::PrimitiveId;
use scene::prefabs::spawn_basemap;

/// Textured ground plane under the network, sized to the raster in pixels.
///
/// The image is referenced by `source` only; decoding is the renderer's job.
#[derive(Debug, Clone, PartialEq)]
pub struct BasemapLayer {
    pub source: String,
    pub size: Vec2,
}

impl BasemapLayer {
    pub fn new(source: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            source: source.into(),
            size: Vec2::new(width, height),
        }
    }

    pub fn spawn(&self, world: &mut World) -> PrimitiveId {
        spawn_basemap(world, self.size, &self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::BasemapLayer;
    use scene::World;

    #[test]
    fn spawns_quad_matching_raster_size() {
        let layer = BasemapLayer::new("Images/map.jpg", 1600.0, 1000.0);
        let mut world = World::new();
        let id = layer.spawn(&mut world);

        let b = world.bounds(id).expect("bounds");
        assert_eq!(b.min, [-800.0, 0.0, -500.0]);
        assert_eq!(b.max, [800.0, 0.0, 500.0]);
    }
}

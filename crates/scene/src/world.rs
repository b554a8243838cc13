use foundation::arena::Arena;
use foundation::bounds::Aabb3;

use crate::components::{Light, Material, Mesh};
use crate::entity::PrimitiveId;

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub mesh: Mesh,
    pub material: Material,
    /// Cached from `mesh` at spawn time; geometry never changes afterwards.
    pub bounds: Aabb3,
}

/// Render-side scene: an append-only arena of primitives plus scene lights.
///
/// Geometry is fixed once spawned. Only materials change after build, which
/// is what highlighting relies on.
#[derive(Debug, Default)]
pub struct World {
    primitives: Arena<Primitive>,
    lights: Vec<Light>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, mesh: Mesh, material: Material) -> PrimitiveId {
        let bounds = mesh
            .bounds()
            .unwrap_or_else(|| Aabb3::new([0.0; 3], [0.0; 3]));
        PrimitiveId(self.primitives.alloc(Primitive {
            mesh,
            material,
            bounds,
        }))
    }

    pub fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id.0)
    }

    pub fn material(&self, id: PrimitiveId) -> Option<&Material> {
        self.primitive(id).map(|p| &p.material)
    }

    /// Returns `false` when `id` does not belong to this world.
    pub fn set_material(&mut self, id: PrimitiveId, material: Material) -> bool {
        match self.primitives.get_mut(id.0) {
            Some(p) => {
                p.material = material;
                true
            }
            None => false,
        }
    }

    pub fn bounds(&self, id: PrimitiveId) -> Option<Aabb3> {
        self.primitive(id).map(|p| p.bounds)
    }

    pub fn primitives(&self) -> impl Iterator<Item = (PrimitiveId, &Primitive)> + '_ {
        self.primitives.iter().map(|(h, p)| (PrimitiveId(h), p))
    }

    /// True if `bounds` overlaps any primitive spawned so far.
    pub fn intersects_any(&self, bounds: &Aabb3) -> bool {
        self.primitives.iter().any(|(_, p)| p.bounds.intersects(bounds))
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}

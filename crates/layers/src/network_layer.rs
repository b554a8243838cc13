use std::fmt;

use foundation::bounds::{Aabb3, GeoBounds};
use foundation::math::{GeoPoint, MathError, Vec2, Vec3, inverse_lerp, lerp};
use network::{LineRef, NetworkGraph, NodeRef};
use scene::World;
use scene::components::{Material, Mesh};
use scene::entity::PrimitiveId;
use tracing::info;

use crate::index::{EntityRef, PrimitiveIndex};
use crate::symbology::NetworkStyle;

/// Ribbon winding over corners `[v1+side, v1-side, v2+side, v2-side]`.
const RIBBON_INDICES: [u32; 6] = [3, 1, 0, 0, 2, 3];

#[derive(Debug)]
pub enum SceneBuildError {
    DegenerateBounds(GeoBounds),
    /// A style dimension that must be finite and positive is not.
    InvalidStyle {
        field: &'static str,
        value: f64,
    },
    Projection(MathError),
}

impl fmt::Display for SceneBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneBuildError::DegenerateBounds(b) => write!(
                f,
                "degenerate map bounds: lon [{}, {}], lat [{}, {}]",
                b.min_lon, b.max_lon, b.min_lat, b.max_lat
            ),
            SceneBuildError::InvalidStyle { field, value } => {
                write!(f, "style {field} must be positive, got {value}")
            }
            SceneBuildError::Projection(e) => write!(f, "scene projection failed: {e}"),
        }
    }
}

impl std::error::Error for SceneBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneBuildError::DegenerateBounds(_) | SceneBuildError::InvalidStyle { .. } => None,
            SceneBuildError::Projection(e) => Some(e),
        }
    }
}

impl From<MathError> for SceneBuildError {
    fn from(e: MathError) -> Self {
        SceneBuildError::Projection(e)
    }
}

/// Geographic to scene mapping shared by markers and ribbons.
///
/// Longitude spans `[-width/2, width/2]` along X and latitude spans
/// `[-height/2, height/2]`; the scene places north toward -Z.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneProjection {
    bounds: GeoBounds,
    size: Vec2,
}

impl SceneProjection {
    pub fn new(bounds: GeoBounds, size: Vec2) -> Result<Self, SceneBuildError> {
        if bounds.is_degenerate() {
            return Err(SceneBuildError::DegenerateBounds(bounds));
        }
        Ok(Self { bounds, size })
    }

    /// Map-plane position `(x, z)` before the north flip.
    pub fn to_map(&self, point: GeoPoint) -> Result<Vec2, MathError> {
        let x_norm = inverse_lerp(self.bounds.min_lon, self.bounds.max_lon, point.lon)?;
        let z_norm = inverse_lerp(self.bounds.min_lat, self.bounds.max_lat, point.lat)?;
        Ok(Vec2::new(
            lerp(-self.size.x / 2.0, self.size.x / 2.0, x_norm),
            lerp(-self.size.y / 2.0, self.size.y / 2.0, z_norm),
        ))
    }

    pub fn to_scene(&self, point: GeoPoint, y: f64) -> Result<Vec3, MathError> {
        let map = self.to_map(point)?;
        Ok(Vec3::new(map.x, y, -map.y))
    }
}

/// Built network geometry and the primitive/entity association for picking.
#[derive(Debug)]
pub struct NetworkScene {
    pub world: World,
    pub index: PrimitiveIndex,
}

impl NetworkScene {
    pub fn marker(&self, node: NodeRef) -> Option<PrimitiveId> {
        self.index.primitive_for(EntityRef::Node(node))
    }

    pub fn ribbons(&self, line: LineRef) -> Vec<PrimitiveId> {
        self.index.primitives_for(EntityRef::Line(line)).collect()
    }
}

/// Turns a [`NetworkGraph`] into node marker cubes and line ribbons.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkLayer {
    pub style: NetworkStyle,
}

impl NetworkLayer {
    pub fn new() -> Self {
        Self::with_style(NetworkStyle::default())
    }

    pub fn with_style(style: NetworkStyle) -> Self {
        Self { style }
    }

    pub fn build(
        &self,
        graph: &NetworkGraph,
        bounds: GeoBounds,
        map_size: Vec2,
    ) -> Result<NetworkScene, SceneBuildError> {
        self.build_over(World::new(), graph, bounds, map_size)
    }

    /// Builds on top of `world`, which may already hold a basemap.
    ///
    /// Markers are placed in node order, then one ribbon per line segment in
    /// line order. Every primitive is registered in the index before return.
    pub fn build_over(
        &self,
        mut world: World,
        graph: &NetworkGraph,
        bounds: GeoBounds,
        map_size: Vec2,
    ) -> Result<NetworkScene, SceneBuildError> {
        self.check_style()?;
        let projection = SceneProjection::new(bounds, map_size)?;
        let mut index = PrimitiveIndex::new();

        let mut max_stack = 0;
        for (node_ref, node) in graph.node_refs() {
            let ground = projection.to_scene(node.position, 0.0)?;
            let material = self.style.node_material(node.connection_tier()).clone();
            let (primitive, level) = self.place_marker(&mut world, ground, material);
            index.insert(primitive, EntityRef::Node(node_ref));
            max_stack = max_stack.max(level + 1);
        }

        let mut ribbons = 0;
        for (line_ref, line) in graph.line_refs() {
            for pair in line.vertices.windows(2) {
                let v1 = projection.to_scene(pair[0], 0.0)?;
                let v2 = projection.to_scene(pair[1], 0.0)?;
                let primitive = world.spawn(self.ribbon(v1, v2), self.style.line.clone());
                index.insert(primitive, EntityRef::Line(line_ref));
                ribbons += 1;
            }
        }

        info!(
            markers = graph.nodes().len(),
            ribbons,
            max_stack,
            primitives = world.len(),
            "network scene built"
        );
        Ok(NetworkScene { world, index })
    }

    // Stacking only terminates when each step clears the closed box below it.
    fn check_style(&self) -> Result<(), SceneBuildError> {
        let style = &self.style;
        for (field, value) in [
            ("cube_size", style.cube_size),
            ("stack_epsilon", style.stack_epsilon),
            ("line_width", style.line_width),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SceneBuildError::InvalidStyle { field, value });
            }
        }
        Ok(())
    }

    /// Spawns a marker at `ground`, lifted one stack step at a time until it
    /// clears every primitive already in the world. Returns the stack level.
    fn place_marker(&self, world: &mut World, ground: Vec3, material: Material) -> (PrimitiveId, usize) {
        let size = Vec3::splat(self.style.cube_size);
        let mut level = 0;
        let mut center = Vec3::new(ground.x, self.style.base_height(), ground.z);
        while world.intersects_any(&Aabb3::from_center_size(center, size)) {
            level += 1;
            center.y += self.style.stack_step();
        }
        (world.spawn(Mesh::cube(center, size), material), level)
    }

    fn ribbon(&self, v1: Vec3, v2: Vec3) -> Mesh {
        // Coincident vertices still get a quad so segment counts stay k-1.
        let dir = (v2 - v1).normalized().unwrap_or(Vec3::new(1.0, 0.0, 0.0));
        let side = dir.cross(Vec3::UP) * (self.style.line_width / 2.0);
        let lift = |p: Vec3| Vec3::new(p.x, self.style.line_elevation, p.z);
        Mesh::quad(
            [lift(v1 + side), lift(v1 - side), lift(v2 + side), lift(v2 - side)],
            RIBBON_INDICES,
        )
    }
}

impl Default for NetworkLayer {
    fn default() -> Self {
        Self::new()
    }
}

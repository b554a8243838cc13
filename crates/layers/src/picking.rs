use network::NetworkGraph;
use scene::components::Material;
use scene::entity::PrimitiveId;
use scene::selection::HighlightSelection;
use tracing::debug;

use crate::index::EntityRef;
use crate::network_layer::NetworkScene;
use crate::symbology::NetworkStyle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    ShowTooltip(String),
    Miss,
}

/// Resolves picked primitives to network entities and keeps the endpoint
/// markers of the last picked line highlighted.
///
/// Only marker materials change; the graph and geometry are never touched.
#[derive(Debug, Clone)]
pub struct PickingController {
    selection: HighlightSelection,
    highlight: Material,
}

impl Default for PickingController {
    fn default() -> Self {
        Self::new(NetworkStyle::default().highlight)
    }
}

impl PickingController {
    pub fn new(highlight: Material) -> Self {
        Self {
            selection: HighlightSelection::new(),
            highlight,
        }
    }

    pub fn selection(&self) -> &HighlightSelection {
        &self.selection
    }

    /// Handles the nearest hit under the pointer, if any.
    ///
    /// - node: tooltip only, selection kept.
    /// - line: previous pair restored, both endpoint markers highlighted.
    /// - other geometry (basemap, stale handle): selection cleared.
    /// - no geometry at all: selection kept.
    pub fn resolve_hit(
        &mut self,
        graph: &NetworkGraph,
        scene: &mut NetworkScene,
        hit: Option<PrimitiveId>,
    ) -> PickOutcome {
        let Some(primitive) = hit else {
            debug!("pick hit empty space");
            return PickOutcome::Miss;
        };
        match scene.index.entity(primitive) {
            Some(EntityRef::Node(node_ref)) => match graph.node(node_ref) {
                Some(node) => {
                    debug!(node = node.id, "picked node");
                    PickOutcome::ShowTooltip(node.tooltip())
                }
                None => self.miss(scene, primitive),
            },
            Some(EntityRef::Line(line_ref)) => {
                let Some(line) = graph.line(line_ref) else {
                    return self.miss(scene, primitive);
                };
                let markers = graph.endpoints(line).and_then(|(a, b)| {
                    Some((
                        scene.index.primitive_for(EntityRef::Node(a))?,
                        scene.index.primitive_for(EntityRef::Node(b))?,
                    ))
                });
                match markers {
                    Some((a, b)) => {
                        self.selection
                            .select_pair(&mut scene.world, a, b, &self.highlight);
                    }
                    None => self.selection.clear(&mut scene.world),
                }
                debug!(
                    line = line.id,
                    first_end = line.first_end,
                    second_end = line.second_end,
                    "picked line"
                );
                PickOutcome::ShowTooltip(line.tooltip())
            }
            None => self.miss(scene, primitive),
        }
    }

    fn miss(&mut self, scene: &mut NetworkScene, primitive: PrimitiveId) -> PickOutcome {
        debug!(primitive = primitive.index(), "pick missed network");
        self.selection.clear(&mut scene.world);
        PickOutcome::Miss
    }
}

#[cfg(test)]
mod tests {
    use super::{PickOutcome, PickingController};
    use crate::network_layer::{NetworkLayer, NetworkScene};
    use crate::raster::BasemapLayer;
    use formats::{EntityRecord, LoadOptions, NetworkDocument, load_network};
    use foundation::bounds::GeoBounds;
    use foundation::handles::Handle;
    use foundation::math::{GeoPoint, UtmZone, Vec2, Vec3, geographic_to_projected};
    use network::{LineRef, NetworkGraph, NodeRef};
    use pretty_assertions::assert_eq;
    use scene::World;
    use scene::components::Material;
    use scene::entity::PrimitiveId;
    use scene::picking::{PickOptions, Picker, Ray};

    const HIGHLIGHT: Material = Material::diffuse(173, 255, 47);
    const LOW: Material = Material::diffuse(255, 130, 130);

    fn bounds() -> GeoBounds {
        GeoBounds::new(19.793909, 19.894459, 45.2325, 45.277031)
    }

    fn projected(lon: f64, lat: f64) -> (f64, f64) {
        geographic_to_projected(GeoPoint::new(lon, lat), UtmZone::north(34))
    }

    fn substation(id: i64, lon: f64, lat: f64) -> EntityRecord {
        let (x, y) = projected(lon, lat);
        EntityRecord::new()
            .with("Id", id)
            .with("Name", format!("SS_{id}"))
            .with("X", x)
            .with("Y", y)
    }

    fn line(id: i64, first: i64, second: i64, path: &[(f64, f64)]) -> EntityRecord {
        let mut rec = EntityRecord::new()
            .with("Id", id)
            .with("Name", format!("SEG_{id}"))
            .with("IsUnderground", "false")
            .with("R", "0.25")
            .with("ConductorMaterial", "Acsr")
            .with("LineType", "Overhead")
            .with("ThermalConstantHeat", 2400)
            .with("FirstEnd", first)
            .with("SecondEnd", second);
        for (lon, lat) in path {
            let (x, y) = projected(*lon, *lat);
            rec = rec.with_vertex(x, y);
        }
        rec
    }

    fn load(doc: &NetworkDocument) -> NetworkGraph {
        let b = bounds();
        load_network(doc, LoadOptions::default(), |n| b.contains(n.position)).expect("load")
    }

    fn build(graph: &NetworkGraph) -> (NetworkScene, PrimitiveId) {
        let mut world = World::new();
        let basemap = BasemapLayer::new("Images/map.jpg", 1600.0, 1000.0).spawn(&mut world);
        let scene = NetworkLayer::new()
            .build_over(world, graph, bounds(), Vec2::new(1600.0, 1000.0))
            .expect("build");
        (scene, basemap)
    }

    fn three_substations() -> NetworkDocument {
        NetworkDocument {
            substations: vec![
                substation(1, 19.80, 45.24),
                substation(2, 19.88, 45.26),
                substation(3, 19.85, 45.27),
            ],
            lines: vec![
                line(10, 1, 2, &[(19.80, 45.24), (19.84, 45.25), (19.88, 45.26)]),
                line(11, 2, 3, &[(19.88, 45.26), (19.85, 45.27)]),
            ],
            ..NetworkDocument::default()
        }
    }

    fn material(scene: &NetworkScene, node: usize) -> Material {
        let marker = scene.marker(NodeRef(node)).expect("marker");
        scene.world.material(marker).cloned().expect("material")
    }

    #[test]
    fn two_substations_and_a_line_end_to_end() {
        let doc = NetworkDocument {
            substations: vec![substation(1, 19.80, 45.24), substation(2, 19.88, 45.26)],
            lines: vec![line(10, 1, 2, &[(19.80, 45.24), (19.84, 45.25), (19.88, 45.26)])],
            ..NetworkDocument::default()
        };
        let graph = load(&doc);
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.lines().len(), 1);
        assert!(graph.nodes().iter().all(|n| n.connection_count() == 1));

        let (mut scene, basemap) = build(&graph);
        let ribbons = scene.ribbons(LineRef(0));
        assert_eq!(ribbons.len(), 2);

        let mut picking = PickingController::default();
        for ribbon in ribbons {
            let outcome = picking.resolve_hit(&graph, &mut scene, Some(ribbon));
            assert!(matches!(outcome, PickOutcome::ShowTooltip(ref t) if t.starts_with("PowerLine\n10 SEG_10")));
            assert_eq!(material(&scene, 0), HIGHLIGHT);
            assert_eq!(material(&scene, 1), HIGHLIGHT);
        }

        assert_eq!(
            picking.resolve_hit(&graph, &mut scene, Some(basemap)),
            PickOutcome::Miss
        );
        assert_eq!(material(&scene, 0), LOW);
        assert_eq!(material(&scene, 1), LOW);
        assert!(picking.selection().is_empty());
    }

    #[test]
    fn picking_another_line_restores_previous_pair() {
        let graph = load(&three_substations());
        let (mut scene, basemap) = build(&graph);
        let mut picking = PickingController::default();

        let first = scene.ribbons(LineRef(0))[0];
        let second = scene.ribbons(LineRef(1))[0];
        picking.resolve_hit(&graph, &mut scene, Some(first));
        picking.resolve_hit(&graph, &mut scene, Some(second));

        assert_eq!(material(&scene, 0), LOW);
        assert_eq!(material(&scene, 1), HIGHLIGHT);
        assert_eq!(material(&scene, 2), HIGHLIGHT);

        picking.resolve_hit(&graph, &mut scene, Some(basemap));
        for node in 0..3 {
            assert_eq!(material(&scene, node), LOW);
        }
    }

    #[test]
    fn node_hit_shows_tooltip_and_keeps_selection() {
        let graph = load(&three_substations());
        let (mut scene, _) = build(&graph);
        let mut picking = PickingController::default();

        let ribbon = scene.ribbons(LineRef(0))[0];
        picking.resolve_hit(&graph, &mut scene, Some(ribbon));
        let selected = picking.selection().pair();

        let marker = scene.marker(NodeRef(2)).expect("marker");
        let outcome = picking.resolve_hit(&graph, &mut scene, Some(marker));
        assert_eq!(
            outcome,
            PickOutcome::ShowTooltip("Substation\n3 SS_3\nConnections: 1".to_string())
        );
        assert_eq!(picking.selection().pair(), selected);
        assert_eq!(material(&scene, 0), HIGHLIGHT);
        assert_eq!(material(&scene, 2), LOW);
    }

    #[test]
    fn reselecting_the_same_line_is_idempotent() {
        let graph = load(&three_substations());
        let (mut scene, basemap) = build(&graph);
        let mut picking = PickingController::default();

        let ribbon = scene.ribbons(LineRef(1))[0];
        let once = picking.resolve_hit(&graph, &mut scene, Some(ribbon));
        let twice = picking.resolve_hit(&graph, &mut scene, Some(ribbon));
        assert_eq!(once, twice);
        assert_eq!(material(&scene, 1), HIGHLIGHT);

        picking.resolve_hit(&graph, &mut scene, Some(basemap));
        assert_eq!(material(&scene, 1), LOW);
        assert_eq!(material(&scene, 2), LOW);
    }

    #[test]
    fn empty_space_keeps_selection() {
        let graph = load(&three_substations());
        let (mut scene, _) = build(&graph);
        let mut picking = PickingController::default();

        let ribbon = scene.ribbons(LineRef(0))[0];
        picking.resolve_hit(&graph, &mut scene, Some(ribbon));
        let selected = picking.selection().pair();
        assert!(selected.is_some());

        assert_eq!(picking.resolve_hit(&graph, &mut scene, None), PickOutcome::Miss);
        assert_eq!(picking.selection().pair(), selected);
        assert_eq!(material(&scene, 0), HIGHLIGHT);
        assert_eq!(material(&scene, 1), HIGHLIGHT);
    }

    #[test]
    fn stale_handle_is_a_miss() {
        let graph = load(&three_substations());
        let (mut scene, _) = build(&graph);
        let mut picking = PickingController::default();

        let ribbon = scene.ribbons(LineRef(0))[0];
        picking.resolve_hit(&graph, &mut scene, Some(ribbon));
        let stale = PrimitiveId(Handle::new(10_000, 0));
        assert_eq!(
            picking.resolve_hit(&graph, &mut scene, Some(stale)),
            PickOutcome::Miss
        );
        assert!(picking.selection().is_empty());
        assert_eq!(material(&scene, 0), LOW);
    }

    #[test]
    fn line_to_unknown_node_is_dropped() {
        let doc = NetworkDocument {
            substations: vec![substation(1, 19.80, 45.24), substation(2, 19.88, 45.26)],
            lines: vec![line(10, 1, 99, &[(19.80, 45.24), (19.88, 45.26)])],
            ..NetworkDocument::default()
        };
        let graph = load(&doc);
        assert_eq!(graph.nodes().len(), 2);
        assert!(graph.lines().is_empty());
        assert!(graph.nodes().iter().all(|n| n.connection_count() == 0));

        let (scene, _) = build(&graph);
        // Basemap plus two markers.
        assert_eq!(scene.world.len(), 3);
    }

    #[test]
    fn ray_over_ribbon_resolves_to_line() {
        let graph = load(&three_substations());
        let (mut scene, _) = build(&graph);
        let picker = Picker::new(&scene.world);
        let mut picking = PickingController::default();

        let ribbon = scene.ribbons(LineRef(0))[0];
        // Quarter way along the centerline, away from the shared diagonal.
        let positions = &scene.world.primitive(ribbon).expect("ribbon").mesh.positions;
        let start = (positions[0] + positions[1]) * 0.5;
        let end = (positions[2] + positions[3]) * 0.5;
        let target = start + (end - start) * 0.25;
        let ray = Ray::new(
            Vec3::new(target.x, 2000.0, target.z),
            Vec3::new(0.0, -1.0, 0.0),
        );
        let hit = picker
            .pick_ray(&scene.world, ray, PickOptions::default())
            .map(|h| h.primitive);
        assert_eq!(hit, Some(ribbon));

        let outcome = picking.resolve_hit(&graph, &mut scene, hit);
        assert!(matches!(outcome, PickOutcome::ShowTooltip(ref t) if t.starts_with("PowerLine")));
        assert_eq!(material(&scene, 0), HIGHLIGHT);
    }
}

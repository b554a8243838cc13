use foundation::math::Vec2;
use layers::{NetworkScene, PickOutcome, PickingController};
use network::NetworkGraph;
use scene::camera::{MapCamera, Viewport};
use scene::picking::{PickOptions, Picker};
use tracing::trace;

use crate::script::{InputEvent, PointerButton};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Buttons {
    left: bool,
    middle: bool,
    right: bool,
}

impl Buttons {
    fn set(&mut self, button: PointerButton, pressed: bool) {
        match button {
            PointerButton::Left => self.left = pressed,
            PointerButton::Middle => self.middle = pressed,
            PointerButton::Right => self.right = pressed,
        }
    }

    fn any(&self) -> bool {
        self.left || self.middle || self.right
    }
}

/// Host-side input handling: camera navigation, left-click picking and the
/// single open tooltip.
///
/// Left drag pans, middle drag orbits, the wheel zooms. Any drag, wheel or
/// press closes the tooltip; a left press then picks under the pointer.
pub struct ViewerSession {
    graph: NetworkGraph,
    scene: NetworkScene,
    picker: Picker,
    picking: PickingController,
    camera: MapCamera,
    viewport: Viewport,
    buttons: Buttons,
    last_pos: Vec2,
    tooltip: Option<String>,
}

impl ViewerSession {
    pub fn new(
        graph: NetworkGraph,
        scene: NetworkScene,
        picking: PickingController,
        camera: MapCamera,
        viewport: Viewport,
    ) -> Self {
        let picker = Picker::new(&scene.world);
        Self {
            graph,
            scene,
            picker,
            picking,
            camera,
            viewport,
            buttons: Buttons::default(),
            last_pos: Vec2::default(),
            tooltip: None,
        }
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn scene(&self) -> &NetworkScene {
        &self.scene
    }

    pub fn camera(&self) -> &MapCamera {
        &self.camera
    }

    pub fn picking(&self) -> &PickingController {
        &self.picking
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    /// Applies one event. Returns the pick outcome for left presses.
    pub fn apply(&mut self, event: InputEvent) -> Option<PickOutcome> {
        match event {
            InputEvent::PointerDown { button, x, y } => self.pointer_down(button, x, y),
            InputEvent::PointerUp { button, x, y } => {
                self.pointer_up(button, x, y);
                None
            }
            InputEvent::PointerMove { x, y } => {
                self.pointer_move(x, y);
                None
            }
            InputEvent::Wheel { delta } => {
                self.wheel(delta);
                None
            }
        }
    }

    pub fn pointer_down(&mut self, button: PointerButton, x: f64, y: f64) -> Option<PickOutcome> {
        self.tooltip = None;
        self.buttons.set(button, true);
        self.last_pos = Vec2::new(x, y);
        if button != PointerButton::Left {
            return None;
        }

        let opts = PickOptions {
            max_distance: self.camera.far,
        };
        let hit = self
            .camera
            .screen_ray(x, y, self.viewport)
            .and_then(|ray| self.picker.pick_ray(&self.scene.world, ray, opts))
            .map(|hit| hit.primitive);
        let outcome = self.picking.resolve_hit(&self.graph, &mut self.scene, hit);
        if let PickOutcome::ShowTooltip(text) = &outcome {
            self.tooltip = Some(text.clone());
        }
        Some(outcome)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let pos = Vec2::new(x, y);
        let delta = pos - self.last_pos;
        if self.buttons.left {
            self.camera.pan(delta.x, delta.y);
        } else if self.buttons.middle {
            self.camera.rotate(delta.x, delta.y);
        }
        if self.buttons.any() {
            self.tooltip = None;
            trace!(dx = delta.x, dy = delta.y, "drag");
        }
        self.last_pos = pos;
    }

    pub fn pointer_up(&mut self, button: PointerButton, x: f64, y: f64) {
        self.buttons.set(button, false);
        self.last_pos = Vec2::new(x, y);
    }

    pub fn wheel(&mut self, delta: f64) {
        self.camera.zoom(delta);
        self.tooltip = None;
    }
}

#[cfg(test)]
mod tests {
    use super::ViewerSession;
    use crate::script::{InputEvent, PointerButton};
    use foundation::bounds::GeoBounds;
    use foundation::math::{GeoPoint, Vec2, Vec3};
    use layers::{BasemapLayer, NetworkLayer, PickOutcome, PickingController};
    use network::{NetworkGraphBuilder, NodeRef, PowerLine, PowerNode};
    use scene::World;
    use scene::camera::{MapCamera, Viewport};
    use scene::components::Material;

    const HIGHLIGHT: Material = Material::diffuse(173, 255, 47);

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{a} != {b} (eps={eps})");
    }

    /// Two substations east and west of the map center joined by a straight
    /// line through it, under the default top-down camera. Pixel (410, 300)
    /// lands on the ribbon clear of its triangle diagonal.
    fn session() -> ViewerSession {
        let mut builder = NetworkGraphBuilder::new();
        builder.push_node(PowerNode::substation(1, "West", GeoPoint::new(19.3, 45.5)));
        builder.push_node(PowerNode::substation(2, "East", GeoPoint::new(19.7, 45.5)));
        builder
            .push_line(PowerLine {
                id: 7,
                name: "Feeder".to_string(),
                first_end: 1,
                second_end: 2,
                vertices: vec![GeoPoint::new(19.3, 45.5), GeoPoint::new(19.7, 45.5)],
                is_underground: true,
                resistance: 0.2,
                conductor_material: "Copper".to_string(),
                line_type: "Cable".to_string(),
                thermal_constant_heat: 2400,
            })
            .expect("line");
        let graph = builder.finish();

        let mut world = World::new();
        BasemapLayer::new("map.jpg", 1600.0, 1000.0).spawn(&mut world);
        let scene = NetworkLayer::new()
            .build_over(
                world,
                &graph,
                GeoBounds::new(19.0, 20.0, 45.0, 46.0),
                Vec2::new(1600.0, 1000.0),
            )
            .expect("build");

        ViewerSession::new(
            graph,
            scene,
            PickingController::default(),
            MapCamera::default(),
            Viewport::new(800.0, 600.0),
        )
    }

    fn marker_material(session: &ViewerSession, node: usize) -> Material {
        let scene = session.scene();
        let marker = scene.marker(NodeRef(node)).expect("marker");
        scene.world.material(marker).cloned().expect("material")
    }

    /// Horizontal pixel over scene point `x` at height `y` for the default camera.
    fn pixel_x(x: f64, y: f64) -> f64 {
        (x / (30f64.to_radians().tan() * (2000.0 - y)) + 1.0) * 400.0
    }

    #[test]
    fn left_click_on_line_highlights_endpoints() {
        let mut s = session();
        let outcome = s.pointer_down(PointerButton::Left, 410.0, 300.0);

        assert!(matches!(outcome, Some(PickOutcome::ShowTooltip(ref t)) if t.starts_with("PowerLine\n7 Feeder")));
        assert!(s.tooltip().is_some());
        assert_eq!(marker_material(&s, 0), HIGHLIGHT);
        assert_eq!(marker_material(&s, 1), HIGHLIGHT);
    }

    #[test]
    fn left_click_on_marker_shows_node_tooltip() {
        let mut s = session();
        // East marker top face, just off its center at x = +320.
        let px = pixel_x(322.0, 10.1);
        let outcome = s.pointer_down(PointerButton::Left, px, 300.0);
        assert_eq!(
            outcome,
            Some(PickOutcome::ShowTooltip(
                "Substation\n2 East\nConnections: 1".to_string()
            ))
        );
        assert!(s.picking().selection().is_empty());
    }

    #[test]
    fn click_on_basemap_clears_selection() {
        let mut s = session();
        s.pointer_down(PointerButton::Left, 410.0, 300.0);
        s.pointer_up(PointerButton::Left, 410.0, 300.0);

        // Ground around (29, 0, -289): map only, away from line and markers.
        let outcome = s.pointer_down(PointerButton::Left, 410.0, 200.0);
        assert_eq!(outcome, Some(PickOutcome::Miss));
        assert!(s.tooltip().is_none());
        assert!(s.picking().selection().is_empty());
        assert_eq!(marker_material(&s, 0), Material::diffuse(255, 130, 130));
    }

    #[test]
    fn click_off_the_map_keeps_selection() {
        let mut s = session();
        s.pointer_down(PointerButton::Left, 410.0, 300.0);
        s.pointer_up(PointerButton::Left, 410.0, 300.0);

        let outcome = s.pointer_down(PointerButton::Left, 1.0, 1.0);
        assert_eq!(outcome, Some(PickOutcome::Miss));
        assert!(s.tooltip().is_none());
        assert_eq!(marker_material(&s, 0), HIGHLIGHT);
        assert_eq!(marker_material(&s, 1), HIGHLIGHT);
    }

    #[test]
    fn drag_pans_and_closes_tooltip() {
        let mut s = session();
        s.pointer_down(PointerButton::Left, 410.0, 300.0);
        assert!(s.tooltip().is_some());

        s.pointer_move(420.0, 295.0);
        assert!(s.tooltip().is_none());
        assert_close(s.camera().position.x, -10.0, 1e-12);
        assert_close(s.camera().position.z, 5.0, 1e-12);

        s.pointer_up(PointerButton::Left, 420.0, 295.0);
        s.pointer_move(500.0, 500.0);
        assert_close(s.camera().position.x, -10.0, 1e-12);
    }

    #[test]
    fn middle_drag_orbits_and_center_pick_still_hits_line() {
        let mut s = session();
        s.apply(InputEvent::PointerDown {
            button: PointerButton::Middle,
            x: 400.0,
            y: 300.0,
        });
        s.apply(InputEvent::PointerMove { x: 445.0, y: 280.0 });
        s.apply(InputEvent::PointerUp {
            button: PointerButton::Middle,
            x: 445.0,
            y: 280.0,
        });
        assert_close(s.camera().azimuth_deg, 45.0, 0.0);
        assert_close(s.camera().elevation_deg, -20.0, 0.0);
        assert_eq!(s.camera().position, Vec3::new(0.0, 2000.0, 0.0));

        let outcome = s.apply(InputEvent::PointerDown {
            button: PointerButton::Left,
            x: 400.0,
            y: 300.0,
        });
        assert!(matches!(outcome, Some(PickOutcome::ShowTooltip(ref t)) if t.starts_with("PowerLine")));
    }

    #[test]
    fn wheel_zooms_and_closes_tooltip() {
        let mut s = session();
        s.pointer_down(PointerButton::Left, 410.0, 300.0);
        s.pointer_up(PointerButton::Left, 410.0, 300.0);
        s.apply(InputEvent::Wheel { delta: 120.0 });
        assert!(s.tooltip().is_none());
        assert_close(s.camera().position.y, 1880.0, 1e-12);
        // Selection survives navigation.
        assert_eq!(marker_material(&s, 0), HIGHLIGHT);
    }

    #[test]
    fn right_press_only_closes_tooltip() {
        let mut s = session();
        s.pointer_down(PointerButton::Left, 410.0, 300.0);
        s.pointer_up(PointerButton::Left, 410.0, 300.0);
        assert_eq!(s.pointer_down(PointerButton::Right, 410.0, 300.0), None);
        assert!(s.tooltip().is_none());
        assert_eq!(marker_material(&s, 1), HIGHLIGHT);
    }
}

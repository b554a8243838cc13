use network::ConnectionTier;
use scene::components::Material;

/// Marker and ribbon dimensions plus the materials used for each kind of
/// network primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkStyle {
    /// Edge length of node marker cubes.
    pub cube_size: f64,
    pub line_width: f64,
    /// Gap between stacked markers, and between the ground and the lowest one.
    pub stack_epsilon: f64,
    /// Height of line ribbons above the ground plane.
    pub line_elevation: f64,
    pub tier_low: Material,
    pub tier_medium: Material,
    pub tier_high: Material,
    pub line: Material,
    pub highlight: Material,
}

impl Default for NetworkStyle {
    fn default() -> Self {
        Self {
            cube_size: 10.0,
            line_width: 3.0,
            stack_epsilon: 0.1,
            line_elevation: 1.0,
            tier_low: Material::diffuse(255, 130, 130),
            tier_medium: Material::diffuse(255, 80, 80),
            tier_high: Material::diffuse(240, 0, 0),
            line: Material::diffuse(0, 0, 0),
            highlight: Material::diffuse(173, 255, 47),
        }
    }
}

impl NetworkStyle {
    pub fn node_material(&self, tier: ConnectionTier) -> &Material {
        match tier {
            ConnectionTier::Low => &self.tier_low,
            ConnectionTier::Medium => &self.tier_medium,
            ConnectionTier::High => &self.tier_high,
        }
    }

    /// Center height of the lowest marker in a stack.
    pub fn base_height(&self) -> f64 {
        self.cube_size / 2.0 + self.stack_epsilon
    }

    pub fn stack_step(&self) -> f64 {
        self.cube_size + self.stack_epsilon
    }
}

use foundation::math::GeoPoint;

use crate::node::NetworkId;

#[derive(Debug, Clone, PartialEq)]
pub struct PowerLine {
    pub id: NetworkId,
    pub name: String,
    pub first_end: NetworkId,
    pub second_end: NetworkId,
    /// Path between the endpoints in document order.
    pub vertices: Vec<GeoPoint>,
    pub is_underground: bool,
    pub resistance: f32,
    pub conductor_material: String,
    pub line_type: String,
    pub thermal_constant_heat: i64,
}

impl PowerLine {
    pub fn endpoints(&self) -> (NetworkId, NetworkId) {
        (self.first_end, self.second_end)
    }

    /// Number of segments the path is drawn with.
    pub fn segment_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn tooltip(&self) -> String {
        format!(
            "PowerLine\n{} {}\nType: {}\nConductor: {}\nUnderground: {}\nR: {}\nThermal constant heat: {}\nEnds: {} - {}",
            self.id,
            self.name,
            self.line_type,
            self.conductor_material,
            if self.is_underground { "yes" } else { "no" },
            self.resistance,
            self.thermal_constant_heat,
            self.first_end,
            self.second_end
        )
    }
}

#[cfg(test)]
pub(crate) fn sample_line(id: NetworkId, first_end: NetworkId, second_end: NetworkId) -> PowerLine {
    PowerLine {
        id,
        name: format!("L{id}"),
        first_end,
        second_end,
        vertices: vec![GeoPoint::new(19.80, 45.24), GeoPoint::new(19.81, 45.25)],
        is_underground: false,
        resistance: 0.25,
        conductor_material: "Steel".to_string(),
        line_type: "Overhead".to_string(),
        thermal_constant_heat: 2400,
    }
}

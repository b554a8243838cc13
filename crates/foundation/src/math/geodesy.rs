/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// WGS84 semi-minor axis (meters).
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);
/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);
/// WGS84 second eccentricity squared.
pub const WGS84_EP2: f64 = (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);

/// Length of the meridian arc from the equator to `lat_rad` (meters).
pub fn meridian_arc(lat_rad: f64) -> f64 {
    let e2 = WGS84_E2;
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    WGS84_A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat_rad
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat_rad).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat_rad).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * lat_rad).sin())
}

#[cfg(test)]
mod tests {
    use super::{WGS84_A, WGS84_B, meridian_arc};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn semi_minor_axis_matches_reference() {
        assert_close(WGS84_B, 6_356_752.314_245, 1e-3);
        assert!(WGS84_B < WGS84_A);
    }

    #[test]
    fn meridian_arc_is_zero_at_equator_and_quarter_meridian_at_pole() {
        assert_close(meridian_arc(0.0), 0.0, 1e-9);
        // WGS84 quarter meridian is ~10_001_965.729 m.
        assert_close(meridian_arc(std::f64::consts::FRAC_PI_2), 10_001_965.729, 1.0);
    }
}

//! Transverse Mercator (UTM) conversion between survey easting/northing and
//! geographic coordinates on the WGS84 ellipsoid.
//!
//! Series expansions follow the classic USGS formulation. Accuracy is well
//! below a centimeter inside a zone, which is far finer than anything the
//! scene mapping can resolve. The one hard requirement is determinism: the
//! same input always yields the same `GeoPoint`.

use super::geodesy::{WGS84_A, WGS84_E2, WGS84_EP2, meridian_arc};

/// UTM scale factor on the central meridian.
pub const UTM_K0: f64 = 0.9996;
/// False easting applied to every zone (meters).
pub const UTM_FALSE_EASTING: f64 = 500_000.0;
/// False northing for the southern hemisphere (meters).
pub const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Geographic position in decimal degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Hemisphere {
    #[default]
    North,
    South,
}

/// A fixed UTM zone. Survey documents carry no zone information, so the
/// caller pins one for the whole document.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UtmZone {
    pub number: u8,
    pub hemisphere: Hemisphere,
}

impl UtmZone {
    pub fn north(number: u8) -> Self {
        Self {
            number,
            hemisphere: Hemisphere::North,
        }
    }

    pub fn south(number: u8) -> Self {
        Self {
            number,
            hemisphere: Hemisphere::South,
        }
    }

    /// Longitude of the zone's central meridian in degrees.
    pub fn central_meridian_deg(&self) -> f64 {
        f64::from(self.number) * 6.0 - 183.0
    }

    fn false_northing(&self) -> f64 {
        match self.hemisphere {
            Hemisphere::North => 0.0,
            Hemisphere::South => UTM_FALSE_NORTHING_SOUTH,
        }
    }
}

/// Projected (easting `x`, northing `y`) to geographic coordinates.
pub fn projected_to_geographic(x: f64, y: f64, zone: UtmZone) -> GeoPoint {
    let e2 = WGS84_E2;
    let ep2 = WGS84_EP2;
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    let m = (y - zone.false_northing()) / UTM_K0;
    let mu = m / (WGS84_A * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

    let sqrt_1_e2 = (1.0 - e2).sqrt();
    let e1 = (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2);
    let e1_2 = e1 * e1;
    let e1_3 = e1_2 * e1;
    let e1_4 = e1_3 * e1;

    // Footpoint latitude.
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let c1 = ep2 * cos_phi1 * cos_phi1;
    let t1 = tan_phi1 * tan_phi1;
    let w = 1.0 - e2 * sin_phi1 * sin_phi1;
    let n1 = WGS84_A / w.sqrt();
    let r1 = WGS84_A * (1.0 - e2) / (w * w.sqrt());
    let d = (x - UTM_FALSE_EASTING) / (n1 * UTM_K0);
    let d2 = d * d;
    let d3 = d2 * d;
    let d4 = d3 * d;
    let d5 = d4 * d;
    let d6 = d5 * d;

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d6
                    / 720.0);

    let lon = (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
        + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1) * d5 / 120.0)
        / cos_phi1;

    GeoPoint::new(
        zone.central_meridian_deg() + lon.to_degrees(),
        lat.to_degrees(),
    )
}

/// Geographic to projected (easting, northing). Inverse of [`projected_to_geographic`].
pub fn geographic_to_projected(point: GeoPoint, zone: UtmZone) -> (f64, f64) {
    let e2 = WGS84_E2;
    let ep2 = WGS84_EP2;

    let phi = point.lat.to_radians();
    let sin_phi = phi.sin();
    let cos_phi = phi.cos();
    let tan_phi = phi.tan();

    let n = WGS84_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = tan_phi * tan_phi;
    let c = ep2 * cos_phi * cos_phi;
    let a = (point.lon - zone.central_meridian_deg()).to_radians() * cos_phi;
    let a2 = a * a;
    let a3 = a2 * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    let a6 = a5 * a;
    let m = meridian_arc(phi);

    let x = UTM_K0
        * n
        * (a + (1.0 - t + c) * a3 / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0)
        + UTM_FALSE_EASTING;
    let y = UTM_K0
        * (m + n
            * tan_phi
            * (a2 / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0))
        + zone.false_northing();

    (x, y)
}

#[cfg(test)]
mod tests {
    use super::{GeoPoint, UtmZone, geographic_to_projected, projected_to_geographic};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn zone_34_central_meridian_is_21_east() {
        assert_eq!(UtmZone::north(34).central_meridian_deg(), 21.0);
        assert_eq!(UtmZone::north(31).central_meridian_deg(), 3.0);
    }

    #[test]
    fn false_origin_maps_to_equator_on_central_meridian() {
        let p = projected_to_geographic(500_000.0, 0.0, UtmZone::north(34));
        assert_close(p.lon, 21.0, 1e-12);
        assert_close(p.lat, 0.0, 1e-12);
    }

    #[test]
    fn central_meridian_easting_keeps_longitude() {
        let p = projected_to_geographic(500_000.0, 5_000_000.0, UtmZone::north(34));
        assert_close(p.lon, 21.0, 1e-9);
        assert!(p.lat > 45.0 && p.lat < 45.3, "lat {}", p.lat);
    }

    #[test]
    fn round_trips_inside_the_zone() {
        let zone = UtmZone::north(34);
        for (lon, lat) in [(19.84, 45.25), (21.0, 44.0), (23.5, 47.9), (18.2, 41.1)] {
            let (x, y) = geographic_to_projected(GeoPoint::new(lon, lat), zone);
            let back = projected_to_geographic(x, y, zone);
            assert_close(back.lon, lon, 1e-7);
            assert_close(back.lat, lat, 1e-7);
        }
    }

    #[test]
    fn conversion_is_deterministic() {
        let zone = UtmZone::north(34);
        let a = projected_to_geographic(406_000.0, 5_012_000.0, zone);
        let b = projected_to_geographic(406_000.0, 5_012_000.0, zone);
        assert_eq!(a, b);
    }

    #[test]
    fn southern_hemisphere_uses_false_northing() {
        let p = projected_to_geographic(500_000.0, 10_000_000.0, UtmZone::south(34));
        assert_close(p.lat, 0.0, 1e-12);
    }
}

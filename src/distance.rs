// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Radius of Earth used by the haversine formula, in kilometers.
const EARTH_RADIUS: f64 = 6371.0;

const EARTH_DIAMETER: f64 = EARTH_RADIUS + EARTH_RADIUS;

/// Calculates the great-circle distance between two lat-lon positions
/// (in degrees) on Earth using the [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
/// Returns the result in kilometers.
pub fn earth_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lon1 = lon1.to_radians();
    let lat2 = lat2.to_radians();
    let lon2 = lon2.to_radians();

    let sin_dlat_half = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon_half = ((lon2 - lon1) * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    EARTH_DIAMETER * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr, $eps:expr) => {
            assert!(
                (($a - $b).abs() < $eps),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    #[test]
    fn identical_points() {
        assert_eq!(earth_distance(59.9139, 10.7522, 59.9139, 10.7522), 0.0);
    }

    #[test]
    fn known_distances() {
        // One degree of latitude along a meridian
        assert_almost_eq!(earth_distance(0.0, 0.0, 1.0, 0.0), 111.1949, 1e-3);

        // Oslo S - Bergen stasjon
        assert_almost_eq!(earth_distance(59.9111, 10.7528, 60.3903, 5.3330), 304.56, 0.01);

        // Half of the circumference for antipodal points
        assert_almost_eq!(
            earth_distance(0.0, 0.0, 0.0, 180.0),
            std::f64::consts::PI * EARTH_RADIUS,
            1e-6
        );
    }

    #[test]
    fn symmetric() {
        let a = earth_distance(59.92, 10.75, 59.95, 10.80);
        let b = earth_distance(59.95, 10.80, 59.92, 10.75);
        assert_eq!(a, b);
    }
}

//! Equirectangular lon/lat to world-space projection.
//!
//! The overview coordinate maps to the world origin. Longitude degrees are
//! compressed by the cosine of the overview latitude so region shapes keep
//! roughly true proportions at this scale; the distortion across mainland
//! France is negligible for a dashboard map.

use bevy::math::Vec2;

use climate::config::{OVERVIEW_LAT, OVERVIEW_LON};

/// World units per degree of latitude.
pub const WORLD_PER_DEGREE: f64 = 100.0;

/// cos(46.6°): longitude degrees are this much shorter than latitude degrees.
pub const LON_SCALE: f64 = 0.687;

/// Project a lon/lat coordinate into world space.
pub fn geo_to_world(lon: f64, lat: f64) -> Vec2 {
    Vec2::new(
        ((lon - OVERVIEW_LON) * WORLD_PER_DEGREE * LON_SCALE) as f32,
        ((lat - OVERVIEW_LAT) * WORLD_PER_DEGREE) as f32,
    )
}

/// Invert [`geo_to_world`]; used to turn cursor positions back into
/// coordinates for hit testing and data queries.
pub fn world_to_geo(world: Vec2) -> (f64, f64) {
    let lon = f64::from(world.x) / (WORLD_PER_DEGREE * LON_SCALE) + OVERVIEW_LON;
    let lat = f64::from(world.y) / WORLD_PER_DEGREE + OVERVIEW_LAT;
    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_maps_to_origin() {
        let p = geo_to_world(OVERVIEW_LON, OVERVIEW_LAT);
        assert!(p.length() < 1e-6);
    }

    #[test]
    fn test_round_trip() {
        let (lon, lat) = (2.35, 48.85); // Paris
        let (lon2, lat2) = world_to_geo(geo_to_world(lon, lat));
        assert!((lon - lon2).abs() < 1e-4);
        assert!((lat - lat2).abs() < 1e-4);
    }

    #[test]
    fn test_north_is_up_east_is_right() {
        let east = geo_to_world(OVERVIEW_LON + 1.0, OVERVIEW_LAT);
        let north = geo_to_world(OVERVIEW_LON, OVERVIEW_LAT + 1.0);
        assert!(east.x > 0.0 && east.y.abs() < 1e-6);
        assert!(north.y > 0.0 && north.x.abs() < 1e-6);
    }

    #[test]
    fn test_longitude_compressed() {
        let east = geo_to_world(OVERVIEW_LON + 1.0, OVERVIEW_LAT);
        let north = geo_to_world(OVERVIEW_LON, OVERVIEW_LAT + 1.0);
        assert!(east.x < north.y);
    }
}

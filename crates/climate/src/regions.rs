//! Region geometry catalog.
//!
//! Loaded once at startup from a GeoJSON feature collection keyed by the
//! `nom` property. Load failure is logged and leaves the map without
//! selectable regions; the dashboard itself keeps running.

use bevy::math::DVec2;
use bevy::prelude::*;
use serde::Deserialize;

use crate::config::REGIONS_ASSET_PATH;

/// Lon/lat axis-aligned bounds of a region outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl GeoBounds {
    fn from_points<'a>(points: impl Iterator<Item = &'a DVec2>) -> Option<Self> {
        let mut bounds: Option<GeoBounds> = None;
        for p in points {
            bounds = Some(match bounds {
                None => GeoBounds { min: *p, max: *p },
                Some(b) => GeoBounds {
                    min: b.min.min(*p),
                    max: b.max.max(*p),
                },
            });
        }
        bounds
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }
}

/// One selectable region: a name and one or more exterior rings in lon/lat.
#[derive(Debug, Clone)]
pub struct RegionShape {
    pub name: String,
    /// Exterior rings (one per polygon part), each a closed loop of
    /// lon/lat vertices without a repeated end point.
    pub rings: Vec<Vec<DVec2>>,
    pub bounds: GeoBounds,
}

impl RegionShape {
    /// Even-odd ray cast over all rings.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if lon < self.bounds.min.x
            || lon > self.bounds.max.x
            || lat < self.bounds.min.y
            || lat > self.bounds.max.y
        {
            return false;
        }
        let mut inside = false;
        for ring in &self.rings {
            let n = ring.len();
            for i in 0..n {
                let a = ring[i];
                let b = ring[(i + 1) % n];
                if (a.y > lat) != (b.y > lat) {
                    let x_cross = a.x + (lat - a.y) / (b.y - a.y) * (b.x - a.x);
                    if lon < x_cross {
                        inside = !inside;
                    }
                }
            }
        }
        inside
    }
}

/// All selectable regions, empty when the asset failed to load.
#[derive(Resource, Default)]
pub struct RegionCatalog {
    pub regions: Vec<RegionShape>,
}

impl RegionCatalog {
    /// Topmost region containing the point, if any. Regions do not overlap
    /// in practice; first hit wins.
    pub fn region_at(&self, lon: f64, lat: f64) -> Option<&RegionShape> {
        self.regions.iter().find(|r| r.contains(lon, lat))
    }

    pub fn by_name(&self, name: &str) -> Option<&RegionShape> {
        self.regions.iter().find(|r| r.name == name)
    }
}

// ---------------------------------------------------------------------------
// GeoJSON parsing
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    properties: FeatureProperties,
    geometry: Geometry,
}

#[derive(Deserialize)]
struct FeatureProperties {
    nom: String,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    // GeoJSON polygon coordinates: rings of [lon, lat] pairs, ring 0 is the
    // exterior. Interior rings (holes) are ignored; none of the region
    // shapes have them.
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<[f64; 2]>>> },
}

fn ring_points(raw: &[[f64; 2]]) -> Vec<DVec2> {
    let mut points: Vec<DVec2> = raw.iter().map(|&[lon, lat]| DVec2::new(lon, lat)).collect();
    // GeoJSON rings repeat the first vertex at the end; drop it.
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Parse a feature collection into a catalog. Features with empty or
/// degenerate geometry are an error; the asset is trusted to be well formed
/// or rejected as a whole.
pub fn parse_catalog(body: &str) -> Result<RegionCatalog, String> {
    let collection: FeatureCollection =
        serde_json::from_str(body).map_err(|e| format!("regions asset: {e}"))?;

    let mut regions = Vec::with_capacity(collection.features.len());
    for feature in &collection.features {
        let rings: Vec<Vec<DVec2>> = match &feature.geometry {
            Geometry::Polygon { coordinates } => {
                coordinates.first().map(|r| ring_points(r)).into_iter().collect()
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .filter_map(|polygon| polygon.first().map(|r| ring_points(r)))
                .collect(),
        };
        if rings.iter().any(|r| r.len() < 3) || rings.is_empty() {
            return Err(format!(
                "regions asset: degenerate geometry for '{}'",
                feature.properties.nom
            ));
        }
        let bounds = GeoBounds::from_points(rings.iter().flatten())
            .ok_or_else(|| format!("regions asset: no points for '{}'", feature.properties.nom))?;
        regions.push(RegionShape {
            name: feature.properties.nom.clone(),
            rings,
            bounds,
        });
    }
    Ok(RegionCatalog { regions })
}

// ---------------------------------------------------------------------------
// Startup load
// ---------------------------------------------------------------------------

/// Load the region catalog from disk. Non-fatal on failure.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_region_catalog(mut catalog: ResMut<RegionCatalog>) {
    let body = match std::fs::read_to_string(REGIONS_ASSET_PATH) {
        Ok(body) => body,
        Err(e) => {
            error!("failed to read {REGIONS_ASSET_PATH}: {e}; map has no selectable regions");
            return;
        }
    };
    match parse_catalog(&body) {
        Ok(parsed) => {
            info!("loaded {} regions from {REGIONS_ASSET_PATH}", parsed.regions.len());
            *catalog = parsed;
        }
        Err(e) => {
            error!("{e}; map has no selectable regions");
        }
    }
}

/// Shared slot bridging the browser fetch of the regions asset into the ECS.
#[cfg(target_arch = "wasm32")]
#[derive(Resource, Default, Clone)]
pub struct RegionAssetBuffer(pub std::sync::Arc<std::sync::Mutex<Option<Result<String, String>>>>);

/// Startup system: fetch the regions asset over HTTP on wasm.
#[cfg(target_arch = "wasm32")]
pub fn load_region_catalog(buffer: Res<RegionAssetBuffer>) {
    let slot = buffer.0.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let result = crate::fetch::web::fetch_text(REGIONS_ASSET_PATH).await;
        if let Ok(mut guard) = slot.lock() {
            *guard = Some(result);
        }
    });
}

/// Poll the wasm fetch slot and install the catalog once the asset arrives.
#[cfg(target_arch = "wasm32")]
pub fn poll_region_catalog(buffer: Res<RegionAssetBuffer>, mut catalog: ResMut<RegionCatalog>) {
    let Ok(mut slot) = buffer.0.lock() else {
        return;
    };
    let Some(result) = slot.take() else {
        return;
    };
    match result.and_then(|body| parse_catalog(&body)) {
        Ok(parsed) => {
            info!("loaded {} regions from {REGIONS_ASSET_PATH}", parsed.regions.len());
            *catalog = parsed;
        }
        Err(e) => {
            error!("{e}; map has no selectable regions");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "nom": "Square" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "nom": "Islands" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[10.0, 10.0], [11.0, 10.0], [11.0, 11.0], [10.0, 10.0]]],
                        [[[20.0, 20.0], [21.0, 20.0], [21.0, 21.0], [20.0, 20.0]]]
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_fixture() {
        let catalog = parse_catalog(FIXTURE).unwrap();
        assert_eq!(catalog.regions.len(), 2);
        assert_eq!(catalog.regions[0].name, "Square");
        assert_eq!(catalog.regions[0].rings.len(), 1);
        // Closing vertex dropped: 4 corners, not 5.
        assert_eq!(catalog.regions[0].rings[0].len(), 4);
        assert_eq!(catalog.regions[1].rings.len(), 2);
    }

    #[test]
    fn test_bounds() {
        let catalog = parse_catalog(FIXTURE).unwrap();
        let b = catalog.regions[0].bounds;
        assert_eq!(b.min, DVec2::new(0.0, 0.0));
        assert_eq!(b.max, DVec2::new(2.0, 2.0));
        assert_eq!(b.center(), DVec2::new(1.0, 1.0));
    }

    #[test]
    fn test_point_in_polygon() {
        let catalog = parse_catalog(FIXTURE).unwrap();
        let square = &catalog.regions[0];
        assert!(square.contains(1.0, 1.0));
        assert!(!square.contains(3.0, 1.0));
        assert!(!square.contains(1.0, -0.5));
    }

    #[test]
    fn test_multipolygon_hit_either_part() {
        let catalog = parse_catalog(FIXTURE).unwrap();
        let islands = &catalog.regions[1];
        assert!(islands.contains(10.7, 10.2));
        assert!(islands.contains(20.7, 20.2));
        assert!(!islands.contains(15.0, 15.0));
    }

    #[test]
    fn test_region_at_misses_outside() {
        let catalog = parse_catalog(FIXTURE).unwrap();
        assert!(catalog.region_at(1.0, 1.0).is_some());
        assert!(catalog.region_at(-5.0, -5.0).is_none());
    }

    #[test]
    fn test_degenerate_geometry_rejected() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "nom": "Line" },
                "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]] }
            }]
        }"#;
        assert!(parse_catalog(body).is_err());
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(parse_catalog("not json").is_err());
    }

    #[test]
    fn test_by_name() {
        let catalog = parse_catalog(FIXTURE).unwrap();
        assert!(catalog.by_name("Square").is_some());
        assert!(catalog.by_name("Triangle").is_none());
    }
}

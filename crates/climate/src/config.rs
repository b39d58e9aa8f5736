/// Longitude of the initial map overview (metropolitan France).
pub const OVERVIEW_LON: f64 = 1.888334;
/// Latitude of the initial map overview.
pub const OVERVIEW_LAT: f64 = 46.603354;

/// World-space height of the initial overview viewport, in world units.
/// Wide enough to frame the whole region catalog with a margin.
pub const OVERVIEW_HEIGHT: f32 = 1050.0;

/// Per-request timeout for the live data APIs. The upstream dashboard had no
/// timeout at all, which left the panel silently pending on a dead network.
pub const FETCH_TIMEOUT_SECS: u64 = 10;

/// Open-Meteo current weather endpoint.
pub const WEATHER_API: &str = "https://api.open-meteo.com/v1/forecast";
/// Open-Meteo current air quality endpoint.
pub const AIR_QUALITY_API: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";

/// Path of the region geometry asset, relative to the working directory.
pub const REGIONS_ASSET_PATH: &str = "assets/regions.json";

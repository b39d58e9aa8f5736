//! Live readings fetched from the Open-Meteo APIs.
//!
//! Both payloads are untrusted JSON. Parsing goes through typed serde
//! structs so a missing or non-numeric field fails the whole fetch instead
//! of leaking `NaN` into the score arithmetic.

use serde::Deserialize;

/// Current weather at the queried coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherReading {
    pub temperature_c: f64,
    pub precipitation_mm: f64,
}

/// Current air quality at the queried coordinate, all in µg/m³.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirReading {
    pub pm10: f64,
    pub pm2_5: f64,
    pub nitrogen_dioxide: f64,
    pub ozone: f64,
}

/// The joined result of one weather fetch and one air-quality fetch.
/// Discarded once the report is built; never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateSnapshot {
    pub weather: WeatherReading,
    pub air: AirReading,
}

#[derive(Deserialize)]
struct WeatherPayload {
    current: WeatherCurrent,
}

#[derive(Deserialize)]
struct WeatherCurrent {
    temperature_2m: f64,
    precipitation: f64,
}

#[derive(Deserialize)]
struct AirPayload {
    current: AirCurrent,
}

#[derive(Deserialize)]
struct AirCurrent {
    pm10: f64,
    pm2_5: f64,
    nitrogen_dioxide: f64,
    ozone: f64,
}

fn require_finite(values: &[f64]) -> Result<(), String> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err("non-finite value in payload".to_string())
    }
}

/// Parse the weather API body. Any shape mismatch is an error.
pub fn parse_weather(body: &str) -> Result<WeatherReading, String> {
    let payload: WeatherPayload =
        serde_json::from_str(body).map_err(|e| format!("weather payload: {e}"))?;
    let current = payload.current;
    require_finite(&[current.temperature_2m, current.precipitation])?;
    Ok(WeatherReading {
        temperature_c: current.temperature_2m,
        precipitation_mm: current.precipitation,
    })
}

/// Parse the air quality API body. Any shape mismatch is an error.
pub fn parse_air(body: &str) -> Result<AirReading, String> {
    let payload: AirPayload =
        serde_json::from_str(body).map_err(|e| format!("air quality payload: {e}"))?;
    let current = payload.current;
    require_finite(&[
        current.pm10,
        current.pm2_5,
        current.nitrogen_dioxide,
        current.ozone,
    ])?;
    Ok(AirReading {
        pm10: current.pm10,
        pm2_5: current.pm2_5,
        nitrogen_dioxide: current.nitrogen_dioxide,
        ozone: current.ozone,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEATHER_OK: &str = r#"{
        "latitude": 48.85, "longitude": 2.35,
        "current": { "time": "2026-08-25T10:00", "temperature_2m": 21.4, "precipitation": 0.3 }
    }"#;

    const AIR_OK: &str = r#"{
        "latitude": 48.85, "longitude": 2.35,
        "current": { "pm10": 14.0, "pm2_5": 8.2, "nitrogen_dioxide": 12.7, "ozone": 61.0 }
    }"#;

    #[test]
    fn test_parse_weather_ok() {
        let w = parse_weather(WEATHER_OK).unwrap();
        assert_eq!(w.temperature_c, 21.4);
        assert_eq!(w.precipitation_mm, 0.3);
    }

    #[test]
    fn test_parse_air_ok() {
        let a = parse_air(AIR_OK).unwrap();
        assert_eq!(a.pm10, 14.0);
        assert_eq!(a.pm2_5, 8.2);
        assert_eq!(a.nitrogen_dioxide, 12.7);
        assert_eq!(a.ozone, 61.0);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        // temperature_2m absent: must fail, not default to 0 or NaN.
        let body = r#"{ "current": { "precipitation": 0.0 } }"#;
        assert!(parse_weather(body).is_err());
    }

    #[test]
    fn test_non_json_body_is_an_error() {
        assert!(parse_weather("<html>502 Bad Gateway</html>").is_err());
        assert!(parse_air("").is_err());
    }

    #[test]
    fn test_non_numeric_field_is_an_error() {
        let body = r#"{ "current": { "temperature_2m": "21.4", "precipitation": 0.0 } }"#;
        assert!(parse_weather(body).is_err());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let body = r#"{
            "elevation": 42.0,
            "current": {
                "time": "2026-08-25T10:00",
                "interval": 900,
                "pm10": 1.0, "pm2_5": 2.0, "nitrogen_dioxide": 3.0, "ozone": 4.0
            }
        }"#;
        assert!(parse_air(body).is_ok());
    }
}

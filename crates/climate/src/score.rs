//! Climate health score and its derived presentation values.
//!
//! The score starts at 100 and subtracts independent penalties:
//!
//! | Input                | Threshold | Penalty per unit over |
//! |----------------------|-----------|-----------------------|
//! | PM2.5                |  5 µg/m³  | 1.5                   |
//! | Nitrogen dioxide     | 10 µg/m³  | 0.5                   |
//! | Baseline carbon      | 50 g/kWh  | 0.5                   |
//! | Temperature stress   | 10 °C     | 2.0                   |
//!
//! Temperature stress is the absolute deviation from 20 °C. The result is
//! clamped to [0, 100] and rounded half-up. All comparisons are strict, so
//! sitting exactly on a threshold contributes nothing.

use crate::readings::{AirReading, WeatherReading};

// ---------------------------------------------------------------------------
// Thresholds and weights
// ---------------------------------------------------------------------------

const PM2_5_THRESHOLD: f64 = 5.0;
const PM2_5_WEIGHT: f64 = 1.5;

const NO2_THRESHOLD: f64 = 10.0;
const NO2_WEIGHT: f64 = 0.5;

const CARBON_THRESHOLD: f64 = 50.0;
const CARBON_WEIGHT: f64 = 0.5;

/// Comfort temperature in °C; stress is distance from this point.
const COMFORT_TEMPERATURE_C: f64 = 20.0;
const TEMP_STRESS_THRESHOLD: f64 = 10.0;
const TEMP_STRESS_WEIGHT: f64 = 2.0;

/// Reference temperature for the anomaly readout (long-term mean estimate).
const ANOMALY_REFERENCE_C: f64 = 15.0;

/// Scores below this show the projected critical year warning.
const CRITICAL_SCORE: u8 = 55;

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// Compute the 0–100 climate health score.
///
/// Total over all well-formed inputs; payload validation happens at the
/// fetch boundary, so this function never fails.
pub fn compute_health_score(
    weather: &WeatherReading,
    air: &AirReading,
    baseline_carbon: f32,
) -> u8 {
    let mut score = 100.0_f64;

    if air.pm2_5 > PM2_5_THRESHOLD {
        score -= (air.pm2_5 - PM2_5_THRESHOLD) * PM2_5_WEIGHT;
    }
    if air.nitrogen_dioxide > NO2_THRESHOLD {
        score -= (air.nitrogen_dioxide - NO2_THRESHOLD) * NO2_WEIGHT;
    }
    let carbon = f64::from(baseline_carbon);
    if carbon > CARBON_THRESHOLD {
        score -= (carbon - CARBON_THRESHOLD) * CARBON_WEIGHT;
    }
    let temp_stress = (weather.temperature_c - COMFORT_TEMPERATURE_C).abs();
    if temp_stress > TEMP_STRESS_THRESHOLD {
        score -= (temp_stress - TEMP_STRESS_THRESHOLD) * TEMP_STRESS_WEIGHT;
    }

    // After the clamp the value is non-negative, so `round` (half away from
    // zero) is exactly round-half-up here.
    score.clamp(0.0, 100.0).round() as u8
}

// ---------------------------------------------------------------------------
// Derived presentation values
// ---------------------------------------------------------------------------

/// RGB color for a score band. `None` means "no score available".
///
/// Bands: >=80 green, >=60 amber, >=40 orange, below red; each boundary is
/// inclusive on the lower side of the higher band.
pub fn color_for_score(score: Option<u8>) -> (u8, u8, u8) {
    match score {
        None => (0x37, 0x41, 0x51),          // gray
        Some(s) if s >= 80 => (0x22, 0xc5, 0x5e), // green
        Some(s) if s >= 60 => (0xfb, 0xbf, 0x24), // amber
        Some(s) if s >= 40 => (0xf9, 0x73, 0x16), // orange
        Some(_) => (0xef, 0x44, 0x44),       // red
    }
}

/// Qualitative air quality label from the PM2.5 concentration.
pub fn air_quality_label(pm2_5: f64) -> &'static str {
    if pm2_5 < 10.0 {
        "Good"
    } else if pm2_5 < 25.0 {
        "Moderate"
    } else if pm2_5 < 50.0 {
        "Degraded"
    } else {
        "Poor"
    }
}

/// Direction badge shown next to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTrend {
    Worsening,
    Stable,
    Improving,
}

impl ScoreTrend {
    pub fn label(self) -> &'static str {
        match self {
            ScoreTrend::Worsening => "↘ Worsening",
            ScoreTrend::Stable => "→ Stable",
            ScoreTrend::Improving => "↗ Improving",
        }
    }
}

/// Trend heuristic: below 50 worsening, above 80 improving, else stable.
pub fn trend_from_score(score: u8) -> ScoreTrend {
    if score < 50 {
        ScoreTrend::Worsening
    } else if score > 80 {
        ScoreTrend::Improving
    } else {
        ScoreTrend::Stable
    }
}

/// Estimated deviation from the long-term mean, rounded to one decimal.
/// Positive values get the warm (red) tag, the rest the cool (blue) tag.
pub fn temperature_anomaly(temperature_c: f64) -> f64 {
    ((temperature_c - ANOMALY_REFERENCE_C) * 10.0).round() / 10.0
}

/// Projected year at which indicators turn critical, shown only for scores
/// below 55. A presentational heuristic, not a scientific projection.
pub fn projected_critical_year(score: u8) -> Option<i32> {
    if score < CRITICAL_SCORE {
        Some(2030 + i32::from(score) / 5)
    } else {
        None
    }
}

/// One-line explanation tier for the panel.
pub fn explanation_for_score(score: u8) -> &'static str {
    if score >= 75 {
        "This region currently shows good climate resilience."
    } else if score >= 50 {
        "Under watch: moderate environmental stress."
    } else {
        "Warning: critical climate indicators (pollution/weather)."
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

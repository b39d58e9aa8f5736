//! The panel view model.
//!
//! All display values are derived here, once, when a fetch completes. The
//! panel renders this struct verbatim and carries no scoring logic of its
//! own, so the whole presentation is testable without a window.

use bevy::prelude::*;

use crate::baseline::Baseline;
use crate::readings::ClimateSnapshot;
use crate::score::{
    air_quality_label, color_for_score, compute_health_score, explanation_for_score,
    projected_critical_year, temperature_anomaly, trend_from_score, ScoreTrend,
};

/// Everything the side panel displays for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportData {
    pub region: String,
    pub score: u8,
    /// Score band color, also used for the progress bar fill.
    pub score_color: (u8, u8, u8),
    pub explanation: &'static str,
    pub temperature_c: f64,
    /// Deviation from the long-term mean, one decimal.
    pub anomaly_c: f64,
    pub precipitation_mm: f64,
    pub air_label: &'static str,
    pub pm2_5: f64,
    pub energy_gwh: f32,
    pub carbon_g_per_kwh: f32,
    pub trend: ScoreTrend,
    /// Present only when the score is in the critical range.
    pub critical_year: Option<i32>,
}

impl ReportData {
    /// Anomaly readout with an explicit sign for warm deviations.
    pub fn anomaly_text(&self) -> String {
        if self.anomaly_c > 0.0 {
            format!("+{:.1}°C deviation (est.)", self.anomaly_c)
        } else {
            format!("{:.1}°C deviation (est.)", self.anomaly_c)
        }
    }

    /// Warm deviations are tagged red, the rest blue.
    pub fn anomaly_is_warm(&self) -> bool {
        self.anomaly_c > 0.0
    }
}

/// The report currently on display, if any. `None` keeps the panel hidden.
#[derive(Resource, Default)]
pub struct RegionReport(pub Option<ReportData>);

/// User-visible fetch failure notice. `None` when there is nothing to show.
#[derive(Resource, Default)]
pub struct FetchNotice(pub Option<String>);

/// Derive the full view model from one snapshot and the region's baseline.
pub fn build_report(region: &str, snapshot: &ClimateSnapshot, baseline: &Baseline) -> ReportData {
    let score = compute_health_score(&snapshot.weather, &snapshot.air, baseline.carbon_g_per_kwh);
    ReportData {
        region: region.to_string(),
        score,
        score_color: color_for_score(Some(score)),
        explanation: explanation_for_score(score),
        temperature_c: snapshot.weather.temperature_c,
        anomaly_c: temperature_anomaly(snapshot.weather.temperature_c),
        precipitation_mm: snapshot.weather.precipitation_mm,
        air_label: air_quality_label(snapshot.air.pm2_5),
        pm2_5: snapshot.air.pm2_5,
        energy_gwh: baseline.energy_gwh,
        carbon_g_per_kwh: baseline.carbon_g_per_kwh,
        trend: trend_from_score(score),
        critical_year: projected_critical_year(score),
    }
}

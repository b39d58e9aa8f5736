//! The region detail side panel.
//!
//! Renders the [`RegionReport`] view model verbatim: score and band color,
//! explanation tier, live readings, baseline statistics, trend badge,
//! progress bar, and the critical-year warning. All derivation happens in
//! the climate crate; this module only lays values out.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use climate::report::{RegionReport, ReportData};
use climate::score::ScoreTrend;
use climate::selection::PanelClosed;

/// Warm anomaly readout color.
const WARM_COLOR: egui::Color32 = egui::Color32::from_rgb(0xf8, 0x71, 0x71);
/// Cool anomaly readout color.
const COOL_COLOR: egui::Color32 = egui::Color32::from_rgb(0x60, 0xa5, 0xfa);

fn rgb(color: (u8, u8, u8)) -> egui::Color32 {
    egui::Color32::from_rgb(color.0, color.1, color.2)
}

fn trend_color(trend: ScoreTrend) -> egui::Color32 {
    match trend {
        ScoreTrend::Improving => egui::Color32::from_rgb(34, 197, 94),
        ScoreTrend::Stable => egui::Color32::from_rgb(148, 163, 184),
        ScoreTrend::Worsening => egui::Color32::from_rgb(239, 68, 68),
    }
}

fn report_body(ui: &mut egui::Ui, data: &ReportData) {
    let score_color = rgb(data.score_color);

    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(format!("{}", data.score))
                .size(40.0)
                .strong()
                .color(score_color),
        );
        ui.vertical(|ui| {
            ui.label(egui::RichText::new("Climate health score").small());
            ui.colored_label(trend_color(data.trend), data.trend.label());
        });
    });

    ui.add(
        egui::ProgressBar::new(f32::from(data.score) / 100.0)
            .fill(score_color)
            .desired_height(6.0),
    );
    ui.add_space(4.0);
    ui.label(data.explanation);
    ui.separator();

    egui::Grid::new("region_report_grid")
        .num_columns(2)
        .spacing([16.0, 6.0])
        .show(ui, |ui| {
            ui.label("Temperature:");
            ui.vertical(|ui| {
                ui.label(format!("{:.1}°C", data.temperature_c));
                let anomaly_color = if data.anomaly_is_warm() {
                    WARM_COLOR
                } else {
                    COOL_COLOR
                };
                ui.colored_label(anomaly_color, data.anomaly_text());
            });
            ui.end_row();

            ui.label("Precipitation:");
            ui.label(format!("{} mm", data.precipitation_mm));
            ui.end_row();

            ui.label("Air quality:");
            ui.vertical(|ui| {
                ui.label(data.air_label);
                ui.label(
                    egui::RichText::new(format!("PM2.5: {} µg/m³", data.pm2_5)).small(),
                );
            });
            ui.end_row();

            ui.label("Energy baseline:");
            ui.label(format!("{} GWh", data.energy_gwh));
            ui.end_row();

            ui.label("Carbon intensity:");
            ui.label(format!("{} gCO2/kWh", data.carbon_g_per_kwh));
            ui.end_row();
        });

    if let Some(year) = data.critical_year {
        ui.add_space(6.0);
        egui::Frame::new()
            .fill(egui::Color32::from_rgba_premultiplied(80, 20, 20, 220))
            .inner_margin(egui::Margin::same(8))
            .corner_radius(egui::CornerRadius::same(6))
            .show(ui, |ui| {
                ui.colored_label(
                    egui::Color32::from_rgb(252, 165, 165),
                    format!("Projected critical threshold: {year}"),
                );
            });
    }
}

/// Render the side panel while a report is on display.
pub fn side_panel_ui(
    mut contexts: EguiContexts,
    report: Res<RegionReport>,
    mut closes: EventWriter<PanelClosed>,
) {
    let Some(data) = report.0.as_ref() else {
        return;
    };

    egui::SidePanel::right("region_panel")
        .resizable(false)
        .exact_width(320.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading(&data.region);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("✕").clicked() {
                        closes.send(PanelClosed);
                    }
                });
            });
            ui.separator();
            report_body(ui, data);
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_colors_are_distinct() {
        let improving = trend_color(ScoreTrend::Improving);
        let stable = trend_color(ScoreTrend::Stable);
        let worsening = trend_color(ScoreTrend::Worsening);
        assert_ne!(improving, stable);
        assert_ne!(stable, worsening);
        assert_ne!(improving, worsening);
    }

    #[test]
    fn test_rgb_conversion_matches_band_hex() {
        assert_eq!(rgb((0x22, 0xc5, 0x5e)), egui::Color32::from_rgb(34, 197, 94));
    }
}

//! Fetch failure notification.
//!
//! A single blocking notice in the center of the map. There is no retry
//! button: the user can simply click the region again.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use climate::report::FetchNotice;

pub fn notification_ui(mut contexts: EguiContexts, mut notice: ResMut<FetchNotice>) {
    let Some(message) = notice.0.clone() else {
        return;
    };

    let mut dismissed = false;
    egui::Window::new("Live data unavailable")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(contexts.ctx_mut(), |ui| {
            ui.colored_label(egui::Color32::from_rgb(252, 165, 165), &message);
            ui.add_space(6.0);
            if ui.button("Dismiss").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        notice.0 = None;
    }
}

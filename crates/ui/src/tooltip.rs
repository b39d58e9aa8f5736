//! Cursor-anchored region name tooltip while hovering.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use climate::selection::HoveredRegion;

pub fn hover_tooltip_ui(mut contexts: EguiContexts, hovered: Res<HoveredRegion>) {
    let Some(name) = hovered.0.as_deref() else {
        return;
    };
    let ctx = contexts.ctx_mut();
    let Some(pointer) = ctx.pointer_hover_pos() else {
        return;
    };

    egui::Area::new(egui::Id::new("region_hover_tooltip"))
        .fixed_pos(pointer + egui::vec2(14.0, 14.0))
        .order(egui::Order::Tooltip)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(name);
            });
        });
}

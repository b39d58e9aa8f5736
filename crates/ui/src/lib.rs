//! UI layer: egui side panel, hover tooltip, failure notification, theme.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub mod notification;
pub mod side_panel;
pub mod theme;
pub mod tooltip;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_systems(Startup, theme::apply_dark_theme)
            .add_systems(
                Update,
                (
                    side_panel::side_panel_ui,
                    tooltip::hover_tooltip_ui,
                    notification::notification_ui,
                ),
            );
    }
}

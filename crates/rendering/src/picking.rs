//! Cursor picking: window position to lon/lat, hover tracking, click events.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use climate::regions::RegionCatalog;
use climate::selection::{HoveredRegion, RegionClicked};

use crate::projection::world_to_geo;

/// The cursor's current geographic position, when it is over the map and
/// not captured by the UI.
#[derive(Resource, Default)]
pub struct CursorGeo {
    pub valid: bool,
    pub lon: f64,
    pub lat: f64,
}

/// Returns `true` when egui wants the pointer, i.e. the cursor is over the
/// side panel or a notification. Map input must skip those frames to avoid
/// click-through.
fn egui_wants_pointer(contexts: &mut EguiContexts) -> bool {
    let ctx = contexts.ctx_mut();
    ctx.wants_pointer_input() || ctx.is_pointer_over_area()
}

/// Unproject the window cursor into lon/lat each frame.
pub fn update_cursor_geo(
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut contexts: EguiContexts,
    mut cursor: ResMut<CursorGeo>,
) {
    cursor.valid = false;

    if egui_wants_pointer(&mut contexts) {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };
    let Some(screen_pos) = window.cursor_position() else {
        return;
    };
    let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, screen_pos) else {
        return;
    };
    let (lon, lat) = world_to_geo(world_pos);
    cursor.lon = lon;
    cursor.lat = lat;
    cursor.valid = true;
}

/// Track which region is under the cursor. Writes only on change so style
/// systems can rely on change detection.
pub fn update_hovered_region(
    cursor: Res<CursorGeo>,
    catalog: Res<RegionCatalog>,
    mut hovered: ResMut<HoveredRegion>,
) {
    let under_cursor = if cursor.valid {
        catalog.region_at(cursor.lon, cursor.lat).map(|r| r.name.clone())
    } else {
        None
    };
    if hovered.0 != under_cursor {
        hovered.0 = under_cursor;
    }
}

/// Emit a [`RegionClicked`] event when the left button goes down over a
/// region. The event carries the click point's coordinate, not the region
/// centroid.
pub fn emit_region_clicks(
    buttons: Res<ButtonInput<MouseButton>>,
    cursor: Res<CursorGeo>,
    catalog: Res<RegionCatalog>,
    mut clicks: EventWriter<RegionClicked>,
) {
    if !buttons.just_pressed(MouseButton::Left) || !cursor.valid {
        return;
    }
    if let Some(region) = catalog.region_at(cursor.lon, cursor.lat) {
        clicks.send(RegionClicked {
            name: region.name.clone(),
            lon: cursor.lon,
            lat: cursor.lat,
        });
    }
}

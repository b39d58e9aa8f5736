//! Map presentation: projection, region meshes and styles, viewport, picking.

use bevy::prelude::*;

pub mod camera;
pub mod map_mesh;
pub mod map_render;
pub mod picking;
pub mod projection;

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<camera::MapViewport>()
            .init_resource::<picking::CursorGeo>()
            .init_resource::<map_render::RegionMeshesSpawned>()
            .add_systems(Startup, camera::setup_camera)
            .add_systems(
                Update,
                (
                    map_render::spawn_region_meshes,
                    picking::update_cursor_geo,
                    picking::update_hovered_region,
                    picking::emit_region_clicks,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    camera::retarget_on_selection,
                    camera::apply_viewport,
                    map_render::apply_region_styles,
                    map_render::draw_region_outlines,
                )
                    .chain()
                    .after(picking::emit_region_clicks),
            );
    }
}

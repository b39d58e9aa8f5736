//! Map viewport: overview framing, fit-to-bounds on selection, smooth glide.

use bevy::prelude::*;

use climate::config::OVERVIEW_HEIGHT;
use climate::regions::RegionCatalog;
use climate::selection::SelectedRegion;

use crate::projection::geo_to_world;

/// Margin applied around a region's bounds when fitting the viewport.
const FIT_PADDING: f32 = 1.3;

/// Lower bound for the fitted viewport height, so tiny regions don't zoom
/// in past the point of context.
const MIN_VIEW_HEIGHT: f32 = 120.0;

/// Reference window height the orthographic scale is computed against.
const REFERENCE_WINDOW_HEIGHT: f32 = 720.0;

/// Smoothing rate for the viewport glide (per second).
const GLIDE_RATE: f32 = 6.0;

/// Where the camera wants to be. Systems mutate the target; the apply
/// system glides the real camera toward it.
#[derive(Resource)]
pub struct MapViewport {
    pub center: Vec2,
    /// World-space height of the visible area.
    pub height: f32,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            height: OVERVIEW_HEIGHT,
        }
    }
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Compute the viewport that frames `min..max` (world space) in a window
/// with the given aspect ratio.
pub fn fit_bounds(min: Vec2, max: Vec2, aspect: f32) -> MapViewport {
    let center = (min + max) * 0.5;
    let size = max - min;
    let height_for_width = if aspect > 0.0 { size.x / aspect } else { size.y };
    let height = (size.y.max(height_for_width) * FIT_PADDING).max(MIN_VIEW_HEIGHT);
    MapViewport { center, height }
}

/// Retarget the viewport when the selection changes: fit the selected
/// region's bounds, or return to the fixed overview on close.
pub fn retarget_on_selection(
    selected: Res<SelectedRegion>,
    catalog: Res<RegionCatalog>,
    windows: Query<&Window>,
    mut viewport: ResMut<MapViewport>,
) {
    if !selected.is_changed() {
        return;
    }
    match &selected.0 {
        Some(name) => {
            let Some(region) = catalog.by_name(name) else {
                return;
            };
            let min = geo_to_world(region.bounds.min.x, region.bounds.min.y);
            let max = geo_to_world(region.bounds.max.x, region.bounds.max.y);
            let aspect = windows
                .get_single()
                .map(|w| w.width() / w.height())
                .unwrap_or(16.0 / 9.0);
            *viewport = fit_bounds(min, max, aspect);
        }
        None => {
            *viewport = MapViewport::default();
        }
    }
}

/// Glide the camera toward the viewport target each frame.
pub fn apply_viewport(
    viewport: Res<MapViewport>,
    time: Res<Time>,
    mut cameras: Query<(&mut Transform, &mut OrthographicProjection), With<Camera2d>>,
) {
    let Ok((mut transform, mut projection)) = cameras.get_single_mut() else {
        return;
    };
    let target_scale = viewport.height / REFERENCE_WINDOW_HEIGHT;
    let t = 1.0 - (-GLIDE_RATE * time.delta_secs()).exp();

    let current = transform.translation.truncate();
    let next = current.lerp(viewport.center, t);
    transform.translation = next.extend(transform.translation.z);
    projection.scale += (target_scale - projection.scale) * t;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_overview() {
        let viewport = MapViewport::default();
        assert_eq!(viewport.center, Vec2::ZERO);
        assert_eq!(viewport.height, OVERVIEW_HEIGHT);
    }

    #[test]
    fn test_fit_centers_bounds() {
        let viewport = fit_bounds(Vec2::new(-10.0, -20.0), Vec2::new(30.0, 60.0), 16.0 / 9.0);
        assert_eq!(viewport.center, Vec2::new(10.0, 20.0));
        // 80 world units tall, padded.
        assert!((viewport.height - 80.0 * FIT_PADDING).abs() < 1e-4);
    }

    #[test]
    fn test_fit_respects_wide_bounds() {
        // Wider than the window aspect: height must grow to fit the width.
        let viewport = fit_bounds(Vec2::ZERO, Vec2::new(400.0, 100.0), 2.0);
        assert!((viewport.height - 200.0 * FIT_PADDING).abs() < 1e-4);
    }

    #[test]
    fn test_fit_clamps_tiny_regions() {
        let viewport = fit_bounds(Vec2::ZERO, Vec2::splat(5.0), 1.0);
        assert_eq!(viewport.height, MIN_VIEW_HEIGHT);
    }
}

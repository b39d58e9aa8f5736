//! Region fills, outlines, and the default/hover/active style set.
//!
//! Each region gets one fill mesh with its own `ColorMaterial` so styles can
//! change without rebuilding geometry. Outlines are drawn with gizmos every
//! frame, which keeps stroke weight and color trivially restylable.

use bevy::prelude::*;
use bevy::sprite::MeshMaterial2d;

use climate::regions::RegionCatalog;
use climate::selection::{HoveredRegion, SelectedRegion};

use crate::map_mesh::build_fill_mesh;
use crate::projection::geo_to_world;

/// Visual state of a region on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionVisual {
    Default,
    Hovered,
    Active,
}

/// Fill and stroke for one visual state.
#[derive(Debug, Clone, Copy)]
pub struct RegionStyle {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_weight: f32,
}

/// Idle slate fill with a faint white border.
pub const DEFAULT_STYLE: RegionStyle = RegionStyle {
    fill: Color::srgba(0.200, 0.255, 0.333, 0.4),
    stroke: Color::srgba(1.0, 1.0, 1.0, 0.3),
    stroke_weight: 1.0,
};

/// Brighter border and denser fill under the cursor.
pub const HOVER_STYLE: RegionStyle = RegionStyle {
    fill: Color::srgba(0.200, 0.255, 0.333, 0.6),
    stroke: Color::srgba(0.886, 0.910, 0.941, 1.0),
    stroke_weight: 2.0,
};

/// Selected region: green border, washed-out fill so the basemap shows.
pub const ACTIVE_STYLE: RegionStyle = RegionStyle {
    fill: Color::srgba(1.0, 1.0, 1.0, 0.1),
    stroke: Color::srgba(0.133, 0.773, 0.369, 1.0),
    stroke_weight: 3.0,
};

/// Resolve a region's visual state. Selection wins over hover; hover only
/// applies to regions that are not the current selection.
pub fn visual_for(name: &str, selected: &SelectedRegion, hovered: &HoveredRegion) -> RegionVisual {
    if selected.0.as_deref() == Some(name) {
        RegionVisual::Active
    } else if hovered.0.as_deref() == Some(name) {
        RegionVisual::Hovered
    } else {
        RegionVisual::Default
    }
}

pub fn style_for(visual: RegionVisual) -> &'static RegionStyle {
    match visual {
        RegionVisual::Default => &DEFAULT_STYLE,
        RegionVisual::Hovered => &HOVER_STYLE,
        RegionVisual::Active => &ACTIVE_STYLE,
    }
}

/// Marker component linking a fill mesh entity to its region.
#[derive(Component)]
pub struct RegionPolygon {
    pub name: String,
}

/// Tracks whether fill meshes have been spawned for the current catalog.
#[derive(Resource, Default)]
pub struct RegionMeshesSpawned(pub bool);

/// Spawn one fill mesh per region once the catalog is available. The
/// catalog arrives asynchronously on wasm, so this runs in `Update` and
/// waits for it.
pub fn spawn_region_meshes(
    mut commands: Commands,
    catalog: Res<RegionCatalog>,
    mut spawned: ResMut<RegionMeshesSpawned>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if spawned.0 || catalog.regions.is_empty() {
        return;
    }
    spawned.0 = true;

    for (idx, region) in catalog.regions.iter().enumerate() {
        let rings: Vec<Vec<Vec2>> = region
            .rings
            .iter()
            .map(|ring| ring.iter().map(|p| geo_to_world(p.x, p.y)).collect())
            .collect();
        let mesh = meshes.add(build_fill_mesh(&rings));
        let material = materials.add(ColorMaterial::from(DEFAULT_STYLE.fill));
        commands.spawn((
            RegionPolygon {
                name: region.name.clone(),
            },
            Mesh2d(mesh),
            MeshMaterial2d(material),
            // Tiny z offsets keep overlapping coastline fills deterministic.
            Transform::from_xyz(0.0, 0.0, idx as f32 * 0.01),
        ));
    }
    info!("spawned {} region fill meshes", catalog.regions.len());
}

/// Push fill colors into the per-region materials whenever selection or
/// hover changes.
pub fn apply_region_styles(
    selected: Res<SelectedRegion>,
    hovered: Res<HoveredRegion>,
    polygons: Query<(&RegionPolygon, &MeshMaterial2d<ColorMaterial>)>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if !selected.is_changed() && !hovered.is_changed() {
        return;
    }
    for (polygon, material_handle) in &polygons {
        let style = style_for(visual_for(&polygon.name, &selected, &hovered));
        if let Some(material) = materials.get_mut(material_handle.id()) {
            material.color = style.fill;
        }
    }
}

/// Draw region outlines every frame with the stroke of their visual state.
pub fn draw_region_outlines(
    catalog: Res<RegionCatalog>,
    selected: Res<SelectedRegion>,
    hovered: Res<HoveredRegion>,
    mut gizmos: Gizmos,
) {
    for region in &catalog.regions {
        let style = style_for(visual_for(&region.name, &selected, &hovered));
        for ring in &region.rings {
            let points: Vec<Vec2> = ring.iter().map(|p| geo_to_world(p.x, p.y)).collect();
            let centroid = points.iter().sum::<Vec2>() / points.len() as f32;
            // Gizmo lines have fixed pixel width; heavier strokes are faked
            // with extra passes nudged toward the ring centroid.
            for pass in 0..style.stroke_weight.round().max(1.0) as usize {
                let shrink = 1.0 - pass as f32 * 0.002;
                let mut loop_points: Vec<Vec2> = points
                    .iter()
                    .map(|&p| centroid + (p - centroid) * shrink)
                    .collect();
                if let Some(&first) = loop_points.first() {
                    loop_points.push(first);
                }
                gizmos.linestrip_2d(loop_points, style.stroke);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(name: &str) -> SelectedRegion {
        SelectedRegion(Some(name.to_string()))
    }

    fn hovered(name: &str) -> HoveredRegion {
        HoveredRegion(Some(name.to_string()))
    }

    #[test]
    fn test_default_when_unselected_and_unhovered() {
        let visual = visual_for("Bretagne", &SelectedRegion(None), &HoveredRegion(None));
        assert_eq!(visual, RegionVisual::Default);
    }

    #[test]
    fn test_hover_applies_to_non_selected() {
        let visual = visual_for("Bretagne", &selected("Corse"), &hovered("Bretagne"));
        assert_eq!(visual, RegionVisual::Hovered);
    }

    #[test]
    fn test_selection_wins_over_hover() {
        // Hovering the selected region must not downgrade it to hover style.
        let visual = visual_for("Bretagne", &selected("Bretagne"), &hovered("Bretagne"));
        assert_eq!(visual, RegionVisual::Active);
    }

    #[test]
    fn test_only_selected_region_is_active() {
        let sel = selected("Corse");
        let hov = HoveredRegion(None);
        assert_eq!(visual_for("Corse", &sel, &hov), RegionVisual::Active);
        assert_eq!(visual_for("Bretagne", &sel, &hov), RegionVisual::Default);
    }
}

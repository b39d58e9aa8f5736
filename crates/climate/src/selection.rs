//! Region selection state machine.
//!
//! Exactly one region can be selected at a time. Clicking a region selects
//! it (replacing any prior selection with no observable in-between state)
//! and starts the fetch pipeline from the click coordinate. Closing the
//! panel returns to no selection. Hover is transient visual state and never
//! changes the selection.

use bevy::prelude::*;

use crate::fetch::{begin_fetch, FetchGeneration, FetchTag, InFlightFetches};
use crate::report::{FetchNotice, RegionReport};

/// The selection state: `None` or exactly one region name.
#[derive(Resource, Default)]
pub struct SelectedRegion(pub Option<String>);

/// Region currently under the cursor, for hover styling and the tooltip.
/// Never affects [`SelectedRegion`].
#[derive(Resource, Default)]
pub struct HoveredRegion(pub Option<String>);

/// A click landed on a region. Carries the click point's coordinate, not
/// the region centroid: the data query reflects where the user clicked.
#[derive(Event)]
pub struct RegionClicked {
    pub name: String,
    pub lon: f64,
    pub lat: f64,
}

/// The panel's close control was activated.
#[derive(Event)]
pub struct PanelClosed;

/// Select `name`, invalidating every earlier fetch via the generation bump.
/// Returns the tag the new fetch must carry.
fn apply_click(
    selected: &mut SelectedRegion,
    generation: &mut FetchGeneration,
    name: &str,
) -> FetchTag {
    selected.0 = Some(name.to_string());
    generation.0 += 1;
    FetchTag {
        region: name.to_string(),
        generation: generation.0,
    }
}

/// Clear the selection. The generation bump makes any in-flight fetch stale.
fn apply_close(selected: &mut SelectedRegion, generation: &mut FetchGeneration) {
    selected.0 = None;
    generation.0 += 1;
}

/// Handle region clicks: update the selection and start the fetch.
pub fn handle_region_click(
    mut clicks: EventReader<RegionClicked>,
    mut selected: ResMut<SelectedRegion>,
    mut generation: ResMut<FetchGeneration>,
    mut fetches: ResMut<InFlightFetches>,
) {
    for click in clicks.read() {
        let tag = apply_click(&mut selected, &mut generation, &click.name);
        info!(
            "selected '{}' at ({:.4}, {:.4})",
            click.name, click.lat, click.lon
        );
        begin_fetch(&mut fetches, tag, click.lat, click.lon);
    }
}

/// Handle the close control: drop the selection, hide the panel content,
/// clear any error notice. In-flight fetches are left running; their
/// results are discarded on arrival.
pub fn handle_panel_close(
    mut closes: EventReader<PanelClosed>,
    mut selected: ResMut<SelectedRegion>,
    mut generation: ResMut<FetchGeneration>,
    mut report: ResMut<RegionReport>,
    mut notice: ResMut<FetchNotice>,
) {
    if closes.is_empty() {
        return;
    }
    closes.clear();
    apply_close(&mut selected, &mut generation);
    report.0 = None;
    notice.0 = None;
}

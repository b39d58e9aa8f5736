//! Domain core of the climate dashboard: baselines, live readings, the
//! health score, the selection state machine, and the panel view model.
//!
//! Everything here is presentation-free. The rendering crate consumes the
//! selection and catalog resources for map styling; the UI crate renders
//! [`report::RegionReport`] verbatim.

use bevy::prelude::*;

pub mod baseline;
pub mod config;
pub mod fetch;
pub mod readings;
pub mod regions;
pub mod report;
pub mod score;
pub mod selection;

pub struct ClimatePlugin;

impl Plugin for ClimatePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<baseline::RegionBaselines>()
            .init_resource::<regions::RegionCatalog>()
            .init_resource::<selection::SelectedRegion>()
            .init_resource::<selection::HoveredRegion>()
            .init_resource::<fetch::FetchGeneration>()
            .init_resource::<fetch::InFlightFetches>()
            .init_resource::<report::RegionReport>()
            .init_resource::<report::FetchNotice>()
            .add_event::<selection::RegionClicked>()
            .add_event::<selection::PanelClosed>()
            .add_systems(Startup, regions::load_region_catalog)
            .add_systems(
                Update,
                (
                    selection::handle_region_click,
                    selection::handle_panel_close,
                    fetch::poll_in_flight_fetches,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        {
            app.init_resource::<regions::RegionAssetBuffer>()
                .add_systems(Update, regions::poll_region_catalog);
        }
    }
}

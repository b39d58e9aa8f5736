//! Static per-region baseline statistics.
//!
//! Baselines are reference numbers (annual energy intensity and grid carbon
//! intensity) that do not change with live weather. They feed the carbon
//! penalty of the health score and the Energy/Carbon rows of the panel.

use bevy::prelude::*;
use std::collections::HashMap;

/// Key of the fallback entry used for any region name not in the table.
pub const DEFAULT_BASELINE_KEY: &str = "default";

/// Static reference statistics for one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    /// Annual energy intensity in GWh.
    pub energy_gwh: f32,
    /// Grid carbon intensity in gCO2/kWh.
    pub carbon_g_per_kwh: f32,
}

impl Baseline {
    const fn new(energy_gwh: f32, carbon_g_per_kwh: f32) -> Self {
        Self {
            energy_gwh,
            carbon_g_per_kwh,
        }
    }
}

/// Lookup table of region name to baseline, immutable after startup.
///
/// Contains exactly one entry per known region plus the required
/// [`DEFAULT_BASELINE_KEY`] fallback.
#[derive(Resource)]
pub struct RegionBaselines {
    entries: HashMap<String, Baseline>,
}

impl Default for RegionBaselines {
    fn default() -> Self {
        let table: &[(&str, Baseline)] = &[
            (DEFAULT_BASELINE_KEY, Baseline::new(300.0, 50.0)),
            ("Île-de-France", Baseline::new(550.0, 55.0)),
            ("Nouvelle-Aquitaine", Baseline::new(320.0, 40.0)),
            ("Auvergne-Rhône-Alpes", Baseline::new(480.0, 45.0)),
            ("Bourgogne-Franche-Comté", Baseline::new(250.0, 35.0)),
            ("Bretagne", Baseline::new(280.0, 38.0)),
            ("Centre-Val de Loire", Baseline::new(260.0, 60.0)),
            ("Corse", Baseline::new(90.0, 120.0)),
            ("Grand Est", Baseline::new(390.0, 50.0)),
            ("Hauts-de-France", Baseline::new(410.0, 58.0)),
            ("Normandie", Baseline::new(310.0, 42.0)),
            ("Occitanie", Baseline::new(360.0, 44.0)),
            ("Pays de la Loire", Baseline::new(290.0, 39.0)),
            ("Provence-Alpes-Côte d'Azur", Baseline::new(420.0, 55.0)),
        ];
        Self {
            entries: table
                .iter()
                .map(|(name, b)| (name.to_string(), *b))
                .collect(),
        }
    }
}

impl RegionBaselines {
    /// Baseline for `region`, falling back to the default entry for any
    /// unrecognized name.
    pub fn get(&self, region: &str) -> &Baseline {
        self.entries
            .get(region)
            .unwrap_or_else(|| &self.entries[DEFAULT_BASELINE_KEY])
    }

    /// Number of entries, fallback included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

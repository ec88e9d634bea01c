//! Overnight processing for every location, driven by DayEndEvent.
//!
//! Runs in `DayCycleSet::DayUpdate`, after the calendar has already moved to
//! the new day, so season checks use the morning's season.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;
use super::crops::CropDay;
use super::giant_crops::form_giant_crops;
use super::FarmRules;

/// Tallies of one location's night, for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NightReport {
    pub grew: usize,
    pub died: usize,
    pub cleared_plots: usize,
    pub giant_crops: usize,
}

pub fn on_day_end(
    mut day_end_events: EventReader<DayEndEvent>,
    calendar: Res<Calendar>,
    crop_registry: Res<CropRegistry>,
    rules: Res<FarmRules>,
    mut locations: ResMut<Locations>,
    mut rng: ResMut<SimRng>,
) {
    for _event in day_end_events.read() {
        for location in locations.iter_mut() {
            let report = advance_location_day(location, &calendar, &crop_registry, &rules, &mut rng.0);
            if report != NightReport::default() {
                info!("[Farming] {:?} overnight: {:?}", location.map, report);
            }
        }
    }
}

/// The host's daily advance for one location:
/// 1. Every plot recomputes its crop for the new day (out-of-season crops die).
/// 2. On the first day of a season, outdoor plots without a live crop are cleared.
/// 3. Soil dries out, or is watered by a wet morning outdoors.
/// 4. On the farm, fully grown 2×2 blocks may merge into giant crops.
pub fn advance_location_day(
    location: &mut Location,
    calendar: &Calendar,
    registry: &CropRegistry,
    rules: &FarmRules,
    rng: &mut impl Rng,
) -> NightReport {
    let mut report = NightReport::default();
    let conditions = location.growth_conditions(calendar.season);
    let wet_morning = location.outdoors && calendar.weather.waters_crops();

    for feature in location.terrain_features.values_mut() {
        let Some(dirt) = feature.as_hoe_dirt_mut() else {
            continue;
        };
        match dirt.day_update(&conditions, registry) {
            Some(CropDay::Grew) => report.grew += 1,
            Some(CropDay::Died) => report.died += 1,
            Some(CropDay::Waited) | None => {}
        }
    }

    if calendar.day == 1 && location.outdoors {
        report.cleared_plots = clear_abandoned_plots(location);
    }

    let mut tiles: Vec<TileCoord> = location.terrain_features.keys().copied().collect();
    tiles.sort();
    for tile in tiles {
        if let Some(dirt) = location.hoe_dirt_mut(tile) {
            dirt.settle_moisture(wet_morning, rng);
        }
    }

    if location.map == MapId::Farm {
        report.giant_crops = form_giant_crops(location, registry, rules.giant_crop_chance, rng).len();
    }

    report
}

/// A new season untills every plot that is not carrying a live crop.
fn clear_abandoned_plots(location: &mut Location) -> usize {
    let before = location.terrain_features.len();
    location.terrain_features.retain(|_, feature| match feature {
        TerrainFeature::HoeDirt(dirt) => dirt.has_live_crop(),
        _ => true,
    });
    before - location.terrain_features.len()
}

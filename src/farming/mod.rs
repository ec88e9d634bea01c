//! Farming domain — the host's overnight crop and soil update.
//!
//! Communicates with other domains exclusively through crate::shared events/resources.

use bevy::prelude::*;
use crate::shared::*;

pub mod crops;
pub mod events_handler;
pub mod giant_crops;

/// Tunables for the overnight update.
#[derive(Resource, Debug, Clone)]
pub struct FarmRules {
    /// Chance per eligible 2×2 block per night of merging into a giant crop.
    pub giant_crop_chance: f64,
}

impl Default for FarmRules {
    fn default() -> Self {
        Self { giant_crop_chance: 0.01 }
    }
}

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FarmRules>()
            .init_resource::<CropRegistry>()
            .init_resource::<Locations>()
            .init_resource::<SimRng>()
            .add_event::<DayEndEvent>()
            .add_systems(
                Update,
                events_handler::on_day_end
                    .in_set(DayCycleSet::DayUpdate)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

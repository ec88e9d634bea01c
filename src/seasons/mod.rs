//! All-seasons domain — every crop grows in every season, and the farm's
//! crops are carried through the season change.
//!
//! Two halves:
//! - `editor`: rewrites the seasons field of every crop record as the crop
//!   table loads, and optionally swaps the snowy soil texture for plain dirt.
//! - `stash`: whenever the player warps into the farmhouse, the farm's live
//!   crops are stashed; right before the nightly save, any of them the
//!   overnight update killed or removed are put back.

pub mod editor;
pub mod stash;

use bevy::prelude::*;
use std::path::PathBuf;

use crate::config::ModConfig;
use crate::content::ContentPipeline;
use crate::shared::*;

pub use editor::SeasonRuleEditor;
pub use stash::{CropStash, CropTileState};

/// Where the plugin takes its settings from.
#[derive(Debug, Clone)]
enum ConfigSource {
    File(PathBuf),
    Fixed(ModConfig),
}

pub struct AllSeasonsPlugin {
    source: ConfigSource,
}

impl AllSeasonsPlugin {
    /// Read settings from a RON file, creating it with defaults if missing.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self { source: ConfigSource::File(path.into()) }
    }

    pub fn with_config(config: ModConfig) -> Self {
        Self { source: ConfigSource::Fixed(config) }
    }

    fn resolve_config(&self) -> ModConfig {
        match &self.source {
            ConfigSource::Fixed(config) => *config,
            ConfigSource::File(path) => ModConfig::load_or_create(path).unwrap_or_else(|e| {
                error!("[AllSeasons] Could not read {}: {}. Using defaults.", path.display(), e);
                ModConfig::default()
            }),
        }
    }
}

impl Default for AllSeasonsPlugin {
    fn default() -> Self {
        Self::with_config(ModConfig::default())
    }
}

impl Plugin for AllSeasonsPlugin {
    fn build(&self, app: &mut App) {
        let config = self.resolve_config();
        info!(
            "[AllSeasons] Winter crops {}, snowy soil {}",
            if config.winter_alive_enabled { "enabled" } else { "disabled" },
            if config.winter_hoe_snow { "replaced" } else { "kept" },
        );

        app.init_resource::<ContentPipeline>();
        app.world_mut()
            .resource_mut::<ContentPipeline>()
            .register(SeasonRuleEditor::new(config));

        app.insert_resource(config)
            .init_resource::<CropStash>()
            .init_resource::<Calendar>()
            .init_resource::<CropRegistry>()
            .init_resource::<Locations>()
            .add_event::<MapTransitionEvent>()
            .add_event::<BeforeSaveEvent>()
            .add_systems(
                Update,
                (
                    restore_crops_before_save.in_set(DayCycleSet::BeforeSave),
                    stash_crops_on_warp.in_set(DayCycleSet::Warped),
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Stash the farm's crops whenever the player enters the farmhouse, which
/// includes waking up in bed each morning.
fn stash_crops_on_warp(
    mut transitions: EventReader<MapTransitionEvent>,
    locations: Res<Locations>,
    mut stash: ResMut<CropStash>,
) {
    let entered_house = transitions
        .read()
        .fold(false, |entered, ev| entered || ev.to_map == MapId::FarmHouse);
    if !entered_house {
        return;
    }

    let Some(farm) = locations.get(MapId::Farm) else {
        warn!("[AllSeasons] No farm loaded; nothing to stash");
        return;
    };
    stash.stash(farm);
    debug!("[AllSeasons] Stashed {} crops", stash.len());
}

/// Runs after the overnight update and before the save is written.
fn restore_crops_before_save(
    mut before_save: EventReader<BeforeSaveEvent>,
    config: Res<ModConfig>,
    stash: Res<CropStash>,
    crop_registry: Res<CropRegistry>,
    mut locations: ResMut<Locations>,
) {
    for ev in before_save.read() {
        if !stash::should_restore(&config, ev.season) {
            info!("[AllSeasons] Winter crops disabled; leaving the farm as it is");
            continue;
        }

        let conditions = match locations.require(MapId::Greenhouse) {
            Ok(greenhouse) => greenhouse.growth_conditions(ev.season),
            Err(e) => {
                error!("[AllSeasons] Cannot restore crops: {}", e);
                continue;
            }
        };
        let farm = match locations.require_mut(MapId::Farm) {
            Ok(farm) => farm,
            Err(e) => {
                error!("[AllSeasons] Cannot restore crops: {}", e);
                continue;
            }
        };

        let restored = stash.restore(farm, &conditions, &crop_registry);
        if restored > 0 {
            info!(
                "[AllSeasons] Restored {} of {} stashed crops before saving {:?} {}",
                restored,
                stash.len(),
                ev.season,
                ev.day
            );
        }
    }
}

//! Save domain — the nightly save commit.
//!
//! On every DayEndEvent the save is announced with a BeforeSaveEvent once the
//! overnight update has run; handlers in `DayCycleSet::BeforeSave` get the last
//! word on world state, then the file is written in `DayCycleSet::CommitSave`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::FarmResult;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// PUBLIC TYPES
// ═══════════════════════════════════════════════════════════════════════

pub const SAVE_VERSION: u32 = 1;

/// Where the nightly save goes.
#[derive(Resource, Debug, Clone)]
pub struct SaveSettings {
    pub directory: PathBuf,
    pub slot: u8,
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            directory: saves_directory(),
            slot: 0,
        }
    }
}

impl SaveSettings {
    pub fn slot_path(&self) -> PathBuf {
        self.directory.join(format!("slot_{}.json", self.slot))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFile {
    pub version: u32,
    pub save_timestamp: u64,
    pub calendar: Calendar,
    pub locations: Vec<SavedLocation>,
}

impl SaveFile {
    pub fn location(&self, map: MapId) -> Option<&SavedLocation> {
        self.locations.iter().find(|l| l.map == map)
    }
}

/// A location as written to disk. Features are stored as a sorted list since
/// JSON object keys must be strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedLocation {
    pub map: MapId,
    pub terrain_features: Vec<(TileCoord, TerrainFeature)>,
    pub resource_clumps: Vec<ResourceClump>,
}

impl SavedLocation {
    pub fn from_location(location: &Location) -> Self {
        let mut terrain_features: Vec<(TileCoord, TerrainFeature)> = location
            .terrain_features
            .iter()
            .map(|(tile, feature)| (*tile, feature.clone()))
            .collect();
        terrain_features.sort_by_key(|(tile, _)| *tile);
        Self {
            map: location.map,
            terrain_features,
            resource_clumps: location.resource_clumps.clone(),
        }
    }

    pub fn feature_at(&self, tile: TileCoord) -> Option<&TerrainFeature> {
        self.terrain_features
            .iter()
            .find(|(t, _)| *t == tile)
            .map(|(_, feature)| feature)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SaveSettings>()
            .add_event::<DayEndEvent>()
            .add_event::<BeforeSaveEvent>()
            .add_event::<SaveCompleteEvent>()
            .add_systems(
                Update,
                (
                    announce_save.in_set(DayCycleSet::AnnounceSave),
                    commit_save.in_set(DayCycleSet::CommitSave),
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FILESYSTEM HELPERS
// ═══════════════════════════════════════════════════════════════════════

fn saves_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("saves")
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ═══════════════════════════════════════════════════════════════════════
// SAVE / LOAD LOGIC
// ═══════════════════════════════════════════════════════════════════════

pub fn write_save(path: &Path, calendar: &Calendar, locations: &Locations) -> FarmResult<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let file = SaveFile {
        version: SAVE_VERSION,
        save_timestamp: current_timestamp(),
        calendar: calendar.clone(),
        locations: locations.maps.values().map(SavedLocation::from_location).collect(),
    };

    let json = serde_json::to_string_pretty(&file)?;

    // Write to a temp file first, then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json)?;
    fs::rename(&tmp_path, path)?;

    Ok(())
}

pub fn read_save(path: &Path) -> FarmResult<SaveFile> {
    let json = fs::read_to_string(path)?;
    let file: SaveFile = serde_json::from_str(&json)?;

    if file.version != SAVE_VERSION {
        warn!(
            "[Save] {} has version {} but current version is {}. Loading anyway.",
            path.display(),
            file.version,
            SAVE_VERSION
        );
    }

    Ok(file)
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Runs after the overnight update; the calendar already shows the morning.
fn announce_save(
    mut day_end_events: EventReader<DayEndEvent>,
    calendar: Res<Calendar>,
    mut before_save: EventWriter<BeforeSaveEvent>,
) {
    for _ in day_end_events.read() {
        info!(
            "[Save] Saving Day {} {:?} Year {}",
            calendar.day, calendar.season, calendar.year
        );
        before_save.send(BeforeSaveEvent {
            day: calendar.day,
            season: calendar.season,
            year: calendar.year,
        });
    }
}

fn commit_save(
    mut before_save: EventReader<BeforeSaveEvent>,
    settings: Res<SaveSettings>,
    calendar: Res<Calendar>,
    locations: Res<Locations>,
    mut complete: EventWriter<SaveCompleteEvent>,
) {
    for _ in before_save.read() {
        let path = settings.slot_path();
        let result = write_save(&path, &calendar, &locations);
        match &result {
            Ok(()) => info!("[Save] Wrote {}", path.display()),
            Err(e) => error!("[Save] Failed to write {}: {}", path.display(), e),
        }
        complete.send(SaveCompleteEvent {
            slot: settings.slot,
            success: result.is_ok(),
            error_message: result.err().map(|e| e.to_string()),
        });
    }
}

//! Shared components, resources, events, and states.
//!
//! This is the type contract between the host simulation model and the
//! seasonal add-on. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{FarmError, FarmResult};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
}

/// Frame order for the end-of-day cycle. Configured as a chain by
/// `CalendarPlugin`, so one `app.update()` after a `DayEndEvent` runs the
/// whole night in this order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayCycleSet {
    /// Calendar rollover to the new day.
    Calendar,
    /// Host daily advance over every location.
    DayUpdate,
    /// `BeforeSaveEvent` is sent.
    AnnounceSave,
    /// Handlers that must see the advanced day but run before the save commits.
    BeforeSave,
    /// The save file is written.
    CommitSave,
    /// The player wakes up in the farmhouse.
    Wake,
    /// Handlers reacting to a `MapTransitionEvent`.
    Warped,
}

// ═══════════════════════════════════════════════════════════════════════
// CALENDAR
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn next(self) -> Self {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Fall,
            Season::Fall => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    /// The lowercase name used by the crop data table.
    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }

    /// Parses a season name as written in the crop data table.
    pub fn parse(name: &str) -> Option<Self> {
        Season::ALL
            .into_iter()
            .find(|season| season.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    Sunny,
    Rainy,
    Stormy,
    Snowy, // Winter only
}

impl Weather {
    /// Rain and storms water every outdoor plot.
    pub fn waters_crops(self) -> bool {
        matches!(self, Weather::Rainy | Weather::Stormy)
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    pub year: u32,
    pub season: Season,
    pub day: u8, // 1-28
    pub weather: Weather,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            year: 1,
            season: Season::Spring,
            day: 1,
            weather: Weather::Sunny,
        }
    }
}

impl Calendar {
    /// The event announcing that today has ended.
    pub fn day_end_event(&self) -> DayEndEvent {
        DayEndEvent {
            day: self.day,
            season: self.season,
            year: self.year,
        }
    }
}

/// Seedable randomness for weather rolls and giant-crop growth.
#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub StdRng);

impl Default for SimRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub current_map: MapId,
    pub tile: TileCoord,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            current_map: MapId::FarmHouse,
            tile: TileCoord::new(9, 9),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FARMING
// ═══════════════════════════════════════════════════════════════════════

/// Numeric object id, as the host's data tables key them.
pub type ItemId = u32;

/// Fertilizer item ids understood by the host's overnight soil logic.
pub const BASIC_RETAINING_SOIL: ItemId = 370;
pub const QUALITY_RETAINING_SOIL: ItemId = 371;

/// Seeds whose fully grown crops can merge into a giant crop.
pub const GIANT_CROP_SEEDS: [ItemId; 3] = [474, 479, 490]; // cauliflower, melon, pumpkin

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Moisture {
    Dry,
    Watered,
}

/// A planted crop. The valid seasons are copied from the crop table when the
/// seed goes in the ground, so a later table edit does not reach crops that
/// are already growing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub seed_id: ItemId,
    pub seasons_to_grow_in: Vec<Season>,
    pub current_stage: u8,
    pub days_in_stage: u8,
    pub dead: bool,
}

/// A tilled plot: the only terrain feature that can hold a crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoeDirt {
    pub moisture: Moisture,
    pub fertilizer: Option<ItemId>,
    pub crop: Option<Crop>,
}

impl Default for HoeDirt {
    fn default() -> Self {
        Self {
            moisture: Moisture::Dry,
            fertilizer: None,
            crop: None,
        }
    }
}

impl HoeDirt {
    pub fn has_live_crop(&self) -> bool {
        self.crop.as_ref().is_some_and(|crop| !crop.dead)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TerrainFeature {
    HoeDirt(HoeDirt),
    Grass,
    Tree { growth_stage: u8 },
    Flooring,
}

impl TerrainFeature {
    pub fn as_hoe_dirt(&self) -> Option<&HoeDirt> {
        match self {
            TerrainFeature::HoeDirt(dirt) => Some(dirt),
            _ => None,
        }
    }

    pub fn as_hoe_dirt_mut(&mut self) -> Option<&mut HoeDirt> {
        match self {
            TerrainFeature::HoeDirt(dirt) => Some(dirt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClumpKind {
    GiantCrop { seed_id: ItemId },
    Boulder,
    Stump,
    Log,
}

/// A multi-tile obstruction anchored at its top-left tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceClump {
    pub kind: ClumpKind,
    pub tile: TileCoord,
}

impl ResourceClump {
    /// The 2×2 block of tiles the clump covers.
    pub fn footprint(&self) -> [TileCoord; 4] {
        [
            self.tile,
            self.tile.offset(1, 0),
            self.tile.offset(0, 1),
            self.tile.offset(1, 1),
        ]
    }

    pub fn is_giant_crop(&self) -> bool {
        matches!(self.kind, ClumpKind::GiantCrop { .. })
    }
}

/// Parsed entry of the `Data/Crops` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropData {
    pub seed_id: ItemId,
    pub phase_days: Vec<u8>, // days per stage (len = num stages)
    pub seasons: Vec<Season>,
    pub sprite_row: u32,
    pub harvest_item: ItemId,
    pub regrow_days: Option<u8>,
    pub raised: bool,
}

impl CropData {
    pub fn grows_in(&self, season: Season) -> bool {
        self.seasons.contains(&season)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct CropRegistry {
    pub crops: HashMap<ItemId, CropData>,
}

impl CropRegistry {
    pub fn get(&self, seed_id: ItemId) -> Option<&CropData> {
        self.crops.get(&seed_id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD & MAPS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MapId {
    Farm,
    FarmHouse,
    Greenhouse,
    Town,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Whether crops here obey the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthConditions {
    pub season: Season,
    pub ignores_seasons: bool,
}

#[derive(Debug, Clone)]
pub struct Location {
    pub map: MapId,
    pub outdoors: bool,
    pub terrain_features: HashMap<TileCoord, TerrainFeature>,
    pub resource_clumps: Vec<ResourceClump>,
}

impl Location {
    pub fn new(map: MapId) -> Self {
        Self {
            map,
            outdoors: matches!(map, MapId::Farm | MapId::Town),
            terrain_features: HashMap::new(),
            resource_clumps: Vec::new(),
        }
    }

    /// The greenhouse grows anything in any season.
    pub fn growth_conditions(&self, season: Season) -> GrowthConditions {
        GrowthConditions {
            season,
            ignores_seasons: self.map == MapId::Greenhouse,
        }
    }

    pub fn hoe_dirt(&self, tile: TileCoord) -> Option<&HoeDirt> {
        self.terrain_features.get(&tile).and_then(TerrainFeature::as_hoe_dirt)
    }

    pub fn hoe_dirt_mut(&mut self, tile: TileCoord) -> Option<&mut HoeDirt> {
        self.terrain_features
            .get_mut(&tile)
            .and_then(TerrainFeature::as_hoe_dirt_mut)
    }
}

/// Every loaded location, keyed by map. Ordered so overnight processing
/// consumes randomness in a stable order.
#[derive(Resource, Debug, Clone)]
pub struct Locations {
    pub maps: BTreeMap<MapId, Location>,
}

impl Default for Locations {
    fn default() -> Self {
        let maps = [MapId::Farm, MapId::FarmHouse, MapId::Greenhouse, MapId::Town]
            .into_iter()
            .map(|map| (map, Location::new(map)))
            .collect();
        Self { maps }
    }
}

impl Locations {
    pub fn get(&self, map: MapId) -> Option<&Location> {
        self.maps.get(&map)
    }

    pub fn get_mut(&mut self, map: MapId) -> Option<&mut Location> {
        self.maps.get_mut(&map)
    }

    pub fn require(&self, map: MapId) -> FarmResult<&Location> {
        self.get(map).ok_or(FarmError::UnknownLocation { map })
    }

    pub fn require_mut(&mut self, map: MapId) -> FarmResult<&mut Location> {
        self.get_mut(map).ok_or(FarmError::UnknownLocation { map })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Location> {
        self.maps.values_mut()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// The player went to bed; carries the date of the day that just ended.
#[derive(Event, Debug, Clone)]
pub struct DayEndEvent {
    pub day: u8,
    pub season: Season,
    pub year: u32,
}

#[derive(Event, Debug, Clone)]
pub struct SeasonChangeEvent {
    pub new_season: Season,
    pub year: u32,
}

#[derive(Event, Debug, Clone)]
pub struct MapTransitionEvent {
    pub to_map: MapId,
    pub to_x: i32,
    pub to_y: i32,
}

/// The overnight update has run and the save is about to be written.
/// Carries the date being saved.
#[derive(Event, Debug, Clone)]
pub struct BeforeSaveEvent {
    pub day: u8,
    pub season: Season,
    pub year: u32,
}

#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub slot: u8,
    pub success: bool,
    pub error_message: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const DAYS_PER_SEASON: u8 = 28;

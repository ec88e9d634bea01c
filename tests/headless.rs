//! Headless integration tests for the all-seasons add-on.
//!
//! These tests exercise the full night (calendar rollover, the host's
//! overnight update, the crop restore and the save write) without a window
//! or GPU. They use Bevy's `MinimalPlugins` to tick the app.
//!
//! Run with: `cargo test --test headless`

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use all_seasons::calendar::CalendarPlugin;
use all_seasons::config::{ModConfig, CONFIG_FILE_NAME};
use all_seasons::data::{DataPlugin, DirtTextures};
use all_seasons::farming::{FarmRules, FarmingPlugin};
use all_seasons::save::{read_save, SavePlugin, SaveSettings};
use all_seasons::seasons::{AllSeasonsPlugin, CropStash};
use all_seasons::shared::*;
use all_seasons::world::WorldPlugin;
use tempfile::TempDir;

const PUMPKIN: ItemId = 490;

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds the full headless app with the given settings. Saves go to a fresh
/// temp directory, which must outlive the app.
fn build_test_app(config: ModConfig) -> (App, TempDir) {
    build_app_with(AllSeasonsPlugin::with_config(config))
}

fn build_app_with(plugin: AllSeasonsPlugin) -> (App, TempDir) {
    let saves = tempfile::tempdir().unwrap();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    // ── Game State ───────────────────────────────────────────────────────
    app.init_state::<GameState>();

    app.add_plugins((
        plugin,
        CalendarPlugin,
        DataPlugin,
        FarmingPlugin,
        WorldPlugin,
        SavePlugin,
    ));

    // ── Deterministic overrides ──────────────────────────────────────────
    app.insert_resource(SaveSettings { directory: saves.path().to_path_buf(), slot: 1 })
        .insert_resource(SimRng::seeded(7))
        .insert_resource(FarmRules { giant_crop_chance: 0.0 });

    (app, saves)
}

/// First update enters Loading and runs the content load; second applies NextState.
fn boot(app: &mut App) {
    app.update();
    app.update();
    assert_eq!(
        app.world().resource::<State<GameState>>().get(),
        &GameState::Playing,
        "Expected to reach Playing after loading data"
    );
}

fn set_date(app: &mut App, season: Season, day: u8) {
    let mut calendar = app.world_mut().resource_mut::<Calendar>();
    calendar.season = season;
    calendar.day = day;
}

fn warp(app: &mut App, to_map: MapId) {
    app.world_mut().send_event(MapTransitionEvent { to_map, to_x: 9, to_y: 9 });
    app.update();
}

fn end_day(app: &mut App) {
    let day_end = app.world().resource::<Calendar>().day_end_event();
    app.world_mut().send_event(day_end);
    app.update();
}

/// Puts a watered pumpkin on `tile`, growing only in `seasons`.
fn place_pumpkin(app: &mut App, tile: TileCoord, seasons: &[Season], stage: u8) {
    let mut locations = app.world_mut().resource_mut::<Locations>();
    let farm = locations.get_mut(MapId::Farm).unwrap();
    farm.terrain_features.insert(
        tile,
        TerrainFeature::HoeDirt(HoeDirt {
            moisture: Moisture::Watered,
            fertilizer: None,
            crop: Some(Crop {
                seed_id: PUMPKIN,
                seasons_to_grow_in: seasons.to_vec(),
                current_stage: stage,
                days_in_stage: 0,
                dead: false,
            }),
        }),
    );
}

fn farm(app: &App) -> &Location {
    app.world().resource::<Locations>().get(MapId::Farm).unwrap()
}

fn live_crop_tiles(location: &Location) -> Vec<TileCoord> {
    let mut tiles: Vec<TileCoord> = location
        .terrain_features
        .iter()
        .filter(|(_, feature)| feature.as_hoe_dirt().is_some_and(HoeDirt::has_live_crop))
        .map(|(tile, _)| *tile)
        .collect();
    tiles.sort();
    tiles
}

fn field() -> Vec<TileCoord> {
    (0..3)
        .flat_map(|x| (0..2).map(move |y| TileCoord::new(20 + x, 30 + y)))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Boot
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_boot_gives_every_crop_winter() {
    let (mut app, _saves) = build_test_app(ModConfig::default());
    boot(&mut app);

    let registry = app.world().resource::<CropRegistry>();
    assert!(!registry.crops.is_empty(), "Crop registry should be populated during boot");
    for data in registry.crops.values() {
        for season in Season::ALL {
            assert!(data.grows_in(season), "Crop {} should grow in {:?}", data.seed_id, season);
        }
    }
}

#[test]
fn test_boot_without_winter_keeps_winter_out() {
    let config = ModConfig { winter_alive_enabled: false, winter_hoe_snow: false };
    let (mut app, _saves) = build_test_app(config);
    boot(&mut app);

    let registry = app.world().resource::<CropRegistry>();
    for data in registry.crops.values() {
        assert!(data.grows_in(Season::Spring) && data.grows_in(Season::Summer) && data.grows_in(Season::Fall));
        assert!(!data.grows_in(Season::Winter), "Crop {} should not grow in winter", data.seed_id);
    }
}

#[test]
fn test_boot_swaps_snowy_soil_when_configured() {
    let config = ModConfig { winter_alive_enabled: true, winter_hoe_snow: true };
    let (mut app, _saves) = build_test_app(config);
    boot(&mut app);

    let textures = app.world().resource::<DirtTextures>();
    assert_eq!(textures.snow, textures.plain);
}

#[test]
fn test_config_file_created_on_first_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    let (mut app, _saves) = build_app_with(AllSeasonsPlugin::from_file(&path));
    boot(&mut app);

    assert!(path.exists(), "Config should be written with defaults");
    assert_eq!(*app.world().resource::<ModConfig>(), ModConfig::default());
}

// ─────────────────────────────────────────────────────────────────────────────
// Stash
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_entering_farmhouse_stashes_farm_crops() {
    let (mut app, _saves) = build_test_app(ModConfig::default());
    boot(&mut app);
    for tile in field() {
        place_pumpkin(&mut app, tile, &Season::ALL, 0);
    }

    warp(&mut app, MapId::Town);
    assert!(app.world().resource::<CropStash>().is_empty(), "Only the farmhouse triggers a stash");

    warp(&mut app, MapId::FarmHouse);
    let stash = app.world().resource::<CropStash>();
    assert_eq!(stash.len(), field().len());
    assert_eq!(app.world().resource::<PlayerState>().current_map, MapId::FarmHouse);
}

// ─────────────────────────────────────────────────────────────────────────────
// Nights
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_fall_crops_survive_into_winter() {
    let (mut app, saves) = build_test_app(ModConfig::default());
    boot(&mut app);
    set_date(&mut app, Season::Fall, DAYS_PER_SEASON);
    // Planted before the season rewrite: these still think they are fall-only.
    for tile in field() {
        place_pumpkin(&mut app, tile, &[Season::Fall], 1);
    }
    warp(&mut app, MapId::FarmHouse);

    end_day(&mut app);

    let calendar = app.world().resource::<Calendar>();
    assert_eq!((calendar.season, calendar.day), (Season::Winter, 1));
    let mut expected = field();
    expected.sort();
    assert_eq!(live_crop_tiles(farm(&app)), expected);

    let save = read_save(&saves.path().join("slot_1.json")).unwrap();
    assert_eq!(save.calendar.season, Season::Winter);
    let saved_farm = save.location(MapId::Farm).unwrap();
    for tile in field() {
        let dirt = saved_farm.feature_at(tile).and_then(TerrainFeature::as_hoe_dirt);
        assert!(
            dirt.is_some_and(HoeDirt::has_live_crop),
            "Saved farm should hold a live crop at {:?}",
            tile
        );
    }
}

#[test]
fn test_winter_deaths_stand_when_disabled() {
    let config = ModConfig { winter_alive_enabled: false, winter_hoe_snow: false };
    let (mut app, saves) = build_test_app(config);
    boot(&mut app);
    set_date(&mut app, Season::Fall, DAYS_PER_SEASON);
    for tile in field() {
        place_pumpkin(&mut app, tile, &[Season::Fall], 1);
    }
    warp(&mut app, MapId::FarmHouse);

    end_day(&mut app);

    assert!(live_crop_tiles(farm(&app)).is_empty());
    let save = read_save(&saves.path().join("slot_1.json")).unwrap();
    let saved_farm = save.location(MapId::Farm).unwrap();
    assert!(field().into_iter().all(|tile| saved_farm.feature_at(tile).is_none()));
}

#[test]
fn test_ordinary_night_is_not_replayed() {
    let (mut app, _saves) = build_test_app(ModConfig::default());
    boot(&mut app);
    set_date(&mut app, Season::Fall, 10);
    let tile = TileCoord::new(40, 12);
    place_pumpkin(&mut app, tile, &Season::ALL, 0);
    warp(&mut app, MapId::FarmHouse);

    end_day(&mut app);

    let crop = farm(&app).hoe_dirt(tile).unwrap().crop.clone().unwrap();
    assert!(!crop.dead);
    assert_eq!(crop.current_stage, 1, "The crop should grow exactly once overnight");
}

#[test]
fn test_giant_crop_footprint_stays_clear() {
    let (mut app, _saves) = build_test_app(ModConfig::default());
    boot(&mut app);
    app.insert_resource(FarmRules { giant_crop_chance: 1.0 });
    set_date(&mut app, Season::Fall, 10);
    let anchor = TileCoord::new(10, 10);
    let clump = ResourceClump { kind: ClumpKind::GiantCrop { seed_id: PUMPKIN }, tile: anchor };
    for tile in clump.footprint() {
        place_pumpkin(&mut app, tile, &Season::ALL, 5);
    }
    let loner = TileCoord::new(30, 10);
    place_pumpkin(&mut app, loner, &Season::ALL, 5);
    warp(&mut app, MapId::FarmHouse);
    assert_eq!(app.world().resource::<CropStash>().len(), 5);

    end_day(&mut app);

    let farm = farm(&app);
    assert_eq!(farm.resource_clumps, vec![clump.clone()]);
    for tile in clump.footprint() {
        assert!(
            farm.hoe_dirt(tile).is_some_and(|dirt| dirt.crop.is_none()),
            "No crop should come back under the giant crop at {:?}",
            tile
        );
    }
    assert_eq!(live_crop_tiles(farm), vec![loner]);
}

#[test]
fn test_morning_wakes_player_and_restashes() {
    let (mut app, _saves) = build_test_app(ModConfig::default());
    boot(&mut app);
    set_date(&mut app, Season::Fall, DAYS_PER_SEASON);
    for tile in field() {
        place_pumpkin(&mut app, tile, &[Season::Fall], 1);
    }
    warp(&mut app, MapId::Town);

    end_day(&mut app);

    // No stash was taken, so nothing comes back; the wake-up warp then
    // captures the (empty) farm.
    assert!(live_crop_tiles(farm(&app)).is_empty());
    assert_eq!(app.world().resource::<PlayerState>().current_map, MapId::FarmHouse);
    assert!(app.world().resource::<CropStash>().is_empty());
}

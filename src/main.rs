use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use all_seasons::calendar::CalendarPlugin;
use all_seasons::config::CONFIG_FILE_NAME;
use all_seasons::data::{DataPlugin, DirtTextures};
use all_seasons::farming::crops::{plant_seed, till};
use all_seasons::farming::FarmingPlugin;
use all_seasons::save::SavePlugin;
use all_seasons::seasons::AllSeasonsPlugin;
use all_seasons::shared::*;
use all_seasons::world::WorldPlugin;

/// Nights simulated by the demo, starting two days before winter.
const DEMO_NIGHTS: u32 = 4;

fn main() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, LogPlugin::default()))
        // Game state
        .init_state::<GameState>()
        // Domain plugins
        .add_plugins((
            AllSeasonsPlugin::from_file(CONFIG_FILE_NAME),
            CalendarPlugin,
            DataPlugin,
            FarmingPlugin,
            WorldPlugin,
            SavePlugin,
        ));

    // Enter Loading, then apply the transition to Playing.
    app.update();
    app.update();
    if app.world().resource::<State<GameState>>().get() != &GameState::Playing {
        error!("[Demo] Content never finished loading");
        return;
    }

    plant_fall_field(&mut app);

    for _ in 0..DEMO_NIGHTS {
        let day_end = app.world().resource::<Calendar>().day_end_event();
        app.world_mut().send_event(day_end);
        app.update();
        report_morning(&app);
    }
}

/// Late fall: a 4×4 field of pumpkins, watered, with the player heading home.
fn plant_fall_field(app: &mut App) {
    let world = app.world_mut();
    {
        let mut calendar = world.resource_mut::<Calendar>();
        calendar.season = Season::Fall;
        calendar.day = DAYS_PER_SEASON - 2;
    }

    let Some(pumpkin) = world.resource::<CropRegistry>().get(490).cloned() else {
        error!("[Demo] Pumpkin missing from the crop registry");
        return;
    };
    world.resource_scope(|_, mut locations: Mut<Locations>| {
        let Some(farm) = locations.get_mut(MapId::Farm) else {
            return;
        };
        for x in 60..64 {
            for y in 15..19 {
                let tile = TileCoord::new(x, y);
                if till(farm, tile) && plant_seed(farm, tile, &pumpkin, Season::Fall) {
                    if let Some(dirt) = farm.hoe_dirt_mut(tile) {
                        dirt.moisture = Moisture::Watered;
                    }
                }
            }
        }
    });

    world.send_event(MapTransitionEvent {
        to_map: MapId::FarmHouse,
        to_x: 9,
        to_y: 9,
    });
    app.update();
}

fn report_morning(app: &App) {
    let world = app.world();
    let calendar = world.resource::<Calendar>();
    let Some(farm) = world.resource::<Locations>().get(MapId::Farm) else {
        return;
    };
    let living = farm
        .terrain_features
        .values()
        .filter_map(TerrainFeature::as_hoe_dirt)
        .filter(|dirt| dirt.has_live_crop())
        .count();
    let soil = world
        .get_resource::<DirtTextures>()
        .map(|textures| textures.for_location(farm, calendar.season).source.as_str())
        .unwrap_or("none");

    info!(
        "[Demo] {:?} {} Year {} ({:?}): {} live crops, soil drawn with {}",
        calendar.season, calendar.day, calendar.year, calendar.weather, living, soil
    );
}

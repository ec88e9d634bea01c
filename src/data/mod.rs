//! Data layer — populates the crop registry and soil textures at startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), loads every asset through
//! the `ContentPipeline` (so registered editors apply), then transitions the
//! game into GameState::Playing.

pub mod crops;

use bevy::prelude::*;

use crate::content::{ContentPipeline, Texture, HOE_DIRT_SNOW_TEXTURE, HOE_DIRT_TEXTURE};
use crate::error::FarmResult;
use crate::shared::*;

/// Soil textures as delivered by the content pipeline.
#[derive(Resource, Debug, Clone)]
pub struct DirtTextures {
    pub plain: Texture,
    pub snow: Texture,
}

impl DirtTextures {
    /// Outdoor soil is snowy in winter.
    pub fn for_location(&self, location: &Location, season: Season) -> &Texture {
        if location.outdoors && season == Season::Winter {
            &self.snow
        } else {
            &self.plain
        }
    }
}

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ContentPipeline>()
            .init_resource::<CropRegistry>()
            .add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Populates every registry and then transitions to Playing. A content error
/// leaves the game in Loading.
fn load_all_data(
    mut commands: Commands,
    mut pipeline: ResMut<ContentPipeline>,
    mut crop_registry: ResMut<CropRegistry>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("[Data] Populating registries…");

    match load_content(&mut pipeline, &mut crop_registry) {
        Ok(textures) => {
            info!("  Crops loaded: {}", crop_registry.crops.len());
            commands.insert_resource(textures);
            next_state.set(GameState::Playing);
        }
        Err(e) => error!("[Data] Content load failed: {}", e),
    }
}

fn load_content(
    pipeline: &mut ContentPipeline,
    crop_registry: &mut CropRegistry,
) -> FarmResult<DirtTextures> {
    pipeline.game_mut().install_vanilla()?;

    let table = pipeline.load_crop_table()?;
    crops::populate_crops(crop_registry, &table);

    Ok(DirtTextures {
        plain: pipeline.load_texture(HOE_DIRT_TEXTURE)?,
        snow: pipeline.load_texture(HOE_DIRT_SNOW_TEXTURE)?,
    })
}

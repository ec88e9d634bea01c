//! Content edits: every crop grows in a fixed list of seasons, and winter soil
//! can optionally use the plain dirt texture.

use bevy::prelude::*;

use crate::config::ModConfig;
use crate::content::{
    asset_name_eq, Asset, AssetData, AssetEditor, CropTable, CROPS_TABLE, HOE_DIRT_SNOW_TEXTURE,
    HOE_DIRT_TEXTURE,
};
use crate::data::crops::RECORD_DELIMITER;
use crate::error::FarmResult;

pub const SEASONS_WITHOUT_WINTER: &str = "spring summer fall";
pub const SEASONS_WITH_WINTER: &str = "spring summer fall winter";

const SEASONS_FIELD: usize = 1;

pub struct SeasonRuleEditor {
    config: ModConfig,
}

impl SeasonRuleEditor {
    pub fn new(config: ModConfig) -> Self {
        Self { config }
    }
}

impl AssetEditor for SeasonRuleEditor {
    fn can_edit(&self, asset_name: &str) -> bool {
        asset_name_eq(asset_name, CROPS_TABLE) || asset_name_eq(asset_name, HOE_DIRT_SNOW_TEXTURE)
    }

    fn edit(&self, asset: &mut AssetData<'_>) -> FarmResult<()> {
        if asset_name_eq(asset.name(), CROPS_TABLE) {
            let seasons = season_field(self.config.winter_alive_enabled);
            rewrite_crop_seasons(asset.crop_table_mut()?, seasons);
        } else if asset_name_eq(asset.name(), HOE_DIRT_SNOW_TEXTURE) && self.config.winter_hoe_snow {
            let plain = asset.load_game_asset(HOE_DIRT_TEXTURE)?;
            if let Asset::Texture(texture) = &plain {
                info!("[Content] {} now draws {}", HOE_DIRT_SNOW_TEXTURE, texture.source);
            }
            asset.replace_with(plain);
        }
        Ok(())
    }
}

pub fn season_field(winter_alive_enabled: bool) -> &'static str {
    if winter_alive_enabled {
        SEASONS_WITH_WINTER
    } else {
        SEASONS_WITHOUT_WINTER
    }
}

/// Overwrites the seasons field of every record. Returns how many records
/// were rewritten; records too short to have a seasons field are left alone.
pub fn rewrite_crop_seasons(table: &mut CropTable, seasons: &str) -> usize {
    let mut rewritten = 0;
    for (seed_id, record) in table.iter_mut() {
        match with_seasons(record, seasons) {
            Some(updated) => {
                *record = updated;
                rewritten += 1;
            }
            None => warn!("[Content] Crop {} has no seasons field: '{}'", seed_id, record),
        }
    }
    rewritten
}

fn with_seasons(record: &str, seasons: &str) -> Option<String> {
    let mut fields: Vec<&str> = record.split(RECORD_DELIMITER).collect();
    let field = fields.get_mut(SEASONS_FIELD)?;
    *field = seasons;
    let delimiter = RECORD_DELIMITER.to_string();
    Some(fields.join(delimiter.as_str()))
}

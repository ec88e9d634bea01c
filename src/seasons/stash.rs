//! The crop stash: a morning snapshot of every live crop on the farm, put
//! back before the save if the night killed or removed it.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::config::ModConfig;
use crate::shared::*;

/// One cultivated tile as it was when the stash was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct CropTileState {
    pub tile: TileCoord,
    pub crop: Crop,
    pub moisture: Moisture,
    pub fertilizer: Option<ItemId>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct CropStash {
    saved: Vec<CropTileState>,
}

impl CropStash {
    pub fn saved(&self) -> &[CropTileState] {
        &self.saved
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    /// Replace the stash with the live crops currently on `farm`.
    pub fn stash(&mut self, farm: &Location) {
        self.saved = crop_tiles(farm).collect();
    }

    /// Put stashed crops back on every plot that lost its crop overnight.
    ///
    /// Tiles under a giant crop are skipped. A tile that is no longer tilled
    /// gets fresh soil. Plots that still hold a live crop are never touched.
    /// Each restored plot is recomputed under `conditions`. Returns how many
    /// plots were restored.
    pub fn restore(
        &self,
        farm: &mut Location,
        conditions: &GrowthConditions,
        registry: &CropRegistry,
    ) -> usize {
        if self.saved.is_empty() {
            return 0;
        }

        let covered: HashSet<TileCoord> = giant_crop_tiles(farm).collect();
        let mut restored = 0;

        for saved in self.saved.iter().filter(|s| !covered.contains(&s.tile)) {
            let feature = farm
                .terrain_features
                .entry(saved.tile)
                .or_insert_with(|| TerrainFeature::HoeDirt(HoeDirt::default()));
            if feature.as_hoe_dirt().is_none() {
                *feature = TerrainFeature::HoeDirt(HoeDirt::default());
            }
            let Some(dirt) = feature.as_hoe_dirt_mut() else {
                continue;
            };

            if dirt.has_live_crop() {
                continue;
            }

            // Keep the water from this morning's rain.
            if dirt.moisture != Moisture::Watered {
                dirt.moisture = saved.moisture;
            }
            dirt.fertilizer = saved.fertilizer;
            let mut crop = saved.crop.clone();
            crop.dead = false;
            dirt.crop = Some(crop);
            dirt.day_update(conditions, registry);
            restored += 1;
        }

        restored
    }
}

/// Every tile of `location` holding a live crop.
pub fn crop_tiles(location: &Location) -> impl Iterator<Item = CropTileState> + '_ {
    location.terrain_features.iter().filter_map(|(tile, feature)| {
        let dirt = feature.as_hoe_dirt()?;
        let crop = dirt.crop.as_ref().filter(|crop| !crop.dead)?;
        Some(CropTileState {
            tile: *tile,
            crop: crop.clone(),
            moisture: dirt.moisture,
            fertilizer: dirt.fertilizer,
        })
    })
}

/// Every tile covered by a giant crop in `location`.
pub fn giant_crop_tiles(location: &Location) -> impl Iterator<Item = TileCoord> + '_ {
    location
        .resource_clumps
        .iter()
        .filter(|clump| clump.is_giant_crop())
        .flat_map(ResourceClump::footprint)
}

/// With winter survival off, winter deaths are left alone.
pub fn should_restore(config: &ModConfig, season: Season) -> bool {
    config.winter_alive_enabled || season != Season::Winter
}

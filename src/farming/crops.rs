//! Crop planting and per-plot overnight growth.

use rand::Rng;

use crate::shared::*;

/// What happened to a live crop overnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropDay {
    Grew,
    Waited,
    Died,
}

impl Crop {
    /// A fresh seedling; copies the valid seasons from the crop data.
    pub fn new(data: &CropData) -> Self {
        Self {
            seed_id: data.seed_id,
            seasons_to_grow_in: data.seasons.clone(),
            current_stage: 0,
            days_in_stage: 0,
            dead: false,
        }
    }

    pub fn is_fully_grown(&self, data: &CropData) -> bool {
        self.current_stage as usize >= data.phase_days.len()
    }

    /// Advance this crop by one day. Out-of-season crops die unless the
    /// conditions ignore seasons; growth only happens on watered soil.
    pub fn new_day(
        &mut self,
        watered: bool,
        conditions: &GrowthConditions,
        registry: &CropRegistry,
    ) -> CropDay {
        if !conditions.ignores_seasons && !self.seasons_to_grow_in.contains(&conditions.season) {
            self.dead = true;
            return CropDay::Died;
        }

        let Some(data) = registry.get(self.seed_id) else {
            return CropDay::Waited;
        };

        if !watered || self.is_fully_grown(data) {
            return CropDay::Waited;
        }

        self.days_in_stage += 1;
        let days_needed = data.phase_days[self.current_stage as usize];
        if self.days_in_stage >= days_needed {
            self.current_stage += 1;
            self.days_in_stage = 0;
        }
        CropDay::Grew
    }
}

impl HoeDirt {
    /// Recompute this plot for a new day. Returns `None` when there is no
    /// live crop to update.
    pub fn day_update(
        &mut self,
        conditions: &GrowthConditions,
        registry: &CropRegistry,
    ) -> Option<CropDay> {
        let watered = self.moisture == Moisture::Watered;
        let crop = self.crop.as_mut().filter(|crop| !crop.dead)?;
        Some(crop.new_day(watered, conditions, registry))
    }

    /// Overnight soil: a wet morning waters the plot, otherwise it dries out
    /// unless retaining soil holds the moisture.
    pub fn settle_moisture(&mut self, wet_morning: bool, rng: &mut impl Rng) {
        if wet_morning {
            self.moisture = Moisture::Watered;
            return;
        }
        if self.moisture == Moisture::Watered {
            let keep_chance = match self.fertilizer {
                Some(BASIC_RETAINING_SOIL) => 0.33,
                Some(QUALITY_RETAINING_SOIL) => 0.66,
                _ => 0.0,
            };
            if !rng.gen_bool(keep_chance) {
                self.moisture = Moisture::Dry;
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tilling & planting
// ─────────────────────────────────────────────────────────────────────────────

/// Till a tile. Only empty ground or grass can be tilled.
pub fn till(location: &mut Location, tile: TileCoord) -> bool {
    match location.terrain_features.get(&tile) {
        None | Some(TerrainFeature::Grass) => {
            location
                .terrain_features
                .insert(tile, TerrainFeature::HoeDirt(HoeDirt::default()));
            true
        }
        Some(_) => false,
    }
}

/// Plant a seed on tilled soil. Fails if the tile is not tilled, already has
/// a crop, or the crop cannot grow here this season.
pub fn plant_seed(
    location: &mut Location,
    tile: TileCoord,
    data: &CropData,
    season: Season,
) -> bool {
    let conditions = location.growth_conditions(season);
    if !conditions.ignores_seasons && !data.grows_in(season) {
        return false;
    }
    let Some(dirt) = location.hoe_dirt_mut(tile) else {
        return false;
    };
    if dirt.crop.is_some() {
        return false;
    }
    dirt.crop = Some(Crop::new(data));
    true
}

//! Giant crops: a fully grown 2×2 block of the same giant-capable crop may
//! merge overnight into a single resource clump.

use rand::Rng;
use std::collections::HashSet;

use crate::shared::*;

/// Rolls giant-crop growth for every eligible 2×2 block, anchored at the
/// top-left tile. The four merged crops are removed from their plots; the
/// soil stays. Returns the anchors of new giant crops.
pub fn form_giant_crops(
    location: &mut Location,
    registry: &CropRegistry,
    chance: f64,
    rng: &mut impl Rng,
) -> Vec<TileCoord> {
    let mut occupied: HashSet<TileCoord> = location
        .resource_clumps
        .iter()
        .flat_map(ResourceClump::footprint)
        .collect();

    let mut anchors: Vec<TileCoord> = location
        .terrain_features
        .keys()
        .copied()
        .filter(|&tile| giant_seed_at(location, registry, tile).is_some())
        .collect();
    anchors.sort();

    let mut formed = Vec::new();
    for anchor in anchors {
        let Some(seed_id) = giant_seed_at(location, registry, anchor) else {
            continue;
        };
        let clump = ResourceClump {
            kind: ClumpKind::GiantCrop { seed_id },
            tile: anchor,
        };
        let footprint = clump.footprint();
        let eligible = footprint.iter().all(|tile| {
            !occupied.contains(tile) && giant_seed_at(location, registry, *tile) == Some(seed_id)
        });
        if !eligible || !rng.gen_bool(chance) {
            continue;
        }

        for tile in footprint {
            if let Some(dirt) = location.hoe_dirt_mut(tile) {
                dirt.crop = None;
            }
            occupied.insert(tile);
        }
        location.resource_clumps.push(clump);
        formed.push(anchor);
    }
    formed
}

/// The seed of a live, fully grown, giant-capable crop on this tile.
fn giant_seed_at(location: &Location, registry: &CropRegistry, tile: TileCoord) -> Option<ItemId> {
    let crop = location.hoe_dirt(tile)?.crop.as_ref()?;
    if crop.dead || !GIANT_CROP_SEEDS.contains(&crop.seed_id) {
        return None;
    }
    let data = registry.get(crop.seed_id)?;
    crop.is_fully_grown(data).then_some(crop.seed_id)
}

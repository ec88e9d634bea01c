//! Content pipeline — the host's asset store plus the editor hook add-ons use
//! to rewrite assets as they load.
//!
//! Every `ContentPipeline::load` starts from a fresh copy of the base asset
//! and runs each registered editor whose `can_edit` matches, in registration
//! order. Editors therefore see the same input on every load and must produce
//! the same output each time.

use bevy::prelude::*;
use std::collections::{BTreeMap, HashMap};

use crate::error::{FarmError, FarmResult};
use crate::shared::ItemId;

pub const CROPS_TABLE: &str = "Data/Crops";
pub const HOE_DIRT_TEXTURE: &str = "TerrainFeatures/hoeDirt";
pub const HOE_DIRT_SNOW_TEXTURE: &str = "TerrainFeatures/hoeDirtSnow";

const VANILLA_CROPS_JSON: &str = include_str!("../../assets/data/crops.json");

/// Raw `Data/Crops`: seed item id → `/`-delimited record.
pub type CropTable = BTreeMap<ItemId, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Content path of the image this texture was read from.
    pub source: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    CropTable(CropTable),
    Texture(Texture),
}

/// Asset names compare case-insensitively with either path separator.
pub fn asset_name_eq(a: &str, b: &str) -> bool {
    normalize_asset_name(a) == normalize_asset_name(b)
}

fn normalize_asset_name(name: &str) -> String {
    name.trim()
        .replace('\\', "/")
        .trim_matches('/')
        .to_ascii_lowercase()
}

// ═══════════════════════════════════════════════════════════════════════
// BASE CONTENT
// ═══════════════════════════════════════════════════════════════════════

/// The unedited game assets.
#[derive(Debug, Clone, Default)]
pub struct GameContent {
    assets: HashMap<String, Asset>,
}

impl GameContent {
    pub fn insert(&mut self, name: &str, asset: Asset) {
        self.assets.insert(normalize_asset_name(name), asset);
    }

    pub fn get(&self, name: &str) -> Option<&Asset> {
        self.assets.get(&normalize_asset_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Adds the stock crop table and soil textures, keeping anything already present.
    pub fn install_vanilla(&mut self) -> FarmResult<()> {
        if !self.contains(CROPS_TABLE) {
            let table: CropTable = serde_json::from_str(VANILLA_CROPS_JSON)?;
            self.insert(CROPS_TABLE, Asset::CropTable(table));
        }
        for name in [HOE_DIRT_TEXTURE, HOE_DIRT_SNOW_TEXTURE] {
            if !self.contains(name) {
                self.insert(
                    name,
                    Asset::Texture(Texture {
                        source: name.to_string(),
                        width: 64,
                        height: 64,
                    }),
                );
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EDITOR HOOK
// ═══════════════════════════════════════════════════════════════════════

/// An asset being loaded, handed to each matching editor.
pub struct AssetData<'a> {
    name: &'a str,
    asset: &'a mut Asset,
    game: &'a GameContent,
}

impl AssetData<'_> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn crop_table_mut(&mut self) -> FarmResult<&mut CropTable> {
        match self.asset {
            Asset::CropTable(table) => Ok(table),
            _ => Err(FarmError::AssetKindMismatch {
                name: self.name.to_string(),
                expected: "crop table",
            }),
        }
    }

    /// Reads another unedited asset from the base game content.
    pub fn load_game_asset(&self, name: &str) -> FarmResult<Asset> {
        self.game.get(name).cloned().ok_or_else(|| FarmError::UnknownAsset {
            name: name.to_string(),
        })
    }

    pub fn replace_with(&mut self, asset: Asset) {
        *self.asset = asset;
    }
}

pub trait AssetEditor: Send + Sync + 'static {
    fn can_edit(&self, asset_name: &str) -> bool;

    fn edit(&self, asset: &mut AssetData<'_>) -> FarmResult<()>;
}

// ═══════════════════════════════════════════════════════════════════════
// PIPELINE RESOURCE
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Default)]
pub struct ContentPipeline {
    game: GameContent,
    editors: Vec<Box<dyn AssetEditor>>,
}

impl ContentPipeline {
    pub fn register(&mut self, editor: impl AssetEditor) {
        self.editors.push(Box::new(editor));
    }

    pub fn game(&self) -> &GameContent {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameContent {
        &mut self.game
    }

    pub fn load(&self, name: &str) -> FarmResult<Asset> {
        let mut asset = self.game.get(name).cloned().ok_or_else(|| FarmError::UnknownAsset {
            name: name.to_string(),
        })?;

        for editor in self.editors.iter().filter(|e| e.can_edit(name)) {
            editor.edit(&mut AssetData {
                name,
                asset: &mut asset,
                game: &self.game,
            })?;
        }

        Ok(asset)
    }

    pub fn load_crop_table(&self) -> FarmResult<CropTable> {
        match self.load(CROPS_TABLE)? {
            Asset::CropTable(table) => Ok(table),
            _ => Err(FarmError::AssetKindMismatch {
                name: CROPS_TABLE.to_string(),
                expected: "crop table",
            }),
        }
    }

    pub fn load_texture(&self, name: &str) -> FarmResult<Texture> {
        match self.load(name)? {
            Asset::Texture(texture) => Ok(texture),
            _ => Err(FarmError::AssetKindMismatch {
                name: name.to_string(),
                expected: "texture",
            }),
        }
    }
}

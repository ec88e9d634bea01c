//! User configuration for the seasonal add-on, stored as RON next to the game.

use bevy::prelude::*;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::FarmResult;

pub const CONFIG_FILE_NAME: &str = "config.ron";

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModConfig {
    /// Crops may grow in winter and survive the fall → winter transition.
    pub winter_alive_enabled: bool,
    /// Draw tilled soil with the plain dirt texture instead of the snowy one.
    pub winter_hoe_snow: bool,
}

impl Default for ModConfig {
    fn default() -> Self {
        Self {
            winter_alive_enabled: true,
            winter_hoe_snow: false,
        }
    }
}

impl ModConfig {
    /// Reads the config file, writing the defaults first if it does not exist.
    pub fn load_or_create(path: &Path) -> FarmResult<Self> {
        if !path.exists() {
            let config = Self::default();
            config.write(path)?;
            info!("[Config] Wrote default config to {}", path.display());
            return Ok(config);
        }

        let text = fs::read_to_string(path)?;
        let config: ModConfig = ron::from_str(&text)?;
        info!("[Config] Loaded {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn write(&self, path: &Path) -> FarmResult<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        let text = ron::ser::to_string_pretty(self, PrettyConfig::default())?;
        fs::write(path, text)?;
        Ok(())
    }
}

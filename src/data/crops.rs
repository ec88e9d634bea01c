use bevy::prelude::*;

use crate::content::CropTable;
use crate::error::{FarmError, FarmResult};
use crate::shared::*;

/// Field layout of a `Data/Crops` record:
///   0 phase days (space separated), 1 seasons (space separated),
///   2 sprite row, 3 harvest item, 4 regrow days (-1 = single harvest),
///   5 harvest method, 6 extra-harvest chance, 7 raised (trellis), 8 tint.
pub const RECORD_DELIMITER: char = '/';
const MIN_FIELDS: usize = 5;

impl CropData {
    pub fn parse(seed_id: ItemId, record: &str) -> FarmResult<Self> {
        let malformed = |reason: String| FarmError::MalformedCropRecord { seed_id, reason };
        let fields: Vec<&str> = record.split(RECORD_DELIMITER).collect();
        if fields.len() < MIN_FIELDS {
            return Err(malformed(format!(
                "expected at least {} fields, found {}",
                MIN_FIELDS,
                fields.len()
            )));
        }

        let phase_days = fields[0]
            .split_whitespace()
            .map(|d| d.parse::<u8>().map_err(|_| malformed(format!("bad phase length '{}'", d))))
            .collect::<FarmResult<Vec<u8>>>()?;
        if phase_days.is_empty() {
            return Err(malformed("no growth phases".to_string()));
        }

        let seasons = fields[1]
            .split_whitespace()
            .map(|s| Season::parse(s).ok_or_else(|| malformed(format!("unknown season '{}'", s))))
            .collect::<FarmResult<Vec<Season>>>()?;

        let sprite_row = fields[2]
            .trim()
            .parse::<u32>()
            .map_err(|_| malformed(format!("bad sprite row '{}'", fields[2])))?;
        let harvest_item = fields[3]
            .trim()
            .parse::<ItemId>()
            .map_err(|_| malformed(format!("bad harvest item '{}'", fields[3])))?;
        let regrow = fields[4]
            .trim()
            .parse::<i32>()
            .map_err(|_| malformed(format!("bad regrow days '{}'", fields[4])))?;

        Ok(CropData {
            seed_id,
            phase_days,
            seasons,
            sprite_row,
            harvest_item,
            regrow_days: u8::try_from(regrow).ok().filter(|_| regrow > 0),
            raised: fields.get(7).is_some_and(|f| f.trim() == "true"),
        })
    }
}

/// Fill the registry from the (already edited) crop table. Malformed records
/// are skipped. Returns how many crops were registered.
pub fn populate_crops(registry: &mut CropRegistry, table: &CropTable) -> usize {
    registry.crops.clear();
    for (&seed_id, record) in table {
        match CropData::parse(seed_id, record) {
            Ok(data) => {
                registry.crops.insert(seed_id, data);
            }
            Err(e) => warn!("[Data] Skipping crop: {}", e),
        }
    }
    registry.crops.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_regrowing_trellis_crop() {
        let data = CropData::parse(473, "1 1 1 3 4/spring/1/188/3/0/false/true/false").unwrap();
        assert_eq!(data.phase_days, vec![1, 1, 1, 3, 4]);
        assert_eq!(data.seasons, vec![Season::Spring]);
        assert_eq!(data.sprite_row, 1);
        assert_eq!(data.harvest_item, 188);
        assert_eq!(data.regrow_days, Some(3));
        assert!(data.raised);
    }

    #[test]
    fn test_parse_multi_season_single_harvest() {
        let data = CropData::parse(483, "1 1 1 1/summer fall/11/262/-1/1/false/false/false").unwrap();
        assert_eq!(data.seasons, vec![Season::Summer, Season::Fall]);
        assert_eq!(data.regrow_days, None);
        assert!(!data.raised);
    }

    #[test]
    fn test_parse_extra_harvest_field_with_spaces() {
        let data = CropData::parse(475, "1 1 1 2 1/spring/3/192/-1/0/true 1 1 10 .2/false/false").unwrap();
        assert_eq!(data.phase_days.len(), 5);
        assert!(!data.raised);
    }

    #[test]
    fn test_parse_rejects_bad_records() {
        assert!(CropData::parse(1, "1 1 1 1").is_err());
        assert!(CropData::parse(1, "1 x 1/spring/0/24/-1/0").is_err());
        assert!(CropData::parse(1, "1 1/monsoon/0/24/-1/0").is_err());
        assert!(CropData::parse(1, "/spring/0/24/-1/0").is_err());
    }

    #[test]
    fn test_populate_skips_malformed() {
        let table: CropTable = [
            (472, "1 1 1 1/spring/0/24/-1/0/false/false/false".to_string()),
            (999, "garbage".to_string()),
        ]
        .into();
        let mut registry = CropRegistry::default();

        assert_eq!(populate_crops(&mut registry, &table), 1);
        assert!(registry.get(472).is_some());
        assert!(registry.get(999).is_none());
    }
}

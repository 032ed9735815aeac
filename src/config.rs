//! World configuration
//!
//! Every tunable the generators and the streaming window read lives here. The
//! whole struct round-trips through JSON so a world can be reproduced from a
//! seed plus a config file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chunks::ChunkParams;
use crate::error::{Result, WorldError};
use crate::generation::{DungeonParams, SettlementParams};
use crate::world_map::WorldMapParams;

/// Largest chunk side the binary chunk header can describe
pub const MAX_CHUNK_EXTENT: usize = u8::MAX as usize;

/// Size of the live chunk window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingParams {
    /// Side of the square window, in chunks. Must be odd.
    pub diameter: usize,
}

impl Default for StreamingParams {
    fn default() -> Self {
        Self { diameter: 3 }
    }
}

/// On-screen canvas and sight settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewParams {
    pub rows: usize,
    pub cols: usize,
    pub surface_sight_radius: i32,
    pub underground_sight_radius: i32,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            rows: 24,
            cols: 80,
            surface_sight_radius: 15,
            underground_sight_radius: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World map width, in chunks
    pub world_width: usize,
    /// World map height, in chunks
    pub world_height: usize,
    pub world_map: WorldMapParams,
    pub chunk: ChunkParams,
    pub dungeon: DungeonParams,
    pub settlement: SettlementParams,
    pub streaming: StreamingParams,
    pub view: ViewParams,
    /// Directory holding evicted chunks, one subdirectory per world seed
    pub save_dir: PathBuf,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_width: 80,
            world_height: 60,
            world_map: WorldMapParams::default(),
            chunk: ChunkParams::default(),
            dungeon: DungeonParams::default(),
            settlement: SettlementParams::default(),
            streaming: StreamingParams::default(),
            view: ViewParams::default(),
            save_dir: PathBuf::from("chunks"),
        }
    }
}

impl WorldConfig {
    pub fn load(path: &Path) -> Result<WorldConfig> {
        let text = fs::read_to_string(path)?;
        let config: WorldConfig = serde_json::from_str(&text)?;
        tracing::info!(path = %path.display(), "loaded world config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Dungeon parameters sized to one chunk.
    /// Where the chunks of the world generated from `master_seed` are saved.
    /// Worlds never share a directory, so a chunk saved by one world is never
    /// loaded into another.
    pub fn world_save_dir(&self, master_seed: u64) -> PathBuf {
        self.save_dir.join(format!("world_{}", master_seed))
    }

    pub fn dungeon_for_chunk(&self) -> DungeonParams {
        DungeonParams {
            width: self.chunk.width,
            height: self.chunk.height,
            ..self.dungeon.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.world_width == 0 || self.world_height == 0 {
            return Err(WorldError::parameter("world map must have a non-zero size"));
        }
        self.chunk.validate()?;
        if self.streaming.diameter % 2 == 0 {
            return Err(WorldError::parameter(format!(
                "streaming diameter {} must be odd",
                self.streaming.diameter
            )));
        }
        if self.streaming.diameter < 3 {
            return Err(WorldError::parameter("streaming diameter must cover the 3x3 neighbourhood"));
        }
        if self.view.surface_sight_radius < 1 || self.view.underground_sight_radius < 1 {
            return Err(WorldError::parameter("sight radii must be positive"));
        }
        if self.settlement.min_lot >= self.settlement.max_lot {
            return Err(WorldError::parameter(format!(
                "settlement min_lot {} must be smaller than max_lot {}",
                self.settlement.min_lot, self.settlement.max_lot
            )));
        }
        self.world_map.validate()?;
        self.dungeon_for_chunk().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        WorldConfig::default().validate().unwrap();
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        let mut config = WorldConfig::default();
        config.world_width = 40;
        config.dungeon.target_room_count = 9;
        config.save(&path).unwrap();

        let loaded = WorldConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: WorldConfig = serde_json::from_str(r#"{ "world_width": 12, "chunk": { "height": 40 } }"#).unwrap();
        assert_eq!(config.world_width, 12);
        assert_eq!(config.chunk.height, 40);
        assert_eq!(config.chunk.width, ChunkParams::default().width);
        assert_eq!(config.streaming.diameter, 3);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = WorldConfig::default();
        config.streaming.diameter = 4;
        assert!(matches!(config.validate(), Err(WorldError::GenerationParameter(_))));

        let mut config = WorldConfig::default();
        config.chunk.width = 300;
        assert!(config.validate().is_err());

        let mut config = WorldConfig::default();
        config.chunk.width = 12;
        assert!(config.validate().is_err(), "dungeon rooms cannot fit");

        let mut config = WorldConfig::default();
        config.settlement.max_lot = config.settlement.min_lot;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_world_save_dir_per_seed() {
        let mut config = WorldConfig::default();
        config.save_dir = PathBuf::from("saves");
        assert_eq!(config.world_save_dir(42), PathBuf::from("saves").join("world_42"));
        assert_ne!(config.world_save_dir(42), config.world_save_dir(43));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(WorldConfig::load(&path), Err(WorldError::Config(_))));
    }
}

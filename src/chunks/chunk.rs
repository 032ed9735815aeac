//! A chunk: the overworld layer of one world map cell plus the dungeon floors
//! beneath it.
//!
//! Depths are numbered the way the player experiences them: `-1` is the
//! overworld and `0..depth` are dungeon floors, so layer index = depth + 1.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::layer::ChunkLayer;
use crate::config::{WorldConfig, MAX_CHUNK_EXTENT};
use crate::error::{Result, WorldError};
use crate::generation::{dungeon, generate_settlement, Room};
use crate::point::IntPoint;
use crate::seeds::WorldSeeds;
use crate::tiles::{Tile, TileKind};
use crate::world_map::Biome;

/// Depth of the overworld layer
pub const SURFACE: i32 = -1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkParams {
    /// Tiles per chunk, horizontally
    pub width: usize,
    /// Tiles per chunk, vertically
    pub height: usize,
    /// Deepest dungeon a land chunk can roll
    pub max_depth: usize,
    /// One in N land tiles is a tree
    pub land_tree_odds: u32,
    /// One in N forest tiles is a tree
    pub forest_tree_odds: u32,
    /// One in N forest trees is a big tree
    pub big_tree_odds: u32,
    /// One in N bare land tiles is grass
    pub grass_odds: u32,
    /// One bush per this many surface tiles
    pub bush_area: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            width: 100,
            height: 50,
            max_depth: 6,
            land_tree_odds: 8,
            forest_tree_odds: 3,
            big_tree_odds: 6,
            grass_odds: 4,
            bush_area: 250,
        }
    }
}

impl ChunkParams {
    /// Sizes the chunk header can describe. Zero-sized chunks are rejected since
    /// every tile lookup divides by the chunk extent.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WorldError::parameter("chunks must have a non-zero size"));
        }
        if self.width > MAX_CHUNK_EXTENT || self.height > MAX_CHUNK_EXTENT {
            return Err(WorldError::parameter(format!(
                "chunk extent {}x{} exceeds {}",
                self.width, self.height, MAX_CHUNK_EXTENT
            )));
        }
        if self.max_depth + 1 > MAX_CHUNK_EXTENT {
            return Err(WorldError::parameter("chunk max_depth does not fit the chunk header"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Chunk {
    /// World map coordinate
    pub coord: IntPoint,
    /// Number of dungeon floors
    pub depth: usize,
    layers: Vec<ChunkLayer>,
}

impl Chunk {
    /// Generate the chunk at `coord`. The result depends only on the seeds,
    /// the coordinate and the config, never on generation order.
    pub fn generate(coord: IntPoint, biome: Biome, config: &WorldConfig, seeds: &WorldSeeds) -> Result<Chunk> {
        let params = &config.chunk;
        let mut rng = seeds.chunk_rng(coord);
        let depth = if biome.is_land() && params.max_depth > 0 {
            rng.gen_range(1..=params.max_depth)
        } else {
            0
        };

        let mut layers = Vec::with_capacity(depth + 1);
        let mut surface = ChunkLayer::overworld(params.width, params.height, biome, params, depth > 0, &mut rng)?;

        if biome.is_land() && config.settlement.chance > 0.0 {
            let mut settlement_rng = seeds.settlement_rng(coord);
            if settlement_rng.gen_bool(config.settlement.chance.min(1.0)) {
                let mut settlement =
                    generate_settlement(params.width, params.height, &config.settlement, &mut settlement_rng)?;
                // Keep the dungeon entrance reachable
                settlement
                    .buildings
                    .retain(|b| !surface.rooms.iter().any(|room| overlaps(room, b.top_left, b.bottom_right)));
                for building in &settlement.buildings {
                    surface.plants.retain(|plant| !building.contains(plant.position));
                }
                settlement.stamp(&mut surface.tiles)?;
                debug!(%coord, buildings = settlement.buildings.len(), "settlement placed");
            }
        }
        layers.push(surface);

        let dungeon_params = config.dungeon_for_chunk();
        for floor in 0..depth {
            let dungeon = dungeon::generate_with_rng(&dungeon_params, &mut rng)?;
            let mut layer = ChunkLayer::from_dungeon(&dungeon, floor + 1 < depth);
            layer.make_stairs(&mut rng)?;
            layer.make_spawner(floor as i32, &mut rng)?;
            layers.push(layer);
        }

        debug!(%coord, ?biome, depth, "chunk generated");
        Ok(Chunk { coord, depth, layers })
    }

    /// Bare dirt surface with nothing below.
    pub fn empty(coord: IntPoint, width: usize, height: usize) -> Chunk {
        Chunk {
            coord,
            depth: 0,
            layers: vec![ChunkLayer::new(width, height, TileKind::Dirt)],
        }
    }

    /// Assemble a chunk from decoded layers; the first one is the overworld.
    pub fn from_layers(coord: IntPoint, layers: Vec<ChunkLayer>) -> Result<Chunk> {
        let Some(first) = layers.first() else {
            return Err(WorldError::corrupt(coord, "chunk has no layers"));
        };
        let (width, height) = (first.width(), first.height());
        if layers.iter().any(|l| l.width() != width || l.height() != height) {
            return Err(WorldError::corrupt(coord, "layers differ in size"));
        }
        Ok(Chunk {
            coord,
            depth: layers.len() - 1,
            layers,
        })
    }

    pub fn width(&self) -> usize {
        self.layers[0].width()
    }

    pub fn height(&self) -> usize {
        self.layers[0].height()
    }

    /// Tile extent as (rows, cols).
    pub fn extent(&self) -> IntPoint {
        IntPoint::new(self.height() as i32, self.width() as i32)
    }

    pub fn layers(&self) -> &[ChunkLayer] {
        &self.layers
    }

    pub fn has_depth(&self, depth: i32) -> bool {
        depth >= SURFACE && depth < self.depth as i32
    }

    fn layer_index(&self, depth: i32) -> Result<usize> {
        if self.has_depth(depth) {
            Ok((depth + 1) as usize)
        } else {
            Err(WorldError::out_of_bounds(
                IntPoint::new(depth, 0),
                1,
                self.layers.len(),
            ))
        }
    }

    pub fn layer(&self, depth: i32) -> Result<&ChunkLayer> {
        let index = self.layer_index(depth)?;
        Ok(&self.layers[index])
    }

    pub fn layer_mut(&mut self, depth: i32) -> Result<&mut ChunkLayer> {
        let index = self.layer_index(depth)?;
        Ok(&mut self.layers[index])
    }

    pub fn tile(&self, depth: i32, p: IntPoint) -> Result<&Tile> {
        self.layer(depth)?.tile(p)
    }

    pub fn tile_mut(&mut self, depth: i32, p: IntPoint) -> Result<&mut Tile> {
        self.layer_mut(depth)?.tile_mut(p)
    }

    pub fn set_tile(&mut self, depth: i32, p: IntPoint, kind: TileKind) -> Result<()> {
        self.layer_mut(depth)?.set_tile(p, kind)
    }

    pub fn up_stair(&self, depth: i32) -> Result<Option<IntPoint>> {
        Ok(self.layer(depth)?.up_stairs.first().copied())
    }

    pub fn down_stair(&self, depth: i32) -> Result<Option<IntPoint>> {
        Ok(self.layer(depth)?.down_stairs.first().copied())
    }

    /// True when `p` does not lie on the layer at `depth`, or the layer does
    /// not exist.
    pub fn out_of_bounds(&self, depth: i32, p: IntPoint) -> bool {
        self.layer(depth).map(|layer| !layer.in_bounds(p)).unwrap_or(true)
    }

    pub fn reset_seen(&mut self) {
        for layer in &mut self.layers {
            layer.reset_seen();
        }
    }
}

fn overlaps(room: &Room, top_left: IntPoint, bottom_right: IntPoint) -> bool {
    room.top_left.row <= bottom_right.row
        && top_left.row <= room.bottom_right.row
        && room.top_left.col <= bottom_right.col
        && top_left.col <= room.bottom_right.col
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WorldConfig {
        WorldConfig::default()
    }

    #[test]
    fn test_water_and_beach_have_no_dungeon() {
        let seeds = WorldSeeds::from_master(1);
        for biome in [Biome::Water, Biome::Beach] {
            let chunk = Chunk::generate(IntPoint::new(3, 4), biome, &config(), &seeds).unwrap();
            assert_eq!(chunk.depth, 0);
            assert_eq!(chunk.layers().len(), 1);
            assert!(chunk.layer(0).is_err());
        }
    }

    #[test]
    fn test_land_depth_and_stairs() {
        let seeds = WorldSeeds::from_master(77);
        let config = config();
        for col in 0..4 {
            let chunk = Chunk::generate(IntPoint::new(2, col), Biome::Land, &config, &seeds).unwrap();
            assert!((1..=config.chunk.max_depth).contains(&chunk.depth));
            assert_eq!(chunk.layers().len(), chunk.depth + 1);
            assert!(chunk.down_stair(SURFACE).unwrap().is_some());

            for depth in 0..chunk.depth as i32 {
                let layer = chunk.layer(depth).unwrap();
                assert_eq!(layer.up_stairs.len(), 1);
                assert_eq!(layer.spawners.len(), 1);
                let deepest = depth == chunk.depth as i32 - 1;
                assert_eq!(layer.down_stairs.is_empty(), deepest);
                assert_eq!(layer.width(), config.chunk.width);
                assert_eq!(layer.height(), config.chunk.height);
            }
        }
    }

    #[test]
    fn test_generation_is_order_independent() {
        let seeds = WorldSeeds::from_master(5);
        let config = config();
        let a = IntPoint::new(1, 1);
        let b = IntPoint::new(1, 2);

        let first_a = Chunk::generate(a, Biome::Forest, &config, &seeds).unwrap();
        let _ = Chunk::generate(b, Biome::Land, &config, &seeds).unwrap();
        let again_a = Chunk::generate(a, Biome::Forest, &config, &seeds).unwrap();

        assert_eq!(first_a.depth, again_a.depth);
        for (x, y) in first_a.layers().iter().zip(again_a.layers()) {
            assert_eq!(x.tiles, y.tiles);
        }
    }

    #[test]
    fn test_settlement_keeps_entrance() {
        let mut config = config();
        config.settlement.chance = 1.0;
        let seeds = WorldSeeds::from_master(9);
        let chunk = Chunk::generate(IntPoint::new(0, 0), Biome::Land, &config, &seeds).unwrap();
        let surface = chunk.layer(SURFACE).unwrap();
        let stair = surface.down_stairs[0];
        assert_eq!(surface.tile(stair).unwrap().kind, TileKind::DownStair);
        assert!(surface.tiles.iter().any(|(_, t)| t.kind == TileKind::BuildingWall));
    }

    #[test]
    fn test_depth_lookup_errors() {
        let mut chunk = Chunk::empty(IntPoint::ZERO, 8, 6);
        assert!(chunk.layer(SURFACE).is_ok());
        assert!(matches!(chunk.layer(0), Err(WorldError::OutOfBounds { .. })));
        assert!(chunk.layer(-2).is_err());
        assert!(chunk.tile(SURFACE, IntPoint::new(6, 0)).is_err());
        assert!(chunk.out_of_bounds(SURFACE, IntPoint::new(0, 8)));
        assert!(chunk.out_of_bounds(3, IntPoint::new(0, 0)));
        assert!(!chunk.out_of_bounds(SURFACE, IntPoint::new(5, 7)));

        chunk.set_tile(SURFACE, IntPoint::new(1, 1), TileKind::Water).unwrap();
        assert_eq!(chunk.tile(SURFACE, IntPoint::new(1, 1)).unwrap().kind, TileKind::Water);
        assert_eq!(chunk.extent(), IntPoint::new(6, 8));
    }

    #[test]
    fn test_from_layers_checks_sizes() {
        let coord = IntPoint::new(2, 2);
        let layers = vec![
            ChunkLayer::new(4, 4, TileKind::Dirt),
            ChunkLayer::new(4, 3, TileKind::SolidRock),
        ];
        assert!(matches!(
            Chunk::from_layers(coord, layers),
            Err(WorldError::CorruptPersistedChunk { .. })
        ));
        assert!(Chunk::from_layers(coord, Vec::new()).is_err());
    }

    #[test]
    fn test_reset_seen_covers_every_layer() {
        let seeds = WorldSeeds::from_master(3);
        let mut chunk = Chunk::generate(IntPoint::new(0, 1), Biome::Land, &config(), &seeds).unwrap();
        chunk.tile_mut(SURFACE, IntPoint::new(0, 0)).unwrap().seen = true;
        chunk.tile_mut(0, IntPoint::new(0, 0)).unwrap().seen = true;
        chunk.reset_seen();
        assert!(chunk.layers().iter().all(|l| l.tiles.iter().all(|(_, t)| !t.seen)));
    }
}

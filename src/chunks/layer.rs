//! One depth of a chunk: the tile grid plus the features placed on it.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::chunk::ChunkParams;
use crate::error::{Result, WorldError};
use crate::generation::{Dungeon, Room};
use crate::point::IntPoint;
use crate::tilemap::Tilemap;
use crate::tiles::{Tile, TileKind};
use crate::world_map::Biome;

/// Attempts made when looking for a free cell in a room
const PLACEMENT_ATTEMPTS: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnerKind {
    Kobold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawner {
    pub position: IntPoint,
    /// Dungeon depth the spawner lives on
    pub depth: i32,
    pub kind: SpawnerKind,
}

/// A plant drawn over the ground it grows on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Plant {
    pub position: IntPoint,
    pub kind: TileKind,
    /// Tile restored when the plant dies
    pub ground: TileKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Boots,
    Sword,
    Corpse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemDrop {
    pub position: IntPoint,
    pub kind: ItemKind,
}

#[derive(Clone, Debug)]
pub struct ChunkLayer {
    pub tiles: Tilemap<Tile>,
    pub up_stairs: Vec<IntPoint>,
    pub down_stairs: Vec<IntPoint>,
    pub rooms: Vec<Room>,
    pub spawners: Vec<Spawner>,
    pub plants: Vec<Plant>,
    pub items: Vec<ItemDrop>,
    pub has_layer_below: bool,
}

impl ChunkLayer {
    pub fn new(width: usize, height: usize, fill: TileKind) -> Self {
        Self::from_tiles(Tilemap::new_with(width, height, Tile::new(fill)), false)
    }

    /// Wrap an existing grid, rebuilding the stair lists from its tiles.
    pub fn from_tiles(tiles: Tilemap<Tile>, has_layer_below: bool) -> Self {
        let mut up_stairs = Vec::new();
        let mut down_stairs = Vec::new();
        for (p, tile) in tiles.iter() {
            match tile.kind {
                TileKind::UpStair => up_stairs.push(p),
                TileKind::DownStair => down_stairs.push(p),
                _ => {}
            }
        }
        Self {
            tiles,
            up_stairs,
            down_stairs,
            rooms: Vec::new(),
            spawners: Vec::new(),
            plants: Vec::new(),
            items: Vec::new(),
            has_layer_below,
        }
    }

    pub fn from_dungeon(dungeon: &Dungeon, has_layer_below: bool) -> Self {
        let mut layer = Self::from_tiles(dungeon.to_tiles(), has_layer_below);
        layer.rooms = dungeon.rooms.clone();
        layer
    }

    /// Surface layer for a chunk of the given biome. Land with dungeons below
    /// gets a cleared entrance holding the down staircase.
    pub fn overworld(
        width: usize,
        height: usize,
        biome: Biome,
        params: &ChunkParams,
        has_layer_below: bool,
        rng: &mut ChaCha8Rng,
    ) -> Result<ChunkLayer> {
        let tiles = match biome {
            Biome::Land | Biome::Forest => {
                let (tree_odds, big_tree_odds) = if biome == Biome::Forest {
                    (params.forest_tree_odds, params.big_tree_odds)
                } else {
                    (params.land_tree_odds, 0)
                };
                Tilemap::from_fn(width, height, |_| {
                    let kind = if rng.gen_range(0..tree_odds.max(1)) == 0 {
                        if big_tree_odds > 0 && rng.gen_range(0..big_tree_odds) == 0 {
                            TileKind::BigTree
                        } else {
                            TileKind::Tree
                        }
                    } else if rng.gen_range(0..params.grass_odds.max(1)) == 0 {
                        TileKind::GrassDirt
                    } else {
                        TileKind::Dirt
                    };
                    Tile::new(kind)
                })
            }
            Biome::Water => Tilemap::from_fn(width, height, |_| {
                if rng.gen_range(0..10) == 0 {
                    Tile::new(TileKind::LightWater)
                } else {
                    Tile::new(TileKind::Water)
                }
            }),
            Biome::Beach => Tilemap::from_fn(width, height, |_| {
                if rng.gen_range(0..4) == 0 {
                    Tile::new(TileKind::DarkSand)
                } else {
                    Tile::new(TileKind::Sand)
                }
            }),
        };

        let mut layer = Self::from_tiles(tiles, false);
        if !biome.is_land() {
            return Ok(layer);
        }

        for _ in 0..(width * height) / params.bush_area.max(1) {
            let p = IntPoint::new(rng.gen_range(0..height as i32), rng.gen_range(0..width as i32));
            let ground = layer.tile(p)?.kind;
            if matches!(ground, TileKind::Dirt | TileKind::GrassDirt) && layer.plant_at(p).is_none() {
                layer.add_plant(p, TileKind::Bush)?;
            }
        }

        if has_layer_below {
            layer.has_layer_below = true;
            layer.make_entrance(rng)?;
        }
        Ok(layer)
    }

    /// Clear a 3x3 patch of dirt and put the down staircase in its middle.
    fn make_entrance(&mut self, rng: &mut ChaCha8Rng) -> Result<IntPoint> {
        if self.tiles.width < 5 || self.tiles.height < 5 {
            return Err(WorldError::parameter(format!(
                "{}x{} surface is too small for a dungeon entrance",
                self.tiles.width, self.tiles.height
            )));
        }
        let center = IntPoint::new(
            rng.gen_range(2..self.tiles.height as i32 - 2),
            rng.gen_range(2..self.tiles.width as i32 - 2),
        );
        let clearing = Room::new(center - IntPoint::new(2, 2), center + IntPoint::new(2, 2));
        self.plants.retain(|plant| !clearing.contains_interior(plant.position));
        for p in clearing.interior_points() {
            self.set_tile(p, TileKind::Dirt)?;
        }
        self.rooms.push(clearing);
        self.make_stairs_at(center, TileKind::DownStair)?;
        Ok(center)
    }

    pub fn width(&self) -> usize {
        self.tiles.width
    }

    pub fn height(&self) -> usize {
        self.tiles.height
    }

    pub fn in_bounds(&self, p: IntPoint) -> bool {
        self.tiles.in_bounds(p)
    }

    pub fn tile(&self, p: IntPoint) -> Result<&Tile> {
        self.tiles.try_get(p)
    }

    pub fn tile_mut(&mut self, p: IntPoint) -> Result<&mut Tile> {
        self.tiles.try_get_mut(p)
    }

    /// Change the kind of a tile, keeping its vision flags.
    pub fn set_tile(&mut self, p: IntPoint, kind: TileKind) -> Result<()> {
        self.tile_mut(p)?.kind = kind;
        Ok(())
    }

    /// Place an up staircase in a random room and, when there is a floor below,
    /// a down staircase in another random room cell.
    pub fn make_stairs(&mut self, rng: &mut ChaCha8Rng) -> Result<()> {
        let up = self
            .free_room_cell(rng)
            .ok_or_else(|| WorldError::parameter("layer has no free room cell for an up staircase"))?;
        self.make_stairs_at(up, TileKind::UpStair)?;

        if self.has_layer_below {
            let down = self
                .free_room_cell(rng)
                .ok_or_else(|| WorldError::parameter("layer has no free room cell for a down staircase"))?;
            self.make_stairs_at(down, TileKind::DownStair)?;
        }
        Ok(())
    }

    pub fn make_stairs_at(&mut self, p: IntPoint, kind: TileKind) -> Result<()> {
        let stairs = match kind {
            TileKind::UpStair => &mut self.up_stairs,
            TileKind::DownStair => &mut self.down_stairs,
            other => {
                return Err(WorldError::parameter(format!("{:?} is not a staircase", other)));
            }
        };
        self.tiles.try_get_mut(p)?.kind = kind;
        stairs.push(p);
        Ok(())
    }

    /// Put a kobold spawner on a free floor cell of a random room.
    pub fn make_spawner(&mut self, depth: i32, rng: &mut ChaCha8Rng) -> Result<Option<IntPoint>> {
        let Some(p) = self.free_room_cell(rng) else {
            return Ok(None);
        };
        self.set_tile(p, TileKind::KoboldSpawner)?;
        self.spawners.push(Spawner {
            position: p,
            depth,
            kind: SpawnerKind::Kobold,
        });
        Ok(Some(p))
    }

    /// A passable, feature-free cell inside a random room. Falls back to a scan
    /// of every room when random picks keep colliding.
    fn free_room_cell(&self, rng: &mut ChaCha8Rng) -> Option<IntPoint> {
        if self.rooms.is_empty() {
            return None;
        }
        let is_free = |p: IntPoint| {
            self.tiles
                .get(p)
                .map(|t| t.is_passable() && !t.kind.is_stair())
                .unwrap_or(false)
        };
        for _ in 0..PLACEMENT_ATTEMPTS {
            let room = self.rooms[rng.gen_range(0..self.rooms.len())];
            if room.inner_width() < 1 || room.inner_height() < 1 {
                continue;
            }
            let p = room.random_interior_point(rng);
            if is_free(p) {
                return Some(p);
            }
        }
        self.rooms.iter().flat_map(|room| room.interior_points()).find(|&p| is_free(p))
    }

    pub fn add_plant(&mut self, p: IntPoint, kind: TileKind) -> Result<()> {
        let tile = self.tiles.try_get_mut(p)?;
        let ground = tile.kind;
        tile.kind = kind;
        self.plants.push(Plant { position: p, kind, ground });
        Ok(())
    }

    /// Remove the plant at `p`, restoring the ground under it.
    pub fn kill_plant(&mut self, p: IntPoint) -> Result<Option<Plant>> {
        let Some(index) = self.plants.iter().position(|plant| plant.position == p) else {
            return Ok(None);
        };
        let plant = self.plants.swap_remove(index);
        self.set_tile(p, plant.ground)?;
        Ok(Some(plant))
    }

    pub fn plant_at(&self, p: IntPoint) -> Option<&Plant> {
        self.plants.iter().find(|plant| plant.position == p)
    }

    pub fn add_item(&mut self, p: IntPoint, kind: ItemKind) -> Result<()> {
        if !self.in_bounds(p) {
            return Err(WorldError::out_of_bounds(p, self.width(), self.height()));
        }
        self.items.push(ItemDrop { position: p, kind });
        Ok(())
    }

    pub fn items_at(&self, p: IntPoint) -> impl Iterator<Item = &ItemDrop> {
        self.items.iter().filter(move |item| item.position == p)
    }

    pub fn reset_seen(&mut self) {
        for (_, tile) in self.tiles.iter_mut() {
            tile.seen = false;
            tile.visible = false;
        }
    }

    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width() + 1) * self.height());
        for row in 0..self.height() as i32 {
            for col in 0..self.width() as i32 {
                let glyph = self.tiles.get(IntPoint::new(row, col)).map(Tile::glyph).unwrap_or(' ');
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

//! Chunk streaming window
//!
//! Keeps a square window of chunks around the player. Shifting the window
//! evicts the row or column falling off one side to the [`ChunkStore`] and
//! sources the row or column entering on the other side, from the store when it
//! was visited before and from the generators otherwise.

use tracing::{debug, info, info_span, trace, warn};

use super::chunk::Chunk;
use super::storage::ChunkStore;
use super::view::TileRef;
use crate::config::WorldConfig;
use crate::error::{Result, WorldError};
use crate::point::IntPoint;
use crate::seeds::WorldSeeds;
use crate::tilemap::Tilemap;
use crate::tiles::{Tile, TileKind};
use crate::world_map::{Biome, WorldMap};

/// Everything needed to synthesize a chunk that was never visited.
#[derive(Clone, Debug)]
pub struct ChunkSource {
    world_map: WorldMap,
    config: WorldConfig,
    seeds: WorldSeeds,
}

impl ChunkSource {
    pub fn new(world_map: WorldMap, config: WorldConfig, seeds: WorldSeeds) -> Self {
        Self {
            world_map,
            config,
            seeds,
        }
    }

    pub fn world_map(&self) -> &WorldMap {
        &self.world_map
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn seeds(&self) -> &WorldSeeds {
        &self.seeds
    }

    /// Tiles per chunk as (rows, cols).
    pub fn chunk_extent(&self) -> IntPoint {
        IntPoint::new(self.config.chunk.height as i32, self.config.chunk.width as i32)
    }

    /// Biome of a world map cell. Beyond the map is open sea.
    pub fn biome_at(&self, coord: IntPoint) -> Biome {
        self.world_map.biome_at(coord).unwrap_or(Biome::Water)
    }

    /// Generate the chunk at `coord`, falling back to an empty chunk when the
    /// generators fail.
    pub fn generate(&self, coord: IntPoint) -> Chunk {
        let biome = self.biome_at(coord);
        match Chunk::generate(coord, biome, &self.config, &self.seeds) {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!(%coord, ?biome, error = %e, "chunk generation failed, using an empty chunk");
                Chunk::empty(coord, self.config.chunk.width, self.config.chunk.height)
            }
        }
    }
}

pub struct ChunkStreamingBuffer<S: ChunkStore> {
    diameter: usize,
    /// World coordinate of the top-left chunk
    offset: IntPoint,
    /// Row-major, `diameter * diameter` chunks
    chunks: Vec<Chunk>,
    source: ChunkSource,
    store: S,
}

impl<S: ChunkStore> ChunkStreamingBuffer<S> {
    /// Build a window of `diameter` chunks centred on `center` and load every
    /// chunk in it.
    pub fn new(diameter: usize, center: IntPoint, source: ChunkSource, store: S) -> Result<Self> {
        if diameter == 0 || diameter % 2 == 0 {
            return Err(WorldError::parameter(format!("window diameter {} must be odd", diameter)));
        }
        source.config().chunk.validate()?;
        let map = source.world_map();
        if !map.in_bounds(center) {
            return Err(WorldError::out_of_bounds(center, map.width(), map.height()));
        }

        let radius = (diameter / 2) as i32;
        let mut buffer = Self {
            diameter,
            offset: center - IntPoint::new(radius, radius),
            chunks: Vec::new(),
            source,
            store,
        };
        buffer.chunks = buffer.fetch_window(buffer.offset)?;
        info!(%center, diameter, "chunk window loaded");
        Ok(buffer)
    }

    fn fetch_window(&mut self, offset: IntPoint) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::with_capacity(self.diameter * self.diameter);
        for row in 0..self.diameter as i32 {
            for col in 0..self.diameter as i32 {
                chunks.push(self.fetch(offset + IntPoint::new(row, col))?);
            }
        }
        Ok(chunks)
    }

    /// Saved copy when there is one, a freshly generated chunk otherwise.
    fn fetch(&mut self, coord: IntPoint) -> Result<Chunk> {
        if let Some(chunk) = self.store.load(coord)? {
            let expected = self.source.chunk_extent();
            if chunk.extent() != expected {
                return Err(WorldError::corrupt(
                    coord,
                    format!("extent {} does not match the configured {}", chunk.extent(), expected),
                ));
            }
            trace!(%coord, "chunk loaded from store");
            return Ok(chunk);
        }
        Ok(self.source.generate(coord))
    }

    pub fn diameter(&self) -> usize {
        self.diameter
    }

    pub fn offset(&self) -> IntPoint {
        self.offset
    }

    pub fn center(&self) -> IntPoint {
        let radius = (self.diameter / 2) as i32;
        self.offset + IntPoint::new(radius, radius)
    }

    pub fn source(&self) -> &ChunkSource {
        &self.source
    }

    pub fn chunk_extent(&self) -> IntPoint {
        self.source.chunk_extent()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save every live chunk and hand back the store.
    pub fn into_store(mut self) -> Result<S> {
        self.flush()?;
        Ok(self.store)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    pub fn contains(&self, coord: IntPoint) -> bool {
        self.local_index(coord - self.offset).is_some()
    }

    fn local_index(&self, local: IntPoint) -> Option<usize> {
        let d = self.diameter as i32;
        if local.row < 0 || local.col < 0 || local.row >= d || local.col >= d {
            return None;
        }
        Some(local.row as usize * self.diameter + local.col as usize)
    }

    /// Chunk at a window-relative position.
    pub fn chunk_local(&self, local: IntPoint) -> Result<&Chunk> {
        let index = self
            .local_index(local)
            .ok_or_else(|| WorldError::out_of_bounds(local, self.diameter, self.diameter))?;
        Ok(&self.chunks[index])
    }

    /// Chunk at a world coordinate.
    pub fn chunk_abs(&self, coord: IntPoint) -> Result<&Chunk> {
        self.chunk_local(coord - self.offset)
    }

    pub fn chunk_abs_mut(&mut self, coord: IntPoint) -> Result<&mut Chunk> {
        let local = coord - self.offset;
        let index = self
            .local_index(local)
            .ok_or_else(|| WorldError::out_of_bounds(local, self.diameter, self.diameter))?;
        Ok(&mut self.chunks[index])
    }

    pub fn resolve(&self, tile: TileRef) -> Result<&Tile> {
        self.chunk_abs(tile.chunk)?.tile(tile.depth, tile.local)
    }

    pub fn resolve_mut(&mut self, tile: TileRef) -> Result<&mut Tile> {
        self.chunk_abs_mut(tile.chunk)?.tile_mut(tile.depth, tile.local)
    }

    /// Move the window one chunk along each non-zero component of `direction`.
    pub fn shift(&mut self, direction: IntPoint) -> Result<()> {
        if !(-1..=1).contains(&direction.row) || !(-1..=1).contains(&direction.col) {
            return Err(WorldError::parameter(format!("shift {} is not a unit step", direction)));
        }
        if direction == IntPoint::ZERO {
            return Ok(());
        }
        let target = self.center() + direction;
        let map = self.source.world_map();
        if !map.in_bounds(target) {
            return Err(WorldError::out_of_bounds(target, map.width(), map.height()));
        }

        let _span = info_span!("stream_shift", from = %self.offset, %direction).entered();
        let d = self.diameter;
        let offset = self.offset + direction;

        // Source every entering chunk before the store or the window is touched,
        // so a corrupt chunk leaves the buffer as it was
        let mut fresh = Vec::new();
        for index in 0..d * d {
            let local = IntPoint::new((index / d) as i32, (index % d) as i32);
            if self.local_index(local + direction).is_none() {
                fresh.push((index, self.fetch(offset + local)?));
            }
        }
        for index in 0..d * d {
            let local = IntPoint::new((index / d) as i32, (index % d) as i32);
            if self.local_index(local - direction).is_none() {
                self.store.save(&self.chunks[index])?;
            }
        }

        // Slot (r, c) takes the chunk from (r, c) + direction; slots that wrap
        // around are overwritten by the fresh chunks
        match direction.row {
            1 => self.chunks.rotate_left(d),
            -1 => self.chunks.rotate_right(d),
            _ => {}
        }
        if direction.col != 0 {
            for row in self.chunks.chunks_mut(d) {
                if direction.col > 0 {
                    row.rotate_left(1);
                } else {
                    row.rotate_right(1);
                }
            }
        }
        for (index, chunk) in fresh {
            self.chunks[index] = chunk;
        }
        self.offset = offset;
        debug!(offset = %self.offset, "window shifted");
        Ok(())
    }

    /// Shift until the window is centred on `target`. Jumps further than the
    /// window reloads it from scratch.
    pub fn recenter(&mut self, target: IntPoint) -> Result<()> {
        let map = self.source.world_map();
        if !map.in_bounds(target) {
            return Err(WorldError::out_of_bounds(target, map.width(), map.height()));
        }

        let delta = target - self.center();
        let d = self.diameter as i32;
        if delta.row.abs() >= d || delta.col.abs() >= d {
            let radius = d / 2;
            let offset = target - IntPoint::new(radius, radius);
            let chunks = self.fetch_window(offset)?;
            self.flush()?;
            self.chunks = chunks;
            self.offset = offset;
            info!(%target, "chunk window reloaded");
            return Ok(());
        }

        while self.center() != target {
            let step = target - self.center();
            self.shift(IntPoint::new(step.row.signum(), step.col.signum()))?;
        }
        Ok(())
    }

    /// Save every live chunk.
    pub fn flush(&mut self) -> Result<()> {
        for chunk in &self.chunks {
            self.store.save(chunk)?;
        }
        debug!(chunks = self.chunks.len(), "chunk window flushed");
        Ok(())
    }

    /// Square of tiles around an entity. Cells whose chunk is outside the
    /// window, or has no layer at `depth`, read as block walls.
    pub fn get_surroundings(&self, chunk: IntPoint, coords: IntPoint, depth: i32, radius: usize) -> Tilemap<Tile> {
        let extent = self.chunk_extent();
        let center = IntPoint::absolute(chunk, coords, extent);
        let size = radius * 2 + 1;
        let corner = center - IntPoint::new(radius as i32, radius as i32);
        Tilemap::from_fn(size, size, |p| {
            let (chunk, local) = IntPoint::split_absolute(corner + p, extent);
            self.chunk_abs(chunk)
                .and_then(|c| c.tile(depth, local))
                .copied()
                .unwrap_or(Tile::new(TileKind::BlockWall))
        })
    }
}

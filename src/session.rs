//! A player walking through the streamed world.
//!
//! Every tick runs in the same order: undo the field of view on the current
//! canvas, move, shift the chunk window if the player changed chunk, rebuild
//! the render buffer and canvas, then draw the field of view again.

use tracing::{debug, info};

use crate::chunks::{Canvas, CanvasView, ChunkStore, ChunkStreamingBuffer, RenderBuffer, SURFACE};
use crate::config::ViewParams;
use crate::error::{Result, WorldError};
use crate::point::{Direction, IntPoint};
use crate::tilemap::Tilemap;
use crate::tiles::{Tile, TileKind};
use crate::visibility::SightLines;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Player {
    /// World map coordinate of the chunk the player stands in
    pub chunk: IntPoint,
    /// Tile coordinate inside that chunk
    pub local: IntPoint,
    /// `SURFACE` or a dungeon floor
    pub depth: i32,
}

pub struct Session<S: ChunkStore> {
    buffer: ChunkStreamingBuffer<S>,
    player: Player,
    render: RenderBuffer,
    canvas: Canvas,
    sight: SightLines,
    view: ViewParams,
}

impl<S: ChunkStore> Session<S> {
    /// Start on the surface of the window's centre chunk, on the passable tile
    /// closest to the middle of the chunk.
    pub fn new(buffer: ChunkStreamingBuffer<S>) -> Result<Self> {
        if buffer.diameter() < 3 {
            return Err(WorldError::parameter("a session needs a window of at least 3x3 chunks"));
        }
        let view = buffer.source().config().view.clone();
        let chunk = buffer.center();
        let local = spawn_point(buffer.chunk_abs(chunk)?.layer(SURFACE)?.tiles.iter(), buffer.chunk_extent())
            .ok_or_else(|| WorldError::parameter(format!("chunk {} has no passable surface tile", chunk)))?;

        let render = RenderBuffer::build(&buffer, chunk, SURFACE);
        let canvas = Canvas::extract(&render, local, view.rows, view.cols);
        let mut session = Self {
            buffer,
            player: Player {
                chunk,
                local,
                depth: SURFACE,
            },
            render,
            canvas,
            sight: SightLines::new(view.surface_sight_radius),
            view,
        };
        session.draw_visibility();
        info!(%chunk, %local, "session started");
        Ok(session)
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn sight(&self) -> &SightLines {
        &self.sight
    }

    pub fn buffer(&self) -> &ChunkStreamingBuffer<S> {
        &self.buffer
    }

    pub fn tile_under_player(&self) -> Result<Tile> {
        self.buffer
            .chunk_abs(self.player.chunk)?
            .tile(self.player.depth, self.player.local)
            .copied()
    }

    /// Copy of what is on screen.
    pub fn snapshot(&self) -> Tilemap<Tile> {
        self.canvas.snapshot(&self.buffer)
    }

    /// Tiles around the player, for AI queries.
    pub fn surroundings(&self, radius: usize) -> Tilemap<Tile> {
        self.buffer
            .get_surroundings(self.player.chunk, self.player.local, self.player.depth, radius)
    }

    /// Step one tile. Returns `Ok(false)` when the way is blocked.
    pub fn move_player(&mut self, direction: Direction) -> Result<bool> {
        let extent = self.buffer.chunk_extent();
        let target = IntPoint::absolute(self.player.chunk, self.player.local, extent) + direction.offset();
        let (chunk, local) = IntPoint::split_absolute(target, extent);

        if chunk != self.player.chunk && !self.buffer.source().world_map().in_bounds(chunk) {
            return Ok(false);
        }
        let tile = match self.buffer.chunk_abs(chunk).and_then(|c| c.tile(self.player.depth, local)) {
            Ok(tile) => *tile,
            Err(WorldError::OutOfBounds { .. }) => return Ok(false),
            Err(e) => return Err(e),
        };
        if !tile.is_passable() {
            return Ok(false);
        }

        self.place(Player {
            chunk,
            local,
            depth: self.player.depth,
        })?;
        Ok(true)
    }

    /// Take the down staircase under the player.
    pub fn descend(&mut self) -> Result<bool> {
        if self.tile_under_player()?.kind != TileKind::DownStair {
            return Ok(false);
        }
        let depth = self.player.depth + 1;
        let Some(arrival) = self.buffer.chunk_abs(self.player.chunk)?.up_stair(depth)? else {
            return Ok(false);
        };
        debug!(depth, "descending");
        self.place(Player {
            chunk: self.player.chunk,
            local: arrival,
            depth,
        })?;
        Ok(true)
    }

    /// Take the up staircase under the player.
    pub fn ascend(&mut self) -> Result<bool> {
        if self.tile_under_player()?.kind != TileKind::UpStair {
            return Ok(false);
        }
        let depth = self.player.depth - 1;
        let Some(arrival) = self.buffer.chunk_abs(self.player.chunk)?.down_stair(depth)? else {
            return Ok(false);
        };
        debug!(depth, "ascending");
        self.place(Player {
            chunk: self.player.chunk,
            local: arrival,
            depth,
        })?;
        Ok(true)
    }

    /// Put the player somewhere, shifting the window and updating the view.
    pub fn place(&mut self, player: Player) -> Result<()> {
        let map = self.buffer.source().world_map();
        if !map.in_bounds(player.chunk) {
            return Err(WorldError::out_of_bounds(player.chunk, map.width(), map.height()));
        }
        let extent = self.buffer.chunk_extent();
        if !(0..extent.row).contains(&player.local.row) || !(0..extent.col).contains(&player.local.col) {
            return Err(WorldError::out_of_bounds(player.local, extent.col as usize, extent.row as usize));
        }
        if self.buffer.contains(player.chunk) {
            self.buffer.chunk_abs(player.chunk)?.layer(player.depth)?;
        }

        self.undo_visibility();
        if player.chunk != self.buffer.center() {
            self.buffer.recenter(player.chunk)?;
        }
        // A chunk brought in by a long jump is only known once loaded
        if let Err(e) = self.buffer.chunk_abs(player.chunk).and_then(|c| c.layer(player.depth).map(|_| ())) {
            let previous = self.player;
            self.buffer.recenter(previous.chunk)?;
            self.show(previous);
            return Err(e);
        }
        self.show(player);
        Ok(())
    }

    fn show(&mut self, player: Player) {
        self.player = player;
        let radius = if player.depth == SURFACE {
            self.view.surface_sight_radius
        } else {
            self.view.underground_sight_radius
        };
        self.sight.recalculate(radius);
        if self.render.is_stale(player.chunk, player.depth) {
            self.render = RenderBuffer::build(&self.buffer, player.chunk, player.depth);
        }
        self.canvas = Canvas::extract(&self.render, player.local, self.view.rows, self.view.cols);
        self.draw_visibility();
    }

    pub fn refresh_visibility(&mut self) {
        let origin = self.canvas.player_position();
        let mut view = CanvasView {
            canvas: &self.canvas,
            buffer: &mut self.buffer,
        };
        self.sight.refresh(origin, &mut view);
    }

    fn undo_visibility(&mut self) {
        let origin = self.canvas.player_position();
        let mut view = CanvasView {
            canvas: &self.canvas,
            buffer: &mut self.buffer,
        };
        self.sight.undo(origin, &mut view);
    }

    fn draw_visibility(&mut self) {
        let origin = self.canvas.player_position();
        let mut view = CanvasView {
            canvas: &self.canvas,
            buffer: &mut self.buffer,
        };
        self.sight.draw(origin, &mut view);
    }

    pub fn flush(&mut self) -> Result<()> {
        self.buffer.flush()
    }

    pub fn into_store(self) -> Result<S> {
        self.buffer.into_store()
    }
}

/// Passable tile nearest the middle of the grid.
fn spawn_point<'a>(tiles: impl Iterator<Item = (IntPoint, &'a Tile)>, extent: IntPoint) -> Option<IntPoint> {
    let middle = IntPoint::new(extent.row / 2, extent.col / 2);
    tiles
        .filter(|(_, tile)| tile.is_passable())
        .map(|(p, _)| p)
        .min_by_key(|&p| (p.chebyshev(middle), p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::{ChunkSource, MemoryStore};
    use crate::config::WorldConfig;
    use crate::seeds::WorldSeeds;
    use crate::world_map::{Biome, WorldMap};

    fn session_on(biome: Biome) -> Session<MemoryStore> {
        let mut config = WorldConfig::default();
        config.chunk.width = 40;
        config.chunk.height = 24;
        config.chunk.max_depth = 2;
        config.settlement.chance = 0.0;
        config.view.rows = 21;
        config.view.cols = 41;
        let map = WorldMap::from_tiles(Tilemap::new_with(8, 8, biome));
        let source = ChunkSource::new(map, config, WorldSeeds::from_master(19));
        let buffer = ChunkStreamingBuffer::new(3, IntPoint::new(4, 4), source, MemoryStore::new()).unwrap();
        Session::new(buffer).unwrap()
    }

    fn set_surface(session: &mut Session<MemoryStore>, chunk: IntPoint, local: IntPoint, kind: TileKind) {
        session
            .buffer
            .chunk_abs_mut(chunk)
            .unwrap()
            .set_tile(SURFACE, local, kind)
            .unwrap();
    }

    #[test]
    fn test_spawn_is_passable_and_lit() {
        let session = session_on(Biome::Land);
        let player = session.player();
        assert_eq!(player.chunk, IntPoint::new(4, 4));
        assert_eq!(player.depth, SURFACE);
        let tile = session.tile_under_player().unwrap();
        assert!(tile.is_passable());
        assert!(tile.visible && tile.seen);
        assert_eq!(session.sight().radius(), 15);
    }

    #[test]
    fn test_water_chunk_cannot_host_a_player() {
        let config = WorldConfig::default();
        let map = WorldMap::from_tiles(Tilemap::new_with(5, 5, Biome::Water));
        let source = ChunkSource::new(map, config, WorldSeeds::from_master(1));
        let buffer = ChunkStreamingBuffer::new(3, IntPoint::new(2, 2), source, MemoryStore::new()).unwrap();
        assert!(Session::new(buffer).is_err());
    }

    #[test]
    fn test_move_and_block() {
        let mut session = session_on(Biome::Land);
        let start = session.player();
        let right = start.local + Direction::Right.offset();
        let left = start.local + Direction::Left.offset();
        set_surface(&mut session, start.chunk, right, TileKind::Dirt);
        set_surface(&mut session, start.chunk, left, TileKind::Tree);

        assert!(!session.move_player(Direction::Left).unwrap());
        assert_eq!(session.player(), start);

        assert!(session.move_player(Direction::Right).unwrap());
        assert_eq!(session.player().local, right);
        assert!(session.tile_under_player().unwrap().visible);
        assert_eq!(session.canvas().cell(session.canvas().player_position()).unwrap().local, right);
    }

    #[test]
    fn test_crossing_a_chunk_edge_shifts_window() {
        let mut session = session_on(Biome::Land);
        let chunk = IntPoint::new(4, 4);
        let edge = IntPoint::new(10, 39);
        set_surface(&mut session, chunk, edge, TileKind::Dirt);
        set_surface(&mut session, IntPoint::new(4, 5), IntPoint::new(10, 0), TileKind::Dirt);
        session
            .place(Player {
                chunk,
                local: edge,
                depth: SURFACE,
            })
            .unwrap();

        assert!(session.move_player(Direction::Right).unwrap());
        let player = session.player();
        assert_eq!(player.chunk, IntPoint::new(4, 5));
        assert_eq!(player.local, IntPoint::new(10, 0));
        assert_eq!(session.buffer().center(), IntPoint::new(4, 5));
        assert!(session.tile_under_player().unwrap().seen);
        // The chunk column that fell out of the window was saved
        assert!(session.buffer().store().contains(IntPoint::new(4, 3)));
    }

    #[test]
    fn test_stairs_round_trip() {
        let mut session = session_on(Biome::Land);
        let chunk = session.player().chunk;
        let stair = session.buffer().chunk_abs(chunk).unwrap().down_stair(SURFACE).unwrap().unwrap();
        session
            .place(Player {
                chunk,
                local: stair,
                depth: SURFACE,
            })
            .unwrap();
        assert!(session.descend().unwrap());
        let below = session.player();
        assert_eq!(below.depth, 0);
        assert_eq!(session.tile_under_player().unwrap().kind, TileKind::UpStair);
        assert_eq!(session.sight().radius(), 10);

        assert!(session.ascend().unwrap());
        assert_eq!(session.player().depth, SURFACE);
        assert_eq!(session.player().local, stair);
        assert_eq!(session.sight().radius(), 15);
    }

    #[test]
    fn test_place_rejects_positions_outside_the_chunk() {
        let mut session = session_on(Biome::Land);
        let start = session.player();

        let below_edge = Player { local: IntPoint::new(24, 0), ..start };
        assert!(matches!(session.place(below_edge), Err(WorldError::OutOfBounds { .. })));
        let negative = Player { local: IntPoint::new(3, -1), ..start };
        assert!(matches!(session.place(negative), Err(WorldError::OutOfBounds { .. })));
        let too_deep = Player { depth: 5, ..start };
        assert!(matches!(session.place(too_deep), Err(WorldError::OutOfBounds { .. })));
        let above_surface = Player { depth: SURFACE - 1, ..start };
        assert!(matches!(session.place(above_surface), Err(WorldError::OutOfBounds { .. })));

        assert_eq!(session.player(), start);
        assert!(session.tile_under_player().unwrap().visible);
    }

    #[test]
    fn test_far_placement_without_the_floor_goes_back() {
        let mut session = session_on(Biome::Land);
        let start = session.player();
        let far = Player {
            chunk: IntPoint::new(0, 0),
            local: IntPoint::new(1, 1),
            depth: 5,
        };
        assert!(matches!(session.place(far), Err(WorldError::OutOfBounds { .. })));
        assert_eq!(session.player(), start);
        assert_eq!(session.buffer().center(), start.chunk);
        assert!(session.tile_under_player().unwrap().visible);
    }

    #[test]
    fn test_snapshot_matches_canvas() {
        let session = session_on(Biome::Beach);
        let snapshot = session.snapshot();
        assert_eq!((snapshot.height, snapshot.width), (21, 41));
        let centre = snapshot.get(session.canvas().player_position()).unwrap();
        assert_eq!(centre.id(), session.tile_under_player().unwrap().id());
        assert!(centre.visible);

        let around = session.surroundings(2);
        assert_eq!(around.get(IntPoint::new(2, 2)).unwrap().id(), centre.id());
    }
}

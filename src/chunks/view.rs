//! Render buffer and on-screen canvas.
//!
//! Neither holds tile references. Cells are [`TileRef`]s resolved through the
//! streaming buffer on every read, so a window shift can never leave them
//! dangling; at worst a stale reference resolves to an error.

use super::storage::ChunkStore;
use super::streaming::ChunkStreamingBuffer;
use crate::point::IntPoint;
use crate::tilemap::Tilemap;
use crate::tiles::{Tile, TileKind};
use crate::visibility::VisionGrid;

/// Stable address of one tile in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileRef {
    pub chunk: IntPoint,
    pub depth: i32,
    pub local: IntPoint,
}

/// Tile addresses covering the 3x3 chunk neighbourhood of the player's chunk,
/// at one depth. Cells of chunks outside the window, or without that depth,
/// are `None`.
#[derive(Clone, Debug)]
pub struct RenderBuffer {
    center_chunk: IntPoint,
    depth: i32,
    extent: IntPoint,
    cells: Tilemap<Option<TileRef>>,
}

impl RenderBuffer {
    pub fn build<S: ChunkStore>(buffer: &ChunkStreamingBuffer<S>, center_chunk: IntPoint, depth: i32) -> Self {
        let extent = buffer.chunk_extent();
        let origin = center_chunk - IntPoint::new(1, 1);
        let cells = Tilemap::from_fn(extent.col as usize * 3, extent.row as usize * 3, |p| {
            let chunk = origin + IntPoint::new(p.row.div_euclid(extent.row), p.col.div_euclid(extent.col));
            let local = IntPoint::new(p.row.rem_euclid(extent.row), p.col.rem_euclid(extent.col));
            let present = buffer.chunk_abs(chunk).map(|c| c.has_depth(depth)).unwrap_or(false);
            present.then_some(TileRef { chunk, depth, local })
        });
        Self {
            center_chunk,
            depth,
            extent,
            cells,
        }
    }

    pub fn center_chunk(&self) -> IntPoint {
        self.center_chunk
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Whether the player has left the chunk or depth this buffer was built for.
    pub fn is_stale(&self, chunk: IntPoint, depth: i32) -> bool {
        chunk != self.center_chunk || depth != self.depth
    }

    /// Buffer cell of a tile in the centre chunk.
    pub fn position_of(&self, local: IntPoint) -> IntPoint {
        self.extent + local
    }

    pub fn cell(&self, p: IntPoint) -> Option<TileRef> {
        self.cells.get(p).copied().flatten()
    }

    pub fn cells(&self) -> &Tilemap<Option<TileRef>> {
        &self.cells
    }
}

/// Fixed-size window cut from the render buffer around the player.
#[derive(Clone, Debug)]
pub struct Canvas {
    cells: Tilemap<Option<TileRef>>,
}

impl Canvas {
    pub fn extract(render: &RenderBuffer, player_local: IntPoint, rows: usize, cols: usize) -> Self {
        let corner = render.position_of(player_local) - IntPoint::new(rows as i32 / 2, cols as i32 / 2);
        Self {
            cells: Tilemap::from_fn(cols, rows, |p| render.cell(corner + p)),
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.height
    }

    pub fn cols(&self) -> usize {
        self.cells.width
    }

    /// Where the player sits on the canvas.
    pub fn player_position(&self) -> IntPoint {
        IntPoint::new(self.rows() as i32 / 2, self.cols() as i32 / 2)
    }

    pub fn cell(&self, p: IntPoint) -> Option<TileRef> {
        self.cells.get(p).copied().flatten()
    }

    /// Copy of the canvas tiles; cells with no tile behind them are block walls.
    pub fn snapshot<S: ChunkStore>(&self, buffer: &ChunkStreamingBuffer<S>) -> Tilemap<Tile> {
        Tilemap::from_fn(self.cols(), self.rows(), |p| {
            self.cell(p)
                .and_then(|r| buffer.resolve(r).ok())
                .copied()
                .unwrap_or(Tile::new(TileKind::BlockWall))
        })
    }
}

/// A canvas bound to the chunks it points into, for the field of view.
pub struct CanvasView<'a, S: ChunkStore> {
    pub canvas: &'a Canvas,
    pub buffer: &'a mut ChunkStreamingBuffer<S>,
}

impl<S: ChunkStore> VisionGrid for CanvasView<'_, S> {
    fn vision_tile(&self, p: IntPoint) -> Option<&Tile> {
        self.buffer.resolve(self.canvas.cell(p)?).ok()
    }

    fn vision_tile_mut(&mut self, p: IntPoint) -> Option<&mut Tile> {
        self.buffer.resolve_mut(self.canvas.cell(p)?).ok()
    }
}

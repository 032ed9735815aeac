//! Raycast field of view.
//!
//! Sight lines are traced once per radius from the origin to every point of
//! two concentric rasterized circles (radius and radius - 1). Each refresh walks
//! those lines twice: an undo pass clearing `visible`, then a draw pass setting
//! `visible` and `seen`. Both stop at the first opaque tile, which is itself lit.

use crate::point::IntPoint;
use crate::tilemap::Tilemap;
use crate::tiles::Tile;

/// Tile storage the field of view can light.
pub trait VisionGrid {
    fn vision_tile(&self, p: IntPoint) -> Option<&Tile>;

    fn vision_tile_mut(&mut self, p: IntPoint) -> Option<&mut Tile>;
}

impl VisionGrid for Tilemap<Tile> {
    fn vision_tile(&self, p: IntPoint) -> Option<&Tile> {
        self.get(p)
    }

    fn vision_tile_mut(&mut self, p: IntPoint) -> Option<&mut Tile> {
        self.get_mut(p)
    }
}

/// Midpoint circle of `radius` around the origin, deduplicated and sorted.
pub fn circle_points(radius: i32) -> Vec<IntPoint> {
    if radius <= 0 {
        return vec![IntPoint::ZERO];
    }

    let mut points = Vec::with_capacity(radius as usize * 8);
    let (mut x, mut y) = (radius, 0);
    let mut err = 1 - radius;
    while x >= y {
        for (row, col) in [(y, x), (x, y), (x, -y), (y, -x), (-y, -x), (-x, -y), (-x, y), (-y, x)] {
            points.push(IntPoint::new(row, col));
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
    points.sort();
    points.dedup();
    points
}

/// Bresenham line, both ends included.
pub fn line_points(from: IntPoint, to: IntPoint) -> Vec<IntPoint> {
    let dx = (to.col - from.col).abs();
    let dy = -(to.row - from.row).abs();
    let step_col = if from.col < to.col { 1 } else { -1 };
    let step_row = if from.row < to.row { 1 } else { -1 };

    let mut points = Vec::with_capacity((dx - dy) as usize + 1);
    let mut err = dx + dy;
    let mut current = from;
    loop {
        points.push(current);
        if current == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            current.col += step_col;
        }
        if e2 <= dx {
            err += dx;
            current.row += step_row;
        }
    }
    points
}

/// Precomputed rays, relative to the viewer.
#[derive(Clone, Debug)]
pub struct SightLines {
    radius: i32,
    lines: Vec<Vec<IntPoint>>,
}

impl SightLines {
    pub fn new(radius: i32) -> Self {
        let mut sight = Self {
            radius,
            lines: Vec::new(),
        };
        sight.trace();
        sight
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn lines(&self) -> &[Vec<IntPoint>] {
        &self.lines
    }

    /// Retrace the rays. A no-op when the radius is unchanged.
    pub fn recalculate(&mut self, radius: i32) {
        if radius != self.radius {
            self.radius = radius;
            self.trace();
        }
    }

    fn trace(&mut self) {
        let mut boundary = circle_points(self.radius);
        if self.radius > 1 {
            boundary.extend(circle_points(self.radius - 1));
            boundary.sort();
            boundary.dedup();
        }
        self.lines = boundary
            .into_iter()
            .map(|end| line_points(IntPoint::ZERO, end))
            .collect();
    }

    /// Clear `visible` along every ray. `seen` is untouched.
    pub fn undo<G: VisionGrid + ?Sized>(&self, origin: IntPoint, grid: &mut G) {
        for line in &self.lines {
            for &offset in line {
                let Some(tile) = grid.vision_tile_mut(origin + offset) else {
                    break;
                };
                tile.visible = false;
                if tile.is_opaque() {
                    break;
                }
            }
        }
    }

    /// Light every ray up to and including its first opaque tile.
    pub fn draw<G: VisionGrid + ?Sized>(&self, origin: IntPoint, grid: &mut G) {
        for line in &self.lines {
            for &offset in line {
                let Some(tile) = grid.vision_tile_mut(origin + offset) else {
                    break;
                };
                tile.visible = true;
                tile.seen = true;
                if tile.is_opaque() {
                    break;
                }
            }
        }
    }

    pub fn refresh<G: VisionGrid + ?Sized>(&self, origin: IntPoint, grid: &mut G) {
        self.undo(origin, grid);
        self.draw(origin, grid);
    }

    /// Points currently lit along the rays from `origin`.
    pub fn visible_points<G: VisionGrid + ?Sized>(&self, origin: IntPoint, grid: &G) -> Vec<IntPoint> {
        let mut points: Vec<IntPoint> = self
            .lines
            .iter()
            .flatten()
            .map(|&offset| origin + offset)
            .filter(|&p| grid.vision_tile(p).map(|t| t.visible).unwrap_or(false))
            .collect();
        points.sort();
        points.dedup();
        points
    }
}

//! World map generation
//!
//! Produces the coarse biome grid that decides what each chunk becomes. The map is
//! built by seeding an ocean border and random interior noise, then running a
//! schedule of cellular-automata smoothing passes until landmasses are connected
//! and coastlines are smooth. A final pass rings every landmass with beach.

use image::{ImageBuffer, Rgb, RgbImage};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldError};
use crate::point::IntPoint;
use crate::tilemap::Tilemap;

/// Coarse classification of one world map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Biome {
    /// Unclassified land
    #[default]
    Land,
    Water,
    Forest,
    Beach,
}

impl Biome {
    /// Land chunks carry dungeons below them.
    pub fn is_land(self) -> bool {
        matches!(self, Biome::Land | Biome::Forest)
    }

    pub fn glyph(self) -> char {
        match self {
            Biome::Land => '.',
            Biome::Water => '~',
            Biome::Forest => 'T',
            Biome::Beach => ':',
        }
    }

    pub fn color(self) -> [u8; 3] {
        match self {
            Biome::Land => [150, 130, 90],
            Biome::Water => [30, 70, 180],
            Biome::Forest => [30, 120, 40],
            Biome::Beach => [220, 200, 130],
        }
    }
}

/// One entry of the smoothing schedule: `repeat` passes that grow `biome` into
/// cells with at least `threshold` neighbours of that biome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmoothingPass {
    pub biome: Biome,
    pub threshold: usize,
    pub repeat: usize,
}

impl SmoothingPass {
    pub const fn new(biome: Biome, threshold: usize, repeat: usize) -> Self {
        Self { biome, threshold, repeat }
    }
}

/// Tunables for [`WorldMap::generate_with`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldMapParams {
    /// Width of the ocean band around the map edge
    pub border: usize,
    /// Border cells are forest with odds 1 in `border_odds`, water otherwise
    pub border_odds: u32,
    /// Interior cells are water with odds 1 in `interior_odds`, forest otherwise
    pub interior_odds: u32,
    pub passes: Vec<SmoothingPass>,
}

impl Default for WorldMapParams {
    fn default() -> Self {
        Self {
            border: 5,
            border_odds: 15,
            interior_odds: 3,
            passes: vec![
                SmoothingPass::new(Biome::Water, 4, 15),
                SmoothingPass::new(Biome::Forest, 3, 17),
                SmoothingPass::new(Biome::Water, 2, 17),
                SmoothingPass::new(Biome::Forest, 2, 1),
                SmoothingPass::new(Biome::Forest, 3, 12),
            ],
        }
    }
}

impl WorldMapParams {
    pub fn validate(&self) -> Result<()> {
        if self.border_odds == 0 || self.interior_odds == 0 {
            return Err(WorldError::parameter("world map odds must be at least 1"));
        }
        for pass in &self.passes {
            if pass.threshold == 0 || pass.threshold > 8 {
                return Err(WorldError::parameter(format!(
                    "smoothing threshold {} for {:?} must be within 1..=8",
                    pass.threshold, pass.biome
                )));
            }
        }
        Ok(())
    }
}

/// The biome grid of the whole world, one cell per chunk.
#[derive(Clone, Debug)]
pub struct WorldMap {
    tiles: Tilemap<Biome>,
    seed: u64,
}

impl WorldMap {
    /// Generate with the default schedule.
    pub fn generate(width: usize, height: usize, seed: u64) -> Result<WorldMap> {
        Self::generate_seeded(width, height, &WorldMapParams::default(), seed)
    }

    pub fn generate_seeded(width: usize, height: usize, params: &WorldMapParams, seed: u64) -> Result<WorldMap> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut map = Self::generate_with(width, height, params, &mut rng)?;
        map.seed = seed;
        Ok(map)
    }

    pub fn generate_with(
        width: usize,
        height: usize,
        params: &WorldMapParams,
        rng: &mut ChaCha8Rng,
    ) -> Result<WorldMap> {
        params.validate()?;
        if width == 0 || height == 0 {
            return Err(WorldError::parameter("world map must have a non-zero size"));
        }
        let _span = tracing::info_span!("world_map", width, height).entered();

        let mut tiles = Tilemap::new(width, height);
        seed_ocean_border(&mut tiles, params, rng);
        seed_interior(&mut tiles, params, rng);
        consensus_pass(&mut tiles);

        for pass in &params.passes {
            for _ in 0..pass.repeat {
                smoothing_pass(&mut tiles, pass.biome, pass.threshold, rng);
            }
        }

        place_beaches(&mut tiles);

        let map = WorldMap { tiles, seed: 0 };
        tracing::info!(
            water = map.count(Biome::Water),
            forest = map.count(Biome::Forest),
            beach = map.count(Biome::Beach),
            "world map generated"
        );
        Ok(map)
    }

    /// Wrap an existing grid, e.g. a hand-built map in tests or tools.
    pub fn from_tiles(tiles: Tilemap<Biome>) -> WorldMap {
        WorldMap { tiles, seed: 0 }
    }

    pub fn width(&self) -> usize {
        self.tiles.width
    }

    pub fn height(&self) -> usize {
        self.tiles.height
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tiles(&self) -> &Tilemap<Biome> {
        &self.tiles
    }

    pub fn in_bounds(&self, coord: IntPoint) -> bool {
        self.tiles.in_bounds(coord)
    }

    pub fn biome_at(&self, coord: IntPoint) -> Result<Biome> {
        self.tiles.try_get(coord).copied()
    }

    pub fn count(&self, biome: Biome) -> usize {
        self.tiles.iter().filter(|(_, b)| **b == biome).count()
    }

    /// Closest land cell to `from` by Chebyshev ring, searching outwards.
    pub fn nearest_land(&self, from: IntPoint) -> Option<IntPoint> {
        let max_radius = self.width().max(self.height()) as i32;
        for radius in 0..=max_radius {
            for dr in -radius..=radius {
                for dc in -radius..=radius {
                    if dr.abs() != radius && dc.abs() != radius {
                        continue;
                    }
                    let p = from + IntPoint::new(dr, dc);
                    if self.tiles.get(p).is_some_and(|b| b.is_land()) {
                        return Some(p);
                    }
                }
            }
        }
        None
    }

    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width() + 1) * self.height());
        for row in 0..self.height() {
            for col in 0..self.width() {
                let biome = self.tiles.get(IntPoint::new(row as i32, col as i32)).copied().unwrap_or_default();
                out.push(biome.glyph());
            }
            out.push('\n');
        }
        out
    }

    /// Export as a PNG, one pixel per cell.
    pub fn export_png(&self, path: &str) -> std::result::Result<(), image::ImageError> {
        let mut img: RgbImage = ImageBuffer::new(self.width() as u32, self.height() as u32);
        for (p, biome) in self.tiles.iter() {
            img.put_pixel(p.col as u32, p.row as u32, Rgb(biome.color()));
        }
        img.save(path)
    }
}

fn in_border(p: IntPoint, width: usize, height: usize, border: usize) -> bool {
    let (row, col, b) = (p.row as usize, p.col as usize, border);
    row < b || col < b || row + b >= height || col + b >= width
}

fn seed_ocean_border(tiles: &mut Tilemap<Biome>, params: &WorldMapParams, rng: &mut ChaCha8Rng) {
    let (width, height) = (tiles.width, tiles.height);
    for (p, biome) in tiles.iter_mut() {
        if in_border(p, width, height, params.border) {
            *biome = if rng.gen_range(0..params.border_odds) == 0 {
                Biome::Forest
            } else {
                Biome::Water
            };
        }
    }
}

fn seed_interior(tiles: &mut Tilemap<Biome>, params: &WorldMapParams, rng: &mut ChaCha8Rng) {
    let (width, height) = (tiles.width, tiles.height);
    for (p, biome) in tiles.iter_mut() {
        if !in_border(p, width, height, params.border) {
            *biome = if rng.gen_range(0..params.interior_odds) == 0 {
                Biome::Water
            } else {
                Biome::Forest
            };
        }
    }
}

/// Snap a cell to its neighbours when below, right and above, left agree.
fn consensus_pass(tiles: &mut Tilemap<Biome>) {
    for row in 1..tiles.height.saturating_sub(1) as i32 {
        for col in 1..tiles.width.saturating_sub(1) as i32 {
            let at = |r: i32, c: i32| tiles.get(IntPoint::new(r, c)).copied();
            let below = at(row + 1, col);
            let right = at(row, col + 1);
            let above = at(row - 1, col);
            let left = at(row, col - 1);
            if below == right && above == left && right == above {
                if let (Some(value), Some(cell)) = (right, tiles.get_mut(IntPoint::new(row, col))) {
                    *cell = value;
                }
            }
        }
    }
}

/// One cellular-automata pass. A cell with `count >= threshold` neighbours of
/// `biome` converts with probability `1 / (8 - (count - 1))`.
fn smoothing_pass(tiles: &mut Tilemap<Biome>, biome: Biome, threshold: usize, rng: &mut ChaCha8Rng) {
    for row in 0..tiles.height as i32 {
        for col in 0..tiles.width as i32 {
            let p = IntPoint::new(row, col);
            let count = tiles.count_neighbors(p, |b| *b == biome);
            if count >= threshold && rng.gen_range(0..(9 - count)) == 0 {
                if let Some(cell) = tiles.get_mut(p) {
                    *cell = biome;
                }
            }
        }
    }
}

fn place_beaches(tiles: &mut Tilemap<Biome>) {
    let shore: Vec<IntPoint> = tiles
        .iter()
        .filter(|(p, b)| **b != Biome::Water && tiles.count_neighbors(*p, |n| *n == Biome::Water) > 0)
        .map(|(p, _)| p)
        .collect();
    for p in shore {
        if let Some(cell) = tiles.get_mut(p) {
            *cell = Biome::Beach;
        }
    }
}

//! Settlement layout: one building per BSP lot
//!
//! The chunk surface is partitioned into lots; each lot gets a walled building
//! inset by a random margin, with a single door on a random side.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::bsp::{self, Rect};
use crate::error::Result;
use crate::point::IntPoint;
use crate::tilemap::Tilemap;
use crate::tiles::{Tile, TileKind};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementParams {
    /// Smallest lot side
    pub min_lot: usize,
    /// Lots larger than this are always split
    pub max_lot: usize,
    /// Chance that a land chunk carries a settlement
    pub chance: f64,
}

impl Default for SettlementParams {
    fn default() -> Self {
        Self {
            min_lot: 15,
            max_lot: 20,
            chance: 0.15,
        }
    }
}

/// A walled building; corners are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Building {
    pub top_left: IntPoint,
    pub bottom_right: IntPoint,
    pub door: IntPoint,
}

impl Building {
    pub fn contains(&self, p: IntPoint) -> bool {
        p.row >= self.top_left.row
            && p.row <= self.bottom_right.row
            && p.col >= self.top_left.col
            && p.col <= self.bottom_right.col
    }

    fn on_wall(&self, p: IntPoint) -> bool {
        p.row == self.top_left.row
            || p.row == self.bottom_right.row
            || p.col == self.top_left.col
            || p.col == self.bottom_right.col
    }
}

#[derive(Clone, Debug)]
pub struct Settlement {
    pub lots: Vec<Rect>,
    pub buildings: Vec<Building>,
}

pub fn generate_settlement(
    width: usize,
    height: usize,
    params: &SettlementParams,
    rng: &mut ChaCha8Rng,
) -> Result<Settlement> {
    let tree = bsp::build(Rect::new(0, 0, width, height), params.min_lot, params.max_lot, rng)?;
    let lots = tree.leaves();
    let buildings = lots.iter().filter_map(|lot| place_building(lot, rng)).collect();
    Ok(Settlement { lots, buildings })
}

fn place_building(lot: &Rect, rng: &mut ChaCha8Rng) -> Option<Building> {
    let inset_x = rng.gen_range(1..=5);
    let inset_y = rng.gen_range(1..=4);
    let height = lot.height.checked_sub(rng.gen_range(0..4) + inset_y + 1)?;
    let width = lot.width.checked_sub(rng.gen_range(0..5) + inset_x + 1)?;
    if height < 3 || width < 3 {
        return None;
    }

    let top_left = IntPoint::new((lot.y + inset_y) as i32, (lot.x + inset_x) as i32);
    let bottom_right = top_left + IntPoint::new(height as i32 - 1, width as i32 - 1);
    let mid_row = (top_left.row + bottom_right.row) / 2;
    let mid_col = (top_left.col + bottom_right.col) / 2;
    let door = match rng.gen_range(0..4) {
        0 => IntPoint::new(top_left.row, mid_col),
        1 => IntPoint::new(bottom_right.row, mid_col),
        2 => IntPoint::new(mid_row, top_left.col),
        _ => IntPoint::new(mid_row, bottom_right.col),
    };
    Some(Building { top_left, bottom_right, door })
}

impl Settlement {
    /// Draw every building onto a surface layer.
    pub fn stamp(&self, tiles: &mut Tilemap<Tile>) -> Result<()> {
        for building in &self.buildings {
            for row in building.top_left.row..=building.bottom_right.row {
                for col in building.top_left.col..=building.bottom_right.col {
                    let p = IntPoint::new(row, col);
                    let kind = if p == building.door {
                        TileKind::Door
                    } else if building.on_wall(p) {
                        TileKind::BuildingWall
                    } else {
                        TileKind::BuildingFloor
                    };
                    tiles.set(p, Tile::new(kind))?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_buildings_stay_inside_their_lots() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let settlement = generate_settlement(100, 50, &SettlementParams::default(), &mut rng).unwrap();
        assert!(!settlement.buildings.is_empty());
        for building in &settlement.buildings {
            let lot = settlement
                .lots
                .iter()
                .find(|lot| lot.contains(building.top_left.col as usize, building.top_left.row as usize))
                .unwrap();
            assert!(lot.contains(building.bottom_right.col as usize, building.bottom_right.row as usize));
            assert!(building.contains(building.door));
        }
    }

    #[test]
    fn test_stamp_draws_walls_and_door() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let settlement = generate_settlement(60, 40, &SettlementParams::default(), &mut rng).unwrap();
        let mut tiles = Tilemap::new_with(60, 40, Tile::new(TileKind::Dirt));
        settlement.stamp(&mut tiles).unwrap();

        let doors = tiles.iter().filter(|(_, t)| t.kind == TileKind::Door).count();
        assert_eq!(doors, settlement.buildings.len());
        for building in &settlement.buildings {
            let corner = tiles.get(building.top_left).unwrap();
            assert_eq!(corner.kind, TileKind::BuildingWall);
            let inside = building.top_left + IntPoint::new(1, 1);
            assert_eq!(tiles.get(inside).unwrap().kind, TileKind::BuildingFloor);
        }
    }

    #[test]
    fn test_surface_too_small() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(generate_settlement(10, 10, &SettlementParams::default(), &mut rng).is_err());
    }
}

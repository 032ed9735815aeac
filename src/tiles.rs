//! Tile identifiers and their static properties
//!
//! Only the identifier and the `seen` flag of a tile are persisted. Everything a
//! renderer or movement check needs (glyph, color, passability, opacity) is looked
//! up from [`TILE_TABLE`] by identifier.

use serde::{Deserialize, Serialize};

/// Kind of tile, stored on disk as its `u8` identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileKind {
    /// Bare overworld ground
    #[default]
    Dirt = 1,
    /// Wall or corner of a dungeon room
    RoomWall = 2,
    /// Unexcavated rock between rooms and corridors
    SolidRock = 3,
    /// Carved corridor
    Corridor = 4,
    /// Interior of a dungeon room
    RoomFloor = 5,
    Tree = 6,
    /// Impassable boundary (edge of the known world)
    BlockWall = 7,
    DownStair = 8,
    UpStair = 9,
    KoboldSpawner = 10,
    Water = 11,
    /// Shallow ripple on open water
    LightWater = 12,
    Sand = 13,
    DarkSand = 14,
    BigTree = 15,
    GrassDirt = 16,
    /// Settlement building wall
    BuildingWall = 17,
    BuildingFloor = 18,
    Door = 19,
    Bush = 20,
}

/// Static properties of a tile kind.
#[derive(Clone, Copy, Debug)]
pub struct TileDef {
    pub kind: TileKind,
    pub name: &'static str,
    pub glyph: char,
    pub color: [u8; 3],
    pub passable: bool,
    pub opaque: bool,
}

const fn tile_def(
    kind: TileKind,
    name: &'static str,
    glyph: char,
    color: [u8; 3],
    passable: bool,
    opaque: bool,
) -> TileDef {
    TileDef { kind, name, glyph, color, passable, opaque }
}

/// Lookup table indexed by `id - 1`.
pub static TILE_TABLE: [TileDef; 20] = [
    tile_def(TileKind::Dirt, "dirt", '.', [139, 105, 65], true, false),
    tile_def(TileKind::RoomWall, "room wall", '#', [150, 150, 150], false, true),
    tile_def(TileKind::SolidRock, "rock", ' ', [40, 40, 40], false, true),
    tile_def(TileKind::Corridor, "corridor", ',', [120, 110, 90], true, false),
    tile_def(TileKind::RoomFloor, "floor", '.', [170, 160, 140], true, false),
    tile_def(TileKind::Tree, "tree", 'T', [30, 130, 40], false, true),
    tile_def(TileKind::BlockWall, "boundary", 'X', [90, 90, 110], false, true),
    tile_def(TileKind::DownStair, "down stair", '>', [230, 230, 80], true, false),
    tile_def(TileKind::UpStair, "up stair", '<', [230, 230, 80], true, false),
    tile_def(TileKind::KoboldSpawner, "kobold spawner", '&', [200, 60, 60], false, false),
    tile_def(TileKind::Water, "water", '~', [30, 70, 180], false, false),
    tile_def(TileKind::LightWater, "shallow water", '-', [80, 130, 220], false, false),
    tile_def(TileKind::Sand, "sand", ':', [220, 200, 130], true, false),
    tile_def(TileKind::DarkSand, "dark sand", ';', [190, 170, 100], true, false),
    tile_def(TileKind::BigTree, "big tree", 'Y', [20, 100, 30], false, true),
    tile_def(TileKind::GrassDirt, "grass", '"', [90, 160, 60], true, false),
    tile_def(TileKind::BuildingWall, "building wall", '=', [160, 110, 70], false, true),
    tile_def(TileKind::BuildingFloor, "building floor", '_', [180, 150, 110], true, false),
    tile_def(TileKind::Door, "door", '+', [200, 140, 60], true, false),
    tile_def(TileKind::Bush, "bush", '*', [60, 150, 60], true, false),
];

impl TileKind {
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Resolve a persisted identifier.
    pub fn from_id(id: u8) -> Option<TileKind> {
        let kind = match id {
            1 => TileKind::Dirt,
            2 => TileKind::RoomWall,
            3 => TileKind::SolidRock,
            4 => TileKind::Corridor,
            5 => TileKind::RoomFloor,
            6 => TileKind::Tree,
            7 => TileKind::BlockWall,
            8 => TileKind::DownStair,
            9 => TileKind::UpStair,
            10 => TileKind::KoboldSpawner,
            11 => TileKind::Water,
            12 => TileKind::LightWater,
            13 => TileKind::Sand,
            14 => TileKind::DarkSand,
            15 => TileKind::BigTree,
            16 => TileKind::GrassDirt,
            17 => TileKind::BuildingWall,
            18 => TileKind::BuildingFloor,
            19 => TileKind::Door,
            20 => TileKind::Bush,
            _ => return None,
        };
        Some(kind)
    }

    pub fn def(self) -> &'static TileDef {
        &TILE_TABLE[self as usize - 1]
    }

    pub fn is_passable(self) -> bool {
        self.def().passable
    }

    pub fn is_opaque(self) -> bool {
        self.def().opaque
    }

    pub fn is_stair(self) -> bool {
        matches!(self, TileKind::UpStair | TileKind::DownStair)
    }

    pub fn is_water(self) -> bool {
        matches!(self, TileKind::Water | TileKind::LightWater)
    }
}

/// A tile in a chunk layer. Equality compares the kind only; the vision flags
/// are per-instance state.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tile {
    pub kind: TileKind,
    /// Inside the current field of view. Recomputed every refresh.
    pub visible: bool,
    /// Has been inside the field of view at least once.
    pub seen: bool,
}

impl Tile {
    pub const fn new(kind: TileKind) -> Self {
        Self { kind, visible: false, seen: false }
    }

    pub fn id(&self) -> u8 {
        self.kind.id()
    }

    pub fn is_passable(&self) -> bool {
        self.kind.is_passable()
    }

    pub fn is_opaque(&self) -> bool {
        self.kind.is_opaque()
    }

    pub fn glyph(&self) -> char {
        self.kind.def().glyph
    }

    pub fn color(&self) -> [u8; 3] {
        self.kind.def().color
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Tile {}

impl From<TileKind> for Tile {
    fn from(kind: TileKind) -> Self {
        Tile::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_identifiers() {
        for (i, def) in TILE_TABLE.iter().enumerate() {
            assert_eq!(def.kind.id() as usize, i + 1, "{} is out of place", def.name);
            assert_eq!(TileKind::from_id(def.kind.id()), Some(def.kind));
        }
    }

    #[test]
    fn test_unknown_identifier() {
        assert_eq!(TileKind::from_id(0), None);
        assert_eq!(TileKind::from_id(200), None);
    }

    #[test]
    fn test_equality_ignores_vision_flags() {
        let mut a = Tile::new(TileKind::Corridor);
        let b = Tile::new(TileKind::Corridor);
        a.visible = true;
        a.seen = true;
        assert_eq!(a, b);
        assert_ne!(a, Tile::new(TileKind::RoomFloor));
    }

    #[test]
    fn test_walls_block_sight() {
        assert!(TileKind::RoomWall.is_opaque());
        assert!(TileKind::Tree.is_opaque());
        assert!(!TileKind::RoomWall.is_passable());
        assert!(TileKind::UpStair.is_passable());
        assert!(!TileKind::UpStair.is_opaque());
    }
}

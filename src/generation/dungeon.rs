//! Random-walk dungeon generation
//!
//! A start room is placed near the middle of the floor. Corridors are carved out
//! of room walls by a biased random walk, and a new room is built at the end of a
//! corridor whenever it fits. New rooms branch again until the room target is
//! reached or the attempt budget runs out.

use std::collections::VecDeque;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldError};
use crate::point::{Direction, IntPoint};
use crate::tilemap::Tilemap;
use crate::tiles::{Tile, TileKind};

/// Corridors attempted per room before giving up on the target
const ATTEMPTS_PER_ROOM: usize = 8;

/// Layout marker written while carving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    Empty,
    Corridor,
    Corner,
    /// Top or bottom wall of a room
    HorizontalWall,
    /// Left or right wall of a room
    VerticalWall,
    Floor,
}

impl Marker {
    /// Corridors can be walked over again by later corridors.
    pub fn is_carvable(self) -> bool {
        matches!(self, Marker::Empty | Marker::Corridor)
    }

    pub fn glyph(self) -> char {
        match self {
            Marker::Empty => ' ',
            Marker::Corridor => 'X',
            Marker::Corner => '+',
            Marker::HorizontalWall => '=',
            Marker::VerticalWall => '|',
            Marker::Floor => '.',
        }
    }

    pub fn tile_kind(self) -> TileKind {
        match self {
            Marker::Empty => TileKind::SolidRock,
            Marker::Corridor => TileKind::Corridor,
            Marker::Corner | Marker::HorizontalWall | Marker::VerticalWall => TileKind::RoomWall,
            Marker::Floor => TileKind::RoomFloor,
        }
    }
}

/// Rectangular room; both corners lie on the wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub top_left: IntPoint,
    pub bottom_right: IntPoint,
}

impl Room {
    pub fn new(top_left: IntPoint, bottom_right: IntPoint) -> Self {
        Self { top_left, bottom_right }
    }

    /// Interior width (walls excluded).
    pub fn inner_width(&self) -> i32 {
        self.bottom_right.col - self.top_left.col - 1
    }

    /// Interior height (walls excluded).
    pub fn inner_height(&self) -> i32 {
        self.bottom_right.row - self.top_left.row - 1
    }

    /// Wall cells excluding the four corners.
    pub fn wall_count(&self) -> i32 {
        2 * self.inner_height() + 2 * self.inner_width()
    }

    pub fn center(&self) -> IntPoint {
        IntPoint::new(
            (self.top_left.row + self.bottom_right.row) / 2,
            (self.top_left.col + self.bottom_right.col) / 2,
        )
    }

    pub fn contains_interior(&self, p: IntPoint) -> bool {
        p.row > self.top_left.row
            && p.row < self.bottom_right.row
            && p.col > self.top_left.col
            && p.col < self.bottom_right.col
    }

    pub fn interior_points(&self) -> impl Iterator<Item = IntPoint> + '_ {
        (self.top_left.row + 1..self.bottom_right.row).flat_map(move |row| {
            (self.top_left.col + 1..self.bottom_right.col).map(move |col| IntPoint::new(row, col))
        })
    }

    pub fn random_interior_point(&self, rng: &mut ChaCha8Rng) -> IntPoint {
        IntPoint::new(
            rng.gen_range(self.top_left.row + 1..self.bottom_right.row),
            rng.gen_range(self.top_left.col + 1..self.bottom_right.col),
        )
    }
}

/// Tunables for [`generate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonParams {
    pub width: usize,
    pub height: usize,
    /// Rooms aimed for, before deviation
    pub target_room_count: usize,
    /// Spread of the actual room target around `target_room_count`
    pub deviation: usize,
    /// 0..=100; chance that a room's height copies its width
    pub squareness: u32,
    pub standard_room_width: usize,
    pub standard_room_height: usize,
    pub room_width_deviation: usize,
    pub room_height_deviation: usize,
    pub min_path_length: usize,
    pub max_path_length: usize,
    /// Steps a corridor always walks straight before it may turn
    pub straight_steps: usize,
    /// Percent chance per step to turn left or right
    pub turn_chance: u32,
}

impl Default for DungeonParams {
    fn default() -> Self {
        Self {
            width: 100,
            height: 50,
            target_room_count: 5,
            deviation: 5,
            squareness: 2,
            standard_room_width: 10,
            standard_room_height: 10,
            room_width_deviation: 12,
            room_height_deviation: 8,
            min_path_length: 16,
            max_path_length: 100,
            straight_steps: 4,
            turn_chance: 15,
        }
    }
}

impl DungeonParams {
    fn max_room_width(&self) -> usize {
        self.standard_room_width + self.room_width_deviation.div_ceil(2)
    }

    fn max_room_height(&self) -> usize {
        self.standard_room_height + self.room_height_deviation.div_ceil(2)
    }

    pub fn validate(&self) -> Result<()> {
        if self.room_width_deviation == 0 || self.room_height_deviation == 0 {
            return Err(WorldError::parameter("room deviations must be positive"));
        }
        if self.standard_room_width <= self.room_width_deviation / 2
            || self.standard_room_height <= self.room_height_deviation / 2
        {
            return Err(WorldError::parameter("room deviation exceeds the standard room size"));
        }
        if self.min_path_length == 0 || self.min_path_length >= self.max_path_length {
            return Err(WorldError::parameter(format!(
                "path length bounds {}..{} are empty",
                self.min_path_length, self.max_path_length
            )));
        }
        if self.width < self.max_room_width() + 2 || self.height < self.max_room_height() + 2 {
            return Err(WorldError::parameter(format!(
                "a {}x{} floor cannot hold a {}x{} room",
                self.width,
                self.height,
                self.max_room_width() + 2,
                self.max_room_height() + 2
            )));
        }
        if self.target_room_count == 0 {
            return Err(WorldError::parameter("target_room_count must be positive"));
        }
        Ok(())
    }
}

/// A finished dungeon floor.
#[derive(Clone, Debug)]
pub struct Dungeon {
    pub markers: Tilemap<Marker>,
    pub rooms: Vec<Room>,
}

impl Dungeon {
    pub fn to_tiles(&self) -> Tilemap<Tile> {
        Tilemap::from_fn(self.markers.width, self.markers.height, |p| {
            Tile::new(self.markers.get(p).copied().unwrap_or_default().tile_kind())
        })
    }

    pub fn render_ascii(&self) -> String {
        let mut out = String::new();
        for row in 0..self.markers.height as i32 {
            for col in 0..self.markers.width as i32 {
                let marker = self.markers.get(IntPoint::new(row, col)).copied().unwrap_or_default();
                out.push(marker.glyph());
            }
            out.push('\n');
        }
        out
    }
}

/// Generate a floor from an explicit seed.
pub fn generate(params: &DungeonParams, seed: u64) -> Result<Dungeon> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_with_rng(params, &mut rng)
}

pub fn generate_with_rng(params: &DungeonParams, rng: &mut ChaCha8Rng) -> Result<Dungeon> {
    params.validate()?;
    let mut builder = DungeonBuilder::new(params.clone());
    builder.build_start_room(rng)?;
    builder.branch_out(rng)?;
    tracing::debug!(rooms = builder.rooms.len(), "dungeon floor generated");
    Ok(builder.finish())
}

/// Carving state for one floor.
pub struct DungeonBuilder {
    params: DungeonParams,
    markers: Tilemap<Marker>,
    rooms: Vec<Room>,
}

impl DungeonBuilder {
    pub fn new(params: DungeonParams) -> Self {
        let markers = Tilemap::new(params.width, params.height);
        Self { params, markers, rooms: Vec::new() }
    }

    pub fn markers(&self) -> &Tilemap<Marker> {
        &self.markers
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn finish(self) -> Dungeon {
        Dungeon { markers: self.markers, rooms: self.rooms }
    }

    fn marker(&self, p: IntPoint) -> Option<Marker> {
        self.markers.get(p).copied()
    }

    /// Draw a room: corners, top/bottom and side walls, floor inside.
    pub fn build_room(&mut self, top_left: IntPoint, bottom_right: IntPoint) -> Result<Room> {
        if bottom_right.row - top_left.row < 2 || bottom_right.col - top_left.col < 2 {
            return Err(WorldError::parameter(format!(
                "room {top_left}-{bottom_right} has no interior"
            )));
        }
        for corner in [top_left, bottom_right] {
            if !self.markers.in_bounds(corner) {
                return Err(WorldError::out_of_bounds(corner, self.markers.width, self.markers.height));
            }
        }

        let room = Room::new(top_left, bottom_right);
        for row in top_left.row..=bottom_right.row {
            for col in top_left.col..=bottom_right.col {
                let on_row_edge = row == top_left.row || row == bottom_right.row;
                let on_col_edge = col == top_left.col || col == bottom_right.col;
                let marker = match (on_row_edge, on_col_edge) {
                    (true, true) => Marker::Corner,
                    (true, false) => Marker::HorizontalWall,
                    (false, true) => Marker::VerticalWall,
                    (false, false) => Marker::Floor,
                };
                self.markers.set(IntPoint::new(row, col), marker)?;
            }
        }
        self.rooms.push(room);
        Ok(room)
    }

    /// Random interior size around the standard room, honoring squareness.
    fn roll_room_size(&self, rng: &mut ChaCha8Rng) -> (i32, i32) {
        let p = &self.params;
        let width = rng.gen_range(0..p.room_width_deviation) + p.standard_room_width
            - p.room_width_deviation / 2;
        let height_min = p.standard_room_height - p.room_height_deviation / 2;
        let height_max = height_min + p.room_height_deviation - 1;
        let height = if rng.gen_range(0..100) < p.squareness {
            width.clamp(height_min, height_max)
        } else {
            rng.gen_range(0..p.room_height_deviation) + height_min
        };
        (width as i32, height as i32)
    }

    /// Place the first room near the centre of the floor.
    pub fn build_start_room(&mut self, rng: &mut ChaCha8Rng) -> Result<Room> {
        let (room_width, room_height) = self.roll_room_size(rng);
        let p = &self.params;
        let (h, w) = (p.height as i32, p.width as i32);
        let row = rng.gen_range(0..h / 2) + h / 4 - p.standard_room_height as i32 / 2;
        let col = rng.gen_range(0..w / 2) + w / 4 - p.standard_room_width as i32 / 2;

        // Keep the whole room, walls included, on the floor
        let row = row.clamp(0, h - room_height - 2);
        let col = col.clamp(0, w - room_width - 2);
        let top_left = IntPoint::new(row, col);
        let bottom_right = top_left + IntPoint::new(room_height + 1, room_width + 1);
        self.build_room(top_left, bottom_right)
    }

    /// A random non-corner wall cell. Each side is chosen with probability
    /// proportional to its length.
    pub fn rand_wall_block(&self, room: &Room, rng: &mut ChaCha8Rng) -> IntPoint {
        let height = room.inner_height();
        let width = room.inner_width();
        let side = rng.gen_range(0..height + width);
        if side < width {
            let row = if rng.gen_bool(0.5) { room.top_left.row } else { room.bottom_right.row };
            IntPoint::new(row, room.top_left.col + 1 + rng.gen_range(0..width))
        } else {
            let col = if rng.gen_bool(0.5) { room.top_left.col } else { room.bottom_right.col };
            IntPoint::new(room.top_left.row + 1 + rng.gen_range(0..height), col)
        }
    }

    /// Heading that leaves `room` through the wall cell `point`.
    ///
    /// Read from the surrounding markers first. When they are ambiguous, for
    /// example the wall of a one-cell-wide room is flanked by corners, the heading
    /// points away from the room centre along the dominant axis.
    pub fn determine_direction(&self, point: IntPoint, room: &Room) -> Direction {
        let at = |d: Direction| self.marker(point + d.offset());

        let horizontal = Marker::HorizontalWall;
        if at(Direction::Left) == Some(horizontal) || at(Direction::Right) == Some(horizontal) {
            if at(Direction::Up) == Some(Marker::Floor) {
                return Direction::Down;
            }
            if at(Direction::Down) == Some(Marker::Floor) {
                return Direction::Up;
            }
        } else if at(Direction::Up) == Some(Marker::VerticalWall)
            || at(Direction::Down) == Some(Marker::VerticalWall)
        {
            if at(Direction::Left) == Some(Marker::Floor) {
                return Direction::Right;
            }
            if at(Direction::Right) == Some(Marker::Floor) {
                return Direction::Left;
            }
        }

        let away = point - room.center();
        let direction = if away.row.abs() * room.inner_width().max(1)
            >= away.col.abs() * room.inner_height().max(1)
        {
            if away.row < 0 { Direction::Up } else { Direction::Down }
        } else if away.col < 0 {
            Direction::Left
        } else {
            Direction::Right
        };
        tracing::trace!(?point, ?direction, "wall direction from room geometry");
        direction
    }

    fn can_step_into(&self, p: IntPoint) -> bool {
        self.marker(p).is_some_and(Marker::is_carvable)
    }

    /// Carve a corridor starting at `start` heading `direction`. Returns the last
    /// carved cell and the heading the walk ended with.
    pub fn build_path(
        &mut self,
        start: IntPoint,
        direction: Direction,
        rng: &mut ChaCha8Rng,
    ) -> Result<(IntPoint, Direction)> {
        let p = &self.params;
        let length = rng.gen_range(p.min_path_length..p.max_path_length);
        let (straight_steps, turn_chance) = (p.straight_steps, p.turn_chance);

        let mut current = start;
        let mut heading = direction;
        for step in 0..length {
            self.markers.set(current, Marker::Corridor)?;
            if step + 1 == length {
                break;
            }

            if step >= straight_steps {
                let roll = rng.gen_range(0..100);
                if roll < turn_chance {
                    heading = if roll % 2 == 0 {
                        heading.rotate_counterclockwise()
                    } else {
                        heading.rotate_clockwise()
                    };
                }
            }

            // Rotate clockwise until a step is possible
            let mut next = None;
            for _ in 0..4 {
                let candidate = current + heading.offset();
                if self.can_step_into(candidate) {
                    next = Some(candidate);
                    break;
                }
                heading = heading.rotate_clockwise();
            }
            match next {
                Some(p) => current = p,
                None => break,
            }
        }
        Ok((current, heading))
    }

    /// Try to fit a new room beyond the end of a corridor. The wall cell in front
    /// of the corridor becomes a doorway.
    fn try_room_at(
        &mut self,
        end: IntPoint,
        heading: Direction,
        rng: &mut ChaCha8Rng,
    ) -> Result<Option<Room>> {
        let (inner_w, inner_h) = self.roll_room_size(rng);
        let door = end + heading.offset();
        let top_left = match heading {
            Direction::Up => IntPoint::new(door.row - inner_h - 1, door.col - rng.gen_range(1..=inner_w)),
            Direction::Down => IntPoint::new(door.row, door.col - rng.gen_range(1..=inner_w)),
            Direction::Left => IntPoint::new(door.row - rng.gen_range(1..=inner_h), door.col - inner_w - 1),
            Direction::Right => IntPoint::new(door.row - rng.gen_range(1..=inner_h), door.col),
        };
        let bottom_right = top_left + IntPoint::new(inner_h + 1, inner_w + 1);

        for row in top_left.row..=bottom_right.row {
            for col in top_left.col..=bottom_right.col {
                if self.marker(IntPoint::new(row, col)) != Some(Marker::Empty) {
                    return Ok(None);
                }
            }
        }

        let room = self.build_room(top_left, bottom_right)?;
        self.markers.set(door, Marker::Corridor)?;
        Ok(Some(room))
    }

    fn roll_room_target(&self, rng: &mut ChaCha8Rng) -> usize {
        let p = &self.params;
        if p.deviation == 0 {
            return p.target_room_count;
        }
        (p.target_room_count + rng.gen_range(0..p.deviation))
            .saturating_sub(p.deviation / 2)
            .max(1)
    }

    /// Grow corridors and rooms out of the existing rooms.
    pub fn branch_out(&mut self, rng: &mut ChaCha8Rng) -> Result<()> {
        if self.rooms.is_empty() {
            return Ok(());
        }
        let target = self.roll_room_target(rng);
        let budget = target * ATTEMPTS_PER_ROOM;
        let mut attempts = 0;
        let mut frontier: VecDeque<usize> = VecDeque::from([0]);

        while self.rooms.len() < target && attempts < budget {
            let index = match frontier.pop_front() {
                Some(index) => index,
                None => rng.gen_range(0..self.rooms.len()),
            };
            let room = self.rooms[index];
            let branches = if index == 0 && attempts == 0 { 1 } else { rng.gen_range(0..3) };
            attempts += 1;

            for _ in 0..branches {
                attempts += 1;
                let wall = self.rand_wall_block(&room, rng);
                let direction = self.determine_direction(wall, &room);
                let (end, heading) = self.build_path(wall, direction, rng)?;
                if end == wall {
                    continue;
                }
                if self.rooms.len() < target && self.try_room_at(end, heading, rng)?.is_some() {
                    frontier.push_back(self.rooms.len() - 1);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(width: usize, height: usize) -> DungeonBuilder {
        DungeonBuilder::new(DungeonParams { width, height, ..Default::default() })
    }

    #[test]
    fn test_room_geometry() {
        let mut b = builder(20, 20);
        let room = b.build_room(IntPoint::new(2, 2), IntPoint::new(8, 10)).unwrap();
        let m = b.markers();

        for corner in [(2, 2), (2, 10), (8, 2), (8, 10)] {
            assert_eq!(m.get(IntPoint::new(corner.0, corner.1)), Some(&Marker::Corner));
        }
        for col in 3..10 {
            assert_eq!(m.get(IntPoint::new(2, col)), Some(&Marker::HorizontalWall));
            assert_eq!(m.get(IntPoint::new(8, col)), Some(&Marker::HorizontalWall));
        }
        for row in 3..8 {
            assert_eq!(m.get(IntPoint::new(row, 2)), Some(&Marker::VerticalWall));
            assert_eq!(m.get(IntPoint::new(row, 10)), Some(&Marker::VerticalWall));
        }
        assert_eq!(m.get(IntPoint::new(5, 5)), Some(&Marker::Floor));
        assert_eq!(room.interior_points().count(), 5 * 7);
        assert!(room.interior_points().all(|p| m.get(p) == Some(&Marker::Floor)));
        assert_eq!(room.wall_count(), 24);
    }

    #[test]
    fn test_room_without_interior_rejected() {
        let mut b = builder(20, 20);
        assert!(b.build_room(IntPoint::new(2, 2), IntPoint::new(3, 8)).is_err());
        assert!(matches!(
            b.build_room(IntPoint::new(15, 15), IntPoint::new(25, 18)),
            Err(WorldError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_wall_blocks_skip_corners() {
        let mut b = builder(30, 30);
        let room = b.build_room(IntPoint::new(2, 2), IntPoint::new(8, 20)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut horizontal = 0;
        for _ in 0..500 {
            let p = b.rand_wall_block(&room, &mut rng);
            let marker = *b.markers().get(p).unwrap();
            assert!(matches!(marker, Marker::HorizontalWall | Marker::VerticalWall));
            if marker == Marker::HorizontalWall {
                horizontal += 1;
            }
        }
        // Horizontal walls are 17 long, vertical walls 5 long
        assert!(horizontal > 300, "horizontal walls picked {horizontal} times");
    }

    #[test]
    fn test_direction_points_out_of_room() {
        let mut b = builder(30, 30);
        let room = b.build_room(IntPoint::new(5, 5), IntPoint::new(12, 15)).unwrap();
        assert_eq!(b.determine_direction(IntPoint::new(5, 9), &room), Direction::Up);
        assert_eq!(b.determine_direction(IntPoint::new(12, 9), &room), Direction::Down);
        assert_eq!(b.determine_direction(IntPoint::new(8, 5), &room), Direction::Left);
        assert_eq!(b.determine_direction(IntPoint::new(8, 15), &room), Direction::Right);
    }

    #[test]
    fn test_direction_fallback_for_narrow_room() {
        let mut b = builder(30, 30);
        // One cell wide: top wall cell is flanked by corners
        let room = b.build_room(IntPoint::new(5, 5), IntPoint::new(12, 7)).unwrap();
        assert_eq!(b.determine_direction(IntPoint::new(5, 6), &room), Direction::Up);
        assert_eq!(b.determine_direction(IntPoint::new(12, 6), &room), Direction::Down);
    }

    #[test]
    fn test_path_only_carves_empty_cells() {
        let mut b = builder(60, 40);
        let room = b.build_room(IntPoint::new(15, 20), IntPoint::new(25, 35)).unwrap();
        let before = b.markers().clone();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let start = IntPoint::new(15, 27);
        let (end, _) = b.build_path(start, Direction::Up, &mut rng).unwrap();

        assert_eq!(b.markers().get(start), Some(&Marker::Corridor));
        assert_eq!(b.markers().get(end), Some(&Marker::Corridor));
        for (p, marker) in b.markers().iter() {
            if *marker == Marker::Corridor && p != start {
                assert_eq!(before.get(p), Some(&Marker::Empty), "corridor overwrote {p}");
            }
        }
        assert!(room.interior_points().all(|p| b.markers().get(p) == Some(&Marker::Floor)));
    }

    #[test]
    fn test_boxed_in_path_terminates() {
        let mut b = builder(20, 20);
        b.build_room(IntPoint::new(0, 0), IntPoint::new(4, 4)).unwrap();
        b.build_room(IntPoint::new(0, 4), IntPoint::new(4, 8)).unwrap();
        b.build_room(IntPoint::new(4, 0), IntPoint::new(8, 4)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        // (4, 4) is a corner shared by three rooms and has no carvable neighbour
        let (end, _) = b.build_path(IntPoint::new(4, 4), Direction::Down, &mut rng).unwrap();
        assert_eq!(end, IntPoint::new(4, 4));
        assert_eq!(b.markers().get(end), Some(&Marker::Corridor));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let params = DungeonParams::default();
        let a = generate(&params, 77).unwrap();
        let b = generate(&params, 77).unwrap();
        assert_eq!(a.markers, b.markers);
        assert_eq!(a.rooms, b.rooms);
    }

    #[test]
    fn test_generated_rooms_are_disjoint_and_connected() {
        for seed in 0..10 {
            let params = DungeonParams::default();
            let dungeon = generate(&params, seed).unwrap();
            assert!(!dungeon.rooms.is_empty());
            assert!(dungeon.rooms.len() <= params.target_room_count + params.deviation);

            for room in &dungeon.rooms {
                assert!(room.interior_points().all(|p| dungeon.markers.get(p) == Some(&Marker::Floor)));
            }

            // Flood fill across floors and corridors from the start room
            let walkable = |m: &Marker| matches!(m, Marker::Floor | Marker::Corridor);
            let mut reached = Tilemap::new_with(params.width, params.height, false);
            let mut queue = VecDeque::from([dungeon.rooms[0].center()]);
            while let Some(p) = queue.pop_front() {
                if !dungeon.markers.get(p).is_some_and(walkable) || reached.get(p) == Some(&true) {
                    continue;
                }
                reached.set(p, true).unwrap();
                for d in Direction::ALL {
                    queue.push_back(p + d.offset());
                }
            }
            for room in &dungeon.rooms {
                assert_eq!(reached.get(room.center()), Some(&true), "seed {seed}: room {room:?} unreachable");
            }
        }
    }

    #[test]
    fn test_floor_too_small_rejected() {
        let params = DungeonParams { width: 12, height: 12, ..Default::default() };
        assert!(matches!(generate(&params, 0), Err(WorldError::GenerationParameter(_))));

        let params = DungeonParams { min_path_length: 50, max_path_length: 20, ..Default::default() };
        assert!(generate(&params, 0).is_err());
    }

    #[test]
    fn test_marker_tiles() {
        assert_eq!(Marker::Empty.tile_kind(), TileKind::SolidRock);
        assert_eq!(Marker::Corridor.tile_kind(), TileKind::Corridor);
        assert_eq!(Marker::Corner.tile_kind(), TileKind::RoomWall);
        assert_eq!(Marker::Floor.tile_kind(), TileKind::RoomFloor);
    }
}

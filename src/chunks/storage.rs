//! Chunk persistence.
//!
//! Binary layout, one file per chunk:
//! ```text
//! u8 width, u8 height, u8 depth
//! for each layer (overworld first), row-major:
//!     u8 tile id, u8 seen (0 or 1)
//! ```
//! Everything else about a tile is derived from its id. Rooms, spawners, plants
//! and items are not persisted.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{ReadBytesExt, WriteBytesExt};
use tempfile::NamedTempFile;
use tracing::trace;

use super::chunk::Chunk;
use super::layer::ChunkLayer;
use crate::error::{Result, WorldError};
use crate::point::IntPoint;
use crate::tilemap::Tilemap;
use crate::tiles::{Tile, TileKind};

/// Size of the header in bytes
pub const HEADER_LEN: usize = 3;

/// Exact size of an encoded chunk.
pub fn encoded_len(width: usize, height: usize, depth: usize) -> usize {
    HEADER_LEN + 2 * width * height * (depth + 1)
}

pub fn write_chunk<W: Write>(chunk: &Chunk, writer: &mut W) -> Result<()> {
    let header = [chunk.width(), chunk.height(), chunk.depth];
    for value in header {
        let byte = u8::try_from(value).map_err(|_| {
            WorldError::parameter(format!("chunk {} header value {} does not fit in a byte", chunk.coord, value))
        })?;
        writer.write_u8(byte)?;
    }

    for layer in chunk.layers() {
        for tile in layer.tiles.as_slice() {
            writer.write_u8(tile.id())?;
            writer.write_u8(tile.seen as u8)?;
        }
    }
    Ok(())
}

pub fn read_chunk<R: Read>(coord: IntPoint, reader: &mut R) -> Result<Chunk> {
    let width = read_byte(coord, reader, "header")? as usize;
    let height = read_byte(coord, reader, "header")? as usize;
    let depth = read_byte(coord, reader, "header")? as usize;
    if width == 0 || height == 0 {
        return Err(WorldError::corrupt(coord, format!("empty extent {}x{}", width, height)));
    }

    let mut layers = Vec::with_capacity(depth + 1);
    for index in 0..=depth {
        let mut cells = Vec::with_capacity(width * height);
        for _ in 0..width * height {
            let id = read_byte(coord, reader, "tile data")?;
            let kind = TileKind::from_id(id)
                .ok_or_else(|| WorldError::corrupt(coord, format!("unknown tile id {}", id)))?;
            let seen = match read_byte(coord, reader, "tile data")? {
                0 => false,
                1 => true,
                other => return Err(WorldError::corrupt(coord, format!("invalid seen flag {}", other))),
            };
            cells.push(Tile {
                kind,
                visible: false,
                seen,
            });
        }
        let mut cells = cells.into_iter();
        let tiles = Tilemap::from_fn(width, height, |_| cells.next().unwrap_or_default());
        layers.push(ChunkLayer::from_tiles(tiles, index < depth));
    }

    match reader.read_u8() {
        Ok(_) => return Err(WorldError::corrupt(coord, "trailing bytes after last layer")),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {}
        Err(e) => return Err(e.into()),
    }

    Chunk::from_layers(coord, layers)
}

fn read_byte<R: Read>(coord: IntPoint, reader: &mut R, section: &str) -> Result<u8> {
    reader.read_u8().map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            WorldError::corrupt(coord, format!("truncated {}", section))
        } else {
            WorldError::Io(e)
        }
    })
}

pub fn encode_chunk(chunk: &Chunk) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(encoded_len(chunk.width(), chunk.height(), chunk.depth));
    write_chunk(chunk, &mut bytes)?;
    Ok(bytes)
}

pub fn decode_chunk(coord: IntPoint, mut bytes: &[u8]) -> Result<Chunk> {
    read_chunk(coord, &mut bytes)
}

/// Where evicted chunks go.
pub trait ChunkStore {
    fn save(&mut self, chunk: &Chunk) -> Result<()>;

    /// `Ok(None)` when the chunk was never saved.
    fn load(&mut self, coord: IntPoint) -> Result<Option<Chunk>>;
}

/// One file per chunk under a directory, named `chunk{row}_{col}`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn chunk_path(&self, coord: IntPoint) -> PathBuf {
        self.root.join(format!("chunk{}_{}", coord.row, coord.col))
    }
}

impl ChunkStore for DirectoryStore {
    fn save(&mut self, chunk: &Chunk) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.chunk_path(chunk.coord);

        // Write beside the target and rename over it, a failed write never
        // replaces the previous save
        let mut file = NamedTempFile::new_in(&self.root)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            write_chunk(chunk, &mut writer)?;
            writer.flush()?;
        }
        file.persist(&path).map_err(|e| e.error)?;
        trace!(path = %path.display(), "chunk saved");
        Ok(())
    }

    fn load(&mut self, coord: IntPoint) -> Result<Option<Chunk>> {
        let file = match File::open(self.chunk_path(coord)) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut reader = BufReader::new(file);
        read_chunk(coord, &mut reader).map(Some)
    }
}

/// Encoded chunks kept in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    chunks: HashMap<IntPoint, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn contains(&self, coord: IntPoint) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Raw bytes of a saved chunk.
    pub fn bytes(&self, coord: IntPoint) -> Option<&[u8]> {
        self.chunks.get(&coord).map(Vec::as_slice)
    }

    pub fn insert_bytes(&mut self, coord: IntPoint, bytes: Vec<u8>) {
        self.chunks.insert(coord, bytes);
    }
}

impl ChunkStore for MemoryStore {
    fn save(&mut self, chunk: &Chunk) -> Result<()> {
        self.chunks.insert(chunk.coord, encode_chunk(chunk)?);
        Ok(())
    }

    fn load(&mut self, coord: IntPoint) -> Result<Option<Chunk>> {
        match self.chunks.get(&coord) {
            Some(bytes) => decode_chunk(coord, bytes).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::chunk::SURFACE;

    /// 5x5 chunk with two dungeon floors and a few marked tiles.
    fn sample_chunk(coord: IntPoint) -> Chunk {
        let surface = ChunkLayer::new(5, 5, TileKind::GrassDirt);
        let mut first = ChunkLayer::new(5, 5, TileKind::SolidRock);
        first.has_layer_below = true;
        let second = ChunkLayer::new(5, 5, TileKind::RoomFloor);
        let mut chunk = Chunk::from_layers(coord, vec![surface, first, second]).unwrap();

        chunk.set_tile(SURFACE, IntPoint::new(2, 2), TileKind::DownStair).unwrap();
        chunk.set_tile(0, IntPoint::new(1, 3), TileKind::UpStair).unwrap();
        chunk.set_tile(1, IntPoint::new(4, 0), TileKind::KoboldSpawner).unwrap();
        chunk.tile_mut(SURFACE, IntPoint::new(0, 0)).unwrap().seen = true;
        chunk.tile_mut(1, IntPoint::new(4, 4)).unwrap().seen = true;
        chunk.tile_mut(0, IntPoint::new(3, 3)).unwrap().visible = true;
        chunk
    }

    fn assert_same_tiles(a: &Chunk, b: &Chunk) {
        assert_eq!(a.depth, b.depth);
        for (la, lb) in a.layers().iter().zip(b.layers()) {
            for ((pa, ta), (pb, tb)) in la.tiles.iter().zip(lb.tiles.iter()) {
                assert_eq!(pa, pb);
                assert_eq!(ta.id(), tb.id());
                assert_eq!(ta.seen, tb.seen, "seen differs at {pa}");
            }
        }
    }

    #[test]
    fn test_round_trip_5x5_depth_2() {
        let coord = IntPoint::new(4, -2);
        let chunk = sample_chunk(coord);
        let bytes = encode_chunk(&chunk).unwrap();
        assert_eq!(bytes.len(), 153);
        assert_eq!(bytes.len(), encoded_len(5, 5, 2));
        assert_eq!(&bytes[..3], &[5, 5, 2]);

        let decoded = decode_chunk(coord, &bytes).unwrap();
        assert_same_tiles(&chunk, &decoded);
        assert_eq!(decoded.coord, coord);
        assert_eq!(decoded.down_stair(SURFACE).unwrap(), Some(IntPoint::new(2, 2)));
        assert_eq!(decoded.up_stair(0).unwrap(), Some(IntPoint::new(1, 3)));
        assert!(decoded.layer(SURFACE).unwrap().has_layer_below);
        assert!(!decoded.layer(1).unwrap().has_layer_below);
        assert!(!decoded.tile(0, IntPoint::new(3, 3)).unwrap().visible);
    }

    #[test]
    fn test_truncated_data_is_corrupt() {
        let coord = IntPoint::new(0, 0);
        let bytes = encode_chunk(&sample_chunk(coord)).unwrap();
        for len in [0, 2, 3, 100, 152] {
            let result = decode_chunk(coord, &bytes[..len]);
            assert!(
                matches!(result, Err(WorldError::CorruptPersistedChunk { .. })),
                "length {len} should be corrupt"
            );
        }
    }

    #[test]
    fn test_bad_contents_are_corrupt() {
        let coord = IntPoint::new(1, 1);
        let bytes = encode_chunk(&sample_chunk(coord)).unwrap();

        let mut unknown_id = bytes.clone();
        unknown_id[3] = 0;
        assert!(matches!(decode_chunk(coord, &unknown_id), Err(WorldError::CorruptPersistedChunk { .. })));

        let mut bad_flag = bytes.clone();
        bad_flag[4] = 7;
        assert!(matches!(decode_chunk(coord, &bad_flag), Err(WorldError::CorruptPersistedChunk { .. })));

        let mut trailing = bytes.clone();
        trailing.push(1);
        assert!(matches!(decode_chunk(coord, &trailing), Err(WorldError::CorruptPersistedChunk { .. })));

        assert!(matches!(decode_chunk(coord, &[0, 5, 0]), Err(WorldError::CorruptPersistedChunk { .. })));
    }

    #[test]
    fn test_oversized_chunk_is_rejected() {
        let chunk = Chunk::empty(IntPoint::ZERO, 300, 2);
        assert!(matches!(encode_chunk(&chunk), Err(WorldError::GenerationParameter(_))));
    }

    #[test]
    fn test_directory_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryStore::new(dir.path().join("saves"));
        let coord = IntPoint::new(7, 3);

        assert!(store.load(coord).unwrap().is_none());

        let chunk = sample_chunk(coord);
        store.save(&chunk).unwrap();
        let path = store.chunk_path(coord);
        assert!(path.ends_with("chunk7_3"));
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 153);

        let loaded = store.load(coord).unwrap().unwrap();
        assert_same_tiles(&chunk, &loaded);

        std::fs::write(&path, [5u8, 5, 2, 1]).unwrap();
        assert!(matches!(store.load(coord), Err(WorldError::CorruptPersistedChunk { .. })));
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirectoryStore::new(dir.path());
        let coord = IntPoint::new(2, 2);
        store.save(&sample_chunk(coord)).unwrap();

        // Too wide for the header
        let oversized = Chunk::empty(coord, 300, 1);
        assert!(store.save(&oversized).is_err());

        let path = store.chunk_path(coord);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 153);
        assert!(store.load(coord).unwrap().is_some());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        let coord = IntPoint::new(-1, 9);
        assert!(store.load(coord).unwrap().is_none());

        store.save(&sample_chunk(coord)).unwrap();
        assert!(store.contains(coord));
        assert_eq!(store.bytes(coord).unwrap().len(), 153);
        assert_eq!(store.load(coord).unwrap().unwrap().depth, 2);
    }
}

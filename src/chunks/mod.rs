//! Chunked world storage
//!
//! A [`Chunk`] is one world map cell expanded to tiles: an overworld
//! [`ChunkLayer`] plus zero or more dungeon floors. Chunks near the player live
//! in a [`ChunkStreamingBuffer`]; the rest are kept by a [`ChunkStore`] in the
//! binary format of [`storage`].

pub mod chunk;
pub mod layer;
pub mod storage;
pub mod streaming;
pub mod view;

pub use chunk::{Chunk, ChunkParams, SURFACE};
pub use layer::{ChunkLayer, ItemDrop, ItemKind, Plant, Spawner, SpawnerKind};
pub use storage::{ChunkStore, DirectoryStore, MemoryStore};
pub use streaming::{ChunkSource, ChunkStreamingBuffer};
pub use view::{Canvas, CanvasView, RenderBuffer, TileRef};

//! Chunk world library
//!
//! Procedural roguelike world: a cellular-automata world map, chunks of
//! overworld and dungeon floors generated on demand, a streaming window that
//! persists chunks as the player moves, and a raycast field of view.

pub mod chunks;
pub mod config;
pub mod error;
pub mod explorer;
pub mod generation;
pub mod point;
pub mod seeds;
pub mod session;
pub mod tilemap;
pub mod tiles;
pub mod visibility;
pub mod world_map;

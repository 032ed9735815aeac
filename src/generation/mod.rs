//! Procedural layout generators
//!
//! - BSP (Binary Space Partitioning) for settlement lots
//! - Random-walk room and corridor carving for dungeon floors

pub mod bsp;
pub mod dungeon;
pub mod settlement;

pub use bsp::{BspNode, Rect, SplitAxis};
pub use dungeon::{Dungeon, DungeonBuilder, DungeonParams, Marker, Room};
pub use settlement::{generate_settlement, Building, Settlement, SettlementParams};

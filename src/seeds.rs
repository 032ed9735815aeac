//! Seed management for world generation
//!
//! Every generator takes its own RNG. Seeds are derived from one master seed by
//! hashing a system name, and chunk seeds additionally hash the chunk coordinate
//! so a chunk regenerates identically no matter the order chunks are visited in.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::point::IntPoint;

/// Seeds for all world generation systems.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Cellular-automata world map
    pub world_map: u64,
    /// Base seed for per-chunk terrain and dungeons
    pub chunks: u64,
    /// Base seed for settlement layouts
    pub settlements: u64,
}

impl WorldSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            world_map: derive_seed(master, "world_map"),
            chunks: derive_seed(master, "chunks"),
            settlements: derive_seed(master, "settlements"),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> WorldSeedsBuilder {
        WorldSeedsBuilder::new(master)
    }

    /// RNG for the chunk at `coord`.
    pub fn chunk_rng(&self, coord: IntPoint) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(chunk_seed(self.chunks, coord))
    }

    /// RNG for the settlement layout of the chunk at `coord`.
    pub fn settlement_rng(&self, coord: IntPoint) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(chunk_seed(self.settlements, coord))
    }
}

impl Default for WorldSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Builder for overriding individual seeds while deriving the others from master
pub struct WorldSeedsBuilder {
    seeds: WorldSeeds,
}

impl WorldSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: WorldSeeds::from_master(master),
        }
    }

    pub fn world_map(mut self, seed: u64) -> Self {
        self.seeds.world_map = seed;
        self
    }

    pub fn chunks(mut self, seed: u64) -> Self {
        self.seeds.chunks = seed;
        self
    }

    pub fn settlements(mut self, seed: u64) -> Self {
        self.seeds.settlements = seed;
        self
    }

    pub fn build(self) -> WorldSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and a system name.
fn derive_seed(master: u64, system: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    system.hash(&mut hasher);
    hasher.finish()
}

/// Seed for one chunk, from a base seed and the chunk's world coordinate.
pub fn chunk_seed(base: u64, coord: IntPoint) -> u64 {
    let mut hasher = DefaultHasher::new();
    base.hash(&mut hasher);
    coord.row.hash(&mut hasher);
    coord.col.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ master: {}, world_map: {}, chunks: {}, settlements: {} }}",
            self.master, self.world_map, self.chunks, self.settlements,
        )
    }
}

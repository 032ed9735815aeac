//! Debug script to print a dungeon floor's marker grid and a settlement BSP tree

use chunk_world::generation::{bsp, dungeon, DungeonParams, Rect, SettlementParams};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn main() {
    let seed = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(12345u64);
    let params = DungeonParams::default();

    println!("=== DUNGEON FLOOR ({}x{}) seed={} ===", params.width, params.height, seed);
    println!("LEGEND: X = corridor  + = corner  = | = walls  . = floor");
    println!();

    match dungeon::generate(&params, seed) {
        Ok(floor) => {
            print!("{}", floor.render_ascii());
            println!();
            println!("Rooms: {}", floor.rooms.len());
            for (i, room) in floor.rooms.iter().enumerate() {
                println!(
                    "  {:2}: {} -> {} ({}x{} interior)",
                    i,
                    room.top_left,
                    room.bottom_right,
                    room.inner_width(),
                    room.inner_height()
                );
            }
        }
        Err(e) => eprintln!("Dungeon generation failed: {}", e),
    }

    println!();
    let lots = SettlementParams::default();
    println!("=== SETTLEMENT BSP (min {} max {}) ===", lots.min_lot, lots.max_lot);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    match bsp::build(Rect::new(0, 0, params.width, params.height), lots.min_lot, lots.max_lot, &mut rng) {
        Ok(tree) => {
            print!("{}", tree.dump());
            println!("Leaves: {}  Depth: {}", tree.leaves().len(), tree.depth());
        }
        Err(e) => eprintln!("BSP failed: {}", e),
    }
}

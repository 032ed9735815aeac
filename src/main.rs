use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use chunk_world::chunks::{ChunkSource, ChunkStreamingBuffer, DirectoryStore};
use chunk_world::config::WorldConfig;
use chunk_world::explorer::run_explorer;
use chunk_world::point::IntPoint;
use chunk_world::seeds::WorldSeeds;
use chunk_world::session::Session;
use chunk_world::world_map::{Biome, WorldMap};

#[derive(Parser, Debug)]
#[command(name = "chunk_world")]
#[command(about = "Generate and explore a streamed roguelike world")]
struct Args {
    /// Width of the world map in chunks
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the world map in chunks
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// World config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for evicted chunks, each seed gets its own subdirectory (overrides the config)
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Print the world map as ASCII
    #[arg(long)]
    ascii: bool,

    /// Export the world map to a PNG (e.g., "world.png")
    #[arg(long)]
    export: Option<String>,

    /// Walk the world in the terminal explorer
    #[arg(long)]
    explore: bool,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() {
    let args = Args::parse();

    // Stay quiet in the explorer unless asked, the TUI owns the terminal
    let default_filter = if args.explore { "off" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        error!(error = %e, "chunk_world failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };
    if let Some(width) = args.width {
        config.world_width = width;
    }
    if let Some(height) = args.height {
        config.world_height = height;
    }
    if let Some(dir) = &args.save_dir {
        config.save_dir = dir.clone();
    }
    config.validate()?;

    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let seeds = WorldSeeds::from_master(seed);
    println!("Generating world with seed: {}", seed);
    println!("Map size: {}x{} chunks of {}x{} tiles", config.world_width, config.world_height, config.chunk.width, config.chunk.height);

    let world_map = WorldMap::generate_seeded(config.world_width, config.world_height, &config.world_map, seeds.world_map)?;
    let total = (config.world_width * config.world_height) as f64;
    // Generation classifies every cell, so there is no bare land to report
    for biome in [Biome::Forest, Biome::Water, Biome::Beach] {
        let count = world_map.count(biome);
        println!("  {:?}: {} ({:.1}%)", biome, count, 100.0 * count as f64 / total);
    }

    if args.ascii {
        print!("{}", world_map.render_ascii());
    }

    if let Some(path) = &args.export {
        world_map.export_png(path)?;
        println!("Exported world map to {}", path);
    }

    if args.explore {
        let middle = IntPoint::new(config.world_height as i32 / 2, config.world_width as i32 / 2);
        let start = world_map.nearest_land(middle).ok_or("world map has no land to start on")?;
        println!("Starting at chunk {}", start);

        let store = DirectoryStore::new(config.world_save_dir(seed));
        let diameter = config.streaming.diameter;
        let source = ChunkSource::new(world_map, config, seeds);
        let buffer = ChunkStreamingBuffer::new(diameter, start, source, store)?;
        let session = Session::new(buffer)?;
        run_explorer(session)?;
    } else if !args.ascii && args.export.is_none() {
        println!("Use --ascii, --export <PATH> or --explore to do something with the map.");
    }

    Ok(())
}

//! # Burrow Main Entry Point
//!
//! Generates a dungeon from the command line and prints its room graph.

use burrow::{
    BurrowError, BurrowResult, Dungeon, DungeonConfig, DungeonGenerator, DungeonStyle,
    GenerationConfig, Generator, Position,
};
use clap::{Parser, ValueEnum};
use log::{error, info};

/// Dungeon size presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// 7x7 grid, 28 rooms
    Base,
    /// 11x11 grid, 88 rooms
    Big,
    /// The 3x3 hub world
    Hub,
}

/// Command line arguments for the dungeon generator.
#[derive(Parser, Debug)]
#[command(name = "burrow")]
#[command(about = "Procedural dungeon generator")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Dungeon style (hub, ice, volcano)
    #[arg(long)]
    style: Option<DungeonStyle>,

    /// JSON generation config; command line flags override it
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Dungeon size preset
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Print the tilemap of the room at grid cell X,Y
    #[arg(long, value_parser = parse_cell)]
    room: Option<Position>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_cell(value: &str) -> Result<Position, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", value))?;
    let x = x.trim().parse().map_err(|e| format!("bad x: {}", e))?;
    let y = y.trim().parse().map_err(|e| format!("bad y: {}", e))?;
    Ok(Position::new(x, y))
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Initializes `env_logger`, letting `RUST_LOG` refine the chosen level.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::new()
        .parse_filters(log_level)
        .parse_default_env()
        .format_target(false)
        .init();
}

fn run(args: &Args) -> BurrowResult<()> {
    info!("Starting Burrow v{}", burrow::VERSION);

    let config = build_config(args)?;
    let generator = DungeonGenerator::new();
    let mut rng = burrow::generation::utils::create_rng(&config);

    let dungeon = match args.preset {
        Some(Preset::Hub) => generator.generate_hub(&config, &mut rng)?,
        _ => generator.generate(&config, &mut rng)?,
    };

    print_summary(&dungeon);

    if let Some(cell) = args.room {
        let room = dungeon.room(cell).ok_or_else(|| {
            BurrowError::InvalidConfig(format!("no room at grid cell ({}, {})", cell.x, cell.y))
        })?;
        println!();
        println!(
            "{:?} room at ({}, {}), doors {:04b}",
            room.room_type,
            cell.x,
            cell.y,
            room.door_bits()
        );
        print!("{}", room.tilemap);
    }

    Ok(())
}

fn build_config(args: &Args) -> BurrowResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::from_file(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    match args.preset {
        Some(Preset::Base) => config.dungeon = DungeonConfig::base(),
        Some(Preset::Big) => config.dungeon = DungeonConfig::big(),
        Some(Preset::Hub) => config.style = DungeonStyle::Hub,
        None => {}
    }
    if let Some(style) = args.style {
        config.style = style;
    }
    config.validate()?;
    Ok(config)
}

fn print_summary(dungeon: &Dungeon) {
    println!(
        "{:?} dungeon, {} rooms",
        dungeon.style,
        dungeon.graph.len()
    );
    for (pos, room) in dungeon.graph.iter() {
        println!(
            "({:>3}, {:>3})  {:<8}  doors {:04b}",
            pos.x,
            pos.y,
            format!("{:?}", room.room_type),
            room.door_bits()
        );
    }
}

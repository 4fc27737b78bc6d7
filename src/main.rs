use clap::Parser;
use conway_life::config::AppConfig;
use conway_life::{load_pattern_file, Grid, PatternLibrary, Placement, Session};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "conway-life")]
#[command(about = "Conway's Game of Life, headless: load a pattern, run it, print the grid")]
struct Args {
    /// JSON config file to start from (CLI flags override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this file and exit
    #[arg(long = "save-config")]
    save_config: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Pattern to load: a library name (see --list-patterns) or an .rle file path
    #[arg(short = 'p', long)]
    pattern: Option<String>,

    /// Column offset of the pattern's top-left corner
    #[arg(long = "offset-x", allow_hyphen_values = true)]
    offset_x: Option<i64>,

    /// Row offset of the pattern's top-left corner
    #[arg(long = "offset-y", allow_hyphen_values = true)]
    offset_y: Option<i64>,

    /// Clear the grid before placing the pattern
    #[arg(long)]
    clear: bool,

    /// Fill the grid with random cells before loading any pattern
    #[arg(long)]
    randomize: bool,

    /// Seed for --randomize (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Generations to step directly
    #[arg(short = 'g', long, default_value = "1")]
    generations: u64,

    /// Drive the session frame by frame instead, stepping every --update-frequency
    /// frames (nothing advances when the config starts paused)
    #[arg(long)]
    frames: Option<u64>,

    /// Frames between generations (>= 1)
    #[arg(long = "update-frequency")]
    update_frequency: Option<u32>,

    /// List available patterns and exit
    #[arg(long = "list-patterns")]
    list_patterns: bool,
}

/// Merge CLI flags over the loaded (or default) config
fn effective_config(args: &Args) -> Result<AppConfig, String> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };

    if let Some(width) = args.width {
        config.grid_width = width;
    }
    if let Some(height) = args.height {
        config.grid_height = height;
    }
    if let Some(freq) = args.update_frequency {
        config.update_frequency = freq;
    }
    if args.pattern.is_some() {
        config.pattern = args.pattern.clone();
    }
    if let Some(x) = args.offset_x {
        config.placement.offset_x = x;
    }
    if let Some(y) = args.offset_y {
        config.placement.offset_y = y;
    }
    if args.clear {
        config.placement.clear_before = true;
    }

    Ok(config)
}

fn pattern_library(config: &AppConfig) -> PatternLibrary {
    match &config.pattern_dir {
        Some(dir) => PatternLibrary::with_user_dir(dir),
        None => PatternLibrary::new(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let config = effective_config(&args)?;
    let library = pattern_library(&config);

    if args.list_patterns {
        for builtin in library.builtin {
            println!("{:<20} {}", builtin.name, builtin.description);
        }
        for user in &library.user {
            println!("{:<20} {}", user.name, user.path.display());
        }
        return Ok(());
    }

    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        info!("Saved config to {}", path.display());
        return Ok(());
    }

    let grid = Grid::new(config.grid_width, config.grid_height)?;
    let mut session = Session::new(grid, config.update_frequency);
    session.is_playing = config.start_playing;

    if args.randomize {
        match args.seed {
            Some(seed) => session.randomize(&mut StdRng::seed_from_u64(seed)),
            None => session.randomize(&mut rand::thread_rng()),
        }
    }

    if let Some(name) = &config.pattern {
        // Already logged by the loader; a missing pattern is not fatal
        let _ = load_into(&mut session, &library, name, config.placement);
    }

    match args.frames {
        Some(frames) => {
            for _ in 0..frames {
                session.tick();
            }
        }
        None => {
            if session.is_playing {
                session.toggle_playing();
            }
            for _ in 0..args.generations {
                session.step_once();
            }
        }
    }

    print!("{}", session.grid());
    println!(
        "generation {}, population {}",
        session.generation(),
        session.grid().population()
    );

    Ok(())
}

/// Library names take priority; anything else is treated as a file path
fn load_into(
    session: &mut Session,
    library: &PatternLibrary,
    name: &str,
    placement: Placement,
) -> Result<(), conway_life::PatternLoadError> {
    if library.contains(name) {
        library.load(name, placement, session.grid_mut())?;
    } else {
        load_pattern_file(Path::new(name), placement, session.grid_mut())?;
    }
    session.pattern_placed(placement);
    Ok(())
}

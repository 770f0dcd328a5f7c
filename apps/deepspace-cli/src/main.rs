use anyhow::Context;
use clap::{Parser, Subcommand};
use deepspace_common::DemoConfig;
use deepspace_kernel::{World, WorldBounds};
use deepspace_render::{DrawSurface, Palette, RecordingSurface};
use deepspace_tools::WorldInspector;
use deepspace_view::{FrameTimer, ViewController};
use glam::IVec3;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deepspace-cli", about = "Headless tool for the deep space demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (YAML, or JSON by extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the world seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Override the number of generated objects
    #[arg(long, global = true)]
    count: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the effective configuration as YAML
    Config,
    /// Build the world and summarize it
    Inspect {
        /// Also list every placement
        #[arg(long)]
        dump: bool,
    },
    /// Render one frame from a viewer position as a list of draw calls
    #[command(allow_negative_numbers = true)]
    Project {
        x: i32,
        y: i32,
        z: i32,
        /// Use the sprite palette with this many sprites
        #[arg(long)]
        sprites: Option<u16>,
    },
    /// Drift forward for a number of ticks, drawing a frame per tick
    Fly {
        #[arg(short, long, default_value = "1000")]
        ticks: u32,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<DemoConfig> {
    let mut config = match &cli.config {
        Some(path) => DemoConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DemoConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.world.seed = seed;
    }
    if let Some(count) = cli.count {
        config.world.object_count = count;
    }
    config.validate()?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

fn build_world(config: &DemoConfig) -> World {
    let w = &config.world;
    World::generate(
        WorldBounds::new(w.width, w.height, w.depth),
        w.object_count,
        w.seed,
    )
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Info => {
            println!("deepspace-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", deepspace_common::crate_info());
            println!("kernel: {}", deepspace_kernel::crate_info());
            println!("render: {}", deepspace_render::crate_info());
            println!("input: {}", deepspace_input::crate_info());
            println!("view: {}", deepspace_view::crate_info());
            println!("assets: {}", deepspace_assets::crate_info());
            println!("tools: {}", deepspace_tools::crate_info());
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
        Commands::Inspect { dump } => {
            let world = build_world(&config);
            println!("{}", WorldInspector::summary(&world));
            if dump {
                print!("{}", WorldInspector::dump(&world));
            }
        }
        Commands::Project { x, y, z, sprites } => {
            let world = build_world(&config);
            let mut controller = ViewController::from_config(&config);
            controller.teleport(IVec3::new(x, y, z));

            let (palette, mut surface) = match sprites {
                Some(n) => (Palette::with_sprites(n), RecordingSurface::with_sprites(n)),
                None => (Palette::flat(), RecordingSurface::new()),
            };
            let stats = controller.draw_frame(&world, &palette, &mut surface)?;
            surface.present()?;

            print!("{}", surface.to_text());
            println!(
                "visible={} buckets={} drawn={} skipped={}",
                stats.visible, stats.buckets, stats.drawn, stats.skipped
            );
        }
        Commands::Fly { ticks } => {
            let world = build_world(&config);
            let mut controller = ViewController::from_config(&config);
            let palette = Palette::flat();
            let mut surface = RecordingSurface::new();
            let mut timer = FrameTimer::new(ticks.max(1) as usize);
            let (mut wraps, mut drawn, mut peak) = (0u32, 0usize, 0usize);

            for _ in 0..ticks {
                let started = Instant::now();
                wraps += controller.tick() as u32;
                let stats = controller.draw_frame(&world, &palette, &mut surface)?;
                surface.present()?;
                timer.record(started.elapsed());
                drawn += stats.drawn;
                peak = peak.max(stats.visible);
            }

            let p = controller.position();
            println!("Fly-through: ticks={ticks} wraps={wraps}");
            println!("Final position: ({}, {}, {})", p.x, p.y, p.z);
            println!(
                "Objects drawn: {drawn} (peak visible {peak}), frames={}",
                surface.frames()
            );
            println!(
                "Frame time: avg={:?} min={:?} max={:?}",
                timer.average(),
                timer.min(),
                timer.max()
            );
        }
    }

    Ok(())
}

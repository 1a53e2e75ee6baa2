use chipgrid_common::db::parser::script;
use chipgrid_common::util::config::Config;
use chipgrid_common::util::{generator, logger, visualization};
use chipgrid_layout::{Layout, Snapshot, check};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the default layout and print its snapshot.
    Demo,
    /// Replay an edit script against the default layout.
    Run {
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
    },
    /// Write a random edit script for soak testing.
    Generate {
        #[arg(long, default_value_t = 200)]
        edits: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value = "inputs/random.chipscript")]
        output: String,
    },
    /// Build the default layout and render it to a PNG.
    Render {
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            args.config
        );
        Config::default()
    };

    let command = args.command.unwrap_or(Commands::Demo);

    match command {
        Commands::Demo => {
            let layout = Layout::new(&config);
            print_snapshot(&layout);
            if check::run(&layout).is_err() {
                std::process::exit(1);
            }
        }
        Commands::Run { script } => {
            let commands = script::parse_file(&script)
                .map_err(|e| anyhow::anyhow!("Invalid script '{}': {}", script.display(), e))?;
            log::info!("Replaying {} edits from {:?}", commands.len(), script);

            let mut layout = Layout::new(&config);
            for (i, command) in commands.iter().enumerate() {
                if let Err(e) = layout.apply(command) {
                    log::warn!("edit {} rejected: {}", i + 1, e);
                }
            }
            print_snapshot(&layout);

            prepare_output_dir(&config.output.image)?;
            visualization::draw_layout(
                layout.db(),
                layout.grid().width(),
                layout.grid().height(),
                &config.output.image,
            );
            log::info!("Rendered layout to {}", config.output.image);

            if check::run(&layout).is_err() {
                std::process::exit(1);
            }
        }
        Commands::Generate {
            edits,
            seed,
            output,
        } => {
            prepare_output_dir(&output)?;
            generator::generate_random_script(&output, edits, seed, &config.grid)?;
            log::info!("Generated: {}", output);
        }
        Commands::Render { output } => {
            let layout = Layout::new(&config);
            let target = output.unwrap_or_else(|| config.output.image.clone());
            prepare_output_dir(&target)?;
            visualization::draw_layout(
                layout.db(),
                layout.grid().width(),
                layout.grid().height(),
                &target,
            );
            log::info!("Rendered layout to {}", target);
        }
    }

    Ok(())
}

fn prepare_output_dir(path_str: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path_str).parent() {
        if !parent.exists() && !parent.as_os_str().is_empty() {
            log::info!("Creating output directory: {:?}", parent);
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn print_snapshot(layout: &Layout) {
    let snap = Snapshot::capture(layout);
    println!("components:");
    for c in &snap.components {
        println!(
            "  {:<10} bounds=({},{} {}x{}) rot={} {}",
            c.name,
            c.bounds.x,
            c.bounds.y,
            c.bounds.width,
            c.bounds.height,
            c.rotation,
            if c.collision { "COLLIDING" } else { "ok" }
        );
    }
    println!("wires:");
    for (i, l) in snap.links.iter().enumerate() {
        match &l.path {
            Some(path) => println!("  #{i} {} length={}", l.color, path.len()),
            None => println!("  #{i} {} UNROUTED", l.color),
        }
    }
    println!(
        "clock: {}   power: {}   price: {}",
        snap.clock_display, snap.power_display, snap.price_display
    );
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Lucky Wheel experience.

mod app;
mod menu_file;
mod simulate;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lucky_wheel_rendering::{Color, Presentation, RenderingBackend};
use lucky_wheel_rendering_macroquad::MacroquadBackend;
use lucky_wheel_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::{
    app::WheelApp,
    menu_file::{MenuEntry, MenuFile},
    simulate::SimulationPlan,
};

/// Range of the random spin duration used when `--spin-ms` is omitted.
const RANDOM_SPIN_MS: std::ops::Range<u64> = 500..3_000;

/// Spin a weighted wheel of items.
#[derive(Debug, Parser)]
#[command(name = "lucky-wheel", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Opens the wheel window (default).
    Gui(GuiArgs),
    /// Spins once without a window and prints the winner.
    Simulate(SimulateArgs),
}

/// Items to place on the wheel before it starts.
#[derive(Debug, Args, Default)]
struct MenuArgs {
    /// TOML menu file with `[[item]]` entries.
    #[arg(long, value_name = "FILE")]
    menu: Option<PathBuf>,
    /// Extra item as NAME or NAME:WEIGHT, may be repeated.
    #[arg(long = "item", value_name = "NAME:WEIGHT")]
    items: Vec<MenuEntry>,
    /// Seed for colours and the random spin duration.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Args, Default)]
struct GuiArgs {
    #[command(flatten)]
    menu: MenuArgs,
    /// Synchronise presentation with the display refresh rate (default).
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,
    /// Render as fast as possible.
    #[arg(long = "no-vsync", overrides_with = "vsync")]
    no_vsync: bool,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    #[command(flatten)]
    menu: MenuArgs,
    /// Milliseconds between the start of the spin and the stop request.
    #[arg(long, value_name = "MS")]
    spin_ms: Option<u64>,
    /// Milliseconds between two ticks.
    #[arg(long, value_name = "MS", default_value_t = 16)]
    frame_ms: u64,
}

/// Entry point for the Lucky Wheel command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Some(CliCommand::Simulate(args)) => run_simulation(args),
        Some(CliCommand::Gui(args)) => run_gui(args),
        None => run_gui(GuiArgs::default()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);
    Registry::default().with(filter).with(fmt_layer).init();
}

impl MenuArgs {
    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Builds a world holding the file's items followed by `--item` entries.
    fn build_world(&self) -> Result<World> {
        let mut menu = match &self.menu {
            Some(path) => {
                let menu = MenuFile::load(path)?;
                info!(path = %path.display(), items = menu.items.len(), "loaded menu");
                menu
            }
            None => MenuFile::default(),
        };
        menu.extend(self.items.iter().cloned());

        let mut world = World::new();
        let mut events = Vec::new();
        for command in menu.to_commands() {
            world::apply(&mut world, command, &mut events);
        }
        Ok(world)
    }
}

fn run_gui(args: GuiArgs) -> Result<()> {
    let world = args.menu.build_world()?;
    info!("{}", query::welcome_banner(&world));
    if query::items(&world).is_empty() {
        warn!("the wheel starts empty, add items from the side panel");
    }

    let mut app = WheelApp::new(world, args.menu.seed());
    let scene = app.initial_scene();
    let presentation = Presentation::new("Lucky Wheel", Color::from_rgb_u8(32, 34, 40), scene);

    MacroquadBackend::default()
        .with_vsync(args.vsync || !args.no_vsync)
        .run(presentation, move |now, input, scene| {
            app.frame(now, input, scene)
        })
}

fn run_simulation(args: SimulateArgs) -> Result<()> {
    let mut world = args.menu.build_world()?;
    let seed = args.menu.seed();
    let spin_ms = args
        .spin_ms
        .unwrap_or_else(|| ChaCha8Rng::seed_from_u64(seed).gen_range(RANDOM_SPIN_MS));
    let plan = SimulationPlan {
        spin: Duration::from_millis(spin_ms),
        frame: Duration::from_millis(args.frame_ms),
    };

    println!("{}", query::welcome_banner(&world));
    for (ordinal, item, probability) in simulate::probability_table(&world) {
        println!(
            "{ordinal:>3}. {} x{} {:>6.2}%",
            item.name,
            item.weight,
            probability * 100.0
        );
    }

    let report = simulate::run(&mut world, plan)?;
    info!(
        spin_ms,
        frame_ms = args.frame_ms,
        ticks = report.ticks,
        settled_ms = report.settled_at.as_millis() as u64,
        "simulation finished"
    );
    match report.winner {
        Some(item) => println!("Winner: {}", item.name),
        None => println!("Winner: none"),
    }

    Ok(())
}

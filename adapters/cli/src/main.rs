#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the grid pursuit simulation headlessly.
//!
//! The binary seeds a world from a scenario (or an imported layout string),
//! runs a fixed number of ticks with a scripted player, and reports how the
//! pursuit played out. It is the reference driver for soak runs and for
//! reproducing seeds reported from interactive sessions.

mod scenario_transfer;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::Vec2;
use grid_pursuit_core::{Command, Event, WorldPos, WorldVec, TICK_RATE};
use grid_pursuit_rendering::{
    Color, GridPresentation, HealthBarPresentation, ObstaclePresentation, Presentation, Scene,
    SceneAgent, ScenePlayer, GRID_LINE_COLOR, OBSTACLE_COLOR,
};
use grid_pursuit_system_scenario::{Scenario, ScenarioConfig};
use grid_pursuit_world::{apply, query, World};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::scenario_transfer::ArenaLayoutSnapshot;

/// Title reported for the described frame.
const WINDOW_TITLE: &str = "Grid Pursuit";
/// Background color an interactive frontend would clear each frame with.
const CLEAR_COLOR: Color = Color::from_rgb_u8(15, 10, 25);

/// Headings the random walk cycles through, including standing still.
const COMPASS_HEADINGS: [WorldVec; 9] = [
    WorldVec::ZERO,
    WorldVec::new(0.0, -1.0),
    WorldVec::new(1.0, -1.0),
    WorldVec::new(1.0, 0.0),
    WorldVec::new(1.0, 1.0),
    WorldVec::new(0.0, 1.0),
    WorldVec::new(-1.0, 1.0),
    WorldVec::new(-1.0, 0.0),
    WorldVec::new(-1.0, -1.0),
];
/// Fewest ticks the random walk holds one heading.
const MIN_HEADING_TICKS: u32 = 15;
/// Most ticks the random walk holds one heading.
const MAX_HEADING_TICKS: u32 = 45;

/// Command-line arguments understood by the simulator.
#[derive(Debug, Parser)]
#[command(name = "grid-pursuit", about = "Headless driver for the grid pursuit simulation")]
struct Args {
    /// Number of fixed ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Overrides the obstacle scatter seed from the scenario config.
    #[arg(long)]
    seed: Option<u64>,
    /// Path to a TOML scenario configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Arena layout string replacing the scenario's obstacle scatter.
    #[arg(long, value_name = "STRING")]
    layout: Option<String>,
    /// Prints the arena layout string after setup and exits.
    #[arg(long)]
    export_layout: bool,
    /// Movement pattern driving the simulated player.
    #[arg(long, value_enum, default_value = "hold")]
    walk: WalkPattern,
    /// Prints every event as it is emitted.
    #[arg(long)]
    events: bool,
}

/// Movement patterns available for the simulated player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum WalkPattern {
    /// The player stands still for the whole run.
    Hold,
    /// The player wanders on a seeded random walk.
    Random,
}

/// Entry point for the grid pursuit command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.obstacle_seed = seed;
    }
    let scenario = Scenario::new(config).context("scenario configuration is invalid")?;

    let mut world = World::new();
    let mut events = Vec::new();
    let setup = match args.layout.as_deref() {
        Some(text) => layout_setup(text, config)?,
        None => scenario.commands(),
    };
    for command in setup {
        apply(&mut world, command, &mut events);
    }
    if args.events {
        report_events(&events);
    }
    events.clear();

    println!("{}", query::welcome_banner(&world));

    if args.export_layout {
        println!("{}", capture_layout(&world).encode());
        return Ok(());
    }

    let mut walk = PlayerWalk::new(args.walk, config.obstacle_seed);
    let mut strikes_taken: u64 = 0;
    let mut died_on = None;
    for _ in 0..args.ticks {
        if let Some(direction) = walk.direction() {
            apply(&mut world, Command::MovePlayer { direction }, &mut events);
        }
        apply(&mut world, Command::Tick, &mut events);
        if args.events {
            report_events(&events);
        }
        for event in &events {
            match event {
                Event::PlayerStruck { .. } => strikes_taken += 1,
                Event::PlayerDied => died_on = Some(query::tick(&world)),
                _ => {}
            }
        }
        events.clear();
        if died_on.is_some() {
            break;
        }
    }

    report_summary(&world, strikes_taken, died_on)
}

/// Reads a scenario config from disk, falling back to the stock scenario.
fn load_config(path: Option<&Path>) -> Result<ScenarioConfig> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("could not read scenario config {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("could not parse scenario config {}", path.display()))
        }
        None => Ok(ScenarioConfig::default()),
    }
}

/// Builds the setup batch for an imported layout string.
///
/// The layout supplies the grid and obstacles; the player and agents still
/// come from the scenario config, revalidated against the imported arena.
fn layout_setup(text: &str, mut config: ScenarioConfig) -> Result<Vec<Command>> {
    let snapshot =
        ArenaLayoutSnapshot::decode(text).context("could not decode the layout string")?;
    config.columns = snapshot.columns;
    config.rows = snapshot.rows;
    config.cell_size = snapshot.cell_size;
    let scenario =
        Scenario::new(config).context("imported layout does not fit the scenario config")?;

    let mut commands = vec![Command::ConfigureGrid {
        columns: snapshot.columns,
        rows: snapshot.rows,
        cell_size: snapshot.cell_size,
    }];
    for cell in &snapshot.obstacles {
        commands.push(Command::AddObstacle {
            position: WorldPos::new(
                cell.column() as f32 * snapshot.cell_size,
                cell.row() as f32 * snapshot.cell_size,
            ),
        });
    }
    commands.extend(scenario.spawn_commands());
    Ok(commands)
}

/// Captures the world's current arena as a transferable snapshot.
fn capture_layout(world: &World) -> ArenaLayoutSnapshot {
    let grid = query::grid_view(world);
    ArenaLayoutSnapshot {
        columns: grid.columns(),
        rows: grid.rows(),
        cell_size: grid.cell_size(),
        obstacles: grid.obstacles(),
    }
}

/// Chooses the player's movement intent for each tick.
enum PlayerWalk {
    /// No movement is ever requested.
    Hold,
    /// Headings are drawn from a seeded stream and held for a stretch.
    Random {
        /// Deterministic heading source.
        rng: ChaCha8Rng,
        /// Heading currently being held.
        heading: WorldVec,
        /// Ticks left before the next heading is drawn.
        remaining: u32,
    },
}

impl PlayerWalk {
    fn new(pattern: WalkPattern, seed: u64) -> Self {
        match pattern {
            WalkPattern::Hold => Self::Hold,
            WalkPattern::Random => Self::Random {
                rng: ChaCha8Rng::seed_from_u64(seed),
                heading: WorldVec::ZERO,
                remaining: 0,
            },
        }
    }

    /// Movement intent for the next tick, or `None` to stand still.
    fn direction(&mut self) -> Option<WorldVec> {
        match self {
            Self::Hold => None,
            Self::Random {
                rng,
                heading,
                remaining,
            } => {
                if *remaining == 0 {
                    *heading = COMPASS_HEADINGS[rng.gen_range(0..COMPASS_HEADINGS.len())];
                    *remaining = rng.gen_range(MIN_HEADING_TICKS..=MAX_HEADING_TICKS);
                }
                *remaining -= 1;
                (*heading != WorldVec::ZERO).then_some(*heading)
            }
        }
    }
}

fn report_events(events: &[Event]) {
    for event in events {
        println!("  {event:?}");
    }
}

/// Prints the end-of-run report, including a description of the final frame.
fn report_summary(world: &World, strikes_taken: u64, died_on: Option<u64>) -> Result<()> {
    println!("ticks simulated: {}", query::tick(world));
    let survived = query::survival_ticks(world);
    let seconds = survived as f32 / TICK_RATE as f32;
    match died_on {
        Some(tick) => {
            println!("player died on tick {tick} after surviving {survived} ticks ({seconds:.1}s)");
        }
        None => println!("player survived {survived} ticks ({seconds:.1}s)"),
    }
    println!("strikes taken: {strikes_taken}");
    if let Some(player) = query::player_view(world) {
        if player.alive {
            println!(
                "player at ({:.1}, {:.1}) with {}/{} health",
                player.position.x(),
                player.position.y(),
                player.health.get(),
                player.max_health,
            );
        }
    }
    for agent in query::agent_view(world).into_vec() {
        let activity = if agent.alive {
            format!("{:?}", agent.state)
        } else {
            "down".to_owned()
        };
        println!(
            "agent {}: {activity} at ({:.1}, {:.1}) with {}/{} health",
            agent.id.get(),
            agent.position.x(),
            agent.position.y(),
            agent.health.get(),
            agent.max_health,
        );
    }

    let presentation = presentation_for(world)?;
    let agents = &presentation.scene.agents;
    let paths = agents.iter().filter(|agent| agent.path_visible()).count();
    let rings = agents.iter().filter(|agent| agent.ring_visible()).count();
    println!(
        "frame \"{}\": {} obstacle blocks, {} agent discs, {paths} visible paths, {rings} detection rings",
        presentation.window_title,
        presentation.scene.obstacles.len(),
        agents.len(),
    );
    Ok(())
}

/// Assembles the presentation an interactive frontend would draw right now.
fn presentation_for(world: &World) -> Result<Presentation> {
    let grid_view = query::grid_view(world);
    let grid = GridPresentation::new(
        grid_view.columns(),
        grid_view.rows(),
        grid_view.cell_size(),
        GRID_LINE_COLOR,
    )?;
    let obstacles = grid_view
        .obstacles()
        .into_iter()
        .map(|cell| ObstaclePresentation::new(cell, OBSTACLE_COLOR))
        .collect();
    let agents = query::agent_view(world)
        .iter()
        .filter(|agent| agent.alive)
        .map(|agent| {
            SceneAgent::new(
                agent.id,
                to_screen(agent.position),
                agent.radius,
                agent.state,
                agent.health.get(),
                agent.max_health,
                agent.path.iter().copied().map(to_screen).collect(),
            )
            .with_detection_range(agent.detection_range)
        })
        .collect();
    let player = query::player_view(world).map(|player| {
        ScenePlayer::new(
            to_screen(player.position),
            player.radius,
            player.health.get(),
            player.max_health,
            player.alive,
        )
    });
    let scene = Scene::new(
        grid,
        obstacles,
        agents,
        player,
        HealthBarPresentation::standard(),
    );
    Ok(Presentation::new(WINDOW_TITLE, CLEAR_COLOR, scene))
}

fn to_screen(position: WorldPos) -> Vec2 {
    Vec2::new(position.x(), position.y())
}

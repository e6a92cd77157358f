#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scenario assembly for Grid Pursuit arenas.
//!
//! A [`Scenario`] turns a validated [`ScenarioConfig`] into the command batch
//! that seeds a fresh world: the grid, a deterministic obstacle scatter, the
//! player at the arena center, and one agent home inset from each corner.

use std::{error::Error, fmt};

use grid_pursuit_core::{AgentTuning, CellCoord, Command, WorldPos};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const DEFAULT_GRID_COLUMNS: u32 = 30;
const DEFAULT_GRID_ROWS: u32 = 20;
const DEFAULT_CELL_SIZE: f32 = 40.0;
const DEFAULT_OBSTACLE_COUNT: u32 = 18;
// Seeds must stay below i64::MAX so configs survive the TOML integer range.
const DEFAULT_OBSTACLE_SEED: u64 = 0x2545_f491_4f6c_dd1d;
const DEFAULT_CORNER_INSET: f32 = 200.0;

/// Cells kept clear between scattered obstacles and every arena border.
const SCATTER_MARGIN: u32 = 2;

/// Attempts shared by the whole scatter before it gives up.
const SCATTER_ATTEMPT_BUDGET: u32 = 100;

/// Obstacles are rejected within this many cells of the player spawn, per
/// axis.
const PLAYER_CLEARANCE_CELLS: u32 = 3;

/// Declarative description of one pursuit arena.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Number of cell columns laid out across the arena.
    pub columns: u32,
    /// Number of cell rows laid out down the arena.
    pub rows: u32,
    /// Side length of each square cell in world units.
    pub cell_size: f32,
    /// Obstacles the scatter aims to place.
    pub obstacle_count: u32,
    /// Seed driving the obstacle scatter.
    pub obstacle_seed: u64,
    /// Distance from each arena corner to the agent home anchored there.
    pub corner_inset: f32,
    /// Tuning applied to every spawned agent.
    pub agent_tuning: AgentTuning,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_GRID_COLUMNS,
            rows: DEFAULT_GRID_ROWS,
            cell_size: DEFAULT_CELL_SIZE,
            obstacle_count: DEFAULT_OBSTACLE_COUNT,
            obstacle_seed: DEFAULT_OBSTACLE_SEED,
            corner_inset: DEFAULT_CORNER_INSET,
            agent_tuning: AgentTuning::default(),
        }
    }
}

/// Validated scenario ready to emit its world commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scenario {
    config: ScenarioConfig,
}

impl Scenario {
    /// Validates the config and wraps it into a scenario.
    pub fn new(config: ScenarioConfig) -> Result<Self, ScenarioError> {
        let interior = 2 * SCATTER_MARGIN + 1;
        if config.columns < interior || config.rows < interior {
            return Err(ScenarioError::ArenaTooSmall {
                columns: config.columns,
                rows: config.rows,
            });
        }
        if !(config.cell_size.is_finite() && config.cell_size > 0.0) {
            return Err(ScenarioError::InvalidCellSize {
                cell_size: config.cell_size,
            });
        }
        let width = config.columns as f32 * config.cell_size;
        let height = config.rows as f32 * config.cell_size;
        if !(config.corner_inset > 0.0
            && 2.0 * config.corner_inset < width
            && 2.0 * config.corner_inset < height)
        {
            return Err(ScenarioError::InsetOutsideArena {
                corner_inset: config.corner_inset,
            });
        }

        Ok(Self { config })
    }

    /// Config the scenario was validated from.
    #[must_use]
    pub const fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Emits the command batch that seeds a fresh world with this scenario.
    ///
    /// The batch opens with the grid, follows with the obstacle scatter, then
    /// places the player at the arena center and spawns one agent per corner
    /// home in NW, NE, SW, SE order. The same config always produces the same
    /// batch.
    #[must_use]
    pub fn commands(&self) -> Vec<Command> {
        let config = &self.config;
        let player_cell = CellCoord::new(config.columns / 2, config.rows / 2);

        let mut commands = vec![Command::ConfigureGrid {
            columns: config.columns,
            rows: config.rows,
            cell_size: config.cell_size,
        }];

        let mut rng = ChaCha8Rng::seed_from_u64(config.obstacle_seed);
        let highest_column = config.columns - 1 - SCATTER_MARGIN;
        let highest_row = config.rows - 1 - SCATTER_MARGIN;
        let mut placed = 0;
        let mut attempts = 0;
        while placed < config.obstacle_count && attempts < SCATTER_ATTEMPT_BUDGET {
            attempts += 1;
            let column = rng.gen_range(SCATTER_MARGIN..=highest_column);
            let row = rng.gen_range(SCATTER_MARGIN..=highest_row);
            if column.abs_diff(player_cell.column()) <= PLAYER_CLEARANCE_CELLS
                && row.abs_diff(player_cell.row()) <= PLAYER_CLEARANCE_CELLS
            {
                continue;
            }
            commands.push(Command::AddObstacle {
                position: WorldPos::new(
                    column as f32 * config.cell_size,
                    row as f32 * config.cell_size,
                ),
            });
            placed += 1;
        }

        commands.extend(self.spawn_commands());

        commands
    }

    /// Emits only the population half of the batch, without the arena.
    ///
    /// Useful when the grid and obstacles come from elsewhere, such as an
    /// imported layout, while the player and agents still follow this config.
    #[must_use]
    pub fn spawn_commands(&self) -> Vec<Command> {
        let config = &self.config;
        let width = config.columns as f32 * config.cell_size;
        let height = config.rows as f32 * config.cell_size;

        let mut commands = vec![Command::PlacePlayer {
            position: WorldPos::new(width / 2.0, height / 2.0),
        }];

        for home in corner_homes(width, height, config.corner_inset) {
            commands.push(Command::SpawnAgent {
                home,
                tuning: config.agent_tuning,
            });
        }

        commands
    }
}

fn corner_homes(width: f32, height: f32, inset: f32) -> [WorldPos; 4] {
    [
        WorldPos::new(inset, inset),
        WorldPos::new(width - inset, inset),
        WorldPos::new(inset, height - inset),
        WorldPos::new(width - inset, height - inset),
    ]
}

/// Reasons a [`ScenarioConfig`] fails validation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScenarioError {
    /// The grid leaves no interior cells for the obstacle scatter.
    ArenaTooSmall {
        /// Provided column count that failed validation.
        columns: u32,
        /// Provided row count that failed validation.
        rows: u32,
    },
    /// The cell size cannot describe a usable arena.
    InvalidCellSize {
        /// Provided cell size that failed validation.
        cell_size: f32,
    },
    /// The corner inset pushes agent homes outside or across the arena.
    InsetOutsideArena {
        /// Provided inset that failed validation.
        corner_inset: f32,
    },
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArenaTooSmall { columns, rows } => {
                write!(
                    f,
                    "arena must span at least 5x5 cells (received {columns}x{rows})"
                )
            }
            Self::InvalidCellSize { cell_size } => {
                write!(
                    f,
                    "cell_size must be positive and finite (received {cell_size})"
                )
            }
            Self::InsetOutsideArena { corner_inset } => {
                write!(
                    f,
                    "corner_inset must place homes inside the arena (received {corner_inset})"
                )
            }
        }
    }
}

impl Error for ScenarioError {}

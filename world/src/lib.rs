#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Grid Pursuit.

mod player;

use grid_pursuit_core::{AgentId, BlockCause, Command, Event, WELCOME_BANNER};
use grid_pursuit_system_behavior::{self as behavior, Agent, BlockReport};
use grid_pursuit_system_pathfinding::ObstacleGrid;
use grid_pursuit_system_steering::Disc;

use crate::player::Player;

const DEFAULT_GRID_COLUMNS: u32 = 30;
const DEFAULT_GRID_ROWS: u32 = 20;
const DEFAULT_CELL_SIZE: f32 = 40.0;

/// Authoritative state of one pursuit arena.
///
/// All mutation flows through [`apply`]; adapters observe the world through
/// [`query`] and through the events emitted by commands.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: ObstacleGrid,
    agents: Vec<Agent>,
    player: Option<Player>,
    next_agent_id: u32,
    tick_index: u64,
    survival_ticks: u64,
}

impl World {
    /// Creates a new Grid Pursuit world with the stock arena dimensions and
    /// no obstacles, agents, or player.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid: ObstacleGrid::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, DEFAULT_CELL_SIZE),
            agents: Vec::new(),
            player: None,
            next_agent_id: 0,
            tick_index: 0,
            survival_ticks: 0,
        }
    }

    fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|agent| agent.id() == id)
    }

    /// Runs every living agent through one behavior tick.
    ///
    /// Agents update in roster order against the committed positions of the
    /// tick so far. A dead player freezes the roster entirely; an absent
    /// player leaves the agents patrolling.
    fn advance_agents(&mut self, out_events: &mut Vec<Event>) {
        if let Some(player) = self.player.as_ref() {
            if !player.is_alive() {
                return;
            }
            self.survival_ticks = self.survival_ticks.saturating_add(1);
        }

        let player_position = self.player.as_ref().map(|player| player.position);

        for index in 0..self.agents.len() {
            if !self.agents[index].is_alive() {
                continue;
            }

            let neighbors: Vec<Disc> = self
                .agents
                .iter()
                .enumerate()
                .filter(|(other, agent)| *other != index && agent.is_alive())
                .map(|(_, agent)| agent.body())
                .collect();

            let report = behavior::update(
                &mut self.agents[index],
                player_position,
                &self.grid,
                &neighbors,
            );
            let id = self.agents[index].id();

            if let Some(movement) = report.movement {
                out_events.push(Event::AgentMoved {
                    agent: id,
                    from: movement.from,
                    to: movement.to,
                });
            }
            if let Some(block) = report.block {
                let cause = match block {
                    BlockReport::Obstacle => BlockCause::Obstacle,
                    BlockReport::Neighbor { .. } => BlockCause::Neighbor,
                };
                out_events.push(Event::AgentBlocked { agent: id, cause });
            }
            if report.state_after != report.state_before {
                out_events.push(Event::AgentStateChanged {
                    agent: id,
                    from: report.state_before,
                    to: report.state_after,
                });
            }
            if report.struck_player {
                let damage = self.agents[index].tuning().strike_damage();
                if let Some(player) = self.player.as_mut() {
                    if player.is_alive() {
                        let remaining = player.absorb_damage(damage);
                        out_events.push(Event::PlayerStruck {
                            agent: id,
                            damage,
                            remaining,
                        });
                        if remaining.is_depleted() {
                            out_events.push(Event::PlayerDied);
                        }
                    }
                }
            }
        }
    }
}

/// Applies a command to the world, emitting the resulting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid {
            columns,
            rows,
            cell_size,
        } => {
            world.grid = ObstacleGrid::new(columns, rows, cell_size);
            out_events.push(Event::GridConfigured {
                columns,
                rows,
                cell_size,
            });
        }
        Command::AddObstacle { position } => {
            if let Some(cell) = world.grid.add_obstacle(position) {
                out_events.push(Event::ObstacleAdded { cell });
            }
        }
        Command::RemoveObstacle { position } => {
            if let Some(cell) = world.grid.remove_obstacle(position) {
                out_events.push(Event::ObstacleRemoved { cell });
            }
        }
        Command::PlacePlayer { position } => {
            world.player = Some(Player::place(position));
            out_events.push(Event::PlayerPlaced { position });
        }
        Command::MovePlayer { direction } => {
            if let Some(player) = world.player.as_mut() {
                if player.is_alive() {
                    if let Some((from, to)) = player.attempt_move(direction, &world.grid) {
                        out_events.push(Event::PlayerMoved { from, to });
                    }
                }
            }
        }
        Command::SpawnAgent { home, tuning } => {
            let id = AgentId::new(world.next_agent_id);
            world.next_agent_id = world.next_agent_id.saturating_add(1);
            world.agents.push(Agent::spawn(id, home, tuning));
            out_events.push(Event::AgentSpawned { agent: id, home });
        }
        Command::DamageAgent { agent, amount } => {
            if let Some(target) = world.agent_mut(agent) {
                if target.is_alive() {
                    let remaining = target.absorb_damage(amount);
                    out_events.push(Event::AgentDamaged { agent, remaining });
                    if remaining.is_depleted() {
                        out_events.push(Event::AgentDied { agent });
                    }
                }
            }
        }
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
            world.advance_agents(out_events);
        }
        Command::ResetScenario => {
            for agent in world.agents.iter_mut() {
                agent.reset();
            }
            if let Some(player) = world.player.as_mut() {
                player.reset();
            }
            world.survival_ticks = 0;
            out_events.push(Event::ScenarioReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{
        player::{PLAYER_MAX_HEALTH, PLAYER_RADIUS},
        ObstacleGrid, World,
    };
    use grid_pursuit_core::{AgentId, AgentState, CellCoord, Health, WorldPos};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Exposes a read-only view of the arena grid and its obstacles.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        GridView { grid: &world.grid }
    }

    /// Captures a read-only view of the pursuit agents.
    #[must_use]
    pub fn agent_view(world: &World) -> AgentView {
        let mut snapshots: Vec<AgentSnapshot> = world
            .agents
            .iter()
            .map(|agent| AgentSnapshot {
                id: agent.id(),
                position: agent.position(),
                home: agent.home(),
                state: agent.state(),
                previous_state: agent.previous_state(),
                health: agent.health(),
                max_health: agent.tuning().max_health(),
                alive: agent.is_alive(),
                radius: agent.tuning().radius(),
                detection_range: agent.tuning().detection_range(),
                path: agent.remaining_path().to_vec(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        AgentView { snapshots }
    }

    /// Captures a read-only snapshot of the player, if one was placed.
    #[must_use]
    pub fn player_view(world: &World) -> Option<PlayerSnapshot> {
        world.player.as_ref().map(|player| PlayerSnapshot {
            position: player.position,
            health: player.health,
            max_health: PLAYER_MAX_HEALTH,
            radius: PLAYER_RADIUS,
            alive: player.is_alive(),
        })
    }

    /// Number of ticks the world has advanced since creation.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of ticks the player survived since placement or the last reset.
    #[must_use]
    pub fn survival_ticks(world: &World) -> u64 {
        world.survival_ticks
    }

    /// Read-only view into the arena grid.
    #[derive(Clone, Copy, Debug)]
    pub struct GridView<'a> {
        grid: &'a ObstacleGrid,
    }

    impl GridView<'_> {
        /// Number of cell columns laid out across the arena.
        #[must_use]
        pub fn columns(&self) -> u32 {
            self.grid.columns()
        }

        /// Number of cell rows laid out down the arena.
        #[must_use]
        pub fn rows(&self) -> u32 {
            self.grid.rows()
        }

        /// Side length of a single square cell in world units.
        #[must_use]
        pub fn cell_size(&self) -> f32 {
            self.grid.cell_size()
        }

        /// Total arena width in world units.
        #[must_use]
        pub fn arena_width(&self) -> f32 {
            self.grid.arena_width()
        }

        /// Total arena height in world units.
        #[must_use]
        pub fn arena_height(&self) -> f32 {
            self.grid.arena_height()
        }

        /// Reports whether the cell lies inside the arena and carries no
        /// obstacle.
        #[must_use]
        pub fn is_walkable(&self, cell: CellCoord) -> bool {
            self.grid.is_walkable(cell)
        }

        /// Reports whether the position maps to a walkable cell.
        #[must_use]
        pub fn is_walkable_at(&self, position: WorldPos) -> bool {
            self.grid.is_walkable_at(position)
        }

        /// Enumerates the blocked cells in deterministic order.
        #[must_use]
        pub fn obstacles(&self) -> Vec<CellCoord> {
            let mut cells: Vec<CellCoord> = self.grid.obstacles().collect();
            cells.sort_unstable();
            cells
        }
    }

    /// Read-only snapshot describing all pursuit agents.
    #[derive(Clone, Debug)]
    pub struct AgentView {
        snapshots: Vec<AgentSnapshot>,
    }

    impl AgentView {
        /// Iterator over the captured agent snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &AgentSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<AgentSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single agent's state used for queries.
    #[derive(Clone, Debug, PartialEq)]
    pub struct AgentSnapshot {
        /// Unique identifier assigned to the agent.
        pub id: AgentId,
        /// Position the agent currently occupies.
        pub position: WorldPos,
        /// Home anchor the agent patrols around.
        pub home: WorldPos,
        /// Behavior state the agent currently occupies.
        pub state: AgentState,
        /// Behavior state the agent occupied before the last transition.
        pub previous_state: AgentState,
        /// Remaining health points.
        pub health: Health,
        /// Health points the agent spawned with.
        pub max_health: u32,
        /// Whether the agent still participates in the simulation.
        pub alive: bool,
        /// Radius of the agent's body disc in world units.
        pub radius: f32,
        /// Distance at which the agent notices the player.
        pub detection_range: f32,
        /// Waypoints the agent still intends to visit.
        pub path: Vec<WorldPos>,
    }

    /// Immutable representation of the player's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct PlayerSnapshot {
        /// Position the player currently occupies.
        pub position: WorldPos,
        /// Remaining health points.
        pub health: Health,
        /// Health points the player spawned with.
        pub max_health: u32,
        /// Radius of the player's body disc in world units.
        pub radius: f32,
        /// Whether the player still has health points left.
        pub alive: bool,
    }
}

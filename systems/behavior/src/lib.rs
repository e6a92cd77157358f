#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pursuit agent records and the state machine that drives them.
//!
//! Each agent owns a closed set of behavior states wired into a fixed
//! transition table. A tick runs the current state's handler first, then
//! evaluates the guards for that state in declaration order and fires at
//! most one transition; the new state's handler runs on the following tick.
//! The crate stays pure with respect to the roster: callers pass in the
//! arena grid, the player position, and neighbor body snapshots, and read
//! back a [`TickReport`] describing what happened.

use grid_pursuit_core::{AgentId, AgentState, AgentTuning, Health, WorldPos, WorldVec};
use grid_pursuit_system_pathfinding::{next_step, ObstacleGrid};
use grid_pursuit_system_steering::{advance_along_path, Disc, PathCursor, StepOutcome};

/// Half side length of the square patrol route around the home anchor.
pub const PATROL_SPAN: f32 = 100.0;

/// Distance at which a patrol corner counts as visited.
pub const PATROL_CORNER_RADIUS: f32 = 20.0;

/// Home distance below which a returning agent stops requesting paths.
pub const RETURN_ARRIVE_RADIUS: f32 = 30.0;

/// Home distance below which the return trip hands back to patrol.
pub const HOME_RADIUS: f32 = 50.0;

/// Autonomous pursuit agent anchored to a home position.
///
/// Agents spawn at their home in [`AgentState::Patrol`] with a cleared
/// waypoint cursor and an elapsed strike cooldown, so the first attacking
/// tick can land a strike. All mutation beyond damage and resets happens
/// through [`update`].
#[derive(Clone, Debug)]
pub struct Agent {
    id: AgentId,
    position: WorldPos,
    home: WorldPos,
    health: Health,
    state: AgentState,
    previous_state: AgentState,
    cursor: PathCursor,
    patrol_corners: [WorldPos; 4],
    patrol_index: usize,
    last_known_player: Option<WorldPos>,
    strike_cooldown: u32,
    tuning: AgentTuning,
}

impl Agent {
    /// Creates an agent standing at its home anchor.
    #[must_use]
    pub fn spawn(id: AgentId, home: WorldPos, tuning: AgentTuning) -> Self {
        Self {
            id,
            position: home,
            home,
            health: Health::new(tuning.max_health()),
            state: AgentState::Patrol,
            previous_state: AgentState::Patrol,
            cursor: PathCursor::new(),
            patrol_corners: patrol_corners(home),
            patrol_index: 0,
            last_known_player: None,
            strike_cooldown: 0,
            tuning,
        }
    }

    /// Identifier allocated by the world.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Current position of the agent's body center.
    #[must_use]
    pub const fn position(&self) -> WorldPos {
        self.position
    }

    /// Home anchor the agent patrols around and returns to.
    #[must_use]
    pub const fn home(&self) -> WorldPos {
        self.home
    }

    /// Remaining health points.
    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    /// Behavior state the agent currently occupies.
    #[must_use]
    pub const fn state(&self) -> AgentState {
        self.state
    }

    /// Behavior state the agent occupied before its last transition.
    #[must_use]
    pub const fn previous_state(&self) -> AgentState {
        self.previous_state
    }

    /// Tuning profile the agent was spawned with.
    #[must_use]
    pub const fn tuning(&self) -> AgentTuning {
        self.tuning
    }

    /// Whether the agent still has health points left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    /// Position the player was last seen at while being chased.
    #[must_use]
    pub const fn last_known_player(&self) -> Option<WorldPos> {
        self.last_known_player
    }

    /// Waypoints still ahead of the agent, for overlays and diagnostics.
    #[must_use]
    pub fn remaining_path(&self) -> &[WorldPos] {
        self.cursor.remaining()
    }

    /// Body disc occupied by the agent.
    #[must_use]
    pub fn body(&self) -> Disc {
        Disc::new(self.position, self.tuning.radius())
    }

    /// Subtracts health points, saturating at zero, and reports the result.
    pub fn absorb_damage(&mut self, amount: u32) -> Health {
        self.health = self.health.damaged(amount);
        self.health
    }

    /// Restores the agent to its spawn configuration at the home anchor.
    pub fn reset(&mut self) {
        self.position = self.home;
        self.health = Health::new(self.tuning.max_health());
        self.previous_state = self.state;
        self.state = AgentState::Patrol;
        self.cursor.clear();
        self.patrol_index = 0;
        self.last_known_player = None;
        self.strike_cooldown = 0;
    }
}

/// Committed movement produced by one tick of locomotion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Movement {
    /// Position the agent occupied before the tick.
    pub from: WorldPos,
    /// Position the agent occupies after the tick.
    pub to: WorldPos,
}

/// Cancelled movement produced by one tick of locomotion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BlockReport {
    /// The destination cell was blocked or outside the arena.
    Obstacle,
    /// The destination overlapped a neighboring body; the abandoned
    /// post-separation candidate is surfaced for diagnostics.
    Neighbor {
        /// Candidate position after symmetric separation, never committed.
        separated: WorldPos,
    },
}

/// Everything a single [`update`] call did to an agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    /// State the agent occupied when the tick began.
    pub state_before: AgentState,
    /// State the agent occupies after guard evaluation.
    pub state_after: AgentState,
    /// Committed movement, if locomotion moved the body this tick.
    pub movement: Option<Movement>,
    /// Cancelled movement, if locomotion froze the body this tick.
    pub block: Option<BlockReport>,
    /// Whether the agent landed a strike on the player this tick.
    pub struck_player: bool,
}

/// Handler output shared by the locomotion-driven states.
#[derive(Clone, Copy, Debug, Default)]
struct Locomotion {
    movement: Option<Movement>,
    block: Option<BlockReport>,
}

/// Advances one agent by one fixed tick.
///
/// The strike cooldown decrements first, then the current state's handler
/// runs, then the guards fire at most one transition. Callers must skip dead
/// agents and pass neighbor discs that exclude the agent itself; processing
/// the roster one agent at a time means each agent observes the committed
/// positions of agents updated earlier in the same tick.
pub fn update(
    agent: &mut Agent,
    player: Option<WorldPos>,
    grid: &ObstacleGrid,
    neighbors: &[Disc],
) -> TickReport {
    let state_before = agent.state;

    if agent.strike_cooldown > 0 {
        agent.strike_cooldown -= 1;
    }

    let mut struck_player = false;
    let locomotion = match agent.state {
        AgentState::Patrol => run_patrol(agent, grid, neighbors),
        AgentState::Chase => run_chase(agent, player, grid, neighbors),
        AgentState::Attack => {
            struck_player = run_attack(agent);
            Locomotion::default()
        }
        AgentState::Return => run_return(agent, grid, neighbors),
    };

    if let Some(next) = next_state(agent, player) {
        transition(agent, next);
    }

    TickReport {
        state_before,
        state_after: agent.state,
        movement: locomotion.movement,
        block: locomotion.block,
        struck_player,
    }
}

fn run_patrol(agent: &mut Agent, grid: &ObstacleGrid, neighbors: &[Disc]) -> Locomotion {
    let corner = agent.patrol_corners[agent.patrol_index];
    if agent.position.distance_to(corner) < PATROL_CORNER_RADIUS {
        agent.patrol_index = (agent.patrol_index + 1) % agent.patrol_corners.len();
        agent.cursor.clear();
    }

    if agent.cursor.is_exhausted() {
        let corner = agent.patrol_corners[agent.patrol_index];
        refresh_segment(agent, grid, corner);
    }

    step(agent, grid, neighbors)
}

fn run_chase(
    agent: &mut Agent,
    player: Option<WorldPos>,
    grid: &ObstacleGrid,
    neighbors: &[Disc],
) -> Locomotion {
    let Some(player) = player else {
        return Locomotion::default();
    };

    agent.last_known_player = Some(player);

    // A fresh single-waypoint segment every tick keeps the heading honest
    // against a moving target.
    if agent.position.distance_to(player) > agent.tuning.attack_range() {
        refresh_segment(agent, grid, player);
    }

    step(agent, grid, neighbors)
}

fn run_attack(agent: &mut Agent) -> bool {
    if agent.strike_cooldown == 0 {
        agent.strike_cooldown = agent.tuning.strike_cooldown();
        return true;
    }

    false
}

fn run_return(agent: &mut Agent, grid: &ObstacleGrid, neighbors: &[Disc]) -> Locomotion {
    if agent.position.distance_to(agent.home) > RETURN_ARRIVE_RADIUS {
        if agent.cursor.is_exhausted() {
            refresh_segment(agent, grid, agent.home);
        }
        return step(agent, grid, neighbors);
    }

    agent.cursor.clear();
    Locomotion::default()
}

fn refresh_segment(agent: &mut Agent, grid: &ObstacleGrid, goal: WorldPos) {
    match next_step(grid, agent.position, goal) {
        Some(waypoint) => agent.cursor.assign(vec![waypoint]),
        None => agent.cursor.clear(),
    }
}

fn step(agent: &mut Agent, grid: &ObstacleGrid, neighbors: &[Disc]) -> Locomotion {
    let from = agent.position;
    let body = agent.body();
    let speed = agent.tuning.speed();

    match advance_along_path(&body, speed, &mut agent.cursor, grid, neighbors) {
        StepOutcome::Moved { to } => {
            agent.position = to;
            Locomotion {
                movement: Some(Movement { from, to }),
                block: None,
            }
        }
        StepOutcome::BlockedByObstacle => Locomotion {
            movement: None,
            block: Some(BlockReport::Obstacle),
        },
        StepOutcome::BlockedByNeighbor { separated } => Locomotion {
            movement: None,
            block: Some(BlockReport::Neighbor { separated }),
        },
        StepOutcome::Idle | StepOutcome::WaypointReached => Locomotion::default(),
    }
}

fn next_state(agent: &Agent, player: Option<WorldPos>) -> Option<AgentState> {
    match agent.state {
        AgentState::Patrol => detects_player(agent, player).then_some(AgentState::Chase),
        AgentState::Chase => {
            if player_in_strike_reach(agent, player) {
                Some(AgentState::Attack)
            } else if lost_player_far_from_home(agent, player) {
                Some(AgentState::Return)
            } else {
                None
            }
        }
        AgentState::Attack => {
            if player_in_chase_band(agent, player) {
                Some(AgentState::Chase)
            } else if lost_player_far_from_home(agent, player) {
                Some(AgentState::Return)
            } else {
                None
            }
        }
        AgentState::Return => near_home(agent).then_some(AgentState::Patrol),
    }
}

fn transition(agent: &mut Agent, next: AgentState) {
    agent.previous_state = agent.state;
    agent.state = next;
    agent.cursor.clear();

    if next == AgentState::Patrol {
        agent.patrol_index = 0;
    }
}

fn detects_player(agent: &Agent, player: Option<WorldPos>) -> bool {
    player.map_or(false, |player| {
        agent.position.distance_to(player) <= agent.tuning.detection_range()
    })
}

fn player_in_strike_reach(agent: &Agent, player: Option<WorldPos>) -> bool {
    player.map_or(false, |player| {
        agent.position.distance_to(player) <= agent.tuning.attack_range()
    })
}

fn player_in_chase_band(agent: &Agent, player: Option<WorldPos>) -> bool {
    player.map_or(false, |player| {
        let distance = agent.position.distance_to(player);
        distance > agent.tuning.attack_range() && distance <= agent.tuning.detection_range()
    })
}

fn lost_player_far_from_home(agent: &Agent, player: Option<WorldPos>) -> bool {
    let lost = player.map_or(true, |player| {
        agent.position.distance_to(player) > agent.tuning.detection_range()
    });

    lost && agent.position.distance_to(agent.home) > agent.tuning.return_threshold()
}

fn near_home(agent: &Agent) -> bool {
    agent.position.distance_to(agent.home) <= HOME_RADIUS
}

fn patrol_corners(home: WorldPos) -> [WorldPos; 4] {
    [
        home.translated(WorldVec::new(-PATROL_SPAN, -PATROL_SPAN)),
        home.translated(WorldVec::new(PATROL_SPAN, -PATROL_SPAN)),
        home.translated(WorldVec::new(PATROL_SPAN, PATROL_SPAN)),
        home.translated(WorldVec::new(-PATROL_SPAN, PATROL_SPAN)),
    ]
}

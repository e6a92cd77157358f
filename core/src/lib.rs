#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Pursuit engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! actually happened. Systems stay pure: they read immutable snapshots and
//! produce new command batches, never touching world state directly.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Pursuit.";

/// Number of fixed simulation ticks that make up one second.
///
/// The simulation advances in whole ticks only; durations such as strike
/// cooldowns are expressed in ticks and divide by this rate when presented
/// as seconds.
pub const TICK_RATE: u32 = 60;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Rebuilds the arena grid with the provided dimensions, clearing any
    /// previously recorded obstacles.
    ConfigureGrid {
        /// Number of cell columns laid out across the arena.
        columns: u32,
        /// Number of cell rows laid out down the arena.
        rows: u32,
        /// Side length of each square cell measured in world units.
        cell_size: f32,
    },
    /// Marks the cell underneath the provided position as blocked.
    AddObstacle {
        /// World position identifying the cell to block.
        position: WorldPos,
    },
    /// Clears the obstacle from the cell underneath the provided position.
    RemoveObstacle {
        /// World position identifying the cell to unblock.
        position: WorldPos,
    },
    /// Creates the player disc, replacing any previous player.
    PlacePlayer {
        /// Spawn position remembered for scenario resets.
        position: WorldPos,
    },
    /// Requests player movement along the provided direction this tick.
    ///
    /// Each axis of the direction is scaled by the player's speed
    /// independently, so a diagonal request covers more ground than a
    /// cardinal one. The world rejects destinations that leave the arena or
    /// stand on a blocked cell.
    MovePlayer {
        /// Per-axis movement intent, typically unit components.
        direction: WorldVec,
    },
    /// Spawns a pursuit agent anchored to the provided home position.
    SpawnAgent {
        /// Anchor the agent patrols around and returns to.
        home: WorldPos,
        /// Behavioral tuning applied to the agent for its whole life.
        tuning: AgentTuning,
    },
    /// Applies damage to an existing agent.
    DamageAgent {
        /// Identifier of the agent absorbing the damage.
        agent: AgentId,
        /// Amount of health to subtract, saturating at zero.
        amount: u32,
    },
    /// Advances the simulation by exactly one fixed tick.
    Tick,
    /// Restores agents and player to their spawn configuration while keeping
    /// the arena layout intact.
    ResetScenario,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced one fixed tick.
    TimeAdvanced {
        /// Tick index after the advance, starting from one.
        tick: u64,
    },
    /// Confirms that the arena grid was rebuilt.
    GridConfigured {
        /// Number of cell columns in the new grid.
        columns: u32,
        /// Number of cell rows in the new grid.
        rows: u32,
        /// Side length of each square cell in world units.
        cell_size: f32,
    },
    /// Confirms that a cell became blocked.
    ObstacleAdded {
        /// Cell that now rejects movement.
        cell: CellCoord,
    },
    /// Confirms that a previously blocked cell became walkable again.
    ObstacleRemoved {
        /// Cell that accepts movement again.
        cell: CellCoord,
    },
    /// Confirms that the player disc entered the arena.
    PlayerPlaced {
        /// Position the player occupies, also its reset spawn.
        position: WorldPos,
    },
    /// Confirms that the player moved between two positions.
    PlayerMoved {
        /// Position the player occupied before the move.
        from: WorldPos,
        /// Position the player occupies after the move.
        to: WorldPos,
    },
    /// Reports that an agent landed a strike on the player.
    PlayerStruck {
        /// Identifier of the striking agent.
        agent: AgentId,
        /// Health points subtracted by the strike.
        damage: u32,
        /// Player health remaining after the strike.
        remaining: Health,
    },
    /// Announces that the player's health reached zero.
    PlayerDied,
    /// Confirms that an agent was created by the world.
    AgentSpawned {
        /// Identifier allocated to the new agent.
        agent: AgentId,
        /// Home anchor the agent patrols around.
        home: WorldPos,
    },
    /// Confirms that an agent moved between two positions.
    AgentMoved {
        /// Identifier of the agent that moved.
        agent: AgentId,
        /// Position the agent occupied before the move.
        from: WorldPos,
        /// Position the agent occupies after the move.
        to: WorldPos,
    },
    /// Reports that an agent's movement was cancelled this tick.
    AgentBlocked {
        /// Identifier of the agent that stayed in place.
        agent: AgentId,
        /// What stood in the agent's way.
        cause: BlockCause,
    },
    /// Announces that an agent transitioned between behavior states.
    AgentStateChanged {
        /// Identifier of the transitioning agent.
        agent: AgentId,
        /// State the agent left.
        from: AgentState,
        /// State the agent entered.
        to: AgentState,
    },
    /// Confirms that an agent absorbed damage.
    AgentDamaged {
        /// Identifier of the damaged agent.
        agent: AgentId,
        /// Health remaining after the damage was applied.
        remaining: Health,
    },
    /// Announces that an agent's health reached zero.
    AgentDied {
        /// Identifier of the agent that died.
        agent: AgentId,
    },
    /// Confirms that agents and player returned to their spawn configuration.
    ScenarioReset,
}

/// What prevented an agent from committing its movement for a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockCause {
    /// The destination cell was blocked or outside the arena.
    Obstacle,
    /// The destination overlapped another agent's body.
    Neighbor,
}

/// Behavior states available to a pursuit agent.
///
/// The set is closed: transitions are wired in the behavior system and no
/// state can be registered at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// Walking the fixed square of waypoints around the home anchor.
    Patrol,
    /// Re-pathing toward the player every tick while it stays in range.
    Chase,
    /// Standing at close range and striking on a cooldown.
    Attack,
    /// Walking back toward the home anchor after losing the player.
    Return,
}

/// Unique identifier assigned to a pursuit agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Position in continuous world space measured in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldPos {
    x: f32,
    y: f32,
}

impl WorldPos {
    /// Creates a new world position from explicit coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate, growing toward the east.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate, growing toward the south.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance between two world positions.
    #[must_use]
    pub fn distance_to(self, other: WorldPos) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Vector pointing from this position toward the other.
    #[must_use]
    pub fn offset_to(self, other: WorldPos) -> WorldVec {
        WorldVec::new(other.x - self.x, other.y - self.y)
    }

    /// Position reached by applying the provided offset.
    #[must_use]
    pub fn translated(self, offset: WorldVec) -> WorldPos {
        WorldPos::new(self.x + offset.dx(), self.y + offset.dy())
    }
}

/// Displacement in continuous world space measured in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldVec {
    dx: f32,
    dy: f32,
}

impl WorldVec {
    /// Displacement that leaves a position unchanged.
    pub const ZERO: WorldVec = WorldVec::new(0.0, 0.0);

    /// Creates a new displacement from explicit components.
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal component of the displacement.
    #[must_use]
    pub const fn dx(&self) -> f32 {
        self.dx
    }

    /// Vertical component of the displacement.
    #[must_use]
    pub const fn dy(&self) -> f32 {
        self.dy
    }

    /// Euclidean length of the displacement.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.dx.hypot(self.dy)
    }

    /// Unit-length displacement pointing the same way.
    ///
    /// A zero displacement normalizes to zero rather than producing NaN
    /// components, so callers can scale the result without checking.
    #[must_use]
    pub fn normalized(self) -> WorldVec {
        let length = self.length();
        if length == 0.0 {
            return WorldVec::ZERO;
        }
        WorldVec::new(self.dx / length, self.dy / length)
    }

    /// Displacement scaled by the provided factor.
    #[must_use]
    pub fn scaled(self, factor: f32) -> WorldVec {
        WorldVec::new(self.dx * factor, self.dy * factor)
    }
}

/// Remaining health of a player or agent measured in whole points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Health(u32);

impl Health {
    /// Creates a health value from a raw point count.
    #[must_use]
    pub const fn new(points: u32) -> Self {
        Self(points)
    }

    /// Retrieves the raw point count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Health remaining after absorbing the provided damage, never below zero.
    #[must_use]
    pub const fn damaged(self, amount: u32) -> Health {
        Self(self.0.saturating_sub(amount))
    }

    /// Whether no health points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }
}

/// Behavioral tuning applied to a pursuit agent at spawn time.
///
/// Distances are world units, durations are ticks. The [`Default`] values
/// describe the stock scenario agent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentTuning {
    radius: f32,
    speed: f32,
    detection_range: f32,
    attack_range: f32,
    return_threshold: f32,
    max_health: u32,
    strike_damage: u32,
    strike_cooldown: u32,
}

impl AgentTuning {
    /// Creates a tuning profile from explicit values.
    #[must_use]
    pub const fn new(
        radius: f32,
        speed: f32,
        detection_range: f32,
        attack_range: f32,
        return_threshold: f32,
        max_health: u32,
        strike_damage: u32,
        strike_cooldown: u32,
    ) -> Self {
        Self {
            radius,
            speed,
            detection_range,
            attack_range,
            return_threshold,
            max_health,
            strike_damage,
            strike_cooldown,
        }
    }

    /// Radius of the agent's body disc in world units.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Distance covered per tick while following a path.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Distance at which a patrolling agent notices the player.
    #[must_use]
    pub const fn detection_range(&self) -> f32 {
        self.detection_range
    }

    /// Distance at which a chasing agent switches to striking.
    #[must_use]
    pub const fn attack_range(&self) -> f32 {
        self.attack_range
    }

    /// Home distance beyond which an agent abandons the pursuit.
    #[must_use]
    pub const fn return_threshold(&self) -> f32 {
        self.return_threshold
    }

    /// Health points the agent spawns and resets with.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Health points subtracted from the player per landed strike.
    #[must_use]
    pub const fn strike_damage(&self) -> u32 {
        self.strike_damage
    }

    /// Ticks an agent must wait between successive strikes.
    #[must_use]
    pub const fn strike_cooldown(&self) -> u32 {
        self.strike_cooldown
    }
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self::new(20.0, 4.5, 150.0, 40.0, 200.0, 100, 5, 60)
    }
}

#[cfg(test)]
mod tests {
    use super::{AgentTuning, CellCoord, Health, WorldPos, WorldVec};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn world_distance_matches_three_four_five_triangle() {
        let a = WorldPos::new(0.0, 0.0);
        let b = WorldPos::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < f32::EPSILON);
        assert!((b.distance_to(a) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_offset_normalizes_to_zero_without_nan() {
        let normalized = WorldVec::ZERO.normalized();
        assert_eq!(normalized, WorldVec::ZERO);
        assert!(!normalized.dx().is_nan());
        assert!(!normalized.dy().is_nan());
    }

    #[test]
    fn normalized_offset_has_unit_length() {
        let normalized = WorldVec::new(10.0, 0.0).normalized();
        assert!((normalized.length() - 1.0).abs() < f32::EPSILON);
        assert!((normalized.dx() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn health_damage_saturates_at_zero() {
        let health = Health::new(3);
        let depleted = health.damaged(10);
        assert_eq!(depleted.get(), 0);
        assert!(depleted.is_depleted());
        assert!(!health.is_depleted());
    }

    #[test]
    fn default_tuning_matches_stock_scenario_agent() {
        let tuning = AgentTuning::default();
        assert!((tuning.radius() - 20.0).abs() < f32::EPSILON);
        assert!((tuning.speed() - 4.5).abs() < f32::EPSILON);
        assert!((tuning.detection_range() - 150.0).abs() < f32::EPSILON);
        assert!((tuning.attack_range() - 40.0).abs() < f32::EPSILON);
        assert!((tuning.return_threshold() - 200.0).abs() < f32::EPSILON);
        assert_eq!(tuning.max_health(), 100);
        assert_eq!(tuning.strike_damage(), 5);
        assert_eq!(tuning.strike_cooldown(), 60);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(12, 7));
    }

    #[test]
    fn agent_tuning_round_trips_through_bincode() {
        assert_round_trip(&AgentTuning::default());
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Grid Pursuit adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use grid_pursuit_core::{AgentId, AgentState, CellCoord};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the provided alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }
}

/// Fill color used for blocked cells.
pub const OBSTACLE_COLOR: Color = Color::from_rgb_u8(60, 50, 70);

/// Color of the debug grid lines.
pub const GRID_LINE_COLOR: Color = Color::from_rgb_u8(40, 35, 50).with_alpha(30.0 / 255.0);

/// Body color of the player disc.
pub const PLAYER_COLOR: Color = Color::from_rgb_u8(80, 180, 255);

/// Color of the waypoint markers drawn along an agent's pending path.
pub const PATH_MARKER_COLOR: Color = Color::from_rgb_u8(150, 150, 255);

/// Fill color of the detection ring shown around a chasing agent.
pub const DETECTION_FILL_COLOR: Color =
    Color::from_rgb_u8(255, 255, 100).with_alpha(30.0 / 255.0);

/// Border color of the detection ring shown around a chasing agent.
pub const DETECTION_BORDER_COLOR: Color =
    Color::from_rgb_u8(255, 255, 100).with_alpha(100.0 / 255.0);

/// Body outline color assigned to each behavior state.
#[must_use]
pub const fn state_color(state: AgentState) -> Color {
    match state {
        AgentState::Patrol => Color::from_rgb_u8(100, 255, 100),
        AgentState::Chase => Color::from_rgb_u8(255, 255, 100),
        AgentState::Attack => Color::from_rgb_u8(255, 100, 100),
        AgentState::Return => Color::from_rgb_u8(100, 150, 255),
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Per-axis movement intent with components in -1.0..=1.0.
    pub movement: Vec2,
    /// Whether the adapter detected a scenario reset request on this frame.
    pub reset: bool,
    /// Whether the adapter detected an exit request on this frame.
    pub quit: bool,
}

/// Describes the square cell grid that frames the arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of cell columns laid out across the arena.
    pub columns: u32,
    /// Number of cell rows laid out down the arena.
    pub rows: u32,
    /// Side length of a single square cell in world units.
    pub cell_size: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
}

impl GridPresentation {
    /// Creates a new grid descriptor.
    ///
    /// Returns an error when `cell_size` cannot describe a drawable cell.
    pub fn new(
        columns: u32,
        rows: u32,
        cell_size: f32,
        line_color: Color,
    ) -> std::result::Result<Self, RenderingError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }

        Ok(Self {
            columns,
            rows,
            cell_size,
            line_color,
        })
    }

    /// Calculates the total width of the arena.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Calculates the total height of the arena.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    /// Top-left corner of a cell in world units, for drawing filled cells.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.cell_size,
            cell.row() as f32 * self.cell_size,
        )
    }
}

/// Filled cell rendered as an obstacle block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstaclePresentation {
    /// Cell covered by the obstacle.
    pub cell: CellCoord,
    /// Fill color of the block.
    pub color: Color,
}

impl ObstaclePresentation {
    /// Creates a new obstacle descriptor.
    #[must_use]
    pub const fn new(cell: CellCoord, color: Color) -> Self {
        Self { cell, color }
    }
}

/// Health bar drawn horizontally centered over a body disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthBarPresentation {
    /// Width of the bar in world units.
    pub width: f32,
    /// Height of the bar in world units.
    pub height: f32,
    /// Distance between the top of the body and the bar.
    pub rise: f32,
    /// Fill color behind the health portion.
    pub back_color: Color,
    /// Gradient start of the health fill.
    pub fill_start: Color,
    /// Gradient end of the health fill.
    pub fill_end: Color,
    /// Color of the one-pixel border around the bar.
    pub border_color: Color,
}

impl HealthBarPresentation {
    /// Default bar width in world units.
    pub const DEFAULT_WIDTH: f32 = 35.0;

    /// Default bar height in world units.
    pub const DEFAULT_HEIGHT: f32 = 5.0;

    /// Default distance between body top and bar.
    pub const DEFAULT_RISE: f32 = 15.0;

    /// Creates a new health bar descriptor with the stock palette.
    ///
    /// Returns an error when the dimensions cannot describe a drawable bar.
    pub fn new(width: f32, height: f32, rise: f32) -> std::result::Result<Self, RenderingError> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(RenderingError::InvalidBarGeometry { width, height });
        }
        if !(rise.is_finite() && rise >= 0.0) {
            return Err(RenderingError::InvalidBarRise { rise });
        }

        Ok(Self {
            width,
            height,
            rise,
            back_color: Color::from_rgb_u8(40, 20, 20),
            fill_start: Color::from_rgb_u8(255, 100, 100),
            fill_end: Color::from_rgb_u8(200, 0, 0),
            border_color: Color::from_rgb_u8(255, 255, 255).with_alpha(80.0 / 255.0),
        })
    }

    /// Stock bar used over agents and the player.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            rise: Self::DEFAULT_RISE,
            back_color: Color::from_rgb_u8(40, 20, 20),
            fill_start: Color::from_rgb_u8(255, 100, 100),
            fill_end: Color::from_rgb_u8(200, 0, 0),
            border_color: Color::from_rgb_u8(255, 255, 255).with_alpha(80.0 / 255.0),
        }
    }

    /// Top-left corner of the bar when drawn over a body disc.
    #[must_use]
    pub fn origin_over(&self, center: Vec2, body_radius: f32) -> Vec2 {
        Vec2::new(
            center.x - self.width * 0.5,
            center.y - body_radius - self.rise,
        )
    }

    /// Width of the filled portion for the provided health fraction.
    #[must_use]
    pub fn fill_width(&self, health: u32, max_health: u32) -> f32 {
        if max_health == 0 {
            return 0.0;
        }
        let fraction = (health.min(max_health)) as f32 / max_health as f32;
        self.width * fraction
    }
}

/// Pursuit agent rendered as a state-tinted disc.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneAgent {
    /// Identifier allocated to the agent by the world.
    pub id: AgentId,
    /// Center of the body disc in world units.
    pub position: Vec2,
    /// Radius of the body disc in world units.
    pub radius: f32,
    /// Behavior state driving the outline color.
    pub state: AgentState,
    /// Remaining health points.
    pub health: u32,
    /// Health points the agent spawned with.
    pub max_health: u32,
    /// Waypoints the agent still intends to visit.
    pub path: Vec<Vec2>,
    /// Radius of the detection ring in world units, zero when not supplied.
    pub detection_range: f32,
}

impl SceneAgent {
    /// Creates a new scene agent descriptor without a detection ring.
    #[must_use]
    pub fn new(
        id: AgentId,
        position: Vec2,
        radius: f32,
        state: AgentState,
        health: u32,
        max_health: u32,
        path: Vec<Vec2>,
    ) -> Self {
        Self {
            id,
            position,
            radius,
            state,
            health,
            max_health,
            path,
            detection_range: 0.0,
        }
    }

    /// Returns the same agent with its detection ring radius set.
    #[must_use]
    pub fn with_detection_range(mut self, detection_range: f32) -> Self {
        self.detection_range = detection_range;
        self
    }

    /// Outline color derived from the agent's behavior state.
    #[must_use]
    pub const fn outline_color(&self) -> Color {
        state_color(self.state)
    }

    /// Whether the pending path markers should be drawn.
    ///
    /// Patrol walks are routine; only pursuit and return paths are shown.
    #[must_use]
    pub fn path_visible(&self) -> bool {
        !matches!(self.state, AgentState::Patrol) && !self.path.is_empty()
    }

    /// Whether the detection ring should be drawn.
    ///
    /// Only a chasing agent shows its ring, and only when a positive range
    /// was supplied.
    #[must_use]
    pub fn ring_visible(&self) -> bool {
        matches!(self.state, AgentState::Chase) && self.detection_range > 0.0
    }
}

/// Player rendered as a plain disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePlayer {
    /// Center of the body disc in world units.
    pub position: Vec2,
    /// Radius of the body disc in world units.
    pub radius: f32,
    /// Remaining health points.
    pub health: u32,
    /// Health points the player spawned with.
    pub max_health: u32,
    /// Whether the player should still be drawn as active.
    pub alive: bool,
}

impl ScenePlayer {
    /// Creates a new scene player descriptor.
    #[must_use]
    pub const fn new(
        position: Vec2,
        radius: f32,
        health: u32,
        max_health: u32,
        alive: bool,
    ) -> Self {
        Self {
            position,
            radius,
            health,
            max_health,
            alive,
        }
    }
}

/// Scene description combining the arena grid, obstacles and inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Cell grid that frames the arena.
    pub grid: GridPresentation,
    /// Blocked cells drawn as filled blocks.
    pub obstacles: Vec<ObstaclePresentation>,
    /// Agents currently visible in the arena.
    pub agents: Vec<SceneAgent>,
    /// Player disc, if one was placed.
    pub player: Option<ScenePlayer>,
    /// Health bar drawn over every body disc.
    pub health_bar: HealthBarPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        grid: GridPresentation,
        obstacles: Vec<ObstaclePresentation>,
        agents: Vec<SceneAgent>,
        player: Option<ScenePlayer>,
        health_bar: HealthBarPresentation,
    ) -> Self {
        Self {
            grid,
            obstacles,
            agents,
            player,
            health_bar,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Grid Pursuit scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame
    /// delta, per-frame input captured by the adapter, and may mutate the
    /// scene before it is rendered, allowing adapters to animate world
    /// snapshots deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cell size must describe a drawable cell.
    InvalidCellSize {
        /// Provided cell size that failed validation.
        cell_size: f32,
    },
    /// Bar dimensions must describe a drawable rectangle.
    InvalidBarGeometry {
        /// Provided bar width that failed validation.
        width: f32,
        /// Provided bar height that failed validation.
        height: f32,
    },
    /// Bar rise must keep the bar at or above the body top.
    InvalidBarRise {
        /// Provided rise that failed validation.
        rise: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { cell_size } => {
                write!(
                    f,
                    "cell_size must be positive and finite (received {cell_size})"
                )
            }
            Self::InvalidBarGeometry { width, height } => {
                write!(
                    f,
                    "bar dimensions must be positive and finite (received {width}x{height})"
                )
            }
            Self::InvalidBarRise { rise } => {
                write!(
                    f,
                    "bar rise must be non-negative and finite (received {rise})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_colors_follow_the_pursuit_palette() {
        assert_eq!(
            state_color(AgentState::Patrol),
            Color::from_rgb_u8(100, 255, 100)
        );
        assert_eq!(
            state_color(AgentState::Chase),
            Color::from_rgb_u8(255, 255, 100)
        );
        assert_eq!(
            state_color(AgentState::Attack),
            Color::from_rgb_u8(255, 100, 100)
        );
        assert_eq!(
            state_color(AgentState::Return),
            Color::from_rgb_u8(100, 150, 255)
        );
    }

    #[test]
    fn grid_presentation_rejects_degenerate_cells() {
        assert!(matches!(
            GridPresentation::new(30, 20, 0.0, GRID_LINE_COLOR),
            Err(RenderingError::InvalidCellSize { .. })
        ));

        let grid =
            GridPresentation::new(30, 20, 40.0, GRID_LINE_COLOR).expect("positive cell size");
        assert_eq!(grid.width(), 1200.0);
        assert_eq!(grid.height(), 800.0);
    }

    #[test]
    fn cell_origin_lands_on_the_cell_corner() {
        let grid =
            GridPresentation::new(30, 20, 40.0, GRID_LINE_COLOR).expect("positive cell size");

        assert_eq!(
            grid.cell_origin(CellCoord::new(10, 10)),
            Vec2::new(400.0, 400.0)
        );
        assert_eq!(grid.cell_origin(CellCoord::new(0, 0)), Vec2::ZERO);
    }

    #[test]
    fn health_bar_sits_centered_above_the_body() {
        let bar = HealthBarPresentation::standard();

        let origin = bar.origin_over(Vec2::new(600.0, 400.0), 20.0);

        assert_eq!(origin, Vec2::new(582.5, 365.0));
    }

    #[test]
    fn health_bar_fill_tracks_the_health_fraction() {
        let bar = HealthBarPresentation::standard();

        assert_eq!(bar.fill_width(100, 100), 35.0);
        assert_eq!(bar.fill_width(50, 100), 17.5);
        assert_eq!(bar.fill_width(0, 100), 0.0);
        assert_eq!(bar.fill_width(120, 100), 35.0);
        assert_eq!(bar.fill_width(10, 0), 0.0);
    }

    #[test]
    fn health_bar_validation_rejects_flat_bars() {
        assert!(matches!(
            HealthBarPresentation::new(0.0, 5.0, 15.0),
            Err(RenderingError::InvalidBarGeometry { .. })
        ));
        assert!(matches!(
            HealthBarPresentation::new(35.0, 5.0, -1.0),
            Err(RenderingError::InvalidBarRise { .. })
        ));
        assert_eq!(
            HealthBarPresentation::new(35.0, 5.0, 15.0).expect("stock bar dimensions"),
            HealthBarPresentation::standard()
        );
    }

    #[test]
    fn patrol_paths_stay_hidden() {
        let waypoints = vec![Vec2::new(100.0, 100.0)];
        let patrolling = SceneAgent::new(
            AgentId::new(0),
            Vec2::new(200.0, 200.0),
            20.0,
            AgentState::Patrol,
            100,
            100,
            waypoints.clone(),
        );
        let chasing = SceneAgent::new(
            AgentId::new(1),
            Vec2::new(200.0, 200.0),
            20.0,
            AgentState::Chase,
            100,
            100,
            waypoints,
        );
        let idle = SceneAgent::new(
            AgentId::new(2),
            Vec2::new(200.0, 200.0),
            20.0,
            AgentState::Return,
            100,
            100,
            Vec::new(),
        );

        assert!(!patrolling.path_visible());
        assert!(chasing.path_visible());
        assert!(!idle.path_visible());
        assert_eq!(chasing.outline_color(), Color::from_rgb_u8(255, 255, 100));
    }

    #[test]
    fn detection_rings_show_only_while_chasing() {
        let agent = |state| {
            SceneAgent::new(
                AgentId::new(0),
                Vec2::new(200.0, 200.0),
                20.0,
                state,
                100,
                100,
                Vec::new(),
            )
            .with_detection_range(150.0)
        };

        assert!(agent(AgentState::Chase).ring_visible());
        assert!(!agent(AgentState::Patrol).ring_visible());
        assert!(!agent(AgentState::Attack).ring_visible());
        assert!(!agent(AgentState::Return).ring_visible());

        let unranged = SceneAgent::new(
            AgentId::new(1),
            Vec2::new(200.0, 200.0),
            20.0,
            AgentState::Chase,
            100,
            100,
            Vec::new(),
        );
        assert!(!unranged.ring_visible());
    }
}

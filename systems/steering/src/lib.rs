#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Waypoint locomotion and body-disc collision handling for pursuit agents.
//!
//! The crate is position-in, outcome-out: callers hand over the mover's body
//! disc, its [`PathCursor`], the arena grid, and a snapshot of neighboring
//! bodies, and receive a [`StepOutcome`] describing what a single tick of
//! locomotion did. Callers update movers one at a time, so every mover
//! observes the already-committed positions of movers that ticked before it.

use grid_pursuit_core::{WorldPos, WorldVec};
use grid_pursuit_system_pathfinding::ObstacleGrid;

/// Distance at which a waypoint counts as reached.
pub const WAYPOINT_RADIUS: f32 = 5.0;

/// Circular body occupying continuous arena space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disc {
    center: WorldPos,
    radius: f32,
}

impl Disc {
    /// Creates a body disc from a center position and radius.
    #[must_use]
    pub const fn new(center: WorldPos, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Center of the disc in world units.
    #[must_use]
    pub const fn center(&self) -> WorldPos {
        self.center
    }

    /// Radius of the disc in world units.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }
}

/// Waypoint polyline consumed front to back by a moving agent.
///
/// Paths are replaced wholesale via [`PathCursor::assign`]; the cursor never
/// edits waypoints in place. An exhausted cursor reports no current waypoint
/// so handlers know to request a fresh segment.
#[derive(Clone, Debug, Default)]
pub struct PathCursor {
    waypoints: Vec<WorldPos>,
    next: usize,
}

impl PathCursor {
    /// Creates a cursor holding no waypoints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the polyline and rewinds to its first waypoint.
    pub fn assign(&mut self, waypoints: Vec<WorldPos>) {
        self.waypoints = waypoints;
        self.next = 0;
    }

    /// Drops all waypoints.
    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.next = 0;
    }

    /// Waypoint the mover is currently walking toward, if any.
    #[must_use]
    pub fn current(&self) -> Option<WorldPos> {
        self.waypoints.get(self.next).copied()
    }

    /// Steps past the current waypoint.
    pub fn advance(&mut self) {
        if self.next < self.waypoints.len() {
            self.next += 1;
        }
    }

    /// Whether every waypoint has been consumed or none were assigned.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.next >= self.waypoints.len()
    }

    /// Waypoints that remain to be visited, for overlays and diagnostics.
    #[must_use]
    pub fn remaining(&self) -> &[WorldPos] {
        let start = self.next.min(self.waypoints.len());
        &self.waypoints[start..]
    }
}

/// What a single locomotion tick did to the mover.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    /// No current waypoint, so the mover stayed put.
    Idle,
    /// The mover arrived within [`WAYPOINT_RADIUS`] and consumed the
    /// waypoint without moving this tick.
    WaypointReached,
    /// The mover committed its candidate position.
    Moved {
        /// Position the mover occupies after the tick.
        to: WorldPos,
    },
    /// The candidate cell was blocked or outside the arena; the mover froze.
    BlockedByObstacle,
    /// The candidate overlapped at least one neighboring body; the mover
    /// froze.
    BlockedByNeighbor {
        /// Candidate position after symmetric separation from every
        /// overlapping neighbor. Surfaced for overlays and never committed.
        separated: WorldPos,
    },
}

/// Whether two body discs overlap.
///
/// Touching circles do not count as overlapping; the test is strict.
#[must_use]
pub fn discs_overlap(a: &Disc, b: &Disc) -> bool {
    a.center().distance_to(b.center()) < a.radius() + b.radius()
}

/// Symmetric separation vector pushing `a` out of `b`.
///
/// Points from `a`'s center toward `b`'s with magnitude half the overlap
/// depth, so applying the negated vector to `a` and the vector itself to `b`
/// splits the correction evenly. Returns zero when the discs do not overlap
/// or when their centers coincide exactly, which leaves coincident bodies
/// where they are rather than ejecting them in an arbitrary direction.
#[must_use]
pub fn resolve_circle_overlap(a: &Disc, b: &Disc) -> WorldVec {
    let distance = a.center().distance_to(b.center());
    if distance == 0.0 {
        return WorldVec::ZERO;
    }

    let overlap = a.radius() + b.radius() - distance;
    if overlap <= 0.0 {
        return WorldVec::ZERO;
    }

    a.center()
        .offset_to(b.center())
        .normalized()
        .scaled(overlap / 2.0)
}

/// Executes one tick of waypoint locomotion for the provided body.
///
/// The candidate position moves `speed` world units toward the current
/// waypoint. The move commits only when the candidate's cell is walkable and
/// the candidate body overlaps none of the neighbor discs; any block leaves
/// the mover exactly where it was. Neighbor snapshots must exclude the mover
/// itself and contain only bodies that should be avoided.
pub fn advance_along_path(
    body: &Disc,
    speed: f32,
    cursor: &mut PathCursor,
    grid: &ObstacleGrid,
    neighbors: &[Disc],
) -> StepOutcome {
    let Some(waypoint) = cursor.current() else {
        return StepOutcome::Idle;
    };

    let offset = body.center().offset_to(waypoint);
    if offset.length() < WAYPOINT_RADIUS {
        cursor.advance();
        return StepOutcome::WaypointReached;
    }

    let candidate = body.center().translated(offset.normalized().scaled(speed));
    if !grid.is_walkable_at(candidate) {
        return StepOutcome::BlockedByObstacle;
    }

    let mut separated = candidate;
    let mut overlapped = false;

    for neighbor in neighbors {
        let moved = Disc::new(separated, body.radius());
        if discs_overlap(&moved, neighbor) {
            let separation = resolve_circle_overlap(&moved, neighbor);
            separated = separated.translated(separation.scaled(-1.0));
            overlapped = true;
        }
    }

    if overlapped {
        return StepOutcome::BlockedByNeighbor { separated };
    }

    StepOutcome::Moved { to: candidate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_pursuit_core::CellCoord;

    fn open_grid() -> ObstacleGrid {
        ObstacleGrid::new(30, 20, 40.0)
    }

    #[test]
    fn cursor_assign_rewinds_to_the_first_waypoint() {
        let mut cursor = PathCursor::new();
        cursor.assign(vec![WorldPos::new(1.0, 1.0), WorldPos::new(2.0, 2.0)]);
        cursor.advance();

        cursor.assign(vec![WorldPos::new(9.0, 9.0)]);

        assert_eq!(cursor.current(), Some(WorldPos::new(9.0, 9.0)));
        assert!(!cursor.is_exhausted());
    }

    #[test]
    fn cursor_exhausts_after_consuming_every_waypoint() {
        let mut cursor = PathCursor::new();
        cursor.assign(vec![WorldPos::new(1.0, 1.0)]);

        assert!(!cursor.is_exhausted());
        cursor.advance();
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.current(), None);
        assert!(cursor.remaining().is_empty());

        cursor.advance();
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn overlap_test_is_strict_about_touching_circles() {
        let a = Disc::new(WorldPos::new(0.0, 0.0), 20.0);
        let touching = Disc::new(WorldPos::new(40.0, 0.0), 20.0);
        let overlapping = Disc::new(WorldPos::new(39.0, 0.0), 20.0);

        assert!(!discs_overlap(&a, &touching));
        assert!(discs_overlap(&a, &overlapping));
    }

    #[test]
    fn separation_splits_the_overlap_evenly() {
        let a = Disc::new(WorldPos::new(0.0, 0.0), 20.0);
        let b = Disc::new(WorldPos::new(30.0, 0.0), 20.0);

        let separation = resolve_circle_overlap(&a, &b);

        assert!((separation.dx() - 5.0).abs() < f32::EPSILON);
        assert!(separation.dy().abs() < f32::EPSILON);
    }

    #[test]
    fn separation_is_zero_for_coincident_centers() {
        let a = Disc::new(WorldPos::new(7.0, 7.0), 20.0);
        let b = Disc::new(WorldPos::new(7.0, 7.0), 20.0);

        assert_eq!(resolve_circle_overlap(&a, &b), WorldVec::ZERO);
    }

    #[test]
    fn separation_is_zero_without_overlap() {
        let a = Disc::new(WorldPos::new(0.0, 0.0), 10.0);
        let b = Disc::new(WorldPos::new(50.0, 0.0), 10.0);

        assert_eq!(resolve_circle_overlap(&a, &b), WorldVec::ZERO);
    }

    #[test]
    fn empty_cursor_leaves_the_mover_idle() {
        let grid = open_grid();
        let mut cursor = PathCursor::new();
        let body = Disc::new(WorldPos::new(100.0, 100.0), 20.0);

        let outcome = advance_along_path(&body, 4.5, &mut cursor, &grid, &[]);

        assert_eq!(outcome, StepOutcome::Idle);
    }

    #[test]
    fn nearby_waypoint_is_consumed_without_moving() {
        let grid = open_grid();
        let mut cursor = PathCursor::new();
        cursor.assign(vec![WorldPos::new(103.0, 100.0), WorldPos::new(200.0, 100.0)]);
        let body = Disc::new(WorldPos::new(100.0, 100.0), 20.0);

        let outcome = advance_along_path(&body, 4.5, &mut cursor, &grid, &[]);

        assert_eq!(outcome, StepOutcome::WaypointReached);
        assert_eq!(cursor.current(), Some(WorldPos::new(200.0, 100.0)));
    }

    #[test]
    fn mover_walks_speed_units_toward_the_waypoint() {
        let grid = open_grid();
        let mut cursor = PathCursor::new();
        cursor.assign(vec![WorldPos::new(200.0, 100.0)]);
        let body = Disc::new(WorldPos::new(100.0, 100.0), 20.0);

        let outcome = advance_along_path(&body, 4.5, &mut cursor, &grid, &[]);

        match outcome {
            StepOutcome::Moved { to } => {
                assert!((to.x() - 104.5).abs() < f32::EPSILON);
                assert!((to.y() - 100.0).abs() < f32::EPSILON);
            }
            other => panic!("expected a committed move, got {other:?}"),
        }
    }

    #[test]
    fn blocked_destination_cell_freezes_the_mover() {
        let mut grid = open_grid();
        let _ = grid.add_obstacle(WorldPos::new(104.5, 100.0));
        let mut cursor = PathCursor::new();
        cursor.assign(vec![WorldPos::new(200.0, 100.0)]);
        let body = Disc::new(WorldPos::new(90.0, 100.0), 20.0);

        let outcome = advance_along_path(&body, 20.0, &mut cursor, &grid, &[]);

        assert_eq!(outcome, StepOutcome::BlockedByObstacle);
        assert_eq!(cursor.current(), Some(WorldPos::new(200.0, 100.0)));
    }

    #[test]
    fn overlapping_neighbor_freezes_the_mover_and_reports_the_nudge() {
        let grid = open_grid();
        let mut cursor = PathCursor::new();
        cursor.assign(vec![WorldPos::new(200.0, 100.0)]);
        let body = Disc::new(WorldPos::new(100.0, 100.0), 20.0);
        let neighbor = Disc::new(WorldPos::new(130.0, 100.0), 20.0);

        let outcome = advance_along_path(&body, 4.5, &mut cursor, &grid, &[neighbor]);

        match outcome {
            StepOutcome::BlockedByNeighbor { separated } => {
                // Candidate lands at 104.5; overlap 14.5 splits to 7.25 west.
                assert!((separated.x() - 97.25).abs() < 0.001);
                assert!((separated.y() - 100.0).abs() < f32::EPSILON);
            }
            other => panic!("expected a neighbor block, got {other:?}"),
        }
    }

    #[test]
    fn coincident_neighbor_blocks_without_producing_nan() {
        let grid = open_grid();
        let mut cursor = PathCursor::new();
        cursor.assign(vec![WorldPos::new(104.5, 104.5)]);
        let body = Disc::new(WorldPos::new(100.0, 100.0), 20.0);
        // Neighbor sits exactly where the candidate position will land.
        let offset = body.center().offset_to(WorldPos::new(104.5, 104.5));
        let candidate = body.center().translated(offset.normalized().scaled(4.5));
        let neighbor = Disc::new(candidate, 20.0);

        let outcome = advance_along_path(&body, 4.5, &mut cursor, &grid, &[neighbor]);

        match outcome {
            StepOutcome::BlockedByNeighbor { separated } => {
                assert!(!separated.x().is_nan());
                assert!(!separated.y().is_nan());
                assert_eq!(separated, candidate);
            }
            other => panic!("expected a neighbor block, got {other:?}"),
        }
    }

    #[test]
    fn candidate_outside_the_arena_counts_as_blocked() {
        let grid = open_grid();
        let mut cursor = PathCursor::new();
        cursor.assign(vec![WorldPos::new(-50.0, 20.0)]);
        let body = Disc::new(WorldPos::new(2.0, 20.0), 20.0);

        let outcome = advance_along_path(&body, 4.5, &mut cursor, &grid, &[]);

        assert_eq!(outcome, StepOutcome::BlockedByObstacle);
    }

    #[test]
    fn neighbor_block_skips_cells_already_checked_for_obstacles() {
        let mut grid = open_grid();
        let _ = grid.add_obstacle(WorldPos::new(104.5, 100.0));
        let mut cursor = PathCursor::new();
        cursor.assign(vec![WorldPos::new(200.0, 100.0)]);
        let body = Disc::new(WorldPos::new(100.0, 100.0), 20.0);
        let neighbor = Disc::new(WorldPos::new(104.5, 100.0), 20.0);

        let outcome = advance_along_path(&body, 4.5, &mut cursor, &grid, &[neighbor]);

        // Obstacle veto wins; the neighbor never enters the picture.
        assert_eq!(outcome, StepOutcome::BlockedByObstacle);
    }

    #[test]
    fn obstacle_elsewhere_does_not_block_the_lane() {
        let mut grid = open_grid();
        let _ = grid.add_obstacle(grid.cell_center(CellCoord::new(10, 10)));
        let mut cursor = PathCursor::new();
        cursor.assign(vec![WorldPos::new(200.0, 100.0)]);
        let body = Disc::new(WorldPos::new(100.0, 100.0), 20.0);

        let outcome = advance_along_path(&body, 4.5, &mut cursor, &grid, &[]);

        assert!(matches!(outcome, StepOutcome::Moved { .. }));
    }
}

//! Scenario-scale checks of the walkability grid and the A* search.

use grid_pursuit_core::{CellCoord, WorldPos};
use grid_pursuit_system_pathfinding::{
    find_path, next_step, ObstacleGrid, DIAGONAL_COST, ORTHOGONAL_COST,
};

#[test]
fn open_arena_costs_follow_the_diagonal_then_straight_law() {
    let grid = ObstacleGrid::new(30, 20, 40.0);
    let cases = [
        (CellCoord::new(2, 2), CellCoord::new(9, 5)),
        (CellCoord::new(3, 10), CellCoord::new(7, 14)),
        (CellCoord::new(20, 6), CellCoord::new(25, 6)),
    ];

    for (start, goal) in cases {
        let path = find_path(&grid, grid.cell_center(start), grid.cell_center(goal));

        let columns = start.column().abs_diff(goal.column());
        let rows = start.row().abs_diff(goal.row());
        let diagonal = columns.min(rows);
        let straight = columns.abs_diff(rows);

        assert_eq!(
            path.len() as u32,
            columns.max(rows) + 1,
            "open arena path {start:?} -> {goal:?} should take one cell per step"
        );
        assert_eq!(
            path_cost(&grid, &path),
            DIAGONAL_COST * diagonal + ORTHOGONAL_COST * straight,
            "open arena path {start:?} -> {goal:?} should cost the unobstructed optimum"
        );
    }
}

#[test]
fn detours_thread_the_only_doorway_in_a_wall() {
    let mut grid = ObstacleGrid::new(30, 20, 40.0);
    let door = CellCoord::new(10, 12);
    for row in 0..20 {
        let cell = CellCoord::new(10, row);
        if cell != door {
            let _ = grid.add_obstacle(grid.cell_center(cell));
        }
    }

    let start = grid.cell_center(CellCoord::new(5, 5));
    let goal = grid.cell_center(CellCoord::new(15, 5));
    let path = find_path(&grid, start, goal);

    assert!(!path.is_empty(), "the doorway keeps the goal reachable");
    assert_eq!(path[0], start);
    assert_eq!(*path.last().expect("non-empty path"), goal);
    for waypoint in &path {
        let cell = grid.cell_at(*waypoint).expect("waypoint inside arena");
        assert!(grid.is_walkable(cell), "path crossed the wall");
    }
    assert!(
        path.iter()
            .any(|waypoint| grid.cell_at(*waypoint) == Some(door)),
        "column 10 can only be crossed at the doorway"
    );
    // Reaching the door and leaving it again costs 90 each way.
    assert!(
        path_cost(&grid, &path) >= 180,
        "a detour cannot beat the walled optimum"
    );
}

#[test]
fn repeated_next_steps_walk_a_chase_to_the_goal() {
    let grid = ObstacleGrid::new(30, 20, 40.0);
    let goal_cell = CellCoord::new(20, 11);
    let goal = grid.cell_center(goal_cell);
    let mut position = grid.cell_center(CellCoord::new(3, 4));

    let mut hops = 0;
    while grid.cell_at(position) != Some(goal_cell) {
        position = next_step(&grid, position, goal).expect("open arena always routes");
        hops += 1;
        assert!(grid.is_walkable_at(position), "hop left the arena");
        assert!(hops <= 32, "chase should close in, not wander");
    }

    // One hop per cell of Chebyshev distance, ending on the goal center.
    assert_eq!(hops, 17);
    assert_eq!(position, goal);
}

fn path_cost(grid: &ObstacleGrid, path: &[WorldPos]) -> u32 {
    path.windows(2)
        .map(|pair| {
            let from = grid.cell_at(pair[0]).expect("waypoint inside arena");
            let to = grid.cell_at(pair[1]).expect("waypoint inside arena");
            let columns = from.column().abs_diff(to.column());
            let rows = from.row().abs_diff(to.row());
            assert!(
                columns <= 1 && rows <= 1,
                "consecutive waypoints should sit on adjacent cells"
            );
            if columns == 1 && rows == 1 {
                DIAGONAL_COST
            } else {
                ORTHOGONAL_COST
            }
        })
        .sum()
}

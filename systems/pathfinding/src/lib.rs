#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Arena walkability and A* path search for the pursuit systems.
//!
//! The [`ObstacleGrid`] partitions the continuous arena into square cells and
//! tracks which cells reject movement. [`find_path`] searches the
//! 8-connected cell graph and hands back a polyline of cell centers that
//! agents feed into their locomotion, while [`next_step`] trims that polyline
//! down to the single waypoint an agent should walk toward next.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use grid_pursuit_core::{CellCoord, WorldPos};

/// Movement cost charged for stepping into an orthogonal neighbor.
pub const ORTHOGONAL_COST: u32 = 10;

/// Movement cost charged for stepping into a diagonal neighbor.
pub const DIAGONAL_COST: u32 = 14;

/// Cell offsets reaching the eight neighbors surrounding a cell.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Square-cell partition of the arena with an occupancy set.
///
/// Walkability is pure: it depends only on the grid dimensions and the
/// occupied set, never on who is asking. A degenerate grid (zero columns,
/// zero rows, or a non-positive cell size) reports nothing walkable, so
/// callers running ahead of configuration observe a uniformly blocked arena
/// instead of undefined geometry.
#[derive(Clone, Debug, Default)]
pub struct ObstacleGrid {
    columns: u32,
    rows: u32,
    cell_size: f32,
    occupied: HashSet<CellCoord>,
}

impl ObstacleGrid {
    /// Creates an empty grid with the provided dimensions.
    #[must_use]
    pub fn new(columns: u32, rows: u32, cell_size: f32) -> Self {
        Self {
            columns,
            rows,
            cell_size,
            occupied: HashSet::new(),
        }
    }

    /// Number of cell columns laid out across the arena.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows laid out down the arena.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Total arena width in world units.
    #[must_use]
    pub fn arena_width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Total arena height in world units.
    #[must_use]
    pub fn arena_height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    /// Cell underneath the provided world position, if any.
    ///
    /// Coordinates are truncated onto the cell lattice. Positions outside the
    /// arena, non-finite positions, and every position on a degenerate grid
    /// resolve to `None`, which downstream checks treat as unwalkable.
    #[must_use]
    pub fn cell_at(&self, position: WorldPos) -> Option<CellCoord> {
        if self.columns == 0 || self.rows == 0 || self.cell_size <= 0.0 {
            return None;
        }

        if !position.x().is_finite() || !position.y().is_finite() {
            return None;
        }

        if position.x() < 0.0 || position.y() < 0.0 {
            return None;
        }

        let column = (position.x() / self.cell_size) as u32;
        let row = (position.y() / self.cell_size) as u32;

        if column >= self.columns || row >= self.rows {
            return None;
        }

        Some(CellCoord::new(column, row))
    }

    /// World position at the center of the provided cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> WorldPos {
        WorldPos::new(
            cell.column() as f32 * self.cell_size + self.cell_size / 2.0,
            cell.row() as f32 * self.cell_size + self.cell_size / 2.0,
        )
    }

    /// Blocks the cell underneath the provided position.
    ///
    /// Returns the affected cell only when the occupancy set actually
    /// changed; duplicate adds and unresolvable positions are silent no-ops.
    pub fn add_obstacle(&mut self, position: WorldPos) -> Option<CellCoord> {
        let cell = self.cell_at(position)?;
        self.occupied.insert(cell).then_some(cell)
    }

    /// Unblocks the cell underneath the provided position.
    ///
    /// Returns the affected cell only when an obstacle was actually removed.
    pub fn remove_obstacle(&mut self, position: WorldPos) -> Option<CellCoord> {
        let cell = self.cell_at(position)?;
        self.occupied.remove(&cell).then_some(cell)
    }

    /// Whether the provided cell lies inside the arena and carries no
    /// obstacle.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        if self.columns == 0 || self.rows == 0 || self.cell_size <= 0.0 {
            return false;
        }

        cell.column() < self.columns && cell.row() < self.rows && !self.occupied.contains(&cell)
    }

    /// Whether the cell underneath the provided position is walkable.
    #[must_use]
    pub fn is_walkable_at(&self, position: WorldPos) -> bool {
        self.cell_at(position)
            .map_or(false, |cell| self.is_walkable(cell))
    }

    /// Iterates the blocked cells in unspecified order.
    pub fn obstacles(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.occupied.iter().copied()
    }
}

/// Per-cell search bookkeeping held in the node arena.
///
/// Parents are stored as cell keys rather than references so records can be
/// relaxed freely while the arena grows.
#[derive(Clone, Copy, Debug)]
struct NodeRecord {
    g: u32,
    parent: Option<CellCoord>,
}

/// Open-list entry ordered by total estimated cost.
///
/// Ordering is reversed so [`BinaryHeap`] pops the cheapest entry first.
/// Entries compare on `f` alone; ties resolve however the heap resolves
/// them, and stale duplicates are skipped through the closed set.
#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    f: u32,
    cell: CellCoord,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f)
    }
}

/// Searches the 8-connected cell graph between two world positions.
///
/// The returned polyline maps traversed cells to their centers and includes
/// the start cell as its first element. Orthogonal steps cost
/// [`ORTHOGONAL_COST`], diagonal steps [`DIAGONAL_COST`], and the heuristic
/// is the Manhattan cell distance scaled by the orthogonal cost; it is not
/// diagonal-aware, which keeps the expansion eager toward the goal.
///
/// Returns an empty polyline when the goal cell is blocked or outside the
/// arena, and a single-element polyline holding the original goal position
/// when start and goal share a cell.
#[must_use]
pub fn find_path(grid: &ObstacleGrid, start: WorldPos, goal: WorldPos) -> Vec<WorldPos> {
    let Some(goal_cell) = grid.cell_at(goal) else {
        return Vec::new();
    };

    if !grid.is_walkable(goal_cell) {
        return Vec::new();
    }

    let Some(start_cell) = grid.cell_at(start) else {
        return Vec::new();
    };

    if start_cell == goal_cell {
        return vec![goal];
    }

    let mut records: HashMap<CellCoord, NodeRecord> = HashMap::new();
    let mut closed: HashSet<CellCoord> = HashSet::new();
    let mut open = BinaryHeap::new();

    let _ = records.insert(
        start_cell,
        NodeRecord {
            g: 0,
            parent: None,
        },
    );
    open.push(OpenEntry {
        f: 0,
        cell: start_cell,
    });

    while let Some(entry) = open.pop() {
        if !closed.insert(entry.cell) {
            continue;
        }

        if entry.cell == goal_cell {
            return reconstruct(grid, &records, entry.cell);
        }

        let Some(current) = records.get(&entry.cell).copied() else {
            continue;
        };

        for (neighbor, step_cost) in neighbors(entry.cell) {
            if !grid.is_walkable(neighbor) {
                continue;
            }

            if closed.contains(&neighbor) {
                continue;
            }

            let tentative = current.g.saturating_add(step_cost);
            let record = records.entry(neighbor).or_insert(NodeRecord {
                g: u32::MAX,
                parent: None,
            });

            if tentative < record.g {
                record.g = tentative;
                record.parent = Some(entry.cell);
                open.push(OpenEntry {
                    f: tentative.saturating_add(heuristic(neighbor, goal_cell)),
                    cell: neighbor,
                });
            }
        }
    }

    Vec::new()
}

/// Resolves the single waypoint to walk toward on the way to the goal.
///
/// Runs a full search and returns the second polyline element when the path
/// holds at least two, the only element when start and goal share a cell,
/// and `None` when no path exists.
#[must_use]
pub fn next_step(grid: &ObstacleGrid, start: WorldPos, goal: WorldPos) -> Option<WorldPos> {
    let path = find_path(grid, start, goal);
    match path.len() {
        0 => None,
        1 => Some(path[0]),
        _ => Some(path[1]),
    }
}

fn heuristic(cell: CellCoord, goal: CellCoord) -> u32 {
    cell.manhattan_distance(goal).saturating_mul(ORTHOGONAL_COST)
}

fn neighbors(cell: CellCoord) -> impl Iterator<Item = (CellCoord, u32)> {
    NEIGHBOR_OFFSETS.into_iter().filter_map(move |(dc, dr)| {
        let column = offset_axis(cell.column(), dc)?;
        let row = offset_axis(cell.row(), dr)?;
        let cost = if dc != 0 && dr != 0 {
            DIAGONAL_COST
        } else {
            ORTHOGONAL_COST
        };
        Some((CellCoord::new(column, row), cost))
    })
}

fn offset_axis(value: u32, delta: i32) -> Option<u32> {
    if delta < 0 {
        value.checked_sub(delta.unsigned_abs())
    } else {
        value.checked_add(delta as u32)
    }
}

fn reconstruct(
    grid: &ObstacleGrid,
    records: &HashMap<CellCoord, NodeRecord>,
    goal_cell: CellCoord,
) -> Vec<WorldPos> {
    let mut cells = vec![goal_cell];
    let mut cursor = goal_cell;

    while let Some(parent) = records.get(&cursor).and_then(|record| record.parent) {
        cells.push(parent);
        cursor = parent;
    }

    cells.reverse();
    cells
        .into_iter()
        .map(|cell| grid.cell_center(cell))
        .collect()
}
